//! Per-cycle statistics
//!
//! A `CycleStats` value is built while a cycle runs, logged once at the end
//! of the cycle, and then thrown away.

use std::fmt;
use std::time::Duration;

/// Tally of one crawl cycle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// 1-based cycle number
    pub cycle: u64,

    /// Items handed to the publisher
    pub attempted: usize,

    /// Items published
    pub succeeded: usize,

    /// Items that failed
    pub failed: usize,

    /// Secondary downloads that failed inside published items
    pub secondary_failed: usize,

    /// Wall-clock time of the cycle's work
    pub elapsed: Duration,

    /// Identities of the published items, in the order they finished
    pub published: Vec<String>,
}

impl CycleStats {
    pub fn new(cycle: u64) -> Self {
        Self {
            cycle,
            ..Self::default()
        }
    }

    /// Records a published item and its failed secondary downloads
    pub fn record_success(&mut self, identity: &str, secondary_failed: usize) {
        self.succeeded += 1;
        self.published.push(identity.to_string());
        self.secondary_failed += secondary_failed;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    /// Logs the end-of-cycle summary line
    pub fn log_summary(&self) {
        tracing::info!("{}", self);
    }
}

impl fmt::Display for CycleStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Cycle {} finished in {:.1}s: {} attempted, {} succeeded, {} failed",
            self.cycle,
            self.elapsed.as_secs_f64(),
            self.attempted,
            self.succeeded,
            self.failed
        )?;
        if self.secondary_failed > 0 {
            write!(f, " ({} secondary downloads failed)", self.secondary_failed)?;
        }
        Ok(())
    }
}
