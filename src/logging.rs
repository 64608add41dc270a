//! Logging setup
//!
//! Every event becomes one line: `[YYYY.MM.DD HH:MM:SS] L message`, where
//! `L` is the first letter of the level. Lines go to stderr, or are appended
//! to a log file when one is given.

use chrono::Local;
use std::fmt;
use std::fs::OpenOptions;
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

pub const TIMESTAMP_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Event formatter producing the single-line log shape
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "[{}] {} ",
            Local::now().format(TIMESTAMP_FORMAT),
            level_letter(event.metadata().level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Single-letter severity
pub fn level_letter(level: &Level) -> char {
    match *level {
        Level::ERROR => 'E',
        Level::WARN => 'W',
        Level::INFO => 'I',
        Level::DEBUG => 'D',
        Level::TRACE => 'T',
    }
}

/// Filter for the verbosity switch
pub fn filter_for(debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("newsreel=debug,info")
    } else {
        EnvFilter::new("newsreel=info,warn")
    }
}

/// Installs the global subscriber
///
/// Fails only if the log file cannot be opened.
pub fn init(log_file: Option<&Path>, debug: bool) -> io::Result<()> {
    let writer = match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
        None => BoxMakeWriter::new(io::stderr),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter_for(debug))
        .with_writer(writer)
        .with_ansi(false)
        .event_format(LineFormat)
        .init();

    Ok(())
}
