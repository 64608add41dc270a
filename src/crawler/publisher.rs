//! Item publication
//!
//! An item is downloaded into a private staging folder and only then swapped
//! into its final folder, so a reader of the output root never sees a
//! half-written item. Any failure before the swap removes the staging folder
//! and leaves the final folder as it was.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::links::extract_links;
use crate::crawler::parser::ItemCandidate;
use crate::url::{derive_file_name, sanitize_title};
use crate::{FetchError, PublishError};
use futures::future::join_all;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::sync::Semaphore;

/// Marker prefix of transient folders in the output root
pub const STAGING_PREFIX: &str = ".staging-";

/// Marker prefix of a published folder parked while its replacement moves in
///
/// Sanitized titles never start with `.`, so neither marker collides with a
/// published folder.
pub const RETIRED_PREFIX: &str = ".retired-";

/// A successfully published item
#[derive(Debug)]
pub struct Published {
    /// Identity recorded for deduplication
    pub identity: String,

    /// Title as shown on the listing
    pub title: String,

    /// Final folder holding the item's files
    pub folder: PathBuf,

    /// Outcome of the secondary downloads
    pub secondary: SecondaryReport,
}

/// Outcome of one item's secondary downloads
///
/// Failures here never fail the item.
#[derive(Debug, Default)]
pub struct SecondaryReport {
    /// Number of secondary resources written to the item folder
    pub downloaded: usize,

    /// One entry per secondary resource that could not be downloaded
    pub failed: Vec<FetchError>,
}

/// Downloads one item and publishes it under `output_root`
///
/// # Steps
///
/// 1. Create the staging folder `output_root/.staging-<title>-<random>`
/// 2. Download the primary resource (failure is fatal to the item)
/// 3. Collect the secondary links from the detail page (failure is fatal)
/// 4. Download all secondary resources concurrently (failures are recorded)
/// 5. Merge the staging folder into `output_root/<title>`
///
/// # Returns
///
/// * `Ok(Published)` - The item folder is in place
/// * `Err(PublishError)` - The item failed; no staging folder remains and
///   the final folder is untouched
pub async fn publish_item<F>(
    fetcher: &F,
    candidate: &ItemCandidate,
    output_root: &Path,
    base_url: &str,
    gate: &Semaphore,
) -> Result<Published, PublishError>
where
    F: Fetcher + ?Sized,
{
    let folder_name = sanitize_title(&candidate.title);
    let final_dir = output_root.join(&folder_name);
    let staging = create_staging(output_root, &folder_name)?;

    let primary_name = derive_file_name(&candidate.primary_url);
    let bytes = fetcher
        .download_to(&candidate.primary_url, &staging.path().join(&primary_name))
        .await
        .map_err(PublishError::Primary)?;
    tracing::debug!(
        "Downloaded {} ({} bytes) for '{}'",
        candidate.primary_url,
        bytes,
        candidate.title
    );

    let links = extract_links(fetcher, base_url, &candidate.detail_url, gate)
        .await
        .map_err(PublishError::Detail)?;

    let plan = plan_secondary_downloads(links, &candidate.primary_url, &primary_name);
    let secondary = download_secondaries(fetcher, staging.path(), plan).await;
    for failure in &secondary.failed {
        tracing::warn!("Secondary download for '{}' failed: {}", candidate.title, failure);
    }

    commit(staging, &final_dir)?;

    Ok(Published {
        identity: candidate.identity().to_string(),
        title: candidate.title.clone(),
        folder: final_dir,
        secondary,
    })
}

/// Cleans up transient folders left in `output_root` by an earlier process
///
/// Staging folders are removed. A retired folder is moved back to its
/// published name when that name is free (the process died mid-swap) and
/// removed otherwise (the swap had completed). Returns the number of
/// folders cleaned up. A missing output root is not an error.
pub fn sweep_stale_staging(output_root: &Path) -> io::Result<usize> {
    let entries = match fs::read_dir(output_root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e),
    };

    let mut leftovers = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            leftovers.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    leftovers.sort();

    let mut cleaned = 0;
    for name in leftovers {
        let path = output_root.join(&name);
        if name.starts_with(STAGING_PREFIX) {
            fs::remove_dir_all(&path)?;
            cleaned += 1;
        } else if let Some(published) = name.strip_prefix(RETIRED_PREFIX) {
            let final_dir = output_root.join(published);
            if final_dir.exists() {
                fs::remove_dir_all(&path)?;
            } else {
                tracing::info!("Restoring {} after an interrupted swap", final_dir.display());
                fs::rename(&path, &final_dir)?;
            }
            cleaned += 1;
        }
    }
    Ok(cleaned)
}

/// Picks one URL per target file name
///
/// URLs are taken in sorted order so the choice is stable; the primary
/// resource's URL and file name are reserved.
fn plan_secondary_downloads(
    links: HashSet<String>,
    primary_url: &str,
    primary_name: &str,
) -> BTreeMap<String, String> {
    let mut urls: Vec<String> = links.into_iter().filter(|url| url != primary_url).collect();
    urls.sort();

    let mut plan = BTreeMap::new();
    for url in urls {
        let name = derive_file_name(&url);
        if name == primary_name || plan.contains_key(&name) {
            tracing::debug!("Skipping {}: file name {} already taken", url, name);
            continue;
        }
        plan.insert(name, url);
    }
    plan
}

/// Runs every planned download concurrently, one result slot per URL
async fn download_secondaries<F>(
    fetcher: &F,
    staging: &Path,
    plan: BTreeMap<String, String>,
) -> SecondaryReport
where
    F: Fetcher + ?Sized,
{
    let downloads = plan.iter().map(|(name, url)| {
        let dest = staging.join(name);
        async move { fetcher.download_to(url, &dest).await }
    });
    let slots = join_all(downloads).await;

    let mut report = SecondaryReport::default();
    for slot in slots {
        match slot {
            Ok(_) => report.downloaded += 1,
            Err(e) => report.failed.push(e),
        }
    }
    report
}

/// Creates the private staging folder for one item run
///
/// The returned [`TempDir`] removes the folder when dropped, which covers
/// both error returns and cancelled runs. The random suffix keeps two items
/// with the same title apart.
fn create_staging(output_root: &Path, folder_name: &str) -> Result<TempDir, PublishError> {
    fs::create_dir_all(output_root).map_err(|e| PublishError::staging(output_root, e))?;
    tempfile::Builder::new()
        .prefix(&format!("{}{}-", STAGING_PREFIX, folder_name))
        .tempdir_in(output_root)
        .map_err(|e| PublishError::staging(output_root, e))
}

/// Merges the staged files into `final_dir`
///
/// Contains no await point, so no other task observes a partial merge. The
/// staging folder is removed if the merge fails.
fn commit(staging: TempDir, final_dir: &Path) -> Result<(), PublishError> {
    let staged = staging.keep();
    if let Err(e) = merge_into(&staged, final_dir) {
        if let Err(cleanup) = fs::remove_dir_all(&staged) {
            tracing::warn!(
                "Failed to remove staging folder {}: {}",
                staged.display(),
                cleanup
            );
        }
        return Err(PublishError::staging(final_dir, e));
    }
    Ok(())
}

/// Overwrite-by-name merge of `staging` into `final_dir`
///
/// Files of the previous final folder that were not downloaded again are
/// carried into the staging folder, then the staging folder replaces the
/// final folder by rename. The previous folder is parked under
/// [`RETIRED_PREFIX`] during the swap, so a crash in between leaves it for
/// [`sweep_stale_staging`] to restore.
fn merge_into(staging: &Path, final_dir: &Path) -> io::Result<()> {
    if !final_dir.exists() {
        return fs::rename(staging, final_dir);
    }

    for entry in fs::read_dir(final_dir)? {
        let entry = entry?;
        let target = staging.join(entry.file_name());
        if entry.file_type()?.is_file() && !target.exists() {
            fs::copy(entry.path(), &target)?;
        }
    }

    let retired = retired_path(final_dir);
    if retired.exists() {
        fs::remove_dir_all(&retired)?;
    }
    fs::rename(final_dir, &retired)?;

    if let Err(e) = fs::rename(staging, final_dir) {
        if let Err(restore) = fs::rename(&retired, final_dir) {
            tracing::error!(
                "Failed to restore {} from {}: {}",
                final_dir.display(),
                retired.display(),
                restore
            );
        }
        return Err(e);
    }

    if let Err(e) = fs::remove_dir_all(&retired) {
        tracing::warn!(
            "Failed to remove replaced folder {}: {}",
            retired.display(),
            e
        );
    }
    Ok(())
}

fn retired_path(final_dir: &Path) -> PathBuf {
    let name = final_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    final_dir.with_file_name(format!("{}{}", RETIRED_PREFIX, name))
}
