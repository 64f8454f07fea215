//! The fetch-and-unpack loop.
//!
//! Walks the catalog in its fixed order, skips entries whose marker
//! already exists, downloads and unpacks the rest, and stops once the
//! configured number of entries has been processed. Skipped and
//! downloaded entries both count toward the cap. The first download or
//! extraction failure aborts the run; a re-run resumes from the first
//! incomplete entry thanks to the markers.

use std::path::Path;
use std::sync::Arc;

use crate::catalog::{catalog, CatalogEntry, EntryKind};
use crate::cli::{Output, ProgressManager, Verbosity};
use crate::downloader::FileDownloader;
use crate::http::HttpClient;
use crate::{FetchError, Result};

/// Default number of entries processed per run.
pub const DEFAULT_LIMIT: usize = 37;

/// Configuration for one fetch run.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Stop after this many entries (skipped or downloaded).
    pub limit: usize,
    /// Report decisions without downloading or writing anything.
    pub dry_run: bool,
    /// Show per-download progress bars.
    pub progress: bool,
    /// Status-line verbosity.
    pub verbosity: Verbosity,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            dry_run: false,
            progress: true,
            verbosity: Verbosity::Normal,
        }
    }
}

/// What a run did, for the final status line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Entries counted toward the cap (skipped + downloaded).
    pub processed: usize,
    /// Entries newly downloaded and extracted (or, in a dry run, the
    /// entries that would have been).
    pub downloaded: usize,
    /// Entries whose marker already existed.
    pub skipped: usize,
}

/// Drives the catalog through the download/extract/mark pipeline.
pub struct Fetcher {
    downloader: FileDownloader,
    output: Output,
    progress: ProgressManager,
    config: FetcherConfig,
}

impl Fetcher {
    pub fn new(http_client: Arc<HttpClient>, config: FetcherConfig) -> Self {
        let mut output = Output::new();
        output.set_verbosity(config.verbosity);
        let progress = ProgressManager::new(config.progress && config.verbosity > Verbosity::Quiet);

        Self {
            downloader: FileDownloader::new(http_client),
            output,
            progress,
            config,
        }
    }

    /// Process up to `limit` catalog entries under `root`.
    pub async fn run(&self, root: &Path) -> Result<RunSummary> {
        std::fs::create_dir_all(root)?;
        self.output
            .info(&format!("Fetching into {}", root.display()));

        let mut summary = RunSummary::default();

        for entry in catalog() {
            if summary.processed == self.config.limit {
                break;
            }

            let marker = entry.marker_path(root);
            self.output
                .verbose(&format!("Checking {}", marker.display()));

            if marker.exists() {
                summary.processed += 1;
                summary.skipped += 1;
                self.output.writeln(&format!(
                    "[{:>2}/{}] {}: already complete ({})",
                    summary.processed,
                    self.config.limit,
                    entry,
                    marker.display()
                ));
                continue;
            }

            if self.config.dry_run {
                summary.processed += 1;
                summary.downloaded += 1;
                self.output.writeln(&format!(
                    "[{:>2}/{}] {}: would download {}",
                    summary.processed,
                    self.config.limit,
                    entry,
                    entry.remote_url()
                ));
                continue;
            }

            self.output.writeln(&format!(
                "[{:>2}/{}] {}: downloading",
                summary.processed + 1,
                self.config.limit,
                entry
            ));
            self.process_entry(&entry, root).await?;
            summary.processed += 1;
            summary.downloaded += 1;
        }

        Ok(summary)
    }

    /// Download, extract, and mark one incomplete entry.
    async fn process_entry(&self, entry: &CatalogEntry, root: &Path) -> Result<()> {
        let url = entry.remote_url();
        let archive_path = entry.archive_path(root);
        log::info!("Downloading {} from {}", entry, url);

        let bar = self.progress.create_download_bar(entry.name);
        let callback_bar = bar.clone();
        let progress = Some(move |downloaded: u64, total: u64| {
            if total > 0 {
                callback_bar.set_length(total);
            }
            callback_bar.set_position(downloaded);
        });

        let result = self
            .downloader
            .download_and_extract(&url, &archive_path, root, progress)
            .await;
        bar.finish_and_clear();
        result?;

        match entry.kind {
            EntryKind::Session => {
                // Sentinel written only after download+extraction succeeded
                let marker = entry.marker_path(root);
                if let Some(parent) = marker.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&marker, b"")?;
            }
            EntryKind::Calibration => {
                // The marker must come out of the archive itself
                let marker = entry.marker_path(root);
                if !marker.exists() {
                    return Err(FetchError::Extraction {
                        archive: archive_path.display().to_string(),
                        reason: format!("archive did not provide {}", marker.display()),
                    });
                }
            }
        }

        log::debug!("Completed {}", entry);
        Ok(())
    }
}
