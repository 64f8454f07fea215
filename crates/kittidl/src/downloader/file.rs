//! File downloader for bucket archives.

use std::path::Path;
use std::sync::Arc;

use crate::http::HttpClient;
use crate::Result;

use super::archive::ZipExtractor;

/// Downloads archives and unpacks them into the data root.
pub struct FileDownloader {
    http_client: Arc<HttpClient>,
}

impl FileDownloader {
    /// Create a new file downloader
    pub fn new(http_client: Arc<HttpClient>) -> Self {
        Self { http_client }
    }

    /// Download a file to the specified path
    pub async fn download<F>(&self, url: &str, dest: &Path, progress: Option<F>) -> Result<()>
    where
        F: Fn(u64, u64),
    {
        self.http_client.download(url, dest, progress).await?;
        Ok(())
    }

    /// Download an archive into the destination directory, extract it in
    /// place, then delete the archive file.
    ///
    /// The archive is staged at `archive_path` inside `dest_dir` while the
    /// download runs; after a successful extraction it no longer exists.
    pub async fn download_and_extract<F>(
        &self,
        url: &str,
        archive_path: &Path,
        dest_dir: &Path,
        progress: Option<F>,
    ) -> Result<()>
    where
        F: Fn(u64, u64),
    {
        self.download(url, archive_path, progress).await?;

        log::debug!("Extracting {} into {}", archive_path.display(), dest_dir.display());
        ZipExtractor::extract(archive_path, dest_dir)?;

        tokio::fs::remove_file(archive_path).await?;

        Ok(())
    }
}
