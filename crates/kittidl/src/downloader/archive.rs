//! Zip extraction into the data root.
//!
//! KITTI archives carry their own `<date>/...` top-level directory, so
//! entries are extracted verbatim with no prefix stripping. Existing files
//! are overwritten; a partially extracted tree is recovered by re-running
//! the fetch, which re-downloads the unmarked entry.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::{FetchError, Result};

/// Zip archive extractor
pub struct ZipExtractor;

impl ZipExtractor {
    /// Extract an archive into the destination directory, overwriting
    /// existing files.
    pub fn extract(archive_path: &Path, dest_dir: &Path) -> Result<()> {
        let file = File::open(archive_path)?;
        let reader = BufReader::new(file);
        let mut archive = zip::ZipArchive::new(reader)
            .map_err(|e| Self::error(archive_path, format!("Failed to open zip: {}", e)))?;

        std::fs::create_dir_all(dest_dir)?;

        // Canonicalize dest_dir for path traversal check
        let dest_dir_canonical = dest_dir.canonicalize().map_err(|e| {
            Self::error(archive_path, format!("Failed to canonicalize destination: {}", e))
        })?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .map_err(|e| Self::error(archive_path, format!("Failed to read zip entry: {}", e)))?;

            let name = entry.name().to_string();
            if name.is_empty() {
                continue;
            }

            // Validate path doesn't contain traversal sequences
            if name.split('/').any(|component| component == "..") {
                return Err(Self::error(
                    archive_path,
                    format!("Path traversal detected in archive: {}", name),
                ));
            }

            let outpath = dest_dir.join(&name);

            if entry.is_dir() {
                std::fs::create_dir_all(&outpath)?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                std::fs::create_dir_all(parent)?;
            }

            // After creating directories, verify the path stays inside the
            // destination
            let outpath_canonical = outpath.canonicalize().unwrap_or_else(|_| {
                // For new files, canonicalize the parent and append filename
                if let Some(parent) = outpath.parent() {
                    if let Ok(parent_canonical) = parent.canonicalize() {
                        if let Some(filename) = outpath.file_name() {
                            return parent_canonical.join(filename);
                        }
                    }
                }
                outpath.clone()
            });

            if !outpath_canonical.starts_with(&dest_dir_canonical) {
                return Err(Self::error(
                    archive_path,
                    format!("Path traversal detected: {} escapes destination directory", name),
                ));
            }

            let mut outfile = File::create(&outpath)?;
            std::io::copy(&mut entry, &mut outfile)?;

            // Set permissions on Unix
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode))?;
                }
            }
        }

        Ok(())
    }

    fn error(archive_path: &Path, reason: String) -> FetchError {
        FetchError::Extraction {
            archive: archive_path.display().to_string(),
            reason,
        }
    }
}
