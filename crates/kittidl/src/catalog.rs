//! The fixed catalog of KITTI raw recordings.
//!
//! The catalog is configuration data, not logic: two literal name lists
//! (calibration archives and drive sessions) expanded into an ordered
//! sequence of [`CatalogEntry`] values. Everything an entry needs at
//! runtime (its download URL, the archive name it is staged under, and
//! the marker path that signals completion) is derived from the name by
//! pure functions so the derivations can be tested without touching the
//! network or the filesystem.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Base URL of the public KITTI raw-data bucket.
pub const BUCKET_BASE: &str = "https://s3.eu-central-1.amazonaws.com/avg-kitti/raw_data";

/// File inside an extracted calibration archive that marks it complete.
pub const CALIB_MARKER_FILE: &str = "calib_cam_to_cam.txt";

/// Sentinel written into an extracted session directory after extraction.
pub const SESSION_MARKER_FILE: &str = ".full_download";

/// One calibration archive per recording date.
const CALIBRATION_ARCHIVES: &[&str] = &[
    "2011_09_26_calib.zip",
    "2011_09_28_calib.zip",
    "2011_09_29_calib.zip",
    "2011_09_30_calib.zip",
    "2011_10_03_calib.zip",
];

/// Synced+rectified drive sessions, grouped by recording date.
const DRIVE_SESSIONS: &[&str] = &[
    "2011_09_26_drive_0001",
    "2011_09_26_drive_0002",
    "2011_09_26_drive_0005",
    "2011_09_26_drive_0009",
    "2011_09_26_drive_0011",
    "2011_09_26_drive_0013",
    "2011_09_26_drive_0014",
    "2011_09_26_drive_0015",
    "2011_09_26_drive_0017",
    "2011_09_26_drive_0018",
    "2011_09_26_drive_0019",
    "2011_09_26_drive_0020",
    "2011_09_26_drive_0022",
    "2011_09_26_drive_0023",
    "2011_09_26_drive_0027",
    "2011_09_26_drive_0028",
    "2011_09_26_drive_0029",
    "2011_09_26_drive_0032",
    "2011_09_26_drive_0035",
    "2011_09_26_drive_0036",
    "2011_09_26_drive_0039",
    "2011_09_26_drive_0046",
    "2011_09_26_drive_0048",
    "2011_09_26_drive_0051",
    "2011_09_28_drive_0001",
    "2011_09_28_drive_0002",
    "2011_09_29_drive_0004",
    "2011_09_29_drive_0026",
    "2011_09_30_drive_0016",
    "2011_09_30_drive_0018",
    "2011_10_03_drive_0027",
    "2011_10_03_drive_0047",
];

/// Which of the two archive families an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Calibration,
    Session,
}

/// One named remote resource with deterministic URL and marker derivations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub kind: EntryKind,
}

impl CatalogEntry {
    /// Recording date the entry belongs to (`2011_09_26`, ...).
    ///
    /// For calibration archives this strips the `_calib.zip` suffix; for
    /// sessions it strips the trailing `_drive_NNNN` segment.
    pub fn date(&self) -> &'static str {
        match self.kind {
            EntryKind::Calibration => self
                .name
                .strip_suffix("_calib.zip")
                .unwrap_or(self.name),
            EntryKind::Session => match self.name.rfind("_drive_") {
                Some(idx) => &self.name[..idx],
                None => self.name,
            },
        }
    }

    /// Name of the archive file as staged in the target root.
    pub fn archive_name(&self) -> String {
        match self.kind {
            EntryKind::Calibration => self.name.to_string(),
            EntryKind::Session => format!("{}_sync.zip", self.name),
        }
    }

    /// Where the archive is staged before extraction.
    pub fn archive_path(&self, root: &Path) -> PathBuf {
        root.join(self.archive_name())
    }

    /// Download URL in the KITTI bucket.
    ///
    /// Calibration archives live at the bucket root; session archives live
    /// under a directory named after the session.
    pub fn remote_url(&self) -> String {
        match self.kind {
            EntryKind::Calibration => format!("{}/{}", BUCKET_BASE, self.name),
            EntryKind::Session => {
                format!("{}/{}/{}", BUCKET_BASE, self.name, self.archive_name())
            }
        }
    }

    /// Path whose existence signals that this entry completed.
    ///
    /// For calibration entries the marker is a file the archive itself
    /// provides; for sessions it is a sentinel written after extraction.
    pub fn marker_path(&self, root: &Path) -> PathBuf {
        match self.kind {
            EntryKind::Calibration => root.join(self.date()).join(CALIB_MARKER_FILE),
            EntryKind::Session => root
                .join(self.date())
                .join(format!("{}_sync", self.name))
                .join(SESSION_MARKER_FILE),
        }
    }

    /// Whether the entry's marker exists under `root` right now.
    pub fn is_complete(&self, root: &Path) -> bool {
        self.marker_path(root).exists()
    }
}

impl std::fmt::Display for CatalogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The full catalog in its fixed order: calibration archives first, then
/// drive sessions.
pub fn catalog() -> Vec<CatalogEntry> {
    let mut entries = Vec::with_capacity(CALIBRATION_ARCHIVES.len() + DRIVE_SESSIONS.len());
    entries.extend(CALIBRATION_ARCHIVES.iter().map(|name| CatalogEntry {
        name,
        kind: EntryKind::Calibration,
    }));
    entries.extend(DRIVE_SESSIONS.iter().map(|name| CatalogEntry {
        name,
        kind: EntryKind::Session,
    }));
    entries
}

/// Completion status of one entry, as shown by `kittidl list`.
#[derive(Debug, Clone, Serialize)]
pub struct EntryStatus {
    pub name: &'static str,
    pub kind: EntryKind,
    pub complete: bool,
    pub marker: PathBuf,
}

/// Status of every catalog entry under `root`, in catalog order.
pub fn statuses(root: &Path) -> Vec<EntryStatus> {
    catalog()
        .into_iter()
        .map(|entry| EntryStatus {
            name: entry.name,
            kind: entry.kind,
            complete: entry.is_complete(root),
            marker: entry.marker_path(root),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calib_entry() -> CatalogEntry {
        CatalogEntry {
            name: "2011_09_26_calib.zip",
            kind: EntryKind::Calibration,
        }
    }

    fn session_entry() -> CatalogEntry {
        CatalogEntry {
            name: "2011_09_26_drive_0001",
            kind: EntryKind::Session,
        }
    }

    #[test]
    fn test_calibration_url() {
        assert_eq!(
            calib_entry().remote_url(),
            "https://s3.eu-central-1.amazonaws.com/avg-kitti/raw_data/2011_09_26_calib.zip"
        );
    }

    #[test]
    fn test_session_url_nests_under_session_directory() {
        assert_eq!(
            session_entry().remote_url(),
            "https://s3.eu-central-1.amazonaws.com/avg-kitti/raw_data/2011_09_26_drive_0001/2011_09_26_drive_0001_sync.zip"
        );
    }

    #[test]
    fn test_archive_names() {
        assert_eq!(calib_entry().archive_name(), "2011_09_26_calib.zip");
        assert_eq!(
            session_entry().archive_name(),
            "2011_09_26_drive_0001_sync.zip"
        );
    }

    #[test]
    fn test_date_derivation() {
        assert_eq!(calib_entry().date(), "2011_09_26");
        assert_eq!(session_entry().date(), "2011_09_26");

        let late = CatalogEntry {
            name: "2011_10_03_drive_0047",
            kind: EntryKind::Session,
        };
        assert_eq!(late.date(), "2011_10_03");
    }

    #[test]
    fn test_calibration_marker_path() {
        let root = Path::new("/data/kitti");
        assert_eq!(
            calib_entry().marker_path(root),
            Path::new("/data/kitti/2011_09_26/calib_cam_to_cam.txt")
        );
    }

    #[test]
    fn test_session_marker_path() {
        let root = Path::new("/data/kitti");
        assert_eq!(
            session_entry().marker_path(root),
            Path::new("/data/kitti/2011_09_26/2011_09_26_drive_0001_sync/.full_download")
        );
    }

    #[test]
    fn test_archive_path_is_in_root() {
        let root = Path::new("/data/kitti");
        assert_eq!(
            session_entry().archive_path(root),
            Path::new("/data/kitti/2011_09_26_drive_0001_sync.zip")
        );
    }

    #[test]
    fn test_is_complete_reflects_marker_existence() {
        let dir = tempfile::TempDir::new().unwrap();
        let entry = session_entry();
        assert!(!entry.is_complete(dir.path()));

        let marker = entry.marker_path(dir.path());
        std::fs::create_dir_all(marker.parent().unwrap()).unwrap();
        std::fs::write(&marker, b"").unwrap();
        assert!(entry.is_complete(dir.path()));
    }

    #[test]
    fn test_statuses_follow_catalog_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let statuses = statuses(dir.path());
        let entries = catalog();

        assert_eq!(statuses.len(), entries.len());
        for (status, entry) in statuses.iter().zip(&entries) {
            assert_eq!(status.name, entry.name);
            assert!(!status.complete);
        }
    }
}
