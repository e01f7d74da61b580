//! Per-file helpers: extension checks, sidecar lookup, backup detection.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mediapick_core::MediaKind;

/// Suffix appended to a file stem when a backup copy is made before renaming.
pub const BACKUP_SUFFIX: &str = "_backup";

/// Which extensions are accepted for each media kind.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub extensions: BTreeMap<MediaKind, Vec<String>>,
    /// Skip `<stem>_backup.<ext>` copies left behind by renames.
    pub skip_backups: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        let extensions = MediaKind::ALL
            .iter()
            .map(|kind| {
                let exts = kind
                    .default_extensions()
                    .iter()
                    .map(|e| e.to_string())
                    .collect();
                (*kind, exts)
            })
            .collect();
        Self {
            extensions,
            skip_backups: true,
        }
    }
}

impl ScanOptions {
    /// Whether `path` is an asset of `kind` under these options.
    pub fn accepts(&self, kind: MediaKind, path: &Path) -> bool {
        let ext = match extension_lower(path) {
            Some(ext) => ext,
            None => return false,
        };
        let allowed = self
            .extensions
            .get(&kind)
            .map(|exts| exts.iter().any(|e| e.eq_ignore_ascii_case(&ext)))
            .unwrap_or(false);
        allowed && !(self.skip_backups && is_backup(path))
    }
}

fn extension_lower(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Path of the `<stem>.txt` description that belongs to an asset.
pub fn sidecar_path(path: &Path) -> PathBuf {
    path.with_extension("txt")
}

/// Whether an asset has a description file next to it.
pub fn has_sidecar(kind: MediaKind, path: &Path) -> bool {
    kind.supports_sidecar() && sidecar_path(path).is_file()
}

/// Whether a file is a backup copy made before a rename.
pub fn is_backup(path: &Path) -> bool {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.ends_with(BACKUP_SUFFIX))
        .unwrap_or(false)
}

/// Backup path for a file: `<stem>_backup.<ext>` in the same folder.
pub fn backup_path(path: &Path) -> PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("file");
    let name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{}{}.{}", stem, BACKUP_SUFFIX, ext),
        None => format!("{}{}", stem, BACKUP_SUFFIX),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_by_kind() {
        let opts = ScanOptions::default();
        assert!(opts.accepts(MediaKind::Voice, Path::new("/l/voices/a.OGG")));
        assert!(!opts.accepts(MediaKind::Voice, Path::new("/l/voices/a.txt")));
        assert!(opts.accepts(MediaKind::PastedText, Path::new("/l/pastes/a.txt")));
        assert!(!opts.accepts(MediaKind::Video, Path::new("/l/video/noext")));
    }

    #[test]
    fn test_backups_are_skipped() {
        let opts = ScanOptions::default();
        let path = Path::new("/l/voices/hello_backup.ogg");
        assert!(is_backup(path));
        assert!(!opts.accepts(MediaKind::Voice, path));
    }

    #[test]
    fn test_backup_and_sidecar_paths() {
        let path = Path::new("/l/voices/hello.ogg");
        assert_eq!(backup_path(path), Path::new("/l/voices/hello_backup.ogg"));
        assert_eq!(sidecar_path(path), Path::new("/l/voices/hello.txt"));
    }
}
