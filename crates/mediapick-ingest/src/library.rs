//! Library scanning and the in-memory asset index.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use mediapick_core::{Asset, LibraryPaths, MediaKind};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::extract::extract_from_filename;
use crate::file::{has_sidecar, ScanOptions};

/// A media file found on disk, before metadata extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub kind: MediaKind,
}

/// List media files in every kind folder, sorted by path.
pub fn list_media_files(paths: &LibraryPaths, options: &ScanOptions) -> Vec<MediaFile> {
    let mut files = Vec::new();

    for kind in MediaKind::ALL {
        let folder = paths.folder_for(kind);
        if !folder.is_dir() {
            debug!("No {} folder at {}", kind, folder.display());
            continue;
        }

        for entry in WalkDir::new(folder).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", folder.display(), e);
                    continue;
                }
            };
            if entry.file_type().is_file() && options.accepts(kind, entry.path()) {
                files.push(MediaFile {
                    path: entry.into_path(),
                    kind,
                });
            }
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// Build one asset's metadata. Fails only if the file cannot be stat'ed.
pub fn analyze_file(file: &MediaFile) -> std::io::Result<Asset> {
    let size = std::fs::metadata(&file.path)?.len();
    let filename = file
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extracted = extract_from_filename(&filename);

    Ok(Asset {
        path: file.path.clone(),
        filename,
        kind: file.kind,
        size,
        keywords: extracted.keywords,
        themes: extracted.themes,
        content_types: extracted.content_types,
        has_description: has_sidecar(file.kind, &file.path),
    })
}

/// Path-ordered, read-only collection of asset metadata for one library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetIndex {
    root: PathBuf,
    assets: Vec<Asset>,
}

impl AssetIndex {
    /// Scan the library with default options.
    pub fn build(paths: &LibraryPaths) -> Self {
        Self::build_with(paths, &ScanOptions::default())
    }

    /// Scan the library. Files whose stats cannot be read are logged and skipped.
    pub fn build_with(paths: &LibraryPaths, options: &ScanOptions) -> Self {
        let start = std::time::Instant::now();
        let mut assets = Vec::new();

        for file in list_media_files(paths, options) {
            match analyze_file(&file) {
                Ok(asset) => assets.push(asset),
                Err(e) => warn!("Could not analyze {}: {}", file.path.display(), e),
            }
        }

        info!(
            "Indexed {} media assets in {} ({}ms)",
            assets.len(),
            paths.root.display(),
            start.elapsed().as_millis()
        );

        Self::from_assets(&paths.root, assets)
    }

    /// Build an index from already-derived assets (sorted by path).
    pub fn from_assets(root: impl AsRef<Path>, mut assets: Vec<Asset>) -> Self {
        assets.sort_by(|a, b| a.path.cmp(&b.path));
        Self {
            root: root.as_ref().to_path_buf(),
            assets,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All assets, ordered by path.
    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&Asset> {
        self.assets
            .binary_search_by(|a| a.path.as_path().cmp(path))
            .ok()
            .map(|i| &self.assets[i])
    }

    /// Asset count per media kind.
    pub fn count_by_kind(&self) -> BTreeMap<MediaKind, usize> {
        let mut counts = BTreeMap::new();
        for asset in &self.assets {
            *counts.entry(asset.kind).or_insert(0) += 1;
        }
        counts
    }

    /// SHA-256 over the serialized metadata; equal for equal library states.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for asset in &self.assets {
            if let Ok(bytes) = serde_json::to_vec(asset) {
                hasher.update(&bytes);
            }
        }
        hex::encode(hasher.finalize())
    }
}
