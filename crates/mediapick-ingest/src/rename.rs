//! Rename planning from filename reviews.
//!
//! Only confident, issue-free reviews are turned into renames. A backup copy
//! is taken before each move and existing targets are never overwritten.
//! Renamed files need a fresh index build to pick up their new tags.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use mediapick_core::{LibraryPaths, MediaKind};
use serde::Serialize;
use tracing::{info, warn};

use crate::extract::review::{review_filename, FilenameReview};
use crate::file::{backup_path, has_sidecar, sidecar_path, ScanOptions};
use crate::library::list_media_files;

/// A reviewed file in the library.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewedFile {
    pub path: PathBuf,
    pub kind: MediaKind,
    #[serde(flatten)]
    pub review: FilenameReview,
}

/// Review every media file in the library.
pub fn review_library(paths: &LibraryPaths, options: &ScanOptions) -> Vec<ReviewedFile> {
    list_media_files(paths, options)
        .into_iter()
        .map(|file| {
            let name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ReviewedFile {
                review: review_filename(&name),
                path: file.path,
                kind: file.kind,
            }
        })
        .collect()
}

/// One planned move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameStep {
    pub from: PathBuf,
    pub to: PathBuf,
    pub kind: MediaKind,
}

/// Plan renames for reviews at or above `min_confidence` with no issues.
pub fn plan_renames(reviews: &[ReviewedFile], min_confidence: u8) -> Vec<RenameStep> {
    reviews
        .iter()
        .filter(|r| r.review.confidence >= min_confidence && r.review.issues.is_empty())
        .filter_map(|r| {
            let to = target_path(&r.path, &r.review.suggested_name);
            (to != r.path).then(|| RenameStep {
                from: r.path.clone(),
                to,
                kind: r.kind,
            })
        })
        .collect()
}

fn target_path(from: &Path, new_stem: &str) -> PathBuf {
    match from.extension().and_then(|e| e.to_str()) {
        Some(ext) => from.with_file_name(format!("{}.{}", new_stem, ext)),
        None => from.with_file_name(new_stem),
    }
}

/// Outcome of applying a rename plan.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenameReport {
    pub renamed: Vec<RenameStep>,
    /// Target asset or target description that already existed.
    pub skipped_existing: Vec<PathBuf>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
    pub dry_run: bool,
}

/// Apply a rename plan. With `dry_run` nothing is touched on disk.
///
/// Every target is checked before anything moves: a step is skipped when its
/// asset, its description, or a path another step already claimed would be
/// overwritten. The description file, if any, follows its asset. A failed
/// move is reported and the remaining steps still run.
pub fn apply_renames(steps: &[RenameStep], backup: bool, dry_run: bool) -> RenameReport {
    let mut report = RenameReport {
        dry_run,
        ..Default::default()
    };

    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut ready: Vec<(&RenameStep, bool)> = Vec::new();
    for step in steps {
        if !step.from.exists() {
            warn!("Source vanished before rename: {}", step.from.display());
            report.missing.push(step.from.clone());
            continue;
        }

        let sidecar = has_sidecar(step.kind, &step.from);
        let mut targets = vec![step.to.clone()];
        if sidecar {
            targets.push(sidecar_path(&step.to));
        }
        if let Some(taken) = targets
            .iter()
            .find(|t| t.exists() || claimed.contains(*t))
        {
            warn!("Target already exists, skipping: {}", taken.display());
            report.skipped_existing.push(taken.clone());
            continue;
        }

        claimed.extend(targets);
        ready.push((step, sidecar));
    }

    for (step, sidecar) in ready {
        if dry_run {
            report.renamed.push(step.clone());
            continue;
        }
        match move_step(step, sidecar, backup) {
            Ok(()) => {
                info!("Renamed {} -> {}", step.from.display(), step.to.display());
                report.renamed.push(step.clone());
            }
            Err(e) => {
                warn!("Rename failed for {}: {}", step.from.display(), e);
                report.failed.push(step.from.clone());
            }
        }
    }

    report
}

fn move_step(step: &RenameStep, sidecar: bool, backup: bool) -> std::io::Result<()> {
    if backup {
        std::fs::copy(&step.from, backup_path(&step.from))?;
    }
    std::fs::rename(&step.from, &step.to)?;

    if sidecar {
        if let Err(e) = std::fs::rename(sidecar_path(&step.from), sidecar_path(&step.to)) {
            // Keep the asset paired with its description
            std::fs::rename(&step.to, &step.from)?;
            return Err(e);
        }
    }
    Ok(())
}
