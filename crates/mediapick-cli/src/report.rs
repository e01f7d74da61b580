//! Filename review report and console printing.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use mediapick_ingest::rename::{RenameReport, ReviewedFile};
use serde::Serialize;
use tracing::info;

/// JSON report of a library review.
#[derive(Debug, Serialize)]
pub struct ReviewReport {
    pub generated_at: DateTime<Utc>,
    pub library: PathBuf,
    pub total_files: usize,
    pub files_with_issues: usize,
    pub files: Vec<ReviewedFile>,
}

impl ReviewReport {
    pub fn new(library: &Path, files: Vec<ReviewedFile>) -> Self {
        Self {
            generated_at: Utc::now(),
            library: library.to_path_buf(),
            total_files: files.len(),
            files_with_issues: files.iter().filter(|f| !f.review.issues.is_empty()).count(),
            files,
        }
    }

    pub fn write(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!("Wrote review report to {}", path.display());
        Ok(())
    }
}

pub fn print_review(files: &[ReviewedFile], issues_only: bool) {
    for file in files {
        let review = &file.review;
        if issues_only && review.issues.is_empty() {
            continue;
        }
        println!("{} ({})", review.original_name, file.kind);
        println!(
            "  emotion: {}  theme: {}  type: {}  confidence: {}%",
            review.detected_emotion, review.detected_theme, review.detected_type, review.confidence
        );
        println!("  suggested: {}", review.suggested_name);
        for issue in &review.issues {
            println!("  - {}", issue);
        }
    }

    let with_issues = files.iter().filter(|f| !f.review.issues.is_empty()).count();
    println!();
    println!("Files reviewed:     {}", files.len());
    println!("With issues:        {}", with_issues);
}

pub fn print_renames(report: &RenameReport) {
    let verb = if report.dry_run { "would rename" } else { "renamed" };
    for step in &report.renamed {
        println!("{} {} -> {}", verb, display_name(&step.from), display_name(&step.to));
    }
    for path in &report.skipped_existing {
        println!("skipped (target exists) {}", display_name(path));
    }
    for path in &report.missing {
        println!("skipped (missing) {}", display_name(path));
    }
    for path in &report.failed {
        println!("failed {}", display_name(path));
    }

    println!();
    println!("Renames:            {}", report.renamed.len());
    println!("Target exists:      {}", report.skipped_existing.len());
    println!("Missing:            {}", report.missing.len());
    println!("Failed:             {}", report.failed.len());
    if report.dry_run && !report.renamed.is_empty() {
        println!();
        println!("Dry run. Pass --apply to rename.");
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediapick_core::MediaKind;
    use mediapick_ingest::extract::review::review_filename;

    fn reviewed(name: &str) -> ReviewedFile {
        ReviewedFile {
            path: PathBuf::from("/lib/voices").join(name),
            kind: MediaKind::Voice,
            review: review_filename(name),
        }
    }

    #[test]
    fn test_report_counts_and_writes() {
        let files = vec![reviewed("привет_как_дела.ogg"), reviewed("xyz.ogg")];
        let report = ReviewReport::new(Path::new("/lib"), files);
        assert_eq!(report.total_files, 2);
        assert!(report.files_with_issues >= 1);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("review.json");
        report.write(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_files"], 2);
        assert!(value["generated_at"].is_string());
        assert_eq!(value["files"][1]["original_name"], "xyz.ogg");
    }
}
