//! Subcommand handlers.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use mediapick_chat::{HttpGenerator, LLMConfig, LLMProvider};
use mediapick_core::{MediaKind, MediaPickConfig};
use mediapick_ingest::describe::{coverage, create_templates, export_descriptions};
use mediapick_ingest::rename::{apply_renames, plan_renames, review_library};
use mediapick_ingest::{AssetIndex, ScanOptions};
use mediapick_runtime::MediaRecommender;
use tracing::{info, warn};

use crate::report::{print_renames, print_review, ReviewReport};

pub struct RecommendArgs {
    pub message: String,
    pub history: Vec<String>,
    pub max: Option<usize>,
    pub api_key: Option<String>,
    pub provider: String,
    pub no_model: bool,
    pub json: bool,
}

/// Provider and key for model-assisted ranking, if any.
///
/// An explicit key wins; otherwise `llm-config.json` and the provider
/// environment variables are consulted.
fn select_model(
    config: &mut MediaPickConfig,
    api_key: Option<String>,
    provider: &str,
) -> anyhow::Result<(LLMProvider, Option<String>)> {
    if let Some(key) = api_key {
        let provider: LLMProvider = provider.parse().map_err(anyhow::Error::msg)?;
        return Ok((provider, Some(key)));
    }

    match LLMConfig::load(&config.library.llm_config_file).resolve_provider() {
        Some(resolved) => {
            info!("Model ranking via {} ({})", resolved.provider, resolved.model);
            config.recommender.model = resolved.model;
            Ok((resolved.provider, Some(resolved.api_key)))
        }
        None => Ok((LLMProvider::OpenAI, None)),
    }
}

pub async fn recommend(mut config: MediaPickConfig, args: RecommendArgs) -> anyhow::Result<()> {
    let (provider, api_key) = if args.no_model {
        (LLMProvider::OpenAI, None)
    } else {
        select_model(&mut config, args.api_key, &args.provider)?
    };
    let max = args.max.unwrap_or(config.recommender.default_max_results);

    let recommender = MediaRecommender::open(&config, Arc::new(HttpGenerator::new(provider)));
    let outcome = recommender
        .recommend_detailed(&args.message, &args.history, max, api_key.as_deref())
        .await;

    if let Some(reason) = &outcome.degraded {
        warn!("Model ranking degraded: {}", reason);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    if outcome.recommendations.is_empty() {
        println!("No suitable media.");
        return Ok(());
    }
    for (i, rec) in outcome.recommendations.iter().enumerate() {
        println!(
            "{}. {} ({}) {:.2} - {}",
            i + 1,
            rec.metadata.filename,
            rec.kind,
            rec.relevance,
            rec.reason
        );
    }
    println!();
    println!("Strategy: {} ({} shortlisted)", outcome.strategy, outcome.shortlisted);
    Ok(())
}

pub fn scan(config: &MediaPickConfig, verbose: bool, json: bool) -> anyhow::Result<()> {
    let index = AssetIndex::build(&config.library);

    if json {
        println!("{}", serde_json::to_string_pretty(index.assets())?);
        return Ok(());
    }

    if verbose {
        for asset in index.assets() {
            println!("{} ({})", asset.filename, asset.kind);
            println!("  keywords: {}", asset.keywords.join(", "));
            println!("  themes:   {}", asset.theme_list());
            println!("  content:  {}", asset.content_type_list());
        }
        println!();
    }

    println!("Library:            {}", index.root().display());
    for (kind, count) in index.count_by_kind() {
        println!("{:<20}{}", format!("{}:", kind), count);
    }
    println!("Total:              {}", index.len());
    println!("Fingerprint:        {}", index.fingerprint());
    Ok(())
}

pub fn review(
    config: &MediaPickConfig,
    report: Option<&Path>,
    issues_only: bool,
) -> anyhow::Result<()> {
    let files = review_library(&config.library, &ScanOptions::default());
    print_review(&files, issues_only);

    if let Some(path) = report {
        ReviewReport::new(&config.library.root, files)
            .write(path)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Report:             {}", path.display());
    }
    Ok(())
}

pub fn rename(
    config: &MediaPickConfig,
    min_confidence: u8,
    apply: bool,
    backup: bool,
) -> anyhow::Result<()> {
    let files = review_library(&config.library, &ScanOptions::default());
    let steps = plan_renames(&files, min_confidence);
    if steps.is_empty() {
        println!("No files with confidence >= {}% and no issues.", min_confidence);
        return Ok(());
    }

    let report = apply_renames(&steps, backup, !apply);
    print_renames(&report);
    Ok(())
}

pub fn describe_templates(
    config: &MediaPickConfig,
    kind: MediaKind,
    limit: usize,
    force: bool,
) -> anyhow::Result<()> {
    let index = AssetIndex::build(&config.library);
    let report = create_templates(&index, kind, limit, force)?;
    for path in &report.created {
        println!("created {}", path.display());
    }
    println!();
    println!("Created:            {}", report.created.len());
    println!("Already described:  {}", report.skipped_existing);
    Ok(())
}

pub fn describe_export(config: &MediaPickConfig, output: Option<&Path>) -> anyhow::Result<()> {
    let index = AssetIndex::build(&config.library);
    let records = export_descriptions(&index);
    let json = serde_json::to_string_pretty(&records)?;

    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            println!("Exported {} descriptions to {}", records.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn stats(config: &MediaPickConfig) -> anyhow::Result<()> {
    let index = AssetIndex::build(&config.library);
    println!("=== Description coverage ===");
    println!();
    for (kind, stats) in coverage(&index) {
        let percent = if stats.total == 0 {
            0.0
        } else {
            stats.described as f64 * 100.0 / stats.total as f64
        };
        println!(
            "{:<12} {:>4} files, {:>4} described ({:.0}%), {:>4} placeholders",
            kind.to_string(),
            stats.total,
            stats.described,
            percent,
            stats.placeholders
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> (MediaPickConfig, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let config = MediaPickConfig::from_env(dir.path()).unwrap();
        std::fs::create_dir_all(&config.library.voices).unwrap();
        (config, dir)
    }

    #[test]
    fn test_explicit_key_selects_provider() {
        let (mut config, _dir) = library();
        let (provider, key) = select_model(&mut config, Some("gsk".into()), "groq").unwrap();
        assert_eq!(provider, LLMProvider::Groq);
        assert_eq!(key.as_deref(), Some("gsk"));
        assert!(select_model(&mut config, Some("k".into()), "nope").is_err());
    }

    #[test]
    fn test_llm_config_file_sets_model() {
        let (mut config, _dir) = library();
        std::fs::write(
            &config.library.llm_config_file,
            r#"{"preferred_provider": "groq", "groq_api_key": "gsk-file", "groq_model": "llama-3.1-8b-instant"}"#,
        )
        .unwrap();

        let (provider, key) = select_model(&mut config, None, "openai").unwrap();
        assert_eq!(provider, LLMProvider::Groq);
        assert_eq!(key.as_deref(), Some("gsk-file"));
        assert_eq!(config.recommender.model, "llama-3.1-8b-instant");
    }

    #[test]
    fn test_rename_dry_run_leaves_files() {
        let (config, _dir) = library();
        let original = config.library.voices.join("спасибо_большое.ogg");
        std::fs::write(&original, b"x").unwrap();

        rename(&config, 0, false, true).unwrap();
        assert!(original.exists());
    }
}
