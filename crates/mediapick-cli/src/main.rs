//! mediapick — pick media to answer chat messages with, and keep the library tidy.

use clap::Parser;
use mediapick_core::MediaPickConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod report;

use cli::{resolve_library_root, Cli, Commands, DescribeAction};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let root = resolve_library_root(cli.library, cli.user.as_deref());
    info!("Library: {}", root.display());
    let config = MediaPickConfig::from_env(&root)?;

    match cli.command {
        Commands::Recommend {
            message,
            history,
            max,
            api_key,
            provider,
            no_model,
            json,
        } => {
            commands::recommend(
                config,
                commands::RecommendArgs {
                    message,
                    history,
                    max,
                    api_key,
                    provider,
                    no_model,
                    json,
                },
            )
            .await
        }
        Commands::Scan { verbose, json } => commands::scan(&config, verbose, json),
        Commands::Review {
            report,
            issues_only,
        } => commands::review(&config, report.as_deref(), issues_only),
        Commands::Rename {
            min_confidence,
            apply,
            no_backup,
        } => commands::rename(&config, min_confidence, apply, !no_backup),
        Commands::Describe { action } => match action {
            DescribeAction::Templates { kind, limit, force } => {
                commands::describe_templates(&config, kind.into(), limit, force)
            }
            DescribeAction::Export { output } => commands::describe_export(&config, output.as_deref()),
        },
        Commands::Stats => commands::stats(&config),
    }
}
