//! Command line definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use mediapick_core::MediaKind;

#[derive(Parser)]
#[command(name = "mediapick")]
#[command(about = "Pick voice notes, videos and stickers to answer chat messages with")]
#[command(version)]
pub struct Cli {
    /// Library root (contains voices/, video/, stickers/, pastes/)
    #[arg(short, long, global = true, env = "MEDIAPICK_LIBRARY")]
    pub library: Option<PathBuf>,

    /// User id; the library becomes library/<user> when --library is not set
    #[arg(short, long, global = true, env = "MEDIAPICK_USER")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recommend assets for an incoming message
    Recommend {
        /// The incoming message
        message: String,

        /// Earlier messages, oldest first (repeatable)
        #[arg(long = "history")]
        history: Vec<String>,

        /// Maximum number of recommendations
        #[arg(short = 'n', long)]
        max: Option<usize>,

        /// API key for model-assisted ranking (overrides llm-config.json)
        #[arg(long, env = "MEDIAPICK_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Provider the --api-key belongs to
        #[arg(long, default_value = "openai")]
        provider: String,

        /// Heuristic ranking only
        #[arg(long)]
        no_model: bool,

        /// Print the full outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Index the library and list what was found
    Scan {
        /// Print every asset with its tags
        #[arg(short, long)]
        verbose: bool,

        /// Print the assets as JSON
        #[arg(long)]
        json: bool,
    },

    /// Review filenames: detected emotion, theme, type and a suggested name
    Review {
        /// Write a JSON report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Only show files with issues
        #[arg(long)]
        issues_only: bool,
    },

    /// Rename confidently reviewed files to their suggested names
    Rename {
        /// Minimum review confidence (percent)
        #[arg(long, default_value_t = 70)]
        min_confidence: u8,

        /// Perform the renames (default is a dry run)
        #[arg(long)]
        apply: bool,

        /// Do not keep a <stem>_backup copy
        #[arg(long)]
        no_backup: bool,
    },

    /// Sidecar description tooling
    Describe {
        #[command(subcommand)]
        action: DescribeAction,
    },

    /// Description coverage per media kind
    Stats,
}

#[derive(Subcommand)]
pub enum DescribeAction {
    /// Create template descriptions for assets without one
    Templates {
        /// Media kind to describe
        #[arg(long, value_enum, default_value = "voice")]
        kind: KindArg,

        /// Maximum number of files to create
        #[arg(long, default_value_t = 50)]
        limit: usize,

        /// Overwrite existing descriptions
        #[arg(long)]
        force: bool,
    },

    /// Export all parsed descriptions as JSON
    Export {
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    Voice,
    Video,
    Sticker,
}

impl From<KindArg> for MediaKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Voice => MediaKind::Voice,
            KindArg::Video => MediaKind::Video,
            KindArg::Sticker => MediaKind::Sticker,
        }
    }
}

/// Library root from the flags: explicit path, then `library/<user>`, then `library/default`.
pub fn resolve_library_root(library: Option<PathBuf>, user: Option<&str>) -> PathBuf {
    match (library, user) {
        (Some(path), _) => path,
        (None, Some(user)) => mediapick_core::MediaPickConfig::user_library_root("library", user),
        (None, None) => PathBuf::from("library").join("default"),
    }
}
