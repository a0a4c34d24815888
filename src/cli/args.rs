// src/cli/args.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)] // Read from `Cargo.toml`
#[command(arg_required_else_help = true, disable_help_subcommand = true)]
pub struct Args {
    /// Path to TOML config file (optional)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Override the data host base URL
    #[arg(long, value_name = "URL", global = true)]
    pub base_url: Option<String>,

    /// Override the directory holding saved progress
    #[arg(long, value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List available languages by region
    Languages,

    /// Show every card of a language's deck
    Deck {
        /// Language code, e.g. es or haw
        #[arg(value_name = "CODE")]
        code: String,

        /// Output the deck as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the current card, optionally moving forward first
    Study {
        #[arg(value_name = "CODE")]
        code: String,

        /// Number of cards to advance
        #[arg(short, long, default_value_t = 0)]
        advance: usize,

        /// Start over from the first card
        #[arg(long)]
        reset: bool,
    },

    /// Inspect or clear saved progress
    Progress {
        #[command(subcommand)]
        action: ProgressAction,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProgressAction {
    /// List saved progress for all languages
    List,
    /// Forget progress for one language
    Reset {
        #[arg(value_name = "CODE")]
        code: String,
    },
    /// Forget all saved progress
    Clear,
}
