use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "codefence")]
#[command(
    about = "Tag bare fenced code blocks in issue and pull request descriptions",
    long_about = None
)]
pub(crate) struct Cli {
    /// JSONC file with defaults; inputs and flags override it.
    #[arg(long, global = true, env = "CODEFENCE_CONFIG")]
    pub(crate) config: Option<PathBuf>,
    #[arg(long = "log-level", global = true)]
    pub(crate) log_level: Option<String>,
    /// Also write logs to a timestamped file in this directory
    /// (the user data directory when no path is given).
    #[arg(long = "log-dir", global = true, num_args = 0..=1)]
    pub(crate) log_dir: Option<Option<PathBuf>>,
    #[command(subcommand)]
    pub(crate) command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    #[command(about = "Run as a GitHub Action against the triggering issue or pull request")]
    Run {
        /// Event payload file or inline JSON, instead of GITHUB_EVENT_PATH.
        #[arg(long)]
        event: Option<String>,
        #[arg(short = 'l', long)]
        language: Option<String>,
        #[arg(long, default_value_t = false)]
        silent: bool,
        #[arg(long = "what-to-update", value_name = "KIND")]
        what_to_update: Vec<String>,
        #[arg(long)]
        token: Option<String>,
        #[arg(long = "api-url")]
        api_url: Option<String>,
    },
    #[command(about = "Report code blocks without a language in a markdown file")]
    Check {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(long, default_value = "text")]
        format: CheckFormat,
    },
    #[command(about = "Add a default language to bare code blocks in a markdown file")]
    Fix {
        #[arg(value_name = "FILE")]
        file: PathBuf,
        #[arg(short = 'l', long)]
        language: Option<String>,
        /// Rewrite the file in place instead of printing the result.
        #[arg(short = 'w', long, default_value_t = false)]
        write: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum CheckFormat {
    Text,
    Json,
}
