use clap::{Parser, Subcommand, ValueEnum};

use crate::common::config::DEFAULT_SWEEP_SUFFIX;

/// SweepKit — sweep files by suffix and bundle project folders into a zip
#[derive(Parser, Debug)]
#[command(
    name = "sweepkit",
    version,
    about = "Sweep files by suffix and bundle project folders into a zip",
    long_about = "SweepKit deletes files matching a name suffix from a directory tree,\n\
                   and packages a fixed set of game folders and files into export.zip.",
    after_help = "EXAMPLES:\n  \
        sweepkit sweep ./assets                Delete every .bmp under ./assets\n  \
        sweepkit sweep ./build --suffix .obj   Delete every .obj under ./build\n  \
        sweepkit sweep                         Prompt for the folder to sweep\n  \
        sweepkit export                        Bundle the project into export.zip\n  \
        sweepkit export --format json          Export and print a JSON report"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output (debug logging on stderr)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode — minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recursively delete files whose name ends with a suffix
    Sweep {
        /// Folder to sweep (prompted for when omitted)
        path: Option<String>,

        /// Case-sensitive file name suffix to delete (must not be empty)
        #[arg(
            long,
            short,
            default_value = DEFAULT_SWEEP_SUFFIX,
            value_parser = clap::builder::NonEmptyStringValueParser::new()
        )]
        suffix: String,
    },

    /// Bundle the project folders and files into export.zip
    Export,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
