use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sweepkit::cli::args::{Cli, Commands, OutputFormat};
use sweepkit::cli::{output, prompt};
use sweepkit::common::config::{ExportConfig, SweepConfig};
use sweepkit::{exporter, sweeper};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    if cli.verbose {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("sweepkit=debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    match cli.command {
        Commands::Sweep { ref path, ref suffix } => cmd_sweep(&cli, path.clone(), suffix),

        Commands::Export => cmd_export(&cli),

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                sweepkit::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                sweepkit::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                sweepkit::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "sweepkit", &mut std::io::stdout());
            Ok(())
        }
    }
}

// ─── Sweep ────────────────────────────────────────────────────────────────────

fn cmd_sweep(cli: &Cli, path: Option<String>, suffix: &str) -> Result<()> {
    let folder = match path {
        Some(p) => p,
        None => {
            let stdin = std::io::stdin();
            prompt::ask_folder(&mut stdin.lock(), &mut std::io::stdout())?
        }
    };
    let config = SweepConfig::new(folder).with_suffix(suffix);

    let live = matches!(cli.format, OutputFormat::Human) && !cli.quiet;
    let report = sweeper::sweep_with(&config.root, &config.suffix, |outcome| {
        if live {
            output::print_sweep_outcome(outcome);
        }
    });

    // Per-file failures are reported, never turned into a failing exit status
    match cli.format {
        OutputFormat::Human if cli.quiet => output::print_sweep_quiet(&report),
        OutputFormat::Human => output::print_sweep_summary(&report),
        OutputFormat::Json => output::print_sweep_json(&report),
        OutputFormat::Quiet => output::print_sweep_quiet(&report),
    }

    Ok(())
}

// ─── Export ───────────────────────────────────────────────────────────────────

fn cmd_export(cli: &Cli) -> Result<()> {
    let config = ExportConfig::default();
    let show_progress = !cli.quiet && matches!(cli.format, OutputFormat::Human);

    let report = exporter::export(&config, show_progress)?;

    match cli.format {
        OutputFormat::Human if cli.quiet => output::print_export_quiet(&report),
        OutputFormat::Human => output::print_export_report(&report, &config.archive_path),
        OutputFormat::Json => output::print_export_json(&report),
        OutputFormat::Quiet => output::print_export_quiet(&report),
    }

    Ok(())
}
