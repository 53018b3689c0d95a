use anyhow::{bail, Context};
use clap::{ArgAction, CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::path::PathBuf;
use tracing::{debug, trace, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use uap_conformance::commands;
use uap_conformance::configuration::HarnessConfig;

/// Check user-agent parser conformance fixtures.
#[derive(Parser)]
#[clap(author, version = clap::crate_version!(), max_term_width = 100, about)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,

    /// Path to a config file (TOML, YAML or JSON)
    #[clap(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the fixture files
    #[clap(long, global = true)]
    fixtures_dir: Option<PathBuf>,

    /// Increase logging level
    #[clap(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Lists the configured fixture suites
    List,
    /// Loads suites and builds their test cases without running them
    Check {
        /// Suites to check; all configured suites when omitted
        suites: Vec<String>,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "uap-conformance", &mut std::io::stdout());
        return Ok(());
    }

    let log_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    debug!("Argument parsing complete.");
    let mut config = HarnessConfig::load(cli.config.as_deref())?;
    if let Some(dir) = cli.fixtures_dir {
        config.fixtures_dir = dir;
    }
    trace!("{:?}", config);

    match &cli.command {
        Commands::List => commands::list_command(&config)?,
        Commands::Check { suites } => {
            let summary = commands::check_command(&config, suites)?;
            if !summary.is_ok() {
                bail!(
                    "{} of {} suites failed: {}",
                    summary.failed.len(),
                    summary.checked,
                    summary.failed.join(", ")
                );
            }
        }
        Commands::Completions { .. } => {
            unreachable!("Completions should be handled before this point");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    match run().await {
        Ok(()) => {}
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}
