
mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::{inspect, project, xy};

pub fn run() -> anyhow::Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    match &cli.command {
        Commands::Xy(args) => xy::run(&cli, args),
        Commands::Project(args) => project::run(&cli, args),
        Commands::Inspect(args) => inspect::run(&cli, args),
    }
}

/// `COPRO_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) -> anyhow::Result<()> {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("COPRO_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))
}

fn main() -> anyhow::Result<()> { run() }
