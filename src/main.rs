use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wardmap::cli::{Cli, Commands};
use wardmap::commands::{render, sample, scores};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Scores(args) => scores::run(&cli, args),
        Commands::Render(args) => render::run(&cli, args),
        Commands::Sample(args) => sample::run(&cli, args),
    }
}
