use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use grpadj::manager::Manager;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    #[arg(long)]
    work_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Draw a synthetic batch into the work directory.
    Generate,

    /// Adjust every batch in the work directory.
    Adjust,

    /// Summarize the adjusted batches.
    Report,

    /// Remove adjusted batches and the report.
    Clean,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let mgr = Manager::new(args.work_dir).context("failed to construct mgr")?;

    match args.command {
        Command::Generate => mgr.generate_batch()?,
        Command::Adjust => mgr.adjust_batches()?,
        Command::Report => mgr.report_batches()?,
        Command::Clean => mgr.clean()?,
    }

    Ok(())
}
