//! Paladin CLI
//!
//! Command-line front end for the paladin toolkit

use clap::{ArgAction, Parser, Subcommand};
use paladin_core::{context, logging_facility, AppConfig};
use paladin_core::types::TraceId;
use std::path::PathBuf;

mod commands;
mod note;

#[derive(Debug, Parser)]
#[command(name = "paladin")]
#[command(about = "paladin tools", long_about = None)]
struct Cli {
    /// Verbose mode (-v INFO, -vv DEBUG, -vvv TRACE)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Send an HTTP request and print both sides
    Curl(commands::curl::CurlArgs),
    /// Network tools
    Network(commands::network::NetworkArgs),
    /// File tools
    File(commands::file::FileArgs),
    /// Disk tools
    Disk(commands::disk::DiskArgs),
    /// Notes stored through the active-record layer
    Db(commands::db::DbArgs),
}

const VERBOSE_LEVELS: [&str; 3] = ["INFO", "DEBUG", "TRACE"];

fn setup(cli: &Cli) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let mut builder = AppConfig::builder();
    if let Some(path) = &cli.config {
        builder = builder.file(path);
    }
    if cli.verbose > 0 {
        let level = VERBOSE_LEVELS[usize::from(cli.verbose.min(3)) - 1];
        builder = builder.set_override("log.level", level);
    }

    let conf = builder.build()?;
    logging_facility::init_with_config(&conf.log)?;
    context::set_trace(TraceId::new());
    Ok(conf)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let conf = setup(&cli)?;

    match cli.command {
        Commands::Curl(args) => commands::curl::execute(args, &conf),
        Commands::Network(args) => commands::network::execute(args, &conf),
        Commands::File(args) => commands::file::execute(args),
        Commands::Disk(args) => commands::disk::execute(args),
        Commands::Db(args) => commands::db::execute(args, &conf),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
