//! Network commands

use crate::commands::timed;
use clap::{Args, Subcommand};
use paladin_core::AppConfig;
use paladin_http::ipinfo;

#[derive(Debug, Args)]
pub struct NetworkArgs {
    #[command(subcommand)]
    pub command: NetworkCommand,
}

#[derive(Debug, Subcommand)]
pub enum NetworkCommand {
    /// Print the public IP address of this host
    Ip,
}

/// Execute network command
pub fn execute(args: NetworkArgs, conf: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        NetworkCommand::Ip => {
            let ip = timed("public_ip", || ipinfo::public_ip(&conf.httpclient))?;
            println!("public ip: {}", ip);
        }
    }
    Ok(())
}
