//! File commands
//!
//! Usage: paladin file move SOURCES... DEST

use crate::commands::timed;
use clap::{Args, Subcommand};
use paladin_core::utils::fileutil::{move_files, IfExists};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct FileArgs {
    #[command(subcommand)]
    pub command: FileCommand,
}

#[derive(Debug, Subcommand)]
pub enum FileCommand {
    /// Move files
    ///
    /// e.g.
    ///     move dir/path/1 /target/path
    ///     move dir/path/1 dir/path/2 /target/path
    Move(MoveArgs),
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    /// At least one source file or directory
    #[arg(required = true, num_args = 1..)]
    pub sources: Vec<PathBuf>,

    /// Destination directory
    pub dest: PathBuf,
}

/// Execute file command
pub fn execute(args: FileArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.command {
        FileCommand::Move(move_args) => execute_move(move_args),
    }
}

fn execute_move(args: MoveArgs) -> Result<(), Box<dyn std::error::Error>> {
    for src in &args.sources {
        let moved = timed("file_move", || {
            move_files(src, &args.dest, true, IfExists::Ignore)
        })?;
        println!("{}: moved {} file(s)", src.display(), moved.len());
    }
    Ok(())
}
