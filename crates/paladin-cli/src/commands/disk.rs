//! Disk commands
//!
//! Usage: paladin disk compress-vhd PATH

use crate::commands::timed;
use clap::{Args, Subcommand};
use paladin_core::errors::{io_error, Result};
use paladin_core::utils::command::execute as run_command;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

const SCRIPT_PREFIX: &str = "paladin_compress_vhd_";

#[derive(Debug, Args)]
pub struct DiskArgs {
    #[command(subcommand)]
    pub command: DiskCommand,
}

#[derive(Debug, Subcommand)]
pub enum DiskCommand {
    /// Compress a vhd/vhdx disk
    CompressVhd { path: PathBuf },
}

/// diskpart script compacting the virtual disk at `path`
pub fn diskpart_script(path: &Path) -> String {
    format!(
        "select vdisk file=\"{}\"\nattach vdisk readonly\ncompact vdisk\ndetach vdisk\n",
        path.display()
    )
}

/// Write `content` to a uniquely named file in the temp dir
///
/// The file is removed when the returned path is dropped.
///
/// # Errors
///
/// `Io` when the file cannot be created or written.
pub fn write_script(content: &str) -> Result<TempPath> {
    let dir = std::env::temp_dir();
    let mut file = tempfile::Builder::new()
        .prefix(SCRIPT_PREFIX)
        .suffix(".txt")
        .tempfile_in(&dir)
        .map_err(|e| io_error(&dir, e))?;
    if let Err(e) = file.write_all(content.as_bytes()).and_then(|()| file.flush()) {
        return Err(io_error(file.path(), e));
    }
    Ok(file.into_temp_path())
}

/// Write the diskpart script and run it
///
/// # Errors
///
/// `NotFound` when the disk file does not exist, `Command` when diskpart
/// exits with a failure status.
pub fn compress_virtual_disk(path: &Path) -> Result<()> {
    let path = path.canonicalize().map_err(|e| io_error(path, e))?;
    let script = write_script(&diskpart_script(&path))?;

    let output = run_command(&format!("diskpart /s \"{}\"", script.display()), true, None)?;
    tracing::debug!(status = output.status, "diskpart finished");
    Ok(())
}

/// Execute disk command
pub fn execute(args: DiskArgs) -> std::result::Result<(), Box<dyn std::error::Error>> {
    match args.command {
        DiskCommand::CompressVhd { path } => {
            timed("compress_vhd", || compress_virtual_disk(&path))?;
            println!("Compressed {}", path.display());
        }
    }
    Ok(())
}
