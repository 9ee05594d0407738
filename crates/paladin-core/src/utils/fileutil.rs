//! File helpers

use crate::errors::{io_error, PaladinError, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What `move_files` does when the destination already holds a file of the
/// same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IfExists {
    Overwrite,
    Ignore,
    #[default]
    RaiseError,
}

impl FromStr for IfExists {
    type Err = crate::errors::ExError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "overwrite" => Ok(IfExists::Overwrite),
            "ignore" => Ok(IfExists::Ignore),
            "raise_error" => Ok(IfExists::RaiseError),
            other => Err(PaladinError::InvalidInput {
                reason: format!("unknown if_exists value: {}", other),
            }
            .into()),
        }
    }
}

/// Write `content` to `dir/file`, creating parent directories
///
/// # Errors
///
/// Propagates filesystem failures.
pub fn create_text(dir: impl AsRef<Path>, file: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
    let path = dir.as_ref().join(file);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error(parent, e))?;
    }
    fs::write(&path, content).map_err(|e| io_error(&path, e))?;
    Ok(path)
}

/// Move a file, or the files of a directory, into `dst`
///
/// Directory sources are flattened: with `recursive` the files of every
/// sub-directory land directly in `dst`; without it sub-directories are left
/// untouched. `dst` is created when missing.
///
/// # Errors
///
/// `NotADirectory` when `dst` is a file, `PathNotFound` when `src` is
/// missing, `FileExists` for a clash under [`IfExists::RaiseError`].
pub fn move_files(src: &Path, dst: &Path, recursive: bool, if_exists: IfExists) -> Result<Vec<PathBuf>> {
    if dst.is_file() {
        return Err(PaladinError::NotADirectory {
            path: dst.display().to_string(),
        }
        .into());
    }
    if !src.exists() {
        return Err(PaladinError::PathNotFound {
            path: src.display().to_string(),
        }
        .into());
    }

    let files = if src.is_file() {
        vec![src.to_path_buf()]
    } else {
        let mut files = Vec::new();
        collect_files(src, recursive, &mut files)?;
        files
    };

    fs::create_dir_all(dst).map_err(|e| io_error(dst, e))?;

    let mut moved = Vec::with_capacity(files.len());
    for file in files {
        let Some(name) = file.file_name() else {
            continue;
        };
        let target = dst.join(name);
        if target.exists() {
            match if_exists {
                IfExists::RaiseError => {
                    return Err(PaladinError::FileExists {
                        path: target.display().to_string(),
                    }
                    .into())
                }
                IfExists::Overwrite => {
                    tracing::warn!("removing file: {}", target.display());
                    fs::remove_file(&target).map_err(|e| io_error(&target, e))?;
                }
                IfExists::Ignore => {
                    tracing::warn!("skipping file: {}", file.display());
                    continue;
                }
            }
        }
        tracing::debug!("moving file: {} -> {}", file.display(), dst.display());
        move_one(&file, &target)?;
        moved.push(target);
    }
    Ok(moved)
}

fn collect_files(dir: &Path, recursive: bool, out: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| io_error(dir, e))?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .collect::<Vec<_>>();
    entries.sort();

    for path in entries {
        if path.is_file() {
            out.push(path);
        } else if recursive && path.is_dir() {
            collect_files(&path, recursive, out)?;
        }
    }
    Ok(())
}

/// Rename, falling back to copy + remove across filesystems
fn move_one(from: &Path, to: &Path) -> Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to).map_err(|e| io_error(from, e))?;
    fs::remove_file(from).map_err(|e| io_error(from, e))
}

/// Size of a regular file in bytes
///
/// # Errors
///
/// `PathNotFound` when `path` is missing or not a regular file.
pub fn file_size(path: impl AsRef<Path>) -> Result<u64> {
    let path = path.as_ref();
    match fs::metadata(path) {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        _ => Err(PaladinError::PathNotFound {
            path: path.display().to_string(),
        }
        .into()),
    }
}

/// Human-readable size with decimal units (`"1.5 kB"`, `"12 Bytes"`)
pub fn natural_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["kB", "MB", "GB", "TB", "PB", "EB"];

    if bytes == 1 {
        return "1 Byte".to_string();
    }
    if bytes < 1000 {
        return format!("{} Bytes", bytes);
    }
    let mut value = bytes as f64 / 1000.0;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    format!("{:.1} {}", value, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_natural_size() {
        assert_eq!(natural_size(1), "1 Byte");
        assert_eq!(natural_size(999), "999 Bytes");
        assert_eq!(natural_size(1000), "1.0 kB");
        assert_eq!(natural_size(1_500_000), "1.5 MB");
    }

    #[test]
    fn test_if_exists_from_str() {
        assert_eq!("ignore".parse::<IfExists>().unwrap(), IfExists::Ignore);
        assert_eq!(
            "overwrite".parse::<IfExists>().unwrap(),
            IfExists::Overwrite
        );
        assert!("skip".parse::<IfExists>().is_err());
    }
}
