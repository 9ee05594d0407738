//! Shell command execution

use crate::errors::{io_error, PaladinError, Result};
use std::process::Command;

/// Outcome of a finished command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status: i32,
    /// stdout followed by stderr, trailing newline removed
    pub output: String,
}

/// Run `cmd` through the platform shell and capture its output
///
/// `success_codes` defaults to `[0]`. A process killed by a signal reports
/// status `-1`.
///
/// # Errors
///
/// Fails when the shell cannot be spawned, or with a `Command` error when
/// `check` is set and the status is not a success code.
pub fn execute(cmd: &str, check: bool, success_codes: Option<&[i32]>) -> Result<CommandOutput> {
    tracing::debug!("RUN: {}", cmd);

    let output = shell(cmd).output().map_err(|e| io_error(cmd, e))?;
    let status = output.status.code().unwrap_or(-1);

    let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
    text.push_str(&String::from_utf8_lossy(&output.stderr));
    let text = text.trim_end_matches(['\r', '\n']).to_string();

    if check && !success_codes.unwrap_or(&[0]).contains(&status) {
        return Err(PaladinError::CommandFailed {
            cmd: cmd.to_string(),
            status,
            output: text,
        }
        .into());
    }

    Ok(CommandOutput {
        status,
        output: text,
    })
}

#[cfg(windows)]
fn shell(cmd: &str) -> Command {
    let mut command = Command::new("cmd");
    command.args(["/C", cmd]);
    command
}

#[cfg(not(windows))]
fn shell(cmd: &str) -> Command {
    let mut command = Command::new("sh");
    command.args(["-c", cmd]);
    command
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::errors::ExErrorKind;

    #[test]
    fn test_execute_captures_output() {
        let result = execute("echo hello", true, None).unwrap();
        assert_eq!(result.status, 0);
        assert_eq!(result.output, "hello");
    }

    #[test]
    fn test_execute_checks_status() {
        let err = execute("exit 3", true, None).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Command);

        let ok = execute("exit 3", true, Some(&[0, 3])).unwrap();
        assert_eq!(ok.status, 3);

        let unchecked = execute("exit 3", false, None).unwrap();
        assert_eq!(unchecked.status, 3);
    }
}
