//! Execution of command lines in a local PowerShell process

use super::diagnostics::has_error_record;
use crate::config::PowerShellConfig;
use crate::error::AppResult;
use std::process::Command;

/// Captured result of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Runs one command line and reports what it printed.
///
/// Implementations must not share a shell session between calls.
pub trait CommandExecutor {
    fn execute(&self, command: &str) -> AppResult<ExecOutput>;
}

/// Spawns a fresh PowerShell process per command.
///
/// A call fails when the process exits nonzero or writes an error record to
/// stderr.
#[derive(Debug, Clone, Default)]
pub struct LocalPowerShell {
    config: PowerShellConfig,
}

impl LocalPowerShell {
    pub fn new(config: PowerShellConfig) -> Self {
        Self { config }
    }
}

impl CommandExecutor for LocalPowerShell {
    fn execute(&self, command: &str) -> AppResult<ExecOutput> {
        let output = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(command)
            .output()
            .map_err(|e| {
                tracing::error!(error = %e, program = %self.config.program, "Failed to execute PowerShell");
                e
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !stderr.is_empty() {
            tracing::warn!(stderr = %stderr, "PowerShell stderr");
        }

        let success = output.status.success() && !has_error_record(&stderr);
        Ok(ExecOutput {
            stdout,
            stderr,
            success,
        })
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for &T {
    fn execute(&self, command: &str) -> AppResult<ExecOutput> {
        (**self).execute(command)
    }
}

impl<T: CommandExecutor + ?Sized> CommandExecutor for Box<T> {
    fn execute(&self, command: &str) -> AppResult<ExecOutput> {
        (**self).execute(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_missing_program_is_io_error() {
        let executor = LocalPowerShell::new(PowerShellConfig {
            program: "grouppolicy-no-such-shell".to_string(),
            args: vec!["-Command".to_string()],
        });
        assert!(matches!(
            executor.execute("Get-GPO -All"),
            Err(AppError::Io(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_output_and_status() {
        let executor = LocalPowerShell::new(PowerShellConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string()],
        });

        let ok = executor.execute("printf true").unwrap();
        assert!(ok.success);
        assert_eq!(ok.stdout, "true");

        let failed = executor.execute("printf oops >&2; exit 1").unwrap();
        assert!(!failed.success);
        assert_eq!(failed.stderr, "oops");
    }

    #[cfg(unix)]
    #[test]
    fn test_error_record_fails_despite_zero_exit() {
        let executor = LocalPowerShell::new(PowerShellConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string()],
        });

        let out = executor
            .execute(r#"echo "[]"; echo "+ FullyQualifiedErrorId : X" >&2"#)
            .unwrap();
        assert!(!out.success);
        assert_eq!(out.stdout.trim(), "[]");

        let warned = executor.execute(r#"echo "[]"; echo "WARNING: depth" >&2"#).unwrap();
        assert!(warned.success);
    }
}
