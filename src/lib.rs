//! Group Policy management through the Windows PowerShell GroupPolicy module
//!
//! [`Client`] turns typed calls into `New-GPO`, `Get-GPO`, `New-GPLink` and
//! friends, runs them in a local PowerShell process and decodes the JSON they
//! print or the error record they write to stderr.

pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

pub use client::Client;
pub use config::PowerShellConfig;
pub use domain::*;
pub use error::{AppError, AppResult, CommandError, MissingArgument, PowerShellError};
pub use infrastructure::{CommandExecutor, ExecOutput, LocalPowerShell};
