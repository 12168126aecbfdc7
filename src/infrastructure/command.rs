//! PowerShell command construction
//!
//! Each GroupPolicy operation is turned into a [`PsCommand`]: a cmdlet, an
//! optional positional argument and an ordered list of parameters. Required
//! arguments are validated before anything is built, so a caller never gets
//! a half-formed command line.

use crate::domain::{
    BackupGpoOptions, GetGpoOptions, Gpo, GpoIdentity, GpoSelector, GpLinkOptions,
    GpUpdateOptions, ImportGpoOptions, NewGpoOptions, RemoveGpLinkOptions, RemoveGpoOptions,
    RenameGpoOptions, ReportType,
};
use crate::error::MissingArgument;
use std::fmt;

/// Prints the success marker when the GroupPolicy module is available
pub const MODULE_CHECK_COMMAND: &str = "if (Get-Module -ListAvailable GroupPolicy) {'true'}";

/// Literal written by [`MODULE_CHECK_COMMAND`] on success
pub const MODULE_INSTALLED_MARKER: &str = "true";

/// How the command's stdout should be shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Raw text, or nothing at all
    Text,
    /// A single JSON object
    JsonObject,
    /// A JSON array, `[]` when nothing matched
    JsonArray,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Param {
    Value(&'static str, String),
    Switch(&'static str),
}

/// A single cmdlet invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsCommand {
    cmdlet: &'static str,
    positional: Option<String>,
    params: Vec<Param>,
    output: OutputMode,
}

impl PsCommand {
    pub fn new(cmdlet: &'static str) -> Self {
        Self {
            cmdlet,
            positional: None,
            params: Vec::new(),
            output: OutputMode::Text,
        }
    }

    pub fn positional(mut self, value: impl Into<String>) -> Self {
        self.positional = Some(value.into());
        self
    }

    pub fn value(mut self, flag: &'static str, value: impl Into<String>) -> Self {
        self.params.push(Param::Value(flag, value.into()));
        self
    }

    /// Add `-Flag "value"` only when a non-empty value is present
    pub fn optional(self, flag: &'static str, value: Option<&str>) -> Self {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => self.value(flag, v),
            None => self,
        }
    }

    /// Add a bare `-Flag` when `enabled`
    pub fn switch(mut self, flag: &'static str, enabled: bool) -> Self {
        if enabled {
            self.params.push(Param::Switch(flag));
        }
        self
    }

    pub fn identity(self, identity: GpoIdentity<'_>) -> Self {
        match identity {
            GpoIdentity::Guid(guid) => self.value("Guid", guid),
            GpoIdentity::Name(name) => self.value("Name", name),
        }
    }

    pub fn output(mut self, output: OutputMode) -> Self {
        self.output = output;
        self
    }

    /// Render the full command line
    pub fn render(&self) -> String {
        let mut line = String::from(self.cmdlet);
        if let Some(positional) = &self.positional {
            line.push(' ');
            line.push_str(&quote(positional));
        }
        for param in &self.params {
            match param {
                Param::Value(flag, value) => {
                    line.push_str(&format!(" -{} {}", flag, quote(value)));
                }
                Param::Switch(flag) => {
                    line.push_str(&format!(" -{}", flag));
                }
            }
        }

        match self.output {
            OutputMode::Text => line,
            OutputMode::JsonObject => format!("{} | ConvertTo-Json", line),
            OutputMode::JsonArray => format!("ConvertTo-Json -InputObject @({})", line),
        }
    }
}

impl fmt::Display for PsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Wrap a value in double quotes, escaping what PowerShell would expand
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        // PowerShell also closes a string on the typographic double quotes
        if matches!(c, '`' | '"' | '$' | '\u{201C}' | '\u{201D}' | '\u{201E}') {
            quoted.push('`');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

fn require<'a>(value: &'a str, missing: MissingArgument) -> Result<&'a str, MissingArgument> {
    if value.is_empty() {
        Err(missing)
    } else {
        Ok(value)
    }
}

pub fn new_gpo(name: &str, opts: &NewGpoOptions) -> Result<PsCommand, MissingArgument> {
    let name = require(name, MissingArgument::Name)?;

    let starter_guid = opts.starter_gpo_guid.as_deref().filter(|g| !g.is_empty());
    let cmd = PsCommand::new("New-GPO")
        .positional(name)
        .optional("Comment", opts.comment.as_deref())
        .optional("Domain", opts.domain.as_deref())
        .optional("Server", opts.server.as_deref());

    let cmd = match starter_guid {
        Some(guid) => cmd.value("StarterGpoGuid", guid),
        None => cmd.optional("StarterGpoName", opts.starter_gpo_name.as_deref()),
    };

    Ok(cmd.output(OutputMode::JsonObject))
}

pub fn remove_gpo(
    selector: &GpoSelector,
    opts: &RemoveGpoOptions,
) -> Result<PsCommand, MissingArgument> {
    Ok(PsCommand::new("Remove-GPO")
        .identity(selector.identity()?)
        .optional("Domain", opts.domain.as_deref())
        .optional("Server", opts.server.as_deref())
        .switch("KeepLinks", opts.keep_links))
}

pub fn rename_gpo(
    selector: &GpoSelector,
    target_name: &str,
    opts: &RenameGpoOptions,
) -> Result<PsCommand, MissingArgument> {
    let identity = selector.identity()?;
    let target_name = require(target_name, MissingArgument::TargetName)?;

    Ok(PsCommand::new("Rename-GPO")
        .identity(identity)
        .value("TargetName", target_name)
        .optional("Domain", opts.domain.as_deref()))
}

pub fn get_gpo(selector: &GpoSelector, opts: &GetGpoOptions) -> Result<PsCommand, MissingArgument> {
    Ok(PsCommand::new("Get-GPO")
        .identity(selector.identity()?)
        .optional("Domain", opts.domain.as_deref())
        .optional("Server", opts.server.as_deref())
        .output(OutputMode::JsonObject))
}

pub fn get_all_gpo(opts: &GetGpoOptions) -> PsCommand {
    PsCommand::new("Get-GPO")
        .switch("All", true)
        .optional("Domain", opts.domain.as_deref())
        .optional("Server", opts.server.as_deref())
        .output(OutputMode::JsonArray)
}

pub fn backup_gpo(
    selector: &GpoSelector,
    path: &str,
    opts: &BackupGpoOptions,
) -> Result<PsCommand, MissingArgument> {
    let identity = selector.identity()?;
    let path = require(path, MissingArgument::Path)?;

    Ok(PsCommand::new("Backup-GPO")
        .identity(identity)
        .value("Path", path)
        .optional("Comment", opts.comment.as_deref())
        .output(OutputMode::JsonObject))
}

pub fn restore_gpo(selector: &GpoSelector, path: &str) -> Result<PsCommand, MissingArgument> {
    let identity = selector.identity()?;
    let path = require(path, MissingArgument::Path)?;

    Ok(PsCommand::new("Restore-GPO")
        .identity(identity)
        .value("Path", path))
}

pub fn import_gpo(
    backup_gpo_name: &str,
    target_name: &str,
    path: &str,
    opts: &ImportGpoOptions,
) -> Result<PsCommand, MissingArgument> {
    let backup_gpo_name = require(backup_gpo_name, MissingArgument::BackupGpoName)?;
    let target_name = require(target_name, MissingArgument::TargetName)?;
    let path = require(path, MissingArgument::Path)?;

    Ok(PsCommand::new("Import-GPO")
        .value("BackupGpoName", backup_gpo_name)
        .value("TargetName", target_name)
        .value("Path", path)
        .optional("Domain", opts.domain.as_deref())
        .switch("CreateIfNeeded", opts.create_if_needed)
        .output(OutputMode::JsonObject))
}

/// `New-GPLink`. Also used to re-apply link properties, which recreates the link.
pub fn new_gp_link(
    selector: &GpoSelector,
    target: &str,
    opts: &GpLinkOptions,
) -> Result<PsCommand, MissingArgument> {
    let identity = selector.identity()?;
    let target = require(target, MissingArgument::Target)?;

    Ok(PsCommand::new("New-GPLink")
        .identity(identity)
        .value("Target", target)
        .optional("Domain", opts.domain.as_deref())
        .optional("Enforced", opts.enforced.flag_value())
        .optional("LinkEnabled", opts.link_enabled.flag_value()))
}

pub fn remove_gp_link(
    selector: &GpoSelector,
    target: &str,
    opts: &RemoveGpLinkOptions,
) -> Result<PsCommand, MissingArgument> {
    let identity = selector.identity()?;
    let target = require(target, MissingArgument::Target)?;

    Ok(PsCommand::new("Remove-GPLink")
        .identity(identity)
        .value("Target", target)
        .optional("Domain", opts.domain.as_deref()))
}

pub fn invoke_gpupdate(
    computer: &str,
    target: &str,
    opts: &GpUpdateOptions,
) -> Result<PsCommand, MissingArgument> {
    let computer = require(computer, MissingArgument::Computer)?;
    let target = require(target, MissingArgument::Target)?;

    Ok(PsCommand::new("Invoke-GPUpdate")
        .value("Computer", computer)
        .value("Target", target)
        .switch("Force", opts.force)
        .optional(
            "RandomDelayInMinutes",
            opts.random_delay_minutes.map(|m| m.to_string()).as_deref(),
        ))
}

pub fn gpo_report(gpo: &Gpo, report_type: ReportType) -> Result<PsCommand, MissingArgument> {
    let selector = GpoSelector::new(gpo.display_name.as_str(), gpo.id.as_str());

    Ok(PsCommand::new("Get-GPOReport")
        .identity(selector.identity()?)
        .value("ReportType", report_type.to_string())
        .optional("Domain", Some(gpo.domain_name.as_str())))
}
