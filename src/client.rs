//! Group Policy client
//!
//! Every operation validates its arguments, builds one PowerShell command,
//! runs it through the [`CommandExecutor`] and decodes either the JSON it
//! printed or the error record it wrote to stderr.

use crate::config::PowerShellConfig;
use crate::domain::{
    BackupGpoOptions, GetGpoOptions, Gpo, GpoBackup, GpoSelector, GpLinkOptions,
    GpUpdateOptions, ImportGpoOptions, NewGpoOptions, RemoveGpLinkOptions, RemoveGpoOptions,
    RenameGpoOptions, ReportType,
};
use crate::error::{AppError, AppResult};
use crate::infrastructure::{
    command, decode_backup, decode_error, decode_gpo, decode_gpo_list, CommandExecutor,
    LocalPowerShell, PsCommand, MODULE_CHECK_COMMAND, MODULE_INSTALLED_MARKER,
};

/// Client for the PowerShell GroupPolicy module
#[derive(Debug, Clone, Default)]
pub struct Client<E = LocalPowerShell> {
    executor: E,
}

impl Client<LocalPowerShell> {
    /// Client using the local shell configured by `GROUPPOLICY_POWERSHELL`
    pub fn new() -> Self {
        Self::with_config(PowerShellConfig::from_env())
    }

    pub fn with_config(config: PowerShellConfig) -> Self {
        Self::with_executor(LocalPowerShell::new(config))
    }
}

impl<E: CommandExecutor> Client<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// Run a command line, returning stdout or the decoded PowerShell error
    fn run_line(&self, line: &str) -> AppResult<String> {
        tracing::debug!(command = line, "Running PowerShell command");

        let output = self.executor.execute(line)?;
        if output.success {
            return Ok(output.stdout);
        }

        let err = decode_error(&output.stderr);
        tracing::error!(
            error_id = err.error_id.as_str(),
            category_info = err.category_info.as_str(),
            "PowerShell command failed"
        );
        Err(AppError::PowerShell(err))
    }

    fn run(&self, cmd: &PsCommand) -> AppResult<String> {
        self.run_line(&cmd.render())
    }

    /// Whether the GroupPolicy module is available to the local shell
    pub fn is_group_policy_module_installed(&self) -> AppResult<bool> {
        let stdout = self.run_line(MODULE_CHECK_COMMAND)?;
        Ok(stdout.contains(MODULE_INSTALLED_MARKER))
    }

    /// Create a GPO
    pub fn new_gpo(&self, name: &str, opts: &NewGpoOptions) -> AppResult<Gpo> {
        let cmd = command::new_gpo(name, opts)?;
        let gpo = decode_gpo(&self.run(&cmd)?)?;
        tracing::info!(gpo = gpo.display_name.as_str(), id = gpo.id.as_str(), "Created GPO");
        Ok(gpo)
    }

    /// Delete a GPO
    pub fn remove_gpo(&self, selector: &GpoSelector, opts: &RemoveGpoOptions) -> AppResult<()> {
        let cmd = command::remove_gpo(selector, opts)?;
        self.run(&cmd)?;
        tracing::info!(?selector, keep_links = opts.keep_links, "Removed GPO");
        Ok(())
    }

    pub fn rename_gpo(
        &self,
        selector: &GpoSelector,
        target_name: &str,
        opts: &RenameGpoOptions,
    ) -> AppResult<()> {
        let cmd = command::rename_gpo(selector, target_name, opts)?;
        self.run(&cmd)?;
        tracing::info!(?selector, target_name, "Renamed GPO");
        Ok(())
    }

    pub fn get_gpo(&self, selector: &GpoSelector, opts: &GetGpoOptions) -> AppResult<Gpo> {
        let cmd = command::get_gpo(selector, opts)?;
        decode_gpo(&self.run(&cmd)?)
    }

    /// Every GPO in the domain
    pub fn get_all_gpo(&self, opts: &GetGpoOptions) -> AppResult<Vec<Gpo>> {
        let gpos = decode_gpo_list(&self.run(&command::get_all_gpo(opts))?)?;
        tracing::debug!(count = gpos.len(), "Listed GPOs");
        Ok(gpos)
    }

    /// Back a GPO up into the directory at `path`
    pub fn backup_gpo(
        &self,
        selector: &GpoSelector,
        path: &str,
        opts: &BackupGpoOptions,
    ) -> AppResult<GpoBackup> {
        let cmd = command::backup_gpo(selector, path, opts)?;
        let backup = decode_backup(&self.run(&cmd)?)?;
        tracing::info!(
            gpo = backup.display_name.as_str(),
            backup_id = backup.id.as_str(),
            "Backed up GPO"
        );
        Ok(backup)
    }

    /// Restore a GPO from its latest backup under `path`
    pub fn restore_gpo(&self, selector: &GpoSelector, path: &str) -> AppResult<()> {
        let cmd = command::restore_gpo(selector, path)?;
        self.run(&cmd)?;
        tracing::info!(?selector, path, "Restored GPO");
        Ok(())
    }

    /// Import the settings of a backed-up GPO into `target_name`
    pub fn import_gpo(
        &self,
        backup_gpo_name: &str,
        target_name: &str,
        path: &str,
        opts: &ImportGpoOptions,
    ) -> AppResult<Gpo> {
        let cmd = command::import_gpo(backup_gpo_name, target_name, path, opts)?;
        let gpo = decode_gpo(&self.run(&cmd)?)?;
        tracing::info!(backup_gpo_name, gpo = gpo.display_name.as_str(), "Imported GPO");
        Ok(gpo)
    }

    /// Link a GPO to a site, domain or OU
    pub fn new_gp_link(
        &self,
        selector: &GpoSelector,
        target: &str,
        opts: &GpLinkOptions,
    ) -> AppResult<()> {
        let cmd = command::new_gp_link(selector, target, opts)?;
        self.run(&cmd)?;
        tracing::info!(?selector, link_target = target, "Linked GPO");
        Ok(())
    }

    /// Re-apply link properties by creating the link again
    pub fn set_gp_link(
        &self,
        selector: &GpoSelector,
        target: &str,
        opts: &GpLinkOptions,
    ) -> AppResult<()> {
        self.new_gp_link(selector, target, opts)
    }

    pub fn remove_gp_link(
        &self,
        selector: &GpoSelector,
        target: &str,
        opts: &RemoveGpLinkOptions,
    ) -> AppResult<()> {
        let cmd = command::remove_gp_link(selector, target, opts)?;
        self.run(&cmd)?;
        tracing::info!(?selector, link_target = target, "Removed GPO link");
        Ok(())
    }

    /// Force a policy refresh on a remote computer
    pub fn invoke_gpupdate(
        &self,
        computer: &str,
        target: &str,
        opts: &GpUpdateOptions,
    ) -> AppResult<()> {
        let cmd = command::invoke_gpupdate(computer, target, opts)?;
        self.run(&cmd)?;
        tracing::info!(computer, update_target = target, "Requested Group Policy update");
        Ok(())
    }

    /// Raw XML or HTML settings report for a GPO
    pub fn get_report(&self, gpo: &Gpo, report_type: ReportType) -> AppResult<String> {
        let cmd = command::gpo_report(gpo, report_type)?;
        self.run(&cmd)
    }

    pub fn set_gp_registry_value(&self) -> AppResult<()> {
        Err(AppError::NotImplemented("Set-GPRegistryValue"))
    }

    pub fn get_gp_registry_value(&self) -> AppResult<String> {
        Err(AppError::NotImplemented("Get-GPRegistryValue"))
    }

    pub fn remove_gp_registry_value(&self) -> AppResult<()> {
        Err(AppError::NotImplemented("Remove-GPRegistryValue"))
    }
}
