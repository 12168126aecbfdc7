//! How the local PowerShell process is launched

/// Environment variable that overrides the PowerShell executable
pub const POWERSHELL_ENV_VAR: &str = "GROUPPOLICY_POWERSHELL";

const DEFAULT_PROGRAM: &str = "powershell";

/// Launch settings for the local shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerShellConfig {
    /// Executable name or path (`powershell`, `pwsh`, ...)
    pub program: String,
    /// Arguments placed before the command text. The last one must take
    /// the command as its value (`-Command`).
    pub args: Vec<String>,
}

impl Default for PowerShellConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            args: ["-NoProfile", "-NonInteractive", "-ExecutionPolicy", "Bypass", "-Command"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl PowerShellConfig {
    /// Default settings, with the program taken from `GROUPPOLICY_POWERSHELL` when set.
    pub fn from_env() -> Self {
        Self::from_program(std::env::var(POWERSHELL_ENV_VAR).ok())
    }

    fn from_program(program: Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(program) = program.filter(|p| !p.trim().is_empty()) {
            config.program = program.trim().to_string();
        }
        config
    }
}
