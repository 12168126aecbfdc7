use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Argument that was required but not supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingArgument {
    NameOrGuid,
    Name,
    Target,
    Path,
    TargetName,
    BackupGpoName,
    Computer,
}

impl fmt::Display for MissingArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingArgument::NameOrGuid => write!(f, "name or guid"),
            MissingArgument::Name => write!(f, "name"),
            MissingArgument::Target => write!(f, "target"),
            MissingArgument::Path => write!(f, "path"),
            MissingArgument::TargetName => write!(f, "target name"),
            MissingArgument::BackupGpoName => write!(f, "backup GPO name"),
            MissingArgument::Computer => write!(f, "computer"),
        }
    }
}

/// Error reported by PowerShell, extracted from its diagnostic text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PowerShellError {
    /// Value of the `FullyQualifiedErrorId` line
    pub error_id: String,
    /// Value of the `CategoryInfo` line, without the trailing error id
    pub category_info: String,
}

impl fmt::Display for PowerShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ErrorId[{}] CategoryInfo[{}]",
            self.error_id, self.category_info
        )
    }
}

impl std::error::Error for PowerShellError {}

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing required argument: {0}")]
    MissingArgument(MissingArgument),

    #[error("PowerShell error: {0}")]
    PowerShell(PowerShellError),

    #[error("Failed to decode PowerShell output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Serializable error for hosts that forward failures as JSON
#[derive(Debug, Serialize)]
pub struct CommandError {
    pub code: String,
    pub message: String,
}

impl From<AppError> for CommandError {
    fn from(err: AppError) -> Self {
        CommandError {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let cmd_error = CommandError {
            code: self.error_code().to_string(),
            message: self.to_string(),
        };
        cmd_error.serialize(serializer)
    }
}

impl AppError {
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingArgument(_) => "MISSING_ARGUMENT",
            AppError::PowerShell(_) => "POWERSHELL_ERROR",
            AppError::Decode(_) => "DECODE_ERROR",
            AppError::NotImplemented(_) => "NOT_IMPLEMENTED",
            AppError::Io(_) => "IO_ERROR",
        }
    }
}

impl From<MissingArgument> for AppError {
    fn from(arg: MissingArgument) -> Self {
        AppError::MissingArgument(arg)
    }
}

impl From<PowerShellError> for AppError {
    fn from(err: PowerShellError) -> Self {
        AppError::PowerShell(err)
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_argument_message() {
        let err = AppError::from(MissingArgument::NameOrGuid);
        assert_eq!(err.to_string(), "Missing required argument: name or guid");
        assert_eq!(err.error_code(), "MISSING_ARGUMENT");
    }

    #[test]
    fn test_powershell_error_display() {
        let err = PowerShellError {
            error_id: "GpoWithNameNotFound".to_string(),
            category_info: "ObjectNotFound".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ErrorId[GpoWithNameNotFound] CategoryInfo[ObjectNotFound]"
        );
    }

    #[test]
    fn test_serialize_as_code_and_message() {
        let err = AppError::NotImplemented("Set-GPRegistryValue");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_IMPLEMENTED");
        assert_eq!(json["message"], "Not implemented: Set-GPRegistryValue");

        let cmd: CommandError = AppError::PowerShell(PowerShellError::default()).into();
        assert_eq!(cmd.code, "POWERSHELL_ERROR");
    }
}
