use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Snapshot of a Group Policy Object as reported by `Get-GPO`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", try_from = "RawGpo")]
pub struct Gpo {
    pub id: String,
    pub display_name: String,
    pub owner: String,
    pub domain_name: String,
    pub description: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawGpo {
    #[serde(default, deserialize_with = "null_as_empty")]
    id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    display_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    owner: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    domain_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    description: String,
}

impl TryFrom<RawGpo> for Gpo {
    type Error = String;

    fn try_from(raw: RawGpo) -> Result<Self, Self::Error> {
        if raw.id.is_empty() {
            return Err("GPO is missing its Id".to_string());
        }
        if raw.display_name.is_empty() {
            return Err(format!("GPO {} is missing its DisplayName", raw.id));
        }
        Ok(Gpo {
            id: raw.id,
            display_name: raw.display_name,
            owner: raw.owner,
            domain_name: raw.domain_name,
            description: raw.description,
        })
    }
}

/// Backup record emitted by `Backup-GPO`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GpoBackup {
    /// Backup id, used by `Restore-GPO -BackupId`
    #[serde(deserialize_with = "null_as_empty")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub gpo_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub display_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub domain_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub backup_directory: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub comment: String,
}

/// PowerShell writes absent strings as `null`
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Report formats accepted by `Get-GPOReport`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportType {
    Xml,
    Html,
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportType::Xml => write!(f, "Xml"),
            ReportType::Html => write!(f, "Html"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gpo_from_powershell_json() {
        let gpo: Gpo = serde_json::from_str(
            r#"{"Id":"G1","DisplayName":"testgpo","Description":null,"GpoStatus":3,"User":{"DSVersion":0}}"#,
        )
        .unwrap();
        assert_eq!(gpo.id, "G1");
        assert_eq!(gpo.display_name, "testgpo");
        assert_eq!(gpo.owner, "");
        assert_eq!(gpo.description, "");
    }

    #[test]
    fn test_gpo_requires_id_and_display_name() {
        assert!(serde_json::from_str::<Gpo>(r#"{"DisplayName":"testgpo"}"#).is_err());
        assert!(serde_json::from_str::<Gpo>(r#"{"Id":"G1","DisplayName":""}"#).is_err());
    }

    #[test]
    fn test_report_type() {
        assert_eq!(ReportType::Html.to_string(), "Html");
    }
}
