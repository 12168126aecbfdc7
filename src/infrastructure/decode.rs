//! Decoding of `ConvertTo-Json` output

use crate::domain::{Gpo, GpoBackup};
use crate::error::AppResult;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// `ConvertTo-Json` writes a lone object when a pipeline yields one item
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn decode<T: DeserializeOwned>(stdout: &str) -> AppResult<T> {
    serde_json::from_str(stdout.trim()).map_err(|e| {
        tracing::error!(error = %e, stdout = %stdout, "Failed to parse PowerShell JSON output");
        e.into()
    })
}

pub fn decode_gpo(stdout: &str) -> AppResult<Gpo> {
    decode(stdout)
}

/// Decode a list of GPOs. `[]` yields an empty vector.
pub fn decode_gpo_list(stdout: &str) -> AppResult<Vec<Gpo>> {
    Ok(match decode::<OneOrMany<Gpo>>(stdout)? {
        OneOrMany::Many(gpos) => gpos,
        OneOrMany::One(gpo) => vec![gpo],
    })
}

pub fn decode_backup(stdout: &str) -> AppResult<GpoBackup> {
    decode(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    const TWO_GPOS: &str = r#"[
        {"Id":"31b2f340-016d-11d2-945f-00c04fb984f9","DisplayName":"Default Domain Policy","Owner":"CONTOSO\\Domain Admins","DomainName":"contoso.com","Description":null},
        {"Id":"6ac1786c-016f-11d2-945f-00c04fb984f9","DisplayName":"Default Domain Controllers Policy","Owner":"CONTOSO\\Domain Admins","DomainName":"contoso.com","Description":""}
    ]"#;

    #[test]
    fn test_decode_single_gpo() {
        let gpo = decode_gpo(r#"{"Id":"G1","DisplayName":"testgpo","Description":""}"#).unwrap();
        assert_eq!(gpo.id, "G1");
        assert_eq!(gpo.display_name, "testgpo");
    }

    #[test]
    fn test_decode_list_keeps_length_and_order() {
        let gpos = decode_gpo_list(TWO_GPOS).unwrap();
        assert_eq!(gpos.len(), 2);
        assert_eq!(gpos[0].display_name, "Default Domain Policy");
        assert_eq!(gpos[1].owner, "CONTOSO\\Domain Admins");
    }

    #[test]
    fn test_decode_empty_list() {
        assert!(decode_gpo_list("[]").unwrap().is_empty());
        assert!(decode_gpo_list("[]\r\n").unwrap().is_empty());
    }

    #[test]
    fn test_decode_lone_object_as_list() {
        let gpos = decode_gpo_list(r#"{"Id":"G1","DisplayName":"testgpo"}"#).unwrap();
        assert_eq!(gpos.len(), 1);
    }

    #[test]
    fn test_malformed_output_is_decode_error() {
        assert!(matches!(decode_gpo_list("[{"), Err(AppError::Decode(_))));
        assert!(matches!(decode_gpo(""), Err(AppError::Decode(_))));
        assert!(matches!(decode_gpo(r#"{"Id":"G1"}"#), Err(AppError::Decode(_))));
    }

    #[test]
    fn test_decode_backup() {
        let backup = decode_backup(
            r#"{"DisplayName":"testgpo","GpoId":"G1","Id":"B1","BackupDirectory":"C:\\Backups","Comment":null,"DomainName":"contoso.com"}"#,
        )
        .unwrap();
        assert_eq!(backup.id, "B1");
        assert_eq!(backup.gpo_id, "G1");
        assert_eq!(backup.backup_directory, "C:\\Backups");
        assert_eq!(backup.comment, "");
    }
}
