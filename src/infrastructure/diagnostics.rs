//! Extraction of structured errors from PowerShell's error stream
//!
//! A failing cmdlet writes a record such as:
//!
//! ```text
//! Get-GPO : A GPO with the name "testgpo" does not exist in the contoso.com domain.
//!     + CategoryInfo          : ObjectNotFound: (Microsoft.Group...a.GetGpoCommand:GetGpoCommand) [Get-GPO], ArgumentException
//!     + FullyQualifiedErrorId : GpoWithNameNotFound,Microsoft.GroupPolicy.Commands.GetGpoCommand
//! ```

use crate::error::PowerShellError;
use once_cell::sync::Lazy;
use regex::Regex;

static CATEGORY_INFO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"CategoryInfo[ \t]*:[ \t]*([^\r\n]*)").expect("valid CategoryInfo regex")
});

static FULLY_QUALIFIED_ERROR_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"FullyQualifiedErrorId[ \t]*:[ \t]*([^\r\n]*)")
        .expect("valid FullyQualifiedErrorId regex")
});

/// Text after the first `CategoryInfo :` marker, up to the end of its line
pub fn category_info(stderr: &str) -> Option<&str> {
    CATEGORY_INFO
        .captures(stderr)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
}

/// Text after the first `FullyQualifiedErrorId :` marker, up to the end of its line
pub fn fully_qualified_error_id(stderr: &str) -> Option<&str> {
    FULLY_QUALIFIED_ERROR_ID
        .captures(stderr)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim())
        .filter(|v| !v.is_empty())
}

/// Whether stderr carries a PowerShell error record.
///
/// Non-terminating errors inside a pipeline leave the exit code at 0, so
/// the record itself marks the call as failed.
pub fn has_error_record(stderr: &str) -> bool {
    stderr.contains("FullyQualifiedErrorId")
}

/// Decode a failed command's stderr.
///
/// Never fails: missing markers leave the matching field empty. When the
/// error id is repeated inside the category text, the category is cut two
/// characters before it, dropping the id and its `: ` separator.
pub fn decode_error(stderr: &str) -> PowerShellError {
    let error_id = fully_qualified_error_id(stderr).unwrap_or_default();
    let category = category_info(stderr).unwrap_or_default();

    let category_info = match category.find(error_id) {
        Some(idx) if !error_id.is_empty() => {
            let mut prefix = category[..idx].to_string();
            prefix.pop();
            prefix.pop();
            prefix
        }
        _ => category.to_string(),
    };

    PowerShellError {
        error_id: error_id.to_string(),
        category_info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GET_GPO_NOT_FOUND: &str = "Get-GPO : A GPO with the name \"testgpo\" does not exist in the contoso.com domain.\r\n\
At line:1 char:1\r\n\
+ Get-GPO -Name \"testgpo\"\r\n\
+ ~~~~~~~~~~~~~~~~~~~~~~~\r\n\
    + CategoryInfo          : ObjectNotFound: (Microsoft.Group...a.GetGpoCommand:GetGpoCommand) [Get-GPO], ArgumentException\r\n\
    + FullyQualifiedErrorId : GpoWithNameNotFound,Microsoft.GroupPolicy.Commands.GetGpoCommand\r\n";

    const EMBEDDED_ID: &str = "New-GPLink : The GPO is already linked.\r\n\
    + CategoryInfo          : InvalidOperation: (:) [New-GPLink], ArgumentException: GpLinkAlreadyExists,Microsoft.GroupPolicy.Commands.NewGPLinkCommand\r\n\
    + FullyQualifiedErrorId : GpLinkAlreadyExists,Microsoft.GroupPolicy.Commands.NewGPLinkCommand\r\n";

    #[test]
    fn test_extracts_both_markers() {
        assert_eq!(
            category_info(GET_GPO_NOT_FOUND),
            Some("ObjectNotFound: (Microsoft.Group...a.GetGpoCommand:GetGpoCommand) [Get-GPO], ArgumentException")
        );
        assert_eq!(
            fully_qualified_error_id(GET_GPO_NOT_FOUND),
            Some("GpoWithNameNotFound,Microsoft.GroupPolicy.Commands.GetGpoCommand")
        );

        let err = decode_error(GET_GPO_NOT_FOUND);
        assert_eq!(
            err.error_id,
            "GpoWithNameNotFound,Microsoft.GroupPolicy.Commands.GetGpoCommand"
        );
        assert!(err.category_info.starts_with("ObjectNotFound"));
    }

    #[test]
    fn test_strips_embedded_error_id() {
        let err = decode_error(EMBEDDED_ID);
        assert_eq!(
            err.category_info,
            "InvalidOperation: (:) [New-GPLink], ArgumentException"
        );
        assert_eq!(
            err.error_id,
            "GpLinkAlreadyExists,Microsoft.GroupPolicy.Commands.NewGPLinkCommand"
        );
    }

    #[test]
    fn test_plain_newlines() {
        let stderr = EMBEDDED_ID.replace("\r\n", "\n");
        let err = decode_error(&stderr);
        assert_eq!(
            err.category_info,
            "InvalidOperation: (:) [New-GPLink], ArgumentException"
        );
    }

    #[test]
    fn test_unparseable_text_gives_empty_error() {
        let err = decode_error("powershell.exe : The term 'Get-GPO' is not recognized");
        assert_eq!(err, PowerShellError::default());
        assert_eq!(decode_error(""), PowerShellError::default());
    }

    #[test]
    fn test_empty_marker_values_stay_empty() {
        let stderr = "    + CategoryInfo          : \r\n    + FullyQualifiedErrorId : X\r\n";
        assert_eq!(category_info(stderr), None);
        assert_eq!(fully_qualified_error_id(stderr), Some("X"));

        let err = decode_error(stderr);
        assert_eq!(err.category_info, "");
        assert_eq!(err.error_id, "X");

        let err = decode_error("    + CategoryInfo          : NotSpecified: (:) [], RuntimeException\r\n    + FullyQualifiedErrorId : \r\n");
        assert_eq!(err.category_info, "NotSpecified: (:) [], RuntimeException");
        assert_eq!(err.error_id, "");
    }

    #[test]
    fn test_error_record_detection() {
        assert!(has_error_record(GET_GPO_NOT_FOUND));
        assert!(!has_error_record("WARNING: Resulting JSON is truncated as serialization has exceeded the set depth of 2.\r\n"));
        assert!(!has_error_record(""));
    }

    #[test]
    fn test_category_without_error_id() {
        let err = decode_error("    + CategoryInfo          : NotSpecified: (:) [], RuntimeException\r\n");
        assert_eq!(err.category_info, "NotSpecified: (:) [], RuntimeException");
        assert_eq!(err.error_id, "");
    }
}
