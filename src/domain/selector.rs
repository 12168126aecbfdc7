use crate::error::MissingArgument;

/// Identifies an existing GPO by name, by GUID, or both.
///
/// Empty strings count as absent. When both are given the GUID wins and the
/// name is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpoSelector {
    pub name: Option<String>,
    pub guid: Option<String>,
}

/// The form actually sent to PowerShell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpoIdentity<'a> {
    Guid(&'a str),
    Name(&'a str),
}

impl GpoSelector {
    pub fn new(name: impl Into<String>, guid: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            guid: Some(guid.into()),
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            guid: None,
        }
    }

    pub fn by_guid(guid: impl Into<String>) -> Self {
        Self {
            name: None,
            guid: Some(guid.into()),
        }
    }

    pub fn identity(&self) -> Result<GpoIdentity<'_>, MissingArgument> {
        if let Some(guid) = present(&self.guid) {
            return Ok(GpoIdentity::Guid(guid));
        }
        present(&self.name)
            .map(GpoIdentity::Name)
            .ok_or(MissingArgument::NameOrGuid)
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}
