//! Per-operation options
//!
//! Every field is optional and an absent field means the matching flag is
//! left off the command line. `from_pairs` builds an options struct from a
//! loose key/value bag: keys match case-insensitively (ignoring `-`, `_` and
//! spaces) and unknown keys are dropped.

use serde::{Deserialize, Serialize};

/// Tri-state value used by `-Enforced` and `-LinkEnabled`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PsBoolean {
    #[default]
    Unspecified,
    No,
    Yes,
}

impl PsBoolean {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "yes" | "true" | "1" | "on" => PsBoolean::Yes,
            "no" | "false" | "0" | "off" => PsBoolean::No,
            _ => PsBoolean::Unspecified,
        }
    }

    /// Flag value, or `None` when the flag should be omitted
    pub fn flag_value(&self) -> Option<&'static str> {
        match self {
            PsBoolean::Unspecified => None,
            PsBoolean::No => Some("No"),
            PsBoolean::Yes => Some("Yes"),
        }
    }
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "yes" | "1" | "on"
    )
}

/// Walk `pairs`, handing each normalized key and its value to `apply`
fn for_each_pair<I, K, V>(pairs: I, mut apply: impl FnMut(&str, &str))
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    for (key, value) in pairs {
        apply(&normalize_key(key.as_ref()), value.as_ref());
    }
}

/// Options for `New-GPO`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewGpoOptions {
    pub comment: Option<String>,
    pub domain: Option<String>,
    pub server: Option<String>,
    pub starter_gpo_name: Option<String>,
    pub starter_gpo_guid: Option<String>,
}

impl NewGpoOptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for_each_pair(pairs, |key, value| match key {
            "comment" => opts.comment = Some(value.to_string()),
            "domain" => opts.domain = Some(value.to_string()),
            "server" => opts.server = Some(value.to_string()),
            "startergponame" => opts.starter_gpo_name = Some(value.to_string()),
            "startergpoguid" => opts.starter_gpo_guid = Some(value.to_string()),
            _ => {}
        });
        opts
    }
}

/// Options for `Remove-GPO`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveGpoOptions {
    pub domain: Option<String>,
    pub server: Option<String>,
    pub keep_links: bool,
}

impl RemoveGpoOptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for_each_pair(pairs, |key, value| match key {
            "domain" => opts.domain = Some(value.to_string()),
            "server" => opts.server = Some(value.to_string()),
            "keeplinks" => opts.keep_links = is_truthy(value),
            _ => {}
        });
        opts
    }
}

/// Options for `Get-GPO`, both single and `-All`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetGpoOptions {
    pub domain: Option<String>,
    pub server: Option<String>,
}

impl GetGpoOptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for_each_pair(pairs, |key, value| match key {
            "domain" => opts.domain = Some(value.to_string()),
            "server" => opts.server = Some(value.to_string()),
            _ => {}
        });
        opts
    }
}

/// Options for `Rename-GPO`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameGpoOptions {
    pub domain: Option<String>,
}

impl RenameGpoOptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for_each_pair(pairs, |key, value| {
            if key == "domain" {
                opts.domain = Some(value.to_string());
            }
        });
        opts
    }
}

/// Options for `Backup-GPO`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupGpoOptions {
    pub comment: Option<String>,
}

impl BackupGpoOptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for_each_pair(pairs, |key, value| {
            if key == "comment" {
                opts.comment = Some(value.to_string());
            }
        });
        opts
    }
}

/// Options for `Import-GPO`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportGpoOptions {
    pub domain: Option<String>,
    pub create_if_needed: bool,
}

impl ImportGpoOptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for_each_pair(pairs, |key, value| match key {
            "domain" => opts.domain = Some(value.to_string()),
            "createifneeded" => opts.create_if_needed = is_truthy(value),
            _ => {}
        });
        opts
    }
}

/// Options for `New-GPLink`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpLinkOptions {
    pub domain: Option<String>,
    pub enforced: PsBoolean,
    pub link_enabled: PsBoolean,
}

impl GpLinkOptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for_each_pair(pairs, |key, value| match key {
            "domain" => opts.domain = Some(value.to_string()),
            "enforced" => opts.enforced = PsBoolean::from_str(value),
            "linkenabled" => opts.link_enabled = PsBoolean::from_str(value),
            _ => {}
        });
        opts
    }
}

/// Options for `Remove-GPLink`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoveGpLinkOptions {
    pub domain: Option<String>,
}

impl RemoveGpLinkOptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for_each_pair(pairs, |key, value| {
            if key == "domain" {
                opts.domain = Some(value.to_string());
            }
        });
        opts
    }
}

/// Options for `Invoke-GPUpdate`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GpUpdateOptions {
    pub force: bool,
    pub random_delay_minutes: Option<u32>,
}

impl GpUpdateOptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut opts = Self::default();
        for_each_pair(pairs, |key, value| match key {
            "force" => opts.force = is_truthy(value),
            "randomdelayinminutes" | "randomdelayminutes" => {
                opts.random_delay_minutes = value.trim().parse().ok()
            }
            _ => {}
        });
        opts
    }
}
