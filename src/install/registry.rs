//! Installed CPython versions from the Windows registry
//!
//! The official installer registers each install under
//! `Software\Python\PythonCore\<tag>` in either the machine hive (all users)
//! or the user hive. Rather than linking a registry API, the hives are read
//! through `reg query`, whose output looks like:
//!
//! ```text
//! HKEY_CURRENT_USER\SOFTWARE\Python\PythonCore\3.12
//!     Version    REG_SZ    3.12.4
//!
//! End of search: 1 match(es) found.
//! ```

use std::collections::BTreeMap;

use tracing::debug;

use crate::version::identifier::Version;
use crate::version::installed::{InstalledVersionProvider, InstalledVersionSet};

const MACHINE_KEY: &str = r"HKLM\SOFTWARE\Python\PythonCore";
const USER_KEY: &str = r"HKCU\SOFTWARE\Python\PythonCore";
const COMPANY: &str = "PythonCore";

/// Reads both hives; machine-wide entries take precedence per release line.
pub struct RegistryInstalledVersions;

#[async_trait::async_trait]
impl InstalledVersionProvider for RegistryInstalledVersions {
    async fn list_installed(&self) -> InstalledVersionSet {
        let machine = collect_installed(query_hive(MACHINE_KEY).await);
        let user = collect_installed(query_hive(USER_KEY).await);
        merge_hives(machine, user)
    }
}

/// Returns tag → version string, or nothing if the key cannot be read
async fn query_hive(key: &str) -> BTreeMap<String, String> {
    let output = match tokio::process::Command::new("reg")
        .args(["query", key, "/s", "/v", "Version"])
        .output()
        .await
    {
        Ok(output) => output,
        Err(e) => {
            debug!("Failed to run reg query for {}: {}", key, e);
            return BTreeMap::new();
        }
    };

    if !output.status.success() {
        debug!("reg query found nothing under {}", key);
        return BTreeMap::new();
    }

    parse_reg_query(&String::from_utf8_lossy(&output.stdout))
}

/// Parses `reg query /s /v Version` output into tag → version string.
///
/// Only values directly under a `PythonCore\<tag>` key are taken.
pub fn parse_reg_query(output: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    let mut current_tag: Option<String> = None;

    for line in output.lines() {
        if line.starts_with("HKEY_") {
            current_tag = tag_of_key(line.trim());
            continue;
        }

        let mut fields = line.split_whitespace();
        let (Some("Version"), Some(kind), Some(value)) = (fields.next(), fields.next(), fields.next())
        else {
            continue;
        };
        if !kind.starts_with("REG_") {
            continue;
        }
        if let Some(tag) = &current_tag {
            entries.insert(tag.clone(), value.to_string());
        }
    }

    entries
}

fn tag_of_key(key: &str) -> Option<String> {
    let segments: Vec<&str> = key.split('\\').collect();
    let company = segments
        .iter()
        .position(|segment| segment.eq_ignore_ascii_case(COMPANY))?;

    match &segments[company + 1..] {
        [tag] => Some(tag.to_string()),
        _ => None,
    }
}

/// User-hive installs only fill release lines the machine hive does not
/// have, whatever tag (`3.12`, `3.12-32`, ...) either side registered under.
pub fn merge_hives(machine: InstalledVersionSet, user: InstalledVersionSet) -> InstalledVersionSet {
    let mut merged = machine;
    merged.fill_gaps_from(user);
    merged
}

/// Parses one hive's entries, dropping unparsable versions
pub fn collect_installed(entries: BTreeMap<String, String>) -> InstalledVersionSet {
    entries
        .into_iter()
        .filter_map(|(tag, raw)| match raw.parse::<Version>() {
            Ok(version) => Some(version),
            Err(e) => {
                debug!("Skipping registry entry {}: {}", tag, e);
                None
            }
        })
        .collect()
}
