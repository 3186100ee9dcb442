use std::collections::BTreeSet;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::LaunchResult;

/// The set of profiles enabled through `COMPOSE_PROFILES`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileSet(BTreeSet<String>);

impl ProfileSet {
    /// Split a comma-separated profile list. Empty tokens are
    /// dropped, so `""` enables nothing.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Self(
            value
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(ToString::to_string)
                .collect(),
        )
    }

    /// Exact token match: `supabase` is enabled by
    /// `COMPOSE_PROFILES=supabase,dify` but `supa` is not.
    #[must_use]
    pub fn is_enabled(&self, profile: &str) -> bool {
        self.0.contains(profile)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Only the profile tags matter here; everything else in a service
// body is ignored so third-party compose files always parse.
#[derive(Debug, Default, Deserialize)]
struct ServiceDocument {
    #[serde(default)]
    services: Option<IndexMap<String, Option<ServiceProfiles>>>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceProfiles {
    #[serde(default)]
    profiles: Vec<String>,
}

/// Every profile tag declared by any service in the compose file at
/// `path`. Reads the file on every call.
///
/// Profiles inherited through YAML merge keys count. A missing file,
/// an empty document, or a document without `services` yields an
/// empty set.
pub fn all_profiles(path: &Path) -> LaunchResult<BTreeSet<String>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(BTreeSet::new());
    }

    // Merge keys (`<<: *anchor`) are resolved before services are read.
    let mut value: serde_yaml::Value = serde_yaml::from_str(&content)?;
    value.apply_merge()?;
    let doc: Option<ServiceDocument> = serde_yaml::from_value(value)?;

    Ok(doc
        .and_then(|d| d.services)
        .unwrap_or_default()
        .into_values()
        .flatten()
        .flat_map(|svc| svc.profiles)
        .collect())
}
