use std::path::Path;

use indexmap::IndexMap;
use tracing::warn;

use crate::error::{LaunchError, LaunchResult};
use crate::profile::ProfileSet;

/// The root `.env` file, loaded once at startup and shared by
/// reference with every stage.
///
/// # Example
///
/// ```
/// use localkit::env::RootEnv;
///
/// let env = RootEnv::from_pairs([
///     ("COMPOSE_PROFILES", "supabase,dify"),
///     ("JWT_SECRET", "s3cret"),
/// ]);
///
/// assert_eq!(env.get("JWT_SECRET"), Some("s3cret"));
/// assert!(env.profiles().is_enabled("dify"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootEnv {
    values: IndexMap<String, String>,
}

impl RootEnv {
    /// Parse `path`. A missing file is treated as empty. Lines that do
    /// not parse are skipped with a warning and the remaining pairs are
    /// kept. Only a file that cannot be read at all is an error.
    pub fn load(path: &Path) -> LaunchResult<Self> {
        if !path.exists() {
            warn!("{} not found, continuing with an empty environment", path.display());
            return Ok(Self::default());
        }

        let env_err = |reason: String| LaunchError::EnvFile {
            path: path.display().to_string(),
            reason,
        };

        let iter = dotenvy::from_path_iter(path).map_err(|e| env_err(e.to_string()))?;
        let mut values = IndexMap::new();
        for item in iter {
            match item {
                Ok((key, value)) => {
                    values.insert(key, value);
                }
                Err(e @ dotenvy::Error::LineParse(..)) => {
                    warn!("{}: skipping line: {e}", path.display());
                }
                Err(e) => return Err(env_err(e.to_string())),
            }
        }

        Ok(Self { values })
    }

    #[must_use]
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            values: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Profiles listed in `COMPOSE_PROFILES`.
    #[must_use]
    pub fn profiles(&self) -> ProfileSet {
        ProfileSet::parse(self.get_or("COMPOSE_PROFILES", ""))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
