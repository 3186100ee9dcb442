use std::collections::BTreeSet;

pub type LaunchResult<T> = Result<T, LaunchError>;

/// Whether a failed step stops the run or is only reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Advisory,
}

#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("command failed: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    #[error("command not found: {0}")]
    CommandNotFound(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("failed to fetch {repo} repository: {source}")]
    RepoFetch {
        repo: String,
        #[source]
        source: Box<LaunchError>,
    },

    #[error("installation cancelled: ports in use {0:?}")]
    ConflictDeclined(BTreeSet<u16>),

    #[error("cannot read environment file {path}: {reason}")]
    EnvFile { path: String, reason: String },

    #[error("service '{service}' not ready after {attempts} attempts")]
    NotReady { service: String, attempts: u32 },

    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl LaunchError {
    /// Fatal errors abort the run before or during a step that later
    /// steps depend on. Everything else is safe to retry on the next
    /// run and is downgraded to a warning.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::RepoFetch { .. } | Self::ConflictDeclined(_) => Severity::Fatal,
            _ => Severity::Advisory,
        }
    }

    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.severity(), Severity::Fatal)
    }
}
