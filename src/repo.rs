use std::path::Path;

use tracing::info;

use crate::cmd::Runner;
use crate::error::{LaunchError, LaunchResult};

/// A third-party repository checked out sparsely next to the root
/// compose file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoSpec {
    pub name: String,
    /// Checkout directory, relative to the root directory.
    pub path: String,
    pub remote_url: String,
    /// The only subtree materialised by the sparse checkout.
    pub subdir: String,
    pub branch: String,
}

impl RepoSpec {
    #[must_use]
    pub fn new(name: &str, path: &str, remote_url: &str) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            remote_url: remote_url.to_string(),
            subdir: "docker".to_string(),
            branch: "main".to_string(),
        }
    }

    #[must_use]
    pub fn subdir(mut self, subdir: &str) -> Self {
        self.subdir = subdir.to_string();
        self
    }

    #[must_use]
    pub fn branch(mut self, branch: &str) -> Self {
        self.branch = branch.to_string();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoAction {
    Skipped,
    Cloned,
    Pulled,
}

/// Make sure `spec` is checked out under `root`.
///
/// Does nothing when `enabled` is false. A missing checkout is cloned
/// without blobs or a working tree, restricted to `spec.subdir` with a
/// cone-mode sparse checkout, then `spec.branch` is checked out. An
/// existing checkout is pulled. Any git failure is fatal: later stages
/// cannot run against a half-cloned tree.
pub fn ensure_repo(
    runner: &dyn Runner,
    root: &Path,
    enabled: bool,
    spec: &RepoSpec,
) -> LaunchResult<RepoAction> {
    if !enabled {
        info!("{} is not enabled, skipping clone", spec.name);
        return Ok(RepoAction::Skipped);
    }

    let checkout = root.join(&spec.path);
    let wrap = |source: LaunchError| LaunchError::RepoFetch {
        repo: spec.name.clone(),
        source: Box::new(source),
    };

    if checkout.exists() {
        info!("{} repository already exists, updating...", spec.name);
        runner
            .stream("git", &["pull"], Some(&checkout))
            .map_err(wrap)?;
        return Ok(RepoAction::Pulled);
    }

    info!("Cloning the {} repository...", spec.name);
    runner
        .stream(
            "git",
            &[
                "clone",
                "--filter=blob:none",
                "--no-checkout",
                &spec.remote_url,
                &spec.path,
            ],
            Some(root),
        )
        .map_err(wrap)?;

    let steps: [&[&str]; 3] = [
        &["sparse-checkout", "init", "--cone"],
        &["sparse-checkout", "set", &spec.subdir],
        &["checkout", &spec.branch],
    ];
    for args in steps {
        runner.stream("git", args, Some(&checkout)).map_err(wrap)?;
    }

    Ok(RepoAction::Cloned)
}
