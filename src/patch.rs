use std::path::Path;

use tracing::info;

use crate::cmd::Runner;
use crate::compose::{self, ComposeProject};
use crate::error::LaunchResult;

/// Republish one service on a different host port.
///
/// # Example
///
/// ```
/// use localkit::patch::PortOverride;
///
/// let kong = PortOverride::new("kong", 8100, 8000)
///     .env("KONG_PROXY_LISTEN", "0.0.0.0:8000");
///
/// assert_eq!(kong.binding(), "8100:8000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortOverride {
    pub service: String,
    pub host_port: u16,
    pub container_port: u16,
    pub environment: Vec<(String, String)>,
}

impl PortOverride {
    #[must_use]
    pub fn new(service: &str, host_port: u16, container_port: u16) -> Self {
        Self {
            service: service.to_string(),
            host_port,
            container_port,
            environment: Vec::new(),
        }
    }

    #[must_use]
    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.environment.push((key.to_string(), value.to_string()));
        self
    }

    #[must_use]
    pub fn binding(&self) -> String {
        format!("{}:{}", self.host_port, self.container_port)
    }

    pub fn render(&self) -> LaunchResult<String> {
        compose::render_override(&self.service, &[self.binding()], &self.environment)
    }
}

/// Stop the service, write the override document to `override_path`
/// (relative to `root`) and bring the service back up with the base
/// and override documents layered.
///
/// The override file is left in place afterwards.
pub fn remap_port(
    runner: &dyn Runner,
    root: &Path,
    project: &str,
    base_document: &str,
    override_path: &str,
    patch: &PortOverride,
) -> LaunchResult<()> {
    info!(
        "Publishing {} on port {}...",
        patch.service, patch.host_port
    );

    let base = ComposeProject::new(project).file(base_document);
    base.stop(runner, root, &patch.service)?;

    std::fs::write(root.join(override_path), patch.render()?)?;

    base.file(override_path)
        .up(runner, root, &[patch.service.as_str()])?;

    info!(
        "{} reachable on port {}",
        patch.service, patch.host_port
    );
    Ok(())
}
