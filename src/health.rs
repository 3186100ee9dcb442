use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::cmd::Runner;
use crate::error::{LaunchError, LaunchResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerState {
    Running,
    /// Listed by the runtime but in another state, e.g. `restarting`.
    NotRunning(String),
    NotFound,
    /// The container runtime could not be queried.
    Unknown(String),
}

/// Diagnostic result for one `(name, port)` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealth {
    pub name: String,
    pub port: u16,
    pub container: ContainerState,
    /// Only probed when the container is running.
    pub port_open: Option<bool>,
}

impl ServiceHealth {
    #[must_use]
    pub fn is_healthy(&self) -> bool {
        self.container == ContainerState::Running && self.port_open == Some(true)
    }
}

/// One line of `docker ps --format '{{json .}}'`.
#[derive(Debug, Deserialize)]
pub struct PsEntry {
    #[serde(rename = "Names")]
    pub names: String,
    #[serde(default, rename = "State")]
    pub state: String,
}

/// Parse `docker ps` JSON-lines output. Blank lines are skipped.
pub fn parse_ps(output: &str) -> LaunchResult<Vec<PsEntry>> {
    output
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| serde_json::from_str::<PsEntry>(l).map_err(LaunchError::from))
        .collect()
}

impl PsEntry {
    /// Older runtimes omit `State`; `docker ps` only lists live
    /// containers, so a missing state counts as running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state.is_empty() || self.state == "running"
    }
}

/// State of the container whose name contains `name`. A running match
/// wins over any other listed match.
pub fn container_state(runner: &dyn Runner, name: &str) -> ContainerState {
    let filter = format!("name={name}");
    let listing = runner
        .capture("docker", &["ps", "--filter", &filter, "--format", "{{json .}}"], None)
        .and_then(|out| parse_ps(&out));

    let entries = match listing {
        Ok(entries) => entries,
        Err(e) => return ContainerState::Unknown(e.to_string()),
    };

    let mut matching = entries.iter().filter(|e| e.names.contains(name)).peekable();
    let Some(first) = matching.peek().map(|e| e.state.clone()) else {
        return ContainerState::NotFound;
    };
    if matching.any(PsEntry::is_running) {
        ContainerState::Running
    } else {
        ContainerState::NotRunning(first)
    }
}

/// One connect attempt against the loopback interface.
#[must_use]
pub fn port_open(port: u16) -> bool {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT).is_ok()
}

/// Report on every target. Purely diagnostic: nothing here fails the
/// run.
pub fn check_services(runner: &dyn Runner, targets: &[(String, u16)]) -> Vec<ServiceHealth> {
    info!("Checking service health:");

    targets
        .iter()
        .map(|(name, port)| {
            let container = container_state(runner, name);
            let port_open = match &container {
                ContainerState::Running => {
                    info!("{name} container is running");
                    let open = port_open(*port);
                    if open {
                        info!("  port {port} is responding");
                    } else {
                        warn!("  port {port} not yet ready (may need more time)");
                    }
                    Some(open)
                }
                ContainerState::NotRunning(state) => {
                    warn!("{name} container is {state}");
                    None
                }
                ContainerState::NotFound => {
                    warn!("{name} container not found");
                    None
                }
                ContainerState::Unknown(reason) => {
                    warn!("Error checking {name}: {reason}");
                    None
                }
            };

            ServiceHealth {
                name: name.clone(),
                port: *port,
                container,
                port_open,
            }
        })
        .collect()
}
