use std::path::Path;
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cmd::Runner;
use crate::compose::ComposeProject;
use crate::error::{LaunchError, LaunchResult};
use crate::profile::all_profiles;
use crate::subsystem::Subsystem;

/// How to decide that a dependency service accepts connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Sleep unconditionally.
    Fixed(Duration),
    /// Run `command` inside the service until it succeeds, at most
    /// until `timeout` has been spent in `interval` steps.
    Probe {
        command: Vec<String>,
        timeout: Duration,
        interval: Duration,
    },
}

impl Readiness {
    /// `pg_isready` against the local postgres superuser.
    #[must_use]
    pub fn postgres(timeout: Duration, interval: Duration) -> Self {
        Self::Probe {
            command: ["pg_isready", "-U", "postgres"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            timeout,
            interval,
        }
    }
}

#[derive(Debug)]
pub enum TeardownOutcome {
    NothingToStop,
    Stopped,
    /// `down` failed, typically because nothing was running.
    Tolerated(LaunchError),
}

/// Bring down everything under `project` in one `down` covering every
/// compose document that exists on disk, with every profile declared
/// by `primary` enabled so profile-gated services are included.
///
/// Never fails: a failed `down` is logged and returned as
/// [`TeardownOutcome::Tolerated`].
pub fn teardown(
    runner: &dyn Runner,
    root: &Path,
    project: &str,
    documents: &[&str],
    primary: &str,
) -> TeardownOutcome {
    info!("Stopping and removing existing containers for project '{project}'...");

    let existing: Vec<&str> = documents
        .iter()
        .copied()
        .filter(|d| root.join(d).is_file())
        .collect();
    if existing.is_empty() {
        info!("No compose files found, nothing to stop");
        return TeardownOutcome::NothingToStop;
    }

    let profiles = all_profiles(&root.join(primary)).unwrap_or_else(|e| {
        warn!("Could not read profiles from {primary}: {e}");
        Default::default()
    });

    let mut compose = ComposeProject::new(project);
    for doc in existing {
        compose = compose.file(doc);
    }
    for profile in &profiles {
        compose = compose.profile(profile);
    }

    match compose.down(runner, root) {
        Ok(()) => TeardownOutcome::Stopped,
        Err(e) => {
            warn!("Some containers may not have been running: {e}");
            TeardownOutcome::Tolerated(e)
        }
    }
}

/// Block until `service` is ready according to `readiness`.
pub fn wait_ready(
    runner: &dyn Runner,
    root: &Path,
    compose: &ComposeProject,
    service: &str,
    readiness: &Readiness,
) -> LaunchResult<()> {
    match readiness {
        Readiness::Fixed(delay) => {
            info!("Waiting {}s for {service}...", delay.as_secs());
            thread::sleep(*delay);
            Ok(())
        }
        Readiness::Probe {
            command,
            timeout,
            interval,
        } => {
            let attempts = probe_attempts(*timeout, *interval);
            let command: Vec<&str> = command.iter().map(String::as_str).collect();

            info!("Waiting for {service} to accept connections...");
            for attempt in 1..=attempts {
                match compose.exec(runner, root, service, &command) {
                    Ok(_) => {
                        info!("{service} is ready");
                        return Ok(());
                    }
                    Err(e) => debug!("{service} not ready ({attempt}/{attempts}): {e}"),
                }
                if attempt < attempts {
                    thread::sleep(*interval);
                }
            }

            Err(LaunchError::NotReady {
                service: service.to_string(),
                attempts,
            })
        }
    }
}

fn probe_attempts(timeout: Duration, interval: Duration) -> u32 {
    timeout
        .as_nanos()
        .checked_div(interval.as_nanos())
        .map_or(1, |steps| u32::try_from(steps).unwrap_or(u32::MAX).max(1))
}

/// Start `subsystem`: its dependency first, then, once ready (or once
/// the wait gave up), the bootstrap SQL and the rest of its services.
pub fn start_subsystem(
    runner: &dyn Runner,
    root: &Path,
    project: &str,
    subsystem: &Subsystem,
    readiness: &Readiness,
) -> LaunchResult<()> {
    info!("Starting {} services for local network...", subsystem.label);

    let compose = ComposeProject::new(project).file(&subsystem.compose_file);
    let dependency = subsystem.dependency.as_str();

    compose.up(runner, root, &[dependency])?;

    if let Err(e) = wait_ready(runner, root, &compose, dependency, readiness) {
        warn!("{e}, starting {} anyway", subsystem.label);
    }

    if let Some(sql) = &subsystem.bootstrap_sql {
        match compose.exec(runner, root, dependency, &["psql", "-U", "postgres", "-c", sql]) {
            Ok(_) => info!("Ran bootstrap SQL: {sql}"),
            Err(e) => warn!("Bootstrap SQL failed, objects may already exist: {e}"),
        }
    }

    info!("Starting remaining {} services...", subsystem.label);
    compose.up(runner, root, &[])?;

    info!("{} started", subsystem.label);
    Ok(())
}

/// Build then start the primary compose document. A failed build is
/// tolerated; the existing images are used.
pub fn start_main(
    runner: &dyn Runner,
    root: &Path,
    project: &str,
    primary: &str,
) -> LaunchResult<()> {
    info!("Starting main services for local network...");

    let compose = ComposeProject::new(project).file(primary);

    info!("Building services and checking for updates...");
    if let Err(e) = compose.build(runner, root) {
        warn!("Build step failed, continuing with existing images: {e}");
    }

    compose.up(runner, root, &[])?;

    info!("Main services started");
    Ok(())
}
