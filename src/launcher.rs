use std::collections::BTreeSet;
use std::io::{BufRead, Write};
use std::thread;

use tracing::{info, warn};

use crate::cmd::{Runner, SystemRunner};
use crate::config::Config;
use crate::conflict;
use crate::env::RootEnv;
use crate::error::LaunchResult;
use crate::health::{self, ServiceHealth};
use crate::lifecycle::{self, Readiness, TeardownOutcome};
use crate::patch;
use crate::repo;
use crate::searxng;
use crate::subsystem::Subsystem;

/// Pass a step result through the fatal/advisory split: fatal errors
/// propagate, advisory ones are logged and turned into `None`.
pub fn tolerate<T>(step: &str, result: LaunchResult<T>) -> LaunchResult<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!("{step} failed: {e}");
            Ok(None)
        }
    }
}

/// What a completed run did.
#[derive(Debug)]
pub struct Report {
    pub busy_ports: BTreeSet<u16>,
    /// Profiles of the optional subsystems that were started.
    pub subsystems: Vec<String>,
    pub teardown: TeardownOutcome,
    pub health: Vec<ServiceHealth>,
}

/// The fixed local-network startup sequence.
pub struct Launcher {
    config: Config,
    env: RootEnv,
    runner: Box<dyn Runner>,
    subsystems: Vec<Subsystem>,
}

impl Launcher {
    #[must_use]
    pub fn new(config: Config, env: RootEnv) -> Self {
        Self {
            config,
            env,
            runner: Box::new(SystemRunner),
            subsystems: Subsystem::all(),
        }
    }

    /// Load the root environment file named by `config`. An unreadable
    /// file leaves the environment empty.
    pub fn from_config(config: Config) -> LaunchResult<Self> {
        let env = tolerate("loading root environment", RootEnv::load(&config.env_file))?
            .unwrap_or_default();
        Ok(Self::new(config, env))
    }

    #[must_use]
    pub fn runner(mut self, runner: impl Runner + 'static) -> Self {
        self.runner = Box::new(runner);
        self
    }

    #[must_use]
    pub fn enabled_subsystems(&self) -> Vec<&Subsystem> {
        let profiles = self.env.profiles();
        self.subsystems
            .iter()
            .filter(|s| profiles.is_enabled(&s.profile))
            .collect()
    }

    /// Run every stage in order. `input`/`output` carry the port
    /// conflict prompt.
    pub fn run(&self, input: &mut dyn BufRead, output: &mut dyn Write) -> LaunchResult<Report> {
        info!("AI stack - local network startup");

        let runner = self.runner.as_ref();
        let root = self.config.root.as_path();
        let project = self.config.project.as_str();
        let primary = self.config.primary_compose.as_str();

        let busy_ports = conflict::check(
            runner,
            &self.config.conflict_range,
            self.config.assume_yes,
            input,
            output,
        )?;

        let enabled = self.enabled_subsystems();

        for subsystem in &enabled {
            repo::ensure_repo(runner, root, true, &subsystem.repo)?;
            let rendered = subsystem.env.render_env(
                &subsystem.template_candidates(root),
                &subsystem.env_output(root),
                &self.env,
            );
            if tolerate(&format!("{} env preparation", subsystem.label), rendered)?.is_some() {
                info!("{} .env prepared for local network (HTTP only)", subsystem.label);
            }
        }

        tolerate("SearXNG configuration", searxng::prepare(runner, root))?;

        let mut documents = vec![primary];
        documents.extend(self.subsystems.iter().map(|s| s.compose_file.as_str()));
        let teardown = lifecycle::teardown(runner, root, project, &documents, primary);

        let readiness = Readiness::postgres(self.config.db_timeout, self.config.db_poll_interval);
        for subsystem in &enabled {
            let started = lifecycle::start_subsystem(runner, root, project, subsystem, &readiness);
            let started = tolerate(&format!("starting {}", subsystem.label), started)?;

            if let (Some(()), Some((file, port_override))) = (started, &subsystem.port_patch) {
                let remapped = patch::remap_port(
                    runner,
                    root,
                    project,
                    &subsystem.compose_file,
                    file,
                    port_override,
                );
                tolerate(&format!("{} port override", port_override.service), remapped)?;
            }

            info!("Waiting for {} to initialize...", subsystem.label);
            thread::sleep(self.config.subsystem_settle);
        }

        tolerate(
            "starting main services",
            lifecycle::start_main(runner, root, project, primary),
        )?;

        let health = if self.config.skip_health {
            Vec::new()
        } else {
            info!("Waiting for services to initialize...");
            thread::sleep(self.config.health_delay);

            let mut targets = self.config.health_targets.clone();
            targets.extend(enabled.iter().map(|s| s.health_target.clone()));
            health::check_services(runner, &targets)
        };

        info!("Local network service startup completed!");

        Ok(Report {
            busy_ports,
            subsystems: enabled.iter().map(|s| s.profile.clone()).collect(),
            teardown,
            health,
        })
    }
}
