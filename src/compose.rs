use std::path::Path;

use docker_compose_types::{Compose, Environment, Ports, Service, Services};
use indexmap::IndexMap;

use crate::cmd::Runner;
use crate::error::LaunchResult;

/// Render a minimal override document that replaces the published
/// ports of `service` and adds environment entries to it.
pub fn render_override(
    service: &str,
    ports: &[String],
    environment: &[(String, String)],
) -> LaunchResult<String> {
    let environment = if environment.is_empty() {
        Environment::default()
    } else {
        Environment::List(environment.iter().map(|(k, v)| format!("{k}={v}")).collect())
    };

    let mut services = IndexMap::new();
    services.insert(
        service.to_string(),
        Some(Service {
            ports: Ports::Short(ports.to_vec()),
            environment,
            ..Default::default()
        }),
    );

    let compose = Compose {
        services: Services(services),
        ..Default::default()
    };

    Ok(serde_yaml::to_string(&compose)?)
}

/// `docker compose` invocations scoped to one project name and an
/// ordered list of layered compose files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    pub name: String,
    pub files: Vec<String>,
    pub profiles: Vec<String>,
}

impl ComposeProject {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            files: Vec::new(),
            profiles: Vec::new(),
        }
    }

    #[must_use]
    pub fn file(mut self, path: &str) -> Self {
        self.files.push(path.to_string());
        self
    }

    #[must_use]
    pub fn profile(mut self, profile: &str) -> Self {
        self.profiles.push(profile.to_string());
        self
    }

    /// Arguments for `docker` ending with `directive`.
    #[must_use]
    pub fn args(&self, directive: &[&str]) -> Vec<String> {
        let mut args = vec!["compose".to_string(), "-p".to_string(), self.name.clone()];
        for file in &self.files {
            args.push("-f".to_string());
            args.push(file.clone());
        }
        for profile in &self.profiles {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        args.extend(directive.iter().map(|d| (*d).to_string()));
        args
    }

    pub fn down(&self, runner: &dyn Runner, cwd: &Path) -> LaunchResult<()> {
        self.stream(runner, cwd, &["down"])
    }

    /// `up -d`, limited to `services` when non-empty.
    pub fn up(&self, runner: &dyn Runner, cwd: &Path, services: &[&str]) -> LaunchResult<()> {
        let mut directive = vec!["up", "-d"];
        directive.extend_from_slice(services);
        self.stream(runner, cwd, &directive)
    }

    pub fn build(&self, runner: &dyn Runner, cwd: &Path) -> LaunchResult<()> {
        self.stream(runner, cwd, &["build", "--pull"])
    }

    pub fn stop(&self, runner: &dyn Runner, cwd: &Path, service: &str) -> LaunchResult<()> {
        self.stream(runner, cwd, &["stop", service])
    }

    /// Run `command` inside the running `service` container without a
    /// TTY and capture its output.
    pub fn exec(
        &self,
        runner: &dyn Runner,
        cwd: &Path,
        service: &str,
        command: &[&str],
    ) -> LaunchResult<String> {
        let mut directive = vec!["exec", "-T", service];
        directive.extend_from_slice(command);
        let args = self.args(&directive);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        runner.capture("docker", &refs, Some(cwd))
    }

    fn stream(&self, runner: &dyn Runner, cwd: &Path, directive: &[&str]) -> LaunchResult<()> {
        let args = self.args(directive);
        let refs: Vec<&str> = args.iter().map(String::as_str).collect();
        runner.stream("docker", &refs, Some(cwd))
    }
}
