use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::Config;

/// Start the AI stack for plain HTTP access on the local network.
///
/// With no flags the fixed sequence runs against `./.env` and
/// `./docker-compose.local.yml`.
#[derive(Debug, Parser)]
#[command(name = "localkit")]
#[command(about = "Local network startup for the AI service stack")]
pub struct Cli {
    /// Directory containing the root .env and compose files
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Root environment file (defaults to <root>/.env)
    #[arg(long)]
    pub env_file: Option<PathBuf>,

    /// Compose project name shared by every service
    #[arg(long, default_value = "localai")]
    pub project: String,

    /// Primary compose document, relative to the root
    #[arg(long, default_value = "docker-compose.local.yml")]
    pub compose_file: String,

    /// Continue without asking when ports are already in use
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Skip the final health report
    #[arg(long)]
    pub skip_health: bool,

    /// Seconds to wait for a subsystem database to accept connections
    #[arg(long, default_value_t = 30)]
    pub db_timeout: u64,

    /// Seconds to pause after each optional subsystem starts
    #[arg(long, default_value_t = 10)]
    pub settle: u64,

    /// Seconds to pause before checking service health
    #[arg(long, default_value_t = 10)]
    pub health_delay: u64,
}

impl Cli {
    #[must_use]
    pub fn into_config(self) -> Config {
        let mut config = Config::new(self.root)
            .project(&self.project)
            .primary_compose(&self.compose_file)
            .db_timeout(Duration::from_secs(self.db_timeout))
            .subsystem_settle(Duration::from_secs(self.settle))
            .health_delay(Duration::from_secs(self.health_delay));

        if let Some(env_file) = self.env_file {
            config = config.env_file(env_file);
        }
        if self.yes {
            config = config.assume_yes();
        }
        if self.skip_health {
            config = config.skip_health();
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_flags_match_defaults() {
        let config = Cli::parse_from(["localkit"]).into_config();
        let defaults = Config::new(".");

        assert_eq!(config.root, defaults.root);
        assert_eq!(config.env_file, defaults.env_file);
        assert_eq!(config.project, defaults.project);
        assert_eq!(config.primary_compose, defaults.primary_compose);
        assert_eq!(config.db_timeout, defaults.db_timeout);
        assert_eq!(config.subsystem_settle, defaults.subsystem_settle);
        assert_eq!(config.health_delay, defaults.health_delay);
        assert!(!config.assume_yes);
    }

    #[test]
    fn flags_override() {
        let config = Cli::parse_from([
            "localkit",
            "--root",
            "/srv/stack",
            "--env-file",
            "/etc/stack.env",
            "-y",
            "--settle",
            "0",
        ])
        .into_config();

        assert_eq!(config.root, PathBuf::from("/srv/stack"));
        assert_eq!(config.env_file, PathBuf::from("/etc/stack.env"));
        assert!(config.assume_yes);
        assert_eq!(config.subsystem_settle, Duration::ZERO);
    }
}
