use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

/// Containers checked after startup, by name fragment and host port.
pub const DEFAULT_HEALTH_TARGETS: [(&str, u16); 5] = [
    ("n8n", 8000),
    ("postgres", 8001),
    ("redis", 8002),
    ("flowise", 8022),
    ("grafana", 8003),
];

/// Everything the launch sequence needs besides the root `.env`.
///
/// # Example
///
/// ```
/// use localkit::Config;
///
/// let config = Config::new("/srv/stack").project("lab").assume_yes();
///
/// assert_eq!(config.project, "lab");
/// assert_eq!(config.primary_compose, "docker-compose.local.yml");
/// assert!(config.assume_yes);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the root `.env` and compose files. All
    /// relative paths resolve against it.
    pub root: PathBuf,
    pub env_file: PathBuf,
    pub project: String,
    pub primary_compose: String,
    pub conflict_range: RangeInclusive<u16>,
    pub assume_yes: bool,
    pub db_timeout: Duration,
    pub db_poll_interval: Duration,
    /// Pause after each optional subsystem is started.
    pub subsystem_settle: Duration,
    /// Pause before the health report.
    pub health_delay: Duration,
    pub skip_health: bool,
    pub health_targets: Vec<(String, u16)>,
}

impl Config {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            env_file: root.join(".env"),
            root,
            project: "localai".to_string(),
            primary_compose: "docker-compose.local.yml".to_string(),
            conflict_range: 8000..=8099,
            assume_yes: false,
            db_timeout: Duration::from_secs(30),
            db_poll_interval: Duration::from_secs(1),
            subsystem_settle: Duration::from_secs(10),
            health_delay: Duration::from_secs(10),
            skip_health: false,
            health_targets: DEFAULT_HEALTH_TARGETS
                .iter()
                .map(|(n, p)| ((*n).to_string(), *p))
                .collect(),
        }
    }

    #[must_use]
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    #[must_use]
    pub fn project(mut self, name: &str) -> Self {
        self.project = name.to_string();
        self
    }

    #[must_use]
    pub fn primary_compose(mut self, path: &str) -> Self {
        self.primary_compose = path.to_string();
        self
    }

    #[must_use]
    pub const fn assume_yes(mut self) -> Self {
        self.assume_yes = true;
        self
    }

    #[must_use]
    pub const fn skip_health(mut self) -> Self {
        self.skip_health = true;
        self
    }

    #[must_use]
    pub const fn db_timeout(mut self, timeout: Duration) -> Self {
        self.db_timeout = timeout;
        self
    }

    #[must_use]
    pub const fn db_poll_interval(mut self, interval: Duration) -> Self {
        self.db_poll_interval = interval;
        self
    }

    #[must_use]
    pub const fn subsystem_settle(mut self, delay: Duration) -> Self {
        self.subsystem_settle = delay;
        self
    }

    #[must_use]
    pub const fn health_delay(mut self, delay: Duration) -> Self {
        self.health_delay = delay;
        self
    }

    #[must_use]
    pub fn health_targets(mut self, targets: Vec<(String, u16)>) -> Self {
        self.health_targets = targets;
        self
    }
}
