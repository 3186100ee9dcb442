//! Bring up a multi-service AI compose stack for plain HTTP access on
//! a local network.
//!
//! `localkit` replaces a domain/TLS deployment with one that serves
//! every service on `localhost:<port>`: no reverse proxy, no
//! certificates. It reads the root `.env`, optionally fetches the
//! Supabase and Dify repositories, rewrites their env files for
//! HTTP-only use, tears down the previous deployment and starts
//! everything again in dependency order.
//!
//! # Stages
//!
//! A [`Launcher`] runs, strictly in order:
//!
//! 1. **Conflict check** - bound ports in 8000-8099, with a
//!    confirmation prompt ([`conflict`])
//! 2. **Profiles** - which optional subsystems `COMPOSE_PROFILES`
//!    enables ([`profile`])
//! 3. **Fetch** - sparse clone or pull of each enabled subsystem
//!    ([`repo`])
//! 4. **Env templating** - subsystem `.env` derived from its example
//!    file ([`template`], [`subsystem`])
//! 5. **Lifecycle** - teardown, subsystem databases first, then the
//!    rest, then the main stack ([`lifecycle`])
//! 6. **Port patch** - Supabase's Kong republished on 8100 ([`patch`])
//! 7. **Health** - container and port report ([`health`])
//!
//! Only a failed repository fetch, an unreadable root `.env` or a
//! declined conflict prompt stop the run; every other failure is
//! logged and the next stage runs (see [`error::Severity`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use localkit::{Config, Launcher};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::new("/srv/ai-stack").assume_yes();
//!     let launcher = Launcher::from_config(config)?;
//!
//!     let stdin = std::io::stdin();
//!     let report = launcher.run(&mut stdin.lock(), &mut std::io::stderr())?;
//!
//!     for service in report.health.iter().filter(|h| !h.is_healthy()) {
//!         eprintln!("{} is not answering on {}", service.name, service.port);
//!     }
//!     Ok(())
//! }
//! ```

// Allow noisy pedantic lints that don't add value for a
// deployment tool crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod cli;
pub mod cmd;
pub mod compose;
pub mod config;
pub mod conflict;
pub mod env;
pub mod error;
pub mod health;
pub mod launcher;
pub mod lifecycle;
pub mod patch;
pub mod profile;
pub mod repo;
pub mod searxng;
pub mod subsystem;
pub mod template;

pub use cmd::{Runner, SystemRunner};
pub use config::Config;
pub use env::RootEnv;
pub use error::{LaunchError, LaunchResult, Severity};
pub use launcher::{Launcher, Report};
pub use patch::PortOverride;
pub use repo::RepoSpec;
pub use subsystem::Subsystem;
pub use template::{EnvTemplate, Rule};
