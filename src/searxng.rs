use std::path::Path;

use tracing::{info, warn};

use crate::cmd::Runner;
use crate::error::{LaunchError, LaunchResult};

pub const SETTINGS: &str = "searxng/settings.yml";
pub const SETTINGS_BASE: &str = "searxng/settings-base.yml";
pub const BASE_URL: &str = "http://127.0.0.1:8089";

const SECRET_PLACEHOLDER: &str = "ultrasecretkey";

/// Replace the secret placeholder and point `base_url` at the local
/// listener.
#[must_use]
pub fn configure(settings: &str, secret: &str) -> String {
    settings
        .replace(SECRET_PLACEHOLDER, secret)
        .replace("base_url: false", &format!("base_url: '{BASE_URL}'"))
}

/// Create `settings.yml` from the base file when missing, then give it
/// a fresh secret and the local base URL.
///
/// Returns `Ok(false)` when there are no settings files at all.
pub fn prepare(runner: &dyn Runner, root: &Path) -> LaunchResult<bool> {
    info!("Configuring SearXNG for local network...");

    let settings = root.join(SETTINGS);
    let base = root.join(SETTINGS_BASE);

    if !settings.exists() && base.exists() {
        info!("Creating SearXNG settings.yml from base...");
        std::fs::copy(&base, &settings)?;
    }

    if !settings.exists() {
        warn!("SearXNG settings files not found");
        return Ok(false);
    }

    let secret = runner.capture("openssl", &["rand", "-hex", "32"], None)?;
    if secret.is_empty() {
        return Err(LaunchError::Other("openssl produced an empty secret".into()));
    }

    let content = std::fs::read_to_string(&settings)?;
    std::fs::write(&settings, configure(&content, &secret))?;

    info!("SearXNG configured for local network access");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_secret_and_base_url() {
        let input = "server:\n  secret_key: \"ultrasecretkey\"\n  base_url: false\n";
        let out = configure(input, "abc123");
        assert_eq!(
            out,
            "server:\n  secret_key: \"abc123\"\n  base_url: 'http://127.0.0.1:8089'\n"
        );
    }

    #[test]
    fn configured_settings_are_left_alone() {
        let input = "server:\n  secret_key: \"f00\"\n  base_url: 'http://127.0.0.1:8089'\n";
        assert_eq!(configure(input, "other"), input);
    }
}
