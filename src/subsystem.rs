use std::path::{Path, PathBuf};

use crate::patch::PortOverride;
use crate::repo::RepoSpec;
use crate::template::{EnvTemplate, Rule};

/// Address every Supabase URL is rewritten to.
pub const SUPABASE_PUBLIC_URL: &str = "http://localhost:8100";
pub const SUPABASE_PORT: u16 = 8100;
pub const DIFY_PORT: u16 = 8101;

/// An optional third-party stack pulled in from its own repository
/// and started under the shared project name.
#[derive(Debug, Clone)]
pub struct Subsystem {
    /// `COMPOSE_PROFILES` token that enables this subsystem.
    pub profile: String,
    pub label: String,
    pub repo: RepoSpec,
    /// Directory holding the compose file and env templates.
    pub docker_dir: String,
    pub compose_file: String,
    /// Example env files, first existing wins.
    pub templates: Vec<String>,
    pub env: EnvTemplate,
    /// Service that must accept connections before the rest starts.
    pub dependency: String,
    /// SQL run against the dependency after it is ready.
    pub bootstrap_sql: Option<String>,
    pub port_patch: Option<(String, PortOverride)>,
    /// `(container name fragment, host port)` reported by the health
    /// check.
    pub health_target: (String, u16),
}

impl Subsystem {
    /// Supabase: database, auth and gateway, published through Kong on
    /// port 8100.
    #[must_use]
    pub fn supabase() -> Self {
        let env = EnvTemplate::new()
            .rule(Rule::from_root("POSTGRES_PASSWORD", "POSTGRES_PASSWORD"))
            .rule(Rule::from_root("JWT_SECRET", "JWT_SECRET"))
            .rule(Rule::from_root("ANON_KEY", "ANON_KEY"))
            .rule(Rule::from_root("SERVICE_ROLE_KEY", "SERVICE_ROLE_KEY"))
            .rule(Rule::literal("DASHBOARD_USERNAME", "admin"))
            .rule(Rule::from_root_or(
                "DASHBOARD_PASSWORD",
                "DASHBOARD_PASSWORD",
                "admin123",
            ))
            .rule(Rule::literal("SITE_URL", SUPABASE_PUBLIC_URL))
            .rule(Rule::literal("API_EXTERNAL_URL", SUPABASE_PUBLIC_URL))
            .rule(Rule::literal("SUPABASE_PUBLIC_URL", SUPABASE_PUBLIC_URL));

        let kong = PortOverride::new("kong", SUPABASE_PORT, 8000)
            .env("KONG_PROXY_LISTEN", "0.0.0.0:8000");

        Self {
            profile: "supabase".to_string(),
            label: "Supabase".to_string(),
            repo: RepoSpec::new(
                "Supabase",
                "supabase",
                "https://github.com/supabase/supabase.git",
            )
            .branch("master"),
            docker_dir: "supabase/docker".to_string(),
            compose_file: "supabase/docker/docker-compose.yml".to_string(),
            templates: vec![".env.example".to_string()],
            env,
            dependency: "db".to_string(),
            bootstrap_sql: None,
            port_patch: Some(("supabase-local-override.yml".to_string(), kong)),
            health_target: ("kong".to_string(), SUPABASE_PORT),
        }
    }

    /// Dify: LLM workflow platform behind its own nginx on port 8101,
    /// TLS port disabled and CORS open for local use.
    #[must_use]
    pub fn dify() -> Self {
        let port = DIFY_PORT.to_string();
        let env = EnvTemplate::new()
            .rule(Rule::from_root("SECRET_KEY", "DIFY_SECRET_KEY"))
            .rule(Rule::literal("EXPOSE_NGINX_PORT", &port).ensured())
            .rule(Rule::blank("EXPOSE_NGINX_SSL_PORT"))
            .rule(Rule::literal("WEB_API_CORS_ALLOW_ORIGINS", "*").ensured())
            .rule(Rule::literal("CONSOLE_CORS_ALLOW_ORIGINS", "*").ensured());

        Self {
            profile: "dify".to_string(),
            label: "Dify".to_string(),
            repo: RepoSpec::new("Dify", "dify", "https://github.com/langgenius/dify.git"),
            docker_dir: "dify/docker".to_string(),
            compose_file: "dify/docker/docker-compose.yaml".to_string(),
            templates: vec!["env.example".to_string(), ".env.example".to_string()],
            env,
            dependency: "db".to_string(),
            bootstrap_sql: Some("CREATE DATABASE dify_plugin;".to_string()),
            port_patch: None,
            health_target: ("nginx".to_string(), DIFY_PORT),
        }
    }

    /// Both optional subsystems in startup order.
    #[must_use]
    pub fn all() -> Vec<Self> {
        vec![Self::supabase(), Self::dify()]
    }

    #[must_use]
    pub fn template_candidates(&self, root: &Path) -> Vec<PathBuf> {
        let dir = root.join(&self.docker_dir);
        self.templates.iter().map(|t| dir.join(t)).collect()
    }

    #[must_use]
    pub fn env_output(&self, root: &Path) -> PathBuf {
        root.join(&self.docker_dir).join(".env")
    }
}
