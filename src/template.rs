//! Derive a subsystem `.env` from its example file.
//!
//! Templates are rewritten line by line: a line `KEY=...` whose key has
//! a [`Rule`] gets the rule's value, everything else passes through
//! verbatim. The output is fully regenerated on every run, so edits
//! made by hand to a generated file do not survive.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::env::RootEnv;
use crate::error::{LaunchError, LaunchResult};

/// Where a rewritten value comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Replacement {
    /// A fixed local-network value.
    Literal(String),
    /// The root environment's value for `key`, or `default` when unset.
    FromRoot { key: String, default: String },
    /// An empty value, which disables the setting.
    Blank,
}

impl Replacement {
    #[must_use]
    pub fn resolve(&self, root: &RootEnv) -> String {
        match self {
            Self::Literal(value) => value.clone(),
            Self::FromRoot { key, default } => root.get_or(key, default).to_string(),
            Self::Blank => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub key: String,
    pub replacement: Replacement,
    /// Append `KEY=value` when no template line carried the key.
    pub ensure: bool,
}

impl Rule {
    #[must_use]
    pub fn literal(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            replacement: Replacement::Literal(value.to_string()),
            ensure: false,
        }
    }

    #[must_use]
    pub fn from_root(key: &str, root_key: &str) -> Self {
        Self::from_root_or(key, root_key, "")
    }

    #[must_use]
    pub fn from_root_or(key: &str, root_key: &str, default: &str) -> Self {
        Self {
            key: key.to_string(),
            replacement: Replacement::FromRoot {
                key: root_key.to_string(),
                default: default.to_string(),
            },
            ensure: false,
        }
    }

    #[must_use]
    pub fn blank(key: &str) -> Self {
        Self {
            key: key.to_string(),
            replacement: Replacement::Blank,
            ensure: false,
        }
    }

    #[must_use]
    pub const fn ensured(mut self) -> Self {
        self.ensure = true;
        self
    }

    fn matches(&self, line: &str) -> bool {
        line.strip_prefix(self.key.as_str())
            .is_some_and(|rest| rest.starts_with('='))
    }
}

/// An ordered rule list; the first matching rule wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvTemplate {
    pub rules: Vec<Rule>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOutcome {
    pub template: PathBuf,
    pub output: PathBuf,
}

impl EnvTemplate {
    #[must_use]
    pub const fn new() -> Self {
        Self { rules: Vec::new() }
    }

    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rewrite `template`. Lines no rule touches are copied byte for
    /// byte, line endings included; rewritten lines keep their original
    /// ending. Ensured keys missing from the template are appended.
    #[must_use]
    pub fn render_str(&self, template: &str, root: &RootEnv) -> String {
        let mut matched = vec![false; self.rules.len()];
        let mut out = String::with_capacity(template.len());

        for line in template.split_inclusive('\n') {
            let body = line.trim_end_matches(['\r', '\n']);
            match self.rules.iter().position(|r| r.matches(body)) {
                Some(i) => {
                    matched[i] = true;
                    let rule = &self.rules[i];
                    out.push_str(&format!("{}={}", rule.key, rule.replacement.resolve(root)));
                    out.push_str(&line[body.len()..]);
                }
                None => out.push_str(line),
            }
        }

        for (rule, seen) in self.rules.iter().zip(&matched) {
            if rule.ensure && !seen {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&format!("{}={}\n", rule.key, rule.replacement.resolve(root)));
            }
        }

        out
    }

    /// Render the first existing file of `candidates` into `output`,
    /// overwriting it.
    ///
    /// A missing template or a missing output directory is reported
    /// as [`LaunchError::FileNotFound`] and nothing is written.
    pub fn render_env(
        &self,
        candidates: &[PathBuf],
        output: &Path,
        root: &RootEnv,
    ) -> LaunchResult<RenderOutcome> {
        if let Some(dir) = output.parent()
            && !dir.as_os_str().is_empty()
            && !dir.is_dir()
        {
            return Err(LaunchError::FileNotFound(format!(
                "output directory {} does not exist",
                dir.display()
            )));
        }

        let template = candidates.iter().find(|p| p.is_file()).ok_or_else(|| {
            let names: Vec<String> = candidates.iter().map(|p| p.display().to_string()).collect();
            LaunchError::FileNotFound(format!("no env template among {}", names.join(", ")))
        })?;

        info!("Creating {} from {}...", output.display(), template.display());
        let content = std::fs::read_to_string(template)?;
        std::fs::write(output, self.render_str(&content, root))?;

        Ok(RenderOutcome {
            template: template.clone(),
            output: output.to_path_buf(),
        })
    }
}
