//! Generator configuration.
//!
//! Everything here has a production default; the CLI only overrides what the
//! caller passes explicitly.

/// Directory the collector's secrets are mounted under, one subdirectory per secret.
pub const DEFAULT_SECRETS_DIR: &str = "/var/run/ocp-collector/secrets";

/// Audit files older than this are skipped on restart.
pub const DEFAULT_AUDIT_IGNORE_OLDER_SECS: u64 = 600;

/// How secret values that end up in the config are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecretRendering {
    /// Environment references (`${SECRET_<NAME>_<KEY>}`) resolved by the agent.
    #[default]
    Indirect,
    /// The secret value itself. Meant for fixtures and tests.
    Inline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub secret_rendering: SecretRendering,
    pub secrets_dir: String,
    pub audit_ignore_older_secs: u64,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            secret_rendering: SecretRendering::default(),
            secrets_dir: DEFAULT_SECRETS_DIR.to_string(),
            audit_ignore_older_secs: DEFAULT_AUDIT_IGNORE_OLDER_SECS,
        }
    }
}

impl GeneratorOptions {
    /// Options for golden fixtures: secret values are written inline.
    pub fn inline() -> Self {
        Self {
            secret_rendering: SecretRendering::Inline,
            ..Self::default()
        }
    }

    /// Mount path of `key` inside secret `secret`.
    pub fn secret_path(&self, secret: &str, key: &str) -> String {
        format!("{}/{}/{}", self.secrets_dir.trim_end_matches('/'), secret, key)
    }
}
