//! Authentication strategies for sinks.
//!
//! A strategy is chosen once per output by [`select_strategy`], purely from
//! which secret keys are present, walking the sink type's precedence list.
//! Each strategy body is its own element, named after the secret it reads,
//! so outputs sharing a secret share the body.

use crate::Result;
use crate::element::{Element, toml_string};
use crate::error::ConfError;
use crate::options::{GeneratorOptions, SecretRendering};
use crate::topology::secret::{
    CLIENT_CERT_KEY, CLIENT_PASSWORD, CLIENT_PRIVATE_KEY, CLIENT_USERNAME, CREDENTIALS_PATH,
    TRUSTED_CA_BUNDLE_KEY,
};
use crate::topology::secret::env_id;
use crate::topology::{Output, OutputType, Secret, Secrets, component_id};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthKind {
    MutualTls,
    Basic,
    CloudIam,
    NoAuth,
}

impl AuthKind {
    /// Keys that must all be present for the strategy to apply.
    pub fn required_keys(self) -> &'static [&'static str] {
        match self {
            AuthKind::MutualTls => &[CLIENT_CERT_KEY, CLIENT_PRIVATE_KEY],
            AuthKind::Basic => &[CLIENT_USERNAME, CLIENT_PASSWORD],
            AuthKind::CloudIam => &[CREDENTIALS_PATH],
            AuthKind::NoAuth => &[],
        }
    }
}

impl OutputType {
    /// Strategies this sink type supports, strongest first.
    pub fn auth_precedence(self) -> &'static [AuthKind] {
        match self {
            OutputType::Elasticsearch | OutputType::Loki | OutputType::Http => {
                &[AuthKind::MutualTls, AuthKind::Basic, AuthKind::NoAuth]
            }
            OutputType::GoogleCloudLogging => &[
                AuthKind::MutualTls,
                AuthKind::Basic,
                AuthKind::CloudIam,
                AuthKind::NoAuth,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthStrategy {
    NoAuth,
    MutualTls {
        secret: String,
        ca_bundle: bool,
    },
    Basic {
        secret: String,
        username: String,
        password: String,
    },
    CloudIam {
        secret: String,
        credentials_path: String,
    },
}

/// Pick the authentication strategy for `output`.
///
/// The first kind in the sink's precedence list with any of its keys present
/// wins; if that kind is only partially configured the output is rejected
/// rather than silently downgraded.
pub fn select_strategy(output: &Output, secrets: &Secrets) -> Result<AuthStrategy> {
    let Some(secret_name) = &output.secret else {
        return Ok(AuthStrategy::NoAuth);
    };
    let secret = secrets
        .get(secret_name)
        .ok_or_else(|| ConfError::MissingSecret {
            output: output.name.clone(),
            secret: secret_name.clone(),
        })?;

    for &kind in output.output_type.auth_precedence() {
        let required = kind.required_keys();
        if !required.iter().any(|key| secret.contains(key)) {
            continue;
        }
        if let Some(missing) = required.iter().find(|key| !secret.contains(key)) {
            return Err(ConfError::MissingSecretKey {
                output: output.name.clone(),
                secret: secret_name.clone(),
                key: *missing,
            });
        }

        let strategy = match kind {
            AuthKind::MutualTls => AuthStrategy::MutualTls {
                secret: secret_name.clone(),
                ca_bundle: secret.contains(TRUSTED_CA_BUNDLE_KEY),
            },
            AuthKind::Basic => AuthStrategy::Basic {
                secret: secret_name.clone(),
                username: text_value(output, secret, CLIENT_USERNAME)?,
                password: text_value(output, secret, CLIENT_PASSWORD)?,
            },
            AuthKind::CloudIam => AuthStrategy::CloudIam {
                secret: secret_name.clone(),
                credentials_path: text_value(output, secret, CREDENTIALS_PATH)?,
            },
            AuthKind::NoAuth => AuthStrategy::NoAuth,
        };
        debug!(output = %output.name, strategy = ?strategy.kind(), "selected auth strategy");
        return Ok(strategy);
    }

    debug!(output = %output.name, "no usable credentials, sink is unauthenticated");
    Ok(AuthStrategy::NoAuth)
}

fn text_value(output: &Output, secret: &Secret, key: &'static str) -> Result<String> {
    let bytes = secret.get(key).unwrap_or_default();
    String::from_utf8(bytes.to_vec()).map_err(|_| ConfError::InvalidSecretValue {
        output: output.name.clone(),
        key,
    })
}

const TLS_HEADER_TEMPLATE: &str = "
# TLS Config
[sinks.{{.id}}.tls]
{{>strategy}}";

const BASIC_HEADER_TEMPLATE: &str = "
# Basic Auth Config
[sinks.{{.id}}.auth]
{{>strategy}}";

const TLS_TEMPLATE: &str = "  crt_file = {{.crt_file}}
  key_file = {{.key_file}}";

const TLS_CA_TEMPLATE: &str = "  crt_file = {{.crt_file}}
  key_file = {{.key_file}}
  ca_file = {{.ca_file}}";

const BASIC_TEMPLATE: &str = r#"  strategy = "basic"
  user = {{.user}}
  password = {{.password}}"#;

const CLOUD_IAM_TEMPLATE: &str = "  credentials_path = {{.credentials_path}}";

const TRUSTED_CA_TEMPLATE: &str = "  ca_file = {{.ca_file}}";

// Strategy first: CloudIam keys belong to the sink table itself.
const WITH_TRUSTED_CA_TEMPLATE: &str = "{{>auth}}\n{{>tls}}";

impl AuthStrategy {
    pub fn kind(&self) -> AuthKind {
        match self {
            AuthStrategy::NoAuth => AuthKind::NoAuth,
            AuthStrategy::MutualTls { .. } => AuthKind::MutualTls,
            AuthStrategy::Basic { .. } => AuthKind::Basic,
            AuthStrategy::CloudIam { .. } => AuthKind::CloudIam,
        }
    }

    /// The strategy body, independent of which sink uses it.
    pub fn strategy_element(&self, options: &GeneratorOptions) -> Element {
        match self {
            AuthStrategy::NoAuth => Element::new("auth.none", ""),
            AuthStrategy::MutualTls { secret, ca_bundle } => {
                let template = if *ca_bundle { TLS_CA_TEMPLATE } else { TLS_TEMPLATE };
                let element = Element::new(format!("auth.tls.{}", secret), template)
                    .field(
                        "crt_file",
                        toml_string(&options.secret_path(secret, CLIENT_CERT_KEY)),
                    )
                    .field(
                        "key_file",
                        toml_string(&options.secret_path(secret, CLIENT_PRIVATE_KEY)),
                    );
                if *ca_bundle {
                    element.field(
                        "ca_file",
                        toml_string(&options.secret_path(secret, TRUSTED_CA_BUNDLE_KEY)),
                    )
                } else {
                    element
                }
            }
            AuthStrategy::Basic {
                secret,
                username,
                password,
            } => {
                let (user, password) = match options.secret_rendering {
                    SecretRendering::Inline => (username.clone(), password.clone()),
                    SecretRendering::Indirect => (
                        env_reference(secret, CLIENT_USERNAME),
                        env_reference(secret, CLIENT_PASSWORD),
                    ),
                };
                Element::new(format!("auth.basic.{}", secret), BASIC_TEMPLATE)
                    .field("user", toml_string(&user))
                    .field("password", toml_string(&password))
            }
            AuthStrategy::CloudIam {
                secret,
                credentials_path,
            } => Element::new(format!("auth.cloud_iam.{}", secret), CLOUD_IAM_TEMPLATE)
                .field("credentials_path", toml_string(credentials_path)),
        }
    }

    /// What a sink embeds at its `{{>auth}}` slot: the strategy body, wrapped
    /// in a `[sinks.<id>.tls]` / `[sinks.<id>.auth]` table where needed.
    ///
    /// `trusted_ca` names a secret holding a CA bundle. It is rendered as a
    /// `[sinks.<id>.tls]` table whatever the strategy; mutual TLS already
    /// carries `ca_file` in its own table.
    pub fn auth_element(
        &self,
        sink_id: &str,
        trusted_ca: Option<&str>,
        options: &GeneratorOptions,
    ) -> Element {
        let strategy = self.strategy_element(options);
        let auth = match self {
            AuthStrategy::MutualTls { .. } => {
                return table_element(sink_id, "tls", TLS_HEADER_TEMPLATE, strategy);
            }
            AuthStrategy::Basic { .. } => {
                table_element(sink_id, "auth", BASIC_HEADER_TEMPLATE, strategy)
            }
            AuthStrategy::NoAuth | AuthStrategy::CloudIam { .. } => strategy,
        };

        let Some(ca_secret) = trusted_ca else {
            return auth;
        };
        let tls = table_element(
            sink_id,
            "tls",
            TLS_HEADER_TEMPLATE,
            trusted_ca_element(ca_secret, options),
        );
        if *self == AuthStrategy::NoAuth {
            return tls;
        }
        Element::new(format!("sinks.{}.credentials", sink_id), WITH_TRUSTED_CA_TEMPLATE)
            .embed("auth", auth)
            .embed("tls", tls)
    }
}

fn table_element(sink_id: &str, table: &str, template: &'static str, body: Element) -> Element {
    Element::new(format!("sinks.{}.{}", sink_id, table), template)
        .field("id", sink_id)
        .embed("strategy", body)
}

fn trusted_ca_element(secret: &str, options: &GeneratorOptions) -> Element {
    Element::new(format!("tls.ca.{}", secret), TRUSTED_CA_TEMPLATE).field(
        "ca_file",
        toml_string(&options.secret_path(secret, TRUSTED_CA_BUNDLE_KEY)),
    )
}

/// Secret of `output` when it carries a CA bundle for verifying the sink.
pub fn trusted_ca<'o>(output: &'o Output, secrets: &Secrets) -> Option<&'o str> {
    output.secret.as_deref().filter(|name| {
        secrets
            .get(*name)
            .is_some_and(|secret| secret.contains(TRUSTED_CA_BUNDLE_KEY))
    })
}

/// Environment variable reference the agent resolves to a secret value.
///
/// Example: ("es-secret", "password") => "${SECRET_ES_SECRET_PASSWORD}"
pub fn env_reference(secret: &str, key: &str) -> String {
    format!(
        "${{SECRET_{}_{}}}",
        env_id(secret),
        component_id(key).to_ascii_uppercase()
    )
}
