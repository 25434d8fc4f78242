//! Output (sink) declarations.

use super::component_id;
use serde::Deserialize;

/// Namespace the logging stack itself runs in.
pub const LOGGING_NAMESPACE: &str = "openshift-logging";

/// In-cluster log store the `default` output forwards to.
pub const LOG_STORE_URL: &str = "https://elasticsearch.openshift-logging.svc:9200";

/// Secret holding the collector's client certificate for the log store.
pub const COLLECTOR_SECRET_NAME: &str = "collector";

/// Raw output shape as it appears in the topology JSON.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputSpec {
    pub name: String,

    #[serde(rename = "type")]
    pub output_type: OutputType,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub secret: Option<SecretRef>,

    #[serde(default)]
    pub google_cloud_logging: Option<GoogleCloudLoggingSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SecretRef {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoogleCloudLoggingSpec {
    pub project_id: String,

    #[serde(default = "default_log_id")]
    pub log_id: String,
}

fn default_log_id() -> String {
    "vector-logs".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputType {
    Elasticsearch,
    Loki,
    Http,
    GoogleCloudLogging,
}

impl OutputType {
    /// Vector sink `type` value.
    pub fn sink_type(self) -> &'static str {
        match self {
            OutputType::Elasticsearch => "elasticsearch",
            OutputType::Loki => "loki",
            OutputType::Http => "http",
            OutputType::GoogleCloudLogging => "gcp_stackdriver_logs",
        }
    }

    pub fn requires_url(self) -> bool {
        !matches!(self, OutputType::GoogleCloudLogging)
    }
}

impl OutputSpec {
    pub fn new(name: &str, output_type: OutputType, url: &str) -> Self {
        Self {
            name: name.to_string(),
            output_type,
            url: Some(url.to_string()),
            secret: None,
            google_cloud_logging: None,
        }
    }

    pub fn with_secret(mut self, secret: &str) -> Self {
        self.secret = Some(SecretRef {
            name: secret.to_string(),
        });
        self
    }
}

/// Validated output, ready for sink generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub name: String,
    pub id: String,
    pub output_type: OutputType,
    pub url: Option<String>,
    pub secret: Option<String>,
    pub google_cloud_logging: Option<GoogleCloudLoggingSpec>,
}

impl Output {
    pub fn from_spec(spec: &OutputSpec) -> Self {
        Self {
            name: spec.name.clone(),
            id: component_id(&spec.name),
            output_type: spec.output_type,
            url: spec.url.clone(),
            secret: spec.secret.as_ref().map(|s| s.name.clone()),
            google_cloud_logging: spec.google_cloud_logging.clone(),
        }
    }

    /// The implicit `default` output: the cluster log store over mutual TLS.
    pub fn default_log_store() -> Self {
        Self {
            name: super::OUTPUT_NAME_DEFAULT.to_string(),
            id: super::OUTPUT_NAME_DEFAULT.to_string(),
            output_type: OutputType::Elasticsearch,
            url: Some(LOG_STORE_URL.to_string()),
            secret: Some(COLLECTOR_SECRET_NAME.to_string()),
            google_cloud_logging: None,
        }
    }
}
