//! Topology layer: JSON input schema + validated in-memory structures.
//!
//! JSON shape:
//! {
//!   "pipelines": [
//!     {
//!       "name": "app-to-es",               // optional, defaults to pipeline_<index>
//!       "inputRefs": ["application"],      // application | infrastructure | audit
//!       "outputRefs": ["es", "default"]    // declared outputs or the reserved "default"
//!     }
//!   ],
//!   "outputs": [
//!     {
//!       "name": "es",
//!       "type": "elasticsearch",           // elasticsearch | loki | http | googleCloudLogging
//!       "url": "https://es.example:9200",
//!       "secret": { "name": "es-secret" }  // optional
//!     }
//!   ]
//! }
//!
//! This module never renders anything. It owns:
//! - input variants and the log sources they select
//! - outputs and secrets
//! - validation of references (before any rendering starts)

pub mod input;
pub mod output;
pub mod secret;
pub mod validate;

pub use input::{InputName, LogSource};
pub use output::{GoogleCloudLoggingSpec, Output, OutputSpec, OutputType, SecretRef};
pub use secret::{Secret, Secrets};
pub use validate::{Pipeline, ValidatedTopology};

use serde::Deserialize;

/// Name of the implicit output pointing at the cluster log store.
pub const OUTPUT_NAME_DEFAULT: &str = "default";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topology {
    #[serde(default)]
    pub pipelines: Vec<PipelineSpec>,

    #[serde(default)]
    pub outputs: Vec<OutputSpec>,
}

/// Raw pipeline shape as it appears in the topology JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSpec {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub input_refs: Vec<String>,

    #[serde(default)]
    pub output_refs: Vec<String>,
}

impl PipelineSpec {
    pub fn new(name: &str, input_refs: &[&str], output_refs: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            input_refs: input_refs.iter().map(|s| s.to_string()).collect(),
            output_refs: output_refs.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Topology {
    pub fn new(pipelines: Vec<PipelineSpec>, outputs: Vec<OutputSpec>) -> Self {
        Self { pipelines, outputs }
    }
}

/// Turn a user-facing name into a Vector component id.
///
/// Example: "App-Logs.v2" => "app_logs_v2"
pub fn component_id(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}
