//! `[sinks.*]` elements, one per referenced output.

use super::auth::{select_strategy, trusted_ca};
use crate::Result;
use crate::element::{Element, Section, toml_array, toml_string};
use crate::options::GeneratorOptions;
use crate::topology::{Output, OutputType, Secrets, ValidatedTopology};

const ELASTICSEARCH_TEMPLATE: &str = r#"[sinks.{{.id}}]
  type = "elasticsearch"
  inputs = {{.inputs}}
  endpoint = {{.endpoint}}
  index = "{{ log_type }}-write"
{{>auth}}"#;

const LOKI_TEMPLATE: &str = r#"[sinks.{{.id}}]
  type = "loki"
  inputs = {{.inputs}}
  endpoint = {{.endpoint}}
  out_of_order_action = "accept"
  encoding.codec = "json"
  labels.log_type = "{{ log_type }}"
{{>auth}}"#;

const HTTP_TEMPLATE: &str = r#"[sinks.{{.id}}]
  type = "http"
  inputs = {{.inputs}}
  uri = {{.endpoint}}
  method = "post"
  encoding.codec = "json"
{{>auth}}"#;

const GOOGLE_CLOUD_LOGGING_TEMPLATE: &str = r#"[sinks.{{.id}}]
  type = "gcp_stackdriver_logs"
  inputs = {{.inputs}}
  log_id = {{.log_id}}
  project_id = {{.project_id}}
  resource.type = "k8s_pod"
{{>auth}}"#;

/// Sinks for all referenced outputs, in first-seen pipeline order.
pub fn sinks(
    topology: &ValidatedTopology,
    secrets: &Secrets,
    options: &GeneratorOptions,
) -> Result<Vec<Element>> {
    topology
        .referenced_outputs()
        .into_iter()
        .map(|output| sink(output, topology, secrets, options))
        .collect()
}

pub fn sink(
    output: &Output,
    topology: &ValidatedTopology,
    secrets: &Secrets,
    options: &GeneratorOptions,
) -> Result<Element> {
    // Every pipeline routing to this output feeds the sink.
    let inputs: Vec<&str> = topology
        .pipelines
        .iter()
        .filter(|p| p.outputs.contains(&output.name))
        .map(|p| p.id.as_str())
        .collect();

    let strategy = select_strategy(output, secrets)?;
    let auth = strategy.auth_element(&output.id, trusted_ca(output, secrets), options);

    let name = format!("sinks.{}", output.id);
    let endpoint = toml_string(output.url.as_deref().unwrap_or_default());
    let element = match output.output_type {
        OutputType::Elasticsearch => {
            Element::new(name, ELASTICSEARCH_TEMPLATE).field("endpoint", endpoint)
        }
        OutputType::Loki => Element::new(name, LOKI_TEMPLATE).field("endpoint", endpoint),
        OutputType::Http => Element::new(name, HTTP_TEMPLATE).field("endpoint", endpoint),
        OutputType::GoogleCloudLogging => {
            let (project_id, log_id) = output
                .google_cloud_logging
                .as_ref()
                .map(|g| (g.project_id.as_str(), g.log_id.as_str()))
                .unwrap_or_default();
            Element::new(name, GOOGLE_CLOUD_LOGGING_TEMPLATE)
                .field("project_id", toml_string(project_id))
                .field("log_id", toml_string(log_id))
        }
    };

    Ok(element
        .in_section(Section::Sinks, 0)
        .field("id", output.id.as_str())
        .field("inputs", toml_array(&inputs))
        .embed("auth", auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_conf;
    use crate::topology::secret::CREDENTIALS_PATH;
    use crate::topology::{GoogleCloudLoggingSpec, OutputSpec, PipelineSpec, Secret, Topology};
    use pretty_assertions::assert_eq;

    #[test]
    fn google_cloud_logging_with_credentials_file() {
        let mut spec = OutputSpec::new("gcl", OutputType::GoogleCloudLogging, "").with_secret("gcp");
        spec.url = None;
        spec.google_cloud_logging = Some(GoogleCloudLoggingSpec {
            project_id: "prj-caas-gcos-p-ac7a".into(),
            log_id: "vector-logs".into(),
        });
        let topology = Topology::new(
            vec![PipelineSpec::new("audit-gcl", &["audit"], &["gcl"])],
            vec![spec],
        )
        .validate_and_build()
        .unwrap();
        let secrets = Secrets::from([(
            "gcp".to_string(),
            Secret::new().with(CREDENTIALS_PATH, "/var/run/secrets/google/credentials.json"),
        )]);

        let elements = sinks(&topology, &secrets, &GeneratorOptions::default()).unwrap();
        let text = render_conf(&elements).unwrap();

        assert_eq!(
            text,
            r#"[sinks.gcl]
  type = "gcp_stackdriver_logs"
  inputs = ["audit_gcl"]
  log_id = "vector-logs"
  project_id = "prj-caas-gcos-p-ac7a"
  resource.type = "k8s_pod"
  credentials_path = "/var/run/secrets/google/credentials.json"
"#
        );
    }

    #[test]
    fn unauthenticated_http_sink_has_no_auth_table() {
        let topology = Topology::new(
            vec![
                PipelineSpec::new("first", &["application"], &["web"]),
                PipelineSpec::new("second", &["audit"], &["web"]),
            ],
            vec![OutputSpec::new("web", OutputType::Http, "http://collector.example/logs")],
        )
        .validate_and_build()
        .unwrap();

        let elements = sinks(&topology, &Secrets::new(), &GeneratorOptions::default()).unwrap();
        let text = render_conf(&elements).unwrap();

        assert_eq!(
            text,
            r#"[sinks.web]
  type = "http"
  inputs = ["first", "second"]
  uri = "http://collector.example/logs"
  method = "post"
  encoding.codec = "json"
"#
        );
    }
}
