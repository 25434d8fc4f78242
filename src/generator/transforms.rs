//! `[transforms.*]` elements.
//!
//! Container logs are split into application and infrastructure streams by
//! namespace, each input variant is tagged with its `log_type`, and every
//! pipeline gets one remap transform its sinks read from.

use crate::element::{Element, Section, toml_array, toml_string};
use crate::topology::validate::ROUTE_CONTAINER_LOGS;
use crate::topology::{InputName, LogSource, Pipeline};

/// Namespaces whose container logs count as infrastructure.
const INFRA_NAMESPACE_CONDITION: &str = r#"(starts_with!(.kubernetes.pod_namespace,"kube")) || (starts_with!(.kubernetes.pod_namespace,"openshift")) || (.kubernetes.pod_namespace == "default")"#;

const ROUTE_TEMPLATE: &str = r#"[transforms.{{.id}}]
  type = "route"
  inputs = {{.inputs}}
  route.app = '!({{.infra_condition}})'
  route.infra = '{{.infra_condition}}'
"#;

const LOG_TYPE_TEMPLATE: &str = r#"# Set log_type to {{.log_type}}
[transforms.{{.id}}]
  type = "remap"
  inputs = {{.inputs}}
  source = '''
    .log_type = {{.log_type}}
  '''
"#;

const PIPELINE_TEMPLATE: &str = r#"[transforms.{{.id}}]
  type = "remap"
  inputs = {{.inputs}}
  source = '''
    .pipeline_name = "{{.id}}"
  '''
"#;

/// Rank of per-pipeline transforms: after the shared routing/tagging ones,
/// then in pipeline declaration order.
const PIPELINE_RANK: u16 = 10;

pub fn pipeline_transforms(pipeline: &Pipeline) -> Vec<Element> {
    let mut out = Vec::new();
    let needs_route = pipeline
        .inputs
        .iter()
        .any(|i| matches!(i, InputName::Application | InputName::Infrastructure));
    if needs_route {
        out.push(route_container_logs());
    }

    let mut inputs = pipeline.inputs.clone();
    inputs.sort();
    out.extend(inputs.into_iter().map(log_type_transform));

    out.push(pipeline_transform(pipeline));
    out
}

pub fn route_container_logs() -> Element {
    Element::new(format!("transforms.{}", ROUTE_CONTAINER_LOGS), ROUTE_TEMPLATE)
        .in_section(Section::Transforms, 0)
        .field("id", ROUTE_CONTAINER_LOGS)
        .field("inputs", toml_array(&[LogSource::Container.id()]))
        .field("infra_condition", INFRA_NAMESPACE_CONDITION)
}

pub fn log_type_transform(input: InputName) -> Element {
    let app_route = format!("{}.app", ROUTE_CONTAINER_LOGS);
    let infra_route = format!("{}.infra", ROUTE_CONTAINER_LOGS);
    let inputs: Vec<String> = match input {
        InputName::Application => vec![app_route],
        InputName::Infrastructure => vec![infra_route, LogSource::Journal.id().to_string()],
        InputName::Audit => input
            .log_sources()
            .iter()
            .map(|s| s.id().to_string())
            .collect(),
    };

    Element::new(format!("transforms.{}", input.as_str()), LOG_TYPE_TEMPLATE)
        .in_section(Section::Transforms, 1 + input as u16)
        .field("id", input.as_str())
        .field("inputs", toml_array(&inputs))
        .field("log_type", toml_string(input.as_str()))
}

pub fn pipeline_transform(pipeline: &Pipeline) -> Element {
    let inputs: Vec<&str> = pipeline.inputs.iter().map(|i| i.as_str()).collect();

    Element::new(format!("transforms.{}", pipeline.id), PIPELINE_TEMPLATE)
        .in_section(Section::Transforms, PIPELINE_RANK)
        .field("id", pipeline.id.as_str())
        .field("inputs", toml_array(&inputs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_conf;
    use pretty_assertions::assert_eq;

    #[test]
    fn audit_only_pipeline_skips_container_route() {
        let pipeline = Pipeline {
            name: "audit-only".into(),
            id: "audit_only".into(),
            inputs: vec![InputName::Audit],
            outputs: vec!["default".into()],
        };
        let names: Vec<String> = pipeline_transforms(&pipeline)
            .iter()
            .map(|e| e.name().to_string())
            .collect();

        assert_eq!(names, vec!["transforms.audit", "transforms.audit_only"]);
    }

    #[test]
    fn infrastructure_reads_route_and_journal() {
        let text = render_conf(&[log_type_transform(InputName::Infrastructure)]).unwrap();

        assert_eq!(
            text,
            r#"# Set log_type to "infrastructure"
[transforms.infrastructure]
  type = "remap"
  inputs = ["route_container_logs.infra", "journal_logs"]
  source = '''
    .log_type = "infrastructure"
  '''
"#
        );
    }

    #[test]
    fn pipeline_transform_reads_referenced_inputs_in_order() {
        let pipeline = Pipeline {
            name: "mixed".into(),
            id: "mixed".into(),
            inputs: vec![InputName::Audit, InputName::Application],
            outputs: vec!["default".into()],
        };
        let text = render_conf(&[pipeline_transform(&pipeline)]).unwrap();

        assert_eq!(
            text,
            r#"[transforms.mixed]
  type = "remap"
  inputs = ["audit", "application"]
  source = '''
    .pipeline_name = "mixed"
  '''
"#
        );
    }
}
