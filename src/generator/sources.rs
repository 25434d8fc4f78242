//! `[sources.*]` elements: where the collector reads logs from.

use super::assemble;
use crate::Result;
use crate::element::{Element, Section, toml_array};
use crate::options::GeneratorOptions;
use crate::topology::output::LOGGING_NAMESPACE;
use crate::topology::{LogSource, Pipeline, ValidatedTopology};

/// Pod name prefixes of the logging stack's own components: collector, log
/// store and UI. Their container logs must never be collected, or the
/// collector would ingest its own output.
pub const LOGGING_COMPONENT_PODS: [&str; 3] = ["vector", "elasticsearch", "kibana"];

/// Carries `type = "kubernetes_logs"` explicitly: Vector rejects a source
/// table without a `type`, so the bare exclusion-only form is not emitted.
const CONTAINER_LOGS_TEMPLATE: &str = r#"# Logs from containers (including openshift containers)
[sources.{{.id}}]
  type = "kubernetes_logs"
  auto_partial_merge = true
  exclude_paths_glob_patterns = {{.exclude_paths}}
"#;

/// Headed with a `# Logs from ...` comment like every other source block.
const JOURNAL_LOGS_TEMPLATE: &str = r#"# Logs from linux journal
[sources.{{.id}}]
  type = "journald"
"#;

const AUDIT_LOGS_TEMPLATE: &str = r#"# Logs from {{.desc}}
[sources.{{.id}}]
  type = "file"
  ignore_older_secs = {{.ignore_older_secs}}
  include = {{.include}}
"#;

/// Glob patterns excluding the logging stack's own container logs.
pub fn collector_exclusions() -> Vec<String> {
    LOGGING_COMPONENT_PODS
        .iter()
        .map(|pod| format!("/var/log/containers/{}-*_{}_*.log", pod, LOGGING_NAMESPACE))
        .collect()
}

/// Source elements for every input referenced by any pipeline, merged and in
/// canonical order.
pub fn log_sources(
    topology: &ValidatedTopology,
    options: &GeneratorOptions,
) -> Result<Vec<Element>> {
    assemble(
        topology
            .pipelines
            .iter()
            .map(|p| pipeline_sources(p, options)),
    )
}

/// Source elements one pipeline needs; overlaps with other pipelines are
/// resolved by merging.
pub fn pipeline_sources(pipeline: &Pipeline, options: &GeneratorOptions) -> Vec<Element> {
    let mut sources: Vec<LogSource> = pipeline
        .inputs
        .iter()
        .flat_map(|input| input.log_sources().iter().copied())
        .collect();
    sources.sort();
    sources.dedup();

    sources
        .into_iter()
        .map(|source| source_element(source, options))
        .collect()
}

pub fn source_element(source: LogSource, options: &GeneratorOptions) -> Element {
    let name = format!("sources.{}", source.id());
    let element = match source {
        LogSource::Container => Element::new(name, CONTAINER_LOGS_TEMPLATE)
            .field("exclude_paths", toml_array(&collector_exclusions())),
        LogSource::Journal => Element::new(name, JOURNAL_LOGS_TEMPLATE),
        LogSource::HostAudit
        | LogSource::KubernetesAudit
        | LogSource::OpenshiftAudit
        | LogSource::OvnAudit => Element::new(name, AUDIT_LOGS_TEMPLATE)
            .field("desc", audit_desc(source))
            .field(
                "ignore_older_secs",
                options.audit_ignore_older_secs.to_string(),
            )
            .field("include", toml_array(&source.audit_path().into_iter().collect::<Vec<_>>())),
    };
    element
        .in_section(Section::Sources, source.rank())
        .field("id", source.id())
}

fn audit_desc(source: LogSource) -> &'static str {
    match source {
        LogSource::HostAudit => "host audit",
        LogSource::KubernetesAudit => "kubernetes audit",
        LogSource::OpenshiftAudit => "openshift audit",
        _ => "ovn audit",
    }
}
