//! Static validation of a topology.
//!
//! We check names are unique, resolve every input/output reference, add the
//! implicit default output when referenced, and make sure generated component
//! ids cannot clash. Nothing is rendered until this pass succeeds.

use super::output::Output;
use super::secret::env_id;
use super::{InputName, LogSource, OUTPUT_NAME_DEFAULT, Topology, component_id};
use crate::Result;
use crate::error::ConfError;
use std::collections::BTreeMap;
use tracing::debug;

/// Component id of the transform splitting container logs by namespace.
pub const ROUTE_CONTAINER_LOGS: &str = "route_container_logs";

/// Flattened, validated pipeline ready for generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pipeline {
    pub name: String,
    pub id: String,
    /// Referenced inputs, first-seen order, no repeats.
    pub inputs: Vec<InputName>,
    /// Referenced output names, first-seen order, no repeats.
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTopology {
    pub pipelines: Vec<Pipeline>,
    pub outputs: BTreeMap<String, Output>,
}

impl ValidatedTopology {
    /// Outputs referenced by at least one pipeline, in first-seen order.
    pub fn referenced_outputs(&self) -> Vec<&Output> {
        let mut seen: Vec<&Output> = Vec::new();
        for pipeline in &self.pipelines {
            for name in &pipeline.outputs {
                if seen.iter().any(|o| &o.name == name) {
                    continue;
                }
                if let Some(output) = self.outputs.get(name) {
                    seen.push(output);
                }
            }
        }
        seen
    }
}

impl Topology {
    /// Resolve references and check names; fails on the first problem found.
    pub fn validate_and_build(&self) -> Result<ValidatedTopology> {
        // 1) Outputs keyed by name.
        let mut outputs: BTreeMap<String, Output> = BTreeMap::new();
        for spec in &self.outputs {
            if spec.name == OUTPUT_NAME_DEFAULT {
                return Err(ConfError::ReservedOutputName(spec.name.clone()));
            }
            if outputs.contains_key(&spec.name) {
                return Err(ConfError::DuplicateOutput(spec.name.clone()));
            }
            let has_url = spec.url.as_deref().is_some_and(|u| !u.trim().is_empty());
            if spec.output_type.requires_url() && !has_url {
                return Err(ConfError::MissingUrl(spec.name.clone()));
            }
            if !spec.output_type.requires_url() && spec.google_cloud_logging.is_none() {
                return Err(ConfError::MissingGoogleCloudLogging(spec.name.clone()));
            }
            outputs.insert(spec.name.clone(), Output::from_spec(spec));
        }

        // 2) Pipelines, with every reference resolved.
        let mut pipelines: Vec<Pipeline> = Vec::new();
        for (index, spec) in self.pipelines.iter().enumerate() {
            let name = if spec.name.is_empty() {
                format!("pipeline_{}", index)
            } else {
                spec.name.clone()
            };
            if pipelines.iter().any(|p| p.name == name) {
                return Err(ConfError::DuplicatePipeline(name));
            }
            if spec.input_refs.is_empty() {
                return Err(ConfError::EmptyPipeline {
                    pipeline: name,
                    missing: "input",
                });
            }
            if spec.output_refs.is_empty() {
                return Err(ConfError::EmptyPipeline {
                    pipeline: name,
                    missing: "output",
                });
            }

            let mut inputs = Vec::new();
            for input in &spec.input_refs {
                let resolved = InputName::parse(input).ok_or_else(|| ConfError::UnknownInput {
                    pipeline: name.clone(),
                    input: input.clone(),
                })?;
                if !inputs.contains(&resolved) {
                    inputs.push(resolved);
                }
            }

            let mut refs: Vec<String> = Vec::new();
            for output in &spec.output_refs {
                if output == OUTPUT_NAME_DEFAULT {
                    outputs
                        .entry(OUTPUT_NAME_DEFAULT.to_string())
                        .or_insert_with(Output::default_log_store);
                } else if !outputs.contains_key(output) {
                    return Err(ConfError::UnknownOutput {
                        pipeline: name.clone(),
                        output: output.clone(),
                    });
                }
                if !refs.contains(output) {
                    refs.push(output.clone());
                }
            }

            pipelines.push(Pipeline {
                id: component_id(&name),
                name,
                inputs,
                outputs: refs,
            });
        }

        // 3) Generated component ids share one namespace in the agent config.
        let mut owners: BTreeMap<String, String> = BTreeMap::new();
        let reserved = LogSource::ALL
            .map(|s| s.id())
            .into_iter()
            .chain([ROUTE_CONTAINER_LOGS])
            .chain(InputName::ALL.map(|i| i.as_str()));
        for id in reserved {
            owners.insert(id.to_string(), format!("built-in {}", id));
        }
        let claims = pipelines
            .iter()
            .map(|p| (p.id.clone(), format!("pipeline {}", p.name)))
            .chain(
                outputs
                    .values()
                    .map(|o| (o.id.clone(), format!("output {}", o.name))),
            );
        for (id, owner) in claims {
            if let Some(first) = owners.get(&id) {
                return Err(ConfError::ComponentIdConflict {
                    id,
                    first: first.clone(),
                    second: owner,
                });
            }
            owners.insert(id, owner);
        }

        // 4) Secret names end up in env references; those must not alias.
        let mut secret_envs: BTreeMap<String, &str> = BTreeMap::new();
        for secret in outputs.values().filter_map(|o| o.secret.as_deref()) {
            let env = env_id(secret);
            match secret_envs.get(&env) {
                Some(&first) if first != secret => {
                    return Err(ConfError::SecretEnvConflict {
                        env,
                        first: first.to_string(),
                        second: secret.to_string(),
                    });
                }
                Some(_) => {}
                None => {
                    secret_envs.insert(env, secret);
                }
            }
        }

        debug!(
            pipelines = pipelines.len(),
            outputs = outputs.len(),
            "validated topology"
        );

        Ok(ValidatedTopology { pipelines, outputs })
    }
}
