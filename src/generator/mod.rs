//! Element generation: validated topology => ordered root elements.
//!
//! Sources and transforms are generated per pipeline and merged, so inputs
//! shared by several pipelines are emitted once. Sinks are generated once per
//! referenced output. Assembly then applies [`SECTION_ORDER`].

pub mod auth;
pub mod sinks;
pub mod sources;
pub mod transforms;

pub use auth::{AuthKind, AuthStrategy, select_strategy};
pub use sources::{collector_exclusions, log_sources};

use crate::Result;
use crate::element::{Element, Section, merge_elements};
use crate::options::GeneratorOptions;
use crate::render::render_conf;
use crate::topology::{Secrets, Topology, ValidatedTopology};
use tracing::debug;

/// Order of top-level sections in the generated document.
pub const SECTION_ORDER: [Section; 3] = [Section::Sources, Section::Transforms, Section::Sinks];

fn section_position(section: Section) -> usize {
    SECTION_ORDER
        .iter()
        .position(|s| *s == section)
        .unwrap_or(SECTION_ORDER.len())
}

/// Merge `sequences` and order the result by section, then rank.
///
/// The sort is stable: elements with equal rank keep first-seen order.
pub fn assemble<I, S>(sequences: I) -> Result<Vec<Element>>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = Element>,
{
    let mut elements = merge_elements(sequences)?;
    elements.sort_by_key(|e| (section_position(e.section()), e.rank()));
    Ok(elements)
}

pub fn generate_elements(
    topology: &ValidatedTopology,
    secrets: &Secrets,
    options: &GeneratorOptions,
) -> Result<Vec<Element>> {
    let mut sequences: Vec<Vec<Element>> = Vec::new();
    for pipeline in &topology.pipelines {
        sequences.push(sources::pipeline_sources(pipeline, options));
        sequences.push(transforms::pipeline_transforms(pipeline));
    }
    sequences.push(sinks::sinks(topology, secrets, options)?);

    let contributed: usize = sequences.iter().map(Vec::len).sum();
    let elements = assemble(sequences)?;
    debug!(
        contributed,
        merged = elements.len(),
        "assembled configuration elements"
    );
    Ok(elements)
}

/// Validate `topology` and render the complete agent configuration.
pub fn generate_conf(
    topology: &Topology,
    secrets: &Secrets,
    options: &GeneratorOptions,
) -> Result<String> {
    let validated = topology.validate_and_build()?;
    let elements = generate_elements(&validated, secrets, options)?;
    render_conf(&elements)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assembly_orders_sections_then_ranks() {
        let sink = Element::new("sinks.a", "").in_section(Section::Sinks, 0);
        let late_source = Element::new("sources.b", "").in_section(Section::Sources, 3);
        let early_source = Element::new("sources.a", "").in_section(Section::Sources, 1);
        let transform = Element::new("transforms.a", "").in_section(Section::Transforms, 0);

        let assembled = assemble([
            vec![sink, late_source.clone()],
            vec![transform, early_source, late_source],
        ])
        .unwrap();
        let names: Vec<&str> = assembled.iter().map(Element::name).collect();

        assert_eq!(
            names,
            vec!["sources.a", "sources.b", "transforms.a", "sinks.a"]
        );
    }
}
