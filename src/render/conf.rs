use crate::Result;
use crate::element::{Element, Registry, Segment, TemplateParser};
use crate::error::ConfError;
use std::collections::BTreeMap;
use tracing::trace;

/// Expands element templates against a registry.
///
/// Expansion is depth-first: every `{{>slot}}` renders the referenced element
/// in place. Finished elements are cached, so an element embedded by many
/// parents is expanded once per pass.
pub struct Renderer<'r> {
    registry: &'r Registry,
    parser: TemplateParser,
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Temp,
    Perm,
}

#[derive(Default)]
struct Expansion {
    marks: BTreeMap<String, Mark>,
    stack: Vec<String>,
    rendered: BTreeMap<String, String>,
}

impl<'r> Renderer<'r> {
    pub fn new(registry: &'r Registry) -> Result<Self> {
        Ok(Self {
            registry,
            parser: TemplateParser::new()?,
        })
    }

    /// Render one registered element, embeds included.
    pub fn render_element(&self, name: &str) -> Result<String> {
        self.expand(name, &mut Expansion::default())
    }

    /// Render `roots` in the given order as one document.
    ///
    /// Each block is stripped of surrounding newlines, blocks are separated by
    /// one blank line and the document ends with a newline.
    pub fn render_document(&self, roots: &[Element]) -> Result<String> {
        let mut expansion = Expansion::default();
        let mut blocks: Vec<String> = Vec::new();
        for root in roots {
            let text = self.expand(root.name(), &mut expansion)?;
            let block = text.trim_matches('\n');
            if !block.is_empty() {
                blocks.push(block.to_string());
            }
        }
        if blocks.is_empty() {
            return Ok(String::new());
        }

        let mut out = blocks.join("\n\n");
        out.push('\n');
        Ok(out)
    }

    fn expand(&self, name: &str, expansion: &mut Expansion) -> Result<String> {
        match expansion.marks.get(name) {
            Some(Mark::Perm) => {
                if let Some(text) = expansion.rendered.get(name) {
                    return Ok(text.clone());
                }
            }
            Some(Mark::Temp) => {
                // name is already being expanded further up => cycle
                expansion.stack.push(name.to_string());
                return Err(ConfError::TemplateCycle {
                    path: expansion.stack.join(" -> "),
                });
            }
            None => {}
        }

        let element = self
            .registry
            .get(name)
            .ok_or_else(|| ConfError::UnknownElement(name.to_string()))?;

        expansion.marks.insert(name.to_string(), Mark::Temp);
        expansion.stack.push(name.to_string());
        trace!(name, depth = expansion.stack.len(), "expanding element");

        let mut out = String::with_capacity(element.template().len());
        for segment in self.parser.segments(element.template()) {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Field(key) => out.push_str(field(element, key)?),
                Segment::Embed(slot) => {
                    let child = field(element, slot)?;
                    let text = self.expand(child, expansion)?;
                    out.push_str(text.trim_end_matches('\n'));
                }
            }
        }

        expansion.stack.pop();
        expansion.marks.insert(name.to_string(), Mark::Perm);
        expansion.rendered.insert(name.to_string(), out.clone());
        Ok(out)
    }
}

fn field<'e>(element: &'e Element, key: &str) -> Result<&'e str> {
    element
        .get_field(key)
        .ok_or_else(|| ConfError::MissingField {
            element: element.name().to_string(),
            field: key.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::Section;
    use pretty_assertions::assert_eq;

    #[test]
    fn expands_nested_elements() {
        let strategy = Element::new("auth.basic.s", "  strategy = \"basic\"\n");
        let header = Element::new("sinks.es.auth", "\n[sinks.{{.id}}.auth]\n{{>strategy}}")
            .field("id", "es")
            .embed("strategy", strategy);
        let sink = Element::new("sinks.es", "[sinks.{{.id}}]\n  type = \"elasticsearch\"\n{{>auth}}")
            .in_section(Section::Sinks, 0)
            .field("id", "es")
            .embed("auth", header);

        let registry = Registry::from_roots(std::slice::from_ref(&sink)).unwrap();
        let text = Renderer::new(&registry)
            .unwrap()
            .render_document(&[sink])
            .unwrap();

        assert_eq!(
            text,
            "[sinks.es]\n  type = \"elasticsearch\"\n\n[sinks.es.auth]\n  strategy = \"basic\"\n"
        );
    }

    #[test]
    fn separates_blocks_with_one_blank_line() {
        let roots = vec![
            Element::new("a", "\n[a]\n  x = 1\n\n"),
            Element::new("empty", ""),
            Element::new("b", "[b]"),
        ];
        let registry = Registry::from_roots(&roots).unwrap();
        let text = Renderer::new(&registry)
            .unwrap()
            .render_document(&roots)
            .unwrap();

        assert_eq!(text, "[a]\n  x = 1\n\n[b]\n");
    }

    #[test]
    fn detects_reference_cycles() {
        let mut registry = Registry::new();
        registry
            .insert(Element::new("a", "{{>next}}").field("next", "b"))
            .unwrap();
        registry
            .insert(Element::new("b", "{{>next}}").field("next", "a"))
            .unwrap();

        let err = Renderer::new(&registry)
            .unwrap()
            .render_element("a")
            .unwrap_err();
        assert_eq!(
            err,
            ConfError::TemplateCycle {
                path: "a -> b -> a".into()
            }
        );
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let mut registry = Registry::new();
        registry
            .insert(Element::new("a", "x{{>me}}").field("me", "a"))
            .unwrap();

        assert!(matches!(
            Renderer::new(&registry).unwrap().render_element("a"),
            Err(ConfError::TemplateCycle { .. })
        ));
    }

    #[test]
    fn missing_field_and_element_are_structural_errors() {
        let mut registry = Registry::new();
        registry.insert(Element::new("a", "{{.id}}")).unwrap();
        registry
            .insert(Element::new("b", "{{>child}}").field("child", "ghost"))
            .unwrap();
        let renderer = Renderer::new(&registry).unwrap();

        assert_eq!(
            renderer.render_element("a"),
            Err(ConfError::MissingField {
                element: "a".into(),
                field: "id".into()
            })
        );
        assert_eq!(
            renderer.render_element("b"),
            Err(ConfError::UnknownElement("ghost".into()))
        );
    }

    #[test]
    fn shared_embeds_render_identically() {
        let shared = Element::new("shared", "  k = {{.v}}").field("v", "1");
        let roots = vec![
            Element::new("a", "[a]\n{{>s}}").embed("s", shared.clone()),
            Element::new("b", "[b]\n{{>s}}").embed("s", shared),
        ];
        let registry = Registry::from_roots(&roots).unwrap();
        let text = Renderer::new(&registry)
            .unwrap()
            .render_document(&roots)
            .unwrap();

        assert_eq!(text, "[a]\n  k = 1\n\n[b]\n  k = 1\n");
    }
}
