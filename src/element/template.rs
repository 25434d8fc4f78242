//! Placeholder scanning for element templates.
//!
//! Two placeholder forms are recognized:
//! - `{{.field}}`  interpolate a scalar field of the element
//! - `{{>slot}}`   render the element whose name is stored in field `slot`
//!
//! Everything else is literal, including the agent's own `{{ field }}`
//! event templating (note the spaces), which must pass through untouched.

use crate::Result;
use regex::Regex;

const PLACEHOLDER_RE: &str = r"\{\{([.>])([A-Za-z_][A-Za-z0-9_]*)\}\}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Text(&'a str),
    Field(&'a str),
    Embed(&'a str),
}

#[derive(Debug, Clone)]
pub struct TemplateParser {
    re: Regex,
}

impl TemplateParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            re: Regex::new(PLACEHOLDER_RE)?,
        })
    }

    /// Split `template` into literal text and placeholders, in order.
    pub fn segments<'a>(&self, template: &'a str) -> Vec<Segment<'a>> {
        let mut out = Vec::new();
        let mut last = 0;
        for caps in self.re.captures_iter(template) {
            let (Some(whole), Some(sigil), Some(key)) = (caps.get(0), caps.get(1), caps.get(2))
            else {
                continue;
            };
            if whole.start() > last {
                out.push(Segment::Text(&template[last..whole.start()]));
            }
            out.push(match sigil.as_str() {
                ">" => Segment::Embed(key.as_str()),
                _ => Segment::Field(key.as_str()),
            });
            last = whole.end();
        }
        if last < template.len() {
            out.push(Segment::Text(&template[last..]));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_fields_and_embeds() {
        let parser = TemplateParser::new().unwrap();
        let segments = parser.segments("[sinks.{{.id}}]\n{{>auth}}");

        assert_eq!(
            segments,
            vec![
                Segment::Text("[sinks."),
                Segment::Field("id"),
                Segment::Text("]\n"),
                Segment::Embed("auth"),
            ]
        );
    }

    #[test]
    fn agent_templating_is_literal() {
        let parser = TemplateParser::new().unwrap();
        let text = r#"index = "{{ log_type }}-write""#;

        assert_eq!(parser.segments(text), vec![Segment::Text(text)]);
    }

    #[test]
    fn empty_template_has_no_segments() {
        let parser = TemplateParser::new().unwrap();
        assert!(parser.segments("").is_empty());
    }
}
