//! Composable units of generated configuration.
//!
//! An [`Element`] is a named template plus the scalar fields it interpolates
//! and the elements it embeds. The name is both the registry key used while
//! rendering and the identity used when merging element sequences.

pub mod merge;
pub mod registry;
pub mod template;

pub use merge::merge_elements;
pub use registry::Registry;
pub use template::{Segment, TemplateParser};

use std::borrow::Cow;
use std::collections::BTreeMap;

/// Top-level section an element is emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Sources,
    Transforms,
    Sinks,
    /// Only ever rendered embedded in another element.
    Fragment,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: String,
    section: Section,
    rank: u16,
    template: Cow<'static, str>,
    fields: BTreeMap<String, String>,
    embeds: Vec<Element>,
}

impl Element {
    /// A fragment element; use [`Element::in_section`] for top-level ones.
    pub fn new(name: impl Into<String>, template: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            section: Section::Fragment,
            rank: 0,
            template: template.into(),
            fields: BTreeMap::new(),
            embeds: Vec::new(),
        }
    }

    /// Place the element in `section`; `rank` orders it within the section.
    pub fn in_section(mut self, section: Section, rank: u16) -> Self {
        self.section = section;
        self.rank = rank;
        self
    }

    pub fn field(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }

    /// Embed `child` at the `{{>slot}}` placeholder.
    pub fn embed(mut self, slot: &str, child: Element) -> Self {
        self.fields.insert(slot.to_string(), child.name.clone());
        self.embeds.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn rank(&self) -> u16 {
        self.rank
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    pub fn embeds(&self) -> &[Element] {
        &self.embeds
    }
}

/// Quote `s` as a TOML basic string.
///
/// JSON string escapes are a subset of TOML basic string escapes. JSON leaves
/// DEL (U+007F) raw, which TOML forbids, so it is escaped here.
pub fn toml_string(s: &str) -> String {
    serde_json::Value::String(s.to_string())
        .to_string()
        .replace('\u{7f}', "\\u007F")
}

/// Render an inline TOML array of strings: `["a", "b"]`.
pub fn toml_array<S: AsRef<str>>(items: &[S]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| toml_string(s.as_ref())).collect();
    format!("[{}]", quoted.join(", "))
}
