//! Per-render mapping from element name to element.
//!
//! A registry is built by the caller for one render pass and dropped with it;
//! nothing is shared between renders.

use super::Element;
use crate::Result;
use crate::error::ConfError;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    elements: BTreeMap<String, Element>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every element reachable from `roots` (roots plus embeds).
    pub fn from_roots(roots: &[Element]) -> Result<Self> {
        fn walk(registry: &mut Registry, element: &Element) -> Result<()> {
            registry.insert(element.clone())?;
            for child in element.embeds() {
                walk(registry, child)?;
            }
            Ok(())
        }

        let mut registry = Self::new();
        for root in roots {
            walk(&mut registry, root)?;
        }
        Ok(registry)
    }

    /// Add `element`. Re-adding an identical element is a no-op; a different
    /// element under a registered name is a collision.
    pub fn insert(&mut self, element: Element) -> Result<()> {
        match self.elements.get(element.name()) {
            Some(existing) if existing == &element => Ok(()),
            Some(_) => Err(ConfError::NameCollision(element.name().to_string())),
            None => {
                self.elements.insert(element.name().to_string(), element);
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.elements.get(name)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_nested_embeds_once() {
        let shared = Element::new("auth.none", "");
        let a = Element::new("a", "{{>auth}}").embed("auth", shared.clone());
        let b = Element::new("b", "{{>auth}}").embed("auth", shared);
        let registry = Registry::from_roots(&[a, b]).unwrap();

        assert_eq!(registry.len(), 3);
        assert!(registry.get("auth.none").is_some());
    }

    #[test]
    fn different_content_under_one_name_collides() {
        let mut registry = Registry::new();
        registry.insert(Element::new("x", "one")).unwrap();

        assert_eq!(
            registry.insert(Element::new("x", "two")),
            Err(ConfError::NameCollision("x".into()))
        );
        assert_eq!(registry.insert(Element::new("x", "one")), Ok(()));
    }
}
