//! Merge element sequences contributed independently (one per pipeline, etc.).

use super::Element;
use crate::Result;
use crate::error::ConfError;
use std::collections::BTreeMap;
use tracing::trace;

/// Concatenate `sequences`, keeping the first occurrence of each name.
///
/// Later occurrences must be identical to the kept one; a differing element
/// under the same name means a generator built two things with one identity.
pub fn merge_elements<I, S>(sequences: I) -> Result<Vec<Element>>
where
    I: IntoIterator<Item = S>,
    S: IntoIterator<Item = Element>,
{
    let mut merged: Vec<Element> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();

    for element in sequences.into_iter().flatten() {
        match index.get(element.name()) {
            Some(&pos) => {
                if merged[pos] != element {
                    return Err(ConfError::NameCollision(element.name().to_string()));
                }
                trace!(name = element.name(), "dropping duplicate element");
            }
            None => {
                index.insert(element.name().to_string(), merged.len());
                merged.push(element);
            }
        }
    }

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    fn el(name: &str) -> Element {
        Element::new(name, format!("[{}]", name))
    }

    fn names(elements: &[Element]) -> Vec<&str> {
        elements.iter().map(Element::name).collect()
    }

    #[test]
    fn keeps_first_seen_order() {
        let merged = merge_elements([
            vec![el("b"), el("a")],
            vec![el("c"), el("a"), el("b")],
        ])
        .unwrap();

        assert_eq!(names(&merged), vec!["b", "a", "c"]);
    }

    #[test]
    fn merging_with_itself_is_identity() {
        let seq = vec![el("x"), el("y"), el("z")];
        let merged = merge_elements([seq.clone(), seq.clone()]).unwrap();

        assert_eq!(merged, seq);
    }

    #[test]
    fn same_name_different_content_fails() {
        let err = merge_elements([vec![el("x")], vec![Element::new("x", "other")]]).unwrap_err();

        assert_eq!(err, ConfError::NameCollision("x".into()));
    }

    #[test]
    fn empty_input_merges_to_empty() {
        let merged = merge_elements(Vec::<Vec<Element>>::new()).unwrap();
        assert!(merged.is_empty());
    }

    #[test]
    #[traced_test]
    fn dropped_duplicates_are_traced() {
        merge_elements([vec![el("x")], vec![el("x")]]).unwrap();

        assert!(logs_contain("dropping duplicate element"));
    }
}
