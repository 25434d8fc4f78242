//! Rendering of element sequences into agent configuration text.

pub mod conf;

pub use conf::Renderer;

use crate::Result;
use crate::element::{Element, Registry};

/// Build a registry from `roots` and render them as one document.
pub fn render_conf(roots: &[Element]) -> Result<String> {
    let registry = Registry::from_roots(roots)?;
    Renderer::new(&registry)?.render_document(roots)
}
