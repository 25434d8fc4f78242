//! Compiles a log-forwarding topology into Vector agent configuration.
//!
//! ```no_run
//! use collector_confgen::topology::{PipelineSpec, Secrets, Topology};
//!
//! let topology = Topology::new(
//!     vec![PipelineSpec::new("apps", &["application"], &["default"])],
//!     vec![],
//! );
//! let conf = collector_confgen::render(&topology, &Secrets::new());
//! ```
//!
//! Generation is pure: no I/O, no global state, and equal inputs always give
//! byte-identical output.

pub mod element;
pub mod error;
pub mod generator;
pub mod options;
pub mod render;
pub mod topology;

pub use error::{ConfError, ErrorKind};
pub use options::{GeneratorOptions, SecretRendering};

use topology::{Secrets, Topology};

pub type Result<T, E = ConfError> = std::result::Result<T, E>;

/// Render `topology` with `options`.
pub fn generate(topology: &Topology, secrets: &Secrets, options: &GeneratorOptions) -> Result<String> {
    generator::generate_conf(topology, secrets, options)
}

/// Render `topology` with default options.
pub fn render(topology: &Topology, secrets: &Secrets) -> Result<String> {
    generate(topology, secrets, &GeneratorOptions::default())
}
