//! genspec-derive
//!
//! The derivation pipeline as one cancellable task per selection, plus the
//! renderers that turn its output into JSON, YAML or a text summary.

pub mod deriver;
pub mod render;

pub use deriver::{Derivation, Deriver};
pub use render::{render_secrets, render_spec, Format};
