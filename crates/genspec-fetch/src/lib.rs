//! genspec-fetch
//!
//! Suppliers of base chainspecs. A base spec is looked up by one of the fixed
//! network names and comes back parsed; any transport or parse failure is a
//! `SpecFetch` error.

pub mod config;
pub mod source;

pub use config::FetchConfig;
pub use source::{FileSpecSource, HttpSpecSource, SpecSource};
