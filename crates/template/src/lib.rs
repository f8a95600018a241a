//! Type templates: declared default properties looked up by path.
//!
//! # Invariants
//! - Base templates are never mutated by specialization.
//! - The registry is an injected collaborator, never ambient global state.

mod registry;
mod specialize;

pub use registry::{Template, TemplateError, TemplateSet, TypeRegistry};
pub use specialize::specialize;
