//! Shared vocabulary for the mapforge pipeline: type paths, property values,
//! and opaque instance identity.

pub mod types;

pub use types::{InstanceId, PropValue, TypePath};
