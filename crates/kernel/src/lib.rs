//! World kernel: the live spatial world state built from a parsed map.
//!
//! # Invariants
//! - Every populated cell holds a ground id assigned by the instance arena.
//! - At most one region instance exists per type path within one load.
//! - Every successful ground placement appends to the ordered change feed.

pub mod instance;
pub mod region;
pub mod world;

pub use instance::{Instance, Instances};
pub use region::{Region, RegionRegistry};
pub use world::{Cell, GroundChange, World, WorldError};
