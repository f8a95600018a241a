//! World loader: the pipeline from parsed map data to live world state.
//!
//! # Invariants
//! - Grid allocation and region resolution failures abort the whole load.
//! - Unknown placed-object and ground types never abort; they are skipped
//!   (with a ground fallback) and reported cumulatively.

pub mod loader;
pub mod map;

pub use loader::{LoadError, LoadOutcome, LoadReport, SkippedPlacement, WorldLoader};
pub use map::{BlockCell, CellDefinition, MapBlock, ObjectPlacement, ParsedMap};
