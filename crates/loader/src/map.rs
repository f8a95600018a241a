use mapforge_common::{PropValue, TypePath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The structured output of the external map parser.
///
/// `max_x`/`max_y` are the map's overall bounds in its 1-based coordinate
/// convention. Blocks position runs of cells; `cell_definitions` maps each
/// block symbol to the content of one cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedMap {
    pub max_x: i32,
    pub max_y: i32,
    pub blocks: Vec<MapBlock>,
    pub cell_definitions: BTreeMap<String, CellDefinition>,
}

/// A rectangular block of cells with a 1-based origin coordinate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapBlock {
    pub x: i32,
    pub y: i32,
    /// Per-offset symbols in the parser's scan order. Load order, and with
    /// it change-feed order, follows this listing.
    pub cells: Vec<BlockCell>,
}

/// One cell offset within a block and the symbol defining its content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockCell {
    pub dx: i32,
    pub dy: i32,
    pub symbol: String,
}

/// The parsed description of one map symbol's cell content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CellDefinition {
    /// Ground type to instantiate; the base ground type when absent.
    #[serde(default)]
    pub ground: Option<TypePath>,
    /// Region type; the base region type when absent.
    #[serde(default)]
    pub region: Option<TypePath>,
    /// Placed objects, instantiated in listed order.
    #[serde(default)]
    pub objects: Vec<ObjectPlacement>,
}

/// A placed-object descriptor: a type path plus property overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectPlacement {
    pub path: TypePath,
    #[serde(default)]
    pub overrides: BTreeMap<String, PropValue>,
}
