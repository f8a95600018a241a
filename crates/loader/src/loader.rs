use crate::map::{CellDefinition, ObjectPlacement, ParsedMap};
use mapforge_common::{InstanceId, TypePath};
use mapforge_kernel::{Instance, World, WorldError};
use mapforge_template::{TypeRegistry, specialize};
use std::fmt;

/// Errors that abort a load.
///
/// A failed load leaves no usable world; callers retry from scratch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("no cell definition for symbol {symbol:?} at ({x}, {y})")]
    UnknownSymbol { symbol: String, x: i32, y: i32 },
    #[error("base ground template {path} is not registered")]
    MissingBaseGround { path: TypePath },
}

/// A placement skipped because its type had no registered template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPlacement {
    pub path: TypePath,
    pub x: i32,
    pub y: i32,
}

/// Cumulative result of one load: counts plus the full skip list.
///
/// Skips are aggregated here rather than logged per occurrence, so a large
/// map full of stale types produces one summary instead of a flood.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub cells: usize,
    pub objects_placed: usize,
    pub skipped: Vec<SkippedPlacement>,
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cells, {} objects placed, {} unknown types skipped",
            self.cells,
            self.objects_placed,
            self.skipped.len()
        )?;
        for skip in &self.skipped {
            write!(f, "\n  skipped {} at ({}, {})", skip.path, skip.x, skip.y)?;
        }
        Ok(())
    }
}

/// A freshly loaded world together with its load report.
#[derive(Debug)]
pub struct LoadOutcome {
    pub world: World,
    pub report: LoadReport,
}

/// The orchestrating pipeline: parsed map data in, live world state out.
///
/// The type registry is injected at construction so the pipeline can run
/// against a fake in tests; it is never reached through global state.
pub struct WorldLoader<R: TypeRegistry> {
    registry: R,
}

impl<R: TypeRegistry> WorldLoader<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Build a world from parsed map data.
    ///
    /// Allocates `(max_x - 1, max_y - 1)` — the source format's 1-based
    /// inclusive bounds against a 0-based allocation size, kept exactly as
    /// the original convention has it — then populates every listed cell:
    /// ground (with base-type fallback), region (fatal on failure), and
    /// placed objects (skipped on unknown type).
    pub fn load(&self, map: &ParsedMap) -> Result<LoadOutcome, LoadError> {
        let mut world = World::allocate(map.max_x - 1, map.max_y - 1)?;
        let mut report = LoadReport::default();

        for block in &map.blocks {
            for cell in &block.cells {
                let x = block.x + cell.dx - 1;
                let y = block.y + cell.dy - 1;
                let definition = map.cell_definitions.get(&cell.symbol).ok_or_else(|| {
                    LoadError::UnknownSymbol {
                        symbol: cell.symbol.clone(),
                        x,
                        y,
                    }
                })?;

                let ground = self.instantiate_ground(definition, &mut world, &mut report, x, y)?;
                world.set_ground(x, y, ground)?;

                let region_path = definition
                    .region
                    .clone()
                    .unwrap_or_else(TypePath::region_root);
                world.set_region(x, y, &region_path, &self.registry)?;

                for placement in &definition.objects {
                    self.place_object(placement, ground, &mut world, &mut report, x, y);
                }
                report.cells += 1;
            }
        }

        tracing::info!(
            cells = report.cells,
            objects = report.objects_placed,
            skipped = report.skipped.len(),
            "map load complete"
        );
        Ok(LoadOutcome { world, report })
    }

    /// Instantiate a cell's ground, falling back to the base ground type
    /// when the named type is unregistered. A cell is never left without a
    /// ground instance; only a missing base template is fatal.
    fn instantiate_ground(
        &self,
        definition: &CellDefinition,
        world: &mut World,
        report: &mut LoadReport,
        x: i32,
        y: i32,
    ) -> Result<InstanceId, LoadError> {
        if let Some(path) = &definition.ground {
            if let Some(template) = self.registry.template(path) {
                return Ok(world
                    .instances_mut()
                    .assign(Instance::from_template(template, None)));
            }
            tracing::warn!(%path, x, y, "skipping unknown ground type");
            report.skipped.push(SkippedPlacement {
                path: path.clone(),
                x,
                y,
            });
        }

        let base = TypePath::ground_root();
        let template = self
            .registry
            .template(&base)
            .ok_or_else(|| LoadError::MissingBaseGround { path: base.clone() })?;
        Ok(world
            .instances_mut()
            .assign(Instance::from_template(template, None)))
    }

    /// Specialize and instantiate one placed object with the cell's ground
    /// as its container. Unknown types are skipped, never fatal: one bad
    /// placement must not abort the load.
    fn place_object(
        &self,
        placement: &ObjectPlacement,
        ground: InstanceId,
        world: &mut World,
        report: &mut LoadReport,
        x: i32,
        y: i32,
    ) {
        let Some(base) = self.registry.template(&placement.path) else {
            tracing::warn!(path = %placement.path, x, y, "skipping unknown object type");
            report.skipped.push(SkippedPlacement {
                path: placement.path.clone(),
                x,
                y,
            });
            return;
        };

        let effective = specialize(base, &placement.overrides);
        world
            .instances_mut()
            .assign(Instance::from_template(&effective, Some(ground)));
        report.objects_placed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::{BlockCell, MapBlock};
    use mapforge_common::PropValue;
    use mapforge_template::{Template, TemplateSet};
    use std::collections::BTreeMap;

    fn registry() -> TemplateSet {
        let mut set = TemplateSet::new();
        set.insert(Template::new("/turf"));
        set.insert(Template::new("/turf/floor"));
        set.insert(Template::new("/area"));
        set.insert(Template::new("/area/room1"));
        set.insert(
            Template::new("/obj/table")
                .with_property("density", PropValue::Int(0))
                .with_property("name", PropValue::Text("table".into())),
        );
        set
    }

    fn block_cells(offsets: &[(i32, i32, &str)]) -> Vec<BlockCell> {
        offsets
            .iter()
            .map(|(dx, dy, symbol)| BlockCell {
                dx: *dx,
                dy: *dy,
                symbol: symbol.to_string(),
            })
            .collect()
    }

    fn floor_cell(region: Option<&str>) -> CellDefinition {
        CellDefinition {
            ground: Some(TypePath::new("/turf/floor")),
            region: region.map(TypePath::new),
            objects: Vec::new(),
        }
    }

    /// 2x2 map, one block, floor + room everywhere, one table with a
    /// density override in the corner cell.
    fn two_by_two() -> ParsedMap {
        let mut definitions = BTreeMap::new();
        let mut corner = floor_cell(Some("/area/room1"));
        corner.objects.push(ObjectPlacement {
            path: TypePath::new("/obj/table"),
            overrides: BTreeMap::from([("density".to_string(), PropValue::Int(1))]),
        });
        definitions.insert("a".to_string(), corner);
        definitions.insert("b".to_string(), floor_cell(Some("/area/room1")));

        ParsedMap {
            max_x: 3,
            max_y: 3,
            blocks: vec![MapBlock {
                x: 1,
                y: 1,
                cells: block_cells(&[(1, 1, "a"), (1, 2, "b"), (2, 1, "b"), (2, 2, "b")]),
            }],
            cell_definitions: definitions,
        }
    }

    #[test]
    fn two_by_two_end_to_end() {
        let loader = WorldLoader::new(registry());
        let LoadOutcome { mut world, report } = loader.load(&two_by_two()).unwrap();

        assert_eq!((world.width(), world.height()), (2, 2));
        assert_eq!(report.cells, 4);
        assert_eq!(report.objects_placed, 1);
        assert!(report.skipped.is_empty());

        // Every cell got a ground and the shared region.
        for x in 1..=2 {
            for y in 1..=2 {
                assert!(!world.ground_at(x, y).unwrap().is_unset());
                assert!(world.region_at(x, y).unwrap().is_some());
            }
        }

        // One region instance, anchored at the minimum corner.
        assert_eq!(world.regions().len(), 1);
        let room = world.regions().get(&TypePath::new("/area/room1")).unwrap();
        assert_eq!(room.anchor, (1, 1));

        // The table sits on the (1, 1) ground with its override applied.
        let corner_ground = world.ground_at(1, 1).unwrap();
        let table = world
            .instances()
            .iter()
            .find(|(_, inst)| inst.path().as_str() == "/obj/table")
            .map(|(_, inst)| inst)
            .unwrap();
        assert_eq!(table.location(), Some(corner_ground));
        assert_eq!(table.property("density"), Some(&PropValue::Int(1)));
        assert_eq!(table.property("name"), Some(&PropValue::Text("table".into())));

        // Exactly one notification per cell, in listed offset order.
        let changes = world.drain_changes();
        let coords: Vec<(i32, i32)> = changes.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(coords, vec![(1, 1), (1, 2), (2, 1), (2, 2)]);
    }

    #[test]
    fn grid_drops_outermost_row_and_column() {
        // Bounds (4, 4) allocate a 3x3 grid; the off-by-one is the load
        // format's historical behavior and is kept until a deliberate
        // decision changes it.
        let loader = WorldLoader::new(registry());
        let map = ParsedMap {
            max_x: 4,
            max_y: 4,
            blocks: Vec::new(),
            cell_definitions: BTreeMap::new(),
        };
        let outcome = loader.load(&map).unwrap();
        assert_eq!((outcome.world.width(), outcome.world.height()), (3, 3));
        assert!(matches!(
            outcome.world.ground_at(4, 1),
            Err(WorldError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn unknown_object_type_skips_but_loads_cell() {
        let loader = WorldLoader::new(registry());
        let mut map = two_by_two();
        map.cell_definitions
            .get_mut("b")
            .unwrap()
            .objects
            .push(ObjectPlacement {
                path: TypePath::new("/obj/legacy_console"),
                overrides: BTreeMap::new(),
            });

        let LoadOutcome { world, report } = loader.load(&map).unwrap();

        // Three "b" cells each referenced the stale type.
        assert_eq!(report.skipped.len(), 3);
        assert!(
            report
                .skipped
                .iter()
                .all(|s| s.path == TypePath::new("/obj/legacy_console"))
        );
        assert_eq!(report.objects_placed, 1);
        for x in 1..=2 {
            for y in 1..=2 {
                assert!(!world.ground_at(x, y).unwrap().is_unset());
                assert!(world.region_at(x, y).unwrap().is_some());
            }
        }
    }

    #[test]
    fn unknown_ground_type_falls_back_to_base() {
        let loader = WorldLoader::new(registry());
        let mut map = two_by_two();
        map.cell_definitions.get_mut("a").unwrap().ground = Some(TypePath::new("/turf/lava"));

        let LoadOutcome { world, report } = loader.load(&map).unwrap();

        let ground = world.ground_at(1, 1).unwrap();
        let instance = world.instances().resolve(ground).unwrap();
        assert_eq!(instance.path(), &TypePath::ground_root());
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, TypePath::new("/turf/lava"));
    }

    #[test]
    fn missing_region_defaults_to_base_region() {
        let loader = WorldLoader::new(registry());
        let mut map = two_by_two();
        for definition in map.cell_definitions.values_mut() {
            definition.region = None;
        }

        let LoadOutcome { world, .. } = loader.load(&map).unwrap();
        let region = world.region_at(1, 1).unwrap().unwrap();
        let instance = world.instances().resolve(region).unwrap();
        assert_eq!(instance.path(), &TypePath::region_root());
    }

    #[test]
    fn invalid_region_aborts_the_load() {
        let loader = WorldLoader::new(registry());
        let mut map = two_by_two();
        map.cell_definitions.get_mut("a").unwrap().region = Some(TypePath::new("/area/nowhere"));

        let err = loader.load(&map).unwrap_err();
        assert!(matches!(
            err,
            LoadError::World(WorldError::InvalidRegion { .. })
        ));
    }

    #[test]
    fn unknown_symbol_aborts_the_load() {
        let loader = WorldLoader::new(registry());
        let mut map = two_by_two();
        map.blocks[0].cells[2].symbol = "z".to_string();

        let err = loader.load(&map).unwrap_err();
        assert_eq!(err, LoadError::UnknownSymbol {
            symbol: "z".to_string(),
            x: 2,
            y: 1,
        });
    }

    #[test]
    fn missing_base_ground_template_is_fatal() {
        // No "/turf" base template registered at all.
        let mut set = TemplateSet::new();
        set.insert(Template::new("/turf/floor"));
        set.insert(Template::new("/area/room1"));
        let loader = WorldLoader::new(set);
        let mut map = two_by_two();
        map.cell_definitions.get_mut("a").unwrap().ground = Some(TypePath::new("/turf/lava"));

        let err = loader.load(&map).unwrap_err();
        assert!(matches!(err, LoadError::MissingBaseGround { .. }));
    }

    #[test]
    fn block_origin_offsets_compose() {
        // A block anchored away from the origin lands its cells at
        // origin + offset - 1.
        let loader = WorldLoader::new(registry());
        let mut definitions = BTreeMap::new();
        definitions.insert("a".to_string(), floor_cell(Some("/area/room1")));
        let map = ParsedMap {
            max_x: 6,
            max_y: 6,
            blocks: vec![MapBlock {
                x: 3,
                y: 4,
                cells: block_cells(&[(1, 1, "a"), (2, 1, "a")]),
            }],
            cell_definitions: definitions,
        };

        let LoadOutcome { world, .. } = loader.load(&map).unwrap();
        assert!(!world.ground_at(3, 4).unwrap().is_unset());
        assert!(!world.ground_at(4, 4).unwrap().is_unset());
        assert!(world.ground_at(1, 1).unwrap().is_unset());
        assert_eq!(world.regions().get(&TypePath::new("/area/room1")).unwrap().anchor, (3, 4));
    }

    #[test]
    fn report_display_summarizes_skips() {
        let report = LoadReport {
            cells: 4,
            objects_placed: 1,
            skipped: vec![SkippedPlacement {
                path: TypePath::new("/obj/legacy_console"),
                x: 2,
                y: 1,
            }],
        };
        let text = report.to_string();
        assert!(text.contains("4 cells"));
        assert!(text.contains("1 unknown types skipped"));
        assert!(text.contains("/obj/legacy_console at (2, 1)"));
    }
}
