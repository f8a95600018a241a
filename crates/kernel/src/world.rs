use crate::instance::Instances;
use crate::region::RegionRegistry;
use mapforge_common::{InstanceId, PropValue, TypePath};
use mapforge_template::TypeRegistry;
use serde::{Deserialize, Serialize};

/// Errors from world-state mutation and queries.
///
/// All of these are fatal to a load in progress: the grid is left partially
/// populated and callers must retry from scratch. Messages name the
/// offending coordinate and type path for map-authoring diagnosis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorldError {
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimension { width: i32, height: i32 },
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
    #[error("{path} at ({x}, {y}) is not a descendant of {expected}")]
    TypeMismatch {
        x: i32,
        y: i32,
        path: TypePath,
        expected: TypePath,
    },
    #[error("invalid region {path} at ({x}, {y})")]
    InvalidRegion { x: i32, y: i32, path: TypePath },
    #[error("unknown instance id {id}")]
    UnknownInstance { id: InstanceId },
}

/// One grid cell: the numeric id of its ground instance and a reference to
/// its region, if assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ground: InstanceId,
    pub region: Option<InstanceId>,
}

impl Cell {
    fn empty() -> Self {
        Self {
            ground: InstanceId::UNSET,
            region: None,
        }
    }
}

/// A ground-placement notification for the synchronization layer.
///
/// One is appended per successful `set_ground`, in call order; the sync
/// layer may rely on that ordering within one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundChange {
    pub x: i32,
    pub y: i32,
    pub ground: InstanceId,
}

/// The authoritative spatial world state.
///
/// A dense 2D grid of cells plus the instance arena and region registry
/// behind them. Public coordinates are 1-based, matching the map source
/// convention; storage is 0-based. All mutations go through explicit
/// operations and every ground placement feeds the change log.
#[derive(Debug, Clone, Default)]
pub struct World {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    instances: Instances,
    regions: RegionRegistry,
    /// Append-only log of ground placements, drained by the sync layer.
    change_log: Vec<GroundChange>,
}

impl World {
    /// Allocate a fresh grid. Every cell starts with the sentinel ground id
    /// and no region.
    pub fn allocate(width: i32, height: i32) -> Result<Self, WorldError> {
        if width <= 0 || height <= 0 {
            return Err(WorldError::InvalidDimension { width, height });
        }
        tracing::debug!(width, height, "allocated world grid");
        Ok(Self {
            width,
            height,
            cells: vec![Cell::empty(); (width * height) as usize],
            instances: Instances::new(),
            regions: RegionRegistry::new(),
            change_log: Vec::new(),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn instances(&self) -> &Instances {
        &self.instances
    }

    pub fn instances_mut(&mut self) -> &mut Instances {
        &mut self.instances
    }

    pub fn regions(&self) -> &RegionRegistry {
        &self.regions
    }

    /// Read-only access to the pending change feed.
    pub fn changes(&self) -> &[GroundChange] {
        &self.change_log
    }

    /// Drain and return the change feed, in placement order.
    pub fn drain_changes(&mut self) -> Vec<GroundChange> {
        std::mem::take(&mut self.change_log)
    }

    /// Map a 1-based public coordinate to a storage index.
    fn index(&self, x: i32, y: i32) -> Result<usize, WorldError> {
        if x < 1 || y < 1 || x > self.width || y > self.height {
            return Err(WorldError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(((x - 1) * self.height + (y - 1)) as usize)
    }

    /// Place a ground instance at `(x, y)`.
    ///
    /// The instance's type must be a descendant of the ground category. Its
    /// `x`/`y` properties are set to the coordinate and `z` to the fixed
    /// plane 1, the cell stores its numeric id, and a `GroundChange` is
    /// appended to the feed.
    pub fn set_ground(&mut self, x: i32, y: i32, ground: InstanceId) -> Result<(), WorldError> {
        let index = self.index(x, y)?;
        let instance = self
            .instances
            .resolve_mut(ground)
            .ok_or(WorldError::UnknownInstance { id: ground })?;

        let ground_root = TypePath::ground_root();
        if !instance.path().is_descendant_of(&ground_root) {
            return Err(WorldError::TypeMismatch {
                x,
                y,
                path: instance.path().clone(),
                expected: ground_root,
            });
        }

        instance.set_property("x", PropValue::Int(x as i64));
        instance.set_property("y", PropValue::Int(y as i64));
        instance.set_property("z", PropValue::Int(1));

        self.cells[index].ground = ground;
        self.change_log.push(GroundChange { x, y, ground });
        Ok(())
    }

    /// Assign the region at `(x, y)` by type path.
    ///
    /// The path must be a descendant of the region category with a
    /// registered template. The region singleton is created on first use and
    /// its bounding anchor extended with each assignment.
    pub fn set_region(
        &mut self,
        x: i32,
        y: i32,
        path: &TypePath,
        registry: &dyn TypeRegistry,
    ) -> Result<(), WorldError> {
        let index = self.index(x, y)?;
        if !path.is_descendant_of(&TypePath::region_root()) || !registry.has_template(path) {
            return Err(WorldError::InvalidRegion {
                x,
                y,
                path: path.clone(),
            });
        }

        let region = self
            .regions
            .assign_cell(path, x, y, registry, &mut self.instances)?;
        self.cells[index].region = Some(region);
        Ok(())
    }

    /// Ground id stored at `(x, y)`.
    pub fn ground_at(&self, x: i32, y: i32) -> Result<InstanceId, WorldError> {
        Ok(self.cells[self.index(x, y)?].ground)
    }

    /// Region reference stored at `(x, y)`.
    pub fn region_at(&self, x: i32, y: i32) -> Result<Option<InstanceId>, WorldError> {
        Ok(self.cells[self.index(x, y)?].region)
    }

    /// Find the coordinate holding `ground`, or `(0, 0)` if it is nowhere
    /// on the grid.
    ///
    /// Linear scan in row-major order (x outer, y inner), returning the
    /// first match. O(width * height); a diagnostic lookup, not a load-path
    /// one.
    pub fn locate_ground(&self, ground: InstanceId) -> (i32, i32) {
        if ground.is_unset() {
            return (0, 0);
        }
        for x in 0..self.width {
            for y in 0..self.height {
                if self.cells[(x * self.height + y) as usize].ground == ground {
                    return (x + 1, y + 1);
                }
            }
        }
        (0, 0)
    }
}
