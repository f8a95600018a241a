use crate::instance::{Instance, Instances};
use crate::world::WorldError;
use mapforge_common::{InstanceId, PropValue, TypePath};
use mapforge_template::TypeRegistry;
use std::collections::BTreeMap;

/// Bookkeeping for one deduplicated region.
///
/// The anchor is the component-wise minimum of every coordinate ever
/// assigned to the region: a stable corner reference, not a bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub instance: InstanceId,
    pub anchor: (i32, i32),
}

/// Deduplicates region instances by type path within one load.
#[derive(Debug, Clone, Default)]
pub struct RegionRegistry {
    regions: BTreeMap<TypePath, Region>,
}

impl RegionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, path: &TypePath) -> Option<&Region> {
        self.regions.get(path)
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypePath, &Region)> {
        self.regions.iter()
    }

    /// Get or lazily create the region singleton for `path`, then extend its
    /// anchor with `(x, y)`. The anchor minimum is mirrored into the region
    /// instance's `x`/`y` properties.
    ///
    /// Precondition: the caller has already verified a template is
    /// registered for `path`.
    pub(crate) fn assign_cell(
        &mut self,
        path: &TypePath,
        x: i32,
        y: i32,
        registry: &dyn TypeRegistry,
        instances: &mut Instances,
    ) -> Result<InstanceId, WorldError> {
        if !self.regions.contains_key(path) {
            // Regions are instantiated plain from their template; map
            // overrides never apply to them.
            let template = registry
                .template(path)
                .ok_or_else(|| WorldError::InvalidRegion {
                    x,
                    y,
                    path: path.clone(),
                })?;
            let instance = instances.assign(Instance::from_template(template, None));
            tracing::debug!(%path, %instance, "created region");
            self.regions.insert(path.clone(), Region {
                instance,
                anchor: (x, y),
            });
        }

        // Inserted above if it was absent.
        let region = match self.regions.get_mut(path) {
            Some(region) => region,
            None => {
                return Err(WorldError::InvalidRegion {
                    x,
                    y,
                    path: path.clone(),
                });
            }
        };

        if x < region.anchor.0 {
            region.anchor.0 = x;
        }
        if y < region.anchor.1 {
            region.anchor.1 = y;
        }
        if let Some(instance) = instances.resolve_mut(region.instance) {
            instance.set_property("x", PropValue::Int(region.anchor.0 as i64));
            instance.set_property("y", PropValue::Int(region.anchor.1 as i64));
        }

        Ok(region.instance)
    }
}
