use mapforge_common::{InstanceId, PropValue, TypePath};
use mapforge_template::Template;
use std::collections::BTreeMap;

/// A live instance constructed from a template.
///
/// Properties start as a copy of the (possibly specialized) template
/// defaults; the world writes position properties on placement. `location`
/// is the container the instance was placed into: the ground instance for
/// placed objects, none for grounds and regions themselves.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    path: TypePath,
    properties: BTreeMap<String, PropValue>,
    location: Option<InstanceId>,
}

impl Instance {
    /// Construct an instance from an effective template, running the
    /// initialization contract with the container as its single argument.
    pub fn from_template(template: &Template, location: Option<InstanceId>) -> Self {
        Self {
            path: template.path.clone(),
            properties: template.properties.clone(),
            location,
        }
    }

    pub fn path(&self) -> &TypePath {
        &self.path
    }

    pub fn location(&self) -> Option<InstanceId> {
        self.location
    }

    pub fn property(&self, name: &str) -> Option<&PropValue> {
        self.properties.get(name)
    }

    pub fn set_property(&mut self, name: impl Into<String>, value: PropValue) {
        self.properties.insert(name.into(), value);
    }
}

/// The identity arena owning all live instances.
///
/// Assigns each instance a sequential opaque id starting at 1, so that
/// `InstanceId::UNSET` (0) never resolves. The grid stores these ids rather
/// than direct references, keeping the per-cell footprint small.
#[derive(Debug, Clone, Default)]
pub struct Instances {
    slots: Vec<Instance>,
}

impl Instances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of an instance and assign its id.
    pub fn assign(&mut self, instance: Instance) -> InstanceId {
        self.slots.push(instance);
        InstanceId(self.slots.len() as u32)
    }

    pub fn resolve(&self, id: InstanceId) -> Option<&Instance> {
        if id.is_unset() {
            return None;
        }
        self.slots.get(id.0 as usize - 1)
    }

    pub fn resolve_mut(&mut self, id: InstanceId) -> Option<&mut Instance> {
        if id.is_unset() {
            return None;
        }
        self.slots.get_mut(id.0 as usize - 1)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate over all instances in assignment order.
    pub fn iter(&self) -> impl Iterator<Item = (InstanceId, &Instance)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, inst)| (InstanceId(i as u32 + 1), inst))
    }
}
