use serde::{Deserialize, Serialize};
use std::fmt;

/// A slash-separated type path, e.g. `/turf/floor` or `/area/room1`.
///
/// Paths form the type hierarchy: `/turf/floor` is a descendant of `/turf`.
/// Category membership (ground, region, object) is a pure path question and
/// needs no registry lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypePath(String);

impl TypePath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Root path of the ground ("turf") category.
    pub fn ground_root() -> Self {
        Self::new("/turf")
    }

    /// Root path of the region ("area") category.
    pub fn region_root() -> Self {
        Self::new("/area")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `self` is `ancestor` or lies below it in the hierarchy.
    pub fn is_descendant_of(&self, ancestor: &TypePath) -> bool {
        self == ancestor
            || (self.0.starts_with(&ancestor.0)
                && self.0.as_bytes().get(ancestor.0.len()) == Some(&b'/'))
    }
}

impl fmt::Display for TypePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypePath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

/// A property value stored on a template or a live instance.
///
/// Untagged so that map/template JSON reads naturally:
/// `{"density": 1, "name": "table"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
}

impl PropValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Opaque numeric identity for a live instance.
///
/// Ids are assigned sequentially by the instance arena starting at 1;
/// id 0 is the reserved sentinel for "no instance", which is what every
/// grid cell's ground id holds between allocation and population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub u32);

impl InstanceId {
    pub const UNSET: InstanceId = InstanceId(0);

    pub fn is_unset(self) -> bool {
        self == Self::UNSET
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
