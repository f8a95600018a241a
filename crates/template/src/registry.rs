use mapforge_common::{PropValue, TypePath};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A type's declared default property set, looked up by path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub path: TypePath,
    #[serde(default)]
    pub properties: BTreeMap<String, PropValue>,
}

impl Template {
    pub fn new(path: impl Into<TypePath>) -> Self {
        Self {
            path: path.into(),
            properties: BTreeMap::new(),
        }
    }

    /// Builder-style property declaration, used heavily in tests.
    pub fn with_property(mut self, name: impl Into<String>, value: PropValue) -> Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn declares(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }
}

/// The type-template registry boundary consumed by the world pipeline.
///
/// The concrete registry belongs to the wider object system; the pipeline
/// receives it by reference at construction time so it can be faked in tests.
pub trait TypeRegistry {
    fn has_template(&self, path: &TypePath) -> bool;
    fn template(&self, path: &TypePath) -> Option<&Template>;
}

/// Errors from template-set operations.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// In-memory template registry.
///
/// Indexed by type path; loadable from a JSON array of templates for
/// the CLI and for test fixtures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateSet {
    templates: BTreeMap<TypePath, Template>,
}

impl TemplateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template, replacing any previous one at the same path.
    pub fn insert(&mut self, template: Template) {
        self.templates.insert(template.path.clone(), template);
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Load a template set from a JSON file containing an array of templates.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let templates: Vec<Template> = serde_json::from_str(&data)?;
        let mut set = Self::new();
        for template in templates {
            set.insert(template);
        }
        Ok(set)
    }
}

impl TypeRegistry for TemplateSet {
    fn has_template(&self, path: &TypePath) -> bool {
        self.templates.contains_key(path)
    }

    fn template(&self, path: &TypePath) -> Option<&Template> {
        self.templates.get(path)
    }
}
