use crate::Template;
use mapforge_common::PropValue;
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Apply per-placement property overrides to a base template.
///
/// With no overrides the base is returned as-is; otherwise a clone is made
/// and each override replaces the clone's default for that name, but only
/// when the base template declares the property. Unknown override names are
/// dropped silently: maps referencing renamed or removed properties must
/// keep loading.
pub fn specialize<'a>(
    base: &'a Template,
    overrides: &BTreeMap<String, PropValue>,
) -> Cow<'a, Template> {
    if overrides.is_empty() {
        return Cow::Borrowed(base);
    }

    let mut effective = base.clone();
    for (name, value) in overrides {
        if effective.declares(name) {
            effective.properties.insert(name.clone(), value.clone());
        }
    }
    Cow::Owned(effective)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Template {
        Template::new("/obj/table")
            .with_property("density", PropValue::Int(0))
            .with_property("name", PropValue::Text("table".into()))
    }

    fn overrides(pairs: &[(&str, PropValue)]) -> BTreeMap<String, PropValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn empty_overrides_borrow_the_base() {
        let base = table();
        let effective = specialize(&base, &BTreeMap::new());
        assert!(matches!(effective, Cow::Borrowed(_)));
        assert_eq!(*effective, base);
    }

    #[test]
    fn override_replaces_declared_property() {
        let base = table();
        let effective = specialize(&base, &overrides(&[("density", PropValue::Int(1))]));
        assert_eq!(effective.properties["density"], PropValue::Int(1));
        assert_eq!(effective.properties["name"], PropValue::Text("table".into()));
    }

    #[test]
    fn base_is_never_mutated() {
        let base = table();
        let mut effective = specialize(&base, &overrides(&[("density", PropValue::Int(1))]));
        effective
            .to_mut()
            .properties
            .insert("name".into(), PropValue::Text("altered".into()));
        assert_eq!(base.properties["density"], PropValue::Int(0));
        assert_eq!(base.properties["name"], PropValue::Text("table".into()));
    }

    #[test]
    fn unknown_override_name_is_ignored() {
        let base = table();
        let effective = specialize(&base, &overrides(&[("opacity", PropValue::Int(7))]));
        assert!(!effective.declares("opacity"));
        assert_eq!(effective.properties.len(), base.properties.len());
    }
}
