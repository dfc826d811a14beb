//! Passes over the raw model list: deduplication, splitting and subclass links.

use tracing::trace;

use super::types::{EnumModel, Model, ObjectModel, SubclassRef};

/// Drop models structurally equal to an earlier one, ignoring descriptions.
///
/// The first occurrence is kept, descriptions included.
pub fn dedupe(models: Vec<Model>) -> Vec<Model> {
    let mut kept: Vec<Model> = Vec::with_capacity(models.len());
    let mut stripped: Vec<Model> = Vec::with_capacity(models.len());
    for model in models {
        let bare = model.without_descriptions();
        if stripped.contains(&bare) {
            trace!(model = model.name(), "Dropping duplicate model.");
            continue;
        }
        stripped.push(bare);
        kept.push(model);
    }
    kept
}

/// Partition models into object and enum lists, keeping relative order.
pub fn split(models: Vec<Model>) -> (Vec<ObjectModel>, Vec<EnumModel>) {
    let mut objects = Vec::new();
    let mut enums = Vec::new();
    for model in models {
        match model {
            Model::Object(m) => objects.push(m),
            Model::Enum(m) => enums.push(m),
        }
    }
    (objects, enums)
}

/// Attach to every object model the models naming it as superclass, in list order.
pub fn resolve_subclasses(mut objects: Vec<ObjectModel>) -> Vec<ObjectModel> {
    let links: Vec<Vec<SubclassRef>> = objects
        .iter()
        .map(|model| {
            objects
                .iter()
                .filter(|sub| sub.superclass_name.as_deref() == Some(model.name.as_str()))
                .map(|sub| SubclassRef {
                    name: sub.name.clone(),
                    spec_name: sub.spec_name.clone(),
                })
                .collect()
        })
        .collect();
    for (model, subclasses) in objects.iter_mut().zip(links) {
        model.subclasses = subclasses;
    }
    objects
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::ir::types::{EnumCase, Property};

    fn object(name: &str, superclass: Option<&str>, description: Option<&str>) -> ObjectModel {
        ObjectModel {
            name: name.to_string(),
            spec_name: name.to_string(),
            superclass_name: superclass.map(str::to_string),
            properties: vec![Property {
                name: "id".to_string(),
                spec_name: "id".to_string(),
                type_name: "String".to_string(),
                format: None,
                is_required: true,
                description: description.map(str::to_string),
            }],
            inherited_properties: Vec::new(),
            initializer_properties: Vec::new(),
            nested_models: Vec::new(),
            subclasses: Vec::new(),
            discriminator: None,
            description: description.map(str::to_string),
        }
    }

    fn color() -> EnumModel {
        EnumModel {
            name: "Color".to_string(),
            enum_type: "String".to_string(),
            values: vec![EnumCase {
                name: "red".to_string(),
                u_name: "RED".to_string(),
                literal: "\"red\"".to_string(),
            }],
        }
    }

    #[test]
    fn test_dedupe_ignores_descriptions() {
        let models = vec![
            Model::Object(object("Pet", None, Some("first"))),
            Model::Enum(color()),
            Model::Object(object("Pet", None, Some("second"))),
            Model::Enum(color()),
        ];
        let deduped = dedupe(models);
        assert_eq!(deduped.len(), 2);
        let Model::Object(pet) = &deduped[0] else {
            panic!("expected Pet first");
        };
        assert_eq!(pet.description.as_deref(), Some("first"));
    }

    #[test]
    fn test_dedupe_keeps_structural_differences() {
        let mut other = object("Pet", None, None);
        other.properties[0].type_name = "Int32".to_string();
        let deduped = dedupe(vec![
            Model::Object(object("Pet", None, None)),
            Model::Object(other),
        ]);
        assert_eq!(deduped.len(), 2);
    }

    #[test]
    fn test_split_keeps_order() {
        let (objects, enums) = split(vec![
            Model::Object(object("B", None, None)),
            Model::Enum(color()),
            Model::Object(object("A", None, None)),
        ]);
        let names: Vec<_> = objects.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
        assert_eq!(enums.len(), 1);
    }

    #[test]
    fn test_resolve_subclasses() {
        let objects = resolve_subclasses(vec![
            object("Animal", None, None),
            object("Dog", Some("Animal"), None),
            object("Cat", Some("Animal"), None),
            object("Puppy", Some("Dog"), None),
        ]);
        let subclasses = |i: usize| {
            objects[i]
                .subclasses
                .iter()
                .map(|s| s.name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(subclasses(0), ["Dog", "Cat"]);
        assert_eq!(subclasses(1), ["Puppy"]);
        assert!(subclasses(2).is_empty());
        assert!(subclasses(3).is_empty());
    }
}
