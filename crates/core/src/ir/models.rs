//! Schema -> model synthesis.
//!
//! Every schema reachable from an operation or a definition is turned into a
//! use-site [`TypeInfo`] plus the models it requires: objects, enums, inline
//! objects promoted to nested models, and superclasses.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::error::{IrError, Result, describe};
use crate::language::{TypeMapping, UNTYPED_KEY};
use crate::spec::{AdditionalProperties, Document, EnumValue, Schema, SchemaShape};

use super::resolve::{Normalizer, ResolveOptions};
use super::type_map::TypeMapper;
use super::types::{EnumCase, EnumModel, Model, ObjectModel, Property, TypeInfo};
use super::utils::{NamingRules, last_ref_component};

/// A use-site type together with the models it depends on, outermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesized {
    pub type_info: TypeInfo,
    pub models: Vec<Model>,
}

/// Turns schemas into models for one document and one target language.
#[derive(Debug)]
pub struct ModelSynthesizer<'a> {
    normalizer: Normalizer<'a>,
    types: TypeMapper<'a>,
    naming: NamingRules,
    snake: bool,
    /// Object models currently being built, outermost first.
    resolving: Vec<String>,
}

impl<'a> ModelSynthesizer<'a> {
    pub fn new(document: &'a Document, mapping: &'a dyn TypeMapping, snake: bool) -> Self {
        let naming = mapping.naming();
        Self {
            normalizer: Normalizer::new(document),
            types: TypeMapper::new(mapping.type_map(), naming),
            naming,
            snake,
            resolving: Vec::new(),
        }
    }

    /// Synthesize the type and models for `schema`.
    ///
    /// `default_name` names the model when the schema is not a `$ref`.
    pub fn from_schema(&mut self, schema: &Schema, default_name: &str) -> Result<Synthesized> {
        let name = match &schema.ref_path {
            Some(reference) => self.naming.class_name_from_ref(reference),
            None => self.naming.class_name(&[default_name], 0),
        };
        let spec_name = schema
            .ref_path
            .as_deref()
            .map_or(default_name, last_ref_component)
            .to_string();

        if schema.ref_path.is_some() {
            if self.resolving.last() == Some(&name) {
                trace!(model = %name, "Self reference, emitting name only.");
                return Ok(Synthesized {
                    type_info: TypeInfo::named(name),
                    models: Vec::new(),
                });
            }
            if let Some(start) = self.resolving.iter().position(|n| *n == name) {
                let mut chain = self.resolving[start..].to_vec();
                chain.push(name);
                return Err(IrError::CyclicReference {
                    chain: chain.join(" -> "),
                });
            }
        }

        let base = self.normalizer.resolve(schema, ResolveOptions::refs())?;
        let superclass_ref = base
            .all_of
            .as_ref()
            .and_then(|members| members.iter().find_map(|m| m.ref_path.clone()));
        let full = self.normalizer.resolve(
            &base,
            ResolveOptions::refs_and_all_of(superclass_ref.as_deref()),
        )?;

        match full.shape() {
            SchemaShape::Enum { base_type, values } => {
                let model = self.enum_model(&name, &full, base_type, values)?;
                Ok(Synthesized {
                    type_info: TypeInfo::named(name),
                    models: vec![Model::Enum(model)],
                })
            }
            SchemaShape::Array { items } => {
                let items = items.ok_or_else(|| IrError::ArrayWithoutItems {
                    dump: describe(&full),
                })?;
                let inner = self.from_schema(items, &name)?;
                Ok(Synthesized {
                    type_info: TypeInfo {
                        name: self.types.array_of(&inner.type_info.name)?,
                        format: inner.type_info.format,
                    },
                    models: inner.models,
                })
            }
            SchemaShape::Object { properties } => {
                self.resolving.push(name.clone());
                let built = self.object_models(
                    &name,
                    &spec_name,
                    &full,
                    properties,
                    superclass_ref.as_deref(),
                );
                self.resolving.pop();
                Ok(Synthesized {
                    type_info: TypeInfo::named(name),
                    models: built?,
                })
            }
            SchemaShape::Primitive {
                schema_type,
                format,
            } => {
                let models = match &full.additional_properties {
                    Some(AdditionalProperties::Schema(value)) => self.from_schema(value, "")?.models,
                    _ => Vec::new(),
                };
                let mapped = self
                    .types
                    .map_type(schema_type, format, full.additional_properties.as_ref())?
                    .ok_or_else(|| IrError::UnknownSchemaShape {
                        schema_type: schema_type.unwrap_or(UNTYPED_KEY).to_string(),
                        dump: describe(&full),
                    })?;
                let format = if schema_type == Some("string") {
                    format.map(str::to_string)
                } else {
                    None
                };
                Ok(Synthesized {
                    type_info: TypeInfo {
                        name: mapped,
                        format,
                    },
                    models,
                })
            }
        }
    }

    fn enum_model(
        &self,
        name: &str,
        full: &Schema,
        base_type: Option<&str>,
        values: &[EnumValue],
    ) -> Result<EnumModel> {
        let enum_type = self
            .types
            .map_type(base_type, full.format.as_deref(), None)?
            .ok_or_else(|| IrError::UnknownSchemaShape {
                schema_type: base_type.unwrap_or(UNTYPED_KEY).to_string(),
                dump: describe(full),
            })?;
        let quoted = base_type == Some("string");
        let values = values
            .iter()
            .map(|value| {
                let text = value.as_text();
                EnumCase {
                    name: self.naming.identifier(&[text.as_str()], self.snake),
                    u_name: self.naming.enum_case_name(&[text.as_str()]),
                    literal: if quoted { format!("\"{text}\"") } else { text },
                }
            })
            .collect();
        trace!(model = %name, enum_type = %enum_type, "Synthesized enum model.");
        Ok(EnumModel {
            name: name.to_string(),
            enum_type,
            values,
        })
    }

    fn object_models(
        &mut self,
        name: &str,
        spec_name: &str,
        full: &Schema,
        properties: &IndexMap<String, Schema>,
        superclass_ref: Option<&str>,
    ) -> Result<Vec<Model>> {
        debug!(model = %name, properties = properties.len(), "Synthesizing object model.");

        let mut own = Vec::with_capacity(properties.len());
        let mut nested_models = Vec::new();
        let mut siblings = Vec::new();

        for (prop_name, prop_schema) in properties {
            let inline = prop_schema.is_inline_object();
            let default_name = self
                .naming
                .class_name(&[name, prop_name.as_str()], usize::from(inline));
            let Synthesized {
                mut type_info,
                models,
            } = self.from_schema(prop_schema, &default_name)?;

            let mut models = models.into_iter();
            if inline {
                match models.next() {
                    Some(Model::Object(child)) => {
                        type_info.name = format!("{name}.{}", child.name);
                        nested_models.push(child);
                    }
                    Some(other) => siblings.push(other),
                    None => {}
                }
            }
            siblings.extend(models);

            own.push(Property {
                name: self.naming.identifier(&[prop_name.as_str()], self.snake),
                spec_name: prop_name.clone(),
                type_name: type_info.name,
                format: type_info.format,
                is_required: full.is_required(prop_name),
                description: prop_schema.description.clone(),
            });
        }

        let mut superclass_name = None;
        let mut inherited: Vec<Property> = Vec::new();
        let mut superclass_models = Vec::new();
        if let Some(reference) = superclass_ref {
            let superclass = Schema {
                ref_path: Some(reference.to_string()),
                ..Schema::default()
            };
            let synthesized = self.from_schema(&superclass, "")?;
            if let Some(Model::Object(parent)) = synthesized.models.first() {
                inherited = parent
                    .properties
                    .iter()
                    .chain(&parent.inherited_properties)
                    .cloned()
                    .collect();
            }
            superclass_name = Some(synthesized.type_info.name);
            superclass_models = synthesized.models;
        }

        own.retain(|p| !inherited.iter().any(|i| i.same_signature(p)));
        let initializer_properties = own
            .iter()
            .chain(
                inherited
                    .iter()
                    .filter(|i| !own.iter().any(|p| p.name == i.name)),
            )
            .cloned()
            .collect();

        let model = ObjectModel {
            name: name.to_string(),
            spec_name: spec_name.to_string(),
            superclass_name,
            properties: own,
            inherited_properties: inherited,
            initializer_properties,
            nested_models,
            subclasses: Vec::new(),
            discriminator: full.discriminator.clone(),
            description: full.description.clone(),
        };

        let mut models = Vec::with_capacity(1 + siblings.len() + superclass_models.len());
        models.push(Model::Object(model));
        models.extend(siblings);
        models.extend(superclass_models);
        Ok(models)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::language::Language;

    const PETSTORE: &str = r##"{
      "paths": {},
      "definitions": {
        "Status": { "type": "string", "enum": ["available", "in-progress", "sold"] },
        "Priority": { "type": "integer", "enum": [1, 2] },
        "Animal": {
          "type": "object",
          "required": ["name"],
          "properties": { "name": { "type": "string" } }
        },
        "Dog": {
          "allOf": [
            { "$ref": "#/definitions/Animal" },
            { "properties": { "bark": { "type": "boolean" } } }
          ]
        },
        "TreeNode": {
          "type": "object",
          "properties": {
            "value": { "type": "string" },
            "children": { "type": "array", "items": { "$ref": "#/definitions/TreeNode" } }
          }
        },
        "Owner": {
          "type": "object",
          "properties": { "pet": { "$ref": "#/definitions/OwnedPet" } }
        },
        "OwnedPet": {
          "type": "object",
          "properties": { "owner": { "$ref": "#/definitions/Owner" } }
        },
        "Pet": {
          "type": "object",
          "properties": {
            "born": { "type": "string", "format": "date-time" },
            "collar": {
              "type": "object",
              "properties": { "size": { "type": "integer" } }
            },
            "tags": { "type": "object", "additionalProperties": { "$ref": "#/definitions/Status" } }
          }
        },
        "Broken": { "type": "array" }
      }
    }"##;

    fn synthesize(definition: &str) -> Result<Synthesized> {
        let doc = Document::from_json(PETSTORE).unwrap();
        let swift = Language::Swift;
        let mut synthesizer = ModelSynthesizer::new(&doc, &swift, false);
        let schema = doc.spec().definitions[definition].clone();
        synthesizer.from_schema(&schema, definition)
    }

    fn synthesize_in(json: &str, definition: &str) -> Vec<Model> {
        let doc = Document::from_json(json).unwrap();
        let swift = Language::Swift;
        let mut synthesizer = ModelSynthesizer::new(&doc, &swift, false);
        synthesizer
            .from_schema(&doc.spec().definitions[definition], definition)
            .unwrap()
            .models
    }

    fn typed(properties: &[Property]) -> Vec<String> {
        properties
            .iter()
            .map(|p| format!("{}:{}", p.name, p.type_name))
            .collect()
    }

    fn object(model: &Model) -> &ObjectModel {
        match model {
            Model::Object(m) => m,
            Model::Enum(m) => panic!("expected an object, got enum {}", m.name),
        }
    }

    #[test]
    fn test_string_enum_cases() {
        let result = synthesize("Status").unwrap();
        assert_eq!(result.type_info, TypeInfo::named("Status"));
        let Model::Enum(model) = &result.models[0] else {
            panic!("expected an enum");
        };
        assert_eq!(model.enum_type, "String");
        let cases: Vec<_> = model
            .values
            .iter()
            .map(|c| (c.name.as_str(), c.u_name.as_str(), c.literal.as_str()))
            .collect();
        assert_eq!(
            cases,
            [
                ("available", "AVAILABLE", "\"available\""),
                ("inProgress", "IN_PROGRESS", "\"in-progress\""),
                ("sold", "SOLD", "\"sold\""),
            ]
        );
    }

    #[test]
    fn test_integer_enum_literals_unquoted() {
        let result = synthesize("Priority").unwrap();
        let Model::Enum(model) = &result.models[0] else {
            panic!("expected an enum");
        };
        assert_eq!(model.enum_type, "Int32");
        assert_eq!(model.values[0].literal, "1");
        assert_eq!(model.values[0].name, "_1");
    }

    #[test]
    fn test_inheritance() {
        let result = synthesize("Dog").unwrap();
        let names: Vec<_> = result.models.iter().map(Model::name).collect();
        assert_eq!(names, ["Dog", "Animal"]);

        let dog = object(&result.models[0]);
        assert_eq!(dog.superclass_name.as_deref(), Some("Animal"));
        let own: Vec<_> = dog.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(own, ["bark"]);
        let inherited: Vec<_> = dog
            .inherited_properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(inherited, ["name"]);
        assert!(dog.inherited_properties[0].is_required);
        let init: Vec<_> = dog
            .initializer_properties
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(init, ["bark", "name"]);
    }

    #[test]
    fn test_redeclared_properties_at_inheritance_boundary() {
        let models = synthesize_in(
            r##"{ "paths": {}, "definitions": {
                "Animal": {
                  "type": "object",
                  "properties": { "id": { "type": "string" }, "age": { "type": "integer" } }
                },
                "Dog": {
                  "allOf": [
                    { "$ref": "#/definitions/Animal" },
                    { "properties": {
                        "id": { "type": "integer" },
                        "age": { "type": "integer", "description": "Age in years" }
                    } }
                  ]
                }
            } }"##,
            "Dog",
        );
        let dog = object(&models[0]);
        assert_eq!(typed(&dog.properties), ["id:Int32"]);
        assert_eq!(typed(&dog.inherited_properties), ["id:String", "age:Int32"]);
        assert_eq!(typed(&dog.initializer_properties), ["id:Int32", "age:Int32"]);
    }

    #[test]
    fn test_multi_level_inheritance() {
        let models = synthesize_in(
            r##"{ "paths": {}, "definitions": {
                "Animal": { "type": "object", "properties": { "name": { "type": "string" } } },
                "Dog": {
                  "allOf": [
                    { "$ref": "#/definitions/Animal" },
                    { "properties": { "bark": { "type": "boolean" } } }
                  ]
                },
                "Puppy": {
                  "allOf": [
                    { "$ref": "#/definitions/Dog" },
                    { "properties": { "age": { "type": "integer" } } }
                  ]
                }
            } }"##,
            "Puppy",
        );
        let names: Vec<_> = models.iter().map(Model::name).collect();
        assert_eq!(names, ["Puppy", "Dog", "Animal"]);

        let puppy = object(&models[0]);
        assert_eq!(puppy.superclass_name.as_deref(), Some("Dog"));
        assert_eq!(typed(&puppy.properties), ["age:Int32"]);
        assert_eq!(typed(&puppy.inherited_properties), ["bark:Bool", "name:String"]);

        let (objects, _) = crate::ir::split(models);
        let objects = crate::ir::resolve_subclasses(objects);
        let subclasses: Vec<_> = objects
            .iter()
            .map(|m| {
                let subs: Vec<_> = m.subclasses.iter().map(|s| s.name.as_str()).collect();
                (m.name.as_str(), subs)
            })
            .collect();
        assert_eq!(
            subclasses,
            [
                ("Puppy", vec![]),
                ("Dog", vec!["Puppy"]),
                ("Animal", vec!["Dog"]),
            ]
        );
    }

    #[test]
    fn test_inline_object_models_bubble_up() {
        let models = synthesize_in(
            r#"{ "paths": {}, "definitions": {
                "Pet": {
                  "type": "object",
                  "properties": {
                    "collar": {
                      "type": "object",
                      "properties": {
                        "color": { "type": "string", "enum": ["red", "blue"] },
                        "tag": { "type": "object", "properties": { "code": { "type": "string" } } }
                      }
                    }
                  }
                }
            } }"#,
            "Pet",
        );
        let names: Vec<_> = models.iter().map(Model::name).collect();
        assert_eq!(names, ["Pet", "CollarColor"]);

        let pet = object(&models[0]);
        assert_eq!(typed(&pet.properties), ["collar:Pet.Collar"]);
        let collar = &pet.nested_models[0];
        assert_eq!(collar.name, "Collar");
        assert_eq!(typed(&collar.properties), ["color:CollarColor", "tag:Collar.Tag"]);
        let grandchildren: Vec<_> = collar.nested_models.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(grandchildren, ["Tag"]);
    }

    #[test]
    fn test_self_reference_through_array() {
        let result = synthesize("TreeNode").unwrap();
        assert_eq!(result.models.len(), 1);
        let node = object(&result.models[0]);
        assert_eq!(node.properties[1].type_name, "Array<TreeNode>");
    }

    #[test]
    fn test_indirect_cycle_is_fatal() {
        let err = synthesize("Owner").unwrap_err();
        match err {
            IrError::CyclicReference { chain } => assert_eq!(chain, "Owner -> OwnedPet -> Owner"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_nested_object_and_map_values() {
        let result = synthesize("Pet").unwrap();
        let pet = object(&result.models[0]);

        assert_eq!(pet.properties[0].type_name, "Date");
        assert_eq!(pet.properties[0].format.as_deref(), Some("date-time"));

        assert_eq!(pet.properties[1].type_name, "Pet.Collar");
        assert_eq!(pet.nested_models.len(), 1);
        assert_eq!(pet.nested_models[0].name, "Collar");
        assert_eq!(pet.nested_models[0].properties[0].type_name, "Int32");

        assert_eq!(pet.properties[2].type_name, "Dictionary<String, Status>");
        let names: Vec<_> = result.models.iter().map(Model::name).collect();
        assert_eq!(names, ["Pet", "Status"]);
    }

    #[test]
    fn test_array_without_items_is_fatal() {
        let err = synthesize("Broken").unwrap_err();
        assert!(matches!(err, IrError::ArrayWithoutItems { .. }));
    }

    #[test]
    fn test_unmapped_type_is_fatal() {
        let doc = Document::from_json(r#"{ "paths": {} }"#).unwrap();
        let swift = Language::Swift;
        let mut synthesizer = ModelSynthesizer::new(&doc, &swift, false);
        let schema = Schema {
            schema_type: Some("uuid".to_string()),
            ..Schema::default()
        };
        let err = synthesizer.from_schema(&schema, "Id").unwrap_err();
        match err {
            IrError::UnknownSchemaShape { schema_type, .. } => assert_eq!(schema_type, "uuid"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_snake_case_properties() {
        let doc = Document::from_json(
            r#"{ "paths": {}, "definitions": {
                "User": { "properties": { "firstName": { "type": "string" } } }
            } }"#,
        )
        .unwrap();
        let kotlin = Language::Kotlin;
        let mut synthesizer = ModelSynthesizer::new(&doc, &kotlin, true);
        let result = synthesizer
            .from_schema(&doc.spec().definitions["User"], "User")
            .unwrap();
        let user = object(&result.models[0]);
        assert_eq!(user.properties[0].name, "first_name");
        assert_eq!(user.properties[0].spec_name, "firstName");
    }
}
