//! Schema type + format -> target-language type name.

use crate::error::{IrError, Result, describe};
use crate::language::{ANY_KEY, TypeMap, UNTYPED_KEY};
use crate::spec::AdditionalProperties;

use super::utils::NamingRules;

/// Looks up type names in one language's table.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'a> {
    map: &'a TypeMap,
    naming: NamingRules,
}

impl<'a> TypeMapper<'a> {
    pub fn new(map: &'a TypeMap, naming: NamingRules) -> Self {
        Self { map, naming }
    }

    /// Map a schema type to a type name, or `None` if the table has no entry for it.
    ///
    /// Parameterized entries (maps) receive the value type of
    /// `additional_properties` as their inner type.
    pub fn map_type(
        &self,
        schema_type: Option<&str>,
        format: Option<&str>,
        additional_properties: Option<&AdditionalProperties>,
    ) -> Result<Option<String>> {
        let inner = self.additional_properties_type(additional_properties)?;
        let key = schema_type.unwrap_or(UNTYPED_KEY);
        Ok(self.map.get(key).map(|entry| entry.resolve(&inner, format)))
    }

    /// Wrap an element type name in the language's array type.
    pub fn array_of(&self, item_type: &str) -> Result<String> {
        self.map
            .get("array")
            .map(|entry| entry.resolve(item_type, None))
            .ok_or_else(|| IrError::MissingTypeMapping {
                key: "array".to_string(),
            })
    }

    fn any_type(&self) -> String {
        match self.map.get(ANY_KEY) {
            Some(entry) => entry.resolve("", None),
            None => "Any".to_string(),
        }
    }

    fn additional_properties_type(
        &self,
        additional_properties: Option<&AdditionalProperties>,
    ) -> Result<String> {
        let schema = match additional_properties {
            Some(AdditionalProperties::Schema(schema)) => schema,
            Some(AdditionalProperties::Bool(_)) | None => return Ok(self.any_type()),
        };
        if let Some(reference) = &schema.ref_path {
            return Ok(self.naming.class_name_from_ref(reference));
        }
        if schema.schema_type.as_deref() == Some("object") {
            return Err(IrError::UnsupportedMapValue {
                dump: describe(schema),
            });
        }
        let mapped = self.map_type(
            schema.schema_type.as_deref(),
            schema.format.as_deref(),
            schema.additional_properties.as_ref(),
        )?;
        mapped.ok_or_else(|| IrError::UnknownSchemaShape {
            schema_type: schema
                .schema_type
                .clone()
                .unwrap_or_else(|| UNTYPED_KEY.to_string()),
            dump: describe(schema),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::language::{Language, TypeMapping};
    use crate::spec::Schema;

    fn mapper(lang: &Language) -> TypeMapper<'_> {
        TypeMapper::new(lang.type_map(), lang.naming())
    }

    fn additional(json: &str) -> AdditionalProperties {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_primitive_mapping() {
        let swift = Language::Swift;
        let types = mapper(&swift);
        assert_eq!(
            types.map_type(Some("integer"), Some("int64"), None).unwrap(),
            Some("Int64".to_string())
        );
        assert_eq!(
            types.map_type(None, None, None).unwrap(),
            Some("Void".to_string())
        );
        assert_eq!(types.map_type(Some("uuid-ish"), None, None).unwrap(), None);
    }

    #[test]
    fn test_map_value_types() {
        let swift = Language::Swift;
        let types = mapper(&swift);

        let by_ref = additional(r##"{ "$ref": "#/definitions/Pet" }"##);
        assert_eq!(
            types.map_type(Some("object"), None, Some(&by_ref)).unwrap(),
            Some("Dictionary<String, Pet>".to_string())
        );

        let primitive = additional(r#"{ "type": "integer" }"#);
        assert_eq!(
            types.map_type(Some("object"), None, Some(&primitive)).unwrap(),
            Some("Dictionary<String, Int32>".to_string())
        );

        assert_eq!(
            types.map_type(Some("object"), None, None).unwrap(),
            Some("Dictionary<String, Any>".to_string())
        );
    }

    #[test]
    fn test_js_any_type() {
        let js = Language::Js;
        let types = mapper(&js);
        assert_eq!(
            types.map_type(Some("object"), None, Some(&AdditionalProperties::Bool(true))).unwrap(),
            Some("Map<string, any>".to_string())
        );
    }

    #[test]
    fn test_inline_object_map_values_rejected() {
        let swift = Language::Swift;
        let types = mapper(&swift);
        let inline = AdditionalProperties::Schema(Box::new(Schema {
            schema_type: Some("object".to_string()),
            ..Schema::default()
        }));
        let err = types.map_type(Some("object"), None, Some(&inline)).unwrap_err();
        assert!(matches!(err, IrError::UnsupportedMapValue { .. }));
    }

    #[test]
    fn test_array_of() {
        let kotlin = Language::Kotlin;
        assert_eq!(mapper(&kotlin).array_of("Pet").unwrap(), "List<Pet>");
    }
}
