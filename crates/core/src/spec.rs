//! Swagger document structs for serde deserialization.
//!
//! This module defines the subset of the Swagger 2.0 document that the IR
//! synthesizer consumes. Maps are [`IndexMap`]s so declaration order survives
//! parsing; the engine relies on it for deterministic output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;
use crate::ir::{HttpMethod, ParamLocation};

/// A parsed API document: the typed view plus the raw tree for pointer lookups.
#[derive(Debug, Clone)]
pub struct Document {
    spec: SpecDocument,
    raw: Value,
}

/// Root of a Swagger document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecDocument {
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    #[serde(default)]
    pub definitions: IndexMap<String, Schema>,
    pub base_path: Option<String>,
    pub info: Option<Info>,
}

/// Document metadata.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    pub title: Option<String>,
    pub version: Option<String>,
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathItem {
    /// Path-level parameters shared by all operations.
    pub parameters: Option<Vec<Parameter>>,
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    pub trace: Option<Operation>,
}

/// An API operation (endpoint).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub parameters: Option<Vec<Parameter>>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
    pub produces: Option<Vec<String>>,
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
}

/// A parameter (path, query, header, body or form data).
///
/// Body parameters nest their type under `schema`; every other location
/// declares schema fields (`type`, `format`, `items`, ...) directly on the
/// parameter, which end up in `inline`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<ParamLocation>,
    #[serde(default)]
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
    #[serde(flatten)]
    pub inline: Schema,
}

/// A response definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<Schema>,
}

/// JSON Schema definition used in Swagger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Reference to another schema.
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub ref_path: Option<String>,

    /// The type of the schema (string, number, integer, boolean, object, array, file).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Format hint (e.g., date-time, int64).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Properties for object types, in declaration order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, Schema>>,

    /// Required property names for object types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// Item schema for array types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// Value schema for map types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Composition; a `$ref` member models the superclass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<Schema>>,

    /// Name of the property that tells subclasses apart.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}

/// Enum value can be string, integer, float, boolean, or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// The shape a fully resolved schema takes, which decides what gets synthesized.
#[derive(Debug, Clone, Copy)]
pub enum SchemaShape<'s> {
    Enum {
        base_type: Option<&'s str>,
        values: &'s [EnumValue],
    },
    Array {
        items: Option<&'s Schema>,
    },
    Object {
        properties: &'s IndexMap<String, Schema>,
    },
    Primitive {
        schema_type: Option<&'s str>,
        format: Option<&'s str>,
    },
}

impl Document {
    /// Build a document from an already parsed JSON tree.
    pub fn from_value(raw: Value) -> Result<Self> {
        let spec = SpecDocument::deserialize(&raw)?;
        Ok(Self { spec, raw })
    }

    /// Parse a document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Parse a document from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::from_value(serde_yaml::from_str(yaml)?)
    }

    pub fn spec(&self) -> &SpecDocument {
        &self.spec
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Version declared in `info.version`.
    pub fn version(&self) -> Option<&str> {
        self.spec.info.as_ref().and_then(|i| i.version.as_deref())
    }
}

impl PathItem {
    pub fn operation(&self, method: HttpMethod) -> Option<&Operation> {
        match method {
            HttpMethod::Get => self.get.as_ref(),
            HttpMethod::Put => self.put.as_ref(),
            HttpMethod::Post => self.post.as_ref(),
            HttpMethod::Delete => self.delete.as_ref(),
            HttpMethod::Options => self.options.as_ref(),
            HttpMethod::Head => self.head.as_ref(),
            HttpMethod::Patch => self.patch.as_ref(),
            HttpMethod::Trace => self.trace.as_ref(),
        }
    }
}

impl Schema {
    /// Classify a resolved schema. `$ref` and `allOf` are expected to be gone.
    pub fn shape(&self) -> SchemaShape<'_> {
        let schema_type = self.schema_type.as_deref();
        if let Some(values) = &self.enum_values {
            return SchemaShape::Enum {
                base_type: schema_type,
                values,
            };
        }
        if schema_type == Some("array") {
            return SchemaShape::Array {
                items: self.items.as_deref(),
            };
        }
        if let Some(properties) = &self.properties
            && matches!(schema_type, None | Some("object"))
        {
            return SchemaShape::Object { properties };
        }
        SchemaShape::Primitive {
            schema_type,
            format: self.format.as_deref(),
        }
    }

    /// An object declared in place rather than through a `$ref`.
    pub fn is_inline_object(&self) -> bool {
        self.ref_path.is_none()
            && self.properties.is_some()
            && matches!(self.schema_type.as_deref(), None | Some("object"))
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required
            .as_ref()
            .is_some_and(|r| r.iter().any(|name| name == property))
    }
}

impl Parameter {
    /// The parameter's schema, wrapping inline schema fields when there is no `schema`.
    pub fn effective_schema(&self) -> Schema {
        match &self.schema {
            Some(schema) => schema.clone(),
            None => Schema {
                description: self.description.clone(),
                ..self.inline.clone()
            },
        }
    }
}

impl Response {
    /// The response schema; a response without one describes an empty body.
    pub fn effective_schema(&self) -> Schema {
        match &self.schema {
            Some(schema) => schema.clone(),
            None => Schema {
                description: self.description.clone(),
                ..Schema::default()
            },
        }
    }
}

impl EnumValue {
    /// The literal as it appears in source text, without quoting.
    pub fn as_text(&self) -> String {
        match self {
            EnumValue::String(s) => s.clone(),
            EnumValue::Integer(n) => n.to_string(),
            EnumValue::Float(f) => f.to_string(),
            EnumValue::Bool(b) => b.to_string(),
            EnumValue::Null => "null".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_declaration_order() {
        let doc = Document::from_json(
            r##"{
              "paths": {},
              "definitions": {
                "Zebra": { "type": "object", "properties": { "z": { "type": "string" }, "a": { "type": "integer" } } },
                "Aardvark": { "type": "string" }
              }
            }"##,
        )
        .unwrap();

        let names: Vec<_> = doc.spec().definitions.keys().collect();
        assert_eq!(names, ["Zebra", "Aardvark"]);
        let props: Vec<_> = doc.spec().definitions["Zebra"]
            .properties
            .as_ref()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(props, ["z", "a"]);
    }

    #[test]
    fn test_parse_yaml() {
        let doc = Document::from_yaml(
            "basePath: /v1\ninfo:\n  version: 2.1.0\npaths:\n  /pets:\n    get:\n      responses:\n        '200':\n          description: ok\n",
        )
        .unwrap();
        assert_eq!(doc.spec().base_path.as_deref(), Some("/v1"));
        assert_eq!(doc.version(), Some("2.1.0"));
        assert!(doc.spec().paths["/pets"].get.is_some());
    }

    #[test]
    fn test_parameter_inline_schema_fields() {
        let param: Parameter = serde_json::from_str(
            r#"{ "name": "limit", "in": "query", "required": true, "type": "integer", "format": "int32" }"#,
        )
        .unwrap();
        assert!(param.required);
        assert_eq!(param.location, Some(ParamLocation::Query));
        let schema = param.effective_schema();
        assert_eq!(schema.schema_type.as_deref(), Some("integer"));
        assert_eq!(schema.format.as_deref(), Some("int32"));
    }

    #[test]
    fn test_shape_classification() {
        let object: Schema =
            serde_json::from_str(r#"{ "properties": { "a": { "type": "string" } } }"#).unwrap();
        assert!(matches!(object.shape(), SchemaShape::Object { .. }));

        let map: Schema = serde_json::from_str(
            r#"{ "type": "object", "additionalProperties": { "type": "string" } }"#,
        )
        .unwrap();
        assert!(matches!(
            map.shape(),
            SchemaShape::Primitive {
                schema_type: Some("object"),
                ..
            }
        ));

        let enumeration: Schema =
            serde_json::from_str(r#"{ "type": "string", "enum": ["a", "b"] }"#).unwrap();
        assert!(matches!(enumeration.shape(), SchemaShape::Enum { .. }));

        let array: Schema = serde_json::from_str(r#"{ "type": "array" }"#).unwrap();
        assert!(matches!(array.shape(), SchemaShape::Array { items: None }));
    }

    #[test]
    fn test_enum_value_text() {
        let values: Vec<EnumValue> = serde_json::from_str(r#"["a", 3, 1.5, true, null]"#).unwrap();
        let texts: Vec<_> = values.iter().map(EnumValue::as_text).collect();
        assert_eq!(texts, ["a", "3", "1.5", "true", "null"]);
    }
}
