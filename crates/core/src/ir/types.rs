//! Model IR types.
//!
//! This module defines the language-agnostic data model representation:
//! - TypeInfo: a resolved type name at a use site
//! - Model: object and enum definitions
//! - Property: an object field

use serde::Serialize;

/// Reference to a target-language type at a use site (property, param, array element)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeInfo {
    pub name: String,
    /// Only carried for strings (e.g., "date-time", "uuid")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl TypeInfo {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            format: None,
        }
    }
}

/// A model definition: either a class-like object or an enumeration
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Model {
    Object(ObjectModel),
    Enum(EnumModel),
}

/// Object model (class/struct/interface)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectModel {
    /// Target-language class name
    pub name: String,
    /// Name as it appears in the document
    pub spec_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superclass_name: Option<String>,
    /// Declared properties not already inherited
    pub properties: Vec<Property>,
    /// Superclass properties, nearest superclass first
    pub inherited_properties: Vec<Property>,
    /// `properties` followed by `inherited_properties`, unique by name
    pub initializer_properties: Vec<Property>,
    /// Models for inline object properties
    pub nested_models: Vec<ObjectModel>,
    /// Models naming this one as their superclass
    pub subclasses: Vec<SubclassRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discriminator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Enumeration model
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumModel {
    pub name: String,
    /// Mapped primitive type of the enum's values
    pub enum_type: String,
    /// Values in declaration order
    pub values: Vec<EnumCase>,
}

/// One enum value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumCase {
    /// camelCase or snake_case identifier
    pub name: String,
    /// UPPER_SNAKE identifier
    pub u_name: String,
    /// Source literal, quoted for string enums
    pub literal: String,
}

/// Object property definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub spec_name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub is_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Name pair identifying a subclass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubclassRef {
    pub name: String,
    pub spec_name: String,
}

impl Model {
    pub fn name(&self) -> &str {
        match self {
            Model::Object(m) => &m.name,
            Model::Enum(m) => &m.name,
        }
    }

    /// A copy with every description removed, at every depth.
    pub fn without_descriptions(&self) -> Model {
        match self {
            Model::Object(m) => Model::Object(m.without_descriptions()),
            Model::Enum(m) => Model::Enum(m.clone()),
        }
    }
}

impl ObjectModel {
    pub fn without_descriptions(&self) -> ObjectModel {
        let strip = |props: &[Property]| -> Vec<Property> {
            props
                .iter()
                .map(|p| Property {
                    description: None,
                    ..p.clone()
                })
                .collect()
        };
        ObjectModel {
            name: self.name.clone(),
            spec_name: self.spec_name.clone(),
            superclass_name: self.superclass_name.clone(),
            properties: strip(&self.properties),
            inherited_properties: strip(&self.inherited_properties),
            initializer_properties: strip(&self.initializer_properties),
            nested_models: self
                .nested_models
                .iter()
                .map(ObjectModel::without_descriptions)
                .collect(),
            subclasses: self.subclasses.clone(),
            discriminator: self.discriminator.clone(),
            description: None,
        }
    }
}

impl Property {
    /// Same property ignoring description and whether it is required.
    pub fn same_signature(&self, other: &Property) -> bool {
        self.name == other.name
            && self.spec_name == other.spec_name
            && self.type_name == other.type_name
            && self.format == other.format
    }
}
