//! Target-language type tables.
//!
//! A language plugin is anything implementing [`TypeMapping`]: a table from
//! abstract schema types to target-language type names plus the naming rules
//! for reserved words. Templates and rendering are not part of this crate.

use std::sync::LazyLock;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::ir::utils::NamingRules;

/// Type map key used for schemas without a declared `type`.
pub const UNTYPED_KEY: &str = "undefined";

/// Type map key for values of free-form maps.
pub const ANY_KEY: &str = "any";

/// Placeholder replaced by the inner type name in parameterized entries.
const INNER_PLACEHOLDER: &str = "{}";

/// One entry of a type map.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTypeEntry")]
pub enum TypeEntry {
    /// A fixed name: "Bool"
    Plain(String),
    /// A container around an inner type: "Array<{}>"
    Parameterized(String),
    /// A name chosen by the schema's `format`, with a fallback
    FormatKeyed {
        by_format: IndexMap<String, String>,
        default: String,
    },
}

/// A table from abstract schema type (`string`, `array`, ...) to its entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TypeMap {
    entries: IndexMap<String, TypeEntry>,
}

/// The capability every target language must provide to the engine.
pub trait TypeMapping: Send + Sync + std::fmt::Debug {
    fn type_map(&self) -> &TypeMap;

    fn naming(&self) -> NamingRules {
        NamingRules::default()
    }
}

/// Built-in target languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Swift,
    Kotlin,
    Js,
}

/// A language whose table is a built-in one with entries overridden by configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomLanguage {
    type_map: TypeMap,
    naming: NamingRules,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTypeEntry {
    Name(String),
    ByFormat(IndexMap<String, String>),
}

impl TryFrom<RawTypeEntry> for TypeEntry {
    type Error = String;

    fn try_from(raw: RawTypeEntry) -> Result<Self, Self::Error> {
        match raw {
            RawTypeEntry::Name(name) if name.contains(INNER_PLACEHOLDER) => {
                Ok(TypeEntry::Parameterized(name))
            }
            RawTypeEntry::Name(name) => Ok(TypeEntry::Plain(name)),
            RawTypeEntry::ByFormat(mut by_format) => {
                let default = by_format
                    .shift_remove("default")
                    .ok_or_else(|| "format-keyed type entries need a 'default' key".to_string())?;
                Ok(TypeEntry::FormatKeyed { by_format, default })
            }
        }
    }
}

impl TypeEntry {
    fn plain(name: &str) -> Self {
        TypeEntry::Plain(name.to_string())
    }

    fn wrap(template: &str) -> Self {
        TypeEntry::Parameterized(template.to_string())
    }

    fn by_format(formats: &[(&str, &str)], default: &str) -> Self {
        TypeEntry::FormatKeyed {
            by_format: formats
                .iter()
                .map(|(f, n)| ((*f).to_string(), (*n).to_string()))
                .collect(),
            default: default.to_string(),
        }
    }

    /// Resolve to a type name given the inner type name and the schema format.
    pub fn resolve(&self, inner: &str, format: Option<&str>) -> String {
        match self {
            TypeEntry::Plain(name) => name.clone(),
            TypeEntry::Parameterized(template) => template.replace(INNER_PLACEHOLDER, inner),
            TypeEntry::FormatKeyed { by_format, default } => format
                .and_then(|f| by_format.get(f))
                .unwrap_or(default)
                .clone(),
        }
    }
}

impl TypeMap {
    pub fn get(&self, key: &str) -> Option<&TypeEntry> {
        self.entries.get(key)
    }

    /// Apply every entry of `overrides` on top of this table.
    pub fn extend(&mut self, overrides: TypeMap) {
        self.entries.extend(overrides.entries);
    }
}

impl<'a> FromIterator<(&'a str, TypeEntry)> for TypeMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, TypeEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }
}

static SWIFT_TYPES: LazyLock<TypeMap> = LazyLock::new(|| {
    [
        (UNTYPED_KEY, TypeEntry::plain("Void")),
        ("boolean", TypeEntry::plain("Bool")),
        (
            "number",
            TypeEntry::by_format(&[("int64", "Int64"), ("int32", "Int32")], "Double"),
        ),
        ("file", TypeEntry::plain("URL")),
        ("object", TypeEntry::wrap("Dictionary<String, {}>")),
        ("integer", TypeEntry::by_format(&[("int64", "Int64")], "Int32")),
        (
            "string",
            TypeEntry::by_format(&[("date", "Date"), ("date-time", "Date")], "String"),
        ),
        ("array", TypeEntry::wrap("Array<{}>")),
    ]
    .into_iter()
    .collect()
});

static KOTLIN_TYPES: LazyLock<TypeMap> = LazyLock::new(|| {
    [
        (UNTYPED_KEY, TypeEntry::plain("Response<Void>")),
        ("boolean", TypeEntry::plain("Boolean")),
        (
            "number",
            TypeEntry::by_format(&[("int64", "Int"), ("int32", "Int")], "Double"),
        ),
        ("file", TypeEntry::plain("MultipartBody.Part")),
        ("object", TypeEntry::wrap("Map<String, {}>")),
        ("integer", TypeEntry::plain("Int")),
        (
            "string",
            TypeEntry::by_format(
                &[("date", "OffsetDateTime"), ("date-time", "OffsetDateTime")],
                "String",
            ),
        ),
        ("array", TypeEntry::wrap("List<{}>")),
    ]
    .into_iter()
    .collect()
});

static JS_TYPES: LazyLock<TypeMap> = LazyLock::new(|| {
    [
        (ANY_KEY, TypeEntry::plain("any")),
        (UNTYPED_KEY, TypeEntry::plain("void")),
        ("boolean", TypeEntry::plain("boolean")),
        ("number", TypeEntry::plain("number")),
        ("file", TypeEntry::plain("string")),
        ("object", TypeEntry::wrap("Map<string, {}>")),
        ("integer", TypeEntry::plain("number")),
        (
            "string",
            TypeEntry::by_format(&[("date", "Date"), ("date-time", "Date")], "string"),
        ),
        ("array", TypeEntry::wrap("Array<{}>")),
    ]
    .into_iter()
    .collect()
});

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Js => "js",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "swift" => Some(Language::Swift),
            "kotlin" => Some(Language::Kotlin),
            "js" => Some(Language::Js),
            _ => None,
        }
    }

    pub const ALL: [Language; 3] = [Language::Swift, Language::Kotlin, Language::Js];
}

impl TypeMapping for Language {
    fn type_map(&self) -> &TypeMap {
        match self {
            Language::Swift => &SWIFT_TYPES,
            Language::Kotlin => &KOTLIN_TYPES,
            Language::Js => &JS_TYPES,
        }
    }
}

impl CustomLanguage {
    /// Start from a built-in language and replace the given entries.
    pub fn with_overrides(base: Language, overrides: TypeMap) -> Self {
        let mut type_map = base.type_map().clone();
        type_map.extend(overrides);
        Self {
            type_map,
            naming: base.naming(),
        }
    }
}

impl TypeMapping for CustomLanguage {
    fn type_map(&self) -> &TypeMap {
        &self.type_map
    }

    fn naming(&self) -> NamingRules {
        self.naming
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_resolution() {
        let swift = Language::Swift.type_map();
        let resolve = |key: &str, inner: &str, format: Option<&str>| {
            swift.get(key).unwrap().resolve(inner, format)
        };
        assert_eq!(resolve("boolean", "Any", None), "Bool");
        assert_eq!(resolve("integer", "Any", Some("int64")), "Int64");
        assert_eq!(resolve("integer", "Any", Some("int32")), "Int32");
        assert_eq!(resolve("string", "Any", Some("date-time")), "Date");
        assert_eq!(resolve("string", "Any", Some("uuid")), "String");
        assert_eq!(resolve("array", "Pet", None), "Array<Pet>");
        assert_eq!(resolve("object", "Int32", None), "Dictionary<String, Int32>");
    }

    #[test]
    fn test_builtin_void_types() {
        let void = |lang: Language| {
            lang.type_map()
                .get(UNTYPED_KEY)
                .unwrap()
                .resolve("", None)
        };
        assert_eq!(void(Language::Swift), "Void");
        assert_eq!(void(Language::Kotlin), "Response<Void>");
        assert_eq!(void(Language::Js), "void");
    }

    #[test]
    fn test_deserialize_entries() {
        let map: TypeMap = serde_json::from_str(
            r#"{
              "boolean": "Bool",
              "array": "Vec<{}>",
              "string": { "uuid": "Uuid", "default": "String" }
            }"#,
        )
        .unwrap();
        assert_eq!(map.get("boolean"), Some(&TypeEntry::plain("Bool")));
        assert_eq!(map.get("array"), Some(&TypeEntry::wrap("Vec<{}>")));
        assert_eq!(
            map.get("string"),
            Some(&TypeEntry::by_format(&[("uuid", "Uuid")], "String"))
        );
    }

    #[test]
    fn test_format_keyed_requires_default() {
        let result = serde_json::from_str::<TypeMap>(r#"{ "string": { "uuid": "Uuid" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_custom_language_overrides() {
        let overrides: TypeMap = serde_json::from_str(r#"{ "array": "[{}]" }"#).unwrap();
        let custom = CustomLanguage::with_overrides(Language::Swift, overrides);
        assert_eq!(custom.type_map().get("array").unwrap().resolve("Pet", None), "[Pet]");
        assert_eq!(custom.type_map().get("boolean").unwrap().resolve("", None), "Bool");
    }

    #[test]
    fn test_language_names() {
        for lang in Language::ALL {
            assert_eq!(Language::from_name(lang.as_str()), Some(lang));
        }
        assert_eq!(Language::from_name("cobol"), None);
    }
}
