//! Fatal errors raised while synthesizing the IR.
//!
//! Anything in here aborts the whole run. Problems that can be reported
//! alongside a finished IR live in [`crate::verify`] instead.

use thiserror::Error;

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, IrError>;

/// Errors returned by document parsing and IR synthesis.
#[derive(Debug, Error)]
pub enum IrError {
    /// A `$ref` that does not point inside the current document.
    #[error("No support for refs that don't start with '#/': {reference}")]
    UnsupportedReference {
        /// The offending reference.
        reference: String,
    },
    /// A local `$ref` whose pointer leads nowhere.
    #[error("Reference '{reference}' does not resolve to anything in the document")]
    DanglingReference {
        /// The offending reference.
        reference: String,
    },
    /// A local `$ref` whose target cannot be read as the expected object.
    #[error("Reference '{reference}' points at something that is not a valid {expected}: {source}")]
    InvalidReferenceTarget {
        /// The offending reference.
        reference: String,
        /// What the reference was expected to point at.
        expected: &'static str,
        /// Underlying deserialization failure.
        source: serde_json::Error,
    },
    /// A reference chain that loops back onto itself.
    #[error("Cyclic reference detected: {chain}")]
    CyclicReference {
        /// The chain of names or pointers, joined with arrows.
        chain: String,
    },
    /// A schema that is none of enum, array, object or a mappable primitive.
    #[error("I don't know how to process a schema of type {schema_type} 🤔\n  {dump}")]
    UnknownSchemaShape {
        /// Declared type, or `undefined` when absent.
        schema_type: String,
        /// Pretty-printed schema for diagnosis.
        dump: String,
    },
    /// An array schema without `items`.
    #[error("Found an array schema with no items: {dump}")]
    ArrayWithoutItems {
        /// Pretty-printed schema for diagnosis.
        dump: String,
    },
    /// A map whose value type is an inline object.
    #[error(
        "Schemas with additionalProperties of type object that don't use $ref are not supported.\n  {dump}"
    )]
    UnsupportedMapValue {
        /// Pretty-printed `additionalProperties` schema.
        dump: String,
    },
    /// An operation without a success, redirect or default response.
    #[error("Found an operation with no usable response: {method} {path}")]
    MissingResponse {
        /// HTTP method of the operation.
        method: String,
        /// Path of the operation.
        path: String,
    },
    /// The language type map lacks an entry the engine needs.
    #[error("The type map has no entry for '{key}'")]
    MissingTypeMapping {
        /// The missing type map key.
        key: String,
    },
    /// The document is not valid JSON or does not have the expected structure.
    #[error("Failed to parse spec document: {0}")]
    Json(#[from] serde_json::Error),
    /// The document is not valid YAML.
    #[error("Failed to parse YAML spec document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Pretty-print any serializable value for error messages and reports.
pub(crate) fn describe<T: serde::Serialize + std::fmt::Debug>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| format!("{value:#?}"))
}
