//! API-level IR for synthesized operations.
//!
//! This module defines the intermediate representation handed to renderers:
//! - Method: one HTTP operation
//! - Param: a parameter or the chosen response
//! - ApiIr: everything synthesized for one API document

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::types::{EnumModel, ObjectModel};

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
}

impl HttpMethod {
    /// Every method a path item may declare, in the order they are visited.
    pub const ALL: [HttpMethod; 8] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
        HttpMethod::Trace,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
            HttpMethod::Trace => "trace",
        }
    }

    pub fn as_upper(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Put => "PUT",
            HttpMethod::Post => "POST",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Head => "HEAD",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// Parameter location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Body,
    FormData,
}

impl ParamLocation {
    /// Capitalized tag used by templates; form data fields are multipart parts.
    pub fn tag(&self) -> &'static str {
        match self {
            ParamLocation::Path => "Path",
            ParamLocation::Query => "Query",
            ParamLocation::Header => "Header",
            ParamLocation::Body => "Body",
            ParamLocation::FormData => "Part",
        }
    }
}

/// A parameter, or the response of a method.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Param {
    /// Identifier in the target language
    pub name: String,
    /// Name as sent over the wire (None for responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_name: Option<String>,
    /// Where the parameter appears (None for responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ParamLocation>,
    /// `Path`, `Query`, `Header`, `Body` or `Part`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_tag: Option<&'static str>,
    /// Target-language type name
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub is_required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Declared type of the underlying schema, before mapping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,
}

/// Synthesized API operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    /// Full URL path including base paths (e.g., "/v1/items/{id}")
    pub path: String,
    pub http_method: HttpMethod,
    /// Method identifier (e.g., "getItemsId")
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Path-level parameters followed by operation parameters
    pub params: Vec<Param>,
    pub response: Param,
    /// Whether the operation produces `text/event-stream`
    pub streaming: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security: Option<Vec<IndexMap<String, Vec<String>>>>,
}

/// Everything synthesized for one API document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIr {
    pub api_name: String,
    /// Configured client class name, the API name when not configured
    pub api_class_name: String,
    /// Version from the options override or the document's `info.version`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Methods sorted by path
    pub methods: Vec<Method>,
    pub object_models: Vec<ObjectModel>,
    pub enum_models: Vec<EnumModel>,
}
