//! Generation options and per-API inputs.

use serde::{Deserialize, Serialize};

use crate::spec::Document;

/// Switches that change how names and versions are produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorOptions {
    /// snake_case identifiers instead of camelCase.
    pub snake: bool,
    /// Derive method names from method and path even when `operationId` is present.
    pub no_operation_ids: bool,
    /// Overrides the document's `info.version`.
    pub version: Option<String>,
}

/// One API to synthesize.
#[derive(Debug, Clone)]
pub struct ApiSource {
    pub document: Document,
    /// Prefix for every method path, before the document's own `basePath`.
    pub base_path: Option<String>,
    pub class_name: Option<String>,
}

impl ApiSource {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            base_path: None,
            class_name: None,
        }
    }

    pub fn with_base_path(mut self, base_path: impl Into<String>) -> Self {
        self.base_path = Some(base_path.into());
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }
}
