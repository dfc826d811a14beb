//! Swagger document to client-code IR synthesizer.
//!
//! The pipeline for one API is:
//! 1. Parse: JSON/YAML -> [`Document`]
//! 2. Synthesize: operations -> methods, schemas -> models (`ir::MethodSynthesizer`)
//! 3. Post-process: deduplicate models, split objects from enums, link subclasses
//! 4. Verify: collect invariant violations into a [`ValidationReport`]
//!
//! Rendering the IR into source files is left to template engines consuming
//! the serialized [`ApiIr`].

use indexmap::IndexMap;
use rayon::prelude::*;
use tracing::info;

pub mod error;
pub mod ir;
pub mod language;
pub mod options;
pub mod spec;
pub mod verify;

pub use error::{IrError, Result};
pub use ir::ApiIr;
pub use language::{CustomLanguage, Language, TypeMap, TypeMapping};
pub use options::{ApiSource, GeneratorOptions};
pub use spec::Document;
pub use verify::{ValidationReport, verify, verify_all};

/// Synthesize the IR of one API.
pub fn synthesize_api(
    api_name: &str,
    source: &ApiSource,
    mapping: &dyn TypeMapping,
    options: &GeneratorOptions,
) -> Result<ApiIr> {
    let document = &source.document;
    let raw = ir::MethodSynthesizer::new(document, mapping, options, source.base_path.as_deref())
        .synthesize()?;

    let (object_models, enum_models) = ir::split(ir::dedupe(raw.models));
    let object_models = ir::resolve_subclasses(object_models);

    info!(
        api = api_name,
        methods = raw.methods.len(),
        objects = object_models.len(),
        enums = enum_models.len(),
        "Synthesized API IR."
    );

    Ok(ApiIr {
        api_name: api_name.to_string(),
        api_class_name: source
            .class_name
            .clone()
            .unwrap_or_else(|| api_name.to_string()),
        api_version: options
            .version
            .clone()
            .or_else(|| document.version().map(str::to_string)),
        methods: raw.methods,
        object_models,
        enum_models,
    })
}

/// Synthesize several APIs in parallel. Results keep the input order; the
/// first error aborts the whole batch.
pub fn synthesize_apis(
    sources: &IndexMap<String, ApiSource>,
    mapping: &dyn TypeMapping,
    options: &GeneratorOptions,
) -> Result<Vec<ApiIr>> {
    sources
        .par_iter()
        .map(|(name, source)| synthesize_api(name, source, mapping, options))
        .collect()
}
