//! Intermediate Representation for Swagger client generation.
//!
//! The IR is what renderers consume: methods with typed parameters and
//! responses, plus the object and enum models those types refer to. Nothing
//! in here knows about templates or target-language syntax beyond type names.
//!
//! ## Module Structure
//!
//! - `types`: model IR (ObjectModel, EnumModel, Property, TypeInfo)
//! - `api`: API-level IR (Method, Param, ApiIr)
//! - `resolve`: `$ref`/`allOf` resolution and schema merging
//! - `type_map`: schema type + format -> target-language type name
//! - `models`: schema -> models
//! - `methods`: path operations -> methods
//! - `post`: deduplication and subclass links
//! - `utils`: naming helpers shared across modules

mod api;
mod methods;
mod models;
mod post;
mod resolve;
mod type_map;
mod types;
pub mod utils;

pub use api::{ApiIr, HttpMethod, Method, Param, ParamLocation};
pub use methods::{MethodSynthesizer, RawIr, select_response};
pub use models::{ModelSynthesizer, Synthesized};
pub use post::{dedupe, resolve_subclasses, split};
pub use resolve::{Normalizer, Referable, ResolveOptions, merge_schema};
pub use type_map::TypeMapper;
pub use types::{EnumCase, EnumModel, Model, ObjectModel, Property, SubclassRef, TypeInfo};
pub use utils::NamingRules;
