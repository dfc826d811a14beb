//! Run configuration: a JSON config file or the equivalent command-line flags.
//!
//! A config file looks like
//!
//! ```json
//! {
//!   "language": "swift",
//!   "specs": { "petstore": { "spec": "specs/petstore.json", "className": "Petstore" } },
//!   "output": "generated",
//!   "opts": { "snake": false },
//!   "typeMap": { "array": "[{}]" }
//! }
//! ```
//!
//! `spec` and `output` are relative to the config file; without `output`,
//! IR files go to `client` under the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use swagger_ir_core::{ApiSource, CustomLanguage, Document, GeneratorOptions, IrError, Language, TypeMap};
use thiserror::Error;
use tracing::debug;

/// Output directory used when none is configured.
pub const DEFAULT_OUTPUT: &str = "client";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to load spec {}: {source}", path.display())]
    Spec { path: PathBuf, source: IrError },
    #[error("Unknown language '{0}', expected one of: swift, kotlin, js")]
    UnknownLanguage(String),
    #[error("Missing required argument --{0} (or pass a config file)")]
    MissingArgument(&'static str),
}

/// One API entry of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecEntry {
    pub spec: PathBuf,
    pub class_name: Option<String>,
    pub base_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    language: String,
    specs: IndexMap<String, SpecEntry>,
    output: Option<PathBuf>,
    #[serde(default)]
    opts: GeneratorOptions,
    type_map: Option<TypeMap>,
}

/// Fully resolved configuration: absolute-or-cwd-relative paths and a ready type map.
#[derive(Debug, Clone)]
pub struct Config {
    pub language: Language,
    pub mapping: CustomLanguage,
    pub specs: IndexMap<String, SpecEntry>,
    pub output: PathBuf,
    pub opts: GeneratorOptions,
}

/// Flag values describing a single API when no config file is given.
#[derive(Debug, Clone, Default)]
pub struct SingleApi<'a> {
    pub language: Option<&'a str>,
    pub spec: Option<&'a Path>,
    pub name: Option<&'a str>,
    pub class_name: Option<&'a str>,
    pub base_path: Option<&'a str>,
    pub output: Option<&'a Path>,
}

impl Config {
    /// Load a config file, resolving relative paths against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: ConfigFile = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        debug!(config = %path.display(), apis = file.specs.len(), "Loaded config file.");

        let language = parse_language(&file.language)?;
        let specs = file
            .specs
            .into_iter()
            .map(|(name, entry)| {
                let spec = base_dir.join(&entry.spec);
                (name, SpecEntry { spec, ..entry })
            })
            .collect();
        let output = file
            .output
            .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), |o| base_dir.join(o));

        Ok(Self {
            language,
            mapping: CustomLanguage::with_overrides(language, file.type_map.unwrap_or_default()),
            specs,
            output,
            opts: file.opts,
        })
    }

    /// Build the configuration of a single API from flags.
    pub fn single(api: &SingleApi<'_>) -> Result<Self, ConfigError> {
        let language = parse_language(api.language.ok_or(ConfigError::MissingArgument("language"))?)?;
        let spec = api.spec.ok_or(ConfigError::MissingArgument("spec"))?;
        let name = api.name.ok_or(ConfigError::MissingArgument("name"))?;

        let mut specs = IndexMap::new();
        specs.insert(
            name.to_string(),
            SpecEntry {
                spec: spec.to_path_buf(),
                class_name: api.class_name.map(str::to_string),
                base_path: api.base_path.map(str::to_string),
            },
        );
        Ok(Self {
            language,
            mapping: CustomLanguage::with_overrides(language, TypeMap::default()),
            specs,
            output: api
                .output
                .map_or_else(|| PathBuf::from(DEFAULT_OUTPUT), Path::to_path_buf),
            opts: GeneratorOptions::default(),
        })
    }

    /// Read and parse every configured document.
    pub fn load_sources(&self) -> Result<IndexMap<String, ApiSource>, ConfigError> {
        self.specs
            .iter()
            .map(|(name, entry)| {
                let mut source = ApiSource::new(load_document(&entry.spec)?);
                source.base_path.clone_from(&entry.base_path);
                source.class_name.clone_from(&entry.class_name);
                Ok((name.clone(), source))
            })
            .collect()
    }
}

fn parse_language(name: &str) -> Result<Language, ConfigError> {
    Language::from_name(name).ok_or_else(|| ConfigError::UnknownLanguage(name.to_string()))
}

/// Parse a document as YAML when its extension says so, JSON otherwise.
pub fn load_document(path: &Path) -> Result<Document, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));
    let parsed = if is_yaml {
        Document::from_yaml(&text)
    } else {
        Document::from_json(&text)
    };
    parsed.map_err(|source| ConfigError::Spec {
        path: path.to_path_buf(),
        source,
    })
}
