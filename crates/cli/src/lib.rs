//! Command-line front end: loads configuration and documents, synthesizes
//! the IR for every API, verifies it and writes one JSON file per API.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use swagger_ir_core::{ApiIr, IrError, synthesize_apis, verify_all};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod config;

use config::{Config, ConfigError, SingleApi};

#[derive(Parser, Debug)]
#[command(
    name = "swagger-ir",
    version,
    about = "Synthesize a language-neutral client IR from Swagger documents"
)]
pub struct Cli {
    /// JSON config file; when absent, --language, --spec and --name describe one API
    pub config: Option<PathBuf>,
    /// Target language: swift, kotlin or js
    #[arg(long)]
    pub language: Option<String>,
    /// Swagger document (JSON, or YAML with a .yaml/.yml extension)
    #[arg(long)]
    pub spec: Option<PathBuf>,
    /// API name
    #[arg(long)]
    pub name: Option<String>,
    /// Client class name, defaults to the API name
    #[arg(long)]
    pub class_name: Option<String>,
    /// Path prefix applied before the document's basePath
    #[arg(long)]
    pub base_path: Option<String>,
    /// Output directory (default: client)
    #[arg(long, short)]
    pub output: Option<PathBuf>,
    /// snake_case identifiers
    #[arg(long)]
    pub snake: bool,
    /// Ignore operationId when naming methods
    #[arg(long)]
    pub no_operation_ids: bool,
    /// Override the API version from the document
    #[arg(long)]
    pub api_version: Option<String>,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ir(#[from] IrError),
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to serialize the IR of {api}: {source}")]
    Serialize {
        api: String,
        source: serde_json::Error,
    },
}

/// What a successful run produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Every API verified; one file written per API.
    Written(Vec<PathBuf>),
    /// Verification found problems; nothing was written.
    Invalid(String),
}

pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => {
            init_tracing();
            run(&cli)
        }
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Run with parsed arguments and map the result to an exit code.
pub fn run(cli: &Cli) -> i32 {
    match resolve_config(cli).and_then(|config| generate(&config)) {
        Ok(Outcome::Written(_)) => 0,
        Ok(Outcome::Invalid(report)) => {
            eprintln!("{report}");
            1
        }
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Build the run configuration from a config file or flags; flags win over `opts`.
pub fn resolve_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::single(&SingleApi {
            language: cli.language.as_deref(),
            spec: cli.spec.as_deref(),
            name: cli.name.as_deref(),
            class_name: cli.class_name.as_deref(),
            base_path: cli.base_path.as_deref(),
            output: cli.output.as_deref(),
        })?,
    };
    if cli.config.is_some()
        && let Some(output) = &cli.output
    {
        config.output.clone_from(output);
    }
    config.opts.snake |= cli.snake;
    config.opts.no_operation_ids |= cli.no_operation_ids;
    if let Some(version) = &cli.api_version {
        config.opts.version = Some(version.clone());
    }
    Ok(config)
}

/// Synthesize and verify every configured API, then write `<output>/<api>.json`.
pub fn generate(config: &Config) -> Result<Outcome, CliError> {
    let sources = config.load_sources()?;
    let irs = synthesize_apis(&sources, &config.mapping, &config.opts)?;

    let report = verify_all(&irs);
    if !report.is_empty() {
        return Ok(Outcome::Invalid(report));
    }

    fs::create_dir_all(&config.output).map_err(|source| CliError::Write {
        path: config.output.clone(),
        source,
    })?;
    let written = irs
        .iter()
        .map(|ir| write_ir(&config.output, ir))
        .collect::<Result<Vec<_>, _>>()?;
    info!(
        language = config.language.as_str(),
        files = written.len(),
        output = %config.output.display(),
        "Wrote IR files."
    );
    Ok(Outcome::Written(written))
}

fn write_ir(output: &Path, ir: &ApiIr) -> Result<PathBuf, CliError> {
    let path = output.join(format!("{}.json", ir.api_name));
    let json = serde_json::to_string_pretty(ir).map_err(|source| CliError::Serialize {
        api: ir.api_name.clone(),
        source,
    })?;
    fs::write(&path, json).map_err(|source| CliError::Write {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Install the stderr fmt subscriber.
///
/// SWAGGER_IR_LOG controls the level: "trace", "debug", "info", "warn",
/// "error", or a full filter spec like "swagger_ir_core=trace".
pub fn init_tracing() {
    let filter = match std::env::var("SWAGGER_IR_LOG") {
        Ok(level) if is_plain_level(&level) => {
            format!("swagger_ir_core={level},swagger_ir_cli={level}")
        }
        Ok(spec) => spec,
        Err(_) => "swagger_ir_core=info,swagger_ir_cli=info".to_string(),
    };

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_levels() {
        assert!(is_plain_level("DEBUG"));
        assert!(is_plain_level("warn"));
        assert!(!is_plain_level("swagger_ir_core=trace"));
    }

    #[test]
    fn test_flags_parse() {
        let cli = Cli::try_parse_from([
            "swagger-ir",
            "--language",
            "swift",
            "--spec",
            "petstore.json",
            "--name",
            "petstore",
            "--snake",
        ])
        .map_err(|e| e.to_string());
        assert!(matches!(cli, Ok(Cli { snake: true, config: None, .. })));
    }
}
