//! Invariant checks over a finished IR.
//!
//! Unlike [`crate::error::IrError`], problems found here do not stop
//! synthesis: every check runs and the findings are collected into one
//! report per API.

use std::fmt;

use crate::error::describe;
use crate::ir::{ApiIr, Model, ParamLocation};

const SEPARATOR: &str = "---------------------------";

/// What is wrong with an IR element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    /// A parameter or response whose type resolved to nothing.
    MissingType,
    /// A `formData` parameter that is not a file.
    NonFileFormData,
    /// A model sharing its name with another model.
    DuplicateModelName,
    /// A model without a name.
    UnnamedModel,
}

/// One finding, with a dump of the offending element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub dump: String,
}

/// Everything found wrong with one API. Empty means the API passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub api_name: String,
    pub problems: Vec<Problem>,
}

impl fmt::Display for ProblemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ProblemKind::MissingType => "a parameter or response with no type",
            ProblemKind::NonFileFormData => "a formData parameter that is not a file",
            ProblemKind::DuplicateModelName => "a model whose name is used by another model",
            ProblemKind::UnnamedModel => "a model with no name",
        };
        f.write_str(text)
    }
}

impl ValidationReport {
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.problems.is_empty() {
            return Ok(());
        }
        write!(f, "Problems with {}: ", self.api_name)?;
        for problem in &self.problems {
            write!(f, "\nFound {}: {}\n{SEPARATOR}", problem.kind, problem.dump)?;
        }
        Ok(())
    }
}

/// Run every check against one API.
pub fn verify(api: &ApiIr) -> ValidationReport {
    let mut problems = Vec::new();
    let mut report = |kind: ProblemKind, dump: String| problems.push(Problem { kind, dump });

    for method in &api.methods {
        for param in method.params.iter().chain([&method.response]) {
            if param.type_name.is_empty() {
                report(ProblemKind::MissingType, describe(param));
            }
        }
        for param in &method.params {
            if param.location == Some(ParamLocation::FormData)
                && param.schema_type.as_deref() != Some("file")
            {
                report(ProblemKind::NonFileFormData, describe(param));
            }
        }
    }

    let models: Vec<Model> = api
        .object_models
        .iter()
        .cloned()
        .map(Model::Object)
        .chain(api.enum_models.iter().cloned().map(Model::Enum))
        .collect();
    for model in &models {
        if model.name().is_empty() {
            report(ProblemKind::UnnamedModel, describe(model));
        } else if models.iter().filter(|m| m.name() == model.name()).count() > 1 {
            report(ProblemKind::DuplicateModelName, describe(model));
        }
    }

    ValidationReport {
        api_name: api.api_name.clone(),
        problems,
    }
}

/// Verify several APIs and concatenate the reports of those with problems.
pub fn verify_all<'a>(apis: impl IntoIterator<Item = &'a ApiIr>) -> String {
    apis.into_iter()
        .map(verify)
        .filter(|report| !report.is_empty())
        .map(|report| report.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
