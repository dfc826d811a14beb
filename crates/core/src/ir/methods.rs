//! Path operations -> [`Method`]s.
//!
//! Each operation is normalized into one method:
//! - Name from `operationId` or from the verb and path
//! - Path-item parameters followed by operation parameters
//! - The best response (2xx, then 3xx, then `default`) as a response param
//!
//! Every parameter and response goes through the model synthesizer, so the
//! models it references are collected alongside the methods.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{IrError, Result};
use crate::language::TypeMapping;
use crate::options::GeneratorOptions;
use crate::spec::{Document, Operation, Parameter, PathItem, Response, Schema};

use super::api::{HttpMethod, Method, Param};
use super::models::{ModelSynthesizer, Synthesized};
use super::resolve::Normalizer;
use super::types::Model;
use super::utils::{NamingRules, camel_case, join_url, snake_case};

const RESPONSE_NAME: &str = "response";
const EVENT_STREAM: &str = "text/event-stream";

/// Methods in path order plus every model they and the definitions produced.
///
/// Models appear in synthesis order (method models first, then definitions)
/// and are not deduplicated yet.
#[derive(Debug, Clone, PartialEq)]
pub struct RawIr {
    pub methods: Vec<Method>,
    pub models: Vec<Model>,
}

/// Synthesizes the methods and models of one document.
#[derive(Debug)]
pub struct MethodSynthesizer<'a> {
    document: &'a Document,
    normalizer: Normalizer<'a>,
    models: ModelSynthesizer<'a>,
    naming: NamingRules,
    options: &'a GeneratorOptions,
    base_path: String,
}

impl<'a> MethodSynthesizer<'a> {
    /// `base_path` is the configured prefix; the document's own `basePath` follows it.
    pub fn new(
        document: &'a Document,
        mapping: &'a dyn TypeMapping,
        options: &'a GeneratorOptions,
        base_path: Option<&str>,
    ) -> Self {
        let base_path = join_url(&[
            base_path.unwrap_or_default(),
            document.spec().base_path.as_deref().unwrap_or_default(),
        ]);
        Self {
            document,
            normalizer: Normalizer::new(document),
            models: ModelSynthesizer::new(document, mapping, options.snake),
            naming: mapping.naming(),
            options,
            base_path,
        }
    }

    pub fn synthesize(mut self) -> Result<RawIr> {
        let document = self.document;
        let mut methods = Vec::new();
        let mut models = Vec::new();

        for (path, item) in &document.spec().paths {
            for http_method in HttpMethod::ALL {
                let Some(operation) = item.operation(http_method) else {
                    continue;
                };
                let (method, method_models) = self.method(path, item, http_method, operation)?;
                methods.push(method);
                models.extend(method_models);
            }
        }
        methods.sort_by(|a, b| a.path.cmp(&b.path));

        for (name, schema) in &document.spec().definitions {
            models.extend(self.models.from_schema(schema, name)?.models);
        }

        debug!(
            methods = methods.len(),
            models = models.len(),
            "Synthesized methods and models."
        );
        Ok(RawIr { methods, models })
    }

    fn method(
        &mut self,
        path: &str,
        item: &PathItem,
        http_method: HttpMethod,
        operation: &Operation,
    ) -> Result<(Method, Vec<Model>)> {
        let name = self.method_name(path, http_method, operation);
        let mut models = Vec::new();

        let declared = item
            .parameters
            .iter()
            .flatten()
            .chain(operation.parameters.iter().flatten());
        let mut params = Vec::new();
        for param in declared {
            let param = self.normalizer.resolve_object(param)?;
            let (param, param_models) = self.param(&name, &param)?;
            params.push(param);
            models.extend(param_models);
        }

        let key = select_response(&operation.responses).ok_or_else(|| IrError::MissingResponse {
            method: http_method.as_upper().to_string(),
            path: path.to_string(),
        })?;
        let response = self.normalizer.resolve_object(&operation.responses[key])?;
        let (response, response_models) = self.response(&name, &response)?;
        models.extend(response_models);

        let streaming = operation
            .produces
            .as_ref()
            .and_then(|p| p.first())
            .is_some_and(|first| first == EVENT_STREAM);

        let method = Method {
            path: join_url(&["/", self.base_path.as_str(), path]),
            http_method,
            name,
            description: operation
                .description
                .clone()
                .or_else(|| operation.summary.clone()),
            params,
            response,
            streaming,
            security: operation.security.clone(),
        };
        debug!(
            path = %method.path,
            method = http_method.as_str(),
            name = %method.name,
            response_key = key,
            "Synthesized method."
        );
        Ok((method, models))
    }

    fn method_name(&self, path: &str, http_method: HttpMethod, operation: &Operation) -> String {
        let operation_id = operation
            .operation_id
            .as_deref()
            .filter(|_| !self.options.no_operation_ids);
        match (operation_id, self.options.snake) {
            (Some(id), false) => camel_case(id),
            (Some(id), true) => id.to_string(),
            (None, snake) => {
                let derived = join_url(&[http_method.as_str(), path]);
                if snake {
                    snake_case(&derived)
                } else {
                    camel_case(&derived)
                }
            }
        }
    }

    fn param(&mut self, method_name: &str, param: &Parameter) -> Result<(Param, Vec<Model>)> {
        let schema = param.effective_schema();
        let default_name = self.naming.class_name(
            &[method_name, param.name.as_deref().unwrap_or(RESPONSE_NAME)],
            0,
        );
        let Synthesized { type_info, models } = self.models.from_schema(&schema, &default_name)?;

        let param = Param {
            name: param
                .name
                .as_deref()
                .map(|n| self.case(n))
                .unwrap_or_default(),
            server_name: param.name.clone(),
            location: param.location,
            location_tag: param.location.map(|l| l.tag()),
            type_name: type_name_or_declared(type_info.name, &schema),
            format: type_info.format,
            is_required: param.required,
            description: param.description.clone(),
            schema_type: schema.schema_type.clone(),
        };
        Ok((param, models))
    }

    fn response(&mut self, method_name: &str, response: &Response) -> Result<(Param, Vec<Model>)> {
        let schema = response.effective_schema();
        let default_name = self.naming.class_name(&[method_name, RESPONSE_NAME], 0);
        let Synthesized { type_info, models } = self.models.from_schema(&schema, &default_name)?;

        let param = Param {
            name: RESPONSE_NAME.to_string(),
            server_name: None,
            location: None,
            location_tag: None,
            type_name: type_name_or_declared(type_info.name, &schema),
            format: type_info.format,
            is_required: false,
            description: response.description.clone(),
            schema_type: schema.schema_type.clone(),
        };
        Ok((param, models))
    }

    fn case(&self, name: &str) -> String {
        if self.options.snake {
            snake_case(name)
        } else {
            camel_case(name)
        }
    }
}

fn type_name_or_declared(synthesized: String, schema: &Schema) -> String {
    if !synthesized.is_empty() {
        return synthesized;
    }
    schema
        .schema_type
        .clone()
        .unwrap_or_else(|| "Void".to_string())
}

/// Pick the response that describes a successful call.
///
/// Numeric `2xx` codes win in ascending order, then other keys starting with
/// `2` (`"2XX"`), then the same for `3`, then `default`.
pub fn select_response(responses: &IndexMap<String, Response>) -> Option<&str> {
    for class in ['2', '3'] {
        let lowest_numeric = keys_in_class(responses, class)
            .filter_map(|k| k.parse::<u16>().ok().map(|code| (code, k)))
            .min_by_key(|(code, _)| *code)
            .map(|(_, k)| k);
        if let Some(key) = lowest_numeric.or_else(|| keys_in_class(responses, class).next()) {
            return Some(key.as_str());
        }
    }
    responses
        .get_key_value("default")
        .map(|(key, _)| key.as_str())
}

fn keys_in_class(
    responses: &IndexMap<String, Response>,
    class: char,
) -> impl Iterator<Item = &String> {
    responses.keys().filter(move |k| k.starts_with(class))
}
