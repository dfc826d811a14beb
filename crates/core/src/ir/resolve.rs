//! `$ref` and `allOf` resolution.
//!
//! Resolution merges, in order: the referenced schema, every `allOf` member
//! (each with its own `$ref` resolved), then the local fields. Lists are
//! concatenated, `properties` merge key by key, nested schemas merge
//! recursively and everything else is last-write-wins, so local declarations
//! override inherited ones. The merged result is resolved again until no
//! `$ref`/`allOf` remains.

use indexmap::map::Entry;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{IrError, Result};
use crate::spec::{AdditionalProperties, Document, Parameter, Response, Schema};

const LOCAL_REF_PREFIX: &str = "#/";
const DEFINITIONS_POINTER: &str = "/definitions/";

/// What a resolution pass should expand.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveOptions<'r> {
    pub resolve_ref: bool,
    pub resolve_all_of: bool,
    /// A reference to leave out of the merge (the superclass of the schema being flattened).
    pub ignore_ref: Option<&'r str>,
}

impl<'r> ResolveOptions<'r> {
    pub fn refs() -> Self {
        Self {
            resolve_ref: true,
            ..Self::default()
        }
    }

    pub fn refs_and_all_of(ignore_ref: Option<&'r str>) -> Self {
        Self {
            resolve_ref: true,
            resolve_all_of: true,
            ignore_ref,
        }
    }
}

/// Document objects that may be replaced by a `$ref`.
pub trait Referable: DeserializeOwned + Clone {
    const KIND: &'static str;

    fn take_ref(&mut self) -> Option<String>;
}

impl Referable for Parameter {
    const KIND: &'static str = "parameter";

    fn take_ref(&mut self) -> Option<String> {
        self.ref_path.take()
    }
}

impl Referable for Response {
    const KIND: &'static str = "response";

    fn take_ref(&mut self) -> Option<String> {
        self.ref_path.take()
    }
}

/// Resolves references against one document. Never mutates the document.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer<'a> {
    document: &'a Document,
}

impl<'a> Normalizer<'a> {
    pub fn new(document: &'a Document) -> Self {
        Self { document }
    }

    /// Resolve a schema to a fixed point according to `options`.
    pub fn resolve(&self, schema: &Schema, options: ResolveOptions<'_>) -> Result<Schema> {
        self.resolve_chained(schema.clone(), options, &mut Vec::new())
    }

    /// Follow `$ref`s on a parameter or response until a concrete object is reached.
    pub fn resolve_object<T: Referable>(&self, value: &T) -> Result<T> {
        let mut current = value.clone();
        let mut chain: Vec<String> = Vec::new();
        while let Some(reference) = current.take_ref() {
            if chain.contains(&reference) {
                return Err(cycle_error(&chain, &reference));
            }
            current = self.lookup(&reference, T::KIND)?;
            chain.push(reference);
        }
        Ok(current)
    }

    fn resolve_chained(
        &self,
        mut schema: Schema,
        options: ResolveOptions<'_>,
        chain: &mut Vec<String>,
    ) -> Result<Schema> {
        let reference = if options.resolve_ref {
            schema.ref_path.take()
        } else {
            None
        };
        let all_of = if options.resolve_all_of {
            schema.all_of.take()
        } else {
            None
        };
        if reference.is_none() && all_of.is_none() {
            return Ok(schema);
        }

        let mut merged = Schema::default();
        if let Some(reference) = reference.filter(|r| options.ignore_ref != Some(r.as_str())) {
            if chain.contains(&reference) {
                return Err(cycle_error(chain, &reference));
            }
            trace!(reference = %reference, "Resolving schema reference.");
            merge_schema(&mut merged, self.lookup_schema(&reference)?);
            chain.push(reference);
        }

        // Members always get their own $ref resolved, otherwise merging two
        // referencing members would keep only the last $ref.
        let member_options = ResolveOptions {
            resolve_ref: true,
            ..options
        };
        for member in all_of.into_iter().flatten() {
            let resolved = self.resolve_chained(member, member_options, &mut chain.clone())?;
            merge_schema(&mut merged, resolved);
        }

        merge_schema(&mut merged, schema);
        self.resolve_chained(merged, options, chain)
    }

    fn lookup_schema(&self, reference: &str) -> Result<Schema> {
        let pointer = local_pointer(reference)?;
        if let Some(name) = pointer.strip_prefix(DEFINITIONS_POINTER)
            && !name.contains('/')
            && let Some(schema) = self.document.spec().definitions.get(name)
        {
            return Ok(schema.clone());
        }
        self.lookup(reference, "schema")
    }

    fn lookup<T: DeserializeOwned>(&self, reference: &str, expected: &'static str) -> Result<T> {
        let pointer = local_pointer(reference)?;
        let node = self
            .document
            .raw()
            .pointer(pointer)
            .ok_or_else(|| IrError::DanglingReference {
                reference: reference.to_string(),
            })?;
        T::deserialize(node).map_err(|source| IrError::InvalidReferenceTarget {
            reference: reference.to_string(),
            expected,
            source,
        })
    }
}

/// JSON pointer part of a document-local reference (`#/a/b` -> `/a/b`).
fn local_pointer(reference: &str) -> Result<&str> {
    if !reference.starts_with(LOCAL_REF_PREFIX) {
        return Err(IrError::UnsupportedReference {
            reference: reference.to_string(),
        });
    }
    Ok(&reference[1..])
}

fn cycle_error(chain: &[String], reference: &str) -> IrError {
    let start = chain.iter().position(|r| r == reference).unwrap_or(0);
    let mut names: Vec<&str> = chain[start..].iter().map(String::as_str).collect();
    names.push(reference);
    IrError::CyclicReference {
        chain: names.join(" -> "),
    }
}

/// Merge `source` into `target`.
pub fn merge_schema(target: &mut Schema, source: Schema) {
    let Schema {
        ref_path,
        schema_type,
        format,
        description,
        properties,
        required,
        items,
        additional_properties,
        enum_values,
        all_of,
        discriminator,
    } = source;

    overwrite(&mut target.ref_path, ref_path);
    overwrite(&mut target.schema_type, schema_type);
    overwrite(&mut target.format, format);
    overwrite(&mut target.description, description);
    overwrite(&mut target.discriminator, discriminator);

    concat(&mut target.required, required);
    concat(&mut target.enum_values, enum_values);
    concat(&mut target.all_of, all_of);

    if let Some(properties) = properties {
        let merged = target.properties.get_or_insert_with(Default::default);
        for (name, schema) in properties {
            match merged.entry(name) {
                Entry::Occupied(existing) => merge_schema(existing.into_mut(), schema),
                Entry::Vacant(slot) => {
                    slot.insert(schema);
                }
            }
        }
    }

    target.items = match (target.items.take(), items) {
        (Some(mut existing), Some(incoming)) => {
            merge_schema(&mut existing, *incoming);
            Some(existing)
        }
        (existing, None) => existing,
        (None, incoming) => incoming,
    };

    target.additional_properties = match (target.additional_properties.take(), additional_properties)
    {
        (
            Some(AdditionalProperties::Schema(mut existing)),
            Some(AdditionalProperties::Schema(incoming)),
        ) => {
            merge_schema(&mut existing, *incoming);
            Some(AdditionalProperties::Schema(existing))
        }
        (existing, None) => existing,
        (_, incoming) => incoming,
    };
}

fn overwrite<T>(target: &mut Option<T>, source: Option<T>) {
    if source.is_some() {
        *target = source;
    }
}

fn concat<T>(target: &mut Option<Vec<T>>, source: Option<Vec<T>>) {
    match (target.as_mut(), source) {
        (Some(existing), Some(incoming)) => existing.extend(incoming),
        (None, Some(incoming)) => *target = Some(incoming),
        (_, None) => {}
    }
}
