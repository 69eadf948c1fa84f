//! Structural validation of the registry document against its JSON Schema

use std::fs;
use std::path::Path;

use jsonschema::{JSONSchema, ValidationError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{CheckError, Result};

/// Outcome of validating a document against a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaReport {
    /// Whether the document conforms
    pub valid: bool,
    /// Violation messages in the order the validator produced them
    pub errors: Vec<String>,
}

impl SchemaReport {
    fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

/// Validate the document at `document_path` against the schema at `schema_path`.
///
/// Unreadable files, malformed JSON and schemas that fail to compile are
/// returned as errors; only genuine schema violations end up in the report.
pub fn validate_files(
    schema_path: impl AsRef<Path>,
    document_path: impl AsRef<Path>,
) -> Result<SchemaReport> {
    let schema_path = schema_path.as_ref();
    let document_path = document_path.as_ref();

    let schema = read_json(schema_path)?;
    let document = read_json(document_path)?;

    let report = validate_values(&schema, &document)?;
    info!(
        schema = %schema_path.display(),
        document = %document_path.display(),
        valid = report.valid,
        violations = report.errors.len(),
        "schema validation finished"
    );
    Ok(report)
}

/// Validate an in-memory document against an in-memory schema
pub fn validate_values(schema: &Value, document: &Value) -> Result<SchemaReport> {
    let compiled =
        JSONSchema::compile(schema).map_err(|e| CheckError::InvalidSchema(e.to_string()))?;

    let errors = match compiled.validate(document) {
        Ok(()) => Vec::new(),
        Err(violations) => violations.map(|e| describe(&e)).collect(),
    };

    for error in &errors {
        debug!(violation = %error, "schema violation");
    }

    Ok(SchemaReport::from_errors(errors))
}

fn describe(error: &ValidationError<'_>) -> String {
    let location = error.instance_path.to_string();
    if location.is_empty() {
        format!("/: {}", error)
    } else {
        format!("{}: {}", location, error)
    }
}

fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|source| CheckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CheckError::Json {
        path: path.to_path_buf(),
        source,
    })
}
