use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Canonical schema type for a published field.
///
/// Data dictionaries carry free-text type labels ("Integer",
/// "Character / Factor", ...); every label must map into one of these
/// four types because the row normalizer keys its coercion rules on
/// them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
}

impl SchemaType {
    /// Map a data-dictionary type label to its canonical schema type.
    ///
    /// Exact-match dispatch over the accepted label set. Any other label
    /// is a hard error: a field without a schema type has no coercion
    /// rule downstream.
    pub fn from_label(label: &str) -> Result<Self, ModelError> {
        match label {
            "Integer" => Ok(SchemaType::Integer),
            "Date" | "String" | "Character / Factor" | "String / Factor" => Ok(SchemaType::String),
            "Boolean" => Ok(SchemaType::Boolean),
            "Float" | "Double" | "Numeric" => Ok(SchemaType::Number),
            other => Err(ModelError::UnrecognizedType {
                label: other.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a data-dictionary type label to an analytical-warehouse column
/// type.
///
/// Unlike [`SchemaType::from_label`] this is intentionally permissive:
/// labels outside the special cases pass through upper-cased, because
/// the warehouse accepts a wider type vocabulary than the package
/// schema does.
pub fn warehouse_type(label: &str) -> String {
    match label {
        "Date" => "DATE".to_string(),
        "Character / Factor" | "String / Factor" => "STRING".to_string(),
        "Binary" => "BOOLEAN".to_string(),
        other => other.to_uppercase(),
    }
}
