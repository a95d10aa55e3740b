use serde::{Deserialize, Serialize};

use crate::types::SchemaType;

/// One column definition inside a resource schema.
///
/// Built from a data-dictionary row by the field builder; `name` is the
/// canonical identifier and is never empty. Optional attributes that
/// were absent (or not-a-number artifacts) in the dictionary are `None`
/// and are omitted when the schema is serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_name: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bq_data_type: Option<String>,
    /// Left-pad the string form with zeros to `max_length` before
    /// coercion. Used for identifier columns that lose leading zeros in
    /// spreadsheet round-trips (ZIP and FIPS codes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zfill: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, schema_type: SchemaType) -> Self {
        Self {
            name: name.into(),
            src_name: None,
            schema_type,
            title: None,
            example: None,
            description: None,
            constraints: None,
            theme: None,
            source: None,
            comments: None,
            bq_data_type: None,
            zfill: None,
            max_length: None,
        }
    }

    /// True when the zero-padding directive applies to this field.
    pub fn wants_zfill(&self) -> bool {
        self.zfill == Some(true) && self.max_length.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_attributes_are_omitted_from_json() {
        let field = FieldDescriptor::new("TotPop", SchemaType::Integer);
        let json = serde_json::to_string(&field).unwrap();
        assert_eq!(json, "{\"name\":\"TotPop\",\"type\":\"integer\"}");
    }

    #[test]
    fn deserializes_with_missing_optionals() {
        let field: FieldDescriptor =
            serde_json::from_str("{\"name\":\"GEOID\",\"type\":\"string\",\"zfill\":true,\"max_length\":5}")
                .unwrap();
        assert_eq!(field.name, "GEOID");
        assert!(field.src_name.is_none());
        assert!(field.wants_zfill());
        assert_eq!(field.max_length, Some(5));
    }

    #[test]
    fn zfill_requires_a_width() {
        let mut field = FieldDescriptor::new("ZCTA", SchemaType::String);
        field.zfill = Some(true);
        assert!(!field.wants_zfill());
        field.max_length = Some(5);
        assert!(field.wants_zfill());
    }
}
