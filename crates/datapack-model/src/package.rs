use serde::{Deserialize, Serialize};

use crate::field::FieldDescriptor;
use crate::types::SchemaType;

/// Top-level package manifest listing every published resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageManifest {
    pub profile: String,
    pub name: String,
    pub title: String,
    pub homepage: String,
    pub resources: Vec<ResourceRef>,
    pub licenses: Vec<License>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct License {
    pub name: String,
    pub path: String,
    pub title: String,
}

/// A resource entry inside the manifest: display metadata plus data
/// and schema paths relative to the package root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub path: Vec<String>,
    pub schema: String,
}

/// The consumer-facing slice of a table schema.
///
/// Internal attributes (source names, warehouse typing, padding
/// directives) stay in the authoring schema; only descriptive
/// attributes are published. `primaryKey` is always emitted, null when
/// the authoring schema declared none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedSchema {
    #[serde(rename = "primaryKey")]
    pub primary_key: Option<String>,
    pub fields: Vec<PublishedField>,
    #[serde(rename = "foreignKeys", default, skip_serializing_if = "Option::is_none")]
    pub foreign_keys: Option<Vec<ForeignKey>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PublishedField {
    /// Keep only the descriptive attributes, dropping any that are
    /// absent or blank.
    pub fn from_descriptor(field: &FieldDescriptor) -> Self {
        Self {
            name: field.name.clone(),
            title: non_blank(field.title.as_deref()),
            schema_type: field.schema_type,
            example: non_blank(field.example.as_deref()),
            description: non_blank(field.description.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub fields: String,
    pub reference: ForeignKeyReference,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyReference {
    pub resource: String,
    pub fields: String,
}

impl ForeignKey {
    /// A single-column key pointing at the same column in `resource`.
    pub fn same_column(column: &str, resource: impl Into<String>) -> Self {
        Self {
            fields: column.to_owned(),
            reference: ForeignKeyReference {
                resource: resource.into(),
                fields: column.to_owned(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geography::JOIN_KEY;

    #[test]
    fn published_field_drops_blank_attributes() {
        let mut field = FieldDescriptor::new("TotPop", SchemaType::Integer);
        field.title = Some("Total Population".into());
        field.example = Some(String::new());
        field.description = Some("  ".into());
        field.src_name = Some("TOT_POP".into());
        field.bq_data_type = Some("INTEGER".into());

        let published = PublishedField::from_descriptor(&field);
        assert_eq!(published.title.as_deref(), Some("Total Population"));
        assert!(published.example.is_none());
        assert!(published.description.is_none());

        let json = serde_json::to_string(&published).unwrap();
        assert_eq!(
            json,
            "{\"name\":\"TotPop\",\"title\":\"Total Population\",\"type\":\"integer\"}"
        );
    }

    #[test]
    fn published_schema_always_carries_primary_key() {
        let schema = PublishedSchema {
            primary_key: None,
            fields: Vec::new(),
            foreign_keys: None,
        };
        let json = serde_json::to_string(&schema).unwrap();
        assert_eq!(json, "{\"primaryKey\":null,\"fields\":[]}");
    }

    #[test]
    fn resource_ref_references_its_schema_by_path() {
        let resource = ResourceRef {
            name: "S-1980".to_string(),
            title: None,
            description: Some("State-level 1980 variables.".to_string()),
            path: vec!["data/S_1980.csv".to_string()],
            schema: "schemas/S-1980.json".to_string(),
        };
        let json = serde_json::to_string(&resource).unwrap();
        assert_eq!(
            json,
            "{\"name\":\"S-1980\",\"description\":\"State-level 1980 variables.\",\"path\":[\"data/S_1980.csv\"],\"schema\":\"schemas/S-1980.json\"}"
        );
    }

    #[test]
    fn foreign_key_shape() {
        let fk = ForeignKey::same_column(JOIN_KEY, "states-2010");
        let json = serde_json::to_string(&fk).unwrap();
        assert_eq!(
            json,
            "{\"fields\":\"HEROP_ID\",\"reference\":{\"resource\":\"states-2010\",\"fields\":\"HEROP_ID\"}}"
        );
    }
}
