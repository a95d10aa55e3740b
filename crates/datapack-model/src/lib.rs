pub mod error;
pub mod field;
pub mod geography;
pub mod package;
pub mod resource;
pub mod types;

pub use error::ModelError;
pub use field::FieldDescriptor;
pub use geography::{GeoScale, JOIN_KEY, Vintage, foreign_key_target};
pub use package::{
    ForeignKey, ForeignKeyReference, License, PackageManifest, PublishedField, PublishedSchema,
    ResourceRef,
};
pub use resource::{ResourcePath, ResourceSchema, TableSchema, read_json_file, write_json_file};
pub use types::{SchemaType, warehouse_type};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn published_schema_from_authoring_schema() {
        let mut id = FieldDescriptor::new("HEROP_ID", SchemaType::String);
        id.title = Some("Identifier".into());
        let schema = TableSchema {
            primary_key: Some(JOIN_KEY.into()),
            fields: vec![id, FieldDescriptor::new("TotPop", SchemaType::Integer)],
        };

        let published = PublishedSchema {
            primary_key: schema.primary_key.clone(),
            fields: schema.fields.iter().map(PublishedField::from_descriptor).collect(),
            foreign_keys: Some(vec![ForeignKey::same_column(JOIN_KEY, "states-2010")]),
        };

        let json = serde_json::to_value(&published).expect("serialize schema");
        assert_eq!(json["primaryKey"], "HEROP_ID");
        assert_eq!(json["fields"][1]["type"], "integer");
        assert_eq!(
            json["foreignKeys"][0]["reference"]["resource"],
            "states-2010"
        );
    }
}
