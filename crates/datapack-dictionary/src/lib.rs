pub mod error;
pub mod fields;
pub mod generator;
pub mod table;

pub use error::DictionaryError;
pub use fields::{GEOGRAPHY_KEY_FIELDS, build_fields, build_fields_for_rows};
pub use generator::{FULL_TABLES_URL, generate_schemas};
pub use table::{DictionaryTable, read_dictionary};
