pub mod csv_data;
pub mod error;
pub mod resolve;
pub mod shp;
pub mod table;

pub use csv_data::read_csv_dataset;
pub use error::IngestError;
pub use resolve::resolve_data_paths;
pub use shp::read_shapefile_dataset;
pub use table::{DataTable, read_dataset};
