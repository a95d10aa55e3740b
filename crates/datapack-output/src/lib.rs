pub mod archive;
pub mod error;
pub mod package;

pub use archive::zip_directory;
pub use error::PackageError;
pub use package::{
    BuiltResource, PACKAGE_HOMEPAGE, PACKAGE_NAME, PACKAGE_PROFILE, PACKAGE_TITLE, PackageBuild,
    build_package, collect_schema_files,
};
