use std::fmt;

use crate::error::ModelError;

/// Stable cross-resource join key shared by every geography level.
pub const JOIN_KEY: &str = "HEROP_ID";

/// Geography level a resource is aggregated at, keyed by the
/// single-letter scale code used in dictionary filenames and resource
/// names (`S-2010`, `T-Latest`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GeoScale {
    State,
    County,
    Tract,
    Zcta,
}

/// Data vintage a resource covers. Every scale except ZCTA has the
/// full decennial set; ZCTA data only exists for the latest release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Vintage {
    Y1980,
    Y1990,
    Y2000,
    Y2010,
    Latest,
}

const DECENNIAL_VINTAGES: &[Vintage] = &[
    Vintage::Y1980,
    Vintage::Y1990,
    Vintage::Y2000,
    Vintage::Y2010,
    Vintage::Latest,
];

const LATEST_ONLY: &[Vintage] = &[Vintage::Latest];

impl GeoScale {
    pub fn from_code(code: &str) -> Result<Self, ModelError> {
        match code {
            "S" => Ok(GeoScale::State),
            "C" => Ok(GeoScale::County),
            "T" => Ok(GeoScale::Tract),
            "Z" => Ok(GeoScale::Zcta),
            other => Err(ModelError::InvalidGeography {
                code: other.to_string(),
            }),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GeoScale::State => "S",
            GeoScale::County => "C",
            GeoScale::Tract => "T",
            GeoScale::Zcta => "Z",
        }
    }

    /// Human-readable geography name used in generated titles and
    /// descriptions.
    pub fn geography_name(&self) -> &'static str {
        match self {
            GeoScale::State => "State",
            GeoScale::County => "County",
            GeoScale::Tract => "Census Tract",
            GeoScale::Zcta => "Zip-Code Tabulation Area (ZCTA)",
        }
    }

    /// Valid data vintages for this scale, in publication order.
    pub fn vintages(&self) -> &'static [Vintage] {
        match self {
            GeoScale::Zcta => LATEST_ONLY,
            _ => DECENNIAL_VINTAGES,
        }
    }

    /// Name stem of the geometry resource tabular data joins against.
    pub fn resource_stem(&self) -> &'static str {
        match self {
            GeoScale::State => "states",
            GeoScale::County => "counties",
            GeoScale::Tract => "tracts",
            GeoScale::Zcta => "zctas",
        }
    }
}

impl fmt::Display for GeoScale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Vintage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Vintage::Y1980 => "1980",
            Vintage::Y1990 => "1990",
            Vintage::Y2000 => "2000",
            Vintage::Y2010 => "2010",
            Vintage::Latest => "Latest",
        }
    }
}

impl fmt::Display for Vintage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve the geometry resource a tabular resource's join column
/// points at, from the resource name pattern `{scale}-{vintage}`.
///
/// The `Latest` vintage joins against the 2018 geometry release; every
/// decennial vintage joins against the 2010 release. A name whose
/// scale code is outside the fixed table is a malformed or
/// unanticipated resource and is not recoverable.
pub fn foreign_key_target(name: &str) -> Result<String, ModelError> {
    let unrecognized = || ModelError::UnrecognizedResourceName {
        name: name.to_string(),
    };
    let (code, vintage) = name.split_once('-').ok_or_else(unrecognized)?;
    let scale = GeoScale::from_code(code).map_err(|_| unrecognized())?;
    let year = if vintage == "Latest" { "2018" } else { "2010" };
    Ok(format!("{}-{year}", scale.resource_stem()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_codes_round_trip() {
        for code in ["S", "C", "T", "Z"] {
            let scale = GeoScale::from_code(code).unwrap();
            assert_eq!(scale.code(), code);
        }
        assert!(matches!(
            GeoScale::from_code("X"),
            Err(ModelError::InvalidGeography { .. })
        ));
    }

    #[test]
    fn zcta_only_has_latest_vintage() {
        assert_eq!(GeoScale::Zcta.vintages(), &[Vintage::Latest]);
        assert_eq!(GeoScale::Tract.vintages().len(), 5);
        assert_eq!(GeoScale::Tract.vintages()[0], Vintage::Y1980);
        assert_eq!(GeoScale::Tract.vintages()[4], Vintage::Latest);
    }

    #[test]
    fn foreign_key_targets() {
        assert_eq!(foreign_key_target("T-2010").unwrap(), "tracts-2010");
        assert_eq!(foreign_key_target("Z-Latest").unwrap(), "zctas-2018");
        assert_eq!(foreign_key_target("C-1990").unwrap(), "counties-2010");
        assert_eq!(foreign_key_target("S-Latest").unwrap(), "states-2018");
    }

    #[test]
    fn unanticipated_resource_names_fail() {
        assert!(matches!(
            foreign_key_target("X-2010"),
            Err(ModelError::UnrecognizedResourceName { ref name }) if name == "X-2010"
        ));
        assert!(matches!(
            foreign_key_target("tracts2010"),
            Err(ModelError::UnrecognizedResourceName { .. })
        ));
    }
}
