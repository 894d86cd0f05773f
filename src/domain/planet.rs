//! Planet size categories derived from a predicted radius (Earth radii).
//!
//! Two independent schemes exist and their boundaries are never merged:
//! - [`DisplayCategory`]: six buckets used when presenting a result.
//! - [`StorageCategory`]: three coarse buckets used for labelling stored records.
//!
//! The canonical scheme is [`CategoryScheme::Display`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayCategory {
    SubEarth,
    EarthLike,
    SuperEarth,
    MiniNeptune,
    GasGiant,
    Unknown,
}

impl DisplayCategory {
    pub fn from_radius(radius: f64) -> Self {
        if radius < 0.8 {
            DisplayCategory::SubEarth
        } else if radius < 1.25 {
            DisplayCategory::EarthLike
        } else if radius < 2.0 {
            DisplayCategory::SuperEarth
        } else if radius < 4.0 {
            DisplayCategory::MiniNeptune
        } else if radius < 10.0 {
            DisplayCategory::GasGiant
        } else {
            // Also covers NaN, which fails every comparison above.
            DisplayCategory::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DisplayCategory::SubEarth => "Sub-Earth",
            DisplayCategory::EarthLike => "Earth-like",
            DisplayCategory::SuperEarth => "Super-Earth",
            DisplayCategory::MiniNeptune => "Mini-Neptune",
            DisplayCategory::GasGiant => "Gas Giant",
            DisplayCategory::Unknown => "Unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DisplayCategory::SubEarth => "Small rocky world",
            DisplayCategory::EarthLike => "Potentially habitable",
            DisplayCategory::SuperEarth => "Large rocky planet",
            DisplayCategory::MiniNeptune => "Gas-rich mini Neptune",
            DisplayCategory::GasGiant => "Jupiter-like world",
            DisplayCategory::Unknown => "Unusual size",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageCategory {
    EarthSized,
    SuperEarth,
    GasGiant,
}

impl StorageCategory {
    pub fn from_radius(radius: f64) -> Self {
        if radius < 1.0 {
            StorageCategory::EarthSized
        } else if radius < 4.0 {
            StorageCategory::SuperEarth
        } else {
            StorageCategory::GasGiant
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StorageCategory::EarthSized => "Earth-sized",
            StorageCategory::SuperEarth => "Super-Earth",
            StorageCategory::GasGiant => "Gas Giant",
        }
    }
}

/// Selects which category function labels a regression outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CategoryScheme {
    #[default]
    Display,
    Storage,
}

impl CategoryScheme {
    pub fn categorize(&self, radius: f64) -> &'static str {
        match self {
            CategoryScheme::Display => DisplayCategory::from_radius(radius).label(),
            CategoryScheme::Storage => StorageCategory::from_radius(radius).label(),
        }
    }

    /// Every label this scheme can produce.
    pub fn labels(&self) -> &'static [&'static str] {
        match self {
            CategoryScheme::Display => &[
                "Sub-Earth",
                "Earth-like",
                "Super-Earth",
                "Mini-Neptune",
                "Gas Giant",
                "Unknown",
            ],
            CategoryScheme::Storage => &["Earth-sized", "Super-Earth", "Gas Giant"],
        }
    }
}

impl fmt::Display for CategoryScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryScheme::Display => write!(f, "display"),
            CategoryScheme::Storage => write!(f, "storage"),
        }
    }
}

impl FromStr for CategoryScheme {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "display" => Ok(CategoryScheme::Display),
            "storage" => Ok(CategoryScheme::Storage),
            _ => anyhow::bail!(
                "Invalid PLANET_CATEGORY_SCHEME: {}. Must be 'display' or 'storage'",
                s
            ),
        }
    }
}
