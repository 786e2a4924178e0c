/// Core data types for the air quality monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O, only types, the band/colour mapping and the error enums
/// used by the ingest and configuration layers.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Reading types
// ---------------------------------------------------------------------------

/// A single pollutant measurement tied to a monitoring station.
///
/// Produced by the monitor normalizer from one source row. Invariants
/// (enforced at admission, never re-checked afterwards):
///   latitude in [-90, 90], longitude in [-180, 180], concentration >= 0.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorReading {
    pub latitude: f64,
    pub longitude: f64,
    pub concentration: f64,
    pub pollutant_kind: String, // lower-cased, e.g. "ozone", "pm2.5 - local conditions"
    pub site_name: String,
}

/// Severity band derived from an AQI index value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AqiBand {
    Good,
    Moderate,
    UnhealthySensitive,
    Unhealthy,
    VeryUnhealthy,
}

impl AqiBand {
    /// All bands in ascending severity.
    pub const ALL: [AqiBand; 5] = [
        AqiBand::Good,
        AqiBand::Moderate,
        AqiBand::UnhealthySensitive,
        AqiBand::Unhealthy,
        AqiBand::VeryUnhealthy,
    ];

    /// Band for a final index value. Depends only on the index, never on
    /// which breakpoint segment produced it.
    pub fn from_index(index: u32) -> Self {
        match index {
            0..=50 => AqiBand::Good,
            51..=100 => AqiBand::Moderate,
            101..=150 => AqiBand::UnhealthySensitive,
            151..=200 => AqiBand::Unhealthy,
            _ => AqiBand::VeryUnhealthy,
        }
    }

    /// Map marker colour consumed by the presentation clients.
    pub fn color(&self) -> &'static str {
        match self {
            AqiBand::Good => "green",
            AqiBand::Moderate => "yellow",
            AqiBand::UnhealthySensitive => "orange",
            AqiBand::Unhealthy => "red",
            AqiBand::VeryUnhealthy => "purple",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AqiBand::Good => "good",
            AqiBand::Moderate => "moderate",
            AqiBand::UnhealthySensitive => "unhealthy_sensitive",
            AqiBand::Unhealthy => "unhealthy",
            AqiBand::VeryUnhealthy => "very_unhealthy",
        }
    }
}

/// AQI index plus its severity band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub index: u32, // always >= 1
    pub band: AqiBand,
}

/// A reading together with the classification computed when it was admitted.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedReading {
    pub reading: MonitorReading,
    pub classification: Classification,
}

// ---------------------------------------------------------------------------
// Auxiliary dataset types
// ---------------------------------------------------------------------------

/// A data-center location from the facility registry.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilityRecord {
    pub name: String,
    pub city: String,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub size_rank: Option<String>,
}

/// A water-footprint point. `primary_fuel` is only present when the source
/// carries a fuel column; it drives the per-fuel aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct FootprintRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub footprint_value: f64,
    pub subbasin: String,
    pub region: String,
    pub primary_fuel: Option<String>,
}

/// Water footprint total for one primary fuel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelFootprint {
    pub primary_fuel: String,
    pub water_footprint: f64,
}

// ---------------------------------------------------------------------------
// Query types
// ---------------------------------------------------------------------------

/// Categorical pollutant filter accepted by the query service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollutantFilter {
    All,
    OzoneFamily,
    ParticulateFamily,
}

impl PollutantFilter {
    /// Parses the `pollutant` query parameter. Anything other than
    /// `ozone` or `pm` (case-insensitive) means no filtering.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(|p| p.trim().to_ascii_lowercase()).as_deref() {
            Some("ozone") => PollutantFilter::OzoneFamily,
            Some("pm") => PollutantFilter::ParticulateFamily,
            _ => PollutantFilter::All,
        }
    }

    /// The single categorization point for pollutant kinds: case-insensitive
    /// substring matching on "ozone" / "pm". Known to be loose ("pm" would
    /// match any kind containing those letters); callers must not inline it.
    pub fn matches(&self, pollutant_kind: &str) -> bool {
        let kind = pollutant_kind.to_lowercase();
        match self {
            PollutantFilter::All => true,
            PollutantFilter::OzoneFamily => kind.contains("ozone"),
            PollutantFilter::ParticulateFamily => kind.contains("pm"),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Dataset-level load failures. Never surfaced to HTTP callers: the registry
/// logs them and serves an empty dataset instead.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{dataset} source unavailable at {}: {source}", .path.display())]
    SourceUnavailable {
        dataset: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{dataset} source is missing required column(s): {}", .missing.join(", "))]
    SchemaViolation {
        dataset: &'static str,
        missing: Vec<&'static str>,
    },

    #[error("{dataset} source could not be read: {source}")]
    Unreadable {
        dataset: &'static str,
        #[source]
        source: csv::Error,
    },
}

/// Why a single source row was skipped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowRejected {
    #[error("missing value for '{0}'")]
    MissingField(&'static str),

    #[error("'{field}' is not a number: {value:?}")]
    NotNumeric { field: &'static str, value: String },

    #[error("'{field}' out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
