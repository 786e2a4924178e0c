/// Ingestion pipeline shared by every tabular source.
///
/// One pipeline, parameterized by a per-dataset `Schema`:
///
/// ```text
/// file / reader ─▶ header row ─▶ Schema::resolve ─▶ rows ─▶ DatasetRecord::from_row
///                                   │                          │
///                          SchemaViolation              RowRejected (row skipped)
/// ```
///
/// Dataset-level failures come back as `LoadError`; callers decide how to
/// degrade (the registry swaps in an empty dataset). Row-level failures are
/// counted and logged at debug, never returned.
///
/// Submodules:
/// - `schema`     — schema descriptors, header resolution, typed row access
/// - `monitors`   — pollutant monitor rows (normalized + classified)
/// - `facilities` — data-center registry rows
/// - `footprint`  — water-footprint rows
/// - `fixtures` (test only) — representative CSV sources

pub mod facilities;
pub mod footprint;
pub mod monitors;
pub mod schema;

#[cfg(test)]
pub(crate) mod fixtures;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{Level, debug, log};
use serde::Serialize;

use crate::model::{LoadError, RowRejected};
use schema::{Row, Schema};

// ---------------------------------------------------------------------------
// Record trait
// ---------------------------------------------------------------------------

/// A record type that can be built from one row of a declared schema.
pub trait DatasetRecord: Sized {
    /// Dataset name used in logs and load reports.
    const DATASET: &'static str;

    /// The declared schema, before any configured aliases are merged in.
    fn schema() -> Schema;

    fn from_row(row: &Row<'_>) -> Result<Self, RowRejected>;
}

/// Rejects values outside `[min, max]`.
pub(crate) fn check_range(
    field: &'static str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<f64, RowRejected> {
    if value < min || value > max {
        return Err(RowRejected::OutOfRange { field, value });
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Load results
// ---------------------------------------------------------------------------

/// Row counts for one load pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub dataset: &'static str,
    pub admitted: usize,
    pub rejected: usize,
}

impl LoadReport {
    pub fn empty(dataset: &'static str) -> Self {
        Self {
            dataset,
            admitted: 0,
            rejected: 0,
        }
    }
}

#[derive(Debug)]
pub struct Loaded<T> {
    pub records: Vec<T>,
    pub report: LoadReport,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Loads every admissible row of a delimited file, in source order.
///
/// # Errors
/// - `LoadError::SourceUnavailable` — the file cannot be opened.
/// - `LoadError::Unreadable` — the header row cannot be read.
/// - `LoadError::SchemaViolation` — a required column is absent.
pub fn load_path<T: DatasetRecord>(path: &Path, schema: &Schema) -> Result<Loaded<T>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::SourceUnavailable {
        dataset: schema.dataset,
        path: path.to_path_buf(),
        source,
    })?;
    load_reader(file, schema)
}

/// Same as `load_path` for an already-open source.
pub fn load_reader<T: DatasetRecord, R: Read>(
    reader: R,
    schema: &Schema,
) -> Result<Loaded<T>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|source| LoadError::Unreadable {
            dataset: schema.dataset,
            source,
        })?
        .clone();
    let columns = schema.resolve(&headers)?;

    let mut records = Vec::new();
    let mut rejected = 0;

    for (i, result) in reader.records().enumerate() {
        // header is line 1
        let line = i + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                debug!("{} line {}: unreadable row: {}", schema.dataset, line, e);
                rejected += 1;
                continue;
            }
        };

        match T::from_row(&Row::new(&record, &columns)) {
            Ok(parsed) => records.push(parsed),
            Err(reason) => {
                debug!("{} line {}: row rejected: {}", schema.dataset, line, reason);
                rejected += 1;
            }
        }
    }

    let report = LoadReport {
        dataset: schema.dataset,
        admitted: records.len(),
        rejected,
    };

    Ok(Loaded { records, report })
}

/// `load_path` with the dataset-level failure policy applied: any
/// `LoadError` is logged at warn and becomes an empty dataset.
pub fn load_or_empty<T: DatasetRecord>(path: &Path, schema: &Schema) -> Loaded<T> {
    load_or_empty_at(path, schema, Level::Warn)
}

/// `load_or_empty` with the failure logged at `level`. Paths that re-read a
/// source on every request use a quiet level so a missing file does not
/// repeat the same warning per call.
pub fn load_or_empty_at<T: DatasetRecord>(
    path: &Path,
    schema: &Schema,
    level: Level,
) -> Loaded<T> {
    match load_path(path, schema) {
        Ok(loaded) => loaded,
        Err(e) => {
            log!(level, "{}; serving empty {} dataset", e, schema.dataset);
            Loaded {
                records: Vec::new(),
                report: LoadReport::empty(schema.dataset),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;
    use crate::model::{ClassifiedReading, FacilityRecord};

    #[test]
    fn test_load_reader_preserves_source_order() {
        let loaded: Loaded<ClassifiedReading> =
            load_reader(fixture_monitors_csv().as_bytes(), &ClassifiedReading::schema())
                .expect("fixture should load");
        let sites: Vec<&str> = loaded
            .records
            .iter()
            .map(|r| r.reading.site_name.as_str())
            .collect();
        assert_eq!(sites, vec!["Downtown", "Harbor", "Airport", "Valley"]);
        assert_eq!(loaded.report.admitted, 4);
        assert_eq!(loaded.report.rejected, 0);
    }

    #[test]
    fn test_bad_rows_do_not_affect_siblings() {
        let loaded: Loaded<ClassifiedReading> = load_reader(
            fixture_monitors_with_bad_rows_csv().as_bytes(),
            &ClassifiedReading::schema(),
        )
        .expect("fixture should load");
        let sites: Vec<&str> = loaded
            .records
            .iter()
            .map(|r| r.reading.site_name.as_str())
            .collect();
        assert_eq!(sites, vec!["Good One", "Good Two"]);
        assert_eq!(loaded.report.rejected, 5);
    }

    #[test]
    fn test_missing_column_fails_whole_dataset() {
        let result: Result<Loaded<ClassifiedReading>, LoadError> = load_reader(
            fixture_monitors_missing_column_csv().as_bytes(),
            &ClassifiedReading::schema(),
        );
        match result {
            Err(LoadError::SchemaViolation { missing, .. }) => {
                assert_eq!(missing, vec!["concentration"]);
            }
            other => panic!("expected SchemaViolation, got {:?}", other.map(|l| l.report)),
        }
    }

    #[test]
    fn test_empty_source_is_schema_violation() {
        let result: Result<Loaded<FacilityRecord>, LoadError> =
            load_reader("".as_bytes(), &FacilityRecord::schema());
        assert!(matches!(result, Err(LoadError::SchemaViolation { .. })));
    }

    #[test]
    fn test_duplicate_rows_are_kept() {
        let csv = "Latitude,Longitude,Arithmetic Mean,Local Site Name,Parameter Name\n\
                   34.05,-118.25,0.062,Downtown,Ozone\n\
                   34.05,-118.25,0.062,Downtown,Ozone\n";
        let loaded: Loaded<ClassifiedReading> =
            load_reader(csv.as_bytes(), &ClassifiedReading::schema()).expect("should load");
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.records[0], loaded.records[1]);
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let loaded: Loaded<FacilityRecord> = load_or_empty(
            Path::new("/nonexistent/aqmon/data_centers.csv"),
            &FacilityRecord::schema(),
        );
        assert!(loaded.records.is_empty());
        assert_eq!(loaded.report, LoadReport::empty("facilities"));
    }

    #[test]
    fn test_missing_file_reports_source_unavailable() {
        let result: Result<Loaded<FacilityRecord>, LoadError> = load_path(
            Path::new("/nonexistent/aqmon/data_centers.csv"),
            &FacilityRecord::schema(),
        );
        assert!(matches!(result, Err(LoadError::SourceUnavailable { .. })));
    }

    #[test]
    fn test_check_range() {
        assert_eq!(check_range("latitude", 45.0, -90.0, 90.0), Ok(45.0));
        assert_eq!(
            check_range("latitude", 91.0, -90.0, 90.0),
            Err(RowRejected::OutOfRange { field: "latitude", value: 91.0 })
        );
    }
}
