/// Monitor source normalizer.
///
/// Maps one row of an annual-concentration-by-monitor export onto a
/// `MonitorReading`, then classifies it on admission. The classification is
/// computed here exactly once; nothing downstream recomputes it.
///
/// Required columns (first matching alias wins):
///
/// | field         | accepted headers                                     |
/// |---------------|------------------------------------------------------|
/// | latitude      | Latitude, lat                                        |
/// | longitude     | Longitude, lon, lng, long                            |
/// | concentration | Arithmetic Mean, arithmetic_mean, MeanConcentration, mean_concentration |
/// | site_name     | Local Site Name, site_name, city                     |
/// | pollutant     | Parameter Name, parameter, pollutant                 |

use crate::aqi::classify;
use crate::ingest::schema::{Row, Schema};
use crate::ingest::{DatasetRecord, check_range};
use crate::model::{ClassifiedReading, MonitorReading, RowRejected};

pub const DATASET: &str = "monitors";

pub const FIELD_LATITUDE: &str = "latitude";
pub const FIELD_LONGITUDE: &str = "longitude";
pub const FIELD_CONCENTRATION: &str = "concentration";
pub const FIELD_SITE_NAME: &str = "site_name";
pub const FIELD_POLLUTANT: &str = "pollutant";

pub fn monitor_schema() -> Schema {
    Schema::new(DATASET)
        .required(FIELD_LATITUDE, &["Latitude", "lat"])
        .required(FIELD_LONGITUDE, &["Longitude", "lon", "lng", "long"])
        .required(
            FIELD_CONCENTRATION,
            &["Arithmetic Mean", "arithmetic_mean", "MeanConcentration", "mean_concentration"],
        )
        .required(FIELD_SITE_NAME, &["Local Site Name", "site_name", "city"])
        .required(FIELD_POLLUTANT, &["Parameter Name", "parameter", "pollutant"])
}

/// Builds a `MonitorReading` from one row, enforcing the coordinate and
/// concentration invariants. The pollutant kind is lower-cased.
pub fn normalize(row: &Row<'_>) -> Result<MonitorReading, RowRejected> {
    let latitude = check_range(FIELD_LATITUDE, row.number(FIELD_LATITUDE)?, -90.0, 90.0)?;
    let longitude = check_range(FIELD_LONGITUDE, row.number(FIELD_LONGITUDE)?, -180.0, 180.0)?;
    let concentration = row.number(FIELD_CONCENTRATION)?;
    if concentration < 0.0 {
        return Err(RowRejected::OutOfRange {
            field: FIELD_CONCENTRATION,
            value: concentration,
        });
    }

    Ok(MonitorReading {
        latitude,
        longitude,
        concentration,
        pollutant_kind: row.text(FIELD_POLLUTANT)?.to_lowercase(),
        site_name: row.text(FIELD_SITE_NAME)?.to_string(),
    })
}

impl ClassifiedReading {
    /// Attaches the classification for a reading that passed normalization.
    pub fn admit(reading: MonitorReading) -> Self {
        let classification = classify(&reading.pollutant_kind, reading.concentration);
        Self {
            reading,
            classification,
        }
    }
}

impl DatasetRecord for ClassifiedReading {
    const DATASET: &'static str = DATASET;

    fn schema() -> Schema {
        monitor_schema()
    }

    fn from_row(row: &Row<'_>) -> Result<Self, RowRejected> {
        normalize(row).map(ClassifiedReading::admit)
    }
}
