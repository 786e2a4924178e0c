/// Water-footprint dataset normalizer.
///
/// Each row is a plant location with its water footprint. When the source
/// also carries a `primary_fuel` column the value is kept so footprints can
/// be totalled per fuel.

use crate::ingest::schema::{Row, Schema};
use crate::ingest::{DatasetRecord, check_range};
use crate::model::{FootprintRecord, RowRejected};

pub const DATASET: &str = "footprints";

pub const FIELD_LATITUDE: &str = "latitude";
pub const FIELD_LONGITUDE: &str = "longitude";
pub const FIELD_FOOTPRINT: &str = "water_footprint";
pub const FIELD_SUBBASIN: &str = "subbasin";
pub const FIELD_STATE: &str = "state";
pub const FIELD_PRIMARY_FUEL: &str = "primary_fuel";

pub fn footprint_schema() -> Schema {
    Schema::new(DATASET)
        .required(FIELD_LATITUDE, &["lat", "Latitude"])
        .required(FIELD_LONGITUDE, &["lon", "Longitude"])
        .required(FIELD_FOOTPRINT, &["water_footprint", "footprint"])
        .required(FIELD_SUBBASIN, &["subbasin"])
        .required(FIELD_STATE, &["plant_state", "state"])
        .optional(FIELD_PRIMARY_FUEL, &["primary_fuel", "fuel"])
}

impl DatasetRecord for FootprintRecord {
    const DATASET: &'static str = DATASET;

    fn schema() -> Schema {
        footprint_schema()
    }

    fn from_row(row: &Row<'_>) -> Result<Self, RowRejected> {
        let latitude = check_range(FIELD_LATITUDE, row.number(FIELD_LATITUDE)?, -90.0, 90.0)?;
        let longitude =
            check_range(FIELD_LONGITUDE, row.number(FIELD_LONGITUDE)?, -180.0, 180.0)?;

        Ok(FootprintRecord {
            latitude,
            longitude,
            footprint_value: row.number(FIELD_FOOTPRINT)?,
            subbasin: row.text(FIELD_SUBBASIN)?.to_string(),
            region: row.text(FIELD_STATE)?.to_string(),
            primary_fuel: row.optional_text(FIELD_PRIMARY_FUEL).map(str::to_string),
        })
    }
}
