/// Data-center facility registry normalizer.
///
/// Facilities are not classified; rows only need usable coordinates.
/// Name, city and state columns must exist in the header but may be empty
/// per row. The size rank column is optional.

use crate::ingest::schema::{Row, Schema};
use crate::ingest::{DatasetRecord, check_range};
use crate::model::{FacilityRecord, RowRejected};

pub const DATASET: &str = "facilities";

pub const FIELD_NAME: &str = "name";
pub const FIELD_CITY: &str = "city";
pub const FIELD_STATE: &str = "state";
pub const FIELD_LATITUDE: &str = "latitude";
pub const FIELD_LONGITUDE: &str = "longitude";
pub const FIELD_SIZE_RANK: &str = "size_rank";

pub fn facility_schema() -> Schema {
    Schema::new(DATASET)
        .required(FIELD_NAME, &["Name", "facility_name"])
        .required(FIELD_CITY, &["City"])
        .required(FIELD_STATE, &["State", "region"])
        .required(FIELD_LATITUDE, &["Lat", "Latitude"])
        .required(FIELD_LONGITUDE, &["Long", "Lon", "Longitude"])
        .optional(FIELD_SIZE_RANK, &["SizeRank (numeric)", "SizeRank", "size_rank"])
}

impl DatasetRecord for FacilityRecord {
    const DATASET: &'static str = DATASET;

    fn schema() -> Schema {
        facility_schema()
    }

    fn from_row(row: &Row<'_>) -> Result<Self, RowRejected> {
        let latitude = check_range(FIELD_LATITUDE, row.number(FIELD_LATITUDE)?, -90.0, 90.0)?;
        let longitude =
            check_range(FIELD_LONGITUDE, row.number(FIELD_LONGITUDE)?, -180.0, 180.0)?;

        Ok(FacilityRecord {
            name: row.text(FIELD_NAME)?.to_string(),
            city: row.text(FIELD_CITY)?.to_string(),
            region: row.text(FIELD_STATE)?.to_string(),
            latitude,
            longitude,
            size_rank: row.optional_text(FIELD_SIZE_RANK).map(str::to_string),
        })
    }
}
