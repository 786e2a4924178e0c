/// Read-side query service.
///
/// Owns the reading registry and the auxiliary datasets, all constructed
/// once at startup and shared by handle with the HTTP layer. Request
/// handling never mutates anything; the only writer is `load_all`, which is
/// called at startup and by the optional admin reload, and every dataset it
/// touches is swapped atomically.
///
/// Facility freshness depends on `FacilityRefresh`:
/// - `PerRequest` re-reads the facility file on every call, so live edits
///   show up immediately (this is how the dashboard backend always behaved)
/// - `Cached` serves the snapshot taken by the last `load_all`

use std::path::PathBuf;
use std::sync::Arc;

use log::Level;

use crate::config::{FacilityRefresh, ServiceConfig};
use crate::ingest::{self, DatasetRecord, LoadReport};
use crate::model::{
    ClassifiedReading, FacilityRecord, FootprintRecord, FuelFootprint, PollutantFilter,
};
use crate::registry::{ReadingRegistry, Registry};

pub struct QueryService {
    monitors_path: PathBuf,
    facilities_path: PathBuf,
    footprints_path: PathBuf,
    facility_refresh: FacilityRefresh,
    readings: ReadingRegistry,
    facilities: Registry<FacilityRecord>,
    footprints: Registry<FootprintRecord>,
    fuel_table: Vec<FuelFootprint>,
}

impl QueryService {
    /// Builds the service with empty datasets. Call `load_all` to populate.
    pub fn new(config: &ServiceConfig) -> Self {
        let aliases = &config.aliases;
        Self {
            monitors_path: config.sources.monitors.clone(),
            facilities_path: config.sources.facilities.clone(),
            footprints_path: config.sources.footprints.clone(),
            facility_refresh: config.sources.facility_refresh,
            readings: Registry::with_schema(
                ClassifiedReading::schema().with_extra_aliases(&aliases.monitors),
            ),
            facilities: Registry::with_schema(
                FacilityRecord::schema().with_extra_aliases(&aliases.facilities),
            ),
            footprints: Registry::with_schema(
                FootprintRecord::schema().with_extra_aliases(&aliases.footprints),
            ),
            fuel_table: config.water_fuel.clone(),
        }
    }

    /// Runs every loader. Each dataset succeeds or degrades independently.
    ///
    /// In `PerRequest` mode the facility file is still parsed here, purely as
    /// a startup check: its counts go into the report and a missing or
    /// malformed file is warned about once. The records are not kept.
    pub fn load_all(&self) -> Vec<LoadReport> {
        let mut reports = vec![
            self.readings.load(&self.monitors_path),
            self.footprints.load(&self.footprints_path),
        ];
        match self.facility_refresh {
            FacilityRefresh::Cached => reports.push(self.facilities.load(&self.facilities_path)),
            FacilityRefresh::PerRequest => {
                let loaded: ingest::Loaded<FacilityRecord> =
                    ingest::load_or_empty(&self.facilities_path, self.facilities.schema());
                reports.push(loaded.report);
            }
        }
        reports
    }

    pub fn readings(&self) -> &ReadingRegistry {
        &self.readings
    }

    /// Admitted readings in the given pollutant family, source order kept.
    pub fn query(&self, filter: PollutantFilter) -> Vec<ClassifiedReading> {
        self.readings
            .snapshot()
            .iter()
            .filter(|r| filter.matches(&r.reading.pollutant_kind))
            .cloned()
            .collect()
    }

    /// `query` plus the current facility dataset.
    pub fn query_with_facilities(
        &self,
        filter: PollutantFilter,
    ) -> (Vec<ClassifiedReading>, Arc<Vec<FacilityRecord>>) {
        (self.query(filter), self.facilities())
    }

    pub fn facilities(&self) -> Arc<Vec<FacilityRecord>> {
        match self.facility_refresh {
            FacilityRefresh::Cached => self.facilities.snapshot(),
            FacilityRefresh::PerRequest => {
                // load_all already warned about a broken file
                let loaded = ingest::load_or_empty_at(
                    &self.facilities_path,
                    self.facilities.schema(),
                    Level::Debug,
                );
                Arc::new(loaded.records)
            }
        }
    }

    pub fn footprints(&self) -> Arc<Vec<FootprintRecord>> {
        self.footprints.snapshot()
    }

    /// Water footprint totalled per primary fuel, in first-seen order.
    /// Falls back to the configured static table when no footprint record
    /// carries a fuel.
    pub fn water_by_fuel(&self) -> Vec<FuelFootprint> {
        let totals = total_by_fuel(&self.footprints.snapshot());
        if totals.is_empty() {
            self.fuel_table.clone()
        } else {
            totals
        }
    }
}

fn total_by_fuel(records: &[FootprintRecord]) -> Vec<FuelFootprint> {
    let mut totals: Vec<FuelFootprint> = Vec::new();
    for record in records {
        let Some(fuel) = record.primary_fuel.as_deref() else {
            continue;
        };
        match totals.iter_mut().find(|t| t.primary_fuel == fuel) {
            Some(total) => total.water_footprint += record.footprint_value,
            None => totals.push(FuelFootprint {
                primary_fuel: fuel.to_string(),
                water_footprint: record.footprint_value,
            }),
        }
    }
    totals
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
