/// Grouping helpers for classified readings.
///
/// `group_by_band` and `count_by_pollutant` turn the flat reading list held
/// by the registry into the per-band and per-pollutant tallies printed by
/// `inspect_sources`, so a new export can be sanity-checked without starting
/// the server.
///
/// The integration test at the bottom of this module exercises the full
/// parse → classify → group pipeline, and lives here because grouping is the
/// final step in that chain.

use std::collections::BTreeMap;

use crate::model::{AqiBand, ClassifiedReading};

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Number of readings in each band. Every band is present, including empty ones.
pub fn group_by_band(readings: &[ClassifiedReading]) -> BTreeMap<AqiBand, usize> {
    let mut grouped: BTreeMap<AqiBand, usize> = AqiBand::ALL.iter().map(|b| (*b, 0)).collect();

    for reading in readings {
        *grouped.entry(reading.classification.band).or_insert(0) += 1;
    }

    grouped
}

/// Number of readings per (lower-cased) pollutant kind.
pub fn count_by_pollutant(readings: &[ClassifiedReading]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    for reading in readings {
        *counts.entry(reading.reading.pollutant_kind.clone()).or_insert(0) += 1;
    }

    counts
}

/// Highest-index reading, first one wins on ties.
pub fn worst_reading(readings: &[ClassifiedReading]) -> Option<&ClassifiedReading> {
    readings.iter().reduce(|worst, r| {
        if r.classification.index > worst.classification.index {
            r
        } else {
            worst
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::fixtures::*;
    use crate::ingest::{Loaded, load_reader};
    use crate::ingest::monitors::monitor_schema;

    fn fixture_readings() -> Vec<ClassifiedReading> {
        let loaded: Loaded<ClassifiedReading> =
            load_reader(fixture_monitors_csv().as_bytes(), &monitor_schema())
                .expect("fixture should load");
        loaded.records
    }

    #[test]
    fn test_group_by_band_empty_input_lists_every_band() {
        let grouped = group_by_band(&[]);
        assert_eq!(grouped.len(), 5);
        assert!(grouped.values().all(|count| *count == 0));
    }

    #[test]
    fn test_count_by_pollutant() {
        let counts = count_by_pollutant(&fixture_readings());
        assert_eq!(counts.len(), 4);
        assert_eq!(counts.get("ozone"), Some(&1));
        assert_eq!(counts.get("ozone 1-hr"), Some(&1));
    }

    // --- Integration: parse → classify → group ------------------------------

    #[test]
    fn test_pipeline_fixture_band_distribution() {
        // Downtown ozone 0.062 ppm    -> 73  Moderate
        // Harbor PM2.5 12.0 µg/m³     -> 56  Moderate
        // Airport ozone 0.030 ppm     -> 27  Good
        // Valley PM10 40.0 µg/m³      -> 112 Unhealthy for sensitive groups
        let grouped = group_by_band(&fixture_readings());
        assert_eq!(grouped[&AqiBand::Good], 1);
        assert_eq!(grouped[&AqiBand::Moderate], 2);
        assert_eq!(grouped[&AqiBand::UnhealthySensitive], 1);
        assert_eq!(grouped[&AqiBand::Unhealthy], 0);
        assert_eq!(grouped[&AqiBand::VeryUnhealthy], 0);
    }

    #[test]
    fn test_worst_reading() {
        let readings = fixture_readings();
        let worst = worst_reading(&readings).expect("non-empty input");
        assert_eq!(worst.reading.site_name, "Valley");
        assert!(worst_reading(&[]).is_none());
    }
}
