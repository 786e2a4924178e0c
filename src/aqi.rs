/// AQI classifier: pollutant concentration -> (index, severity band).
///
/// The index is a piecewise-linear interpolation between named breakpoints.
/// Each pollutant family has exactly one canonical table:
///
/// - ozone family: reference ozone table, concentrations in ppm
/// - particulate family: EPA 2024 PM2.5 table, concentrations in µg/m³
/// - anything else: the ozone table, kept as a proxy so unknown pollutants
///   still get a band
///
/// Family membership goes through `PollutantFilter::matches`, the same
/// categorization the query service filters with.

use crate::model::{AqiBand, Classification, PollutantFilter};

// ---------------------------------------------------------------------------
// Breakpoint tables
// ---------------------------------------------------------------------------

/// One interpolation segment.
///
/// A concentration `c` selects the first segment with `c <= upper`; its index
/// is `i_lo + floor(max(0, c - c_lo) / width * span)`. Concentrations that fall
/// in the gap between one segment's `upper` and the next one's `c_lo` clamp to
/// the next segment's `i_lo`, which keeps the index non-decreasing in `c`.
#[derive(Debug, Clone, Copy)]
pub struct Segment {
    pub upper: f64,
    pub c_lo: f64,
    pub width: f64,
    pub i_lo: u32,
    pub span: u32,
}

#[derive(Debug)]
pub struct BreakpointTable {
    pub name: &'static str,
    pub unit: &'static str,
    pub segments: &'static [Segment],
}

/// Ozone reference table (ppm). The last segment is open-ended: every
/// 0.01 ppm above 0.106 adds 10 index points.
pub static OZONE_TABLE: BreakpointTable = BreakpointTable {
    name: "ozone",
    unit: "ppm",
    segments: &[
        Segment { upper: 0.054, c_lo: 0.0, width: 0.054, i_lo: 0, span: 50 },
        Segment { upper: 0.070, c_lo: 0.055, width: 0.070 - 0.055, i_lo: 51, span: 49 },
        Segment { upper: 0.085, c_lo: 0.071, width: 0.085 - 0.071, i_lo: 101, span: 49 },
        Segment { upper: 0.105, c_lo: 0.086, width: 0.105 - 0.086, i_lo: 151, span: 49 },
        Segment { upper: f64::INFINITY, c_lo: 0.106, width: 0.01, i_lo: 201, span: 10 },
    ],
};

/// PM2.5 table (µg/m³, 24-hour), EPA 2024 revision. Open-ended above 125.5
/// with the Very Unhealthy slope.
pub static PARTICULATE_TABLE: BreakpointTable = BreakpointTable {
    name: "pm2.5",
    unit: "µg/m³",
    segments: &[
        Segment { upper: 9.0, c_lo: 0.0, width: 9.0, i_lo: 0, span: 50 },
        Segment { upper: 35.4, c_lo: 9.1, width: 35.4 - 9.1, i_lo: 51, span: 49 },
        Segment { upper: 55.4, c_lo: 35.5, width: 55.4 - 35.5, i_lo: 101, span: 49 },
        Segment { upper: 125.4, c_lo: 55.5, width: 125.4 - 55.5, i_lo: 151, span: 49 },
        Segment { upper: f64::INFINITY, c_lo: 125.5, width: 225.4 - 125.5, i_lo: 201, span: 99 },
    ],
};

impl BreakpointTable {
    /// Raw interpolated index, floored at 1.
    pub fn index_for(&self, concentration: f64) -> u32 {
        let c = if concentration.is_nan() { 0.0 } else { concentration };

        let segment = match self
            .segments
            .iter()
            .find(|s| c <= s.upper)
            .or_else(|| self.segments.last())
        {
            Some(s) => s,
            None => return 1,
        };

        let offset = (c - segment.c_lo).max(0.0);
        let index = segment.i_lo as f64 + (offset / segment.width * segment.span as f64).floor();

        // float -> int casts saturate, so huge concentrations stay at u32::MAX
        index.max(1.0) as u32
    }
}

// ---------------------------------------------------------------------------
// Families
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollutantFamily {
    Ozone,
    Particulate,
    Other,
}

impl PollutantFamily {
    /// Ozone wins when a kind matches both families.
    pub fn of(pollutant_kind: &str) -> Self {
        if PollutantFilter::OzoneFamily.matches(pollutant_kind) {
            PollutantFamily::Ozone
        } else if PollutantFilter::ParticulateFamily.matches(pollutant_kind) {
            PollutantFamily::Particulate
        } else {
            PollutantFamily::Other
        }
    }

    pub fn table(&self) -> &'static BreakpointTable {
        match self {
            PollutantFamily::Ozone | PollutantFamily::Other => &OZONE_TABLE,
            PollutantFamily::Particulate => &PARTICULATE_TABLE,
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Classifies a concentration for the given pollutant kind.
///
/// Deterministic and pure: the same `(pollutant_kind, concentration)` always
/// yields the same result. The band is derived from the final index only.
pub fn classify(pollutant_kind: &str, concentration: f64) -> Classification {
    let index = PollutantFamily::of(pollutant_kind).table().index_for(concentration);
    Classification {
        index,
        band: AqiBand::from_index(index),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
