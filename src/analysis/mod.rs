/// Summaries over loaded datasets.
///
/// Submodules:
/// - `groupings` — organizes classified readings by band and by pollutant.

pub mod groupings;
