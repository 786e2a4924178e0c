/// aqmon_service: air quality monitor ingestion and query service.
///
/// # Module structure
///
/// ```text
/// aqmon_service
/// ├── model       — shared data types (MonitorReading, Classification, LoadError, …)
/// ├── config      — service configuration loader (aqmon.toml + PORT)
/// ├── aqi         — AQI classifier and per-family breakpoint tables
/// ├── ingest      — one CSV pipeline driven by declared schemas
/// │   ├── schema     — schema descriptors, header resolution, typed rows
/// │   ├── monitors   — monitor rows → classified readings
/// │   ├── facilities — data-center registry rows
/// │   ├── footprint  — water-footprint rows
/// │   └── fixtures (test only) — representative CSV sources
/// ├── registry    — in-memory datasets with atomic replace-all
/// ├── query       — filtered reads + auxiliary dataset joins
/// ├── endpoint    — read-only HTTP JSON API
/// └── analysis
///     └── groupings — per-band / per-pollutant tallies
/// ```

/// Public modules
pub mod analysis;
pub mod aqi;
pub mod config;
pub mod endpoint;
pub mod ingest;
pub mod model;
pub mod query;
pub mod registry;
