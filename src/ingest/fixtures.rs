/// Test fixtures: representative CSV sources for each dataset.
///
/// Headers match the real exports these loaders target:
///   monitors   — EPA annual concentration by monitor
///                (Latitude, Longitude, Arithmetic Mean, Local Site Name, Parameter Name, ...)
///   facilities — data-center database (Name, City, State, Lat, Long, SizeRank (numeric))
///   footprints — plant water footprint (lat, lon, water_footprint, subbasin, plant_state)
///
/// Real exports carry many more columns than the schema needs; the extra
/// ones here make sure resolution does not depend on column position.

/// Four valid monitors: two ozone, two particulate.
#[cfg(test)]
pub(crate) fn fixture_monitors_csv() -> &'static str {
    "State Code,Latitude,Longitude,Parameter Name,Arithmetic Mean,Local Site Name,Units of Measure
06,34.05,-118.25,Ozone 1-HR,0.062,Downtown,Parts per million
06,33.74,-118.27,PM2.5 - Local Conditions,12.0,Harbor,Micrograms/cubic meter (LC)
06,33.94,-118.40,Ozone,0.030,Airport,Parts per million
06,34.18,-118.45,PM10 Total 0-10um STP,40.0,Valley,Micrograms/cubic meter (25 C)
"
}

/// Two valid rows around five that each fail one way:
/// non-numeric latitude, latitude > 90, negative concentration,
/// blank concentration, truncated row.
#[cfg(test)]
pub(crate) fn fixture_monitors_with_bad_rows_csv() -> &'static str {
    "Latitude,Longitude,Arithmetic Mean,Local Site Name,Parameter Name
34.05,-118.25,0.040,Good One,Ozone
north,-118.25,0.040,Bad Latitude,Ozone
95.0,-118.25,0.040,Polar Overflow,Ozone
34.05,-118.25,-0.010,Negative,Ozone
34.05,-118.25,,Blank Mean,Ozone
34.05,-118.25
40.71,-74.00,0.075,Good Two,Ozone
"
}

/// Header without any concentration column.
#[cfg(test)]
pub(crate) fn fixture_monitors_missing_column_csv() -> &'static str {
    "Latitude,Longitude,Local Site Name,Parameter Name
34.05,-118.25,Downtown,Ozone
"
}

/// Two usable data centers and one without coordinates.
#[cfg(test)]
pub(crate) fn fixture_data_centers_csv() -> &'static str {
    "Name,Operator,City,State,Lat,Long,SizeRank (numeric)
Ashburn Campus,Example Co,Ashburn,VA,39.0438,-77.4874,1
Quincy Hall,Example Co,Quincy,WA,47.2343,-119.8526,
No Coordinates,Example Co,Nowhere,TX,,,3
"
}

/// Three usable footprint points (with fuel) and one with a blank value.
#[cfg(test)]
pub(crate) fn fixture_footprint_csv() -> &'static str {
    "plant_name,lat,lon,water_footprint,subbasin,plant_state,primary_fuel
Grand Coulee,47.9560,-118.9816,728516.30,Upper Columbia,WA,WAT
Biomass One,42.3265,-122.8756,73098.11,Rogue,OR,WDS
Gap Plant,41.0,-100.0,,Platte,NE,NG
Solar Farm,35.0,-115.0,0,Mojave,CA,PUR
"
}
