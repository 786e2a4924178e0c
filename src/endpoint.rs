/// HTTP endpoint for map and dashboard clients
///
/// Read-only JSON API over the query service. Data problems never turn into
/// error statuses: a dataset that failed to load is served as an empty array.
///
/// Endpoints:
/// - GET /api/monitors?pollutant={all|ozone|pm} - Classified monitors + data centers
/// - GET /api/water - Water footprint points
/// - GET /api/water_fuel - Water footprint per primary fuel
/// - GET /test - Liveness probe (plain text)
/// - POST /api/reload - Re-run all loaders (only when server.allow_reload is set)

use std::io::Cursor;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use threadpool::ThreadPool;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::model::{ClassifiedReading, FacilityRecord, FootprintRecord, PollutantFilter};
use crate::query::QueryService;

// ---------------------------------------------------------------------------
// Response Types
// ---------------------------------------------------------------------------

/// `/api/monitors` response
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitorsResponse {
    pub timestamp: String,
    pub monitors: Vec<MonitorData>,
    pub data_centers: Vec<DataCenterData>,
}

/// One classified monitor as drawn on the map
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitorData {
    pub lat: f64,
    pub lon: f64,
    pub aqi: u32,
    pub city: String,
    pub color: String,
    pub pollutant: String,
}

/// Data-center marker. Field names match the facility export's headers,
/// which is what the map client keys on.
#[derive(Debug, Serialize, Deserialize)]
pub struct DataCenterData {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "SizeRank")]
    pub size_rank: String,
}

/// `/api/water` response
#[derive(Debug, Serialize, Deserialize)]
pub struct WaterResponse {
    pub timestamp: String,
    pub points: Vec<WaterPointData>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WaterPointData {
    pub lat: f64,
    pub lon: f64,
    pub water_footprint: f64,
    pub subbasin: String,
    pub state: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

fn monitor_to_data(reading: &ClassifiedReading) -> MonitorData {
    MonitorData {
        lat: reading.reading.latitude,
        lon: reading.reading.longitude,
        aqi: reading.classification.index,
        city: reading.reading.site_name.clone(),
        color: reading.classification.band.color().to_string(),
        pollutant: reading.reading.pollutant_kind.clone(),
    }
}

fn facility_to_data(facility: &FacilityRecord) -> DataCenterData {
    DataCenterData {
        name: facility.name.clone(),
        city: facility.city.clone(),
        state: facility.region.clone(),
        lat: facility.latitude,
        lon: facility.longitude,
        size_rank: facility.size_rank.clone().unwrap_or_default(),
    }
}

fn footprint_to_data(point: &FootprintRecord) -> WaterPointData {
    WaterPointData {
        lat: point.latitude,
        lon: point.longitude,
        water_footprint: point.footprint_value,
        subbasin: point.subbasin.clone(),
        state: point.region.clone(),
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Json(serde_json::Value),
    Text(String),
}

/// Transport-independent response, converted to a tiny_http response at the edge.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Body,
}

impl ApiResponse {
    fn json(status: u16, value: serde_json::Value) -> Self {
        Self { status, body: Body::Json(value) }
    }

    fn ok<T: Serialize>(payload: &T) -> Self {
        match serde_json::to_value(payload) {
            Ok(value) => Self::json(200, value),
            Err(e) => {
                error!("Failed to serialize response: {}", e);
                Self::json(500, serde_json::json!({ "error": "serialization failed" }))
            }
        }
    }
}

/// Decodes one form-encoded query component (`+` is a space).
/// Escapes that do not decode to UTF-8 are left as written.
fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}

/// Returns the decoded value of `key` in a raw query string, if present.
fn query_param(query: &str, key: &str) -> Option<String> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(k, _)| decode_component(k) == key)
        .map(|(_, v)| decode_component(v))
}

/// Routes one request. `allow_reload` gates the admin reload route.
pub fn route(service: &QueryService, method: &Method, url: &str, allow_reload: bool) -> ApiResponse {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));

    match (method, path) {
        (Method::Get, "/api/monitors") => {
            let filter = PollutantFilter::from_param(query_param(query, "pollutant").as_deref());
            handle_monitors(service, filter)
        }
        (Method::Get, "/api/water") => handle_water(service),
        (Method::Get, "/api/water_fuel") => ApiResponse::ok(&service.water_by_fuel()),
        (Method::Get, "/test") => ApiResponse {
            status: 200,
            body: Body::Text("aqmon_service is working!".to_string()),
        },
        (Method::Post, "/api/reload") if allow_reload => handle_reload(service),
        (_, "/api/monitors" | "/api/water" | "/api/water_fuel" | "/test") => ApiResponse::json(
            405,
            serde_json::json!({ "error": "Method not allowed", "allowed": ["GET"] }),
        ),
        _ => ApiResponse::json(
            404,
            serde_json::json!({
                "error": "Not found",
                "available_endpoints": ["/api/monitors", "/api/water", "/api/water_fuel", "/test"]
            }),
        ),
    }
}

/// Handle /api/monitors
fn handle_monitors(service: &QueryService, filter: PollutantFilter) -> ApiResponse {
    let (readings, facilities) = service.query_with_facilities(filter);
    ApiResponse::ok(&MonitorsResponse {
        timestamp: timestamp(),
        monitors: readings.iter().map(monitor_to_data).collect(),
        data_centers: facilities.iter().map(facility_to_data).collect(),
    })
}

/// Handle /api/water
fn handle_water(service: &QueryService) -> ApiResponse {
    ApiResponse::ok(&WaterResponse {
        timestamp: timestamp(),
        points: service.footprints().iter().map(footprint_to_data).collect(),
    })
}

/// Handle POST /api/reload
fn handle_reload(service: &QueryService) -> ApiResponse {
    info!("Reload requested");
    let reports = service.load_all();
    ApiResponse::ok(&serde_json::json!({
        "timestamp": timestamp(),
        "datasets": reports,
    }))
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port. Blocks for the life of
/// the server; requests are handled on a pool of `workers` threads.
pub fn start_endpoint_server(
    port: u16,
    service: Arc<QueryService>,
    workers: usize,
    allow_reload: bool,
) -> Result<(), String> {
    let server = Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server on port {}: {}", port, e))?;

    info!("HTTP endpoint listening on http://0.0.0.0:{}", port);
    info!("   GET /api/monitors?pollutant={{all|ozone|pm}}");
    info!("   GET /api/water");
    info!("   GET /api/water_fuel");
    info!("   GET /test");
    if allow_reload {
        info!("   POST /api/reload");
    }

    let pool = ThreadPool::new(workers.max(1));
    for request in server.incoming_requests() {
        let service = Arc::clone(&service);
        pool.execute(move || handle_request(request, &service, allow_reload));
    }

    pool.join();
    Ok(())
}

fn handle_request(request: Request, service: &QueryService, allow_reload: bool) {
    debug!("{} {}", request.method(), request.url());
    let response = route(service, request.method(), request.url(), allow_reload);
    if let Err(e) = request.respond(create_response(response)) {
        warn!("Failed to send response: {}", e);
    }
}

/// Create HTTP response with JSON or plain-text body
fn create_response(response: ApiResponse) -> Response<Cursor<Vec<u8>>> {
    let (body, content_type) = match response.body {
        Body::Json(json) => (format!("{:#}", json), &b"application/json"[..]),
        Body::Text(text) => (text, &b"text/plain; charset=utf-8"[..]),
    };

    let mut http = Response::from_data(body.into_bytes())
        .with_status_code(StatusCode::from(response.status));
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], content_type) {
        http = http.with_header(header);
    }
    if let Ok(header) = Header::from_bytes(&b"Access-Control-Allow-Origin"[..], &b"*"[..]) {
        http = http.with_header(header);
    }
    http
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
