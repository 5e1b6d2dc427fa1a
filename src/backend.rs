use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::{
    sync::atomic::{AtomicU64, Ordering as AtomicOrdering},
    sync::Arc,
    time::{Instant, SystemTime, UNIX_EPOCH},
};
use tower_http::services::{ServeDir, ServeFile};

use crate::profile;
use crate::timeline::{filtered, Category, CategoryFilter, TimelineEntry};

const DEFAULT_TIMELINE_CACHE_MAX_AGE_SECONDS: u64 = 300;
const TIMELINE_CACHE_MAX_AGE_SECONDS_BOUNDS: (u64, u64) = (1, 86_400);
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;
const REQUEST_ID_HEADER: &str = "x-request-id";

static REQUEST_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum LogLevel {
    Debug,
    Info,
}

impl LogLevel {
    fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }
}

#[derive(Clone)]
struct RuntimeConfig {
    timeline_cache_max_age_seconds: u64,
    log_level: LogLevel,
}

impl RuntimeConfig {
    fn from_env() -> Self {
        Self {
            timeline_cache_max_age_seconds: parse_env_u64_with_bounds(
                "TIMELINE_CACHE_MAX_AGE_SECONDS",
                DEFAULT_TIMELINE_CACHE_MAX_AGE_SECONDS,
                TIMELINE_CACHE_MAX_AGE_SECONDS_BOUNDS,
            ),
            log_level: parse_log_level("LOG_LEVEL", DEFAULT_LOG_LEVEL),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    entries: Arc<Vec<TimelineEntry>>,
    config: RuntimeConfig,
}

#[derive(Deserialize)]
struct TimelineQuery {
    category: Option<String>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct TimelinePayload {
    ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    count: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    entries: Vec<TimelineEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl TimelinePayload {
    fn listing(entries: Vec<TimelineEntry>) -> Self {
        Self {
            ok: true,
            count: Some(entries.len()),
            entries,
            error: None,
        }
    }

    fn error(message: &str) -> Self {
        Self {
            ok: false,
            count: None,
            entries: Vec::new(),
            error: Some(message.to_string()),
        }
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);
    let bind_address = format!("0.0.0.0:{port}");

    let state = AppState {
        entries: Arc::new(profile::timeline_entries()),
        config: RuntimeConfig::from_env(),
    };

    let static_service = ServeDir::new("dist").not_found_service(ServeFile::new("dist/index.html"));

    let app = Router::new()
        .route("/api/timeline", get(get_timeline))
        .fallback_service(static_service)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    println!("server listening on http://127.0.0.1:{port}");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn get_timeline(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<TimelineQuery>,
) -> impl IntoResponse {
    let request_started_at = Instant::now();
    let request_id = resolve_request_id(&headers);

    log_event(
        &state.config,
        LogLevel::Info,
        "timeline_request_start",
        serde_json::json!({
            "request_id": request_id.as_str(),
            "method": method.as_str(),
            "path": uri.path(),
            "category": query.category.as_deref(),
        }),
    );

    let filter = match filter_from_query(query.category.as_deref()) {
        Ok(filter) => filter,
        Err(error_message) => {
            log_event(
                &state.config,
                LogLevel::Info,
                "timeline_request_failed",
                serde_json::json!({
                    "request_id": request_id.as_str(),
                    "error_class": "unknown_category",
                    "message": error_message,
                    "duration_ms": request_started_at.elapsed().as_millis(),
                }),
            );
            return json_response(
                StatusCode::BAD_REQUEST,
                TimelinePayload::error(error_message),
                cache_control("no-store"),
                &request_id,
            );
        }
    };

    let entries: Vec<TimelineEntry> = filtered(&state.entries, filter)
        .into_iter()
        .cloned()
        .collect();
    let payload = TimelinePayload::listing(entries);

    log_event(
        &state.config,
        LogLevel::Info,
        "timeline_request_complete",
        serde_json::json!({
            "request_id": request_id.as_str(),
            "status": StatusCode::OK.as_u16(),
            "filter": filter.label(),
            "count": payload.count,
            "duration_ms": request_started_at.elapsed().as_millis(),
        }),
    );

    json_response(
        StatusCode::OK,
        payload,
        cache_control(&format!(
            "public, max-age={}",
            state.config.timeline_cache_max_age_seconds
        )),
        &request_id,
    )
}

fn filter_from_query(category: Option<&str>) -> Result<CategoryFilter, &'static str> {
    let Some(token) = category else {
        return Ok(CategoryFilter::All);
    };

    Category::from_token(token)
        .map(CategoryFilter::Only)
        .ok_or("unknown category")
}

fn json_response(
    status: StatusCode,
    payload: TimelinePayload,
    cache_control: HeaderValue,
    request_id: &str,
) -> axum::response::Response {
    let mut headers = HeaderMap::new();
    headers.insert(header::CACHE_CONTROL, cache_control);
    headers.insert(header::VARY, HeaderValue::from_static("Accept-Encoding"));

    if let Ok(request_id_header) = HeaderValue::from_str(request_id) {
        headers.insert(REQUEST_ID_HEADER, request_id_header);
    }

    (status, headers, Json(payload)).into_response()
}

fn cache_control(value: &str) -> HeaderValue {
    HeaderValue::from_str(value).unwrap_or_else(|_| HeaderValue::from_static("no-store"))
}

fn parse_env_u64_with_bounds(name: &str, default: u64, bounds: (u64, u64)) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| (bounds.0..=bounds.1).contains(value))
        .unwrap_or(default)
}

fn parse_env_non_empty_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_log_level(name: &str, default: LogLevel) -> LogLevel {
    match parse_env_non_empty_string(name)
        .unwrap_or_else(|| default.as_str().to_string())
        .to_ascii_lowercase()
        .as_str()
    {
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        _ => default,
    }
}

fn now_unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_secs())
        .unwrap_or(0)
}

fn now_unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis())
        .unwrap_or(0)
}

fn generate_request_id() -> String {
    let counter = REQUEST_ID_COUNTER.fetch_add(1, AtomicOrdering::Relaxed);
    format!("req-{}-{counter}", now_unix_millis())
}

fn resolve_request_id(headers: &HeaderMap) -> String {
    headers
        .get(REQUEST_ID_HEADER)
        .and_then(|raw| raw.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(generate_request_id)
}

fn log_event(config: &RuntimeConfig, level: LogLevel, event: &str, fields: serde_json::Value) {
    if level < config.log_level {
        return;
    }

    let mut payload = serde_json::Map::new();
    payload.insert(
        "ts".to_string(),
        serde_json::Value::Number(serde_json::Number::from(now_unix_seconds())),
    );
    payload.insert(
        "level".to_string(),
        serde_json::Value::String(level.as_str().to_string()),
    );
    payload.insert(
        "event".to_string(),
        serde_json::Value::String(event.to_string()),
    );

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    println!("{}", serde_json::Value::Object(payload));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_category_query_means_all() {
        assert_eq!(filter_from_query(None), Ok(CategoryFilter::All));
    }

    #[test]
    fn known_category_tokens_parse() {
        assert_eq!(
            filter_from_query(Some("work")),
            Ok(CategoryFilter::Only(Category::Work))
        );
        assert_eq!(
            filter_from_query(Some("externalRepo")),
            Ok(CategoryFilter::Only(Category::ExternalRepo))
        );
        assert_eq!(
            filter_from_query(Some("modelHub")),
            Ok(CategoryFilter::Only(Category::ModelHub))
        );
    }

    #[test]
    fn unknown_category_token_is_rejected() {
        assert_eq!(filter_from_query(Some("hobbies")), Err("unknown category"));
        assert_eq!(filter_from_query(Some("Work")), Err("unknown category"));
    }

    #[test]
    fn listing_payload_serializes_camel_case() {
        let payload = TimelinePayload::listing(profile::timeline_entries());
        let serialized = serde_json::to_value(&payload).expect("payload serializes");

        assert_eq!(serialized["ok"], true);
        assert_eq!(
            serialized["count"].as_u64().expect("count present") as usize,
            profile::timeline_entries().len()
        );
        assert!(serialized.get("error").is_none());

        let first = &serialized["entries"][0];
        assert!(first.get("organization").is_some());
        assert!(first.get("category").is_some());
    }

    #[test]
    fn error_payload_skips_entries() {
        let serialized =
            serde_json::to_value(TimelinePayload::error("unknown category")).expect("serializes");

        assert_eq!(serialized["ok"], false);
        assert_eq!(serialized["error"], "unknown category");
        assert!(serialized.get("entries").is_none());
        assert!(serialized.get("count").is_none());
    }

    #[test]
    fn env_values_outside_bounds_fall_back_to_default() {
        std::env::set_var("TIMELINE_CACHE_TEST_BOUNDS", "0");
        assert_eq!(
            parse_env_u64_with_bounds("TIMELINE_CACHE_TEST_BOUNDS", 300, (1, 86_400)),
            300
        );

        std::env::set_var("TIMELINE_CACHE_TEST_BOUNDS", "600");
        assert_eq!(
            parse_env_u64_with_bounds("TIMELINE_CACHE_TEST_BOUNDS", 300, (1, 86_400)),
            600
        );
        std::env::remove_var("TIMELINE_CACHE_TEST_BOUNDS");
    }

    #[test]
    fn provided_request_id_is_echoed() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("req-abc"));

        assert_eq!(resolve_request_id(&headers), "req-abc");
    }

    #[test]
    fn blank_request_id_is_replaced() {
        let mut headers = HeaderMap::new();
        headers.insert(REQUEST_ID_HEADER, HeaderValue::from_static("   "));

        let resolved = resolve_request_id(&headers);
        assert!(resolved.starts_with("req-"));
        assert_ne!(resolved.trim(), "");
    }

    #[test]
    fn debug_is_gated_below_info() {
        assert!(LogLevel::Debug < LogLevel::Info);
    }

    #[test]
    fn cache_control_falls_back_to_no_store() {
        assert_eq!(cache_control("bad\nvalue"), HeaderValue::from_static("no-store"));
        assert_eq!(
            cache_control("public, max-age=300"),
            HeaderValue::from_static("public, max-age=300")
        );
    }
}
