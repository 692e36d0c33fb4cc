//! HTTP route handlers

pub mod health;
pub mod recap;

pub use health::{health_check, version_info};
pub use recap::{
    handle_missing_ids, handle_missing_reviews, handle_recap_index, handle_recap_section,
    handle_search, handle_table,
};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};

/// HTML fragment response.
pub fn html_response(body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// JSON response.
pub fn json_response(body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// 404 with a JSON error body.
pub fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": "not found", "path": path }).to_string();
    Response::builder()
        .status(StatusCode::NOT_FOUND)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// CORS preflight response.
pub fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Full::new(Bytes::new()))
        .unwrap()
}
