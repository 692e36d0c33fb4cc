//! Recap fragment endpoints
//!
//! The legacy page wrote fragments into DOM containers by element id; these
//! endpoints serve the same fragments by section name instead.

use bytes::Bytes;
use http_body_util::Full;
use hyper::Response;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::server::AppState;

use super::{html_response, json_response, not_found_response};

/// Parse a query string into a key/value map. Values are
/// percent-decoded; malformed pairs are skipped.
fn parse_query(query: Option<&str>) -> HashMap<String, String> {
    let mut params = HashMap::new();
    let Some(query) = query else {
        return params;
    };
    for pair in query.split('&') {
        let mut parts = pair.splitn(2, '=');
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let value = urlencoding::decode(value)
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| value.to_string());
        params.insert(key.to_string(), value);
    }
    params
}

/// `GET /recap/{section}` — one rendered section fragment.
pub async fn handle_recap_section(state: Arc<AppState>, section: &str) -> Response<Full<Bytes>> {
    match state.recap.section_fragment(section).await {
        Ok(html) => html_response(html),
        Err(e) => {
            warn!(section, error = %e, "section fragment unavailable");
            not_found_response(&format!("/recap/{section}"))
        }
    }
}

/// `GET /recap` — every section fragment plus the date line, as JSON.
pub async fn handle_recap_index(state: Arc<AppState>) -> Response<Full<Bytes>> {
    let fragments = state.recap.all_fragments().await;

    let body = serde_json::json!({
        "date": state.recap.date_line(),
        "sections": fragments,
    });

    json_response(body.to_string())
}

/// `GET /table?sort=totalScore&dir=desc` — the ranking table body.
pub async fn handle_table(state: Arc<AppState>, query: Option<&str>) -> Response<Full<Bytes>> {
    let params = parse_query(query);
    let html = state
        .recap
        .table_fragment(params.get("sort").map(String::as_str), params.get("dir").map(String::as_str))
        .await;
    html_response(html)
}

/// `GET /table/missing/{rank}` — who the user at `rank` still has to
/// vouch for or review.
pub async fn handle_missing_reviews(state: Arc<AppState>, rank: &str) -> Response<Full<Bytes>> {
    let Ok(rank) = rank.parse::<u32>() else {
        return not_found_response(&format!("/table/missing/{rank}"));
    };

    match state.recap.missing_fragment(rank).await {
        Ok(html) => html_response(html),
        Err(e) => {
            warn!(rank, error = %e, "missing-reviews fragment unavailable");
            not_found_response(&format!("/table/missing/{rank}"))
        }
    }
}

/// `GET /roster/missing-ids` — roster members without a profile id.
pub async fn handle_missing_ids(state: Arc<AppState>) -> Response<Full<Bytes>> {
    html_response(state.recap.missing_ids_fragment().await)
}

/// `GET /table/search?q=name` — matching ranking entries as JSON.
pub async fn handle_search(state: Arc<AppState>, query: Option<&str>) -> Response<Full<Bytes>> {
    let params = parse_query(query);
    let q = params.get("q").map(String::as_str).unwrap_or("");
    let matches = state.recap.search_entries(q).await;

    let body = serde_json::to_string(&matches).unwrap_or_else(|_| "[]".to_string());
    json_response(body)
}
