//! HTTP request handlers

use super::state::AppState;
use crate::page::{BufferRegion, SearchBinding};
use crate::search::SuggestOutcome;
use axum::{
    extract::{ConnectInfo, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

/// The submitted query, or the response to send instead
fn submitted<'a>(
    state: &'a AppState,
    params: &'a HashMap<String, String>,
) -> Result<(&'a SearchBinding, &'a str), Response> {
    let Some(binding) = state.binding.as_deref() else {
        return Err((StatusCode::NOT_FOUND, "Search is not available on this site").into_response());
    };
    let raw = params
        .get(&binding.input_name)
        .map(String::as_str)
        .unwrap_or_default();
    Ok((binding, raw))
}

/// Search form submission: the bound page with the search view mounted
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let (binding, raw) = match submitted(&state, &params) {
        Ok(found) => found,
        Err(response) => return response,
    };

    if raw.trim().is_empty() {
        return Redirect::to(&state.settings.site.home_url).into_response();
    }

    let content = Arc::new(BufferRegion::new());
    let controller = state.controller(content.clone(), Arc::new(BufferRegion::new()));
    let outcome = controller.search(raw).await;
    tracing::debug!("Search outcome: {:?}", outcome);

    Html(binding.shell.wrap(&content.content())).into_response()
}

/// Suggestion box fragment for partially typed input.
///
/// Requests from one client share a generation, so while typing only the
/// latest request reaches the engine; older ones answer 204.
pub async fn suggest(
    State(state): State<AppState>,
    connect: Option<ConnectInfo<SocketAddr>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let raw = match submitted(&state, &params) {
        Ok((_, raw)) => raw,
        Err(response) => return response,
    };

    // without connection info (tests, embedding) all requests share one client
    let client = connect
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default();
    let generation = state.suggestion_generation(&client).await;

    let suggestions = Arc::new(BufferRegion::new());
    let controller = state
        .controller(Arc::new(BufferRegion::new()), suggestions.clone())
        .with_suggestion_generation(generation);

    match controller.suggest(raw).await {
        SuggestOutcome::Superseded => StatusCode::NO_CONTENT.into_response(),
        _ => Html(suggestions.content()).into_response(),
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "instance": state.instance_name(),
        "search_enabled": state.binding.is_some(),
        "engine": format!("{:?}", state.loader.status()),
    }))
}

/// Stats handler
pub async fn stats(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.metrics.snapshot())
}
