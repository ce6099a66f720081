use std::{collections::HashMap, net::SocketAddr, path::Path, sync::Arc};

use anyhow::Context;
use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use scoring::{LogisticScorer, Scorer, UnavailableScorer};
use shared::{
    domain::ApplicationInput,
    error::{ApiError, ErrorCode},
    protocol::{RatioQuery, RatioResponse, ScoreResponse},
};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod controller;
mod form;
mod session;
mod view;

use app_state::AppState;
use config::load_settings;
use controller::{Command, Outcome};
use session::{session_cookie, session_id_from_headers, SessionState, SessionStore};
use view::PageView;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings();
    let state = AppState {
        scorer: build_scorer(settings.model_path.as_deref()),
        sessions: SessionStore::new(settings.session_ttl()),
        page_title: settings.page_title.clone(),
    };
    let app = build_router(Arc::new(state), settings.max_body_bytes);

    let addr: SocketAddr = settings
        .server_bind
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.server_bind))?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Loads the configured model. A broken artifact does not stop the service;
/// every submission reports the load failure instead.
fn build_scorer(model_path: Option<&str>) -> Arc<dyn Scorer> {
    let loaded = match model_path {
        Some(path) => LogisticScorer::from_path(Path::new(path)),
        None => LogisticScorer::builtin(),
    };
    match loaded {
        Ok(scorer) => {
            info!(model = model_path.unwrap_or("built-in"), "scoring model loaded");
            Arc::new(scorer)
        }
        Err(error) => {
            error!(
                model = model_path.unwrap_or("built-in"),
                %error,
                "failed to load scoring model; predictions will report the failure"
            );
            Arc::new(UnavailableScorer::new(error.to_string()))
        }
    }
}

fn build_router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index).post(submit_form))
        .route("/healthz", get(healthz))
        .route(api::ratio_route(), get(http_ratio))
        .route(api::score_route(), post(http_score))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    match state.sessions.lookup(session_id_from_headers(&headers)).await {
        Some((session_id, session)) => {
            let session = session.lock().await;
            let page = PageView::build(&state.page_title, &session, &Outcome::Idle);
            page_response(Some(session_id), page)
        }
        None => {
            let page = PageView::build(&state.page_title, &SessionState::new(), &Outcome::Idle);
            page_response(None, page)
        }
    }
}

async fn submit_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Result<Response, (StatusCode, Json<ApiError>)> {
    let command = form
        .get("action")
        .map(String::as_str)
        .unwrap_or_default()
        .parse::<Command>()
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new(ErrorCode::Validation, e)),
            )
        })?;

    let (session_id, session) = state
        .sessions
        .checkout(session_id_from_headers(&headers))
        .await;
    let mut session = session.lock().await;
    let outcome = controller::apply(&mut session, command, &form, state.scorer.as_ref());
    let page = PageView::build(&state.page_title, &session, &outcome);
    Ok(page_response(Some(session_id), page))
}

fn page_response(session_id: Option<uuid::Uuid>, page: PageView) -> Response {
    let mut headers = HeaderMap::new();
    if let Some(session_id) = session_id {
        headers.insert(header::SET_COOKIE, session_cookie(session_id));
    }
    (StatusCode::OK, headers, Html(page.render())).into_response()
}

async fn http_ratio(Query(q): Query<RatioQuery>) -> Json<RatioResponse> {
    Json(q.into())
}

async fn http_score(
    State(state): State<Arc<AppState>>,
    Json(input): Json<ApplicationInput>,
) -> Result<Json<ScoreResponse>, (StatusCode, Json<ApiError>)> {
    api::score_application(state.scorer.as_ref(), &input)
        .map(Json)
        .map_err(|e| (api::status_for(e.code), Json(e)))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
