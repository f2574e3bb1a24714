use crate::catalog::Catalog;
use crate::config::Config;
use crate::filter::SortKey;
use crate::models::FacetKind;
use crate::pagination::requested_page;
use crate::query::{Category, FacetSelection, SearchFilters};
use crate::session::{self, DiscoverSession, SearchSession};
use crate::tmdb::{TmdbApi, TmdbClient};
use crate::view::ViewState;
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
}

impl AppState {
    pub fn new(api: Arc<dyn TmdbApi>) -> Self {
        Self {
            catalog: Catalog::new(api),
        }
    }
}

pub async fn run_server(config: Config) -> Result<()> {
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    let app = build_router(AppState::new(tmdb));

    info!("Listening on {}", config.addr);
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/home", get(home))
        .route("/api/movies/:category", get(category))
        .route("/api/search", get(search))
        .route("/api/movie/:id", get(movie_detail))
        .route("/api/discover/options", get(discover_options))
        .route("/api/discover", get(discover))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn home(State(state): State<AppState>) -> Response {
    respond(session::load_landing(&state.catalog).await.into_state())
}

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<u32>,
}

async fn category(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<PageQuery>,
) -> Response {
    let Some(category) = Category::parse(&slug) else {
        warn!("Unknown movie category '{}'", slug);
        return bad_request(format!("Unknown category '{}'", slug));
    };
    let page = requested_page(params.page);
    respond(
        session::load_category(&state.catalog, category, page)
            .await
            .into_state(),
    )
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    q: Option<String>,
    page: Option<u32>,
    language: Option<String>,
    year: Option<String>,
    industry: Option<String>,
    sort: Option<String>,
}

#[derive(Serialize)]
struct SearchResponse<T: Serialize> {
    query: String,
    #[serde(flatten)]
    state: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

async fn search(State(state): State<AppState>, Query(params): Query<SearchQuery>) -> Response {
    let Some(text) = non_empty(params.q) else {
        return bad_request("No search query. Please enter a search term to find movies.");
    };
    let sort = match params.sort.as_deref().unwrap_or("").parse::<SortKey>() {
        Ok(sort) => sort,
        Err(e) => return bad_request(e.to_string()),
    };
    let year = match non_empty(params.year) {
        Some(raw) => match raw.trim().parse::<i32>() {
            Ok(y) => Some(y),
            Err(_) => return bad_request(format!("Year must be a number (got '{}')", raw)),
        },
        None => None,
    };
    let filters = SearchFilters {
        language: non_empty(params.language),
        year,
        industry: non_empty(params.industry),
    };

    let mut search = SearchSession::new(&text, filters);
    search.set_sort(sort);
    search
        .load(&state.catalog, requested_page(params.page))
        .await;

    let message = search.empty_message();
    let query = search.text().to_string();
    let state = search.into_state();
    let status = status_for(&state);
    (
        status,
        Json(SearchResponse {
            query,
            state,
            message,
        }),
    )
        .into_response()
}

async fn movie_detail(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    respond(session::load_detail(&state.catalog, id).await.into_state())
}

const MIN_RATING: f64 = 0.0;
const MAX_RATING: f64 = 10.0;

#[derive(Debug, Deserialize)]
struct DiscoverQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
    option: Option<String>,
    sort_by: Option<String>,
    min_rating: Option<f64>,
    page: Option<u32>,
}

fn facet_kind(raw: Option<&str>) -> Result<FacetKind, Response> {
    let raw = raw.unwrap_or("language");
    FacetKind::parse(raw).ok_or_else(|| bad_request(format!("Unknown discovery type '{}'", raw)))
}

async fn discover_options(
    State(state): State<AppState>,
    Query(params): Query<DiscoverQuery>,
) -> Response {
    let kind = match facet_kind(params.kind.as_deref()) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };
    let mut discover = DiscoverSession::new(kind);
    discover.load_options(&state.catalog).await;
    let (options, _) = discover.into_parts();
    respond(options)
}

async fn discover(State(state): State<AppState>, Query(params): Query<DiscoverQuery>) -> Response {
    let kind = match facet_kind(params.kind.as_deref()) {
        Ok(kind) => kind,
        Err(resp) => return resp,
    };
    let Some(code) = non_empty(params.option) else {
        return bad_request(format!("Select a {} to discover movies", kind.as_str()));
    };
    let mut selection = match FacetSelection::new(kind, &code) {
        Ok(selection) => selection,
        Err(msg) => return bad_request(msg),
    };
    if let Some(rating) = params.min_rating {
        if !rating.is_finite() || !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return bad_request(format!(
                "Minimum rating must be between {} and {} (got {})",
                MIN_RATING, MAX_RATING, rating
            ));
        }
    }
    selection.sort_by = non_empty(params.sort_by);
    selection.min_rating = params.min_rating;

    let mut discover = DiscoverSession::new(kind);
    discover
        .select(&state.catalog, selection, requested_page(params.page))
        .await;
    let (_, movies) = discover.into_parts();
    respond(movies)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn status_for<T>(state: &ViewState<T>) -> StatusCode {
    match state {
        ViewState::Ready { .. } => StatusCode::OK,
        ViewState::NotFound { .. } => StatusCode::NOT_FOUND,
        ViewState::Error { .. } => StatusCode::BAD_GATEWAY,
        ViewState::Idle | ViewState::Loading => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn respond<T: Serialize>(state: ViewState<T>) -> Response {
    (status_for(&state), Json(state)).into_response()
}

fn bad_request(message: impl Into<String>) -> Response {
    let message = message.into();
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "status": "error", "message": message })),
    )
        .into_response()
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Shutdown signal received (Ctrl+C)");
        }
        _ = terminate => {
            info!("Shutdown signal received (SIGTERM)");
        }
    }
}
