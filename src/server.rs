use crate::config::AppConfig;
use crate::controller::{Frame, SymbolSeriesController};
use crate::controls::ControlEvent;
use crate::error::SymbolError;
use crate::surface::MarkerLayer;
use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use rstar::primitives::GeomWithData;
use rstar::RTree;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{info, warn};

// [lng, lat] -> marker position in the layer
type CityIndex = RTree<GeomWithData<[f64; 2], usize>>;

pub struct AppState {
    pub controller: Mutex<SymbolSeriesController<MarkerLayer>>,
    pub tree: CityIndex,
}

impl AppState {
    pub fn new(controller: SymbolSeriesController<MarkerLayer>) -> Self {
        let items = controller.surface().all().iter().enumerate()
            .map(|(i, m)| GeomWithData::new([m.lng, m.lat], i))
            .collect();
        Self {
            controller: Mutex::new(controller),
            tree: RTree::bulk_load(items),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SymbolSeriesController<MarkerLayer>> {
        // transitions complete before the guard drops; poisoning carries no partial state
        self.controller.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[derive(Deserialize)]
pub struct QueryParams {
    lat: f64,
    lon: f64,
}

#[derive(Serialize)]
pub struct QueryResponse {
    feature_id: String,
    radius: Option<f64>,
    popup: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub struct ApiError(SymbolError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            SymbolError::InvalidIndex { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("Request failed: {}", self.0);
        (status, Json(ErrorBody { error: self.0.to_string() })).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/frame", get(frame_handler))
        .route("/api/advance", post(advance_handler))
        .route("/api/retreat", post(retreat_handler))
        .route("/api/index/{index}", post(index_handler))
        .route("/api/event", post(event_handler))
        .route("/api/legend.svg", get(legend_handler))
        .route("/api/controls", get(controls_handler))
        .route("/api/query", get(query_handler))
        .with_state(state)
}

pub async fn start_server(config: AppConfig, controller: SymbolSeriesController<MarkerLayer>) -> Result<()> {
    info!("Building spatial index for {} markers...", controller.surface().all().len());
    let state = Arc::new(AppState::new(controller));

    let addr = SocketAddr::from(([127, 0, 0, 1], config.server.port));
    info!("Starting server on http://{}", addr);

    let app = router(state)
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn frame_handler(State(state): State<Arc<AppState>>) -> Json<Frame> {
    Json(state.lock().frame())
}

async fn advance_handler(State(state): State<Arc<AppState>>) -> Json<Frame> {
    let mut controller = state.lock();
    controller.advance();
    Json(controller.frame())
}

async fn retreat_handler(State(state): State<Arc<AppState>>) -> Json<Frame> {
    let mut controller = state.lock();
    controller.retreat();
    Json(controller.frame())
}

async fn index_handler(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
) -> Result<Json<Frame>, ApiError> {
    let mut controller = state.lock();
    controller.set_index(index).map_err(ApiError)?;
    Ok(Json(controller.frame()))
}

async fn event_handler(
    State(state): State<Arc<AppState>>,
    Json(event): Json<ControlEvent>,
) -> Result<Json<Frame>, ApiError> {
    let mut controller = state.lock();
    controller.handle(event).map_err(ApiError)?;
    Ok(Json(controller.frame()))
}

async fn legend_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let svg = state.lock().legend().render_svg();
    ([(header::CONTENT_TYPE, "image/svg+xml")], svg)
}

async fn controls_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let html = state.lock().render_controls();
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], html)
}

async fn query_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QueryParams>,
) -> Json<Option<QueryResponse>> {
    let Some(nearest) = state.tree.nearest_neighbor(&[params.lon, params.lat]) else {
        return Json(None);
    };

    let controller = state.lock();
    let response = controller.surface().all().get(nearest.data).map(|marker| QueryResponse {
        feature_id: marker.feature_id.clone(),
        radius: marker.radius,
        popup: marker.popup.html.clone(),
    });
    Json(response)
}
