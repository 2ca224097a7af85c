use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::{
    service_names::ServiceNameTable,
    services::ServiceRecordTable,
    table::{SortOrder, TabularModel},
    types::StateIcon,
};

#[derive(Clone)]
pub struct AppState {
    inner: Arc<RwLock<Tables>>, // both models behind one lock
}

#[derive(Debug)]
struct Tables {
    services: ServiceRecordTable,
    names: ServiceNameTable,
}

impl AppState {
    pub fn new(services: ServiceRecordTable, names: ServiceNameTable) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Tables { services, names })),
        }
    }
}

/// Rendered view of a table, as the hosting view would draw it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<RowView>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowView {
    pub cells: Vec<String>,
    /// Icon keys per column, `None` where the cell has no decoration.
    pub decorations: Vec<Option<StateIcon>>,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub column: usize,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LookupResponse {
    pub row: usize,
}

/// Render any model into its serializable view.
pub fn render<M: TabularModel + ?Sized>(model: &M) -> TableView {
    let columns = model.column_count();
    let rows = model
        .rows()
        .into_iter()
        .enumerate()
        .map(|(row, cells)| RowView {
            cells,
            decorations: (0..columns).map(|col| model.decoration(row, col)).collect(),
        })
        .collect();
    TableView {
        headers: model.headers(),
        rows,
    }
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/services", get(get_services))
        .route("/services/sort", post(post_sort_services))
        .route("/service-names", get(get_names))
        .route("/service-names/sort", post(post_sort_names))
        .route("/service-names/lookup", get(get_lookup))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
}

pub async fn spawn_server(bind: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!(%bind, "serving service tables");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn get_services(State(app): State<AppState>) -> impl IntoResponse {
    let t = app.inner.read().await;
    (StatusCode::OK, Json(render(&t.services)))
}

async fn post_sort_services(
    State(app): State<AppState>,
    Json(req): Json<SortRequest>,
) -> impl IntoResponse {
    let mut t = app.inner.write().await;
    t.services.sort_by(req.column, req.order);
    (StatusCode::OK, Json(render(&t.services)))
}

async fn get_names(State(app): State<AppState>) -> impl IntoResponse {
    let t = app.inner.read().await;
    (StatusCode::OK, Json(render(&t.names)))
}

async fn post_sort_names(
    State(app): State<AppState>,
    Json(req): Json<SortRequest>,
) -> impl IntoResponse {
    let mut t = app.inner.write().await;
    t.names.sort_by(req.column, req.order);
    (StatusCode::OK, Json(render(&t.names)))
}

async fn get_lookup(State(app): State<AppState>, Query(q): Query<LookupQuery>) -> impl IntoResponse {
    let t = app.inner.read().await;
    match t.names.row_for_name(&q.name) {
        Some(row) => (StatusCode::OK, Json(LookupResponse { row })).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
