// Copyright (C) 2026 Rollcall Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use axum::{
    Json, Router,
    extract::{Query, State as AxumState},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use clap::Parser;
use rollcall::{
    CoreError, RefreshToken, SnapshotStore, ViewQuery, VisibleRow, aggregate_forest,
};
use rollcall_client::{AttendanceFetch, BackendClient, BackendConfig, ClientError};
use rollcall_domain::{DomainError, FilterStatus, ReportingPeriod};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Rollcall Server - serves aggregated attendance rows to the renderer.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Base URL of the attendance backend.
    #[arg(short, long, default_value = "http://localhost:8080/")]
    backend_url: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Per-request timeout for backend fetches, in seconds.
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,
}

/// Application state shared across handlers.
///
/// The snapshot store is wrapped in a Mutex to allow safe concurrent
/// access; backend fetches run outside the lock so a slow fetch never
/// blocks row reads.
#[derive(Clone)]
struct AppState {
    /// The latest applied attendance snapshot.
    store: Arc<Mutex<SnapshotStore>>,
    /// Client for the attendance backend.
    client: BackendClient,
}

/// Query parameters for the rows endpoint.
#[derive(Debug, Deserialize)]
struct RowsQuery {
    /// Free-text search term.
    #[serde(default)]
    search: String,
    /// Status filter wire string (ALL, ONLINE, OVERTIME, MISSING).
    status: Option<String>,
}

/// API response for the rows endpoint.
#[derive(Debug, Clone, Serialize)]
struct RowsResponse {
    /// Whether search/status filtering is in effect.
    search_active: bool,
    /// Number of rendered rows.
    row_count: usize,
    /// The rendered rows, in paint order.
    rows: Vec<VisibleRow>,
}

/// API request to refresh the snapshot for a reporting period.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct RefreshRequest {
    /// The reporting year (e.g., 2026).
    year: u16,
    /// The reporting month (1-12).
    month: u8,
    /// Optional department filter.
    #[serde(skip_serializing_if = "Option::is_none")]
    department: Option<String>,
}

/// API request to toggle a node's expansion state.
#[derive(Debug, Clone, Deserialize, Serialize)]
struct ToggleRequest {
    /// The id of the node to toggle.
    node_id: String,
}

/// API response for a toggle operation.
#[derive(Debug, Clone, Serialize)]
struct ToggleResponse {
    /// The toggled node id.
    node_id: String,
    /// The new expansion state.
    expanded: bool,
}

/// API response describing the current snapshot.
#[derive(Debug, Clone, Serialize)]
struct SnapshotResponse {
    /// The newest refresh generation handed out.
    generation: u64,
    /// The applied reporting period, as `YYYY-MM`.
    period: Option<String>,
    /// The applied department filter.
    department: Option<String>,
    /// Whether a statistics response has been applied yet.
    stats_loaded: bool,
    /// Number of statistics records in the snapshot.
    stat_count: usize,
    /// Number of stats-bearing employees in the merged tree.
    employee_count: u32,
    /// When the snapshot was applied (RFC 3339), if ever.
    fetched_at: Option<String>,
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Error message.
    message: String,
}

/// HTTP error wrapper that implements `IntoResponse`.
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            message: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<DomainError> for HttpError {
    fn from(err: DomainError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: err.to_string(),
        }
    }
}

impl From<CoreError> for HttpError {
    fn from(err: CoreError) -> Self {
        let status: StatusCode = match err {
            CoreError::StaleGeneration { .. } => StatusCode::CONFLICT,
            CoreError::UnknownNode { .. } => StatusCode::NOT_FOUND,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl From<ClientError> for HttpError {
    fn from(err: ClientError) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }
}

/// Handles GET /rows: computes the rendered attendance rows.
async fn handle_get_rows(
    AxumState(state): AxumState<AppState>,
    Query(params): Query<RowsQuery>,
) -> Result<Json<RowsResponse>, HttpError> {
    let status: FilterStatus = match params.status.as_deref() {
        Some(value) => FilterStatus::parse(value)?,
        None => FilterStatus::All,
    };
    let query: ViewQuery = ViewQuery::new(params.search, status);

    let store = state.store.lock().await;
    let rows: Vec<VisibleRow> = store.visible_rows(&query);
    drop(store);

    Ok(Json(RowsResponse {
        search_active: query.is_active(),
        row_count: rows.len(),
        rows,
    }))
}

/// Handles POST /refresh: fetches both backend endpoints and applies the
/// result under the generation guard.
async fn handle_refresh(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<SnapshotResponse>, HttpError> {
    let period: ReportingPeriod = ReportingPeriod::new(request.year, request.month)?;

    // Take the token under the lock, then fetch without holding it so a
    // newer refresh can supersede this one mid-flight.
    let token: RefreshToken = {
        let mut store = state.store.lock().await;
        store.begin_refresh(period, request.department.clone())
    };
    info!(
        period = %period,
        generation = token.generation(),
        "refreshing attendance snapshot"
    );

    let fetch: AttendanceFetch = state
        .client
        .fetch_attendance(period, request.department.as_deref())
        .await?;

    let mut store = state.store.lock().await;
    if let Err(err) = store.apply(&token, &fetch.stats, &fetch.hierarchy) {
        warn!(generation = token.generation(), "{err}");
        return Err(err.into());
    }
    let response: SnapshotResponse = snapshot_response(&store);
    drop(store);

    Ok(Json(response))
}

/// Handles POST /rows/toggle: flips a node's expansion state.
async fn handle_toggle(
    AxumState(state): AxumState<AppState>,
    Json(request): Json<ToggleRequest>,
) -> Result<Json<ToggleResponse>, HttpError> {
    let mut store = state.store.lock().await;
    let expanded: bool = store.toggle_expanded(&request.node_id)?;
    drop(store);

    Ok(Json(ToggleResponse {
        node_id: request.node_id,
        expanded,
    }))
}

/// Handles GET /snapshot: reports snapshot metadata.
async fn handle_get_snapshot(
    AxumState(state): AxumState<AppState>,
) -> Result<Json<SnapshotResponse>, HttpError> {
    let store = state.store.lock().await;
    let response: SnapshotResponse = snapshot_response(&store);
    drop(store);

    Ok(Json(response))
}

fn snapshot_response(store: &SnapshotStore) -> SnapshotResponse {
    SnapshotResponse {
        generation: store.latest_generation(),
        period: store.period().map(|p| p.to_string()),
        department: store.department().map(String::from),
        stats_loaded: store.stats_loaded(),
        stat_count: store.stat_count(),
        employee_count: aggregate_forest(store.forest()).count,
        fetched_at: store
            .fetched_at()
            .and_then(|at: OffsetDateTime| at.format(&Rfc3339).ok()),
    }
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/rows", get(handle_get_rows))
        .route("/rows/toggle", post(handle_toggle))
        .route("/refresh", post(handle_refresh))
        .route("/snapshot", get(handle_get_snapshot))
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Rollcall Server");

    let mut config: BackendConfig = BackendConfig::new(&args.backend_url);
    config.timeout_secs = args.timeout_secs;
    let client: BackendClient = BackendClient::new(&config)?;
    info!("Using attendance backend at: {}", args.backend_url);

    let app_state: AppState = AppState {
        store: Arc::new(Mutex::new(SnapshotStore::new())),
        client,
    };

    // Build router
    let app: Router = build_router(app_state);

    // Bind to address
    let addr: std::net::SocketAddr = format!("127.0.0.1:{}", args.port).parse()?;
    info!("Server listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode as HttpStatusCode},
    };
    use rollcall_domain::{HierarchyNode, NodeKind, StatRecord};
    use tower::ServiceExt;

    /// Helper to create test app state with an empty snapshot store.
    fn create_test_app_state() -> AppState {
        let client: BackendClient =
            BackendClient::new(&BackendConfig::new("http://localhost:1/"))
                .expect("Failed to create backend client");
        AppState {
            store: Arc::new(Mutex::new(SnapshotStore::new())),
            client,
        }
    }

    fn test_stat(employee_id: &str, name: &str, overtime: i64) -> StatRecord {
        StatRecord {
            employee_id: employee_id.to_string(),
            employee_name: name.to_string(),
            department: None,
            job_title: None,
            is_online: false,
            total_worked: None,
            total_overtime: Some(overtime),
            total_missing: None,
            monthly_net_balance: None,
            monthly_required: None,
            today_normal: None,
            today_overtime: None,
            today_break: None,
            total_late: None,
        }
    }

    fn test_hierarchy() -> Vec<HierarchyNode> {
        vec![HierarchyNode {
            id: String::from("g-1"),
            kind: NodeKind::Group,
            name: String::from("Sales"),
            title: None,
            children: vec![HierarchyNode {
                id: String::from("e-alice"),
                kind: NodeKind::Employee,
                name: String::from("Alice"),
                title: None,
                children: vec![HierarchyNode {
                    id: String::from("e-bob"),
                    kind: NodeKind::Employee,
                    name: String::from("Bob"),
                    title: None,
                    children: Vec::new(),
                }],
            }],
        }]
    }

    /// Seeds the store with the Sales/Alice/Bob snapshot.
    async fn seed_snapshot(app_state: &AppState) {
        let mut store = app_state.store.lock().await;
        let token: RefreshToken = store.begin_refresh(
            ReportingPeriod::new(2026, 8).expect("valid period"),
            None,
        );
        let stats: Vec<StatRecord> = vec![
            test_stat("e-alice", "Alice", 0),
            test_stat("e-bob", "Bob", 120),
        ];
        store
            .apply(&token, &stats, &test_hierarchy())
            .expect("apply should succeed");
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        serde_json::from_slice(&body_bytes).expect("Failed to parse body")
    }

    #[derive(Debug, Deserialize)]
    struct RowsBody {
        search_active: bool,
        row_count: usize,
        rows: Vec<serde_json::Value>,
    }

    #[derive(Debug, Deserialize)]
    struct SnapshotBody {
        generation: u64,
        stats_loaded: bool,
        stat_count: usize,
        employee_count: u32,
    }

    #[tokio::test]
    async fn test_snapshot_endpoint_reports_empty_store() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/snapshot")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: SnapshotBody = read_json(response).await;
        assert_eq!(body.generation, 0);
        assert!(!body.stats_loaded);
        assert_eq!(body.stat_count, 0);
        assert_eq!(body.employee_count, 0);
    }

    #[tokio::test]
    async fn test_rows_endpoint_empty_store_returns_no_rows() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(Request::builder().uri("/rows").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: RowsBody = read_json(response).await;
        assert!(!body.search_active);
        assert_eq!(body.row_count, 0);
        assert!(body.rows.is_empty());
    }

    #[tokio::test]
    async fn test_rows_endpoint_rejects_unknown_status() {
        let app: Router = build_router(create_test_app_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rows?status=SLEEPING")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
        let body: ErrorResponse = read_json(response).await;
        assert!(body.error);
    }

    #[tokio::test]
    async fn test_rows_endpoint_overtime_filter_on_seeded_snapshot() {
        let app_state: AppState = create_test_app_state();
        seed_snapshot(&app_state).await;
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rows?status=OVERTIME")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: RowsBody = read_json(response).await;
        assert!(body.search_active);
        // Bob matches; Alice and the Sales group render as ancestors.
        assert_eq!(body.row_count, 3);
    }

    #[tokio::test]
    async fn test_rows_endpoint_search_filters_rows() {
        let app_state: AppState = create_test_app_state();
        seed_snapshot(&app_state).await;
        let app: Router = build_router(app_state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rows?search=nobody")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body: RowsBody = read_json(response).await;
        assert!(body.search_active);
        assert_eq!(body.row_count, 0);
    }

    #[tokio::test]
    async fn test_toggle_endpoint_flips_group_expansion() {
        let app_state: AppState = create_test_app_state();
        seed_snapshot(&app_state).await;
        let app: Router = build_router(app_state);

        let request: ToggleRequest = ToggleRequest {
            node_id: String::from("g-1"),
        };
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rows/toggle")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::OK);
        let body: serde_json::Value = read_json(response).await;
        // Groups default to expanded, so the first toggle collapses.
        assert_eq!(body["expanded"], serde_json::Value::Bool(false));
    }

    #[tokio::test]
    async fn test_toggle_endpoint_unknown_node_is_not_found() {
        let app_state: AppState = create_test_app_state();
        seed_snapshot(&app_state).await;
        let app: Router = build_router(app_state);

        let request: ToggleRequest = ToggleRequest {
            node_id: String::from("nope"),
        };
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rows/toggle")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_refresh_endpoint_rejects_invalid_month() {
        let app: Router = build_router(create_test_app_state());

        let request: RefreshRequest = RefreshRequest {
            year: 2026,
            month: 13,
            department: None,
        };
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_refresh_endpoint_unreachable_backend_is_bad_gateway() {
        // Port 1 is never listening; the fetch fails and the previous
        // (empty) snapshot must survive untouched.
        let app_state: AppState = create_test_app_state();
        let app: Router = build_router(app_state.clone());

        let request: RefreshRequest = RefreshRequest {
            year: 2026,
            month: 8,
            department: None,
        };
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/refresh")
                    .header("content-type", "application/json")
                    .body(Body::from(serde_json::to_string(&request).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), HttpStatusCode::BAD_GATEWAY);

        let store = app_state.store.lock().await;
        assert!(!store.stats_loaded());
        assert_eq!(store.latest_generation(), 1);
    }
}
