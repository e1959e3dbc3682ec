use anyhow::{Context as _, Result};
use axum::{
    Router,
    extract::{DefaultBodyLimit, Json, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::context::Context;
use crate::diff::PlanView;
use crate::plan::{
    Action, Module, Plan, PlanError, PlanFilter, PlanLoader, PlanSource, PlanSummary,
};

/// Handles the 'serve' command - starts HTTP server with the review UI
pub struct ServeCommand;

/// A plan held by the server together with where it came from
struct LoadedPlan {
    source: String,
    loaded_at: DateTime<Utc>,
    plan: Plan,
}

impl LoadedPlan {
    fn new(source: String, plan: Plan) -> Self {
        Self {
            source,
            loaded_at: Utc::now(),
            plan,
        }
    }

    fn status(&self) -> PlanStatus {
        PlanStatus {
            source: self.source.clone(),
            loaded_at: self.loaded_at,
            format_version: self.plan.format_version.clone(),
            terraform_version: self.plan.terraform_version.clone(),
            resource_changes: self.plan.resource_changes.len(),
            summary: self.plan.summary(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    ctx: Arc<Context>,
    plan: Arc<RwLock<Option<LoadedPlan>>>,
}

impl AppState {
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx: Arc::new(ctx),
            plan: Arc::new(RwLock::new(None)),
        }
    }

    /// Start with a plan already loaded
    fn with_plan(self, source: String, plan: Plan) -> Self {
        Self {
            plan: Arc::new(RwLock::new(Some(LoadedPlan::new(source, plan)))),
            ..self
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    error: Option<String>,
}

type ApiResult<T> = (StatusCode, Json<ApiResponse<T>>);

fn ok<T>(data: Option<T>) -> ApiResult<T> {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data,
            error: None,
        }),
    )
}

fn fail<T>(status: StatusCode, message: impl Into<String>) -> ApiResult<T> {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }),
    )
}

#[derive(Debug, Serialize)]
struct PlanStatus {
    source: String,
    loaded_at: DateTime<Utc>,
    format_version: String,
    terraform_version: Option<String>,
    resource_changes: usize,
    summary: PlanSummary,
}

#[derive(Debug, Deserialize)]
struct FetchRequest {
    url: String,
}

#[derive(Debug, Default, Deserialize)]
struct ChangesQuery {
    /// Comma separated action tokens; absent means the configured default
    actions: Option<String>,
    address: Option<String>,
}

const NO_PLAN: &str = "No plan loaded";

impl ServeCommand {
    /// Execute the serve command
    pub fn execute(ctx: &Context, plan_source: Option<&str>, addr: SocketAddr) -> Result<()> {
        ctx.output.section("Terraform Plan Review");
        ctx.output.dimmed("Starting HTTP server...");

        let mut state = AppState::new(ctx.clone());

        if let Some(source) = plan_source {
            let plan = super::load_plan(ctx, source)?;
            ctx.output.key_value("Plan", source);
            ctx.output
                .key_value("Resource changes", &plan.resource_changes.len().to_string());
            state = state.with_plan(source.to_string(), plan);
        } else {
            ctx.output.info("No plan given, load one from the browser");
        }

        let app = router(state, ctx.config.server.body_limit_bytes());

        ctx.output.blank();
        ctx.output.success("Server started");
        ctx.output.lavender(&format!("  http://{}", addr));
        ctx.output.dimmed("Press Ctrl+C to stop");
        ctx.output.blank();

        // Run the server
        let runtime = tokio::runtime::Runtime::new().context("Failed to create tokio runtime")?;
        runtime.block_on(async {
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind to address {}", addr))?;

            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown_signal())
                .await
                .context("Failed to start server")?;

            Ok::<(), anyhow::Error>(())
        })?;

        ctx.output.dimmed("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

/// Build the HTTP router
pub fn router(state: AppState, body_limit: usize) -> Router {
    Router::new()
        // UI routes
        .route("/", get(serve_index))
        .route("/static/*path", get(serve_static))
        // API routes
        .route(
            "/api/plan",
            get(get_plan).post(upload_plan).delete(clear_plan),
        )
        .route("/api/plan/fetch", post(fetch_plan))
        .route("/api/plan/changes", get(get_changes))
        .route("/api/plan/modules", get(get_modules))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        // CORS layer for development
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

// ============================================================================
// UI Routes
// ============================================================================

async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../ui/index.html"))
}

fn static_asset(path: &str) -> Option<&'static str> {
    match path {
        "app.js" => Some(include_str!("../ui/app.js")),
        "app.css" => Some(include_str!("../ui/app.css")),
        _ => None,
    }
}

async fn serve_static(Path(path): Path<String>) -> Response {
    match static_asset(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.essence_str().to_string())],
                content,
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "Not found").into_response(),
    }
}

// ============================================================================
// API Routes
// ============================================================================

async fn get_plan(State(state): State<AppState>) -> ApiResult<PlanStatus> {
    let guard = state.plan.read().await;
    ok(guard.as_ref().map(LoadedPlan::status))
}

async fn store_plan(state: &AppState, source: String, plan: Plan) -> PlanStatus {
    tracing::debug!(
        source = %source,
        resource_changes = plan.resource_changes.len(),
        "Plan loaded"
    );

    let loaded = LoadedPlan::new(source, plan);
    let status = loaded.status();
    *state.plan.write().await = Some(loaded);
    status
}

async fn upload_plan(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: String,
) -> ApiResult<PlanStatus> {
    let name = headers
        .get("x-plan-name")
        .and_then(|value| value.to_str().ok())
        .filter(|value| !value.is_empty())
        .unwrap_or("upload")
        .to_string();

    match Plan::from_json(&body) {
        Ok(plan) => ok(Some(store_plan(&state, name, plan).await)),
        Err(err) => fail(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

async fn fetch_plan(
    State(state): State<AppState>,
    Json(request): Json<FetchRequest>,
) -> ApiResult<PlanStatus> {
    let source = match PlanSource::parse(&request.url) {
        Ok(source) if source.is_remote() => source,
        Ok(_) => {
            return fail(
                StatusCode::BAD_REQUEST,
                PlanError::InvalidSource(format!("'{}' is not an http(s) URL", request.url))
                    .to_string(),
            );
        }
        Err(err) => return fail(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let ctx = Arc::clone(&state.ctx);
    let task_source = source.clone();
    let loaded = tokio::task::spawn_blocking(move || {
        PlanLoader::new(&*ctx.fs, &*ctx.http).load(&task_source)
    })
    .await;

    match loaded {
        Ok(Ok(plan)) => ok(Some(store_plan(&state, source.to_string(), plan).await)),
        Ok(Err(err)) => {
            tracing::warn!(url = %source, error = %err, "Plan fetch failed");
            fail(StatusCode::BAD_GATEWAY, err.to_string())
        }
        Err(err) => fail(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Plan fetch task failed: {}", err),
        ),
    }
}

async fn clear_plan(State(state): State<AppState>) -> ApiResult<()> {
    state.plan.write().await.take();
    ok(None)
}

fn changes_filter(ctx: &Context, query: &ChangesQuery) -> Result<PlanFilter, PlanError> {
    let filter = match &query.actions {
        Some(list) => PlanFilter::new().with_actions(Action::parse_list(list)?),
        None => ctx.config.view.default_filter(),
    };

    Ok(match &query.address {
        Some(address) => filter.with_address_query(address),
        None => filter,
    })
}

async fn get_changes(
    State(state): State<AppState>,
    Query(query): Query<ChangesQuery>,
) -> ApiResult<serde_json::Value> {
    let filter = match changes_filter(&state.ctx, &query) {
        Ok(filter) => filter,
        Err(err) => return fail(StatusCode::BAD_REQUEST, err.to_string()),
    };

    let guard = state.plan.read().await;
    let Some(loaded) = guard.as_ref() else {
        return fail(StatusCode::NOT_FOUND, NO_PLAN);
    };

    let mut view = PlanView::build(&loaded.plan, &filter);
    if !state.ctx.config.view.show_sensitive {
        view.redact_sensitive();
    }

    match serde_json::to_value(&view) {
        Ok(value) => ok(Some(value)),
        Err(err) => fail(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
    }
}

async fn get_modules(State(state): State<AppState>) -> ApiResult<Module> {
    let guard = state.plan.read().await;
    match guard.as_ref() {
        Some(loaded) => ok(Some(loaded.plan.planned_values.root_module.clone())),
        None => fail(StatusCode::NOT_FOUND, NO_PLAN),
    }
}
