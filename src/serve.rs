use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::error;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::sync::Arc as StdArc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::config::ServiceConfig;
use crate::db::{self, PictureRecord};
use crate::download::{HttpDownloader, ImageDownloader};
use crate::error::ServiceError;
use crate::pipeline::{fetch_and_save, last_saved, normalize_count};

const INDEX_HTML: &str = include_str!("../static/index.html");

// State for API handlers
pub struct AppState {
    pub pool: SqlitePool,
    pub images_dir: PathBuf,
    pub downloader: StdArc<dyn ImageDownloader>,
}

/// Picture record as returned over HTTP, with the image path added
#[derive(Serialize)]
struct PictureResponse {
    id: i64,
    animal: String,
    filename: String,
    source_url: String,
    saved_at: String,
    image_url: String,
}

impl From<PictureRecord> for PictureResponse {
    fn from(record: PictureRecord) -> Self {
        let image_url = format!("/images/{}", record.filename);
        Self {
            id: record.id,
            animal: record.animal,
            filename: record.filename,
            source_url: record.source_url,
            saved_at: record.saved_at,
            image_url,
        }
    }
}

#[derive(Serialize)]
struct SavedResponse {
    saved: Vec<PictureResponse>,
}

#[derive(Deserialize)]
struct FetchParams {
    animal: Option<String>,
    count: Option<String>,
}

#[derive(Deserialize)]
struct LastParams {
    animal: Option<String>,
}

/// Build the service router. Public so integration tests can drive it
/// against an ephemeral listener.
pub fn build_router(state: StdArc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(index_handler))
        .route("/api/fetch", get(api_fetch_handler).post(api_fetch_handler))
        .route("/api/last", get(api_last_handler))
        .nest_service("/images", ServeDir::new(&state.images_dir))
        .layer(cors)
        .with_state(state)
}

async fn index_handler() -> impl IntoResponse {
    Html(INDEX_HTML)
}

/// Pull a field out of an optional JSON body, stringified so numeric and
/// string counts both normalize the same way downstream
fn body_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

async fn api_fetch_handler(
    State(state): State<StdArc<AppState>>,
    Query(params): Query<FetchParams>,
    body: Option<Json<Value>>,
) -> Response {
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);

    // Query parameters win over the JSON body when both are present;
    // an empty or whitespace-only value counts as missing
    let animal = params
        .animal
        .filter(|a| !a.trim().is_empty())
        .or_else(|| body_field(&body, "animal").filter(|a| !a.trim().is_empty()));
    let Some(animal) = animal else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing animal (cat|dog|bear)"})),
        )
            .into_response();
    };

    let count_raw = params.count.or_else(|| body_field(&body, "count"));
    let count = normalize_count(count_raw.as_deref());

    match fetch_and_save(
        &state.pool,
        &state.images_dir,
        state.downloader.as_ref(),
        &animal,
        count,
    )
    .await
    {
        Ok(records) => {
            let saved: Vec<PictureResponse> = records.into_iter().map(Into::into).collect();
            (StatusCode::OK, Json(SavedResponse { saved })).into_response()
        }
        Err(ServiceError::UnsupportedAnimal(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "unknown animal"})),
        )
            .into_response(),
        Err(e) => {
            error!("fetch pipeline failed for {}: {}", animal, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("internal error: {}", e)})),
            )
                .into_response()
        }
    }
}

async fn api_last_handler(
    State(state): State<StdArc<AppState>>,
    Query(params): Query<LastParams>,
) -> Response {
    let Some(animal) = params.animal.filter(|a| !a.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "missing animal parameter"})),
        )
            .into_response();
    };

    match last_saved(&state.pool, &animal).await {
        Ok(Some(record)) => {
            (StatusCode::OK, Json(PictureResponse::from(record))).into_response()
        }
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "no picture found"})),
        )
            .into_response(),
        Err(e) => {
            error!("last-picture lookup failed for {}: {}", animal, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": format!("internal error: {}", e)})),
            )
                .into_response()
        }
    }
}

/// Run the picture service until the process is stopped
pub fn serve_pictures(config: ServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::create_dir_all(&config.images_dir)?;

    println!("Starting animal picture service");
    println!("Database: {}", config.database_path.display());
    println!("Images directory: {}", config.images_dir.display());
    println!(
        "Listening on: http://[::]:{} (IPv4 + IPv6)",
        config.api_port
    );
    println!("Endpoints:");
    println!("  GET  /  - Control page");
    println!("  GET|POST /api/fetch?animal=<cat|dog|bear>&count=<N>  - Fetch and save images");
    println!("  GET  /api/last?animal=<cat|dog|bear>  - Most recently saved picture");
    println!("  GET  /images/<filename>  - Raw image bytes");

    // Create tokio runtime and run server
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let pool = db::open_database_pool(&config.database_path).await?;
        db::init_database_schema(&pool).await?;

        let state = StdArc::new(AppState {
            pool,
            images_dir: config.images_dir.clone(),
            downloader: StdArc::new(HttpDownloader::new()?),
        });

        let app = build_router(state);

        let listener = tokio::net::TcpListener::bind(format!("[::]:{}", config.api_port))
            .await
            .map_err(|e| format!("Failed to bind to port {}: {}", config.api_port, e))?;
        axum::serve(listener, app)
            .await
            .map_err(|e| format!("Server error: {}", e))?;

        Ok::<(), Box<dyn std::error::Error>>(())
    })
}
