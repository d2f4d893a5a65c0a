//! HTTP API server for subtitle generation jobs.
//!
//! Clients submit a video URL, poll the returned job id until the job
//! reaches `completed` or `error`, then fetch the subtitle file.

use crate::cli::Output;
use crate::config::Settings;
use crate::jobs::{create_job_store, JobStore};
use crate::pipeline::Pipeline;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use url::Url;
use uuid::Uuid;

/// Shared application state.
struct AppState {
    pipeline: Arc<Pipeline>,
    jobs: Arc<dyn JobStore>,
    settings: Settings,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let jobs = create_job_store(&settings)?;
    let pipeline = Arc::new(Pipeline::new(settings.clone(), jobs.clone())?);

    let state = Arc::new(AppState {
        pipeline,
        jobs,
        settings,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/", get(root))
        .route("/generate-subtitles", post(generate_subtitles))
        .route("/status/{job_id}", get(job_status))
        .route("/download/{job_id}", get(download_subtitles))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Tekste API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Liveness", "GET  /");
    Output::kv("Submit job", "POST /generate-subtitles");
    Output::kv("Job status", "GET  /status/:job_id");
    Output::kv("Download", "GET  /download/:job_id");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

// === Request/Response Types ===

#[derive(Debug, Deserialize)]
struct GenerateRequest {
    /// Video URL to subtitle
    video_url: String,
    /// Source language; translation auto-detects, accepted for wire compat
    #[serde(default = "default_source_lang")]
    #[allow(dead_code)]
    source_lang: String,
    /// Target language code
    #[serde(default = "default_target_lang")]
    target_lang: String,
}

fn default_source_lang() -> String {
    "auto".to_string()
}

fn default_target_lang() -> String {
    "pt".to_string()
}

#[derive(Serialize)]
struct GenerateResponse {
    job_id: String,
    message: String,
}

#[derive(Serialize)]
struct LivenessResponse {
    message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// === Handlers ===

async fn root() -> impl IntoResponse {
    Json(LivenessResponse {
        message: "Tekste subtitle service is running".to_string(),
    })
}

async fn generate_subtitles(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateRequest>,
) -> impl IntoResponse {
    if let Err(reason) = validate_submission(&req.video_url, &req.target_lang) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: reason }),
        )
            .into_response();
    }

    let job_id = Uuid::new_v4().to_string();

    if let Err(e) = state.jobs.create(&job_id).await {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response();
    }

    info!("Accepted job {} for {}", job_id, req.video_url);

    // Fire and forget: the job reports its outcome through the status store
    let pipeline = state.pipeline.clone();
    let spawn_id = job_id.clone();
    tokio::spawn(async move {
        pipeline
            .run_job(&spawn_id, &req.video_url, &req.target_lang)
            .await;
    });

    Json(GenerateResponse {
        job_id,
        message: "Processing started".to_string(),
    })
    .into_response()
}

async fn job_status(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    match state.jobs.get(&job_id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Job not found: {}", job_id),
            }),
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: e.to_string(),
            }),
        )
            .into_response(),
    }
}

async fn download_subtitles(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    // Job ids are UUIDs; anything else can't address an artifact
    if !is_valid_job_id(&job_id) {
        return not_found(&job_id);
    }

    let path = state.settings.artifact_path(&job_id);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let filename = format!("subtitles_{}.srt", job_id);
            let headers = [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", filename),
                ),
            ];
            (headers, bytes).into_response()
        }
        Err(_) => not_found(&job_id),
    }
}

fn not_found(job_id: &str) -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: format!("Subtitle file not found: {}", job_id),
        }),
    )
        .into_response()
}

// === Validation ===

/// Validate a submission before minting a job for it.
fn validate_submission(video_url: &str, target_lang: &str) -> Result<(), String> {
    let url = Url::parse(video_url).map_err(|_| format!("Invalid video URL: {}", video_url))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("Unsupported URL scheme: {}", url.scheme()));
    }

    let lang_ok = !target_lang.is_empty()
        && target_lang.len() <= 8
        && target_lang
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !lang_ok {
        return Err(format!("Invalid target language: {}", target_lang));
    }

    Ok(())
}

/// Only characters a UUID job id can contain.
fn is_valid_job_id(job_id: &str) -> bool {
    !job_id.is_empty()
        && job_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}
