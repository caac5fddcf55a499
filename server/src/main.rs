//! Job Board API Server
//!
//! Serves the job collection over REST using Axum:
//!
//! ```text
//! GET    /jobs          list every job
//! POST   /jobs          create a job from a draft, 201 + created job
//! PUT    /jobs/{id}     replace a job, 200 + stored job
//! DELETE /jobs/{id}     delete a job, 204
//! ```
//!
//! The same routes are mounted under `/api`.

mod board;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
};
use board::{BoardError, JobBoard};
use common::{Job, JobDraft, JobId};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "127.0.0.1:5000";
const DEFAULT_DATA_PATH: &str = "data/jobs.json";

impl IntoResponse for BoardError {
    fn into_response(self) -> Response {
        let status = match &self {
            BoardError::NotFound(_) => StatusCode::NOT_FOUND,
            BoardError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            BoardError::IdsExhausted(_) => StatusCode::CONFLICT,
            BoardError::Io(_) | BoardError::Json(_) => {
                error!("Internal error: {}", self);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}

/// Handler for GET /jobs
async fn list_jobs(State(board): State<Arc<JobBoard>>) -> Json<Vec<Job>> {
    Json(board.list().await)
}

/// Handler for POST /jobs
async fn create_job(
    State(board): State<Arc<JobBoard>>,
    Json(draft): Json<JobDraft>,
) -> Result<(StatusCode, Json<Job>), BoardError> {
    let job = board.create(draft).await?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// Handler for PUT /jobs/{id}
///
/// The body is a full job; an `id` inside it is ignored in favor of the path.
async fn update_job(
    State(board): State<Arc<JobBoard>>,
    Path(id): Path<String>,
    Json(draft): Json<JobDraft>,
) -> Result<Json<Job>, BoardError> {
    let id = parse_id(&id);
    let job = board.replace(&id, draft).await?;
    Ok(Json(job))
}

/// Handler for DELETE /jobs/{id}
async fn delete_job(
    State(board): State<Arc<JobBoard>>,
    Path(id): Path<String>,
) -> Result<StatusCode, BoardError> {
    board.delete(&parse_id(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET / (root)
async fn root_handler() -> &'static str {
    "💼 Job Board API\n\nEndpoints:\n  GET    /jobs       - List jobs\n  POST   /jobs       - Create a job\n  PUT    /jobs/{id}  - Replace a job\n  DELETE /jobs/{id}  - Delete a job\n\nExample:\n  curl 'http://127.0.0.1:5000/api/jobs'"
}

fn parse_id(raw: &str) -> JobId {
    match raw.parse::<JobId>() {
        Ok(id) => id,
        Err(never) => match never {},
    }
}

fn router(board: Arc<JobBoard>) -> Router {
    let jobs = Router::new()
        .route("/jobs", get(list_jobs).post(create_job))
        .route("/jobs/{id}", put(update_job).delete(delete_job));

    Router::new()
        .route("/", get(root_handler))
        .merge(jobs.clone())
        .nest("/api", jobs)
        .with_state(board)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    println!("🚀 Starting Job Board API Server...\n");

    let addr = std::env::var("JOBS_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let data_path = std::env::var("JOBS_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH));

    let board = JobBoard::open(&data_path).await?;
    println!("📊 Loaded {} jobs\n", board.len().await);

    let app = router(Arc::new(board));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    println!("🌐 Server running at http://{}", addr);
    println!("   Try: curl 'http://{}/api/jobs'\n", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
