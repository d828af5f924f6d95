#![cfg(feature = "web")]

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, State},
    http::{HeaderName, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use log::{error, info, warn};
use serde::Serialize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task;

use crate::downloader::XLSX_CONTENT_TYPE;
use crate::error::ReportError;
use crate::loader;
use crate::options::{ReportOptions, ServerConfig};
use crate::report::{self, ReportBuilder};

/// Shown after a successful build
pub const SUCCESS_MESSAGE: &str = "Packing List created successfully!";

/// Name of the multipart field carrying the upload
pub const UPLOAD_FIELD: &str = "file";

const STATUS_HEADER: HeaderName = HeaderName::from_static("x-status-message");

/// Read-only state shared by all requests
pub struct AppState {
    builder: ReportBuilder,
}

impl AppState {
    pub fn new(options: ReportOptions) -> Self {
        AppState {
            builder: ReportBuilder::new(options),
        }
    }
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    message: Option<String>,
}

#[derive(Serialize)]
struct ValidationResponse {
    status: String,
    message: Option<String>,
    missing_columns: Vec<String>,
    rows: usize,
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ReportError::Schema { .. } | ReportError::DataType { .. } => {
                warn!("Rejected upload: {}", self);
                (StatusCode::UNPROCESSABLE_ENTITY, self.to_string())
            }
            ReportError::Load(e) => {
                error!("Failed to read upload: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    "Failed to process the uploaded file".to_string(),
                )
            }
            ReportError::Write(e) => {
                error!("Failed to write packing list: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to generate the packing list".to_string(),
                )
            }
        };

        let body = StatusResponse {
            status: "error".to_string(),
            message: Some(message),
        };
        (status, Json(body)).into_response()
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(serve_upload_page))
        .route("/api/packing-list", post(generate_packing_list))
        .route("/api/validate", post(validate_upload))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

pub async fn run(
    config: ServerConfig,
    options: ReportOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let app_state = Arc::new(AppState::new(options));
    let app = router(app_state, config.max_upload_bytes);

    let listener = TcpListener::bind(&config.bind_addr).await?;
    info!("Listening on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_upload_page() -> Html<&'static str> {
    Html(include_str!("./static/upload.html"))
}

/// Pull the uploaded file out of the form. `None` if no non-empty file was sent.
async fn read_upload(multipart: &mut Multipart) -> Result<Option<Vec<u8>>, Response> {
    let mut file_data = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart request: {}", e);
                return Err(error_response(StatusCode::BAD_REQUEST, e.body_text()));
            }
        };

        if field.name() == Some(UPLOAD_FIELD) {
            match field.bytes().await {
                Ok(bytes) if !bytes.is_empty() => file_data = Some(bytes.to_vec()),
                Ok(_) => {}
                Err(e) => {
                    warn!("Failed to read upload body: {}", e);
                    return Err(error_response(e.status(), e.body_text()));
                }
            }
        }
    }

    Ok(file_data)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(StatusResponse {
            status: "error".to_string(),
            message: Some(message.into()),
        }),
    )
        .into_response()
}

async fn generate_packing_list(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Response {
    let file_data = match read_upload(&mut multipart).await {
        Ok(Some(data)) => data,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, "No file uploaded"),
        Err(response) => return response,
    };

    // Load, build and write are CPU-bound
    let worker_state = Arc::clone(&state);
    let result =
        task::spawn_blocking(move || crate::generate(&file_data, &worker_state.builder)).await;

    let bytes = match result {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => return e.into_response(),
        Err(e) => {
            error!("Packing list task failed: {}", e);
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate the packing list",
            );
        }
    };

    let file_name = &state.builder.options().file_name;
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
            (STATUS_HEADER, SUCCESS_MESSAGE.to_string()),
        ],
        bytes,
    )
        .into_response()
}

async fn validate_upload(mut multipart: Multipart) -> Response {
    let file_data = match read_upload(&mut multipart).await {
        Ok(Some(data)) => data,
        Ok(None) => return error_response(StatusCode::BAD_REQUEST, "No file uploaded"),
        Err(response) => return response,
    };

    let dataset = match loader::load_dataset(&file_data) {
        Ok(dataset) => dataset,
        Err(e) => return e.into_response(),
    };

    let response = match report::validate(&dataset) {
        Ok(_) => ValidationResponse {
            status: "ok".to_string(),
            message: None,
            missing_columns: Vec::new(),
            rows: dataset.len(),
        },
        Err(e) => {
            let missing_columns = match &e {
                ReportError::Schema { missing } => missing.clone(),
                _ => Vec::new(),
            };
            ValidationResponse {
                status: "error".to_string(),
                message: Some(e.to_string()),
                missing_columns,
                rows: dataset.len(),
            }
        }
    };

    Json(response).into_response()
}
