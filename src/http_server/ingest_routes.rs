//! Ingest HTTP Routes
//!
//! - `POST /upload/:table_name` - multipart upload, field `file`
//! - `POST /backup/:table_name` - write a backup of the table
//! - `POST /restore/:table_name` - read back the newest backup
//! - `GET /tables` - registered tables and their fields
//! - `GET /health` - liveness plus registered table names

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::ingest::{IngestError, IngestService};
use crate::schema::TableSchema;

use super::errors::{ApiError, ApiResult};

/// Name of the multipart part carrying the file
pub const FILE_FIELD: &str = "file";

// ==================
// Response Types
// ==================

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub table: String,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
pub struct BackupResponse {
    pub message: String,
    pub table: String,
    pub path: String,
    pub records: usize,
}

#[derive(Debug, Serialize)]
pub struct RestoreResponse {
    pub message: String,
    pub table: String,
    pub path: String,
    pub records: usize,
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub tables: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TablesResponse {
    pub tables: Vec<TableSchema>,
}

// ==================
// Routes
// ==================

/// Create ingest routes
pub fn ingest_routes(service: Arc<IngestService>) -> Router {
    Router::new()
        .route("/upload/:table_name", post(upload_handler))
        .route("/backup/:table_name", post(backup_handler))
        .route("/restore/:table_name", post(restore_handler))
        .route("/tables", get(tables_handler))
        .route("/health", get(health_handler))
        .with_state(service)
}

async fn upload_handler(
    State(service): State<Arc<IngestService>>,
    Path(table_name): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    // Reject unknown tables before touching the body.
    service
        .registry()
        .require(&table_name)
        .map_err(IngestError::from)?;

    let mut multipart = multipart.map_err(|e| ApiError::InvalidUpload(e.body_text()))?;
    let (file_name, body) = read_file_field(&mut multipart).await?;

    let report = service.ingest(&table_name, file_name.as_deref(), &body)?;

    Ok(Json(UploadResponse {
        message: format!(
            "{} rows validated and inserted into {}",
            report.rows, report.table
        ),
        table: report.table,
        rows: report.rows,
    }))
}

async fn read_file_field(multipart: &mut Multipart) -> ApiResult<(Option<String>, Vec<u8>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::InvalidUpload(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(String::from);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::InvalidUpload(e.body_text()))?;
        return Ok((file_name, bytes.to_vec()));
    }

    Err(ApiError::MissingFile(FILE_FIELD))
}

async fn backup_handler(
    State(service): State<Arc<IngestService>>,
    Path(table_name): Path<String>,
) -> ApiResult<Json<BackupResponse>> {
    let report = service.backup(&table_name)?;

    Ok(Json(BackupResponse {
        message: format!("Backup written: {}", report.location.path),
        table: report.table,
        path: report.location.path,
        records: report.records,
    }))
}

async fn restore_handler(
    State(service): State<Arc<IngestService>>,
    Path(table_name): Path<String>,
) -> ApiResult<Json<RestoreResponse>> {
    let report = service.restore(&table_name)?;

    Ok(Json(RestoreResponse {
        message: format!(
            "Restored {} records from {}",
            report.records, report.location.path
        ),
        table: report.table,
        path: report.location.path,
        records: report.records,
    }))
}

async fn tables_handler(State(service): State<Arc<IngestService>>) -> Json<TablesResponse> {
    Json(TablesResponse {
        tables: service.registry().tables().cloned().collect(),
    })
}

async fn health_handler(State(service): State<Arc<IngestService>>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        tables: service.registry().table_names().map(String::from).collect(),
    };
    (StatusCode::OK, Json(response))
}
