use crate::config::Config;
use crate::db_storage::ReportStorage;
use crate::errors::AppError;
use crate::extractor;
use crate::models::StoredReport;
use crate::xml;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::json;
use sqlx::PgPool;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: PgPool,
    /// Application configuration.
    pub config: Config,
}

/// Health check endpoint.
///
/// Returns the service status, version, and health information.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "rust-bureau-api",
            "version": "0.1.0"
        })),
    )
}

/// An uploaded file staged on disk for the parse/extract pipeline.
///
/// The artifact is removed when the guard drops, which covers every exit
/// path of the upload pipeline: success, unparsable input, and storage
/// failure.
struct TempArtifact {
    path: PathBuf,
}

impl TempArtifact {
    async fn stage(dir: &str, data: &[u8]) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::InternalError(format!("failed to create upload dir: {}", e)))?;

        let path = PathBuf::from(dir).join(format!("{}.xml", Uuid::new_v4()));
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| AppError::InternalError(format!("failed to stage upload: {}", e)))?;

        Ok(Self { path })
    }

    async fn read_to_string(&self) -> Result<String, AppError> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::UnparsableInput(format!("file is not readable text: {}", e)))
    }
}

impl Drop for TempArtifact {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::warn!(
                "failed to remove upload artifact {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

/// POST /api/upload
///
/// Accepts a single multipart file upload (field `xmlFile`), stages it as a
/// temporary artifact, then runs the parse -> extract -> persist pipeline.
/// An unparsable file is rejected with 400 and creates no record; a storage
/// failure after successful extraction surfaces as 500 so the client can
/// distinguish "bad file" from "try again".
///
/// # Arguments
///
/// * `state` - The application state.
/// * `multipart` - The multipart form payload.
///
/// # Returns
///
/// * `Result<(StatusCode, Json<StoredReport>), AppError>` - 201 with the
///   stored report (`{ id, report, uploadedAt }`) or an error.
pub async fn upload_report(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoredReport>), AppError> {
    let mut payload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read form field: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "xmlFile" => {
                let filename = field.file_name().unwrap_or("upload.xml").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?
                    .to_vec();
                payload = Some((filename, data));
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let (filename, data) =
        payload.ok_or_else(|| AppError::BadRequest("No file uploaded".to_string()))?;

    tracing::info!("POST /api/upload - file: {} ({} bytes)", filename, data.len());

    let artifact = TempArtifact::stage(&state.config.upload_dir, &data).await?;
    let text = artifact.read_to_string().await?;

    let doc = xml::parse_document(&text)?;
    let report = extractor::extract(&doc);

    let storage = ReportStorage::new(state.db.clone());
    let stored = storage.store_report(&report).await?;

    tracing::info!(
        "Stored report {} - name: {:?}, score: {}, accounts: {}",
        stored.id,
        stored.report.name,
        stored.report.credit_score,
        stored.report.credit_accounts.len()
    );

    Ok((StatusCode::CREATED, Json(stored)))
}

/// GET /api/reports
///
/// Returns the full report collection, ordered by upload time descending.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// * `Result<Json<Vec<StoredReport>>, AppError>` - The report collection or an error.
pub async fn list_reports(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredReport>>, AppError> {
    tracing::info!("GET /api/reports");

    let storage = ReportStorage::new(state.db.clone());
    let reports = storage.fetch_all().await?;

    Ok(Json(reports))
}

/// GET /api/reports/:id
///
/// Retrieves a single report by its identifier.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `id` - The UUID of the report.
///
/// # Returns
///
/// * `Result<Json<StoredReport>, AppError>` - The stored report or a 404 error.
pub async fn get_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<StoredReport>, AppError> {
    tracing::info!("GET /api/reports/{}", id);

    let storage = ReportStorage::new(state.db.clone());
    let report = storage.fetch_by_id(id).await?;

    Ok(Json(report))
}
