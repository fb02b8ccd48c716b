//! Axum route handlers for the Analysis API.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::acquisition::{JobInput, ResolvedJob};
use crate::analysis::pipeline::{analyze, AnalysisReport};
use crate::errors::AppError;
use crate::extraction::{extract, DocumentFormat, SourceDocument};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ResolveJobRequest {
    pub url: Option<String>,
    pub query: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub format: DocumentFormat,
    pub chars: usize,
    pub text: String,
}

/// An uploaded file part, before its format is decided.
#[derive(Debug)]
struct Upload {
    file_name: Option<String>,
    content_type: Option<String>,
    bytes: Bytes,
}

impl Upload {
    /// The declared content type wins; the file name is only consulted when the
    /// client sent no content type or a generic binary one.
    fn format(&self) -> Result<DocumentFormat, AppError> {
        let declared = self
            .content_type
            .as_deref()
            .filter(|ct| !ct.eq_ignore_ascii_case("application/octet-stream"));

        let format = match (declared, self.file_name.as_deref()) {
            (Some(content_type), _) => DocumentFormat::from_mime(content_type)?,
            (None, Some(name)) => DocumentFormat::from_file_name(name)?,
            (None, None) => {
                return Err(AppError::UnsupportedFormat(
                    "upload without content type or file name".to_string(),
                ))
            }
        };
        Ok(format)
    }
}

#[derive(Debug, Default)]
struct AnalyzeForm {
    resume: Option<Upload>,
    job_url: Option<String>,
    job_query: Option<String>,
    job_text: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze
///
/// Multipart form: `resume` (PDF or DOCX file) plus one of `job_url`,
/// `job_query`, `job_text`. Extraction failures are fatal; acquisition and
/// insight failures are reported inside the returned report.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisReport>, AppError> {
    let form = read_form(multipart, state.config.max_upload_bytes).await?;

    let upload = form
        .resume
        .ok_or_else(|| AppError::Validation("a resume file is required".to_string()))?;
    let input = JobInput::from_fields(
        form.job_url.as_deref(),
        form.job_query.as_deref(),
        form.job_text.as_deref(),
    )
    .ok_or_else(|| {
        AppError::Validation(
            "provide a job description as job_url, job_query, or job_text".to_string(),
        )
    })?;

    let (_, resume_text) = extract_upload(upload).await?;

    info!("Resolving job description from {:?}", input.source());
    let job = state.resolver.resolve(&input).await;

    let report = analyze(
        &resume_text,
        job,
        &state.vocabulary,
        state.insight.as_ref(),
    )
    .await;

    Ok(Json(report))
}

/// POST /api/v1/extract
///
/// Returns the plain text of an uploaded resume. Useful for previewing extraction.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let form = read_form(multipart, state.config.max_upload_bytes).await?;
    let upload = form
        .resume
        .ok_or_else(|| AppError::Validation("a resume file is required".to_string()))?;

    let (format, text) = extract_upload(upload).await?;

    Ok(Json(ExtractResponse {
        format,
        chars: text.chars().count(),
        text,
    }))
}

/// POST /api/v1/job-description
///
/// Resolves a job description on its own. Never fails for network or search
/// errors; those come back as a `failed` outcome with an error string.
pub async fn handle_resolve_job(
    State(state): State<AppState>,
    Json(request): Json<ResolveJobRequest>,
) -> Result<Json<ResolvedJob>, AppError> {
    let input = JobInput::from_fields(
        request.url.as_deref(),
        request.query.as_deref(),
        request.text.as_deref(),
    )
    .ok_or_else(|| AppError::Validation("one of url, query, or text is required".to_string()))?;

    Ok(Json(state.resolver.resolve(&input).await))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn read_form(mut multipart: Multipart, max_upload_bytes: usize) -> Result<AnalyzeForm, AppError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                if bytes.len() > max_upload_bytes {
                    return Err(AppError::PayloadTooLarge(format!(
                        "resume is {} bytes; the limit is {max_upload_bytes} bytes",
                        bytes.len()
                    )));
                }
                form.resume = Some(Upload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            "job_url" => form.job_url = Some(field.text().await.map_err(multipart_error)?),
            "job_query" => form.job_query = Some(field.text().await.map_err(multipart_error)?),
            "job_text" => form.job_text = Some(field.text().await.map_err(multipart_error)?),
            other => info!("Ignoring unknown form field '{other}'"),
        }
    }

    Ok(form)
}

/// Extraction is CPU-bound, so it runs off the async workers.
async fn extract_upload(upload: Upload) -> Result<(DocumentFormat, String), AppError> {
    let format = upload.format()?;
    let document = SourceDocument::new(format, upload.bytes);

    let text = tokio::task::spawn_blocking(move || extract(document))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

    Ok((format, text))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(format!("invalid multipart form: {}", err.body_text()))
    }
}
