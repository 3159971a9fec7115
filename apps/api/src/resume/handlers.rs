use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::CandidateProfile;
use crate::resume::document::{extract_text, DocumentFormat};
use crate::resume::facts::extract_profile;
use crate::state::AppState;

/// Multipart field carrying the uploaded file.
pub const UPLOAD_FIELD: &str = "resume";

#[derive(Debug, Serialize)]
pub struct ParseResumeResponse {
    pub resume_id: Uuid,
    pub profile: CandidateProfile,
}

/// POST /api/v1/resumes/parse
pub async fn handle_parse_resume(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ParseResumeResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) = upload
        .ok_or_else(|| AppError::Validation(format!("missing '{UPLOAD_FIELD}' file field")))?;

    let format = validate_upload(&file_name, bytes.len(), state.config.max_upload_bytes)?;

    let mut profile = tokio::task::spawn_blocking(move || {
        extract_text(&bytes, format).map(|text| extract_profile(&text))
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("extraction task failed: {e}")))??;

    let mut ai_skills = false;
    if state.config.enable_ai_skill_extraction {
        if let Some(enhancer) = &state.enhancer {
            let cancel = CancellationToken::new();
            let _guard = cancel.clone().drop_guard();
            ai_skills = enhancer.augment_profile(&mut profile, &cancel).await;
        }
    }

    let resume_id = Uuid::new_v4();
    info!(
        %resume_id,
        %format,
        skills = profile.skills.len(),
        ai_skills,
        "resume parsed"
    );

    Ok(Json(ParseResumeResponse { resume_id, profile }))
}

/// Resolves the declared format from the file name, then checks the size
/// against the cap.
pub fn validate_upload(
    file_name: &str,
    size: usize,
    max_bytes: usize,
) -> Result<DocumentFormat, AppError> {
    let ext = DocumentFormat::extension_of(file_name).unwrap_or_default();
    let format = DocumentFormat::from_extension(ext)?;
    if size > max_bytes {
        return Err(AppError::PayloadTooLarge(format!(
            "file is {size} bytes; the limit is {max_bytes}"
        )));
    }
    Ok(format)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::Validation(err.body_text())
    }
}
