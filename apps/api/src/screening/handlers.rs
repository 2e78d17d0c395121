//! Axum route handlers for the Screening API.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::UploadedDocument;
use crate::screening::aggregate::ScreeningResult;
use crate::screening::coaching::{generate_interview_questions, improved_resume, InterviewQuestion};
use crate::screening::session::{answer_question, run_analysis};
use crate::screening::weakness::WeaknessReport;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub session_id: Uuid,
    pub analyzed_at: DateTime<Utc>,
    pub result: ScreeningResult,
}

#[derive(Debug, Deserialize)]
pub struct QaRequest {
    pub question: String,
}

#[derive(Debug, Serialize)]
pub struct QaResponse {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub struct QuestionsRequest {
    pub question_types: Vec<String>,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
}

fn default_difficulty() -> String {
    "Medium".to_string()
}

fn default_num_questions() -> usize {
    5
}

#[derive(Debug, Serialize)]
pub struct QuestionsResponse {
    pub questions: Vec<InterviewQuestion>,
}

#[derive(Debug, Deserialize)]
pub struct RewriteRequest {
    #[serde(default)]
    pub target_role: String,
    #[serde(default)]
    pub highlight_skills: String,
}

#[derive(Debug, Serialize)]
pub struct RewriteResponse {
    pub resume: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/screenings  (multipart)
///
/// Fields: `resume` (file, required) plus exactly one skill source —
/// `role_skills` (JSON array of strings, or a comma list) or
/// `job_description` (file). Runs the full pipeline and returns the new
/// session id with its screening result.
pub async fn handle_analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AnalyzeResponse>), AppError> {
    let mut resume: Option<UploadedDocument> = None;
    let mut role_skills: Option<Vec<String>> = None;
    let mut job_description: Option<UploadedDocument> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                resume = Some(UploadedDocument::new(file_name, bytes));
            }
            "role_skills" => {
                let text = field.text().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read role_skills: {e}"))
                })?;
                role_skills = Some(parse_role_skills(&text));
            }
            "job_description" => {
                let file_name = field.file_name().unwrap_or("jd.txt").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::Validation(format!("Failed to read job_description: {e}"))
                })?;
                job_description = Some(UploadedDocument::new(file_name, bytes));
            }
            _ => {}
        }
    }

    let resume =
        resume.ok_or_else(|| AppError::Validation("A resume file is required.".to_string()))?;

    if role_skills.is_some() && job_description.is_some() {
        return Err(AppError::Validation(
            "Provide either role_skills or job_description, not both.".to_string(),
        ));
    }

    let session = run_analysis(
        &*state.llm,
        &*state.embedder,
        &*state.scorer,
        state.config.cutoff_score,
        &resume,
        role_skills,
        job_description.as_ref(),
    )
    .await?;

    let result = session.result.clone();
    let analyzed_at = session.analyzed_at;
    let session_id = state.sessions.insert(session).await;

    Ok((
        StatusCode::CREATED,
        Json(AnalyzeResponse {
            session_id,
            analyzed_at,
            result,
        }),
    ))
}

/// GET /api/v1/screenings/:id
pub async fn handle_get_screening(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let session = lookup(&state, session_id).await?;
    Ok(Json(AnalyzeResponse {
        session_id,
        analyzed_at: session.analyzed_at,
        result: session.result.clone(),
    }))
}

/// GET /api/v1/screenings/:id/weaknesses
///
/// Empty list when the screening found no gap skills.
pub async fn handle_get_weaknesses(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<WeaknessReport>>, AppError> {
    let session = lookup(&state, session_id).await?;
    Ok(Json(
        session.result.detailed_weaknesses.clone().unwrap_or_default(),
    ))
}

/// POST /api/v1/screenings/:id/qa
///
/// Degrades inside `answer_question` — the response is always 200 with an
/// answer string, even when the session has no Q&A index.
pub async fn handle_qa(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<QaRequest>,
) -> Result<Json<QaResponse>, AppError> {
    if request.question.trim().is_empty() {
        return Err(AppError::Validation("question cannot be empty".to_string()));
    }

    let session = lookup(&state, session_id).await?;
    let answer =
        answer_question(&session, &request.question, &*state.llm, &*state.embedder).await;
    Ok(Json(QaResponse { answer }))
}

/// POST /api/v1/screenings/:id/questions
pub async fn handle_questions(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<QuestionsRequest>,
) -> Result<Json<QuestionsResponse>, AppError> {
    if request.question_types.is_empty() {
        return Err(AppError::Validation(
            "question_types cannot be empty".to_string(),
        ));
    }

    let session = lookup(&state, session_id).await?;
    let questions = generate_interview_questions(
        &*state.llm,
        &session,
        &request.question_types,
        &request.difficulty,
        request.num_questions,
    )
    .await;
    Ok(Json(QuestionsResponse { questions }))
}

/// POST /api/v1/screenings/:id/rewrite
pub async fn handle_rewrite(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<RewriteRequest>,
) -> Result<Json<RewriteResponse>, AppError> {
    let session = lookup(&state, session_id).await?;
    let resume = improved_resume(
        &*state.llm,
        &session,
        &request.target_role,
        &request.highlight_skills,
    )
    .await?;
    Ok(Json(RewriteResponse { resume }))
}

async fn lookup(
    state: &AppState,
    session_id: Uuid,
) -> Result<std::sync::Arc<crate::screening::session::SessionState>, AppError> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Screening session {session_id} not found")))
}

/// Accepts a JSON array of strings or a plain comma list.
fn parse_role_skills(text: &str) -> Vec<String> {
    if let Ok(skills) = serde_json::from_str::<Vec<String>>(text.trim()) {
        return skills
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role_skills_json_array() {
        assert_eq!(
            parse_role_skills(r#"["React", " Kubernetes "]"#),
            vec!["React", "Kubernetes"]
        );
    }

    #[test]
    fn test_parse_role_skills_comma_list() {
        assert_eq!(
            parse_role_skills("React, Kubernetes , , AWS"),
            vec!["React", "Kubernetes", "AWS"]
        );
    }

    #[test]
    fn test_questions_request_defaults() {
        let request: QuestionsRequest =
            serde_json::from_str(r#"{"question_types": ["Technical"]}"#).unwrap();
        assert_eq!(request.difficulty, "Medium");
        assert_eq!(request.num_questions, 5);
    }

    #[test]
    fn test_rewrite_request_fields_default_to_empty() {
        let request: RewriteRequest = serde_json::from_str("{}").unwrap();
        assert!(request.target_role.is_empty());
        assert!(request.highlight_skills.is_empty());
    }
}
