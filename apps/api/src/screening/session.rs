//! Screening session — orchestrates the full pipeline and owns its state.
//!
//! Flow: extract resume text → build chunked evidence index → resolve skills
//! (custom JD extraction or verbatim role list) → aggregate scoring →
//! weakness analysis for gap skills → persist as one `SessionState`.
//!
//! A session is built whole and swapped into the store atomically; there is
//! no partial re-entry. Re-analysis produces a fresh session. Downstream
//! features (Q&A, question generation, rewrite) read session state only.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extract::{extract_text, UploadedDocument};
use crate::index::chunker::split_text;
use crate::index::embeddings::Embedder;
use crate::index::store::VectorStore;
use crate::llm_client::prompts::RAG_ANSWER_SYSTEM;
use crate::llm_client::Completion;
use crate::screening::aggregate::{aggregate, ScreeningResult};
use crate::screening::evidence_scorer::SkillScorer;
use crate::screening::prompts::QA_PROMPT_TEMPLATE;
use crate::screening::skill_extractor::extract_skills;
use crate::screening::weakness::analyze_weaknesses;

/// Chunking parameters for the Q&A evidence index.
const CHUNK_SIZE: usize = 1000;
const CHUNK_OVERLAP: usize = 200;
/// Chunks retrieved per question.
const QA_TOP_K: usize = 4;

/// Everything one analysis run produced. Owned by the store, read by the
/// downstream endpoints.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub resume_text: String,
    /// Chunked index for open-ended Q&A. Absent when the index build failed;
    /// Q&A then reports that no resume is loaded.
    pub index: Option<VectorStore>,
    pub skills: Vec<String>,
    pub result: ScreeningResult,
    pub analyzed_at: DateTime<Utc>,
}

/// In-memory session registry. Sessions are inserted whole under a fresh id;
/// the only mutation is whole-value insertion under the write lock.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Arc<SessionState>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, session: SessionState) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.write().await.insert(id, Arc::new(session));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<SessionState>> {
        self.inner.read().await.get(&id).cloned()
    }
}

/// Runs the full screening pipeline for one resume.
///
/// Exactly one of `role_skills` / `custom_jd` must be supplied. Input errors
/// (unextractable resume, no skill source) are fatal to this call; upstream
/// completion/index failures inside the pipeline degrade per component.
pub async fn run_analysis(
    completion: &dyn Completion,
    embedder: &dyn Embedder,
    scorer: &dyn SkillScorer,
    cutoff_score: u32,
    resume: &UploadedDocument,
    role_skills: Option<Vec<String>>,
    custom_jd: Option<&UploadedDocument>,
) -> Result<SessionState, AppError> {
    // Step 1: resume text
    let resume_text = extract_text(resume);
    if resume_text.trim().is_empty() {
        return Err(AppError::Validation(
            "Could not extract text from resume.".to_string(),
        ));
    }
    info!(
        "Extracted {} chars of resume text from '{}'",
        resume_text.len(),
        resume.name
    );

    // Step 2: chunked index for later Q&A. Build failure degrades — the
    // session proceeds with the index absent.
    let chunks = split_text(&resume_text, CHUNK_SIZE, CHUNK_OVERLAP);
    let index = match VectorStore::build(chunks, embedder).await {
        Ok(index) => index,
        Err(e) => {
            warn!("Evidence index build failed, continuing without Q&A index: {e}");
            None
        }
    };

    // Step 3: resolve the skill requirement set
    let skills = if let Some(jd) = custom_jd {
        let jd_text = extract_text(jd);
        let skills = extract_skills(&jd_text, completion).await;
        info!("Extracted {} skills from custom JD '{}'", skills.len(), jd.name);
        skills
    } else if let Some(skills) = role_skills {
        skills
    } else {
        return Err(AppError::Validation(
            "No job requirements provided.".to_string(),
        ));
    };

    // Step 4: score
    let mut result = aggregate(scorer, &resume_text, &skills, cutoff_score).await;
    info!(
        "Screening scored {}/100 (selected: {})",
        result.overall_score, result.selected
    );

    // Step 5: weakness analysis for gap skills
    if !result.missing_skills.is_empty() {
        let weaknesses = analyze_weaknesses(
            completion,
            &resume_text,
            &result.missing_skills,
            &result.skill_scores,
        )
        .await;
        info!("Analyzed {} gap skills", weaknesses.len());
        result.detailed_weaknesses = Some(weaknesses);
    }

    Ok(SessionState {
        resume_text,
        index,
        skills,
        result,
        analyzed_at: Utc::now(),
    })
}

/// Answers a free-text question over the session's chunked index.
///
/// Degrades to fixed strings rather than failing: an absent index means no
/// resume is loaded, and upstream trouble becomes the answer text.
pub async fn answer_question(
    session: &SessionState,
    question: &str,
    completion: &dyn Completion,
    embedder: &dyn Embedder,
) -> String {
    let Some(index) = &session.index else {
        return "Please analyze a resume first.".to_string();
    };

    let passages = match index.query(question, QA_TOP_K, embedder).await {
        Ok(passages) => passages.join("\n\n"),
        Err(e) => return format!("Error answering question: {e}"),
    };

    let prompt = QA_PROMPT_TEMPLATE
        .replace("{passages}", &passages)
        .replace("{question}", question);

    match completion.complete(&prompt, RAG_ANSWER_SYSTEM, 0.2, false).await {
        Ok(answer) => answer,
        Err(e) => format!("Error answering question: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;

    use crate::llm_client::LlmError;
    use crate::screening::evidence_scorer::SkillScore;

    struct CannedCompletion(&'static str);

    #[async_trait]
    impl Completion for CannedCompletion {
        async fn complete(
            &self,
            _prompt: &str,
            _system: &str,
            _temperature: f32,
            _json: bool,
        ) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    struct StubEmbedder;

    #[async_trait]
    impl Embedder for StubEmbedder {
        async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    /// Scores any skill containing "React" as 9, everything else 2.
    struct PatternScorer;

    #[async_trait]
    impl SkillScorer for PatternScorer {
        async fn score(&self, _resume_text: &str, skill: &str) -> SkillScore {
            if skill.contains("React") {
                SkillScore {
                    score: 9,
                    reasoning: "strong evidence".to_string(),
                }
            } else {
                SkillScore {
                    score: 2,
                    reasoning: "no mention".to_string(),
                }
            }
        }
    }

    fn resume_doc() -> UploadedDocument {
        UploadedDocument::new(
            "resume.txt",
            Bytes::from_static(b"Built 3 production React apps with Redux and TypeScript"),
        )
    }

    #[tokio::test]
    async fn test_unextractable_resume_is_a_validation_error() {
        let empty = UploadedDocument::new("resume.txt", Bytes::from_static(b"   "));
        let err = run_analysis(
            &CannedCompletion("irrelevant"),
            &StubEmbedder,
            &PatternScorer,
            75,
            &empty,
            Some(vec!["React".to_string()]),
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg)
            if msg == "Could not extract text from resume."));
    }

    #[tokio::test]
    async fn test_no_skill_source_is_a_validation_error() {
        let err = run_analysis(
            &CannedCompletion("irrelevant"),
            &StubEmbedder,
            &PatternScorer,
            75,
            &resume_doc(),
            None,
            None,
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(msg)
            if msg == "No job requirements provided."));
    }

    #[tokio::test]
    async fn test_role_skills_are_used_verbatim_and_weaknesses_attach() {
        let session = run_analysis(
            &CannedCompletion("not json"),
            &StubEmbedder,
            &PatternScorer,
            75,
            &resume_doc(),
            Some(vec!["React".to_string(), "Kubernetes".to_string()]),
            None,
        )
        .await
        .unwrap();

        assert_eq!(session.skills, vec!["React", "Kubernetes"]);
        assert_eq!(session.result.overall_score, 55);
        assert!(!session.result.selected);
        assert_eq!(session.result.strengths, vec!["React"]);
        assert_eq!(session.result.missing_skills, vec!["Kubernetes"]);

        // Kubernetes is a gap, so a weakness report is attached; the canned
        // completion is not valid JSON, so it is the fixed fallback report.
        let weaknesses = session.result.detailed_weaknesses.as_ref().unwrap();
        assert_eq!(weaknesses.len(), 1);
        assert_eq!(weaknesses[0].skill, "Kubernetes");
        assert_eq!(weaknesses[0].score, 2);
    }

    #[tokio::test]
    async fn test_custom_jd_runs_skill_extraction() {
        let jd = UploadedDocument::new(
            "jd.txt",
            Bytes::from_static(b"We need React engineers."),
        );
        let session = run_analysis(
            &CannedCompletion(r#"["React"]"#),
            &StubEmbedder,
            &PatternScorer,
            75,
            &resume_doc(),
            None,
            Some(&jd),
        )
        .await
        .unwrap();

        assert_eq!(session.skills, vec!["React"]);
        assert_eq!(session.result.overall_score, 90);
        assert!(session.result.selected);
        assert!(session.result.detailed_weaknesses.is_none());
    }

    #[tokio::test]
    async fn test_index_build_failure_degrades_gracefully() {
        let session = run_analysis(
            &CannedCompletion("not json"),
            &FailingEmbedder,
            &PatternScorer,
            75,
            &resume_doc(),
            Some(vec!["React".to_string()]),
            None,
        )
        .await
        .unwrap();

        assert!(session.index.is_none());
        // Scoring still ran.
        assert_eq!(session.result.overall_score, 90);

        // And Q&A reports that no resume is loaded.
        let answer = answer_question(&session, "Any React?", &CannedCompletion("x"), &StubEmbedder)
            .await;
        assert_eq!(answer, "Please analyze a resume first.");
    }

    #[tokio::test]
    async fn test_answer_question_uses_retrieved_passages() {
        let session = run_analysis(
            &CannedCompletion("not json"),
            &StubEmbedder,
            &PatternScorer,
            75,
            &resume_doc(),
            Some(vec!["React".to_string()]),
            None,
        )
        .await
        .unwrap();

        let answer = answer_question(
            &session,
            "How many React apps?",
            &CannedCompletion("Three production apps."),
            &StubEmbedder,
        )
        .await;
        assert_eq!(answer, "Three production apps.");
    }

    #[tokio::test]
    async fn test_store_insert_and_get_round_trip() {
        let store = SessionStore::new();
        let session = run_analysis(
            &CannedCompletion("not json"),
            &StubEmbedder,
            &PatternScorer,
            75,
            &resume_doc(),
            Some(vec!["React".to_string()]),
            None,
        )
        .await
        .unwrap();

        let id = store.insert(session).await;
        let fetched = store.get(id).await.expect("session should exist");
        assert_eq!(fetched.result.overall_score, 90);

        assert!(store.get(Uuid::new_v4()).await.is_none());
    }
}
