//! Per-skill evidence scoring — retrieval-augmented 0–10 grading of how
//! clearly a resume demonstrates one skill.
//!
//! Each skill is graded independently rather than in one holistic pass:
//! independent calls isolate noise and let each skill be evidenced by the
//! most relevant resume passages. The index here is deliberately
//! single-document (the whole resume, unchunked) because evidence for one
//! skill may be scattered — chunk-level retrieval could miss mentions spread
//! across sections. Contrast with the chunked index used for open-ended Q&A.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::index::embeddings::Embedder;
use crate::index::store::VectorStore;
use crate::llm_client::prompts::RAG_ANSWER_SYSTEM;
use crate::llm_client::Completion;
use crate::screening::prompts::SKILL_SCORE_PROMPT_TEMPLATE;

/// Passages retrieved per skill query.
const EVIDENCE_TOP_K: usize = 4;

/// One skill's graded proficiency: 0–10 plus a short justification.
/// `reasoning` is always non-empty; fallbacks carry fixed placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillScore {
    pub score: u8,
    pub reasoning: String,
}

impl SkillScore {
    fn degraded(reasoning: &str) -> Self {
        Self {
            score: 0,
            reasoning: reasoning.to_string(),
        }
    }
}

/// The per-skill scorer seam. Carried in `AppState` as `Arc<dyn SkillScorer>`
/// so the aggregate pipeline is testable with deterministic stubs.
///
/// Implementations never fail: upstream trouble degrades to a score of 0
/// with a fixed reasoning string.
#[async_trait]
pub trait SkillScorer: Send + Sync {
    async fn score(&self, resume_text: &str, skill: &str) -> SkillScore;
}

/// Production scorer: single-document evidence index + completion grading.
pub struct RagSkillScorer {
    completion: Arc<dyn Completion>,
    embedder: Arc<dyn Embedder>,
}

impl RagSkillScorer {
    pub fn new(completion: Arc<dyn Completion>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            completion,
            embedder,
        }
    }
}

#[async_trait]
impl SkillScorer for RagSkillScorer {
    async fn score(&self, resume_text: &str, skill: &str) -> SkillScore {
        if resume_text.trim().is_empty() {
            return SkillScore::degraded("No resume content.");
        }

        let store =
            match VectorStore::build(vec![resume_text.to_string()], self.embedder.as_ref()).await {
                Ok(Some(store)) => store,
                Ok(None) => return SkillScore::degraded("No resume content."),
                Err(e) => {
                    warn!("Evidence index build failed for skill '{skill}': {e}");
                    return SkillScore::degraded("Analysis failed.");
                }
            };

        let passages = match store.query(skill, EVIDENCE_TOP_K, self.embedder.as_ref()).await {
            Ok(passages) => passages.join("\n\n"),
            Err(e) => {
                warn!("Evidence retrieval failed for skill '{skill}': {e}");
                return SkillScore::degraded("Analysis failed.");
            }
        };

        let prompt = SKILL_SCORE_PROMPT_TEMPLATE
            .replace("{passages}", &passages)
            .replace("{skill}", skill);

        match self
            .completion
            .complete(&prompt, RAG_ANSWER_SYSTEM, 0.0, false)
            .await
        {
            Ok(response) => parse_score_response(&response),
            Err(e) => {
                warn!("Skill scoring call failed for '{skill}': {e}");
                SkillScore::degraded("Analysis failed.")
            }
        }
    }
}

/// Parses a grading response: a leading run of 1–2 digits is the score
/// (clamped to 10), the remainder — stripped of leading separators — is the
/// reasoning. A response with no leading digits, or one whose remainder is
/// empty, carries no usable evidence.
pub fn parse_score_response(response: &str) -> SkillScore {
    let trimmed = response.trim();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).take(2).collect();

    if digits.is_empty() {
        return SkillScore::degraded("No clear evidence found.");
    }

    // 1–2 digits always fit in u8.
    let score = digits.parse::<u8>().unwrap_or(0).min(10);
    let reasoning = trimmed[digits.len()..]
        .trim_matches(|c| matches!(c, ' ' | '-' | ':' | '.'))
        .to_string();

    SkillScore {
        score,
        reasoning: if reasoning.is_empty() {
            "No clear evidence found.".to_string()
        } else {
            reasoning
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::llm_client::LlmError;

    /// Collaborators that panic if touched — used to prove early returns.
    struct UnreachableCompletion;

    #[async_trait]
    impl Completion for UnreachableCompletion {
        async fn complete(
            &self,
            _prompt: &str,
            _system: &str,
            _temperature: f32,
            _json: bool,
        ) -> Result<String, LlmError> {
            panic!("completion must not be called");
        }
    }

    struct UnreachableEmbedder;

    #[async_trait]
    impl Embedder for UnreachableEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            panic!("embedder must not be called");
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl Embedder for FailingEmbedder {
        async fn embed(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
            Err(LlmError::EmptyContent)
        }
    }

    #[test]
    fn test_parse_score_with_reason() {
        let parsed = parse_score_response("8 - Multiple projects using React with Redux.");
        assert_eq!(parsed.score, 8);
        assert_eq!(parsed.reasoning, "Multiple projects using React with Redux");
    }

    #[test]
    fn test_parse_score_two_digits_clamped_to_ten() {
        let parsed = parse_score_response("99 - wildly confident");
        assert_eq!(parsed.score, 10);
    }

    #[test]
    fn test_parse_score_ten_kept() {
        let parsed = parse_score_response("10: Deep, sustained usage across roles");
        assert_eq!(parsed.score, 10);
        assert_eq!(parsed.reasoning, "Deep, sustained usage across roles");
    }

    #[test]
    fn test_parse_score_bare_number_gets_placeholder_reasoning() {
        let parsed = parse_score_response("7");
        assert_eq!(parsed.score, 7);
        assert_eq!(parsed.reasoning, "No clear evidence found.");
    }

    #[test]
    fn test_parse_score_no_leading_digits() {
        let parsed = parse_score_response("The resume shows strong React experience.");
        assert_eq!(parsed.score, 0);
        assert_eq!(parsed.reasoning, "No clear evidence found.");
    }

    #[test]
    fn test_parse_score_leading_whitespace_tolerated() {
        let parsed = parse_score_response("  3 - brief mention only");
        assert_eq!(parsed.score, 3);
        assert_eq!(parsed.reasoning, "brief mention only");
    }

    #[tokio::test]
    async fn test_empty_resume_short_circuits_without_collaborator_calls() {
        let scorer = RagSkillScorer::new(
            Arc::new(UnreachableCompletion),
            Arc::new(UnreachableEmbedder),
        );
        let result = scorer.score("   \n ", "React").await;
        assert_eq!(result, SkillScore::degraded("No resume content."));
    }

    #[tokio::test]
    async fn test_index_build_failure_degrades_to_analysis_failed() {
        let scorer =
            RagSkillScorer::new(Arc::new(UnreachableCompletion), Arc::new(FailingEmbedder));
        let result = scorer.score("Built React apps", "React").await;
        assert_eq!(result, SkillScore::degraded("Analysis failed."));
    }
}
