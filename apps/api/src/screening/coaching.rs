//! Coaching — interview question generation and resume rewriting.
//!
//! Both reuse session state produced by the analysis pipeline and share the
//! core's "generate → attempt structured parse → fall back to heuristic
//! parse" pattern. Neither belongs to the scoring core; they live behind it.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, Completion};
use crate::screening::prompts::{QUESTIONS_PROMPT_TEMPLATE, REWRITE_PROMPT_TEMPLATE, REWRITE_SYSTEM};
use crate::screening::session::SessionState;
use crate::screening::skill_extractor::extract_skills;

/// Resume excerpt cap for the question-generation context, in characters.
const SUMMARY_CHARS: usize = 2000;
/// `highlight_skills` longer than this is treated as pasted JD text.
const HIGHLIGHT_AS_JD_THRESHOLD: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    #[serde(rename = "type")]
    pub question_type: String,
    pub question: String,
}

/// Generates personalized interview questions from the session's resume and
/// screening outcome. Returns an empty list when the session carries no
/// skills to ask about; parsing degrades from strict JSON to line scanning.
pub async fn generate_interview_questions(
    completion: &dyn Completion,
    session: &SessionState,
    question_types: &[String],
    difficulty: &str,
    num_questions: usize,
) -> Vec<InterviewQuestion> {
    if session.resume_text.trim().is_empty() || session.skills.is_empty() {
        return Vec::new();
    }

    let context = format!(
        "Resume Summary:\n{}\n\nKey Skills: {}\nStrengths: {}\nWeaknesses: {}",
        truncate_chars(&session.resume_text, SUMMARY_CHARS),
        session.skills.join(", "),
        session.result.strengths.join(", "),
        session.result.missing_skills.join(", "),
    );

    let prompt = QUESTIONS_PROMPT_TEMPLATE
        .replace("{num_questions}", &num_questions.to_string())
        .replace("{difficulty}", difficulty)
        .replace("{question_types}", &question_types.join(", "))
        .replace("{context}", &context);

    let content = match completion.complete(&prompt, JSON_ONLY_SYSTEM, 0.7, false).await {
        Ok(content) => content,
        Err(e) => {
            warn!("Question generation call failed: {e}");
            return Vec::new();
        }
    };

    parse_questions_response(&content, question_types, num_questions)
}

/// Strict JSON-array parse first; line scanning otherwise. The line scanner
/// accepts `Type: question text` lines and treats unmarked lines as
/// continuations of the current question.
pub fn parse_questions_response(
    content: &str,
    question_types: &[String],
    num_questions: usize,
) -> Vec<InterviewQuestion> {
    if let Ok(questions) =
        serde_json::from_str::<Vec<InterviewQuestion>>(strip_json_fences(content))
    {
        return questions.into_iter().take(num_questions).collect();
    }

    let mut questions = Vec::new();
    let mut current: Option<InterviewQuestion> = None;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let tagged = question_types.iter().find(|t| {
            line.to_lowercase().contains(&t.to_lowercase()) && line.contains(':')
        });

        if let Some(question_type) = tagged {
            if let Some(q) = current.take() {
                questions.push(q);
            }
            let text = line.splitn(2, ':').nth(1).unwrap_or_default().trim();
            current = Some(InterviewQuestion {
                question_type: question_type.clone(),
                question: text.to_string(),
            });
        } else if let Some(q) = current.as_mut() {
            q.question.push(' ');
            q.question.push_str(line);
        }
    }
    if let Some(q) = current.take() {
        questions.push(q);
    }

    questions
        .into_iter()
        .map(|mut q| {
            q.question = q.question.trim().to_string();
            q
        })
        .take(num_questions)
        .collect()
}

/// Rewrites the session's resume optimized for a target role.
///
/// `highlight_skills` may be a comma list or pasted JD text (length decides);
/// when empty, the session's resolved skills are highlighted. Weakness
/// examples from the screening run are folded into the prompt.
pub async fn improved_resume(
    completion: &dyn Completion,
    session: &SessionState,
    target_role: &str,
    highlight_skills: &str,
) -> Result<String, AppError> {
    let highlight_skills = highlight_skills.trim();
    let mut skills_to_highlight = if highlight_skills.is_empty() {
        Vec::new()
    } else if highlight_skills.chars().count() > HIGHLIGHT_AS_JD_THRESHOLD {
        extract_skills(highlight_skills, completion).await
    } else {
        highlight_skills
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    };
    if skills_to_highlight.is_empty() {
        skills_to_highlight = session.skills.clone();
    }

    let weakness_examples = session
        .result
        .detailed_weaknesses
        .as_deref()
        .unwrap_or_default()
        .iter()
        .filter(|w| !w.example.is_empty())
        .map(|w| format!("Add: {}", w.example))
        .collect::<Vec<_>>()
        .join("\n");

    let target_role = if target_role.trim().is_empty() {
        "the analyzed role"
    } else {
        target_role
    };

    let prompt = REWRITE_PROMPT_TEMPLATE
        .replace("{target_role}", target_role)
        .replace("{highlight_skills}", &skills_to_highlight.join(", "))
        .replace("{resume_text}", &session.resume_text)
        .replace("{weakness_examples}", &weakness_examples);

    completion
        .complete(&prompt, REWRITE_SYSTEM, 0.7, false)
        .await
        .map(|text| text.trim().to_string())
        .map_err(|e| AppError::Llm(format!("Resume rewrite failed: {e}")))
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
