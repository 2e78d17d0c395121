//! Weakness analysis — per-gap-skill diagnosis with improvement suggestions.
//!
//! One report per input skill, in input order, no exceptions: a failed call
//! or unparseable response substitutes a fixed fallback report rather than
//! dropping the skill.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;
use crate::llm_client::{strip_json_fences, Completion};
use crate::screening::evidence_scorer::SkillScore;
use crate::screening::prompts::WEAKNESS_PROMPT_TEMPLATE;

/// Resume excerpt cap for the diagnosis prompt, in characters.
const EXCERPT_CHARS: usize = 3000;

/// Diagnosis for one gap skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaknessReport {
    pub skill: String,
    /// The skill's prior evidence score, 0 if absent.
    pub score: u8,
    pub detail: String,
    pub suggestions: Vec<String>,
    pub example: String,
}

/// The structured diagnosis the model is asked for. Fields default
/// individually so a partially well-formed response still contributes.
#[derive(Debug, Deserialize)]
struct WeaknessJson {
    #[serde(default = "default_weakness")]
    weakness: String,
    #[serde(default)]
    improvement_suggestions: Vec<String>,
    #[serde(default)]
    example_addition: String,
}

fn default_weakness() -> String {
    "Lack of clear examples.".to_string()
}

/// Analyzes every gap skill, producing exactly one report per input skill in
/// input order. Never fails.
pub async fn analyze_weaknesses(
    completion: &dyn Completion,
    resume_text: &str,
    missing_skills: &[String],
    skill_scores: &BTreeMap<String, SkillScore>,
) -> Vec<WeaknessReport> {
    let excerpt = truncate_chars(resume_text, EXCERPT_CHARS);
    let mut reports = Vec::with_capacity(missing_skills.len());

    for skill in missing_skills {
        let prior_score = skill_scores.get(skill).map(|s| s.score).unwrap_or(0);
        let prompt = WEAKNESS_PROMPT_TEMPLATE
            .replace("{skill}", skill)
            .replace("{resume_excerpt}", excerpt);

        let report = match completion.complete(&prompt, JSON_ONLY_SYSTEM, 0.3, true).await {
            Ok(response) => {
                match serde_json::from_str::<WeaknessJson>(strip_json_fences(&response)) {
                    Ok(parsed) => WeaknessReport {
                        skill: skill.clone(),
                        score: prior_score,
                        detail: parsed.weakness,
                        suggestions: parsed.improvement_suggestions,
                        example: parsed.example_addition,
                    },
                    Err(e) => {
                        warn!("Weakness diagnosis for '{skill}' was not valid JSON: {e}");
                        fallback_report(skill, prior_score)
                    }
                }
            }
            Err(e) => {
                warn!("Weakness diagnosis call failed for '{skill}': {e}");
                fallback_report(skill, prior_score)
            }
        };

        reports.push(report);
    }

    reports
}

fn fallback_report(skill: &str, score: u8) -> WeaknessReport {
    WeaknessReport {
        skill: skill.to_string(),
        score,
        detail: "No strong demonstration of this skill.".to_string(),
        suggestions: vec!["Add specific projects or achievements using this skill.".to_string()],
        example: String::new(),
    }
}

/// Truncates to at most `max` characters on a char boundary.
fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
