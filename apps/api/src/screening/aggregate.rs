//! Aggregate scoring — runs the per-skill scorer over every required skill
//! and folds the raw 0–10 scores into a 0–100 selection decision.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::screening::evidence_scorer::{SkillScore, SkillScorer};
use crate::screening::weakness::WeaknessReport;

/// Raw score at or above which a skill counts as a strength.
const STRENGTH_MIN: u8 = 7;
/// Raw score at or below which a skill counts as a gap.
const GAP_MAX: u8 = 5;

/// The outcome of one scoring run. Built once, replaced wholesale on
/// re-analysis, never mutated field by field.
///
/// A skill scoring exactly 6 appears in neither `strengths` nor
/// `missing_skills`. That banding is preserved deliberately; merging the
/// 6-band into either set would change observable classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningResult {
    /// 0–100, derived from the per-skill average. Never set directly.
    pub overall_score: u32,
    pub selected: bool,
    pub skill_scores: BTreeMap<String, SkillScore>,
    pub strengths: Vec<String>,
    pub missing_skills: Vec<String>,
    pub reasoning: String,
    /// Present only when `missing_skills` is non-empty and the weakness
    /// pass has run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detailed_weaknesses: Option<Vec<WeaknessReport>>,
}

/// Scores every required skill in input order and aggregates the results.
///
/// An empty skill list short-circuits without invoking the scorer. The
/// 0–100 conversion truncates toward zero — `int((avg / 10) * 100)` — and
/// must stay that way for score compatibility.
pub async fn aggregate(
    scorer: &dyn SkillScorer,
    resume_text: &str,
    skills: &[String],
    cutoff_score: u32,
) -> ScreeningResult {
    if skills.is_empty() {
        return ScreeningResult {
            overall_score: 0,
            selected: false,
            skill_scores: BTreeMap::new(),
            strengths: Vec::new(),
            missing_skills: Vec::new(),
            reasoning: "No skills defined.".to_string(),
            detailed_weaknesses: None,
        };
    }

    let mut skill_scores = BTreeMap::new();
    let mut strengths = Vec::new();
    let mut missing_skills = Vec::new();
    let mut total: u32 = 0;

    // Sequential, input order. The calls are independent and could run
    // concurrently, but the completion service is rate-limited and callers
    // expect results collected in input order.
    for skill in skills {
        let scored = scorer.score(resume_text, skill).await;
        info!("Skill '{skill}' scored {}/10", scored.score);

        total += scored.score as u32;
        if scored.score >= STRENGTH_MIN {
            strengths.push(skill.clone());
        } else if scored.score <= GAP_MAX {
            missing_skills.push(skill.clone());
        }
        skill_scores.insert(skill.clone(), scored);
    }

    let average = total as f64 / skills.len() as f64;
    let overall_score = ((average / 10.0) * 100.0) as u32;
    let selected = overall_score >= cutoff_score;

    ScreeningResult {
        overall_score,
        selected,
        skill_scores,
        strengths,
        missing_skills,
        reasoning: format!(
            "Scored {} required skills. Average proficiency: {average:.1}/10.",
            skills.len()
        ),
        detailed_weaknesses: None,
    }
}
