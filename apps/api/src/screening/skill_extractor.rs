//! Skill extraction — derives a normalized skill list from job-description
//! text.
//!
//! Parsing is defensive by contract: the model is asked for a strict JSON
//! array, but the response is treated as untrusted. A JSON-array slice is
//! tried first; bullet-line scanning is the fallback. This function never
//! fails — a failed completion call parses as an empty response, and the
//! caller treats an empty result as "no requirements resolved".

use tracing::warn;

use crate::llm_client::Completion;
use crate::screening::prompts::{SKILL_EXTRACTION_PROMPT_TEMPLATE, SKILL_EXTRACTION_SYSTEM};

/// Extracts technical skills from raw job-description text.
pub async fn extract_skills(jd_text: &str, completion: &dyn Completion) -> Vec<String> {
    let prompt = SKILL_EXTRACTION_PROMPT_TEMPLATE.replace("{jd_text}", jd_text);

    let content = match completion
        .complete(&prompt, SKILL_EXTRACTION_SYSTEM, 0.0, true)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            warn!("Skill extraction call failed: {e}");
            String::new()
        }
    };

    parse_skills_response(&content)
}

/// Two-stage parse of the model response.
///
/// Stage 1: the greedy JSON-array slice — from the first `[` to the last `]`
/// — parsed as JSON, keeping only trimmed string elements.
/// Stage 2 (on any stage-1 failure): every line starting with a bullet marker
/// (`-`, `*`, `•`) contributes the text after the marker, cut at the first
/// comma, trimmed of spaces and quotes.
pub fn parse_skills_response(content: &str) -> Vec<String> {
    if let Some(skills) = parse_json_array(content) {
        return skills;
    }

    content
        .lines()
        .filter_map(parse_bullet_line)
        .collect()
}

fn parse_json_array(content: &str) -> Option<Vec<String>> {
    let start = content.find('[')?;
    let end = content.rfind(']')?;
    if end <= start {
        return None;
    }

    let values: Vec<serde_json::Value> = serde_json::from_str(&content[start..=end]).ok()?;
    Some(
        values
            .into_iter()
            .filter_map(|v| match v {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                _ => None,
            })
            .collect(),
    )
}

fn parse_bullet_line(line: &str) -> Option<String> {
    let line = line.trim();
    let rest = line
        .strip_prefix('-')
        .or_else(|| line.strip_prefix('*'))
        .or_else(|| line.strip_prefix('•'))?;

    let skill = rest
        .trim()
        .split(',')
        .next()
        .unwrap_or_default()
        .trim_matches(|c| c == ' ' || c == '"');

    (!skill.is_empty()).then(|| skill.to_string())
}
