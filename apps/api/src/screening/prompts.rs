// All LLM prompt constants for the screening module.
// Reuses cross-cutting fragments from llm_client::prompts.

/// System prompt for skill extraction from a job description.
pub const SKILL_EXTRACTION_SYSTEM: &str =
    "You are an expert job description analyst. \
    Extract only concrete technical skills, tools, frameworks, and technologies. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Skill extraction prompt template. Replace `{jd_text}` before sending.
pub const SKILL_EXTRACTION_PROMPT_TEMPLATE: &str = r#"Extract only the required technical skills, tools, frameworks, and technologies from this job description.

Return a valid JSON array of strings. Example:
["Python", "React", "AWS", "Docker"]

Do not include soft skills, years of experience, or responsibilities.

Job Description:
{jd_text}

Return only the JSON array:"#;

/// Per-skill evidence scoring prompt template.
/// Replace: `{skill}`, `{passages}`.
pub const SKILL_SCORE_PROMPT_TEMPLATE: &str = r#"Resume passages:
{passages}

On a scale of 0-10, how clearly and strongly does the resume demonstrate experience with "{skill}"?
Rate based on:
- Explicit mentions
- Projects or achievements using it
- Depth of usage described

Respond with ONLY a number from 0 to 10, followed by a brief reason.
Example: 8 - Multiple projects using React with Redux and TypeScript."#;

/// Weakness diagnosis prompt template.
/// Replace: `{skill}`, `{resume_excerpt}`.
pub const WEAKNESS_PROMPT_TEMPLATE: &str = r#"Analyze why the resume is weak in demonstrating "{skill}".

Resume excerpt:
{resume_excerpt}

Return valid JSON only:
{
  "weakness": "One-sentence summary of the issue",
  "improvement_suggestions": ["Suggestion 1", "Suggestion 2", "Suggestion 3"],
  "example_addition": "One strong bullet point to add"
}"#;

/// Open-ended Q&A prompt template over retrieved resume chunks.
/// Replace: `{passages}`, `{question}`.
pub const QA_PROMPT_TEMPLATE: &str = r#"Resume passages:
{passages}

Question: {question}"#;

/// Interview question generation prompt template.
/// Replace: `{num_questions}`, `{difficulty}`, `{question_types}`, `{context}`.
pub const QUESTIONS_PROMPT_TEMPLATE: &str = r#"Generate exactly {num_questions} {difficulty}-level interview questions of these types: {question_types}.

Make them personalized to the candidate's experience.

Return valid JSON only:
[
  {"type": "Technical", "question": "Full question here"},
  {"type": "Behavioral", "question": "Full question here"}
]

{context}"#;

/// System prompt for resume rewriting — plain text output, no JSON.
pub const REWRITE_SYSTEM: &str = "You are an expert resume writer. \
    Rewrite resumes to be truthful, specific, and ATS-friendly. \
    Return only the rewritten resume text with no commentary.";

/// Resume rewrite prompt template.
/// Replace: `{target_role}`, `{highlight_skills}`, `{resume_text}`,
///          `{weakness_examples}`.
pub const REWRITE_PROMPT_TEMPLATE: &str = r#"Rewrite this resume to be highly optimized for: {target_role}

Prioritize highlighting: {highlight_skills}

Original Resume:
{resume_text}

Add strong, quantifiable achievements.
Use ATS-friendly formatting.
Address weak areas with specific examples.

Examples to include:
{weakness_examples}

Return only the improved resume text in clean, professional format."#;
