// Screening core: skill extraction, per-skill evidence scoring, aggregation,
// weakness analysis, session orchestration, and the coaching features that
// read session state. All LLM calls go through llm_client — no direct
// completion-API calls here.

pub mod aggregate;
pub mod coaching;
pub mod evidence_scorer;
pub mod handlers;
pub mod prompts;
pub mod session;
pub mod skill_extractor;
pub mod weakness;
