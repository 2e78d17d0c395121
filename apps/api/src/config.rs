use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// `model_name`, `embedding_model`, and `base_url` are passed through to the
/// completion/embedding collaborators opaquely — the core never interprets
/// them. `cutoff_score` is the 0–100 selection threshold.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub model_name: String,
    pub embedding_model: String,
    pub base_url: String,
    pub cutoff_score: u32,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?.trim().to_string(),
            model_name: std::env::var("MODEL_NAME").unwrap_or_else(|_| "gpt-4o".to_string()),
            embedding_model: std::env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| "text-embedding-3-small".to_string()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            cutoff_score: std::env::var("CUTOFF_SCORE")
                .unwrap_or_else(|_| "75".to_string())
                .parse::<u32>()
                .context("CUTOFF_SCORE must be an integer between 0 and 100")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
