use serde::Deserialize;

const DEFAULT_AI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/openai/";
const DEFAULT_AI_MODEL: &str = "gemini-2.5-flash";

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    pub api_key: String,
    pub api_base: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    /// Shared secret for the single-user login gate.
    pub admin_password: String,
    pub ai: AiConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let admin_password = std::env::var("ADMIN_PASSWORD")?;
        let ai = AiConfig {
            api_key: std::env::var("GEMINI_API_KEY")?,
            api_base: std::env::var("AI_API_BASE").unwrap_or_else(|_| DEFAULT_AI_API_BASE.into()),
            model: std::env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_AI_MODEL.into()),
        };
        Ok(Self {
            database_url,
            admin_password,
            ai,
        })
    }
}
