use std::collections::HashMap;

use crate::error::{AppError, AppResult};

pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_VISION_MODEL: &str = "meta-llama/llama-4-scout-17b-16e-instruct";
pub const DEFAULT_CHAT_MODEL: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_IMAGE_MODEL: &str = "gpt-image-1";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Connection settings for one OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: &'static str,
    pub base_url: String,
    pub api_key: String,
}

impl ProviderConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub groq: ProviderConfig,
    pub openai: Option<ProviderConfig>,
    pub vision_model: String,
    pub chat_model: String,
    pub image_model: String,
    pub image_size: String,
}

impl AppConfig {
    /// Loads `.env` when present and resolves settings from the process environment.
    pub fn from_env() -> AppResult<Self> {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Failed to read .env: {}", e),
        }
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_vars(&vars)
    }

    pub fn from_vars(vars: &HashMap<String, String>) -> AppResult<Self> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let groq_key = get("GROQ_API_KEY")
            .ok_or_else(|| AppError::Config("GROQ_API_KEY is not set".to_string()))?;

        let groq = ProviderConfig {
            provider: "groq",
            base_url: get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
            api_key: groq_key,
        };

        let openai = get("OPENAI_API_KEY").map(|api_key| ProviderConfig {
            provider: "openai",
            base_url: get("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string()),
            api_key,
        });

        Ok(Self {
            groq,
            openai,
            vision_model: get("VISION_MODEL").unwrap_or_else(|| DEFAULT_VISION_MODEL.to_string()),
            chat_model: get("CHAT_MODEL").unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string()),
            image_model: get("IMAGE_MODEL").unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            image_size: DEFAULT_IMAGE_SIZE.to_string(),
        })
    }
}
