use anyhow::{Context, Result};
use std::env;
use std::fmt;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

const SETUP_HELP: &str = "To fix this, create ~/.config/local-seo-planner/.env with:\n  \
    DATAFORSEO_LOGIN=your_login_here\n  \
    DATAFORSEO_PASSWORD=your_password_here\n  \
    OPENAI_API_KEY=your_key_here\n  \
    APP_PASSWORD=shared_access_password";

#[derive(Clone)]
pub struct Config {
    pub dataforseo_login: String,
    pub dataforseo_password: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub app_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        let dataforseo_login = Self::required("DATAFORSEO_LOGIN")?;
        let dataforseo_password = Self::required("DATAFORSEO_PASSWORD")?;
        let openai_api_key = Self::required("OPENAI_API_KEY")?;
        let app_password = Self::required("APP_PASSWORD")?;

        let openai_model = env::var("OPENAI_MODEL")
            .ok()
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());

        Ok(Self {
            dataforseo_login,
            dataforseo_password,
            openai_api_key,
            openai_model,
            app_password,
        })
    }

    fn required(name: &str) -> Result<String> {
        env::var(name).with_context(|| format!("{} not found.\n\n{}", name, SETUP_HELP))
    }

    /// Log which settings are present without revealing any secret.
    pub fn log_redacted(&self) {
        tracing::info!(
            openai_model = %self.openai_model,
            "configuration loaded (secrets redacted)"
        );
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/local-seo-planner/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("local-seo-planner").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - environment variables might be set system-wide
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("dataforseo_login", &"[redacted]")
            .field("dataforseo_password", &"[redacted]")
            .field("openai_api_key", &"[redacted]")
            .field("openai_model", &self.openai_model)
            .field("app_password", &"[redacted]")
            .finish()
    }
}
