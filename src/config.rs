use tracing::warn;

use crate::auth::Credentials;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_PORT: u16 = 8080;

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub credentials: Credentials,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Missing values never abort startup. A missing API key surfaces on each
    /// translate call, missing credentials make every request fail auth.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                warn!("Invalid PORT {:?}, using {}", raw, DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            base_url: var("GEMINI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key: var("GEMINI_API_KEY"),
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            credentials: Credentials::new(
                var("AUTH_USERNAME").unwrap_or_default(),
                var("AUTH_PASSWORD").unwrap_or_default(),
            ),
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
        }
    }
}
