use std::env;

use crate::entities::AuthState;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_host: String,
    pub api_token: String,
    pub csrf_token: String,
}

impl Config {
    /// Load configuration from environment variables.
    /// Panics with a clear message if required vars are missing.
    pub fn from_env() -> Self {
        Self {
            api_host: required_env("RUNBOARD_API_HOST"),
            api_token: required_env("RUNBOARD_API_TOKEN"),
            csrf_token: env::var("RUNBOARD_CSRF_TOKEN").unwrap_or_default(),
        }
    }

    pub fn auth(&self) -> AuthState {
        AuthState::new(&self.api_token, &self.csrf_token)
    }
}

fn required_env(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| panic!("{key} environment variable is required"))
}
