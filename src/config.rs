use serde::Deserialize;

use crate::ai::Provider;

const CONFIG_FILE: &str = "promptprofits.toml";

/// Runtime configuration. Read from `promptprofits.toml` when present,
/// then overridden by environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub address: String,
    pub port: u16,
    /// Public base URL the frontend uses to reach this API
    pub public_api_url: Option<String>,
    pub region: String,
    pub environment: Option<String>,
    pub provider_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            openai_api_key: None,
            anthropic_api_key: None,
            address: "0.0.0.0".to_string(),
            port: 10000,
            public_api_url: None,
            region: "local".to_string(),
            environment: None,
            provider_timeout_secs: 90,
        }
    }
}

impl AppConfig {
    /// Load `promptprofits.toml` (if any) and apply environment overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string(CONFIG_FILE) {
            Ok(raw) => Self::from_toml(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring {}: {}", CONFIG_FILE, e);
                AppConfig::default()
            }),
            Err(_) => AppConfig::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        config
    }

    pub fn from_toml(raw: &str) -> Result<Self, String> {
        let config: AppConfig = toml::from_str(raw).map_err(|e| e.to_string())?;
        Ok(config.normalized())
    }

    /// Apply overrides from a variable lookup. Split out from `load` so
    /// tests can feed a fixed map instead of the process environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.openai_api_key = Some(v);
        }
        if let Some(v) = lookup("ANTHROPIC_API_KEY") {
            self.anthropic_api_key = Some(v);
        }
        if let Some(v) = lookup("ADDRESS") {
            self.address = v;
        }
        if let Some(port) = lookup("PORT").and_then(|v| v.trim().parse().ok()) {
            self.port = port;
        }
        if let Some(v) = lookup("PUBLIC_API_URL").or_else(|| lookup("REACT_APP_API_URL")) {
            self.public_api_url = Some(v);
        }
        if let Some(v) = lookup("DEPLOY_REGION") {
            self.region = v;
        }
        if let Some(v) = lookup("DEPLOY_ENVIRONMENT") {
            self.environment = Some(v);
        }
        if let Some(secs) = lookup("PROVIDER_TIMEOUT_SECS").and_then(|v| v.trim().parse().ok()) {
            self.provider_timeout_secs = secs;
        }
        *self = std::mem::take(self).normalized();
    }

    fn normalized(mut self) -> Self {
        self.openai_api_key = non_empty(self.openai_api_key);
        self.anthropic_api_key = non_empty(self.anthropic_api_key);
        self.environment = non_empty(self.environment);
        self.public_api_url =
            non_empty(self.public_api_url).map(|u| u.trim_end_matches('/').to_string());
        if self.provider_timeout_secs == 0 {
            self.provider_timeout_secs = AppConfig::default().provider_timeout_secs;
        }
        self
    }

    pub fn api_key(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai_api_key.as_deref(),
            Provider::Anthropic => self.anthropic_api_key.as_deref(),
        }
    }

    /// Providers with a server-side key configured
    pub fn configured_providers(&self) -> Vec<Provider> {
        Provider::ALL
            .iter()
            .copied()
            .filter(|p| self.api_key(*p).is_some())
            .collect()
    }

    pub fn deployment_environment(&self) -> String {
        match &self.environment {
            Some(env) => env.clone(),
            None if self.configured_providers().is_empty() => "development".to_string(),
            None => "production".to_string(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
