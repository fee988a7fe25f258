pub mod anthropic;
pub mod openai;
pub mod prompts;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

// ── Types ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiRequest {
    pub system: String,
    pub prompt: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AiResponse {
    pub text: String,
    pub provider: Provider,
    pub model: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AiError {
    /// No key for the selected provider; the call was never attempted
    MissingApiKey(Provider),
    /// Provider answered with a non-success status
    Upstream {
        provider: Provider,
        status: u16,
        message: String,
    },
    /// Connection, TLS or timeout failure
    Network { provider: Provider, message: String },
    /// Success status but a body we could not read
    Malformed { provider: Provider, message: String },
}

impl std::fmt::Display for AiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AiError::MissingApiKey(p) => write!(f, "Missing {}", p.key_env()),
            AiError::Upstream { message, .. } => write!(f, "{}", message),
            AiError::Network { provider, .. } => write!(
                f,
                "Failed to reach {}. Please try again.",
                provider.label()
            ),
            AiError::Malformed { provider, .. } => {
                write!(f, "{} returned an unreadable response", provider.label())
            }
        }
    }
}

// ── Provider Enum ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[serde(rename = "openai")]
    OpenAi,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::OpenAi, Provider::Anthropic];

    /// Exact match on the wire flag
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "openai" => Some(Self::OpenAi),
            "anthropic" => Some(Self::Anthropic),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    /// Environment variable holding the server-side key
    pub fn key_env(&self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

// ── Backend Seam ──────────────────────────────────────

/// Performs one outbound chat-completion call. The HTTP implementation is
/// used in production; tests swap in a stub.
pub trait ChatBackend: Send + Sync {
    fn call(&self, provider: Provider, api_key: &str, req: &AiRequest)
        -> Result<AiResponse, AiError>;
}

/// Blocking reqwest backend. A client is built per call so it lives and
/// dies on the blocking thread that makes the request.
pub struct HttpBackend {
    pub timeout: Duration,
}

impl HttpBackend {
    pub fn new(timeout: Duration) -> Self {
        HttpBackend { timeout }
    }

    fn client(&self, provider: Provider) -> Result<reqwest::blocking::Client, AiError> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| AiError::Network {
                provider,
                message: format!("HTTP client error: {}", e),
            })
    }
}

impl ChatBackend for HttpBackend {
    fn call(
        &self,
        provider: Provider,
        api_key: &str,
        req: &AiRequest,
    ) -> Result<AiResponse, AiError> {
        let client = self.client(provider)?;
        match provider {
            Provider::OpenAi => openai::call(&client, api_key, req),
            Provider::Anthropic => anthropic::call(&client, api_key, req),
        }
    }
}

// ── Public API ────────────────────────────────────────

/// Run a single completion against `provider`. Fails fast without touching
/// the backend when no key is available. No retries.
pub fn complete(
    backend: &dyn ChatBackend,
    provider: Provider,
    api_key: Option<&str>,
    req: &AiRequest,
) -> Result<AiResponse, AiError> {
    let key = match api_key.map(str::trim) {
        Some(k) if !k.is_empty() => k,
        _ => return Err(AiError::MissingApiKey(provider)),
    };
    backend.call(provider, key, req)
}

// ── Helpers ───────────────────────────────────────────

/// Turn a failed response into an `Upstream` error, preferring the
/// provider's own `error.message` over the raw body.
pub(crate) fn upstream_error(provider: Provider, status: u16, body: &str) -> AiError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        })
        .unwrap_or_else(|| format!("{} error", provider.label()));

    AiError::Upstream {
        provider,
        status,
        message,
    }
}

pub(crate) fn send_error(provider: Provider, e: reqwest::Error) -> AiError {
    log::warn!("[ai] {} request failed: {}", provider.label(), e);
    AiError::Network {
        provider,
        message: e.to_string(),
    }
}
