use rocket::http::Status;
use rocket::request::{FromRequest, Outcome, Request};
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};
use std::sync::Arc;

use super::{content_json, error_json};
use crate::ai::{ChatBackend, Provider};
use crate::config::AppConfig;
use crate::generate::{GenerateBody, GenerationOutcome, GenerationRequest};

// ── Per-request credentials ──

/// Provider keys supplied by the caller. A non-empty header wins over the
/// server key for this request only. Deliberately not `Debug`.
pub struct ClientKeys {
    openai: Option<String>,
    anthropic: Option<String>,
}

impl ClientKeys {
    pub fn for_provider(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::OpenAi => self.openai.as_deref(),
            Provider::Anthropic => self.anthropic.as_deref(),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for ClientKeys {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let header = |name: &str| {
            request
                .headers()
                .get_one(name)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Outcome::Success(ClientKeys {
            openai: header("X-OpenAI-Key"),
            anthropic: header("X-Anthropic-Key"),
        })
    }
}

// ── Generate ──────────────────────────────────────────

#[post("/generate", data = "<body>")]
pub async fn generate(
    body: String,
    keys: ClientKeys,
    config: &State<AppConfig>,
    backend: &State<Arc<dyn ChatBackend>>,
) -> (Status, Json<Value>) {
    let req = match GenerationRequest::from_body(GenerateBody::from_json(&body)) {
        Ok(r) => r,
        Err(e) => {
            log::info!("[generate] rejected: {}", e);
            return error_json(e.status(), e);
        }
    };

    let api_key = keys
        .for_provider(req.provider)
        .or_else(|| config.api_key(req.provider))
        .map(str::to_string);
    let backend = Arc::clone(backend.inner());

    let joined = rocket::tokio::task::spawn_blocking(move || {
        crate::generate::run(backend.as_ref(), &req, api_key.as_deref())
    })
    .await;

    match joined {
        Ok(Ok(outcome)) => (Status::Ok, Json(success_body(&outcome))),
        Ok(Err(e)) => {
            log::warn!("[generate] failed with {}: {}", e.status().code, e);
            error_json(e.status(), e)
        }
        Err(e) => {
            log::error!("[generate] worker panicked: {}", e);
            error_json(Status::InternalServerError, "Failed to generate content")
        }
    }
}

fn success_body(outcome: &GenerationOutcome) -> Value {
    let mut body = content_json(&outcome.content);
    body["success"] = json!(true);
    body["apiProvider"] = json!(outcome.provider);
    body["template"] = json!(outcome.template.name());
    body["isDemoContent"] = json!(outcome.is_demo);
    body["usage"] = json!(outcome.usage);
    body["model"] = json!(outcome.model);
    body["affiliateNetwork"] = json!(outcome.affiliate_network.map(|n| n.name()));
    body["affiliateLinksInserted"] = json!(outcome.links_inserted);
    if let Some(notice) = &outcome.notice {
        body["notice"] = json!(notice);
    }
    body
}

// ── Wrong Method ──────────────────────────────────────

fn method_not_allowed() -> (Status, Json<Value>) {
    (
        Status::MethodNotAllowed,
        Json(json!({ "error": "Method Not Allowed" })),
    )
}

#[get("/generate")]
pub fn generate_get() -> (Status, Json<Value>) {
    method_not_allowed()
}

#[put("/generate")]
pub fn generate_put() -> (Status, Json<Value>) {
    method_not_allowed()
}

#[patch("/generate")]
pub fn generate_patch() -> (Status, Json<Value>) {
    method_not_allowed()
}

#[delete("/generate")]
pub fn generate_delete() -> (Status, Json<Value>) {
    method_not_allowed()
}

pub fn routes() -> Vec<rocket::Route> {
    routes![generate, generate_get, generate_put, generate_patch, generate_delete]
}
