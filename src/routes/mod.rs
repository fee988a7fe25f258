pub mod content;
pub mod generate;
pub mod health;
pub mod library;

use rocket::http::{Header, Status};
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde_json::{json, Value};

use crate::content::ProcessedContent;

/// Everything mounted under `/api`
pub fn routes() -> Vec<rocket::Route> {
    let mut all = generate::routes();
    all.extend(content::routes());
    all.extend(health::routes());
    all.extend(library::routes());
    all
}

// ── Helpers ───────────────────────────────────────────

pub fn error_json(status: Status, message: impl std::fmt::Display) -> (Status, Json<Value>) {
    (
        status,
        Json(json!({
            "success": false,
            "error": message.to_string(),
        })),
    )
}

/// Shared wire shape of a processed draft
pub fn content_json(content: &ProcessedContent) -> Value {
    json!({
        "title": content.title,
        "description": content.description,
        "content": content.content,
        "wordCount": content.word_count,
        "seoScore": content.seo_score,
        "suggestedImages": content.suggested_images,
        "affiliateOpportunities": content.affiliate_opportunities,
        "seoSignals": content.seo_signals,
    })
}

/// Wraps any responder and marks the response uncacheable
pub struct NoCache<R>(pub R);

impl<'r, R: Responder<'r, 'static>> Responder<'r, 'static> for NoCache<R> {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let mut resp = self.0.respond_to(req)?;
        resp.set_header(Header::new("Cache-Control", "no-cache"));
        Ok(resp)
    }
}
