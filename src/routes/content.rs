use rocket::http::{Header, Status};
use rocket::response::content::RawHtml;
use rocket::response::{self, Responder};
use rocket::serde::json::Json;
use rocket::Request;
use serde::Deserialize;
use serde_json::{json, Value};

use super::{content_json, error_json};
use crate::ai::Provider;
use crate::content::demo::demo_content;
use crate::content::export;
use crate::content::funnel::FunnelTemplate;

// ── Demo ──────────────────────────────────────────────

#[get("/demo?<topic>&<niche>&<provider>")]
pub fn demo(
    topic: Option<&str>,
    niche: Option<&str>,
    provider: Option<&str>,
) -> (Status, Json<Value>) {
    let provider = match provider.map(str::trim).filter(|p| !p.is_empty()) {
        None => Provider::OpenAi,
        Some(flag) => match Provider::from_str(flag) {
            Some(p) => p,
            None => return error_json(Status::BadRequest, format!("Unknown provider: {}", flag)),
        },
    };

    let content = demo_content(topic.unwrap_or(""), niche, provider);
    let mut body = content_json(&content);
    body["success"] = json!(true);
    body["apiProvider"] = json!(provider);
    body["isDemoContent"] = json!(true);
    (Status::Ok, Json(body))
}

// ── Export ────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportBody {
    pub title: String,
    pub description: String,
    pub content: String,
    pub template: Option<String>,
}

impl Default for ExportBody {
    fn default() -> Self {
        ExportBody {
            title: "Landing Page".to_string(),
            description: String::new(),
            content: String::new(),
            template: None,
        }
    }
}

/// HTML document served as a file download
pub struct HtmlDownload {
    pub filename: String,
    pub html: String,
}

impl<'r> Responder<'r, 'static> for HtmlDownload {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let mut resp = RawHtml(self.html).respond_to(req)?;
        resp.set_header(Header::new(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", self.filename),
        ));
        Ok(resp)
    }
}

#[post("/export", data = "<body>")]
pub fn export_html(body: Json<ExportBody>) -> Result<HtmlDownload, (Status, Json<Value>)> {
    let body = body.into_inner();
    if body.content.trim().is_empty() {
        return Err(error_json(Status::BadRequest, "Nothing to export: content is empty"));
    }
    let template = FunnelTemplate::parse(body.template.as_deref().unwrap_or(""));
    Ok(HtmlDownload {
        filename: export::filename(&body.title),
        html: export::render_page(&body.title, &body.description, &body.content, template),
    })
}

pub fn routes() -> Vec<rocket::Route> {
    routes![demo, export_html]
}
