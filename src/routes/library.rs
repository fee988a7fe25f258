use rocket::http::Status;
use rocket::serde::json::Json;
use serde_json::{json, Value};

use super::error_json;
use crate::content::funnel::FunnelTemplate;
use crate::library::PromptLibrary;

// ── Prompt Library ────────────────────────────────────

#[get("/prompts/categories")]
pub fn categories() -> Json<Value> {
    Json(json!({ "categories": PromptLibrary::builtin().categories() }))
}

#[get("/prompts?<search>&<category>")]
pub fn search(search: Option<&str>, category: Option<&str>) -> Json<Value> {
    let category = category.map(str::trim).filter(|c| !c.is_empty());
    let prompts = PromptLibrary::builtin().search(search.unwrap_or(""), category);
    Json(json!({ "prompts": prompts }))
}

#[get("/prompts/random?<category>")]
pub fn random(category: Option<&str>) -> (Status, Json<Value>) {
    let category = category.map(str::trim).filter(|c| !c.is_empty());
    let mut rng = rand::thread_rng();
    match PromptLibrary::builtin().random(category, &mut rng) {
        Some(prompt) => (Status::Ok, Json(json!({ "prompt": prompt }))),
        None => match category {
            Some(c) => error_json(Status::NotFound, format!("No prompts in category '{}'", c)),
            None => error_json(Status::NotFound, "Prompt library is empty"),
        },
    }
}

// ── Funnel Templates ──────────────────────────────────

#[get("/templates")]
pub fn templates() -> Json<Value> {
    let list: Vec<Value> = FunnelTemplate::ALL
        .iter()
        .map(|t| json!({ "name": t.name(), "description": t.description() }))
        .collect();
    Json(json!({ "templates": list }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![categories, search, random, templates]
}
