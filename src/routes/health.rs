use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use super::NoCache;
use crate::config::AppConfig;
use crate::health::{gather, Uptime};

#[get("/health")]
pub fn health(config: &State<AppConfig>, uptime: &State<Uptime>) -> NoCache<(Status, Json<Value>)> {
    let report = gather(config, uptime);
    NoCache(match serde_json::to_value(&report) {
        Ok(v) => (Status::Ok, Json(v)),
        Err(e) => {
            log::error!("[health] could not serialize report: {}", e);
            (
                Status::InternalServerError,
                Json(json!({ "healthy": false, "error": e.to_string() })),
            )
        }
    })
}

pub fn routes() -> Vec<rocket::Route> {
    routes![health]
}
