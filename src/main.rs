#[macro_use]
extern crate rocket;

use rocket::data::{Limits, ToByteUnit};
use rocket::serde::json::Json;
use rocket::{Build, Rocket};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

mod ai;
mod config;
mod content;
mod generate;
mod health;
mod library;
mod routes;
mod seo;


use ai::{ChatBackend, HttpBackend};
use config::AppConfig;
use health::Uptime;

fn catcher_body(message: &str) -> Json<Value> {
    Json(json!({ "success": false, "error": message }))
}

#[catch(400)]
fn bad_request() -> Json<Value> {
    catcher_body("Invalid input")
}

#[catch(404)]
fn not_found() -> Json<Value> {
    catcher_body("Not found")
}

#[catch(422)]
fn unprocessable() -> Json<Value> {
    catcher_body("Invalid input")
}

#[catch(500)]
fn server_error() -> Json<Value> {
    catcher_body("Internal server error")
}

/// Assemble the server around a config and a provider backend
pub fn build_rocket(config: AppConfig, backend: Arc<dyn ChatBackend>) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.address.clone()))
        .merge(("port", config.port))
        .merge(("limits", Limits::default().limit("string", 64.kibibytes())));

    rocket::custom(figment)
        .manage(config)
        .manage(backend)
        .manage(Uptime::now())
        .mount("/api", routes::routes())
        .register("/", catchers![bad_request, not_found, unprocessable, server_error])
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config = AppConfig::load();
    let providers: Vec<&str> = config
        .configured_providers()
        .iter()
        .map(|p| p.label())
        .collect();
    if providers.is_empty() {
        log::warn!("No provider keys configured; generation needs X-OpenAI-Key / X-Anthropic-Key headers");
    } else {
        log::info!("Configured providers: {}", providers.join(", "));
    }
    if let Some(url) = &config.public_api_url {
        log::info!("Public API URL: {}", url);
    }
    log::info!("Listening on {}:{}", config.address, config.port);

    let backend: Arc<dyn ChatBackend> =
        Arc::new(HttpBackend::new(Duration::from_secs(config.provider_timeout_secs)));
    build_rocket(config, backend)
}
