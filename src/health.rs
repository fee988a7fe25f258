use serde::Serialize;
use std::time::Instant;

use crate::ai::Provider;
use crate::config::AppConfig;

/// Launch instant, managed as Rocket state
pub struct Uptime(pub Instant);

impl Uptime {
    pub fn now() -> Self {
        Uptime(Instant::now())
    }

    pub fn secs(&self) -> u64 {
        self.0.elapsed().as_secs()
    }
}

// ── Data Structures ─────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub ok: bool,
    pub healthy: bool,
    pub timestamp: String,
    pub services: ServiceInfo,
    pub version: String,
    pub deployment: DeploymentInfo,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub functions: String,
    pub environment: String,
    pub ai_providers: Vec<Provider>,
}

#[derive(Debug, Serialize)]
pub struct DeploymentInfo {
    pub region: String,
    pub environment: String,
}

// ── Gather ──────────────────────────────────────────────────

pub fn gather(config: &AppConfig, uptime: &Uptime) -> HealthReport {
    HealthReport {
        ok: true,
        healthy: true,
        timestamp: chrono::Utc::now().to_rfc3339(),
        services: ServiceInfo {
            functions: "operational".to_string(),
            environment: "configured".to_string(),
            ai_providers: config.configured_providers(),
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        deployment: DeploymentInfo {
            region: config.region.clone(),
            environment: config.deployment_environment(),
        },
        uptime_secs: uptime.secs(),
    }
}
