use axum::http::HeaderMap;
use axum::{Json, extract::State, http::StatusCode};
use polivalka::config::read_env;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::types::{Appliance, HumidityResp, RAW_MAX};

pub struct AppState {
    pub appliance: RwLock<Appliance>,
    pub step: i64,
}

pub type SharedState = Arc<AppState>;

fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

impl AppState {
    pub fn new(raw: i64, step: i64) -> SharedState {
        Arc::new(AppState {
            appliance: RwLock::new(Appliance {
                raw: raw.clamp(0, RAW_MAX),
                pump_on: false,
            }),
            step: step.max(0),
        })
    }

    pub fn from_env() -> SharedState {
        let raw: i64 = read_env("MOCK_APPLIANCE_START_RAW", "700")
            .parse()
            .unwrap_or(700);
        let step: i64 = read_env("MOCK_APPLIANCE_STEP", "25").parse().unwrap_or(25);
        AppState::new(raw, step)
    }
}

// --- Sensor ---

pub async fn humidity(State(state): State<SharedState>, headers: HeaderMap) -> Json<HumidityResp> {
    let request_id = request_id(&headers);
    let mut appliance = state.appliance.write().await;
    appliance.drift(state.step);
    tracing::info!(%request_id, raw = appliance.raw, pump_on = appliance.pump_on, "humidity read");
    Json(HumidityResp {
        humidity: appliance.raw,
    })
}

// --- Pump ---

pub async fn water(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: String,
) -> Result<String, (StatusCode, String)> {
    let request_id = request_id(&headers);
    let pump_on = match body.trim() {
        "1" => true,
        "0" => false,
        other => {
            tracing::warn!(%request_id, body = %other, "water command rejected: expected 1 or 0");
            return Err((StatusCode::BAD_REQUEST, "expected body 1 or 0".into()));
        }
    };

    state.appliance.write().await.pump_on = pump_on;
    tracing::info!(%request_id, pump_on, "pump switched");
    Ok(if pump_on { "pump on".into() } else { "pump off".into() })
}
