//! Heartbeat endpoint handler.
//!
//! Returns server status: instance id, uptime, archive location, and render
//! cache occupancy.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use uuid::Uuid;

use crate::colormaps::palette_names;
use crate::state::{AppState, LAYERS};

/// Unique id for this server instance
static SERVER_ID: once_cell::sync::Lazy<String> =
    once_cell::sync::Lazy::new(|| Uuid::new_v4().to_string());

/// Server start time
static START_TIME: once_cell::sync::Lazy<SystemTime> = once_cell::sync::Lazy::new(SystemTime::now);

/// Heartbeat response structure
#[derive(Serialize)]
pub struct HeartbeatResponse {
    /// Server ID (unique per instance)
    pub server_id: String,
    /// Current timestamp (ISO 8601 format)
    pub timestamp: String,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// Root of the frame archive
    pub data_dir: String,
    /// Layer names the server renders
    pub layers: Vec<String>,
    /// Palette names the server accepts
    pub palettes: Vec<String>,
    /// Overlays currently memoized
    pub cached_overlays: usize,
    /// Server status
    pub status: String,
}

/// Handle GET /heartbeat requests
pub async fn heartbeat_handler(State(state): State<Arc<AppState>>) -> Json<HeartbeatResponse> {
    let now = SystemTime::now();
    let timestamp = chrono::DateTime::<chrono::Utc>::from(now)
        .to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

    let uptime = now
        .duration_since(*START_TIME)
        .unwrap_or(Duration::from_secs(0));

    let response = HeartbeatResponse {
        server_id: SERVER_ID.clone(),
        timestamp,
        uptime_seconds: uptime.as_secs(),
        data_dir: state.config.data_dir().display().to_string(),
        layers: LAYERS.iter().map(|l| l.name.to_string()).collect(),
        palettes: palette_names().iter().map(|p| p.to_string()).collect(),
        cached_overlays: state.cache.len(),
        status: "healthy".to_string(),
    };

    Json(response)
}
