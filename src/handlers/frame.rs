//! Frame endpoint handler.
//!
//! Returns everything the viewer page needs for one timestamp in a single
//! JSON document: availability, the geographic bounds, and each layer's
//! overlay as a data URI together with its resolved color range.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::data_loader::{load_frame, FrameTime};
use crate::error::Result;
use crate::logging::generate_request_id;
use crate::state::{AppState, LAYERS};

use super::error_response;

/// Query parameters for the frame endpoint
#[derive(Debug, Deserialize)]
pub struct FrameQuery {
    /// Frame timestamp as YYYYMMDDHHMM
    pub time: String,
}

/// Handle GET /frame requests
pub async fn frame_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<FrameQuery>,
) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/frame",
        request_id = %request_id,
        time = %params.time,
        "Processing frame request"
    );

    match build_frame_response(&state, &params.time) {
        Ok(body) => {
            info!(
                endpoint = "/frame",
                request_id = %request_id,
                time = %params.time,
                available = body["available"].as_bool().unwrap_or(false),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Frame request successful"
            );
            Json(body).into_response()
        }
        Err(error) => error_response(error, "/frame", &request_id),
    }
}

fn build_frame_response(state: &AppState, stamp: &str) -> Result<serde_json::Value> {
    let time = FrameTime::parse(stamp)?;
    let bounds = state.config.data.bounds;
    let bounds_json = serde_json::json!({
        "lat_min": bounds.lat_min,
        "lat_max": bounds.lat_max,
        "lon_min": bounds.lon_min,
        "lon_max": bounds.lon_max,
    });

    // Only read the archive when some layer is not already cached
    let frame = if LAYERS
        .iter()
        .all(|l| state.cached_layer(&time, l, l.palette, l.alpha).is_some())
    {
        None
    } else {
        let path = state.frame_path(&time);
        match load_frame(&path) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(
                    path = %path.display(),
                    error = %error,
                    "Frame file exists but could not be read"
                );
                None
            }
        }
    };

    let mut layers = Vec::with_capacity(LAYERS.len());
    for layer in &LAYERS {
        let overlay = match state.cached_layer(&time, layer, layer.palette, layer.alpha) {
            Some(hit) => Some(hit),
            None => match &frame {
                Some(frame) => Some(state.render_layer(
                    &time,
                    layer,
                    frame,
                    layer.palette,
                    layer.alpha,
                )?),
                None => None,
            },
        };

        let Some(overlay) = overlay else {
            return Ok(serde_json::json!({
                "time": time.stamp(),
                "available": false,
                "bounds": bounds_json.clone(),
                "layers": [],
            }));
        };

        layers.push(serde_json::json!({
            "name": layer.name,
            "label": layer.label,
            "palette": layer.palette,
            "min": overlay.min,
            "max": overlay.max,
            "image": overlay.to_data_uri(),
        }));
    }

    Ok(serde_json::json!({
        "time": time.stamp(),
        "available": true,
        "bounds": bounds_json,
        "layers": layers,
    }))
}
