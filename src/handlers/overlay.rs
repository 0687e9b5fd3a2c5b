//! Overlay endpoint handler.
//!
//! Returns one layer of a frame as a PNG: the masked, color-mapped field
//! ready to anchor onto the map.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::data_loader::{load_frame, FrameTime};
use crate::error::Result;
use crate::logging::generate_request_id;
use crate::render::RenderedOverlay;
use crate::state::{layer_by_name, AppState};

use super::{error_response, no_data_response};

/// Query parameters for the overlay endpoint
#[derive(Debug, Deserialize)]
pub struct OverlayQuery {
    /// Frame timestamp as YYYYMMDDHHMM
    pub time: String,
    /// Layer name (tir or cores)
    pub layer: String,
    /// Palette override (defaults to the layer's palette)
    pub palette: Option<String>,
    /// Opacity override in [0, 1] (defaults to the layer's opacity)
    pub alpha: Option<f32>,
}

/// Handle GET /overlay requests
pub async fn overlay_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OverlayQuery>,
) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/overlay",
        request_id = %request_id,
        time = %params.time,
        layer = %params.layer,
        palette = ?params.palette,
        alpha = ?params.alpha,
        "Processing overlay request"
    );

    match build_overlay(&state, &params) {
        Ok(Some(overlay)) => {
            let mut headers = HeaderMap::new();
            headers.insert(header::CONTENT_TYPE, "image/png".parse().unwrap());

            info!(
                endpoint = "/overlay",
                request_id = %request_id,
                time = %params.time,
                layer = %params.layer,
                min = overlay.min,
                max = overlay.max,
                bytes = overlay.png.len(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Overlay request successful"
            );

            (StatusCode::OK, headers, overlay.png.to_vec()).into_response()
        }
        Ok(None) => {
            info!(
                endpoint = "/overlay",
                request_id = %request_id,
                time = %params.time,
                "No frame for requested timestamp"
            );
            no_data_response(&params.time, &request_id)
        }
        Err(error) => error_response(error, "/overlay", &request_id),
    }
}

/// Resolve parameters, consult the cache, and render on a miss.
/// `Ok(None)` means the frame file does not exist.
fn build_overlay(state: &AppState, params: &OverlayQuery) -> Result<Option<RenderedOverlay>> {
    let time = FrameTime::parse(&params.time)?;
    let layer = layer_by_name(&params.layer)?;
    let palette = params.palette.as_deref().unwrap_or(layer.palette);
    let alpha = params.alpha.unwrap_or(layer.alpha);

    // A cache hit skips the archive read entirely
    if let Some(hit) = state.cached_layer(&time, layer, palette, alpha) {
        return Ok(Some(hit));
    }

    let path = state.frame_path(&time);
    let frame = match load_frame(&path) {
        Ok(Some(frame)) => frame,
        Ok(None) => return Ok(None),
        Err(error) => {
            // A broken file degrades to "no data" for the client, but the
            // cause is worth surfacing in the logs.
            warn!(
                path = %path.display(),
                error = %error,
                "Frame file exists but could not be read"
            );
            return Ok(None);
        }
    };

    let overlay = state.render_layer(&time, layer, &frame, palette, alpha)?;
    Ok(Some(overlay))
}
