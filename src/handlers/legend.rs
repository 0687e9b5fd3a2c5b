//! Legend endpoint handler.
//!
//! Returns the color-scale strip PNG documenting an overlay. Two forms:
//!
//! - `?time=...&layer=...`: the range is resolved from that frame's data,
//!   exactly as the overlay resolved it.
//! - `?palette=...&min=...&max=...[&label=...]`: a standalone legend with an
//!   explicit range.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use bytes::Bytes;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::data_loader::{load_frame, FrameTime};
use crate::error::{AnvilError, Result};
use crate::logging::generate_request_id;
use crate::render::render_legend;
use crate::state::{layer_by_name, AppState};

use super::{error_response, no_data_response};

/// Query parameters for the legend endpoint
#[derive(Debug, Deserialize)]
pub struct LegendQuery {
    /// Frame timestamp as YYYYMMDDHHMM (layer form)
    pub time: Option<String>,
    /// Layer name (layer form)
    pub layer: Option<String>,
    /// Palette name (override in layer form, required in explicit form)
    pub palette: Option<String>,
    /// Scale lower bound (explicit form)
    pub min: Option<f32>,
    /// Scale upper bound (explicit form)
    pub max: Option<f32>,
    /// Caption (defaults to the layer's label in layer form)
    pub label: Option<String>,
}

/// Handle GET /legend requests
pub async fn legend_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LegendQuery>,
) -> Response {
    let request_id = generate_request_id();
    let start_time = Instant::now();

    debug!(
        endpoint = "/legend",
        request_id = %request_id,
        time = ?params.time,
        layer = ?params.layer,
        palette = ?params.palette,
        "Processing legend request"
    );

    match build_legend(&state, &params) {
        Ok(Some(png)) => {
            let mut headers = HeaderMap::new();
            headers.insert(header::CONTENT_TYPE, "image/png".parse().unwrap());

            info!(
                endpoint = "/legend",
                request_id = %request_id,
                bytes = png.len(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Legend request successful"
            );

            (StatusCode::OK, headers, png.to_vec()).into_response()
        }
        Ok(None) => no_data_response(params.time.as_deref().unwrap_or("?"), &request_id),
        Err(error) => error_response(error, "/legend", &request_id),
    }
}

fn build_legend(state: &AppState, params: &LegendQuery) -> Result<Option<Bytes>> {
    match (&params.time, &params.layer) {
        (Some(stamp), Some(layer_name)) => {
            let time = FrameTime::parse(stamp)?;
            let layer = layer_by_name(layer_name)?;
            let palette = params.palette.as_deref().unwrap_or(layer.palette);
            let label = params.label.as_deref().unwrap_or(layer.label);

            // The overlay render path resolves the range; the cache makes
            // this cheap when the overlay itself was already requested.
            let overlay = match state.cached_layer(&time, layer, palette, layer.alpha) {
                Some(hit) => hit,
                None => {
                    let path = state.frame_path(&time);
                    let frame = match load_frame(&path) {
                        Ok(Some(frame)) => frame,
                        Ok(None) => return Ok(None),
                        Err(error) => {
                            warn!(
                                path = %path.display(),
                                error = %error,
                                "Frame file exists but could not be read"
                            );
                            return Ok(None);
                        }
                    };
                    state.render_layer(&time, layer, &frame, palette, layer.alpha)?
                }
            };

            Ok(Some(render_legend(palette, overlay.min, overlay.max, label)?))
        }
        (None, None) => {
            let palette =
                params
                    .palette
                    .as_deref()
                    .ok_or_else(|| AnvilError::InvalidParameter {
                        param: "palette".to_string(),
                        message: "palette is required without time/layer".to_string(),
                    })?;
            let min = params.min.ok_or_else(|| AnvilError::InvalidParameter {
                param: "min".to_string(),
                message: "min is required without time/layer".to_string(),
            })?;
            let max = params.max.ok_or_else(|| AnvilError::InvalidParameter {
                param: "max".to_string(),
                message: "max is required without time/layer".to_string(),
            })?;
            let label = params.label.as_deref().unwrap_or("");

            Ok(Some(render_legend(palette, min, max, label)?))
        }
        _ => Err(AnvilError::InvalidParameter {
            param: "time".to_string(),
            message: "time and layer must be supplied together".to_string(),
        }),
    }
}
