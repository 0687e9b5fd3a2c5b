//! HTTP request handlers for the anvil API.
//!
//! This module contains all the endpoint handlers for the web server.

pub mod frame;
pub mod heartbeat;
pub mod legend;
pub mod overlay;
pub mod viewer;

pub use frame::frame_handler;
pub use heartbeat::heartbeat_handler;
pub use legend::legend_handler;
pub use overlay::overlay_handler;
pub use viewer::viewer_handler;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::AnvilError;
use crate::logging::log_request_error;

/// Map an error to a JSON response with the status its class deserves.
/// Caller mistakes are 400, absent data is 404, everything else is 500.
pub(crate) fn error_response(error: AnvilError, endpoint: &str, request_id: &str) -> Response {
    log_request_error(&error, endpoint, request_id, None);

    let status = match &error {
        AnvilError::UnknownPalette { .. }
        | AnvilError::InvalidParameter { .. }
        | AnvilError::InvalidTimestamp { .. }
        | AnvilError::ShapeMismatch { .. } => StatusCode::BAD_REQUEST,
        AnvilError::DataNotFound { .. } | AnvilError::FieldMissing { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(serde_json::json!({
            "error": error.to_string(),
            "request_id": request_id
        })),
    )
        .into_response()
}

/// 404 body for a timestamp whose frame file does not exist: the graceful
/// "no data" state, distinct from a malformed request.
pub(crate) fn no_data_response(stamp: &str, request_id: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": format!("No frame available for {}", stamp),
            "request_id": request_id
        })),
    )
        .into_response()
}
