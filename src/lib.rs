//! # anvil
//!
//! A satellite convection frame viewer server.
//!
//! anvil loads per-timestamp NetCDF frames of Meteosat-derived storm fields
//! (cloud-top temperature and wavelet core power) and serves them as
//! color-mapped map overlays with matching legends, plus the single page that
//! displays them.
//!
//! ## Architecture
//!
//! - **Loader**: resolves a `YYYYMMDDHHMM` timestamp to an archive path and
//!   reads the two fields; a missing file is a value, not an error
//! - **Render core**: two pure transforms, the masked colormap overlay
//!   renderer and the legend strip renderer
//! - **HTTP layer**: a small axum API (`/frame`, `/overlay`, `/legend`,
//!   `/heartbeat`) and the embedded viewer page, with an explicit render
//!   cache in front of the pure core

pub mod cache;
pub mod colormaps;
pub mod config;
pub mod data_loader;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod render;
pub mod state;

pub use config::Config;
pub use error::{AnvilError, Result};
pub use logging::{create_http_trace_layer, generate_request_id, init_tracing};
pub use render::{render_legend, render_overlay, RenderedOverlay};
pub use state::{AppState, Layer, MaskRule, LAYERS};
