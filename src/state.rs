//! Application state and the built-in layer table.
//!
//! The state is small by design: frames are loaded per request from the
//! archive, so the server holds only the configuration and the render cache.

use ndarray::Array2;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::{OverlayKey, RenderCache};
use crate::config::Config;
use crate::data_loader::{frame_path, Frame, FrameTime};
use crate::error::{AnvilError, Result};
use crate::render::{render_overlay, RenderedOverlay};

/// Threshold predicate deriving a validity mask from a field's own values.
/// NaN satisfies neither rule, so gap pixels are always transparent.
#[derive(Debug, Clone, Copy)]
pub enum MaskRule {
    /// Valid where value < threshold
    Below(f32),
    /// Valid where value > threshold
    Above(f32),
}

impl MaskRule {
    /// Evaluate the predicate over a whole field.
    pub fn mask(&self, field: &Array2<f32>) -> Array2<bool> {
        match *self {
            MaskRule::Below(t) => field.mapv(|v| v < t),
            MaskRule::Above(t) => field.mapv(|v| v > t),
        }
    }
}

/// Which frame field a layer draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldId {
    Tir,
    Cores,
}

/// One overlay layer: which field to draw and how to present it.
#[derive(Debug, Clone, Copy)]
pub struct Layer {
    /// Layer name used in URLs and cache keys
    pub name: &'static str,
    /// The frame field to draw
    pub field_id: FieldId,
    /// Legend caption
    pub label: &'static str,
    /// Default palette
    pub palette: &'static str,
    /// Validity predicate
    pub mask_rule: MaskRule,
    /// Default opacity
    pub alpha: f32,
}

impl Layer {
    /// The frame field this layer draws.
    pub fn field<'a>(&self, frame: &'a Frame) -> &'a Array2<f32> {
        match self.field_id {
            FieldId::Tir => &frame.tir,
            FieldId::Cores => &frame.cores,
        }
    }
}

/// The two built-in layers: sub-zero cloud-top temperature and positive
/// wavelet core power.
pub const LAYERS: [Layer; 2] = [
    Layer {
        name: "tir",
        field_id: FieldId::Tir,
        label: "Temperature (C)",
        palette: "plasma",
        mask_rule: MaskRule::Below(0.0),
        alpha: 1.0,
    },
    Layer {
        name: "cores",
        field_id: FieldId::Cores,
        label: "Wavelet power",
        palette: "viridis",
        mask_rule: MaskRule::Above(0.0),
        alpha: 1.0,
    },
];

/// Look up a layer by its URL name.
pub fn layer_by_name(name: &str) -> Result<&'static Layer> {
    LAYERS
        .iter()
        .find(|l| l.name == name)
        .ok_or_else(|| AnvilError::InvalidParameter {
            param: "layer".to_string(),
            message: format!(
                "Unknown layer: {}. Valid layers: {}",
                name,
                LAYERS
                    .iter()
                    .map(|l| l.name)
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        })
}

/// The main application state shared across all handlers
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Memoized overlays
    pub cache: RenderCache,
}

impl AppState {
    /// Create a new AppState
    pub fn new(config: Config) -> Self {
        let cache = RenderCache::new(config.data.cache_capacity);
        Self { config, cache }
    }

    /// Create a new AppState wrapped in an Arc for shared ownership
    pub fn new_shared(config: Config) -> Arc<Self> {
        Arc::new(Self::new(config))
    }

    /// Archive path of the frame for a timestamp.
    pub fn frame_path(&self, time: &FrameTime) -> PathBuf {
        frame_path(self.config.data_dir(), time)
    }

    /// Render one layer of a loaded frame through the cache.
    pub fn render_layer(
        &self,
        time: &FrameTime,
        layer: &Layer,
        frame: &Frame,
        palette: &str,
        alpha: f32,
    ) -> Result<RenderedOverlay> {
        let key = OverlayKey::new(&time.stamp(), layer.name, palette, alpha);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let field = layer.field(frame);
        let mask = layer.mask_rule.mask(field);
        let overlay = render_overlay(field.view(), mask.view(), palette, None, alpha)?;
        self.cache.insert(key, overlay.clone());
        Ok(overlay)
    }

    /// Cache lookup without touching the archive, for handlers that want to
    /// skip file IO on a hit.
    pub fn cached_layer(
        &self,
        time: &FrameTime,
        layer: &Layer,
        palette: &str,
        alpha: f32,
    ) -> Option<RenderedOverlay> {
        let key = OverlayKey::new(&time.stamp(), layer.name, palette, alpha);
        self.cache.get(&key)
    }
}
