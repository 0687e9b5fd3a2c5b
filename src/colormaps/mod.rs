//! Colormap implementations for overlay and legend rendering.
//!
//! This module provides matplotlib-inspired colormaps as fixed ramp tables.

pub mod colormap;
pub mod diverging;
pub mod sequential;

pub use colormap::{get_colormap, palette_names, Colormap};

// Re-export commonly used colormaps
pub use diverging::{Coolwarm, RdBu};
pub use sequential::{Cividis, Inferno, Magma, Plasma, Viridis};
