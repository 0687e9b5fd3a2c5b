//! Sequential colormaps (single-hue progression).
//!
//! These colormaps are suitable for data that progresses from low to high.
//! Stop values follow the matplotlib scales of the same names.

use super::colormap::{sample_ramp, Colormap};

/// Viridis colormap - perceptually uniform, colorblind-friendly
pub struct Viridis;

const VIRIDIS_STOPS: [[u8; 3]; 9] = [
    [68, 1, 84],
    [72, 35, 116],
    [64, 67, 135],
    [52, 94, 141],
    [41, 120, 142],
    [32, 146, 140],
    [53, 183, 121],
    [109, 205, 89],
    [253, 231, 37],
];

impl Colormap for Viridis {
    fn map_normalized(&self, value: f32) -> [u8; 3] {
        sample_ramp(&VIRIDIS_STOPS, value)
    }

    fn name(&self) -> &str {
        "viridis"
    }
}

/// Plasma colormap
pub struct Plasma;

const PLASMA_STOPS: [[u8; 3]; 9] = [
    [13, 8, 135],
    [75, 3, 161],
    [126, 3, 168],
    [168, 34, 150],
    [204, 71, 120],
    [232, 107, 84],
    [248, 149, 64],
    [252, 194, 36],
    [240, 249, 33],
];

impl Colormap for Plasma {
    fn map_normalized(&self, value: f32) -> [u8; 3] {
        sample_ramp(&PLASMA_STOPS, value)
    }

    fn name(&self) -> &str {
        "plasma"
    }
}

/// Inferno colormap
pub struct Inferno;

const INFERNO_STOPS: [[u8; 3]; 9] = [
    [0, 0, 4],
    [31, 12, 72],
    [85, 15, 109],
    [136, 34, 106],
    [186, 54, 85],
    [227, 89, 51],
    [249, 140, 10],
    [249, 201, 50],
    [252, 255, 164],
];

impl Colormap for Inferno {
    fn map_normalized(&self, value: f32) -> [u8; 3] {
        sample_ramp(&INFERNO_STOPS, value)
    }

    fn name(&self) -> &str {
        "inferno"
    }
}

/// Magma colormap
pub struct Magma;

const MAGMA_STOPS: [[u8; 3]; 9] = [
    [0, 0, 4],
    [28, 16, 68],
    [79, 18, 123],
    [129, 37, 129],
    [181, 54, 122],
    [229, 80, 100],
    [251, 135, 97],
    [254, 194, 135],
    [252, 253, 191],
];

impl Colormap for Magma {
    fn map_normalized(&self, value: f32) -> [u8; 3] {
        sample_ramp(&MAGMA_STOPS, value)
    }

    fn name(&self) -> &str {
        "magma"
    }
}

/// Cividis colormap - colorblind-friendly alternative to viridis
pub struct Cividis;

const CIVIDIS_STOPS: [[u8; 3]; 9] = [
    [0, 32, 76],
    [0, 53, 102],
    [63, 76, 107],
    [97, 99, 111],
    [125, 122, 118],
    [156, 147, 115],
    [190, 173, 103],
    [224, 201, 82],
    [255, 234, 70],
];

impl Colormap for Cividis {
    fn map_normalized(&self, value: f32) -> [u8; 3] {
        sample_ramp(&CIVIDIS_STOPS, value)
    }

    fn name(&self) -> &str {
        "cividis"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colormap_names() {
        assert_eq!(Viridis.name(), "viridis");
        assert_eq!(Plasma.name(), "plasma");
        assert_eq!(Inferno.name(), "inferno");
        assert_eq!(Magma.name(), "magma");
        assert_eq!(Cividis.name(), "cividis");
    }

    #[test]
    fn test_viridis_endpoints() {
        // Dark purple at 0, yellow at 1
        assert_eq!(Viridis.map_normalized(0.0), [68, 1, 84]);
        assert_eq!(Viridis.map_normalized(1.0), [253, 231, 37]);
    }

    #[test]
    fn test_plasma_endpoints() {
        assert_eq!(Plasma.map_normalized(0.0), [13, 8, 135]);
        assert_eq!(Plasma.map_normalized(1.0), [240, 249, 33]);
    }

    #[test]
    fn test_determinism() {
        for i in 0..=20 {
            let t = i as f32 / 20.0;
            assert_eq!(Viridis.map_normalized(t), Viridis.map_normalized(t));
        }
    }
}
