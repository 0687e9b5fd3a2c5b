//! Masked colormap overlay rendering.
//!
//! Turns a 2-D scalar field plus a validity mask into an RGBA PNG suitable
//! for anchoring to a geographic bounding box on the viewer map. The output
//! image has the grid's dimensions; row order is reversed because array
//! row 0 is the top of the grid while the map overlay anchor treats row 0
//! as the bottom.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use bytes::Bytes;
use image::{ImageBuffer, Rgba, RgbaImage};
use ndarray::ArrayView2;

use crate::colormaps::get_colormap;
use crate::error::{AnvilError, Result};

/// A finished overlay: encoded PNG plus the value range it was normalized to.
///
/// The resolved range is returned even when the caller supplied one
/// explicitly, so a matching legend can always be built from it.
#[derive(Debug, Clone)]
pub struct RenderedOverlay {
    /// PNG-encoded RGBA image, same dimensions as the input grid
    pub png: Bytes,
    /// Lower bound of the color scale
    pub min: f32,
    /// Upper bound of the color scale
    pub max: f32,
}

impl RenderedOverlay {
    /// Wrap the PNG bytes as a `data:` URI for direct embedding in markup.
    pub fn to_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", BASE64.encode(&self.png))
    }
}

/// Render a masked, color-mapped overlay image.
///
/// NaN grid values are treated as zero. Cells where `mask` is false are fully
/// transparent; cells where it is true carry `alpha`. When `range` is `None`
/// the scale bounds come from the grid values at masked-true cells, or (0, 1)
/// if no cell is masked-true. Inputs are borrowed views and never mutated.
pub fn render_overlay(
    grid: ArrayView2<'_, f32>,
    mask: ArrayView2<'_, bool>,
    palette: &str,
    range: Option<(f32, f32)>,
    alpha: f32,
) -> Result<RenderedOverlay> {
    let (rows, cols) = grid.dim();
    let (mask_rows, mask_cols) = mask.dim();

    if (rows, cols) != (mask_rows, mask_cols) {
        return Err(AnvilError::ShapeMismatch {
            grid_rows: rows,
            grid_cols: cols,
            mask_rows,
            mask_cols,
        });
    }
    if rows == 0 || cols == 0 {
        return Err(AnvilError::InvalidParameter {
            param: "grid".to_string(),
            message: "grid must be non-empty".to_string(),
        });
    }
    if !(0.0..=1.0).contains(&alpha) {
        return Err(AnvilError::InvalidParameter {
            param: "alpha".to_string(),
            message: format!("opacity must be in [0, 1], got {}", alpha),
        });
    }

    let colormap = get_colormap(palette)?;

    let (min_val, max_val) = resolve_range(grid, mask, range);
    let alpha_byte = (alpha * 255.0).round() as u8;

    let mut img: RgbaImage = ImageBuffer::new(cols as u32, rows as u32);

    for y in 0..rows {
        // Vertical flip: image row 0 takes the last array row
        let src_row = rows - 1 - y;
        for x in 0..cols {
            let raw = grid[[src_row, x]];
            let value = if raw.is_nan() { 0.0 } else { raw };
            let [r, g, b] = colormap.map(value, min_val, max_val);
            let a = if mask[[src_row, x]] { alpha_byte } else { 0 };
            img.put_pixel(x as u32, y as u32, Rgba([r, g, b, a]));
        }
    }

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| AnvilError::ImageEncoding {
            message: format!("Failed to encode PNG: {}", e),
        })?;

    Ok(RenderedOverlay {
        png: Bytes::from(buffer.into_inner()),
        min: min_val,
        max: max_val,
    })
}

/// Resolve the color scale bounds.
///
/// An explicit range wins. Otherwise the bounds are the min/max of grid
/// values at masked-true cells (NaN counted as zero, matching the color
/// mapping), or (0, 1) when the mask has no true cell.
fn resolve_range(
    grid: ArrayView2<'_, f32>,
    mask: ArrayView2<'_, bool>,
    range: Option<(f32, f32)>,
) -> (f32, f32) {
    if let Some((min, max)) = range {
        return (min, max);
    }

    let mut min_val = f32::INFINITY;
    let mut max_val = f32::NEG_INFINITY;
    let mut any = false;

    for (&value, &valid) in grid.iter().zip(mask.iter()) {
        if !valid {
            continue;
        }
        let v = if value.is_nan() { 0.0 } else { value };
        min_val = min_val.min(v);
        max_val = max_val.max(v);
        any = true;
    }

    if any {
        (min_val, max_val)
    } else {
        (0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colormaps;
    use ndarray::{array, s, Array2};
    use pretty_assertions::assert_eq;

    fn decode(overlay: &RenderedOverlay) -> RgbaImage {
        image::load_from_memory(&overlay.png)
            .expect("output must be a decodable PNG")
            .to_rgba8()
    }

    #[test]
    fn test_resolved_range_from_masked_cells() {
        let grid = array![[5.0_f32, -5.0], [0.0, 10.0]];
        let mask = array![[true, false], [true, true]];

        let overlay = render_overlay(grid.view(), mask.view(), "plasma", None, 1.0).unwrap();

        // Masked-true values are 5, 0, 10; the -5 is masked out
        assert_eq!(overlay.min, 0.0);
        assert_eq!(overlay.max, 10.0);
    }

    #[test]
    fn test_spec_example_pixels() {
        let grid = array![[5.0_f32, -5.0], [0.0, 10.0]];
        let mask = array![[true, false], [true, true]];

        let overlay = render_overlay(grid.view(), mask.view(), "plasma", None, 1.0).unwrap();
        let img = decode(&overlay);
        let cmap = colormaps::get_colormap("plasma").unwrap();

        // After the flip, array row 1 is image row 0
        let bottom_of_grid = |x: u32| img.get_pixel(x, 0).0;
        let top_of_grid = |x: u32| img.get_pixel(x, 1).0;

        let expect = |t: f32| cmap.map_normalized(t);
        assert_eq!(&bottom_of_grid(0)[..3], &expect(0.0)); // value 0
        assert_eq!(&bottom_of_grid(1)[..3], &expect(1.0)); // value 10
        assert_eq!(&top_of_grid(0)[..3], &expect(0.5)); // value 5

        // Masked-false cell is fully transparent regardless of its value
        assert_eq!(top_of_grid(1)[3], 0);
        // Masked-true cells carry the requested opacity
        assert_eq!(bottom_of_grid(0)[3], 255);
        assert_eq!(bottom_of_grid(1)[3], 255);
        assert_eq!(top_of_grid(0)[3], 255);
    }

    #[test]
    fn test_empty_mask_defaults_range() {
        let grid = array![[100.0_f32, 200.0], [300.0, 400.0]];
        let mask = Array2::from_elem((2, 2), false);

        let overlay = render_overlay(grid.view(), mask.view(), "viridis", None, 0.8).unwrap();
        assert_eq!((overlay.min, overlay.max), (0.0, 1.0));

        // Everything transparent
        let img = decode(&overlay);
        assert!(img.pixels().all(|p| p.0[3] == 0));
    }

    #[test]
    fn test_explicit_range_is_echoed() {
        let grid = array![[1.0_f32, 2.0], [3.0, 4.0]];
        let mask = Array2::from_elem((2, 2), true);

        let overlay =
            render_overlay(grid.view(), mask.view(), "viridis", Some((-10.0, 10.0)), 1.0).unwrap();
        assert_eq!((overlay.min, overlay.max), (-10.0, 10.0));
    }

    #[test]
    fn test_partial_alpha_applied() {
        let grid = array![[0.0_f32, 1.0]];
        let mask = array![[true, false]];

        let overlay = render_overlay(grid.view(), mask.view(), "viridis", None, 0.5).unwrap();
        let img = decode(&overlay);

        assert_eq!(img.get_pixel(0, 0).0[3], 128);
        assert_eq!(img.get_pixel(1, 0).0[3], 0);
    }

    #[test]
    fn test_nan_treated_as_zero() {
        let grid = array![[f32::NAN, 4.0], [-2.0, 2.0]];
        let mask = Array2::from_elem((2, 2), true);

        let overlay = render_overlay(grid.view(), mask.view(), "viridis", None, 1.0).unwrap();
        // NaN counts as 0 for the range too: masked values are 0, 4, -2, 2
        assert_eq!((overlay.min, overlay.max), (-2.0, 4.0));

        let img = decode(&overlay);
        let cmap = colormaps::get_colormap("viridis").unwrap();
        // The NaN cell (array row 0, col 0 -> image row 1) renders as value 0
        let expected = cmap.map(0.0, -2.0, 4.0);
        assert_eq!(&img.get_pixel(0, 1).0[..3], &expected);
    }

    #[test]
    fn test_degenerate_range() {
        let grid = Array2::from_elem((3, 3), 7.0_f32);
        let mask = Array2::from_elem((3, 3), true);

        let overlay = render_overlay(grid.view(), mask.view(), "plasma", None, 1.0).unwrap();
        assert_eq!((overlay.min, overlay.max), (7.0, 7.0));

        let img = decode(&overlay);
        let cmap = colormaps::get_colormap("plasma").unwrap();
        let start = cmap.map_normalized(0.0);
        assert!(img.pixels().all(|p| p.0[..3] == start && p.0[3] == 255));
    }

    #[test]
    fn test_vertical_flip_orientation() {
        // Row 0 of the array must land at the bottom of the image
        let grid = array![[1.0_f32, 1.0], [0.0, 0.0]];
        let mask = Array2::from_elem((2, 2), true);

        let overlay = render_overlay(grid.view(), mask.view(), "viridis", None, 1.0).unwrap();
        let img = decode(&overlay);
        let cmap = colormaps::get_colormap("viridis").unwrap();

        assert_eq!(&img.get_pixel(0, 0).0[..3], &cmap.map_normalized(0.0)); // array row 1
        assert_eq!(&img.get_pixel(0, 1).0[..3], &cmap.map_normalized(1.0)); // array row 0
    }

    #[test]
    fn test_flip_is_an_involution() {
        let grid = array![[0.0_f32, 1.0], [2.0, 3.0], [4.0, 5.0]];
        let mask = Array2::from_elem((3, 2), true);

        let straight =
            render_overlay(grid.view(), mask.view(), "viridis", Some((0.0, 5.0)), 1.0).unwrap();
        // Rendering an already row-reversed view mirrors the image vertically,
        // so reversing twice round-trips to the original pixel rows.
        let reversed = grid.slice(s![..;-1, ..]);
        let flipped =
            render_overlay(reversed, mask.view(), "viridis", Some((0.0, 5.0)), 1.0).unwrap();

        let a = decode(&straight);
        let b = decode(&flipped);
        for y in 0..3u32 {
            for x in 0..2u32 {
                assert_eq!(a.get_pixel(x, y), b.get_pixel(x, 2 - y));
            }
        }
    }

    #[test]
    fn test_inputs_not_mutated() {
        let grid = array![[f32::NAN, 1.0], [2.0, 3.0]];
        let mask = array![[true, true], [false, true]];
        let grid_before = grid.clone();
        let mask_before = mask.clone();

        render_overlay(grid.view(), mask.view(), "viridis", None, 1.0).unwrap();

        assert!(grid[[0, 0]].is_nan() && grid_before[[0, 0]].is_nan());
        assert_eq!(grid.slice(s![.., 1..]), grid_before.slice(s![.., 1..]));
        assert_eq!(mask, mask_before);
    }

    #[test]
    fn test_shape_mismatch() {
        let grid = Array2::from_elem((2, 3), 0.0_f32);
        let mask = Array2::from_elem((3, 2), true);

        let err = render_overlay(grid.view(), mask.view(), "viridis", None, 1.0).unwrap_err();
        assert!(matches!(err, AnvilError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_unknown_palette() {
        let grid = Array2::from_elem((2, 2), 0.0_f32);
        let mask = Array2::from_elem((2, 2), true);

        let err = render_overlay(grid.view(), mask.view(), "not_a_palette", None, 1.0).unwrap_err();
        assert!(matches!(err, AnvilError::UnknownPalette { .. }));
    }

    #[test]
    fn test_alpha_out_of_range_rejected() {
        let grid = Array2::from_elem((2, 2), 0.0_f32);
        let mask = Array2::from_elem((2, 2), true);

        for bad in [-0.1, 1.5, f32::NAN] {
            let err = render_overlay(grid.view(), mask.view(), "viridis", None, bad).unwrap_err();
            assert!(matches!(err, AnvilError::InvalidParameter { .. }));
        }
    }

    #[test]
    fn test_data_uri_wrapper() {
        let grid = array![[0.0_f32]];
        let mask = array![[true]];

        let overlay = render_overlay(grid.view(), mask.view(), "viridis", None, 1.0).unwrap();
        let uri = overlay.to_data_uri();
        assert!(uri.starts_with("data:image/png;base64,"));

        let encoded = uri.strip_prefix("data:image/png;base64,").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        assert_eq!(decoded, overlay.png.to_vec());
    }
}
