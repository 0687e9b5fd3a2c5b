//! Color-scale legend rendering.
//!
//! Produces the small horizontal strip shown in the viewer sidebar: the
//! palette ramp, tick marks with numeric labels across [min, max], and a
//! caption underneath. Uses the same `get_colormap` lookup as the overlay
//! renderer so legend and overlay agree exactly on color for any value.

use std::io::Cursor;

use bytes::Bytes;
use image::{ImageBuffer, Rgba, RgbaImage};

use crate::colormaps::get_colormap;
use crate::error::{AnvilError, Result};
use crate::render::font::{draw_text, text_width, CHAR_H};

/// Overall legend canvas, wide and short for a sidebar
pub const LEGEND_WIDTH: u32 = 420;
pub const LEGEND_HEIGHT: u32 = 90;

/// Horizontal margin either side of the ramp strip
const MARGIN_X: u32 = 18;
/// Ramp strip placement
const STRIP_TOP: u32 = 10;
const STRIP_HEIGHT: u32 = 26;
/// Tick geometry
const TICK_COUNT: u32 = 5;
const TICK_LENGTH: u32 = 5;

const BACKGROUND: [u8; 3] = [255, 255, 255];
const FRAME: [u8; 3] = [96, 96, 96];
const TEXT: [u8; 3] = [40, 40, 40];

/// Render a horizontal color-scale strip annotated with tick labels and a
/// caption.
///
/// `min > max` is permitted: the ramp still runs left to right while the tick
/// labels descend, which reads as a reversed scale.
pub fn render_legend(palette: &str, min: f32, max: f32, label: &str) -> Result<Bytes> {
    let colormap = get_colormap(palette)?;

    let mut img: RgbaImage = ImageBuffer::from_pixel(
        LEGEND_WIDTH,
        LEGEND_HEIGHT,
        Rgba([BACKGROUND[0], BACKGROUND[1], BACKGROUND[2], 255]),
    );

    let strip_width = LEGEND_WIDTH - 2 * MARGIN_X;

    // Ramp strip, left-to-right over the overlay's normalization
    for dx in 0..strip_width {
        let t = dx as f32 / (strip_width - 1) as f32;
        let [r, g, b] = colormap.map_normalized(t);
        for dy in 0..STRIP_HEIGHT {
            img.put_pixel(MARGIN_X + dx, STRIP_TOP + dy, Rgba([r, g, b, 255]));
        }
    }

    // One-pixel frame around the strip
    for dx in 0..strip_width {
        put_rgb(&mut img, MARGIN_X + dx, STRIP_TOP, FRAME);
        put_rgb(&mut img, MARGIN_X + dx, STRIP_TOP + STRIP_HEIGHT - 1, FRAME);
    }
    for dy in 0..STRIP_HEIGHT {
        put_rgb(&mut img, MARGIN_X, STRIP_TOP + dy, FRAME);
        put_rgb(&mut img, MARGIN_X + strip_width - 1, STRIP_TOP + dy, FRAME);
    }

    // Ticks and numeric labels spanning [min, max]
    let tick_y = STRIP_TOP + STRIP_HEIGHT;
    let label_y = tick_y + TICK_LENGTH + 2;
    for i in 0..TICK_COUNT {
        let frac = i as f32 / (TICK_COUNT - 1) as f32;
        let x = MARGIN_X + (frac * (strip_width - 1) as f32).round() as u32;
        for dy in 0..TICK_LENGTH {
            put_rgb(&mut img, x, tick_y + dy, FRAME);
        }

        let value = min + frac * (max - min);
        let text = format_tick(value);
        let half = text_width(&text) / 2;
        let tx = x.saturating_sub(half).min(LEGEND_WIDTH - text_width(&text));
        draw_text(&mut img, tx, label_y, &text, TEXT);
    }

    // Caption centered under the ticks
    let caption_y = label_y + CHAR_H + 4;
    let cx = (LEGEND_WIDTH.saturating_sub(text_width(label))) / 2;
    draw_text(&mut img, cx, caption_y, label, TEXT);

    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| AnvilError::ImageEncoding {
            message: format!("Failed to encode legend PNG: {}", e),
        })?;

    Ok(Bytes::from(buffer.into_inner()))
}

fn put_rgb(img: &mut RgbaImage, x: u32, y: u32, color: [u8; 3]) {
    if x < img.width() && y < img.height() {
        img.put_pixel(x, y, Rgba([color[0], color[1], color[2], 255]));
    }
}

/// Compact tick label: integers without decimals, otherwise one decimal place.
fn format_tick(v: f32) -> String {
    if v.fract().abs() < 0.05 && v.abs() < 1e6 {
        format!("{}", v.round() as i64)
    } else {
        format!("{:.1}", v)
    }
}
