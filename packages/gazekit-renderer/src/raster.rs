use gazekit_core::{Color, RasterSource, RasterStyle, Rasterizer, colors};
use image::{Rgba, RgbaImage, imageops};
use unicode_width::UnicodeWidthStr;

/// Font-free rasterizer. Text becomes one foreground block per display
/// column, bitmaps are resampled to the requested size.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolidRasterizer;

impl SolidRasterizer {
    pub fn new() -> Self {
        Self
    }

    fn text(&self, text: &str, style: &RasterStyle) -> RgbaImage {
        let mut canvas = RgbaImage::from_pixel(
            style.width_px.max(1),
            style.height_px.max(1),
            Rgba(style.background.unwrap_or(colors::TRANSPARENT)),
        );
        paint_progress(&mut canvas, style);

        let columns = text.width() as u32;
        if columns == 0 {
            return canvas;
        }
        let (width, height) = canvas.dimensions();
        let glyph_h = (style.text_size.round() as u32).clamp(1, height);
        let cell_w = (width / columns).max(1);
        let glyph_w = (cell_w * 3 / 4).max(1);
        let top = (height - glyph_h) / 2;
        for column in 0..columns {
            let left = column * cell_w + (cell_w - glyph_w) / 2;
            fill_rect(&mut canvas, left, top, glyph_w, glyph_h, style.foreground);
        }
        canvas
    }

    fn bitmap(&self, source: &RgbaImage, style: &RasterStyle) -> RgbaImage {
        let (width, height) = (style.width_px.max(1), style.height_px.max(1));
        let mut canvas = if source.dimensions() == (width, height) {
            source.clone()
        } else {
            imageops::resize(source, width, height, imageops::FilterType::Nearest)
        };
        if let Some(fill) = style.progress_fill {
            let overlay = RasterStyle {
                progress_fill: Some(fill),
                ..style.clone()
            };
            paint_progress(&mut canvas, &overlay);
        }
        if style.corner_radius > 0.0 {
            round_corners(&mut canvas, style.corner_radius);
        }
        canvas
    }
}

impl Rasterizer for SolidRasterizer {
    fn rasterize(&self, source: RasterSource<'_>, style: &RasterStyle) -> RgbaImage {
        match source {
            RasterSource::Text(text) => self.text(text, style),
            RasterSource::Bitmap(image) => self.bitmap(image, style),
        }
    }
}

/// Tints the bottom `progress_fill` fraction of the canvas with the inverted background.
fn paint_progress(canvas: &mut RgbaImage, style: &RasterStyle) {
    let Some(fill) = style.progress_fill else {
        return;
    };
    let (width, height) = canvas.dimensions();
    let rows = (fill.clamp(0.0, 1.0) * height as f32).round() as u32;
    if rows == 0 {
        return;
    }
    let tint = colors::invert(style.background.unwrap_or(colors::WHITE));
    fill_rect(canvas, 0, height - rows, width, rows, tint);
}

fn fill_rect(canvas: &mut RgbaImage, left: u32, top: u32, width: u32, height: u32, color: Color) {
    let right = (left + width).min(canvas.width());
    let bottom = (top + height).min(canvas.height());
    for y in top..bottom {
        for x in left..right {
            canvas.put_pixel(x, y, Rgba(color));
        }
    }
}

fn round_corners(canvas: &mut RgbaImage, radius: f32) {
    let (width, height) = canvas.dimensions();
    let r = radius.min(width as f32 / 2.0).min(height as f32 / 2.0);
    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let cx = if (x as f32) < r {
            r
        } else if (x as f32) >= width as f32 - r {
            width as f32 - r
        } else {
            continue;
        };
        let cy = if (y as f32) < r {
            r
        } else if (y as f32) >= height as f32 - r {
            height as f32 - r
        } else {
            continue;
        };
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        if dx * dx + dy * dy > r * r {
            pixel.0[3] = 0;
        }
    }
}
