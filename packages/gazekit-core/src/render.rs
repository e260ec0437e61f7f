use crate::frame::Eye;
use crate::geometry::MeshBuffers;
use glam::{Mat4, Vec3};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// RGBA8 color.
pub type Color = [u8; 4];

pub mod colors {
    use super::Color;

    pub const WHITE: Color = [255, 255, 255, 255];
    pub const BLACK: Color = [0, 0, 0, 255];
    pub const LIGHT_GRAY: Color = [204, 204, 204, 255];
    pub const TRANSPARENT: Color = [0, 0, 0, 0];

    /// Inverts RGB and keeps alpha.
    pub fn invert(color: Color) -> Color {
        [255 - color[0], 255 - color[1], 255 - color[2], color[3]]
    }
}

/// Texture resolution per world unit of widget size.
pub const TEXELS_PER_UNIT: f32 = 100.0;

/// Opaque id of a texture owned by the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureHandle(pub u32);

/// One mesh draw for one eye.
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    pub eye: Eye,
    pub mesh: &'a MeshBuffers,
    pub model: Mat4,
    pub model_view: Mat4,
    pub model_view_projection: Mat4,
    pub light_position: Vec3,
    pub texture: TextureHandle,
}

/// GPU resource provider and draw sink.
pub trait RenderBackend {
    /// `None` when the upload failed; callers fall back to the neutral texture.
    fn upload_texture(&mut self, pixels: &RgbaImage) -> Option<TextureHandle>;

    fn release_texture(&mut self, handle: TextureHandle) {
        let _ = handle;
    }

    /// The shared 1x1 neutral texture.
    fn neutral_texture(&mut self) -> TextureHandle;

    fn draw(&mut self, call: &DrawCall<'_>);
}

pub enum RasterSource<'a> {
    Text(&'a str),
    Bitmap(&'a RgbaImage),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RasterStyle {
    pub width_px: u32,
    pub height_px: u32,
    pub foreground: Color,
    pub background: Option<Color>,
    pub text_size: f32,
    /// Fraction of the height, from the bottom, painted with the hover fill.
    pub progress_fill: Option<f32>,
    pub corner_radius: f32,
}

impl RasterStyle {
    pub fn for_size(width: f32, height: f32) -> Self {
        Self {
            width_px: texels(width),
            height_px: texels(height),
            foreground: colors::BLACK,
            background: Some(colors::WHITE),
            text_size: 60.0,
            progress_fill: None,
            corner_radius: 0.0,
        }
    }
}

fn texels(units: f32) -> u32 {
    (units * TEXELS_PER_UNIT).round().max(1.0) as u32
}

/// Turns text or bitmaps into pixels.
pub trait Rasterizer {
    fn rasterize(&self, source: RasterSource<'_>, style: &RasterStyle) -> RgbaImage;
}

/// Backend handles threaded through `update` and `draw`.
pub struct RenderContext<'a> {
    pub renderer: &'a mut dyn RenderBackend,
    pub rasterizer: &'a dyn Rasterizer,
}

impl<'a> RenderContext<'a> {
    pub fn new(renderer: &'a mut dyn RenderBackend, rasterizer: &'a dyn Rasterizer) -> Self {
        Self { renderer, rasterizer }
    }

    /// Rasterizes and uploads in one step. A failed upload is logged and yields `None`.
    pub fn upload(&mut self, source: RasterSource<'_>, style: &RasterStyle) -> Option<TextureHandle> {
        let pixels = self.rasterizer.rasterize(source, style);
        let handle = self.renderer.upload_texture(&pixels);
        if handle.is_none() {
            tracing::warn!(
                width = pixels.width(),
                height = pixels.height(),
                "texture upload failed, using neutral texture"
            );
        }
        handle
    }

    /// Swaps `slot` to `next`, releasing the texture it held.
    pub fn replace_texture(&mut self, slot: &mut Option<TextureHandle>, next: Option<TextureHandle>) {
        if let Some(old) = std::mem::replace(slot, next) {
            if Some(old) != next {
                self.renderer.release_texture(old);
            }
        }
    }
}
