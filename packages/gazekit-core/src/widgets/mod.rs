mod button;
mod image_view;
mod mesh;
mod text;

pub use button::{Button, ButtonFace, HOVER_REFRESH_FRAMES};
pub use image_view::ImageView;
pub use mesh::MeshWidget;
pub use text::{GLYPH_ASPECT, TextLabel};

/// Width over height of an image, or 1.0 for an empty one.
pub(crate) fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 { 1.0 } else { width as f32 / height as f32 }
}
