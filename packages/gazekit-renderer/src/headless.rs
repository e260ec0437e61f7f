use gazekit_core::{DrawCall, Eye, RenderBackend, TextureHandle};
use glam::Mat4;
use image::RgbaImage;
use std::collections::BTreeMap;

/// What one draw call submitted.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub eye: Eye,
    pub texture: TextureHandle,
    pub model: Mat4,
    pub model_view: Mat4,
    pub model_view_projection: Mat4,
    pub vertex_count: usize,
    pub index_count: usize,
}

/// Render backend that keeps textures and draws in memory. Used by tests
/// and the headless demo.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    next_texture: u32,
    textures: BTreeMap<TextureHandle, (u32, u32)>,
    neutral: Option<TextureHandle>,
    draws: Vec<DrawRecord>,
    fail_uploads: bool,
    uploads: usize,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following upload fail.
    pub fn set_fail_uploads(&mut self, fail: bool) {
        self.fail_uploads = fail;
    }

    pub fn draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn take_draws(&mut self) -> Vec<DrawRecord> {
        std::mem::take(&mut self.draws)
    }

    pub fn draws_for(&self, eye: Eye) -> impl Iterator<Item = &DrawRecord> {
        self.draws.iter().filter(move |d| d.eye == eye)
    }

    /// Live textures, excluding the neutral one.
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn texture_size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&handle).copied()
    }

    pub fn upload_count(&self) -> usize {
        self.uploads
    }

    fn allocate(&mut self) -> TextureHandle {
        self.next_texture += 1;
        TextureHandle(self.next_texture)
    }
}

impl RenderBackend for HeadlessRenderer {
    fn upload_texture(&mut self, pixels: &RgbaImage) -> Option<TextureHandle> {
        if self.fail_uploads {
            return None;
        }
        let handle = self.allocate();
        self.textures.insert(handle, (pixels.width(), pixels.height()));
        self.uploads += 1;
        tracing::trace!(texture = handle.0, width = pixels.width(), height = pixels.height(), "texture uploaded");
        Some(handle)
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle).is_none() {
            tracing::warn!(texture = handle.0, "release of unknown texture");
        }
    }

    fn neutral_texture(&mut self) -> TextureHandle {
        match self.neutral {
            Some(handle) => handle,
            None => {
                let handle = self.allocate();
                self.neutral = Some(handle);
                handle
            }
        }
    }

    fn draw(&mut self, call: &DrawCall<'_>) {
        self.draws.push(DrawRecord {
            eye: call.eye,
            texture: call.texture,
            model: call.model,
            model_view: call.model_view,
            model_view_projection: call.model_view_projection,
            vertex_count: call.mesh.vertex_count(),
            index_count: call.mesh.index_count(),
        });
    }
}
