use crate::frame::FrameContext;
use crate::render::{Color, RasterSource, RasterStyle, RenderContext, TextureHandle, colors};
use crate::widget::{Widget, WidgetBase};
use crate::widgets::aspect_ratio;
use crate::widgets::text::GLYPH_ASPECT;
use image::RgbaImage;
use unicode_width::UnicodeWidthStr;

/// Frames between hover texture refreshes while a dwell is in progress.
pub const HOVER_REFRESH_FRAMES: u32 = 7;

const IMAGE_CORNER_RADIUS: f32 = 10.0;

#[derive(Debug, Clone)]
pub enum ButtonFace {
    Text(String),
    Image(RgbaImage),
}

/// Clickable text or image with a distinct hover texture. In focus mode the
/// hover texture shows the dwell progress.
#[derive(Debug)]
pub struct Button {
    base: WidgetBase,
    face: ButtonFace,
    text_color: Color,
    background: Color,
    text_size: f32,
    normal: Option<TextureHandle>,
    hover: Option<TextureHandle>,
    textures_ready: bool,
    hover_shows_progress: bool,
    frames_since_refresh: u32,
}

impl Button {
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_face(ButtonFace::Text(text.into()))
    }

    pub fn image(image: RgbaImage) -> Self {
        Self::with_face(ButtonFace::Image(image))
    }

    pub fn with_face(face: ButtonFace) -> Self {
        let mut button = Self {
            base: WidgetBase::new(),
            face,
            text_color: colors::BLACK,
            background: colors::WHITE,
            text_size: 60.0,
            normal: None,
            hover: None,
            textures_ready: false,
            hover_shows_progress: false,
            frames_since_refresh: 0,
        };
        button.measure();
        button
    }

    pub fn face(&self) -> &ButtonFace {
        &self.face
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.face = ButtonFace::Text(text.into());
        self.textures_ready = false;
        self.measure();
    }

    pub fn set_image(&mut self, image: RgbaImage) {
        self.face = ButtonFace::Image(image);
        self.textures_ready = false;
        self.measure();
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
        self.textures_ready = false;
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
        self.textures_ready = false;
    }

    pub fn set_text_size(&mut self, size: f32) {
        self.text_size = size;
        self.textures_ready = false;
    }

    pub fn normal_texture(&self) -> Option<TextureHandle> {
        self.normal
    }

    pub fn hover_texture(&self) -> Option<TextureHandle> {
        self.hover
    }

    fn style(&self, hovered: bool, progress: Option<f32>) -> RasterStyle {
        let (foreground, background) = if hovered {
            (colors::invert(self.text_color), colors::LIGHT_GRAY)
        } else {
            (self.text_color, self.background)
        };
        let corner_radius = match self.face {
            ButtonFace::Image(_) => IMAGE_CORNER_RADIUS,
            ButtonFace::Text(_) => 0.0,
        };
        RasterStyle {
            foreground,
            background: Some(background),
            text_size: self.text_size,
            progress_fill: progress,
            corner_radius,
            ..RasterStyle::for_size(self.base.width(), self.base.height())
        }
    }

    fn rasterize(&self, rcx: &mut RenderContext<'_>, style: &RasterStyle) -> Option<TextureHandle> {
        let source = match &self.face {
            ButtonFace::Text(text) => RasterSource::Text(text),
            ButtonFace::Image(image) => RasterSource::Bitmap(image),
        };
        rcx.upload(source, style)
    }

    fn create_normal_texture(&mut self, rcx: &mut RenderContext<'_>) {
        let style = self.style(false, None);
        let handle = self.rasterize(rcx, &style);
        rcx.replace_texture(&mut self.normal, handle);
    }

    fn create_hover_texture(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        let dwelling = frame.focus_mode && self.base.is_focus_mode_focusable();
        let progress = dwelling.then(|| self.base.dwell_progress(frame.dwell_threshold()));
        let style = self.style(true, progress);
        let handle = self.rasterize(rcx, &style);
        rcx.replace_texture(&mut self.hover, handle);
        self.hover_shows_progress = dwelling;
        self.frames_since_refresh = 0;
    }
}

impl Widget for Button {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "Button"
    }

    fn measure(&mut self) {
        let width = match &self.face {
            ButtonFace::Text(text) => text.width().max(1) as f32 * GLYPH_ASPECT,
            ButtonFace::Image(image) => aspect_ratio(image.width(), image.height()),
        };
        self.base.set_size(width, 1.0);
    }

    fn update(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        if !self.textures_ready {
            self.create_normal_texture(rcx);
            self.create_hover_texture(frame, rcx);
            self.textures_ready = true;
        }

        self.base.update_interaction(frame);

        if self.base.is_hovering() {
            let dwelling = frame.focus_mode && self.base.is_focus_mode_focusable();
            if dwelling {
                self.frames_since_refresh += 1;
                if self.frames_since_refresh >= HOVER_REFRESH_FRAMES {
                    self.create_hover_texture(frame, rcx);
                }
            } else if self.hover_shows_progress {
                self.create_hover_texture(frame, rcx);
            }
            self.base.set_texture(self.hover);
        } else {
            self.base.set_texture(self.normal);
        }

        self.base.rebuild_quad_if_invalid();
    }
}
