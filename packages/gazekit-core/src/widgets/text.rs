use crate::frame::FrameContext;
use crate::render::{Color, RasterSource, RasterStyle, RenderContext, TextureHandle, colors};
use crate::widget::{Widget, WidgetBase};
use unicode_width::UnicodeWidthStr;

/// Width of one terminal column of text relative to the line height.
pub const GLYPH_ASPECT: f32 = 0.55;

const TEXT_SIZE: f32 = 90.0;

/// A line of text on a solid background.
#[derive(Debug)]
pub struct TextLabel {
    base: WidgetBase,
    text: String,
    background: Color,
    text_color: Color,
    texture: Option<TextureHandle>,
    texture_ready: bool,
}

impl TextLabel {
    pub fn new(text: impl Into<String>) -> Self {
        let mut label = Self {
            base: WidgetBase::new(),
            text: text.into(),
            background: colors::WHITE,
            text_color: colors::BLACK,
            texture: None,
            texture_ready: false,
        };
        label.measure();
        label
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.texture_ready = false;
        self.measure();
    }

    pub fn set_background_color(&mut self, color: Color) {
        self.background = color;
        self.texture_ready = false;
    }

    pub fn set_text_color(&mut self, color: Color) {
        self.text_color = color;
        self.texture_ready = false;
    }

    /// Shifts the label left by half its width.
    pub fn align_to_center(&mut self) {
        let half = self.base.width() / 2.0;
        self.base.translate(-half, 0.0, 0.0);
    }

    fn create_texture(&mut self, rcx: &mut RenderContext<'_>) {
        let style = RasterStyle {
            foreground: self.text_color,
            background: Some(self.background),
            text_size: TEXT_SIZE,
            ..RasterStyle::for_size(self.base.width(), self.base.height())
        };
        let handle = rcx.upload(RasterSource::Text(&self.text), &style);
        rcx.replace_texture(&mut self.texture, handle);
        self.base.set_texture(self.texture);
        self.texture_ready = true;
    }
}

impl Widget for TextLabel {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "TextLabel"
    }

    fn measure(&mut self) {
        let columns = self.text.width().max(1);
        self.base.set_size(columns as f32 * GLYPH_ASPECT, 1.0);
    }

    fn update(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        self.base.update_interaction(frame);
        if !self.texture_ready {
            self.create_texture(rcx);
        }
        self.base.rebuild_quad_if_invalid();
    }
}
