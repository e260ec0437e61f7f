use crate::frame::FrameContext;
use crate::render::{RasterSource, RasterStyle, RenderContext, TextureHandle};
use crate::widget::{Widget, WidgetBase};
use crate::widgets::aspect_ratio;
use image::RgbaImage;

#[derive(Debug)]
pub struct ImageView {
    base: WidgetBase,
    image: RgbaImage,
    texture: Option<TextureHandle>,
    texture_ready: bool,
}

impl ImageView {
    pub fn new(image: RgbaImage) -> Self {
        let mut view = Self {
            base: WidgetBase::new(),
            image,
            texture: None,
            texture_ready: false,
        };
        view.measure();
        view
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn set_image(&mut self, image: RgbaImage) {
        self.image = image;
        self.texture_ready = false;
        self.measure();
    }
}

impl Widget for ImageView {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "ImageView"
    }

    fn measure(&mut self) {
        let aspect = aspect_ratio(self.image.width(), self.image.height());
        self.base.set_size(aspect, 1.0);
    }

    fn update(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        self.base.update_interaction(frame);
        if !self.texture_ready {
            let style = RasterStyle {
                width_px: self.image.width().max(1),
                height_px: self.image.height().max(1),
                background: None,
                ..RasterStyle::for_size(self.base.width(), self.base.height())
            };
            let handle = rcx.upload(RasterSource::Bitmap(&self.image), &style);
            rcx.replace_texture(&mut self.texture, handle);
            self.base.set_texture(self.texture);
            self.texture_ready = true;
        }
        self.base.rebuild_quad_if_invalid();
    }
}
