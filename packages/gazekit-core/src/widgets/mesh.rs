use crate::frame::FrameContext;
use crate::geometry::Geometry;
use crate::render::RenderContext;
use crate::widget::{Widget, WidgetBase};

/// Arbitrary geometry, typically an imported model. Drawn with the neutral texture.
#[derive(Debug)]
pub struct MeshWidget {
    base: WidgetBase,
}

impl MeshWidget {
    pub fn new(geometry: Geometry) -> Self {
        let mut base = WidgetBase::new();
        base.set_geometry(geometry);
        let mut widget = Self { base };
        widget.measure();
        widget
    }
}

impl Widget for MeshWidget {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "MeshWidget"
    }

    fn measure(&mut self) {
        let Some((min, max)) = self.base.geometry().bounds() else {
            return;
        };
        let extent = max - min;
        self.base.set_size(extent.x, extent.y);
        self.base.set_depth(extent.z);
    }

    fn update(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        let _ = rcx;
        self.base.update_interaction(frame);
        if !self.base.is_valid() {
            if let Err(err) = self.base.build_buffers() {
                tracing::warn!(widget = %self.base.id(), error = %err, "mesh geometry rejected");
            }
        }
    }
}
