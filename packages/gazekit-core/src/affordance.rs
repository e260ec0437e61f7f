use crate::frame::{Eye, FrameContext};
use crate::render::RenderContext;
use crate::widget::{Widget, WidgetBase};
use crate::widgets::Button;
use glam::{Vec2, Vec3};

/// Affordances sit slightly in front of the items.
pub(crate) const AFFORDANCE_LIFT: f32 = 0.1;

/// The pair of scroll buttons framing a virtualized view: `before` scrolls
/// toward earlier items, `after` toward later ones.
#[derive(Debug, Default)]
pub(crate) struct Affordances {
    pub(crate) before: Option<Button>,
    pub(crate) after: Option<Button>,
}

impl Affordances {
    /// Builds a gaze-only scroll button at world position `at`. Dwell is
    /// disabled since it acts on hover alone.
    pub(crate) fn build(
        label: String,
        size: (f32, f32),
        scale: Vec3,
        at: Vec3,
        on_look_at: impl FnMut(&mut WidgetBase, Vec2) + 'static,
    ) -> Button {
        let mut button = Button::text(label);
        button.base_mut().set_size(size.0, size.1);
        button.base_mut().set_focus_mode_focusable(false);
        button.scale(scale.x, scale.y, scale.z);
        button.base_mut().place_at(at);
        button.base_mut().set_on_look_at_listener(on_look_at, |_| {});
        button
    }

    pub(crate) fn update(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        for button in [self.before.as_mut(), self.after.as_mut()].into_iter().flatten() {
            button.update(frame, rcx);
        }
    }

    pub(crate) fn draw_before(&mut self, frame: &FrameContext, eye: Eye, rcx: &mut RenderContext<'_>) {
        if let Some(button) = self.before.as_mut() {
            button.draw(frame, eye, rcx);
        }
    }

    pub(crate) fn draw_after(&mut self, frame: &FrameContext, eye: Eye, rcx: &mut RenderContext<'_>) {
        if let Some(button) = self.after.as_mut() {
            button.draw(frame, eye, rcx);
        }
    }
}
