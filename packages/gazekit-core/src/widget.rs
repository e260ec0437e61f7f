use crate::error::GeometryError;
use crate::frame::{Eye, FrameContext};
use crate::geometry::{Geometry, MeshBuffers};
use crate::render::{DrawCall, RenderBackend, RenderContext, TextureHandle};
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Layout moves smaller than this are skipped.
pub const POSITION_EPSILON: f32 = 0.001;

static WIDGET_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique widget identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WidgetId(u64);

impl WidgetId {
    pub fn new() -> Self {
        Self(WIDGET_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl Default for WidgetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub type LookAtCallback = Box<dyn FnMut(&mut WidgetBase, Vec2)>;
pub type HoverExitCallback = Box<dyn FnMut(&mut WidgetBase)>;
pub type TriggerCallback = Box<dyn FnMut(&mut WidgetBase)>;

/// Focus-mode dwell timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DwellState {
    #[default]
    Idle,
    Dwelling {
        since: Duration,
        elapsed: Duration,
    },
    /// Triggered during the current hover; re-arms on hover exit.
    Fired,
}

/// State shared by every widget: transform, size, geometry, textures and
/// gaze interaction.
pub struct WidgetBase {
    id: WidgetId,
    model: Mat4,
    position: Vec3,
    scale: Vec3,
    size: Vec3,
    valid: bool,
    geometry: Geometry,
    buffers: Option<MeshBuffers>,
    texture: Option<TextureHandle>,
    looking_at: bool,
    visible: bool,
    clickable: bool,
    focus_mode_focusable: bool,
    pending_trigger: bool,
    dwell: DwellState,
    on_look_at: Option<LookAtCallback>,
    on_hover_exit: Option<HoverExitCallback>,
    on_trigger: Option<TriggerCallback>,
}

impl fmt::Debug for WidgetBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetBase")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("scale", &self.scale)
            .field("size", &self.size)
            .field("valid", &self.valid)
            .field("looking_at", &self.looking_at)
            .field("visible", &self.visible)
            .field("dwell", &self.dwell)
            .finish_non_exhaustive()
    }
}

impl Default for WidgetBase {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetBase {
    pub fn new() -> Self {
        Self {
            id: WidgetId::new(),
            model: Mat4::IDENTITY,
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            size: Vec3::ZERO,
            valid: false,
            geometry: Geometry::default(),
            buffers: None,
            texture: None,
            looking_at: false,
            visible: true,
            clickable: true,
            focus_mode_focusable: true,
            pending_trigger: false,
            dwell: DwellState::Idle,
            on_look_at: None,
            on_hover_exit: None,
            on_trigger: None,
        }
    }

    pub fn id(&self) -> WidgetId {
        self.id
    }

    // Transform

    pub fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        let delta = Vec3::new(dx, dy, dz);
        self.position += delta;
        self.model *= Mat4::from_translation(delta);
    }

    pub fn scale(&mut self, sx: f32, sy: f32, sz: f32) {
        let factor = Vec3::new(sx, sy, sz);
        self.scale *= factor;
        self.model *= Mat4::from_scale(factor);
    }

    pub fn model(&self) -> Mat4 {
        self.model
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn scale_factors(&self) -> Vec3 {
        self.scale
    }

    /// Lower-left-near corner in world units.
    pub fn world_origin(&self) -> Vec3 {
        self.position * self.scale
    }

    /// Width, height and depth in world units.
    pub fn world_size(&self) -> Vec3 {
        self.size * self.scale
    }

    /// Moves the widget so its world origin lands on `target`. Per-axis
    /// deltas under `POSITION_EPSILON` are ignored.
    pub fn place_at(&mut self, target: Vec3) {
        let delta = target - self.world_origin();
        if delta.x.abs() <= POSITION_EPSILON && delta.y.abs() <= POSITION_EPSILON && delta.z.abs() <= POSITION_EPSILON {
            return;
        }
        let local = Vec3::new(
            unscale(delta.x, self.scale.x),
            unscale(delta.y, self.scale.y),
            unscale(delta.z, self.scale.z),
        );
        self.translate(local.x, local.y, local.z);
    }

    // Size

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn depth(&self) -> f32 {
        self.size.z
    }

    pub fn set_width(&mut self, width: f32) {
        self.size.x = width;
        self.valid = false;
    }

    pub fn set_height(&mut self, height: f32) {
        self.size.y = height;
        self.valid = false;
    }

    pub fn set_depth(&mut self, depth: f32) {
        self.size.z = depth;
        self.valid = false;
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.size.x = width;
        self.size.y = height;
        self.valid = false;
    }

    // Geometry

    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = geometry;
        self.valid = false;
    }

    /// Rebuilds the mesh buffers from the current geometry and marks the
    /// widget valid. On error the previous buffers stay in place.
    pub fn build_buffers(&mut self) -> Result<(), GeometryError> {
        let buffers = MeshBuffers::build(&self.geometry)?;
        self.buffers = Some(buffers);
        self.valid = true;
        Ok(())
    }

    /// Replaces the geometry with a quad matching the current size if the
    /// widget is invalid.
    pub fn rebuild_quad_if_invalid(&mut self) {
        if self.valid {
            return;
        }
        self.geometry = Geometry::quad(self.size.x, self.size.y);
        if let Err(err) = self.build_buffers() {
            tracing::warn!(widget = %self.id, error = %err, "quad geometry rejected");
        }
    }

    pub fn buffers(&self) -> Option<&MeshBuffers> {
        self.buffers.as_ref()
    }

    pub fn texture(&self) -> Option<TextureHandle> {
        self.texture
    }

    pub fn set_texture(&mut self, texture: Option<TextureHandle>) {
        self.texture = texture;
    }

    // Flags

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn is_clickable(&self) -> bool {
        self.clickable
    }

    pub fn set_clickable(&mut self, clickable: bool) {
        self.clickable = clickable;
    }

    pub fn is_focus_mode_focusable(&self) -> bool {
        self.focus_mode_focusable
    }

    pub fn set_focus_mode_focusable(&mut self, focusable: bool) {
        self.focus_mode_focusable = focusable;
    }

    pub fn is_hovering(&self) -> bool {
        self.looking_at
    }

    pub fn has_pending_trigger(&self) -> bool {
        self.pending_trigger
    }

    pub fn dwell_state(&self) -> DwellState {
        self.dwell
    }

    /// Linear dwell progress in `[0, 1]`.
    pub fn dwell_progress(&self, threshold: Duration) -> f32 {
        match self.dwell {
            DwellState::Idle => 0.0,
            DwellState::Fired => 1.0,
            DwellState::Dwelling { elapsed, .. } => {
                if threshold.is_zero() {
                    1.0
                } else {
                    (elapsed.as_secs_f32() / threshold.as_secs_f32()).clamp(0.0, 1.0)
                }
            }
        }
    }

    // Listeners

    pub fn set_on_look_at_listener(
        &mut self,
        on_look_at: impl FnMut(&mut WidgetBase, Vec2) + 'static,
        on_hover_exit: impl FnMut(&mut WidgetBase) + 'static,
    ) {
        self.on_look_at = Some(Box::new(on_look_at));
        self.on_hover_exit = Some(Box::new(on_hover_exit));
    }

    pub fn set_on_trigger_listener(&mut self, on_trigger: impl FnMut(&mut WidgetBase) + 'static) {
        self.on_trigger = Some(Box::new(on_trigger));
    }

    pub fn clear_listeners(&mut self) {
        self.on_look_at = None;
        self.on_hover_exit = None;
        self.on_trigger = None;
    }

    // Gaze

    /// Half-open hit test of a world-space point against the widget's XY rectangle.
    pub fn contains_point(&self, point: Vec2) -> bool {
        let left = self.position.x * self.scale.x;
        let right = (self.position.x + self.size.x) * self.scale.x;
        let bottom = self.position.y * self.scale.y;
        let top = (self.position.y + self.size.y) * self.scale.y;
        point.x >= left && point.x < right && point.y >= bottom && point.y < top
    }

    /// Projects the gaze onto the widget plane. A hit sets the hover flag and
    /// fires the look-at listener; a miss leaves the flag untouched.
    pub fn is_looking_at(&mut self, frame: &FrameContext) -> bool {
        if !self.visible {
            return false;
        }
        let Some(point) = frame.gaze_point_at(self.world_origin().z) else {
            return false;
        };
        if !self.contains_point(point) {
            return false;
        }
        self.looking_at = true;
        self.fire_look_at(point);
        true
    }

    /// Per-frame hover, dwell and trigger state machine.
    pub fn update_interaction(&mut self, frame: &FrameContext) {
        if self.looking_at {
            if !self.is_looking_at(frame) {
                self.looking_at = false;
                self.dwell = DwellState::Idle;
                self.fire_hover_exit();
            } else if frame.focus_mode && self.focus_mode_focusable {
                self.advance_dwell(frame);
            } else if matches!(self.dwell, DwellState::Dwelling { .. }) {
                self.dwell = DwellState::Idle;
            }
        } else {
            self.is_looking_at(frame);
        }

        if self.pending_trigger {
            self.pending_trigger = false;
            self.fire_trigger();
        }
    }

    fn advance_dwell(&mut self, frame: &FrameContext) {
        match self.dwell {
            DwellState::Idle => {
                self.dwell = DwellState::Dwelling {
                    since: frame.time,
                    elapsed: Duration::ZERO,
                };
            }
            DwellState::Dwelling { since, .. } => {
                let elapsed = frame.time.saturating_sub(since);
                if elapsed >= frame.dwell_threshold() {
                    tracing::debug!(widget = %self.id, ?elapsed, "dwell threshold reached");
                    self.dwell = DwellState::Fired;
                    self.pending_trigger = true;
                } else {
                    self.dwell = DwellState::Dwelling { since, elapsed };
                }
            }
            DwellState::Fired => {}
        }
    }

    /// Marks a pending trigger if the gaze is on the widget. The listener
    /// runs on the next `update_interaction`.
    pub fn perform_trigger_if_looking_at(&mut self, frame: &FrameContext) -> bool {
        let hit = self.is_looking_at(frame);
        if hit {
            self.pending_trigger = true;
        }
        hit
    }

    fn fire_look_at(&mut self, point: Vec2) {
        if let Some(mut callback) = self.on_look_at.take() {
            callback(self, point);
            if self.on_look_at.is_none() {
                self.on_look_at = Some(callback);
            }
        }
    }

    fn fire_hover_exit(&mut self) {
        if let Some(mut callback) = self.on_hover_exit.take() {
            callback(self);
            if self.on_hover_exit.is_none() {
                self.on_hover_exit = Some(callback);
            }
        }
    }

    fn fire_trigger(&mut self) {
        if !self.clickable {
            tracing::debug!(widget = %self.id, "trigger ignored on non-clickable widget");
            return;
        }
        if let Some(mut callback) = self.on_trigger.take() {
            callback(self);
            if self.on_trigger.is_none() {
                self.on_trigger = Some(callback);
            }
        }
    }

    // Draw

    /// Submits the widget's mesh for one eye. Skips with a warning when the
    /// buffers were never built.
    pub fn draw(&self, frame: &FrameContext, eye: Eye, renderer: &mut dyn RenderBackend) {
        let Some(mesh) = self.buffers.as_ref() else {
            tracing::warn!(widget = %self.id, "draw skipped, geometry not built");
            return;
        };
        let model_view = frame.view * self.model;
        let texture = match self.texture {
            Some(texture) => texture,
            None => renderer.neutral_texture(),
        };
        renderer.draw(&DrawCall {
            eye,
            mesh,
            model: self.model,
            model_view,
            model_view_projection: frame.projection * model_view,
            light_position: frame.light_position,
            texture,
        });
    }
}

fn unscale(delta: f32, scale: f32) -> f32 {
    if scale.abs() < f32::EPSILON { 0.0 } else { delta / scale }
}

/// Behavior of a node in the scene tree.
pub trait Widget {
    fn base(&self) -> &WidgetBase;

    fn base_mut(&mut self) -> &mut WidgetBase;

    /// Short type name used in logs and snapshots.
    fn kind(&self) -> &'static str;

    /// Computes width, height and depth from the content.
    fn measure(&mut self);

    fn update(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        let _ = rcx;
        self.base_mut().update_interaction(frame);
    }

    fn draw(&mut self, frame: &FrameContext, eye: Eye, rcx: &mut RenderContext<'_>) {
        self.base().draw(frame, eye, &mut *rcx.renderer);
    }

    fn perform_trigger_if_looking_at(&mut self, frame: &FrameContext) {
        self.base_mut().perform_trigger_if_looking_at(frame);
    }

    /// Visits owned child widgets, if any.
    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn Widget)) {
        let _ = visit;
    }

    fn id(&self) -> WidgetId {
        self.base().id()
    }

    fn translate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.base_mut().translate(dx, dy, dz);
    }

    fn scale(&mut self, sx: f32, sy: f32, sz: f32) {
        self.base_mut().scale(sx, sy, sz);
    }
}

pub type BoxedWidget = Box<dyn Widget>;

pub trait WidgetExt: Widget + Sized + 'static {
    fn boxed(self) -> BoxedWidget {
        Box::new(self)
    }
}

impl<T: Widget + 'static> WidgetExt for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(WidgetId::new(), WidgetId::new());
    }

    #[test]
    fn test_place_at_respects_scale() {
        let mut base = WidgetBase::new();
        base.scale(0.5, 2.0, 1.0);
        base.place_at(Vec3::new(1.0, 1.0, 0.0));
        assert!((base.world_origin() - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
        let model_origin = base.model().transform_point3(Vec3::ZERO);
        assert!((model_origin - Vec3::new(1.0, 1.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_place_at_ignores_tiny_moves() {
        let mut base = WidgetBase::new();
        base.place_at(Vec3::new(0.0005, -0.0005, 0.0));
        assert_eq!(base.position(), Vec3::ZERO);
        assert_eq!(base.model(), Mat4::IDENTITY);
    }

    #[test]
    fn test_dwell_progress_is_linear() {
        let mut base = WidgetBase::new();
        base.dwell = DwellState::Dwelling {
            since: Duration::from_millis(100),
            elapsed: Duration::from_millis(750),
        };
        assert!((base.dwell_progress(Duration::from_millis(1500)) - 0.5).abs() < 1e-6);
    }
}
