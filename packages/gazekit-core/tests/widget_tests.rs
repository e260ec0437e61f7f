use gazekit_core::glam::{Mat4, Vec2, Vec3};
use gazekit_core::*;
use gazekit_renderer::{HeadlessRenderer, SolidRasterizer};
use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

struct Panel {
    base: WidgetBase,
    width: f32,
    height: f32,
}

impl Panel {
    fn new(width: f32, height: f32) -> Self {
        let mut panel = Self {
            base: WidgetBase::new(),
            width,
            height,
        };
        panel.measure();
        panel
    }
}

impl Widget for Panel {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "Panel"
    }

    fn measure(&mut self) {
        self.base.set_size(self.width, self.height);
    }

    fn update(&mut self, frame: &FrameContext, _rcx: &mut RenderContext<'_>) {
        self.base.update_interaction(frame);
        self.base.rebuild_quad_if_invalid();
    }
}

fn gaze_at(x: f32, y: f32) -> FrameContext {
    let mut frame = FrameContext::new();
    frame.look_at_point(Vec2::new(x, y), 0.0);
    frame
}

fn frame_at(x: f32, y: f32, millis: u64) -> FrameContext {
    gaze_at(x, y).with_time(Duration::from_millis(millis)).with_focus_mode(true)
}

#[test]
fn test_model_matrix_composes_in_call_order() {
    let mut panel = Panel::new(1.0, 1.0);
    panel.translate(1.0, 2.0, 3.0);
    panel.scale(2.0, 2.0, 2.0);
    panel.translate(1.0, 0.0, 0.0);

    let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
        * Mat4::from_scale(Vec3::splat(2.0))
        * Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
    assert!(panel.base().model().abs_diff_eq(expected, 1e-6));
    assert_eq!(panel.base().position(), Vec3::new(2.0, 2.0, 3.0));
    assert_eq!(panel.base().scale_factors(), Vec3::splat(2.0));
}

#[test]
fn test_translate_does_not_dirty_geometry() {
    let mut panel = Panel::new(1.0, 1.0);
    panel.base_mut().build_buffers().unwrap_err();
    panel.base_mut().rebuild_quad_if_invalid();
    assert!(panel.base().is_valid());
    panel.translate(1.0, 0.0, 0.0);
    assert!(panel.base().is_valid());
    panel.base_mut().set_width(3.0);
    assert!(!panel.base().is_valid());
}

#[test]
fn test_hit_test_is_half_open() {
    let mut panel = Panel::new(2.0, 1.0);
    assert!(panel.base_mut().is_looking_at(&gaze_at(1.999, 0.5)));
    assert!(!panel.base_mut().is_looking_at(&gaze_at(2.001, 0.5)));
    for _ in 0..3 {
        assert!(!panel.base_mut().is_looking_at(&gaze_at(2.0, 0.5)));
        assert!(panel.base_mut().is_looking_at(&gaze_at(0.0, 0.5)));
    }
}

#[test]
fn test_invisible_widget_is_never_looked_at() {
    let mut panel = Panel::new(2.0, 1.0);
    panel.base_mut().set_visible(false);
    assert!(!panel.base_mut().is_looking_at(&gaze_at(1.0, 0.5)));
    assert!(!panel.base().is_hovering());
}

#[test]
fn test_degenerate_forward_never_hits() {
    let mut panel = Panel::new(2.0, 1.0);
    let mut frame = FrameContext::new();
    frame.forward = Vec3::new(0.0, 1.0, 0.0);
    assert!(!panel.base_mut().is_looking_at(&frame));
}

#[test]
fn test_miss_keeps_sticky_hover_flag() {
    let mut panel = Panel::new(2.0, 1.0);
    assert!(panel.base_mut().is_looking_at(&gaze_at(1.0, 0.5)));
    assert!(!panel.base_mut().is_looking_at(&gaze_at(5.0, 0.5)));
    assert!(panel.base().is_hovering());
}

#[test]
fn test_hover_listeners() {
    let looks = Rc::new(Cell::new(0));
    let exits = Rc::new(Cell::new(0));
    let mut panel = Panel::new(2.0, 1.0);
    {
        let looks = looks.clone();
        let exits = exits.clone();
        panel.base_mut().set_on_look_at_listener(
            move |_, point| {
                assert!(point.x >= 0.0 && point.x < 2.0);
                looks.set(looks.get() + 1);
            },
            move |_| exits.set(exits.get() + 1),
        );
    }

    for _ in 0..3 {
        panel.base_mut().update_interaction(&gaze_at(1.0, 0.5));
    }
    assert_eq!(looks.get(), 3);
    assert_eq!(exits.get(), 0);

    panel.base_mut().update_interaction(&gaze_at(4.0, 0.5));
    panel.base_mut().update_interaction(&gaze_at(4.0, 0.5));
    assert_eq!(exits.get(), 1);
    assert!(!panel.base().is_hovering());
}

#[test]
fn test_dwell_fires_once_per_hover() {
    let triggers = Rc::new(Cell::new(0));
    let mut panel = Panel::new(2.0, 1.0);
    {
        let triggers = triggers.clone();
        panel
            .base_mut()
            .set_on_trigger_listener(move |_| triggers.set(triggers.get() + 1));
    }

    // Hover for 3 seconds at 60 fps.
    for frame in 0..180u64 {
        panel.base_mut().update_interaction(&frame_at(1.0, 0.5, frame * 16));
    }
    assert_eq!(triggers.get(), 1);
    assert_eq!(panel.base().dwell_state(), DwellState::Fired);

    // Look away, come back and dwell again.
    panel.base_mut().update_interaction(&frame_at(5.0, 0.5, 3000));
    assert_eq!(panel.base().dwell_state(), DwellState::Idle);
    for frame in 0..120u64 {
        panel.base_mut().update_interaction(&frame_at(1.0, 0.5, 3100 + frame * 16));
    }
    assert_eq!(triggers.get(), 2);
}

#[test]
fn test_dwell_requires_focus_mode() {
    let triggers = Rc::new(Cell::new(0));
    let mut panel = Panel::new(2.0, 1.0);
    {
        let triggers = triggers.clone();
        panel
            .base_mut()
            .set_on_trigger_listener(move |_| triggers.set(triggers.get() + 1));
    }
    for frame in 0..200u64 {
        let ctx = gaze_at(1.0, 0.5).with_time(Duration::from_millis(frame * 16));
        panel.base_mut().update_interaction(&ctx);
    }
    assert_eq!(triggers.get(), 0);
    assert_eq!(panel.base().dwell_progress(Duration::from_millis(1500)), 0.0);
}

#[test]
fn test_dwell_threshold_is_inclusive() {
    let triggers = Rc::new(Cell::new(0));
    let mut panel = Panel::new(2.0, 1.0);
    {
        let triggers = triggers.clone();
        panel
            .base_mut()
            .set_on_trigger_listener(move |_| triggers.set(triggers.get() + 1));
    }
    panel.base_mut().update_interaction(&frame_at(1.0, 0.5, 0));
    panel.base_mut().update_interaction(&frame_at(1.0, 0.5, 100));
    panel.base_mut().update_interaction(&frame_at(1.0, 0.5, 850));
    let progress = panel.base().dwell_progress(Duration::from_millis(1500));
    assert!((progress - 0.5).abs() < 1e-3);
    panel.base_mut().update_interaction(&frame_at(1.0, 0.5, 1600));
    assert_eq!(triggers.get(), 1);
}

#[test]
fn test_perform_trigger_runs_on_next_update() {
    let triggers = Rc::new(Cell::new(0));
    let mut panel = Panel::new(2.0, 1.0);
    {
        let triggers = triggers.clone();
        panel
            .base_mut()
            .set_on_trigger_listener(move |_| triggers.set(triggers.get() + 1));
    }

    panel.perform_trigger_if_looking_at(&gaze_at(5.0, 0.5));
    assert!(!panel.base().has_pending_trigger());

    panel.perform_trigger_if_looking_at(&gaze_at(1.0, 0.5));
    assert!(panel.base().has_pending_trigger());
    assert_eq!(triggers.get(), 0);

    panel.base_mut().update_interaction(&gaze_at(1.0, 0.5));
    assert_eq!(triggers.get(), 1);
    assert!(!panel.base().has_pending_trigger());
}

#[test]
fn test_non_clickable_widget_ignores_trigger() {
    let triggers = Rc::new(Cell::new(0));
    let mut panel = Panel::new(2.0, 1.0);
    panel.base_mut().set_clickable(false);
    {
        let triggers = triggers.clone();
        panel
            .base_mut()
            .set_on_trigger_listener(move |_| triggers.set(triggers.get() + 1));
    }
    panel.perform_trigger_if_looking_at(&gaze_at(1.0, 0.5));
    panel.base_mut().update_interaction(&gaze_at(1.0, 0.5));
    assert_eq!(triggers.get(), 0);
}

#[test]
fn test_draw_without_geometry_is_skipped() {
    let mut renderer = HeadlessRenderer::new();
    let rasterizer = SolidRasterizer::new();
    let mut rcx = RenderContext::new(&mut renderer, &rasterizer);
    let mut panel = Panel::new(2.0, 1.0);
    panel.draw(&FrameContext::new(), Eye::Left, &mut rcx);
    assert!(renderer.draws().is_empty());
}

#[test]
fn test_draw_submits_matrices_and_neutral_texture() {
    let mut renderer = HeadlessRenderer::new();
    let rasterizer = SolidRasterizer::new();
    let mut panel = Panel::new(2.0, 1.0);
    panel.translate(1.0, 0.0, 0.0);

    let mut frame = FrameContext::new();
    frame.view = Mat4::from_translation(Vec3::new(0.0, 0.0, -7.0));
    frame.projection = Mat4::perspective_rh(1.2, 1.0, 1.0, 100.0);
    {
        let mut rcx = RenderContext::new(&mut renderer, &rasterizer);
        panel.update(&frame, &mut rcx);
        panel.draw(&frame, Eye::Right, &mut rcx);
    }

    let neutral = renderer.neutral_texture();
    let draws = renderer.draws();
    assert_eq!(draws.len(), 1);
    let record = &draws[0];
    assert_eq!(record.eye, Eye::Right);
    assert_eq!(record.texture, neutral);
    assert_eq!(record.index_count, 6);
    assert!(record.model_view.abs_diff_eq(frame.view * panel.base().model(), 1e-6));
    assert!(
        record
            .model_view_projection
            .abs_diff_eq(frame.projection * frame.view * panel.base().model(), 1e-5)
    );
}

#[test]
fn test_label_texture_and_quad_built_on_update() {
    let mut renderer = HeadlessRenderer::new();
    let rasterizer = SolidRasterizer::new();
    let mut label = TextLabel::new("hello");
    {
        let mut rcx = RenderContext::new(&mut renderer, &rasterizer);
        label.update(&FrameContext::new(), &mut rcx);
        label.draw(&FrameContext::new(), Eye::Mono, &mut rcx);
    }
    assert!(label.base().is_valid());
    let texture = label.base().texture().unwrap();
    assert_eq!(renderer.draws()[0].texture, texture);
    assert_eq!(renderer.live_textures(), 1);

    label.set_text("hello world");
    {
        let mut rcx = RenderContext::new(&mut renderer, &rasterizer);
        label.update(&FrameContext::new(), &mut rcx);
    }
    assert_ne!(label.base().texture(), Some(texture));
    assert_eq!(renderer.live_textures(), 1);
}

#[test]
fn test_failed_upload_falls_back_to_neutral_texture() {
    let mut renderer = HeadlessRenderer::new();
    renderer.set_fail_uploads(true);
    let rasterizer = SolidRasterizer::new();
    let mut label = TextLabel::new("x");
    {
        let mut rcx = RenderContext::new(&mut renderer, &rasterizer);
        label.update(&FrameContext::new(), &mut rcx);
        label.draw(&FrameContext::new(), Eye::Left, &mut rcx);
    }
    assert!(label.base().texture().is_none());
    let neutral = renderer.neutral_texture();
    assert_eq!(renderer.draws()[0].texture, neutral);
}

#[test]
fn test_button_swaps_to_hover_texture() {
    let mut renderer = HeadlessRenderer::new();
    let rasterizer = SolidRasterizer::new();
    let mut button = Button::text("go");
    let width = button.base().width();
    let mut rcx = RenderContext::new(&mut renderer, &rasterizer);

    button.update(&gaze_at(10.0, 10.0), &mut rcx);
    assert_eq!(button.base().texture(), button.normal_texture());

    button.update(&gaze_at(width / 2.0, 0.5), &mut rcx);
    assert!(button.base().is_hovering());
    assert_eq!(button.base().texture(), button.hover_texture());
    assert_ne!(button.normal_texture(), button.hover_texture());
}

#[test]
fn test_button_refreshes_progress_texture_while_dwelling() {
    let mut renderer = HeadlessRenderer::new();
    let rasterizer = SolidRasterizer::new();
    let mut button = Button::text("go");
    let x = button.base().width() / 2.0;
    {
        let mut rcx = RenderContext::new(&mut renderer, &rasterizer);
        for frame in 0..15u64 {
            button.update(&frame_at(x, 0.5, frame * 16), &mut rcx);
        }
    }
    // Two initial textures plus two progress refreshes.
    assert_eq!(renderer.upload_count(), 4);
    assert_eq!(renderer.live_textures(), 2);
}

#[test]
fn test_mesh_widget_measures_bounds() {
    let geometry = Geometry::new(
        vec![[-1.0, 0.0, 0.0], [1.0, 0.5, 0.0], [0.0, 2.0, 1.0]],
        vec![0, 1, 2],
    );
    let mesh = MeshWidget::new(geometry);
    assert_eq!(mesh.base().width(), 2.0);
    assert_eq!(mesh.base().height(), 2.0);
    assert_eq!(mesh.base().depth(), 1.0);
}
