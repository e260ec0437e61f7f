use gazekit_core::glam::Vec2;
use gazekit_core::*;
use gazekit_renderer::{HeadlessRenderer, SolidRasterizer};
use std::cell::Cell;
use std::rc::Rc;

fn numbered(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("item {i}")).collect()
}

fn label_adapter(items: Vec<String>, created: Rc<Cell<usize>>) -> ListAdapter<String> {
    ListAdapter::new(move |item: &String, _| {
        created.set(created.get() + 1);
        TextLabel::new(item.clone()).boxed()
    })
    .with_items(items)
}

fn run_frame(view: &mut ListView, renderer: &mut HeadlessRenderer, frame: &FrameContext) {
    let rasterizer = SolidRasterizer::new();
    let mut rcx = RenderContext::new(renderer, &rasterizer);
    view.update(frame, &mut rcx);
    view.draw(frame, Eye::Left, &mut rcx);
    view.draw(frame, Eye::Right, &mut rcx);
}

fn gaze_at(x: f32, y: f32) -> FrameContext {
    gaze_at_plane(x, y, 0.0)
}

/// Affordances sit 0.1 in front of the items.
fn gaze_at_affordance(x: f32, y: f32) -> FrameContext {
    gaze_at_plane(x, y, 0.1)
}

fn gaze_at_plane(x: f32, y: f32, z: f32) -> FrameContext {
    let mut frame = FrameContext::new();
    frame.look_at_point(Vec2::new(x, y), z);
    frame
}

fn idle() -> FrameContext {
    gaze_at(-10.0, -10.0)
}

#[test]
fn test_measure_reserves_affordance_rows() {
    let view = ListView::default();
    assert_eq!(view.base().width(), 2.0);
    assert_eq!(view.base().height(), 5.0);
    assert_eq!(view.content_band(), (1.0, 4.0));
}

#[test]
fn test_request_out_of_bounds_is_none() {
    let created = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    view.set_adapter(Box::new(label_adapter(numbered(4), created.clone())));
    assert!(view.request_widget_at(4).is_none());
    assert!(view.request_widget_at(100).is_none());
    assert_eq!(created.get(), 0);
}

#[test]
fn test_request_caches_instances() {
    let created = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    view.set_adapter(Box::new(label_adapter(numbered(4), created.clone())));

    let first = view.request_widget_at(2).map(|w| w.id()).unwrap();
    let second = view.request_widget_at(2).map(|w| w.id()).unwrap();
    assert_eq!(first, second);
    assert_eq!(created.get(), 1);
}

#[test]
fn test_requested_items_are_resized_and_scaled() {
    let created = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    view.scale(0.5, 0.5, 0.5);
    view.set_adapter(Box::new(label_adapter(numbered(2), created)));

    let widget = view.request_widget_at(0).unwrap();
    assert_eq!(widget.base().width(), 2.0);
    assert_eq!(widget.base().height(), 1.0);
    assert_eq!(widget.base().scale_factors().y, 0.5);
}

#[test]
fn test_only_window_items_are_created() {
    let created = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    view.set_adapter(Box::new(label_adapter(numbered(50), created.clone())));

    let mut renderer = HeadlessRenderer::new();
    run_frame(&mut view, &mut renderer, &idle());
    assert_eq!(view.visible_range(), 0..3);
    assert_eq!(created.get(), 3);
    assert_eq!(view.binding().cache().ready_count(), 3);
}

#[test]
fn test_item_positions_fill_band_top_down() {
    let created = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    view.set_adapter(Box::new(label_adapter(numbered(5), created)));
    let mut renderer = HeadlessRenderer::new();
    run_frame(&mut view, &mut renderer, &idle());

    let ys: Vec<f32> = (0..3)
        .map(|i| view.binding().cache().get(i).unwrap().base().world_origin().y)
        .collect();
    assert_eq!(ys, vec![3.0, 2.0, 1.0]);
    assert!(view.is_item_visible(0));
    assert!(view.is_item_visible(2));
    assert!(!view.is_item_visible(3));
}

#[test]
fn test_scrolling_moves_window() {
    let created = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    view.set_adapter(Box::new(label_adapter(numbered(10), created)));
    let mut renderer = HeadlessRenderer::new();
    run_frame(&mut view, &mut renderer, &idle());

    view.set_scroll_offset(2.0);
    run_frame(&mut view, &mut renderer, &idle());
    assert_eq!(view.visible_range(), 2..5);
    assert!(!view.is_item_visible(0));
    assert!(!view.binding().cache().get(0).unwrap().base().is_visible());
    let y = view.binding().cache().get(2).unwrap().base().world_origin().y;
    assert!((y - 3.0).abs() < 1e-5);
    // Items scrolled away stay cached.
    assert_eq!(view.binding().cache().ready_count(), 5);
}

#[test]
fn test_scroll_is_clamped_to_content() {
    let created = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    view.set_adapter(Box::new(label_adapter(numbered(5), created)));
    view.set_scroll_offset(100.0);
    assert_eq!(view.scroll_offset(), 2.0);
    view.set_scroll_offset(-1.0);
    assert_eq!(view.scroll_offset(), 0.0);
}

#[test]
fn test_down_affordance_scrolls_toward_later_items() {
    let created = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    view.set_adapter(Box::new(label_adapter(numbered(10), created)));
    let mut renderer = HeadlessRenderer::new();
    run_frame(&mut view, &mut renderer, &idle());

    let down = view.down_affordance().unwrap().base();
    assert_eq!(down.world_origin().y, 0.0);

    // Gaze a quarter of the way into the down row: depth 0.75, rate 0.1.
    run_frame(&mut view, &mut renderer, &gaze_at_affordance(1.0, 0.25));
    run_frame(&mut view, &mut renderer, &gaze_at_affordance(1.0, 0.25));
    assert!((view.scroll_offset() - 0.15).abs() < 1e-5);
}

#[test]
fn test_up_affordance_scrolls_back() {
    let created = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    view.set_adapter(Box::new(label_adapter(numbered(10), created)));
    view.set_scroll_offset(1.0);
    let mut renderer = HeadlessRenderer::new();
    run_frame(&mut view, &mut renderer, &idle());

    run_frame(&mut view, &mut renderer, &gaze_at_affordance(1.0, 4.5));
    assert!((view.scroll_offset() - 0.95).abs() < 1e-5);
}

#[test]
fn test_notify_keeps_old_items_for_the_whole_frame() {
    let created = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    view.set_adapter(Box::new(label_adapter(numbered(5), created.clone())));
    let mut renderer = HeadlessRenderer::new();
    run_frame(&mut view, &mut renderer, &idle());
    let before = view.binding().cache().get(0).unwrap().id();
    renderer.take_draws();

    let rasterizer = SolidRasterizer::new();
    {
        let mut rcx = RenderContext::new(&mut renderer, &rasterizer);
        view.update(&idle(), &mut rcx);
        view.notify_data_set_changed();
        view.draw(&idle(), Eye::Left, &mut rcx);
        view.draw(&idle(), Eye::Right, &mut rcx);
    }
    let left = renderer.draws_for(Eye::Left).count();
    let right = renderer.draws_for(Eye::Right).count();
    assert_eq!(left, 5);
    assert_eq!(left, right);
    assert_eq!(view.binding().cache().get(0).unwrap().id(), before);
    assert!(view.binding().notifier().is_pending());

    run_frame(&mut view, &mut renderer, &idle());
    let after = view.binding().cache().get(0).unwrap().id();
    assert_ne!(before, after);
    assert!(!view.binding().notifier().is_pending());
    assert_eq!(created.get(), 6);
}

#[test]
fn test_hidden_affordances_free_their_rows() {
    let config = ListConfig {
        show_up: false,
        show_down: false,
        ..ListConfig::default()
    };
    let mut view = ListView::new(config);
    assert_eq!(view.base().height(), 3.0);
    assert_eq!(view.content_band(), (0.0, 3.0));

    let created = Rc::new(Cell::new(0));
    view.set_adapter(Box::new(label_adapter(numbered(5), created.clone())));
    let mut renderer = HeadlessRenderer::new();
    run_frame(&mut view, &mut renderer, &idle());
    assert!(view.up_affordance().is_none());
    assert!(view.down_affordance().is_none());
    assert_eq!(view.visible_range(), 0..3);
    assert_eq!(view.binding().cache().get(0).unwrap().base().world_origin().y, 2.0);
    assert_eq!(created.get(), 3);
}

#[test]
fn test_adapter_set_items_reaches_view() {
    use std::cell::RefCell;

    struct Shared(Rc<RefCell<ListAdapter<String>>>);

    impl DataSource for Shared {
        fn count(&self) -> usize {
            self.0.borrow().count()
        }

        fn create_widget_at(&mut self, position: usize) -> Option<BoxedWidget> {
            self.0.borrow_mut().create_widget_at(position)
        }

        fn attach(&mut self, notifier: ChangeNotifier) {
            self.0.borrow_mut().attach(notifier);
        }
    }

    let created = Rc::new(Cell::new(0));
    let adapter = Rc::new(RefCell::new(label_adapter(numbered(2), created)));
    let mut view = ListView::default();
    view.set_adapter(Box::new(Shared(adapter.clone())));
    assert_eq!(view.binding().cache().len(), 2);

    adapter.borrow_mut().set_items(numbered(7));
    assert!(view.binding().notifier().is_pending());

    let mut renderer = HeadlessRenderer::new();
    run_frame(&mut view, &mut renderer, &idle());
    assert_eq!(view.binding().cache().len(), 7);
    assert_eq!(adapter.borrow().item(6).map(String::as_str), Some("item 6"));
}

#[test]
fn test_trigger_reaches_items() {
    let hits = Rc::new(Cell::new(0));
    let mut view = ListView::default();
    {
        let hits = hits.clone();
        let adapter = ListAdapter::new(move |item: &String, _| {
            let hits = hits.clone();
            let mut button = Button::text(item.clone());
            button
                .base_mut()
                .set_on_trigger_listener(move |_| hits.set(hits.get() + 1));
            button.boxed()
        })
        .with_items(numbered(5));
        view.set_adapter(Box::new(adapter));
    }
    let mut renderer = HeadlessRenderer::new();
    run_frame(&mut view, &mut renderer, &idle());

    // Middle of item 1.
    let frame = gaze_at(1.0, 2.5);
    view.perform_trigger_if_looking_at(&frame);
    run_frame(&mut view, &mut renderer, &frame);
    assert_eq!(hits.get(), 1);
}
