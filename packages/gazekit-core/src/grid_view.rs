use crate::adapter::{AdapterBinding, AdapterView, DataSource};
use crate::affordance::{AFFORDANCE_LIFT, Affordances};
use crate::config::{FitStrategy, GridConfig};
use crate::frame::{Eye, FrameContext};
use crate::render::RenderContext;
use crate::scroll::ScrollOffset;
use crate::widget::{BoxedWidget, Widget, WidgetBase};
use crate::widgets::Button;
use glam::Vec3;
use std::ops::Range;

/// Column and row of item `index` when columns are filled top to bottom.
pub fn tile_of(index: usize, vertical_tiles: usize) -> (usize, usize) {
    let rows = vertical_tiles.max(1);
    (index / rows, index % rows)
}

/// Horizontally scrolling, virtualized grid. Items fill each column top to
/// bottom before moving right.
#[derive(Debug)]
pub struct GridView {
    base: WidgetBase,
    config: GridConfig,
    binding: AdapterBinding,
    scroll: ScrollOffset,
    affordances: Affordances,
}

impl Default for GridView {
    fn default() -> Self {
        Self::new(GridConfig::default())
    }
}

impl GridView {
    pub fn new(config: GridConfig) -> Self {
        let mut view = Self {
            base: WidgetBase::new(),
            config,
            binding: AdapterBinding::new(),
            scroll: ScrollOffset::new(),
            affordances: Affordances::default(),
        };
        view.measure();
        view
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn binding(&self) -> &AdapterBinding {
        &self.binding
    }

    pub fn count(&self) -> usize {
        self.binding.count()
    }

    pub fn left_affordance(&self) -> Option<&Button> {
        self.affordances.before.as_ref()
    }

    pub fn right_affordance(&self) -> Option<&Button> {
        self.affordances.after.as_ref()
    }

    pub fn scroll_handle(&self) -> ScrollOffset {
        self.scroll.clone()
    }

    fn rows(&self) -> usize {
        self.config.vertical_tiles.max(1)
    }

    fn columns(&self) -> usize {
        self.binding.count().div_ceil(self.rows())
    }

    /// World-space `(left, right)` of the visible area.
    pub fn content_span(&self) -> (f32, f32) {
        let left = self.base.world_origin().x;
        (left, left + self.base.world_size().x)
    }

    pub fn item_origin(&self, index: usize) -> Vec3 {
        let (column, row) = tile_of(index, self.config.vertical_tiles);
        let origin = self.base.world_origin();
        let rows = self.rows();
        let x = origin.x + column as f32 * self.config.item_width - self.scroll.get();
        let y = origin.y + (rows - 1 - row) as f32 * self.config.item_height;
        Vec3::new(x, y, origin.z)
    }

    /// Indices whose columns overlap the visible area.
    pub fn visible_range(&self) -> Range<usize> {
        let count = self.binding.count();
        let column_w = self.config.item_width;
        if column_w <= 0.0 || count == 0 {
            return 0..0;
        }
        let (left, right) = self.content_span();
        let offset = self.scroll.get();
        let first = (offset / column_w).floor().max(0.0) as usize;
        let last = ((offset + (right - left)) / column_w).ceil().max(0.0) as usize;
        let rows = self.rows();
        (first * rows).min(count)..(last * rows).min(count)
    }

    fn max_scroll(&self) -> f32 {
        let (left, right) = self.content_span();
        (self.columns() as f32 * self.config.item_width - (right - left)).max(0.0)
    }

    fn ensure_affordances(&mut self) {
        let (left, right) = self.content_span();
        let origin = self.base.world_origin();
        let size = (self.config.item_width, self.config.item_height * self.rows() as f32);
        let step = self.config.slide_step;

        if self.affordances.before.is_none() {
            let scroll = self.scroll.clone();
            self.affordances.before = Some(Affordances::build(
                self.config.left_label.clone(),
                size,
                Vec3::ONE,
                Vec3::new(left - self.config.item_width, origin.y, origin.z + AFFORDANCE_LIFT),
                move |_, _| scroll.scroll_by(-step),
            ));
        }

        if self.affordances.after.is_none() {
            let scroll = self.scroll.clone();
            self.affordances.after = Some(Affordances::build(
                self.config.right_label.clone(),
                size,
                Vec3::ONE,
                Vec3::new(right, origin.y, origin.z + AFFORDANCE_LIFT),
                move |_, _| scroll.scroll_by(step),
            ));
        }
    }

    fn layout_items(&mut self) {
        let (span_left, span_right) = self.content_span();
        let targets: Vec<(usize, Vec3)> = self.visible_range().map(|i| (i, self.item_origin(i))).collect();
        self.binding.place_window(&targets, |base| {
            let left = base.world_origin().x;
            let right = left + base.world_size().x;
            left < span_right && right > span_left
        });
    }
}

/// Sizes a freshly created item to its tile.
fn fit_to_tile(widget: &mut BoxedWidget, fit: FitStrategy, tile_w: f32, tile_h: f32) {
    match fit {
        FitStrategy::Stretch => {
            let base = widget.base_mut();
            if base.width() != tile_w {
                base.set_width(tile_w);
            }
            if base.height() != tile_h {
                base.set_height(tile_h);
            }
        }
        FitStrategy::Scale => {
            let width = widget.base().world_size().x;
            if width > 0.0 {
                let factor = tile_w / width;
                widget.scale(factor, factor, factor);
            }
            let height = widget.base().world_size().y;
            if height > tile_h && height > 0.0 {
                let factor = tile_h / height;
                widget.scale(factor, factor, factor);
            }
        }
    }
}

impl Widget for GridView {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "GridView"
    }

    fn measure(&mut self) {
        let width = self.config.item_width * self.config.horizontal_tiles as f32;
        let height = self.config.item_height * self.rows() as f32;
        self.base.set_size(width, height);
    }

    fn update(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        self.binding.apply_pending_change();
        self.base.update_interaction(frame);
        self.ensure_affordances();
        self.scroll.set_max(self.max_scroll());

        for index in self.visible_range() {
            self.request_widget_at(index);
        }
        self.layout_items();

        self.binding.update_items(frame, rcx);
        self.affordances.update(frame, rcx);
    }

    fn draw(&mut self, frame: &FrameContext, eye: Eye, rcx: &mut RenderContext<'_>) {
        self.affordances.draw_before(frame, eye, rcx);
        self.layout_items();
        let window = self.visible_range();
        self.binding.draw_items(window, frame, eye, rcx);
        self.affordances.draw_after(frame, eye, rcx);
    }

    fn perform_trigger_if_looking_at(&mut self, frame: &FrameContext) {
        self.base.perform_trigger_if_looking_at(frame);
        self.binding.trigger_items(frame);
    }

    fn for_each_child(&self, visit: &mut dyn FnMut(&dyn Widget)) {
        self.binding.visit_items(visit);
    }
}

impl AdapterView for GridView {
    fn set_adapter(&mut self, source: Box<dyn DataSource>) {
        self.binding.set_source(source);
        self.scroll.set_max(self.max_scroll());
    }

    fn request_widget_at(&mut self, position: usize) -> Option<&mut BoxedWidget> {
        let (tile_w, tile_h) = (self.config.item_width, self.config.item_height);
        let fit = self.config.fit;
        self.binding
            .request(position, |widget| fit_to_tile(widget, fit, tile_w, tile_h))
    }

    fn is_item_visible(&self, position: usize) -> bool {
        let Some(widget) = self.binding.cache().get(position) else {
            return false;
        };
        let (span_left, span_right) = self.content_span();
        let left = self.item_origin(position).x;
        let right = left + widget.base().world_size().x;
        left < span_right && right > span_left
    }

    fn notify_data_set_changed(&self) {
        self.binding.notify_data_set_changed();
    }

    fn scroll_offset(&self) -> f32 {
        self.scroll.get()
    }

    fn set_scroll_offset(&mut self, offset: f32) {
        self.scroll.set(offset);
    }
}
