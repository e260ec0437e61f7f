use crate::adapter::{AdapterBinding, AdapterView, DataSource};
use crate::affordance::{AFFORDANCE_LIFT, Affordances};
use crate::config::ListConfig;
use crate::frame::{Eye, FrameContext};
use crate::render::RenderContext;
use crate::scroll::ScrollOffset;
use crate::widget::{BoxedWidget, Widget, WidgetBase};
use crate::widgets::Button;
use glam::Vec3;
use std::ops::Range;

/// Vertically scrolling, virtualized list. Items are created on demand from
/// the data source; only rows overlapping the content band are positioned
/// and drawn.
///
/// The scroll offset grows as the list moves toward later items. The view
/// owns the `visible` flag of cached items and clears it while a row is
/// outside the band, so hidden rows neither draw nor take gaze.
#[derive(Debug)]
pub struct ListView {
    base: WidgetBase,
    config: ListConfig,
    binding: AdapterBinding,
    scroll: ScrollOffset,
    affordances: Affordances,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(ListConfig::default())
    }
}

impl ListView {
    pub fn new(config: ListConfig) -> Self {
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

    pub fn config(&self) -> &ListConfig {
        &self.config
    }

    pub fn binding(&self) -> &AdapterBinding {
        &self.binding
    }

    pub fn count(&self) -> usize {
        self.binding.count()
    }

    pub fn up_affordance(&self) -> Option<&Button> {
        self.affordances.before.as_ref()
    }

    pub fn down_affordance(&self) -> Option<&Button> {
        self.affordances.after.as_ref()
    }

    pub fn scroll_handle(&self) -> ScrollOffset {
        self.scroll.clone()
    }

    /// World height of one row.
    pub fn row_height(&self) -> f32 {
        self.config.item_height * self.base.scale_factors().y
    }

    /// World-space `(bottom, top)` of the band where items are shown. Each
    /// enabled affordance takes one row off its end.
    pub fn content_band(&self) -> (f32, f32) {
        let y = self.base.position().y;
        let sy = self.base.scale_factors().y;
        let item_h = self.config.item_height;
        let below = if self.config.show_down { item_h } else { 0.0 };
        let above = if self.config.show_up { item_h } else { 0.0 };
        let bottom = (y + below) * sy;
        let top = (y + self.base.height() - above) * sy;
        (bottom, top)
    }

    /// Target world origin of item `position` at the current scroll offset.
    pub fn item_origin(&self, position: usize) -> Vec3 {
        let (_, band_top) = self.content_band();
        let x = self.base.position().x * self.base.scale_factors().x;
        let z = self.base.world_origin().z;
        let bottom = band_top - (position as f32 + 1.0) * self.row_height() + self.scroll.get();
        Vec3::new(x, bottom, z)
    }

    /// Positions whose rows overlap the content band.
    pub fn visible_range(&self) -> Range<usize> {
        let count = self.binding.count();
        let row = self.row_height();
        if row <= 0.0 || count == 0 {
            return 0..0;
        }
        let (bottom, top) = self.content_band();
        let offset = self.scroll.get();
        let first = (offset / row).floor().max(0.0) as usize;
        let last = ((offset + (top - bottom)) / row).ceil().max(0.0) as usize;
        first.min(count)..last.min(count)
    }

    fn max_scroll(&self) -> f32 {
        let hidden = self.binding.count().saturating_sub(self.config.max_items_shown);
        hidden as f32 * self.row_height()
    }

    fn ensure_affordances(&mut self) {
        let origin = self.base.world_origin();
        let (_, band_top) = self.content_band();
        let size = (self.base.width(), self.config.item_height);
        let scale = self.base.scale_factors();
        let rate = self.config.scroll_rate;

        if self.config.show_up && self.affordances.before.is_none() {
            let scroll = self.scroll.clone();
            self.affordances.before = Some(Affordances::build(
                self.config.up_label.clone(),
                size,
                scale,
                Vec3::new(origin.x, band_top, origin.z + AFFORDANCE_LIFT),
                move |base, point| {
                    let depth = point.y - base.world_origin().y;
                    scroll.scroll_by(-depth * rate);
                },
            ));
        }

        if self.config.show_down && self.affordances.after.is_none() {
            let scroll = self.scroll.clone();
            self.affordances.after = Some(Affordances::build(
                self.config.down_label.clone(),
                size,
                scale,
                Vec3::new(origin.x, origin.y, origin.z + AFFORDANCE_LIFT),
                move |base, point| {
                    let top = base.world_origin().y + base.world_size().y;
                    scroll.scroll_by((top - point.y) * rate);
                },
            ));
        }
    }

    /// Places cached rows in the window and toggles their visibility.
    fn layout_items(&mut self) {
        let (band_bottom, band_top) = self.content_band();
        let targets: Vec<(usize, Vec3)> = self.visible_range().map(|i| (i, self.item_origin(i))).collect();
        self.binding.place_window(&targets, |base| {
            let bottom = base.world_origin().y;
            let top = bottom + base.world_size().y;
            top > band_bottom && bottom < band_top
        });
    }
}

impl Widget for ListView {
    fn base(&self) -> &WidgetBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut WidgetBase {
        &mut self.base
    }

    fn kind(&self) -> &'static str {
        "ListView"
    }

    fn measure(&mut self) {
        let affordances = usize::from(self.config.show_up) + usize::from(self.config.show_down);
        let rows = self.config.max_items_shown + affordances;
        self.base.set_size(self.config.item_width, self.config.item_height * rows as f32);
    }

    fn update(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        self.binding.apply_pending_change();
        self.base.update_interaction(frame);
        self.ensure_affordances();
        self.scroll.set_max(self.max_scroll());

        for position in self.visible_range() {
            self.request_widget_at(position);
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

impl AdapterView for ListView {
    fn set_adapter(&mut self, source: Box<dyn DataSource>) {
        self.binding.set_source(source);
        self.scroll.set_max(self.max_scroll());
    }

    fn request_widget_at(&mut self, position: usize) -> Option<&mut BoxedWidget> {
        let scale = self.base.scale_factors();
        let (item_w, item_h) = (self.config.item_width, self.config.item_height);
        self.binding.request(position, |widget| {
            widget.scale(scale.x, scale.y, scale.z);
            let base = widget.base_mut();
            if base.width() != item_w {
                base.set_width(item_w);
            }
            if base.height() != item_h {
                base.set_height(item_h);
            }
        })
    }

    fn is_item_visible(&self, position: usize) -> bool {
        let Some(widget) = self.binding.cache().get(position) else {
            return false;
        };
        let (band_bottom, band_top) = self.content_band();
        let bottom = self.item_origin(position).y;
        let top = bottom + widget.base().world_size().y;
        top > band_bottom && bottom < band_top
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
