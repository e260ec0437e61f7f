use crate::frame::{Eye, FrameContext};
use crate::render::RenderContext;
use crate::widget::{BoxedWidget, Widget, WidgetBase};
use glam::Vec3;
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Dirty flag shared between a data source and the view it feeds.
#[derive(Debug, Clone, Default)]
pub struct ChangeNotifier {
    changed: Rc<Cell<bool>>,
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&self) {
        self.changed.set(true);
    }

    pub fn is_pending(&self) -> bool {
        self.changed.get()
    }

    /// Returns whether a change was pending and clears it.
    pub fn take(&self) -> bool {
        self.changed.replace(false)
    }
}

/// Supplies item widgets to a virtualized view.
pub trait DataSource {
    fn count(&self) -> usize;

    /// Builds the widget for `position`, or `None` if it is out of range.
    fn create_widget_at(&mut self, position: usize) -> Option<BoxedWidget>;

    /// Hooks the view's notifier so content changes reach it.
    fn attach(&mut self, notifier: ChangeNotifier) {
        let _ = notifier;
    }
}

/// Data source that also exposes the item behind each position.
pub trait ItemSource: DataSource {
    type Item;

    fn item(&self, position: usize) -> Option<&Self::Item>;
}

type Factory<T> = Box<dyn FnMut(&T, usize) -> BoxedWidget>;

/// Vector-backed data source with a per-item widget factory.
pub struct ListAdapter<T> {
    items: Vec<T>,
    factory: Factory<T>,
    notifier: Option<ChangeNotifier>,
}

impl<T> fmt::Debug for ListAdapter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListAdapter")
            .field("items", &self.items.len())
            .field("attached", &self.notifier.is_some())
            .finish()
    }
}

impl<T> ListAdapter<T> {
    pub fn new(factory: impl FnMut(&T, usize) -> BoxedWidget + 'static) -> Self {
        Self {
            items: Vec::new(),
            factory: Box::new(factory),
            notifier: None,
        }
    }

    pub fn with_items(mut self, items: Vec<T>) -> Self {
        self.items = items;
        self
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replaces the items and notifies the attached view.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.notify_data_set_changed();
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.notify_data_set_changed();
    }

    pub fn notify_data_set_changed(&self) {
        if let Some(notifier) = &self.notifier {
            notifier.notify();
        }
    }
}

impl<T> DataSource for ListAdapter<T> {
    fn count(&self) -> usize {
        self.items.len()
    }

    fn create_widget_at(&mut self, position: usize) -> Option<BoxedWidget> {
        let item = self.items.get(position)?;
        Some((self.factory)(item, position))
    }

    fn attach(&mut self, notifier: ChangeNotifier) {
        self.notifier = Some(notifier);
    }
}

impl<T> ItemSource for ListAdapter<T> {
    type Item = T;

    fn item(&self, position: usize) -> Option<&T> {
        self.items.get(position)
    }
}

/// One entry of the sparse widget cache.
#[derive(Default)]
pub enum Slot {
    #[default]
    Absent,
    Ready(BoxedWidget),
}

impl Slot {
    pub fn is_ready(&self) -> bool {
        matches!(self, Slot::Ready(_))
    }
}

/// Position-indexed cache of item widgets, created on first request.
#[derive(Default)]
pub struct ItemCache {
    slots: Vec<Slot>,
}

impl fmt::Debug for ItemCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemCache")
            .field("len", &self.slots.len())
            .field("ready", &self.ready_count())
            .finish()
    }
}

impl ItemCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops every cached widget and resizes to `len` absent slots.
    pub fn reallocate(&mut self, len: usize) {
        self.slots.clear();
        self.slots.resize_with(len, Slot::default);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn ready_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_ready()).count()
    }

    pub fn contains(&self, position: usize) -> bool {
        self.slots.get(position).is_some_and(Slot::is_ready)
    }

    pub fn get(&self, position: usize) -> Option<&dyn Widget> {
        match self.slots.get(position)? {
            Slot::Ready(widget) => Some(&**widget),
            Slot::Absent => None,
        }
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut BoxedWidget> {
        match self.slots.get_mut(position)? {
            Slot::Ready(widget) => Some(widget),
            Slot::Absent => None,
        }
    }

    /// Returns the cached widget, filling an absent slot from `create`.
    /// `None` if `position` is outside the cache or `create` yields nothing.
    pub fn get_or_create(
        &mut self,
        position: usize,
        create: impl FnOnce() -> Option<BoxedWidget>,
    ) -> Option<&mut BoxedWidget> {
        let slot = self.slots.get_mut(position)?;
        if let Slot::Absent = slot {
            *slot = Slot::Ready(create()?);
        }
        match slot {
            Slot::Ready(widget) => Some(widget),
            Slot::Absent => None,
        }
    }

    pub fn iter_ready(&self) -> impl Iterator<Item = (usize, &dyn Widget)> {
        self.slots.iter().enumerate().filter_map(|(i, slot)| match slot {
            Slot::Ready(widget) => Some((i, &**widget)),
            Slot::Absent => None,
        })
    }

    pub fn iter_ready_mut(&mut self) -> impl Iterator<Item = (usize, &mut BoxedWidget)> {
        self.slots.iter_mut().enumerate().filter_map(|(i, slot)| match slot {
            Slot::Ready(widget) => Some((i, widget)),
            Slot::Absent => None,
        })
    }
}

/// Data source, cache and change flag shared by the list and grid views.
#[derive(Default)]
pub struct AdapterBinding {
    source: Option<Box<dyn DataSource>>,
    cache: ItemCache,
    notifier: ChangeNotifier,
}

impl fmt::Debug for AdapterBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdapterBinding")
            .field("has_source", &self.source.is_some())
            .field("cache", &self.cache)
            .field("change_pending", &self.notifier.is_pending())
            .finish()
    }
}

impl AdapterBinding {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches `source` and immediately sizes the cache to its count.
    pub fn set_source(&mut self, mut source: Box<dyn DataSource>) {
        source.attach(self.notifier.clone());
        self.cache.reallocate(source.count());
        self.notifier.take();
        self.source = Some(source);
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    pub fn count(&self) -> usize {
        self.source.as_ref().map_or(0, |s| s.count())
    }

    pub fn notifier(&self) -> &ChangeNotifier {
        &self.notifier
    }

    pub fn notify_data_set_changed(&self) {
        self.notifier.notify();
    }

    pub fn cache(&self) -> &ItemCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut ItemCache {
        &mut self.cache
    }

    /// Cached widget for `position`, created through the source on first
    /// request and passed to `prepare` once before it is stored.
    pub fn request(
        &mut self,
        position: usize,
        prepare: impl FnOnce(&mut BoxedWidget),
    ) -> Option<&mut BoxedWidget> {
        let source = self.source.as_mut()?;
        self.cache.get_or_create(position, || {
            let mut widget = source.create_widget_at(position)?;
            prepare(&mut widget);
            tracing::debug!(position, widget = %widget.id(), kind = widget.kind(), "item widget created");
            Some(widget)
        })
    }

    /// Applies a change notification raised since the previous frame and
    /// returns whether the cache was rebuilt. Views call this at the start of
    /// `update`, so every eye of the notifying frame draws the old cache.
    pub fn apply_pending_change(&mut self) -> bool {
        if !self.notifier.take() {
            return false;
        }
        let count = self.count();
        tracing::debug!(count, "data set changed, item cache reallocated");
        self.cache.reallocate(count);
        true
    }

    /// Moves the cached items of a contiguous window to their targets and
    /// sets their visibility from `in_view`. Cached items outside the window
    /// are hidden.
    pub fn place_window(&mut self, targets: &[(usize, Vec3)], in_view: impl Fn(&WidgetBase) -> bool) {
        let window = match (targets.first(), targets.last()) {
            (Some(&(first, _)), Some(&(last, _))) => first..last + 1,
            _ => 0..0,
        };
        for (position, widget) in self.cache.iter_ready_mut() {
            if !window.contains(&position) {
                widget.base_mut().set_visible(false);
            }
        }
        for &(position, target) in targets {
            let Some(widget) = self.cache.get_mut(position) else {
                continue;
            };
            let base = widget.base_mut();
            base.place_at(target);
            let visible = in_view(base);
            base.set_visible(visible);
        }
    }

    pub fn update_items(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        for (_, widget) in self.cache.iter_ready_mut() {
            widget.update(frame, rcx);
        }
    }

    /// Draws the visible cached items among `positions`.
    pub fn draw_items(
        &mut self,
        positions: impl IntoIterator<Item = usize>,
        frame: &FrameContext,
        eye: Eye,
        rcx: &mut RenderContext<'_>,
    ) {
        for position in positions {
            let Some(widget) = self.cache.get_mut(position) else {
                continue;
            };
            if widget.base().is_visible() {
                widget.draw(frame, eye, rcx);
            }
        }
    }

    pub fn trigger_items(&mut self, frame: &FrameContext) {
        for (_, widget) in self.cache.iter_ready_mut() {
            widget.perform_trigger_if_looking_at(frame);
        }
    }

    pub fn visit_items(&self, visit: &mut dyn FnMut(&dyn Widget)) {
        for (_, widget) in self.cache.iter_ready() {
            visit(widget);
        }
    }
}

/// Operations common to the virtualized views.
pub trait AdapterView: Widget {
    fn set_adapter(&mut self, source: Box<dyn DataSource>);

    fn request_widget_at(&mut self, position: usize) -> Option<&mut BoxedWidget>;

    fn is_item_visible(&self, position: usize) -> bool;

    /// Rebuilds the item cache before the next frame's update. Draws of the
    /// current frame keep showing the old items.
    fn notify_data_set_changed(&self);

    fn scroll_offset(&self) -> f32;

    fn set_scroll_offset(&mut self, offset: f32);
}
