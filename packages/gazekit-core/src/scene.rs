use crate::frame::{Eye, FrameContext};
use crate::render::RenderContext;
use crate::widget::{BoxedWidget, Widget, WidgetId};
use crate::widgets::TextLabel;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

const TITLE_SCALE: f32 = 0.4;
const TITLE_LIFT: f32 = 3.0;

#[derive(Default)]
struct PendingMutations {
    adds: SmallVec<[BoxedWidget; 4]>,
    removes: SmallVec<[WidgetId; 4]>,
}

/// Cloneable entry point for structural changes to a scene. Safe to use from
/// listeners that run while the scene is being traversed; changes apply at
/// the end of the next draw pass.
#[derive(Clone, Default)]
pub struct SceneHandle {
    pending: Rc<RefCell<PendingMutations>>,
}

impl fmt::Debug for SceneHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (adds, removes) = self.pending_counts();
        f.debug_struct("SceneHandle")
            .field("pending_adds", &adds)
            .field("pending_removes", &removes)
            .finish()
    }
}

impl SceneHandle {
    pub fn add_view(&self, widget: impl Widget + 'static) -> WidgetId {
        self.add_boxed(Box::new(widget))
    }

    pub fn add_boxed(&self, widget: BoxedWidget) -> WidgetId {
        let id = widget.id();
        self.pending.borrow_mut().adds.push(widget);
        id
    }

    pub fn remove_view(&self, id: WidgetId) {
        self.pending.borrow_mut().removes.push(id);
    }

    /// Queued `(adds, removes)`.
    pub fn pending_counts(&self) -> (usize, usize) {
        let pending = self.pending.borrow();
        (pending.adds.len(), pending.removes.len())
    }

    fn take(&self) -> PendingMutations {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

/// Ordered set of top-level widgets with deferred add/remove and an optional
/// title overlay.
pub struct Scene {
    title: Option<String>,
    show_title: bool,
    title_label: Option<TextLabel>,
    live: Vec<BoxedWidget>,
    handle: SceneHandle,
    on_selected: Option<Box<dyn FnMut()>>,
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("title", &self.title)
            .field("show_title", &self.show_title)
            .field("live", &self.live.len())
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            title: None,
            show_title: false,
            title_label: None,
            live: Vec::new(),
            handle: SceneHandle::default(),
            on_selected: None,
        }
    }

    pub fn with_title(title: impl Into<String>) -> Self {
        let mut scene = Self::new();
        scene.set_title(title);
        scene.set_show_title(true);
        scene
    }

    pub fn handle(&self) -> SceneHandle {
        self.handle.clone()
    }

    /// Queues `widget` for insertion at the end of the next draw pass.
    pub fn add_view(&self, widget: impl Widget + 'static) -> WidgetId {
        self.handle.add_view(widget)
    }

    pub fn add_boxed(&self, widget: BoxedWidget) -> WidgetId {
        self.handle.add_boxed(widget)
    }

    /// Queues removal of `id` at the end of the next draw pass.
    pub fn remove_view(&self, id: WidgetId) {
        self.handle.remove_view(id);
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
        self.title_label = None;
    }

    pub fn is_title_shown(&self) -> bool {
        self.show_title
    }

    pub fn set_show_title(&mut self, show: bool) {
        self.show_title = show;
    }

    pub fn title_label(&self) -> Option<&TextLabel> {
        self.title_label.as_ref()
    }

    pub fn set_on_selected(&mut self, hook: impl FnMut() + 'static) {
        self.on_selected = Some(Box::new(hook));
    }

    /// Called by the driver when this scene becomes current.
    pub fn content_selected(&mut self) {
        tracing::debug!(title = ?self.title, "scene selected");
        if let Some(hook) = self.on_selected.as_mut() {
            hook();
        }
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    pub fn widgets(&self) -> impl Iterator<Item = &dyn Widget> {
        self.live.iter().map(|w| &**w)
    }

    pub fn ids(&self) -> Vec<WidgetId> {
        self.live.iter().map(|w| w.id()).collect()
    }

    pub fn get(&self, id: WidgetId) -> Option<&dyn Widget> {
        self.live.iter().find(|w| w.id() == id).map(|w| &**w)
    }

    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut BoxedWidget> {
        self.live.iter_mut().find(|w| w.id() == id)
    }

    /// Builds the title overlay on the first draw that shows it. The label is
    /// updated once so its texture and quad exist before it is drawn.
    fn ensure_title(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) -> Option<&mut TextLabel> {
        if !self.show_title {
            return None;
        }
        if self.title_label.is_none() {
            let title = self.title.as_deref()?;
            let mut label = TextLabel::new(title);
            label.scale(TITLE_SCALE, TITLE_SCALE, TITLE_SCALE);
            let half_width = label.base().width() / 2.0;
            label.translate(-half_width, TITLE_LIFT, 0.0);
            label.update(frame, rcx);
            tracing::debug!(title, "title overlay built");
            self.title_label = Some(label);
        }
        self.title_label.as_mut()
    }

    pub fn update(&mut self, frame: &FrameContext, rcx: &mut RenderContext<'_>) {
        if self.show_title {
            if let Some(title) = self.title_label.as_mut() {
                title.update(frame, rcx);
            }
        }
        for widget in &mut self.live {
            widget.update(frame, rcx);
        }
    }

    /// Draws the title and every visible widget, then applies queued mutations.
    pub fn draw(&mut self, frame: &FrameContext, eye: Eye, rcx: &mut RenderContext<'_>) {
        if let Some(title) = self.ensure_title(frame, rcx) {
            title.draw(frame, eye, rcx);
        }
        for widget in &mut self.live {
            if widget.base().is_visible() {
                widget.draw(frame, eye, rcx);
            }
        }
        self.apply_pending();
    }

    pub fn perform_trigger_if_looking_at(&mut self, frame: &FrameContext) {
        for widget in &mut self.live {
            widget.perform_trigger_if_looking_at(frame);
        }
    }

    fn apply_pending(&mut self) {
        let PendingMutations { adds, removes } = self.handle.take();
        for widget in adds {
            tracing::debug!(widget = %widget.id(), kind = widget.kind(), "view added");
            self.live.push(widget);
        }
        for id in removes {
            match self.live.iter().position(|w| w.id() == id) {
                Some(index) => {
                    self.live.remove(index);
                    tracing::debug!(widget = %id, "view removed");
                }
                None => tracing::warn!(widget = %id, "view remove failed, widget not in scene"),
            }
        }
    }
}
