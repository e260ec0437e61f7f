use std::cell::Cell;
use std::rc::Rc;

/// Shared scroll position clamped to `[0, max]`. Clones observe the same
/// value, so affordance listeners can scroll their owning view.
#[derive(Debug, Clone)]
pub struct ScrollOffset {
    value: Rc<Cell<f32>>,
    max: Rc<Cell<f32>>,
}

impl Default for ScrollOffset {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollOffset {
    pub fn new() -> Self {
        Self {
            value: Rc::new(Cell::new(0.0)),
            max: Rc::new(Cell::new(f32::MAX)),
        }
    }

    pub fn get(&self) -> f32 {
        self.value.get()
    }

    pub fn max(&self) -> f32 {
        self.max.get()
    }

    pub fn set(&self, value: f32) {
        let clamped = if value.is_finite() { value.clamp(0.0, self.max.get()) } else { 0.0 };
        self.value.set(clamped);
    }

    pub fn scroll_by(&self, delta: f32) {
        self.set(self.get() + delta);
    }

    /// Updates the upper bound and re-clamps the current value.
    pub fn set_max(&self, max: f32) {
        self.max.set(max.max(0.0));
        self.set(self.get());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamps_to_range() {
        let offset = ScrollOffset::new();
        offset.set_max(2.0);
        offset.scroll_by(5.0);
        assert_eq!(offset.get(), 2.0);
        offset.scroll_by(-10.0);
        assert_eq!(offset.get(), 0.0);
    }

    #[test]
    fn test_clones_share_state() {
        let offset = ScrollOffset::new();
        let other = offset.clone();
        other.set(1.5);
        assert_eq!(offset.get(), 1.5);
    }

    #[test]
    fn test_shrinking_max_reclamps() {
        let offset = ScrollOffset::new();
        offset.set(3.0);
        offset.set_max(1.0);
        assert_eq!(offset.get(), 1.0);
    }
}
