pub mod snapshot;

pub use snapshot::{SceneSnapshot, WidgetNode};

#[cfg(debug_assertions)]
mod internal {
    use crate::snapshot::SceneSnapshot;
    use gazekit_core::Scene;
    use serde::{Deserialize, Serialize};
    use std::sync::{Mutex, MutexGuard, OnceLock};

    #[derive(Debug, Clone, Serialize, Deserialize, Default)]
    pub struct FrameMetrics {
        pub draw_calls: usize,
        pub texture_uploads: usize,
        pub live_widgets: usize,
    }

    #[derive(Debug, Clone, Serialize, Deserialize, Default)]
    pub struct DevToolsSnapshot {
        pub frames: u64,
        pub scene: Option<SceneSnapshot>,
        pub metrics: FrameMetrics,
    }

    /// Receives snapshots as frames are recorded.
    pub trait DevBridge: Send + Sync {
        fn send_snapshot(&self, snapshot: &DevToolsSnapshot);
    }

    pub struct DevToolsContext {
        snapshot: Mutex<DevToolsSnapshot>,
        bridge: Mutex<Option<Box<dyn DevBridge>>>,
    }

    impl Default for DevToolsContext {
        fn default() -> Self {
            Self::new()
        }
    }

    fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
        mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    impl DevToolsContext {
        pub fn new() -> Self {
            Self {
                snapshot: Mutex::new(DevToolsSnapshot::default()),
                bridge: Mutex::new(None),
            }
        }

        pub fn set_bridge(&self, bridge: Box<dyn DevBridge>) {
            *lock(&self.bridge) = Some(bridge);
        }

        /// Captures `scene` and counts one frame.
        pub fn record_frame(&self, scene: &Scene) {
            let mut snapshot = lock(&self.snapshot);
            snapshot.frames += 1;
            let captured = SceneSnapshot::capture(scene);
            snapshot.metrics.live_widgets = captured.len();
            tracing::trace!(frame = snapshot.frames, widgets = captured.len(), "devtools frame recorded");
            snapshot.scene = Some(captured);

            if let Some(bridge) = lock(&self.bridge).as_ref() {
                bridge.send_snapshot(&snapshot);
            }
        }

        pub fn update_metrics(&self, draw_calls: usize, texture_uploads: usize) {
            let mut snapshot = lock(&self.snapshot);
            snapshot.metrics.draw_calls = draw_calls;
            snapshot.metrics.texture_uploads = texture_uploads;
        }

        pub fn frames(&self) -> u64 {
            lock(&self.snapshot).frames
        }

        pub fn latest_scene(&self) -> Option<SceneSnapshot> {
            lock(&self.snapshot).scene.clone()
        }

        pub fn export_state(&self) -> String {
            let snapshot = lock(&self.snapshot);
            serde_json::to_string(&*snapshot).unwrap_or_default()
        }

        pub fn reset(&self) {
            *lock(&self.snapshot) = DevToolsSnapshot::default();
        }
    }

    pub static DEVTOOLS: OnceLock<DevToolsContext> = OnceLock::new();
}

#[cfg(debug_assertions)]
pub use internal::*;

// Release builds keep the API but record nothing.
#[cfg(not(debug_assertions))]
pub mod production {
    use crate::snapshot::SceneSnapshot;
    use gazekit_core::Scene;

    pub struct DevToolsContext;

    impl DevToolsContext {
        pub fn record_frame(&self, _: &Scene) {}
        pub fn update_metrics(&self, _: usize, _: usize) {}
        pub fn frames(&self) -> u64 {
            0
        }
        pub fn latest_scene(&self) -> Option<SceneSnapshot> {
            None
        }
        pub fn export_state(&self) -> String {
            String::from("{}")
        }
        pub fn reset(&self) {}
    }

    pub static DEVTOOLS: DevToolsContext = DevToolsContext;
}

#[cfg(not(debug_assertions))]
pub use production::*;

pub fn devtools() -> &'static DevToolsContext {
    #[cfg(debug_assertions)]
    {
        DEVTOOLS.get_or_init(DevToolsContext::new)
    }
    #[cfg(not(debug_assertions))]
    {
        &DEVTOOLS
    }
}
