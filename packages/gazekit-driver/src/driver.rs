use crate::camera::{Camera, CameraConfig};
use crate::clock::{Clock, SystemClock};
use crate::error::DriverError;
use crate::queue::{DriverEvent, EventQueue};
use gazekit_core::{DwellConfig, Eye, FrameContext, RenderContext, Scene};
use glam::{Mat4, Vec3};
use slotmap::{SlotMap, new_key_type};
use std::time::Duration;

new_key_type! {
    pub struct SceneId;
}

/// Head tracking sample for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadPose {
    pub head_view: Mat4,
    /// Gaze direction in world space.
    pub forward: Vec3,
}

impl Default for HeadPose {
    fn default() -> Self {
        Self {
            head_view: Mat4::IDENTITY,
            forward: Vec3::NEG_Z,
        }
    }
}

impl HeadPose {
    pub fn looking(forward: Vec3) -> Self {
        Self {
            forward,
            ..Self::default()
        }
    }
}

/// Per-eye transforms supplied by the platform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EyeView {
    pub eye: Eye,
    pub view: Mat4,
    pub projection: Mat4,
}

impl EyeView {
    /// Symmetric perspective eye offset horizontally by `offset` (half the IPD).
    pub fn perspective(eye: Eye, offset: f32, fov_y: f32, aspect: f32, camera: &CameraConfig) -> Self {
        Self {
            eye,
            view: Mat4::from_translation(Vec3::new(-offset, 0.0, 0.0)),
            projection: Mat4::perspective_rh(fov_y, aspect, camera.z_near, camera.z_far),
        }
    }
}

/// Owns the scenes and turns platform callbacks into `update` and per-eye
/// `draw` passes on the current scene.
pub struct StereoDriver<C: Clock = SystemClock> {
    clock: C,
    camera: Camera,
    scenes: SlotMap<SceneId, Scene>,
    current: Option<SceneId>,
    events: EventQueue,
    head: HeadPose,
    dwell: DwellConfig,
    focus_mode: bool,
    camera_locked: bool,
    reset_pending: bool,
    frame_time: Duration,
    frames: u64,
}

impl<C: Clock> StereoDriver<C> {
    pub fn new(clock: C, camera: CameraConfig) -> Self {
        tracing::info!(eye = ?camera.eye, "stereo driver created");
        Self {
            clock,
            camera: Camera::new(camera),
            scenes: SlotMap::with_key(),
            current: None,
            events: EventQueue::new(),
            head: HeadPose::default(),
            dwell: DwellConfig::default(),
            focus_mode: false,
            camera_locked: false,
            reset_pending: false,
            frame_time: Duration::ZERO,
            frames: 0,
        }
    }

    pub fn with_dwell(mut self, dwell: DwellConfig) -> Self {
        self.dwell = dwell;
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Handle for queueing input from platform callbacks.
    pub fn events(&self) -> EventQueue {
        self.events.clone()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    // Scenes

    pub fn add_scene(&mut self, scene: Scene) -> SceneId {
        self.scenes.insert(scene)
    }

    pub fn remove_scene(&mut self, id: SceneId) -> Option<Scene> {
        if self.current == Some(id) {
            self.current = None;
        }
        self.scenes.remove(id)
    }

    pub fn scene(&self, id: SceneId) -> Option<&Scene> {
        self.scenes.get(id)
    }

    pub fn scene_mut(&mut self, id: SceneId) -> Option<&mut Scene> {
        self.scenes.get_mut(id)
    }

    pub fn current_scene_id(&self) -> Option<SceneId> {
        self.current
    }

    pub fn current_scene(&self) -> Option<&Scene> {
        self.current.and_then(|id| self.scenes.get(id))
    }

    pub fn current_scene_mut(&mut self) -> Option<&mut Scene> {
        self.current.and_then(|id| self.scenes.get_mut(id))
    }

    pub fn set_current_scene(&mut self, id: SceneId) -> Result<(), DriverError> {
        let scene = self
            .scenes
            .get_mut(id)
            .ok_or_else(|| DriverError::UnknownScene(format!("{id:?}")))?;
        scene.content_selected();
        self.current = Some(id);
        tracing::info!(scene = ?id, title = ?scene.title(), "current scene changed");
        Ok(())
    }

    // Modes

    pub fn focus_mode(&self) -> bool {
        self.focus_mode
    }

    pub fn set_focus_mode(&mut self, enabled: bool) {
        if self.focus_mode != enabled {
            tracing::info!(enabled, "focus mode toggled");
        }
        self.focus_mode = enabled;
    }

    pub fn is_camera_locked(&self) -> bool {
        self.camera_locked
    }

    pub fn set_camera_locked(&mut self, locked: bool) {
        self.camera_locked = locked;
    }

    /// Re-centers the camera on the next eye drawn.
    pub fn reset_camera(&mut self) {
        self.reset_pending = true;
    }

    /// Physical trigger. Applied at the start of the next frame.
    pub fn trigger(&self) {
        self.events.push(DriverEvent::Trigger);
    }

    // Frame

    fn base_frame(&self) -> FrameContext {
        let view = self.camera.view();
        FrameContext {
            view,
            projection: Mat4::IDENTITY,
            camera_position: self.camera.position(),
            forward: self.head.forward,
            light_position: self.camera.light_in_eye_space(view),
            focus_mode: self.focus_mode,
            time: self.frame_time,
            dwell: self.dwell,
        }
    }

    fn apply_event(&mut self, event: DriverEvent) {
        match event {
            DriverEvent::Trigger => {
                if self.camera_locked {
                    self.camera_locked = false;
                    tracing::info!("camera unlocked by trigger");
                    return;
                }
                let frame = self.base_frame();
                match self.current_scene_mut() {
                    Some(scene) => scene.perform_trigger_if_looking_at(&frame),
                    None => tracing::debug!("trigger with no current scene"),
                }
            }
            DriverEvent::ResetCamera => self.reset_camera(),
            DriverEvent::SetFocusMode(enabled) => self.set_focus_mode(enabled),
            DriverEvent::SetCameraLocked(locked) => self.set_camera_locked(locked),
        }
    }

    /// Records the head pose, applies queued events and updates the current scene.
    pub fn on_new_frame(&mut self, head: HeadPose, rcx: &mut RenderContext<'_>) {
        self.head = head;
        self.frame_time = self.clock.now();
        self.frames += 1;

        for event in self.events.drain() {
            self.apply_event(event);
        }

        let frame = self.base_frame();
        if let Some(scene) = self.current_scene_mut() {
            scene.update(&frame, rcx);
        }
    }

    /// Draws the current scene for one eye.
    pub fn on_draw_eye(&mut self, eye: &EyeView, rcx: &mut RenderContext<'_>) {
        if self.reset_pending {
            self.camera.recenter(eye.view);
            self.reset_pending = false;
            tracing::info!("camera re-centered");
        }

        let view = self.camera.eye_view(eye.view, self.camera_locked);
        let frame = FrameContext {
            view,
            projection: eye.projection,
            light_position: self.camera.light_in_eye_space(view),
            ..self.base_frame()
        };
        if let Some(scene) = self.current_scene_mut() {
            scene.draw(&frame, eye.eye, rcx);
        }
    }

    /// One full frame: update, then one draw per eye.
    pub fn run_frame(&mut self, head: HeadPose, eyes: &[EyeView], rcx: &mut RenderContext<'_>) {
        self.on_new_frame(head, rcx);
        for eye in eyes {
            self.on_draw_eye(eye, rcx);
        }
    }
}
