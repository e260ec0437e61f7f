use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Where the virtual camera starts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub eye: Vec3,
    pub look_at: Vec3,
    pub up: Vec3,
    pub z_near: f32,
    pub z_far: f32,
    /// Light position in world space.
    pub light: Vec3,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 7.0),
            look_at: Vec3::new(0.0, 0.0, -1.0),
            up: Vec3::Y,
            z_near: 1.0,
            z_far: 100.0,
            light: Vec3::new(-2.0, 1.0, -2.0),
        }
    }
}

/// World-to-camera transform, re-centerable on the current head pose.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    config: CameraConfig,
    view: Mat4,
}

impl Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            view: Self::base_view(&config),
            config,
        }
    }

    fn base_view(config: &CameraConfig) -> Mat4 {
        Mat4::look_at_rh(config.eye, config.look_at, config.up)
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    pub fn position(&self) -> Vec3 {
        self.config.eye
    }

    /// Folds the inverse of `eye_view` into the camera so the current head
    /// orientation becomes straight ahead.
    pub fn recenter(&mut self, eye_view: Mat4) {
        self.view = eye_view.inverse() * Self::base_view(&self.config);
    }

    /// View matrix for one eye.
    pub fn eye_view(&self, eye_view: Mat4, locked: bool) -> Mat4 {
        if locked { self.view } else { eye_view * self.view }
    }

    pub fn light_in_eye_space(&self, view: Mat4) -> Vec3 {
        view.transform_point3(self.config.light)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(CameraConfig::default())
    }
}
