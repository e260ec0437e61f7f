use crate::config::DwellConfig;
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Below this magnitude the forward vector is treated as parallel to the widget plane.
pub const GAZE_EPSILON: f32 = 1e-6;

/// Which eye a draw pass renders for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Eye {
    Left,
    Right,
    Mono,
}

/// Everything a widget may read during one update or draw pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameContext {
    pub view: Mat4,
    pub projection: Mat4,
    pub camera_position: Vec3,
    pub forward: Vec3,
    /// Light position in eye space.
    pub light_position: Vec3,
    pub focus_mode: bool,
    pub time: Duration,
    pub dwell: DwellConfig,
}

impl Default for FrameContext {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameContext {
    pub fn new() -> Self {
        Self {
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
            camera_position: Vec3::new(0.0, 0.0, 7.0),
            forward: Vec3::new(0.0, 0.0, -1.0),
            light_position: Vec3::ZERO,
            focus_mode: false,
            time: Duration::ZERO,
            dwell: DwellConfig::default(),
        }
    }

    pub fn dwell_threshold(&self) -> Duration {
        self.dwell.threshold()
    }

    /// Intersection of the gaze ray with the plane `z = plane_z`, in that
    /// plane's XY coordinates. `None` for a degenerate forward vector.
    pub fn gaze_point_at(&self, plane_z: f32) -> Option<Vec2> {
        let forward_z = self.forward.z;
        if !forward_z.is_finite() || forward_z.abs() < GAZE_EPSILON {
            return None;
        }
        let multiplier = (self.camera_position.z - plane_z) / forward_z;
        let point = Vec2::new(self.forward.x * multiplier, self.forward.y * multiplier);
        point.is_finite().then_some(point)
    }

    /// Points the forward vector so that `gaze_point_at(plane_z)` returns
    /// `point`. The vector is left unnormalized so the projection is exact.
    pub fn look_at_point(&mut self, point: Vec2, plane_z: f32) {
        let depth = self.camera_position.z - plane_z;
        self.forward = Vec3::new(point.x, point.y, depth);
    }

    pub fn with_time(mut self, time: Duration) -> Self {
        self.time = time;
        self
    }

    pub fn with_focus_mode(mut self, focus_mode: bool) -> Self {
        self.focus_mode = focus_mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaze_point_projection() {
        let mut frame = FrameContext::new();
        frame.forward = Vec3::new(0.1, 0.2, 1.0);
        let point = frame.gaze_point_at(0.0).unwrap();
        assert!((point.x - 0.7).abs() < 1e-5);
        assert!((point.y - 1.4).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_forward_has_no_gaze_point() {
        let mut frame = FrameContext::new();
        frame.forward = Vec3::new(1.0, 0.0, 0.0);
        assert!(frame.gaze_point_at(0.0).is_none());
        frame.forward = Vec3::new(0.0, 0.0, f32::NAN);
        assert!(frame.gaze_point_at(0.0).is_none());
    }

    #[test]
    fn test_look_at_point_round_trips() {
        let mut frame = FrameContext::new();
        frame.look_at_point(Vec2::new(1.5, -0.25), 0.5);
        let point = frame.gaze_point_at(0.5).unwrap();
        assert!((point - Vec2::new(1.5, -0.25)).length() < 1e-5);
    }
}
