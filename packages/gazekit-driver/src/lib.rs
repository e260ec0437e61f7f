pub mod camera;
pub mod clock;
pub mod driver;
pub mod error;
pub mod queue;

pub use camera::{Camera, CameraConfig};
pub use clock::{Clock, ManualClock, SystemClock};
pub use driver::{EyeView, HeadPose, SceneId, StereoDriver};
pub use error::DriverError;
pub use queue::{DriverEvent, EventQueue};
