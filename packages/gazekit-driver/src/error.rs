use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    #[error("scene {0} is not registered with the driver")]
    UnknownScene(String),

    #[error("no scene is current")]
    NoCurrentScene,
}
