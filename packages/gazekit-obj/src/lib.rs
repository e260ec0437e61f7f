pub mod error;
pub mod parser;

pub use error::ObjError;
pub use parser::{FaceVertex, ObjModel, load, mesh_widget, parse};
