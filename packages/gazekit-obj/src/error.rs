use gazekit_core::GeometryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("line {line}: face references {kind} {index} but only {available} are defined")]
    BadReference {
        line: usize,
        kind: &'static str,
        index: i64,
        available: usize,
    },

    #[error("model has more than 65536 unique vertices")]
    TooManyVertices,

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("failed to read OBJ file: {0}")]
    Io(#[from] std::io::Error),
}
