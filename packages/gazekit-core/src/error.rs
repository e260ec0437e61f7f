use thiserror::Error;

/// Reasons a geometry payload cannot be turned into mesh buffers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("geometry has no vertex positions")]
    Empty,

    #[error("index {index} at slot {slot} references a missing vertex (vertex count {vertex_count})")]
    IndexOutOfRange { slot: usize, index: u16, vertex_count: usize },

    #[error("{attribute} holds {actual} entries but there are {expected} vertices")]
    AttributeLength {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("flat position array length {0} is not a multiple of 3")]
    NotTriples(usize),

    #[error("index count {0} does not describe whole triangles")]
    IncompleteTriangle(usize),

    #[error("{0} vertices exceed the 16-bit index range")]
    TooManyVertices(usize),
}
