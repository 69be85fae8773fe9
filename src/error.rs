use crate::vertex_format::VertexAttribute;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{0} must be defined based on the specified vertex format")]
    MissingAttribute(VertexAttribute),
    #[error("a triangle requires exactly 3 vertices, got {0}")]
    InvalidVertexCount(usize),
    #[error("no vertex at index {0}")]
    MissingVertex(usize),
    #[error("either triangles or positions and colors must be defined")]
    MissingGeometryInput,
    #[error("positions must have at least a length of 3 and the length must be a multiple of 3, got {0}")]
    InvalidPositionCount(usize),
    #[error("colors must have the same length as positions ({positions} positions, {colors} colors)")]
    ColorCountMismatch { positions: usize, colors: usize },
    #[error("not enough points to form a polygon")]
    NotEnoughPoints,
    #[error("triangulation failed: {0}")]
    TriangulationFailed(String),
}

impl From<earcutr::Error> for Error {
    fn from(err: earcutr::Error) -> Self {
        Error::TriangulationFailed(format!("{:?}", err))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
