pub mod appearance;
pub mod bounding_sphere;
pub mod color;
pub mod demo;
pub mod draw;
pub mod ellipsoid;
pub mod error;
pub mod geometry;
pub mod mesh;
pub mod polygon;
pub mod primitive;
pub mod tangent_plane;
pub mod vertex;
pub mod vertex_format;

pub use crate::appearance::{Appearance, AppearanceOptions, RenderState};
pub use crate::bounding_sphere::BoundingSphere;
pub use crate::color::Color;
pub use crate::ellipsoid::Ellipsoid;
pub use crate::error::{Error, Result};
pub use crate::geometry::{GeometryOptions, MultiColorTriangleGeometry, TriangleGroup};
pub use crate::mesh::{Geometry, IndexBuffer, MeshBuffer, PrimitiveType};
pub use crate::primitive::{Primitive, PrimitiveCollection};
pub use crate::vertex::{Triangle, Vertex, VertexAttributes};
pub use crate::vertex_format::{VertexAttribute, VertexFormat};
