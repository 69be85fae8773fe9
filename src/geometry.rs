use nalgebra::Vector3;

use crate::bounding_sphere::BoundingSphere;
use crate::color::Color;
use crate::ellipsoid::{Ellipsoid, RADIANS_PER_DEGREE};
use crate::error::{Error, Result};
use crate::mesh::{self, Geometry, GeometryAttributes, IndexBuffer, MeshBuffer, PrimitiveType};
use crate::polygon::build_group;
use crate::vertex::Triangle;
use crate::vertex_format::{VertexAttribute, VertexFormat};

/// Height above the ellipsoid every assembled vertex is moved to.
const GROUND_HEIGHT: f64 = 0.0;

/// Input for [`MultiColorTriangleGeometry::new`]. Either `triangles` or
/// `positions` (with parallel `colors`) must be set; both may be.
#[derive(Debug, Clone)]
pub struct GeometryOptions {
    pub triangles: Option<Vec<Triangle>>,
    /// Every three consecutive positions form one triangle.
    pub positions: Option<Vec<Vector3<f64>>>,
    pub colors: Option<Vec<Color>>,
    pub ellipsoid: Ellipsoid,
    pub vertex_format: VertexFormat,
    pub granularity: f64,
    pub connect_vertices: bool,
}

impl Default for GeometryOptions {
    fn default() -> Self {
        Self {
            triangles: None,
            positions: None,
            colors: None,
            ellipsoid: Ellipsoid::wgs84(),
            vertex_format: VertexFormat::POSITION_AND_COLOR,
            granularity: RADIANS_PER_DEGREE,
            connect_vertices: false,
        }
    }
}

impl GeometryOptions {
    pub fn from_triangles(triangles: Vec<Triangle>) -> Self {
        Self {
            triangles: Some(triangles),
            ..Self::default()
        }
    }

    pub fn from_positions(positions: Vec<Vector3<f64>>, colors: Vec<Color>) -> Self {
        Self {
            positions: Some(positions),
            colors: Some(colors),
            ..Self::default()
        }
    }
}

/// Three corners with their colors, the unit consumed by [`build_group`].
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleGroup {
    pub positions: [Vector3<f64>; 3],
    pub colors: [Color; 3],
}

impl TriangleGroup {
    fn from_triangle(triangle: &Triangle) -> Result<Self> {
        let [a, b, c] = triangle.vertices();
        let position = |v: &crate::vertex::Vertex| {
            v.position()
                .copied()
                .ok_or(Error::MissingAttribute(VertexAttribute::Position))
        };
        let color = |v: &crate::vertex::Vertex| {
            v.color()
                .copied()
                .ok_or(Error::MissingAttribute(VertexAttribute::Color))
        };
        Ok(Self {
            positions: [position(a)?, position(b)?, position(c)?],
            colors: [color(a)?, color(b)?, color(c)?],
        })
    }
}

/// A set of independently colored triangles merged into one mesh on the
/// surface of an ellipsoid.
#[derive(Debug, Clone)]
pub struct MultiColorTriangleGeometry {
    groups: Vec<TriangleGroup>,
    ellipsoid: Ellipsoid,
    vertex_format: VertexFormat,
    granularity: f64,
    connect_vertices: bool,
}

impl MultiColorTriangleGeometry {
    pub fn new(options: GeometryOptions) -> Result<Self> {
        if options.positions.is_none() && options.triangles.is_none() {
            return Err(Error::MissingGeometryInput);
        }

        let mut groups = Vec::new();

        if let Some(positions) = &options.positions {
            if positions.is_empty() || positions.len() % 3 != 0 {
                return Err(Error::InvalidPositionCount(positions.len()));
            }
            let colors = options.colors.as_deref().unwrap_or_default();
            if colors.len() != positions.len() {
                return Err(Error::ColorCountMismatch {
                    positions: positions.len(),
                    colors: colors.len(),
                });
            }
            groups.extend(
                positions
                    .chunks_exact(3)
                    .zip(colors.chunks_exact(3))
                    .map(|(p, c)| TriangleGroup {
                        positions: [p[0], p[1], p[2]],
                        colors: [c[0], c[1], c[2]],
                    }),
            );
        }

        for triangle in options.triangles.iter().flatten() {
            groups.push(TriangleGroup::from_triangle(triangle)?);
        }

        if groups.is_empty() {
            return Err(Error::MissingGeometryInput);
        }

        Ok(Self {
            groups,
            ellipsoid: options.ellipsoid,
            vertex_format: options.vertex_format,
            granularity: options.granularity,
            connect_vertices: options.connect_vertices,
        })
    }

    #[inline]
    pub fn groups(&self) -> &[TriangleGroup] {
        &self.groups
    }

    #[inline]
    pub fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }

    #[inline]
    pub fn vertex_format(&self) -> &VertexFormat {
        &self.vertex_format
    }

    /// Angular distance between samples, in radians. Not used when building.
    #[inline]
    pub fn granularity(&self) -> f64 {
        self.granularity
    }

    /// Not used when building.
    #[inline]
    pub fn connect_vertices(&self) -> bool {
        self.connect_vertices
    }

    /// Builds every group, flattens it onto the ellipsoid, and merges the
    /// results into one triangle-list geometry.
    #[tracing::instrument(skip(self), fields(groups = self.groups.len()))]
    pub fn create_geometry(&self) -> Result<Geometry> {
        let mut scratch = Vec::with_capacity(3);
        let buffers = self
            .groups
            .iter()
            .map(|group| {
                let mut buffer =
                    build_group(&self.ellipsoid, &group.positions, &group.colors, &mut scratch)?;
                buffer.scale_to_geodetic_height(GROUND_HEIGHT, &self.ellipsoid);
                Ok(buffer)
            })
            .collect::<Result<Vec<MeshBuffer>>>()?;

        let combined = mesh::combine(&buffers);
        let vertex_count = combined.vertex_count();
        let indices = IndexBuffer::from_indices(vertex_count, &combined.indices);
        let bounding_sphere = BoundingSphere::from_vertices(&combined.positions);

        tracing::debug!(
            vertices = vertex_count,
            indices = indices.len(),
            radius = bounding_sphere.radius,
            "assembled geometry"
        );

        // Position data is dropped when the format does not request it, even
        // though a renderer cannot rasterize the result without it.
        let position = self.vertex_format.position.then_some(combined.positions);

        Ok(Geometry {
            attributes: GeometryAttributes {
                position,
                color: combined.colors,
            },
            indices,
            primitive_type: PrimitiveType::Triangles,
            bounding_sphere,
        })
    }
}
