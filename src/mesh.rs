use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use nalgebra::Vector3;

use crate::bounding_sphere::BoundingSphere;
use crate::color::Color;
use crate::ellipsoid::Ellipsoid;

/// Vertex counts at or above this need 32-bit indices.
pub const SIXTY_FOUR_KILOBYTES: usize = 64 * 1024;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PrimitiveType {
    Points,
    Lines,
    Triangles,
}

/// Flat buffers for one triangle group: 3 doubles and 4 normalized bytes per
/// vertex, and triangle-list indices into them.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshBuffer {
    pub positions: Vec<f64>,
    pub colors: Vec<u8>,
    pub indices: Vec<usize>,
}

impl MeshBuffer {
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            colors: Vec::new(),
            indices: Vec::new(),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Moves every vertex to `height` meters above `ellipsoid`, discarding
    /// its original height.
    pub fn scale_to_geodetic_height(&mut self, height: f64, ellipsoid: &Ellipsoid) {
        for p in self.positions.chunks_exact_mut(3) {
            let scaled = ellipsoid.scale_to_geodetic_height(&Vector3::new(p[0], p[1], p[2]), height);
            p.copy_from_slice(scaled.as_slice());
        }
    }
}

impl Default for MeshBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenates vertex buffers and rebases each buffer's indices onto the
/// combined vertex range.
pub fn combine(buffers: &[MeshBuffer]) -> MeshBuffer {
    let mut combined = MeshBuffer {
        positions: Vec::with_capacity(buffers.iter().map(|b| b.positions.len()).sum()),
        colors: Vec::with_capacity(buffers.iter().map(|b| b.colors.len()).sum()),
        indices: Vec::with_capacity(buffers.iter().map(|b| b.indices.len()).sum()),
    };

    for buffer in buffers {
        let offset = combined.vertex_count();
        combined.positions.extend_from_slice(&buffer.positions);
        combined.colors.extend_from_slice(&buffer.colors);
        combined.indices.extend(buffer.indices.iter().map(|i| i + offset));
    }

    combined
}

/// Index storage sized to the vertex count it addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl IndexBuffer {
    pub fn from_indices(vertex_count: usize, indices: &[usize]) -> Self {
        if vertex_count >= SIXTY_FOUR_KILOBYTES {
            IndexBuffer::U32(indices.iter().map(|&i| i as u32).collect())
        } else {
            IndexBuffer::U16(indices.iter().map(|&i| i as u16).collect())
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        match self {
            IndexBuffer::U16(v) => v.len(),
            IndexBuffer::U32(v) => v.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes per index.
    pub fn width(&self) -> usize {
        match self {
            IndexBuffer::U16(_) => 2,
            IndexBuffer::U32(_) => 4,
        }
    }

    pub fn iter(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            IndexBuffer::U16(v) => Box::new(v.iter().map(|&i| i as usize)),
            IndexBuffer::U32(v) => Box::new(v.iter().map(|&i| i as usize)),
        }
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeometryAttributes {
    /// `None` when the vertex format does not request positions.
    pub position: Option<Vec<f64>>,
    pub color: Vec<u8>,
}

/// The assembled mesh handed to a renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub attributes: GeometryAttributes,
    pub indices: IndexBuffer,
    pub primitive_type: PrimitiveType,
    pub bounding_sphere: BoundingSphere,
}

impl Geometry {
    pub fn vertex_count(&self) -> usize {
        self.attributes.color.len() / 4
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn position(&self, index: usize) -> Option<Vector3<f64>> {
        let positions = self.attributes.position.as_ref()?;
        let p = positions.get(index * 3..index * 3 + 3)?;
        Some(Vector3::new(p[0], p[1], p[2]))
    }

    pub fn color(&self, index: usize) -> Option<Color> {
        let c = self.attributes.color.get(index * 4..index * 4 + 4)?;
        Some(Color::from_bytes([c[0], c[1], c[2], c[3]]))
    }

    /// Writes a Wavefront OBJ with per-vertex colors appended to each `v` line.
    pub fn export_obj(&self, path: &Path) -> std::io::Result<()> {
        let positions = self.attributes.position.as_ref().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "geometry has no position attribute",
            )
        })?;

        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "o MultiColorTriangles")?;

        for (p, c) in positions.chunks_exact(3).zip(self.attributes.color.chunks_exact(4)) {
            writeln!(
                writer,
                "v {} {} {} {} {} {}",
                p[0],
                p[1],
                p[2],
                Color::byte_to_float(c[0]),
                Color::byte_to_float(c[1]),
                Color::byte_to_float(c[2]),
            )?;
        }

        // OBJ is 1-based
        let indices = self.indices.to_vec();
        for face in indices.chunks_exact(3) {
            writeln!(writer, "f {} {} {}", face[0] + 1, face[1] + 1, face[2] + 1)?;
        }

        writer.flush()
    }
}
