use std::rc::Rc;

use nalgebra::{Vector2, Vector3};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::vertex_format::{VertexAttribute, VertexFormat};

/// Optional per-vertex fields, checked against a [`VertexFormat`] by
/// [`Vertex::new`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexAttributes {
    pub id: Option<String>,
    pub position: Option<Vector3<f64>>,
    pub normal: Option<Vector3<f64>>,
    pub tangent: Option<Vector3<f64>>,
    pub binormal: Option<Vector3<f64>>,
    pub tex_coord: Option<Vector2<f64>>,
    pub color: Option<Color>,
}

impl VertexAttributes {
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_position(mut self, position: Vector3<f64>) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_normal(mut self, normal: Vector3<f64>) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_tangent(mut self, tangent: Vector3<f64>) -> Self {
        self.tangent = Some(tangent);
        self
    }

    pub fn with_binormal(mut self, binormal: Vector3<f64>) -> Self {
        self.binormal = Some(binormal);
        self
    }

    pub fn with_tex_coord(mut self, tex_coord: Vector2<f64>) -> Self {
        self.tex_coord = Some(tex_coord);
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    fn has(&self, attribute: VertexAttribute) -> bool {
        match attribute {
            VertexAttribute::Position => self.position.is_some(),
            VertexAttribute::Normal => self.normal.is_some(),
            VertexAttribute::TexCoord => self.tex_coord.is_some(),
            VertexAttribute::Tangent => self.tangent.is_some(),
            VertexAttribute::Binormal => self.binormal.is_some(),
            VertexAttribute::Color => self.color.is_some(),
        }
    }
}

const CHECK_ORDER: [VertexAttribute; 6] = [
    VertexAttribute::Position,
    VertexAttribute::Normal,
    VertexAttribute::TexCoord,
    VertexAttribute::Binormal,
    VertexAttribute::Tangent,
    VertexAttribute::Color,
];

fn first_missing(
    attributes: &VertexAttributes,
    vertex_format: VertexFormat,
) -> Option<VertexAttribute> {
    CHECK_ORDER
        .into_iter()
        .find(|&a| vertex_format.requires(a) && !attributes.has(a))
}

/// One mesh vertex. Every attribute its format requires is present.
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    attributes: VertexAttributes,
    vertex_format: VertexFormat,
}

impl Vertex {
    pub fn new(attributes: VertexAttributes, vertex_format: VertexFormat) -> Result<Self> {
        if let Some(missing) = first_missing(&attributes, vertex_format) {
            return Err(Error::MissingAttribute(missing));
        }
        Ok(Self {
            attributes,
            vertex_format,
        })
    }

    /// Shorthand for a [`VertexFormat::POSITION_AND_COLOR`] vertex.
    pub fn colored(position: Vector3<f64>, color: Color) -> Self {
        Self {
            attributes: VertexAttributes::default()
                .with_position(position)
                .with_color(color),
            vertex_format: VertexFormat::POSITION_AND_COLOR,
        }
    }

    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.attributes.id.as_deref()
    }

    #[inline]
    pub fn position(&self) -> Option<&Vector3<f64>> {
        self.attributes.position.as_ref()
    }

    #[inline]
    pub fn normal(&self) -> Option<&Vector3<f64>> {
        self.attributes.normal.as_ref()
    }

    #[inline]
    pub fn tangent(&self) -> Option<&Vector3<f64>> {
        self.attributes.tangent.as_ref()
    }

    #[inline]
    pub fn binormal(&self) -> Option<&Vector3<f64>> {
        self.attributes.binormal.as_ref()
    }

    #[inline]
    pub fn tex_coord(&self) -> Option<&Vector2<f64>> {
        self.attributes.tex_coord.as_ref()
    }

    #[inline]
    pub fn color(&self) -> Option<&Color> {
        self.attributes.color.as_ref()
    }

    #[inline]
    pub fn attributes(&self) -> &VertexAttributes {
        &self.attributes
    }

    #[inline]
    pub fn vertex_format(&self) -> &VertexFormat {
        &self.vertex_format
    }
}

/// Three vertices forming one face. Vertices may be shared between triangles.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    id: Option<String>,
    vertices: [Rc<Vertex>; 3],
    vertex_format: VertexFormat,
}

impl Triangle {
    pub fn new(vertices: Vec<Rc<Vertex>>) -> Result<Self> {
        Self::with_format(None, vertices, VertexFormat::default())
    }

    pub fn with_format(
        id: Option<String>,
        vertices: Vec<Rc<Vertex>>,
        vertex_format: VertexFormat,
    ) -> Result<Self> {
        let count = vertices.len();
        let vertices: [Rc<Vertex>; 3] = vertices
            .try_into()
            .map_err(|_| Error::InvalidVertexCount(count))?;
        if let Some(missing) = vertices
            .iter()
            .find_map(|v| first_missing(v.attributes(), vertex_format))
        {
            return Err(Error::MissingAttribute(missing));
        }
        Ok(Self {
            id,
            vertices,
            vertex_format,
        })
    }

    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    #[inline]
    pub fn vertices(&self) -> &[Rc<Vertex>; 3] {
        &self.vertices
    }

    #[inline]
    pub fn vertex_format(&self) -> &VertexFormat {
        &self.vertex_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn full_attributes() -> VertexAttributes {
        VertexAttributes::default()
            .with_id("v")
            .with_position(Vector3::new(1.0, 2.0, 3.0))
            .with_normal(Vector3::z())
            .with_tangent(Vector3::x())
            .with_binormal(Vector3::y())
            .with_tex_coord(Vector2::new(0.5, 0.25))
            .with_color(Color::RED)
    }

    fn format_from_bits(bits: u8) -> VertexFormat {
        VertexFormat {
            position: bits & 1 != 0,
            normal: bits & 2 != 0,
            tex_coord: bits & 4 != 0,
            tangent: bits & 8 != 0,
            binormal: bits & 16 != 0,
            color: bits & 32 != 0,
        }
    }

    fn attributes_from_bits(bits: u8) -> VertexAttributes {
        let full = full_attributes();
        VertexAttributes {
            id: full.id,
            position: full.position.filter(|_| bits & 1 != 0),
            normal: full.normal.filter(|_| bits & 2 != 0),
            tex_coord: full.tex_coord.filter(|_| bits & 4 != 0),
            tangent: full.tangent.filter(|_| bits & 8 != 0),
            binormal: full.binormal.filter(|_| bits & 16 != 0),
            color: full.color.filter(|_| bits & 32 != 0),
        }
    }

    #[test]
    fn missing_color_is_rejected_by_default_format() {
        let attributes = VertexAttributes::default().with_position(Vector3::zeros());
        assert_eq!(
            Vertex::new(attributes, VertexFormat::default()),
            Err(Error::MissingAttribute(VertexAttribute::Color))
        );
    }

    #[test]
    fn position_checked_first() {
        assert_eq!(
            Vertex::new(VertexAttributes::default(), VertexFormat::ALL),
            Err(Error::MissingAttribute(VertexAttribute::Position))
        );
    }

    #[test]
    fn unrequested_fields_are_preserved() {
        let vertex = Vertex::new(full_attributes(), VertexFormat::POSITION_ONLY).unwrap();
        assert_eq!(vertex.attributes(), &full_attributes());
        assert_eq!(vertex.id(), Some("v"));
        assert_eq!(vertex.color(), Some(&Color::RED));
    }

    #[quickcheck]
    fn construction_matches_format(format_bits: u8, field_bits: u8) -> bool {
        let format = format_from_bits(format_bits);
        let attributes = attributes_from_bits(field_bits);
        let satisfied = (format_bits & 63) & !(field_bits & 63) == 0;
        match Vertex::new(attributes.clone(), format) {
            Ok(vertex) => satisfied && vertex.attributes() == &attributes,
            Err(Error::MissingAttribute(_)) => !satisfied,
            Err(_) => false,
        }
    }

    #[test]
    fn triangle_requires_three_vertices() {
        let v = Rc::new(Vertex::colored(Vector3::zeros(), Color::BLUE));
        assert_eq!(
            Triangle::new(vec![v.clone(), v.clone()]),
            Err(Error::InvalidVertexCount(2))
        );
        assert_eq!(
            Triangle::new(vec![v.clone(), v.clone(), v.clone(), v.clone()]),
            Err(Error::InvalidVertexCount(4))
        );
        assert!(Triangle::new(vec![v.clone(), v.clone(), v]).is_ok());
    }

    #[test]
    fn triangle_checks_vertices_against_its_format() {
        let bare = Rc::new(
            Vertex::new(
                VertexAttributes::default().with_position(Vector3::x()),
                VertexFormat::POSITION_ONLY,
            )
            .unwrap(),
        );
        let corners = vec![bare.clone(), bare.clone(), bare];
        assert_eq!(
            Triangle::new(corners.clone()),
            Err(Error::MissingAttribute(VertexAttribute::Color))
        );
        assert_eq!(
            Triangle::with_format(None, corners.clone(), VertexFormat::POSITION_AND_COLOR),
            Err(Error::MissingAttribute(VertexAttribute::Color))
        );
        assert!(Triangle::with_format(None, corners, VertexFormat::POSITION_ONLY).is_ok());
    }

    #[test]
    fn triangles_share_vertices() {
        let shared = Rc::new(Vertex::colored(Vector3::x(), Color::GREEN));
        let other = Rc::new(Vertex::colored(Vector3::y(), Color::GREEN));
        let a = Triangle::new(vec![shared.clone(), other.clone(), other.clone()]).unwrap();
        let b = Triangle::new(vec![other.clone(), shared.clone(), other]).unwrap();
        assert!(Rc::ptr_eq(&a.vertices()[0], &b.vertices()[1]));
        assert_eq!(Rc::strong_count(&shared), 3);
    }
}
