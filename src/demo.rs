//! The fixed demo scene: five colored vertices over the south-western
//! United States joined into four triangles.

use std::rc::Rc;

use crate::appearance::Appearance;
use crate::color::Color;
use crate::ellipsoid::Ellipsoid;
use crate::error::{Error, Result};
use crate::geometry::{GeometryOptions, MultiColorTriangleGeometry};
use crate::primitive::Primitive;
use crate::vertex::{Triangle, Vertex, VertexAttributes};
use crate::vertex_format::VertexFormat;

pub const DEMO_ALPHA: f32 = 180.0 / 255.0;

/// Longitude, latitude (degrees) and height (meters) of each demo vertex.
pub const DEMO_LOCATIONS: [(f64, f64, f64); 5] = [
    (-115.0, 36.0, 0.0),
    (-115.0, 32.0, 0.0),
    (-112.0, 33.0, 100_000.0),
    (-110.0, 31.0, 0.0),
    (-110.0, 35.0, 0.0),
];

pub const DEMO_COLORS: [Color; 5] = [
    Color::RED,
    Color::BLUE,
    Color::GREEN,
    Color::ORANGE,
    Color::AQUA,
];

pub const DEMO_TRIANGLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 2, 4], [3, 2, 4], [1, 2, 3]];

pub fn demo_vertices(ellipsoid: &Ellipsoid) -> Result<Vec<Rc<Vertex>>> {
    DEMO_LOCATIONS
        .iter()
        .zip(DEMO_COLORS)
        .enumerate()
        .map(|(i, (&(longitude, latitude, height), color))| {
            let attributes = VertexAttributes::default()
                .with_id(format!("vertex-{i}"))
                .with_position(ellipsoid.from_degrees(longitude, latitude, height))
                .with_color(color.with_alpha(DEMO_ALPHA));
            Vertex::new(attributes, VertexFormat::POSITION_AND_COLOR).map(Rc::new)
        })
        .collect()
}

pub fn demo_triangles(vertices: &[Rc<Vertex>]) -> Result<Vec<Triangle>> {
    DEMO_TRIANGLES
        .iter()
        .map(|corners| {
            let corners = corners
                .iter()
                .map(|&i| vertices.get(i).cloned().ok_or(Error::MissingVertex(i)))
                .collect::<Result<Vec<_>>>()?;
            Triangle::new(corners)
        })
        .collect()
}

pub fn demo_geometry() -> Result<MultiColorTriangleGeometry> {
    let ellipsoid = Ellipsoid::wgs84();
    let vertices = demo_vertices(&ellipsoid)?;
    let triangles = demo_triangles(&vertices)?;
    MultiColorTriangleGeometry::new(GeometryOptions {
        ellipsoid,
        ..GeometryOptions::from_triangles(triangles)
    })
}

/// The demo geometry ready to add to a scene, drawn with the default
/// appearance both normally and where it fails the depth test.
pub fn demo_primitive() -> Result<Primitive> {
    let geometry = demo_geometry()?.create_geometry()?;
    Ok(Primitive::new(geometry, Appearance::default())
        .with_depth_fail_appearance(Appearance::default()))
}
