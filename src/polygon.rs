use earcutr::earcut;
use geo::{Area, Coord, LineString, Polygon};
use nalgebra::Vector3;

use crate::color::Color;
use crate::ellipsoid::Ellipsoid;
use crate::error::{Error, Result};
use crate::mesh::MeshBuffer;
use crate::tangent_plane::TangentPlane;

/// Index triple used when triangulation cannot produce a face.
pub const FALLBACK_INDICES: [usize; 3] = [0, 1, 2];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WindingOrder {
    Clockwise,
    CounterClockwise,
}

/// Winding of a 2D ring from its signed area. Only a positive area is
/// counter-clockwise, so degenerate rings count as clockwise.
pub fn winding_order(points: &[Coord<f64>]) -> WindingOrder {
    let ring = Polygon::new(LineString::from(points.to_vec()), vec![]);
    if ring.signed_area() > 0.0 {
        WindingOrder::CounterClockwise
    } else {
        WindingOrder::Clockwise
    }
}

/// Reverses the projected points, positions and colors together when the
/// projected ring is clockwise. Returns whether a reversal happened.
pub fn normalize_winding(
    points2d: &mut [Coord<f64>],
    positions: &mut [Vector3<f64>],
    colors: &mut [Color],
) -> bool {
    if winding_order(points2d) != WindingOrder::Clockwise {
        return false;
    }
    points2d.reverse();
    positions.reverse();
    colors.reverse();
    true
}

/// Ear-clips a simple counter-clockwise ring into triangle-list indices.
pub fn triangulate(points2d: &[Coord<f64>]) -> Result<Vec<usize>> {
    let coords: Vec<f64> = points2d.iter().flat_map(|c| [c.x, c.y]).collect();
    Ok(earcut(&coords, &[], 2)?)
}

/// Builds the mesh buffer for one group of positions with parallel colors.
///
/// Positions are projected onto the plane tangent to `ellipsoid` at their
/// centroid, re-wound counter-clockwise and triangulated. Degenerate input
/// never fails: it falls back to [`FALLBACK_INDICES`]. `scratch` receives the
/// projected coordinates and is overwritten on every call.
pub fn build_group(
    ellipsoid: &Ellipsoid,
    positions: &[Vector3<f64>],
    colors: &[Color],
    scratch: &mut Vec<Coord<f64>>,
) -> Result<MeshBuffer> {
    if positions.len() < 3 {
        return Err(Error::NotEnoughPoints);
    }
    if colors.len() != positions.len() {
        return Err(Error::ColorCountMismatch {
            positions: positions.len(),
            colors: colors.len(),
        });
    }

    let mut positions = positions.to_vec();
    let mut colors = colors.to_vec();

    let plane = TangentPlane::from_points(&positions, ellipsoid);
    plane.project_points_onto_plane(&positions, scratch);

    if normalize_winding(scratch, &mut positions, &mut colors) {
        tracing::trace!(vertices = positions.len(), "reversed clockwise group");
    }

    let indices = match triangulate(scratch) {
        Ok(indices) if indices.len() >= 3 => indices,
        Ok(indices) => {
            tracing::warn!(
                indices = indices.len(),
                "group is unrenderable, using the first three vertices"
            );
            FALLBACK_INDICES.to_vec()
        }
        Err(e) => {
            tracing::warn!(error = %e, "triangulation failed, using the first three vertices");
            FALLBACK_INDICES.to_vec()
        }
    };

    let positions: Vec<f64> = positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect();
    let colors: Vec<u8> = colors.iter().flat_map(Color::to_bytes).collect();

    Ok(MeshBuffer {
        positions,
        colors,
        indices,
    })
}
