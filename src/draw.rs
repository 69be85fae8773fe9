use geo::Coord;
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_polygon_mut;
use imageproc::point::Point;
use nalgebra::Vector3;

use crate::ellipsoid::Ellipsoid;
use crate::mesh::Geometry;
use crate::tangent_plane::TangentPlane;

const MARGIN: f64 = 8.0;

pub trait DrawMesh {
    /// Renders a top-down preview of the mesh on the plane tangent to
    /// `ellipsoid` at its centroid, fitted to the image.
    fn draw(&self, width: u32, height: u32, ellipsoid: &Ellipsoid) -> RgbaImage;
}

fn fit_to_image(points: &[Coord<f64>], width: u32, height: u32) -> Vec<Point<i32>> {
    let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
    let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for c in points {
        min_x = min_x.min(c.x);
        min_y = min_y.min(c.y);
        max_x = max_x.max(c.x);
        max_y = max_y.max(c.y);
    }

    let usable_w = (width as f64 - 2.0 * MARGIN).max(1.0);
    let usable_h = (height as f64 - 2.0 * MARGIN).max(1.0);
    let span = (max_x - min_x).max(max_y - min_y);
    let scale = if span > 0.0 { (usable_w / span).min(usable_h / span) } else { 1.0 };

    // Image rows grow downwards, north is up.
    points
        .iter()
        .map(|c| {
            Point::new(
                (MARGIN + (c.x - min_x) * scale).round() as i32,
                (height as f64 - MARGIN - (c.y - min_y) * scale).round() as i32,
            )
        })
        .collect()
}

impl DrawMesh for Geometry {
    fn draw(&self, width: u32, height: u32, ellipsoid: &Ellipsoid) -> RgbaImage {
        let mut img = RgbaImage::new(width, height);

        let Some(positions) = &self.attributes.position else {
            return img;
        };
        let points: Vec<Vector3<f64>> = positions
            .chunks_exact(3)
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();
        if points.is_empty() {
            return img;
        }

        let plane = TangentPlane::from_points(&points, ellipsoid);
        let mut projected = Vec::with_capacity(points.len());
        plane.project_points_onto_plane(&points, &mut projected);
        let pixels = fit_to_image(&projected, width, height);

        let indices = self.indices.to_vec();
        for face in indices.chunks_exact(3) {
            let polygon = [pixels[face[0]], pixels[face[1]], pixels[face[2]]];
            // draw_polygon_mut rejects closed rings
            if polygon[0] == polygon[2] {
                continue;
            }

            let mut rgba = [0u32; 4];
            for &i in face {
                for (channel, &byte) in rgba.iter_mut().zip(&self.attributes.color[i * 4..i * 4 + 4]) {
                    *channel += byte as u32;
                }
            }
            let color = Rgba(rgba.map(|sum| (sum / 3) as u8));

            draw_polygon_mut(&mut img, &polygon, color);
        }

        img
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitted_points_stay_inside_image() {
        let points = [
            Coord { x: -500.0, y: -20.0 },
            Coord { x: 1500.0, y: 40.0 },
            Coord { x: 0.0, y: 900.0 },
        ];
        for p in fit_to_image(&points, 64, 32) {
            assert!((0..64).contains(&p.x) && (0..32).contains(&p.y), "{p:?}");
        }
    }

    #[test]
    fn single_point_does_not_divide_by_zero() {
        let pixels = fit_to_image(&[Coord { x: 3.0, y: 3.0 }], 16, 16);
        assert_eq!(pixels, vec![Point::new(8, 8)]);
    }
}
