use geo::Coord;
use nalgebra::Vector3;

use crate::ellipsoid::Ellipsoid;

const EPSILON15: f64 = 1e-15;

/// A plane tangent to the ellipsoid, with east/north axes spanning it.
#[derive(Debug, Clone, PartialEq)]
pub struct TangentPlane {
    origin: Vector3<f64>,
    x_axis: Vector3<f64>,
    y_axis: Vector3<f64>,
    normal: Vector3<f64>,
}

impl TangentPlane {
    /// Builds the plane tangent to `ellipsoid` below the centroid of `points`.
    pub fn from_points(points: &[Vector3<f64>], ellipsoid: &Ellipsoid) -> Self {
        let centroid = if points.is_empty() {
            Vector3::zeros()
        } else {
            points.iter().sum::<Vector3<f64>>() / points.len() as f64
        };

        match ellipsoid.scale_to_geodetic_surface(&centroid) {
            Some(origin) => Self::at(origin, ellipsoid),
            // Centroid at the ellipsoid center: fall back to the XY plane.
            None => Self {
                origin: centroid,
                x_axis: Vector3::x(),
                y_axis: Vector3::y(),
                normal: Vector3::z(),
            },
        }
    }

    fn at(origin: Vector3<f64>, ellipsoid: &Ellipsoid) -> Self {
        let normal = ellipsoid
            .geodetic_surface_normal(&origin)
            .unwrap_or_else(Vector3::z);
        // East is undefined at the poles.
        let east = Vector3::new(-origin.y, origin.x, 0.0)
            .try_normalize(EPSILON15)
            .unwrap_or_else(Vector3::y);
        let north = normal.cross(&east);
        Self {
            origin,
            x_axis: east,
            y_axis: north,
            normal,
        }
    }

    #[inline]
    pub fn origin(&self) -> &Vector3<f64> {
        &self.origin
    }

    #[inline]
    pub fn normal(&self) -> &Vector3<f64> {
        &self.normal
    }

    fn intersect(&self, ray_origin: &Vector3<f64>, direction: &Vector3<f64>) -> Option<Vector3<f64>> {
        let denominator = self.normal.dot(direction);
        if denominator.abs() < EPSILON15 {
            return None;
        }
        let t = self.normal.dot(&(self.origin - ray_origin)) / denominator;
        if t < 0.0 {
            return None;
        }
        Some(ray_origin + direction * t)
    }

    /// Projects a point onto the plane along its geocentric ray, trying the
    /// reverse ray when the forward one misses. Points whose rays miss both
    /// ways are projected orthogonally so every input yields an output.
    pub fn project_point_onto_plane(&self, point: &Vector3<f64>) -> Coord<f64> {
        let on_plane = point
            .try_normalize(0.0)
            .and_then(|direction| {
                self.intersect(point, &direction)
                    .or_else(|| self.intersect(point, &-direction))
            })
            .unwrap_or_else(|| point - self.normal * self.normal.dot(&(point - self.origin)));

        let v = on_plane - self.origin;
        Coord {
            x: self.x_axis.dot(&v),
            y: self.y_axis.dot(&v),
        }
    }

    /// Projects `points` in order, overwriting `out`.
    pub fn project_points_onto_plane(&self, points: &[Vector3<f64>], out: &mut Vec<Coord<f64>>) {
        out.clear();
        out.extend(points.iter().map(|p| self.project_point_onto_plane(p)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origin_lies_on_surface_below_centroid() {
        let e = Ellipsoid::wgs84();
        let points = [
            e.from_degrees(10.0, 10.0, 500.0),
            e.from_degrees(10.1, 10.0, 500.0),
            e.from_degrees(10.0, 10.1, 500.0),
        ];
        let plane = TangentPlane::from_points(&points, &e);
        let surface = e.scale_to_geodetic_surface(plane.origin()).unwrap();
        assert!((surface - plane.origin()).norm() < 1e-6);
    }

    #[test]
    fn east_and_north_map_to_positive_axes() {
        let e = Ellipsoid::wgs84();
        let center = e.from_degrees(20.0, 40.0, 0.0);
        let east = e.from_degrees(20.01, 40.0, 0.0);
        let north = e.from_degrees(20.0, 40.01, 0.0);
        let plane = TangentPlane::from_points(&[center], &e);

        let mut projected = Vec::new();
        plane.project_points_onto_plane(&[center, east, north], &mut projected);
        assert_eq!(projected.len(), 3);
        assert!(projected[0].x.abs() < 1e-6 && projected[0].y.abs() < 1e-6);
        assert!(projected[1].x > 0.0);
        assert!(projected[2].y > 0.0);
    }

    #[test]
    fn scratch_is_overwritten() {
        let e = Ellipsoid::wgs84();
        let p = e.from_degrees(0.0, 0.0, 0.0);
        let plane = TangentPlane::from_points(&[p], &e);
        let mut scratch = vec![Coord { x: 9.0, y: 9.0 }; 5];
        plane.project_points_onto_plane(&[p], &mut scratch);
        assert_eq!(scratch.len(), 1);
    }

    #[test]
    fn centroid_at_center_uses_xy_plane() {
        let e = Ellipsoid::wgs84();
        let points = [Vector3::new(1.0, 2.0, 3.0), Vector3::new(-1.0, -2.0, -3.0)];
        let plane = TangentPlane::from_points(&points, &e);
        assert_eq!(plane.normal(), &Vector3::z());
    }
}
