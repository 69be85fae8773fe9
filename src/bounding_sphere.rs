use nalgebra::Vector3;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BoundingSphere {
    pub center: Vector3<f64>,
    pub radius: f64,
}

impl BoundingSphere {
    pub fn new(center: Vector3<f64>, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Computes a tight sphere around flat `[x, y, z, x, y, z, ...]` positions.
    ///
    /// Runs Ritter's algorithm and compares it with the sphere around the
    /// axis-aligned bounding box, keeping whichever is smaller.
    pub fn from_vertices(positions: &[f64]) -> Self {
        let points: Vec<Vector3<f64>> = positions
            .chunks_exact(3)
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();
        Self::from_points(&points)
    }

    pub fn from_points(points: &[Vector3<f64>]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(Vector3::zeros(), 0.0);
        };

        let mut x_min = *first;
        let mut y_min = *first;
        let mut z_min = *first;
        let mut x_max = *first;
        let mut y_max = *first;
        let mut z_max = *first;

        for p in &points[1..] {
            if p.x < x_min.x {
                x_min = *p;
            }
            if p.x > x_max.x {
                x_max = *p;
            }
            if p.y < y_min.y {
                y_min = *p;
            }
            if p.y > y_max.y {
                y_max = *p;
            }
            if p.z < z_min.z {
                z_min = *p;
            }
            if p.z > z_max.z {
                z_max = *p;
            }
        }

        let x_span = (x_max - x_min).norm_squared();
        let y_span = (y_max - y_min).norm_squared();
        let z_span = (z_max - z_min).norm_squared();

        // Seed Ritter's sphere with the widest pair.
        let (mut diameter1, mut diameter2) = (x_min, x_max);
        let mut max_span = x_span;
        if y_span > max_span {
            max_span = y_span;
            diameter1 = y_min;
            diameter2 = y_max;
        }
        if z_span > max_span {
            diameter1 = z_min;
            diameter2 = z_max;
        }

        let mut ritter_center = (diameter1 + diameter2) * 0.5;
        let mut radius_squared = (diameter2 - ritter_center).norm_squared();
        let mut ritter_radius = radius_squared.sqrt();

        let min_box = Vector3::new(x_min.x, y_min.y, z_min.z);
        let max_box = Vector3::new(x_max.x, y_max.y, z_max.z);
        let naive_center = (min_box + max_box) * 0.5;
        let mut naive_radius: f64 = 0.0;

        for p in points {
            naive_radius = naive_radius.max((p - naive_center).norm());

            let old_center_to_point_squared = (p - ritter_center).norm_squared();
            if old_center_to_point_squared > radius_squared {
                let old_center_to_point = old_center_to_point_squared.sqrt();
                ritter_radius = (ritter_radius + old_center_to_point) * 0.5;
                radius_squared = ritter_radius * ritter_radius;
                let old_to_new = old_center_to_point - ritter_radius;
                ritter_center = (ritter_center * ritter_radius + p * old_to_new) / old_center_to_point;
            }
        }

        if ritter_radius < naive_radius {
            Self::new(ritter_center, ritter_radius)
        } else {
            Self::new(naive_center, naive_radius)
        }
    }

    /// Whether `point` lies inside the sphere, allowing a relative slack of
    /// `tolerance` on the radius.
    pub fn contains(&self, point: &Vector3<f64>, tolerance: f64) -> bool {
        (point - self.center).norm() <= self.radius * (1.0 + tolerance) + tolerance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn empty_input_is_degenerate_sphere() {
        let sphere = BoundingSphere::from_vertices(&[]);
        assert_eq!(sphere.radius, 0.0);
        assert_eq!(sphere.center, Vector3::zeros());
    }

    #[test]
    fn single_point_has_zero_radius() {
        let sphere = BoundingSphere::from_vertices(&[1.0, 2.0, 3.0]);
        assert_eq!(sphere.center, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(sphere.radius, 0.0);
    }

    #[test]
    fn symmetric_points_center_on_origin() {
        let sphere = BoundingSphere::from_vertices(&[
            -1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0, 0.0, 0.0, 1.0, 0.0,
        ]);
        assert!(sphere.center.norm() < 1e-12);
        assert!((sphere.radius - 1.0).abs() < 1e-12);
    }

    #[quickcheck]
    fn encloses_every_vertex(coords: Vec<(i16, i16, i16)>) -> bool {
        let positions: Vec<f64> = coords
            .iter()
            .flat_map(|&(x, y, z)| [x as f64 * 37.5, y as f64 * 11.25, z as f64 * 3.0])
            .collect();
        let sphere = BoundingSphere::from_vertices(&positions);
        positions
            .chunks_exact(3)
            .all(|p| sphere.contains(&Vector3::new(p[0], p[1], p[2]), 1e-9))
    }
}
