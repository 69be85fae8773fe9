use nalgebra::Vector3;

const EPSILON12: f64 = 1e-12;
/// Points closer than this (squared, in scaled units) to the center have no
/// meaningful surface projection.
const CENTER_TOLERANCE_SQUARED: f64 = 0.1;

pub const RADIANS_PER_DEGREE: f64 = std::f64::consts::PI / 180.0;

/// A longitude/latitude/height triple, angles in radians.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cartographic {
    pub longitude: f64,
    pub latitude: f64,
    pub height: f64,
}

impl Cartographic {
    pub fn from_degrees(longitude: f64, latitude: f64, height: f64) -> Self {
        Self {
            longitude: longitude * RADIANS_PER_DEGREE,
            latitude: latitude * RADIANS_PER_DEGREE,
            height,
        }
    }
}

/// A triaxial ellipsoid centered at the origin, used as the reference surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ellipsoid {
    radii: Vector3<f64>,
    radii_squared: Vector3<f64>,
    one_over_radii: Vector3<f64>,
    one_over_radii_squared: Vector3<f64>,
}

impl Ellipsoid {
    pub const WGS84_RADII: [f64; 3] = [6378137.0, 6378137.0, 6356752.314_245_179_3];

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        let radii = Vector3::new(x, y, z);
        Self {
            radii,
            radii_squared: radii.component_mul(&radii),
            one_over_radii: radii.map(|r| if r == 0.0 { 0.0 } else { 1.0 / r }),
            one_over_radii_squared: radii.map(|r| if r == 0.0 { 0.0 } else { 1.0 / (r * r) }),
        }
    }

    pub fn wgs84() -> Self {
        let [x, y, z] = Self::WGS84_RADII;
        Self::new(x, y, z)
    }

    pub fn unit_sphere() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    #[inline]
    pub fn radii(&self) -> &Vector3<f64> {
        &self.radii
    }

    #[inline]
    pub fn maximum_radius(&self) -> f64 {
        self.radii.max()
    }

    /// Outward normal of the surface at (or above) `position`.
    pub fn geodetic_surface_normal(&self, position: &Vector3<f64>) -> Option<Vector3<f64>> {
        position
            .component_mul(&self.one_over_radii_squared)
            .try_normalize(0.0)
    }

    pub fn geodetic_surface_normal_cartographic(&self, cartographic: &Cartographic) -> Vector3<f64> {
        let cos_latitude = cartographic.latitude.cos();
        Vector3::new(
            cos_latitude * cartographic.longitude.cos(),
            cos_latitude * cartographic.longitude.sin(),
            cartographic.latitude.sin(),
        )
        .normalize()
    }

    pub fn cartographic_to_cartesian(&self, cartographic: &Cartographic) -> Vector3<f64> {
        let n = self.geodetic_surface_normal_cartographic(cartographic);
        let k = self.radii_squared.component_mul(&n);
        let gamma = n.dot(&k).sqrt();
        k / gamma + n * cartographic.height
    }

    /// Longitude and latitude in degrees, height in meters above the surface.
    pub fn from_degrees(&self, longitude: f64, latitude: f64, height: f64) -> Vector3<f64> {
        self.cartographic_to_cartesian(&Cartographic::from_degrees(longitude, latitude, height))
    }

    pub fn cartesian_to_cartographic(&self, position: &Vector3<f64>) -> Option<Cartographic> {
        let surface = self.scale_to_geodetic_surface(position)?;
        let normal = self.geodetic_surface_normal(&surface)?;
        let h = position - surface;
        let height = h.dot(position).signum() * h.norm();
        Some(Cartographic {
            longitude: normal.y.atan2(normal.x),
            latitude: normal.z.asin(),
            height,
        })
    }

    /// Moves `position` along the geodetic surface normal until it lies on the
    /// surface. Returns `None` for points too close to the center.
    pub fn scale_to_geodetic_surface(&self, position: &Vector3<f64>) -> Option<Vector3<f64>> {
        let (x, y, z) = (position.x, position.y, position.z);
        let inv = &self.one_over_radii;
        let inv2 = &self.one_over_radii_squared;

        let x2 = x * x * inv.x * inv.x;
        let y2 = y * y * inv.y * inv.y;
        let z2 = z * z * inv.z * inv.z;

        let squared_norm = x2 + y2 + z2;
        let ratio = (1.0 / squared_norm).sqrt();
        let intersection = position * ratio;

        if squared_norm < CENTER_TOLERANCE_SQUARED {
            return ratio.is_finite().then_some(intersection);
        }

        let gradient = intersection.component_mul(inv2) * 2.0;
        let mut lambda = (1.0 - ratio) * position.norm() / (0.5 * gradient.norm());
        let mut correction = 0.0;

        let (mut x_multiplier, mut y_multiplier, mut z_multiplier);
        loop {
            lambda -= correction;

            x_multiplier = 1.0 / (1.0 + lambda * inv2.x);
            y_multiplier = 1.0 / (1.0 + lambda * inv2.y);
            z_multiplier = 1.0 / (1.0 + lambda * inv2.z);

            let x_multiplier2 = x_multiplier * x_multiplier;
            let y_multiplier2 = y_multiplier * y_multiplier;
            let z_multiplier2 = z_multiplier * z_multiplier;

            let x_multiplier3 = x_multiplier2 * x_multiplier;
            let y_multiplier3 = y_multiplier2 * y_multiplier;
            let z_multiplier3 = z_multiplier2 * z_multiplier;

            let func = x2 * x_multiplier2 + y2 * y_multiplier2 + z2 * z_multiplier2 - 1.0;
            let denominator = x2 * x_multiplier3 * inv2.x
                + y2 * y_multiplier3 * inv2.y
                + z2 * z_multiplier3 * inv2.z;
            let derivative = -2.0 * denominator;
            correction = func / derivative;

            if !(func.abs() > EPSILON12) {
                break;
            }
        }

        Some(Vector3::new(x * x_multiplier, y * y_multiplier, z * z_multiplier))
    }

    /// Places `position` exactly `height` meters above the surface, discarding
    /// its current height. Points at the center are left untouched.
    pub fn scale_to_geodetic_height(&self, position: &Vector3<f64>, height: f64) -> Vector3<f64> {
        let Some(surface) = self.scale_to_geodetic_surface(position) else {
            return *position;
        };
        if height == 0.0 {
            return surface;
        }
        match self.geodetic_surface_normal(&surface) {
            Some(normal) => surface + normal * height,
            None => surface,
        }
    }
}

impl Default for Ellipsoid {
    fn default() -> Self {
        Ellipsoid::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64, tolerance: f64) -> bool {
        (a - b).abs() <= tolerance
    }

    #[test]
    fn equator_prime_meridian_is_on_x_axis() {
        let e = Ellipsoid::wgs84();
        let p = e.from_degrees(0.0, 0.0, 0.0);
        assert!(close(p.x, 6378137.0, 1e-6));
        assert!(close(p.y, 0.0, 1e-6));
        assert!(close(p.z, 0.0, 1e-6));
    }

    #[test]
    fn height_offsets_along_normal() {
        let e = Ellipsoid::wgs84();
        let p = e.from_degrees(0.0, 90.0, 1000.0);
        assert!(close(p.z, 6356752.314_245_179_3 + 1000.0, 1e-6));
    }

    #[test]
    fn scale_to_surface_flattens_height() {
        let e = Ellipsoid::wgs84();
        let raised = e.from_degrees(-112.0, 33.0, 100_000.0);
        let ground = e.from_degrees(-112.0, 33.0, 0.0);
        let scaled = e.scale_to_geodetic_height(&raised, 0.0);
        assert!((scaled - ground).norm() < 1e-4);
    }

    #[test]
    fn center_has_no_surface_point() {
        let e = Ellipsoid::wgs84();
        assert!(e.scale_to_geodetic_surface(&Vector3::zeros()).is_none());
        assert_eq!(e.scale_to_geodetic_height(&Vector3::zeros(), 0.0), Vector3::zeros());
    }

    #[test]
    fn cartographic_round_trip_recovers_height() {
        let e = Ellipsoid::wgs84();
        let p = e.from_degrees(-115.0, 36.0, 2500.0);
        let c = e.cartesian_to_cartographic(&p).unwrap();
        assert!(close(c.longitude, -115.0 * RADIANS_PER_DEGREE, 1e-9));
        assert!(close(c.latitude, 36.0 * RADIANS_PER_DEGREE, 1e-9));
        assert!(close(c.height, 2500.0, 1e-3));
    }
}
