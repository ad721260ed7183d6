//! Latitude/longitude projection onto a sphere.
//!
//! The convention matches the planet texture mapping: polar angle
//! `phi = (90 - lat)` and azimuth `theta = (lon + 180)`, with the X axis
//! mirrored. Every place that puts a geo point into the scene or reads one
//! back must go through this module, otherwise targeting and reverse lookup
//! disagree.

use glam::Vec3;

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north. Valid range `[-90, 90]`.
    pub latitude: f64,
    /// Longitude in degrees, positive east. Valid range `[-180, 180]`.
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a geo point from latitude and longitude in degrees.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite and inside their valid ranges.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Project onto a sphere of `radius` centered at the origin.
    #[must_use]
    pub fn to_cartesian(&self, radius: f32) -> Vec3 {
        to_cartesian(self.latitude, self.longitude, radius)
    }
}

/// Convert latitude/longitude (degrees) to a point on a sphere of `radius`
/// centered at the origin.
#[must_use]
pub fn to_cartesian(lat: f64, lon: f64, radius: f32) -> Vec3 {
    let phi = (90.0 - lat).to_radians();
    let theta = (lon + 180.0).to_radians();
    let r = f64::from(radius);

    let x = -(r * phi.sin() * theta.cos());
    let y = r * phi.cos();
    let z = r * phi.sin() * theta.sin();

    Vec3::new(x as f32, y as f32, z as f32)
}

/// Convert a world-space position back to latitude/longitude relative to
/// `body_center`.
///
/// A position coincident with the body center has no direction and maps
/// to `(0, 0)`.
#[must_use]
pub fn to_geo(position: Vec3, body_center: Vec3) -> GeoPoint {
    let offset = (position - body_center).as_dvec3();
    let length = offset.length();
    if !length.is_finite() || length < 1e-12 {
        return GeoPoint::new(0.0, 0.0);
    }
    let n = offset / length;

    let lat = n.y.clamp(-1.0, 1.0).asin().to_degrees();
    // atan2(z, -x) recovers theta, which carries the +180° azimuth offset
    // applied in `to_cartesian`.
    let theta = n.z.atan2(-n.x).to_degrees();
    let lon = wrap_degrees(theta - 180.0);

    GeoPoint::new(lat, lon)
}

/// Wrap an angle in degrees into `[-180, 180)`.
fn wrap_degrees(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Coarse continent/ocean name for a ground point, used for the ground
/// track readout.
#[must_use]
pub fn region_name(lat: f64, lon: f64) -> &'static str {
    if lat > 66.0 {
        return "Arctic";
    }
    if lat < -66.0 {
        return "Antarctic";
    }

    if (-170.0..=-30.0).contains(&lon) {
        if (15.0..=72.0).contains(&lat) {
            return "North America";
        }
        if (-56.0..15.0).contains(&lat) {
            return "South America";
        }
    }
    if (-30.0..=60.0).contains(&lon) {
        if (35.0..=71.0).contains(&lat) {
            return "Europe";
        }
        if (-35.0..35.0).contains(&lat) {
            return "Africa";
        }
    }
    if (60.0..=150.0).contains(&lon) {
        if (8.0..=75.0).contains(&lat) {
            return "Asia";
        }
        if (-50.0..8.0).contains(&lat) {
            return "Oceania";
        }
    }

    if (-60.0..=60.0).contains(&lat) {
        if (-170.0..=-70.0).contains(&lon) {
            return "Pacific Ocean";
        }
        if (-70.0..=20.0).contains(&lon) {
            return "Atlantic Ocean";
        }
        if (20.0..=120.0).contains(&lon) {
            return "Indian Ocean";
        }
    }

    "Ocean"
}
