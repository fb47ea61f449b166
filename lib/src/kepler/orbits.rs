//! Keplerian orbital elements and their conversion to positions.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::kepler::solver;

/// Astronomical unit (m).
pub const AU: f64 = 149.6e9;

/// Wrap an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// The six classical elements of an elliptic orbit.
///
/// Angles are in degrees and are kept in `[0, 360)` by every constructor in
/// this crate.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitalElements {
    /// Semi-major axis (AU).
    pub a: f64,
    /// Eccentricity (dimensionless).
    pub e: f64,
    /// Inclination (degrees).
    pub i: f64,
    /// Longitude of ascending node (degrees).
    pub lan: f64,
    /// Argument of periapsis (degrees).
    pub argpe: f64,
    /// Mean anomaly (degrees).
    pub ma: f64,
}

impl OrbitalElements {
    /// Build a set of elements, normalizing the angles.
    pub fn new(a: f64, e: f64, i: f64, lan: f64, argpe: f64, ma: f64) -> Self {
        Self {
            a,
            e,
            i,
            lan,
            argpe,
            ma,
        }
        .normalized()
    }

    /// Wrap `i`, `lan`, `argpe` and `ma` into `[0, 360)`. The semi-major
    /// axis and eccentricity are magnitudes and are left alone.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            i: normalize_degrees(self.i),
            lan: normalize_degrees(self.lan),
            argpe: normalize_degrees(self.argpe),
            ma: normalize_degrees(self.ma),
            ..self
        }
    }

    #[must_use]
    pub fn with_semi_major_axis(self, a: f64) -> Self {
        Self { a, ..self }
    }

    /// Periapsis distance (AU).
    pub fn periapsis_radius(&self) -> f64 {
        self.a * (1.0 - self.e)
    }

    /// Apoapsis distance (AU).
    pub fn apoapsis_radius(&self) -> f64 {
        self.a * (1.0 + self.e)
    }

    /// Position in the orbital plane (AU) for eccentric anomaly `ea`
    /// (radians), with the x axis pointing at periapsis.
    pub fn perifocal(&self, ea: f64) -> Vector3<f64> {
        Vector3::new(
            self.a * (libm::cos(ea) - self.e),
            self.a * libm::sqrt(1.0 - self.e * self.e) * libm::sin(ea),
            0.0,
        )
    }

    /// Rotation from the orbital plane into the reference frame: first by
    /// the argument of periapsis about the orbit normal, then by the
    /// inclination about the x axis, then by the longitude of the ascending
    /// node about the reference normal.
    pub fn rotation(&self) -> Matrix3<f64> {
        let (sw, cw) = sin_cos_deg(self.argpe);
        let (si, ci) = sin_cos_deg(self.i);
        let (sn, cn) = sin_cos_deg(self.lan);

        let argpe = Matrix3::new(cw, -sw, 0.0, sw, cw, 0.0, 0.0, 0.0, 1.0);
        let incl = Matrix3::new(1.0, 0.0, 0.0, 0.0, ci, -si, 0.0, si, ci);
        let lan = Matrix3::new(cn, -sn, 0.0, sn, cn, 0.0, 0.0, 0.0, 1.0);

        lan * incl * argpe
    }

    /// Position relative to the orbital focus (m) at the current mean
    /// anomaly.
    pub fn position(&self) -> Vector3<f64> {
        self.position_at(self.ma)
    }

    /// Position relative to the orbital focus (m) at mean anomaly `ma`
    /// (degrees). The stored mean anomaly is not consulted.
    pub fn position_at(&self, ma: f64) -> Vector3<f64> {
        let ea = solver::solve(ma.to_radians(), self.e);
        self.rotation() * self.perifocal(ea) * AU
    }
}

fn sin_cos_deg(angle: f64) -> (f64, f64) {
    let rad = angle.to_radians();
    (libm::sin(rad), libm::cos(rad))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn circular(a: f64) -> OrbitalElements {
        OrbitalElements::new(a, 0.0, 0.0, 0.0, 0.0, 0.0)
    }

    #[test]
    fn normalization_wraps_into_range() {
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-1e-17), 0.0);
        let big = normalize_degrees(0.9856 * 1e7);
        assert!((0.0..360.0).contains(&big));
    }

    #[test]
    fn circular_orbit_at_periapsis() {
        let pos = circular(1.0).position();
        assert_relative_eq!(pos.x, AU);
        assert_eq!(pos.y, 0.0);
        assert_eq!(pos.z, 0.0);
    }

    #[test]
    fn radius_stays_between_apsides() {
        let elements = OrbitalElements::new(1.5, 0.3, 12.0, 40.0, 75.0, 0.0);
        for k in 0..72 {
            let r = elements.position_at(k as f64 * 5.0).norm() / AU;
            assert!(r >= elements.periapsis_radius() - 1e-9);
            assert!(r <= elements.apoapsis_radius() + 1e-9);
        }
    }

    #[test]
    fn rotation_order_matters() {
        // Periapsis at w = 90 on an orbit tilted 90 degrees lies on the z
        // axis; rotating by the inclination first would leave it in the
        // reference plane.
        let elements = OrbitalElements::new(1.0, 0.0, 90.0, 0.0, 90.0, 0.0);
        let pos = elements.position() / AU;
        assert_relative_eq!(pos.z, 1.0, epsilon = 1e-12);
        assert_relative_eq!(pos.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pos.y, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn node_rotation_is_about_reference_normal() {
        let elements = OrbitalElements::new(2.0, 0.0, 0.0, 90.0, 0.0, 0.0);
        let pos = elements.position() / AU;
        assert_relative_eq!(pos.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(pos.y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_inclination_stays_in_plane() {
        let elements = OrbitalElements::new(1.0, 0.0167, 0.0, 0.0, 282.9, 356.0);
        assert_eq!(elements.position().z, 0.0);
    }
}
