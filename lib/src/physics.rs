//! User-adjustable perturbations of the element model.
//!
//! Modifiers never accumulate: eccentricity and inclination are always
//! derived from the [`OriginalElements`] captured at initialization, and the
//! remaining modifiers act on elements freshly computed from the day number.

use std::{collections::HashMap, ops::RangeInclusive};

use serde::{Deserialize, Serialize};

use crate::{bodies::BodyId, kepler::orbits::OrbitalElements, time::DayNumber};

/// Upper bound on any modified eccentricity.
pub const ECCENTRICITY_CLAMP: f64 = 0.95;

pub const GRAVITY_RANGE: RangeInclusive<f64> = 0.1..=5.0;
pub const ECCENTRICITY_RANGE: RangeInclusive<f64> = 0.1..=5.0;
pub const INCLINATION_RANGE: RangeInclusive<f64> = 0.0..=5.0;
pub const CENTRAL_MASS_RANGE: RangeInclusive<f64> = 0.1..=3.0;

/// Smallest divisor accepted for the gravity and mass modifiers.
const MIN_DIVISOR: f64 = 1e-3;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsParameters {
    /// Gravitational constant multiplier.
    pub gravity: f64,
    /// Eccentricity multiplier.
    pub eccentricity: f64,
    /// Inclination multiplier.
    pub inclination: f64,
    /// Central body mass, as a multiple of its catalog mass.
    pub central_mass: f64,
}

impl PhysicsParameters {
    pub const NEUTRAL: PhysicsParameters = PhysicsParameters {
        gravity: 1.0,
        eccentricity: 1.0,
        inclination: 1.0,
        central_mass: 1.0,
    };

    pub fn is_neutral(&self) -> bool {
        *self == Self::NEUTRAL
    }

    /// Clamp every modifier into the range offered by the controls.
    #[must_use]
    pub fn clamped(self) -> Self {
        fn clamp(x: f64, range: &RangeInclusive<f64>) -> f64 {
            if x.is_nan() {
                1.0_f64.clamp(*range.start(), *range.end())
            } else {
                x.clamp(*range.start(), *range.end())
            }
        }
        Self {
            gravity: clamp(self.gravity, &GRAVITY_RANGE),
            eccentricity: clamp(self.eccentricity, &ECCENTRICITY_RANGE),
            inclination: clamp(self.inclination, &INCLINATION_RANGE),
            central_mass: clamp(self.central_mass, &CENTRAL_MASS_RANGE),
        }
    }

    /// Semi-major axis used for drawing a body around a central body of
    /// scaled mass: `a / s^(1/3)`. The element model itself is untouched.
    pub fn mass_scaled_axis(&self, a: f64) -> f64 {
        a / libm::cbrt(self.central_mass.max(MIN_DIVISOR))
    }

    /// Size response of the central body to its mass scale.
    pub fn central_body_visual_scale(&self) -> f64 {
        libm::pow(self.central_mass.max(0.0), 0.33)
    }

    /// Apply the gravity, eccentricity and inclination modifiers to
    /// `fresh` elements. A multiplier of exactly one leaves its element as
    /// computed.
    pub fn apply(&self, fresh: OrbitalElements, original: &OrbitalElements) -> OrbitalElements {
        let mut elements = fresh;
        if self.gravity != 1.0 {
            elements.a /= self.gravity.max(MIN_DIVISOR);
        }
        if self.eccentricity != 1.0 {
            elements.e = (original.e * self.eccentricity).clamp(0.0, ECCENTRICITY_CLAMP);
        }
        if self.inclination != 1.0 {
            elements.i = original.i * self.inclination;
        }
        elements.normalized()
    }
}

impl Default for PhysicsParameters {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Orbital elements of every orbiting body as they were right after
/// initialization, together with the day they were computed for.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OriginalElements {
    day: DayNumber,
    elements: HashMap<BodyId, OrbitalElements>,
}

impl OriginalElements {
    pub fn capture<'a>(
        day: DayNumber,
        bodies: impl IntoIterator<Item = (BodyId, &'a OrbitalElements)>,
    ) -> Self {
        Self {
            day,
            elements: bodies.into_iter().map(|(id, el)| (id, *el)).collect(),
        }
    }

    /// The day number the snapshot belongs to.
    pub fn day(&self) -> DayNumber {
        self.day
    }

    pub fn get(&self, id: BodyId) -> Option<&OrbitalElements> {
        self.elements.get(&id)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BodyId, &OrbitalElements)> {
        self.elements.iter().map(|(id, el)| (*id, el))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    fn eccentric() -> OrbitalElements {
        OrbitalElements::new(2.0, 0.6, 10.0, 30.0, 40.0, 50.0)
    }

    #[test]
    fn neutral_is_identity() {
        let fresh = OrbitalElements::new(1.2, 0.1, 3.0, 4.0, 5.0, 6.0);
        let original = eccentric();
        assert_eq!(PhysicsParameters::NEUTRAL.apply(fresh, &original), fresh);
        assert_eq!(PhysicsParameters::NEUTRAL.mass_scaled_axis(1.2), 1.2);
    }

    #[test]
    fn modifiers_derive_from_original() {
        let params = PhysicsParameters {
            gravity: 2.0,
            eccentricity: 0.5,
            inclination: 3.0,
            central_mass: 1.0,
        };
        let fresh = OrbitalElements::new(1.0, 0.2, 1.0, 4.0, 5.0, 6.0);
        let modified = params.apply(fresh, &eccentric());
        assert_eq!(modified.a, 0.5);
        assert_relative_eq!(modified.e, 0.3);
        assert_relative_eq!(modified.i, 30.0);
        assert_eq!(modified.lan, fresh.lan);
        assert_eq!(modified.argpe, fresh.argpe);
        assert_eq!(modified.ma, fresh.ma);

        // Applying again to the output changes nothing that came from the
        // original elements.
        let twice = params.apply(modified, &eccentric());
        assert_eq!(twice.e, modified.e);
        assert_eq!(twice.i, modified.i);
    }

    #[test]
    fn mass_scale_shrinks_orbits() {
        let params = PhysicsParameters {
            central_mass: 8.0,
            ..PhysicsParameters::NEUTRAL
        };
        assert_relative_eq!(params.mass_scaled_axis(1.0), 0.5);
        assert_relative_eq!(params.central_body_visual_scale(), libm::pow(8.0, 0.33));
    }

    #[test]
    fn degenerate_divisors_stay_finite() {
        let params = PhysicsParameters {
            gravity: 0.0,
            eccentricity: 1.0,
            inclination: 0.0,
            central_mass: -1.0,
        };
        let modified = params.apply(eccentric(), &eccentric());
        assert!(modified.a.is_finite());
        assert_eq!(modified.i, 0.0);
        assert!(params.mass_scaled_axis(1.0).is_finite());
    }

    #[test]
    fn clamped_to_control_ranges() {
        let params = PhysicsParameters {
            gravity: 50.0,
            eccentricity: 0.0,
            inclination: -1.0,
            central_mass: f64::NAN,
        }
        .clamped();
        assert_eq!(params.gravity, 5.0);
        assert_eq!(params.eccentricity, 0.1);
        assert_eq!(params.inclination, 0.0);
        assert_eq!(params.central_mass, 1.0);
    }

    proptest! {
        #[test]
        fn eccentricity_never_exceeds_clamp(multiplier in 1.0f64..1e6) {
            let params = PhysicsParameters {
                eccentricity: multiplier,
                ..PhysicsParameters::NEUTRAL
            };
            let original = eccentric();
            let modified = params.apply(original, &original);
            prop_assert!(modified.e <= ECCENTRICITY_CLAMP);
        }

        #[test]
        fn modified_angles_are_normalized(inclination in 0.0f64..100.0) {
            let params = PhysicsParameters {
                inclination,
                ..PhysicsParameters::NEUTRAL
            };
            let original = OrbitalElements::new(1.0, 0.1, 170.0, 0.0, 0.0, 0.0);
            let modified = params.apply(original, &original);
            prop_assert!((0.0..360.0).contains(&modified.i));
        }
    }
}
