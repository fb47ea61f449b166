//! Definitions of celestial bodies.

use std::sync::Arc;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{
    arena::IdLike,
    ephemeris::EphemerisModel,
    kepler::orbits::{normalize_degrees, OrbitalElements},
    path::OrbitPath,
};

/// How far the Moon's offset from Earth is stretched so that its orbit is
/// visible next to planetary distances.
pub const MOON_OFFSET_SCALE: f64 = 50.0;

/// Rotation periods shorter than this (`h`) are treated as not rotating.
const MIN_ROTATION_PERIOD: f64 = 0.001;

#[derive(
    Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[repr(transparent)]
pub struct BodyId(u32);

impl IdLike for BodyId {
    fn from_raw(index: usize) -> Self {
        Self(index as u32)
    }

    fn into_raw(self) -> usize {
        self.0 as usize
    }
}

/// Static description of a body, as found in a catalog.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub name: String,
    /// Mass (`kg`)
    pub mass: f64,
    /// Mean radius (`m`)
    pub radius: f64,
    /// Sidereal rotation period (`h`); negative for retrograde rotation
    pub rotation_period: f64,
    /// Axial tilt (`deg`)
    pub axial_tilt: f64,
    /// Name of the body this one orbits. Bodies without a parent orbit the
    /// central body.
    #[serde(default)]
    pub parent: Option<String>,
    /// Series driving the orbital elements; `None` only for the central
    /// body.
    #[serde(default)]
    pub model: Option<EphemerisModel>,
    /// Stretch applied to the offset from the parent when drawing.
    #[serde(default = "unit_scale")]
    pub offset_scale: f64,
}

fn unit_scale() -> f64 {
    1.0
}

impl BodySpec {
    fn new(
        name: &str,
        mass: f64,
        radius: f64,
        rotation_period: f64,
        axial_tilt: f64,
        model: Option<EphemerisModel>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            mass,
            radius,
            rotation_period,
            axial_tilt,
            parent: None,
            model,
            offset_scale: 1.0,
        }
    }
}

/// The set of bodies a system is built from.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub bodies: Vec<BodySpec>,
}

impl Catalog {
    /// The Sun, the eight planets and the Moon.
    pub fn solar_system() -> Self {
        use EphemerisModel as M;
        let mut moon = BodySpec::new(
            "Moon",
            7.347_673_09e22,
            3_476_000.0 / 2.0,
            655.7,
            6.68,
            Some(M::Moon),
        );
        moon.parent = Some("Earth".to_owned());
        moon.offset_scale = MOON_OFFSET_SCALE;

        Self {
            bodies: vec![
                BodySpec::new("Sun", 1.989e30, 696_340_000.0, 609.6, 7.25, None),
                BodySpec::new(
                    "Mercury",
                    0.330e24,
                    4_879_000.0 / 2.0,
                    1407.6,
                    0.03,
                    Some(M::Mercury),
                ),
                BodySpec::new(
                    "Venus",
                    4.87e24,
                    12_104_000.0 / 2.0,
                    -5832.5,
                    2.64,
                    Some(M::Venus),
                ),
                BodySpec::new(
                    "Earth",
                    5.97e24,
                    12_756_000.0 / 2.0,
                    23.9,
                    23.44,
                    Some(M::Earth),
                ),
                moon,
                BodySpec::new("Mars", 0.642e24, 6_792_000.0 / 2.0, 24.6, 25.19, Some(M::Mars)),
                BodySpec::new(
                    "Jupiter",
                    1898e24,
                    142_984_000.0 / 2.0,
                    9.9,
                    3.13,
                    Some(M::Jupiter),
                ),
                BodySpec::new(
                    "Saturn",
                    568e24,
                    120_536_000.0 / 2.0,
                    10.7,
                    26.73,
                    Some(M::Saturn),
                ),
                BodySpec::new(
                    "Uranus",
                    86.8e24,
                    51_118_000.0 / 2.0,
                    -17.2,
                    82.23,
                    Some(M::Uranus),
                ),
                BodySpec::new(
                    "Neptune",
                    102e24,
                    49_528_000.0 / 2.0,
                    16.1,
                    28.32,
                    Some(M::Neptune),
                ),
            ],
        }
    }
}

/// A celestial body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    pub name: Arc<str>,
    /// Mass (`kg`)
    pub mass: f64,
    /// Mean radius (`m`)
    pub radius: f64,
    /// Sidereal rotation period (`h`); negative for retrograde rotation
    pub rotation_period: f64,
    /// Axial tilt (`deg`)
    pub axial_tilt: f64,
    /// The body this one orbits; `None` only for the central body.
    pub parent: Option<BodyId>,
    pub model: Option<EphemerisModel>,
    pub offset_scale: f64,
    /// Current orbital elements, relative to the parent.
    pub elements: Option<OrbitalElements>,
    /// Position in the inertial frame centred on the central body (`m`)
    pub position: Vector3<f64>,
    /// Accumulated spin about the body's axis (`deg`)
    pub rotation_angle: f64,
    pub orbit_path: Option<OrbitPath>,
}

impl CelestialBody {
    pub(crate) fn from_spec(spec: &BodySpec, parent: Option<BodyId>) -> Self {
        Self {
            name: spec.name.as_str().into(),
            mass: spec.mass,
            radius: spec.radius,
            rotation_period: spec.rotation_period,
            axial_tilt: spec.axial_tilt,
            parent,
            model: spec.model,
            offset_scale: spec.offset_scale,
            elements: None,
            position: Vector3::zeros(),
            rotation_angle: 0.0,
            orbit_path: None,
        }
    }

    pub fn is_retrograde(&self) -> bool {
        self.rotation_period < 0.0
    }

    /// Advance the spin angle by `days` worth of rotation.
    pub fn spin(&mut self, days: f64) {
        if self.rotation_period.abs() < MIN_ROTATION_PERIOD {
            return;
        }
        let increment = 24.0 / self.rotation_period.abs() * 360.0 * days;
        let increment = if self.is_retrograde() {
            -increment
        } else {
            increment
        };
        self.rotation_angle = normalize_degrees(self.rotation_angle + increment);
    }
}
