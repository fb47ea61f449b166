//! Sampled orbit geometry.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::{bodies::BodyId, kepler::orbits::OrbitalElements};

/// Number of segments in a regenerated orbit path.
pub const DEFAULT_SAMPLES: usize = 100;

/// A closed polyline tracing one revolution of an orbit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitPath {
    /// The body at the focus of the orbit. Points are relative to its
    /// position at the time they are drawn.
    pub focus: BodyId,
    /// `samples + 1` points (`m`); the last repeats the first.
    pub points: Vec<Vector3<f64>>,
}

impl OrbitPath {
    /// Sweep the mean anomaly of `elements` from 0 to 360 degrees in
    /// `samples` equal steps, scaling every offset by `scale`.
    ///
    /// Only a copy of the elements is varied; the caller's mean anomaly is
    /// never touched.
    pub fn sample(elements: &OrbitalElements, focus: BodyId, samples: usize, scale: f64) -> Self {
        let samples = samples.max(1);
        let step = 360.0 / samples as f64;
        let mut points = (0..samples)
            .map(|k| elements.position_at(k as f64 * step) * scale)
            .collect::<Vec<_>>();
        points.push(points[0]);
        Self { focus, points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_closed(&self) -> bool {
        self.points.first() == self.points.last()
    }

    /// The points placed around a focus at `origin`.
    pub fn translated<'a>(
        &'a self,
        origin: &'a Vector3<f64>,
    ) -> impl Iterator<Item = Vector3<f64>> + 'a {
        self.points.iter().map(move |p| origin + p)
    }
}
