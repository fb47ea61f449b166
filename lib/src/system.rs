//! The propagation pipeline over a whole system of bodies.
//!
//! Every recomputation runs to completion before returning: elements are
//! derived from the day number, modified by the current
//! [`PhysicsParameters`], turned into positions relative to each body's
//! parent, composed into absolute positions parents-first, and finally the
//! orbit paths are resampled.

use std::{collections::HashMap, ops::Index, sync::Arc};

use color_eyre::eyre::{self, bail, OptionExt};
use itertools::Itertools;
use nalgebra::Vector3;
use tracing::{debug, info, trace};

use crate::{
    arena::{Arena, IdLike},
    bodies::{BodyId, Catalog, CelestialBody},
    kepler::orbits::OrbitalElements,
    path::{OrbitPath, DEFAULT_SAMPLES},
    physics::{OriginalElements, PhysicsParameters},
    time::{DayNumber, Timeline},
};

#[derive(Clone, Debug)]
pub struct SolarSystem {
    bodies: Arena<BodyId, CelestialBody>,
    names: HashMap<Arc<str>, BodyId>,
    central: BodyId,
    /// Orbiting bodies ordered so that every parent precedes its children.
    order: Vec<BodyId>,
    original: OriginalElements,
    params: PhysicsParameters,
    day: DayNumber,
    samples: usize,
}

impl SolarSystem {
    /// Build a system from `catalog` at day number `day`.
    ///
    /// The catalog must name exactly one central body (no parent and no
    /// ephemeris model), every parent must name a body of the catalog, and
    /// the parent links must not loop.
    pub fn new(catalog: &Catalog, day: DayNumber) -> eyre::Result<Self> {
        if let Some(dup) = catalog.bodies.iter().map(|b| b.name.as_str()).duplicates().next() {
            bail!("Body {dup:?} is defined more than once");
        }

        let centrals = catalog
            .bodies
            .iter()
            .enumerate()
            .filter(|(_, b)| b.model.is_none())
            .collect::<Vec<_>>();
        let central = match centrals.as_slice() {
            [(idx, spec)] => {
                if let Some(parent) = &spec.parent {
                    bail!("Central body {:?} cannot orbit {parent:?}", spec.name);
                }
                *idx
            }
            [] => bail!("Catalog has no central body"),
            _ => bail!(
                "Catalog has more than one central body: {}",
                centrals.iter().map(|(_, b)| b.name.as_str()).join(", ")
            ),
        };

        let index = catalog
            .bodies
            .iter()
            .enumerate()
            .map(|(i, b)| (b.name.as_str(), i))
            .collect::<HashMap<_, _>>();

        let mut bodies: Arena<BodyId, CelestialBody> = Arena::new();
        let mut names = HashMap::new();
        for (i, spec) in catalog.bodies.iter().enumerate() {
            let parent = if i == central {
                None
            } else {
                let idx = match &spec.parent {
                    Some(parent) => *index.get(parent.as_str()).ok_or_eyre(format!(
                        "Body {:?} orbits unknown body {parent:?}",
                        spec.name
                    ))?,
                    None => central,
                };
                if idx == i {
                    bail!("Body {:?} cannot orbit itself", spec.name);
                }
                Some(BodyId::from_raw(idx))
            };
            let body = CelestialBody::from_spec(spec, parent);
            let id = bodies.push(body);
            names.insert(bodies[id].name.clone(), id);
        }

        let central = BodyId::from_raw(central);
        let order = resolution_order(&bodies, central)?;

        let mut system = Self {
            bodies,
            names,
            central,
            order,
            original: OriginalElements::default(),
            params: PhysicsParameters::NEUTRAL,
            day,
            samples: DEFAULT_SAMPLES,
        };
        system.update_elements();
        system.original = OriginalElements::capture(
            day,
            system
                .bodies
                .iter()
                .filter_map(|(id, b)| b.elements.as_ref().map(|el| (id, el))),
        );
        system.resolve_positions();
        system.regenerate_orbit_paths();
        info!(
            "Initialized {} bodies around {} at {day}",
            system.bodies.len(),
            system.bodies[system.central].name
        );
        Ok(system)
    }

    pub fn day(&self) -> DayNumber {
        self.day
    }

    pub fn parameters(&self) -> &PhysicsParameters {
        &self.params
    }

    pub fn original_elements(&self) -> &OriginalElements {
        &self.original
    }

    pub fn central(&self) -> BodyId {
        self.central
    }

    pub fn id(&self, name: &str) -> Option<BodyId> {
        self.names.get(name).copied()
    }

    pub fn get(&self, id: BodyId) -> Option<&CelestialBody> {
        self.bodies.get(id)
    }

    pub fn body(&self, name: &str) -> Option<&CelestialBody> {
        self.id(name).map(|id| &self.bodies[id])
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &CelestialBody)> {
        self.bodies.iter()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Number of segments used when orbit paths are regenerated.
    pub fn path_samples(&self) -> usize {
        self.samples
    }

    pub fn set_path_samples(&mut self, samples: usize) {
        self.samples = samples.max(1);
        self.regenerate_orbit_paths();
    }

    /// Move to day number `day` and recompute everything.
    pub fn set_day(&mut self, day: DayNumber) {
        self.day = day;
        self.recompute();
    }

    /// One animation step: spin every body by the timeline's step, then
    /// move to the timeline's next day.
    pub fn tick(&mut self, timeline: &Timeline) {
        for (_, body) in self.bodies.iter_mut() {
            body.spin(timeline.step);
        }
        self.set_day(timeline.next(self.day));
    }

    /// Replace the physics modifiers and recompute everything.
    pub fn apply_physics(&mut self, params: PhysicsParameters) {
        debug!("Applying {params:?}");
        self.params = params;
        self.recompute();
    }

    /// Restore the elements captured at initialization and neutral physics.
    /// The day number goes back to the snapshot's day with them.
    pub fn reset_physics(&mut self) {
        debug!("Resetting physics");
        self.params = PhysicsParameters::NEUTRAL;
        self.day = self.original.day();
        for (id, body) in self.bodies.iter_mut() {
            if let Some(original) = self.original.get(id) {
                body.elements = Some(*original);
            }
        }
        self.resolve_positions();
        self.regenerate_orbit_paths();
    }

    fn recompute(&mut self) {
        self.update_elements();
        self.resolve_positions();
        self.regenerate_orbit_paths();
    }

    /// Recompute every body's elements for the current day, then apply the
    /// physics modifiers.
    pub fn update_elements(&mut self) {
        let day = self.day;
        let params = self.params;
        for (id, body) in self.bodies.iter_mut() {
            let Some(model) = body.model else {
                continue;
            };
            let fresh = model.elements_at(day);
            let elements = match self.original.get(id) {
                Some(original) => params.apply(fresh, original),
                None => fresh,
            };
            body.elements = Some(elements);
        }
        trace!("Updated elements at {day:?}");
    }

    /// Elements as used for positions: bodies orbiting the central body see
    /// its scaled mass through a shrunken semi-major axis.
    pub fn effective_elements(&self, id: BodyId) -> Option<OrbitalElements> {
        let body = self.bodies.get(id)?;
        let elements = body.elements?;
        if body.parent == Some(self.central) {
            Some(elements.with_semi_major_axis(self.params.mass_scaled_axis(elements.a)))
        } else {
            Some(elements)
        }
    }

    /// Offset of a body from its parent (`m`), including its display
    /// stretch. Zero for the central body.
    pub fn relative_position(&self, id: BodyId) -> Option<Vector3<f64>> {
        let body = self.bodies.get(id)?;
        Some(match self.effective_elements(id) {
            Some(elements) => elements.position() * body.offset_scale,
            None => Vector3::zeros(),
        })
    }

    /// Compose absolute positions, parents before children.
    pub fn resolve_positions(&mut self) {
        self.bodies[self.central].position = Vector3::zeros();
        for idx in 0..self.order.len() {
            let id = self.order[idx];
            let parent = self.bodies[id]
                .parent
                .map_or_else(Vector3::zeros, |p| self.bodies[p].position);
            let offset = self.relative_position(id).unwrap_or_else(Vector3::zeros);
            self.bodies[id].position = parent + offset;
        }
    }

    /// Sample one revolution of a body's current orbit without touching its
    /// state. `None` for the central body.
    pub fn orbit_path(&self, id: BodyId, samples: usize) -> Option<OrbitPath> {
        let body = self.bodies.get(id)?;
        let focus = body.parent?;
        let elements = self.effective_elements(id)?;
        Some(OrbitPath::sample(&elements, focus, samples, body.offset_scale))
    }

    /// Throw away every orbit path and sample new ones.
    pub fn regenerate_orbit_paths(&mut self) {
        for idx in 0..self.order.len() {
            let id = self.order[idx];
            let path = self.orbit_path(id, self.samples);
            self.bodies[id].orbit_path = path;
        }
    }

    /// A body's stored orbit path placed around its focus' current
    /// position.
    pub fn world_orbit_path(&self, id: BodyId) -> Option<Vec<Vector3<f64>>> {
        let path = self.bodies.get(id)?.orbit_path.as_ref()?;
        let origin = &self.bodies[path.focus].position;
        Some(path.translated(origin).collect())
    }
}

impl Index<BodyId> for SolarSystem {
    type Output = CelestialBody;

    fn index(&self, index: BodyId) -> &Self::Output {
        &self.bodies[index]
    }
}

/// Order the orbiting bodies by their depth below `central`, keeping
/// catalog order within a depth.
fn resolution_order(
    bodies: &Arena<BodyId, CelestialBody>,
    central: BodyId,
) -> eyre::Result<Vec<BodyId>> {
    let mut depths = Vec::with_capacity(bodies.len());
    for (id, body) in bodies.iter() {
        if id == central {
            continue;
        }
        let mut depth = 0;
        let mut cursor = body.parent;
        while let Some(parent) = cursor {
            depth += 1;
            if parent == central {
                break;
            }
            if depth > bodies.len() {
                bail!("Body {:?} is part of a parent cycle", body.name);
            }
            cursor = bodies[parent].parent;
        }
        depths.push((depth, id));
    }
    Ok(depths
        .into_iter()
        .sorted_by_key(|(depth, id)| (*depth, *id))
        .map(|(_, id)| id)
        .collect())
}
