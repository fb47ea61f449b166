//! Human-readable summaries of a body's state.

use std::fmt;

use crate::{bodies::BodyId, system::SolarSystem};

/// Metres per display unit when positions are shown at scene scale.
pub const DISPLAY_SCALE: f64 = 1e10;

/// Inspection panel for one body: physical properties, current elements,
/// active modifiers and position.
pub struct BodyReport<'a> {
    system: &'a SolarSystem,
    id: BodyId,
}

impl<'a> BodyReport<'a> {
    pub fn new(system: &'a SolarSystem, id: BodyId) -> Option<Self> {
        system.get(id).map(|_| Self { system, id })
    }
}

impl fmt::Display for BodyReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = &self.system[self.id];
        writeln!(f, "{}", body.name)?;
        writeln!(f)?;
        writeln!(f, "Physical properties")?;
        writeln!(f, "  Mass: {:.3e} kg", body.mass)?;
        writeln!(f, "  Radius: {:.0} m", body.radius)?;
        write!(
            f,
            "  Rotation period: {:.1} hours",
            body.rotation_period.abs()
        )?;
        if body.is_retrograde() {
            write!(f, " (retrograde)")?;
        }
        writeln!(f)?;
        writeln!(f, "  Axial tilt: {:.2}°", body.axial_tilt)?;
        writeln!(f, "  Rotation angle: {:.2}°", body.rotation_angle)?;

        let Some(el) = body.elements else {
            return Ok(());
        };
        let params = self.system.parameters();
        let parent = body
            .parent
            .and_then(|p| self.system.get(p))
            .map_or("-", |p| &*p.name);

        writeln!(f)?;
        writeln!(f, "Orbital elements (around {parent})")?;
        writeln!(f, "  Semi-major axis (a): {:.6} AU", el.a)?;
        writeln!(f, "  Eccentricity (e): {:.6}", el.e)?;
        writeln!(f, "  Inclination (i): {:.4}°", el.i)?;
        writeln!(f, "  Longitude of ascending node (N): {:.4}°", el.lan)?;
        writeln!(f, "  Argument of periapsis (w): {:.4}°", el.argpe)?;
        writeln!(f, "  Mean anomaly (M): {:.4}°", el.ma)?;

        writeln!(f)?;
        writeln!(f, "Physics modifiers")?;
        writeln!(f, "  Central mass: {:.2}x", params.central_mass)?;
        writeln!(f, "  G multiplier: {:.2}x", params.gravity)?;
        writeln!(f, "  Eccentricity multiplier: {:.2}x", params.eccentricity)?;
        writeln!(f, "  Inclination multiplier: {:.2}x", params.inclination)?;

        let pos = body.position;
        let scaled = pos / DISPLAY_SCALE;
        writeln!(f)?;
        writeln!(f, "Position (m)")?;
        writeln!(f, "  X: {:.3e}  Y: {:.3e}  Z: {:.3e}", pos.x, pos.y, pos.z)?;
        writeln!(f, "Position (display units)")?;
        write!(
            f,
            "  X: {:.3}  Y: {:.3}  Z: {:.3}",
            scaled.x, scaled.y, scaled.z
        )
    }
}
