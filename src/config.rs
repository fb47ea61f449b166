//! Session files and user-supplied catalogs.

use std::{fs, path::Path};

use color_eyre::eyre::{self, bail, WrapErr};
use orrery::{bodies::Catalog, path::DEFAULT_SAMPLES, physics::PhysicsParameters};
use serde::{Deserialize, Serialize};

/// Everything needed to pick a simulation back up where it was left.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Starting day number; today when absent.
    pub day: Option<f64>,
    pub physics: PhysicsParameters,
    /// Days per animation tick.
    pub step: f64,
    /// Segments per orbit path.
    pub samples: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            day: None,
            physics: PhysicsParameters::NEUTRAL,
            step: 1.0,
            samples: DEFAULT_SAMPLES,
        }
    }
}

impl Session {
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let text = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read session {}", path.display()))?;
        ron::from_str(&text).wrap_err_with(|| format!("Malformed session {}", path.display()))
    }

    /// Override the days per animation tick.
    pub fn set_step(&mut self, step: f64) -> eyre::Result<()> {
        if !(step.is_finite() && step > 0.0) {
            bail!("Step must be a positive number of days, got {step}");
        }
        self.step = step;
        Ok(())
    }

    pub fn save(&self, path: &Path) -> eyre::Result<()> {
        fs::write(
            path,
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?,
        )
        .wrap_err_with(|| format!("Failed to write session {}", path.display()))
    }
}

/// Read a catalog of `[[bodies]]` tables.
pub fn load_catalog(path: &Path) -> eyre::Result<Catalog> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read catalog {}", path.display()))?;
    parse_catalog(&text).wrap_err_with(|| format!("Malformed catalog {}", path.display()))
}

fn parse_catalog(text: &str) -> eyre::Result<Catalog> {
    Ok(toml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use orrery::ephemeris::EphemerisModel;

    use super::*;

    #[test]
    fn catalog_from_toml() {
        let catalog = parse_catalog(
            r#"
            [[bodies]]
            name = "Sun"
            mass = 1.989e30
            radius = 696340000.0
            rotation_period = 609.6
            axial_tilt = 7.25

            [[bodies]]
            name = "Earth"
            mass = 5.97e24
            radius = 6378000.0
            rotation_period = 23.9
            axial_tilt = 23.44
            model = "Earth"

            [[bodies]]
            name = "Moon"
            mass = 7.35e22
            radius = 1738000.0
            rotation_period = 655.7
            axial_tilt = 6.68
            parent = "Earth"
            model = "Moon"
            offset_scale = 50.0
            "#,
        )
        .unwrap();
        assert_eq!(catalog.bodies.len(), 3);
        assert_eq!(catalog.bodies[0].model, None);
        assert_eq!(catalog.bodies[1].offset_scale, 1.0);
        assert_eq!(catalog.bodies[2].parent.as_deref(), Some("Earth"));
        assert_eq!(catalog.bodies[2].model, Some(EphemerisModel::Moon));
    }

    #[test]
    fn session_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");
        let session = Session {
            day: Some(9000.5),
            physics: PhysicsParameters {
                gravity: 1.5,
                ..PhysicsParameters::NEUTRAL
            },
            step: 10.0,
            samples: 64,
        };
        session.save(&path).unwrap();
        assert_eq!(Session::load(&path).unwrap(), session);
    }

    #[test]
    fn step_override_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ron");
        let mut session = Session::default();
        session.set_step(2.5).unwrap();
        assert!(session.set_step(0.0).is_err());
        assert!(session.set_step(f64::NAN).is_err());
        session.save(&path).unwrap();
        assert_eq!(Session::load(&path).unwrap().step, 2.5);
    }

    #[test]
    fn partial_session_uses_defaults() {
        let session: Session = ron::from_str("(day: Some(12.0))").unwrap();
        assert_eq!(session.physics, PhysicsParameters::NEUTRAL);
        assert_eq!(session.samples, DEFAULT_SAMPLES);
    }
}
