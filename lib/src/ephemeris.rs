//! Low-precision analytic ephemerides.
//!
//! Every element is a linear function of the day number, `x0 + x1 * d`,
//! using the classic secular-rate approximations for the major planets and
//! an independent geocentric series for the Moon.

use serde::{Deserialize, Serialize};

use crate::{
    kepler::orbits::{OrbitalElements, AU},
    time::DayNumber,
};

/// Mean Earth-Moon distance (m).
pub const MOON_SEMI_MAJOR_AXIS: f64 = 384_400_000.0;

/// Which secular-rate series drives a body's elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EphemerisModel {
    Mercury,
    Venus,
    Earth,
    Moon,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
}

/// `(constant, rate per day)` pairs for each element.
#[derive(Copy, Clone, Debug, PartialEq)]
struct Secular {
    lan: (f64, f64),
    i: (f64, f64),
    argpe: (f64, f64),
    a: (f64, f64),
    e: (f64, f64),
    ma: (f64, f64),
}

impl EphemerisModel {
    pub const ALL: [EphemerisModel; 9] = [
        EphemerisModel::Mercury,
        EphemerisModel::Venus,
        EphemerisModel::Earth,
        EphemerisModel::Moon,
        EphemerisModel::Mars,
        EphemerisModel::Jupiter,
        EphemerisModel::Saturn,
        EphemerisModel::Uranus,
        EphemerisModel::Neptune,
    ];

    fn secular(self) -> Secular {
        match self {
            EphemerisModel::Mercury => Secular {
                lan: (48.3313, 3.24587e-5),
                i: (7.0047, 5.00e-8),
                argpe: (29.1241, 1.01444e-5),
                a: (0.387_098, 0.0),
                e: (0.205_635, 5.59e-10),
                ma: (168.6562, 4.092_334_436_8),
            },
            EphemerisModel::Venus => Secular {
                lan: (76.6799, 2.46590e-5),
                i: (3.3946, 2.75e-8),
                argpe: (54.8910, 1.38374e-5),
                a: (0.723_330, 0.0),
                e: (0.006_773, -1.302e-9),
                ma: (48.0052, 1.602_130_224_4),
            },
            EphemerisModel::Earth => Secular {
                lan: (0.0, 0.0),
                i: (0.0, 0.0),
                argpe: (282.9404, 4.70935e-5),
                a: (1.0, 0.0),
                e: (0.016_709, -1.151e-9),
                ma: (356.0470, 0.985_600_258_5),
            },
            // Geocentric, referred to the ecliptic.
            EphemerisModel::Moon => Secular {
                lan: (125.1228, -0.052_953_808_3),
                i: (5.1454, 0.0),
                argpe: (318.0634, 0.164_357_322_3),
                a: (MOON_SEMI_MAJOR_AXIS / AU, 0.0),
                e: (0.0549, 0.0),
                ma: (115.3654, 13.064_992_950_9),
            },
            EphemerisModel::Mars => Secular {
                lan: (49.5574, 2.11081e-5),
                i: (1.8497, -1.78e-8),
                argpe: (286.5016, 2.92961e-5),
                a: (1.523_688, 0.0),
                e: (0.093_405, 2.516e-9),
                ma: (18.6021, 0.524_020_776_6),
            },
            EphemerisModel::Jupiter => Secular {
                lan: (100.4542, 2.76854e-5),
                i: (1.3030, -1.557e-7),
                argpe: (273.8777, 1.64505e-5),
                a: (5.202_56, 0.0),
                e: (0.048_498, 4.469e-9),
                ma: (19.8950, 0.083_085_300_1),
            },
            EphemerisModel::Saturn => Secular {
                lan: (113.6634, 2.38980e-5),
                i: (2.4886, -1.081e-7),
                argpe: (339.3939, 2.97661e-5),
                a: (9.554_75, 0.0),
                e: (0.055_546, -9.499e-9),
                ma: (316.9670, 0.033_444_228_2),
            },
            EphemerisModel::Uranus => Secular {
                lan: (74.0005, 1.3978e-5),
                i: (0.7733, 1.9e-8),
                argpe: (96.6612, 3.0565e-5),
                a: (19.181_71, -1.55e-8),
                e: (0.047_318, 7.45e-9),
                ma: (142.5905, 0.011_725_806),
            },
            EphemerisModel::Neptune => Secular {
                lan: (131.7806, 3.0173e-5),
                i: (1.7700, -2.55e-7),
                argpe: (272.8461, -6.027e-6),
                a: (30.058_26, 3.313e-8),
                e: (0.008_606, 2.15e-9),
                ma: (260.2471, 0.005_995_147),
            },
        }
    }

    /// Elements at day number `day`, angles normalized into `[0, 360)`.
    pub fn elements_at(self, day: DayNumber) -> OrbitalElements {
        let d = day.days();
        let s = self.secular();
        let eval = |(x0, x1): (f64, f64)| x0 + x1 * d;
        OrbitalElements::new(
            eval(s.a),
            eval(s.e),
            eval(s.i),
            eval(s.lan),
            eval(s.argpe),
            eval(s.ma),
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn earth_at_epoch() {
        let earth = EphemerisModel::Earth.elements_at(DayNumber::new(0.0));
        assert_eq!(earth.lan, 0.0);
        assert_eq!(earth.i, 0.0);
        assert_eq!(earth.a, 1.0);
        assert_relative_eq!(earth.e, 0.016_709);
        assert_relative_eq!(earth.argpe, 282.9404);
        assert_relative_eq!(earth.ma, 356.0470);
    }

    #[test]
    fn mean_anomaly_advances_and_wraps() {
        let mercury = EphemerisModel::Mercury.elements_at(DayNumber::new(100.0));
        assert_relative_eq!(mercury.ma, (168.6562 + 409.233_443_68) % 360.0, epsilon = 1e-9);
    }

    #[test]
    fn angles_normalized_for_any_day() {
        for model in EphemerisModel::ALL {
            for d in [-1e7, -36_525.0, -1.0, 0.0, 0.5, 9_000.0, 1e7] {
                let el = model.elements_at(DayNumber::new(d));
                for angle in [el.i, el.lan, el.argpe, el.ma] {
                    assert!((0.0..360.0).contains(&angle), "{model:?} at {d}: {angle}");
                }
            }
        }
    }

    #[test]
    fn recomputation_is_idempotent() {
        for model in EphemerisModel::ALL {
            let day = DayNumber::new(8_765.25);
            assert_eq!(model.elements_at(day), model.elements_at(day));
        }
    }

    #[test]
    fn moon_uses_geocentric_distance() {
        let moon = EphemerisModel::Moon.elements_at(DayNumber::new(1234.0));
        assert_relative_eq!(moon.a * AU, MOON_SEMI_MAJOR_AXIS);
        assert_eq!(moon.e, 0.0549);
        assert_eq!(moon.i, 5.1454);
    }
}
