use std::{fmt, ops};

use serde::{Deserialize, Serialize};
use time::{macros::datetime, Date, Duration, OffsetDateTime, PrimitiveDateTime, Time};

/// 2000-01-01 00:00 UTC, day zero of the simulation clock.
pub const EPOCH: PrimitiveDateTime = datetime!(2000-01-01 00:00);

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Roughly the span of years the calendar can represent either side of the
/// epoch.
const CALENDAR_LIMIT_DAYS: f64 = 2_900_000.0;

/// Continuous simulation time, in days since [`EPOCH`].
#[derive(Copy, Clone, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DayNumber(f64);

impl DayNumber {
    pub fn new(days: f64) -> Self {
        Self(days)
    }

    pub fn days(self) -> f64 {
        self.0
    }

    pub fn from_datetime(datetime: OffsetDateTime) -> Self {
        Self((datetime - EPOCH.assume_utc()).as_seconds_f64() / SECONDS_PER_DAY)
    }

    pub fn from_date(date: Date) -> Self {
        Self::from_datetime(PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc())
    }

    pub fn now() -> Self {
        Self::from_datetime(OffsetDateTime::now_utc())
    }

    /// The calendar instant of this day number, if it is representable.
    pub fn to_datetime(self) -> Option<OffsetDateTime> {
        if !self.0.is_finite() || self.0.abs() > CALENDAR_LIMIT_DAYS {
            return None;
        }
        EPOCH
            .assume_utc()
            .checked_add(Duration::seconds_f64(self.0 * SECONDS_PER_DAY))
    }

    pub fn to_date(self) -> Option<Date> {
        self.to_datetime().map(OffsetDateTime::date)
    }
}

impl ops::Add<f64> for DayNumber {
    type Output = DayNumber;

    fn add(self, rhs: f64) -> Self::Output {
        DayNumber(self.0 + rhs)
    }
}

impl ops::Sub<DayNumber> for DayNumber {
    type Output = f64;

    fn sub(self, rhs: DayNumber) -> Self::Output {
        self.0 - rhs.0
    }
}

impl fmt::Display for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_date() {
            Some(date) => write!(
                f,
                "{}-{:02}-{:02}",
                date.year(),
                u8::from(date.month()),
                date.day()
            ),
            None => write!(f, "day {}", self.0),
        }
    }
}

impl fmt::Debug for DayNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Day({})", self.0)
    }
}

/// Days per tick offered by the animation controls.
pub const ANIMATION_SPEEDS: [u32; 5] = [1, 5, 10, 50, 100];

/// Length of the scrubbable time window (days).
pub const TIMELINE_SPAN: f64 = 10_000.0;

/// Discrete animation clock over a fixed window of days.
///
/// Each tick moves forward by `step` days; stepping past the end of the
/// window wraps back to its start.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub start: DayNumber,
    pub step: f64,
}

impl Timeline {
    pub fn new(start: DayNumber) -> Self {
        Self {
            start,
            step: 1.0,
        }
    }

    pub fn end(&self) -> DayNumber {
        self.start + TIMELINE_SPAN
    }

    /// Set the step in days per tick. Non-positive or non-finite steps are
    /// ignored.
    pub fn set_step(&mut self, step: f64) {
        if step.is_finite() && step > 0.0 {
            self.step = step;
        }
    }

    /// The day after one tick from `current`.
    pub fn next(&self, current: DayNumber) -> DayNumber {
        let next = current + self.step;
        if next > self.end() {
            self.start
        } else {
            next
        }
    }

    /// Clamp `day` into the window.
    pub fn clamp(&self, day: DayNumber) -> DayNumber {
        DayNumber(day.0.clamp(self.start.0, self.end().0))
    }
}
