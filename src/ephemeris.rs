//! Sunrise and sunset provider.
//!
//! The planetary-hour computation only consumes sunrise/sunset instants; this
//! module supplies them through [`EphemerisProvider`]. [`SpaEphemeris`] asks the
//! `spa` solar position algorithm for the events and lands them on the
//! requested civil date of the location's zone.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use chrono_tz::Tz;
use spa::{StdFloatOps, SunriseAndSet, sunrise_and_set};
use tracing::debug;

use crate::directory::Location;
use crate::error::AppError;

/// Attempts at landing an event on the requested local date.
const MAX_DATE_SHIFTS: usize = 3;

/// Sunrise and sunset of one civil date, in the location's zone.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBoundary {
    pub date: NaiveDate,
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
}

/// Supplies a date's sunrise and sunset for a location.
///
/// Implementations must be pure: the same (location, date) always yields the
/// same boundary, so calls for different dates carry no ordering dependency.
pub trait EphemerisProvider: Send + Sync {
    fn day_boundary(&self, location: &Location, date: NaiveDate) -> Result<DayBoundary, AppError>;
}

/// Sunrise and sunset from the solar position algorithm (SPA).
#[derive(Debug, Clone, Copy, Default)]
pub struct SpaEphemeris;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SolarEvent {
    Sunrise,
    Sunset,
}

impl EphemerisProvider for SpaEphemeris {
    fn day_boundary(&self, location: &Location, date: NaiveDate) -> Result<DayBoundary, AppError> {
        let tz = location.tz()?;
        let sunrise = local_event(location, tz, date, SolarEvent::Sunrise)?;
        let sunset = local_event(location, tz, date, SolarEvent::Sunset)?;

        debug!(
            "{} on {}: sunrise {}, sunset {}",
            location.name, date, sunrise, sunset
        );
        Ok(DayBoundary {
            date,
            sunrise,
            sunset,
        })
    }
}

/// Evaluates the event around local noon and moves a day at a time until the
/// event falls on the requested local date.
fn local_event(
    location: &Location,
    tz: Tz,
    date: NaiveDate,
    event: SolarEvent,
) -> Result<DateTime<Tz>, AppError> {
    let noon = date
        .and_hms_opt(12, 0, 0)
        .and_then(|noon| noon.and_local_timezone(tz).earliest())
        .ok_or_else(|| AppError::InvalidDate(format!("no local noon on {} in {}", date, tz)))?;
    let mut instant = noon.with_timezone(&Utc);

    for _ in 0..MAX_DATE_SHIFTS {
        let local = event_at(location, instant, date, event)?.with_timezone(&tz);

        let shift = match local.date_naive().cmp(&date) {
            Ordering::Equal => return Ok(local),
            Ordering::Less => TimeDelta::days(1),
            Ordering::Greater => TimeDelta::days(-1),
        };
        instant = instant
            .checked_add_signed(shift)
            .ok_or_else(|| AppError::InvalidDate(date.to_string()))?;
    }

    Err(AppError::InvalidDate(format!(
        "no {:?} on local date {} in {}",
        event, date, location.time_zone
    )))
}

/// One SPA evaluation for the day containing `instant`.
fn event_at(
    location: &Location,
    instant: DateTime<Utc>,
    date: NaiveDate,
    event: SolarEvent,
) -> Result<DateTime<Utc>, AppError> {
    let result = sunrise_and_set::<StdFloatOps>(instant.into(), location.latitude, location.longitude)
        .map_err(|err| AppError::Ephemeris(format!("{:?}", err)))?;

    match result {
        SunriseAndSet::Daylight(sunrise, sunset) => Ok(match event {
            SolarEvent::Sunrise => DateTime::<Utc>::from(sunrise),
            SolarEvent::Sunset => DateTime::<Utc>::from(sunset),
        }),
        SunriseAndSet::PolarDay => Err(AppError::PolarDay {
            date,
            latitude: location.latitude,
            longitude: location.longitude,
        }),
        SunriseAndSet::PolarNight => Err(AppError::PolarNight {
            date,
            latitude: location.latitude,
            longitude: location.longitude,
        }),
    }
}

/// Deterministic providers for tests.
#[cfg(test)]
pub mod testing {
    use chrono::{NaiveDate, NaiveTime, TimeZone};

    use super::{DayBoundary, EphemerisProvider};
    use crate::directory::Location;
    use crate::error::AppError;

    /// Same local sunrise and sunset every date; optionally fails on one date.
    pub struct FixedEphemeris {
        pub sunrise: NaiveTime,
        pub sunset: NaiveTime,
        pub fail_on: Option<NaiveDate>,
    }

    impl FixedEphemeris {
        pub fn new(sunrise: (u32, u32), sunset: (u32, u32)) -> Self {
            Self {
                sunrise: NaiveTime::from_hms_opt(sunrise.0, sunrise.1, 0).unwrap(),
                sunset: NaiveTime::from_hms_opt(sunset.0, sunset.1, 0).unwrap(),
                fail_on: None,
            }
        }
    }

    impl EphemerisProvider for FixedEphemeris {
        fn day_boundary(&self, location: &Location, date: NaiveDate) -> Result<DayBoundary, AppError> {
            if self.fail_on == Some(date) {
                return Err(AppError::PolarNight {
                    date,
                    latitude: location.latitude,
                    longitude: location.longitude,
                });
            }
            let tz = location.tz()?;
            Ok(DayBoundary {
                date,
                sunrise: tz.from_local_datetime(&date.and_time(self.sunrise)).unwrap(),
                sunset: tz.from_local_datetime(&date.and_time(self.sunset)).unwrap(),
            })
        }
    }

    pub fn location(time_zone: &str) -> Location {
        Location {
            name: "Testville".to_string(),
            country: "Testland".to_string(),
            time_zone: time_zone.to_string(),
            latitude: 28.6139,
            longitude: 77.2090,
        }
    }
}
