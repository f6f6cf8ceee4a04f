use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::debug;

use crate::directory::Location;
use crate::ephemeris::EphemerisProvider;
use crate::error::AppError;
use crate::planetary::{HourBlock, Period, Planet, Timeline, Window, build_timeline, day_ruler};

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Planetary hours around a reference instant, ready to serialize.
#[derive(Debug, Clone, Serialize)]
pub struct PlanetaryHoursReport {
    /// Reference date in the location's zone ("YYYY-MM-DD")
    pub date: String,
    /// Reference time in the location's zone ("HH:MM:SS")
    pub time: String,
    pub timezone: String,
    pub location: Location,
    /// Sunrise of the reference date ("HH:MM:SS")
    pub sunrise: Option<String>,
    /// Sunset of the reference date ("HH:MM:SS")
    pub sunset: Option<String>,
    pub hour_blocks: Vec<HourBlockView>,
    pub period: Option<Period>,
    pub day_of_week: Option<String>,
    pub islamic_hour: Option<u8>,
    pub planet_of_hour: Option<Planet>,
    pub planet_of_day: Option<Planet>,
}

/// Serialized form of an [`HourBlock`].
#[derive(Debug, Clone, Serialize)]
pub struct HourBlockView {
    pub ordinal: u8,
    /// RFC 3339 in the location's zone
    pub start: String,
    /// RFC 3339 in the location's zone
    pub end: String,
    pub planet: Planet,
    pub period: Period,
    pub day_of_week: String,
    pub date: NaiveDate,
    pub is_current: bool,
}

impl From<&HourBlock> for HourBlockView {
    fn from(block: &HourBlock) -> Self {
        Self {
            ordinal: block.ordinal,
            start: block.start.to_rfc3339(),
            end: block.end.to_rfc3339(),
            planet: block.planet,
            period: block.period,
            day_of_week: weekday_name(block.date),
            date: block.date,
            is_current: block.is_current,
        }
    }
}

fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

/// Resolves the caller's reference instant in the location's zone.
///
/// `None` is the current time. RFC 3339 input is converted into `tz`;
/// zone-less `YYYY-MM-DDTHH:MM[:SS]` is read as local time in `tz`.
pub fn reference_instant(at: Option<&str>, tz: Tz) -> Result<DateTime<Tz>, AppError> {
    let Some(raw) = at.map(str::trim) else {
        return Ok(Utc::now().with_timezone(&tz));
    };

    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&tz));
    }

    let local = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .ok_or_else(|| AppError::InvalidInstant(raw.to_string()))?;

    // ambiguous local times (clocks going back) take the earlier instant
    tz.from_local_datetime(&local)
        .earliest()
        .ok_or_else(|| AppError::InvalidInstant(format!("{} does not exist in {}", raw, tz)))
}

/// Builds the timeline around `now` and renders it.
pub fn planetary_hours<P>(
    provider: &P,
    location: &Location,
    now: &DateTime<Tz>,
    window: Window,
) -> Result<PlanetaryHoursReport, AppError>
where
    P: EphemerisProvider + ?Sized,
{
    let now = now.with_timezone(&location.tz()?);
    let timeline = build_timeline(provider, location, &now, window)?;
    Ok(compose(location, &now, &timeline))
}

/// Renders a timeline; `now` must already be in the location's zone.
pub fn compose(location: &Location, now: &DateTime<Tz>, timeline: &Timeline) -> PlanetaryHoursReport {
    let today = timeline.boundary(now.date_naive());
    let current = timeline.current(now);

    match current {
        Some(block) => debug!(
            "Current hour for {}: {} {} ruled by {}",
            location.name, block.period, block.ordinal, block.planet
        ),
        None => debug!("No current hour for {} at {}", location.name, now),
    }

    PlanetaryHoursReport {
        date: now.format("%Y-%m-%d").to_string(),
        time: now.format("%H:%M:%S").to_string(),
        timezone: location.time_zone.clone(),
        location: location.clone(),
        sunrise: today.map(|boundary| boundary.sunrise.format("%H:%M:%S").to_string()),
        sunset: today.map(|boundary| boundary.sunset.format("%H:%M:%S").to_string()),
        hour_blocks: timeline.blocks().iter().map(HourBlockView::from).collect(),
        period: current.map(|block| block.period),
        day_of_week: current.map(|block| weekday_name(block.date)),
        islamic_hour: current.map(|block| block.ordinal),
        planet_of_hour: current.map(|block| block.planet),
        planet_of_day: current.map(|block| day_ruler(block.weekday)),
    }
}

impl fmt::Display for PlanetaryHoursReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} at {} {} ({})",
            self.location.name, self.location.country, self.date, self.time, self.timezone
        )?;
        if let (Some(sunrise), Some(sunset)) = (&self.sunrise, &self.sunset) {
            write!(f, "; sunrise {}, sunset {}", sunrise, sunset)?;
        }
        match (
            &self.day_of_week,
            self.period,
            self.islamic_hour,
            self.planet_of_hour,
            self.planet_of_day,
        ) {
            (Some(weekday), Some(period), Some(hour), Some(planet), Some(ruler)) => write!(
                f,
                "; {} {} hour {} ruled by {} (day of {})",
                weekday, period, hour, planet, ruler
            ),
            _ => f.write_str("; no planetary hour covers this instant"),
        }
    }
}
