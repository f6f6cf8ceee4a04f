use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta};
use chrono_tz::Tz;
use tracing::{debug, instrument};

use super::locate::locate_current;
use super::rotation::Period;
use super::segment::{HourBlock, Span};
use crate::directory::Location;
use crate::ephemeris::{DayBoundary, EphemerisProvider};
use crate::error::AppError;

/// Civil days around the reference date covered by a timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub days_before: u32,
    pub days_after: u32,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            days_before: 3,
            days_after: 7,
        }
    }
}

impl Window {
    /// Day offsets relative to the reference date, ascending.
    pub fn offsets(&self) -> RangeInclusive<i64> {
        -i64::from(self.days_before)..=i64::from(self.days_after)
    }

    /// Number of calendar days (and so of nights and of days) in the window.
    pub fn days(&self) -> usize {
        self.days_before as usize + self.days_after as usize + 1
    }
}

/// Hour blocks of a window, in chronological order, plus the boundaries they were cut from.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    blocks: Vec<HourBlock>,
    boundaries: Vec<DayBoundary>,
}

impl Timeline {
    pub fn blocks(&self) -> &[HourBlock] {
        &self.blocks
    }

    /// Sunrise/sunset of a date inside the window.
    pub fn boundary(&self, date: NaiveDate) -> Option<&DayBoundary> {
        self.boundaries.iter().find(|boundary| boundary.date == date)
    }

    /// The block containing `instant`, if the window covers it.
    pub fn current(&self, instant: &DateTime<Tz>) -> Option<&HourBlock> {
        locate_current(&self.blocks, instant)
    }
}

fn shift(date: NaiveDate, days: i64) -> Result<NaiveDate, AppError> {
    date.checked_add_signed(TimeDelta::days(days))
        .ok_or_else(|| AppError::InvalidDate(format!("{} {:+} days", date, days)))
}

/// Builds the Night-then-Day timeline for every day offset of `window`.
///
/// For offset `k` and `day = date(now) + k`, the night runs from `day`'s sunset
/// to the next sunrise and the day from that sunrise to the next sunset; both
/// are labeled with `day + 1`. The night is ruled by `day`'s hours 13..=24, so
/// the rotation advances one planet from every hour to the next. Offsets are
/// civil-date arithmetic, so daylight saving transitions never shift the
/// labels. Any failed date aborts the build.
#[instrument(skip_all, fields(location = %location.name, date = %now.date_naive()))]
pub fn build_timeline<P>(
    provider: &P,
    location: &Location,
    now: &DateTime<Tz>,
    window: Window,
) -> Result<Timeline, AppError>
where
    P: EphemerisProvider + ?Sized,
{
    let tz = location.tz()?;
    let today = now.with_timezone(&tz).date_naive();
    let first = shift(today, *window.offsets().start())?;

    // every offset needs its own date and the next one
    let boundaries = (0..=window.days() as i64)
        .map(|index| {
            let date = shift(first, index)?;
            provider.day_boundary(location, date)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut blocks = Vec::with_capacity(window.days() * 24);
    for pair in boundaries.windows(2) {
        let (eve, day) = (&pair[0], &pair[1]);

        let night = Span {
            period: Period::Night,
            start: eve.sunset,
            end: day.sunrise,
            date: day.date,
            ruler: eve.date.weekday(),
        };
        let daylight = Span {
            period: Period::Day,
            start: day.sunrise,
            end: day.sunset,
            date: day.date,
            ruler: day.date.weekday(),
        };

        blocks.extend(night.segment(Some(now))?);
        blocks.extend(daylight.segment(Some(now))?);
    }

    debug!(
        "Built {} hour blocks from {} to {}",
        blocks.len(),
        first,
        boundaries.last().map(|boundary| boundary.date).unwrap_or(first)
    );
    Ok(Timeline { blocks, boundaries })
}
