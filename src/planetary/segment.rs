use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Weekday};
use chrono_tz::Tz;

use super::rotation::{HOURS_PER_SPAN, Period, Planet, span_planets};
use crate::error::AppError;

/// One planetary hour.
#[derive(Debug, Clone, PartialEq)]
pub struct HourBlock {
    /// 1..=12 within its span
    pub ordinal: u8,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub period: Period,
    pub planet: Planet,
    /// Weekday the span belongs to (a night belongs to the day it leads into)
    pub weekday: Weekday,
    pub date: NaiveDate,
    pub is_current: bool,
}

impl HourBlock {
    /// Half-open containment: `start <= instant < end`.
    pub fn contains(&self, instant: &DateTime<Tz>) -> bool {
        self.start <= *instant && *instant < self.end
    }
}

/// A sunrise-to-sunset or sunset-to-sunrise interval labeled with the civil date it belongs to.
#[derive(Debug, Clone)]
pub struct Span {
    pub period: Period,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub date: NaiveDate,
    /// Weekday whose rotation rules the span. A night takes the hours 13..=24
    /// of the day it follows, while `date` names the day it leads into.
    pub ruler: Weekday,
}

impl Span {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Splits the span into 12 equal hours ruled per `ruler`'s rotation.
    ///
    /// Boundary `i` is `start + span * i / 12`, so hour 12 ends exactly at
    /// `end`. When `now` falls in `[start, end)`, exactly one block is flagged
    /// current.
    pub fn segment(&self, now: Option<&DateTime<Tz>>) -> Result<Vec<HourBlock>, AppError> {
        if self.end <= self.start {
            return Err(self.invalid());
        }

        let total = (self.end - self.start)
            .num_nanoseconds()
            .ok_or_else(|| self.invalid())?;
        let planets = span_planets(self.ruler, self.period);
        let boundary = |i: usize| -> Result<DateTime<Tz>, AppError> {
            let offset = i128::from(total) * i as i128 / HOURS_PER_SPAN as i128;
            self.start
                .checked_add_signed(TimeDelta::nanoseconds(offset as i64))
                .ok_or_else(|| self.invalid())
        };

        let mut blocks = Vec::with_capacity(HOURS_PER_SPAN);
        let mut start = self.start;
        for (index, planet) in planets.iter().enumerate() {
            let end = if index + 1 == HOURS_PER_SPAN {
                self.end
            } else {
                boundary(index + 1)?
            };
            let mut block = HourBlock {
                ordinal: (index + 1) as u8,
                start,
                end,
                period: self.period,
                planet: *planet,
                weekday: self.weekday(),
                date: self.date,
                is_current: false,
            };
            block.is_current = now.is_some_and(|now| block.contains(now));
            start = end;
            blocks.push(block);
        }

        Ok(blocks)
    }

    fn invalid(&self) -> AppError {
        AppError::InvalidSpan {
            period: self.period,
            date: self.date,
            start: self.start,
            end: self.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono_tz::Asia::Kolkata;

    fn at(day: u32, hour: u32, minute: u32, second: u32) -> DateTime<Tz> {
        Kolkata
            .with_ymd_and_hms(2024, 3, day, hour, minute, second)
            .unwrap()
    }

    fn day_span() -> Span {
        Span {
            period: Period::Day,
            start: at(18, 6, 0, 0),
            end: at(18, 18, 0, 0),
            date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            ruler: Weekday::Mon,
        }
    }

    #[test]
    fn blocks_partition_the_span() {
        let span = Span {
            period: Period::Night,
            start: at(17, 18, 31, 7),
            end: at(18, 6, 24, 53),
            date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            ruler: Weekday::Sun,
        };
        let blocks = span.segment(None).unwrap();

        assert_eq!(blocks.len(), 12);
        assert_eq!(blocks[0].start, span.start);
        assert_eq!(blocks[11].end, span.end);
        for pair in blocks.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
            assert_eq!(pair[0].ordinal + 1, pair[1].ordinal);
        }
        assert!(blocks.iter().all(|block| !block.is_current));
        assert!(blocks.iter().all(|block| block.weekday == Weekday::Mon));
    }

    #[test]
    fn night_is_ruled_by_the_day_it_follows_but_labeled_with_the_next() {
        // sunset on Sunday 2024-03-17 to sunrise on Monday
        let span = Span {
            period: Period::Night,
            start: at(17, 18, 0, 0),
            end: at(18, 6, 0, 0),
            date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            ruler: Weekday::Sun,
        };
        let now = at(17, 20, 0, 0);
        let blocks = span.segment(Some(&now)).unwrap();

        assert_eq!(blocks[0].planet, Planet::Jupiter);
        assert_eq!(blocks[11].planet, Planet::Mercury);
        let current = blocks.iter().find(|block| block.is_current).unwrap();
        assert_eq!(current.ordinal, 3);
        assert_eq!(current.planet, Planet::Sun);
        assert_eq!(current.weekday, Weekday::Mon);
        assert_eq!(current.date, span.date);
    }

    #[test]
    fn uneven_spans_do_not_drift() {
        let span = Span {
            period: Period::Day,
            start: at(18, 6, 0, 0),
            end: at(18, 18, 0, 7),
            date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            ruler: Weekday::Mon,
        };
        let blocks = span.segment(None).unwrap();
        let expected = (span.end - span.start) / 12;
        for block in &blocks[..11] {
            let length = block.end - block.start;
            assert!((length - expected).num_nanoseconds().unwrap().abs() <= 1);
        }
        assert_eq!(blocks[11].end, span.end);
    }

    #[test]
    fn nine_o_clock_is_the_fourth_hour_of_a_twelve_hour_day() {
        let now = at(18, 9, 0, 0);
        let blocks = day_span().segment(Some(&now)).unwrap();
        let current: Vec<_> = blocks.iter().filter(|block| block.is_current).collect();

        assert_eq!(current.len(), 1);
        assert_eq!(current[0].ordinal, 4);
        assert_eq!(current[0].start, at(18, 9, 0, 0));
        assert_eq!(current[0].end, at(18, 10, 0, 0));
    }

    #[test]
    fn instants_outside_the_span_flag_nothing() {
        let span = day_span();
        for now in [at(18, 5, 59, 59), at(18, 18, 0, 0), at(19, 9, 0, 0)] {
            let blocks = span.segment(Some(&now)).unwrap();
            assert!(blocks.iter().all(|block| !block.is_current), "{}", now);
        }
    }

    #[test]
    fn planets_follow_the_weekday_rotation() {
        // 2024-03-18 is a Monday
        let blocks = day_span().segment(None).unwrap();
        assert_eq!(blocks[0].planet, Planet::Moon);
        assert_eq!(blocks[1].planet, Planet::Saturn);
        assert_eq!(blocks[11].planet, Planet::Sun);
    }

    #[test]
    fn non_positive_spans_are_rejected() {
        let mut span = day_span();
        span.end = span.start;
        assert!(matches!(
            span.segment(None),
            Err(AppError::InvalidSpan { .. })
        ));

        span.end = at(18, 5, 0, 0);
        assert!(matches!(
            span.segment(None),
            Err(AppError::InvalidSpan { period: Period::Day, .. })
        ));
    }
}
