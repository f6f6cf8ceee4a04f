use chrono::DateTime;
use chrono_tz::Tz;

use super::segment::HourBlock;

/// First block whose `[start, end)` contains `instant`.
///
/// Blocks are a strict partition of non-overlapping spans, so at most one can
/// match. An instant outside the timeline yields `None`, which is a valid
/// answer rather than a failure.
pub fn locate_current<'a>(blocks: &'a [HourBlock], instant: &DateTime<Tz>) -> Option<&'a HourBlock> {
    blocks.iter().find(|block| block.contains(instant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planetary::Period;
    use crate::planetary::segment::Span;
    use chrono::{NaiveDate, TimeZone, Weekday};
    use chrono_tz::Asia::Kolkata;

    fn blocks() -> Vec<HourBlock> {
        let night = Span {
            period: Period::Night,
            start: Kolkata.with_ymd_and_hms(2024, 3, 17, 18, 0, 0).unwrap(),
            end: Kolkata.with_ymd_and_hms(2024, 3, 18, 6, 0, 0).unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
            ruler: Weekday::Sun,
        };
        let day = Span {
            period: Period::Day,
            start: night.end,
            end: Kolkata.with_ymd_and_hms(2024, 3, 18, 18, 0, 0).unwrap(),
            date: night.date,
            ruler: Weekday::Mon,
        };
        let mut blocks = night.segment(None).unwrap();
        blocks.extend(day.segment(None).unwrap());
        blocks
    }

    #[test]
    fn boundary_instant_belongs_to_the_later_block() {
        let blocks = blocks();
        let sunrise = Kolkata.with_ymd_and_hms(2024, 3, 18, 6, 0, 0).unwrap();
        let found = locate_current(&blocks, &sunrise).unwrap();
        assert_eq!(found.period, Period::Day);
        assert_eq!(found.ordinal, 1);
    }

    #[test]
    fn instant_in_another_zone_is_compared_as_an_instant() {
        let blocks = blocks();
        // 00:30 UTC is 06:00 IST
        let instant = chrono::Utc
            .with_ymd_and_hms(2024, 3, 18, 0, 30, 0)
            .unwrap()
            .with_timezone(&Tz::UTC);
        let found = locate_current(&blocks, &instant).unwrap();
        assert_eq!((found.period, found.ordinal), (Period::Day, 1));
    }

    #[test]
    fn outside_the_timeline_is_none() {
        let blocks = blocks();
        let before = Kolkata.with_ymd_and_hms(2024, 3, 17, 17, 59, 59).unwrap();
        let after = Kolkata.with_ymd_and_hms(2024, 3, 18, 18, 0, 0).unwrap();
        assert!(locate_current(&blocks, &before).is_none());
        assert!(locate_current(&blocks, &after).is_none());
        assert!(locate_current(&[], &before).is_none());
    }
}
