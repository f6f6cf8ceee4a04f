//! Weekday rulers and the hourly planet rotation.
//!
//! Every weekday's 24 planetary hours are one continuous walk through the
//! Chaldean order starting at the weekday's ruler. Hour `h` (1..=24) is ruled
//! by `CHALDEAN[(ruler + h - 1) % 7]`: the 12 hours of daylight come first,
//! then the 12 hours of the night that follows it. Hour 25 is the next
//! weekday's ruler, so the walk never breaks at sunrise or sunset.

use std::fmt;

use chrono::Weekday;
use serde::Serialize;

/// Hours in one day or night span.
pub const HOURS_PER_SPAN: usize = 12;

/// The seven classical planets, declared in Chaldean order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Planet {
    Saturn,
    Jupiter,
    Mars,
    Sun,
    Venus,
    Mercury,
    Moon,
}

impl Planet {
    pub const CHALDEAN: [Planet; 7] = [
        Planet::Saturn,
        Planet::Jupiter,
        Planet::Mars,
        Planet::Sun,
        Planet::Venus,
        Planet::Mercury,
        Planet::Moon,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Planet::Saturn => "Saturn",
            Planet::Jupiter => "Jupiter",
            Planet::Mars => "Mars",
            Planet::Sun => "Sun",
            Planet::Venus => "Venus",
            Planet::Mercury => "Mercury",
            Planet::Moon => "Moon",
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Half of a planetary day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Period {
    Day,
    Night,
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Day => f.write_str("Day"),
            Period::Night => f.write_str("Night"),
        }
    }
}

// Sunday-first, matching `Weekday::num_days_from_sunday`
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Planet ruling the weekday, and therefore its first day hour.
pub const fn day_ruler(weekday: Weekday) -> Planet {
    match weekday {
        Weekday::Sun => Planet::Sun,
        Weekday::Mon => Planet::Moon,
        Weekday::Tue => Planet::Mars,
        Weekday::Wed => Planet::Mercury,
        Weekday::Thu => Planet::Jupiter,
        Weekday::Fri => Planet::Venus,
        Weekday::Sat => Planet::Saturn,
    }
}

type SpanTable = [Planet; HOURS_PER_SPAN];

/// `[weekday from Sunday][Day, Night]`
static ROTATION: [[SpanTable; 2]; 7] = build_rotation();

const fn build_rotation() -> [[SpanTable; 2]; 7] {
    let mut table = [[[Planet::Saturn; HOURS_PER_SPAN]; 2]; 7];

    let mut day = 0;
    while day < 7 {
        let start = day_ruler(WEEKDAYS[day]) as usize;
        let mut hour = 0;
        while hour < 2 * HOURS_PER_SPAN {
            let planet = Planet::CHALDEAN[(start + hour) % 7];
            table[day][hour / HOURS_PER_SPAN][hour % HOURS_PER_SPAN] = planet;
            hour += 1;
        }
        day += 1;
    }

    table
}

fn period_index(period: Period) -> usize {
    match period {
        Period::Day => 0,
        Period::Night => 1,
    }
}

/// The 12 rulers of a weekday's day, or of the night after it, in hour order.
pub fn span_planets(weekday: Weekday, period: Period) -> &'static SpanTable {
    &ROTATION[weekday.num_days_from_sunday() as usize][period_index(period)]
}
