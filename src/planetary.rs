//! Planetary hours: twelve unequal hours per day and per night, each ruled by
//! one of the seven classical planets.

mod locate;
mod rotation;
mod segment;
mod window;

pub use rotation::{Period, Planet, day_ruler};
pub use segment::HourBlock;
pub use window::{Timeline, Window, build_timeline};
