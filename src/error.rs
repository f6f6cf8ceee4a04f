use std::io;

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use thiserror::Error;

use crate::planetary::Period;

/// Custom error types for the planetary-hours service
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested country is not in the location directory
    #[error("Country '{0}' not found")]
    UnknownCountry(String),

    /// Requested state or city is not listed under the country
    #[error("State '{state}' not found in '{country}'")]
    UnknownLocation { country: String, state: String },

    /// The reference instant supplied by the caller could not be parsed
    #[error("Invalid reference instant: {0}")]
    InvalidInstant(String),

    /// A day or night span with non-positive duration
    #[error("Invalid {period} span for {date}: {start} .. {end}")]
    InvalidSpan {
        period: Period,
        date: NaiveDate,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    },

    /// The sun stays above the horizon for the whole date
    #[error("Sun never sets at ({latitude}, {longitude}) on {date}")]
    PolarDay {
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
    },

    /// The sun stays below the horizon for the whole date
    #[error("Sun never rises at ({latitude}, {longitude}) on {date}")]
    PolarNight {
        date: NaiveDate,
        latitude: f64,
        longitude: f64,
    },

    /// The solar position algorithm rejected its input
    #[error("Ephemeris failure: {0}")]
    Ephemeris(String),

    /// Time zone identifier unknown to the tz database
    #[error("Unsupported time zone: {0}")]
    UnsupportedTimezone(String),

    /// Date arithmetic left the supported range or hit a non-existent local time
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// The location directory file is malformed
    #[error("Invalid location directory: {0}")]
    InvalidDirectory(String),

    /// Wrapper for I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// Wrapper for JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl AppError {
    /// Whether the failure was caused by the caller's input rather than the computation.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            AppError::UnknownCountry(_)
                | AppError::UnknownLocation { .. }
                | AppError::InvalidInstant(_)
        )
    }

    /// Whether the failure is a lookup miss in the location directory.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::UnknownCountry(_) | AppError::UnknownLocation { .. }
        )
    }
}
