// Module containing the on-disk record shapes of the directory file
mod record;

use std::{fs, path::Path};

use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::AppError;

// Directory shipped with the binary, used when no file is configured
const BUNDLED_COUNTRIES: &str = include_str!("../data/countries.json");

/// Country assumed when a query names only a state or city.
pub const DEFAULT_COUNTRY: &str = "India";

/// A resolved state or city with everything the ephemeris needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    #[serde(rename = "timezone")]
    pub time_zone: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Parses the location's IANA time zone identifier.
    pub fn tz(&self) -> Result<Tz, AppError> {
        self.time_zone
            .parse::<Tz>()
            .map_err(|_| AppError::UnsupportedTimezone(self.time_zone.clone()))
    }
}

#[derive(Debug)]
struct Country {
    name: String,
    locations: Vec<Location>,
}

/// Static country → state/city reference data, loaded once and read-only afterwards.
#[derive(Debug)]
pub struct LocationDirectory {
    countries: Vec<Country>,
}

impl LocationDirectory {
    /// Loads the directory from a JSON file, or the bundled data when `path` is `None`.
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        match path {
            Some(path) => {
                info!("Loading location directory from {}", path.display());
                let raw = fs::read_to_string(path)?;
                Self::from_json(&raw)
            }
            None => {
                info!("Loading bundled location directory");
                Self::from_json(BUNDLED_COUNTRIES)
            }
        }
    }

    /// Parses and validates directory JSON.
    pub fn from_json(raw: &str) -> Result<Self, AppError> {
        let records: Vec<record::CountryRecord> = serde_json::from_str(raw)?;

        let mut countries = Vec::with_capacity(records.len());
        for country in records {
            let name = country.country.trim().to_string();
            if name.is_empty() {
                return Err(AppError::InvalidDirectory("empty country name".into()));
            }

            let mut locations = Vec::with_capacity(country.locations.len());
            for entry in country.locations {
                let state = entry.state.trim().to_string();
                if state.is_empty() {
                    return Err(AppError::InvalidDirectory(format!(
                        "empty state name in '{}'",
                        name
                    )));
                }
                if !(-90.0..=90.0).contains(&entry.latitude)
                    || !(-180.0..=180.0).contains(&entry.longitude)
                {
                    return Err(AppError::InvalidDirectory(format!(
                        "coordinates out of range for '{}' in '{}': ({}, {})",
                        state, name, entry.latitude, entry.longitude
                    )));
                }
                locations.push(Location {
                    name: state,
                    country: name.clone(),
                    time_zone: entry.timezone.trim().to_string(),
                    latitude: entry.latitude,
                    longitude: entry.longitude,
                });
            }

            countries.push(Country { name, locations });
        }

        debug!("Location directory holds {} countries", countries.len());
        Ok(Self { countries })
    }

    /// Finds a state or city, case-insensitively on both names.
    pub fn lookup(&self, country: &str, state: &str) -> Result<&Location, AppError> {
        let entry = self.country(country)?;
        let wanted = state.trim().to_lowercase();

        entry
            .locations
            .iter()
            .find(|location| location.name.to_lowercase() == wanted)
            .ok_or_else(|| AppError::UnknownLocation {
                country: entry.name.clone(),
                state: state.trim().to_string(),
            })
    }

    /// Country names in file order.
    pub fn countries(&self) -> impl Iterator<Item = &str> {
        self.countries.iter().map(|country| country.name.as_str())
    }

    /// All locations listed under a country.
    pub fn locations(&self, country: &str) -> Result<&[Location], AppError> {
        Ok(&self.country(country)?.locations)
    }

    fn country(&self, country: &str) -> Result<&Country, AppError> {
        let wanted = country.trim().to_lowercase();
        self.countries
            .iter()
            .find(|entry| entry.name.to_lowercase() == wanted)
            .ok_or_else(|| AppError::UnknownCountry(country.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "country": "India",
            "locations": [
                { "state": "Delhi", "timezone": "Asia/Kolkata", "latitude": 28.6139, "longitude": 77.2090 },
                { "state": "Tamil Nadu", "timezone": "Asia/Kolkata", "latitude": 13.0827, "longitude": 80.2707 }
            ]
        },
        {
            "country": "Mars",
            "locations": [
                { "city": "Olympus", "timezone": "Mars/Olympus", "latitude": 18.65, "longitude": -133.8 }
            ]
        }
    ]"#;

    #[test]
    fn lookup_is_case_insensitive() {
        let directory = LocationDirectory::from_json(SAMPLE).unwrap();
        let location = directory.lookup("INDIA", " tamil nadu ").unwrap();
        assert_eq!(location.name, "Tamil Nadu");
        assert_eq!(location.country, "India");
        assert_eq!(location.tz().unwrap(), chrono_tz::Asia::Kolkata);
    }

    #[test]
    fn unknown_names_report_the_offending_identifier() {
        let directory = LocationDirectory::from_json(SAMPLE).unwrap();
        match directory.lookup("Atlantis", "Delhi") {
            Err(AppError::UnknownCountry(country)) => assert_eq!(country, "Atlantis"),
            other => panic!("unexpected result: {:?}", other),
        }
        match directory.lookup("india", "Gotham") {
            Err(AppError::UnknownLocation { country, state }) => {
                assert_eq!(country, "India");
                assert_eq!(state, "Gotham");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn time_zone_is_validated_on_use() {
        let directory = LocationDirectory::from_json(SAMPLE).unwrap();
        let location = directory.lookup("mars", "olympus").unwrap();
        assert!(matches!(
            location.tz(),
            Err(AppError::UnsupportedTimezone(zone)) if zone == "Mars/Olympus"
        ));
    }

    #[test]
    fn rejects_out_of_range_coordinates() {
        let raw = r#"[{ "country": "X", "locations": [
            { "state": "Y", "timezone": "UTC", "latitude": 91.0, "longitude": 0.0 }
        ]}]"#;
        assert!(matches!(
            LocationDirectory::from_json(raw),
            Err(AppError::InvalidDirectory(_))
        ));
    }

    #[test]
    fn bundled_directory_loads() {
        let directory = LocationDirectory::load(None).unwrap();
        assert!(directory.countries().any(|name| name == "India"));
        let delhi = directory.lookup("India", "delhi").unwrap();
        assert!(delhi.tz().is_ok());
        for country in directory.countries() {
            for location in directory.locations(country).unwrap() {
                assert!(location.tz().is_ok(), "bad zone for {}", location.name);
            }
        }
    }
}
