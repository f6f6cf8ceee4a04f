use serde::{Deserialize, Serialize};

use crate::directory::DEFAULT_COUNTRY;

/// Body of `POST /sun-times`
#[derive(Deserialize, Debug)]
pub struct SunTimesRequest {
    /// Country name, case-insensitive
    #[serde(default = "default_country")]
    pub country: String,
    /// State or city name, case-insensitive
    #[serde(alias = "city")]
    pub state: String,
    /// Reference instant; RFC 3339 or local "YYYY-MM-DDTHH:MM[:SS]", now when absent
    #[serde(default)]
    pub at: Option<String>,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

/// Body of `GET /health`
#[derive(Serialize, Deserialize, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub countries: usize,
}

/// Error body shared by every endpoint
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
