/// One country entry of the location directory file
#[derive(serde::Deserialize, Debug)]
pub struct CountryRecord {
    /// Country name as displayed (e.g., "India")
    pub country: String,
    /// States or cities known for this country
    pub locations: Vec<LocationRecord>,
}

/// One state or city entry within a country
#[derive(serde::Deserialize, Debug)]
pub struct LocationRecord {
    /// State or city name (the original file calls this field `state`)
    #[serde(alias = "city")]
    pub state: String,
    /// IANA time zone identifier (e.g., "Asia/Kolkata")
    pub timezone: String,
    /// Latitude in degrees, north positive
    pub latitude: f64,
    /// Longitude in degrees, east positive
    pub longitude: f64,
}
