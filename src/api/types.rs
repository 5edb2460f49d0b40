//! # Wire Types
//!
//! Request and response bodies exchanged with the weather backend, plus the
//! domain `Location` value they translate into.
//!
//! The backend uses two shapes for the same place: search results carry
//! `{name, country, lat, lon}`, favorites carry
//! `{locationName, country, latitude, longitude}`. Both convert into
//! `Location` so nothing above this module sees the difference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A place on the map. Immutable value type shared by search, favorites and
/// the weather detail view.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, country: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
            latitude,
            longitude,
        }
    }

    /// "Berlin, DE" style label used in lists.
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.country)
        }
    }
}

// ============================================================================
// Auth
// ============================================================================

/// Body for both `POST /login` and `POST /register`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// `POST /login` response. Older backends only echo the username, in which
/// case the username itself is the session token.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct LoginResponse {
    pub username: String,
    #[serde(default)]
    pub token: Option<String>,
}

impl LoginResponse {
    pub fn session_token(&self) -> String {
        self.token.clone().unwrap_or_else(|| self.username.clone())
    }
}

/// `POST /register` response. Usually `{}`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RegisterResponse {
    #[serde(default)]
    pub token: Option<String>,
}

// ============================================================================
// Search
// ============================================================================

/// One entry of `GET /api/weather/places/search`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct PlaceResult {
    pub name: String,
    #[serde(default)]
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<PlaceResult> for Location {
    fn from(place: PlaceResult) -> Self {
        Location::new(place.name, place.country, place.lat, place.lon)
    }
}

// ============================================================================
// Favorites
// ============================================================================

/// Body of `POST /favoriteLocations` and entries of `GET /favoriteLocations`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteLocation {
    pub location_name: String,
    #[serde(default)]
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Location> for FavoriteLocation {
    fn from(location: &Location) -> Self {
        Self {
            location_name: location.name.clone(),
            country: location.country.clone(),
            latitude: location.latitude,
            longitude: location.longitude,
        }
    }
}

impl From<FavoriteLocation> for Location {
    fn from(fav: FavoriteLocation) -> Self {
        Location::new(fav.location_name, fav.country, fav.latitude, fav.longitude)
    }
}

// ============================================================================
// Weather detail
// ============================================================================

/// Raw `GET /api/weather/current` body. Location fields are optional because
/// the backend may only echo the queried city.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    pub temperature: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub description: String,
}

/// Weather detail as shown in the UI.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub city: String,
    /// Known when the backend returned coordinates, or the caller already had them.
    pub location: Option<Location>,
    pub temperature: f64,
    pub feels_like: Option<f64>,
    pub humidity: Option<u8>,
    pub wind_speed: Option<f64>,
    pub description: String,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherReport {
    /// Merge the raw body with whatever the caller already knew about the place.
    pub fn from_current(city: &str, known: Option<&Location>, raw: CurrentWeather) -> Self {
        let location = match (raw.lat, raw.lon) {
            (Some(lat), Some(lon)) => Some(Location::new(
                raw.name.clone().unwrap_or_else(|| city.to_string()),
                raw.country
                    .clone()
                    .or_else(|| known.map(|l| l.country.clone()))
                    .unwrap_or_default(),
                lat,
                lon,
            )),
            _ => known.cloned(),
        };

        Self {
            city: raw.name.unwrap_or_else(|| city.to_string()),
            location,
            temperature: raw.temperature,
            feels_like: raw.feels_like,
            humidity: raw.humidity,
            wind_speed: raw.wind_speed,
            description: raw.description,
            fetched_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_result_parses_search_shape() {
        let json = r#"[{"name":"Berlin","country":"DE","lat":52.52,"lon":13.4}]"#;
        let places: Vec<PlaceResult> = serde_json::from_str(json).unwrap();
        let location: Location = places[0].clone().into();
        assert_eq!(location, Location::new("Berlin", "DE", 52.52, 13.4));
    }

    #[test]
    fn test_favorite_uses_camel_case_keys() {
        let fav = FavoriteLocation::from(&Location::new("Berlin", "DE", 52.0, 13.0));
        let value = serde_json::to_value(&fav).unwrap();
        assert_eq!(value["locationName"], "Berlin");
        assert_eq!(value["country"], "DE");
        assert_eq!(value["latitude"], 52.0);
        assert_eq!(value["longitude"], 13.0);
    }

    #[test]
    fn test_login_response_falls_back_to_username() {
        let resp: LoginResponse = serde_json::from_str(r#"{"username":"TestUser"}"#).unwrap();
        assert_eq!(resp.session_token(), "TestUser");

        let resp: LoginResponse =
            serde_json::from_str(r#"{"username":"TestUser","token":"abc"}"#).unwrap();
        assert_eq!(resp.session_token(), "abc");
    }

    #[test]
    fn test_register_response_accepts_empty_object() {
        let resp: RegisterResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(resp, RegisterResponse::default());
    }

    #[test]
    fn test_weather_report_keeps_known_location_without_coordinates() {
        let known = Location::new("Berlin", "DE", 52.0, 13.0);
        let raw: CurrentWeather =
            serde_json::from_str(r#"{"temperature":21.5,"description":"sunny"}"#).unwrap();
        let report = WeatherReport::from_current("Berlin", Some(&known), raw);
        assert_eq!(report.city, "Berlin");
        assert_eq!(report.location, Some(known));
        assert_eq!(report.description, "sunny");
    }

    #[test]
    fn test_weather_report_prefers_backend_coordinates() {
        let raw: CurrentWeather = serde_json::from_str(
            r#"{"name":"Hamburg","country":"DE","lat":53.5,"lon":10.0,"temperature":12.0,"windSpeed":4.2}"#,
        )
        .unwrap();
        let report = WeatherReport::from_current("hamburg", None, raw);
        assert_eq!(report.city, "Hamburg");
        assert_eq!(report.location, Some(Location::new("Hamburg", "DE", 53.5, 10.0)));
        assert_eq!(report.wind_speed, Some(4.2));
    }
}
