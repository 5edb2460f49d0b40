//! # Weather API Client
//!
//! Typed operations on top of the [`Gateway`]. Views never build URLs; they
//! call these methods through the [`WeatherApi`] trait, which is also the
//! seam test doubles plug into.

use async_trait::async_trait;
use log::debug;
use reqwest::Method;
use serde_json::Value;

use super::gateway::{FetchError, Gateway, decode};
use super::types::{
    Credentials, CurrentWeather, FavoriteLocation, Location, LoginResponse, PlaceResult,
    RegisterResponse, WeatherReport,
};

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const SEARCH_PATH: &str = "/api/weather/places/search";
pub const FAVORITES_PATH: &str = "/favoriteLocations";
pub const CURRENT_WEATHER_PATH: &str = "/api/weather/current";

#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// `POST /login`. Does not touch the session; the caller stores the token.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, FetchError>;

    /// `POST /register`.
    async fn register(&self, credentials: &Credentials) -> Result<RegisterResponse, FetchError>;

    /// `GET /api/weather/places/search?query=<q>`.
    async fn search_places(&self, query: &str) -> Result<Vec<Location>, FetchError>;

    /// `POST /favoriteLocations`.
    async fn add_favorite(&self, location: &Location) -> Result<(), FetchError>;

    /// `GET /favoriteLocations`.
    async fn favorite_locations(&self) -> Result<Vec<Location>, FetchError>;

    /// `GET /api/weather/current?city=<c>`, plus coordinates when known.
    async fn current_weather(
        &self,
        city: &str,
        location: Option<&Location>,
    ) -> Result<WeatherReport, FetchError>;
}

/// HTTP implementation of [`WeatherApi`].
pub struct ApiClient {
    gateway: Gateway,
}

impl ApiClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }
}

#[async_trait]
impl WeatherApi for ApiClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, FetchError> {
        self.gateway
            .request_json(Method::POST, LOGIN_PATH, Some(credentials))
            .await
    }

    async fn register(&self, credentials: &Credentials) -> Result<RegisterResponse, FetchError> {
        let body = serde_json::to_value(credentials).map_err(|e| FetchError::Parse(e.to_string()))?;
        let value = self
            .gateway
            .request(Method::POST, REGISTER_PATH, Some(&body))
            .await?;
        match value {
            Value::Object(_) => decode(value),
            // Empty body or a bare "ok" both count as success.
            _ => Ok(RegisterResponse::default()),
        }
    }

    async fn search_places(&self, query: &str) -> Result<Vec<Location>, FetchError> {
        let value = self
            .gateway
            .get_with_query(SEARCH_PATH, &[("query", query.to_string())])
            .await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        let places: Vec<PlaceResult> = decode(value)?;
        debug!("Search '{}' returned {} places", query, places.len());
        Ok(places.into_iter().map(Location::from).collect())
    }

    async fn add_favorite(&self, location: &Location) -> Result<(), FetchError> {
        let body = FavoriteLocation::from(location);
        let body = serde_json::to_value(&body).map_err(|e| FetchError::Parse(e.to_string()))?;
        self.gateway
            .request(Method::POST, FAVORITES_PATH, Some(&body))
            .await?;
        Ok(())
    }

    async fn favorite_locations(&self) -> Result<Vec<Location>, FetchError> {
        let value = self.gateway.request(Method::GET, FAVORITES_PATH, None).await?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        let favorites: Vec<FavoriteLocation> = decode(value)?;
        Ok(favorites.into_iter().map(Location::from).collect())
    }

    async fn current_weather(
        &self,
        city: &str,
        location: Option<&Location>,
    ) -> Result<WeatherReport, FetchError> {
        let mut query = vec![("city", city.to_string())];
        if let Some(loc) = location {
            query.push(("lat", loc.latitude.to_string()));
            query.push(("lon", loc.longitude.to_string()));
        }
        let value = self
            .gateway
            .get_with_query(CURRENT_WEATHER_PATH, &query)
            .await?;
        let raw: CurrentWeather = decode(value)?;
        Ok(WeatherReport::from_current(city, location, raw))
    }
}
