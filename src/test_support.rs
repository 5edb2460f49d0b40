//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::api::{
    Credentials, FetchError, Location, LoginResponse, RegisterResponse, WeatherApi, WeatherReport,
};
use crate::core::action::Action;
use crate::core::search::DEFAULT_DEBOUNCE;
use crate::core::session::SessionStore;
use crate::core::state::App;
use crate::runtime::{Runtime, dispatch};

#[derive(Default)]
struct Recorded {
    search_calls: Vec<String>,
    search_results: HashMap<String, Vec<Location>>,
    search_delays: HashMap<String, Duration>,
    login_response: Option<Result<LoginResponse, FetchError>>,
    favorites: Vec<Location>,
    favorites_tokens: Vec<Option<String>>,
    added_favorites: Vec<Location>,
    weather_error: Option<FetchError>,
}

/// In-process backend that records every call. Reads the session the way
/// the real gateway does, so token propagation can be asserted.
pub struct RecordingApi {
    session: Arc<SessionStore>,
    inner: Mutex<Recorded>,
}

impl RecordingApi {
    pub fn new(session: Arc<SessionStore>) -> Self {
        Self {
            session,
            inner: Mutex::new(Recorded::default()),
        }
    }

    pub fn set_search_results(&self, query: &str, results: Vec<Location>) {
        self.inner
            .lock()
            .unwrap()
            .search_results
            .insert(query.to_string(), results);
    }

    pub fn set_search_delay(&self, query: &str, delay: Duration) {
        self.inner
            .lock()
            .unwrap()
            .search_delays
            .insert(query.to_string(), delay);
    }

    pub fn set_login_response(&self, response: Result<LoginResponse, FetchError>) {
        self.inner.lock().unwrap().login_response = Some(response);
    }

    pub fn set_favorites(&self, favorites: Vec<Location>) {
        self.inner.lock().unwrap().favorites = favorites;
    }

    pub fn set_weather_error(&self, error: FetchError) {
        self.inner.lock().unwrap().weather_error = Some(error);
    }

    pub fn search_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().search_calls.clone()
    }

    pub fn favorites_tokens(&self) -> Vec<Option<String>> {
        self.inner.lock().unwrap().favorites_tokens.clone()
    }

    pub fn added_favorites(&self) -> Vec<Location> {
        self.inner.lock().unwrap().added_favorites.clone()
    }
}

#[async_trait]
impl WeatherApi for RecordingApi {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, FetchError> {
        let configured = self.inner.lock().unwrap().login_response.clone();
        configured.unwrap_or_else(|| {
            Ok(LoginResponse {
                username: credentials.username.clone(),
                token: None,
            })
        })
    }

    async fn register(&self, _credentials: &Credentials) -> Result<RegisterResponse, FetchError> {
        Ok(RegisterResponse::default())
    }

    async fn search_places(&self, query: &str) -> Result<Vec<Location>, FetchError> {
        let (delay, results) = {
            let mut inner = self.inner.lock().unwrap();
            inner.search_calls.push(query.to_string());
            (
                inner.search_delays.get(query).copied(),
                inner.search_results.get(query).cloned().unwrap_or_default(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(results)
    }

    async fn add_favorite(&self, location: &Location) -> Result<(), FetchError> {
        self.inner
            .lock()
            .unwrap()
            .added_favorites
            .push(location.clone());
        Ok(())
    }

    async fn favorite_locations(&self) -> Result<Vec<Location>, FetchError> {
        let mut inner = self.inner.lock().unwrap();
        inner.favorites_tokens.push(self.session.token());
        Ok(inner.favorites.clone())
    }

    async fn current_weather(
        &self,
        city: &str,
        location: Option<&Location>,
    ) -> Result<WeatherReport, FetchError> {
        if let Some(error) = self.inner.lock().unwrap().weather_error.clone() {
            return Err(error);
        }
        Ok(WeatherReport {
            city: city.to_string(),
            location: location.cloned(),
            temperature: 18.5,
            feels_like: Some(17.0),
            humidity: Some(60),
            wind_speed: Some(3.5),
            description: "scattered clouds".to_string(),
            fetched_at: chrono::Utc::now(),
        })
    }
}

/// Creates a logged-out test App backed by a `RecordingApi`.
pub fn test_app() -> (App, Arc<RecordingApi>) {
    let session = Arc::new(SessionStore::in_memory());
    let api = Arc::new(RecordingApi::new(session.clone()));
    let app = App::new(api.clone(), session, DEFAULT_DEBOUNCE);
    (app, api)
}

/// Like `test_app`, with a token already in the session.
pub fn logged_in_app() -> (App, Arc<RecordingApi>) {
    let (app, api) = test_app();
    app.session.set_token("fake-token").unwrap();
    (app, api)
}

/// Feed actions back into the app until nothing arrives for 30s of
/// (usually paused) tokio time.
pub async fn drain(app: &mut App, runtime: &mut Runtime, rx: &mut UnboundedReceiver<Action>) {
    while let Ok(Some(action)) = tokio::time::timeout(Duration::from_secs(30), rx.recv()).await {
        if dispatch(app, runtime, action) {
            break;
        }
    }
}

/// All symbols of a test terminal's buffer, row after row.
pub fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect()
}

/// A fresh, empty directory under the system temp dir.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("skycast-{}-{}", name, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
