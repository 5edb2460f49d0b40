//! # Application State
//!
//! Core business state for Skycast. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── api: Arc<dyn WeatherApi>      // backend client
//! ├── session: Arc<SessionStore>    // auth token (shared with the gateway)
//! ├── route: Route                  // current screen
//! ├── home: HomeState               // search toggle + debounced search
//! ├── login / register: AuthForm    // form state machines
//! ├── favorites: FavoritesList      // /favoriteLocations
//! ├── weather: WeatherView          // /weather/:city
//! ├── username: Option<String>      // who logged in this run
//! └── status_message: String        // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;
use std::time::Duration;

use crate::api::WeatherApi;
use crate::core::auth::{AuthForm, AuthKind};
use crate::core::config::ResolvedConfig;
use crate::core::favorites::FavoritesList;
use crate::core::route::Route;
use crate::core::search::SearchController;
use crate::core::session::SessionStore;
use crate::core::weather::WeatherView;

/// Progress of a one-shot load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

// Manual impl: the derive would require `T: Default`.
impl<T> Default for LoadState<T> {
    fn default() -> Self {
        LoadState::Idle
    }
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }
}

#[derive(Debug, Default)]
pub struct HomeState {
    /// The search box is hidden until the user asks for it.
    pub show_search: bool,
    pub search: SearchController,
}

pub struct App {
    pub api: Arc<dyn WeatherApi>,
    pub session: Arc<SessionStore>,
    pub route: Route,
    pub home: HomeState,
    pub login: AuthForm,
    pub register: AuthForm,
    pub favorites: FavoritesList,
    pub weather: WeatherView,
    pub username: Option<String>,
    pub status_message: String,
}

impl App {
    pub fn new(api: Arc<dyn WeatherApi>, session: Arc<SessionStore>, debounce: Duration) -> Self {
        Self {
            api,
            session,
            route: Route::Home,
            home: HomeState {
                show_search: false,
                search: SearchController::new(debounce),
            },
            login: AuthForm::new(AuthKind::Login),
            register: AuthForm::new(AuthKind::Register),
            favorites: FavoritesList::default(),
            weather: WeatherView::default(),
            username: None,
            status_message: String::from("Welcome to Skycast!"),
        }
    }

    pub fn from_config(
        api: Arc<dyn WeatherApi>,
        session: Arc<SessionStore>,
        config: &ResolvedConfig,
    ) -> Self {
        Self::new(api, session, config.debounce)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.has_token()
    }

    /// True while anything the user is waiting on is outstanding.
    pub fn is_busy(&self) -> bool {
        self.home.search.state().pending
            || self.login.is_submitting()
            || self.register.is_submitting()
            || self.favorites.locations.is_loading()
            || self.weather.report.is_loading()
    }
}
