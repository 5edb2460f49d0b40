//! # Actions
//!
//! Everything that can happen in Skycast becomes an `Action`.
//! User types in the search box? That's `Action::SearchInput(text)`.
//! Backend answers? That's `Action::SearchCompleted { seq, result }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing any I/O to perform. No
//! network or timers here; the runtime executes effects and feeds the
//! results back in as new actions.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! This makes everything testable: `assert_eq!(update(&mut app, action), expected)`.

use std::time::Duration;

use log::{debug, info, warn};

use crate::api::{Credentials, FetchError, Location, LoginResponse, RegisterResponse, WeatherReport};
use crate::core::auth::REGISTER_SUCCESS_MESSAGE;
use crate::core::route::Route;
use crate::core::search::{SearchRequest, TimerCommand};
use crate::core::state::App;

#[derive(Debug)]
pub enum Action {
    Navigate(Route),
    /// Show or hide the search box on the home screen.
    ToggleSearch,
    SearchInput(String),
    SearchTimerElapsed {
        generation: u64,
    },
    SearchCompleted {
        seq: u64,
        result: Result<Vec<Location>, FetchError>,
    },
    /// Open the detail view for a location picked from a list.
    OpenWeather(Location),
    WeatherLoaded {
        city: String,
        result: Result<WeatherReport, FetchError>,
    },
    SubmitLogin {
        username: String,
        password: String,
    },
    LoginCompleted(Result<LoginResponse, FetchError>),
    SubmitRegister {
        username: String,
        password: String,
    },
    RegisterCompleted(Result<RegisterResponse, FetchError>),
    FavoriteClicked,
    FavoriteSaved {
        location: Location,
        result: Result<(), FetchError>,
    },
    FavoritesLoaded(Result<Vec<Location>, FetchError>),
    Logout,
    Quit,
}

/// I/O requested by `update()`. Executed by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Abort the running debounce timer (if any) and start a new one.
    StartSearchTimer { generation: u64, delay: Duration },
    CancelSearchTimer,
    Search { seq: u64, query: String },
    LoadWeather { city: String, location: Option<Location> },
    Login(Credentials),
    Register(Credentials),
    AddFavorite(Location),
    LoadFavorites,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Navigate(route) => navigate(app, route),

        Action::ToggleSearch => {
            app.home.show_search = !app.home.show_search;
            if app.home.show_search {
                Effect::None
            } else {
                app.home.search.reset();
                Effect::CancelSearchTimer
            }
        }

        Action::SearchInput(text) => match app.home.search.on_input(&text) {
            TimerCommand::Cancel => Effect::CancelSearchTimer,
            TimerCommand::Restart { generation, delay } => {
                Effect::StartSearchTimer { generation, delay }
            }
        },

        Action::SearchTimerElapsed { generation } => match app.home.search.on_timer(generation) {
            Some(SearchRequest { seq, query }) => {
                info!("Searching places for '{}' (request {})", query, seq);
                Effect::Search { seq, query }
            }
            None => Effect::None,
        },

        Action::SearchCompleted { seq, result } => {
            if let Err(e) = &result {
                warn!("Search failed: {}", e);
            }
            app.home.search.apply(seq, result);
            Effect::None
        }

        Action::OpenWeather(location) => {
            let city = location.name.clone();
            app.route = Route::Weather(city.clone());
            app.weather.open(&city, Some(location.clone()));
            Effect::LoadWeather {
                city,
                location: Some(location),
            }
        }

        Action::WeatherLoaded { city, result } => {
            if let Err(e) = &result {
                warn!("Weather for '{}' failed: {}", city, e);
            }
            app.weather.apply(&city, result);
            Effect::None
        }

        Action::SubmitLogin { username, password } => {
            match app.login.submit(&username, &password) {
                Some(credentials) => {
                    info!("Logging in as '{}'", credentials.username);
                    Effect::Login(credentials)
                }
                None => Effect::None,
            }
        }

        Action::LoginCompleted(result) => match result {
            Ok(response) => {
                if let Err(e) = app.session.set_token(response.session_token()) {
                    warn!("Logged in, but the session could not be saved: {}", e);
                }
                info!("Logged in as '{}'", response.username);
                app.login.finish(Ok(format!("Logged in as {}", response.username)));
                app.status_message = format!("Logged in as {}", response.username);
                app.username = Some(response.username);
                navigate(app, Route::Home)
            }
            Err(e) => {
                warn!("Login failed: {}", e);
                app.login.finish(Err(e));
                Effect::None
            }
        },

        Action::SubmitRegister { username, password } => {
            match app.register.submit(&username, &password) {
                Some(credentials) => {
                    info!("Registering '{}'", credentials.username);
                    Effect::Register(credentials)
                }
                None => Effect::None,
            }
        }

        Action::RegisterCompleted(result) => {
            match result {
                Ok(response) => {
                    if let Some(token) = response.token
                        && let Err(e) = app.session.set_token(token)
                    {
                        warn!("Registered, but the session could not be saved: {}", e);
                    }
                    app.register.finish(Ok(REGISTER_SUCCESS_MESSAGE.to_string()));
                }
                Err(e) => {
                    warn!("Registration failed: {}", e);
                    app.register.finish(Err(e));
                }
            }
            Effect::None
        }

        Action::FavoriteClicked => {
            let session = app.session.clone();
            match app
                .weather
                .favorite
                .as_mut()
                .and_then(|button| button.click(&session))
            {
                Some(location) => {
                    info!("Adding '{}' to favorites", location.label());
                    Effect::AddFavorite(location)
                }
                None => Effect::None,
            }
        }

        Action::FavoriteSaved { location, result } => {
            match result {
                Ok(()) => {
                    app.status_message = format!("{} saved to favorites", location.name);
                }
                Err(e) => {
                    warn!("Saving favorite '{}' failed: {}", location.name, e);
                    app.status_message = format!("Could not save {}: {}", location.name, e);
                }
            }
            Effect::None
        }

        Action::FavoritesLoaded(result) => {
            if let Err(e) = &result {
                warn!("Loading favorites failed: {}", e);
            }
            // Ignore a late answer after logout or leaving the screen.
            if app.favorites.locations.is_loading() {
                app.favorites.apply(result);
            } else {
                debug!("Dropping favorites response, list is no longer loading");
            }
            Effect::None
        }

        Action::Logout => {
            if let Err(e) = app.session.clear() {
                warn!("Session could not be cleared on disk: {}", e);
            }
            app.username = None;
            app.favorites.reset();
            app.login.reset();
            app.status_message = String::from("Logged out");
            navigate(app, Route::Home)
        }

        Action::Quit => Effect::Quit,
    }
}

/// Switch screens and run the new screen's on-mount behavior.
fn navigate(app: &mut App, route: Route) -> Effect {
    debug!("Navigating {} -> {}", app.route, route);
    app.route = route.clone();
    match route {
        Route::Favorites => {
            if app.favorites.mount(&app.session) {
                Effect::LoadFavorites
            } else {
                Effect::None
            }
        }
        Route::Weather(city) => {
            // Reuse coordinates when re-entering the city already on screen.
            let known = if app.weather.city == city {
                app.weather.known_location().cloned()
            } else {
                None
            };
            app.weather.open(&city, known.clone());
            Effect::LoadWeather {
                city,
                location: known,
            }
        }
        Route::Login => {
            if !app.login.is_submitting() {
                app.login.reset();
            }
            Effect::None
        }
        Route::Register => {
            if !app.register.is_submitting() {
                app.register.reset();
            }
            Effect::None
        }
        Route::Home => Effect::None,
    }
}
