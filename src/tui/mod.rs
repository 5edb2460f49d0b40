//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Routing
//!
//! Global keys (F1-F4, Ctrl+S, Ctrl+O, Ctrl+C) are handled here. Everything
//! else goes to the component of the current route, whose high-level event
//! is turned into an `Action`.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Busy** (a search, login or load outstanding): draws every ~80ms so the
//!   spinner moves.
//! - **Idle**: sleeps up to 250ms, only redraws on events, resize, or
//!   actions coming back from background tasks.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, EnableBracketedPaste, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::api::{ApiClient, Gateway, WeatherApi};
use crate::core::action::Action;
use crate::core::config::ResolvedConfig;
use crate::core::route::Route;
use crate::core::session::SessionStore;
use crate::core::state::App;
use crate::runtime::{Runtime, dispatch};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    AuthFormEvent, AuthFormState, FavoritesListEvent, FavoritesListState, SearchPanelEvent,
    SearchPanelState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub search_panel: SearchPanelState,
    pub login_form: AuthFormState,
    pub register_form: AuthFormState,
    pub favorites_list: FavoritesListState,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            search_panel: SearchPanelState::new(),
            login_form: AuthFormState::new(),
            register_form: AuthFormState::new(),
            favorites_list: FavoritesListState::new(),
        }
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol is ignored by terminals that don't support it.
        execute!(
            stdout(),
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (bracketed paste, steady cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Build the backend client for a resolved config. All requests share the
/// given session.
pub fn build_api(config: &ResolvedConfig, session: Arc<SessionStore>) -> Arc<dyn WeatherApi> {
    info!("Backend base URL: {}", config.base_url);
    Arc::new(ApiClient::new(Gateway::new(config.base_url.clone(), session)))
}

pub fn run(config: ResolvedConfig, session: Arc<SessionStore>) -> std::io::Result<()> {
    let api = build_api(&config, session.clone());
    let mut app = App::from_config(api.clone(), session, &config);
    let mut tui = TuiState::new();

    // Channel for actions from background tasks
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    let mut runtime = Runtime::new(api, tx);

    if config.start_route != Route::Home {
        dispatch(&mut app, &mut runtime, Action::Navigate(config.start_route.clone()));
    }

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        let animating = app.is_busy();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut app, &mut tui, &mut runtime, event) {
                break 'main;
            }
        }

        // Handle actions reported back by background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            if apply_background(&mut app, &mut tui, &mut runtime, action) {
                break 'main;
            }
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}

/// Dispatch an action that came back from a background task and sync the
/// presentation state it affects. Returns true when the app should quit.
fn apply_background(
    app: &mut App,
    tui: &mut TuiState,
    runtime: &mut Runtime,
    action: Action,
) -> bool {
    debug!("Event loop received: {:?}", action);
    let logged_in = matches!(action, Action::LoginCompleted(Ok(_)));
    let registered = matches!(action, Action::RegisterCompleted(Ok(_)));
    let quit = dispatch(app, runtime, action);
    if logged_in {
        tui.login_form.clear_password();
    }
    if registered {
        tui.register_form.clear_password();
    }
    quit
}

/// Route one terminal event. Returns true when the app should quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    runtime: &mut Runtime,
    event: TuiEvent,
) -> bool {
    match event {
        TuiEvent::Resize => false,
        TuiEvent::ForceQuit => dispatch(app, runtime, Action::Quit),
        TuiEvent::Goto(route) => {
            if route == Route::Favorites {
                tui.favorites_list.reset();
            }
            dispatch(app, runtime, Action::Navigate(route))
        }
        TuiEvent::ToggleSearch => {
            if app.route != Route::Home {
                dispatch(app, runtime, Action::Navigate(Route::Home));
                if app.home.show_search {
                    return false;
                }
            }
            toggle_search(app, tui, runtime)
        }
        TuiEvent::Logout => {
            if !app.is_logged_in() {
                return false;
            }
            tui.login_form.clear_password();
            dispatch(app, runtime, Action::Logout)
        }
        TuiEvent::Escape => match app.route {
            Route::Home if app.home.show_search => toggle_search(app, tui, runtime),
            Route::Home => dispatch(app, runtime, Action::Quit),
            _ => dispatch(app, runtime, Action::Navigate(Route::Home)),
        },
        event => route_to_component(app, tui, runtime, &event),
    }
}

fn toggle_search(app: &mut App, tui: &mut TuiState, runtime: &mut Runtime) -> bool {
    let quit = dispatch(app, runtime, Action::ToggleSearch);
    if !app.home.show_search {
        tui.search_panel.reset();
    }
    quit
}

fn route_to_component(
    app: &mut App,
    tui: &mut TuiState,
    runtime: &mut Runtime,
    event: &TuiEvent,
) -> bool {
    let action = match app.route.clone() {
        Route::Home => {
            if !app.home.show_search {
                // Enter on the prompt opens the search box.
                if matches!(event, TuiEvent::Submit) {
                    return toggle_search(app, tui, runtime);
                }
                return false;
            }
            let results = &app.home.search.state().results;
            match tui.search_panel.handle_event(event, results.len()) {
                Some(SearchPanelEvent::Input(text)) => Some(Action::SearchInput(text)),
                Some(SearchPanelEvent::Open(index)) => {
                    results.get(index).cloned().map(Action::OpenWeather)
                }
                None => None,
            }
        }
        Route::Login => match tui.login_form.handle_event(event) {
            Some(AuthFormEvent::Submit { username, password }) => {
                Some(Action::SubmitLogin { username, password })
            }
            None => None,
        },
        Route::Register => match tui.register_form.handle_event(event) {
            Some(AuthFormEvent::Submit { username, password }) => {
                Some(Action::SubmitRegister { username, password })
            }
            None => None,
        },
        Route::Favorites => {
            let locations = app.favorites.loaded();
            match tui.favorites_list.handle_event(event, locations.len()) {
                Some(FavoritesListEvent::Open(index)) => {
                    locations.get(index).cloned().map(Action::OpenWeather)
                }
                None => None,
            }
        }
        Route::Weather(_) => match event {
            TuiEvent::InputChar('f') | TuiEvent::Submit => Some(Action::FavoriteClicked),
            _ => None,
        },
    };

    match action {
        Some(action) => dispatch(app, runtime, action),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Location, LoginResponse};
    use crate::core::auth::FormPhase;
    use crate::core::state::LoadState;
    use crate::test_support::{drain, logged_in_app, test_app};
    use tokio::sync::mpsc::UnboundedReceiver;

    fn runtime_for(app: &App) -> (Runtime, UnboundedReceiver<Action>) {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        (Runtime::new(app.api.clone(), tx), rx)
    }

    fn type_str(app: &mut App, tui: &mut TuiState, runtime: &mut Runtime, text: &str) {
        for c in text.chars() {
            handle_event(app, tui, runtime, TuiEvent::InputChar(c));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_in_search_box_searches_once() {
        let (mut app, api) = test_app();
        api.set_search_results("Ber", vec![Location::new("Berlin", "DE", 52.0, 13.0)]);
        let (mut runtime, mut rx) = runtime_for(&app);
        let mut tui = TuiState::new();

        // Typing before the box is open does nothing.
        type_str(&mut app, &mut tui, &mut runtime, "x");
        assert_eq!(tui.search_panel.input.value(), "");

        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::ToggleSearch);
        type_str(&mut app, &mut tui, &mut runtime, "Ber");
        drain(&mut app, &mut runtime, &mut rx).await;

        assert_eq!(api.search_calls(), vec!["Ber".to_string()]);

        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Submit);
        assert_eq!(app.route, Route::Weather("Berlin".into()));
    }

    #[tokio::test]
    async fn test_closing_search_resets_the_field() {
        let (mut app, _api) = test_app();
        let (mut runtime, _rx) = runtime_for(&app);
        let mut tui = TuiState::new();

        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Submit);
        assert!(app.home.show_search);
        type_str(&mut app, &mut tui, &mut runtime, "Ber");

        assert!(!handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Escape));
        assert!(!app.home.show_search);
        assert_eq!(tui.search_panel.input.value(), "");
        assert_eq!(app.home.search.state().query, "");
    }

    #[tokio::test]
    async fn test_toggle_search_from_other_route_goes_home() {
        let (mut app, _api) = test_app();
        let (mut runtime, _rx) = runtime_for(&app);
        let mut tui = TuiState::new();

        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Goto(Route::Login));
        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::ToggleSearch);
        assert_eq!(app.route, Route::Home);
        assert!(app.home.show_search);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_form_flow() {
        let (mut app, api) = test_app();
        api.set_login_response(Ok(LoginResponse {
            username: "TestUser".into(),
            token: Some("jwt-abc".into()),
        }));
        let (mut runtime, mut rx) = runtime_for(&app);
        let mut tui = TuiState::new();

        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Goto(Route::Login));
        type_str(&mut app, &mut tui, &mut runtime, "TestUser");
        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::NextField);
        type_str(&mut app, &mut tui, &mut runtime, "password123");
        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Submit);
        assert_eq!(app.login.phase, FormPhase::Submitting);

        while let Ok(Some(action)) =
            tokio::time::timeout(Duration::from_secs(5), rx.recv()).await
        {
            apply_background(&mut app, &mut tui, &mut runtime, action);
        }

        assert_eq!(app.session.token().as_deref(), Some("jwt-abc"));
        assert_eq!(app.route, Route::Home);
        assert_eq!(tui.login_form.password.value(), "");
        assert_eq!(tui.login_form.username.value(), "TestUser");
    }

    #[tokio::test(start_paused = true)]
    async fn test_favorites_open_weather() {
        let (mut app, api) = logged_in_app();
        api.set_favorites(vec![
            Location::new("München", "DE", 48.1, 11.6),
            Location::new("Hamburg", "DE", 53.6, 10.0),
        ]);
        let (mut runtime, mut rx) = runtime_for(&app);
        let mut tui = TuiState::new();

        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Goto(Route::Favorites));
        drain(&mut app, &mut runtime, &mut rx).await;
        assert!(matches!(app.favorites.locations, LoadState::Loaded(ref l) if l.len() == 2));

        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::CursorDown);
        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::CursorDown);
        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Submit);
        assert_eq!(app.route, Route::Weather("Hamburg".into()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_f_key_saves_favorite() {
        let (mut app, api) = logged_in_app();
        let (mut runtime, mut rx) = runtime_for(&app);
        let mut tui = TuiState::new();

        dispatch(
            &mut app,
            &mut runtime,
            Action::OpenWeather(Location::new("Berlin", "DE", 52.0, 13.0)),
        );
        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::InputChar('f'));
        drain(&mut app, &mut runtime, &mut rx).await;

        assert_eq!(api.added_favorites().len(), 1);
        assert_eq!(app.status_message, "Berlin saved to favorites");
    }

    #[tokio::test]
    async fn test_logout_only_when_logged_in() {
        let (mut app, _api) = logged_in_app();
        let (mut runtime, _rx) = runtime_for(&app);
        let mut tui = TuiState::new();

        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Logout);
        assert!(!app.is_logged_in());
        assert_eq!(app.status_message, "Logged out");

        app.status_message.clear();
        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Logout);
        assert_eq!(app.status_message, "");
    }

    #[tokio::test]
    async fn test_escape_goes_home_then_quits() {
        let (mut app, _api) = test_app();
        let (mut runtime, _rx) = runtime_for(&app);
        let mut tui = TuiState::new();

        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Goto(Route::Register));
        assert!(!handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Escape));
        assert_eq!(app.route, Route::Home);
        assert!(handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Escape));
    }

    #[tokio::test]
    async fn test_ctrl_c_quits_from_anywhere() {
        let (mut app, _api) = test_app();
        let (mut runtime, _rx) = runtime_for(&app);
        let mut tui = TuiState::new();

        handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::Goto(Route::Login));
        assert!(handle_event(&mut app, &mut tui, &mut runtime, TuiEvent::ForceQuit));
    }
}
