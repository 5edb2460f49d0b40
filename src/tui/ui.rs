use crate::core::route::Route;
use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{
    AuthFormView, FavoritesListView, NavBar, SearchPanel, WeatherDetail,
};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub fn spinner_char(frame: usize) -> char {
    SPINNER[frame % SPINNER.len()]
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let [nav_area, main_area, help_area] =
        Layout::vertical([Length(1), Min(0), Length(1)]).areas(frame.area());

    let spinner = spinner_char(spinner_frame);
    let logged_in = app.is_logged_in();

    NavBar::new(
        app.route.title(),
        app.username.clone(),
        logged_in,
        app.status_message.clone(),
        app.is_busy().then_some(spinner),
    )
    .render(frame, nav_area);

    draw_route(frame, main_area, app, tui, spinner, logged_in);

    frame.render_widget(
        Span::styled(help_text(logged_in), Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

fn draw_route(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    tui: &mut TuiState,
    spinner: char,
    logged_in: bool,
) {
    match &app.route {
        Route::Home => {
            SearchPanel::new(
                &mut tui.search_panel,
                app.home.search.state(),
                app.home.show_search,
                spinner,
            )
            .render(frame, area);
        }
        Route::Login => {
            AuthFormView::new(&mut tui.login_form, &app.login, spinner).render(frame, area);
        }
        Route::Register => {
            AuthFormView::new(&mut tui.register_form, &app.register, spinner)
                .render(frame, area);
        }
        Route::Favorites => {
            FavoritesListView::new(&mut tui.favorites_list, &app.favorites, logged_in, spinner)
                .render(frame, area);
        }
        Route::Weather(_) => {
            WeatherDetail::new(&app.weather, logged_in, spinner).render(frame, area);
        }
    }
}

fn help_text(logged_in: bool) -> &'static str {
    if logged_in {
        " F1 Home  F2 Favorites  Ctrl+S Search  Ctrl+O Log out  Ctrl+C Quit"
    } else {
        " F1 Home  F2 Favorites  F3 Log in  F4 Register  Ctrl+S Search  Ctrl+C Quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::{buffer_text, logged_in_app, test_app};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App) -> String {
        let mut tui = TuiState::new();
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|f| draw_ui(f, app, &mut tui, 0)).unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_home_screen_logged_out() {
        let (app, _api) = test_app();
        let text = draw(&app);
        assert!(text.contains("Skycast | Home"));
        assert!(text.contains("[ Search city ]"));
        assert!(text.contains("F3 Log in"));
    }

    #[test]
    fn test_help_bar_offers_logout_when_logged_in() {
        let (app, _api) = logged_in_app();
        let text = draw(&app);
        assert!(text.contains("Ctrl+O Log out"));
        assert!(!text.contains("F3 Log in"));
    }

    #[test]
    fn test_each_route_renders_its_screen() {
        let (mut app, _api) = test_app();

        update(&mut app, Action::Navigate(Route::Login));
        assert!(draw(&app).contains("[ Log in ]"));

        update(&mut app, Action::Navigate(Route::Register));
        assert!(draw(&app).contains("Registration"));

        update(&mut app, Action::Navigate(Route::Favorites));
        assert!(draw(&app).contains("Log in (F3)"));

        update(&mut app, Action::Navigate(Route::Weather("Berlin".into())));
        assert!(draw(&app).contains("Weather in Berlin"));
    }

    #[test]
    fn test_spinner_cycles() {
        assert_eq!(spinner_char(0), '⠋');
        assert_eq!(spinner_char(SPINNER.len()), '⠋');
        assert_ne!(spinner_char(1), spinner_char(0));
    }
}
