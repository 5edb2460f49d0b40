//! # Weather Detail Component
//!
//! The `/weather/:city` screen: current conditions for one city plus the
//! favorite button. Stateless; everything is a prop.

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Widget};

use crate::api::WeatherReport;
use crate::core::favorites::FavoriteButton;
use crate::core::state::LoadState;
use crate::core::weather::WeatherView;
use crate::tui::component::Component;

pub struct WeatherDetail<'a> {
    pub view: &'a WeatherView,
    /// Whether the session holds a token; the button is hidden otherwise.
    pub logged_in: bool,
    pub spinner: char,
}

impl<'a> WeatherDetail<'a> {
    pub fn new(view: &'a WeatherView, logged_in: bool, spinner: char) -> Self {
        Self {
            view,
            logged_in,
            spinner,
        }
    }

    fn report_lines(report: &WeatherReport) -> Vec<Line<'static>> {
        let label = Style::default().fg(Color::DarkGray);
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{:.1}°C", report.temperature),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(report.description.clone()),
            Line::from(""),
        ];
        if let Some(feels_like) = report.feels_like {
            lines.push(Line::from(vec![
                Span::styled("Feels like  ", label),
                Span::raw(format!("{feels_like:.1}°C")),
            ]));
        }
        if let Some(humidity) = report.humidity {
            lines.push(Line::from(vec![
                Span::styled("Humidity    ", label),
                Span::raw(format!("{humidity}%")),
            ]));
        }
        if let Some(wind) = report.wind_speed {
            lines.push(Line::from(vec![
                Span::styled("Wind        ", label),
                Span::raw(format!("{wind:.1} m/s")),
            ]));
        }
        if let Some(location) = &report.location {
            lines.push(Line::from(vec![
                Span::styled("Location    ", label),
                Span::raw(format!(
                    "{} ({:.2}, {:.2})",
                    location.label(),
                    location.latitude,
                    location.longitude
                )),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("Updated {}", format_time(report.fetched_at)),
            label,
        )));
        lines
    }

    fn render_button(&self, frame: &mut Frame, area: Rect) {
        let Some(button) = self.view.favorite.as_ref() else {
            return;
        };
        if !self.logged_in {
            return;
        }
        frame.render_widget(FavoriteButtonView(button), area);
    }
}

fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Renders a `FavoriteButton` label with its key hint.
struct FavoriteButtonView<'a>(&'a FavoriteButton);

impl Widget for FavoriteButtonView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = if self.0.is_favorited {
            Color::Yellow
        } else {
            Color::White
        };
        Line::from(vec![
            Span::styled(
                format!("[ {} ]", self.0.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  f", Style::default().fg(Color::DarkGray)),
        ])
        .centered()
        .render(area, buf);
    }
}

impl Component for WeatherDetail<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.view.city.is_empty() {
            " Weather ".to_string()
        } else {
            format!(" Weather in {} ", self.view.city)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title)
            .title_bottom(Line::from(" f Favorite  Esc Home ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [body_area, button_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);

        let body = match &self.view.report {
            LoadState::Idle => Paragraph::new(""),
            LoadState::Loading => Paragraph::new(format!("{} Loading weather...", self.spinner))
                .style(Style::default().fg(Color::Yellow)),
            LoadState::Failed(error) => Paragraph::new(format!("Could not load weather: {error}"))
                .style(Style::default().fg(Color::Red)),
            LoadState::Loaded(report) => Paragraph::new(Self::report_lines(report)),
        };
        frame.render_widget(body.alignment(Alignment::Center), body_area);

        self.render_button(frame, button_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FetchError, Location};
    use crate::core::session::SessionStore;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(view: &WeatherView, logged_in: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 16)).unwrap();
        terminal
            .draw(|f| WeatherDetail::new(view, logged_in, '|').render(f, f.area()))
            .unwrap();
        buffer_text(&terminal)
    }

    fn berlin() -> Location {
        Location::new("Berlin", "DE", 52.52, 13.41)
    }

    fn loaded_view() -> WeatherView {
        let mut view = WeatherView::default();
        view.open("Berlin", Some(berlin()));
        view.apply(
            "Berlin",
            Ok(WeatherReport {
                city: "Berlin".into(),
                location: Some(berlin()),
                temperature: 21.04,
                feels_like: Some(20.0),
                humidity: Some(55),
                wind_speed: Some(4.2),
                description: "light rain".into(),
                fetched_at: Utc::now(),
            }),
        );
        view
    }

    #[test]
    fn test_report_is_rendered() {
        let text = draw(&loaded_view(), false);
        assert!(text.contains("Weather in Berlin"));
        assert!(text.contains("21.0°C"));
        assert!(text.contains("light rain"));
        assert!(text.contains("55%"));
        assert!(text.contains("4.2 m/s"));
        assert!(text.contains("Berlin, DE"));
    }

    #[test]
    fn test_button_only_when_logged_in() {
        let view = loaded_view();
        assert!(!draw(&view, false).contains("Add to favorites"));
        assert!(draw(&view, true).contains("[ ☆ Add to favorites ]"));
    }

    #[test]
    fn test_button_label_after_click() {
        let session = SessionStore::in_memory();
        session.set_token("fake-token").unwrap();
        let mut view = loaded_view();
        if let Some(button) = view.favorite.as_mut() {
            button.click(&session);
        }
        assert!(draw(&view, true).contains("Saved to favorites"));
    }

    #[test]
    fn test_loading_and_error_states() {
        let mut view = WeatherView::default();
        view.open("Atlantis", None);
        assert!(draw(&view, true).contains("Loading weather..."));

        view.apply(
            "Atlantis",
            Err(FetchError::Http {
                status: 404,
                message: "City not found".into(),
            }),
        );
        let text = draw(&view, true);
        assert!(text.contains("HTTP 404: City not found"));
        assert!(!text.contains("Add to favorites"));
    }
}
