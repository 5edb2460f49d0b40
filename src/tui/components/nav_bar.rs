//! # NavBar Component
//!
//! Top bar showing where the user is and what the app is doing.
//!
//! ## Props
//!
//! Everything comes from the parent:
//! - `route_title`: Title of the current route (core `Route::title`)
//! - `username`: Who logged in this run, if anyone
//! - `logged_in`: Whether the session holds a token
//! - `status_message`: Last status from the core (`App::status_message`)
//! - `spinner`: Current spinner frame, or `None` when idle
//!
//! ## Formatting
//!
//! `"Skycast | Home | user: alice | Logged in as alice"`. The user segment
//! falls back to `"logged in"` when a token came from disk and no name is
//! known, and is omitted when logged out. The status segment is dropped
//! when empty.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct NavBar {
    pub route_title: String,
    pub username: Option<String>,
    pub logged_in: bool,
    pub status_message: String,
    pub spinner: Option<char>,
}

impl NavBar {
    pub fn new(
        route_title: impl Into<String>,
        username: Option<String>,
        logged_in: bool,
        status_message: impl Into<String>,
        spinner: Option<char>,
    ) -> Self {
        Self {
            route_title: route_title.into(),
            username,
            logged_in,
            status_message: status_message.into(),
            spinner,
        }
    }

    fn user_segment(&self) -> Option<String> {
        if !self.logged_in {
            return None;
        }
        Some(match &self.username {
            Some(name) => format!("user: {name}"),
            None => "logged in".to_string(),
        })
    }
}

impl Component for NavBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = vec![
            Span::styled(
                "Skycast",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            separator.clone(),
            Span::styled(self.route_title.clone(), Style::default().fg(Color::White)),
        ];

        if let Some(user) = self.user_segment() {
            spans.push(separator.clone());
            spans.push(Span::styled(user, Style::default().fg(Color::Green)));
        }

        if !self.status_message.is_empty() {
            spans.push(separator);
            if let Some(frame_char) = self.spinner {
                spans.push(Span::styled(
                    format!("{frame_char} "),
                    Style::default().fg(Color::Yellow),
                ));
            }
            spans.push(Span::raw(self.status_message.clone()));
        } else if let Some(frame_char) = self.spinner {
            spans.push(separator);
            spans.push(Span::styled(
                frame_char.to_string(),
                Style::default().fg(Color::Yellow),
            ));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
