//! # Auth Form Component
//!
//! Username/password form shared by the login and register screens. The
//! form's phase (idle, submitting, success, failed) is a prop from the core
//! `AuthForm`; the field buffers are TUI state.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::auth::{AuthForm, AuthKind, FormPhase};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::{FieldEvent, TextField};
use crate::tui::event::TuiEvent;

const FORM_WIDTH: u16 = 44;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Username,
    Password,
}

pub struct AuthFormState {
    pub username: TextField,
    pub password: TextField,
    focus: Focus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthFormEvent {
    Submit { username: String, password: String },
}

impl AuthFormState {
    pub fn new() -> Self {
        Self {
            username: TextField::new("Username"),
            password: TextField::masked("Password"),
            focus: Focus::Username,
        }
    }

    pub fn clear_password(&mut self) {
        self.password.clear();
    }

    fn focused_field(&mut self) -> &mut TextField {
        match self.focus {
            Focus::Username => &mut self.username,
            Focus::Password => &mut self.password,
        }
    }
}

impl Default for AuthFormState {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for AuthFormState {
    type Event = AuthFormEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<AuthFormEvent> {
        match event {
            TuiEvent::NextField | TuiEvent::PrevField | TuiEvent::CursorDown | TuiEvent::CursorUp => {
                self.focus = match self.focus {
                    Focus::Username => Focus::Password,
                    Focus::Password => Focus::Username,
                };
                None
            }
            _ => match self.focused_field().handle_event(event)? {
                FieldEvent::Submit => {
                    // Enter on the username field moves on, like Tab.
                    if self.focus == Focus::Username && self.password.value().is_empty() {
                        self.focus = Focus::Password;
                        return None;
                    }
                    Some(AuthFormEvent::Submit {
                        username: self.username.value().to_string(),
                        password: self.password.value().to_string(),
                    })
                }
                FieldEvent::Changed => None,
            },
        }
    }
}

/// Transient render wrapper.
pub struct AuthFormView<'a> {
    state: &'a mut AuthFormState,
    form: &'a AuthForm,
    spinner: char,
}

impl<'a> AuthFormView<'a> {
    pub fn new(state: &'a mut AuthFormState, form: &'a AuthForm, spinner: char) -> Self {
        Self {
            state,
            form,
            spinner,
        }
    }
}

impl Component for AuthFormView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [column] = Layout::horizontal([Constraint::Length(FORM_WIDTH)])
            .flex(Flex::Center)
            .areas(area);
        let [heading_area, _, user_area, pass_area, button_area, message_area, hint_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(1),
            ])
            .flex(Flex::Center)
            .areas(column);

        let kind = self.form.kind;
        frame.render_widget(
            Paragraph::new(Span::styled(
                kind.heading(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            heading_area,
        );

        self.state.username.focused = self.state.focus == Focus::Username;
        self.state.password.focused = self.state.focus == Focus::Password;
        self.state.username.render(frame, user_area);
        self.state.password.render(frame, pass_area);

        let button = if self.form.is_submitting() {
            format!("{} {}...", self.spinner, kind.submit_label())
        } else {
            format!("[ {} ]", kind.submit_label())
        };
        frame.render_widget(
            Paragraph::new(Span::styled(
                button,
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center),
            button_area,
        );

        let message = match &self.form.phase {
            FormPhase::Success(msg) => Some(Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(Color::Green),
            ))),
            FormPhase::Failed(msg) => Some(Line::from(Span::styled(
                msg.clone(),
                Style::default().fg(Color::Red),
            ))),
            FormPhase::Idle | FormPhase::Submitting => None,
        };
        if let Some(line) = message {
            frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), message_area);
        }

        let hint = match kind {
            AuthKind::Login => "Tab field · Enter submit · F4 register",
            AuthKind::Register => "Tab field · Enter submit · F3 log in",
        };
        frame.render_widget(
            Paragraph::new(Span::styled(hint, Style::default().fg(Color::DarkGray)))
                .alignment(Alignment::Center),
            hint_area,
        );
    }
}
