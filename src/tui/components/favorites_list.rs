//! # Favorites List Component
//!
//! The `/favoriteLocations` screen. Shows a login hint when there is no
//! session, a spinner while loading, and the saved names once they arrive.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `FavoritesListState` lives in `TuiState` (selection only)
//! - `FavoritesListView` is created each frame with the core list as a prop

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Padding, Paragraph};

use crate::core::favorites::FavoritesList;
use crate::core::state::LoadState;
use crate::tui::event::TuiEvent;

#[derive(Default)]
pub struct FavoritesListState {
    pub list_state: ListState,
}

/// Events emitted by the favorites list.
#[derive(Debug, Clone, PartialEq)]
pub enum FavoritesListEvent {
    /// Enter on a row: open its weather.
    Open(usize),
}

impl FavoritesListState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.list_state.select(None);
    }

    /// `count` is the number of loaded favorites.
    pub fn handle_event(&mut self, event: &TuiEvent, count: usize) -> Option<FavoritesListEvent> {
        match event {
            TuiEvent::CursorUp => {
                if count > 0 {
                    let prev = self.list_state.selected().unwrap_or(0).saturating_sub(1);
                    self.list_state.select(Some(prev));
                }
                None
            }
            TuiEvent::CursorDown => {
                if count > 0 {
                    let next = self
                        .list_state
                        .selected()
                        .map(|i| (i + 1).min(count - 1))
                        .unwrap_or(0);
                    self.list_state.select(Some(next));
                }
                None
            }
            TuiEvent::Submit if count > 0 => {
                let index = self.list_state.selected().unwrap_or(0).min(count - 1);
                Some(FavoritesListEvent::Open(index))
            }
            _ => None,
        }
    }
}

/// Transient render wrapper.
pub struct FavoritesListView<'a> {
    state: &'a mut FavoritesListState,
    favorites: &'a FavoritesList,
    logged_in: bool,
    spinner: char,
}

impl<'a> FavoritesListView<'a> {
    pub fn new(
        state: &'a mut FavoritesListState,
        favorites: &'a FavoritesList,
        logged_in: bool,
        spinner: char,
    ) -> Self {
        Self {
            state,
            favorites,
            logged_in,
            spinner,
        }
    }

    fn notice(frame: &mut Frame, area: Rect, block: Block, text: String, color: Color) {
        let paragraph = Paragraph::new(text)
            .style(Style::default().fg(color))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(paragraph, area);
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Favorite locations ")
            .title_bottom(Line::from(" ↑↓ Select  Enter Weather  F1 Home ").centered())
            .padding(Padding::horizontal(1));

        if !self.logged_in {
            Self::notice(
                frame,
                area,
                block,
                "Log in (F3) to see your favorite locations.".to_string(),
                Color::DarkGray,
            );
            return;
        }

        let locations = match &self.favorites.locations {
            LoadState::Idle => {
                Self::notice(frame, area, block, String::new(), Color::DarkGray);
                return;
            }
            LoadState::Loading => {
                Self::notice(
                    frame,
                    area,
                    block,
                    format!("{} Loading favorites...", self.spinner),
                    Color::Yellow,
                );
                return;
            }
            LoadState::Failed(error) => {
                Self::notice(
                    frame,
                    area,
                    block,
                    format!("Could not load favorites: {error}"),
                    Color::Red,
                );
                return;
            }
            LoadState::Loaded(locations) => locations,
        };

        if locations.is_empty() {
            Self::notice(
                frame,
                area,
                block,
                "No favorites yet.".to_string(),
                Color::DarkGray,
            );
            return;
        }

        let items: Vec<ListItem> = locations
            .iter()
            .map(|location| {
                ListItem::new(Line::from(vec![
                    Span::styled(location.name.clone(), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("  {}", location.country),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        if self.state.list_state.selected().is_none() {
            self.state.list_state.select(Some(0));
        }
        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FetchError, Location};
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(favorites: &FavoritesList, logged_in: bool) -> String {
        let mut state = FavoritesListState::new();
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal
            .draw(|f| {
                FavoritesListView::new(&mut state, favorites, logged_in, '|').render(f, f.area())
            })
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_logged_out_shows_login_hint() {
        let text = draw(&FavoritesList::default(), false);
        assert!(text.contains("Log in (F3)"));
    }

    #[test]
    fn test_loaded_names_are_rendered() {
        let mut favorites = FavoritesList::default();
        favorites.apply(Ok(vec![
            Location::new("München", "DE", 48.1, 11.6),
            Location::new("Hamburg", "DE", 53.6, 10.0),
        ]));
        let text = draw(&favorites, true);
        assert!(text.contains("München"));
        assert!(text.contains("Hamburg"));
    }

    #[test]
    fn test_loading_and_failure_states() {
        let mut favorites = FavoritesList {
            locations: LoadState::Loading,
        };
        assert!(draw(&favorites, true).contains("Loading favorites..."));

        favorites.apply(Err(FetchError::Http {
            status: 401,
            message: "Unauthorized".into(),
        }));
        assert!(draw(&favorites, true).contains("HTTP 401: Unauthorized"));
    }

    #[test]
    fn test_empty_list() {
        let mut favorites = FavoritesList::default();
        favorites.apply(Ok(vec![]));
        assert!(draw(&favorites, true).contains("No favorites yet."));
    }

    #[test]
    fn test_navigation_and_open() {
        let mut state = FavoritesListState::new();
        assert_eq!(state.handle_event(&TuiEvent::Submit, 0), None);
        state.handle_event(&TuiEvent::CursorDown, 2);
        state.handle_event(&TuiEvent::CursorDown, 2);
        state.handle_event(&TuiEvent::CursorDown, 2);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, 2),
            Some(FavoritesListEvent::Open(1))
        );
        state.handle_event(&TuiEvent::CursorUp, 2);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, 2),
            Some(FavoritesListEvent::Open(0))
        );
    }
}
