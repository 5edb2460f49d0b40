//! # Search Panel Component
//!
//! The home screen: a "Search city" prompt that, once opened, becomes a
//! text field with a result list underneath.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SearchPanelState` lives in `TuiState` (field buffer, list selection)
//! - `SearchPanel` is created each frame with borrowed state and props

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::core::search::SearchState;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::{FieldEvent, TextField};
use crate::tui::event::TuiEvent;

pub struct SearchPanelState {
    pub input: TextField,
    pub list_state: ListState,
}

/// Events emitted by the search panel.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPanelEvent {
    /// Text changed; forward to the debounced search.
    Input(String),
    /// Enter on a result row.
    Open(usize),
}

impl SearchPanelState {
    pub fn new() -> Self {
        Self {
            input: TextField::new("Search city"),
            list_state: ListState::default(),
        }
    }

    pub fn reset(&mut self) {
        self.input.clear();
        self.list_state.select(None);
    }

    /// Handle a key event. `result_count` is a prop from the search state.
    pub fn handle_event(&mut self, event: &TuiEvent, result_count: usize) -> Option<SearchPanelEvent> {
        match event {
            TuiEvent::CursorDown => {
                if result_count > 0 {
                    let next = self
                        .list_state
                        .selected()
                        .map(|i| (i + 1).min(result_count - 1))
                        .unwrap_or(0);
                    self.list_state.select(Some(next));
                }
                None
            }
            TuiEvent::CursorUp => {
                if let Some(i) = self.list_state.selected() {
                    self.list_state.select(if i == 0 { None } else { Some(i - 1) });
                }
                None
            }
            TuiEvent::Submit => {
                let index = match self.list_state.selected() {
                    Some(i) if i < result_count => i,
                    _ if result_count > 0 => 0,
                    _ => return None,
                };
                Some(SearchPanelEvent::Open(index))
            }
            _ => match self.input.handle_event(event)? {
                FieldEvent::Changed => {
                    self.list_state.select(None);
                    Some(SearchPanelEvent::Input(self.input.value().to_string()))
                }
                FieldEvent::Submit => None,
            },
        }
    }
}

impl Default for SearchPanelState {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient render wrapper for the home screen.
pub struct SearchPanel<'a> {
    state: &'a mut SearchPanelState,
    search: &'a SearchState,
    show_search: bool,
    spinner: char,
}

impl<'a> SearchPanel<'a> {
    pub fn new(
        state: &'a mut SearchPanelState,
        search: &'a SearchState,
        show_search: bool,
        spinner: char,
    ) -> Self {
        Self {
            state,
            search,
            show_search,
            spinner,
        }
    }

    fn render_prompt(&self, frame: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled(
                "Skycast",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[ Search city ]",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ctrl+S to open the search",
                Style::default().fg(Color::DarkGray),
            )),
        ];
        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(lines.len() as u16),
            Constraint::Fill(1),
        ])
        .areas(area);
        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), middle);
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray));

        if let Some(error) = &self.search.error {
            let paragraph = Paragraph::new(format!("Search failed: {error}"))
                .style(Style::default().fg(Color::Red))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        if self.search.results.is_empty() {
            let hint = if self.search.pending {
                format!("{} Searching...", self.spinner)
            } else if self.search.query.trim().is_empty() {
                "Type a city name".to_string()
            } else {
                "No places found".to_string()
            };
            let paragraph = Paragraph::new(hint)
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let items: Vec<ListItem> = self
            .search
            .results
            .iter()
            .map(|location| {
                ListItem::new(Line::from(vec![
                    Span::styled(location.name.clone(), Style::default().fg(Color::White)),
                    Span::styled(
                        format!("  {}", location.country),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("  ({:.2}, {:.2})", location.latitude, location.longitude),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]))
            })
            .collect();

        let title = if self.search.pending {
            format!(" {} updating ", self.spinner)
        } else {
            format!(" {} results ", self.search.results.len())
        };
        let list = List::new(items)
            .block(block.title(title))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }
}

impl Component for SearchPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.show_search {
            self.render_prompt(frame, area);
            return;
        }

        let [input_area, results_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

        self.state.input.focused = true;
        self.state.input.render(frame, input_area);
        self.render_results(frame, results_area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Location;
    use crate::test_support::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(state: &mut SearchPanelState, search: &SearchState, show: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal
            .draw(|f| SearchPanel::new(state, search, show, '|').render(f, f.area()))
            .unwrap();
        buffer_text(&terminal)
    }

    #[test]
    fn test_search_box_hidden_until_opened() {
        let mut state = SearchPanelState::new();
        let search = SearchState::default();

        let closed = draw(&mut state, &search, false);
        assert!(closed.contains("[ Search city ]"));
        assert!(!closed.contains("Type a city name"));

        let open = draw(&mut state, &search, true);
        assert!(open.contains("Search city"));
        assert!(open.contains("Type a city name"));
    }

    #[test]
    fn test_results_are_rendered() {
        let mut state = SearchPanelState::new();
        let search = SearchState {
            query: "Ber".into(),
            results: vec![Location::new("Berlin", "DE", 52.0, 13.0)],
            pending: false,
            error: None,
        };
        let text = draw(&mut state, &search, true);
        assert!(text.contains("Berlin"));
        assert!(text.contains("DE"));
        assert!(text.contains("1 results"));
    }

    #[test]
    fn test_error_is_rendered_inline() {
        let mut state = SearchPanelState::new();
        let search = SearchState {
            query: "Ber".into(),
            error: Some("HTTP 500: boom".into()),
            ..Default::default()
        };
        assert!(draw(&mut state, &search, true).contains("Search failed: HTTP 500: boom"));
    }

    #[test]
    fn test_typing_emits_input_events() {
        let mut state = SearchPanelState::new();
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('B'), 0),
            Some(SearchPanelEvent::Input("B".into()))
        );
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('e'), 0),
            Some(SearchPanelEvent::Input("Be".into()))
        );
    }

    #[test]
    fn test_enter_opens_selected_or_first_result() {
        let mut state = SearchPanelState::new();
        assert_eq!(state.handle_event(&TuiEvent::Submit, 0), None);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, 3),
            Some(SearchPanelEvent::Open(0))
        );
        state.handle_event(&TuiEvent::CursorDown, 3);
        state.handle_event(&TuiEvent::CursorDown, 3);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, 3),
            Some(SearchPanelEvent::Open(1))
        );
    }
}
