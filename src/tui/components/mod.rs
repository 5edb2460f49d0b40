//! # TUI Components
//!
//! This module contains all UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components in this directory follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as props:
//! - `NavBar`: Top bar with route, user and status
//! - `WeatherDetail`: Current conditions plus the favorite button
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components whose persistent state lives in `TuiState` and that emit
//! high-level events back to the event loop:
//! - `TextField`: Single-line input, building block for the others
//! - `SearchPanel`: Home screen search box and result list
//! - `AuthForm`: Username/password form for login and register
//! - `FavoritesList`: Saved locations with selection
//!
//! Core state (search results, form phase, loaded favorites) is never owned
//! by a component. It is passed in as a prop each frame; components only keep
//! what is purely presentational (field buffers, list selection).
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── nav_bar.rs         (Top bar)
//! ├── text_field.rs      (Single-line input)
//! ├── search_panel.rs    (Home / search)
//! ├── auth_form.rs       (Login / register)
//! ├── favorites_list.rs  (Favorite locations)
//! └── weather_detail.rs  (Weather for one city)
//! ```

pub mod auth_form;
pub mod favorites_list;
mod nav_bar;
pub mod search_panel;
pub mod text_field;
mod weather_detail;

pub use auth_form::{AuthFormEvent, AuthFormState, AuthFormView};
pub use favorites_list::{FavoritesListEvent, FavoritesListState, FavoritesListView};
pub use nav_bar::NavBar;
pub use search_panel::{SearchPanel, SearchPanelEvent, SearchPanelState};
pub use weather_detail::WeatherDetail;
