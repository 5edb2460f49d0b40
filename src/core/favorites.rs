//! # Favorites
//!
//! The favorite button and the favorite locations list. Both are gated on
//! the session: without a token there is nothing to click and nothing to
//! load.

use crate::api::{FetchError, Location};
use crate::core::session::SessionStore;
use crate::core::state::LoadState;

/// Toggle bound to one location.
///
/// The label flips as soon as the request is sent; the backend's answer is
/// not awaited. Clicking again sends another POST.
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteButton {
    pub location: Location,
    pub is_favorited: bool,
}

impl FavoriteButton {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            is_favorited: false,
        }
    }

    pub fn is_visible(session: &SessionStore) -> bool {
        session.has_token()
    }

    /// Returns the location to POST, or `None` when logged out.
    pub fn click(&mut self, session: &SessionStore) -> Option<Location> {
        if !Self::is_visible(session) {
            return None;
        }
        self.is_favorited = true;
        Some(self.location.clone())
    }

    pub fn label(&self) -> &'static str {
        if self.is_favorited {
            "★ Saved to favorites"
        } else {
            "☆ Add to favorites"
        }
    }
}

#[derive(Debug, Default)]
pub struct FavoritesList {
    pub locations: LoadState<Vec<Location>>,
}

impl FavoritesList {
    /// Route entry. Returns true when a fetch should be issued.
    pub fn mount(&mut self, session: &SessionStore) -> bool {
        if !session.has_token() {
            self.locations = LoadState::Idle;
            return false;
        }
        self.locations = LoadState::Loading;
        true
    }

    pub fn apply(&mut self, result: Result<Vec<Location>, FetchError>) {
        self.locations = match result {
            Ok(locations) => LoadState::Loaded(locations),
            Err(e) => LoadState::Failed(e.to_string()),
        };
    }

    pub fn reset(&mut self) {
        self.locations = LoadState::Idle;
    }

    pub fn loaded(&self) -> &[Location] {
        match &self.locations {
            LoadState::Loaded(locations) => locations,
            _ => &[],
        }
    }
}
