//! # Weather Detail
//!
//! State behind `/weather/:city`. A response is only applied if it is for
//! the city currently on screen.

use log::debug;

use crate::api::{FetchError, Location, WeatherReport};
use crate::core::favorites::FavoriteButton;
use crate::core::state::LoadState;

#[derive(Debug, Default)]
pub struct WeatherView {
    pub city: String,
    pub report: LoadState<WeatherReport>,
    /// Present once the location (with coordinates) is known.
    pub favorite: Option<FavoriteButton>,
    known: Option<Location>,
}

impl WeatherView {
    /// Switch to `city` and start loading. `location` is passed when the
    /// user came from a list that already had coordinates.
    pub fn open(&mut self, city: &str, location: Option<Location>) {
        self.city = city.to_string();
        self.report = LoadState::Loading;
        self.favorite = location.clone().map(FavoriteButton::new);
        self.known = location;
    }

    pub fn known_location(&self) -> Option<&Location> {
        self.known.as_ref()
    }

    /// Returns false when the response is for a city no longer shown.
    pub fn apply(&mut self, city: &str, result: Result<WeatherReport, FetchError>) -> bool {
        if city != self.city {
            debug!("Dropping weather for '{}' (showing '{}')", city, self.city);
            return false;
        }

        match result {
            Ok(report) => {
                if self.favorite.is_none()
                    && let Some(location) = &report.location
                {
                    self.favorite = Some(FavoriteButton::new(location.clone()));
                }
                self.report = LoadState::Loaded(report);
            }
            Err(e) => {
                self.report = LoadState::Failed(e.to_string());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report(city: &str, location: Option<Location>) -> WeatherReport {
        WeatherReport {
            city: city.to_string(),
            location,
            temperature: 20.0,
            feels_like: None,
            humidity: Some(40),
            wind_speed: None,
            description: "clear sky".to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_open_with_known_location_creates_button() {
        let mut view = WeatherView::default();
        let berlin = Location::new("Berlin", "DE", 52.0, 13.0);
        view.open("Berlin", Some(berlin.clone()));
        assert_eq!(view.report, LoadState::Loading);
        assert_eq!(view.favorite.as_ref().map(|b| &b.location), Some(&berlin));
    }

    #[test]
    fn test_button_appears_once_report_has_coordinates() {
        let mut view = WeatherView::default();
        view.open("Hamburg", None);
        assert!(view.favorite.is_none());

        let hamburg = Location::new("Hamburg", "DE", 53.5, 10.0);
        assert!(view.apply("Hamburg", Ok(report("Hamburg", Some(hamburg.clone())))));
        assert_eq!(view.favorite.map(|b| b.location), Some(hamburg));
    }

    #[test]
    fn test_response_for_other_city_is_dropped() {
        let mut view = WeatherView::default();
        view.open("Berlin", None);
        view.open("Paris", None);
        assert!(!view.apply("Berlin", Ok(report("Berlin", None))));
        assert_eq!(view.report, LoadState::Loading);
    }

    #[test]
    fn test_failure_is_shown() {
        let mut view = WeatherView::default();
        view.open("Atlantis", None);
        view.apply(
            "Atlantis",
            Err(FetchError::Http {
                status: 404,
                message: "city not found".into(),
            }),
        );
        assert_eq!(
            view.report,
            LoadState::Failed("HTTP 404: city not found".to_string())
        );
    }
}
