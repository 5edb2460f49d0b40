//! # Routes
//!
//! The navigable screens and their path form.
//!
//! ```text
//! /                    → redirect to /home
//! /home                → Home (search)
//! /weather/:city       → WeatherDetail
//! /login               → Login
//! /register            → Register
//! /favoriteLocations   → Favorites   (alias: /favorite-locations)
//! ```
//!
//! Anything else falls back to Home.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    Home,
    Weather(String),
    Login,
    Register,
    Favorites,
}

impl Route {
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim().trim_end_matches('/');
        let segments: Vec<&str> = trimmed
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        match segments.as_slice() {
            [] | ["home"] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["favoriteLocations"] | ["favorite-locations"] => Route::Favorites,
            ["weather", city] => {
                let city = percent_decode(city);
                if city.trim().is_empty() {
                    Route::Home
                } else {
                    Route::Weather(city)
                }
            }
            _ => {
                log::debug!("Unknown route '{}', falling back to home", path);
                Route::Home
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/home".to_string(),
            Route::Weather(city) => format!("/weather/{}", percent_encode(city)),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Favorites => "/favoriteLocations".to_string(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Route::Home => "Home",
            Route::Weather(_) => "Weather",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Favorites => "Favorites",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Decode `%XX` escapes. Invalid escapes are kept verbatim.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && i + 2 < bytes.len()
            && let Some(byte) = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
        {
            out.push(byte);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Encode everything outside the unreserved set.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
