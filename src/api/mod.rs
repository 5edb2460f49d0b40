pub mod client;
pub mod gateway;
pub mod types;

pub use client::{ApiClient, WeatherApi};
pub use gateway::{FetchError, Gateway};
pub use types::{Credentials, Location, LoginResponse, RegisterResponse, WeatherReport};
