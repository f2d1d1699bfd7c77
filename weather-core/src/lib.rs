//! Core library for the weather app.
//!
//! This crate defines:
//! - Configuration & API key handling
//! - The WeatherAPI source and the background fetch worker
//! - Payload decoding into weather snapshots
//! - Favourites persistence and sorting
//!
//! It is used by `weather-app`, but contains no terminal code.

pub mod config;
pub mod favourites;
pub mod model;
pub mod provider;
pub mod sort;
pub mod worker;

pub use config::Config;
pub use favourites::FavouritesStore;
pub use model::{FETCH_FAILED, Favourite, FetchOutcome, SnapshotError, WeatherSnapshot};
pub use provider::{FetchError, WeatherSource};
pub use sort::SortMode;
pub use worker::{FetchClient, FetchWorker};
