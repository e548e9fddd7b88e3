//! Pokédex card browser: loads the PokeAPI listing, resolves details in
//! batches and renders them as a card grid with search and a detail overlay.
//!
//! The library exposes every module so integration tests can drive the
//! reducer and the renderer directly.

pub mod action;
pub mod api;
pub mod config;
pub mod controller;
pub mod effect;
pub mod error;
pub mod loader;
pub mod logging;
pub mod reducer;
pub mod state;
pub mod ui;
pub mod view;
