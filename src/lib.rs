//! Tarjome - Persian translation of movie, TV and person metadata
//!
//! Fetches records from TMDB and renders them in Persian through a
//! chat-completion model, one field at a time, with live progress.

pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod pipeline;
pub mod present;
pub mod retrieval;
pub mod session;
pub mod translate;

#[cfg(test)]
mod testing;
