//! Pokédex Library
//!
//! Caching, pagination and filtering core of the terminal Pokédex, plus the
//! ratatui front end. Exposed as a library for integration tests.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod connectivity;
pub mod data;
pub mod fetch;
pub mod filter;
pub mod logging;
pub mod pager;
pub mod ui;

#[cfg(test)]
mod test_support;
