//! Library crate for survivor-league-back, exposing modules for binaries and integration tests.

mod config;
/// Gateway access.
pub mod dao;
mod dto;
mod error;
/// HTTP routers.
pub mod routes;
/// Business logic behind the routes.
pub mod services;
/// Shared application state and the league snapshot.
pub mod state;
