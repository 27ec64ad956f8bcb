//! Core subsystem. This handles the infrastructure around the gate: app
//! state, the HTTP server, and admin API authentication.

pub mod app;
pub mod route_auth;
pub mod utils;
pub mod webserver;

pub use crate::core::app::{App, AppBuilder, AppState};

// vim: ts=4
