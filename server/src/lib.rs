//! Lockgate turns a standard CMS installation into a headless backend.
//!
//! It sits in front of the CMS as a small HTTP gateway and decides, once per
//! inbound request, whether to:
//!
//! - pass the request through to the upstream CMS (admin UI, API endpoints,
//!   background jobs, explicitly allow-listed paths),
//! - redirect the browser to an externally hosted frontend, or
//! - emit a terminal "headless mode" 404 response (JSON or HTML).
//!
//! On top of the gate it carries a persistent settings record (redirect
//! target, 404 page texts, security hardening toggles) managed over a small
//! authenticated HTTP API, and a set of hardening middlewares for the
//! proxied traffic (endpoint blocking, security headers, version header
//! stripping).
//!
//! Storage is pluggable through the [`settings_adapter::SettingsAdapter`]
//! trait; see the `lockgate-settings-adapter-sqlite` crate for the default
//! implementation.

#![forbid(unsafe_code)]

pub mod error;
pub mod core;
pub mod gate;
pub mod proxy;
pub mod security;
pub mod settings;
pub mod settings_adapter;
pub mod prelude;
pub mod types;
pub mod routes;

pub use crate::core::app::{App, AppBuilder, AppState};

// vim: ts=4
