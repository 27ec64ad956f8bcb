//! Reverse proxy towards the upstream CMS

pub mod handler;

pub use handler::forward;

// vim: ts=4
