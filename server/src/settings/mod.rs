//! Settings subsystem with registry, caching, and an admin HTTP API
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): Value variants, definitions, registry
//! - **Service** (`service.rs`): SettingsService with caching and validation
//! - **Handler** (`handler.rs`): HTTP API endpoints
//!
//! The settings record is flat: each key maps to one scalar value. Values
//! resolve stored-value-first, then compiled-in default, so the gate always
//! has a complete record to work with even on a fresh install.

pub mod handler;
pub mod service;
pub mod types;

pub use service::SettingsService;
pub use types::{
	FrozenSettingsRegistry, Setting, SettingDefinition, SettingDefinitionBuilder, SettingValue,
	SettingsRegistry,
};

// vim: ts=4
