//! Settings storage adapter interface.
//!
//! Lockgate does not talk to a database directly. All persistence goes
//! through this trait so deployments can pick their own backend (the
//! `lockgate-settings-adapter-sqlite` crate ships the default one).

use async_trait::async_trait;
use std::{collections::HashMap, fmt::Debug};

use crate::prelude::*;

#[async_trait]
pub trait SettingsAdapter: Send + Sync + Debug {
	/// Read a single stored setting value, `None` if not stored.
	async fn read_setting(&self, name: &str) -> LgResult<Option<serde_json::Value>>;

	/// Store a setting value. `None` deletes the stored value, reverting the
	/// setting to its compiled-in default.
	async fn update_setting(&self, name: &str, value: Option<serde_json::Value>) -> LgResult<()>;

	/// List stored settings, optionally restricted to a key prefix.
	async fn list_settings(&self, prefix: Option<&str>) -> LgResult<HashMap<String, serde_json::Value>>;

	/// Read an instance-global bookkeeping value (schema version etc.).
	async fn read_global(&self, key: &str) -> LgResult<Option<String>>;

	/// Store an instance-global bookkeeping value.
	async fn update_global(&self, key: &str, value: &str) -> LgResult<()>;
}

// vim: ts=4
