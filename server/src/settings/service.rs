//! Settings service with caching and validation
//!
//! The service resolves values in two steps: stored value from the adapter,
//! then the compiled-in default. Storage is never written by the gate
//! itself, only through [`SettingsService::set`].

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::Arc;

use crate::prelude::*;
use crate::settings_adapter::SettingsAdapter;

use super::types::{FrozenSettingsRegistry, Setting, SettingValue};

const DEFAULT_CACHE_SIZE: usize = 100;

/// LRU cache for settings values
pub struct SettingsCache {
	cache: parking_lot::RwLock<LruCache<String, SettingValue>>,
}

impl SettingsCache {
	pub fn new(capacity: usize) -> Self {
		let non_zero = NonZeroUsize::new(capacity)
			.or(NonZeroUsize::new(DEFAULT_CACHE_SIZE))
			.unwrap_or(NonZeroUsize::MIN);
		Self { cache: parking_lot::RwLock::new(LruCache::new(non_zero)) }
	}

	pub fn get(&self, key: &str) -> Option<SettingValue> {
		let mut cache = self.cache.write();
		cache.get(key).cloned()
	}

	pub fn put(&self, key: String, value: SettingValue) {
		let mut cache = self.cache.write();
		cache.put(key, value);
	}

	/// Invalidate all cached settings
	pub fn clear(&self) {
		let mut cache = self.cache.write();
		cache.clear();
	}
}

/// Settings service - main interface for accessing and managing settings
pub struct SettingsService {
	registry: Arc<FrozenSettingsRegistry>,
	cache: SettingsCache,
	adapter: Arc<dyn SettingsAdapter>,
}

impl SettingsService {
	pub fn new(
		registry: Arc<FrozenSettingsRegistry>,
		adapter: Arc<dyn SettingsAdapter>,
		cache_size: usize,
	) -> Self {
		Self { registry, cache: SettingsCache::new(cache_size), adapter }
	}

	/// Get setting value with full resolution (stored -> default)
	pub async fn get(&self, key: &str) -> LgResult<SettingValue> {
		if let Some(value) = self.cache.get(key) {
			debug!("Setting cache hit: {}", key);
			return Ok(value);
		}

		let def = self
			.registry
			.get(key)
			.ok_or_else(|| Error::ValidationError(format!("Unknown setting: {}", key)))?;

		if let Some(json_value) = self.adapter.read_setting(key).await? {
			match serde_json::from_value::<SettingValue>(json_value) {
				Ok(value) if value.matches_type(&def.default) => {
					self.cache.put(key.to_string(), value.clone());
					return Ok(value);
				}
				// A malformed stored value is a policy input, not an error:
				// fall back to the default
				_ => warn!("Ignoring malformed stored value for setting '{}'", key),
			}
		}

		let value = def.default.clone();
		self.cache.put(key.to_string(), value.clone());
		Ok(value)
	}

	/// Set setting value with type check and validation
	pub async fn set(&self, key: &str, value: SettingValue) -> LgResult<Setting> {
		let def = self
			.registry
			.get(key)
			.ok_or_else(|| Error::ValidationError(format!("Unknown setting: {}", key)))?;

		if !value.matches_type(&def.default) {
			return Err(Error::ValidationError(format!(
				"Type mismatch for setting '{}': expected {}, got {}",
				key,
				def.default.type_name(),
				value.type_name()
			)));
		}

		if let Some(validator) = &def.validator {
			validator(&value)?;
		}

		let json_value = serde_json::to_value(&value)
			.map_err(|e| Error::ValidationError(format!("Failed to serialize setting: {}", e)))?;
		self.adapter.update_setting(key, Some(json_value)).await?;

		self.cache.clear();

		info!("Setting '{}' updated", key);

		Ok(Setting { key: key.to_string(), value, updated_at: Timestamp::now() })
	}

	/// Delete a stored setting (reverts to the compiled-in default)
	pub async fn delete(&self, key: &str) -> LgResult<bool> {
		self.adapter.update_setting(key, None).await?;
		self.cache.clear();

		info!("Setting '{}' deleted", key);
		Ok(true)
	}

	/// Type-safe getters
	pub async fn get_str(&self, key: &str) -> LgResult<String> {
		match self.get(key).await? {
			SettingValue::String(s) => Ok(s),
			v => Err(Error::ValidationError(format!(
				"Setting '{}' is not a string, got {}",
				key,
				v.type_name()
			))),
		}
	}

	pub async fn get_int(&self, key: &str) -> LgResult<i64> {
		match self.get(key).await? {
			SettingValue::Int(i) => Ok(i),
			v => Err(Error::ValidationError(format!(
				"Setting '{}' is not an integer, got {}",
				key,
				v.type_name()
			))),
		}
	}

	pub async fn get_bool(&self, key: &str) -> LgResult<bool> {
		match self.get(key).await? {
			SettingValue::Bool(b) => Ok(b),
			v => Err(Error::ValidationError(format!(
				"Setting '{}' is not a boolean, got {}",
				key,
				v.type_name()
			))),
		}
	}

	/// Get reference to registry (for listing all settings)
	pub fn registry(&self) -> &Arc<FrozenSettingsRegistry> {
		&self.registry
	}
}

// vim: ts=4
