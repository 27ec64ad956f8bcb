//! Common test utilities and helpers
//!
//! Contains the in-memory settings adapter and app construction helpers
//! shared by the integration tests.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;

use lockgate::error::LgResult;
use lockgate::settings_adapter::SettingsAdapter;
use lockgate::{App, AppBuilder};

#[derive(Debug, Default)]
pub struct MemorySettingsAdapter {
	settings: RwLock<HashMap<String, serde_json::Value>>,
	globals: RwLock<HashMap<String, String>>,
}

impl MemorySettingsAdapter {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}
}

#[async_trait]
impl SettingsAdapter for MemorySettingsAdapter {
	async fn read_setting(&self, name: &str) -> LgResult<Option<serde_json::Value>> {
		Ok(self.settings.read().get(name).cloned())
	}

	async fn update_setting(&self, name: &str, value: Option<serde_json::Value>) -> LgResult<()> {
		match value {
			Some(value) => {
				self.settings.write().insert(name.to_string(), value);
			}
			None => {
				self.settings.write().remove(name);
			}
		}
		Ok(())
	}

	async fn list_settings(&self, prefix: Option<&str>) -> LgResult<HashMap<String, serde_json::Value>> {
		let settings = self.settings.read();
		Ok(settings
			.iter()
			.filter(|(k, _)| prefix.is_none_or(|p| k.starts_with(p)))
			.map(|(k, v)| (k.clone(), v.clone()))
			.collect())
	}

	async fn read_global(&self, key: &str) -> LgResult<Option<String>> {
		Ok(self.globals.read().get(key).cloned())
	}

	async fn update_global(&self, key: &str, value: &str) -> LgResult<()> {
		self.globals.write().insert(key.to_string(), value.to_string());
		Ok(())
	}
}

pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

/// Build an App against the in-memory adapter. The upstream points at a
/// closed local port, so pass-through requests fail with 502 instead of
/// leaving the test environment.
pub fn test_app(configure: impl FnOnce(&mut AppBuilder)) -> App {
	let mut builder = AppBuilder::new();
	builder
		.upstream(Url::parse("http://127.0.0.1:9").expect("static url"))
		.admin_token(TEST_ADMIN_TOKEN)
		.settings_adapter(MemorySettingsAdapter::new());
	configure(&mut builder);
	builder.build().expect("failed to build test app")
}
