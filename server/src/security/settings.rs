//! Security hardening settings registration

use crate::error::LgResult;
use crate::settings::{SettingDefinition, SettingValue, SettingsRegistry};

pub const HEADERS_ENABLED: &str = "security.headers_enabled";
pub const BLOCK_XMLRPC: &str = "security.block_xmlrpc";
pub const BLOCK_FEEDS: &str = "security.block_feeds";
pub const BLOCK_USER_ENDPOINTS: &str = "security.block_user_endpoints";
pub const HIDE_UPSTREAM_VERSION: &str = "security.hide_upstream_version";

/// Register all security settings
pub fn register_settings(registry: &mut SettingsRegistry) -> LgResult<()> {
	registry.register(
		SettingDefinition::builder(HEADERS_ENABLED)
			.description("Add security headers to every response")
			.default(SettingValue::Bool(true))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(BLOCK_XMLRPC)
			.description("Block the legacy XML-RPC endpoint")
			.default(SettingValue::Bool(true))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(BLOCK_FEEDS)
			.description("Block syndication feed endpoints")
			.default(SettingValue::Bool(true))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(BLOCK_USER_ENDPOINTS)
			.description("Block unauthenticated access to the user listing API endpoints")
			.default(SettingValue::Bool(false))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(HIDE_UPSTREAM_VERSION)
			.description("Strip version-revealing headers from proxied responses")
			.default(SettingValue::Bool(true))
			.build()?,
	)?;

	Ok(())
}

// vim: ts=4
