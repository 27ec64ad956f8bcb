//! Gate settings registration
//!
//! Registers the settings consumed by the access gate: redirect target and
//! the texts shown on the blocked page.

use url::Url;

use crate::error::{Error, LgResult};
use crate::settings::{SettingDefinition, SettingValue, SettingsRegistry};

pub const REDIRECT_ENABLED: &str = "gate.redirect_enabled";
pub const REDIRECT_URL: &str = "gate.redirect_url";
pub const MESSAGE: &str = "gate.message";
pub const PAGE_TITLE: &str = "gate.page_title";
pub const PAGE_HEADING: &str = "gate.page_heading";
pub const PAGE_DESCRIPTION: &str = "gate.page_description";
pub const SHOW_API_URL: &str = "gate.show_api_url";
pub const SHOW_ADMIN_LINK: &str = "gate.show_admin_link";

pub const DEFAULT_MESSAGE: &str =
	"This site is running in headless mode. Please use the API.";
pub const DEFAULT_PAGE_TITLE: &str = "404 - Headless Mode";
pub const DEFAULT_PAGE_HEADING: &str = "This site is running in Headless Mode";
pub const DEFAULT_PAGE_DESCRIPTION: &str =
	"The public frontend is disabled. Content is available via:";

/// Register all gate settings
pub fn register_settings(registry: &mut SettingsRegistry) -> LgResult<()> {
	registry.register(
		SettingDefinition::builder(REDIRECT_ENABLED)
			.description("Redirect blocked frontend requests to the configured URL")
			.default(SettingValue::Bool(false))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(REDIRECT_URL)
			.description("Frontend URL blocked requests are redirected to")
			.default(SettingValue::String(String::new()))
			.validator(validate_redirect_url)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(MESSAGE)
			.description("Message returned in the JSON blocked response")
			.default(SettingValue::String(DEFAULT_MESSAGE.into()))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(PAGE_TITLE)
			.description("Title of the HTML blocked page")
			.default(SettingValue::String(DEFAULT_PAGE_TITLE.into()))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(PAGE_HEADING)
			.description("Heading of the HTML blocked page")
			.default(SettingValue::String(DEFAULT_PAGE_HEADING.into()))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(PAGE_DESCRIPTION)
			.description("Description paragraph of the HTML blocked page")
			.default(SettingValue::String(DEFAULT_PAGE_DESCRIPTION.into()))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(SHOW_API_URL)
			.description("Show the API root URL on the HTML blocked page")
			.default(SettingValue::Bool(true))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(SHOW_ADMIN_LINK)
			.description("Show a link to the admin UI on the HTML blocked page")
			.default(SettingValue::Bool(true))
			.build()?,
	)?;

	Ok(())
}

/// Empty is allowed (redirect not configured), otherwise http(s) only
fn validate_redirect_url(value: &SettingValue) -> LgResult<()> {
	let Some(s) = value.as_str() else {
		return Err(Error::ValidationError("Redirect URL must be a string".into()));
	};
	if s.is_empty() {
		return Ok(());
	}
	match Url::parse(s) {
		Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
		Ok(url) => Err(Error::ValidationError(format!(
			"Redirect URL must be http or https, got {}",
			url.scheme()
		))),
		Err(e) => Err(Error::ValidationError(format!("Invalid redirect URL: {}", e))),
	}
}


// vim: ts=4
