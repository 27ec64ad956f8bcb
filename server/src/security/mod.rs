//! Security hardening middleware
//!
//! Applies the admin-configurable hardening toggles to traffic that passed
//! the gate: blocks the legacy XML-RPC endpoint and syndication feeds,
//! injects security headers, and strips version-revealing headers from
//! proxied responses.

pub mod settings;

use axum::{
	Json,
	extract::{Request, State},
	http::{HeaderName, HeaderValue, StatusCode, header},
	middleware::Next,
	response::{IntoResponse, Response},
};
use serde_json::json;

use crate::prelude::*;
use crate::security::settings as keys;
use crate::settings::SettingsService;

const XMLRPC_PATH: &str = "/xmlrpc.php";
const USERS_ENDPOINT: &str = "/wp-json/wp/v2/users";

/// Version-revealing headers removed from proxied responses
const VERSION_HEADERS: &[&str] = &["server", "x-powered-by", "x-generator"];

#[derive(Clone, Debug)]
struct SecuritySettings {
	headers_enabled: bool,
	block_xmlrpc: bool,
	block_feeds: bool,
	block_user_endpoints: bool,
	hide_upstream_version: bool,
}

impl SecuritySettings {
	async fn load(settings: &SettingsService) -> SecuritySettings {
		SecuritySettings {
			headers_enabled: settings.get_bool(keys::HEADERS_ENABLED).await.unwrap_or(true),
			block_xmlrpc: settings.get_bool(keys::BLOCK_XMLRPC).await.unwrap_or(true),
			block_feeds: settings.get_bool(keys::BLOCK_FEEDS).await.unwrap_or(true),
			block_user_endpoints: settings
				.get_bool(keys::BLOCK_USER_ENDPOINTS)
				.await
				.unwrap_or(false),
			hide_upstream_version: settings
				.get_bool(keys::HIDE_UPSTREAM_VERSION)
				.await
				.unwrap_or(true),
		}
	}
}

/// The user listing and single-user REST endpoints (enumeration surface)
fn is_user_endpoint(path: &str) -> bool {
	path == USERS_ENDPOINT || path.starts_with("/wp-json/wp/v2/users/")
}

fn is_feed_request(path: &str, query: Option<&str>) -> bool {
	path == "/feed"
		|| path.starts_with("/feed/")
		|| path.ends_with("/feed")
		|| path.ends_with("/feed/")
		|| query.is_some_and(|q| q.split('&').any(|p| p == "feed" || p.starts_with("feed=")))
}

fn forbidden(message: &str) -> Response {
	(StatusCode::FORBIDDEN, Json(json!({ "error": "Forbidden", "message": message })))
		.into_response()
}

/// Hardening middleware, the outermost layer of the stack
pub async fn harden(State(app): State<App>, req: Request, next: Next) -> LgResult<Response> {
	let cfg = SecuritySettings::load(&app.settings).await;
	let path = req.uri().path().to_string();
	let query = req.uri().query().map(str::to_string);

	if cfg.block_xmlrpc && path == XMLRPC_PATH {
		debug!("Security: blocking XML-RPC request");
		return Ok(forbidden("XML-RPC is disabled in headless mode."));
	}
	if cfg.block_feeds && is_feed_request(&path, query.as_deref()) {
		debug!("Security: blocking feed request {}", path);
		return Ok(forbidden("Feeds are disabled in headless mode."));
	}
	if cfg.block_user_endpoints
		&& is_user_endpoint(&path)
		&& !req.headers().contains_key(header::AUTHORIZATION)
	{
		debug!("Security: blocking unauthenticated user endpoint request {}", path);
		return Ok(forbidden("User endpoints require authentication."));
	}

	let mut res = next.run(req).await;

	if cfg.hide_upstream_version {
		for name in VERSION_HEADERS {
			res.headers_mut().remove(*name);
		}
	}

	if cfg.headers_enabled {
		let headers = res.headers_mut();
		headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
		headers
			.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
		headers.insert(
			header::REFERRER_POLICY,
			HeaderValue::from_static("strict-origin-when-cross-origin"),
		);
		headers.insert(
			HeaderName::from_static("permissions-policy"),
			HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
		);
	}

	Ok(res)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_is_user_endpoint() {
		assert!(is_user_endpoint("/wp-json/wp/v2/users"));
		assert!(is_user_endpoint("/wp-json/wp/v2/users/5"));
		assert!(!is_user_endpoint("/wp-json/wp/v2/users-custom"));
		assert!(!is_user_endpoint("/wp-json/wp/v2/posts"));
	}

	#[test]
	fn test_is_feed_request() {
		assert!(is_feed_request("/feed", None));
		assert!(is_feed_request("/feed/", None));
		assert!(is_feed_request("/feed/atom", None));
		assert!(is_feed_request("/category/news/feed", None));
		assert!(is_feed_request("/", Some("feed=rss2")));
		assert!(is_feed_request("/", Some("p=1&feed=atom")));
		assert!(!is_feed_request("/feedback", None));
		assert!(!is_feed_request("/about-us", None));
		assert!(!is_feed_request("/", Some("feedback=1")));
	}
}

// vim: ts=4
