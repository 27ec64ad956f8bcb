//! End-to-end tests for the gate, hardening, and the settings admin API,
//! driving the full router with `tower::ServiceExt::oneshot`.

mod common;

use axum::body::Body;
use axum::http::{HeaderName, Request, StatusCode, header};
use axum::response::IntoResponse;
use axum::{Router, middleware, routing};
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::{TEST_ADMIN_TOKEN, test_app};
use lockgate::gate::settings as gate_keys;
use lockgate::routes;
use lockgate::security::settings as security_keys;
use lockgate::settings::SettingValue;
use lockgate::{App, security};

async fn body_string(res: axum::response::Response) -> String {
	let bytes = res.into_body().collect().await.expect("body").to_bytes();
	String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

fn get(uri: &str, accept: &str) -> Request<Body> {
	Request::builder()
		.uri(uri)
		.header(header::ACCEPT, accept)
		.body(Body::empty())
		.expect("request")
}

#[tokio::test]
async fn test_blocked_json_response() {
	let app = test_app(|_| {});
	let router = routes::init(app);

	let res = router.oneshot(get("/about-us", "application/json")).await.expect("response");
	assert_eq!(res.status(), StatusCode::NOT_FOUND);
	assert_eq!(
		res.headers().get(header::CONTENT_TYPE).and_then(|h| h.to_str().ok()),
		Some("application/json")
	);
	assert_eq!(
		res.headers().get(header::CACHE_CONTROL).and_then(|h| h.to_str().ok()),
		Some("no-cache, no-store, must-revalidate")
	);

	let body: serde_json::Value =
		serde_json::from_str(&body_string(res).await).expect("json body");
	assert_eq!(body["error"], "Not Found");
	assert_eq!(body["code"], "headless_mode_active");
	assert_eq!(body["message"], gate_keys::DEFAULT_MESSAGE);
}

#[tokio::test]
async fn test_blocked_html_response() {
	let app = test_app(|_| {});
	let router = routes::init(app);

	let res = router.oneshot(get("/about-us", "text/html")).await.expect("response");
	assert_eq!(res.status(), StatusCode::NOT_FOUND);
	assert!(
		res.headers()
			.get(header::CONTENT_TYPE)
			.and_then(|h| h.to_str().ok())
			.is_some_and(|ct| ct.starts_with("text/html"))
	);
	assert_eq!(
		res.headers().get("x-robots-tag").and_then(|h| h.to_str().ok()),
		Some("noindex,nofollow")
	);
	// Security headers apply to the gate's own responses too
	assert_eq!(
		res.headers().get(header::X_FRAME_OPTIONS).and_then(|h| h.to_str().ok()),
		Some("SAMEORIGIN")
	);

	let body = body_string(res).await;
	assert!(body.contains(gate_keys::DEFAULT_PAGE_HEADING));
	assert!(body.contains("/wp-json/"));
	assert!(body.contains("/wp-admin/"));
}

#[tokio::test]
async fn test_blocked_html_respects_display_toggles() {
	let app = test_app(|_| {});
	app.settings.set(gate_keys::SHOW_API_URL, SettingValue::Bool(false)).await.expect("set");
	app.settings.set(gate_keys::SHOW_ADMIN_LINK, SettingValue::Bool(false)).await.expect("set");
	app.settings
		.set(gate_keys::PAGE_HEADING, SettingValue::String("Custom heading".into()))
		.await
		.expect("set");
	let router = routes::init(app);

	let res = router.oneshot(get("/about-us", "text/html")).await.expect("response");
	let body = body_string(res).await;
	assert!(body.contains("Custom heading"));
	assert!(!body.contains("/wp-json/"));
	assert!(!body.contains("/wp-admin/"));
}

#[tokio::test]
async fn test_redirect_to_configured_url() {
	let app = test_app(|_| {});
	app.settings.set(gate_keys::REDIRECT_ENABLED, SettingValue::Bool(true)).await.expect("set");
	app.settings
		.set(gate_keys::REDIRECT_URL, SettingValue::String("https://app.example.com".into()))
		.await
		.expect("set");
	let router = routes::init(app);

	let res = router.oneshot(get("/about-us", "text/html")).await.expect("response");
	assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
	assert_eq!(
		res.headers().get(header::LOCATION).and_then(|h| h.to_str().ok()),
		Some("https://app.example.com")
	);
}

#[tokio::test]
async fn test_api_prefix_passes_through_to_upstream() {
	let app = test_app(|_| {});
	let router = routes::init(app);

	// The test upstream is a closed port: reaching the proxy means the gate
	// passed the request through
	let res = router
		.oneshot(get("/wp-json/wp/v2/posts", "application/json"))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_allow_listed_path_passes_through() {
	let app = test_app(|builder| {
		builder.allow_paths(["/healthz"]);
	});
	let router = routes::init(app);

	let res = router.clone().oneshot(get("/healthz", "text/html")).await.expect("response");
	assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

	// Non-listed paths are still blocked
	let res = router.oneshot(get("/about-us", "text/html")).await.expect("response");
	assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_xmlrpc_blocked_before_proxying() {
	let app = test_app(|_| {});
	let router = routes::init(app);

	// Flagged as an API call, so the gate would pass it; hardening blocks it
	let req = Request::builder()
		.uri("/xmlrpc.php")
		.header("x-lockgate-api", "1")
		.body(Body::empty())
		.expect("request");
	let res = router.oneshot(req).await.expect("response");
	assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_feeds_blocked() {
	let app = test_app(|_| {});
	let router = routes::init(app);

	let res = router.clone().oneshot(get("/feed", "text/html")).await.expect("response");
	assert_eq!(res.status(), StatusCode::FORBIDDEN);
	let body = body_string(res).await;
	assert!(body.contains("Feeds are disabled in headless mode."));

	// Disabling the toggle turns the block off (falls back to the gate 404)
	let app = test_app(|_| {});
	app.settings
		.set(security_keys::BLOCK_FEEDS, SettingValue::Bool(false))
		.await
		.expect("set");
	let router = routes::init(app);
	let res = router.oneshot(get("/feed", "text/html")).await.expect("response");
	assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_endpoints_blocked_without_authentication() {
	// Off by default: the request reaches the upstream proxy
	let app = test_app(|_| {});
	let router = routes::init(app);
	let res = router
		.oneshot(get("/wp-json/wp/v2/users", "application/json"))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

	let app = test_app(|_| {});
	app.settings
		.set(security_keys::BLOCK_USER_ENDPOINTS, SettingValue::Bool(true))
		.await
		.expect("set");
	let router = routes::init(app);

	let res = router
		.clone()
		.oneshot(get("/wp-json/wp/v2/users", "application/json"))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::FORBIDDEN);

	// Authenticated requests still reach the upstream
	let req = Request::builder()
		.uri("/wp-json/wp/v2/users")
		.header(header::AUTHORIZATION, "Bearer cms-token")
		.body(Body::empty())
		.expect("request");
	let res = router.clone().oneshot(req).await.expect("response");
	assert_eq!(res.status(), StatusCode::BAD_GATEWAY);

	// Other API endpoints are not affected
	let res = router
		.oneshot(get("/wp-json/wp/v2/posts", "application/json"))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
}

/// A router standing in for the upstream: its response carries the
/// version-revealing headers a CMS typically sends.
fn versioned_router(app: App) -> Router {
	async fn upstream_like() -> impl IntoResponse {
		(
			[
				(header::SERVER, "Apache/2.4.41"),
				(HeaderName::from_static("x-powered-by"), "PHP/8.1.2"),
				(HeaderName::from_static("x-generator"), "WordPress 6.4"),
			],
			"ok",
		)
	}
	Router::new()
		.route("/ok", routing::get(upstream_like))
		.layer(middleware::from_fn_with_state(app, security::harden))
}

#[tokio::test]
async fn test_version_headers_stripped_from_responses() {
	let app = test_app(|_| {});
	let router = versioned_router(app);

	let res = router.oneshot(get("/ok", "text/html")).await.expect("response");
	assert_eq!(res.status(), StatusCode::OK);
	assert!(res.headers().get(header::SERVER).is_none());
	assert!(res.headers().get("x-powered-by").is_none());
	assert!(res.headers().get("x-generator").is_none());
}

#[tokio::test]
async fn test_version_headers_kept_when_disabled() {
	let app = test_app(|_| {});
	app.settings
		.set(security_keys::HIDE_UPSTREAM_VERSION, SettingValue::Bool(false))
		.await
		.expect("set");
	let router = versioned_router(app);

	let res = router.oneshot(get("/ok", "text/html")).await.expect("response");
	assert_eq!(res.status(), StatusCode::OK);
	assert_eq!(
		res.headers().get(header::SERVER).and_then(|h| h.to_str().ok()),
		Some("Apache/2.4.41")
	);
	assert_eq!(
		res.headers().get("x-powered-by").and_then(|h| h.to_str().ok()),
		Some("PHP/8.1.2")
	);
	assert_eq!(
		res.headers().get("x-generator").and_then(|h| h.to_str().ok()),
		Some("WordPress 6.4")
	);
}

#[tokio::test]
async fn test_admin_api_requires_token() {
	let app = test_app(|_| {});
	let router = routes::init(app);

	let res = router
		.clone()
		.oneshot(get("/lockgate/api/settings", "application/json"))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::FORBIDDEN);

	let req = Request::builder()
		.uri("/lockgate/api/settings")
		.header(header::AUTHORIZATION, "Bearer wrong-token")
		.body(Body::empty())
		.expect("request");
	let res = router.clone().oneshot(req).await.expect("response");
	assert_eq!(res.status(), StatusCode::FORBIDDEN);

	// Same length as the real token, still rejected
	let req = Request::builder()
		.uri("/lockgate/api/settings")
		.header(header::AUTHORIZATION, "Bearer test-admin-tokeX")
		.body(Body::empty())
		.expect("request");
	let res = router.oneshot(req).await.expect("response");
	assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_api_survives_custom_admin_prefixes() {
	// Overriding admin_prefixes without "/lockgate/" must not gate off the
	// admin API itself
	let app = test_app(|builder| {
		builder.admin_prefixes(["/wp-admin/"]);
	});
	let router = routes::init(app);

	let res = router
		.oneshot(authed("GET", "/lockgate/api/settings", ""))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::OK);
}

fn authed(method: &str, uri: &str, body: &str) -> Request<Body> {
	Request::builder()
		.method(method)
		.uri(uri)
		.header(header::AUTHORIZATION, format!("Bearer {}", TEST_ADMIN_TOKEN))
		.header(header::CONTENT_TYPE, "application/json")
		.body(Body::from(body.to_string()))
		.expect("request")
}

#[tokio::test]
async fn test_admin_api_list_and_update() {
	let app = test_app(|_| {});
	let router = routes::init(app);

	let res = router
		.clone()
		.oneshot(authed("GET", "/lockgate/api/settings", ""))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::OK);
	let body = body_string(res).await;
	assert!(body.contains("gate.redirect_enabled"));
	assert!(body.contains("security.block_xmlrpc"));

	let res = router
		.clone()
		.oneshot(authed(
			"PUT",
			"/lockgate/api/settings/gate.redirect_url",
			r#"{"value":"https://app.example.com"}"#,
		))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::OK);

	let res = router
		.clone()
		.oneshot(authed("GET", "/lockgate/api/settings/gate.redirect_url", ""))
		.await
		.expect("response");
	let body: serde_json::Value = serde_json::from_str(&body_string(res).await).expect("json");
	assert_eq!(body["value"], "https://app.example.com");

	// Unknown settings 404
	let res = router
		.oneshot(authed("GET", "/lockgate/api/settings/gate.no_such_setting", ""))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_api_rejects_invalid_values() {
	let app = test_app(|_| {});
	let router = routes::init(app);

	// Invalid URL rejected by the validator
	let res = router
		.clone()
		.oneshot(authed(
			"PUT",
			"/lockgate/api/settings/gate.redirect_url",
			r#"{"value":"not a url"}"#,
		))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::BAD_REQUEST);

	// Type mismatch rejected
	let res = router
		.oneshot(authed(
			"PUT",
			"/lockgate/api/settings/gate.redirect_enabled",
			r#"{"value":"yes"}"#,
		))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_admin_api_delete_reverts_to_default() {
	let app = test_app(|_| {});
	let router = routes::init(app.clone());

	app.settings
		.set(gate_keys::PAGE_TITLE, SettingValue::String("Custom".into()))
		.await
		.expect("set");

	let res = router
		.clone()
		.oneshot(authed("DELETE", "/lockgate/api/settings/gate.page_title", ""))
		.await
		.expect("response");
	assert_eq!(res.status(), StatusCode::NO_CONTENT);

	let res = router
		.oneshot(authed("GET", "/lockgate/api/settings/gate.page_title", ""))
		.await
		.expect("response");
	let body: serde_json::Value = serde_json::from_str(&body_string(res).await).expect("json");
	assert_eq!(body["value"], gate_keys::DEFAULT_PAGE_TITLE);
}

#[tokio::test]
async fn test_bootstrap_seeds_defaults_and_version() {
	let app = test_app(|_| {});
	lockgate::core::app::bootstrap(&app).await.expect("bootstrap");

	let stored = app
		.settings_adapter
		.read_setting(gate_keys::REDIRECT_ENABLED)
		.await
		.expect("read");
	assert_eq!(stored, Some(serde_json::Value::Bool(false)));

	let version = app.settings_adapter.read_global("lockgate_version").await.expect("read");
	assert_eq!(version.as_deref(), Some(lockgate::core::app::VERSION));

	// Seeding must not overwrite existing values
	app.settings
		.set(gate_keys::PAGE_TITLE, SettingValue::String("Kept".into()))
		.await
		.expect("set");
	lockgate::core::app::bootstrap(&app).await.expect("bootstrap");
	let stored = app
		.settings_adapter
		.read_setting(gate_keys::PAGE_TITLE)
		.await
		.expect("read");
	assert_eq!(stored, Some(serde_json::Value::String("Kept".into())));
}
