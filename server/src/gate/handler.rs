//! The access gate decision procedure and middleware
//!
//! [`decide`] is a pure function from request context + settings to a
//! [`GateOutcome`]; the [`gate`] middleware derives the context, loads a
//! settings snapshot, and turns the outcome into either `next.run(req)` or a
//! terminal response. The caller never sees an error: configuration problems
//! degrade to the 404 branch.

use axum::{
	Json,
	extract::{Request, State},
	http::{HeaderName, StatusCode, header},
	middleware::Next,
	response::{Html, IntoResponse, Response},
};
use serde_json::json;
use url::Url;

use crate::core::app::AppBuilderOpts;
use crate::gate::page::PageParams;
use crate::gate::settings as keys;
use crate::prelude::*;
use crate::settings::SettingsService;

/// Header marking internal background invocations (job runners, cron)
pub const INTERNAL_HEADER: &str = "x-lockgate-internal";
/// Header by which the host environment can flag a request as an API call
pub const API_FLAG_HEADER: &str = "x-lockgate-api";

const ROBOTS_HEADER: HeaderName = HeaderName::from_static("x-robots-tag");

/// Per-request context consumed by the gate. Execution-context flags are
/// opaque booleans as far as the decision procedure is concerned.
#[derive(Clone, Debug)]
pub struct GateContext {
	pub path: Box<str>,
	pub accept_json: bool,
	pub is_admin: bool,
	pub is_api: bool,
	pub is_background: bool,
}

impl GateContext {
	pub fn from_request(req: &Request, opts: &AppBuilderOpts) -> Self {
		let path = req.uri().path();
		let accept = req
			.headers()
			.get(header::ACCEPT)
			.and_then(|h| h.to_str().ok())
			.unwrap_or_default();

		GateContext {
			path: Box::from(path),
			accept_json: accept.contains("application/json"),
			// The gate's own admin API is always an admin context, whatever
			// prefixes the operator configured
			is_admin: path.starts_with(crate::routes::ADMIN_MOUNT)
				|| opts.admin_prefixes.iter().any(|p| path.starts_with(p.as_ref())),
			is_api: opts.api_prefixes.iter().any(|p| path.starts_with(p.as_ref()))
				|| req.headers().contains_key(API_FLAG_HEADER),
			is_background: req.headers().contains_key(INTERNAL_HEADER),
		}
	}
}

/// Settings snapshot the gate works with, loaded once per request
#[derive(Clone, Debug)]
pub struct GateSettings {
	pub redirect_enabled: bool,
	pub redirect_url: String,
	pub message: String,
	pub page_title: String,
	pub page_heading: String,
	pub page_description: String,
	pub show_api_url: bool,
	pub show_admin_link: bool,
}

impl GateSettings {
	/// Absent or unreadable settings degrade to compiled-in defaults, the
	/// gate itself has no failure mode.
	pub async fn load(settings: &SettingsService) -> GateSettings {
		GateSettings {
			redirect_enabled: settings.get_bool(keys::REDIRECT_ENABLED).await.unwrap_or(false),
			redirect_url: settings.get_str(keys::REDIRECT_URL).await.unwrap_or_default(),
			message: settings
				.get_str(keys::MESSAGE)
				.await
				.unwrap_or_else(|_| keys::DEFAULT_MESSAGE.into()),
			page_title: settings
				.get_str(keys::PAGE_TITLE)
				.await
				.unwrap_or_else(|_| keys::DEFAULT_PAGE_TITLE.into()),
			page_heading: settings
				.get_str(keys::PAGE_HEADING)
				.await
				.unwrap_or_else(|_| keys::DEFAULT_PAGE_HEADING.into()),
			page_description: settings
				.get_str(keys::PAGE_DESCRIPTION)
				.await
				.unwrap_or_else(|_| keys::DEFAULT_PAGE_DESCRIPTION.into()),
			show_api_url: settings.get_bool(keys::SHOW_API_URL).await.unwrap_or(true),
			show_admin_link: settings.get_bool(keys::SHOW_ADMIN_LINK).await.unwrap_or(true),
		}
	}
}

/// Terminal outcome of one gating decision
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
	/// Forward the request to the upstream CMS unmodified
	PassThrough,
	/// 301 to the configured frontend URL
	Redirect(Box<str>),
	/// Terminal headless-mode 404 (JSON or HTML, by Accept header)
	Block,
}

/// The decision procedure. Ordered, first match wins: the pass-through
/// checks always beat the redirect-vs-404 branch, so a misconfigured
/// redirect target can never lock an operator out of the admin UI or API.
pub fn decide(ctx: &GateContext, allow_paths: &[Box<str>], cfg: &GateSettings) -> GateOutcome {
	if ctx.is_admin {
		return GateOutcome::PassThrough;
	}
	if ctx.is_api {
		return GateOutcome::PassThrough;
	}
	if ctx.is_background {
		return GateOutcome::PassThrough;
	}
	// Literal, case-sensitive prefix match, no normalization
	if allow_paths.iter().any(|p| ctx.path.starts_with(p.as_ref())) {
		return GateOutcome::PassThrough;
	}

	if cfg.redirect_enabled {
		if let Some(url) = valid_redirect_url(&cfg.redirect_url) {
			return GateOutcome::Redirect(url);
		}
		// An empty or invalid URL means "redirect not configured"
	}

	GateOutcome::Block
}

fn valid_redirect_url(s: &str) -> Option<Box<str>> {
	if s.is_empty() {
		return None;
	}
	match Url::parse(s) {
		Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Some(Box::from(s)),
		_ => None,
	}
}

/// Gate middleware. Layered just inside the hardening layer, before any
/// routing.
pub async fn gate(State(app): State<App>, req: Request, next: Next) -> LgResult<Response> {
	let ctx = GateContext::from_request(&req, &app.opts);
	let cfg = GateSettings::load(&app.settings).await;

	match decide(&ctx, &app.opts.allow_paths, &cfg) {
		GateOutcome::PassThrough => Ok(next.run(req).await),
		GateOutcome::Redirect(url) => {
			debug!("Gate: redirecting {} -> {}", ctx.path, url);
			Ok((
				StatusCode::MOVED_PERMANENTLY,
				[(header::LOCATION, url.to_string())],
			)
				.into_response())
		}
		GateOutcome::Block => {
			debug!("Gate: blocking {}", ctx.path);
			blocked_response(&app, &ctx, &cfg)
		}
	}
}

fn blocked_response(app: &App, ctx: &GateContext, cfg: &GateSettings) -> LgResult<Response> {
	let nocache = [
		(header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
		(header::PRAGMA, "no-cache"),
		(header::EXPIRES, "0"),
	];

	if ctx.accept_json {
		return Ok((
			StatusCode::NOT_FOUND,
			nocache,
			Json(json!({
				"error": "Not Found",
				"message": cfg.message,
				"code": "headless_mode_active",
			})),
		)
			.into_response());
	}

	let params = PageParams {
		title: &cfg.page_title,
		heading: &cfg.page_heading,
		description: &cfg.page_description,
		api_url: cfg
			.show_api_url
			.then(|| app.opts.api_prefixes.first().map(|p| p.as_ref()))
			.flatten(),
		admin_url: cfg
			.show_admin_link
			.then(|| app.opts.admin_prefixes.first().map(|p| p.as_ref()))
			.flatten(),
	};
	let body = app.page.render(&params)?;

	Ok((
		StatusCode::NOT_FOUND,
		nocache,
		[(ROBOTS_HEADER, "noindex,nofollow")],
		Html(body),
	)
		.into_response())
}


// vim: ts=4
