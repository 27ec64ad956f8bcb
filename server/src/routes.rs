use axum::{Router, middleware, routing::get};

use crate::core::route_auth;
use crate::prelude::*;
use crate::{gate, proxy, security, settings};

/// Mount point of the gate's own admin API. The gate recognizes this path
/// as an admin context unconditionally, so overriding `admin_prefixes`
/// cannot gate off these routes.
pub const ADMIN_MOUNT: &str = "/lockgate/api";

pub fn init(app: App) -> Router {
	let admin_router = Router::new()
		.route("/settings", get(settings::handler::list_settings))
		.route(
			"/settings/{name}",
			get(settings::handler::get_setting)
				.put(settings::handler::update_setting)
				.delete(settings::handler::delete_setting),
		)
		.layer(middleware::from_fn_with_state(app.clone(), route_auth::require_admin_token));

	// Layer order matters: hardening is outermost so endpoint blocks fire
	// even for requests the gate would let through and security headers end
	// up on every response, including the gate's own 404s. The gate runs
	// right after, before any routing; everything unrouted falls back to
	// the upstream proxy.
	Router::new()
		.nest(ADMIN_MOUNT, admin_router)
		.fallback(proxy::handler::forward)
		.layer(middleware::from_fn_with_state(app.clone(), gate::handler::gate))
		.layer(middleware::from_fn_with_state(app.clone(), security::harden))
		.with_state(app)
}

// vim: ts=4
