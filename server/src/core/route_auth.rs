//! Admin API authentication

use axum::{
	extract::{Request, State},
	http::header,
	middleware::Next,
	response::Response,
};
use subtle::ConstantTimeEq;

use crate::prelude::*;

/// Require the configured admin API token as a bearer token. With no token
/// configured the admin API is disabled entirely.
pub async fn require_admin_token(State(app): State<App>, req: Request, next: Next) -> LgResult<Response> {
	let Some(expected) = app.opts.admin_token.as_deref() else {
		warn!("Admin API request rejected: no admin token configured");
		return Err(Error::PermissionDenied);
	};

	let auth_header = req
		.headers()
		.get(header::AUTHORIZATION)
		.and_then(|h| h.to_str().ok())
		.ok_or(Error::PermissionDenied)?;

	if !auth_header.starts_with("Bearer ") {
		return Err(Error::PermissionDenied);
	}

	// Constant-time compare, the token is a secret
	let token = auth_header[7..].trim();
	if !bool::from(token.as_bytes().ct_eq(expected.as_bytes())) {
		return Err(Error::PermissionDenied);
	}

	Ok(next.run(req).await)
}

// vim: ts=4
