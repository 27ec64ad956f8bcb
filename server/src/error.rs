use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub type LgResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	NotFound,
	PermissionDenied,
	ValidationError(String),
	ConfigError(String),
	NetworkError(Box<str>),
	Timeout,
	DbError,
	Internal(String),

	// externals
	Io(std::io::Error),
}

impl From<std::io::Error> for Error {
	fn from(err: std::io::Error) -> Self {
		Self::Io(err)
	}
}

impl std::fmt::Display for Error {
	fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
		match self {
			Error::NotFound => write!(f, "not found"),
			Error::PermissionDenied => write!(f, "permission denied"),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::NetworkError(msg) => write!(f, "network error: {}", msg),
			Error::Timeout => write!(f, "timeout"),
			Error::DbError => write!(f, "database error"),
			Error::Internal(msg) => write!(f, "internal error: {}", msg),
			Error::Io(err) => write!(f, "io error: {}", err),
		}
	}
}

impl std::error::Error for Error {}

impl IntoResponse for Error {
	fn into_response(self) -> axum::response::Response {
		let (status, code) = match &self {
			Error::NotFound => (StatusCode::NOT_FOUND, "not_found"),
			Error::PermissionDenied => (StatusCode::FORBIDDEN, "permission_denied"),
			Error::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_error"),
			Error::NetworkError(_) => (StatusCode::BAD_GATEWAY, "bad_gateway"),
			Error::Timeout => (StatusCode::GATEWAY_TIMEOUT, "gateway_timeout"),
			_ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
		};
		(status, Json(json!({ "error": code, "message": self.to_string() }))).into_response()
	}
}

// vim: ts=4
