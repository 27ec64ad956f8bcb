//! HTTP forwarding to the upstream CMS
//!
//! Every request the gate passes through ends up here: the fallback handler
//! forwards it to the configured upstream, preserving the path and query.

use axum::{
	body::Body,
	extract::{ConnectInfo, Request, State},
	http::{HeaderMap, HeaderName, HeaderValue, Uri, header},
	response::Response,
};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use std::net::SocketAddr;
use std::time::Duration;
use url::Url;

use crate::prelude::*;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Headers that should not be forwarded between client and backend (hop-by-hop)
const HOP_BY_HOP_HEADERS: &[&str] = &[
	"connection",
	"keep-alive",
	"proxy-authenticate",
	"proxy-authorization",
	"te",
	"trailers",
	"transfer-encoding",
	"upgrade",
];

/// Check if a header is a hop-by-hop header that should be stripped
fn is_hop_by_hop(name: &HeaderName) -> bool {
	HOP_BY_HOP_HEADERS.iter().any(|h| name.as_str().eq_ignore_ascii_case(h))
}

/// Build the backend URI from the upstream base URL and the original request URI
fn build_backend_uri(upstream: &Url, original_uri: &Uri) -> LgResult<Uri> {
	let mut backend = upstream.clone();
	let combined_path = format!("{}{}", backend.path().trim_end_matches('/'), original_uri.path());
	backend.set_path(&combined_path);
	backend.set_query(original_uri.query());
	debug!("Proxy backend URI: {} (combined_path={:?})", backend.as_str(), combined_path);
	backend
		.as_str()
		.parse::<Uri>()
		.map_err(|e| Error::Internal(format!("failed to build backend URI: {}", e)))
}

/// Copy non-hop-by-hop headers from source to destination
fn copy_headers(src: &HeaderMap, dst: &mut HeaderMap) {
	for (name, value) in src.iter() {
		if is_hop_by_hop(name) {
			continue;
		}
		dst.append(name.clone(), value.clone());
	}
}

/// Fallback handler: forward a passed-through request to the upstream CMS
pub async fn forward(State(app): State<App>, req: Request) -> LgResult<Response> {
	// Guaranteed by AppBuilder::build, but stay total
	let upstream = app
		.opts
		.upstream
		.as_ref()
		.ok_or_else(|| Error::ConfigError("No upstream URL configured".into()))?;
	let backend_uri = build_backend_uri(upstream, req.uri())?;

	let peer_addr = req
		.extensions()
		.get::<ConnectInfo<SocketAddr>>()
		.map(|a| a.ip().to_string())
		.unwrap_or_else(|| "-".to_string());
	let original_host = req
		.headers()
		.get(header::HOST)
		.and_then(|h| h.to_str().ok())
		.unwrap_or_default()
		.to_string();

	let mut backend_headers = HeaderMap::new();
	copy_headers(req.headers(), &mut backend_headers);

	// Rewrite Host to the upstream authority, the original host travels in
	// X-Forwarded-Host
	if let Some(host) = upstream.host_str() {
		let host_val = if let Some(port) = upstream.port() {
			format!("{}:{}", host, port)
		} else {
			host.to_string()
		};
		if let Ok(hv) = HeaderValue::from_str(&host_val) {
			backend_headers.insert(header::HOST, hv);
		}
	}

	if let Ok(hv) = HeaderValue::from_str(&peer_addr) {
		backend_headers.insert(HeaderName::from_static("x-forwarded-for"), hv.clone());
		backend_headers.insert(HeaderName::from_static("x-real-ip"), hv);
	}
	backend_headers
		.insert(HeaderName::from_static("x-forwarded-proto"), HeaderValue::from_static("http"));
	if let Ok(hv) = HeaderValue::from_str(&original_host) {
		backend_headers.insert(HeaderName::from_static("x-forwarded-host"), hv);
	}

	let method = req.method().clone();
	let body = req.into_body();

	let mut backend_req = hyper::Request::builder().method(method).uri(backend_uri);
	if let Some(headers) = backend_req.headers_mut() {
		*headers = backend_headers;
	}
	let backend_req = backend_req
		.body(body)
		.map_err(|e| Error::Internal(format!("failed to build backend request: {}", e)))?;

	let scheme = upstream.scheme();
	match send_backend_request(scheme, backend_req).await {
		Ok(mut backend_resp) => {
			// Strip hop-by-hop headers from the response
			let headers_to_remove: Vec<HeaderName> = backend_resp
				.headers()
				.keys()
				.filter(|name| is_hop_by_hop(name))
				.cloned()
				.collect();
			for name in headers_to_remove {
				backend_resp.headers_mut().remove(&name);
			}
			Ok(backend_resp.map(Body::new))
		}
		Err(e @ Error::Timeout) => {
			warn!("Upstream timeout for {}", upstream);
			Err(e)
		}
		Err(e) => {
			warn!("Upstream error for {}: {}", upstream, e);
			Err(e)
		}
	}
}

/// Send a request to the upstream, choosing HTTP or HTTPS connector based on scheme
async fn send_backend_request(
	scheme: &str,
	req: hyper::Request<Body>,
) -> Result<hyper::Response<hyper::body::Incoming>, Error> {
	let result = if scheme == "https" {
		let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
			.with_native_roots()
			.map_err(|_| Error::ConfigError("no native root CA certificates found".into()))?
			.https_only()
			.enable_http1()
			.build();
		let client: Client<_, Body> = Client::builder(TokioExecutor::new())
			.pool_idle_timeout(CONNECT_TIMEOUT)
			.build(https_connector);
		tokio::time::timeout(READ_TIMEOUT, client.request(req)).await
	} else {
		let http_connector = hyper_util::client::legacy::connect::HttpConnector::new();
		let client: Client<_, Body> = Client::builder(TokioExecutor::new())
			.pool_idle_timeout(CONNECT_TIMEOUT)
			.build(http_connector);
		tokio::time::timeout(READ_TIMEOUT, client.request(req)).await
	};
	match result {
		Ok(Ok(resp)) => Ok(resp),
		Ok(Err(_)) => Err(Error::NetworkError("bad gateway".into())),
		Err(_) => Err(Error::Timeout),
	}
}


// vim: ts=4
