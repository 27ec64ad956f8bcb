// Webserver implementation

use axum::{Router, ServiceExt, extract::ConnectInfo};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::Service;

use crate::core::utils;
use crate::prelude::*;

pub async fn create_http_server(listen: &str, router: Router)
	-> Result<tokio::task::JoinHandle<Result<(), std::io::Error>>, std::io::Error> {
	let listener = TcpListener::bind(listen).await?;

	let svc = tower::service_fn(move |req: hyper::Request<axum::body::Body>| {
		let router = router.clone();
		async move {
			let start = std::time::Instant::now();
			let req_id = utils::random_id();
			let peer_addr = req
				.extensions()
				.get::<ConnectInfo<SocketAddr>>()
				.map(|a| a.to_string())
				.unwrap_or("-".to_string());
			info!("REQ ({}) [{}] {} {}", &req_id, &peer_addr, req.method(), req.uri().path());

			let res = router.clone().call(req).await;

			let status = res
				.as_ref()
				.map(|r| r.status())
				.unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
			if status.is_client_error() || status.is_server_error() {
				warn!("RES ({}): {} tm:{:?}", &req_id, &status, start.elapsed().as_millis());
			} else {
				info!("RES ({}): {} tm:{:?}", &req_id, &status, start.elapsed().as_millis());
			}

			res
		}
	});

	info!("Listening on HTTP {}", listen);
	let handle = tokio::spawn(async move {
		axum::serve(listener, svc.into_make_service_with_connect_info::<SocketAddr>()).await
	});

	Ok(handle)
}

// vim: ts=4
