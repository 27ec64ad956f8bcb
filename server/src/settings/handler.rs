//! Settings management handlers
//!
//! The admin HTTP API for the settings record. All routes here are guarded
//! by the admin token middleware (`core::route_auth::require_admin_token`).

use axum::{
	Json,
	extract::{Path, State},
	http::StatusCode,
};
use serde::Deserialize;

use crate::prelude::*;
use crate::settings::types::SettingValue;

/// Response for a single setting with metadata
#[derive(serde::Serialize)]
pub struct SettingResponse {
	pub key: String,
	pub value: SettingValue,
	pub description: String,
}

/// GET /settings - List all settings with their resolved values
pub async fn list_settings(
	State(app): State<App>,
) -> LgResult<(StatusCode, Json<Vec<SettingResponse>>)> {
	let mut settings_response = Vec::new();

	for definition in app.settings_registry.list() {
		if let Ok(value) = app.settings.get(&definition.key).await {
			settings_response.push(SettingResponse {
				key: definition.key.clone(),
				value,
				description: definition.description.clone(),
			});
		}
	}
	settings_response.sort_by(|a, b| a.key.cmp(&b.key));

	Ok((StatusCode::OK, Json(settings_response)))
}

/// GET /settings/{name} - Get a specific setting with metadata
pub async fn get_setting(
	State(app): State<App>,
	Path(name): Path<String>,
) -> LgResult<(StatusCode, Json<SettingResponse>)> {
	let definition = app.settings_registry.get(&name).ok_or(Error::NotFound)?;
	let value = app.settings.get(&name).await?;

	let response = SettingResponse {
		key: definition.key.clone(),
		value,
		description: definition.description.clone(),
	};

	Ok((StatusCode::OK, Json(response)))
}

/// PUT /settings/{name} - Update a setting
#[derive(Deserialize)]
pub struct UpdateSettingRequest {
	pub value: SettingValue,
}

pub async fn update_setting(
	State(app): State<App>,
	Path(name): Path<String>,
	Json(req): Json<UpdateSettingRequest>,
) -> LgResult<(StatusCode, Json<SettingResponse>)> {
	let definition = app.settings_registry.get(&name).ok_or(Error::NotFound)?;

	let setting = app.settings.set(&name, req.value).await?;

	let response = SettingResponse {
		key: definition.key.clone(),
		value: setting.value,
		description: definition.description.clone(),
	};

	Ok((StatusCode::OK, Json(response)))
}

/// DELETE /settings/{name} - Revert a setting to its default
pub async fn delete_setting(
	State(app): State<App>,
	Path(name): Path<String>,
) -> LgResult<StatusCode> {
	if app.settings_registry.get(&name).is_none() {
		return Err(Error::NotFound);
	}

	app.settings.delete(&name).await?;
	Ok(StatusCode::NO_CONTENT)
}

// vim: ts=4
