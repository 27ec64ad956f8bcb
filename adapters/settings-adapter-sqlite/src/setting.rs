//! Settings record and globals storage
//!
//! Values are stored as JSON text; type enforcement happens in the
//! settings service, not here.

use std::collections::HashMap;

use sqlx::{Row, SqlitePool};

use crate::utils::*;
use lockgate::prelude::*;

pub(crate) async fn read_setting(
	db: &SqlitePool,
	name: &str,
) -> LgResult<Option<serde_json::Value>> {
	let res = sqlx::query("SELECT value FROM settings WHERE name = ?1")
		.bind(name)
		.fetch_one(db)
		.await;

	match map_res(res, |row| row.try_get::<String, _>("value")) {
		Ok(raw) => {
			let value = serde_json::from_str(&raw)
				.inspect_err(|err| warn!("DB: malformed setting '{}': {}", name, err))
				.map_err(|_| Error::DbError)?;
			Ok(Some(value))
		}
		Err(Error::NotFound) => Ok(None),
		Err(err) => Err(err),
	}
}

pub(crate) async fn update_setting(
	db: &SqlitePool,
	name: &str,
	value: Option<serde_json::Value>,
) -> LgResult<()> {
	match value {
		Some(value) => {
			let raw = serde_json::to_string(&value).map_err(|_| Error::DbError)?;
			sqlx::query(
				"INSERT INTO settings (name, value) VALUES (?1, ?2)
				ON CONFLICT(name) DO UPDATE SET value = ?2, updated_at = unixepoch()",
			)
			.bind(name)
			.bind(&raw)
			.execute(db)
			.await
			.inspect_err(inspect)
			.or(Err(Error::DbError))?;
		}
		None => {
			sqlx::query("DELETE FROM settings WHERE name = ?1")
				.bind(name)
				.execute(db)
				.await
				.inspect_err(inspect)
				.or(Err(Error::DbError))?;
		}
	}
	Ok(())
}

pub(crate) async fn list_settings(
	db: &SqlitePool,
	prefix: Option<&str>,
) -> LgResult<HashMap<String, serde_json::Value>> {
	let rows = match prefix {
		Some(prefix) => {
			sqlx::query("SELECT name, value FROM settings WHERE name LIKE ?1 || '%'")
				.bind(prefix)
				.fetch_all(db)
				.await
		}
		None => sqlx::query("SELECT name, value FROM settings").fetch_all(db).await,
	}
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;

	let mut settings = HashMap::new();
	for row in rows {
		let name: String = row.try_get("name").inspect_err(inspect).map_err(|_| Error::DbError)?;
		let raw: String = row.try_get("value").inspect_err(inspect).map_err(|_| Error::DbError)?;
		match serde_json::from_str(&raw) {
			Ok(value) => {
				settings.insert(name, value);
			}
			// Skip malformed rows instead of failing the whole listing
			Err(err) => warn!("DB: malformed setting '{}': {}", name, err),
		}
	}
	Ok(settings)
}

pub(crate) async fn read_global(db: &SqlitePool, key: &str) -> LgResult<Option<String>> {
	let res = sqlx::query("SELECT value FROM globals WHERE key = ?1")
		.bind(key)
		.fetch_one(db)
		.await;

	match map_res(res, |row| row.try_get("value")) {
		Ok(value) => Ok(Some(value)),
		Err(Error::NotFound) => Ok(None),
		Err(err) => Err(err),
	}
}

pub(crate) async fn update_global(db: &SqlitePool, key: &str, value: &str) -> LgResult<()> {
	sqlx::query(
		"INSERT INTO globals (key, value) VALUES (?1, ?2)
		ON CONFLICT(key) DO UPDATE SET value = ?2, updated_at = unixepoch()",
	)
	.bind(key)
	.bind(value)
	.execute(db)
	.await
	.inspect_err(inspect)
	.or(Err(Error::DbError))?;
	Ok(())
}

// vim: ts=4
