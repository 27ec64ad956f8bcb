//! SQLite-backed settings adapter for Lockgate
//!
//! Stores the admin-managed settings record and instance globals in a
//! single SQLite database file. See `lockgate::settings_adapter` for the
//! interface this implements.

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};

use lockgate::prelude::*;
use lockgate::settings_adapter::SettingsAdapter;

mod schema;
mod setting;
mod utils;

#[derive(Debug)]
pub struct SettingsAdapterSqlite {
	db: SqlitePool,
}

impl SettingsAdapterSqlite {
	pub async fn new(path: impl AsRef<Path>) -> LgResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.or(Err(Error::DbError))?;

		schema::init_db(&db).await.inspect_err(|err| warn!("DB: {:#?}", err)).or(Err(Error::DbError))?;

		Ok(Self { db })
	}
}

#[async_trait]
impl SettingsAdapter for SettingsAdapterSqlite {
	async fn read_setting(&self, name: &str) -> LgResult<Option<serde_json::Value>> {
		setting::read_setting(&self.db, name).await
	}

	async fn update_setting(&self, name: &str, value: Option<serde_json::Value>) -> LgResult<()> {
		setting::update_setting(&self.db, name, value).await
	}

	async fn list_settings(
		&self,
		prefix: Option<&str>,
	) -> LgResult<std::collections::HashMap<String, serde_json::Value>> {
		setting::list_settings(&self.db, prefix).await
	}

	async fn read_global(&self, key: &str) -> LgResult<Option<String>> {
		setting::read_global(&self.db, key).await
	}

	async fn update_global(&self, key: &str, value: &str) -> LgResult<()> {
		setting::update_global(&self.db, key, value).await
	}
}

// vim: ts=4
