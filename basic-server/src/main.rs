use std::{env, path, sync::Arc};

use url::Url;

use lockgate::AppBuilder;
use lockgate_settings_adapter_sqlite::SettingsAdapterSqlite;

pub struct Config {
	pub listen: String,
	pub upstream: Url,
	pub db_dir: path::PathBuf,
	pub admin_token: Option<String>,
	pub allow_paths: Vec<String>,
	pub api_prefixes: Option<Vec<String>>,
	pub admin_prefixes: Option<Vec<String>>,
}

fn parse_list(value: &str) -> Vec<String> {
	value.split(',').map(|p| p.trim().to_string()).filter(|p| !p.is_empty()).collect()
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let config = Config {
		listen: env::var("LISTEN").unwrap_or("127.0.0.1:8080".to_string()),
		upstream: Url::parse(
			&env::var("UPSTREAM_URL").unwrap_or("http://127.0.0.1:8081".to_string()),
		)
		.unwrap(),
		db_dir: path::PathBuf::from(env::var("DB_DIR").unwrap_or("./data".to_string())),
		admin_token: env::var("ADMIN_TOKEN").ok(),
		allow_paths: env::var("ALLOW_PATHS").map(|v| parse_list(&v)).unwrap_or_default(),
		api_prefixes: env::var("API_PREFIXES").ok().map(|v| parse_list(&v)),
		admin_prefixes: env::var("ADMIN_PREFIXES").ok().map(|v| parse_list(&v)),
	};

	std::fs::create_dir_all(&config.db_dir).unwrap();
	let settings_adapter =
		Arc::new(SettingsAdapterSqlite::new(config.db_dir.join("settings.db")).await.unwrap());

	let mut builder = AppBuilder::new();
	builder
		.listen(config.listen)
		.upstream(config.upstream)
		.allow_paths(config.allow_paths)
		.settings_adapter(settings_adapter);
	if let Some(token) = config.admin_token {
		builder.admin_token(token);
	}
	if let Some(prefixes) = config.api_prefixes {
		builder.api_prefixes(prefixes);
	}
	if let Some(prefixes) = config.admin_prefixes {
		builder.admin_prefixes(prefixes);
	}

	builder.run().await.unwrap();
}

// vim: ts=4
