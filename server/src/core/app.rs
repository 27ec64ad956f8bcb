//! App state type

use std::sync::Arc;
use url::Url;

use crate::core::webserver;
use crate::gate::{self, PageRenderer};
use crate::prelude::*;
use crate::routes;
use crate::security;
use crate::settings::{FrozenSettingsRegistry, SettingsRegistry, SettingsService};
use crate::settings_adapter::SettingsAdapter;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const VERSION_KEY: &str = "lockgate_version";
const DEFAULT_CACHE_SIZE: usize = 100;

pub struct AppState {
	pub opts: AppBuilderOpts,
	pub settings: SettingsService,
	pub settings_registry: Arc<FrozenSettingsRegistry>,
	pub settings_adapter: Arc<dyn SettingsAdapter>,
	pub page: PageRenderer,
}

pub type App = Arc<AppState>;

#[derive(Debug)]
pub struct AppBuilderOpts {
	pub listen: Box<str>,
	pub upstream: Option<Url>,
	pub api_prefixes: Box<[Box<str>]>,
	pub admin_prefixes: Box<[Box<str>]>,
	pub allow_paths: Box<[Box<str>]>,
	pub admin_token: Option<Box<str>>,
	pub cache_size: usize,
}

pub struct AppBuilder {
	opts: AppBuilderOpts,
	adapter: Option<Arc<dyn SettingsAdapter>>,
}

impl AppBuilder {
	pub fn new() -> Self {
		AppBuilder {
			opts: AppBuilderOpts {
				listen: "127.0.0.1:8080".into(),
				upstream: None,
				api_prefixes: Box::new([
					"/wp-json/".into(),
					"/graphql".into(),
					"/wp-webhooks/".into(),
				]),
				admin_prefixes: Box::new([
					"/wp-admin/".into(),
					"/wp-login.php".into(),
					"/lockgate/".into(),
				]),
				allow_paths: Box::new([]),
				admin_token: None,
				cache_size: DEFAULT_CACHE_SIZE,
			},
			adapter: None,
		}
	}

	// Opts
	pub fn listen(&mut self, listen: impl Into<Box<str>>) -> &mut Self { self.opts.listen = listen.into(); self }
	pub fn upstream(&mut self, upstream: Url) -> &mut Self { self.opts.upstream = Some(upstream); self }
	pub fn admin_token(&mut self, admin_token: impl Into<Box<str>>) -> &mut Self { self.opts.admin_token = Some(admin_token.into()); self }
	pub fn cache_size(&mut self, cache_size: usize) -> &mut Self { self.opts.cache_size = cache_size; self }
	pub fn api_prefixes(&mut self, api_prefixes: impl IntoIterator<Item = impl Into<Box<str>>>) -> &mut Self {
		self.opts.api_prefixes = api_prefixes.into_iter().map(|p| p.into()).collect();
		self
	}
	pub fn admin_prefixes(&mut self, admin_prefixes: impl IntoIterator<Item = impl Into<Box<str>>>) -> &mut Self {
		self.opts.admin_prefixes = admin_prefixes.into_iter().map(|p| p.into()).collect();
		self
	}
	pub fn allow_paths(&mut self, allow_paths: impl IntoIterator<Item = impl Into<Box<str>>>) -> &mut Self {
		self.opts.allow_paths = allow_paths.into_iter().map(|p| p.into()).collect();
		self
	}

	// Adapters
	pub fn settings_adapter(&mut self, adapter: Arc<dyn SettingsAdapter>) -> &mut Self { self.adapter = Some(adapter); self }

	/// Build the application state without starting the server
	pub fn build(self) -> LgResult<App> {
		if self.opts.upstream.is_none() {
			return Err(Error::ConfigError("No upstream URL configured".into()));
		}
		let adapter = self
			.adapter
			.ok_or_else(|| Error::ConfigError("No settings adapter configured".into()))?;

		let mut registry = SettingsRegistry::new();
		gate::settings::register_settings(&mut registry)?;
		security::settings::register_settings(&mut registry)?;
		let registry = Arc::new(registry.freeze());

		let app: App = Arc::new(AppState {
			settings: SettingsService::new(registry.clone(), adapter.clone(), self.opts.cache_size),
			settings_registry: registry,
			settings_adapter: adapter,
			page: PageRenderer::new()?,
			opts: self.opts,
		});

		Ok(app)
	}

	pub async fn run(self) -> LgResult<()> {
		tracing_subscriber::fmt()
			.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
			.with_target(false)
			.init();
		info!("Lockgate v{}", VERSION);

		let app = self.build()?;
		bootstrap(&app).await?;

		let router = routes::init(app.clone());
		let server = webserver::create_http_server(&app.opts.listen, router).await?;

		server
			.await
			.map_err(|e| Error::Internal(format!("server task failed: {}", e)))??;

		Ok(())
	}
}

impl Default for AppBuilder {
	fn default() -> Self { Self::new() }
}

/// First-start housekeeping: seed the stored record with defaults for any
/// unset setting, and keep the stored version current.
pub async fn bootstrap(app: &App) -> LgResult<()> {
	for def in app.settings_registry.list() {
		if app.settings_adapter.read_setting(&def.key).await?.is_none() {
			debug!("Seeding default for setting '{}'", def.key);
			let value = serde_json::to_value(&def.default)
				.map_err(|e| Error::Internal(format!("failed to serialize default: {}", e)))?;
			app.settings_adapter.update_setting(&def.key, Some(value)).await?;
		}
	}

	let stored = app.settings_adapter.read_global(VERSION_KEY).await?;
	if stored.as_deref() != Some(VERSION) {
		info!("Recording version {} (was {:?})", VERSION, stored);
		app.settings_adapter.update_global(VERSION_KEY, VERSION).await?;
	}

	Ok(())
}

// vim: ts=4
