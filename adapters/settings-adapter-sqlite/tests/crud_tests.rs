//! Settings adapter CRUD tests

use serde_json::json;
use tempfile::TempDir;

use lockgate::settings_adapter::SettingsAdapter;
use lockgate_settings_adapter_sqlite::SettingsAdapterSqlite;

async fn create_test_adapter() -> (SettingsAdapterSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let adapter = SettingsAdapterSqlite::new(temp_dir.path().join("settings.db"))
		.await
		.expect("Failed to create adapter");
	(adapter, temp_dir)
}

#[tokio::test]
async fn test_read_missing_setting() {
	let (adapter, _temp) = create_test_adapter().await;

	let value = adapter.read_setting("gate.redirect_url").await.expect("read");
	assert_eq!(value, None);
}

#[tokio::test]
async fn test_update_and_read_setting() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter
		.update_setting("gate.redirect_url", Some(json!("https://app.example.com")))
		.await
		.expect("update");
	let value = adapter.read_setting("gate.redirect_url").await.expect("read");
	assert_eq!(value, Some(json!("https://app.example.com")));

	// Overwrite keeps a single row
	adapter
		.update_setting("gate.redirect_url", Some(json!("https://other.example.com")))
		.await
		.expect("update");
	let value = adapter.read_setting("gate.redirect_url").await.expect("read");
	assert_eq!(value, Some(json!("https://other.example.com")));
}

#[tokio::test]
async fn test_value_types_round_trip() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.update_setting("gate.redirect_enabled", Some(json!(true))).await.expect("update");
	adapter.update_setting("gate.cache_ttl", Some(json!(300))).await.expect("update");

	assert_eq!(
		adapter.read_setting("gate.redirect_enabled").await.expect("read"),
		Some(json!(true))
	);
	assert_eq!(adapter.read_setting("gate.cache_ttl").await.expect("read"), Some(json!(300)));
}

#[tokio::test]
async fn test_delete_setting() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.update_setting("gate.message", Some(json!("Hello"))).await.expect("update");
	adapter.update_setting("gate.message", None).await.expect("delete");

	let value = adapter.read_setting("gate.message").await.expect("read");
	assert_eq!(value, None);

	// Deleting a missing setting is not an error
	adapter.update_setting("gate.message", None).await.expect("delete");
}

#[tokio::test]
async fn test_list_settings_with_prefix() {
	let (adapter, _temp) = create_test_adapter().await;

	adapter.update_setting("gate.message", Some(json!("Hello"))).await.expect("update");
	adapter.update_setting("gate.page_title", Some(json!("Title"))).await.expect("update");
	adapter.update_setting("security.block_feeds", Some(json!(false))).await.expect("update");

	let all = adapter.list_settings(None).await.expect("list");
	assert_eq!(all.len(), 3);

	let gate = adapter.list_settings(Some("gate.")).await.expect("list");
	assert_eq!(gate.len(), 2);
	assert_eq!(gate.get("gate.message"), Some(&json!("Hello")));
	assert!(!gate.contains_key("security.block_feeds"));
}

#[tokio::test]
async fn test_globals() {
	let (adapter, _temp) = create_test_adapter().await;

	assert_eq!(adapter.read_global("lockgate_version").await.expect("read"), None);

	adapter.update_global("lockgate_version", "0.3.2").await.expect("update");
	assert_eq!(
		adapter.read_global("lockgate_version").await.expect("read").as_deref(),
		Some("0.3.2")
	);

	adapter.update_global("lockgate_version", "0.4.0").await.expect("update");
	assert_eq!(
		adapter.read_global("lockgate_version").await.expect("read").as_deref(),
		Some("0.4.0")
	);
}

#[tokio::test]
async fn test_persistence_across_reopen() {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let path = temp_dir.path().join("settings.db");

	{
		let adapter = SettingsAdapterSqlite::new(&path).await.expect("create");
		adapter.update_setting("gate.message", Some(json!("Persisted"))).await.expect("update");
	}

	let adapter = SettingsAdapterSqlite::new(&path).await.expect("reopen");
	let value = adapter.read_setting("gate.message").await.expect("read");
	assert_eq!(value, Some(json!("Persisted")));
}
