use std::fs;

use chrono::{Duration, Utc};
use recent_rhythms::{
    config::{AuthConfig, Credentials},
    error::CacheError,
    management::{FileTokenCache, TokenCache},
    spotify::AuthManager,
    types::TokenSet,
};

fn token(expires_in_secs: i64) -> TokenSet {
    TokenSet {
        access_token: "BQC-access".to_string(),
        refresh_token: Some("AQD-refresh".to_string()),
        expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        token_type: "Bearer".to_string(),
        scope: ["user-read-recently-played", "user-top-read"]
            .into_iter()
            .map(str::to_string)
            .collect(),
    }
}

fn manager(cache: FileTokenCache) -> AuthManager<FileTokenCache> {
    let credentials = Credentials::new("id", "secret", "http://127.0.0.1:8888/callback", ["s"]);
    let config = AuthConfig {
        token_cache: cache.path().clone(),
        ..AuthConfig::default()
    };
    AuthManager::new(credentials, config, cache).unwrap()
}

#[tokio::test]
async fn test_round_trip_is_field_for_field_equal() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileTokenCache::new(dir.path().join("token.json"));

    let original = token(3600);
    cache.store(&original).await.unwrap();
    let loaded = cache.load().await.unwrap();

    assert_eq!(loaded, Some(original));
}

#[tokio::test]
async fn test_missing_file_is_empty_cache() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FileTokenCache::new(dir.path().join("absent.json"));

    assert_eq!(cache.load().await.unwrap(), None);
    // clearing an empty cache is fine
    cache.clear().await.unwrap();
}

#[tokio::test]
async fn test_empty_file_is_not_authenticated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".cache");
    fs::write(&path, "").unwrap();

    let cache = FileTokenCache::new(&path);
    assert_eq!(cache.load().await.unwrap(), None);

    let auth = manager(cache);
    assert!(!auth.is_authenticated().await);
}

#[tokio::test]
async fn test_corrupt_file_is_error_but_not_authenticated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".cache");
    fs::write(&path, "{\"access_token\": \"half").unwrap();

    let cache = FileTokenCache::new(&path);
    assert!(matches!(
        cache.load().await,
        Err(CacheError::Serialization { .. })
    ));

    let auth = manager(cache);
    assert!(!auth.is_authenticated().await);
}

#[tokio::test]
async fn test_store_replaces_and_leaves_no_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/dir/token.json");
    let cache = FileTokenCache::new(&path);

    cache.store(&token(-60)).await.unwrap();
    let newer = token(3600);
    cache.store(&newer).await.unwrap();

    assert_eq!(cache.load().await.unwrap(), Some(newer));

    let entries: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("token.json")]);
}

#[cfg(unix)]
#[tokio::test]
async fn test_cache_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    FileTokenCache::new(&path).store(&token(3600)).await.unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[cfg(unix)]
#[tokio::test]
async fn test_stale_temp_file_does_not_leak_its_mode() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    let stale = dir.path().join("token.json.tmp");
    fs::write(&stale, "left over").unwrap();
    fs::set_permissions(&stale, fs::Permissions::from_mode(0o644)).unwrap();

    FileTokenCache::new(&path).store(&token(3600)).await.unwrap();

    assert!(!stale.exists());
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[tokio::test]
async fn test_failed_replace_cleans_up_temp_file() {
    let dir = tempfile::tempdir().unwrap();
    // a directory where the cache file should be makes the rename fail
    let path = dir.path().join("token.json");
    fs::create_dir(&path).unwrap();

    let result = FileTokenCache::new(&path).store(&token(3600)).await;

    assert!(matches!(result, Err(CacheError::Io { .. })));
    assert!(!dir.path().join("token.json.tmp").exists());
}

#[tokio::test]
async fn test_file_backed_authentication_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".cache");

    let cache = FileTokenCache::new(&path);
    cache.store(&token(-10)).await.unwrap();
    assert!(!manager(FileTokenCache::new(&path)).is_authenticated().await);

    cache.store(&token(600)).await.unwrap();
    assert!(manager(FileTokenCache::new(&path)).is_authenticated().await);

    manager(FileTokenCache::new(&path)).logout().await.unwrap();
    assert!(!path.exists());
}
