use easystory_core::config_loader::ConfigLoader;
use easystory_core::runtime_config::{
    PLACEHOLDER_DATABASE_KEY, PLACEHOLDER_DATABASE_URL, RuntimeConfig,
};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn release_defaults() -> RuntimeConfig {
    RuntimeConfig {
        debug: false,
        ..RuntimeConfig::default()
    }
}

#[tokio::test]
async fn test_server_credentials_are_loaded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/client-env"))
        .and(header("cache-control", "no-cache"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"supabase_url": "U", "supabase_key": "K"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let loader = ConfigLoader::new(mock_server.uri(), release_defaults());
    let config = loader.load_config().await;

    assert_eq!(config.database_url, "U");
    assert_eq!(config.database_key, "K");
}

#[tokio::test]
async fn test_request_carries_cache_buster() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/client-env"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock_server)
        .await;

    let loader = ConfigLoader::new(mock_server.uri(), release_defaults());
    loader.load_config().await;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let cache_buster = requests[0]
        .url
        .query_pairs()
        .find(|(key, _)| key == "_")
        .map(|(_, value)| value.into_owned())
        .expect("cache-busting parameter should be present");
    assert!(cache_buster.parse::<i64>().is_ok());
}

#[tokio::test]
async fn test_failing_endpoint_keeps_defaults() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/client-env"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let defaults = RuntimeConfig {
        database_url: "https://seeded.supabase.co".to_string(),
        database_key: "seeded-key".to_string(),
        debug: false,
        ..RuntimeConfig::default()
    };
    let loader = ConfigLoader::new(mock_server.uri(), defaults.clone());

    assert_eq!(loader.load_config().await, defaults);
}

#[tokio::test]
async fn test_malformed_payload_keeps_defaults() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/client-env"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&mock_server)
        .await;

    let loader = ConfigLoader::new(mock_server.uri(), release_defaults());
    assert_eq!(loader.load_config().await, release_defaults());
}

#[tokio::test]
async fn test_unreachable_endpoint_keeps_defaults() {
    let loader = ConfigLoader::new("http://127.0.0.1:1", release_defaults());
    assert_eq!(loader.load_config().await, release_defaults());
}

#[tokio::test]
async fn test_empty_fields_do_not_overwrite() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/client-env"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"supabase_url": "", "supabase_key": "K"})),
        )
        .mount(&mock_server)
        .await;

    let defaults = RuntimeConfig {
        database_url: "https://seeded.supabase.co".to_string(),
        debug: false,
        ..RuntimeConfig::default()
    };
    let loader = ConfigLoader::new(mock_server.uri(), defaults);
    let config = loader.load_config().await;

    assert_eq!(config.database_url, "https://seeded.supabase.co");
    assert_eq!(config.database_key, "K");
}

#[tokio::test]
async fn test_debug_mode_substitutes_placeholders_when_nothing_loaded() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/client-env"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let loader = ConfigLoader::new(mock_server.uri(), RuntimeConfig::default());
    let config = loader.load_config().await;

    assert_eq!(config.database_url, PLACEHOLDER_DATABASE_URL);
    assert_eq!(config.database_key, PLACEHOLDER_DATABASE_KEY);
}

#[tokio::test]
async fn test_ready_fetches_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/config/client-env"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"supabase_url": "U", "supabase_key": "K"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let loader = ConfigLoader::new(mock_server.uri(), release_defaults());
    assert!(!loader.is_ready());

    let (first, second) = tokio::join!(loader.ready(), loader.ready());
    let third = loader.ready().await;

    assert!(loader.is_ready());
    assert_eq!(first.database_url, "U");
    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert!(std::sync::Arc::ptr_eq(&first, &third));
}
