use stoplist_builder::config::StopListConfig;
use stoplist_builder::source::ClientConfig;

// Only test in this binary: it owns the process environment.
#[test]
fn stoplist_variables_override_client_settings() {
    std::env::set_var("STOPLIST_API_URL", "http://127.0.0.1:9/w/api.php");
    std::env::set_var("STOPLIST_TIMEOUT_MS", "1500");
    std::env::set_var("STOPLIST_RATE_LIMIT_MS", "not-a-number");
    std::env::remove_var("STOPLIST_USER_AGENT");

    let config = StopListConfig::v0().with_env_overrides();
    assert_eq!(config.client.api_url, "http://127.0.0.1:9/w/api.php");
    assert_eq!(config.client.timeout_ms, 1500);
    assert_eq!(config.client.rate_limit_ms, ClientConfig::default().rate_limit_ms);
    assert_eq!(config.client.user_agent, ClientConfig::default().user_agent);
    assert_eq!(config.num_pages, StopListConfig::v0().num_pages);

    assert_eq!(ClientConfig::from_env(), config.client);
}
