use std::env;
use std::thread::sleep;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use super::{PageLookup, PageSource, SourceError};
use crate::document::{Metadata, Page};

pub const DEFAULT_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = concat!(
    "stoplist-builder/",
    env!("CARGO_PKG_VERSION"),
    " (stop list research tool)"
);

const MAIN_NAMESPACE: &str = "0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_url: String,
    pub user_agent: String,
    pub timeout_ms: u64,
    /// Minimum spacing between consecutive requests.
    pub rate_limit_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_ms: 30_000,
            rate_limit_ms: 100,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Replaces fields whose `STOPLIST_*` variable is set and parses.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| env::var(key).ok())
    }

    /// Same as `with_env_overrides`, reading variables through `lookup`.
    pub fn with_overrides_from<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            api_url: string_value(lookup("STOPLIST_API_URL"), self.api_url),
            user_agent: string_value(lookup("STOPLIST_USER_AGENT"), self.user_agent),
            timeout_ms: u64_value(lookup("STOPLIST_TIMEOUT_MS"), self.timeout_ms),
            rate_limit_ms: u64_value(lookup("STOPLIST_RATE_LIMIT_MS"), self.rate_limit_ms),
        }
    }
}

/// Blocking MediaWiki action API client.
pub struct MediaWikiClient {
    client: Client,
    api_url: Url,
    config: ClientConfig,
    last_request_at: Option<Instant>,
    request_count: usize,
}

impl MediaWikiClient {
    pub fn from_env() -> Result<Self, SourceError> {
        Self::new(ClientConfig::from_env())
    }

    pub fn new(config: ClientConfig) -> Result<Self, SourceError> {
        let api_url = Url::parse(&config.api_url).map_err(|e| SourceError::InvalidUrl {
            url: config.api_url.clone(),
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            api_url,
            config,
            last_request_at: None,
            request_count: 0,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request_json_get(&mut self, params: &[(&str, String)]) -> Result<Value, SourceError> {
        let mut pairs = Vec::with_capacity(params.len() + 2);
        pairs.push(("format", "json".to_string()));
        pairs.push(("formatversion", "2".to_string()));
        pairs.extend(params.iter().map(|(k, v)| (*k, v.clone())));

        self.apply_rate_limit();
        trace!(?pairs, "GET {}", self.api_url);

        let response = self
            .client
            .get(self.api_url.clone())
            .query(&pairs)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status(status));
        }

        let payload: Value = response.json()?;
        check_api_error(&payload)?;
        Ok(payload)
    }

    fn apply_rate_limit(&mut self) {
        if let Some(last) = self.last_request_at {
            let elapsed = last.elapsed();
            let required = Duration::from_millis(self.config.rate_limit_ms);
            if elapsed < required {
                sleep(required - elapsed);
            }
        }
        self.last_request_at = Some(Instant::now());
        self.request_count = self.request_count.saturating_add(1);
    }

    fn disambiguation_options(&mut self, title: &str) -> Result<Vec<String>, SourceError> {
        let params = [
            ("action", "query".to_string()),
            ("titles", title.to_string()),
            ("prop", "links".to_string()),
            ("plnamespace", MAIN_NAMESPACE.to_string()),
            ("pllimit", "max".to_string()),
            ("redirects", "1".to_string()),
        ];
        let value = self.request_json_get(&params)?;
        parse_links(value)
    }
}

impl PageSource for MediaWikiClient {
    fn random_titles(&mut self, count: usize) -> Result<Vec<String>, SourceError> {
        let params = [
            ("action", "query".to_string()),
            ("list", "random".to_string()),
            ("rnnamespace", MAIN_NAMESPACE.to_string()),
            ("rnlimit", count.max(1).to_string()),
        ];
        let value = self.request_json_get(&params)?;
        parse_random(value)
    }

    fn search(&mut self, query: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        let params = [
            ("action", "query".to_string()),
            ("list", "search".to_string()),
            ("srsearch", query.to_string()),
            ("srlimit", limit.max(1).to_string()),
            ("srprop", String::new()),
        ];
        let value = self.request_json_get(&params)?;
        parse_search(value)
    }

    fn page(&mut self, title: &str) -> Result<PageLookup, SourceError> {
        let params = [
            ("action", "query".to_string()),
            ("titles", title.to_string()),
            ("prop", "extracts|pageprops".to_string()),
            ("ppprop", "disambiguation".to_string()),
            ("explaintext", "1".to_string()),
            ("redirects", "1".to_string()),
        ];
        let value = self.request_json_get(&params)?;

        match parse_page(value, title)? {
            ParsedPage::Missing { title } => Ok(PageLookup::Missing { title }),
            ParsedPage::Disambiguation { title } => {
                let options = self.disambiguation_options(&title)?;
                debug!(title = %title, options = options.len(), "disambiguation page");
                Ok(PageLookup::Disambiguation { title, options })
            }
            ParsedPage::Article {
                pageid,
                title,
                extract,
            } => {
                let mut metadata = Metadata::new();
                if let Some(id) = pageid {
                    metadata.insert_number(Metadata::PAGE_ID, id);
                }
                metadata.insert_timestamp(Metadata::FETCHED_AT, Utc::now());
                Ok(PageLookup::Found(Page::ingest(
                    title,
                    self.config.api_url.clone(),
                    extract,
                    metadata,
                )))
            }
        }
    }

    fn request_count(&self) -> usize {
        self.request_count
    }
}

fn string_value(value: Option<String>, default: String) -> String {
    value
        .filter(|value| !value.trim().is_empty())
        .unwrap_or(default)
}

fn u64_value(value: Option<String>, default: u64) -> u64 {
    value
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn check_api_error(payload: &Value) -> Result<(), SourceError> {
    if let Some(error) = payload.get("error") {
        let code = error
            .get("code")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error");
        let info = error
            .get("info")
            .and_then(Value::as_str)
            .unwrap_or("unknown info");
        return Err(SourceError::Api {
            code: code.to_string(),
            info: info.to_string(),
        });
    }
    Ok(())
}

#[derive(Debug, PartialEq)]
enum ParsedPage {
    Article {
        pageid: Option<i64>,
        title: String,
        extract: String,
    },
    Disambiguation {
        title: String,
    },
    Missing {
        title: String,
    },
}

fn parse_random(value: Value) -> Result<Vec<String>, SourceError> {
    let parsed: QueryResponse = serde_json::from_value(value)?;
    Ok(parsed.query.random.into_iter().map(|r| r.title).collect())
}

fn parse_search(value: Value) -> Result<Vec<String>, SourceError> {
    let parsed: QueryResponse = serde_json::from_value(value)?;
    Ok(parsed.query.search.into_iter().map(|r| r.title).collect())
}

fn parse_links(value: Value) -> Result<Vec<String>, SourceError> {
    let parsed: QueryResponse = serde_json::from_value(value)?;
    Ok(parsed
        .query
        .pages
        .into_iter()
        .flat_map(|p| p.links)
        .map(|l| l.title)
        .collect())
}

fn parse_page(value: Value, requested: &str) -> Result<ParsedPage, SourceError> {
    let parsed: QueryResponse = serde_json::from_value(value)?;
    let Some(page) = parsed.query.pages.into_iter().next() else {
        return Ok(ParsedPage::Missing {
            title: requested.to_string(),
        });
    };

    let title = page.title.unwrap_or_else(|| requested.to_string());
    if page.missing || page.invalid {
        return Ok(ParsedPage::Missing { title });
    }
    if page
        .pageprops
        .as_ref()
        .is_some_and(|props| props.get("disambiguation").is_some())
    {
        return Ok(ParsedPage::Disambiguation { title });
    }

    Ok(ParsedPage::Article {
        pageid: page.pageid,
        title,
        extract: page.extract.unwrap_or_default(),
    })
}

#[derive(Debug, Deserialize, Default)]
struct QueryResponse {
    #[serde(default)]
    query: QueryPayload,
}

#[derive(Debug, Deserialize, Default)]
struct QueryPayload {
    #[serde(default)]
    random: Vec<TitleItem>,
    #[serde(default)]
    search: Vec<TitleItem>,
    #[serde(default)]
    pages: Vec<PageItem>,
}

#[derive(Debug, Deserialize)]
struct TitleItem {
    title: String,
}

#[derive(Debug, Deserialize, Default)]
struct PageItem {
    #[serde(default)]
    pageid: Option<i64>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    #[serde(default)]
    extract: Option<String>,
    #[serde(default)]
    pageprops: Option<serde_json::Map<String, Value>>,
    #[serde(default)]
    links: Vec<TitleItem>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_random_titles() {
        let value = json!({
            "batchcomplete": true,
            "query": { "random": [ { "id": 12, "ns": 0, "title": "Lake Bled" } ] }
        });
        assert_eq!(parse_random(value).unwrap(), vec!["Lake Bled"]);
    }

    #[test]
    fn parses_search_hits_in_rank_order() {
        let value = json!({
            "query": {
                "searchinfo": { "totalhits": 2 },
                "search": [ { "ns": 0, "title": "Mercury (planet)" }, { "ns": 0, "title": "Mercury" } ]
            }
        });
        assert_eq!(parse_search(value).unwrap(), vec!["Mercury (planet)", "Mercury"]);
    }

    #[test]
    fn empty_search_is_not_an_error() {
        let value = json!({ "batchcomplete": true, "query": { "search": [] } });
        assert!(parse_search(value).unwrap().is_empty());
    }

    #[test]
    fn parses_article_extract() {
        let value = json!({
            "query": {
                "redirects": [ { "from": "Bled lake", "to": "Lake Bled" } ],
                "pages": [ { "pageid": 42, "ns": 0, "title": "Lake Bled", "extract": "Lake Bled is a lake." } ]
            }
        });
        assert_eq!(
            parse_page(value, "Bled lake").unwrap(),
            ParsedPage::Article {
                pageid: Some(42),
                title: "Lake Bled".into(),
                extract: "Lake Bled is a lake.".into(),
            }
        );
    }

    #[test]
    fn detects_disambiguation_pageprop() {
        let value = json!({
            "query": {
                "pages": [ {
                    "pageid": 7, "ns": 0, "title": "Mercury",
                    "extract": "Mercury may refer to:",
                    "pageprops": { "disambiguation": "" }
                } ]
            }
        });
        assert_eq!(
            parse_page(value, "Mercury").unwrap(),
            ParsedPage::Disambiguation {
                title: "Mercury".into()
            }
        );
    }

    #[test]
    fn missing_and_invalid_pages_are_missing() {
        let missing = json!({ "query": { "pages": [ { "ns": 0, "title": "Nope", "missing": true } ] } });
        assert_eq!(
            parse_page(missing, "Nope").unwrap(),
            ParsedPage::Missing { title: "Nope".into() }
        );

        let invalid = json!({ "query": { "pages": [ { "title": "<>", "invalid": true } ] } });
        assert!(matches!(parse_page(invalid, "<>").unwrap(), ParsedPage::Missing { .. }));

        let empty = json!({ "batchcomplete": true });
        assert_eq!(
            parse_page(empty, "Gone").unwrap(),
            ParsedPage::Missing { title: "Gone".into() }
        );
    }

    #[test]
    fn parses_links_from_all_pages() {
        let value = json!({
            "query": {
                "pages": [ {
                    "pageid": 7, "ns": 0, "title": "Mercury",
                    "links": [ { "ns": 0, "title": "Mercury (planet)" }, { "ns": 0, "title": "Mercury (element)" } ]
                } ]
            }
        });
        assert_eq!(
            parse_links(value).unwrap(),
            vec!["Mercury (planet)", "Mercury (element)"]
        );
    }

    #[test]
    fn api_error_payload_is_reported() {
        let value = json!({ "error": { "code": "badvalue", "info": "Unrecognized value" } });
        match check_api_error(&value) {
            Err(SourceError::Api { code, info }) => {
                assert_eq!(code, "badvalue");
                assert_eq!(info, "Unrecognized value");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unparseable_api_url() {
        let config = ClientConfig {
            api_url: "not a url".into(),
            ..ClientConfig::default()
        };
        assert!(matches!(
            MediaWikiClient::new(config),
            Err(SourceError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn overrides_replace_only_set_and_parseable_values() {
        let vars = [
            ("STOPLIST_API_URL", "http://localhost:8080/w/api.php"),
            ("STOPLIST_USER_AGENT", "   "),
            ("STOPLIST_TIMEOUT_MS", " 2500 "),
            ("STOPLIST_RATE_LIMIT_MS", "fast"),
        ];
        let lookup = |key: &str| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        };

        let config = ClientConfig::default().with_overrides_from(lookup);
        assert_eq!(config.api_url, "http://localhost:8080/w/api.php");
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.timeout_ms, 2500);
        assert_eq!(config.rate_limit_ms, ClientConfig::default().rate_limit_ms);
    }

    #[test]
    fn no_overrides_keeps_config() {
        let base = ClientConfig {
            rate_limit_ms: 7,
            ..ClientConfig::default()
        };
        assert_eq!(base.clone().with_overrides_from(|_| None), base);
    }

    #[test]
    fn rate_limit_spaces_consecutive_requests() {
        let config = ClientConfig {
            api_url: "http://localhost/w/api.php".into(),
            rate_limit_ms: 60,
            ..ClientConfig::default()
        };
        let mut client = MediaWikiClient::new(config).unwrap();

        let start = Instant::now();
        client.apply_rate_limit();
        assert!(start.elapsed() < Duration::from_millis(60));
        client.apply_rate_limit();
        assert!(start.elapsed() >= Duration::from_millis(60));
        assert_eq!(client.request_count(), 2);
    }

    #[test]
    fn zero_rate_limit_does_not_wait() {
        let config = ClientConfig {
            api_url: "http://localhost/w/api.php".into(),
            rate_limit_ms: 0,
            ..ClientConfig::default()
        };
        let mut client = MediaWikiClient::new(config).unwrap();

        let start = Instant::now();
        for _ in 0..5 {
            client.apply_rate_limit();
        }
        assert!(start.elapsed() < Duration::from_millis(50));
        assert_eq!(client.request_count(), 5);
    }
}
