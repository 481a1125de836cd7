//! HTTP client for the board API.
//!
//! Credentials travel as `key` and `token` query parameters on every request.
//! Transient failures are retried a bounded number of times; everything else
//! surfaces immediately as a typed [`EtlError`].

use crate::domain::model::{Board, Card, CardParent, List};
use crate::domain::ports::{CardSource, ConfigProvider};
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.trello.com/1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_PAGE_LIMIT: usize = 100;

const USER_AGENT: &str = concat!("attachment-etl/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct TrelloClient {
    http: Client,
    base_url: Url,
    api_key: String,
    token: String,
    page_limit: usize,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl std::fmt::Debug for TrelloClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrelloClient")
            .field("base_url", &self.base_url.as_str())
            .field("page_limit", &self.page_limit)
            .field("retry_attempts", &self.retry_attempts)
            .finish_non_exhaustive()
    }
}

impl TrelloClient {
    pub fn new(api_key: &str, token: &str, base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url).map_err(|e| EtlError::InvalidConfigValue {
            field: "base_url".to_string(),
            value: base_url.to_string(),
            reason: e.to_string(),
        })?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|source| EtlError::Network {
                call: "client setup".to_string(),
                source,
            })?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
            token: token.to_string(),
            page_limit: DEFAULT_PAGE_LIMIT,
            retry_attempts: 0,
            retry_delay: Duration::ZERO,
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        Ok(Self::new(
            config.api_key(),
            config.token(),
            config.base_url(),
            config.request_timeout(),
        )?
        .with_page_limit(config.page_limit())
        .with_retry(config.retry_attempts(), config.retry_delay()))
    }

    pub fn with_retry(mut self, attempts: u32, delay: Duration) -> Self {
        self.retry_attempts = attempts;
        self.retry_delay = delay;
        self
    }

    /// 只作用在 board 範圍的 cards 端點
    pub fn with_page_limit(mut self, limit: usize) -> Self {
        self.page_limit = limit;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| EtlError::InvalidConfigValue {
                field: "base_url".to_string(),
                value: self.base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        call: &str,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        let mut attempt = 0u32;
        loop {
            match self.send_once(call, url.clone(), query).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "🔁 {} failed ({}), retry {}/{}",
                        call,
                        e,
                        attempt,
                        self.retry_attempts
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once<T: DeserializeOwned>(
        &self,
        call: &str,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T> {
        tracing::debug!("📡 GET {} {:?}", url.path(), query);

        let response = self
            .http
            .get(url)
            .query(&[("key", &self.api_key), ("token", &self.token)])
            .query(query)
            .send()
            .await
            .map_err(|source| EtlError::Network {
                call: call.to_string(),
                source,
            })?;

        let status = response.status();
        tracing::debug!("📡 {} -> {}", call, status);
        if !status.is_success() {
            return Err(EtlError::HttpStatus {
                call: call.to_string(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|source| EtlError::Network {
            call: call.to_string(),
            source,
        })?;

        serde_json::from_slice(&body).map_err(|source| EtlError::Decode {
            call: call.to_string(),
            source,
        })
    }
}

#[async_trait]
impl CardSource for TrelloClient {
    async fn get_board(&self, board_id: &str) -> Result<Board> {
        let url = self.endpoint(&["boards", board_id])?;
        self.get_json(&format!("get_board({})", board_id), url, &[])
            .await
    }

    async fn get_lists(&self, board_id: &str) -> Result<Vec<List>> {
        let url = self.endpoint(&["boards", board_id, "lists"])?;
        self.get_json(&format!("get_lists({})", board_id), url, &[])
            .await
    }

    async fn get_cards(&self, parent: &CardParent, before: Option<&str>) -> Result<Vec<Card>> {
        let mut query = vec![("attachments", "true".to_string())];
        let url = match parent {
            CardParent::List(id) => self.endpoint(&["lists", id.as_str(), "cards"])?,
            CardParent::Board(id) => {
                query.push(("limit", self.page_limit.to_string()));
                self.endpoint(&["boards", id.as_str(), "cards"])?
            }
        };
        if let Some(cursor) = before {
            query.push(("before", cursor.to_string()));
        }

        let call = match before {
            Some(cursor) => format!("get_cards({}, before {})", parent, cursor),
            None => format!("get_cards({})", parent),
        };
        self.get_json(&call, url, &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> TrelloClient {
        TrelloClient::new("test-key", "test-token", &server.base_url(), Duration::from_secs(5))
            .unwrap()
    }

    #[test]
    fn test_debug_hides_credentials() {
        let client =
            TrelloClient::new("secret-key", "secret-token", DEFAULT_BASE_URL, Duration::from_secs(1))
                .unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("TrelloClient"));
        assert!(!debug.contains("secret-key"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_endpoint_with_and_without_trailing_slash() {
        let a = TrelloClient::new("k", "t", "https://api.trello.com/1", Duration::from_secs(1))
            .unwrap();
        let b = TrelloClient::new("k", "t", "https://api.trello.com/1/", Duration::from_secs(1))
            .unwrap();
        assert_eq!(
            a.endpoint(&["boards", "B1"]).unwrap().as_str(),
            "https://api.trello.com/1/boards/B1"
        );
        assert_eq!(
            a.endpoint(&["boards", "B1"]).unwrap(),
            b.endpoint(&["boards", "B1"]).unwrap()
        );
    }

    #[tokio::test]
    async fn test_get_board_sends_credentials_as_query() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/boards/B1")
                .query_param("key", "test-key")
                .query_param("token", "test-token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"id": "B1", "name": "Team"}));
        });

        let board = client(&server).get_board("B1").await.unwrap();

        mock.assert();
        assert_eq!(board.name, "Team");
    }

    #[tokio::test]
    async fn test_get_lists_decodes_in_order() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/boards/B1/lists");
            then.status(200).json_body(serde_json::json!([
                {"id": "L1", "name": "Backlog"},
                {"id": "L2", "name": "Done"}
            ]));
        });

        let lists = client(&server).get_lists("B1").await.unwrap();

        mock.assert();
        let names: Vec<_> = lists.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Backlog", "Done"]);
    }

    #[tokio::test]
    async fn test_get_cards_for_list_with_cursor() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/lists/L1/cards")
                .query_param("attachments", "true")
                .query_param("before", "C5");
            then.status(200).json_body(serde_json::json!([
                {"id": "C4", "name": "Task", "attachments": []}
            ]));
        });

        let cards = client(&server)
            .get_cards(&CardParent::List("L1".to_string()), Some("C5"))
            .await
            .unwrap();

        mock.assert();
        assert_eq!(cards[0].id, "C4");
    }

    #[tokio::test]
    async fn test_get_cards_for_board_sends_limit() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/boards/B1/cards")
                .query_param("attachments", "true")
                .query_param("limit", "3");
            then.status(200).json_body(serde_json::json!([]));
        });

        let cards = client(&server)
            .with_page_limit(3)
            .get_cards(&CardParent::Board("B1".to_string()), None)
            .await
            .unwrap();

        mock.assert();
        assert!(cards.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_decode_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/boards/B1");
            then.status(200).body("<html>not json</html>");
        });

        let err = client(&server).get_board("B1").await.unwrap_err();

        assert!(matches!(err, EtlError::Decode { ref call, .. } if call == "get_board(B1)"));
    }

    #[tokio::test]
    async fn test_server_error_is_retried_until_exhausted() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/boards/B1/lists");
            then.status(503);
        });

        let err = client(&server)
            .with_retry(2, Duration::ZERO)
            .get_lists("B1")
            .await
            .unwrap_err();

        mock.assert_hits(3);
        assert!(matches!(err, EtlError::HttpStatus { status, .. } if status.as_u16() == 503));
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/boards/B1");
            then.status(401);
        });

        let err = client(&server)
            .with_retry(3, Duration::ZERO)
            .get_board("B1")
            .await
            .unwrap_err();

        mock.assert_hits(1);
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_request_timeout_is_network_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/boards/B1");
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(serde_json::json!({"name": "Slow"}));
        });

        let client =
            TrelloClient::new("k", "t", &server.base_url(), Duration::from_millis(50)).unwrap();
        let err = client.get_board("B1").await.unwrap_err();

        assert!(matches!(err, EtlError::Network { ref source, .. } if source.is_timeout()));
    }
}
