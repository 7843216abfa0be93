//! 抓取平台客户端

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::ScraperConfig;
use crate::error::ScraperError;

/// User-Agent string for platform requests.
const USER_AGENT: &str = concat!("company-research/", env!("CARGO_PKG_VERSION"));

/// 远程抓取服务的一次性调用
///
/// 每次调用都同步等待远程运行结束，并返回其数据集条目。
#[async_trait]
pub trait ActorRunner: Send + Sync {
    async fn run_actor(&self, actor_id: &str, input: Value) -> Result<Vec<Value>, ScraperError>;
}

/// 基于 Apify REST API 的抓取平台客户端
#[derive(Clone)]
pub struct ApifyClient {
    http: Client,
    base_url: String,
    token: String,
}

impl ApifyClient {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScraperError> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    /// 构造带鉴权的 POST 请求，`path` 以 `/` 开头
    pub(crate) fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.token)
    }

    /// actor ID 中的 `/` 在 URL 路径中写作 `~`
    fn run_sync_path(actor_id: &str) -> String {
        format!(
            "/v2/acts/{}/run-sync-get-dataset-items",
            actor_id.replace('/', "~")
        )
    }
}

#[async_trait]
impl ActorRunner for ApifyClient {
    #[instrument(skip(self, input))]
    async fn run_actor(&self, actor_id: &str, input: Value) -> Result<Vec<Value>, ScraperError> {
        debug!("starting actor run");

        let response = self
            .post(&Self::run_sync_path(actor_id))
            .json(&input)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ScraperError::RateLimited {
                actor: actor_id.to_string(),
            });
        }

        let body = response.text().await?;
        if !status.is_success() {
            return Err(ScraperError::Status {
                actor: actor_id.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(items)) => {
                debug!(items = items.len(), "actor run finished");
                Ok(items)
            }
            Ok(other) => Err(ScraperError::Decode {
                actor: actor_id.to_string(),
                message: format!("expected a list of dataset items, got {}", type_name(&other)),
            }),
            Err(e) => Err(ScraperError::Decode {
                actor: actor_id.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ApifyClient {
        let config = ScraperConfig {
            api_token: "test-token".to_string(),
            base_url: format!("{}/", server.uri()),
            ..Default::default()
        };
        ApifyClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_run_actor_returns_dataset_items() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(
                "/v2/acts/pratikdani~linkedin-company-profile-scraper/run-sync-get-dataset-items",
            ))
            .and(header("authorization", "Bearer test-token"))
            .and(body_json(json!({"url": "https://linkedin.com/company/acme"})))
            .respond_with(
                ResponseTemplate::new(201).set_body_json(json!([{"name": "Acme"}, {"name": "Other"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let items = client_for(&server)
            .run_actor(
                "pratikdani/linkedin-company-profile-scraper",
                json!({"url": "https://linkedin.com/company/acme"}),
            )
            .await
            .unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["name"], "Acme");
    }

    #[tokio::test]
    async fn test_run_actor_maps_429_to_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .run_actor("apify/website-content-crawler", json!({}))
            .await
            .unwrap_err();

        assert!(err.is_rate_limited());
    }

    #[tokio::test]
    async fn test_run_actor_surfaces_error_status() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .run_actor("apify/website-content-crawler", json!({}))
            .await
            .unwrap_err();

        match err {
            ScraperError::Status { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_run_actor_rejects_non_list_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"output": []})))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .run_actor("apify/website-content-crawler", json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, ScraperError::Decode { .. }));
    }
}
