use crate::config::ClientConfig;
use crate::domain::ports::{GraphQLRequest, GraphQLResponse, GraphQLTransport};
use crate::utils::error::{FirmhouseError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const ACCESS_TOKEN_HEADER: &str = "X-Project-Access-Token";

const BODY_EXCERPT_LEN: usize = 200;

/// GraphQL over HTTP POST, authenticated with a project access token.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut token = HeaderValue::from_str(&config.access_token).map_err(|_| {
            FirmhouseError::InvalidConfigValueError {
                field: "access_token".to_string(),
                value: "<redacted>".to_string(),
                reason: "Token contains characters that are not allowed in a header".to_string(),
            }
        })?;
        token.set_sensitive(true);
        headers.insert(ACCESS_TOKEN_HEADER, token);

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent())
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.base_url.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn excerpt(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(BODY_EXCERPT_LEN) {
        Some((index, _)) => format!("{}…", &trimmed[..index]),
        None => trimmed.to_string(),
    }
}

#[async_trait]
impl GraphQLTransport for HttpTransport {
    async fn execute(&self, request: GraphQLRequest) -> Result<GraphQLResponse> {
        tracing::debug!(
            "Sending {} to {}",
            request.operation_name,
            self.endpoint
        );

        let mut builder = self.client.post(&self.endpoint).json(&request);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!("{} answered with status {}", request.operation_name, status);

        let body = response.text().await?;

        if status.is_success() {
            return Ok(serde_json::from_str(&body)?);
        }

        // Some failures still carry a GraphQL error document worth classifying.
        if let Ok(parsed) = serde_json::from_str::<GraphQLResponse>(&body) {
            if !parsed.errors.is_empty() {
                return Ok(parsed);
            }
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FirmhouseError::server(format!(
                "Unauthorized ({}): check the project access token",
                status.as_u16()
            ))),
            _ => {
                tracing::warn!(
                    "{} failed with status {}",
                    request.operation_name,
                    status
                );
                Err(FirmhouseError::server(format!(
                    "Unexpected HTTP status {}: {}",
                    status.as_u16(),
                    excerpt(&body)
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AccessType;
    use crate::utils::error::ErrorKind;
    use httpmock::prelude::*;
    use serde_json::json;

    fn request() -> GraphQLRequest {
        GraphQLRequest {
            query: "query getProject { getCurrentProject { id } }".to_string(),
            operation_name: "getProject".to_string(),
            variables: json!({}),
            headers: Vec::new(),
        }
    }

    fn transport_for(server: &MockServer) -> HttpTransport {
        let config =
            ClientConfig::new("test-token", AccessType::Storefront).with_base_url(server.url("/graphql"));
        HttpTransport::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_sends_token_header_and_body() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/graphql")
                .header("x-project-access-token", "test-token")
                .header("content-type", "application/json")
                .json_body(json!({
                    "query": "query getProject { getCurrentProject { id } }",
                    "operationName": "getProject",
                    "variables": {}
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(json!({"data": {"getCurrentProject": {"id": "1"}}}));
        });

        let response = transport_for(&server).execute(request()).await.unwrap();

        api_mock.assert();
        assert_eq!(response.data.unwrap()["getCurrentProject"]["id"], "1");
        assert!(response.errors.is_empty());
    }

    #[tokio::test]
    async fn test_per_request_headers_are_sent() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/graphql")
                .header("x-subscription-token", "cart-token");
            then.status(200).json_body(json!({"data": {}}));
        });

        let mut with_header = request();
        with_header
            .headers
            .push(("X-Subscription-Token".to_string(), "cart-token".to_string()));
        transport_for(&server).execute(with_header).await.unwrap();

        api_mock.assert();
    }

    #[tokio::test]
    async fn test_error_status_with_graphql_errors_is_passed_through() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(422).json_body(json!({
                "data": null,
                "errors": [{"message": "Not found", "extensions": {"code": "RECORD_NOT_FOUND"}}]
            }));
        });

        let response = transport_for(&server).execute(request()).await.unwrap();
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].code(), Some("RECORD_NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_unauthorized_is_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(401).body("Unauthorized");
        });

        let error = transport_for(&server).execute(request()).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::Server);
        assert!(error.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_plain_server_failure_reports_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(502).body("<html>Bad gateway</html>");
        });

        let error = transport_for(&server).execute(request()).await.unwrap_err();
        assert!(matches!(error, FirmhouseError::Server { ref message } if message.contains("502")));
    }

    #[tokio::test]
    async fn test_malformed_success_body_is_serialization_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200).body("not json");
        });

        let error = transport_for(&server).execute(request()).await.unwrap_err();
        assert!(matches!(error, FirmhouseError::Serialization(_)));
    }

    #[test]
    fn test_excerpt_truncates_long_bodies() {
        let long = "x".repeat(500);
        let short = excerpt(&long);
        assert_eq!(short.chars().count(), BODY_EXCERPT_LEN + 1);
        assert_eq!(excerpt("  short  "), "short");
    }
}
