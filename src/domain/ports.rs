use crate::domain::model::null_as_default;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One GraphQL operation ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,
    pub operation_name: String,
    pub variables: serde_json::Value,
    /// Extra headers for this request only, e.g. the cart token.
    #[serde(skip)]
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: Vec<GraphQLErrorEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GraphQLErrorEntry {
    pub message: String,
    #[serde(default)]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

impl GraphQLErrorEntry {
    pub fn extension(&self, key: &str) -> Option<&serde_json::Value> {
        self.extensions.as_ref().and_then(|ext| ext.get(key))
    }

    pub fn code(&self) -> Option<&str> {
        self.extension("code").and_then(|code| code.as_str())
    }
}

#[async_trait]
pub trait GraphQLTransport: Send + Sync {
    async fn execute(&self, request: GraphQLRequest) -> Result<GraphQLResponse>;
}
