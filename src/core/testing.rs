use crate::domain::ports::{GraphQLRequest, GraphQLResponse, GraphQLTransport};
use crate::utils::error::{FirmhouseError, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Transport double that records every request and replays queued answers.
pub(crate) struct RecordingTransport {
    responses: Mutex<VecDeque<Result<GraphQLResponse>>>,
    requests: Mutex<Vec<GraphQLRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_data(self, data: serde_json::Value) -> Self {
        self.push(Ok(GraphQLResponse {
            data: Some(data),
            errors: Vec::new(),
        }))
    }

    pub fn with_errors(self, errors: serde_json::Value) -> Self {
        let response: GraphQLResponse =
            serde_json::from_value(serde_json::json!({"data": null, "errors": errors})).unwrap();
        self.push(Ok(response))
    }

    pub fn with_failure(self, error: FirmhouseError) -> Self {
        self.push(Err(error))
    }

    fn push(self, response: Result<GraphQLResponse>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    pub fn requests(&self) -> Vec<GraphQLRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> GraphQLRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl GraphQLTransport for RecordingTransport {
    async fn execute(&self, request: GraphQLRequest) -> Result<GraphQLResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FirmhouseError::server("no response queued")))
    }
}

/// Minimal subscription payload in the shape the documents select.
pub(crate) fn subscription_json(token: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": format!("sub-{}", token),
        "token": token,
        "status": status,
        "currency": "EUR",
        "orderedProducts": [
            {
                "id": "op-1",
                "productId": "prod-1",
                "title": "Coffee beans",
                "quantity": 2,
                "recurring": true,
                "interval": 2,
                "intervalUnitOfMeasure": "weeks",
                "shipmentDate": "2030-01-15",
                "priceIncludingTaxesCents": 1250,
                "totalAmountIncludingTaxCents": 2500
            }
        ]
    })
}
