use crate::core::client::GraphQLExecutor;
use crate::core::documents::{APPLY_DISCOUNT_CODE, GET_DISCOUNT_CODE};
use crate::core::resources::{require_payload, subscription_token_header, SubscriptionPayload};
use crate::domain::model::{Cart, DiscountCode};
use crate::utils::error::{FirmhouseError, Result};
use crate::utils::validation::require_input;
use serde::Serialize;
use serde_json::json;

#[derive(Debug, Serialize)]
struct CodeVariables<'a> {
    code: &'a str,
}

pub struct DiscountCodesResource<'a> {
    executor: &'a GraphQLExecutor,
}

impl<'a> DiscountCodesResource<'a> {
    pub(crate) fn new(executor: &'a GraphQLExecutor) -> Self {
        Self { executor }
    }

    pub async fn fetch_by_code(&self, code: &str) -> Result<DiscountCode> {
        require_input("code", code)?;
        let discount: Option<DiscountCode> = self
            .executor
            .execute_root(&GET_DISCOUNT_CODE, &CodeVariables { code }, Vec::new())
            .await?;
        discount.ok_or_else(|| FirmhouseError::not_found(format!("Discount code {} not found", code)))
    }

    /// Applies a discount code to the cart identified by `token`.
    pub async fn apply_to_cart(&self, token: &str, code: &str) -> Result<Cart> {
        require_input("token", token)?;
        require_input("code", code)?;
        let payload: Option<SubscriptionPayload> = self
            .executor
            .execute_root(
                &APPLY_DISCOUNT_CODE,
                &json!({"input": {"code": code}}),
                subscription_token_header(token),
            )
            .await?;

        let subscription = require_payload(payload, APPLY_DISCOUNT_CODE.operation_name)?
            .into_subscription(APPLY_DISCOUNT_CODE.operation_name)?;
        Ok(Cart::from(subscription))
    }
}
