use crate::core::client::GraphQLExecutor;
use crate::core::documents::{
    Document, APPLY_PROMOTION_TO_SUBSCRIPTION, CANCEL_SUBSCRIPTION, CREATE_ORDERED_PRODUCT,
    DESTROY_ORDERED_PRODUCT, GET_SUBSCRIPTION, GET_SUBSCRIPTION_BY_SELF_SERVICE_CENTER_TOKEN,
    PAUSE_SUBSCRIPTION, RESUME_SUBSCRIPTION, UPDATE_ORDERED_PRODUCT, UPDATE_PLAN,
    UPDATE_SUBSCRIPTION,
};
use crate::core::resources::carts::{AddToCartInput, AddressDetailsInput};
use crate::core::resources::{require_payload, Input, OrderedProductPayload, SubscriptionPayload};
use crate::core::view::IntervalUnit;
use crate::domain::model::{Subscription, SubscriptionMutation};
use crate::utils::error::{FirmhouseError, Result};
use crate::utils::validation::{require_at_least, require_input};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

/// A product to add to an existing subscription.
pub type OrderedProductInput = AddToCartInput;

/// Changes to one line of a subscription; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderedProductInput {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_unit_of_measure: Option<IntervalUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubscriptionInput {
    pub id: String,
    #[serde(flatten)]
    pub details: AddressDetailsInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateOrderedProductInput<'a> {
    subscription_id: &'a str,
    #[serde(flatten)]
    product: &'a OrderedProductInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PauseInput<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    resume_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CancelInput<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancellation_reason: Option<&'a str>,
}

/// Subscription management. Only reachable from a write-access client.
pub struct SubscriptionsResource<'a> {
    executor: &'a GraphQLExecutor,
}

impl<'a> SubscriptionsResource<'a> {
    pub(crate) fn new(executor: &'a GraphQLExecutor) -> Self {
        Self { executor }
    }

    pub async fn get(&self, token: &str) -> Result<Subscription> {
        require_input("token", token)?;
        let subscription: Option<Subscription> = self
            .executor
            .execute_root(&GET_SUBSCRIPTION, &json!({ "token": token }), Vec::new())
            .await?;
        subscription
            .ok_or_else(|| FirmhouseError::not_found(format!("Subscription {} not found", token)))
    }

    /// Looks a subscription up by the login token of the self service center.
    pub async fn get_with_self_service_center_token(&self, token: &str) -> Result<Subscription> {
        require_input("token", token)?;
        let subscription: Option<Subscription> = self
            .executor
            .execute_root(
                &GET_SUBSCRIPTION_BY_SELF_SERVICE_CENTER_TOKEN,
                &json!({ "token": token }),
                Vec::new(),
            )
            .await?;
        subscription.ok_or_else(|| {
            FirmhouseError::not_found("No subscription for this self service center token")
        })
    }

    pub async fn update(&self, input: &UpdateSubscriptionInput) -> Result<Subscription> {
        require_input("id", &input.id)?;
        self.subscription_mutation(&UPDATE_SUBSCRIPTION, &Input { input }).await
    }

    pub async fn add_ordered_product(
        &self,
        subscription_id: &str,
        input: &OrderedProductInput,
    ) -> Result<SubscriptionMutation> {
        require_input("subscriptionId", subscription_id)?;
        input.check()?;
        self.ordered_product_mutation(
            &CREATE_ORDERED_PRODUCT,
            &Input {
                input: CreateOrderedProductInput {
                    subscription_id,
                    product: input,
                },
            },
        )
        .await
    }

    pub async fn update_ordered_product(
        &self,
        input: &UpdateOrderedProductInput,
    ) -> Result<SubscriptionMutation> {
        require_input("id", &input.id)?;
        if let Some(quantity) = input.quantity {
            require_at_least("quantity", i64::from(quantity), 1)?;
        }
        self.ordered_product_mutation(&UPDATE_ORDERED_PRODUCT, &Input { input })
            .await
    }

    pub async fn remove_ordered_product(&self, ordered_product_id: &str) -> Result<Subscription> {
        require_input("orderedProductId", ordered_product_id)?;
        let mutation = self
            .ordered_product_mutation(
                &DESTROY_ORDERED_PRODUCT,
                &Input {
                    input: json!({ "id": ordered_product_id }),
                },
            )
            .await?;
        Ok(mutation.subscription)
    }

    pub async fn update_plan(&self, subscription_id: &str, plan_slug: &str) -> Result<Subscription> {
        require_input("subscriptionId", subscription_id)?;
        require_input("planSlug", plan_slug)?;
        self.subscription_mutation(
            &UPDATE_PLAN,
            &Input {
                input: json!({ "subscriptionId": subscription_id, "planSlug": plan_slug }),
            },
        )
        .await
    }

    pub async fn apply_promotion(&self, subscription_id: &str, promotion_id: &str) -> Result<Subscription> {
        require_input("subscriptionId", subscription_id)?;
        require_input("promotionId", promotion_id)?;
        self.subscription_mutation(
            &APPLY_PROMOTION_TO_SUBSCRIPTION,
            &Input {
                input: json!({ "subscriptionId": subscription_id, "promotionId": promotion_id }),
            },
        )
        .await
    }

    /// Pauses deliveries, optionally until `resume_date`.
    pub async fn pause(&self, id: &str, resume_date: Option<NaiveDate>) -> Result<Subscription> {
        require_input("id", id)?;
        let subscription = self
            .subscription_mutation(&PAUSE_SUBSCRIPTION, &Input { input: PauseInput { id, resume_date } })
            .await?;
        tracing::info!("Paused subscription {} until {:?}", id, resume_date);
        Ok(subscription)
    }

    pub async fn resume(&self, id: &str) -> Result<Subscription> {
        require_input("id", id)?;
        let subscription = self
            .subscription_mutation(&RESUME_SUBSCRIPTION, &Input { input: json!({ "id": id }) })
            .await?;
        tracing::info!("Resumed subscription {}", id);
        Ok(subscription)
    }

    pub async fn cancel(&self, id: &str, reason: Option<&str>) -> Result<Subscription> {
        require_input("id", id)?;
        let input = CancelInput {
            id,
            cancellation_reason: reason.filter(|r| !r.trim().is_empty()),
        };
        let subscription = self
            .subscription_mutation(&CANCEL_SUBSCRIPTION, &Input { input })
            .await?;
        tracing::info!("Cancelled subscription {}", id);
        Ok(subscription)
    }

    async fn subscription_mutation<V: Serialize>(
        &self,
        document: &Document,
        variables: &V,
    ) -> Result<Subscription> {
        let payload: Option<SubscriptionPayload> = self
            .executor
            .execute_root(document, variables, Vec::new())
            .await?;
        require_payload(payload, document.operation_name)?.into_subscription(document.operation_name)
    }

    async fn ordered_product_mutation<V: Serialize>(
        &self,
        document: &Document,
        variables: &V,
    ) -> Result<SubscriptionMutation> {
        let payload: Option<OrderedProductPayload> = self
            .executor
            .execute_root(document, variables, Vec::new())
            .await?;
        let (ordered_product, subscription) =
            require_payload(payload, document.operation_name)?.into_parts(document.operation_name)?;
        Ok(SubscriptionMutation {
            ordered_product,
            subscription,
        })
    }
}
