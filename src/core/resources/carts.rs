use crate::core::client::GraphQLExecutor;
use crate::core::documents::{
    Document, CREATE_CART, CREATE_ORDERED_PRODUCT, CREATE_SUBSCRIPTION_FROM_CART, DESTROY_ORDERED_PRODUCT,
    GET_SUBSCRIPTION, UPDATE_ADDRESS_DETAILS, UPDATE_ORDERED_PRODUCT_QUANTITY, UPDATE_PLAN,
};
use crate::core::resources::{
    require_payload, subscription_token_header, Input, OrderedProductPayload,
    SubscriptionPayload,
};
use crate::core::view::IntervalUnit;
use crate::domain::model::{Cart, CartMutation, CheckoutResult, Subscription};
use crate::utils::error::{FirmhouseError, Result};
use crate::utils::validation::{require_at_least, require_input, require_url};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

/// A product to put on a cart or subscription.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartInput {
    pub product_id: String,
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_unit_of_measure: Option<IntervalUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl AddToCartInput {
    pub fn new(product_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            ..Self::default()
        }
    }

    pub fn every(mut self, interval: i32, unit: IntervalUnit) -> Self {
        self.interval = Some(interval);
        self.interval_unit_of_measure = Some(unit);
        self
    }

    pub fn only_once(mut self) -> Self {
        self.interval = None;
        self.interval_unit_of_measure = Some(IntervalUnit::OnlyOnce);
        self
    }

    pub fn shipping_on(mut self, date: NaiveDate) -> Self {
        self.shipment_date = Some(date);
        self
    }

    pub(crate) fn check(&self) -> Result<()> {
        require_input("productId", &self.product_id)?;
        require_at_least("quantity", i64::from(self.quantity), 1)?;
        if let Some(interval) = self.interval {
            require_at_least("interval", i64::from(interval), 1)?;
        }
        Ok(())
    }
}

/// Contact and delivery details; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressDetailsInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub house_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zipcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutInput {
    pub return_url: String,
    pub payment_page_url: String,
}

pub struct CartsResource<'a> {
    executor: &'a GraphQLExecutor,
}

impl<'a> CartsResource<'a> {
    pub(crate) fn new(executor: &'a GraphQLExecutor) -> Self {
        Self { executor }
    }

    pub async fn create(&self) -> Result<Cart> {
        let payload: Option<SubscriptionPayload> = self
            .executor
            .execute_root(&CREATE_CART, &json!({}), Vec::new())
            .await?;
        let subscription = require_payload(payload, CREATE_CART.operation_name)?
            .into_subscription(CREATE_CART.operation_name)?;

        if subscription.token.is_none() {
            return Err(FirmhouseError::server("createCart returned a cart without a token"));
        }
        tracing::debug!("Created cart {}", subscription.id);
        Ok(Cart::from(subscription))
    }

    pub async fn get(&self, token: &str) -> Result<Cart> {
        require_input("token", token)?;
        let subscription: Option<Subscription> = self
            .executor
            .execute_root(&GET_SUBSCRIPTION, &json!({ "token": token }), Vec::new())
            .await?;
        subscription
            .map(Cart::from)
            .ok_or_else(|| FirmhouseError::not_found(format!("Cart {} not found", token)))
    }

    /// Resumes the cart behind `token` while it is still a draft, otherwise
    /// starts a fresh one.
    pub async fn get_or_create(&self, token: Option<&str>) -> Result<Cart> {
        let token = match token {
            Some(token) if !token.trim().is_empty() => token,
            _ => return self.create().await,
        };

        match self.get(token).await {
            Ok(cart) if cart.is_draft() => Ok(cart),
            Ok(cart) => {
                tracing::warn!(
                    "Cart {} is no longer a draft ({:?}), starting a new one",
                    cart.id,
                    cart.status
                );
                self.create().await
            }
            Err(e) if e.is_not_found() => {
                tracing::warn!("Cart token is unknown, starting a new cart");
                self.create().await
            }
            Err(e) => Err(e),
        }
    }

    pub async fn add_to_cart(&self, token: &str, input: &AddToCartInput) -> Result<CartMutation> {
        input.check()?;
        self.ordered_product_mutation(&CREATE_ORDERED_PRODUCT, token, &Input { input })
            .await
    }

    pub async fn remove_from_cart(&self, token: &str, ordered_product_id: &str) -> Result<CartMutation> {
        require_input("orderedProductId", ordered_product_id)?;
        self.ordered_product_mutation(
            &DESTROY_ORDERED_PRODUCT,
            token,
            &Input {
                input: json!({ "id": ordered_product_id }),
            },
        )
        .await
    }

    /// Sets the quantity of a cart line. Zero removes the line.
    pub async fn update_quantity(
        &self,
        token: &str,
        ordered_product_id: &str,
        quantity: i32,
    ) -> Result<CartMutation> {
        require_at_least("quantity", i64::from(quantity), 0)?;
        if quantity == 0 {
            return self.remove_from_cart(token, ordered_product_id).await;
        }

        self.ordered_product_mutation(
            &UPDATE_ORDERED_PRODUCT_QUANTITY,
            token,
            &Input {
                input: json!({ "id": ordered_product_id, "quantity": quantity }),
            },
        )
        .await
    }

    pub async fn update_address_details(
        &self,
        token: &str,
        details: &AddressDetailsInput,
    ) -> Result<Cart> {
        self.subscription_mutation(&UPDATE_ADDRESS_DETAILS, token, &Input { input: details })
            .await
    }

    pub async fn update_plan(&self, token: &str, plan_slug: &str) -> Result<Cart> {
        require_input("planSlug", plan_slug)?;
        self.subscription_mutation(
            &UPDATE_PLAN,
            token,
            &Input {
                input: json!({ "planSlug": plan_slug }),
            },
        )
        .await
    }

    /// Turns the cart into a subscription and returns where to pay for it.
    pub async fn create_subscription(&self, token: &str, checkout: &CheckoutInput) -> Result<CheckoutResult> {
        require_input("token", token)?;
        require_url("returnUrl", &checkout.return_url)?;
        require_url("paymentPageUrl", &checkout.payment_page_url)?;

        let payload: Option<SubscriptionPayload> = self
            .executor
            .execute_root(
                &CREATE_SUBSCRIPTION_FROM_CART,
                &Input { input: checkout },
                subscription_token_header(token),
            )
            .await?;

        let result = require_payload(payload, CREATE_SUBSCRIPTION_FROM_CART.operation_name)?
            .into_checkout(CREATE_SUBSCRIPTION_FROM_CART.operation_name)?;
        tracing::debug!("Checkout started for subscription {}", result.subscription.id);
        Ok(result)
    }

    async fn subscription_mutation<V: Serialize>(
        &self,
        document: &Document,
        token: &str,
        variables: &V,
    ) -> Result<Cart> {
        require_input("token", token)?;
        let payload: Option<SubscriptionPayload> = self
            .executor
            .execute_root(document, variables, subscription_token_header(token))
            .await?;
        let subscription = require_payload(payload, document.operation_name)?
            .into_subscription(document.operation_name)?;
        Ok(Cart::from(subscription))
    }

    async fn ordered_product_mutation<V: Serialize>(
        &self,
        document: &Document,
        token: &str,
        variables: &V,
    ) -> Result<CartMutation> {
        require_input("token", token)?;
        let payload: Option<OrderedProductPayload> = self
            .executor
            .execute_root(document, variables, subscription_token_header(token))
            .await?;
        let (ordered_product, subscription) =
            require_payload(payload, document.operation_name)?.into_parts(document.operation_name)?;
        Ok(CartMutation {
            ordered_product,
            cart: Cart::from(subscription),
        })
    }
}
