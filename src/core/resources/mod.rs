//! Resource groupings of the API. Each resource borrows the client's executor.

pub mod carts;
pub mod discount_codes;
pub mod invoices;
pub mod plans;
pub mod products;
pub mod projects;
pub mod subscriptions;

pub use carts::{AddToCartInput, AddressDetailsInput, CartsResource, CheckoutInput};
pub use discount_codes::DiscountCodesResource;
pub use invoices::{InvoicesQuery, InvoicesResource};
pub use plans::{PlansQuery, PlansResource};
pub use products::{ProductsQuery, ProductsResource};
pub use projects::ProjectsResource;
pub use subscriptions::{
    OrderedProductInput, SubscriptionsResource, UpdateOrderedProductInput,
    UpdateSubscriptionInput,
};

use crate::domain::model::{null_as_default, CheckoutResult, OrderedProduct, Subscription};
use crate::utils::error::{validation_from_payload, FirmhouseError, PayloadError, Result};
use serde::{Deserialize, Serialize};

/// Header identifying the cart a storefront mutation works on.
pub const SUBSCRIPTION_TOKEN_HEADER: &str = "X-Subscription-Token";

pub(crate) fn subscription_token_header(token: &str) -> Vec<(String, String)> {
    vec![(SUBSCRIPTION_TOKEN_HEADER.to_string(), token.to_string())]
}

/// Variables of a mutation taking a single `input` argument.
#[derive(Debug, Serialize)]
pub(crate) struct Input<T: Serialize> {
    pub input: T,
}

/// Mutation payload carrying a subscription.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubscriptionPayload {
    subscription: Option<Subscription>,
    payment_url: Option<String>,
    return_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    errors: Vec<PayloadError>,
}

impl SubscriptionPayload {
    pub fn into_subscription(self, operation: &str) -> Result<Subscription> {
        validation_from_payload(Some(&self.errors))?;
        self.subscription
            .ok_or_else(|| FirmhouseError::server(format!("{} returned no subscription", operation)))
    }

    pub fn into_checkout(self, operation: &str) -> Result<CheckoutResult> {
        let payment_url = self.payment_url.clone();
        let return_url = self.return_url.clone();
        Ok(CheckoutResult {
            payment_url,
            return_url,
            subscription: self.into_subscription(operation)?,
        })
    }
}

/// Mutation payload carrying an ordered product and its subscription.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderedProductPayload {
    ordered_product: Option<OrderedProduct>,
    subscription: Option<Subscription>,
    #[serde(default, deserialize_with = "null_as_default")]
    errors: Vec<PayloadError>,
}

impl OrderedProductPayload {
    pub fn into_parts(self, operation: &str) -> Result<(Option<OrderedProduct>, Subscription)> {
        validation_from_payload(Some(&self.errors))?;
        let subscription = self.subscription.ok_or_else(|| {
            FirmhouseError::server(format!("{} returned no subscription", operation))
        })?;
        Ok((self.ordered_product, subscription))
    }
}

/// Payloads are `null` only when the server gave up without explaining why.
pub(crate) fn require_payload<T>(payload: Option<T>, operation: &str) -> Result<T> {
    payload.ok_or_else(|| FirmhouseError::server(format!("{} returned an empty payload", operation)))
}
