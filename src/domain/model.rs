use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::ops::Deref;

/// Treats an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub currency: Option<String>,
    pub locale: Option<String>,
    pub project_type: Option<String>,
    pub tax_percentage: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub countries: Vec<String>,
    pub checkout_url: Option<String>,
    pub self_service_center_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: Option<String>,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub price_cents: Option<i64>,
    pub price_excluding_taxes_cents: Option<i64>,
    pub tax_percentage: Option<f64>,
    pub shopify_variant_id: Option<String>,
    pub shopify_product_id: Option<String>,
    pub product_type: Option<String>,
    pub supplier: Option<String>,
    pub available: Option<bool>,
    pub interval: Option<i32>,
    pub interval_unit_of_measure: Option<String>,
    pub eligible_for_discount: Option<bool>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanProduct {
    pub id: String,
    pub quantity: Option<i32>,
    pub product: Option<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: String,
    pub name: Option<String>,
    pub slug: Option<String>,
    pub currency: Option<String>,
    pub monthly_amount_cents: Option<i64>,
    pub initial_amount_including_tax_cents: Option<i64>,
    pub minimum_commitment_enabled: Option<bool>,
    pub minimum_commitment_period: Option<i32>,
    pub available: Option<bool>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub plan_products: Vec<PlanProduct>,
}

/// Short plan reference embedded in subscriptions and ordered products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRef {
    pub id: String,
    pub name: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribedPlan {
    pub id: String,
    pub plan: Option<PlanRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Draft,
    Activated,
    Inactive,
    Paused,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderedProduct {
    pub id: String,
    pub product_id: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub quantity: i32,
    pub recurring: Option<bool>,
    pub interval: Option<i32>,
    pub interval_unit_of_measure: Option<String>,
    pub shipment_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub price_including_taxes_cents: Option<i64>,
    pub total_amount_including_tax_cents: Option<i64>,
    pub product: Option<Product>,
    pub plan: Option<PlanRef>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub title: Option<String>,
    pub percentage: Option<f64>,
    pub discount_amount_cents: Option<i64>,
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppliedPromotion {
    pub id: String,
    pub active: Option<bool>,
    pub promotion: Option<Promotion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraFieldAnswer {
    pub id: String,
    pub extra_field_id: Option<String>,
    pub field_name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub token: Option<String>,
    pub status: Option<SubscriptionStatus>,
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub house_number: Option<String>,
    pub zipcode: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub locale: Option<String>,
    pub currency: Option<String>,
    pub amount_for_starting_subscription_cents: Option<i64>,
    pub monthly_amount_cents: Option<i64>,
    pub checkout_url: Option<String>,
    pub self_service_center_url: Option<String>,
    pub activated_at: Option<DateTime<Utc>>,
    pub next_order_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ordered_products: Vec<OrderedProduct>,
    pub subscribed_plan: Option<SubscribedPlan>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub applied_promotions: Vec<AppliedPromotion>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extra_fields: Vec<ExtraFieldAnswer>,
    pub metadata: Option<serde_json::Value>,
}

impl Subscription {
    pub fn is_draft(&self) -> bool {
        self.status == Some(SubscriptionStatus::Draft)
    }
}

/// A subscription that is still in draft and used as the checkout basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart(Subscription);

impl Cart {
    pub fn token(&self) -> Option<&str> {
        self.0.token.as_deref()
    }

    pub fn into_inner(self) -> Subscription {
        self.0
    }
}

impl From<Subscription> for Cart {
    fn from(subscription: Subscription) -> Self {
        Self(subscription)
    }
}

impl Deref for Cart {
    type Target = Subscription;

    fn deref(&self) -> &Subscription {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutation {
    pub ordered_product: Option<OrderedProduct>,
    pub cart: Cart,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionMutation {
    pub ordered_product: Option<OrderedProduct>,
    pub subscription: Subscription,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResult {
    pub payment_url: Option<String>,
    pub return_url: Option<String>,
    pub subscription: Subscription,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Open,
    Paid,
    Credited,
    Cancelled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItem {
    pub id: String,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub total_amount_including_tax_cents: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    pub invoice_number: Option<String>,
    pub status: Option<InvoiceStatus>,
    pub currency: Option<String>,
    pub total_amount_including_tax_cents: Option<i64>,
    pub total_tax_amount_cents: Option<i64>,
    pub subscription_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub due_date: Option<NaiveDate>,
    pub payment_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub invoice_line_items: Vec<InvoiceLineItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountCode {
    pub id: String,
    pub code: String,
    pub active: Option<bool>,
    pub expires_at: Option<NaiveDate>,
    pub promotion: Option<Promotion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
    #[serde(default)]
    pub has_next_page: bool,
    #[serde(default)]
    pub has_previous_page: bool,
}

/// Raw GraphQL connection shape.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
pub struct Connection<T> {
    pub total_count: Option<u64>,
    #[serde(default)]
    pub page_info: PageInfo,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub total: u64,
    pub page_info: PageInfo,
    pub results: Vec<T>,
}

impl<T> From<Connection<T>> for Paginated<T> {
    fn from(connection: Connection<T>) -> Self {
        let total = connection
            .total_count
            .unwrap_or(connection.nodes.len() as u64);
        Self {
            total,
            page_info: connection.page_info,
            results: connection.nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subscription_tolerates_nulls_and_unknown_status() {
        let subscription: Subscription = serde_json::from_value(json!({
            "id": "1",
            "token": "abc",
            "status": "migrated",
            "orderedProducts": null,
            "appliedPromotions": null
        }))
        .unwrap();

        assert_eq!(subscription.status, Some(SubscriptionStatus::Unknown));
        assert!(subscription.ordered_products.is_empty());
        assert!(subscription.applied_promotions.is_empty());
        assert!(!subscription.is_draft());
    }

    #[test]
    fn test_cart_is_transparent_over_subscription() {
        let cart: Cart = serde_json::from_value(json!({
            "id": "7",
            "token": "cart-token",
            "status": "draft",
            "orderedProducts": [
                {"id": "op1", "quantity": 2, "shipmentDate": "2024-05-01"}
            ]
        }))
        .unwrap();

        assert_eq!(cart.token(), Some("cart-token"));
        assert!(cart.is_draft());
        assert_eq!(
            cart.ordered_products[0].shipment_date,
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
    }

    #[test]
    fn test_connection_into_paginated_falls_back_to_node_count() {
        let connection: Connection<Product> = serde_json::from_value(json!({
            "pageInfo": {"endCursor": "MQ", "hasNextPage": true},
            "nodes": [{"id": "1"}, {"id": "2"}]
        }))
        .unwrap();

        let page: Paginated<Product> = connection.into();
        assert_eq!(page.total, 2);
        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor.as_deref(), Some("MQ"));
    }

    fn decode_owned<R: serde::de::DeserializeOwned>(value: serde_json::Value) -> R {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_connection_decodes_as_owned_listing() {
        let plans: Connection<Plan> = decode_owned(json!({"totalCount": 4, "nodes": null}));
        assert_eq!(plans.total_count, Some(4));
        assert!(plans.nodes.is_empty());

        let invoices: Connection<Invoice> = decode_owned(json!({"nodes": [{"id": "inv-1"}]}));
        assert_eq!(invoices.nodes[0].id, "inv-1");
        assert!(!invoices.page_info.has_next_page);
    }
}
