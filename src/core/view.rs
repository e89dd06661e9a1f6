//! Derived fields computed on top of API records.

use crate::domain::model::{Cart, OrderedProduct, Subscription};
use crate::utils::error::{FirmhouseError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Unit of an ordered product's delivery interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    Days,
    Weeks,
    Months,
    Years,
    OnlyOnce,
    /// Delivered along with the plan's own schedule.
    Default,
}

impl IntervalUnit {
    fn singular(&self) -> &'static str {
        match self {
            IntervalUnit::Days => "day",
            IntervalUnit::Weeks => "week",
            IntervalUnit::Months => "month",
            IntervalUnit::Years => "year",
            IntervalUnit::OnlyOnce => "only once",
            IntervalUnit::Default => "default",
        }
    }
}

impl fmt::Display for IntervalUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IntervalUnit::Days => "days",
            IntervalUnit::Weeks => "weeks",
            IntervalUnit::Months => "months",
            IntervalUnit::Years => "years",
            IntervalUnit::OnlyOnce => "only_once",
            IntervalUnit::Default => "default",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for IntervalUnit {
    type Err = FirmhouseError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(IntervalUnit::Days),
            "week" | "weeks" => Ok(IntervalUnit::Weeks),
            "month" | "months" => Ok(IntervalUnit::Months),
            "year" | "years" => Ok(IntervalUnit::Years),
            "only_once" | "once" => Ok(IntervalUnit::OnlyOnce),
            "default" | "" => Ok(IntervalUnit::Default),
            other => Err(FirmhouseError::InvalidConfigValueError {
                field: "intervalUnitOfMeasure".to_string(),
                value: other.to_string(),
                reason: "Expected days, weeks, months, years, only_once or default".to_string(),
            }),
        }
    }
}

/// How often an ordered product ships.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    OnlyOnce,
    FollowsPlan,
    Every { interval: u32, unit: IntervalUnit },
}

impl Frequency {
    pub fn describe(&self) -> String {
        match self {
            Frequency::OnlyOnce => "only once".to_string(),
            Frequency::FollowsPlan => "follows plan".to_string(),
            Frequency::Every { interval: 1, unit } => format!("every {}", unit.singular()),
            Frequency::Every { interval, unit } => format!("every {} {}", interval, unit),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.describe())
    }
}

impl OrderedProduct {
    /// Unknown units fall back to the plan's schedule.
    pub fn interval_unit(&self) -> Option<IntervalUnit> {
        self.interval_unit_of_measure
            .as_deref()
            .map(|raw| raw.parse().unwrap_or(IntervalUnit::Default))
    }

    pub fn frequency(&self) -> Frequency {
        if self.recurring == Some(false) {
            return Frequency::OnlyOnce;
        }

        match (self.interval_unit(), self.interval) {
            (Some(IntervalUnit::OnlyOnce), _) => Frequency::OnlyOnce,
            (Some(IntervalUnit::Default), _) | (None, _) => Frequency::FollowsPlan,
            (Some(unit), Some(interval)) if interval > 0 => Frequency::Every {
                interval: interval as u32,
                unit,
            },
            (Some(_), _) => Frequency::FollowsPlan,
        }
    }

    pub fn is_recurring(&self) -> bool {
        self.frequency() != Frequency::OnlyOnce
    }

    pub fn is_one_time(&self) -> bool {
        !self.is_recurring()
    }

    /// Line total, falling back to unit price times quantity.
    pub fn total_cents(&self) -> i64 {
        self.total_amount_including_tax_cents.unwrap_or_else(|| {
            self.price_including_taxes_cents.unwrap_or(0) * i64::from(self.quantity)
        })
    }
}

impl Subscription {
    /// Earliest shipment date on or after `today`.
    pub fn closest_upcoming_shipment_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        self.ordered_products
            .iter()
            .filter_map(|p| p.shipment_date)
            .filter(|date| *date >= today)
            .min()
    }

    /// Ordered products grouped by shipment date, skipping dates before `today`.
    pub fn upcoming_shipments(&self, today: NaiveDate) -> BTreeMap<NaiveDate, Vec<&OrderedProduct>> {
        let mut shipments: BTreeMap<NaiveDate, Vec<&OrderedProduct>> = BTreeMap::new();
        for product in &self.ordered_products {
            if let Some(date) = product.shipment_date.filter(|date| *date >= today) {
                shipments.entry(date).or_default().push(product);
            }
        }
        shipments
    }
}

impl Cart {
    pub fn item_count(&self) -> i64 {
        self.ordered_products
            .iter()
            .map(|p| i64::from(p.quantity))
            .sum()
    }

    pub fn subtotal_cents(&self) -> i64 {
        self.ordered_products.iter().map(OrderedProduct::total_cents).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_products.is_empty()
    }

    pub fn find_by_product(&self, product_id: &str) -> Option<&OrderedProduct> {
        self.ordered_products.iter().find(|p| {
            p.product_id.as_deref() == Some(product_id)
                || p.product.as_ref().map(|product| product.id.as_str()) == Some(product_id)
        })
    }
}

/// Formats an amount in cents as `"12.50 EUR"`.
pub fn format_cents(cents: i64, currency: &str) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02} {}", sign, abs / 100, abs % 100, currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ordered_product(value: serde_json::Value) -> OrderedProduct {
        serde_json::from_value(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_interval_unit_accepts_singular_and_plural() {
        assert_eq!("week".parse::<IntervalUnit>().unwrap(), IntervalUnit::Weeks);
        assert_eq!("Months".parse::<IntervalUnit>().unwrap(), IntervalUnit::Months);
        assert_eq!("only_once".parse::<IntervalUnit>().unwrap(), IntervalUnit::OnlyOnce);
        assert!("fortnight".parse::<IntervalUnit>().is_err());
    }

    #[test]
    fn test_interval_unit_serializes_like_the_api() {
        assert_eq!(serde_json::to_value(IntervalUnit::OnlyOnce).unwrap(), json!("only_once"));
        assert_eq!(IntervalUnit::Weeks.to_string(), "weeks");
    }

    #[test]
    fn test_frequency_classification() {
        let every_two_weeks = ordered_product(json!({
            "id": "1", "quantity": 1, "recurring": true, "interval": 2, "intervalUnitOfMeasure": "weeks"
        }));
        let monthly = ordered_product(json!({
            "id": "2", "quantity": 1, "interval": 1, "intervalUnitOfMeasure": "month"
        }));
        let once = ordered_product(json!({
            "id": "3", "quantity": 1, "recurring": false, "interval": 1, "intervalUnitOfMeasure": "months"
        }));
        let plan = ordered_product(json!({"id": "4", "quantity": 1, "intervalUnitOfMeasure": "default"}));
        let only_once_unit = ordered_product(json!({"id": "5", "quantity": 1, "intervalUnitOfMeasure": "only_once"}));

        assert_eq!(
            every_two_weeks.frequency(),
            Frequency::Every { interval: 2, unit: IntervalUnit::Weeks }
        );
        assert_eq!(every_two_weeks.frequency().describe(), "every 2 weeks");
        assert_eq!(monthly.frequency().to_string(), "every month");
        assert_eq!(once.frequency(), Frequency::OnlyOnce);
        assert!(once.is_one_time());
        assert_eq!(plan.frequency(), Frequency::FollowsPlan);
        assert!(plan.is_recurring());
        assert!(only_once_unit.is_one_time());
    }

    #[test]
    fn test_unknown_unit_follows_plan() {
        let product = ordered_product(json!({"id": "1", "quantity": 1, "interval": 3, "intervalUnitOfMeasure": "lunar_cycles"}));
        assert_eq!(product.frequency(), Frequency::FollowsPlan);
    }

    fn subscription() -> Subscription {
        serde_json::from_value(json!({
            "id": "s",
            "status": "activated",
            "orderedProducts": [
                {"id": "past", "quantity": 1, "shipmentDate": "2030-01-01"},
                {"id": "a", "quantity": 1, "shipmentDate": "2030-02-01"},
                {"id": "b", "quantity": 2, "shipmentDate": "2030-01-20"},
                {"id": "c", "quantity": 1, "shipmentDate": "2030-02-01"},
                {"id": "undated", "quantity": 1}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_closest_upcoming_shipment_date() {
        let subscription = subscription();
        assert_eq!(
            subscription.closest_upcoming_shipment_date(date(2030, 1, 10)),
            Some(date(2030, 1, 20))
        );
        assert_eq!(
            subscription.closest_upcoming_shipment_date(date(2030, 1, 20)),
            Some(date(2030, 1, 20))
        );
        assert_eq!(subscription.closest_upcoming_shipment_date(date(2031, 1, 1)), None);
    }

    #[test]
    fn test_upcoming_shipments_grouped_and_sorted() {
        let subscription = subscription();
        let shipments = subscription.upcoming_shipments(date(2030, 1, 10));

        let dates: Vec<NaiveDate> = shipments.keys().copied().collect();
        assert_eq!(dates, vec![date(2030, 1, 20), date(2030, 2, 1)]);

        let ids: Vec<&str> = shipments[&date(2030, 2, 1)].iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_cart_totals() {
        let cart: Cart = serde_json::from_value(json!({
            "id": "c",
            "status": "draft",
            "orderedProducts": [
                {"id": "1", "productId": "p1", "quantity": 2, "totalAmountIncludingTaxCents": 2500},
                {"id": "2", "quantity": 3, "priceIncludingTaxesCents": 300, "product": {"id": "p2"}}
            ]
        }))
        .unwrap();

        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.subtotal_cents(), 3400);
        assert!(!cart.is_empty());
        assert_eq!(cart.find_by_product("p2").map(|p| p.id.as_str()), Some("2"));
        assert!(cart.find_by_product("p3").is_none());
    }

    #[test]
    fn test_empty_cart() {
        let cart: Cart = serde_json::from_value(json!({"id": "c", "orderedProducts": null})).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
        assert_eq!(cart.subtotal_cents(), 0);
    }

    #[test]
    fn test_format_cents() {
        assert_eq!(format_cents(1250, "EUR"), "12.50 EUR");
        assert_eq!(format_cents(5, "USD"), "0.05 USD");
        assert_eq!(format_cents(-1999, "EUR"), "-19.99 EUR");
    }
}
