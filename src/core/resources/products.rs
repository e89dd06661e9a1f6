use crate::core::client::GraphQLExecutor;
use crate::core::documents::{GET_PRODUCT, GET_PRODUCTS};
use crate::domain::model::{Connection, Paginated, Product};
use crate::utils::error::{FirmhouseError, Result};
use serde::Serialize;

/// Filters and cursor arguments for listing products.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopify_variant_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl ProductsQuery {
    pub fn first(count: u32) -> Self {
        Self {
            first: Some(count),
            ..Self::default()
        }
    }

    pub fn after(mut self, cursor: impl Into<String>) -> Self {
        self.after = Some(cursor.into());
        self
    }
}

#[derive(Debug, Serialize)]
struct ProductIdVariables<'a> {
    id: &'a str,
}

pub struct ProductsResource<'a> {
    executor: &'a GraphQLExecutor,
}

impl<'a> ProductsResource<'a> {
    pub(crate) fn new(executor: &'a GraphQLExecutor) -> Self {
        Self { executor }
    }

    pub async fn fetch_all(&self, query: &ProductsQuery) -> Result<Paginated<Product>> {
        let connection: Option<Connection<Product>> = self
            .executor
            .execute_root(&GET_PRODUCTS, query, Vec::new())
            .await?;

        let page = connection
            .map(Paginated::from)
            .ok_or_else(|| FirmhouseError::server("getProducts returned no connection"))?;
        tracing::debug!("Fetched {} of {} products", page.results.len(), page.total);
        Ok(page)
    }

    pub async fn fetch_by_id(&self, id: &str) -> Result<Product> {
        let product: Option<Product> = self
            .executor
            .execute_root(&GET_PRODUCT, &ProductIdVariables { id }, Vec::new())
            .await?;
        product.ok_or_else(|| FirmhouseError::not_found(format!("Product {} not found", id)))
    }

    pub async fn fetch_by_sku(&self, sku: &str) -> Result<Product> {
        let query = ProductsQuery {
            first: Some(1),
            sku: Some(sku.to_string()),
            ..ProductsQuery::default()
        };
        self.first_match(&query, || format!("Product with SKU {} not found", sku))
            .await
    }

    pub async fn fetch_by_shopify_variant_id(&self, variant_id: &str) -> Result<Product> {
        let query = ProductsQuery {
            first: Some(1),
            shopify_variant_id: Some(variant_id.to_string()),
            ..ProductsQuery::default()
        };
        self.first_match(&query, || {
            format!("Product with Shopify variant {} not found", variant_id)
        })
        .await
    }

    async fn first_match(
        &self,
        query: &ProductsQuery,
        message: impl FnOnce() -> String,
    ) -> Result<Product> {
        self.fetch_all(query)
            .await?
            .results
            .into_iter()
            .next()
            .ok_or_else(|| FirmhouseError::not_found(message()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::RecordingTransport;
    use crate::core::{FirmhouseClient, Storefront};
    use crate::utils::error::ErrorKind;
    use serde_json::json;
    use std::sync::Arc;

    fn products_page(nodes: serde_json::Value) -> serde_json::Value {
        json!({
            "products": {
                "totalCount": 42,
                "pageInfo": {"startCursor": "MA", "endCursor": "MQ", "hasNextPage": true, "hasPreviousPage": false},
                "nodes": nodes
            }
        })
    }

    #[tokio::test]
    async fn test_fetch_all_sends_only_given_arguments() {
        let transport = Arc::new(RecordingTransport::new().with_data(products_page(json!([
            {"id": "1", "title": "Beans", "priceCents": 1250},
            {"id": "2", "title": "Filter", "priceCents": 300}
        ]))));
        let client = FirmhouseClient::<Storefront>::with_transport(transport.clone());

        let page = client
            .products()
            .fetch_all(&ProductsQuery::first(2).after("MA"))
            .await
            .unwrap();

        assert_eq!(page.total, 42);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].price_cents, Some(1250));
        assert!(page.page_info.has_next_page);

        let request = transport.last_request();
        assert_eq!(request.operation_name, "getProducts");
        assert_eq!(request.variables, json!({"first": 2, "after": "MA"}));
    }

    #[tokio::test]
    async fn test_fetch_by_id() {
        let transport = Arc::new(RecordingTransport::new().with_data(json!({
            "getProduct": {"id": "99", "title": "Grinder", "sku": "GR-1"}
        })));
        let client = FirmhouseClient::<Storefront>::with_transport(transport.clone());

        let product = client.products().fetch_by_id("99").await.unwrap();

        assert_eq!(product.sku.as_deref(), Some("GR-1"));
        assert_eq!(transport.last_request().variables, json!({"id": "99"}));
    }

    #[tokio::test]
    async fn test_fetch_by_id_null_is_not_found() {
        let transport = Arc::new(RecordingTransport::new().with_data(json!({"getProduct": null})));
        let client = FirmhouseClient::<Storefront>::with_transport(transport);

        let error = client.products().fetch_by_id("404").await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert!(error.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_fetch_by_sku_filters_and_takes_first() {
        let transport = Arc::new(
            RecordingTransport::new().with_data(products_page(json!([{"id": "5", "sku": "BEAN-1"}]))),
        );
        let client = FirmhouseClient::<Storefront>::with_transport(transport.clone());

        let product = client.products().fetch_by_sku("BEAN-1").await.unwrap();

        assert_eq!(product.id, "5");
        assert_eq!(
            transport.last_request().variables,
            json!({"first": 1, "sku": "BEAN-1"})
        );
    }

    #[tokio::test]
    async fn test_fetch_by_shopify_variant_id_empty_page_is_not_found() {
        let transport = Arc::new(RecordingTransport::new().with_data(products_page(json!([]))));
        let client = FirmhouseClient::<Storefront>::with_transport(transport.clone());

        let error = client
            .products()
            .fetch_by_shopify_variant_id("gid://shopify/ProductVariant/1")
            .await
            .unwrap_err();

        assert_eq!(error.kind(), ErrorKind::NotFound);
        assert_eq!(
            transport.last_request().variables,
            json!({"first": 1, "shopifyVariantId": "gid://shopify/ProductVariant/1"})
        );
    }
}
