use crate::core::client::GraphQLExecutor;
use crate::core::documents::GET_INVOICES;
use crate::domain::model::{Connection, Invoice, InvoiceStatus, Paginated};
use crate::utils::error::{FirmhouseError, Result};
use crate::utils::validation::require_within;
use serde::Serialize;

/// Filters and cursor arguments for listing invoices.
///
/// Line items are only selected when `include_related` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoicesQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InvoiceStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_related: Option<bool>,
}

impl InvoicesQuery {
    pub fn for_subscription(subscription_id: impl Into<String>) -> Self {
        Self {
            subscription_id: Some(subscription_id.into()),
            ..Self::default()
        }
    }
}

/// Invoice listing. Only reachable from a write-access client.
pub struct InvoicesResource<'a> {
    executor: &'a GraphQLExecutor,
}

impl<'a> InvoicesResource<'a> {
    pub(crate) fn new(executor: &'a GraphQLExecutor) -> Self {
        Self { executor }
    }

    pub async fn fetch_all(&self, query: &InvoicesQuery) -> Result<Paginated<Invoice>> {
        if let Some(first) = query.first {
            require_within("first", first, 1, 100)?;
        }
        if let Some(last) = query.last {
            require_within("last", last, 1, 100)?;
        }

        let connection: Option<Connection<Invoice>> = self
            .executor
            .execute_root(&GET_INVOICES, query, Vec::new())
            .await?;
        let page = connection
            .map(Paginated::from)
            .ok_or_else(|| FirmhouseError::server("getInvoices returned no connection"))?;
        tracing::debug!("Fetched {} of {} invoices", page.results.len(), page.total);
        Ok(page)
    }
}
