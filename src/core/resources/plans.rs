use crate::core::client::GraphQLExecutor;
use crate::core::documents::{GET_PLAN, GET_PLANS};
use crate::domain::model::{Connection, Paginated, Plan};
use crate::utils::error::{FirmhouseError, Result};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlansQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last: Option<u32>,
}

#[derive(Debug, Default, Serialize)]
struct PlanLookup<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    slug: Option<&'a str>,
}

pub struct PlansResource<'a> {
    executor: &'a GraphQLExecutor,
}

impl<'a> PlansResource<'a> {
    pub(crate) fn new(executor: &'a GraphQLExecutor) -> Self {
        Self { executor }
    }

    pub async fn fetch_all(&self, query: &PlansQuery) -> Result<Paginated<Plan>> {
        let connection: Option<Connection<Plan>> = self
            .executor
            .execute_root(&GET_PLANS, query, Vec::new())
            .await?;
        connection
            .map(Paginated::from)
            .ok_or_else(|| FirmhouseError::server("getPlans returned no connection"))
    }

    pub async fn fetch_by_id(&self, id: &str) -> Result<Plan> {
        self.lookup(PlanLookup {
            id: Some(id),
            ..PlanLookup::default()
        })
        .await?
        .ok_or_else(|| FirmhouseError::not_found(format!("Plan {} not found", id)))
    }

    pub async fn fetch_by_slug(&self, slug: &str) -> Result<Plan> {
        self.lookup(PlanLookup {
            slug: Some(slug),
            ..PlanLookup::default()
        })
        .await?
        .ok_or_else(|| FirmhouseError::not_found(format!("Plan '{}' not found", slug)))
    }

    async fn lookup(&self, variables: PlanLookup<'_>) -> Result<Option<Plan>> {
        self.executor
            .execute_root(&GET_PLAN, &variables, Vec::new())
            .await
    }
}
