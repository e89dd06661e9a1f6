use crate::adapters::HttpTransport;
use crate::config::{AccessType, ClientConfig};
use crate::core::documents::Document;
use crate::core::resources::{
    CartsResource, DiscountCodesResource, InvoicesResource, PlansResource, ProductsResource,
    ProjectsResource, SubscriptionsResource,
};
use crate::domain::ports::{GraphQLRequest, GraphQLTransport};
use crate::utils::error::{classify_graphql_errors, FirmhouseError, Result};
use crate::utils::validation::Validate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

mod sealed {
    pub trait Sealed {}
}

/// Compile-time access level of a [`FirmhouseClient`].
pub trait Access: sealed::Sealed + Send + Sync + 'static {
    const ACCESS_TYPE: AccessType;
}

/// Storefront token: catalogue reads and cart operations.
#[derive(Debug, Clone, Copy)]
pub struct Storefront;

/// Write token: everything a storefront token can do, plus subscriptions and invoices.
#[derive(Debug, Clone, Copy)]
pub struct Write;

impl sealed::Sealed for Storefront {}
impl sealed::Sealed for Write {}

impl Access for Storefront {
    const ACCESS_TYPE: AccessType = AccessType::Storefront;
}

impl Access for Write {
    const ACCESS_TYPE: AccessType = AccessType::Write;
}

/// Sends documents through a transport and turns the answer into typed data.
#[derive(Clone)]
pub struct GraphQLExecutor {
    transport: Arc<dyn GraphQLTransport>,
}

impl GraphQLExecutor {
    pub fn new(transport: Arc<dyn GraphQLTransport>) -> Self {
        Self { transport }
    }

    pub async fn execute<V, R>(&self, document: &Document, variables: &V) -> Result<R>
    where
        V: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.execute_with_headers(document, variables, Vec::new()).await
    }

    pub async fn execute_with_headers<V, R>(
        &self,
        document: &Document,
        variables: &V,
        headers: Vec<(String, String)>,
    ) -> Result<R>
    where
        V: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let request = GraphQLRequest {
            query: document.query.to_string(),
            operation_name: document.operation_name.to_string(),
            variables: serde_json::to_value(variables)?,
            headers,
        };

        let response = self.transport.execute(request).await?;

        if !response.errors.is_empty() {
            let error = classify_graphql_errors(&response.errors);
            tracing::debug!(
                "{} returned {} error(s), classified as {:?}",
                document.operation_name,
                response.errors.len(),
                error.kind()
            );
            return Err(error);
        }

        let data = response
            .data
            .filter(|data| !data.is_null())
            .ok_or_else(|| {
                FirmhouseError::server(format!("{} returned no data", document.operation_name))
            })?;

        Ok(serde_json::from_value(data)?)
    }

    /// Executes and pulls the document's root field out of `data`. A `null`
    /// or missing root field comes back as `None`.
    pub async fn execute_root<V, R>(
        &self,
        document: &Document,
        variables: &V,
        headers: Vec<(String, String)>,
    ) -> Result<Option<R>>
    where
        V: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut data: serde_json::Map<String, serde_json::Value> =
            self.execute_with_headers(document, variables, headers).await?;

        match data.remove(document.root_field) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }
}

impl fmt::Debug for GraphQLExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphQLExecutor").finish_non_exhaustive()
    }
}

/// Entry point of the SDK.
///
/// The access parameter decides which resources exist: `subscriptions()` and
/// `invoices()` are only available on a `FirmhouseClient<Write>`.
///
/// ```no_run
/// # async fn run() -> firmhouse_sdk::Result<()> {
/// use firmhouse_sdk::{AccessType, ClientConfig, FirmhouseClient, Write};
///
/// let config = ClientConfig::new("project-token", AccessType::Write);
/// let client = FirmhouseClient::<Write>::new(config)?;
/// let subscription = client.subscriptions().get("subscription-token").await?;
/// println!("{:?}", subscription.status);
/// # Ok(())
/// # }
/// ```
pub struct FirmhouseClient<A: Access = Storefront> {
    executor: GraphQLExecutor,
    _access: PhantomData<A>,
}

impl<A: Access> Clone for FirmhouseClient<A> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            _access: PhantomData,
        }
    }
}

impl<A: Access> fmt::Debug for FirmhouseClient<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirmhouseClient")
            .field("access_type", &A::ACCESS_TYPE)
            .finish()
    }
}

impl<A: Access> FirmhouseClient<A> {
    /// Builds a client talking HTTP to the configured endpoint.
    ///
    /// A write client refuses a config that only holds a storefront token. A
    /// storefront client accepts either token.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        if A::ACCESS_TYPE == AccessType::Write && config.access_type != AccessType::Write {
            return Err(FirmhouseError::AccessDenied {
                operation: "FirmhouseClient::<Write>::new".to_string(),
            });
        }

        let transport = HttpTransport::new(&config)?;
        tracing::debug!(
            "Created {} client for {}",
            A::ACCESS_TYPE,
            transport.endpoint()
        );
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn GraphQLTransport>) -> Self {
        Self {
            executor: GraphQLExecutor::new(transport),
            _access: PhantomData,
        }
    }

    pub fn access_type(&self) -> AccessType {
        A::ACCESS_TYPE
    }

    /// Runs an arbitrary document, for operations the resources do not cover.
    pub async fn execute<V, R>(&self, document: &Document, variables: &V) -> Result<R>
    where
        V: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.executor.execute(document, variables).await
    }

    pub fn projects(&self) -> ProjectsResource<'_> {
        ProjectsResource::new(&self.executor)
    }

    pub fn products(&self) -> ProductsResource<'_> {
        ProductsResource::new(&self.executor)
    }

    pub fn plans(&self) -> PlansResource<'_> {
        PlansResource::new(&self.executor)
    }

    pub fn carts(&self) -> CartsResource<'_> {
        CartsResource::new(&self.executor)
    }

    pub fn discount_codes(&self) -> DiscountCodesResource<'_> {
        DiscountCodesResource::new(&self.executor)
    }
}

impl FirmhouseClient<Write> {
    pub fn subscriptions(&self) -> SubscriptionsResource<'_> {
        SubscriptionsResource::new(&self.executor)
    }

    pub fn invoices(&self) -> InvoicesResource<'_> {
        InvoicesResource::new(&self.executor)
    }

    /// Drops write access, e.g. before handing the client to storefront code.
    pub fn into_storefront(self) -> FirmhouseClient<Storefront> {
        FirmhouseClient {
            executor: self.executor,
            _access: PhantomData,
        }
    }
}

/// A client whose access level is only known at runtime.
#[derive(Debug, Clone)]
pub enum ConfiguredClient {
    Storefront(FirmhouseClient<Storefront>),
    Write(FirmhouseClient<Write>),
}

impl ConfiguredClient {
    pub fn connect(config: ClientConfig) -> Result<Self> {
        match config.access_type {
            AccessType::Storefront => Ok(Self::Storefront(FirmhouseClient::new(config)?)),
            AccessType::Write => Ok(Self::Write(FirmhouseClient::new(config)?)),
        }
    }

    pub fn access_type(&self) -> AccessType {
        match self {
            Self::Storefront(_) => AccessType::Storefront,
            Self::Write(_) => AccessType::Write,
        }
    }

    /// The storefront view, available for both access levels.
    pub fn storefront(&self) -> FirmhouseClient<Storefront> {
        match self {
            Self::Storefront(client) => client.clone(),
            Self::Write(client) => client.clone().into_storefront(),
        }
    }

    pub fn require_write(&self, operation: &str) -> Result<&FirmhouseClient<Write>> {
        match self {
            Self::Write(client) => Ok(client),
            Self::Storefront(_) => Err(FirmhouseError::AccessDenied {
                operation: operation.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::RecordingTransport;
    use crate::utils::error::ErrorKind;
    use serde::Deserialize;
    use serde_json::json;

    const PING: Document = Document {
        operation_name: "ping",
        root_field: "ping",
        query: "query ping($value: Int) { ping(value: $value) }",
    };

    #[derive(Debug, Deserialize)]
    struct Ping {
        ping: i64,
    }

    #[tokio::test]
    async fn test_execute_sends_document_and_variables() {
        let transport = Arc::new(RecordingTransport::new().with_data(json!({"ping": 3})));
        let client = FirmhouseClient::<Storefront>::with_transport(transport.clone());

        let result: Ping = client.execute(&PING, &json!({"value": 3})).await.unwrap();

        assert_eq!(result.ping, 3);
        let request = transport.last_request();
        assert_eq!(request.operation_name, "ping");
        assert_eq!(request.query, PING.query);
        assert_eq!(request.variables, json!({"value": 3}));
    }

    #[tokio::test]
    async fn test_execute_classifies_errors() {
        let transport = Arc::new(RecordingTransport::new().with_errors(json!([
            {"message": "Record not found", "extensions": {"code": "RECORD_NOT_FOUND"}}
        ])));
        let client = FirmhouseClient::<Storefront>::with_transport(transport);

        let error = client.execute::<_, Ping>(&PING, &json!({})).await.unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_null_data_is_server_error() {
        let transport = Arc::new(RecordingTransport::new().with_data(serde_json::Value::Null));
        let client = FirmhouseClient::<Storefront>::with_transport(transport);

        let error = client.execute::<_, Ping>(&PING, &json!({})).await.unwrap_err();
        assert!(matches!(error, FirmhouseError::Server { ref message } if message.contains("ping")));
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_serialization_error() {
        let transport = Arc::new(RecordingTransport::new().with_data(json!({"ping": "nope"})));
        let client = FirmhouseClient::<Storefront>::with_transport(transport);

        let error = client.execute::<_, Ping>(&PING, &json!({})).await.unwrap_err();
        assert!(matches!(error, FirmhouseError::Serialization(_)));
    }

    #[test]
    fn test_write_client_rejects_storefront_config() {
        let config = ClientConfig::new("token", AccessType::Storefront);
        let error = FirmhouseClient::<Write>::new(config).unwrap_err();
        assert!(matches!(error, FirmhouseError::AccessDenied { .. }));
    }

    #[test]
    fn test_storefront_client_accepts_write_config() {
        let config = ClientConfig::new("token", AccessType::Write);
        let client = FirmhouseClient::<Storefront>::new(config).unwrap();
        assert_eq!(client.access_type(), AccessType::Storefront);
    }

    #[test]
    fn test_configured_client_follows_access_type() {
        let storefront =
            ConfiguredClient::connect(ClientConfig::new("token", AccessType::Storefront)).unwrap();
        assert_eq!(storefront.access_type(), AccessType::Storefront);
        assert!(storefront.require_write("invoices").is_err());

        let write = ConfiguredClient::connect(ClientConfig::new("token", AccessType::Write)).unwrap();
        assert!(write.require_write("invoices").is_ok());
        assert_eq!(write.storefront().access_type(), AccessType::Storefront);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ClientConfig::new("", AccessType::Storefront);
        assert!(FirmhouseClient::<Storefront>::new(config).is_err());
    }
}
