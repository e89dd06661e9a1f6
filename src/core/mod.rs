pub mod client;
pub mod documents;
pub mod resources;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::domain::model::*;
pub use crate::domain::ports::{GraphQLRequest, GraphQLResponse, GraphQLTransport};
pub use crate::utils::error::Result;
pub use client::{Access, ConfiguredClient, FirmhouseClient, GraphQLExecutor, Storefront, Write};
