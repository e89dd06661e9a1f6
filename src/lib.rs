//! Typed client for the Firmhouse subscription-commerce GraphQL API.
//!
//! ```no_run
//! use firmhouse_sdk::{AccessType, ClientConfig, FirmhouseClient, Storefront};
//!
//! # async fn run() -> firmhouse_sdk::Result<()> {
//! let config = ClientConfig::new("project-access-token", AccessType::Storefront);
//! let client = FirmhouseClient::<Storefront>::new(config)?;
//!
//! let cart = client.carts().get_or_create(None).await?;
//! println!("{} items in cart {:?}", cart.item_count(), cart.token());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::{Cli, OutputFormat};
pub use config::{toml_config::TomlConfig, AccessType, ClientConfig};

pub use core::client::{Access, ConfiguredClient, FirmhouseClient, Storefront, Write};
pub use core::resources::{
    AddToCartInput, AddressDetailsInput, CheckoutInput, InvoicesQuery, OrderedProductInput,
    PlansQuery, ProductsQuery, UpdateOrderedProductInput, UpdateSubscriptionInput,
};
pub use core::view::{format_cents, Frequency, IntervalUnit};
pub use utils::error::{ErrorKind, FirmhouseError, Result};
