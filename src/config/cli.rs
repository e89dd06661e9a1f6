use crate::config::AccessType;
use crate::core::view::format_cents;
use crate::domain::model::{Invoice, OrderedProduct, Plan, Product, Project, Subscription};
use crate::utils::error::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "firmhouse")]
#[command(about = "Query a Firmhouse project from the command line")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Project access token
    #[arg(long, env = "FIRMHOUSE_API_TOKEN", hide_env_values = true, global = true)]
    pub api_token: Option<String>,

    /// GraphQL endpoint
    #[arg(long, env = "FIRMHOUSE_BASE_URL", global = true)]
    pub base_url: Option<String>,

    /// Access level of the token
    #[arg(long, value_enum, env = "FIRMHOUSE_ACCESS_TYPE", global = true)]
    pub access: Option<AccessType>,

    /// Output format, defaults to json
    #[arg(long, value_enum, global = true)]
    pub format: Option<OutputFormat>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the project the token belongs to
    Project,
    /// List products
    Products {
        #[arg(long)]
        first: Option<u32>,
        #[arg(long)]
        after: Option<String>,
    },
    /// Show one product
    Product { id: String },
    /// List plans
    Plans {
        #[arg(long)]
        first: Option<u32>,
    },
    /// Work with carts
    Cart {
        #[command(subcommand)]
        command: CartCommand,
    },
    /// Show a subscription (write access)
    Subscription { token: String },
    /// List invoices (write access)
    Invoices {
        #[arg(long)]
        subscription_id: Option<String>,
        #[arg(long)]
        first: Option<u32>,
    },
}

#[derive(Debug, Subcommand)]
pub enum CartCommand {
    /// Show a cart by its token
    Show { token: String },
    /// Start a new cart and print its token
    Create,
}

#[derive(Debug, Serialize)]
pub struct ProjectRow {
    pub id: String,
    pub name: String,
    pub currency: String,
    pub countries: String,
}

impl From<&Project> for ProjectRow {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id.clone(),
            name: project.name.clone(),
            currency: project.currency.clone().unwrap_or_default(),
            countries: project.countries.join(" "),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductRow {
    pub id: String,
    pub title: String,
    pub sku: String,
    pub price_cents: Option<i64>,
    pub available: bool,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone().unwrap_or_default(),
            sku: product.sku.clone().unwrap_or_default(),
            price_cents: product.price_cents,
            available: product.available.unwrap_or(false),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanRow {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub monthly_amount: String,
}

impl From<&Plan> for PlanRow {
    fn from(plan: &Plan) -> Self {
        let currency = plan.currency.as_deref().unwrap_or("EUR");
        Self {
            id: plan.id.clone(),
            name: plan.name.clone().unwrap_or_default(),
            slug: plan.slug.clone().unwrap_or_default(),
            monthly_amount: plan
                .monthly_amount_cents
                .map(|cents| format_cents(cents, currency))
                .unwrap_or_default(),
        }
    }
}

/// One ordered product of a cart or subscription.
#[derive(Debug, Serialize)]
pub struct OrderedProductRow {
    pub id: String,
    pub title: String,
    pub quantity: i32,
    pub frequency: String,
    pub shipment_date: String,
    pub total: String,
}

impl OrderedProductRow {
    pub fn new(product: &OrderedProduct, currency: &str) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone().unwrap_or_default(),
            quantity: product.quantity,
            frequency: product.frequency().describe(),
            shipment_date: product
                .shipment_date
                .map(|d| d.to_string())
                .unwrap_or_default(),
            total: format_cents(product.total_cents(), currency),
        }
    }

    pub fn from_subscription(subscription: &Subscription) -> Vec<Self> {
        let currency = subscription.currency.as_deref().unwrap_or("EUR");
        subscription
            .ordered_products
            .iter()
            .map(|p| Self::new(p, currency))
            .collect()
    }
}

#[derive(Debug, Serialize)]
pub struct InvoiceRow {
    pub id: String,
    pub invoice_number: String,
    pub status: String,
    pub total: String,
    pub created_at: String,
}

impl From<&Invoice> for InvoiceRow {
    fn from(invoice: &Invoice) -> Self {
        let currency = invoice.currency.as_deref().unwrap_or("EUR");
        Self {
            id: invoice.id.clone(),
            invoice_number: invoice.invoice_number.clone().unwrap_or_default(),
            status: invoice
                .status
                .map(|s| format!("{:?}", s).to_lowercase())
                .unwrap_or_default(),
            total: invoice
                .total_amount_including_tax_cents
                .map(|cents| format_cents(cents, currency))
                .unwrap_or_default(),
            created_at: invoice
                .created_at
                .map(|d| d.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

pub fn write_json<W: Write, T: Serialize + ?Sized>(writer: W, value: &T) -> Result<()> {
    let mut writer = writer;
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}
