use anyhow::Context;
use clap::{Parser, ValueEnum};
use firmhouse_sdk::config::toml_config::OutputConfig;
use firmhouse_sdk::config::cli::{
    write_csv, write_json, CartCommand, Command, InvoiceRow, OrderedProductRow, PlanRow,
    ProductRow, ProjectRow,
};
use firmhouse_sdk::utils::{logger, validation};
use firmhouse_sdk::utils::validation::Validate;
use firmhouse_sdk::{
    Cli, ClientConfig, ConfiguredClient, ErrorKind, FirmhouseError, InvoicesQuery, OutputFormat,
    PlansQuery, ProductsQuery, TomlConfig,
};
use serde::Serialize;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    if let Err(e) = run(cli).await {
        let code = exit_code(&e);
        match e.downcast_ref::<FirmhouseError>() {
            Some(error) => {
                tracing::error!("❌ {} ({:?})", error, error.kind());
                eprintln!("❌ {}", error.user_friendly_message());
                eprintln!("💡 {}", error.recovery_suggestion());
            }
            None => eprintln!("❌ {:#}", e),
        }
        std::process::exit(code);
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<FirmhouseError>().map(FirmhouseError::kind) {
        Some(ErrorKind::NotFound) => 2,
        Some(ErrorKind::Validation) => 3,
        Some(ErrorKind::Server) => 4,
        Some(ErrorKind::Client) | None => 1,
    }
}

/// Config file first, then flags and environment on top.
fn load_config(cli: &Cli) -> anyhow::Result<(ClientConfig, Option<OutputConfig>)> {
    let (config, output) = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let mut toml = TomlConfig::from_file(path)
                .with_context(|| format!("Failed to load config file '{}'", path))?;
            if let Some(token) = &cli.api_token {
                toml.client.access_token = token.clone();
            }
            apply_flags(cli, &mut toml.client);
            toml.validate()?;
            let output = toml.output.clone();
            (toml.into_client_config(), output)
        }
        None => {
            let token = validation::validate_required_field("api_token", &cli.api_token)?;
            let mut config = ClientConfig::new(token.clone(), cli.access.unwrap_or_default());
            apply_flags(cli, &mut config);
            config.validate()?;
            (config, None)
        }
    };

    tracing::debug!("Client config: {:?}", config);
    Ok((config, output))
}

fn apply_flags(cli: &Cli, config: &mut ClientConfig) {
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(access) = cli.access {
        config.access_type = access;
    }
}

fn output_format(cli: &Cli, output: Option<&OutputConfig>) -> anyhow::Result<OutputFormat> {
    if let Some(format) = cli.format {
        return Ok(format);
    }
    match output.and_then(|o| o.format.as_deref()) {
        Some(name) => OutputFormat::from_str(name, true)
            .map_err(|_| anyhow::anyhow!("Unknown output format '{}' in config file", name)),
        None => Ok(OutputFormat::default()),
    }
}

fn print<T: Serialize + ?Sized, R: Serialize>(
    format: OutputFormat,
    value: &T,
    rows: impl FnOnce() -> Vec<R>,
) -> anyhow::Result<()> {
    let stdout = std::io::stdout().lock();
    match format {
        OutputFormat::Json => write_json(stdout, value)?,
        OutputFormat::Csv => write_csv(stdout, &rows())?,
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (config, output) = load_config(&cli)?;
    let format = output_format(&cli, output.as_ref())?;
    let page_size = output.and_then(|o| o.page_size);
    let client = ConfiguredClient::connect(config)?;
    let storefront = client.storefront();

    match cli.command {
        Command::Project => {
            let project = storefront.projects().get_current().await?;
            print(format, &project, || vec![ProjectRow::from(&project)])?;
        }
        Command::Products { first, after } => {
            let query = ProductsQuery {
                first: first.or(page_size),
                after,
                ..ProductsQuery::default()
            };
            let page = storefront.products().fetch_all(&query).await?;
            print(format, &page, || page.results.iter().map(ProductRow::from).collect())?;
        }
        Command::Product { id } => {
            let product = storefront.products().fetch_by_id(&id).await?;
            print(format, &product, || vec![ProductRow::from(&product)])?;
        }
        Command::Plans { first } => {
            let query = PlansQuery {
                first: first.or(page_size),
                ..PlansQuery::default()
            };
            let page = storefront.plans().fetch_all(&query).await?;
            print(format, &page, || page.results.iter().map(PlanRow::from).collect())?;
        }
        Command::Cart { command } => {
            let cart = match command {
                CartCommand::Show { token } => storefront.carts().get(&token).await?,
                CartCommand::Create => storefront.carts().create().await?,
            };
            tracing::info!(
                "🛒 {} item(s), subtotal {}",
                cart.item_count(),
                firmhouse_sdk::format_cents(
                    cart.subtotal_cents(),
                    cart.currency.as_deref().unwrap_or("EUR")
                )
            );
            print(format, &cart, || OrderedProductRow::from_subscription(&cart))?;
        }
        Command::Subscription { token } => {
            let subscription = client
                .require_write("subscription")?
                .subscriptions()
                .get(&token)
                .await?;
            let today = chrono::Local::now().date_naive();
            if let Some(date) = subscription.closest_upcoming_shipment_date(today) {
                tracing::info!("📦 Next shipment on {}", date);
            }
            print(format, &subscription, || {
                OrderedProductRow::from_subscription(&subscription)
            })?;
        }
        Command::Invoices {
            subscription_id,
            first,
        } => {
            let query = InvoicesQuery {
                first: first.or(page_size),
                subscription_id,
                ..InvoicesQuery::default()
            };
            let page = client
                .require_write("invoices")?
                .invoices()
                .fetch_all(&query)
                .await?;
            print(format, &page, || page.results.iter().map(InvoiceRow::from).collect())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_exit_codes_follow_error_kind() {
        let not_found = anyhow::Error::from(FirmhouseError::not_found("x"));
        let server = anyhow::Error::from(FirmhouseError::server("x"));
        let missing = anyhow::Error::from(FirmhouseError::MissingConfigError {
            field: "api_token".to_string(),
        });

        let rejected = anyhow::Error::from(validation::input_error("quantity", "must be at least 1"));

        assert_eq!(exit_code(&not_found), 2);
        assert_eq!(exit_code(&rejected), 3);
        assert_eq!(exit_code(&server), 4);
        assert_eq!(exit_code(&missing), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("plain")), 1);
    }

    fn cli_with(config: Option<String>, api_token: Option<&str>) -> Cli {
        Cli {
            config,
            api_token: api_token.map(str::to_string),
            base_url: None,
            access: None,
            format: None,
            verbose: false,
            json_logs: false,
            command: Command::Project,
        }
    }

    fn config_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config_requires_token_without_file() {
        let error = load_config(&cli_with(None, None)).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<FirmhouseError>(),
            Some(FirmhouseError::MissingConfigError { .. })
        ));
        assert_eq!(exit_code(&error), 1);
    }

    #[test]
    fn test_load_config_validates_config_file() {
        let file = config_file(
            r#"
[client]
access_token = "${FIRMHOUSE_TEST_TOKEN_NEVER_SET}"

[output]
page_size = 500
"#,
        );
        let path = file.path().to_string_lossy().to_string();

        let error = load_config(&cli_with(Some(path.clone()), None)).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<FirmhouseError>(),
            Some(FirmhouseError::MissingConfigError { .. })
        ));
        assert_eq!(exit_code(&error), 1);

        // 旗標提供的 token 不能掩蓋錯誤的 page_size
        let error = load_config(&cli_with(Some(path), Some("tok"))).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<FirmhouseError>(),
            Some(FirmhouseError::InvalidConfigValueError { field, .. }) if field == "output.page_size"
        ));
        assert_eq!(exit_code(&error), 1);
    }

    #[test]
    fn test_load_config_flag_token_replaces_unresolved_variable() {
        let file = config_file(
            r#"
[client]
access_token = "${FIRMHOUSE_TEST_TOKEN_NEVER_SET}"
access_type = "write"

[output]
format = "csv"
page_size = 50
"#,
        );
        let path = file.path().to_string_lossy().to_string();

        let (config, output) = load_config(&cli_with(Some(path), Some("tok"))).unwrap();
        assert_eq!(config.access_token, "tok");
        assert_eq!(config.access_type, firmhouse_sdk::AccessType::Write);
        let output = output.unwrap();
        assert_eq!(output.page_size, Some(50));
        assert_eq!(
            output_format(&cli_with(None, None), Some(&output)).unwrap(),
            OutputFormat::Csv
        );
    }

    #[test]
    fn test_load_config_flags_override() {
        let cli = Cli::try_parse_from([
            "firmhouse",
            "--api-token",
            "tok",
            "--base-url",
            "http://localhost:3000/graphql",
            "--access",
            "write",
            "project",
        ])
        .unwrap();

        let (config, output) = load_config(&cli).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000/graphql");
        assert_eq!(config.access_type, firmhouse_sdk::AccessType::Write);
        assert!(output.is_none());
        assert_eq!(output_format(&cli, None).unwrap(), OutputFormat::Json);
    }
}
