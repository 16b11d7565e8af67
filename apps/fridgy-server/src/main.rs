use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use runtime::{AppConfig, CliArgs, DatabaseConfig};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::time::Duration;

use api_ingress::{ApiIngress, ApiIngressConfig};
use products::config::ProductsConfig;
use products::ProductsModule;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Fridgy Server - grocery items, products and recipes over REST
#[derive(Parser)]
#[command(name = "fridgy-server")]
#[command(about = "Fridgy Server - grocery items, products and recipes over REST")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Use an in-memory SQLite database
    #[arg(long)]
    mock: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
        mock: cli.mock,
    };

    // Load configuration (normalized home_dir is applied inside)
    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.as_ref().cloned().unwrap_or_default();
    runtime::logging::init_logging_from_config(&logging_config, Path::new(&config.server.home_dir));
    tracing::info!("Fridgy Server starting");

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config, args).await,
        Commands::Check => check_config(config, args),
    }
}

/// Module sections and the database DSN, resolved and validated.
struct Resolved {
    ingress: ApiIngressConfig,
    products: ProductsConfig,
    database: DatabaseConfig,
    dsn: String,
}

fn resolve(config: &AppConfig, args: &CliArgs) -> Result<Resolved> {
    let mut ingress: ApiIngressConfig = config.module_config("api_ingress")?;
    if config.server.timeout_sec > 0 {
        ingress.request_timeout_sec = config.server.timeout_sec;
    }
    let products: ProductsConfig = config.module_config("products")?;
    let database = config
        .database
        .clone()
        .context("Database configuration is missing")?;
    let dsn = database.effective_url(args.mock, &config.home_dir())?;
    Ok(Resolved {
        ingress,
        products,
        database,
        dsn,
    })
}

async fn connect(db_config: &DatabaseConfig, dsn: &str) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(dsn.to_owned());
    opts.acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    if let Some(max) = db_config.max_conns {
        opts.max_connections(max);
    }
    // In-memory SQLite lives per connection; keep a single one.
    if dsn.contains(":memory:") {
        opts.max_connections(1).min_connections(1);
    }
    if let Some(ms) = db_config.busy_timeout_ms {
        opts.map_sqlx_sqlite_opts(move |o| o.busy_timeout(Duration::from_millis(u64::from(ms))));
    }

    tracing::info!("Connecting to database: {}", redact(dsn));
    let db = Database::connect(opts)
        .await
        .with_context(|| format!("Failed to connect to database {}", redact(dsn)))?;
    tracing::info!("Connected DB backend: {:?}", db.get_database_backend());
    Ok(db)
}

/// Hide the password part of a DSN for logging.
fn redact(dsn: &str) -> String {
    match (dsn.find("://"), dsn.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &dsn[..scheme_end], &dsn[at..])
        }
        _ => dsn.to_string(),
    }
}

async fn run_server(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Initializing modules...");
    let resolved = resolve(&config, &args)?;

    let db = connect(&resolved.database, &resolved.dsn).await?;
    ProductsModule::migrate(&db).await?;
    let products = ProductsModule::new(db, &resolved.products)?;

    let ingress = ApiIngress::new(resolved.ingress).with_openapi(ProductsModule::openapi());
    let router = ingress.build_router(products.register_rest(axum::Router::new()));

    let addr = config.server.bind_addr();
    ingress
        .serve(&addr, router, api_ingress::shutdown_signal())
        .await?;
    tracing::info!("Fridgy Server stopped");
    Ok(())
}

fn check_config(config: AppConfig, args: CliArgs) -> Result<()> {
    tracing::info!("Checking configuration...");
    let resolved = resolve(&config, &args)?;
    tracing::info!("Database DSN resolved to {}", redact(&resolved.dsn));

    tracing::info!("Configuration is valid");
    println!("Configuration check passed");
    println!("Server config:");
    println!("{}", config.to_yaml()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::redact;

    #[test]
    fn redact_hides_credentials() {
        assert_eq!(
            redact("postgres://app:secret@db:5432/fridgy"),
            "postgres://***@db:5432/fridgy"
        );
        assert_eq!(redact("sqlite::memory:"), "sqlite::memory:");
    }
}
