//! NextShop CLI - drive the storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! nextshop products --search headphone
//! nextshop products --category Electronics --min-price 100 --max-price 300 --in-stock
//!
//! # Ask the shopping assistant
//! nextshop chat "looking for an eco friendly gift"
//!
//! # Mock sign-in (admin address needs --code)
//! nextshop login -e shopper@example.com -p anything
//! nextshop login -e admin@nextshop.com -p anything --code 123456
//! nextshop whoami
//!
//! # Place a demo order as the signed-in user
//! nextshop order --item 1 --item 6:2 --street "1 Market St" --city Springfield \
//!     --state IL --zip 62701 --cardholder "John Doe" --card-number 4242424242424242 \
//!     --expiry 12/29 --cvv 123
//! ```
//!
//! # Commands
//!
//! - `products` - List products matching a search and filters
//! - `chat` - Send one message to the shopping assistant
//! - `login` / `register` / `logout` / `whoami` - Session management
//! - `order` - Place a demo order

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nextshop_storefront::StorefrontConfig;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "nextshop")]
#[command(author, version, about = "NextShop storefront CLI")]
struct Cli {
    /// Load the catalog from a YAML file instead of the sample products
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products matching a search and filters
    Products(commands::catalog::ProductsArgs),
    /// Send a message to the shopping assistant
    Chat {
        /// Message text
        message: String,
    },
    /// Sign in (any password is accepted)
    Login {
        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Second-factor code, required for the admin address
        #[arg(long)]
        code: Option<String>,
    },
    /// Create a customer account and sign in
    Register {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        /// Repeat the password
        #[arg(short, long)]
        confirm: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user and their order totals
    Whoami,
    /// Place a demo order
    Order(commands::order::OrderArgs),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry.dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry
                .environment
                .clone()
                .map(std::borrow::Cow::Owned),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        tracing::Level::TRACE => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration errors are reported after tracing is up
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "nextshop=info,nextshop_storefront=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().without_time().with_target(false))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(CliError::from(nextshop_storefront::AppError::from(e))),
    };

    if let Err(e) = result {
        tracing::error!("{}", e.report());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), CliError> {
    let mut shop = commands::open_storefront(config, cli.catalog.as_deref())?;

    match cli.command {
        Commands::Products(args) => commands::catalog::products(&mut shop, &args),
        Commands::Chat { message } => commands::catalog::chat(&shop, &message).await,
        Commands::Login {
            email,
            password,
            code,
        } => commands::session::login(&mut shop, &email, &password, code.as_deref()).await,
        Commands::Register {
            name,
            email,
            password,
            confirm,
        } => commands::session::register(&mut shop, &name, &email, &password, &confirm).await,
        Commands::Logout => commands::session::logout(&mut shop),
        Commands::Whoami => commands::session::whoami(&shop),
        Commands::Order(args) => commands::order::place(&mut shop, args).await,
    }
}
