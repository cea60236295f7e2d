//! Beanstall CLI - Browse the menu, manage items, and place orders.
//!
//! # Usage
//!
//! ```bash
//! # List the menu
//! beanstall menu list
//!
//! # Propose a new item (the email becomes its owner)
//! beanstall menu create -e roaster@example.com -c Beans -n "Ethiopia Sidamo" -p 10000 \
//!     --image-file ./sidamo.png
//!
//! # Change or remove an item you own
//! beanstall menu update 4 -e roaster@example.com -c Beans -n "Ethiopia Sidamo G1" -p 11000
//! beanstall menu delete 4 -e roaster@example.com
//!
//! # Order two units of item 1 and one of item 3
//! beanstall order -e me@example.com -a "Seoul, Gangnam-gu" -z 06236 --item 1=2 --item 3
//!
//! # Show past orders
//! beanstall history -e me@example.com
//! ```
//!
//! # Environment Variables
//!
//! - `BEANSTALL_API_URL` - Base URL of the menu/order service
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - Optional error tracking
//! - `RUST_LOG` - Log filter (default: `beanstall_storefront=info,beanstall_cli=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use beanstall_core::MenuId;
use beanstall_storefront::{ApiClient, ClientConfig};
use clap::{Args, Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::order::ItemArg;

#[derive(Parser)]
#[command(name = "beanstall")]
#[command(author, version, about = "Beanstall storefront CLI")]
struct Cli {
    /// Base URL of the menu/order service (overrides `BEANSTALL_API_URL`)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and manage menu items
    Menu {
        #[command(subcommand)]
        action: MenuAction,
    },
    /// Place an order
    Order {
        /// Email the order is placed under
        #[arg(short, long)]
        email: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,

        /// Five-digit postcode
        #[arg(short = 'z', long)]
        postcode: String,

        /// Item to order, as `ID` or `ID=COUNT` (repeatable)
        #[arg(short, long = "item", value_name = "ID[=COUNT]", required = true)]
        items: Vec<ItemArg>,
    },
    /// Show orders placed with an email
    History {
        /// Email the orders were placed under
        #[arg(short, long)]
        email: String,
    },
}

#[derive(Subcommand)]
enum MenuAction {
    /// List items on sale
    List,
    /// Create a new item
    Create {
        #[command(flatten)]
        fields: MenuFields,

        /// URL of an already hosted image
        #[arg(long, conflicts_with = "image_file")]
        image_url: Option<String>,

        /// Local image to upload (max 5 MiB)
        #[arg(long)]
        image_file: Option<PathBuf>,
    },
    /// Update an item you created
    Update {
        /// Item id
        id: MenuId,

        #[command(flatten)]
        fields: MenuFields,

        /// New image URL; omitting it clears the current image
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete an item you created
    Delete {
        /// Item id
        id: MenuId,

        /// Email the item was created with
        #[arg(short, long)]
        email: String,
    },
}

/// Fields shared by create and update.
#[derive(Args)]
struct MenuFields {
    /// Owner email
    #[arg(short, long)]
    email: String,

    /// Category label
    #[arg(short, long)]
    category: String,

    /// Item name
    #[arg(short, long)]
    name: String,

    /// Price in won
    #[arg(short, long)]
    price: String,
}

impl From<MenuFields> for commands::menu::Fields {
    fn from(fields: MenuFields) -> Self {
        Self {
            email: fields.email,
            category: fields.category,
            name: fields.name,
            price: fields.price,
        }
    }
}

/// Initialize Sentry error tracking.
///
/// Returns a guard that must be kept alive for the duration of the program.
/// If `SENTRY_DSN` is not set, returns `None` and Sentry is disabled.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
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
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.api_url.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing_subscriber::fmt::init();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "beanstall_storefront=info,beanstall_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn load_config(api_url: Option<&str>) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    Ok(match api_url {
        Some(url) => config.with_api_url(url)?,
        None => config,
    })
}

async fn run(command: Commands, config: &ClientConfig) -> Result<(), commands::CliError> {
    let client = ApiClient::new(config)?;

    match command {
        Commands::Menu { action } => match action {
            MenuAction::List => commands::menu::list(&client).await?,
            MenuAction::Create {
                fields,
                image_url,
                image_file,
            } => {
                commands::menu::create(&client, fields.into(), image_url, image_file.as_deref())
                    .await?;
            }
            MenuAction::Update {
                id,
                fields,
                image_url,
            } => commands::menu::update(&client, id, fields.into(), image_url).await?,
            MenuAction::Delete { id, email } => {
                commands::menu::delete(&client, id, email).await?;
            }
        },
        Commands::Order {
            email,
            address,
            postcode,
            items,
        } => commands::order::place(&client, &email, &address, &postcode, &items).await?,
        Commands::History { email } => commands::history::show(&client, &email).await?,
    }
    Ok(())
}
