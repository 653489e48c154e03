//! Command line configuration

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use comanda::{
    cart::ProductId,
    payment::PaymentMethod,
    tags,
};

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", global = true)]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact, global = true)]
    pub log_format: LogFormat,
}

/// Comanda configuration
#[derive(Debug, Parser)]
#[command(name = "comanda", about = "Restaurant menu ordering from the terminal", long_about = None)]
pub struct Config {
    /// Directory holding `menu/<name>.yml` fixtures; the built-in menu is used when unset
    #[arg(long, env = "COMANDA_MENU_DIR", global = true)]
    pub menu_dir: Option<PathBuf>,

    /// Menu fixture name
    #[arg(short, long, env = "COMANDA_MENU", default_value = "default", global = true)]
    pub menu: String,

    /// Logging settings
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// What to do
    #[command(subcommand)]
    pub command: Command,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the menu, optionally searched and filtered
    Menu(MenuArgs),

    /// Build a cart and send it to the kitchen
    Order(OrderArgs),

    /// Build a cart and pay for it
    Pay(PayArgs),

    /// Show the sample order history and profile statistics
    History,
}

/// Menu listing options
#[derive(Debug, Args)]
pub struct MenuArgs {
    /// Match against dish names and descriptions
    #[arg(short, long)]
    pub search: Option<String>,

    /// Category id
    #[arg(short, long, default_value = tags::ALL)]
    pub category: String,

    /// Dietary tag
    #[arg(short, long)]
    pub dietary: Option<String>,
}

/// Dishes to put in the cart, as `ID` or `IDxN`.
#[derive(Debug, Args)]
pub struct CartArgs {
    /// Menu item ids, repeatable; `1x3` adds three units of item 1
    #[arg(required = true, value_parser = parse_item)]
    pub items: Vec<(ProductId, u32)>,

    /// Set a quantity after adding, as `ID=N`; `N = 0` removes the line
    #[arg(long = "set", value_parser = parse_quantity)]
    pub quantities: Vec<(ProductId, u32)>,
}

/// Order options
#[derive(Debug, Args)]
pub struct OrderArgs {
    /// Cart contents
    #[command(flatten)]
    pub cart: CartArgs,

    /// Table number
    #[arg(short, long, default_value = "")]
    pub table: String,

    /// Notes for the kitchen
    #[arg(long)]
    pub notes: Option<String>,
}

/// Payment options
#[derive(Debug, Args)]
pub struct PayArgs {
    /// Cart contents
    #[command(flatten)]
    pub cart: CartArgs,

    /// Payment method
    #[arg(long, value_enum, default_value_t = PaymentMethod::Card)]
    pub method: PaymentMethod,

    /// Split the bill between this many people (2-10)
    #[arg(long)]
    pub split: Option<u8>,

    /// Card number, when paying by card
    #[arg(long, env = "COMANDA_CARD_NUMBER", hide_env_values = true)]
    pub card_number: Option<String>,
}

fn parse_item(raw: &str) -> Result<(ProductId, u32), String> {
    match raw.rsplit_once('x') {
        Some((id, count))
            if !id.is_empty() && !count.is_empty() && count.bytes().all(|b| b.is_ascii_digit()) =>
        {
            let count = count
                .parse::<u32>()
                .map_err(|err| format!("invalid count in {raw:?}: {err}"))?;

            Ok((ProductId::from(id), count))
        }
        _ => Ok((ProductId::from(raw), 1)),
    }
}

fn parse_quantity(raw: &str) -> Result<(ProductId, u32), String> {
    let (id, quantity) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=N, got {raw:?}"))?;

    let quantity = quantity
        .parse::<u32>()
        .map_err(|err| format!("invalid quantity in {raw:?}: {err}"))?;

    Ok((ProductId::from(id), quantity))
}
