//! Price History operator CLI
//!
//! Composition root for the price history store:
//! - creates the tables
//! - prints a product's history or chart payload
//! - records a price as if the catalog had saved the product
//! - clears history and edits chart settings

use clap::{Parser, Subcommand};
use price_history::config::{AppConfig, LogFormat};
use price_history::database::create_pool;
use price_history::models::{EntityEvent, ProductId};
use price_history::repositories::{PriceHistoryStore, TableNames};
use price_history::services::{AdminNotice, SettingsForm, StaticCatalog};
use price_history::{AppError, AppResult, AppState};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "price-history", about = "Product price history store", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the history and options tables if they do not exist
    Init,
    /// Print every recorded price of a product, oldest first
    History {
        product_id: ProductId,
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Print the chart payload a product page would embed
    Chart { product_id: ProductId },
    /// Record a price as a product save (or delete) event
    Record {
        product_id: ProductId,
        #[arg(long)]
        price: Decimal,
        /// Treat the event as "product about to be deleted"
        #[arg(long)]
        deleting: bool,
    },
    /// Purge history for all products or a selection
    Clear {
        #[arg(long, conflicts_with = "products")]
        all: bool,
        /// Comma-separated product ids
        #[arg(long)]
        products: Option<String>,
    },
    /// Show or change chart settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    Show,
    Set {
        #[arg(long)]
        hook_active: Option<bool>,
        #[arg(long)]
        y_axis: Option<String>,
        #[arg(long)]
        x_axis: Option<String>,
        #[arg(long)]
        legend: Option<String>,
    },
}

fn init_tracing(config: &AppConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("price_history={},sqlx=warn", config.log_level).into()
    });

    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

/// Admin errors go to the operator as a failed exit
fn finish(notice: AdminNotice) -> AppResult<()> {
    if notice.is_error() {
        return Err(AppError::Validation(notice.message().to_string()));
    }
    println!("{}", notice);
    Ok(())
}

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load environment variables first
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        AppError::Config(e)
    })?;

    init_tracing(&config);
    info!("Environment: {}", config.environment);

    let tables = TableNames::new(&config.table_prefix)?;
    let pool = create_pool(&config.database).await.map_err(|e| {
        error!("Failed to create database pool: {}", e);
        AppError::Database(e)
    })?;
    let state = AppState::new(pool, &tables);

    match cli.command {
        Command::Init => {
            state.initialize().await?;
            println!(
                "Tables {} and {} are ready",
                tables.history(),
                tables.options()
            );
        }
        Command::History { product_id, json } => {
            let history = state.history_repo.query_by_product(product_id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("No price history for product {}", product_id);
            } else {
                for observation in &history {
                    println!(
                        "{:>8}  {}  {:>12}",
                        observation.id, observation.change_date, observation.price
                    );
                }
            }
        }
        Command::Chart { product_id } => {
            let renderer = state.chart_renderer().await?;
            match renderer.chart_for(product_id).await? {
                Some(chart) => println!("{}", chart.to_json()?),
                None => println!("Price history chart is disabled"),
            }
        }
        Command::Record {
            product_id,
            price,
            deleting,
        } => {
            let catalog = Arc::new(StaticCatalog::new().with_price(product_id, price));
            let hooks = state.lifecycle_hooks(catalog, config.record_mode);
            let event = EntityEvent::product(product_id);
            if deleting {
                hooks.entity_deleting(&event).await;
            } else {
                hooks.entity_saved(&event).await;
            }

            match state.history_repo.latest_for_product(product_id).await? {
                Some(latest) => println!(
                    "Latest price for product {}: {} at {}",
                    product_id, latest.price, latest.change_date
                ),
                None => println!("Nothing recorded for product {}", product_id),
            }
        }
        Command::Clear { all, products } => {
            let mode = if all { "all_products" } else { "single_product" };
            let raw_ids = products.unwrap_or_default();
            let notice = state.admin_service().handle_clear_form(mode, &raw_ids).await;
            finish(notice)?;
        }
        Command::Settings { action } => {
            let admin = state.admin_service();
            let current = admin.current_settings().await?;
            match action {
                SettingsAction::Show => {
                    println!("{}", serde_json::to_string_pretty(&current)?);
                }
                SettingsAction::Set {
                    hook_active,
                    y_axis,
                    x_axis,
                    legend,
                } => {
                    let mut form = SettingsForm::from(&current);
                    if let Some(active) = hook_active {
                        form.hook_active = active;
                    }
                    if let Some(title) = y_axis {
                        form.y_axis_title = title;
                    }
                    if let Some(title) = x_axis {
                        form.x_axis_title = title;
                    }
                    if let Some(label) = legend {
                        form.legend_label = label;
                    }
                    finish(admin.handle_settings_form(&form).await)?;
                }
            }
        }
    }

    Ok(())
}
