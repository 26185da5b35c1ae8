//! Flower Shop CLI - Database management and API tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! flower-cli migrate
//!
//! # Insert the demo catalog into an empty database
//! flower-cli seed
//!
//! # Browse the catalog through the running API
//! flower-cli catalog products --search rose --sort price_asc
//!
//! # Work with the local cart
//! flower-cli cart add 3 --quantity 2
//! flower-cli cart show
//!
//! # Post to the forum
//! flower-cli forum post --title "Keeping tulips upright" --category TipsAndTricks
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` (or `DATABASE_URL`) - for `migrate` and `seed`
//! - `FLOWER_SHOP_API_URL` - storefront API (default `http://localhost:5000`)
//! - `FLOWER_SHOP_DATA_DIR` - cart storage directory (default `.flower-shop`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use flower_shop_core::{CategoryId, ForumCategory, ProductId, ProductType};

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "flower-cli")]
#[command(author, version, about = "Flower Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Insert the demo catalog if no categories exist
    Seed,
    /// Browse products and categories
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the local shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Send a message to the shop
    Contact {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        subject: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: String,
    },
    /// Read and write forum posts
    Forum {
        #[command(subcommand)]
        action: ForumAction,
    },
    /// Create catalog entries
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    Products {
        /// Substring of the name or description
        #[arg(short, long)]
        search: Option<String>,
        #[arg(long)]
        category_id: Option<CategoryId>,
        /// Category slug or name
        #[arg(long)]
        category: Option<String>,
        /// `Flower`, `Bouquet` or `Composition`
        #[arg(long = "type")]
        product_type: Option<ProductType>,
        /// `price_asc`, `price_desc`, `name` or `default`
        #[arg(long)]
        sort: Option<String>,
    },
    /// Show one product
    Product { id: ProductId },
    /// List categories
    Categories,
}

#[derive(Subcommand)]
enum CartAction {
    /// Show cart contents and totals
    Show,
    /// Add a product (fetched from the API)
    Add {
        id: ProductId,
        #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Set the quantity of a product already in the cart (0 or less removes it)
    Set {
        id: ProductId,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product
    Remove { id: ProductId },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum ForumAction {
    /// List posts, newest first
    List {
        /// `TipsAndTricks`, `News`, `Requests` or `Support`
        #[arg(short, long)]
        category: Option<ForumCategory>,
    },
    /// Create a post
    Post {
        #[arg(short, long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(short, long)]
        category: ForumCategory,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a category
    Category {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Create a product
    Product {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        price: Decimal,
        #[arg(short, long)]
        stock: i64,
        #[arg(long)]
        category_id: CategoryId,
        #[arg(long = "type", default_value = "Flower")]
        product_type: ProductType,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Catalog { action } => match action {
            CatalogAction::Products {
                search,
                category_id,
                category,
                product_type,
                sort,
            } => {
                let query = flower_shop_core::ProductQuery {
                    search,
                    category_id,
                    category,
                    product_type,
                    sort: sort
                        .as_deref()
                        .map_or_else(Default::default, flower_shop_core::SortKey::from_token),
                };
                commands::catalog::products(&query).await?;
            }
            CatalogAction::Product { id } => commands::catalog::product(id).await?,
            CatalogAction::Categories => commands::catalog::categories().await?,
        },
        Commands::Cart { action } => {
            let mut cart = commands::cart::open();
            match action {
                CartAction::Show => {}
                CartAction::Add { id, quantity } => {
                    commands::cart::add(&mut cart, id, quantity).await?;
                }
                CartAction::Set { id, quantity } => cart.set_quantity(id, quantity),
                CartAction::Remove { id } => cart.remove(id),
                CartAction::Clear => cart.clear(),
            }
            commands::cart::show(&cart);
        }
        Commands::Contact {
            name,
            email,
            subject,
            phone,
            message,
        } => {
            let request = flower_shop_core::ContactRequest {
                name,
                email,
                subject,
                phone,
                message,
            };
            commands::contact::send(&request).await?;
        }
        Commands::Forum { action } => match action {
            ForumAction::List { category } => commands::forum::list(category).await?,
            ForumAction::Post {
                title,
                content,
                category,
            } => commands::forum::post(category, &title, content.as_deref()).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Category { name, description } => {
                commands::admin::create_category(name, description).await?;
            }
            AdminAction::Product {
                name,
                price,
                stock,
                category_id,
                product_type,
                description,
                image_url,
            } => {
                let product = flower_shop_core::NewProduct {
                    name,
                    description,
                    price,
                    stock_quantity: stock,
                    image_url,
                    category_id: Some(category_id),
                    product_type,
                };
                commands::admin::create_product(&product).await?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_set_accepts_negative_quantity() {
        let cli = Cli::try_parse_from(["flower-cli", "cart", "set", "1", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Set { quantity: -1, .. }
            }
        ));
    }

    #[test]
    fn test_cart_add_defaults_to_one() {
        let cli = Cli::try_parse_from(["flower-cli", "cart", "add", "3"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Cart {
                action: CartAction::Add { quantity: 1, .. }
            }
        ));
    }

    #[test]
    fn test_product_type_parses_case_insensitively() {
        let cli = Cli::try_parse_from(["flower-cli", "catalog", "products", "--type", "bouquet"])
            .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Catalog {
                action: CatalogAction::Products {
                    product_type: Some(ProductType::Bouquet),
                    ..
                }
            }
        ));
    }
}
