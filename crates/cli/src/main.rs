//! Bobr CLI - command-line frontend for the Bobr storefront.
//!
//! # Usage
//!
//! ```bash
//! # Start a session
//! bobr login bobr --password secret
//!
//! # Browse and build a cart
//! bobr products list
//! bobr cart add 3 --qty 2
//! bobr cart show
//!
//! # Checkout and track the order
//! bobr orders checkout
//! bobr orders list
//! bobr orders set-status 9 in_progress
//! ```
//!
//! # Commands
//!
//! - `login` / `register` / `logout` / `me` - session management
//! - `account` - profile updates and account deletion
//! - `products` - catalog browsing and own-product management
//! - `cart` - local cart edits (persisted on this device)
//! - `orders` - checkout and order status tracking

#![cfg_attr(not(test), forbid(unsafe_code))]
// This binary's whole job is writing to stdout
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

use bobr_client::config::ClientConfig;
use bobr_client::shop::Shop;
use bobr_core::{OrderId, OrderStatus, Price, ProductId};

mod commands;

#[derive(Parser)]
#[command(name = "bobr")]
#[command(author, version, about = "Bobr storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in with a username or email
    Login {
        /// Username or email
        login: String,

        /// Account password
        #[arg(short, long)]
        password: String,
    },
    /// Register a new account (logs in immediately)
    Register {
        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long)]
        password: String,

        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,
    },
    /// End the session and clear the local cart
    Logout,
    /// Show the logged-in user
    Me,
    /// Manage the account
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Browse and manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Edit the local cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Checkout and order tracking
    Orders {
        #[command(subcommand)]
        action: OrderAction,
    },
}

#[derive(Subcommand)]
enum AccountAction {
    /// Update profile fields
    Update {
        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,
    },
    /// Delete the account and everything it owns
    Delete {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List the catalog (or only your own products)
    List {
        /// Only products you created
        #[arg(long)]
        mine: bool,
    },
    /// Create a product
    Create {
        #[arg(short, long)]
        name: String,

        /// Unit price, e.g. 249.50
        #[arg(short, long)]
        price: Price,

        #[arg(short, long)]
        description: Option<String>,
    },
    /// Update one of your products
    Update {
        id: ProductId,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        price: Option<Price>,

        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete one of your products
    Delete { id: ProductId },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart and its total
    Show,
    /// Add a product to the cart
    Add {
        product_id: ProductId,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        qty: u32,
    },
    /// Set the quantity of a cart line (0 removes it)
    SetQty { product_id: ProductId, qty: i64 },
    /// Remove a cart line
    Remove { product_id: ProductId },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum OrderAction {
    /// Submit the cart as a new order
    Checkout,
    /// List your orders, most recent first
    List,
    /// Show one order's item breakdown
    Show { id: OrderId },
    /// Request a status transition (new, in_progress, completed, canceled)
    SetStatus { id: OrderId, status: OrderStatus },
}

#[tokio::main]
async fn main() {
    // Initialize tracing; RUST_LOG overrides the quiet default
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bobr=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    let mut shop = Shop::new(&config)?;

    match cli.command {
        Commands::Login { login, password } => {
            commands::account::login(&mut shop, &login, &password).await?;
        }
        Commands::Register {
            username,
            email,
            password,
            first_name,
            last_name,
        } => {
            commands::account::register(&mut shop, username, &email, password, first_name, last_name)
                .await?;
        }
        Commands::Logout => commands::account::logout(&mut shop)?,
        Commands::Me => commands::account::me(&mut shop).await?,
        Commands::Account { action } => match action {
            AccountAction::Update {
                first_name,
                last_name,
            } => commands::account::update(&mut shop, first_name, last_name).await?,
            AccountAction::Delete { yes } => commands::account::delete(&mut shop, yes).await?,
        },
        Commands::Products { action } => match action {
            ProductAction::List { mine } => commands::products::list(&mut shop, mine).await?,
            ProductAction::Create {
                name,
                price,
                description,
            } => commands::products::create(&mut shop, name, price, description).await?,
            ProductAction::Update {
                id,
                name,
                price,
                description,
            } => commands::products::update(&mut shop, id, name, price, description).await?,
            ProductAction::Delete { id } => commands::products::delete(&mut shop, id).await?,
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&mut shop).await?,
            CartAction::Add { product_id, qty } => {
                commands::cart::add(&mut shop, product_id, qty).await?;
            }
            CartAction::SetQty { product_id, qty } => {
                commands::cart::set_qty(&mut shop, product_id, qty).await?;
            }
            CartAction::Remove { product_id } => {
                commands::cart::remove(&mut shop, product_id).await?;
            }
            CartAction::Clear => commands::cart::clear(&mut shop).await?,
        },
        Commands::Orders { action } => match action {
            OrderAction::Checkout => commands::orders::checkout(&mut shop).await?,
            OrderAction::List => commands::orders::list(&mut shop).await?,
            OrderAction::Show { id } => commands::orders::show(&mut shop, id).await?,
            OrderAction::SetStatus { id, status } => {
                commands::orders::set_status(&mut shop, id, status).await?;
            }
        },
    }
    Ok(())
}
