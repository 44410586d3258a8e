mod auth;
mod bags;
mod explore;
mod orders;
mod output;
mod seller;
mod stores;
mod theme;

use clap::{Parser, Subcommand};
use foodverse_client::{ClientError, FoodverseClient};
use foodverse_core::{AppConfig, SettingsStore};
use tracing_subscriber::EnvFilter;

use crate::bags::BagCommands;
use crate::explore::ExploreArgs;
use crate::orders::OrderCommands;
use crate::seller::SellerRequestCommands;
use crate::stores::StoreCommands;
use crate::theme::ThemeCommands;

#[derive(Debug, Parser)]
#[command(name = "foodverse")]
#[command(about = "Find and order discounted surplus food nearby")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "FOODVERSE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "FOODVERSE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(long)]
        phone: Option<String>,
        /// Account type (consumer or business)
        #[arg(long)]
        user_type: Option<String>,
        #[arg(long)]
        address: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Search stores and food bags around a location
    Explore(ExploreArgs),
    /// Place and manage orders
    Order {
        #[command(subcommand)]
        command: OrderCommands,
    },
    /// Manage stores
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
    /// Manage food bags
    Bag {
        #[command(subcommand)]
        command: BagCommands,
    },
    /// Apply for, or review, seller accounts
    SellerRequest {
        #[command(subcommand)]
        command: SellerRequestCommands,
    },
    /// Store page customization
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },
}

/// Loaded once per invocation and shared by every command handler.
pub(crate) struct Context {
    pub config: AppConfig,
    pub settings: SettingsStore,
    pub client: FoodverseClient,
}

impl Context {
    fn load(config: AppConfig) -> anyhow::Result<Self> {
        let settings = SettingsStore::new(config.settings_path.clone());
        let mut client = FoodverseClient::new(&config)?;
        // A stored session takes precedence over FOODVERSE_API_TOKEN.
        if let Some(token) = settings.load()?.token() {
            client.set_token(Some(token.to_string()));
        }
        Ok(Self {
            config,
            settings,
            client,
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = foodverse_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("foodverse: run `foodverse --help` for available commands");
        return Ok(());
    };

    tracing::debug!(env = %config.env, api = %config.api_base_url, "starting");
    let mut ctx = Context::load(config)?;
    let result = run(command, &mut ctx).await;

    if let Err(e) = &result {
        if e.downcast_ref::<ClientError>()
            .is_some_and(ClientError::is_unauthorized)
        {
            ctx.settings.clear_auth()?;
            anyhow::bail!("your session has expired; run `foodverse login` to sign in again");
        }
    }
    result
}

async fn run(command: Commands, ctx: &mut Context) -> anyhow::Result<()> {
    match command {
        Commands::Login { email, password } => auth::run_login(ctx, email, password).await,
        Commands::Register {
            name,
            email,
            password,
            phone,
            user_type,
            address,
        } => {
            let request = foodverse_client::RegisterRequest {
                name,
                email,
                password,
                phone,
                user_type,
                address,
            };
            auth::run_register(ctx, &request).await
        }
        Commands::Logout => auth::run_logout(ctx),
        Commands::Whoami => auth::run_whoami(ctx).await,
        Commands::Explore(args) => explore::run_explore(ctx, &args).await,
        Commands::Order { command } => orders::run(ctx, command).await,
        Commands::Store { command } => stores::run(ctx, command).await,
        Commands::Bag { command } => bags::run(ctx, command).await,
        Commands::SellerRequest { command } => seller::run(ctx, command).await,
        Commands::Theme { command } => theme::run(ctx, command),
    }
}
