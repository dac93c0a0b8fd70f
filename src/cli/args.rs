use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use trip_spotlight::api::types::BudgetLevel;
use trip_spotlight::config::{Config, DEFAULT_API_BASE_URL, DEFAULT_WIKIPEDIA_URL};
use trip_spotlight::model::AgentTheme;

#[derive(Parser)]
#[command(
    name = "trip_spotlight",
    version,
    about = "Plan road trips, then tweak, budget, illustrate and share the results"
)]
pub struct Cli {
    /// Path to the local store (SQLite)
    #[arg(long, global = true, env = "TRIP_SPOTLIGHT_DB")]
    pub db: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true, env = "TRIP_SPOTLIGHT_API", default_value = DEFAULT_API_BASE_URL)]
    pub api: String,

    /// Wikipedia page-summary endpoint used for city images
    #[arg(long, global = true, env = "TRIP_SPOTLIGHT_WIKIPEDIA", default_value = DEFAULT_WIKIPEDIA_URL)]
    pub wikipedia_url: String,

    /// HTTP request timeout (milliseconds)
    #[arg(long, global = true, default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Delay between job status checks (milliseconds)
    #[arg(long, global = true, default_value_t = 2_000)]
    pub poll_interval_ms: u64,

    /// Status checks before giving up on a generation job
    #[arg(long, global = true, default_value_t = 120)]
    pub poll_max_attempts: u32,

    #[command(subcommand)]
    pub cmd: Commands,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            api_base_url: self.api.clone(),
            wikipedia_url: self.wikipedia_url.clone(),
            request_timeout: Duration::from_millis(self.timeout_ms),
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            poll_max_attempts: self.poll_max_attempts,
            store_path: self.db.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate themed route variants and store them for `spotlight`
    Plan(PlanArgs),

    /// Interactive results session over the last generated route
    Spotlight,

    /// Resolve a photo for a city (cache, Wikipedia, backend proxy)
    Image {
        city: String,

        #[arg(long)]
        country: Option<String>,
    },

    /// Budget every variant of the last generated route
    Budget(BudgetArgs),

    /// Rich details for a city (highlights, food, stays, events, warnings)
    City {
        name: String,

        #[arg(long)]
        country: Option<String>,
    },

    /// Sign in and remember the token locally
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "TRIP_SPOTLIGHT_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored token
    Logout,

    /// Create a public share link for a saved route
    Share { route_id: String },

    /// Revoke the share link of a saved route
    Unshare {
        route_id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Browse and clone community routes
    Market {
        #[command(subcommand)]
        cmd: MarketCmd,
    },

    /// Inspect or clear the local store
    Cache {
        #[command(subcommand)]
        cmd: CacheCmd,
    },
}

#[derive(Args, Clone)]
pub struct PlanArgs {
    #[arg(long)]
    pub from: String,

    #[arg(long)]
    pub to: String,

    /// Number of intermediate stops
    #[arg(long, default_value_t = 3)]
    pub stops: u32,

    /// budget | moderate | luxury
    #[arg(long, default_value = "moderate")]
    pub budget: BudgetLevel,

    /// Comma-separated themes (adventure, culture, food, hidden-gems, best-overall)
    #[arg(long, value_delimiter = ',', default_value = "adventure,culture,food,hidden-gems,best-overall")]
    pub agents: Vec<AgentTheme>,

    /// Nights per stop, e.g. `--nights Lyon=2 --nights Montpellier=1`
    #[arg(long = "nights", value_name = "CITY=N")]
    pub nights: Vec<String>,
}

#[derive(Args, Clone, Copy)]
pub struct BudgetArgs {
    /// Trip length in days
    #[arg(long, default_value_t = 7)]
    pub days: u32,

    #[arg(long, default_value_t = 2)]
    pub travelers: u32,

    /// budget | moderate | luxury (defaults to the level used for `plan`)
    #[arg(long)]
    pub level: Option<BudgetLevel>,
}

#[derive(Subcommand)]
pub enum MarketCmd {
    /// List public routes
    List {
        #[arg(long)]
        search: Option<String>,

        #[arg(long)]
        theme: Option<AgentTheme>,

        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        limit: u32,
    },

    /// Show a public route
    Show { slug: String },

    /// Copy a public route into your saved routes
    Clone { slug: String },

    /// Publish one of your saved routes
    Publish {
        route_id: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum CacheCmd {
    /// Show store path, schema and entry counts
    Status,

    /// Drop every cached city image
    Clear {
        #[arg(long)]
        yes: bool,
    },
}
