pub mod args;
pub mod color;
pub mod commands;
pub mod formatting;

use anyhow::{Context, Result};
use clap::Parser;
use rusqlite::Connection;
use std::path::PathBuf;

use trip_spotlight::api::ApiClient;
use trip_spotlight::config::Config;
use trip_spotlight::session;
use trip_spotlight::store::{self, paths::resolve_store_path};

/// What every command needs: validated config and where the store lives.
pub struct Ctx {
    pub config: Config,
    pub store_path: PathBuf,
}

impl Ctx {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let store_path = resolve_store_path(config.store_path.as_deref())?;
        Ok(Self { config, store_path })
    }

    pub fn open_store(&self) -> Result<Connection> {
        store::open_store(&self.store_path)
    }

    /// Client carrying the stored token, if the user is signed in.
    pub fn api(&self, con: &Connection) -> Result<ApiClient> {
        let client = ApiClient::new(&self.config).context("Unable to create API client")?;
        match session::load_auth(con)? {
            Some(auth) => Ok(client.with_token(&auth.token)?),
            None => Ok(client),
        }
    }

    pub fn authed_api(&self, con: &Connection) -> Result<ApiClient> {
        let client = self.api(con)?;
        if !client.is_authenticated() {
            anyhow::bail!("You need to sign in first: trip_spotlight login --email <EMAIL>");
        }
        Ok(client)
    }
}

pub fn run() -> Result<()> {
    let cli = args::Cli::parse();
    let ctx = Ctx::new(cli.config())?;
    println!();

    match &cli.cmd {
        args::Commands::Plan(a) => commands::plan::run(&ctx, a),
        args::Commands::Spotlight => commands::spotlight::run(&ctx),
        args::Commands::Image { city, country } => {
            commands::image::run(&ctx, city, country.as_deref())
        }
        args::Commands::Budget(a) => commands::budget::run(&ctx, a),
        args::Commands::City { name, country } => {
            commands::city::run(&ctx, name, country.as_deref())
        }
        args::Commands::Login { email, password } => {
            commands::account::login(&ctx, email, password)
        }
        args::Commands::Logout => commands::account::logout(&ctx),
        args::Commands::Share { route_id } => commands::account::share(&ctx, route_id),
        args::Commands::Unshare { route_id, yes } => {
            commands::account::unshare(&ctx, route_id, *yes)
        }
        args::Commands::Market { cmd } => commands::market::run(&ctx, cmd),
        args::Commands::Cache { cmd } => commands::cache::run(&ctx, cmd),
    }
}
