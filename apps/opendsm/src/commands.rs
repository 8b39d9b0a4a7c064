//! Command-line surface over the OpenDSM client.
//!
//! Every command prints its result as pretty JSON on stdout.

use crate::error::OpendsmError;

use common::ErrorLocation;

use dsm_client::requests::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE};
use dsm_client::{ClientConfig, Credentials, DsmClient, ProductListType};

use std::collections::BTreeMap;
use std::panic::Location;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Parser)]
#[command(name = "opendsm", version, about = "Query the OpenDSM marketplace")]
pub struct Cli {
    /// OpenDSM host, overriding OPENDSM_HOST
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Directory for opendsm.log
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Show a user by id, or the signed-in user
    User { id: Option<u64> },
    /// Find a user by exact username
    FindUser { username: String },
    /// Search users
    SearchUsers {
        query: String,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Show a product by id
    Product { id: u64 },
    /// List products
    Products {
        #[arg(long = "type", value_enum, default_value_t = ListType::Latest)]
        list_type: ListType,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Search products
    SearchProducts {
        query: String,
        /// Comma separated tag ids
        #[arg(long, value_delimiter = ',')]
        tags: Vec<i64>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// List product tags
    Tags,
    /// List git repositories of the signed-in developer account
    Repositories,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Args)]
pub struct PageArgs {
    #[arg(long, default_value_t = DEFAULT_PAGE)]
    pub page: u32,
    #[arg(long, default_value_t = DEFAULT_ITEMS_PER_PAGE)]
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListType {
    Latest,
    Popular,
}

impl From<ListType> for ProductListType {
    fn from(list_type: ListType) -> Self {
        match list_type {
            ListType::Latest => ProductListType::Latest,
            ListType::Popular => ProductListType::Popular,
        }
    }
}

/// Resolve configuration and credentials, open a session and run the command.
pub fn run(cli: &Cli) -> Result<Value, OpendsmError> {
    let config = match &cli.host {
        Some(host) => ClientConfig::new(host.clone()),
        None => ClientConfig::from_env()?,
    };
    let credentials = Credentials::from_env()?;

    info!("Connecting to {}", config.host);
    let client = DsmClient::new(credentials, &config)?;

    execute(&client, &cli.command)
}

/// Run one command against an open session.
pub fn execute(client: &DsmClient, command: &Command) -> Result<Value, OpendsmError> {
    let users = client.users();
    let products = client.products();

    match command {
        Command::User { id } => to_json(&users.get_user(*id)?),
        Command::FindUser { username } => to_json(&users.get_user_by_username(username)?),
        Command::SearchUsers { query, page } => {
            to_json(&users.search(query, page.page, page.count)?)
        }
        Command::Product { id } => to_json(&products.get_product(*id)?),
        Command::Products { list_type, page } => {
            to_json(&products.get_products((*list_type).into(), page.page, page.count)?)
        }
        Command::SearchProducts { query, tags, page } => {
            to_json(&products.search(query, page.page, page.count, tags)?)
        }
        Command::Tags => to_json(&products.get_tags()?.into_iter().collect::<BTreeMap<_, _>>()),
        Command::Repositories => to_json(
            &users
                .get_repositories()?
                .into_iter()
                .collect::<BTreeMap<_, _>>(),
        ),
    }
}

#[track_caller]
fn to_json<T: Serialize>(value: &T) -> Result<Value, OpendsmError> {
    serde_json::to_value(value).map_err(|e| OpendsmError::Opendsm {
        message: format!("Failed to encode output: {e}"),
        location: ErrorLocation::from(Location::caller()),
    })
}
