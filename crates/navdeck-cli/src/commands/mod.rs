//! Subcommands
//!
//! Every subcommand except `apply` builds an `EngineCommand` and prints the
//! result for humans; `apply` passes JSON straight through.

use std::path::PathBuf;

use clap::Args;
use navdeck_core::logging_facility;
use navdeck_core_types::RequestContext;
use navdeck_engine::{apply_engine_command, EngineCommand, EngineCommandResult};
use rusqlite::Connection;

use crate::config::CliConfig;

pub mod apply;
pub mod groups;
pub mod init;
pub mod sites;
pub mod trash;

/// Flags shared by every subcommand
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Config file (defaults to ./navdeck.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true, env = "NAVDECK_DB")]
    pub db: Option<PathBuf>,

    /// Owner the requests act for
    #[arg(long, global = true, env = "NAVDECK_OWNER", default_value = "local")]
    pub owner: String,
}

/// An open store plus the request context for this invocation
pub struct Session {
    pub conn: Connection,
    pub ctx: RequestContext,
    pub db_path: PathBuf,
}

impl Session {
    /// Load config, start logging, and open (creating if needed) the store
    pub fn open(global: &GlobalArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let config = CliConfig::load(global.config.as_deref())?;
        if let Some(profile) = config.logging.profile {
            logging_facility::init(profile);
        }

        let db_path = global
            .db
            .clone()
            .unwrap_or_else(|| config.database.path.clone());
        let conn = navdeck_store::db::open_store(&db_path, &config.database.store_config())?;
        tracing::debug!(db = %db_path.display(), owner = %global.owner, "session opened");

        Ok(Self {
            conn,
            ctx: RequestContext::new(global.owner.clone()),
            db_path,
        })
    }

    pub fn run(&mut self, cmd: EngineCommand) -> Result<EngineCommandResult, Box<dyn std::error::Error>> {
        Ok(apply_engine_command(cmd, &mut self.conn, &self.ctx)?)
    }
}

/// The command returned a result shape its caller did not ask for
pub(crate) fn unexpected(result: EngineCommandResult) -> Box<dyn std::error::Error> {
    format!("unexpected engine result: {:?}", result).into()
}
