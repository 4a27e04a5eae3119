//! Database initialization command

use clap::Args;

use super::{GlobalArgs, Session};

#[derive(Debug, Args)]
pub struct InitArgs {}

pub fn execute(global: &GlobalArgs, _args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let session = Session::open(global)?;
    let applied = navdeck_store::migrations::applied_migrations(&session.conn)?;

    println!("Database ready: {}", session.db_path.display());
    println!("  migrations: {}", applied.join(", "));
    Ok(())
}
