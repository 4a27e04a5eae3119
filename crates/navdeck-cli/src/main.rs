//! navdeck CLI
//!
//! Command-line front end for the navdeck ordering and lifecycle engine

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Debug, Parser)]
#[command(name = "navdeck")]
#[command(about = "navdeck - ordered bookmark groups with a trash", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: commands::GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create the database and apply migrations
    Init(commands::init::InitArgs),
    /// Send a raw JSON request to the engine
    Apply(commands::apply::ApplyArgs),
    /// Group operations
    Groups(commands::groups::GroupsArgs),
    /// Site operations
    Sites(commands::sites::SitesArgs),
    /// Trash operations
    Trash(commands::trash::TrashArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(&cli.global, args),
        Commands::Apply(args) => commands::apply::execute(&cli.global, args),
        Commands::Groups(args) => commands::groups::execute(&cli.global, args),
        Commands::Sites(args) => commands::sites::execute(&cli.global, args),
        Commands::Trash(args) => commands::trash::execute(&cli.global, args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
