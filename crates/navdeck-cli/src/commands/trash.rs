//! Trash commands

use clap::{Args, Subcommand};
use navdeck_core::batch::{BatchOperation, BatchReport};
use navdeck_core::model::{EntityKind, GroupId};
use navdeck_engine::{EngineCommand, EngineCommandResult};

use super::groups::print_group;
use super::sites::print_site;
use super::{unexpected, GlobalArgs, Session};

#[derive(Debug, Args)]
pub struct TrashArgs {
    #[command(subcommand)]
    pub command: TrashCommand,
}

#[derive(Debug, Subcommand)]
pub enum TrashCommand {
    /// List trashed groups and sites, most recent first
    List,
    /// Restore several trashed entities
    Restore(SelectArgs),
    /// Restore several trashed sites into one group
    RestoreTo {
        #[arg(long)]
        group: GroupId,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Permanently delete several trashed entities
    Purge(SelectArgs),
    /// Permanently delete everything in the trash
    Empty,
}

#[derive(Debug, Args)]
pub struct SelectArgs {
    /// Treat ids as group ids instead of site ids
    #[arg(long)]
    pub groups: bool,

    #[arg(required = true)]
    pub ids: Vec<i64>,
}

impl SelectArgs {
    fn kind(&self) -> EntityKind {
        if self.groups {
            EntityKind::Group
        } else {
            EntityKind::Site
        }
    }
}

pub fn execute(global: &GlobalArgs, args: TrashArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open(global)?;

    match args.command {
        TrashCommand::List => {
            println!("Groups:");
            match session.run(EngineCommand::ListTrashGroups)? {
                EngineCommandResult::TrashGroups(groups) => groups.iter().for_each(print_group),
                other => return Err(unexpected(other)),
            }
            println!("Sites:");
            match session.run(EngineCommand::ListTrashSites)? {
                EngineCommandResult::TrashSites(sites) => sites.iter().for_each(print_site),
                other => return Err(unexpected(other)),
            }
        }
        TrashCommand::Restore(select) => {
            let cmd = EngineCommand::BatchApply {
                kind: select.kind(),
                operation: BatchOperation::Restore,
                ids: select.ids,
            };
            print_report("restore", session.run(cmd)?)?;
        }
        TrashCommand::RestoreTo { group, ids } => {
            let cmd = EngineCommand::BatchApply {
                kind: EntityKind::Site,
                operation: BatchOperation::RestoreTo { group_id: group },
                ids,
            };
            print_report("restoreTo", session.run(cmd)?)?;
        }
        TrashCommand::Purge(select) => {
            let cmd = EngineCommand::BatchApply {
                kind: select.kind(),
                operation: BatchOperation::PermanentDelete,
                ids: select.ids,
            };
            print_report("permanentDelete", session.run(cmd)?)?;
        }
        TrashCommand::Empty => match session.run(EngineCommand::EmptyTrash)? {
            EngineCommandResult::TrashEmptied(purge) => {
                println!(
                    "Trash emptied: {} groups, {} sites",
                    purge.groups.len(),
                    purge.sites.len()
                );
            }
            other => return Err(unexpected(other)),
        },
    }

    Ok(())
}

fn print_report(op: &str, result: EngineCommandResult) -> Result<(), Box<dyn std::error::Error>> {
    let report: BatchReport = match result {
        EngineCommandResult::Batch(report) => report,
        other => return Err(unexpected(other)),
    };

    println!("{}: {} succeeded, {} failed", op, report.succeeded.len(), report.failed.len());
    if !report.unchanged.is_empty() {
        println!("  unchanged: {:?}", report.unchanged);
    }
    for failure in &report.failed {
        println!("  {}  {}  {}", failure.id, failure.code, failure.message);
    }
    Ok(())
}
