//! Group commands

use clap::{Args, Subcommand};
use navdeck_core::model::{Group, GroupId};
use navdeck_engine::{EngineCommand, EngineCommandResult};

use super::{unexpected, GlobalArgs, Session};

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List active groups in order
    List,
    /// Create a group at the end of the order
    Add(AddArgs),
    /// Set the order of all active groups
    Reorder(ReorderArgs),
    /// Renumber positions to 0..n-1
    Compact,
    /// Move a group and its sites to the trash
    Delete { id: GroupId },
    /// Restore a trashed group (its sites stay in the trash)
    Restore { id: GroupId },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    pub name: String,

    #[arg(long)]
    pub private: bool,
}

#[derive(Debug, Args)]
pub struct ReorderArgs {
    /// Every active group id, in the new order
    pub ids: Vec<GroupId>,

    /// Revision printed by `groups list`
    #[arg(long)]
    pub revision: Option<String>,
}

pub fn execute(global: &GlobalArgs, args: GroupsArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open(global)?;

    match args.command {
        GroupsCommand::List => match session.run(EngineCommand::ListGroups)? {
            EngineCommandResult::Groups(listing) => {
                for group in &listing.items {
                    print_group(group);
                }
                println!("revision: {}", listing.revision);
            }
            other => return Err(unexpected(other)),
        },
        GroupsCommand::Add(add) => match session.run(EngineCommand::CreateGroup {
            name: add.name,
            is_public: !add.private,
        })? {
            EngineCommandResult::Group(group) => {
                println!("Group created:");
                print_group(&group);
            }
            other => return Err(unexpected(other)),
        },
        GroupsCommand::Reorder(reorder) => match session.run(EngineCommand::ReorderGroups {
            ordered_group_ids: reorder.ids,
            expected_revision: reorder.revision,
        })? {
            EngineCommandResult::Reordered(outcome) => {
                println!("Groups reordered: {} updated", outcome.updated);
                println!("revision: {}", outcome.revision);
            }
            other => return Err(unexpected(other)),
        },
        GroupsCommand::Compact => match session.run(EngineCommand::CompactGroups)? {
            EngineCommandResult::Reordered(outcome) => {
                println!("Groups compacted: {} updated", outcome.updated);
            }
            other => return Err(unexpected(other)),
        },
        GroupsCommand::Delete { id } => {
            match session.run(EngineCommand::DeleteGroup { group_id: id })? {
                EngineCommandResult::GroupDeleted(deletion) => {
                    println!("Group {} deleted ({:?})", id, deletion.outcome);
                    println!("  cascaded sites: {:?}", deletion.cascaded_site_ids);
                }
                other => return Err(unexpected(other)),
            }
        }
        GroupsCommand::Restore { id } => {
            match session.run(EngineCommand::RestoreGroup { group_id: id })? {
                EngineCommandResult::GroupRestored(restored) => {
                    println!("Group {} restored ({:?})", id, restored.outcome);
                    print_group(&restored.entity);
                }
                other => return Err(unexpected(other)),
            }
        }
    }

    Ok(())
}

pub(crate) fn print_group(group: &Group) {
    let state = if group.is_active() { "" } else { " [trashed]" };
    println!("  {:>4}  #{:<3} {}{}", group.id, group.order_num, group.name, state);
}
