//! Site commands

use clap::{Args, Subcommand};
use navdeck_core::model::{GroupId, NewSite, Site, SiteId};
use navdeck_engine::{EngineCommand, EngineCommandResult};

use super::{unexpected, GlobalArgs, Session};

#[derive(Debug, Args)]
pub struct SitesArgs {
    #[command(subcommand)]
    pub command: SitesCommand,
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List a group's active sites in order
    List {
        #[arg(long)]
        group: GroupId,
    },
    /// Add a site at the end of a group
    Add(AddArgs),
    /// Set the order of all active sites in a group
    Reorder(ReorderArgs),
    /// Move a site to a position in a group
    Move(MoveArgs),
    /// Move a site to the trash
    Delete { id: SiteId },
    /// Restore a trashed site into its own group
    Restore { id: SiteId },
    /// Restore a trashed site into another group
    RestoreTo {
        id: SiteId,
        #[arg(long)]
        group: GroupId,
    },
    /// Record a visit
    Click { id: SiteId },
}

#[derive(Debug, Args)]
pub struct AddArgs {
    #[arg(long)]
    pub group: GroupId,

    pub name: String,

    pub url: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long)]
    pub featured: bool,
}

#[derive(Debug, Args)]
pub struct ReorderArgs {
    #[arg(long)]
    pub group: GroupId,

    /// Every active site id of the group, in the new order
    pub ids: Vec<SiteId>,

    #[arg(long)]
    pub revision: Option<String>,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    pub id: SiteId,

    /// Target group
    #[arg(long)]
    pub to: GroupId,

    /// Zero-based position; past the end appends
    #[arg(long, default_value_t = 0)]
    pub index: usize,

    /// Revision of the target group
    #[arg(long)]
    pub revision: Option<String>,
}

pub fn execute(global: &GlobalArgs, args: SitesArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open(global)?;

    match args.command {
        SitesCommand::List { group } => {
            match session.run(EngineCommand::ListSites { group_id: group })? {
                EngineCommandResult::Sites(listing) => {
                    for site in &listing.items {
                        print_site(site);
                    }
                    println!("revision: {}", listing.revision);
                }
                other => return Err(unexpected(other)),
            }
        }
        SitesCommand::Add(add) => {
            let mut site = NewSite::new(add.name, add.url);
            site.description = add.description;
            site.is_featured = add.featured;
            match session.run(EngineCommand::CreateSite {
                group_id: add.group,
                site,
            })? {
                EngineCommandResult::Site(site) => {
                    println!("Site created:");
                    print_site(&site);
                }
                other => return Err(unexpected(other)),
            }
        }
        SitesCommand::Reorder(reorder) => match session.run(EngineCommand::ReorderSites {
            group_id: reorder.group,
            ordered_site_ids: reorder.ids,
            expected_revision: reorder.revision,
        })? {
            EngineCommandResult::Reordered(outcome) => {
                println!("Sites reordered: {} updated", outcome.updated);
                println!("revision: {}", outcome.revision);
            }
            other => return Err(unexpected(other)),
        },
        SitesCommand::Move(mv) => match session.run(EngineCommand::MoveSite {
            site_id: mv.id,
            target_group_id: mv.to,
            target_index: mv.index,
            expected_revision: mv.revision,
        })? {
            EngineCommandResult::Site(site) => {
                println!("Site moved to group {}:", site.group_id);
                print_site(&site);
            }
            other => return Err(unexpected(other)),
        },
        SitesCommand::Delete { id } => {
            match session.run(EngineCommand::DeleteSite { site_id: id })? {
                EngineCommandResult::SiteDeleted { outcome } => {
                    println!("Site {} deleted ({:?})", id, outcome);
                }
                other => return Err(unexpected(other)),
            }
        }
        SitesCommand::Restore { id } => {
            let result = session.run(EngineCommand::RestoreSite { site_id: id })?;
            print_restored(id, result)?;
        }
        SitesCommand::RestoreTo { id, group } => {
            let result = session.run(EngineCommand::RestoreSiteTo {
                site_id: id,
                new_group_id: group,
            })?;
            print_restored(id, result)?;
        }
        SitesCommand::Click { id } => {
            match session.run(EngineCommand::RecordSiteClick { site_id: id })? {
                EngineCommandResult::Site(site) => print_site(&site),
                other => return Err(unexpected(other)),
            }
        }
    }

    Ok(())
}

fn print_restored(id: SiteId, result: EngineCommandResult) -> Result<(), Box<dyn std::error::Error>> {
    match result {
        EngineCommandResult::SiteRestored(restored) => {
            println!("Site {} restored ({:?})", id, restored.outcome);
            print_site(&restored.entity);
            Ok(())
        }
        other => Err(unexpected(other)),
    }
}

pub(crate) fn print_site(site: &Site) {
    println!(
        "  {:>4}  #{:<3} {}  {}  (group {})",
        site.id, site.order_num, site.name, site.url, site.group_id
    );
}
