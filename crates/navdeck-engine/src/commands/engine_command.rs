//! Engine command boundary.
//!
//! `EngineCommand` is the JSON request shape consumed by the thin transport
//! layer in front of the engine; `apply_engine_command` dispatches it to the
//! handlers. Requests are tagged by `op`:
//!
//! ```json
//! {"op": "moveSite", "site_id": 4, "target_group_id": 2, "target_index": 0}
//! ```

#![allow(clippy::result_large_err)]

use navdeck_core::batch::{BatchOperation, BatchReport};
use navdeck_core::errors::{ExError, ExErrorKind};
use navdeck_core::lifecycle::LifecycleOutcome;
use navdeck_core::model::{EntityKind, Group, GroupId, NewSite, Site, SiteId};
use navdeck_core_types::RequestContext;
use navdeck_store::errors::Result;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::lifecycle::{GroupDeletion, Restored, TrashPurge};
use super::ordering::ReorderOutcome;
use super::queries::ScopeListing;
use super::{batch, lifecycle, ordering, queries};

fn default_public() -> bool {
    true
}

/// A request to the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum EngineCommand {
    CreateGroup {
        name: String,
        #[serde(default = "default_public")]
        is_public: bool,
    },
    CreateSite {
        group_id: GroupId,
        site: NewSite,
    },
    ReorderSites {
        group_id: GroupId,
        ordered_site_ids: Vec<SiteId>,
        #[serde(default)]
        expected_revision: Option<String>,
    },
    ReorderGroups {
        ordered_group_ids: Vec<GroupId>,
        #[serde(default)]
        expected_revision: Option<String>,
    },
    MoveSite {
        site_id: SiteId,
        target_group_id: GroupId,
        target_index: usize,
        /// Revision of the target group
        #[serde(default)]
        expected_revision: Option<String>,
    },
    CompactSites {
        group_id: GroupId,
    },
    CompactGroups,
    DeleteSite {
        site_id: SiteId,
    },
    DeleteGroup {
        group_id: GroupId,
    },
    RestoreSite {
        site_id: SiteId,
    },
    RestoreSiteTo {
        site_id: SiteId,
        new_group_id: GroupId,
    },
    RestoreGroup {
        group_id: GroupId,
    },
    PermanentlyDeleteSite {
        site_id: SiteId,
    },
    PermanentlyDeleteGroup {
        group_id: GroupId,
    },
    EmptyTrash,
    BatchApply {
        kind: EntityKind,
        operation: BatchOperation,
        ids: Vec<i64>,
    },
    RecordSiteClick {
        site_id: SiteId,
    },
    ListGroups,
    ListSites {
        group_id: GroupId,
    },
    GetGroup {
        group_id: GroupId,
    },
    GetSite {
        site_id: SiteId,
    },
    ListTrashSites,
    ListTrashGroups,
}

impl EngineCommand {
    /// Wire name of the command
    pub fn op_name(&self) -> &'static str {
        match self {
            EngineCommand::CreateGroup { .. } => "createGroup",
            EngineCommand::CreateSite { .. } => "createSite",
            EngineCommand::ReorderSites { .. } => "reorderSites",
            EngineCommand::ReorderGroups { .. } => "reorderGroups",
            EngineCommand::MoveSite { .. } => "moveSite",
            EngineCommand::CompactSites { .. } => "compactSites",
            EngineCommand::CompactGroups => "compactGroups",
            EngineCommand::DeleteSite { .. } => "deleteSite",
            EngineCommand::DeleteGroup { .. } => "deleteGroup",
            EngineCommand::RestoreSite { .. } => "restoreSite",
            EngineCommand::RestoreSiteTo { .. } => "restoreSiteTo",
            EngineCommand::RestoreGroup { .. } => "restoreGroup",
            EngineCommand::PermanentlyDeleteSite { .. } => "permanentlyDeleteSite",
            EngineCommand::PermanentlyDeleteGroup { .. } => "permanentlyDeleteGroup",
            EngineCommand::EmptyTrash => "emptyTrash",
            EngineCommand::BatchApply { .. } => "batchApply",
            EngineCommand::RecordSiteClick { .. } => "recordSiteClick",
            EngineCommand::ListGroups => "listGroups",
            EngineCommand::ListSites { .. } => "listSites",
            EngineCommand::GetGroup { .. } => "getGroup",
            EngineCommand::GetSite { .. } => "getSite",
            EngineCommand::ListTrashSites => "listTrashSites",
            EngineCommand::ListTrashGroups => "listTrashGroups",
        }
    }
}

/// Result of applying an engine command
///
/// Serializes as the bare payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EngineCommandResult {
    Group(Group),
    Site(Site),
    Reordered(ReorderOutcome),
    SiteDeleted { outcome: LifecycleOutcome },
    GroupDeleted(GroupDeletion),
    SiteRestored(Restored<Site>),
    GroupRestored(Restored<Group>),
    PermanentlyDeleted { id: i64 },
    TrashEmptied(TrashPurge),
    Batch(BatchReport),
    Groups(ScopeListing<Group>),
    Sites(ScopeListing<Site>),
    TrashSites(Vec<Site>),
    TrashGroups(Vec<Group>),
}

/// Apply an engine command on behalf of `ctx.owner_id`
///
/// Errors carry the request id of `ctx`.
pub fn apply_engine_command(
    cmd: EngineCommand,
    conn: &mut Connection,
    ctx: &RequestContext,
) -> Result<EngineCommandResult> {
    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id,
        trace_id = ctx.trace_id.as_ref().map(|t| t.as_str()),
        op = cmd.op_name()
    );
    let _guard = span.enter();

    dispatch(cmd, conn, &ctx.owner_id).map_err(|e| e.with_request_id(ctx.request_id.clone()))
}

fn dispatch(cmd: EngineCommand, conn: &mut Connection, owner: &str) -> Result<EngineCommandResult> {
    use EngineCommandResult as R;

    let result = match cmd {
        EngineCommand::CreateGroup { name, is_public } => {
            R::Group(lifecycle::create_group(owner, &name, is_public, conn)?)
        }
        EngineCommand::CreateSite { group_id, site } => {
            R::Site(lifecycle::create_site(owner, group_id, site, conn)?)
        }
        EngineCommand::ReorderSites {
            group_id,
            ordered_site_ids,
            expected_revision,
        } => R::Reordered(ordering::reorder_sites(
            owner,
            group_id,
            &ordered_site_ids,
            expected_revision.as_deref(),
            conn,
        )?),
        EngineCommand::ReorderGroups {
            ordered_group_ids,
            expected_revision,
        } => R::Reordered(ordering::reorder_groups(
            owner,
            &ordered_group_ids,
            expected_revision.as_deref(),
            conn,
        )?),
        EngineCommand::MoveSite {
            site_id,
            target_group_id,
            target_index,
            expected_revision,
        } => R::Site(ordering::move_site(
            owner,
            site_id,
            target_group_id,
            target_index,
            expected_revision.as_deref(),
            conn,
        )?),
        EngineCommand::CompactSites { group_id } => {
            R::Reordered(ordering::compact_sites(owner, group_id, conn)?)
        }
        EngineCommand::CompactGroups => R::Reordered(ordering::compact_groups(owner, conn)?),
        EngineCommand::DeleteSite { site_id } => R::SiteDeleted {
            outcome: lifecycle::delete_site(owner, site_id, conn)?,
        },
        EngineCommand::DeleteGroup { group_id } => {
            R::GroupDeleted(lifecycle::delete_group(owner, group_id, conn)?)
        }
        EngineCommand::RestoreSite { site_id } => {
            R::SiteRestored(lifecycle::restore_site(owner, site_id, conn)?)
        }
        EngineCommand::RestoreSiteTo {
            site_id,
            new_group_id,
        } => R::SiteRestored(lifecycle::restore_site_to(owner, site_id, new_group_id, conn)?),
        EngineCommand::RestoreGroup { group_id } => {
            R::GroupRestored(lifecycle::restore_group(owner, group_id, conn)?)
        }
        EngineCommand::PermanentlyDeleteSite { site_id } => {
            lifecycle::permanently_delete_site(owner, site_id, conn)?;
            R::PermanentlyDeleted { id: site_id }
        }
        EngineCommand::PermanentlyDeleteGroup { group_id } => {
            lifecycle::permanently_delete_group(owner, group_id, conn)?;
            R::PermanentlyDeleted { id: group_id }
        }
        EngineCommand::EmptyTrash => R::TrashEmptied(lifecycle::empty_trash(owner, conn)?),
        EngineCommand::BatchApply {
            kind,
            operation,
            ids,
        } => R::Batch(batch::batch_apply(owner, kind, &operation, &ids, conn)?),
        EngineCommand::RecordSiteClick { site_id } => {
            R::Site(lifecycle::record_site_click(owner, site_id, conn)?)
        }
        EngineCommand::ListGroups => R::Groups(queries::list_groups(owner, conn)?),
        EngineCommand::ListSites { group_id } => {
            R::Sites(queries::list_sites(owner, group_id, conn)?)
        }
        EngineCommand::GetGroup { group_id } => R::Group(queries::get_group(owner, group_id, conn)?),
        EngineCommand::GetSite { site_id } => R::Site(queries::get_site(owner, site_id, conn)?),
        EngineCommand::ListTrashSites => R::TrashSites(queries::list_trash_sites(owner, conn)?),
        EngineCommand::ListTrashGroups => R::TrashGroups(queries::list_trash_groups(owner, conn)?),
    };
    Ok(result)
}

/// Parse a JSON request, apply it, and render the JSON response
///
/// Never fails: every error becomes an `{"ok": false, ...}` envelope.
pub fn handle_json_request(request: &str, conn: &mut Connection, ctx: &RequestContext) -> Value {
    let outcome = serde_json::from_str::<EngineCommand>(request)
        .map_err(|e| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_request")
                .with_request_id(ctx.request_id.clone())
                .with_message(e.to_string())
        })
        .and_then(|cmd| apply_engine_command(cmd, conn, ctx));
    render_response(&outcome)
}

/// Render a command outcome as the JSON response envelope
pub fn render_response(outcome: &Result<EngineCommandResult>) -> Value {
    match outcome {
        Ok(result) => match serde_json::to_value(result) {
            Ok(value) => json!({ "ok": true, "result": value }),
            Err(e) => error_envelope(
                &ExError::new(ExErrorKind::Serialization)
                    .with_op("render_response")
                    .with_message(e.to_string()),
            ),
        },
        Err(err) => error_envelope(err),
    }
}

/// `{"ok": false, "error": {code, kind, message, entityId}}`
pub fn error_envelope(err: &ExError) -> Value {
    json!({
        "ok": false,
        "error": {
            "code": err.code(),
            "kind": err.kind(),
            "message": err.message(),
            "entityId": err.entity_id(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_parsing_uses_op_tag() {
        let cmd: EngineCommand = serde_json::from_str(
            r#"{"op":"moveSite","site_id":4,"target_group_id":2,"target_index":0}"#,
        )
        .unwrap();
        assert_eq!(
            cmd,
            EngineCommand::MoveSite {
                site_id: 4,
                target_group_id: 2,
                target_index: 0,
                expected_revision: None,
            }
        );
        assert_eq!(cmd.op_name(), "moveSite");
    }

    #[test]
    fn test_create_group_defaults_public() {
        let cmd: EngineCommand =
            serde_json::from_str(r#"{"op":"createGroup","name":"Tools"}"#).unwrap();
        assert_eq!(
            cmd,
            EngineCommand::CreateGroup {
                name: "Tools".to_string(),
                is_public: true
            }
        );
    }

    #[test]
    fn test_unit_commands_parse() {
        let cmd: EngineCommand = serde_json::from_str(r#"{"op":"emptyTrash"}"#).unwrap();
        assert_eq!(cmd, EngineCommand::EmptyTrash);
    }

    #[test]
    fn test_error_envelope_shape() {
        let err = ExError::new(ExErrorKind::OrphanedParent)
            .with_entity_id(9)
            .with_message("Cannot restore site 9: its group 2 is deleted");
        let value = error_envelope(&err);
        assert_eq!(value["ok"], json!(false));
        assert_eq!(value["error"]["code"], json!("ERR_ORPHANED_PARENT"));
        assert_eq!(value["error"]["kind"], json!("OrphanedParent"));
        assert_eq!(value["error"]["entityId"], json!("9"));
    }
}
