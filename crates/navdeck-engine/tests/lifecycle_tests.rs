// Integration tests for delete, cascade, restore, and permanent delete

mod common;

use common::*;
use navdeck_core::errors::ExErrorKind;
use navdeck_core::lifecycle::LifecycleOutcome;
use navdeck_core::model::NewSite;
use navdeck_engine::commands::{lifecycle, queries};

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

#[test]
fn test_create_appends_to_scope() {
    let mut conn = setup_test_db();
    let a = group(&mut conn, "A");
    let b = group(&mut conn, "B");
    assert_eq!((a.order_num, b.order_num), (0, 1));

    let s1 = site(&mut conn, a.id, "One");
    let s2 = site(&mut conn, a.id, "Two");
    assert_eq!((s1.order_num, s2.order_num), (0, 1));
    assert_eq!(s1.owner_id, OWNER);
}

#[test]
fn test_create_group_validates_name() {
    let mut conn = setup_test_db();
    group(&mut conn, "Tools");

    let err = lifecycle::create_group(OWNER, "  tools ", true, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DuplicateName);

    let err = lifecycle::create_group(OWNER, "   ", true, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);

    // other owners have their own namespace
    assert!(lifecycle::create_group(OTHER_OWNER, "Tools", true, &mut conn).is_ok());
}

#[test]
fn test_create_site_requires_active_group() {
    let mut conn = setup_test_db();
    let g = group(&mut conn, "Tools");
    lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();

    let err = lifecycle::create_site(OWNER, g.id, NewSite::new("A", "https://a"), &mut conn)
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::GroupDeleted);
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[test]
fn test_delete_site_is_idempotent() {
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A", "B"]);

    let first = lifecycle::delete_site(OWNER, s[0].id, &mut conn).unwrap();
    let second = lifecycle::delete_site(OWNER, s[0].id, &mut conn).unwrap();

    assert_eq!(first, LifecycleOutcome::Applied);
    assert_eq!(second, LifecycleOutcome::AlreadyDeleted);
    assert_eq!(active_site_ids(&conn, g.id), vec![s[1].id]);
}

#[test]
fn test_delete_unknown_site_is_not_found() {
    let mut conn = setup_test_db();
    let err = lifecycle::delete_site(OWNER, 77, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_delete_group_cascades_to_active_sites() {
    // GIVEN G = [A, B, C] where A is already trashed
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A", "B", "C"]);
    lifecycle::delete_site(OWNER, s[0].id, &mut conn).unwrap();

    // WHEN G is deleted
    let deletion = lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();

    // THEN B and C were cascaded, G left every active listing
    assert_eq!(deletion.outcome, LifecycleOutcome::Applied);
    assert_eq!(deletion.cascaded_site_ids, vec![s[1].id, s[2].id]);
    assert!(active_group_ids(&conn).is_empty());

    // AND every site is in the trash with its original group_id and order_num
    let trash = queries::list_trash_sites(OWNER, &conn).unwrap();
    assert_eq!(trash.len(), 3);
    for trashed in &trash {
        assert_eq!(trashed.group_id, g.id);
        let original = s.iter().find(|x| x.id == trashed.id).unwrap();
        assert_eq!(trashed.order_num, original.order_num);
    }
    assert_eq!(queries::list_trash_groups(OWNER, &conn).unwrap()[0].id, g.id);
}

#[test]
fn test_delete_group_twice() {
    let mut conn = setup_test_db();
    let (g, _s) = group_with_sites(&mut conn, "G", &["A"]);
    lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();

    let again = lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();

    assert_eq!(again.outcome, LifecycleOutcome::AlreadyDeleted);
    assert!(again.cascaded_site_ids.is_empty());
}

#[test]
fn test_foreign_entities_look_missing() {
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A"]);

    let err = lifecycle::delete_site(OTHER_OWNER, s[0].id, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    let err = lifecycle::delete_group(OTHER_OWNER, g.id, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert!(queries::get_site(OTHER_OWNER, s[0].id, &conn).is_err());
}

// ---------------------------------------------------------------------------
// restore
// ---------------------------------------------------------------------------

#[test]
fn test_restore_site_appends_after_current_last() {
    // GIVEN A is trashed while B and C are reordered around it
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A", "B", "C"]);
    lifecycle::delete_site(OWNER, s[0].id, &mut conn).unwrap();

    // WHEN A is restored
    let restored = lifecycle::restore_site(OWNER, s[0].id, &mut conn).unwrap();

    // THEN A lands after C rather than colliding with a reused position
    assert_eq!(restored.outcome, LifecycleOutcome::Applied);
    assert!(restored.entity.is_active());
    assert!(restored.entity.deleted_at.is_none());
    assert_eq!(restored.entity.order_num, 3);
    assert_eq!(active_site_ids(&conn, g.id), vec![s[1].id, s[2].id, s[0].id]);
}

#[test]
fn test_restore_active_site_is_noop() {
    let mut conn = setup_test_db();
    let (_g, s) = group_with_sites(&mut conn, "G", &["A"]);

    let restored = lifecycle::restore_site(OWNER, s[0].id, &mut conn).unwrap();

    assert_eq!(restored.outcome, LifecycleOutcome::AlreadyActive);
    assert_eq!(restored.entity.order_num, s[0].order_num);
}

#[test]
fn test_restore_site_with_trashed_parent_is_orphaned() {
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A"]);
    lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();

    let err = lifecycle::restore_site(OWNER, s[0].id, &mut conn).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::OrphanedParent);
    assert!(!queries::get_site(OWNER, s[0].id, &conn).unwrap().is_active());
}

#[test]
fn test_restore_site_to_resolves_orphan() {
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A"]);
    let (g2, t) = group_with_sites(&mut conn, "G2", &["D"]);
    lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();

    let restored = lifecycle::restore_site_to(OWNER, s[0].id, g2.id, &mut conn).unwrap();

    assert_eq!(restored.outcome, LifecycleOutcome::Applied);
    assert_eq!(restored.entity.group_id, g2.id);
    assert_eq!(active_site_ids(&conn, g2.id), vec![t[0].id, s[0].id]);
}

#[test]
fn test_restore_site_to_rejects_unusable_target() {
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A"]);
    let g2 = group(&mut conn, "G2");
    lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();
    lifecycle::delete_group(OWNER, g2.id, &mut conn).unwrap();

    let err = lifecycle::restore_site_to(OWNER, s[0].id, g2.id, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::GroupDeleted);

    let err = lifecycle::restore_site_to(OWNER, s[0].id, 5_000, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_restore_site_to_never_moves_active_site() {
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A"]);
    let g2 = group(&mut conn, "G2");

    let restored = lifecycle::restore_site_to(OWNER, s[0].id, g2.id, &mut conn).unwrap();

    assert_eq!(restored.outcome, LifecycleOutcome::AlreadyActive);
    assert_eq!(restored.entity.group_id, g.id);
}

#[test]
fn test_restore_group_leaves_sites_in_trash() {
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A", "B"]);
    let other = group(&mut conn, "Other");
    lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();

    let restored = lifecycle::restore_group(OWNER, g.id, &mut conn).unwrap();

    // appended after the groups that stayed active
    assert_eq!(restored.outcome, LifecycleOutcome::Applied);
    assert_eq!(active_group_ids(&conn), vec![other.id, g.id]);
    assert!(active_site_ids(&conn, g.id).is_empty());

    // each site can now be restored on its own
    lifecycle::restore_site(OWNER, s[1].id, &mut conn).unwrap();
    assert_eq!(active_site_ids(&conn, g.id), vec![s[1].id]);
}

#[test]
fn test_restore_group_name_clash() {
    let mut conn = setup_test_db();
    let g = group(&mut conn, "Tools");
    lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();
    group(&mut conn, "TOOLS");

    let err = lifecycle::restore_group(OWNER, g.id, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DuplicateName);
}

// ---------------------------------------------------------------------------
// permanent delete
// ---------------------------------------------------------------------------

#[test]
fn test_permanent_delete_requires_trash() {
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A"]);

    let err = lifecycle::permanently_delete_site(OWNER, s[0].id, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotTrashed);
    let err = lifecycle::permanently_delete_group(OWNER, g.id, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotTrashed);

    // the active rows are untouched
    assert_eq!(active_site_ids(&conn, g.id), vec![s[0].id]);
}

#[test]
fn test_permanent_delete_then_restore_is_not_found() {
    let mut conn = setup_test_db();
    let (_g, s) = group_with_sites(&mut conn, "G", &["A"]);
    lifecycle::delete_site(OWNER, s[0].id, &mut conn).unwrap();

    lifecycle::permanently_delete_site(OWNER, s[0].id, &mut conn).unwrap();

    let err = lifecycle::restore_site(OWNER, s[0].id, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_permanently_deleted_group_leaves_orphans() {
    // GIVEN a trashed group whose sites were cascaded
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A"]);
    let g2 = group(&mut conn, "G2");
    lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();

    // WHEN the group is removed for good
    lifecycle::permanently_delete_group(OWNER, g.id, &mut conn).unwrap();

    // THEN the site stays in the trash pointing at the gone group
    let trash = queries::list_trash_sites(OWNER, &conn).unwrap();
    assert_eq!(trash.len(), 1);
    assert_eq!(trash[0].group_id, g.id);

    // AND only reassignment brings it back
    let err = lifecycle::restore_site(OWNER, s[0].id, &mut conn).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::OrphanedParent);
    assert!(err.message().ends_with("is gone"));
    let restored = lifecycle::restore_site_to(OWNER, s[0].id, g2.id, &mut conn).unwrap();
    assert_eq!(restored.entity.group_id, g2.id);
}

#[test]
fn test_empty_trash() {
    let mut conn = setup_test_db();
    let (g, s) = group_with_sites(&mut conn, "G", &["A", "B"]);
    let (keep, k) = group_with_sites(&mut conn, "Keep", &["K"]);
    lifecycle::delete_group(OWNER, g.id, &mut conn).unwrap();

    let purge = lifecycle::empty_trash(OWNER, &mut conn).unwrap();

    assert_eq!(purge.groups, vec![g.id]);
    assert_eq!(purge.sites, ids(&s));
    assert!(queries::list_trash_sites(OWNER, &conn).unwrap().is_empty());
    assert_eq!(active_site_ids(&conn, keep.id), ids(&k));
}

#[test]
fn test_trash_listing_most_recent_first() {
    let mut conn = setup_test_db();
    let (_g, s) = group_with_sites(&mut conn, "G", &["A", "B"]);
    lifecycle::delete_site(OWNER, s[1].id, &mut conn).unwrap();
    std::thread::sleep(std::time::Duration::from_millis(5));
    lifecycle::delete_site(OWNER, s[0].id, &mut conn).unwrap();

    let trash = queries::list_trash_sites(OWNER, &conn).unwrap();
    assert_eq!(ids(&trash), vec![s[0].id, s[1].id]);
}

#[test]
fn test_record_site_click() {
    let mut conn = setup_test_db();
    let (_g, s) = group_with_sites(&mut conn, "G", &["A"]);
    assert!(s[0].last_clicked_at.is_none());

    let clicked = lifecycle::record_site_click(OWNER, s[0].id, &mut conn).unwrap();

    assert!(clicked.last_clicked_at.is_some());
    assert_eq!(clicked.order_num, s[0].order_num);
}
