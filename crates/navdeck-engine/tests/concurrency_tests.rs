// Concurrent writers on separate connections to one database file

mod common;

use common::*;
use navdeck_core::model::NewSite;
use navdeck_engine::commands::{lifecycle, ordering};
use navdeck_store::db::{open_store, StoreConfig};

#[test]
fn test_concurrent_appends_get_distinct_positions() {
    let (_dir, path) = setup_file_db();
    let group_id = {
        let mut conn = open_store(&path, &StoreConfig::default()).unwrap();
        group(&mut conn, "Shared").id
    };

    let workers: Vec<_> = (0..4)
        .map(|worker| {
            let path = path.clone();
            std::thread::spawn(move || {
                let mut conn = open_store(&path, &StoreConfig::default()).unwrap();
                for i in 0..5 {
                    let site = NewSite::new(format!("w{}-{}", worker, i), "https://x.example");
                    lifecycle::create_site(OWNER, group_id, site, &mut conn).unwrap();
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    let conn = open_store(&path, &StoreConfig::default()).unwrap();
    let sites = navdeck_engine::commands::queries::list_sites(OWNER, group_id, &conn)
        .unwrap()
        .items;
    let mut positions: Vec<i64> = sites.iter().map(|s| s.order_num).collect();
    positions.sort_unstable();
    assert_eq!(positions, (0..20).collect::<Vec<i64>>());
}

#[test]
fn test_move_and_delete_race_leaves_consistent_state() {
    let (_dir, path) = setup_file_db();
    let (g1, s, g2) = {
        let mut conn = open_store(&path, &StoreConfig::default()).unwrap();
        let (g1, s) = group_with_sites(&mut conn, "G1", &["A", "B", "C"]);
        let g2 = group(&mut conn, "G2");
        (g1.id, s, g2.id)
    };

    let mover = {
        let path = path.clone();
        let site_id = s[1].id;
        std::thread::spawn(move || {
            let mut conn = open_store(&path, &StoreConfig::default()).unwrap();
            ordering::move_site(OWNER, site_id, g2, 0, None, &mut conn)
        })
    };
    let deleter = {
        let path = path.clone();
        std::thread::spawn(move || {
            let mut conn = open_store(&path, &StoreConfig::default()).unwrap();
            lifecycle::delete_group(OWNER, g1, &mut conn)
        })
    };
    let moved = mover.join().unwrap();
    deleter.join().unwrap().unwrap();

    // B is either in G2 (moved first) or in the trash with G1 (deleted first)
    let conn = open_store(&path, &StoreConfig::default()).unwrap();
    let b = navdeck_engine::commands::queries::get_site(OWNER, s[1].id, &conn).unwrap();
    if moved.is_ok() {
        assert_eq!(b.group_id, g2);
        assert!(b.is_active());
    } else {
        assert_eq!(b.group_id, g1);
        assert!(!b.is_active());
    }
    assert_eq!(active_site_ids(&conn, g2).len(), usize::from(moved.is_ok()));
}
