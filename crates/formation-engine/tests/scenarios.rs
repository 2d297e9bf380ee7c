use drillcraft_common::DrillError;
use drillcraft_engine::shapes::{apply_shape, circle};
use drillcraft_engine::{Direction, Playback, Shape, TimelineStore};
use drillcraft_model::{
    centroid, DrillDocument, DrillSet, PerformerId, PositionMap, SetId, Settings, SnapMode,
    WorldPos,
};

fn pid(s: &str) -> PerformerId {
    PerformerId::from(s)
}

fn free() -> Settings {
    Settings::with_snap(SnapMode::Free)
}

fn set_with(id: &str, start: u32, pos: &[(&str, f64, f64)]) -> DrillSet {
    let mut set = DrillSet::new(SetId::from(id), start);
    for (p, x, y) in pos {
        set.positions.insert(pid(p), WorldPos::new(*x, *y));
    }
    set
}

fn scenario_a_store() -> TimelineStore {
    let mut store = TimelineStore::new();
    store.restore_state(
        vec![
            set_with("s1", 0, &[("P1", 10.0, 10.0)]),
            set_with("s2", 16, &[("P1", 20.0, 10.0)]),
        ],
        vec![],
        None,
    );
    store
}

#[test]
fn scenario_a_resolver_interpolates_midpoint() {
    let store = scenario_a_store();
    let p = store.resolve(8.0)[&pid("P1")];
    assert!((p.x - 15.0).abs() < 1e-9);
    assert!((p.y - 10.0).abs() < 1e-9);
}

#[test]
fn scenario_b_insert_on_owned_count_conflicts() {
    let mut store = scenario_a_store();
    let before = store.sets().to_vec();
    let active_before = store.active_set_id().cloned();

    let err = store.insert_at_count(16.0).unwrap_err();
    assert!(matches!(err, DrillError::Conflict { count: 16, .. }));
    assert!(err.is_blocking());
    assert_eq!(store.sets(), before.as_slice());
    assert_eq!(store.active_set_id().cloned(), active_before);
}

#[test]
fn scenario_c_circle_anchored_on_selection_centroid() {
    let ids = [pid("P1"), pid("P2"), pid("P3")];
    let current = PositionMap::from([
        (pid("P1"), WorldPos::new(0.0, 0.0)),
        (pid("P2"), WorldPos::new(10.0, 0.0)),
        (pid("P3"), WorldPos::new(5.0, 8.0)),
    ]);
    let before = centroid(current.values()).unwrap();
    assert!((before.y - 8.0 / 3.0).abs() < 1e-9);

    let points = circle(WorldPos::ORIGIN, 5.0, ids.len(), 0.0);
    let out = apply_shape(&ids, &points, &current).unwrap();
    let after = centroid(out.values()).unwrap();
    assert!((after.x - before.x).abs() < 1e-9);
    assert!((after.y - before.y).abs() < 1e-9);
    for p in out.values() {
        assert!((p.distance_to(&before) - 5.0).abs() < 1e-9);
    }
}

#[test]
fn scenario_c_through_the_store() {
    let mut store = TimelineStore::new();
    store.restore_state(
        vec![set_with(
            "s1",
            0,
            &[("P1", 10.0, 10.0), ("P2", 20.0, 10.0), ("P3", 15.0, 18.0)],
        )],
        vec![pid("P1"), pid("P2"), pid("P3")],
        None,
    );
    let before = centroid(store.active_set().unwrap().positions.values()).unwrap();

    store.arrange(&Shape::circle(5.0), &free()).unwrap();

    let positions = &store.active_set().unwrap().positions;
    let after = centroid(positions.values()).unwrap();
    assert!(after.distance_to(&before) < 1e-9);
    for p in positions.values() {
        assert!((p.distance_to(&after) - 5.0).abs() < 1e-9);
    }
}

#[test]
fn scenario_c_empty_selection_leaves_timeline() {
    let mut store = scenario_a_store();
    let before = store.sets().to_vec();
    let err = store.arrange(&Shape::circle(5.0), &free()).unwrap_err();
    assert!(matches!(err, DrillError::EmptySelection { .. }));
    assert_eq!(store.sets(), before.as_slice());
}

#[test]
fn scenario_d_group_move_clamps_each_performer() {
    let mut store = TimelineStore::new();
    store.restore_state(
        vec![set_with("s1", 0, &[("P1", 10.0, 10.0), ("P2", 49.0, 39.5), ("P3", 1.0, 1.0)])],
        vec![pid("P1"), pid("P2")],
        None,
    );

    store
        .move_performer(&pid("P1"), WorldPos::new(12.0, 11.0), &free())
        .unwrap();

    let set = store.active_set().unwrap();
    assert_eq!(set.position(&pid("P1")), Some(&WorldPos::new(12.0, 11.0)));
    // Shifted by (2, 1) and stopped at the field edge on its own.
    assert_eq!(set.position(&pid("P2")), Some(&WorldPos::new(50.0, 40.0)));
    // Not selected, untouched.
    assert_eq!(set.position(&pid("P3")), Some(&WorldPos::new(1.0, 1.0)));
}

#[test]
fn scenario_e_removing_point_at_set_start_is_noop() {
    let mut store = scenario_a_store();
    store
        .add_intermediate_point(&pid("P1"), 8, WorldPos::new(15.0, 20.0), &free())
        .unwrap();
    let before = store.sets().to_vec();

    assert!(!store.remove_intermediate_point(&pid("P1"), 16));
    assert_eq!(store.sets(), before.as_slice());
    assert_eq!(
        store.set(&SetId::from("s2")).unwrap().position(&pid("P1")),
        Some(&WorldPos::new(20.0, 10.0))
    );
}

#[test]
fn new_set_on_a_stranded_keyframe_resolves_to_its_base() {
    let mut store = scenario_a_store();
    store
        .add_intermediate_point(&pid("P1"), 8, WorldPos::new(30.0, 30.0), &free())
        .unwrap();
    store.reorder(&SetId::from("s1"), Direction::Later).unwrap();
    let inserted = store.insert_at_count(8.0).unwrap();

    let base = *store.set(&inserted).unwrap().position(&pid("P1")).unwrap();
    assert_eq!(base, WorldPos::new(20.0, 10.0));
    assert_eq!(store.resolve(8.0)[&pid("P1")], base);
    assert!(!store.remove_intermediate_point(&pid("P1"), 8));
    assert!(store.sets().iter().all(|s| s.positions_by_count.is_empty()));
}

#[test]
fn resolver_returns_exact_keyframes_at_set_starts() {
    let doc = DrillDocument::sample();
    let store = TimelineStore::from_document(&doc);
    for set in store.sets() {
        let resolved = store.resolve(set.start_count as f64);
        for (id, pos) in &set.positions {
            assert_eq!(&resolved[id], pos);
        }
    }
}

#[test]
fn editing_session_workflow() {
    let settings = Settings::default();
    let mut store = TimelineStore::new();
    store.sync_roster(&[pid("a"), pid("b"), pid("c"), pid("d")], &settings);

    let first = store.append_at_tail(&settings);
    // Placement only happens on sync, for sets that exist at that time.
    store.sync_roster(&[pid("a"), pid("b"), pid("c"), pid("d")], &settings);
    assert!(store.set(&first).unwrap().positions.is_empty());

    store.restore_state(Vec::new(), Vec::new(), None);
    let first = store.append_at_tail(&settings);
    store.sync_roster(
        &[pid("a"), pid("b"), pid("c"), pid("d"), pid("e")],
        &settings,
    );
    assert_eq!(store.set(&first).unwrap().positions.len(), 1);

    store.arrange_line(&settings).unwrap();
    assert_eq!(store.set(&first).unwrap().positions.len(), 5);

    let second = store.append_at_tail(&settings);
    assert_eq!(store.set(&second).unwrap().start_count, 16);
    store.selection_mut().select_bulk(vec![pid("a"), pid("b"), pid("c")]);
    store
        .arrange(&Shape::boxed(4.0, 4.0), &settings)
        .unwrap();

    let third = store.insert_at_count(8.0).unwrap();
    assert_eq!(store.set(&third).unwrap().name, "Set 2");
    assert!(store.reorder(&third, Direction::Later).unwrap());
    assert_eq!(store.set(&third).unwrap().start_count, 16);
    assert_eq!(store.set(&second).unwrap().start_count, 8);

    let mut playback = Playback::for_sets(store.sets(), settings.phrase_length);
    assert_eq!(playback.max_count(), 32.0);
    playback.play();
    playback.tick(0.25);
    let frame = playback.frame(store.sets());
    assert_eq!(frame.len(), 5);
    for pos in frame.values() {
        assert!(settings.contains(pos));
    }
}
