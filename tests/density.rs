//! Property tests for id density under arbitrary add/delete sequences.

use agenda::{AreaData, AreaId, EventData, EventDateTime, EventId, Organizer, Store};
use proptest::prelude::*;

#[derive(Clone, Debug)]
enum Op {
    AddArea,
    DeleteArea(usize),
    AddEvent(usize),
    DeleteEvent(usize, usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => Just(Op::AddArea),
        1 => any::<usize>().prop_map(Op::DeleteArea),
        4 => any::<usize>().prop_map(Op::AddEvent),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(a, e)| Op::DeleteEvent(a, e)),
    ]
}

fn when() -> EventDateTime {
    EventDateTime::new(2024, 1, 1, 12, 0).unwrap()
}

fn apply(store: &mut Store, op: &Op, counter: &mut u32) {
    *counter += 1;
    let n = store.area_count();
    match *op {
        Op::AddArea => {
            let id = store
                .add_area(AreaData::new(format!("area-{counter}"), ""))
                .unwrap();
            assert_eq!(id, AreaId(n as u32 + 1));
        }
        Op::DeleteArea(pick) if n > 0 => {
            store.delete_area(AreaId((pick % n) as u32 + 1)).unwrap();
        }
        Op::AddEvent(pick) if n > 0 => {
            let area = AreaId((pick % n) as u32 + 1);
            let before = store.event_count(area).unwrap();
            let id = store
                .add_event(EventData::new(area, format!("event-{counter}"), when()))
                .unwrap();
            assert_eq!(id, EventId(before as u32 + 1));
        }
        Op::DeleteEvent(a, e) if n > 0 => {
            let area = AreaId((a % n) as u32 + 1);
            let m = store.event_count(area).unwrap();
            if m > 0 {
                store.delete_event(area, EventId((e % m) as u32 + 1)).unwrap();
            }
        }
        _ => {}
    }
}

fn assert_dense(store: &Store) {
    let areas = store.list_areas();
    let expected: Vec<_> = (1..=areas.len() as u32).map(AreaId).collect();
    assert_eq!(areas.iter().map(|a| a.id).collect::<Vec<_>>(), expected);

    for area in &areas {
        let events = store.list_events(area.id).unwrap();
        let expected: Vec<_> = (1..=events.len() as u32).map(EventId).collect();
        assert_eq!(events.iter().map(|e| e.id).collect::<Vec<_>>(), expected);
        assert!(events.iter().all(|e| e.area_id == area.id));
    }
}

proptest! {
    #[test]
    fn prop_ids_stay_dense(ops in prop::collection::vec(arb_op(), 0..64)) {
        let mut store = Store::new();
        let mut counter = 0;
        for op in &ops {
            apply(&mut store, op, &mut counter);
            assert_dense(&store);
        }
    }

    #[test]
    fn prop_document_round_trip(ops in prop::collection::vec(arb_op(), 0..48)) {
        let mut store = Store::new();
        let mut counter = 0;
        for op in &ops {
            apply(&mut store, op, &mut counter);
        }

        let text = store.to_xml_string();
        let reloaded = Store::from_xml_str(&text).unwrap();
        prop_assert_eq!(&reloaded, &store);
        prop_assert_eq!(reloaded.to_xml_string(), text);
    }

    #[test]
    fn prop_rejected_add_event_leaves_store_unchanged(areas in 0usize..5, target in 0u32..20) {
        let mut store = Store::new();
        for i in 0..areas {
            store.add_area(AreaData::new(format!("a{i}"), "")).unwrap();
        }
        prop_assume!(target as usize > areas);

        let before = store.clone();
        let result = store.add_event(EventData::new(AreaId(target), "x", when()));
        prop_assert!(result.is_err());
        prop_assert_eq!(store, before);
    }
}

#[test]
fn test_compaction_preserves_payloads() {
    let mut store = Store::new();
    for name in ["one", "two", "three"] {
        let id = store
            .add_area(AreaData::new(name, format!("{name}!")))
            .unwrap();
        store
            .add_event(EventData::new(id, format!("{name}-event"), when()))
            .unwrap();
    }

    store.delete_area(AreaId(2)).unwrap();

    let areas = store.list_areas();
    assert_eq!(areas.len(), 2);
    assert_eq!((areas[0].id, areas[0].name.as_str()), (AreaId(1), "one"));
    assert_eq!((areas[1].id, areas[1].name.as_str()), (AreaId(2), "three"));
    assert_eq!(areas[1].description, "three!");
    assert_eq!(store.list_events(AreaId(2)).unwrap()[0].name, "three-event");
}
