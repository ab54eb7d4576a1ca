//! Concurrency conformance: conditional writes racing on one entity

use crate::test_utils::*;
use attrstore::{Attribute, Entity, Error};
use std::sync::{Arc, Barrier};
use std::thread;

const WRITERS: usize = 8;

#[test]
fn test_overlapping_add_only_single_winner() {
    let ts = TestStore::new();
    let id = entity_id("R1", "Room");
    ts.entities.create(&Entity::new(id.clone())).unwrap();

    let barrier = Arc::new(Barrier::new(WRITERS));
    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let entities = ts.entities.clone();
            let id = id.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                entities.add_only(
                    &id,
                    attrs(&[
                        ("owner", Attribute::new(i as i64)),
                        (format!("extra_{i}").as_str(), Attribute::new(true)),
                    ]),
                )
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for r in results.iter().filter(|r| r.is_err()) {
        assert_eq!(r.as_ref().unwrap_err(), &Error::ExistentAttr);
    }

    let stored = ts.entities.get(&id, None).unwrap();
    assert_eq!(stored.attrs.len(), 2);
}

#[test]
fn test_concurrent_upserts_disjoint_attrs_all_land() {
    let ts = TestStore::new();
    let id = entity_id("R2", "Room");
    ts.entities.create(&Entity::new(id.clone())).unwrap();

    let handles: Vec<_> = (0..WRITERS)
        .map(|i| {
            let entities = ts.entities.clone();
            let id = id.clone();
            thread::spawn(move || {
                let name = format!("sensor_{i}");
                entities.upsert_all(&id, attrs(&[(name.as_str(), Attribute::new(i as i64))]))
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap().unwrap();
    }

    assert_eq!(ts.entities.get_all_attributes(&id).unwrap().len(), WRITERS);
}

#[test]
fn test_facades_shared_across_threads() {
    let ts = TestStore::populated();
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let queries = ts.queries.clone();
            thread::spawn(move || {
                queries
                    .run(&attrstore::Query::new(), SERVICE, SERVICE_PATH)
                    .unwrap()
                    .count()
            })
        })
        .collect();
    for h in handles {
        assert_eq!(h.join().unwrap(), 6);
    }
}
