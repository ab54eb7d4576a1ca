//! Query conformance: filters, sort, pagination, projection

use crate::test_utils::*;
use attrstore::{
    Attribute, CollectionPolicy, Entity, EntityCursor, Error, Query, StoreConfig,
};

fn ids(cursor: EntityCursor) -> Vec<String> {
    cursor.map(|e| e.id.id).collect()
}

fn run(ts: &TestStore, q: &Query) -> Vec<String> {
    ids(ts.queries.run(q, SERVICE, SERVICE_PATH).unwrap())
}

#[test]
fn test_empty_query_matches_whole_partition() {
    let ts = TestStore::populated();
    let mut all = run(&ts, &Query::new());
    all.sort();
    assert_eq!(all, vec!["E4", "E5", "E6", "I1", "I2", "I3"]);
}

#[test]
fn test_simple_one() {
    let ts = TestStore::populated();
    let mut cursor = ts
        .queries
        .run(&Query::new().ids(["I3"]).types(["T1"]), SERVICE, SERVICE_PATH)
        .unwrap();
    assert_eq!(cursor.next_entity(), Some(population()[2].clone()));
    assert_eq!(cursor.next_entity(), None);
    assert!(cursor.err().is_none());
}

#[test]
fn test_id_list_and_pattern_both_apply() {
    let ts = TestStore::populated();
    let q = Query::new()
        .ids(["I1", "E4", "E5"])
        .id_pattern("^E")
        .order_by(["temperature"]);
    assert_eq!(run(&ts, &q), vec!["E4", "E5"]);
}

#[test]
fn test_type_list_and_pattern_both_apply() {
    let ts = TestStore::populated();
    let q = Query::new().types(["T1"]).type_pattern("2$");
    assert!(run(&ts, &q).is_empty());

    let q = Query::new().type_pattern("^T").order_by(["temperature"]);
    assert_eq!(run(&ts, &q).len(), 6);
}

#[test]
fn test_pagination_over_ascending_sort() {
    let ts = TestStore::populated();
    let sorted = vec!["I1", "I2", "I3", "E4", "E5", "E6"];
    for offset in 0..=6 {
        for limit in 1..=3 {
            let q = Query::new()
                .order_by(["temperature"])
                .offset(offset)
                .limit(limit);
            let end = (offset + limit).min(sorted.len());
            let start = offset.min(end);
            assert_eq!(run(&ts, &q), sorted[start..end].to_vec(), "offset {offset} limit {limit}");
        }
    }
}

#[test]
fn test_descending_is_exact_reverse() {
    let ts = TestStore::populated();
    let mut asc = run(&ts, &Query::new().order_by(["temperature"]));
    let desc = run(&ts, &Query::new().order_by(["!temperature"]));
    asc.reverse();
    assert_eq!(asc, desc);
}

#[test]
fn test_descending_reverses_ascending_with_duplicate_values() {
    let ts = TestStore::populated();
    for extra in ["X7", "X8"] {
        let e = Entity::new(entity_id(extra, "T3"))
            .with_attr("temperature", Attribute::new(0.0));
        ts.entities.create(&e).unwrap();
    }

    let asc = run(&ts, &Query::new().order_by(["status"]));
    let desc = run(&ts, &Query::new().order_by(["!status"]));
    assert_eq!(asc, vec!["X7", "X8", "E4", "E5", "E6", "I1", "I2", "I3"]);
    let mut reversed = asc.clone();
    reversed.reverse();
    assert_eq!(desc, reversed);

    let mut paged = Vec::new();
    for offset in (0..8).step_by(3) {
        paged.extend(run(&ts, &Query::new().order_by(["!status"]).offset(offset).limit(3)));
    }
    assert_eq!(paged, desc);
}

#[test]
fn test_sort_large_integers_exactly() {
    let ts = TestStore::new();
    let values = [("N1", (1u64 << 53) + 1), ("N2", 1u64 << 53), ("N3", u64::MAX)];
    for (id, n) in values {
        let e = Entity::new(entity_id(id, "T1")).with_attr("seq", Attribute::new(n));
        ts.entities.create(&e).unwrap();
    }
    assert_eq!(run(&ts, &Query::new().order_by(["seq"])), vec!["N2", "N1", "N3"]);
    assert_eq!(run(&ts, &Query::new().order_by(["!seq"])), vec!["N3", "N1", "N2"]);
}

#[test]
fn test_compound_sort() {
    let ts = TestStore::populated();
    let q = Query::new().order_by(["status", "!temperature"]);
    assert_eq!(run(&ts, &q), vec!["E6", "E5", "E4", "I3", "I2", "I1"]);
}

#[test]
fn test_zero_limit_is_unbounded() {
    let ts = TestStore::populated();
    assert_eq!(run(&ts, &Query::new().limit(0)).len(), 6);
}

#[test]
fn test_projection_keeps_id() {
    let ts = TestStore::populated();
    let q = Query::new().types(["T2"]).attrs(["status"]);
    let found: Vec<Entity> = ts.queries.run(&q, SERVICE, SERVICE_PATH).unwrap().collect();
    assert_eq!(found.len(), 3);
    for e in found {
        assert_eq!(e.id.entity_type, "T2");
        assert_eq!(e.attrs.len(), 1);
        assert_eq!(e.attr("status"), Some(&Attribute::new("OFF")));
    }
}

#[test]
fn test_other_partition_is_invisible() {
    let ts = TestStore::populated();
    assert!(ids(ts.queries.run(&Query::new(), SERVICE, "/other").unwrap()).is_empty());
    assert!(ids(ts.queries.run(&Query::new(), "S2", SERVICE_PATH).unwrap()).is_empty());
}

#[test]
fn test_count() {
    let ts = TestStore::populated();
    let q = Query::new().id_pattern("^I").limit(1);
    assert_eq!(ts.queries.count(&q, SERVICE, SERVICE_PATH).unwrap(), 3);
}

#[test]
fn test_invalid_pattern_is_malformed() {
    let ts = TestStore::populated();
    let err = ts
        .queries
        .run(&Query::new().id_pattern("(unclosed"), SERVICE, SERVICE_PATH)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidPattern { .. }));
}

#[test]
fn test_per_service_policy_isolates_collections() {
    let ts = TestStore::with_config(StoreConfig::new().policy(CollectionPolicy::PerService));
    for e in population() {
        ts.entities.create(&e).unwrap();
    }
    assert_eq!(run(&ts, &Query::new()).len(), 6);

    ts.store
        .drop_collection(&population()[0].id.partition())
        .unwrap();
    assert!(run(&ts, &Query::new()).is_empty());
}
