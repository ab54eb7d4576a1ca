//! Mutation conformance: create, delete and conditional attribute writes

use crate::test_utils::*;
use attrstore::{Attribute, Entity, Error, ErrorKind, Partition};

#[test]
fn test_create_then_get_returns_same_entity() {
    let ts = TestStore::new();
    let e = population().remove(0);
    ts.entities.create(&e).unwrap();
    assert_eq!(ts.entities.get(&e.id, None).unwrap(), e);
}

#[test]
fn test_create_duplicate_is_conflict() {
    let ts = TestStore::populated();
    let err = ts.entities.create(&population()[1]).unwrap_err();
    assert_eq!(err, Error::ExistentEntity);
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_create_empty_id_with_reserved_attr_reports_empty_id() {
    let ts = TestStore::new();
    let e = Entity::new(entity_id("", "T1")).with_attr("id", Attribute::new("x"));
    assert_eq!(ts.entities.create(&e), Err(Error::EmptyEntityId));
}

#[test]
fn test_create_empty_type() {
    let ts = TestStore::new();
    let e = Entity::new(entity_id("I9", ""));
    assert_eq!(ts.entities.create(&e), Err(Error::EmptyEntityType));
}

#[test]
fn test_delete_attribute_returns_prior_and_removes() {
    let ts = TestStore::populated();
    let id = entity_id("I1", "T1");

    let prior = ts.entities.delete_attribute(&id, "temperature").unwrap();
    assert_eq!(
        prior.attr("temperature"),
        Some(&Attribute::typed(12.3, "celsius"))
    );
    let after = ts.entities.get(&id, None).unwrap();
    assert!(after.attr("temperature").is_none());

    let again = ts.entities.delete_attribute(&id, "temperature").unwrap();
    assert_eq!(again, after);
}

#[test]
fn test_add_only_on_existing_attr_leaves_value() {
    let ts = TestStore::populated();
    let id = entity_id("E4", "T2");

    let err = ts
        .entities
        .add_only(&id, attrs(&[("temperature", Attribute::new(0.0))]))
        .unwrap_err();
    assert_eq!(err, Error::ExistentAttr);
    assert_eq!(
        ts.entities.get_attribute(&id, "temperature").unwrap(),
        Attribute::typed(42.3, "celsius")
    );
}

#[test]
fn test_add_only_is_all_or_nothing() {
    let ts = TestStore::populated();
    let id = entity_id("E4", "T2");
    let payload = attrs(&[
        ("pressure", Attribute::new(1013i64)),
        ("status", Attribute::new("ON")),
    ]);
    assert_eq!(ts.entities.add_only(&id, payload), Err(Error::ExistentAttr));
    assert_eq!(
        ts.entities.get_attribute(&id, "pressure"),
        Err(Error::NotFoundAttr)
    );
}

#[test]
fn test_update_requires_every_attr() {
    let ts = TestStore::populated();
    let id = entity_id("I2", "T1");
    let err = ts
        .entities
        .update(
            &id,
            attrs(&[
                ("status", Attribute::new("OFF")),
                ("pressure", Attribute::new(1i64)),
            ]),
        )
        .unwrap_err();
    assert_eq!(err, Error::NotFoundAttr);
    assert_eq!(err.status_code(), 404);
    assert_eq!(
        ts.entities.get_attribute(&id, "status").unwrap(),
        Attribute::new("ON")
    );
}

#[test]
fn test_upsert_all_twice_same_result() {
    let ts = TestStore::populated();
    let id = entity_id("I3", "T1");
    let payload = attrs(&[
        ("status", Attribute::new("OFF")),
        ("pressure", Attribute::new(1i64)),
    ]);

    ts.entities.upsert_all(&id, payload.clone()).unwrap();
    let once = ts.entities.get_all_attributes(&id).unwrap();
    ts.entities.upsert_all(&id, payload).unwrap();
    assert_eq!(ts.entities.get_all_attributes(&id).unwrap(), once);
}

#[test]
fn test_missing_entity_is_not_found_for_every_write() {
    let ts = TestStore::populated();
    let id = entity_id("nobody", "T1");
    let payload = || attrs(&[("status", Attribute::new("ON"))]);

    assert_eq!(ts.entities.add_only(&id, payload()), Err(Error::NotFoundEntity));
    assert_eq!(ts.entities.update(&id, payload()), Err(Error::NotFoundEntity));
    assert_eq!(ts.entities.upsert_all(&id, payload()), Err(Error::NotFoundEntity));
    assert_eq!(ts.entities.set_all(&id, payload()), Err(Error::NotFoundEntity));
    assert_eq!(
        ts.entities.set_attribute(&id, "status", Attribute::new("ON")),
        Err(Error::NotFoundEntity)
    );
    assert_eq!(
        ts.entities.delete_attribute(&id, "status"),
        Err(Error::NotFoundEntity)
    );
    assert_eq!(ts.entities.delete(&id), Err(Error::NotFoundEntity));
}

#[test]
fn test_same_id_different_service_is_distinct() {
    let ts = TestStore::populated();
    let mut other = population().remove(0);
    other.id = other.id.in_partition(&Partition::new("S2", SERVICE_PATH));
    ts.entities.create(&other).unwrap();

    ts.entities.delete(&other.id).unwrap();
    assert!(ts.entities.get(&entity_id("I1", "T1"), None).is_ok());
}

#[test]
fn test_closed_store_rejects_everything() {
    let ts = TestStore::populated();
    ts.store.close();
    let id = entity_id("I1", "T1");
    let err = ts.entities.get(&id, None).unwrap_err();
    assert_eq!(err, Error::StoreClosed);
    assert_eq!(err.status_code(), 500);
    assert_eq!(
        ts.entities.create(&population()[0]),
        Err(Error::StoreClosed)
    );
}
