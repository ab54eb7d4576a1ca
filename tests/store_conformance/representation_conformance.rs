//! Representation conformance: payloads in, entities out

use crate::test_utils::*;
use attrstore::{
    parse_attributes, parse_entity, render_entity, Error, Opt, OptionSet, Partition,
};
use serde_json::json;

#[test]
fn test_key_values_payload_round_trip_through_store() {
    let ts = TestStore::new();
    let opts = OptionSet::parse("keyValues");

    let mut e = parse_entity(&json!({"id": "R1", "temperature": 20.5}), &opts).unwrap();
    assert_eq!(e.id.entity_type, "Thing");
    e.id = e.id.in_partition(&Partition::new(SERVICE, SERVICE_PATH));
    ts.entities.create(&e).unwrap();

    let stored = ts.entities.get(&e.id, None).unwrap();
    assert_eq!(
        render_entity(&stored, &opts, &[]).unwrap(),
        json!({"id": "R1", "type": "Thing", "temperature": 20.5})
    );
}

#[test]
fn test_normalized_render() {
    let ts = TestStore::populated();
    let stored = ts.entities.get(&entity_id("I1", "T1"), None).unwrap();
    assert_eq!(
        render_entity(&stored, &OptionSet::new(), &[]).unwrap(),
        json!({
            "id": "I1",
            "type": "T1",
            "temperature": {"value": 12.3, "type": "celsius", "metadata": {}},
            "status": {"value": "ON", "type": "Text", "metadata": {}}
        })
    );
}

#[test]
fn test_values_render() {
    let ts = TestStore::populated();
    let stored = ts.entities.get(&entity_id("E5", "T2"), None).unwrap();
    let opts = OptionSet::new().with(Opt::Values);
    let names = vec!["status".to_string(), "temperature".to_string()];
    assert_eq!(render_entity(&stored, &opts, &names).unwrap(), json!(["OFF", 52.3]));

    let missing = vec!["pressure".to_string()];
    assert_eq!(render_entity(&stored, &opts, &missing), Err(Error::NotFoundAttr));
}

#[test]
fn test_append_option_selects_add_only() {
    let ts = TestStore::populated();
    let id = entity_id("I1", "T1");
    let opts = OptionSet::parse("append,keyValues");
    let payload = parse_attributes(&json!({"status": "OFF"}), &opts).unwrap();

    let err = ts
        .entities
        .append_attributes(&id, payload, &opts)
        .unwrap_err();
    assert_eq!(err, Error::ExistentAttr);
    assert_eq!(err.to_json(), r#"{"error":"attribute already exists"}"#);
}

#[test]
fn test_attribute_payload_errors() {
    let opts = OptionSet::new();
    assert_eq!(parse_attributes(&json!({}), &opts), Err(Error::EmptyObject));
    assert_eq!(
        parse_attributes(&json!({"type": {"value": 1}}), &opts),
        Err(Error::InvalidAttrType)
    );
    assert_eq!(
        parse_attributes(&json!({"a": 1}), &opts),
        Err(Error::AttrNotAnObject)
    );
    assert_eq!(
        parse_attributes(&json!({"a": {"type": "x"}}), &opts),
        Err(Error::MissingValueField)
    );
    assert_eq!(
        parse_attributes(&json!({"a": {"value": 1, "metadata": 3}}), &opts),
        Err(Error::MdNotAnObject)
    );
}
