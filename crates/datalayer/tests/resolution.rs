use datalayer::{attr, AttributeChange, Layer, ModelClass, NoopLifecycle, Record, ValueLayers};
use serde_json::{json, Map, Value};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn post_class() -> Arc<ModelClass> {
    ModelClass::builder("post")
        .attribute("title", attr().of_type("string"))
        .attribute("views", attr().of_type("number").default_value(0))
        .attribute("tags", attr().default_with(|| json!([])))
        .attribute("body", attr())
        .build()
        .unwrap()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("Expected object"),
    }
}

#[test]
fn test_layer_precedence_and_rollback_peeling() {
    let mut record = Record::new(post_class(), NoopLifecycle).unwrap();
    record.setup_data(object(json!({"views": 1})));
    record.set("views", 2).unwrap();
    record.begin_save();
    record.set("views", 3).unwrap();

    assert_eq!(record.layers().persisted("views"), Some(&json!(1)));
    assert_eq!(record.layers().in_flight("views"), Some(&json!(2)));
    assert_eq!(record.layers().local("views"), Some(&json!(3)));
    assert_eq!(record.get("views"), Some(json!(3)));

    record.rollback_attribute("views");
    assert_eq!(record.get("views"), Some(json!(2)));

    record.update_layers(|layers| layers.remove(Layer::InFlight, "views"));
    assert_eq!(record.get("views"), Some(json!(1)));

    record.setup_data(Map::new());
    assert_eq!(record.get("views"), Some(json!(0)));
}

#[test]
fn test_write_then_read_ignores_lower_layers() {
    let mut record = Record::new(post_class(), NoopLifecycle).unwrap();
    record.setup_data(object(json!({"title": "persisted"})));
    record.update_layers(|layers| layers.insert(Layer::InFlight, "title", json!("in flight")));

    record.set("title", "local").unwrap();
    assert_eq!(record.get("title"), Some(json!("local")));
}

#[test]
fn test_explicit_null_shadows_lower_layers() {
    let mut record = Record::new(post_class(), NoopLifecycle).unwrap();
    record.setup_data(object(json!({"body": "text", "views": null})));

    assert_eq!(record.get("views"), Some(Value::Null));
    record.set("body", Value::Null).unwrap();
    assert_eq!(record.get("body"), Some(Value::Null));
}

#[test]
fn test_producer_default_is_fresh_per_read() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let class = ModelClass::builder("post")
        .attribute(
            "tags",
            attr().default_with(move || {
                counter.fetch_add(1, Ordering::SeqCst);
                json!([])
            }),
        )
        .build()
        .unwrap();
    let record = Record::new(class, NoopLifecycle).unwrap();

    for _ in 0..3 {
        assert_eq!(record.get("tags"), Some(json!([])));
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_notification_precedes_write() {
    let seen: Rc<RefCell<Vec<(AttributeChange, Option<Value>)>>> = Rc::default();
    let sink = seen.clone();
    let lifecycle = move |change: &AttributeChange, layers: &ValueLayers| {
        sink.borrow_mut()
            .push((change.clone(), layers.local(&change.name).cloned()));
    };

    let mut record = Record::new(post_class(), lifecycle).unwrap();
    record.setup_data(object(json!({"title": "X"})));
    record.set("title", "Y").unwrap();
    record.set("title", "Z").unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);

    let (first, local_before_first) = &seen[0];
    assert_eq!(first.old_value, Some(json!("X")));
    assert_eq!(first.new_value, json!("Y"));
    assert_eq!(local_before_first, &None);

    let (second, local_before_second) = &seen[1];
    assert_eq!(second.old_value, Some(json!("Y")));
    assert_eq!(local_before_second, &Some(json!("Y")));
}

#[test]
fn test_original_value_tracks_persisted_only() {
    let seen: Rc<RefCell<Vec<AttributeChange>>> = Rc::default();
    let sink = seen.clone();
    let lifecycle = move |change: &AttributeChange, _: &ValueLayers| {
        sink.borrow_mut().push(change.clone());
    };

    let mut record = Record::new(post_class(), lifecycle).unwrap();
    record.setup_data(object(json!({"title": "persisted"})));
    record.set("title", "one").unwrap();
    record.begin_save();
    record.set("title", "two").unwrap();
    record.set("title", "persisted").unwrap();

    let seen = seen.borrow();
    let originals: Vec<_> = seen.iter().map(|c| c.original_value.clone()).collect();
    assert_eq!(originals, vec![Some(json!("persisted")); 3]);
    assert_eq!(seen[1].old_value, Some(json!("one")));
    assert!(seen[2].restores_original());
}

#[test]
fn test_id_is_never_an_attribute_write() {
    let mut record = Record::new(post_class(), NoopLifecycle).unwrap();
    assert!(record.set("id", 7).is_err());
    assert_eq!(record.layers().local("id"), None);
}
