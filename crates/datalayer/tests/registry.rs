use datalayer::attributes::AttributeMap;
use datalayer::{attr, DataError, ModelClass, NoopLifecycle, Record};
use once_cell::sync::Lazy;
use serde_json::json;
use std::sync::Arc;

static ARTICLE: Lazy<Arc<ModelClass>> = Lazy::new(|| {
    ModelClass::builder("article")
        .attribute("title", attr().of_type("string"))
        .attribute("draft", attr().default_value(true))
        .field("excerpt", json!({"depends_on": ["body"]}))
        .attribute("body", attr().of_type(""))
        .attribute("published_at", attr().of_type("date"))
        .build()
        .unwrap()
});

#[test]
fn test_each_attribute_follows_declaration_order() {
    let mut names = Vec::new();
    ARTICLE
        .each_attribute(|name, meta| {
            assert_eq!(name, meta.name);
            names.push(name.to_string());
        })
        .unwrap();
    assert_eq!(names, vec!["title", "draft", "body", "published_at"]);
}

#[test]
fn test_each_transformed_attribute_restricts_to_typed() {
    let mut seen = Vec::new();
    ARTICLE
        .each_transformed_attribute(|name, tag| seen.push((name.to_string(), tag.to_string())))
        .unwrap();
    assert_eq!(
        seen,
        vec![
            ("title".to_string(), "string".to_string()),
            ("published_at".to_string(), "date".to_string()),
        ]
    );
}

#[test]
fn test_registry_identity_across_records() {
    let class = ModelClass::builder("comment")
        .attribute("text", attr())
        .build()
        .unwrap();

    let before = class.attributes().unwrap() as *const AttributeMap;
    let _first = Record::new(class.clone(), NoopLifecycle).unwrap();
    let _second = Record::new(class.clone(), NoopLifecycle).unwrap();
    let after = class.attributes().unwrap() as *const AttributeMap;

    assert!(std::ptr::eq(before, after));
    assert_eq!(class.registry_scans(), 1);
}

#[test]
fn test_reserved_id_fails_registry_build() {
    let class = ModelClass::builder("account")
        .attribute("name", attr())
        .attribute("id", attr())
        .build()
        .unwrap();

    let err = class.attributes().unwrap_err();
    assert!(matches!(err, DataError::ReservedName { .. }));
    assert!(err.to_string().contains("reserved"));
}

#[test]
fn test_registry_is_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| {
            std::thread::spawn(|| {
                ARTICLE.attributes().unwrap() as *const AttributeMap as usize
            })
        })
        .collect();
    let addresses: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
fn test_subclass_registry_includes_parent() {
    let featured = ModelClass::builder("featured_article")
        .extends(ARTICLE.clone())
        .attribute("rank", attr().of_type("number").default_value(1))
        .build()
        .unwrap();

    let attributes = featured.attributes().unwrap();
    assert_eq!(attributes.len(), 5);
    assert_eq!(attributes["draft"].parent_type, "article");
    assert_eq!(attributes["rank"].parent_type, "featured_article");

    let record = Record::new(featured.clone(), NoopLifecycle).unwrap();
    assert_eq!(record.get("draft"), Some(json!(true)));
    assert_eq!(record.get("rank"), Some(json!(1)));
}
