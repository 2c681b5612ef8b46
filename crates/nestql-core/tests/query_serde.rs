use nestql_core::query::{FieldNode, Limit, Modifiers, Nesting, Sort, UnionManyNesting};
use nestql_core::AbstractQuery;

use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn field_nodes_are_tagged() {
    let query = AbstractQuery::new(
        "articles",
        vec![
            FieldNode::primitive("title"),
            FieldNode::NestedMany {
                alias: "comments".to_string(),
                fields: vec![FieldNode::primitive("body")],
                nesting: Nesting::new(["id"], "comments", ["article"]),
                modifiers: Modifiers {
                    sort: vec![Sort::desc("created_at")],
                    limit: Some(Limit::Unlimited),
                    ..Modifiers::default()
                },
            },
        ],
    );

    assert_eq!(
        serde_json::to_value(&query).unwrap(),
        json!({
            "collection": "articles",
            "fields": [
                { "type": "primitive", "field": "title", "alias": "title" },
                {
                    "type": "nested-many",
                    "alias": "comments",
                    "fields": [{ "type": "primitive", "field": "body", "alias": "body" }],
                    "nesting": {
                        "local_fields": ["id"],
                        "foreign_collection": "comments",
                        "foreign_fields": ["article"]
                    },
                    "modifiers": { "sort": ["-created_at"], "limit": -1 }
                }
            ],
            "modifiers": {}
        })
    );
}

#[test]
fn union_many_targets_default_their_referenced_collection() {
    let field: FieldNode = serde_json::from_value(json!({
        "type": "nested-union-many",
        "alias": "blocks",
        "nesting": {
            "identifier_fields": ["id"],
            "collections": [{
                "collection": "blocks",
                "field": "item",
                "identifier_fields": ["id"],
                "fields": [{ "type": "primitive", "field": "kind", "alias": "kind" }]
            }]
        }
    }))
    .unwrap();

    let FieldNode::NestedUnionMany {
        nesting: UnionManyNesting { collections, .. },
        modifiers,
        ..
    } = &field
    else {
        panic!("expected a nested union many node, got {field:?}");
    };

    assert_eq!(collections[0].referenced_collection, None);
    assert_eq!(modifiers, &Modifiers::default());

    let mut with_parent = field.clone();
    if let FieldNode::NestedUnionMany { nesting, .. } = &mut with_parent {
        nesting.collections[0].referenced_collection = Some("posts".to_string());
    }
    assert_eq!(
        serde_json::to_value(&with_parent).unwrap()["nesting"]["collections"][0]
            ["referenced_collection"],
        json!("posts")
    );
}

#[test]
fn modifiers_from_json() {
    let modifiers: Modifiers = serde_json::from_value(json!({
        "sort": ["title", "-rank"],
        "limit": 25,
        "page": 3
    }))
    .unwrap();

    assert_eq!(modifiers.sort, [Sort::asc("title"), Sort::desc("rank")]);
    assert_eq!(modifiers.limit, Some(Limit::Count(25)));
    assert_eq!(modifiers.effective_offset(), Some(50));

    let err = serde_json::from_value::<Modifiers>(json!({ "limit": -2 })).unwrap_err();
    assert!(err.to_string().contains("invalid limit -2"));
}

#[test]
fn effective_offset() {
    let mut modifiers = Modifiers {
        offset: Some(5),
        ..Modifiers::default()
    };
    assert_eq!(modifiers.effective_offset(), Some(5));

    modifiers.page = Some(1);
    modifiers.limit = Some(Limit::Count(10));
    assert_eq!(modifiers.effective_offset(), Some(5));

    modifiers.page = Some(2);
    assert_eq!(modifiers.effective_offset(), Some(10));

    modifiers.limit = Some(Limit::Unlimited);
    assert_eq!(modifiers.effective_offset(), Some(5));
}
