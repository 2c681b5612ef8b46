use nestql::result::{merge_versions_raw, merge_versions_recursive};

use pretty_assertions::assert_eq;
use serde_json::json;

mod support;

#[test]
fn raw_without_versions_is_unchanged() {
    let item = json!({ "title": "Hello" });
    assert_eq!(merge_versions_raw(&item, &[]), item);
}

#[test]
fn raw_later_versions_win() {
    let merged = merge_versions_raw(
        &json!({ "title": "Hello", "status": "draft" }),
        &[json!({ "status": "review" }), json!({ "title": null, "status": "published" })],
    );

    assert_eq!(merged, json!({ "title": null, "status": "published" }));
}

#[test]
fn raw_keeps_relational_values_verbatim() {
    let alterations = json!({ "create": [{ "body": "new" }], "update": [], "delete": [] });
    let merged = merge_versions_raw(
        &json!({ "title": "Hello", "comments": null }),
        &[json!({ "comments": alterations.clone() })],
    );

    assert_eq!(merged, json!({ "title": "Hello", "comments": alterations }));
}

#[test]
fn many_to_one_values_are_set_and_unset() {
    let schema = support::schema();

    let set = merge_versions_recursive(
        &json!({ "id": 1, "status": "draft", "author": null }),
        &[json!({ "status": "published" }), json!({ "author": 1 })],
        "articles",
        &schema,
    );
    assert_eq!(set, json!({ "id": 1, "status": "published", "author": 1 }));

    let unset = merge_versions_recursive(
        &json!({ "id": 1, "status": "draft", "author": { "id": 1, "name": "Ada" } }),
        &[json!({ "status": "published", "author": null })],
        "articles",
        &schema,
    );
    assert_eq!(unset, json!({ "id": 1, "status": "published", "author": null }));
}

#[test]
fn many_to_one_items_merge_field_by_field() {
    let schema = support::schema();

    let merged = merge_versions_recursive(
        &json!({
            "id": 1,
            "status": "draft",
            "author": { "id": 1, "name": "Ada", "company": { "id": 5, "name": "Old" } }
        }),
        &[
            json!({ "status": "published" }),
            json!({ "author": { "id": 1, "company": { "name": "New" } } }),
        ],
        "articles",
        &schema,
    );

    assert_eq!(
        merged,
        json!({
            "id": 1,
            "status": "published",
            "author": { "id": 1, "name": "Ada", "company": { "id": 5, "name": "New" } }
        })
    );
}

#[test]
fn one_to_many_alterations_on_an_empty_list() {
    let schema = support::schema();

    let merged = merge_versions_recursive(
        &json!({ "id": 2, "status": "draft", "comments": [] }),
        &[json!({
            "comments": {
                "create": [{ "body": "draft" }],
                "update": [{ "article": "2", "id": 2 }, { "article": "2", "id": 3 }],
                "delete": []
            }
        })],
        "articles",
        &schema,
    );

    assert_eq!(
        merged,
        json!({
            "id": 2,
            "status": "draft",
            "comments": [
                { "article": "2", "id": 2 },
                { "article": "2", "id": 3 },
                { "body": "draft" }
            ]
        })
    );
}

#[test]
fn one_to_many_alterations_update_delete_and_create() {
    let schema = support::schema();

    let merged = merge_versions_recursive(
        &json!({
            "id": 1,
            "status": "draft",
            "comments": [1, 2, 3, { "id": 4, "body": "value" }, { "id": 5 }]
        }),
        &[
            json!({ "status": "published" }),
            json!({
                "comments": {
                    "create": [{ "body": "new" }],
                    "update": [{ "id": 1 }, { "id": "4" }],
                    "delete": [2, 5]
                }
            }),
        ],
        "articles",
        &schema,
    );

    assert_eq!(
        merged,
        json!({
            "id": 1,
            "status": "published",
            "comments": [{ "id": 1 }, 3, { "id": "4", "body": "value" }, { "body": "new" }]
        })
    );
}

#[test]
fn updates_recurse_into_the_related_collection() {
    let schema = support::schema();

    let merged = merge_versions_recursive(
        &json!({
            "id": 1,
            "comments": [{ "id": 4, "body": "Hi", "article": { "id": 1, "title": "Old" } }]
        }),
        &[json!({
            "comments": {
                "update": [{ "id": 4, "article": { "title": "Renamed" } }]
            }
        })],
        "articles",
        &schema,
    );

    assert_eq!(
        merged,
        json!({
            "id": 1,
            "comments": [{ "id": 4, "body": "Hi", "article": { "id": 1, "title": "Renamed" } }]
        })
    );
}

#[test]
fn other_one_to_many_values_replace_the_list() {
    let schema = support::schema();

    let merged = merge_versions_recursive(
        &json!({ "id": 1, "comments": [1, 2] }),
        &[json!({ "comments": [3] }), json!({ "comments": { "create": "nope" } })],
        "articles",
        &schema,
    );

    assert_eq!(merged, json!({ "id": 1, "comments": { "create": "nope" } }));
}

#[test]
fn any_to_one_items_merge_in_the_named_collection() {
    let schema = support::schema();

    let merged = merge_versions_recursive(
        &json!({ "id": 1, "collection": "posts", "item": { "id": 1, "title": "Old" } }),
        &[json!({ "item": { "title": "New" } })],
        "attachments",
        &schema,
    );

    assert_eq!(
        merged,
        json!({ "id": 1, "collection": "posts", "item": { "id": 1, "title": "New" } })
    );
}

#[test]
fn field_order_is_kept() {
    let schema = support::schema();

    let merged = merge_versions_recursive(
        &json!({ "id": 1, "title": "Hello", "status": "draft" }),
        &[json!({ "rank": 3, "title": "Hi" })],
        "articles",
        &schema,
    );

    let keys: Vec<_> = merged.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["id", "title", "status", "rank"]);
}
