use nestql::mapping::{A2oMapping, AliasMapping};
use nestql::map_result;
use nestql::stmt::ColumnIndex;

use pretty_assertions::assert_eq;
use serde_json::json;

mod support;
use support::row;

fn c(index: usize) -> ColumnIndex {
    ColumnIndex(index)
}

fn author() -> AliasMapping {
    AliasMapping::Nested {
        alias: "author".to_string(),
        identifiers: vec![c(2)],
        children: vec![
            AliasMapping::root("name", c(1)),
            AliasMapping::Nested {
                alias: "company".to_string(),
                identifiers: vec![c(4)],
                children: vec![AliasMapping::root("name", c(3))],
            },
        ],
    }
}

#[test]
fn joined_rows_become_nested_objects() {
    let mapping = [AliasMapping::root("title", c(0)), author()];
    let row = row(json!({ "c0": "Hello", "c1": "Ada", "c2": 1, "c3": "Acme", "c4": 5 }));

    let item = map_result(&mapping, &row, &[], ColumnIndex::alias).unwrap();

    assert_eq!(
        item,
        json!({
            "title": "Hello",
            "author": { "name": "Ada", "company": { "name": "Acme" } }
        })
    );
}

#[test]
fn missing_join_is_null_at_its_level() {
    let mapping = [AliasMapping::root("title", c(0)), author()];

    let no_company = row(json!({ "c0": "Hello", "c1": "Ada", "c2": 1, "c3": null, "c4": null }));
    assert_eq!(
        map_result(&mapping, &no_company, &[], ColumnIndex::alias).unwrap(),
        json!({ "title": "Hello", "author": { "name": "Ada", "company": null } })
    );

    let no_author = row(json!({ "c0": "Hello", "c1": null, "c2": null }));
    assert_eq!(
        map_result(&mapping, &no_author, &[], ColumnIndex::alias).unwrap(),
        json!({ "title": "Hello", "author": null })
    );
}

#[test]
fn joined_item_with_null_fields_is_kept() {
    let mapping = [author()];
    let row = row(json!({ "c1": null, "c2": 1, "c3": null, "c4": null }));

    assert_eq!(
        map_result(&mapping, &row, &[], ColumnIndex::alias).unwrap(),
        json!({ "author": { "name": null, "company": null } })
    );
}

#[test]
fn sub_results_are_spliced_by_index() {
    let mapping = [
        AliasMapping::root("id", c(0)),
        AliasMapping::Sub {
            alias: "tags".to_string(),
            index: 1,
        },
        AliasMapping::Sub {
            alias: "comments".to_string(),
            index: 0,
        },
    ];
    let sub_results = [json!([{ "body": "first" }]), json!([])];

    let item = map_result(&mapping, &row(json!({ "c0": 1 })), &sub_results, ColumnIndex::alias)
        .unwrap();

    assert_eq!(
        item,
        json!({ "id": 1, "tags": [], "comments": [{ "body": "first" }] })
    );
    assert_eq!(
        item.as_object().unwrap().keys().collect::<Vec<_>>(),
        ["id", "tags", "comments"]
    );
}

#[test]
fn missing_sub_result_is_an_invalid_result() {
    let mapping = [AliasMapping::Sub {
        alias: "comments".to_string(),
        index: 2,
    }];

    let err = map_result(&mapping, &row(json!({})), &[json!([])], ColumnIndex::alias).unwrap_err();

    assert!(err.is_invalid_result());
    assert_eq!(
        err.to_string(),
        "invalid result: `comments` reads sub-result 2, but 1 were supplied"
    );
}

#[test]
fn custom_column_aliases() {
    let mapping = [AliasMapping::root("title", c(0))];
    let row = row(json!({ "col_0": "Hello" }));

    let item = map_result(&mapping, &row, &[], |column| format!("col_{}", column.0)).unwrap();

    assert_eq!(item, json!({ "title": "Hello" }));
}

fn item() -> AliasMapping {
    AliasMapping::NestedA2o {
        alias: "item".to_string(),
        discriminator: c(0),
        collections: vec![
            A2oMapping {
                collection: "posts".to_string(),
                identifiers: vec![c(2)],
                mapping: vec![AliasMapping::root("title", c(1))],
            },
            A2oMapping {
                collection: "pages".to_string(),
                identifiers: vec![c(4)],
                mapping: vec![AliasMapping::root("slug", c(3))],
            },
        ],
    }
}

#[test]
fn polymorphic_branch_follows_the_joined_key() {
    let mapping = [item()];

    let post = row(json!({ "c0": null, "c1": "Hello", "c2": 1, "c3": null, "c4": null }));
    assert_eq!(
        map_result(&mapping, &post, &[], ColumnIndex::alias).unwrap(),
        json!({ "item": { "title": "Hello" } })
    );

    let neither = row(json!({ "c0": null, "c1": null, "c2": null, "c3": null, "c4": null }));
    assert_eq!(
        map_result(&mapping, &neither, &[], ColumnIndex::alias).unwrap(),
        json!({ "item": null })
    );
}

#[test]
fn polymorphic_branch_prefers_the_discriminator() {
    let mapping = [item()];

    // Both joins hit: the discriminator, stored as text, decides.
    let row = row(json!({
        "c0": r#"{"foreignCollection":"pages","foreignKey":[{"column":"id","value":4}]}"#,
        "c1": "Hello",
        "c2": 4,
        "c3": "about",
        "c4": 4
    }));

    assert_eq!(
        map_result(&mapping, &row, &[], ColumnIndex::alias).unwrap(),
        json!({ "item": { "slug": "about" } })
    );
}
