use nestql::mapping::AliasMapping;
use nestql::query::{FieldNode, Limit, Modifiers, Nesting, Sort};
use nestql::stmt::ColumnIndex;
use nestql::{convert_query, AbstractQuery, SubQuery};

use pretty_assertions::assert_eq;
use serde_json::json;

mod support;
use support::row;

fn comments(modifiers: Modifiers) -> FieldNode {
    FieldNode::NestedMany {
        alias: "comments".to_string(),
        fields: vec![FieldNode::primitive("body")],
        nesting: Nesting::new(["id"], "comments", ["article"]),
        modifiers,
    }
}

fn many(sub_query: &SubQuery) -> &nestql::convert::NestedManyQuery {
    match sub_query {
        SubQuery::Many(many) => many,
        other => panic!("expected a nested many sub-query, got {other:?}"),
    }
}

#[test]
fn one_to_many_is_deferred() {
    let query = AbstractQuery::new(
        "articles",
        vec![
            FieldNode::primitive("title"),
            comments(Modifiers {
                sort: vec![Sort::asc("sort")],
                limit: Some(Limit::Count(5)),
                ..Modifiers::default()
            }),
        ],
    );

    let compiled = convert_query(&query).unwrap();

    assert_eq!(
        compiled.root_query.to_string(),
        "SELECT t0.title AS c0, t0.id AS c1 FROM articles AS t0"
    );
    assert_eq!(
        compiled.alias_mapping,
        [
            AliasMapping::root("title", ColumnIndex(0)),
            AliasMapping::Sub {
                alias: "comments".to_string(),
                index: 0,
            },
        ]
    );

    let many = many(&compiled.sub_queries[0]);
    assert_eq!(many.local_columns, [ColumnIndex(1)]);
    assert_eq!(many.modifiers.limit, Some(Limit::Count(5)));

    let parent = row(json!({ "c0": "Hello", "c1": 7 }));
    let values = many.identifier_values(&parent, ColumnIndex::alias);
    assert_eq!(values, [json!(7)]);

    let nested = many.query(&values).unwrap();
    assert_eq!(
        nested.root_query.to_string(),
        "SELECT t0.body AS c0 FROM comments AS t0 WHERE t0.article = $0 ORDER BY t0.sort"
    );
    assert_eq!(nested.root_query.parameters, [json!(7)]);
    assert_eq!(
        nested.alias_mapping,
        [AliasMapping::root("body", ColumnIndex(0))]
    );
}

#[test]
fn generated_queries_are_repeatable() {
    let query = AbstractQuery::new("articles", vec![comments(Modifiers::default())]);
    let compiled = convert_query(&query).unwrap();
    let many = many(&compiled.sub_queries[0]);

    let first = many.query(&[json!(3)]).unwrap();
    let second = many.query(&[json!(3)]).unwrap();
    assert_eq!(first, second);

    let other = many.query(&[json!(4)]).unwrap();
    assert_eq!(first.root_query.to_string(), other.root_query.to_string());
    assert_eq!(other.root_query.parameters, [json!(4)]);
}

#[test]
fn composite_keys_bind_one_parameter_per_field() {
    let query = AbstractQuery::new(
        "users",
        vec![FieldNode::NestedMany {
            alias: "sessions".to_string(),
            fields: vec![FieldNode::primitive("token")],
            nesting: Nesting::new(["tenant_id", "id"], "sessions", ["tenant_id", "user_id"]),
            modifiers: Modifiers::default(),
        }],
    );

    let compiled = convert_query(&query).unwrap();
    assert_eq!(
        compiled.root_query.to_string(),
        "SELECT t0.tenant_id AS c0, t0.id AS c1 FROM users AS t0"
    );

    let nested = many(&compiled.sub_queries[0])
        .query(&[json!("t1"), json!("u1")])
        .unwrap();

    assert_eq!(
        nested.root_query.to_string(),
        "SELECT t0.token AS c0 FROM sessions AS t0 WHERE t0.tenant_id = $0 AND t0.user_id = $1"
    );
    assert_eq!(nested.root_query.parameters, [json!("t1"), json!("u1")]);
}

#[test]
fn key_condition_is_anded_onto_the_nested_filter() {
    let query = AbstractQuery::new(
        "articles",
        vec![comments(Modifiers {
            filter: Some(json!({ "approved": { "_eq": true } })),
            limit: Some(Limit::Count(2)),
            offset: Some(1),
            ..Modifiers::default()
        })],
    );

    let compiled = convert_query(&query).unwrap();
    let nested = many(&compiled.sub_queries[0]).query(&[json!(9)]).unwrap();

    // Limit and offset are applied per parent, after the rows come back.
    assert_eq!(
        nested.root_query.to_string(),
        "SELECT t0.body AS c0 FROM comments AS t0 WHERE t0.approved = $0 AND t0.article = $1"
    );
    assert_eq!(nested.root_query.parameters, [json!(true), json!(9)]);
}

#[test]
fn sub_queries_are_numbered_across_joins() {
    let query = AbstractQuery::new(
        "articles",
        vec![
            FieldNode::primitive("id"),
            FieldNode::NestedOne {
                alias: "author".to_string(),
                fields: vec![
                    FieldNode::primitive("id"),
                    FieldNode::NestedMany {
                        alias: "articles".to_string(),
                        fields: vec![FieldNode::primitive("id")],
                        nesting: Nesting::new(["id"], "articles", ["author"]),
                        modifiers: Modifiers::default(),
                    },
                ],
                nesting: Nesting::new(["author"], "authors", ["id"]),
            },
            comments(Modifiers::default()),
        ],
    );

    let compiled = convert_query(&query).unwrap();

    assert_eq!(
        compiled.root_query.to_string(),
        "SELECT t0.id AS c0, t1.id AS c1 FROM articles AS t0 \
         LEFT JOIN authors AS t1 ON t0.author = t1.id"
    );
    assert_eq!(
        compiled.alias_mapping,
        [
            AliasMapping::root("id", ColumnIndex(0)),
            AliasMapping::Nested {
                alias: "author".to_string(),
                identifiers: vec![ColumnIndex(1)],
                children: vec![
                    AliasMapping::root("id", ColumnIndex(1)),
                    AliasMapping::Sub {
                        alias: "articles".to_string(),
                        index: 0,
                    },
                ],
            },
            AliasMapping::Sub {
                alias: "comments".to_string(),
                index: 1,
            },
        ]
    );

    let aliases: Vec<_> = compiled.sub_queries.iter().map(SubQuery::alias).collect();
    assert_eq!(aliases, ["articles", "comments"]);
    assert_eq!(many(&compiled.sub_queries[0]).local_columns, [ColumnIndex(1)]);
    assert_eq!(many(&compiled.sub_queries[1]).local_columns, [ColumnIndex(0)]);
}

#[test]
fn wrong_number_of_key_values_is_a_schema_mismatch() {
    let query = AbstractQuery::new("articles", vec![comments(Modifiers::default())]);
    let compiled = convert_query(&query).unwrap();
    let many = many(&compiled.sub_queries[0]);

    let err = many.query(&[]).unwrap_err();
    assert!(err.is_schema_mismatch());

    let err = many.query(&[json!(1), json!(2)]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "schema mismatch: `comments` expects 1 key values, got 2"
    );
}

#[test]
fn missing_parent_key_reads_as_null() {
    let query = AbstractQuery::new("articles", vec![comments(Modifiers::default())]);
    let compiled = convert_query(&query).unwrap();

    let values =
        many(&compiled.sub_queries[0]).identifier_values(&row(json!({})), ColumnIndex::alias);
    assert_eq!(values, [json!(null)]);
}
