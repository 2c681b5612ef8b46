use nestql::query::{FieldNode, Modifiers};
use nestql::{convert_query, AbstractQuery, Error};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn filtered(filter: Value) -> Result<nestql::ConverterResult, Error> {
    convert_query(
        &AbstractQuery::new("articles", vec![FieldNode::primitive("id")]).modifiers(Modifiers {
            filter: Some(filter),
            ..Modifiers::default()
        }),
    )
}

#[test]
fn operators_become_conditions() {
    let compiled = filtered(json!({
        "_or": [
            { "status": { "_eq": "published" } },
            { "status": { "_null": true } }
        ],
        "rank": { "_in": [1, 2] },
        "title": { "_nstarts_with": "Draft" }
    }))
    .unwrap();

    assert_eq!(
        compiled.root_query.to_string(),
        "SELECT t0.id AS c0 FROM articles AS t0 \
         WHERE (t0.status = $0 OR t0.status IS NULL) AND t0.rank IN ($1, $2) \
         AND t0.title NOT STARTS WITH $3"
    );
    assert_eq!(
        compiled.root_query.parameters,
        [json!("published"), json!(1), json!(2), json!("Draft")]
    );
}

#[test]
fn comparisons_and_null_checks() {
    let compiled = filtered(json!({
        "rank": { "_gte": 3, "_lt": 10 },
        "status": { "_neq": null },
        "author": { "_eq": null, "_nnull": false },
        "title": { "_ncontains": "spam" }
    }))
    .unwrap();

    assert_eq!(
        compiled.root_query.to_string(),
        "SELECT t0.id AS c0 FROM articles AS t0 \
         WHERE t0.rank >= $0 AND t0.rank < $1 AND t0.status IS NOT NULL \
         AND t0.author IS NULL AND t0.author IS NULL AND t0.title NOT CONTAINS $2"
    );
    assert_eq!(
        compiled.root_query.parameters,
        [json!(3), json!(10), json!("spam")]
    );
}

#[test]
fn nested_groups_keep_their_grouping() {
    let compiled = filtered(json!({
        "_and": [
            { "status": { "_eq": "published" } },
            {
                "_or": [
                    { "rank": { "_nin": [0] } },
                    { "_and": [{ "title": { "_ends_with": "!" } }, { "rank": { "_gt": 5 } }] }
                ]
            }
        ]
    }))
    .unwrap();

    assert_eq!(
        compiled.root_query.to_string(),
        "SELECT t0.id AS c0 FROM articles AS t0 \
         WHERE t0.status = $0 AND (t0.rank NOT IN ($1) OR (t0.title ENDS WITH $2 AND t0.rank > $3))"
    );
}

#[test]
fn empty_filters_add_no_condition() {
    for filter in [json!({}), json!({ "_and": [] }), json!({ "_or": [{}] })] {
        let compiled = filtered(filter).unwrap();
        assert_eq!(
            compiled.root_query.to_string(),
            "SELECT t0.id AS c0 FROM articles AS t0"
        );
    }
}

#[test]
fn relational_filters_are_not_converted() {
    let err = filtered(json!({ "author": { "name": { "_eq": "Ada" } } })).unwrap_err();

    assert!(err.is_invalid_query());
    assert_eq!(
        err.to_string(),
        "invalid query: relational filter on `author` cannot be converted into a condition"
    );
}

#[test]
fn malformed_operators_are_invalid_queries() {
    let cases = [
        (
            json!({ "rank": { "_between": [1, 2] } }),
            "invalid query: unknown filter operator `_between` on `rank`",
        ),
        (
            json!({ "rank": { "_in": 1 } }),
            "invalid query: `rank._in` expects an array",
        ),
        (
            json!({ "rank": { "_null": "yes" } }),
            "invalid query: `rank._null` expects a boolean",
        ),
        (
            json!({ "title": { "_contains": 1 } }),
            "invalid query: `title._contains` expects a string",
        ),
        (
            json!({ "_eq": 1 }),
            "invalid query: `_eq` must be applied to a field",
        ),
        (
            json!({ "_or": { "rank": { "_eq": 1 } } }),
            "invalid query: `_or` expects an array of filters",
        ),
        (
            json!({ "rank": 1 }),
            "invalid query: `rank` expects an operator object such as { \"_eq\": .. }",
        ),
    ];

    for (filter, message) in cases {
        let err = filtered(filter).unwrap_err();
        assert!(err.is_invalid_query());
        assert_eq!(err.to_string(), message);
    }
}
