#![allow(dead_code)]

use nestql::schema::{FieldType, Relation};
use nestql::{Row, Schema};
use serde_json::Value;

/// A small blog: articles with authors and comments, polymorphic blocks on
/// posts and pages, and users keyed by tenant.
pub fn schema() -> Schema {
    Schema::builder()
        .collection("companies", |c| {
            c.primary("id", FieldType::Integer)
                .field("name", FieldType::String)
        })
        .collection("authors", |c| {
            c.primary("id", FieldType::Integer)
                .field("name", FieldType::String)
                .nullable("company", FieldType::Integer)
        })
        .collection("articles", |c| {
            c.primary("id", FieldType::Integer)
                .field("title", FieldType::String)
                .field("status", FieldType::String)
                .nullable("rank", FieldType::Integer)
                .nullable("meta", FieldType::Json)
                .nullable("author", FieldType::Integer)
        })
        .collection("comments", |c| {
            c.primary("id", FieldType::Integer)
                .field("body", FieldType::String)
                .field("article", FieldType::Integer)
                .nullable("sort", FieldType::Integer)
        })
        .collection("posts", |c| {
            c.primary("id", FieldType::Integer)
                .field("title", FieldType::String)
        })
        .collection("pages", |c| {
            c.primary("id", FieldType::Integer)
                .field("slug", FieldType::String)
        })
        .collection("blocks", |c| {
            c.primary("id", FieldType::Integer)
                .field("kind", FieldType::String)
                .nullable("item", FieldType::Json)
        })
        .collection("attachments", |c| {
            c.primary("id", FieldType::Integer)
                .nullable("collection", FieldType::String)
                .nullable("item", FieldType::Integer)
        })
        .collection("users", |c| {
            c.primary("tenant_id", FieldType::String)
                .primary("id", FieldType::String)
                .field("name", FieldType::String)
        })
        .collection("sessions", |c| {
            c.primary("id", FieldType::Integer)
                .field("tenant_id", FieldType::String)
                .field("user_id", FieldType::String)
                .field("token", FieldType::String)
        })
        .relation(Relation::m2o("authors", "company", "companies"))
        .relation(Relation::m2o("articles", "author", "authors").one_field("articles"))
        .relation(
            Relation::m2o("comments", "article", "articles")
                .one_field("comments")
                .sort_field("sort"),
        )
        .relation(Relation::a2o("blocks", "item", ["posts", "pages"]).one_field("blocks"))
        .relation(
            Relation::a2o("attachments", "item", ["posts", "pages"])
                .one_collection_field("collection"),
        )
        .relation(
            Relation::m2o("sessions", "user", "users")
                .fields(["tenant_id", "user_id"])
                .one_field("sessions"),
        )
        .build()
        .unwrap()
}

/// A driver row from a JSON object literal.
pub fn row(value: Value) -> Row {
    match value {
        Value::Object(row) => row,
        other => panic!("rows are objects, got {other}"),
    }
}

/// Shorthand for `Vec<String>` field lists.
pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
