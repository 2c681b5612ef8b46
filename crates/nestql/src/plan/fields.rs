use crate::filter::split_scope;
use crate::schema::Collection;
use crate::{Error, Result};

use indexmap::IndexMap;

/// One output key requested at a level of a request.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Requested {
    /// The field read, after resolving aliases.
    pub(crate) field: String,

    /// Set for `json(field, path)` reads.
    pub(crate) json_path: Option<Vec<String>>,

    /// Paths requested below this field, grouped by `field:collection` scope.
    pub(crate) children: IndexMap<Option<String>, Vec<String>>,
}

impl Requested {
    fn new(field: impl Into<String>) -> Requested {
        Requested {
            field: field.into(),
            json_path: None,
            children: IndexMap::new(),
        }
    }

    /// `true` if any path continues below this field, or a scope was named.
    pub(crate) fn is_nested(&self) -> bool {
        !self.children.is_empty()
    }

    /// Paths for candidate `collection`: its scoped paths plus unscoped ones.
    pub(crate) fn paths_for(&self, collection: &str) -> Vec<String> {
        let scoped = self.children.get(&Some(collection.to_string()));
        let unscoped = self.children.get(&None);
        scoped
            .into_iter()
            .chain(unscoped)
            .flatten()
            .cloned()
            .collect()
    }

    pub(crate) fn unscoped_paths(&self) -> Vec<String> {
        self.children.get(&None).cloned().unwrap_or_default()
    }

    pub(crate) fn scopes(&self) -> impl Iterator<Item = &str> {
        self.children.keys().filter_map(|scope| scope.as_deref())
    }
}

/// Groups requested `paths` by their first segment, keyed by output name.
///
/// `*` adds every column of `collection` not requested yet.
pub(crate) fn group(
    paths: &[String],
    alias: &IndexMap<String, String>,
    collection: &Collection,
) -> Result<IndexMap<String, Requested>> {
    let mut out: IndexMap<String, Requested> = IndexMap::new();

    for path in paths {
        let path = path.trim();

        if path == "*" {
            for column in collection.columns() {
                out.entry(column.name.clone())
                    .or_insert_with(|| Requested::new(&column.name));
            }
            continue;
        }

        if let Some(target) = alias.get(path) {
            if let Some((field, json_path)) = parse_json(target)? {
                out.insert(path.to_string(), json_read(field, json_path));
                continue;
            }
        }

        if let Some((field, json_path)) = parse_json(path)? {
            out.insert(path.to_string(), json_read(field, json_path));
            continue;
        }

        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let (name, scope) = split_scope(head);

        if name.is_empty() || rest.is_some_and(str::is_empty) {
            return Err(Error::invalid_query(format!("malformed field path `{path}`")));
        }

        if name == "*" {
            return Err(Error::invalid_query(format!(
                "`*` cannot be followed by a nested path in `{path}`"
            )));
        }

        let field = match alias.get(name) {
            Some(target) if target.contains(['.', ':', '(']) => {
                return Err(Error::invalid_query(format!(
                    "alias `{name}` must name a single field, got `{target}`"
                )))
            }
            Some(target) => target.clone(),
            None => name.to_string(),
        };

        let entry = out
            .entry(name.to_string())
            .or_insert_with(|| Requested::new(field));

        match (scope, rest) {
            (scope, Some(rest)) => entry
                .children
                .entry(scope.map(str::to_string))
                .or_default()
                .push(rest.to_string()),
            (Some(scope), None) => {
                entry.children.entry(Some(scope.to_string())).or_default();
            }
            (None, None) => {}
        }
    }

    Ok(out)
}

fn json_read(field: String, path: Vec<String>) -> Requested {
    Requested {
        json_path: Some(path),
        ..Requested::new(field)
    }
}

/// Parses `json(field, a.b.c)`. `Ok(None)` if `input` is not a json call.
fn parse_json(input: &str) -> Result<Option<(String, Vec<String>)>> {
    let Some(inner) = input
        .strip_prefix("json(")
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return Ok(None);
    };

    let malformed = || Error::invalid_query(format!("malformed json read `{input}`"));

    let (field, path) = inner.split_once(',').ok_or_else(malformed)?;
    let field = field.trim();
    let path: Vec<String> = path
        .trim()
        .split('.')
        .map(|segment| segment.trim().to_string())
        .collect();

    if field.is_empty() || field.contains('.') || path.iter().any(String::is_empty) {
        return Err(malformed());
    }

    Ok(Some((field.to_string(), path)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldType, Schema};
    use pretty_assertions::assert_eq;

    fn articles() -> Collection {
        Schema::builder()
            .collection("articles", |c| {
                c.primary("id", FieldType::Integer)
                    .field("title", FieldType::String)
                    .field("meta", FieldType::Json)
            })
            .build()
            .unwrap()
            .collection("articles")
            .unwrap()
            .clone()
    }

    fn paths(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|path| path.to_string()).collect()
    }

    #[test]
    fn wildcard_then_nested() {
        let grouped = group(
            &paths(&["*", "author.name", "author.company.name"]),
            &IndexMap::new(),
            &articles(),
        )
        .unwrap();

        let keys: Vec<_> = grouped.keys().map(String::as_str).collect();
        assert_eq!(keys, ["id", "title", "meta", "author"]);
        assert_eq!(
            grouped["author"].unscoped_paths(),
            ["name", "company.name"]
        );
        assert!(!grouped["title"].is_nested());
    }

    #[test]
    fn scopes_and_aliases() {
        let alias = IndexMap::from([("writer".to_string(), "author".to_string())]);
        let grouped = group(
            &paths(&["writer.name", "item:posts.title", "item:pages.slug", "item.id"]),
            &alias,
            &articles(),
        )
        .unwrap();

        assert_eq!(grouped["writer"].field, "author");
        assert_eq!(grouped["item"].paths_for("posts"), ["title", "id"]);
        assert_eq!(grouped["item"].paths_for("pages"), ["slug", "id"]);
        assert_eq!(grouped["item"].scopes().collect::<Vec<_>>(), ["posts", "pages"]);
    }

    #[test]
    fn json_reads() {
        let alias = IndexMap::from([("color".to_string(), "json(meta, theme.color)".to_string())]);
        let grouped = group(
            &paths(&["json(meta, a.0)", "color"]),
            &alias,
            &articles(),
        )
        .unwrap();

        let plain = &grouped["json(meta, a.0)"];
        assert_eq!(plain.field, "meta");
        assert_eq!(plain.json_path.as_deref(), Some(&["a".to_string(), "0".to_string()][..]));

        let aliased = &grouped["color"];
        assert_eq!(aliased.field, "meta");
        assert_eq!(
            aliased.json_path.as_deref(),
            Some(&["theme".to_string(), "color".to_string()][..])
        );
    }

    #[test]
    fn malformed_paths() {
        for path in ["author.", ".name", "json(meta)", "json(meta, a..b)", "*.name"] {
            let err = group(&paths(&[path]), &IndexMap::new(), &articles()).unwrap_err();
            assert!(err.is_invalid_query(), "{path}");
        }
    }
}
