use nestql_core::stmt::{
    ColumnIndex, Direction, Expr, Join, Operand, OrderBy, ParameterIndex, Pattern, Selection,
    SqlQuery, TableIndex,
};

const T0: TableIndex = TableIndex(0);
const T1: TableIndex = TableIndex(1);

fn p(index: usize) -> ParameterIndex {
    ParameterIndex(index)
}

fn col(column: &str) -> Operand {
    Operand::column(T0, column)
}

#[test]
fn select_with_join_filter_and_pagination() {
    let mut query = SqlQuery::new("articles", T0);
    query.clauses.select = vec![
        Selection::column(T0, "id", ColumnIndex(0)),
        Selection::column(T0, "title", ColumnIndex(1)),
        Selection::column(T1, "name", ColumnIndex(2)),
    ];
    query.clauses.joins.push(Join {
        collection: "authors".to_string(),
        table: T1,
        on: Expr::eq(col("author"), Operand::column(T1, "id")),
    });

    let status = query.push_param("published");
    query.and_filter(Expr::eq(col("status"), status));

    query.clauses.order_by.push(OrderBy {
        expr: col("title"),
        direction: Direction::Desc,
    });

    let limit = query.push_param(10);
    query.clauses.limit = Some(limit);
    let offset = query.push_param(20);
    query.clauses.offset = Some(offset);

    assert_eq!(
        query.to_string(),
        "SELECT t0.id AS c0, t0.title AS c1, t1.name AS c2 \
         FROM articles AS t0 \
         LEFT JOIN authors AS t1 ON t0.author = t1.id \
         WHERE t0.status = $0 \
         ORDER BY t0.title DESC \
         LIMIT $1 OFFSET $2"
    );
    assert_eq!(query.placeholders(), [p(0), p(1), p(2)]);
    assert_eq!(query.param(p(0)), Some(&"published".into()));
    assert_eq!(query.param(p(3)), None);
}

#[test]
fn and_filter_accumulates() {
    let mut query = SqlQuery::new("articles", T0);
    query.and_filter(Expr::eq(col("a"), p(0)));
    query.and_filter(Expr::eq(col("b"), p(1)));
    query.and_filter(Expr::and(Expr::eq(col("c"), p(2)), Expr::eq(col("d"), p(3))));

    let Some(Expr::And(and)) = &query.clauses.filter else {
        panic!("expected an AND, got {:?}", query.clauses.filter);
    };
    assert_eq!(and.operands.len(), 4);
}

#[test]
fn nested_compounds_are_parenthesized() {
    let expr = Expr::or(
        Expr::and(Expr::eq(col("x"), p(0)), Expr::eq(col("y"), p(1))),
        Expr::is_null(col("z")),
    );
    assert_eq!(expr.to_string(), "(t0.x = $0 AND t0.y = $1) OR t0.z IS NULL");

    let expr = Expr::not(Expr::eq(col("x"), p(0)));
    assert_eq!(expr.to_string(), "NOT (t0.x = $0)");
}

#[test]
fn list_null_and_pattern_conditions() {
    assert_eq!(
        Expr::in_list(col("id"), vec![p(0), p(1)]).to_string(),
        "t0.id IN ($0, $1)"
    );
    assert_eq!(
        Expr::not_in_list(col("id"), vec![p(0)]).to_string(),
        "t0.id NOT IN ($0)"
    );
    assert_eq!(Expr::is_not_null(col("id")).to_string(), "t0.id IS NOT NULL");
    assert_eq!(
        Expr::pattern(col("title"), Pattern::StartsWith, p(0), true).to_string(),
        "t0.title NOT STARTS WITH $0"
    );
    assert_eq!(
        Expr::pattern(col("title"), Pattern::Contains, p(3), false).to_string(),
        "t0.title CONTAINS $3"
    );
}

#[test]
fn json_operands_bind_their_path() {
    let expr = Expr::eq(Operand::json(T0, "meta", vec![p(0), p(1)]), p(2));

    assert_eq!(expr.to_string(), "json(t0.meta, $0, $1) = $2");
    assert_eq!(expr.params(), [p(0), p(1), p(2)]);
    assert!(expr.is_eq());
}

#[test]
fn empty_groups() {
    assert_eq!(Expr::and_from_vec(vec![]), None);
    assert_eq!(Expr::or_from_vec(vec![]), None);

    let single = Expr::and_from_vec(vec![Expr::is_null(col("x"))]).unwrap();
    assert_eq!(single.to_string(), "t0.x IS NULL");
}

#[test]
fn index_aliases() {
    assert_eq!(TableIndex(3).alias(), "t3");
    assert_eq!(ColumnIndex(12).alias(), "c12");
    assert_eq!(p(7).to_string(), "$7");
}
