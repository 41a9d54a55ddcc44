//! Cross-crate properties: the round-trip law, the dual precedence
//! regimes, walker conformance, and parameter rewriting.

use pgraft_ast::builder::{BuilderOptions, ParenthesesMode, SqlBuilder};
use pgraft_ast::params::{rewrite_parameters, ParameterWalker};
use pgraft_ast::walker::{walk_expr, Walker};
use pgraft_ast::{Expr, NodeError, Operator, QualifiedName, Statement, TypeName};
use pgraft_parser::{parse_statement, ParseError, Parser, ParserOptions, PrecedenceRegime};

fn parse(sql: &str) -> Statement {
    parse_statement(sql).unwrap_or_else(|e| panic!("parse failed for {sql:?}: {e}"))
}

fn build(statement: &Statement, mode: ParenthesesMode) -> String {
    SqlBuilder::new(BuilderOptions::single_line().with_parentheses(mode))
        .build(statement)
        .expect("build failed")
}

/// parse(build(parse(sql))) must equal parse(sql), in both modes and in
/// both layouts.
fn assert_round_trip(sql: &str) {
    let original = parse(sql);
    for mode in [ParenthesesMode::Current, ParenthesesMode::Compat] {
        let rebuilt = build(&original, mode);
        let reparsed = parse_statement(&rebuilt)
            .unwrap_or_else(|e| panic!("reparse failed for {rebuilt:?} (from {sql:?}): {e}"));
        assert_eq!(reparsed, original, "round trip changed the tree:\n  in: {sql}\n out: {rebuilt}");
    }
    // Multi-line layout with the default wrap width.
    let pretty = SqlBuilder::new(BuilderOptions::default())
        .build(&original)
        .expect("build failed");
    let reparsed = parse_statement(&pretty)
        .unwrap_or_else(|e| panic!("reparse failed for multi-line output {pretty:?}: {e}"));
    assert_eq!(reparsed, original, "multi-line round trip changed the tree");
}

const ROUND_TRIP_CORPUS: &[&str] = &[
    "select 1",
    "select distinct on (dept, grade) dept, grade, name from employees",
    "select u.id, u.name as n, count(*) total from users u \
     join orders o on o.user_id = u.id \
     left join payments p using (order_id) \
     natural full join audit \
     cross join regions \
     where u.active and o.total > 100 or p.state is null \
     group by distinct u.id, u.name having count(*) > 2",
    "select a, sum(b) over w, rank() over (w order by c) \
     from t window w as (partition by a rows between 1 preceding and unbounded following exclude ties)",
    "select count(*) filter (where x > 0) over (groups between unbounded preceding and current row) from t",
    "select percentile_cont(0.5) within group (order by x) from t",
    "select f(a, variadic b), g(x => 1, y => 2) from t",
    "select case x when 1 then 'one' else 'other' end, case when y then 1 end from t",
    "select x between symmetric 1 and 10, y not between 2 and 3 from t",
    "select a not like 'x%' escape '#', b ilike 'y%', c similar to '[0-9]+' from t",
    "select v in (1, 2, 3), w not in (select id from banned) from t",
    "select (d1, d2) overlaps (d3, d4) from t",
    "select x is distinct from y, z is not document, q is json array with unique keys from t",
    "select s is nfc normalized, s is not normalized, v is not of (int4, text) from t",
    "select ts at time zone 'UTC', ts at local, name collate \"en_US\" from t",
    "select array[1, 2, 3], array[[1, 2], [3, 4]], array(select id from t) from u",
    "select row(1, 'a', true), (1, 2) from t",
    "select exists (select 1 from t), not exists (select 1 from u)",
    "select x = any(select y from t), z > all($1) from u",
    "select nullif(a, b), coalesce(a, b, 0), greatest(a, b), least(a, b) from t",
    "select extract(year from d), extract(epoch from ts) from t",
    "select overlay(s placing 'xx' from 2 for 3), position('lo' in s) from t",
    "select substring(s from 2 for 4), substring(s similar '%#\"o#\"%' escape '#') from t",
    "select trim(both ' ' from s), trim(leading from s), trim(both from s) from t",
    "select normalize(s), normalize(s, nfkd), collation for (s) from t",
    "select current_date, current_timestamp(3), localtime, session_user, current_schema",
    "select cast(x as int4), y::numeric(10, 2), z::text[], '1 day'::interval from t",
    "select a.b.c, t.*, (row(1, 2)).f, arr[1], arr[2:3], arr[:5], mat[1][2] from t",
    "select ~ x, @ y, - z, x ->> 'k', payload #>> '{a,b}', u @@ v from t",
    "select operator(pg_catalog.+) 3, a operator(myschema.@@) b from t",
    "select x'1f', b'0101', e'tab\\there', $tag$raw $ content$tag$, 'adjacent' 'literals'",
    "select 1_000_000, 0x1F, 0o17, 0b101, 1.5e-3, .5",
    "select json('{\"a\": 1}' format json with unique keys), json_scalar(42), json_serialize(j returning text)",
    "select json_object('a' : 1, 'b' : x format json absent on null with unique keys returning jsonb) from t",
    "select json_object(), json_array(1, 'two', null null on null), json_array(select id from t returning jsonb)",
    "select json_objectagg(k : v absent on null) filter (where v > 0), json_arrayagg(v order by v desc returning jsonb) from t",
    "select json_exists(j, '$.a' passing 1 as x error on error) from t",
    "select json_value(j, '$.b' returning int4 default 0 on empty error on error) from t",
    "select json_query(j, '$.c' returning jsonb with conditional wrapper omit quotes null on empty) from t",
    "select xmlconcat(a, b), xmlelement(name root, xmlattributes(x as id, y), 'body') from t",
    "select xmlexists('//item' passing doc), xmlforest(a, b as bee) from t",
    "select xmlparse(document d preserve whitespace), xmlpi(name instruction, 'data') from t",
    "select xmlroot(d, version '1.0', standalone yes), xmlroot(d, version no value) from t",
    "select xmlserialize(content d as text indent) from t",
    "select * from xmltable(xmlnamespaces('http://x' as x, default 'http://d'), \
     '//row' passing doc columns id int4 path '@id' not null, label text default 'none', seq for ordinality) as xt",
    "select * from json_table(j, '$.items[*]' as root passing 1 as lim columns (\
     idx for ordinality, sku text path '$.sku' keep quotes null on empty error on error, \
     present bool exists path '$.deleted', \
     nested path '$.variants[*]' as v columns (color text path '$.color')) error on error) as jt",
    "select * from only inventory as i (a, b), lateral (select 1) s, \
     generate_series(1, 10) with ordinality as g (n, ord)",
    "select * from rows from (generate_series(1, 2), json_to_recordset('[]') as (a int4, b text)) with ordinality as r",
    "select * from big tablesample system (0.5) repeatable (42)",
    "select * from t order by a desc nulls last, b nulls first limit 10 offset 5",
    "select * from t order by a fetch first 3 rows with ties",
    "select * from t for update of t nowait for key share skip locked",
    "select 1 union all select 2 intersect select 3 except select 4",
    "(select 1 order by 1) union (select 2 limit 1) order by 1 limit 2",
    "with recursive r (n) as (select 1 union all select n + 1 from r where n < 5) select n from r",
    "with m as not materialized (select * from t), x as materialized (select 1) select * from m, x",
    "with moved as (delete from src where old returning id) insert into dst (id) select id from moved",
    "values (1, 'a'), (2, 'b')",
    "insert into t default values",
    "insert into t as x (a, b, c[1]) overriding user value values (1, default, 3) \
     on conflict (lower(a)) where b > 0 do update set b = excluded.b, (c, d) = (1, 2) where t.a != 0 \
     returning a, b as bee",
    "insert into t on conflict on constraint t_pkey do nothing",
    "update only t as x set a = 1, b = default, (c, d) = (select 1, 2), (e, f) = row(3, 4) \
     from u where x.id = u.id returning *",
    "delete from t using u, v where t.a = u.a and t.b = v.b returning t.*",
    "merge into inventory as t using deliveries as d on t.sku = d.sku \
     when matched and d.qty = 0 then delete \
     when matched then update set qty = t.qty + d.qty \
     when not matched and d.qty > 0 then insert (sku, qty) values (d.sku, d.qty) \
     when not matched then do nothing \
     returning t.sku",
    "select :name, :name::int4, $tag$x$tag$ from t where id = :name",
    "select a < b and c = d > e from t",
    "select (select max(x) from t) as m, not done from t",
];

#[test]
fn test_round_trip_corpus() {
    for sql in ROUND_TRIP_CORPUS {
        assert_round_trip(sql);
    }
}

// ---------------------------------------------------------------------------
// Precedence regimes (spec'd behaviors)
// ---------------------------------------------------------------------------

fn parse_with(sql: &str, regime: PrecedenceRegime) -> Result<Statement, ParseError> {
    let options = ParserOptions {
        precedence: regime,
        ..ParserOptions::default()
    };
    Parser::new(sql, options)?.parse_statement()
}

fn comparison_parts(expr: &Expr) -> (&str, &Expr, &Expr) {
    let Expr::Operator(op) = expr else {
        panic!("expected an operator expression, got {expr:?}");
    };
    let Operator::Plain(glyphs) = &op.operator else {
        panic!("expected a plain operator");
    };
    (
        glyphs.as_str(),
        op.left.as_deref().expect("binary operator"),
        &op.right,
    )
}

fn first_target(statement: &Statement) -> &Expr {
    let Statement::Select(query) = statement else {
        panic!("expected select");
    };
    let pgraft_ast::QueryBody::Select(core) = &query.body else {
        panic!("expected plain select");
    };
    let Some(pgraft_ast::TargetElement::Expr { expr, .. }) = core.target_list.first() else {
        panic!("expected a target expression");
    };
    expr
}

#[test]
fn test_chained_equals_is_right_nested_under_current() {
    let stmt = parse_with("select foo = bar = baz", PrecedenceRegime::Current).unwrap();
    let (op, left, right) = comparison_parts(first_target(&stmt));
    assert_eq!(op, "=");
    assert_eq!(left, &Expr::column("foo"));
    let (inner_op, inner_left, inner_right) = comparison_parts(right);
    assert_eq!(inner_op, "=");
    assert_eq!(inner_left, &Expr::column("bar"));
    assert_eq!(inner_right, &Expr::column("baz"));

    // Compat output wraps the right chain; current output does not.
    assert_eq!(
        build(&stmt, ParenthesesMode::Compat),
        "select foo = (bar = baz)"
    );
    assert_eq!(
        build(&stmt, ParenthesesMode::Current),
        "select foo = bar = baz"
    );
    // Both outputs reparse to the same tree.
    for mode in [ParenthesesMode::Compat, ParenthesesMode::Current] {
        let rebuilt = build(&stmt, mode);
        assert_eq!(
            parse_with(&rebuilt, PrecedenceRegime::Current).unwrap(),
            stmt
        );
    }
}

#[test]
fn test_mixed_inequalities_by_regime() {
    // Legal and left-associative under the legacy table...
    let stmt = parse_with("select a >= b <= c", PrecedenceRegime::Pre95).unwrap();
    let (op, left, right) = comparison_parts(first_target(&stmt));
    assert_eq!(op, "<=");
    assert_eq!(right, &Expr::column("c"));
    let (inner_op, ..) = comparison_parts(left);
    assert_eq!(inner_op, ">=");

    // ...a syntax error under the current one.
    let err = parse_with("select a >= b <= c", PrecedenceRegime::Current).unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));

    // The legacy tree still prints re-parseably for either era.
    for mode in [ParenthesesMode::Compat, ParenthesesMode::Current] {
        let rebuilt = build(&stmt, mode);
        assert_eq!(rebuilt, "select (a >= b) <= c");
        for regime in [PrecedenceRegime::Current, PrecedenceRegime::Pre95] {
            assert_eq!(parse_with(&rebuilt, regime).unwrap(), stmt);
        }
    }
}

#[test]
fn test_and_binds_looser_than_comparisons() {
    let stmt = parse("select a < b and c = d > e");
    let Expr::And(left, right) = first_target(&stmt) else {
        panic!("expected AND at the top");
    };
    let (op, ..) = comparison_parts(left);
    assert_eq!(op, "<");
    let (op, _, inner) = comparison_parts(right);
    assert_eq!(op, "=");
    let (op, ..) = comparison_parts(inner);
    assert_eq!(op, ">");
}

#[test]
fn test_chained_lt_rejected_in_both_regimes() {
    for regime in [PrecedenceRegime::Current, PrecedenceRegime::Pre95] {
        let err = parse_with("select a < b < c", regime).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }), "{regime:?}");
    }
}

#[test]
fn test_compat_wraps_is_family_argument() {
    let stmt = parse("select a = b is null");
    assert_eq!(build(&stmt, ParenthesesMode::Current), "select a = b is null");
    assert_eq!(
        build(&stmt, ParenthesesMode::Compat),
        "select (a = b) is null"
    );
    for mode in [ParenthesesMode::Compat, ParenthesesMode::Current] {
        let rebuilt = build(&stmt, mode);
        assert_eq!(parse(&rebuilt), stmt);
    }
}

// ---------------------------------------------------------------------------
// Walker conformance: a no-op traversal must reach every expression kind
// ---------------------------------------------------------------------------

fn expr_kind(expr: &Expr) -> &'static str {
    match expr {
        Expr::Numeric(_) => "Numeric",
        Expr::StringLiteral { .. } => "StringLiteral",
        Expr::Keyword(_) => "Keyword",
        Expr::Parameter(_) => "Parameter",
        Expr::ColumnRef(_) => "ColumnRef",
        Expr::Indirection { .. } => "Indirection",
        Expr::Operator(_) => "Operator",
        Expr::Not(_) => "Not",
        Expr::And(..) => "And",
        Expr::Or(..) => "Or",
        Expr::Is { .. } => "Is",
        Expr::IsDistinctFrom { .. } => "IsDistinctFrom",
        Expr::IsOf { .. } => "IsOf",
        Expr::IsJson { .. } => "IsJson",
        Expr::IsNormalized { .. } => "IsNormalized",
        Expr::Between { .. } => "Between",
        Expr::PatternMatch { .. } => "PatternMatch",
        Expr::In { .. } => "In",
        Expr::Overlaps { .. } => "Overlaps",
        Expr::Case(_) => "Case",
        Expr::Typecast { .. } => "Typecast",
        Expr::Collate { .. } => "Collate",
        Expr::AtTimeZone { .. } => "AtTimeZone",
        Expr::AtLocal(_) => "AtLocal",
        Expr::Array(_) => "Array",
        Expr::ArraySubselect(_) => "ArraySubselect",
        Expr::Row { .. } => "Row",
        Expr::Subselect(_) => "Subselect",
        Expr::Exists { .. } => "Exists",
        Expr::ArrayComparison { .. } => "ArrayComparison",
        Expr::FunctionCall(_) => "FunctionCall",
        Expr::ValueFunction(_) => "ValueFunction",
        Expr::Extract { .. } => "Extract",
        Expr::Overlay { .. } => "Overlay",
        Expr::Position { .. } => "Position",
        Expr::Substring { .. } => "Substring",
        Expr::SubstringSimilar { .. } => "SubstringSimilar",
        Expr::Trim { .. } => "Trim",
        Expr::Normalize { .. } => "Normalize",
        Expr::NullIf(..) => "NullIf",
        Expr::Coalesce(_) => "Coalesce",
        Expr::MinMax { .. } => "MinMax",
        Expr::CollationFor(_) => "CollationFor",
        Expr::SetToDefault => "SetToDefault",
        Expr::Json { .. } => "Json",
        Expr::JsonScalar(_) => "JsonScalar",
        Expr::JsonSerialize { .. } => "JsonSerialize",
        Expr::JsonObject { .. } => "JsonObject",
        Expr::JsonArray { .. } => "JsonArray",
        Expr::JsonObjectAgg { .. } => "JsonObjectAgg",
        Expr::JsonArrayAgg { .. } => "JsonArrayAgg",
        Expr::JsonExists { .. } => "JsonExists",
        Expr::JsonValue { .. } => "JsonValue",
        Expr::JsonQuery { .. } => "JsonQuery",
        Expr::XmlConcat(_) => "XmlConcat",
        Expr::XmlElement { .. } => "XmlElement",
        Expr::XmlExists { .. } => "XmlExists",
        Expr::XmlForest(_) => "XmlForest",
        Expr::XmlParse { .. } => "XmlParse",
        Expr::XmlPi { .. } => "XmlPi",
        Expr::XmlRoot { .. } => "XmlRoot",
        Expr::XmlSerialize { .. } => "XmlSerialize",
    }
}

#[derive(Default)]
struct KindCollector {
    seen: std::collections::BTreeSet<&'static str>,
}

impl Walker for KindCollector {
    fn walk_expr(&mut self, expr: &Expr) {
        self.seen.insert(expr_kind(expr));
        walk_expr(self, expr);
    }
}

#[test]
fn test_blank_walker_visits_every_expression_kind() {
    let mut collector = KindCollector::default();
    for sql in ROUND_TRIP_CORPUS {
        collector.walk_statement(&parse(sql));
    }
    let expected = [
        "Numeric", "StringLiteral", "Keyword", "Parameter", "ColumnRef", "Indirection",
        "Operator", "Not", "And", "Or", "Is", "IsDistinctFrom", "IsOf", "IsJson",
        "IsNormalized", "Between", "PatternMatch", "In", "Overlaps", "Case", "Typecast",
        "Collate", "AtTimeZone", "AtLocal", "Array", "ArraySubselect", "Row", "Subselect",
        "Exists", "ArrayComparison", "FunctionCall", "ValueFunction", "Extract", "Overlay",
        "Position", "Substring", "SubstringSimilar", "Trim", "Normalize", "NullIf",
        "Coalesce", "MinMax", "CollationFor", "SetToDefault", "Json", "JsonScalar",
        "JsonSerialize", "JsonObject", "JsonArray", "JsonObjectAgg", "JsonArrayAgg",
        "JsonExists", "JsonValue", "JsonQuery", "XmlConcat", "XmlElement", "XmlExists",
        "XmlForest", "XmlParse", "XmlPi", "XmlRoot", "XmlSerialize",
    ];
    for kind in expected {
        assert!(
            collector.seen.contains(kind),
            "walker never reached expression kind {kind}"
        );
    }
}

// ---------------------------------------------------------------------------
// Parameter rewriting
// ---------------------------------------------------------------------------

#[test]
fn test_named_parameters_rewrite_to_one_ordinal() {
    let mut stmt = parse("select :foo, :bar where :foo = :foo");
    let params = rewrite_parameters(&mut stmt).unwrap();
    assert_eq!(params.names(), ["foo", "bar"]);
    assert_eq!(params.ordinal("foo"), Some(0));
    assert_eq!(
        build(&stmt, ParenthesesMode::Current),
        "select $1, $2 where $1 = $1"
    );
}

#[test]
fn test_mixed_parameter_styles_rejected() {
    let mut stmt = parse("select :foo, $1");
    let err = rewrite_parameters(&mut stmt).unwrap_err();
    assert!(matches!(err, NodeError::MixedParameters { .. }));
}

#[test]
fn test_parameter_type_recovered_from_typecast() {
    let mut stmt = parse("select id from t where id = any(:ids::int4[]) and :ids::int4[] <> '{}'");
    let params = rewrite_parameters(&mut stmt).unwrap();
    assert_eq!(params.names(), ["ids"]);
    let expected = {
        let mut t = TypeName::plain(QualifiedName::bare("int4"));
        t.array_bounds.push(None);
        t
    };
    assert_eq!(params.types()[0], Some(expected));
    assert_eq!(
        build(&stmt, ParenthesesMode::Current),
        "select id from t where id = any($1::int4[]) and $1::int4[] <> '{}'"
    );
}

#[test]
fn test_rewritten_statement_passes_positional_only_builder() {
    let mut stmt = parse("select :a, :b, :a");
    let options = BuilderOptions {
        forbid_named_parameters: true,
        ..BuilderOptions::single_line()
    };
    // Before rewriting the builder refuses...
    let err = SqlBuilder::new(options.clone()).build(&stmt).unwrap_err();
    assert!(matches!(err, NodeError::NamedParameterForbidden { .. }));
    // ...after rewriting it succeeds.
    rewrite_parameters(&mut stmt).unwrap();
    let sql = SqlBuilder::new(options).build(&stmt).unwrap();
    assert_eq!(sql, "select $1, $2, $1");
}

#[test]
fn test_keeping_names_only_extracts() {
    let mut stmt = parse("select :x::text");
    let original = stmt.clone();
    let params = ParameterWalker::keeping_names().walk(&mut stmt).unwrap();
    assert_eq!(params.names(), ["x"]);
    assert_eq!(stmt, original);
}

// ---------------------------------------------------------------------------
// Builder layout
// ---------------------------------------------------------------------------

#[test]
fn test_wrapped_output_reparses_equal() {
    let sql = "select alpha, bravo, charlie, delta, echo, foxtrot, golf, hotel, india, juliett \
               from t where alpha > 0";
    let original = parse(sql);
    let options = BuilderOptions {
        wrap_width: 30,
        ..BuilderOptions::default()
    };
    let pretty = SqlBuilder::new(options).build(&original).unwrap();
    assert!(
        pretty.lines().count() > 3,
        "expected wrapped output, got: {pretty}"
    );
    assert_eq!(parse(&pretty), original);
}

#[test]
fn test_fragment_entry_points() {
    let expr = pgraft_parser::parse_expression("a + b * c").unwrap();
    assert_eq!(expr.to_string(), "a + b * c");

    let element = pgraft_parser::parse_from_element("t join u on t.x = u.x").unwrap();
    assert!(matches!(element, pgraft_ast::FromElement::Join { .. }));

    let target = pgraft_parser::parse_target_element("sum(x) as total").unwrap();
    assert!(matches!(
        target,
        pgraft_ast::TargetElement::Expr { alias: Some(_), .. }
    ));

    let t = pgraft_parser::parse_type_name("numeric(10, 2)").unwrap();
    assert_eq!(t.name, QualifiedName::bare("numeric"));
    assert_eq!(t.modifiers.len(), 2);
}

#[test]
fn test_default_rejected_outside_value_positions() {
    let err = parse_statement("select default").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
    let err = parse_statement("select 1 where default").unwrap_err();
    assert!(matches!(err, ParseError::Syntax { .. }));
}

#[test]
fn test_combining_a_query_with_itself_requires_clone() {
    // Owned operands make `a UNION a` sharing unrepresentable; an explicit
    // clone builds the equivalent tree.
    let base = parse("select 1");
    let Statement::Select(query) = base else {
        panic!("expected select");
    };
    let union = pgraft_ast::Query::plain(pgraft_ast::QueryBody::SetOp(Box::new(
        pgraft_ast::SetOpSelect {
            operator: pgraft_ast::SetOperator::Union,
            left: query.clone(),
            right: query,
        },
    )));
    let stmt = Statement::Select(union);
    assert_eq!(build(&stmt, ParenthesesMode::Current), "select 1 union select 1");
}
