//! Scalar expression nodes.
//!
//! [`Expr`] is the closed sum of every expression form in the supported
//! PostgreSQL grammar subset. Each variant owns its children, so trees are
//! acyclic and single-parented by construction. `precedence()` and
//! `associativity()` drive the builder's parenthesization decisions.

use crate::stmt::{OrderByElement, Query, WindowDefinition};
use crate::{
    ExprAssociativity, ExprPrecedence, Identifier, NodeError, Operator, QualifiedName,
};

// ---------------------------------------------------------------------------
// Constants and parameters
// ---------------------------------------------------------------------------

/// Which quoting form a string constant was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    /// A plain character string: `'...'`, `E'...'`, `$tag$...$tag$`.
    Character,
    /// A binary string: `b'0101'`.
    Binary,
    /// A hexadecimal string: `x'2d'`.
    Hex,
}

/// Keyword constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordConstant {
    Null,
    True,
    False,
}

/// A query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Parameter {
    /// `:name`
    Named(String),
    /// `$n`, 1-based
    Positional(u32),
}

// ---------------------------------------------------------------------------
// Column references and indirection
// ---------------------------------------------------------------------------

/// A (possibly qualified) column reference such as `t.col`, optionally
/// ending in `.*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnReference {
    pub parts: Vec<Identifier>,
    /// Whether the reference ends in `.*` (or is a lone `*` inside an
    /// expression context).
    pub star: bool,
}

impl ColumnReference {
    /// An unqualified column reference.
    #[must_use]
    pub fn bare(column: impl Into<String>) -> Self {
        Self {
            parts: vec![Identifier::new(column)],
            star: false,
        }
    }

    /// A table-qualified column reference.
    #[must_use]
    pub fn qualified(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            parts: vec![Identifier::new(table), Identifier::new(column)],
            star: false,
        }
    }
}

/// One step of indirection applied to a base expression.
///
/// Slice and plain-index forms are separate variants: a plain subscript
/// always has exactly one expression, a slice may omit either bound.
#[derive(Debug, Clone, PartialEq)]
pub enum IndirectionItem {
    /// `.name`
    Field(Identifier),
    /// `.*`
    Star,
    /// `[expr]`
    Index(Expr),
    /// `[lower:upper]`, either bound optional.
    Slice {
        lower: Option<Expr>,
        upper: Option<Expr>,
    },
}

// ---------------------------------------------------------------------------
// Operator-like expressions
// ---------------------------------------------------------------------------

/// A generic operator application, unary (`left` absent) or binary.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorExpression {
    pub operator: Operator,
    pub left: Option<Box<Expr>>,
    pub right: Box<Expr>,
}

impl OperatorExpression {
    /// Binary application of a plain operator.
    pub fn binary(
        operator: impl Into<String>,
        left: Expr,
        right: Expr,
    ) -> Result<Self, NodeError> {
        Ok(Self {
            operator: Operator::plain(operator)?,
            left: Some(Box::new(left)),
            right: Box::new(right),
        })
    }

    /// Unary (prefix) application of a plain operator.
    pub fn unary(operator: impl Into<String>, right: Expr) -> Result<Self, NodeError> {
        Ok(Self {
            operator: Operator::plain(operator)?,
            left: None,
            right: Box::new(right),
        })
    }
}

/// Predicates usable in `IS [NOT] ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IsPredicate {
    Null,
    True,
    False,
    Unknown,
    Document,
}

/// Item type constraint of `IS [NOT] JSON`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonItemKind {
    Value,
    Array,
    Object,
    Scalar,
}

/// Unicode normalization forms for `NORMALIZE` / `IS NORMALIZED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalForm {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

/// `BETWEEN` flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BetweenKind {
    Plain,
    Symmetric,
    Asymmetric,
}

/// Pattern-matching operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternOp {
    Like,
    ILike,
    SimilarTo,
}

/// Right-hand side of an `IN` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum InRhs {
    List(Vec<Expr>),
    Subselect(Box<Query>),
}

/// `ANY` / `ALL` quantifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubLinkKind {
    Any,
    All,
}

/// Argument of an `ANY(...)` / `ALL(...)` construct: a subselect or an
/// array-valued expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayComparisonArg {
    Subselect(Box<Query>),
    Array(Box<Expr>),
}

// ---------------------------------------------------------------------------
// CASE
// ---------------------------------------------------------------------------

/// A `WHEN condition THEN result` arm.
#[derive(Debug, Clone, PartialEq)]
pub struct WhenClause {
    pub condition: Expr,
    pub result: Expr,
}

/// `CASE [argument] WHEN ... THEN ... [ELSE ...] END`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseExpression {
    pub argument: Option<Box<Expr>>,
    pub when_clauses: Vec<WhenClause>,
    pub else_clause: Option<Box<Expr>>,
}

// ---------------------------------------------------------------------------
// Type names
// ---------------------------------------------------------------------------

/// A type name as written in a typecast or column definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeName {
    /// `SETOF` prefix (only valid in function signatures).
    pub setof: bool,
    pub name: QualifiedName,
    /// Type modifiers, e.g. `(10, 2)` in `numeric(10, 2)`.
    pub modifiers: Vec<Expr>,
    /// Array bounds; one entry per `[]` or `[n]`, the dimension kept as its
    /// source spelling.
    pub array_bounds: Vec<Option<String>>,
}

impl TypeName {
    /// A plain unparameterized type.
    #[must_use]
    pub fn plain(name: QualifiedName) -> Self {
        Self {
            setof: false,
            name,
            modifiers: vec![],
            array_bounds: vec![],
        }
    }
}

// ---------------------------------------------------------------------------
// Function calls
// ---------------------------------------------------------------------------

/// A single function argument, optionally named (`name => value`).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionArgument {
    pub name: Option<Identifier>,
    pub value: Expr,
}

/// The argument list of a function call.
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionArguments {
    /// `count(*)`
    Star,
    /// `f(a, b => 2)`; `variadic` marks the final argument.
    List {
        args: Vec<FunctionArgument>,
        variadic: bool,
    },
}

impl FunctionArguments {
    #[must_use]
    pub fn none() -> Self {
        Self::List {
            args: vec![],
            variadic: false,
        }
    }
}

/// A function call, possibly an aggregate or window invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: QualifiedName,
    pub arguments: FunctionArguments,
    pub distinct: bool,
    /// Aggregate `ORDER BY`; rendered inside the parentheses unless
    /// `within_group` is set.
    pub order_by: Vec<OrderByElement>,
    /// `WITHIN GROUP (ORDER BY ...)`
    pub within_group: bool,
    /// `FILTER (WHERE ...)`
    pub filter: Option<Box<Expr>>,
    /// `OVER window`
    pub over: Option<Box<WindowDefinition>>,
}

impl FunctionCall {
    /// A plain call with positional arguments and no modifiers.
    #[must_use]
    pub fn simple(name: QualifiedName, args: Vec<Expr>) -> Self {
        Self {
            name,
            arguments: FunctionArguments::List {
                args: args
                    .into_iter()
                    .map(|value| FunctionArgument { name: None, value })
                    .collect(),
                variadic: false,
            },
            distinct: false,
            order_by: vec![],
            within_group: false,
            filter: None,
            over: None,
        }
    }
}

/// Keyword functions callable without parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SqlValueFunctionName {
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    LocalTime,
    LocalTimestamp,
    CurrentRole,
    CurrentUser,
    SessionUser,
    User,
    CurrentCatalog,
    CurrentSchema,
}

/// `CURRENT_TIMESTAMP(3)` and friends.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlValueFunction {
    pub name: SqlValueFunctionName,
    /// Optional precision, kept as its source spelling.
    pub precision: Option<String>,
}

/// Side argument of `TRIM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrimSide {
    Both,
    Leading,
    Trailing,
}

/// `GREATEST` / `LEAST` selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinMaxKind {
    Greatest,
    Least,
}

// ---------------------------------------------------------------------------
// JSON support
// ---------------------------------------------------------------------------

/// `FORMAT JSON [ENCODING name]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonFormat {
    pub encoding: Option<Identifier>,
}

/// An expression with an optional `FORMAT JSON` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonFormattedValue {
    pub expr: Expr,
    pub format: Option<JsonFormat>,
}

impl JsonFormattedValue {
    #[must_use]
    pub fn plain(expr: Expr) -> Self {
        Self { expr, format: None }
    }
}

/// A `key : value` / `key VALUE value` pair of `JSON_OBJECT`.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonKeyValue {
    pub key: Expr,
    pub value: JsonFormattedValue,
}

/// `RETURNING type [FORMAT JSON ...]` of JSON functions.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonReturning {
    pub type_name: TypeName,
    pub format: Option<JsonFormat>,
}

/// `ON EMPTY` / `ON ERROR` behaviours of JSON query functions.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonBehaviour {
    Error,
    Null,
    True,
    False,
    Unknown,
    EmptyArray,
    EmptyObject,
    Default(Box<Expr>),
}

/// `WITH [CONDITIONAL|UNCONDITIONAL] WRAPPER` / `WITHOUT WRAPPER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonWrapper {
    Without,
    Conditional,
    Unconditional,
}

/// `KEEP QUOTES` / `OMIT QUOTES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonQuotes {
    Keep,
    Omit,
}

/// A `value AS name` element of a JSON `PASSING` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonArgument {
    pub value: JsonFormattedValue,
    pub alias: Identifier,
}

/// Content of `JSON_ARRAY(...)`.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonArrayContent {
    /// A (possibly empty) list of values.
    Values {
        elements: Vec<JsonFormattedValue>,
        absent_on_null: Option<bool>,
    },
    /// `JSON_ARRAY(SELECT ...)`.
    Subselect {
        query: Box<Query>,
        format: Option<JsonFormat>,
    },
}

// ---------------------------------------------------------------------------
// XML support
// ---------------------------------------------------------------------------

/// `DOCUMENT` vs `CONTENT` selector of XMLPARSE / XMLSERIALIZE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlOption {
    Document,
    Content,
}

/// `STANDALONE` pragma of XMLROOT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum XmlStandalone {
    Yes,
    No,
    NoValue,
}

/// An `expr [AS name]` element of XMLELEMENT / XMLFOREST argument lists.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlAttribute {
    pub value: Expr,
    pub name: Option<Identifier>,
}

// ---------------------------------------------------------------------------
// The expression enum
// ---------------------------------------------------------------------------

/// A scalar expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric constant, kept in its exact source spelling.
    Numeric(String),
    /// A string constant.
    StringLiteral { value: String, kind: StringKind },
    /// `NULL` / `TRUE` / `FALSE`.
    Keyword(KeywordConstant),
    /// `:name` or `$n`.
    Parameter(Parameter),
    /// A column reference.
    ColumnRef(ColumnReference),
    /// Subscripting / field selection applied to a base expression.
    Indirection {
        base: Box<Expr>,
        items: Vec<IndirectionItem>,
    },
    /// A generic unary or binary operator application.
    Operator(OperatorExpression),
    /// Logical `NOT`.
    Not(Box<Expr>),
    /// Logical `AND` (binary; chains nest to the left).
    And(Box<Expr>, Box<Expr>),
    /// Logical `OR`.
    Or(Box<Expr>, Box<Expr>),
    /// `IS [NOT] NULL / TRUE / FALSE / UNKNOWN / DOCUMENT`.
    Is {
        arg: Box<Expr>,
        predicate: IsPredicate,
        not: bool,
    },
    /// `IS [NOT] DISTINCT FROM`.
    IsDistinctFrom {
        left: Box<Expr>,
        right: Box<Expr>,
        not: bool,
    },
    /// `IS [NOT] OF (type, ...)`.
    IsOf {
        arg: Box<Expr>,
        types: Vec<TypeName>,
        not: bool,
    },
    /// `IS [NOT] JSON [VALUE|ARRAY|OBJECT|SCALAR] [WITH|WITHOUT UNIQUE KEYS]`.
    IsJson {
        arg: Box<Expr>,
        item_kind: Option<JsonItemKind>,
        unique_keys: Option<bool>,
        not: bool,
    },
    /// `IS [NOT] [form] NORMALIZED`.
    IsNormalized {
        arg: Box<Expr>,
        form: Option<NormalForm>,
        not: bool,
    },
    /// `expr [NOT] BETWEEN [SYMMETRIC|ASYMMETRIC] low AND high`.
    Between {
        arg: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        kind: BetweenKind,
        not: bool,
    },
    /// `expr [NOT] LIKE/ILIKE/SIMILAR TO pattern [ESCAPE escape]`.
    PatternMatch {
        arg: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        op: PatternOp,
        not: bool,
    },
    /// `expr [NOT] IN (...)`.
    In {
        arg: Box<Expr>,
        rhs: InRhs,
        not: bool,
    },
    /// `(a, b) OVERLAPS (c, d)`.
    Overlaps {
        left: (Box<Expr>, Box<Expr>),
        right: (Box<Expr>, Box<Expr>),
    },
    /// A CASE expression.
    Case(CaseExpression),
    /// `expr::type` (also produced by `CAST(expr AS type)`).
    Typecast {
        arg: Box<Expr>,
        target: TypeName,
    },
    /// `expr COLLATE collation`.
    Collate {
        arg: Box<Expr>,
        collation: QualifiedName,
    },
    /// `expr AT TIME ZONE zone`.
    AtTimeZone { arg: Box<Expr>, zone: Box<Expr> },
    /// `expr AT LOCAL`.
    AtLocal(Box<Expr>),
    /// `ARRAY[...]`; nested `Array` elements print without the keyword.
    Array(Vec<Expr>),
    /// `ARRAY(SELECT ...)`.
    ArraySubselect(Box<Query>),
    /// A row constructor; `explicit` records the `ROW` keyword.
    Row { elements: Vec<Expr>, explicit: bool },
    /// A scalar subquery.
    Subselect(Box<Query>),
    /// `[NOT] EXISTS (SELECT ...)`.
    Exists { query: Box<Query>, not: bool },
    /// `ANY(...)` / `ALL(...)`, always the right operand of an operator.
    ArrayComparison {
        kind: SubLinkKind,
        argument: ArrayComparisonArg,
    },
    /// A function call.
    FunctionCall(Box<FunctionCall>),
    /// `CURRENT_DATE` and other parenthesis-free system functions.
    ValueFunction(SqlValueFunction),
    /// `EXTRACT(field FROM source)`.
    Extract {
        field: Identifier,
        source: Box<Expr>,
    },
    /// `OVERLAY(string PLACING replacement FROM start [FOR count])`.
    Overlay {
        string: Box<Expr>,
        replacement: Box<Expr>,
        start: Box<Expr>,
        count: Option<Box<Expr>>,
    },
    /// `POSITION(substring IN string)`.
    Position {
        substring: Box<Expr>,
        string: Box<Expr>,
    },
    /// `SUBSTRING(string [FROM start] [FOR count])`.
    Substring {
        string: Box<Expr>,
        from: Option<Box<Expr>>,
        for_count: Option<Box<Expr>>,
    },
    /// `SUBSTRING(string SIMILAR pattern ESCAPE escape)`.
    SubstringSimilar {
        string: Box<Expr>,
        pattern: Box<Expr>,
        escape: Box<Expr>,
    },
    /// `TRIM([side] [characters FROM] string)`.
    Trim {
        side: TrimSide,
        characters: Option<Box<Expr>>,
        string: Box<Expr>,
    },
    /// `NORMALIZE(arg [, form])`.
    Normalize {
        arg: Box<Expr>,
        form: Option<NormalForm>,
    },
    /// `NULLIF(first, second)`.
    NullIf(Box<Expr>, Box<Expr>),
    /// `COALESCE(...)`.
    Coalesce(Vec<Expr>),
    /// `GREATEST(...)` / `LEAST(...)`.
    MinMax { kind: MinMaxKind, args: Vec<Expr> },
    /// `COLLATION FOR (expr)`.
    CollationFor(Box<Expr>),
    /// The `DEFAULT` placeholder, valid only in INSERT / UPDATE / MERGE
    /// value positions.
    SetToDefault,

    // -- JSON constructors and query functions ------------------------------
    /// `JSON(expr [FORMAT JSON] [WITH|WITHOUT UNIQUE KEYS])`.
    Json {
        value: Box<JsonFormattedValue>,
        unique_keys: Option<bool>,
    },
    /// `JSON_SCALAR(expr)`.
    JsonScalar(Box<Expr>),
    /// `JSON_SERIALIZE(expr [RETURNING type])`.
    JsonSerialize {
        value: Box<JsonFormattedValue>,
        returning: Option<JsonReturning>,
    },
    /// `JSON_OBJECT(key : value, ... [NULL|ABSENT ON NULL] [...])`.
    JsonObject {
        fields: Vec<JsonKeyValue>,
        absent_on_null: Option<bool>,
        unique_keys: Option<bool>,
        returning: Option<JsonReturning>,
    },
    /// `JSON_ARRAY(...)`.
    JsonArray {
        content: JsonArrayContent,
        returning: Option<JsonReturning>,
    },
    /// `JSON_OBJECTAGG(key : value ...)`.
    JsonObjectAgg {
        field: Box<JsonKeyValue>,
        absent_on_null: Option<bool>,
        unique_keys: Option<bool>,
        returning: Option<JsonReturning>,
        filter: Option<Box<Expr>>,
        over: Option<Box<WindowDefinition>>,
    },
    /// `JSON_ARRAYAGG(value [ORDER BY ...] ...)`.
    JsonArrayAgg {
        value: Box<JsonFormattedValue>,
        order_by: Vec<OrderByElement>,
        absent_on_null: Option<bool>,
        returning: Option<JsonReturning>,
        filter: Option<Box<Expr>>,
        over: Option<Box<WindowDefinition>>,
    },
    /// `JSON_EXISTS(context, path [PASSING ...] [ON ERROR])`.
    JsonExists {
        context: Box<JsonFormattedValue>,
        path: Box<Expr>,
        passing: Vec<JsonArgument>,
        on_error: Option<JsonBehaviour>,
    },
    /// `JSON_VALUE(context, path ...)`.
    JsonValue {
        context: Box<JsonFormattedValue>,
        path: Box<Expr>,
        passing: Vec<JsonArgument>,
        returning: Option<JsonReturning>,
        on_empty: Option<JsonBehaviour>,
        on_error: Option<JsonBehaviour>,
    },
    /// `JSON_QUERY(context, path ...)`.
    JsonQuery {
        context: Box<JsonFormattedValue>,
        path: Box<Expr>,
        passing: Vec<JsonArgument>,
        returning: Option<JsonReturning>,
        wrapper: Option<JsonWrapper>,
        quotes: Option<JsonQuotes>,
        on_empty: Option<JsonBehaviour>,
        on_error: Option<JsonBehaviour>,
    },

    // -- XML functions ------------------------------------------------------
    /// `XMLCONCAT(...)`.
    XmlConcat(Vec<Expr>),
    /// `XMLELEMENT(NAME name [, XMLATTRIBUTES(...)] [, content ...])`.
    XmlElement {
        name: Identifier,
        attributes: Vec<XmlAttribute>,
        content: Vec<Expr>,
    },
    /// `XMLEXISTS(query PASSING document)`.
    XmlExists {
        query: Box<Expr>,
        document: Box<Expr>,
    },
    /// `XMLFOREST(...)`.
    XmlForest(Vec<XmlAttribute>),
    /// `XMLPARSE(DOCUMENT|CONTENT expr [PRESERVE WHITESPACE])`.
    XmlParse {
        option: XmlOption,
        argument: Box<Expr>,
        preserve_whitespace: bool,
    },
    /// `XMLPI(NAME name [, content])`.
    XmlPi {
        name: Identifier,
        content: Option<Box<Expr>>,
    },
    /// `XMLROOT(xml, VERSION ... [, STANDALONE ...])`.
    XmlRoot {
        xml: Box<Expr>,
        version: Option<Box<Expr>>,
        standalone: Option<XmlStandalone>,
    },
    /// `XMLSERIALIZE(DOCUMENT|CONTENT expr AS type [INDENT|NO INDENT])`.
    XmlSerialize {
        option: XmlOption,
        argument: Box<Expr>,
        type_name: TypeName,
        indent: Option<bool>,
    },
}

impl Expr {
    /// A character string constant.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::StringLiteral {
            value: value.into(),
            kind: StringKind::Character,
        }
    }

    /// A numeric constant from its source spelling.
    #[must_use]
    pub fn number(value: impl Into<String>) -> Self {
        Self::Numeric(value.into())
    }

    /// An unqualified column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::ColumnRef(ColumnReference::bare(name))
    }

    /// The precedence of this expression when used as an operand.
    #[must_use]
    pub fn precedence(&self) -> ExprPrecedence {
        match self {
            Self::Or(..) => ExprPrecedence::Or,
            Self::And(..) => ExprPrecedence::And,
            Self::Not(_) => ExprPrecedence::Not,
            Self::Is { .. }
            | Self::IsDistinctFrom { .. }
            | Self::IsOf { .. }
            | Self::IsJson { .. }
            | Self::IsNormalized { .. } => ExprPrecedence::Is,
            Self::Operator(op) => op.operator.precedence(op.left.is_none()),
            Self::PatternMatch { .. } => ExprPrecedence::Pattern,
            Self::Overlaps { .. } => ExprPrecedence::Overlaps,
            Self::Between { .. } => ExprPrecedence::Between,
            Self::In { .. } => ExprPrecedence::In,
            Self::Typecast { .. } => ExprPrecedence::Typecast,
            Self::Collate { .. } => ExprPrecedence::Collate,
            Self::AtTimeZone { .. } | Self::AtLocal(_) => ExprPrecedence::TimeZone,
            // Indirection binds tighter than any operator but the builder
            // may still need to wrap its base.
            _ => ExprPrecedence::Atom,
        }
    }

    /// The associativity of this expression's operator, if any.
    #[must_use]
    pub fn associativity(&self) -> ExprAssociativity {
        match self {
            Self::Or(..) | Self::And(..) => ExprAssociativity::Left,
            Self::Not(_) => ExprAssociativity::Right,
            Self::Is { .. }
            | Self::IsDistinctFrom { .. }
            | Self::IsOf { .. }
            | Self::IsJson { .. }
            | Self::IsNormalized { .. }
            | Self::PatternMatch { .. }
            | Self::Between { .. }
            | Self::In { .. }
            | Self::Overlaps { .. } => ExprAssociativity::None,
            Self::Operator(op) => op.operator.associativity(op.left.is_none()),
            _ => ExprAssociativity::Left,
        }
    }

    /// Whether this is one of the multi-keyword negated operators whose
    /// pre-9.5 precedence differed between operand sides (`NOT LIKE`,
    /// `NOT BETWEEN`, `NOT IN`, ...). The builder's compat mode wraps their
    /// operands.
    #[must_use]
    pub fn is_negated_multi_keyword(&self) -> bool {
        matches!(
            self,
            Self::PatternMatch { not: true, .. }
                | Self::Between { not: true, .. }
                | Self::In { not: true, .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binop(op: &str, left: Expr, right: Expr) -> Expr {
        Expr::Operator(OperatorExpression::binary(op, left, right).unwrap())
    }

    #[test]
    fn test_expr_precedence_mapping() {
        let a = Expr::column("a");
        let b = Expr::column("b");
        assert_eq!(
            Expr::And(Box::new(a.clone()), Box::new(b.clone())).precedence(),
            ExprPrecedence::And
        );
        assert_eq!(
            binop("=", a.clone(), b.clone()).precedence(),
            ExprPrecedence::Comparison
        );
        assert_eq!(
            binop("+", a.clone(), b.clone()).precedence(),
            ExprPrecedence::Addition
        );
        assert_eq!(
            binop("@>", a.clone(), b.clone()).precedence(),
            ExprPrecedence::GenericOp
        );
        assert_eq!(a.precedence(), ExprPrecedence::Atom);
        assert_eq!(
            Expr::Typecast {
                arg: Box::new(b),
                target: TypeName::plain(QualifiedName::bare("int4")),
            }
            .precedence(),
            ExprPrecedence::Typecast
        );
    }

    #[test]
    fn test_unary_minus_precedence() {
        let neg = Expr::Operator(OperatorExpression::unary("-", Expr::number("1")).unwrap());
        assert_eq!(neg.precedence(), ExprPrecedence::UnaryMinus);
        assert_eq!(neg.associativity(), ExprAssociativity::Right);
    }

    #[test]
    fn test_structural_equality_and_deep_clone() {
        let e = binop(
            "=",
            Expr::column("a"),
            binop("+", Expr::number("1"), Expr::number("2")),
        );
        let clone = e.clone();
        assert_eq!(e, clone);
        // A structurally different tree compares unequal.
        let other = binop("=", Expr::column("a"), Expr::number("3"));
        assert_ne!(e, other);
    }

    #[test]
    fn test_negated_multi_keyword_detection() {
        let like = Expr::PatternMatch {
            arg: Box::new(Expr::column("a")),
            pattern: Box::new(Expr::string("x%")),
            escape: None,
            op: PatternOp::Like,
            not: true,
        };
        assert!(like.is_negated_multi_keyword());
        let plain = Expr::PatternMatch {
            arg: Box::new(Expr::column("a")),
            pattern: Box::new(Expr::string("x%")),
            escape: None,
            op: PatternOp::Like,
            not: false,
        };
        assert!(!plain.is_negated_multi_keyword());
    }
}
