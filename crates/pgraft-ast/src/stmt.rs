//! Statement and clause nodes.
//!
//! [`Statement`] is the root of every parsed SQL command. SELECT-like
//! queries (plain SELECT, VALUES, set operations) are modeled by the
//! recursive [`Query`] type so that set-operation nesting and per-level
//! ORDER BY / LIMIT / locking clauses are preserved exactly.

use crate::expr::{
    Expr, IndirectionItem, JsonArgument, JsonBehaviour, JsonFormat, JsonFormattedValue,
    JsonQuotes, JsonWrapper, TypeName,
};
use crate::{Identifier, NodeError, QualifiedName};

// ---------------------------------------------------------------------------
// Top-level statements
// ---------------------------------------------------------------------------

/// A single parsed SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A SELECT-like query, including VALUES and set operations.
    Select(Query),
    Insert(Insert),
    Update(Update),
    Delete(Delete),
    Merge(Merge),
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Any SELECT-like query together with the clauses that may trail it.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub with: Option<WithClause>,
    pub body: QueryBody,
    pub order_by: Vec<OrderByElement>,
    pub limit: Option<LimitClause>,
    pub locking: Vec<LockingElement>,
}

impl Query {
    /// A query with no trailing clauses.
    #[must_use]
    pub fn plain(body: QueryBody) -> Self {
        Self {
            with: None,
            body,
            order_by: vec![],
            limit: None,
            locking: vec![],
        }
    }

    /// Whether the query carries clauses that force parentheses when it is
    /// used as a set-operation operand.
    #[must_use]
    pub fn has_trailing_clauses(&self) -> bool {
        self.with.is_some()
            || !self.order_by.is_empty()
            || self.limit.is_some()
            || !self.locking.is_empty()
    }

    /// Set-operation precedence: `UNION`/`EXCEPT` bind loosest, `INTERSECT`
    /// tighter, a plain SELECT/VALUES body tightest.
    #[must_use]
    pub fn set_op_precedence(&self) -> u8 {
        match &self.body {
            QueryBody::SetOp(op) => match op.operator {
                SetOperator::Union
                | SetOperator::UnionAll
                | SetOperator::Except
                | SetOperator::ExceptAll => 1,
                SetOperator::Intersect | SetOperator::IntersectAll => 2,
            },
            QueryBody::Select(_) | QueryBody::Values(_) => 3,
        }
    }
}

/// The body of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryBody {
    Select(Box<SelectCore>),
    /// `VALUES (row), (row), ...`
    Values(Vec<Vec<Expr>>),
    SetOp(Box<SetOpSelect>),
}

/// Set operators combining two queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperator {
    Union,
    UnionAll,
    Intersect,
    IntersectAll,
    Except,
    ExceptAll,
}

/// Two queries combined with a set operator.
///
/// The operands are owned, so a statement can never be combined with
/// itself; building `a UNION a` requires an explicit clone.
#[derive(Debug, Clone, PartialEq)]
pub struct SetOpSelect {
    pub operator: SetOperator,
    pub left: Query,
    pub right: Query,
}

/// The core of a plain SELECT.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectCore {
    pub distinct: Option<DistinctClause>,
    pub target_list: Vec<TargetElement>,
    pub from: Vec<FromElement>,
    pub where_clause: Option<Expr>,
    pub group_by: Option<GroupByClause>,
    pub having: Option<Expr>,
    pub window: Vec<WindowDefinition>,
}

impl SelectCore {
    /// `SELECT <targets>` with every other clause empty.
    #[must_use]
    pub fn simple(target_list: Vec<TargetElement>) -> Self {
        Self {
            distinct: None,
            target_list,
            from: vec![],
            where_clause: None,
            group_by: None,
            having: None,
            window: vec![],
        }
    }
}

/// `DISTINCT` / `DISTINCT ON (...)`.
#[derive(Debug, Clone, PartialEq)]
pub enum DistinctClause {
    Distinct,
    On(Vec<Expr>),
}

/// `GROUP BY [DISTINCT] expr, ...`
#[derive(Debug, Clone, PartialEq)]
pub struct GroupByClause {
    pub distinct: bool,
    pub items: Vec<Expr>,
}

/// One element of a target (or RETURNING) list.
#[derive(Debug, Clone, PartialEq)]
pub enum TargetElement {
    /// A lone `*`.
    Star,
    /// `expr [AS alias]`.
    Expr {
        expr: Expr,
        alias: Option<Identifier>,
    },
}

// ---------------------------------------------------------------------------
// ORDER BY / LIMIT / locking
// ---------------------------------------------------------------------------

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderByDirection {
    Asc,
    Desc,
}

/// `NULLS FIRST` / `NULLS LAST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NullsOrder {
    First,
    Last,
}

/// One `ORDER BY` term.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByElement {
    pub expression: Expr,
    pub direction: Option<OrderByDirection>,
    pub nulls: Option<NullsOrder>,
}

impl OrderByElement {
    #[must_use]
    pub fn plain(expression: Expr) -> Self {
        Self {
            expression,
            direction: None,
            nulls: None,
        }
    }
}

/// `LIMIT` / `OFFSET` / `FETCH FIRST ... WITH TIES`.
#[derive(Debug, Clone, PartialEq)]
pub struct LimitClause {
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
    /// `true` renders `FETCH FIRST n ROWS WITH TIES` instead of `LIMIT n`.
    pub with_ties: bool,
}

/// Lock strength of a locking clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockingStrength {
    Update,
    NoKeyUpdate,
    Share,
    KeyShare,
}

/// `NOWAIT` / `SKIP LOCKED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockingWait {
    NoWait,
    SkipLocked,
}

/// `FOR UPDATE [OF table, ...] [NOWAIT | SKIP LOCKED]`.
#[derive(Debug, Clone, PartialEq)]
pub struct LockingElement {
    pub strength: LockingStrength,
    pub relations: Vec<QualifiedName>,
    pub wait: Option<LockingWait>,
}

// ---------------------------------------------------------------------------
// WITH
// ---------------------------------------------------------------------------

/// `WITH [RECURSIVE] cte, ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct WithClause {
    pub recursive: bool,
    pub ctes: Vec<CommonTableExpression>,
}

/// One common table expression. CTE bodies may be any statement
/// (DML with RETURNING included).
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTableExpression {
    pub name: Identifier,
    pub columns: Vec<Identifier>,
    /// `Some(true)` = `MATERIALIZED`, `Some(false)` = `NOT MATERIALIZED`.
    pub materialized: Option<bool>,
    pub statement: Box<Statement>,
}

// ---------------------------------------------------------------------------
// Window definitions
// ---------------------------------------------------------------------------

/// A window specification, named (WINDOW clause) or inline (OVER).
#[derive(Debug, Clone, PartialEq)]
pub struct WindowDefinition {
    /// The window's name when defined in a WINDOW clause.
    pub name: Option<Identifier>,
    /// The base window referenced inside the parentheses.
    pub ref_name: Option<Identifier>,
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderByElement>,
    pub frame: Option<WindowFrame>,
}

impl WindowDefinition {
    /// An `OVER window_name` reference with nothing else.
    #[must_use]
    pub fn reference(name: impl Into<String>) -> Self {
        Self {
            name: None,
            ref_name: Some(Identifier::new(name)),
            partition_by: vec![],
            order_by: vec![],
            frame: None,
        }
    }

    /// Whether this renders as a bare window name after OVER.
    #[must_use]
    pub fn is_bare_reference(&self) -> bool {
        self.ref_name.is_some()
            && self.partition_by.is_empty()
            && self.order_by.is_empty()
            && self.frame.is_none()
    }
}

/// `ROWS` / `RANGE` / `GROUPS` frame mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowFrameMode {
    Rows,
    Range,
    Groups,
}

/// A frame boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowFrameBound {
    UnboundedPreceding,
    Preceding(Expr),
    CurrentRow,
    Following(Expr),
    UnboundedFollowing,
}

impl WindowFrameBound {
    fn rank(&self) -> u8 {
        match self {
            Self::UnboundedPreceding => 0,
            Self::Preceding(_) => 1,
            Self::CurrentRow => 2,
            Self::Following(_) => 3,
            Self::UnboundedFollowing => 4,
        }
    }
}

/// `EXCLUDE` options of a frame clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowFrameExclusion {
    CurrentRow,
    Group,
    Ties,
    NoOthers,
}

/// A validated window frame clause.
///
/// Construction enforces the bound rules, so every `WindowFrame` value in a
/// tree is well-formed; the fields are therefore read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowFrame {
    mode: WindowFrameMode,
    start: WindowFrameBound,
    end: Option<WindowFrameBound>,
    exclusion: Option<WindowFrameExclusion>,
}

impl WindowFrame {
    /// Create a frame clause, validating the bound combination.
    pub fn new(
        mode: WindowFrameMode,
        start: WindowFrameBound,
        end: Option<WindowFrameBound>,
        exclusion: Option<WindowFrameExclusion>,
    ) -> Result<Self, NodeError> {
        if matches!(start, WindowFrameBound::UnboundedFollowing) {
            return Err(NodeError::FrameStartUnboundedFollowing);
        }
        if let Some(ref end) = end {
            if matches!(end, WindowFrameBound::UnboundedPreceding) {
                return Err(NodeError::FrameEndUnboundedPreceding);
            }
            match (start.rank(), end.rank()) {
                (2, 1) => return Err(NodeError::FrameStartCurrentRowPreceding),
                (3, 1) => return Err(NodeError::FrameStartFollowingPreceding),
                (3, 2) => return Err(NodeError::FrameStartFollowingEndCurrentRow),
                _ => {}
            }
        }
        Ok(Self {
            mode,
            start,
            end,
            exclusion,
        })
    }

    #[must_use]
    pub fn mode(&self) -> WindowFrameMode {
        self.mode
    }

    #[must_use]
    pub fn start(&self) -> &WindowFrameBound {
        &self.start
    }

    #[must_use]
    pub fn end(&self) -> Option<&WindowFrameBound> {
        self.end.as_ref()
    }

    #[must_use]
    pub fn exclusion(&self) -> Option<WindowFrameExclusion> {
        self.exclusion
    }

    /// Mutable access to the expressions inside the frame bounds.
    ///
    /// The bound kinds stay fixed, so the validated combination cannot be
    /// broken through this.
    pub fn exprs_mut(&mut self) -> impl Iterator<Item = &mut Expr> {
        let start = match &mut self.start {
            WindowFrameBound::Preceding(e) | WindowFrameBound::Following(e) => Some(e),
            _ => None,
        };
        let end = match &mut self.end {
            Some(WindowFrameBound::Preceding(e) | WindowFrameBound::Following(e)) => Some(e),
            _ => None,
        };
        start.into_iter().chain(end)
    }
}

// ---------------------------------------------------------------------------
// FROM elements
// ---------------------------------------------------------------------------

/// `AS alias (col, ...)` attached to a FROM element.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationAlias {
    pub alias: Identifier,
    pub columns: Vec<Identifier>,
}

impl RelationAlias {
    #[must_use]
    pub fn plain(alias: impl Into<String>) -> Self {
        Self {
            alias: Identifier::new(alias),
            columns: vec![],
        }
    }
}

/// A column definition used by functions returning `record` and XMLTABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDefinition {
    pub name: Identifier,
    pub type_name: TypeName,
}

/// One function of a `ROWS FROM (...)` list.
#[derive(Debug, Clone, PartialEq)]
pub struct RowsFromElement {
    pub function: Expr,
    pub column_definitions: Vec<ColumnDefinition>,
}

/// Join kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Cross,
    Inner,
    Left,
    Right,
    Full,
}

/// `USING (col, ...) [AS alias]`.
#[derive(Debug, Clone, PartialEq)]
pub struct UsingClause {
    pub columns: Vec<Identifier>,
    pub alias: Option<Identifier>,
}

/// A JOIN between two FROM elements. `natural`, `using` and `on` are
/// mutually exclusive; none of them may appear on a CROSS JOIN (the parser
/// and programmatic constructors both enforce this).
#[derive(Debug, Clone, PartialEq)]
pub struct JoinExpression {
    pub kind: JoinKind,
    pub left: FromElement,
    pub right: FromElement,
    pub natural: bool,
    pub using: Option<UsingClause>,
    pub on: Option<Expr>,
}

/// `ns_uri AS prefix` / `DEFAULT ns_uri` of XMLTABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNamespace {
    pub value: Expr,
    /// `None` marks the DEFAULT namespace.
    pub alias: Option<Identifier>,
}

/// An XMLTABLE output column.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlColumn {
    ForOrdinality {
        name: Identifier,
    },
    Typed {
        name: Identifier,
        type_name: TypeName,
        path: Option<Expr>,
        /// `Some(true)` = `NULL`, `Some(false)` = `NOT NULL`.
        nullable: Option<bool>,
        default: Option<Expr>,
    },
}

/// A JSON_TABLE output column, possibly a nested column list.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonTableColumn {
    ForOrdinality {
        name: Identifier,
    },
    Regular {
        name: Identifier,
        type_name: TypeName,
        format: Option<JsonFormat>,
        path: Option<Expr>,
        wrapper: Option<JsonWrapper>,
        quotes: Option<JsonQuotes>,
        on_empty: Option<JsonBehaviour>,
        on_error: Option<JsonBehaviour>,
    },
    Exists {
        name: Identifier,
        type_name: Option<TypeName>,
        path: Option<Expr>,
        on_error: Option<JsonBehaviour>,
    },
    /// `NESTED [PATH] 'path' [AS name] COLUMNS (...)`.
    Nested {
        path: Expr,
        path_name: Option<Identifier>,
        columns: Vec<JsonTableColumn>,
    },
}

/// An element of a FROM (or USING) clause.
#[derive(Debug, Clone, PartialEq)]
pub enum FromElement {
    /// `[ONLY] table [AS alias (cols)]`.
    Relation {
        name: QualifiedName,
        only: bool,
        alias: Option<RelationAlias>,
    },
    /// `[LATERAL] (subquery) AS alias`.
    Subselect {
        lateral: bool,
        query: Box<Query>,
        alias: Option<RelationAlias>,
    },
    /// `[LATERAL] func(args) [WITH ORDINALITY] [AS alias (cols | coldefs)]`.
    Function {
        lateral: bool,
        function: Expr,
        with_ordinality: bool,
        alias: Option<RelationAlias>,
        column_definitions: Vec<ColumnDefinition>,
    },
    /// `[LATERAL] ROWS FROM (f(...) AS (...), ...) [WITH ORDINALITY]`.
    RowsFrom {
        lateral: bool,
        functions: Vec<RowsFromElement>,
        with_ordinality: bool,
        alias: Option<RelationAlias>,
    },
    /// A JOIN, possibly parenthesized and re-aliased.
    Join {
        join: Box<JoinExpression>,
        alias: Option<RelationAlias>,
    },
    /// `relation TABLESAMPLE method (args) [REPEATABLE (seed)]`.
    TableSample {
        relation: Box<FromElement>,
        method: QualifiedName,
        arguments: Vec<Expr>,
        repeatable: Option<Expr>,
    },
    /// `[LATERAL] XMLTABLE([XMLNAMESPACES(...),] row PASSING doc COLUMNS ...)`.
    XmlTable {
        lateral: bool,
        namespaces: Vec<XmlNamespace>,
        row_expression: Expr,
        document_expression: Expr,
        columns: Vec<XmlColumn>,
        alias: Option<RelationAlias>,
    },
    /// `[LATERAL] JSON_TABLE(context, path [PASSING ...] COLUMNS (...) [ON ERROR])`.
    JsonTable {
        lateral: bool,
        context: JsonFormattedValue,
        path: Expr,
        path_name: Option<Identifier>,
        passing: Vec<JsonArgument>,
        columns: Vec<JsonTableColumn>,
        on_error: Option<JsonBehaviour>,
        alias: Option<RelationAlias>,
    },
}

// ---------------------------------------------------------------------------
// INSERT
// ---------------------------------------------------------------------------

/// The target relation of an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertTarget {
    pub relation: QualifiedName,
    pub alias: Option<Identifier>,
}

/// A column target of INSERT / UPDATE SET, with optional indirection
/// (`col[1]`, `col.field`).
#[derive(Debug, Clone, PartialEq)]
pub struct SetTargetElement {
    pub name: Identifier,
    pub indirection: Vec<IndirectionItem>,
}

impl SetTargetElement {
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self {
            name: Identifier::new(name),
            indirection: vec![],
        }
    }
}

/// `OVERRIDING { SYSTEM | USER } VALUE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverridingKind {
    System,
    User,
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub with: Option<WithClause>,
    pub relation: InsertTarget,
    pub columns: Vec<SetTargetElement>,
    pub overriding: Option<OverridingKind>,
    /// `None` renders `DEFAULT VALUES`.
    pub values: Option<Box<Query>>,
    pub on_conflict: Option<OnConflictClause>,
    pub returning: Vec<TargetElement>,
}

/// A single element of a conflict target's index parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexElement {
    pub expression: Expr,
    pub collation: Option<QualifiedName>,
    pub opclass: Option<QualifiedName>,
    pub direction: Option<OrderByDirection>,
    pub nulls: Option<NullsOrder>,
}

/// The conflict target of ON CONFLICT.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictTarget {
    IndexParameters {
        elements: Vec<IndexElement>,
        where_clause: Option<Expr>,
    },
    Constraint(Identifier),
}

/// The DO part of ON CONFLICT.
#[derive(Debug, Clone, PartialEq)]
pub enum ConflictAction {
    DoNothing,
    DoUpdate {
        set: Vec<SetClause>,
        where_clause: Option<Expr>,
    },
}

/// `ON CONFLICT [target] DO action`.
#[derive(Debug, Clone, PartialEq)]
pub struct OnConflictClause {
    pub target: Option<ConflictTarget>,
    pub action: ConflictAction,
}

// ---------------------------------------------------------------------------
// UPDATE / DELETE
// ---------------------------------------------------------------------------

/// The target relation of UPDATE / DELETE / MERGE.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateOrDeleteTarget {
    pub relation: QualifiedName,
    pub only: bool,
    pub alias: Option<Identifier>,
}

impl UpdateOrDeleteTarget {
    #[must_use]
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            relation: QualifiedName::bare(name),
            only: false,
            alias: None,
        }
    }
}

/// Source of a multi-column SET clause.
#[derive(Debug, Clone, PartialEq)]
pub enum MultipleSetSource {
    /// `(a, b) = ROW(1, 2)` / `(a, b) = (1, 2)`.
    Row(Vec<Expr>),
    /// `(a, b) = (SELECT ...)`.
    Subselect(Box<Query>),
}

/// One SET assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum SetClause {
    Single {
        target: SetTargetElement,
        value: Expr,
    },
    Multiple {
        targets: Vec<SetTargetElement>,
        value: MultipleSetSource,
    },
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Update {
    pub with: Option<WithClause>,
    pub relation: UpdateOrDeleteTarget,
    pub set: Vec<SetClause>,
    pub from: Vec<FromElement>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<TargetElement>,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Delete {
    pub with: Option<WithClause>,
    pub relation: UpdateOrDeleteTarget,
    pub using: Vec<FromElement>,
    pub where_clause: Option<Expr>,
    pub returning: Vec<TargetElement>,
}

// ---------------------------------------------------------------------------
// MERGE
// ---------------------------------------------------------------------------

/// Action of a matched / not-matched MERGE arm.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeAction {
    /// `THEN UPDATE SET ...` (matched arms only).
    Update { set: Vec<SetClause> },
    /// `THEN DELETE` (matched arms only).
    Delete,
    /// `THEN INSERT ...` (not-matched arms only); `values: None` renders
    /// `DEFAULT VALUES`.
    Insert {
        columns: Vec<SetTargetElement>,
        overriding: Option<OverridingKind>,
        values: Option<Vec<Expr>>,
    },
    /// `THEN DO NOTHING`.
    Nothing,
}

/// `WHEN [NOT] MATCHED [AND condition] THEN action`.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeWhenClause {
    pub matched: bool,
    pub condition: Option<Expr>,
    pub action: MergeAction,
}

/// A MERGE statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Merge {
    pub with: Option<WithClause>,
    pub relation: UpdateOrDeleteTarget,
    pub using: Box<FromElement>,
    pub on: Expr,
    pub when_clauses: Vec<MergeWhenClause>,
    pub returning: Vec<TargetElement>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_frame_validation() {
        // frame start cannot be UNBOUNDED FOLLOWING
        assert_eq!(
            WindowFrame::new(
                WindowFrameMode::Rows,
                WindowFrameBound::UnboundedFollowing,
                None,
                None
            ),
            Err(NodeError::FrameStartUnboundedFollowing)
        );
        // frame end cannot be UNBOUNDED PRECEDING
        assert_eq!(
            WindowFrame::new(
                WindowFrameMode::Rows,
                WindowFrameBound::CurrentRow,
                Some(WindowFrameBound::UnboundedPreceding),
                None
            ),
            Err(NodeError::FrameEndUnboundedPreceding)
        );
        // starting at CURRENT ROW cannot have preceding rows
        assert_eq!(
            WindowFrame::new(
                WindowFrameMode::Rows,
                WindowFrameBound::CurrentRow,
                Some(WindowFrameBound::Preceding(Expr::number("1"))),
                None
            ),
            Err(NodeError::FrameStartCurrentRowPreceding)
        );
        // following -> current row
        assert_eq!(
            WindowFrame::new(
                WindowFrameMode::Range,
                WindowFrameBound::Following(Expr::number("1")),
                Some(WindowFrameBound::CurrentRow),
                None
            ),
            Err(NodeError::FrameStartFollowingEndCurrentRow)
        );
        // a sane frame constructs fine
        assert!(WindowFrame::new(
            WindowFrameMode::Rows,
            WindowFrameBound::UnboundedPreceding,
            Some(WindowFrameBound::CurrentRow),
            Some(WindowFrameExclusion::Ties),
        )
        .is_ok());
    }

    #[test]
    fn test_set_op_precedence() {
        let one = Query::plain(QueryBody::Values(vec![vec![Expr::number("1")]]));
        assert_eq!(one.set_op_precedence(), 3);

        let union = Query::plain(QueryBody::SetOp(Box::new(SetOpSelect {
            operator: SetOperator::Union,
            left: one.clone(),
            right: one.clone(),
        })));
        assert_eq!(union.set_op_precedence(), 1);

        let intersect = Query::plain(QueryBody::SetOp(Box::new(SetOpSelect {
            operator: SetOperator::IntersectAll,
            left: one.clone(),
            right: one,
        })));
        assert_eq!(intersect.set_op_precedence(), 2);
    }

    #[test]
    fn test_query_trailing_clauses() {
        let mut q = Query::plain(QueryBody::Select(Box::new(SelectCore::simple(vec![
            TargetElement::Star,
        ]))));
        assert!(!q.has_trailing_clauses());
        q.order_by.push(OrderByElement::plain(Expr::column("a")));
        assert!(q.has_trailing_clauses());
    }
}
