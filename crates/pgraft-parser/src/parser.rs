//! Hand-written recursive descent parser for statements and clauses.
//!
//! Expression parsing lives in `expr.rs`; this module owns the token
//! cursor, statement grammar (SELECT / INSERT / UPDATE / DELETE / MERGE),
//! FROM-clause items, window definitions and type names.

use pgraft_ast::{
    ColumnDefinition, ColumnReference, CommonTableExpression, ConflictAction, ConflictTarget,
    Delete, DistinctClause, Expr, FromElement, GroupByClause, Identifier,
    IndexElement, IndirectionItem, Insert, InsertTarget, JoinExpression, JoinKind,
    JsonTableColumn, LimitClause, LockingElement, LockingStrength, LockingWait, Merge,
    MergeAction, MergeWhenClause, MultipleSetSource, NullsOrder, OnConflictClause,
    OrderByDirection, OrderByElement, OverridingKind, QualifiedName, Query, QueryBody,
    RelationAlias, RowsFromElement, SelectCore, SetClause, SetOpSelect, SetOperator,
    SetTargetElement, Statement, TargetElement, TypeName, Update, UpdateOrDeleteTarget,
    UsingClause, WindowDefinition, WindowFrame, WindowFrameBound, WindowFrameExclusion,
    WindowFrameMode, WithClause, XmlColumn, XmlNamespace,
};

use crate::lexer::{Lexer, LexerOptions};
use crate::token::{Keyword, Token, TokenKind};
use crate::ParseError;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Which operator precedence table the expression parser uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrecedenceRegime {
    /// Postgres 9.5+ rules.
    #[default]
    Current,
    /// Legacy rules: `<= >= <> !=` are generic left-associative operators.
    Pre95,
}

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserOptions {
    pub precedence: PrecedenceRegime,
    pub lexer: LexerOptions,
}

// ---------------------------------------------------------------------------
// The parser
// ---------------------------------------------------------------------------

/// Recursive-descent parser over a token stream.
///
/// A `Parser` holds only its configuration and cursor; constructing one is
/// cheap and instances are independent.
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) options: ParserOptions,
}

impl Parser {
    /// Lex `sql` and prepare a parser over the resulting tokens.
    pub fn new(sql: &str, options: ParserOptions) -> Result<Self, ParseError> {
        let tokens = Lexer::tokenize(sql, options.lexer)?;
        tracing::trace!(tokens = tokens.len(), "lexed statement");
        Ok(Self {
            tokens,
            pos: 0,
            options,
        })
    }

    /// Parse a complete statement; trailing `;` is allowed.
    pub fn parse_statement(mut self) -> Result<Statement, ParseError> {
        let statement = self.parse_statement_inner()?;
        let _ = self.eat_special(';');
        self.expect_eof()?;
        Ok(statement)
    }

    /// Parse a scalar expression fragment.
    pub fn parse_expression(mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_expr()?;
        self.expect_eof()?;
        Ok(expr)
    }

    /// Parse a FROM-clause element fragment.
    pub fn parse_from_element(mut self) -> Result<FromElement, ParseError> {
        let element = self.parse_from_element_impl()?;
        self.expect_eof()?;
        Ok(element)
    }

    /// Parse a target-list element fragment.
    pub fn parse_target_element(mut self) -> Result<TargetElement, ParseError> {
        let element = self.parse_target_element_impl()?;
        self.expect_eof()?;
        Ok(element)
    }

    /// Parse a type name fragment.
    pub fn parse_type_name_fragment(mut self) -> Result<TypeName, ParseError> {
        let type_name = self.parse_type_name()?;
        self.expect_eof()?;
        Ok(type_name)
    }

    // -- cursor helpers -----------------------------------------------------

    pub(crate) fn peek(&self) -> &TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    pub(crate) fn peek_at(&self, offset: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + offset)
            .map_or(&TokenKind::Eof, |t| &t.kind)
    }

    pub(crate) fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(0, |t| t.position)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    pub(crate) fn at_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.peek(), TokenKind::Keyword(kw) if *kw == keyword)
    }

    pub(crate) fn eat_keyword(&mut self, keyword: Keyword) -> bool {
        if self.at_keyword(keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_keyword(&mut self, keyword: Keyword) -> Result<(), ParseError> {
        if self.eat_keyword(keyword) {
            Ok(())
        } else {
            Err(self.unexpected(&keyword.as_str().to_uppercase()))
        }
    }

    pub(crate) fn at_special(&self, c: char) -> bool {
        matches!(self.peek(), TokenKind::Special(s) if *s == c)
    }

    pub(crate) fn eat_special(&mut self, c: char) -> bool {
        if self.at_special(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_special(&mut self, c: char) -> Result<(), ParseError> {
        if self.eat_special(c) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{c}'")))
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::syntax(
            format!("expected {expected}, got {}", self.peek().describe()),
            self.position(),
        )
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if matches!(self.peek(), TokenKind::Eof) {
            Ok(())
        } else {
            Err(ParseError::syntax(
                format!("unexpected {} after statement end", self.peek().describe()),
                self.position(),
            ))
        }
    }

    // -- identifiers --------------------------------------------------------

    /// `ColId`: an identifier or a keyword usable as a column name.
    pub(crate) fn parse_col_id(&mut self) -> Result<Identifier, ParseError> {
        match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Identifier::new(name))
            }
            TokenKind::Keyword(kw) if kw.usable_as_column_name() => {
                self.advance();
                Ok(Identifier::new(kw.as_str()))
            }
            other => Err(ParseError::syntax(
                format!("expected an identifier, got {}", other.describe()),
                self.position(),
            )),
        }
    }

    /// `ColLabel`: an identifier or any keyword (valid after `.` or `AS`).
    pub(crate) fn parse_col_label(&mut self) -> Result<Identifier, ParseError> {
        match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Identifier::new(name))
            }
            TokenKind::Keyword(kw) => {
                self.advance();
                Ok(Identifier::new(kw.as_str()))
            }
            other => Err(ParseError::syntax(
                format!("expected an identifier, got {}", other.describe()),
                self.position(),
            )),
        }
    }

    pub(crate) fn parse_qualified_name(&mut self) -> Result<QualifiedName, ParseError> {
        let mut parts = vec![self.parse_col_id()?];
        while self.at_special('.') && !matches!(self.peek_at(1), TokenKind::Special('.')) {
            self.advance();
            parts.push(self.parse_col_label()?);
        }
        Ok(QualifiedName { parts })
    }

    /// A bare alias if the cursor allows one (identifier or a keyword that
    /// may serve as a column name).
    fn try_bare_alias(&mut self) -> Option<Identifier> {
        match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Some(Identifier::new(name))
            }
            TokenKind::Keyword(kw) if kw.usable_as_column_name() => {
                self.advance();
                Some(Identifier::new(kw.as_str()))
            }
            _ => None,
        }
    }

    // -- statements ---------------------------------------------------------

    pub(crate) fn parse_statement_inner(&mut self) -> Result<Statement, ParseError> {
        let with = if self.at_keyword(Keyword::With) {
            Some(self.parse_with_clause()?)
        } else {
            None
        };
        match self.peek() {
            TokenKind::Keyword(Keyword::Select | Keyword::Values) | TokenKind::Special('(') => {
                tracing::trace!("parsing SELECT-like statement");
                Ok(Statement::Select(self.parse_query_tail(with)?))
            }
            TokenKind::Keyword(Keyword::Insert) => self.parse_insert(with),
            TokenKind::Keyword(Keyword::Update) => self.parse_update(with),
            TokenKind::Keyword(Keyword::Delete) => self.parse_delete(with),
            TokenKind::Keyword(Keyword::Merge)
                if matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Into)) =>
            {
                self.parse_merge(with)
            }
            other => Err(ParseError::syntax(
                format!("expected a statement, got {}", other.describe()),
                self.position(),
            )),
        }
    }

    /// Whether the cursor starts a SELECT-like query.
    pub(crate) fn at_query_start(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Keyword(Keyword::Select | Keyword::Values | Keyword::With)
        )
    }

    /// Parse a complete query, handling a leading WITH clause.
    pub(crate) fn parse_query_full(&mut self) -> Result<Query, ParseError> {
        let with = if self.at_keyword(Keyword::With) {
            Some(self.parse_with_clause()?)
        } else {
            None
        };
        self.parse_query_tail(with)
    }

    /// `'(' query ')'`
    pub(crate) fn parse_parenthesized_query(&mut self) -> Result<Query, ParseError> {
        self.expect_special('(')?;
        let query = self.parse_query_full()?;
        self.expect_special(')')?;
        Ok(query)
    }

    /// Parse a query body plus trailing ORDER BY / LIMIT / locking.
    fn parse_query_tail(&mut self, with: Option<WithClause>) -> Result<Query, ParseError> {
        let mut query = self.parse_set_expr(0)?;
        if with.is_some() {
            query.with = with;
        }
        if self.at_keyword(Keyword::Order) {
            if !query.order_by.is_empty() {
                return Err(ParseError::syntax(
                    "multiple ORDER BY clauses not allowed",
                    self.position(),
                ));
            }
            self.advance();
            self.expect_keyword(Keyword::By)?;
            query.order_by = self.parse_order_by_list()?;
        }
        self.parse_limit_clauses(&mut query)?;
        while self.at_keyword(Keyword::For) {
            query.locking.push(self.parse_locking_element()?);
        }
        Ok(query)
    }

    /// Set-operation precedence climbing: `UNION`/`EXCEPT` bind looser
    /// than `INTERSECT`; all are left-associative.
    fn parse_set_expr(&mut self, min_prec: u8) -> Result<Query, ParseError> {
        let mut left = self.parse_query_primary()?;
        loop {
            let (base, prec) = match self.peek() {
                TokenKind::Keyword(Keyword::Union) => (SetOperator::Union, 1),
                TokenKind::Keyword(Keyword::Except) => (SetOperator::Except, 1),
                TokenKind::Keyword(Keyword::Intersect) => (SetOperator::Intersect, 2),
                _ => break,
            };
            if prec < min_prec {
                break;
            }
            self.advance();
            let all = self.eat_keyword(Keyword::All);
            if !all {
                let _ = self.eat_keyword(Keyword::Distinct);
            }
            let operator = match (base, all) {
                (SetOperator::Union, false) => SetOperator::Union,
                (SetOperator::Union, true) => SetOperator::UnionAll,
                (SetOperator::Except, false) => SetOperator::Except,
                (SetOperator::Except, true) => SetOperator::ExceptAll,
                (_, false) => SetOperator::Intersect,
                (_, true) => SetOperator::IntersectAll,
            };
            let right = self.parse_set_expr(prec + 1)?;
            left = Query::plain(QueryBody::SetOp(Box::new(SetOpSelect {
                operator,
                left,
                right,
            })));
        }
        Ok(left)
    }

    fn parse_query_primary(&mut self) -> Result<Query, ParseError> {
        match self.peek() {
            TokenKind::Special('(') => self.parse_parenthesized_query(),
            TokenKind::Keyword(Keyword::Select) => {
                let core = self.parse_select_core()?;
                Ok(Query::plain(QueryBody::Select(Box::new(core))))
            }
            TokenKind::Keyword(Keyword::Values) => {
                self.advance();
                let mut rows = Vec::new();
                loop {
                    self.expect_special('(')?;
                    let mut row = vec![self.parse_expr_or_default()?];
                    while self.eat_special(',') {
                        row.push(self.parse_expr_or_default()?);
                    }
                    self.expect_special(')')?;
                    rows.push(row);
                    if !self.eat_special(',') {
                        break;
                    }
                }
                Ok(Query::plain(QueryBody::Values(rows)))
            }
            other => Err(ParseError::syntax(
                format!(
                    "expected SELECT, VALUES or a parenthesized query, got {}",
                    other.describe()
                ),
                self.position(),
            )),
        }
    }

    fn at_select_clause_boundary(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Eof
                | TokenKind::Special(')' | ';')
                | TokenKind::Keyword(
                    Keyword::From
                        | Keyword::Where
                        | Keyword::Group
                        | Keyword::Having
                        | Keyword::Window
                        | Keyword::Order
                        | Keyword::Limit
                        | Keyword::Offset
                        | Keyword::Fetch
                        | Keyword::For
                        | Keyword::Union
                        | Keyword::Intersect
                        | Keyword::Except
                        | Keyword::Into
                )
        )
    }

    fn parse_select_core(&mut self) -> Result<SelectCore, ParseError> {
        self.expect_keyword(Keyword::Select)?;

        let distinct = if self.eat_keyword(Keyword::All) {
            None
        } else if self.eat_keyword(Keyword::Distinct) {
            if self.eat_keyword(Keyword::On) {
                self.expect_special('(')?;
                let mut exprs = vec![self.parse_expr()?];
                while self.eat_special(',') {
                    exprs.push(self.parse_expr()?);
                }
                self.expect_special(')')?;
                Some(DistinctClause::On(exprs))
            } else {
                Some(DistinctClause::Distinct)
            }
        } else {
            None
        };

        let mut target_list = Vec::new();
        if !self.at_select_clause_boundary() {
            target_list.push(self.parse_target_element_impl()?);
            while self.eat_special(',') {
                target_list.push(self.parse_target_element_impl()?);
            }
        }

        if self.at_keyword(Keyword::Into) {
            return Err(ParseError::not_implemented(
                "SELECT ... INTO",
                self.position(),
            ));
        }

        let mut core = SelectCore {
            distinct,
            target_list,
            from: vec![],
            where_clause: None,
            group_by: None,
            having: None,
            window: vec![],
        };

        if self.eat_keyword(Keyword::From) {
            core.from = self.parse_from_list()?;
        }
        if self.eat_keyword(Keyword::Where) {
            core.where_clause = Some(self.parse_expr()?);
        }
        if self.eat_keyword(Keyword::Group) {
            self.expect_keyword(Keyword::By)?;
            let distinct = self.eat_keyword(Keyword::Distinct);
            if !distinct {
                let _ = self.eat_keyword(Keyword::All);
            }
            let mut items = vec![self.parse_expr()?];
            while self.eat_special(',') {
                items.push(self.parse_expr()?);
            }
            core.group_by = Some(GroupByClause { distinct, items });
        }
        if self.eat_keyword(Keyword::Having) {
            core.having = Some(self.parse_expr()?);
        }
        if self.eat_keyword(Keyword::Window) {
            loop {
                let name = self.parse_col_id()?;
                self.expect_keyword(Keyword::As)?;
                self.expect_special('(')?;
                let mut window = self.parse_window_specification()?;
                self.expect_special(')')?;
                window.name = Some(name);
                core.window.push(window);
                if !self.eat_special(',') {
                    break;
                }
            }
        }
        Ok(core)
    }

    fn parse_target_element_impl(&mut self) -> Result<TargetElement, ParseError> {
        if self.eat_special('*') {
            return Ok(TargetElement::Star);
        }
        let expr = self.parse_expr()?;
        let alias = if self.eat_keyword(Keyword::As) {
            Some(self.parse_col_label()?)
        } else {
            match self.peek().clone() {
                TokenKind::Identifier(name) => {
                    self.advance();
                    Some(Identifier::new(name))
                }
                TokenKind::Keyword(kw) if kw.can_be_bare_label() => {
                    self.advance();
                    Some(Identifier::new(kw.as_str()))
                }
                _ => None,
            }
        };
        Ok(TargetElement::Expr { expr, alias })
    }

    // -- ORDER BY / LIMIT / locking -----------------------------------------

    pub(crate) fn parse_order_by_list(&mut self) -> Result<Vec<OrderByElement>, ParseError> {
        let mut list = Vec::new();
        loop {
            let expression = self.parse_expr()?;
            let direction = if self.eat_keyword(Keyword::Asc) {
                Some(OrderByDirection::Asc)
            } else if self.eat_keyword(Keyword::Desc) {
                Some(OrderByDirection::Desc)
            } else {
                None
            };
            let nulls = if self.eat_keyword(Keyword::Nulls) {
                if self.eat_keyword(Keyword::First) {
                    Some(NullsOrder::First)
                } else {
                    self.expect_keyword(Keyword::Last)?;
                    Some(NullsOrder::Last)
                }
            } else {
                None
            };
            list.push(OrderByElement {
                expression,
                direction,
                nulls,
            });
            if !self.eat_special(',') {
                break;
            }
        }
        Ok(list)
    }

    fn parse_limit_clauses(&mut self, query: &mut Query) -> Result<(), ParseError> {
        let mut limit: Option<Expr> = None;
        let mut offset: Option<Expr> = None;
        let mut with_ties = false;
        let mut seen_limit = false;
        loop {
            if self.at_keyword(Keyword::Limit) {
                if seen_limit {
                    return Err(ParseError::syntax(
                        "multiple LIMIT clauses not allowed",
                        self.position(),
                    ));
                }
                self.advance();
                seen_limit = true;
                if !self.eat_keyword(Keyword::All) {
                    limit = Some(self.parse_expr()?);
                }
            } else if self.at_keyword(Keyword::Offset) {
                if offset.is_some() {
                    return Err(ParseError::syntax(
                        "multiple OFFSET clauses not allowed",
                        self.position(),
                    ));
                }
                self.advance();
                offset = Some(self.parse_expr()?);
                if !self.eat_keyword(Keyword::Rows) {
                    let _ = self.eat_keyword(Keyword::Row);
                }
            } else if self.at_keyword(Keyword::Fetch) {
                if seen_limit {
                    return Err(ParseError::syntax(
                        "multiple LIMIT clauses not allowed",
                        self.position(),
                    ));
                }
                self.advance();
                seen_limit = true;
                if !self.eat_keyword(Keyword::First) {
                    self.expect_keyword(Keyword::Next)?;
                }
                if self.at_keyword(Keyword::Row) || self.at_keyword(Keyword::Rows) {
                    limit = Some(Expr::Numeric("1".to_owned()));
                } else {
                    limit = Some(self.parse_expr()?);
                }
                if !self.eat_keyword(Keyword::Rows) {
                    let _ = self.eat_keyword(Keyword::Row);
                }
                if self.at_keyword(Keyword::With) {
                    self.advance();
                    self.expect_keyword(Keyword::Ties)?;
                    with_ties = true;
                } else {
                    self.expect_keyword(Keyword::Only)?;
                }
            } else {
                break;
            }
        }
        if limit.is_some() || offset.is_some() {
            if query.limit.is_some() {
                return Err(ParseError::syntax(
                    "multiple LIMIT clauses not allowed",
                    self.position(),
                ));
            }
            query.limit = Some(LimitClause {
                limit,
                offset,
                with_ties,
            });
        }
        Ok(())
    }

    fn parse_locking_element(&mut self) -> Result<LockingElement, ParseError> {
        self.expect_keyword(Keyword::For)?;
        let strength = if self.eat_keyword(Keyword::Update) {
            LockingStrength::Update
        } else if self.eat_keyword(Keyword::Share) {
            LockingStrength::Share
        } else if self.eat_keyword(Keyword::No) {
            self.expect_keyword(Keyword::Key)?;
            self.expect_keyword(Keyword::Update)?;
            LockingStrength::NoKeyUpdate
        } else {
            self.expect_keyword(Keyword::Key)?;
            self.expect_keyword(Keyword::Share)?;
            LockingStrength::KeyShare
        };
        let mut relations = Vec::new();
        if self.eat_keyword(Keyword::Of) {
            loop {
                relations.push(self.parse_qualified_name()?);
                if !self.eat_special(',') {
                    break;
                }
            }
        }
        let wait = if self.eat_keyword(Keyword::Nowait) {
            Some(LockingWait::NoWait)
        } else if self.at_keyword(Keyword::Skip) {
            self.advance();
            self.expect_keyword(Keyword::Locked)?;
            Some(LockingWait::SkipLocked)
        } else {
            None
        };
        Ok(LockingElement {
            strength,
            relations,
            wait,
        })
    }

    // -- WITH ---------------------------------------------------------------

    fn parse_with_clause(&mut self) -> Result<WithClause, ParseError> {
        self.expect_keyword(Keyword::With)?;
        let recursive = self.eat_keyword(Keyword::Recursive);
        let mut ctes = Vec::new();
        loop {
            let name = self.parse_col_id()?;
            let mut columns = Vec::new();
            if self.eat_special('(') {
                columns.push(self.parse_col_id()?);
                while self.eat_special(',') {
                    columns.push(self.parse_col_id()?);
                }
                self.expect_special(')')?;
            }
            self.expect_keyword(Keyword::As)?;
            let materialized = if self.eat_keyword(Keyword::Materialized) {
                Some(true)
            } else if self.at_keyword(Keyword::Not)
                && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Materialized))
            {
                self.advance();
                self.advance();
                Some(false)
            } else {
                None
            };
            self.expect_special('(')?;
            let statement = self.parse_statement_inner()?;
            self.expect_special(')')?;
            ctes.push(CommonTableExpression {
                name,
                columns,
                materialized,
                statement: Box::new(statement),
            });
            if !self.eat_special(',') {
                break;
            }
        }
        Ok(WithClause { recursive, ctes })
    }

    // -- FROM ---------------------------------------------------------------

    fn parse_from_list(&mut self) -> Result<Vec<FromElement>, ParseError> {
        let mut list = vec![self.parse_from_element_impl()?];
        while self.eat_special(',') {
            list.push(self.parse_from_element_impl()?);
        }
        Ok(list)
    }

    pub(crate) fn parse_from_element_impl(&mut self) -> Result<FromElement, ParseError> {
        let mut left = self.parse_from_primary()?;
        loop {
            let natural = self.at_keyword(Keyword::Natural)
                && matches!(
                    self.peek_at(1),
                    TokenKind::Keyword(
                        Keyword::Join
                            | Keyword::Inner
                            | Keyword::Left
                            | Keyword::Right
                            | Keyword::Full
                    )
                );
            if natural {
                self.advance();
            }
            let kind = if self.at_keyword(Keyword::Cross) {
                let position = self.position();
                self.advance();
                self.expect_keyword(Keyword::Join)?;
                if natural {
                    return Err(ParseError::syntax(
                        "NATURAL cannot be combined with CROSS JOIN",
                        position,
                    ));
                }
                JoinKind::Cross
            } else if self.eat_keyword(Keyword::Join) {
                JoinKind::Inner
            } else if self.eat_keyword(Keyword::Inner) {
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Inner
            } else if self.eat_keyword(Keyword::Left) {
                let _ = self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Left
            } else if self.eat_keyword(Keyword::Right) {
                let _ = self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Right
            } else if self.eat_keyword(Keyword::Full) {
                let _ = self.eat_keyword(Keyword::Outer);
                self.expect_keyword(Keyword::Join)?;
                JoinKind::Full
            } else {
                break;
            };
            let right = self.parse_from_primary()?;
            let mut using = None;
            let mut on = None;
            if kind != JoinKind::Cross && !natural {
                if self.eat_keyword(Keyword::On) {
                    on = Some(self.parse_expr()?);
                } else if self.eat_keyword(Keyword::Using) {
                    self.expect_special('(')?;
                    let mut columns = vec![self.parse_col_id()?];
                    while self.eat_special(',') {
                        columns.push(self.parse_col_id()?);
                    }
                    self.expect_special(')')?;
                    let alias = if self.eat_keyword(Keyword::As) {
                        Some(self.parse_col_id()?)
                    } else {
                        None
                    };
                    using = Some(UsingClause { columns, alias });
                } else {
                    return Err(self.unexpected("ON or USING"));
                }
            }
            left = FromElement::Join {
                join: Box::new(JoinExpression {
                    kind,
                    left,
                    right,
                    natural,
                    using,
                    on,
                }),
                alias: None,
            };
        }
        Ok(left)
    }

    #[allow(clippy::too_many_lines)]
    fn parse_from_primary(&mut self) -> Result<FromElement, ParseError> {
        let lateral = self.eat_keyword(Keyword::Lateral);

        let element = if self.at_special('(') {
            if matches!(
                self.peek_at(1),
                TokenKind::Keyword(Keyword::Select | Keyword::Values | Keyword::With)
            ) {
                let query = self.parse_parenthesized_query()?;
                let alias = self.parse_opt_alias()?;
                FromElement::Subselect {
                    lateral,
                    query: Box::new(query),
                    alias,
                }
            } else {
                self.advance();
                let inner = self.parse_from_element_impl()?;
                self.expect_special(')')?;
                let alias = self.parse_opt_alias()?;
                match (inner, alias) {
                    (FromElement::Join { join, alias: None }, alias) => {
                        FromElement::Join { join, alias }
                    }
                    (
                        FromElement::Subselect {
                            lateral: inner_lateral,
                            query,
                            alias: None,
                        },
                        alias @ Some(_),
                    ) => FromElement::Subselect {
                        lateral: lateral || inner_lateral,
                        query,
                        alias,
                    },
                    (
                        FromElement::Relation {
                            name,
                            only,
                            alias: None,
                        },
                        alias @ Some(_),
                    ) => FromElement::Relation { name, only, alias },
                    (inner, None) => inner,
                    (_, Some(_)) => {
                        return Err(ParseError::syntax(
                            "an alias is not allowed here",
                            self.position(),
                        ));
                    }
                }
            }
        } else if self.eat_keyword(Keyword::Only) {
            let name = self.parse_qualified_name()?;
            let alias = self.parse_opt_alias()?;
            FromElement::Relation {
                name,
                only: true,
                alias,
            }
        } else if self.at_keyword(Keyword::Rows)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::From))
        {
            self.advance();
            self.advance();
            self.expect_special('(')?;
            let mut functions = Vec::new();
            loop {
                let function = self.parse_from_function_expr()?;
                let mut column_definitions = Vec::new();
                if self.eat_keyword(Keyword::As) {
                    self.expect_special('(')?;
                    column_definitions.push(self.parse_column_definition()?);
                    while self.eat_special(',') {
                        column_definitions.push(self.parse_column_definition()?);
                    }
                    self.expect_special(')')?;
                }
                functions.push(RowsFromElement {
                    function,
                    column_definitions,
                });
                if !self.eat_special(',') {
                    break;
                }
            }
            self.expect_special(')')?;
            let with_ordinality = self.parse_with_ordinality()?;
            let alias = self.parse_opt_alias()?;
            FromElement::RowsFrom {
                lateral,
                functions,
                with_ordinality,
                alias,
            }
        } else if self.at_keyword(Keyword::Xmltable)
            && matches!(self.peek_at(1), TokenKind::Special('('))
        {
            self.parse_xmltable(lateral)?
        } else if self.at_keyword(Keyword::JsonTable)
            && matches!(self.peek_at(1), TokenKind::Special('('))
        {
            self.parse_json_table(lateral)?
        } else {
            let name = self.parse_qualified_name()?;
            if self.at_special('(') {
                let call = self.parse_function_invocation(name)?;
                let with_ordinality = self.parse_with_ordinality()?;
                let (alias, column_definitions) = self.parse_function_alias()?;
                FromElement::Function {
                    lateral,
                    function: Expr::FunctionCall(Box::new(call)),
                    with_ordinality,
                    alias,
                    column_definitions,
                }
            } else {
                if lateral {
                    return Err(ParseError::syntax(
                        "LATERAL can only be applied to subqueries and functions",
                        self.position(),
                    ));
                }
                let alias = self.parse_opt_alias()?;
                FromElement::Relation {
                    name,
                    only: false,
                    alias,
                }
            }
        };

        // TABLESAMPLE binds to the preceding table reference.
        if self.at_keyword(Keyword::Tablesample) {
            self.advance();
            let method = self.parse_qualified_name()?;
            self.expect_special('(')?;
            let mut arguments = vec![self.parse_expr()?];
            while self.eat_special(',') {
                arguments.push(self.parse_expr()?);
            }
            self.expect_special(')')?;
            let repeatable = if self.eat_keyword(Keyword::Repeatable) {
                self.expect_special('(')?;
                let seed = self.parse_expr()?;
                self.expect_special(')')?;
                Some(seed)
            } else {
                None
            };
            return Ok(FromElement::TableSample {
                relation: Box::new(element),
                method,
                arguments,
                repeatable,
            });
        }
        Ok(element)
    }

    /// A function invocation used as a FROM item inside ROWS FROM.
    fn parse_from_function_expr(&mut self) -> Result<Expr, ParseError> {
        let name = self.parse_qualified_name()?;
        let call = self.parse_function_invocation(name)?;
        Ok(Expr::FunctionCall(Box::new(call)))
    }

    fn parse_with_ordinality(&mut self) -> Result<bool, ParseError> {
        if self.at_keyword(Keyword::With)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Ordinality))
        {
            self.advance();
            self.advance();
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_opt_alias(&mut self) -> Result<Option<RelationAlias>, ParseError> {
        let alias = if self.eat_keyword(Keyword::As) {
            Some(self.parse_col_id()?)
        } else {
            self.try_bare_alias()
        };
        let Some(alias) = alias else {
            return Ok(None);
        };
        let mut columns = Vec::new();
        if self.eat_special('(') {
            columns.push(self.parse_col_id()?);
            while self.eat_special(',') {
                columns.push(self.parse_col_id()?);
            }
            self.expect_special(')')?;
        }
        Ok(Some(RelationAlias { alias, columns }))
    }

    /// Alias of a FROM function: plain alias, `AS (coldefs)` or
    /// `AS alias (coldefs)`.
    fn parse_function_alias(
        &mut self,
    ) -> Result<(Option<RelationAlias>, Vec<ColumnDefinition>), ParseError> {
        if self.eat_keyword(Keyword::As) {
            if self.eat_special('(') {
                let defs = self.parse_column_definition_list()?;
                return Ok((None, defs));
            }
            let alias = self.parse_col_id()?;
            if self.eat_special('(') {
                // Could be column aliases or column definitions; a type
                // name after the first identifier decides.
                return self.parse_alias_parenthesis(alias);
            }
            return Ok((
                Some(RelationAlias {
                    alias,
                    columns: vec![],
                }),
                vec![],
            ));
        }
        if let Some(alias) = self.try_bare_alias() {
            if self.eat_special('(') {
                return self.parse_alias_parenthesis(alias);
            }
            return Ok((
                Some(RelationAlias {
                    alias,
                    columns: vec![],
                }),
                vec![],
            ));
        }
        Ok((None, vec![]))
    }

    fn parse_alias_parenthesis(
        &mut self,
        alias: Identifier,
    ) -> Result<(Option<RelationAlias>, Vec<ColumnDefinition>), ParseError> {
        // After `alias (` either a plain column-alias list or a column
        // definition list (name followed by a type) appears.
        let first = self.parse_col_id()?;
        if self.at_special(',') || self.at_special(')') {
            let mut columns = vec![first];
            while self.eat_special(',') {
                columns.push(self.parse_col_id()?);
            }
            self.expect_special(')')?;
            return Ok((Some(RelationAlias { alias, columns }), vec![]));
        }
        let type_name = self.parse_type_name()?;
        let mut defs = vec![ColumnDefinition {
            name: first,
            type_name,
        }];
        while self.eat_special(',') {
            defs.push(self.parse_column_definition()?);
        }
        self.expect_special(')')?;
        Ok((
            Some(RelationAlias {
                alias,
                columns: vec![],
            }),
            defs,
        ))
    }

    fn parse_column_definition(&mut self) -> Result<ColumnDefinition, ParseError> {
        let name = self.parse_col_id()?;
        let type_name = self.parse_type_name()?;
        Ok(ColumnDefinition { name, type_name })
    }

    fn parse_column_definition_list(&mut self) -> Result<Vec<ColumnDefinition>, ParseError> {
        let mut defs = vec![self.parse_column_definition()?];
        while self.eat_special(',') {
            defs.push(self.parse_column_definition()?);
        }
        self.expect_special(')')?;
        Ok(defs)
    }

    // -- XMLTABLE / JSON_TABLE ----------------------------------------------

    fn parse_xmltable(&mut self, lateral: bool) -> Result<FromElement, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let mut namespaces = Vec::new();
        if self.at_keyword(Keyword::Xmlnamespaces) {
            self.advance();
            self.expect_special('(')?;
            loop {
                if self.eat_keyword(Keyword::Default) {
                    let value = self.parse_expr()?;
                    namespaces.push(XmlNamespace { value, alias: None });
                } else {
                    let value = self.parse_expr()?;
                    self.expect_keyword(Keyword::As)?;
                    let alias = self.parse_col_label()?;
                    namespaces.push(XmlNamespace {
                        value,
                        alias: Some(alias),
                    });
                }
                if !self.eat_special(',') {
                    break;
                }
            }
            self.expect_special(')')?;
            self.expect_special(',')?;
        }
        let row_expression = self.parse_expr()?;
        self.expect_keyword(Keyword::Passing)?;
        let document_expression = self.parse_expr()?;
        self.expect_keyword(Keyword::Columns)?;
        let mut columns = vec![self.parse_xml_column()?];
        while self.eat_special(',') {
            columns.push(self.parse_xml_column()?);
        }
        self.expect_special(')')?;
        let alias = self.parse_opt_alias()?;
        Ok(FromElement::XmlTable {
            lateral,
            namespaces,
            row_expression,
            document_expression,
            columns,
            alias,
        })
    }

    fn parse_xml_column(&mut self) -> Result<XmlColumn, ParseError> {
        let name = self.parse_col_id()?;
        if self.at_keyword(Keyword::For) {
            self.advance();
            self.expect_keyword(Keyword::Ordinality)?;
            return Ok(XmlColumn::ForOrdinality { name });
        }
        let type_name = self.parse_type_name()?;
        let mut path = None;
        let mut default = None;
        let mut nullable = None;
        loop {
            if self.eat_keyword(Keyword::Path) {
                path = Some(self.parse_expr()?);
            } else if self.eat_keyword(Keyword::Default) {
                default = Some(self.parse_expr()?);
            } else if self.at_keyword(Keyword::Not)
                && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Null))
            {
                self.advance();
                self.advance();
                nullable = Some(false);
            } else if self.eat_keyword(Keyword::Null) {
                nullable = Some(true);
            } else {
                break;
            }
        }
        Ok(XmlColumn::Typed {
            name,
            type_name,
            path,
            nullable,
            default,
        })
    }

    fn parse_json_table(&mut self, lateral: bool) -> Result<FromElement, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let context = self.parse_json_formatted_value()?;
        self.expect_special(',')?;
        let path = self.parse_expr()?;
        let path_name = if self.eat_keyword(Keyword::As) {
            Some(self.parse_col_id()?)
        } else {
            None
        };
        let passing = self.parse_json_passing()?;
        self.expect_keyword(Keyword::Columns)?;
        self.expect_special('(')?;
        let mut columns = vec![self.parse_json_table_column()?];
        while self.eat_special(',') {
            columns.push(self.parse_json_table_column()?);
        }
        self.expect_special(')')?;
        let on_error = if let Some(behaviour) = self.parse_json_behaviour()? {
            self.expect_keyword(Keyword::On)?;
            self.expect_keyword(Keyword::Error)?;
            Some(behaviour)
        } else {
            None
        };
        self.expect_special(')')?;
        let alias = self.parse_opt_alias()?;
        Ok(FromElement::JsonTable {
            lateral,
            context,
            path,
            path_name,
            passing,
            columns,
            on_error,
            alias,
        })
    }

    fn parse_json_table_column(&mut self) -> Result<JsonTableColumn, ParseError> {
        if self.at_keyword(Keyword::Nested) {
            self.advance();
            let _ = self.eat_keyword(Keyword::Path);
            let path = self.parse_expr()?;
            let path_name = if self.eat_keyword(Keyword::As) {
                Some(self.parse_col_id()?)
            } else {
                None
            };
            self.expect_keyword(Keyword::Columns)?;
            self.expect_special('(')?;
            let mut columns = vec![self.parse_json_table_column()?];
            while self.eat_special(',') {
                columns.push(self.parse_json_table_column()?);
            }
            self.expect_special(')')?;
            return Ok(JsonTableColumn::Nested {
                path,
                path_name,
                columns,
            });
        }
        let name = self.parse_col_id()?;
        if self.at_keyword(Keyword::For) {
            self.advance();
            self.expect_keyword(Keyword::Ordinality)?;
            return Ok(JsonTableColumn::ForOrdinality { name });
        }
        let type_name = self.parse_type_name()?;
        if self.eat_keyword(Keyword::Exists) {
            let path = if self.eat_keyword(Keyword::Path) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let on_error = if let Some(behaviour) = self.parse_json_behaviour()? {
                self.expect_keyword(Keyword::On)?;
                self.expect_keyword(Keyword::Error)?;
                Some(behaviour)
            } else {
                None
            };
            return Ok(JsonTableColumn::Exists {
                name,
                type_name: Some(type_name),
                path,
                on_error,
            });
        }
        let format = self.parse_json_format()?;
        let path = if self.eat_keyword(Keyword::Path) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let wrapper = self.parse_json_wrapper()?;
        let quotes = self.parse_json_quotes();
        let mut on_empty = None;
        let mut on_error = None;
        while let Some(behaviour) = self.parse_json_behaviour()? {
            self.expect_keyword(Keyword::On)?;
            if self.eat_keyword(Keyword::Empty) {
                on_empty = Some(behaviour);
            } else {
                self.expect_keyword(Keyword::Error)?;
                on_error = Some(behaviour);
            }
        }
        Ok(JsonTableColumn::Regular {
            name,
            type_name,
            format,
            path,
            wrapper,
            quotes,
            on_empty,
            on_error,
        })
    }

    // -- window specifications ----------------------------------------------

    /// Parse the inside of a window specification (after the `(`).
    fn parse_window_specification(&mut self) -> Result<WindowDefinition, ParseError> {
        let ref_name = match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Some(Identifier::new(name))
            }
            _ => None,
        };
        let mut partition_by = Vec::new();
        if self.at_keyword(Keyword::Partition) {
            self.advance();
            self.expect_keyword(Keyword::By)?;
            partition_by.push(self.parse_expr()?);
            while self.eat_special(',') {
                partition_by.push(self.parse_expr()?);
            }
        }
        let order_by = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            vec![]
        };
        let frame = self.parse_window_frame()?;
        Ok(WindowDefinition {
            name: None,
            ref_name,
            partition_by,
            order_by,
            frame,
        })
    }

    /// `OVER` was consumed; parse a window name or `( specification )`.
    pub(crate) fn parse_over_window(&mut self) -> Result<WindowDefinition, ParseError> {
        if self.eat_special('(') {
            let window = self.parse_window_specification()?;
            self.expect_special(')')?;
            Ok(window)
        } else {
            let name = self.parse_col_id()?;
            Ok(WindowDefinition::reference(name.as_str().to_owned()))
        }
    }

    fn parse_window_frame(&mut self) -> Result<Option<WindowFrame>, ParseError> {
        let mode = if self.eat_keyword(Keyword::Range) {
            WindowFrameMode::Range
        } else if self.eat_keyword(Keyword::Rows) {
            WindowFrameMode::Rows
        } else if self.eat_keyword(Keyword::Groups) {
            WindowFrameMode::Groups
        } else {
            return Ok(None);
        };
        let position = self.position();
        let (start, end) = if self.eat_keyword(Keyword::Between) {
            let start = self.parse_frame_bound()?;
            self.expect_keyword(Keyword::And)?;
            let end = self.parse_frame_bound()?;
            (start, Some(end))
        } else {
            (self.parse_frame_bound()?, None)
        };
        let exclusion = if self.eat_keyword(Keyword::Exclude) {
            if self.at_keyword(Keyword::Current) {
                self.advance();
                self.expect_keyword(Keyword::Row)?;
                Some(WindowFrameExclusion::CurrentRow)
            } else if self.eat_keyword(Keyword::Group) {
                Some(WindowFrameExclusion::Group)
            } else if self.eat_keyword(Keyword::Ties) {
                Some(WindowFrameExclusion::Ties)
            } else {
                self.expect_keyword(Keyword::No)?;
                self.expect_keyword(Keyword::Others)?;
                Some(WindowFrameExclusion::NoOthers)
            }
        } else {
            None
        };
        let frame = WindowFrame::new(mode, start, end, exclusion)
            .map_err(|e| ParseError::syntax(e.to_string(), position))?;
        Ok(Some(frame))
    }

    fn parse_frame_bound(&mut self) -> Result<WindowFrameBound, ParseError> {
        if self.eat_keyword(Keyword::Unbounded) {
            if self.eat_keyword(Keyword::Preceding) {
                return Ok(WindowFrameBound::UnboundedPreceding);
            }
            self.expect_keyword(Keyword::Following)?;
            return Ok(WindowFrameBound::UnboundedFollowing);
        }
        if self.at_keyword(Keyword::Current) {
            self.advance();
            self.expect_keyword(Keyword::Row)?;
            return Ok(WindowFrameBound::CurrentRow);
        }
        let offset = self.parse_expr()?;
        if self.eat_keyword(Keyword::Preceding) {
            Ok(WindowFrameBound::Preceding(offset))
        } else {
            self.expect_keyword(Keyword::Following)?;
            Ok(WindowFrameBound::Following(offset))
        }
    }

    // -- INSERT -------------------------------------------------------------

    fn parse_insert(&mut self, with: Option<WithClause>) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;
        let relation = self.parse_qualified_name()?;
        let alias = if self.eat_keyword(Keyword::As) {
            Some(self.parse_col_id()?)
        } else {
            None
        };

        let mut columns = Vec::new();
        if self.at_special('(')
            && !matches!(
                self.peek_at(1),
                TokenKind::Keyword(Keyword::Select | Keyword::Values | Keyword::With)
            )
        {
            self.advance();
            columns.push(self.parse_set_target()?);
            while self.eat_special(',') {
                columns.push(self.parse_set_target()?);
            }
            self.expect_special(')')?;
        }

        let overriding = if self.eat_keyword(Keyword::Overriding) {
            let kind = if self.eat_keyword(Keyword::System) {
                OverridingKind::System
            } else {
                self.expect_keyword(Keyword::User)?;
                OverridingKind::User
            };
            self.expect_keyword(Keyword::Value)?;
            Some(kind)
        } else {
            None
        };

        let values = if self.at_keyword(Keyword::Default)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Values))
        {
            self.advance();
            self.advance();
            None
        } else {
            Some(Box::new(self.parse_query_full()?))
        };

        let on_conflict = if self.at_keyword(Keyword::On)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Conflict))
        {
            self.advance();
            self.advance();
            Some(self.parse_on_conflict()?)
        } else {
            None
        };

        let returning = self.parse_returning()?;
        Ok(Statement::Insert(Insert {
            with,
            relation: InsertTarget { relation, alias },
            columns,
            overriding,
            values,
            on_conflict,
            returning,
        }))
    }

    fn parse_on_conflict(&mut self) -> Result<OnConflictClause, ParseError> {
        let target = if self.eat_special('(') {
            let mut elements = vec![self.parse_index_element()?];
            while self.eat_special(',') {
                elements.push(self.parse_index_element()?);
            }
            self.expect_special(')')?;
            let where_clause = if self.eat_keyword(Keyword::Where) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            Some(ConflictTarget::IndexParameters {
                elements,
                where_clause,
            })
        } else if self.at_keyword(Keyword::On)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Constraint))
        {
            self.advance();
            self.advance();
            Some(ConflictTarget::Constraint(self.parse_col_id()?))
        } else {
            None
        };

        self.expect_keyword(Keyword::Do)?;
        let action = if self.eat_keyword(Keyword::Nothing) {
            ConflictAction::DoNothing
        } else {
            self.expect_keyword(Keyword::Update)?;
            self.expect_keyword(Keyword::Set)?;
            let set = self.parse_set_clause_list()?;
            let where_clause = if self.eat_keyword(Keyword::Where) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            ConflictAction::DoUpdate { set, where_clause }
        };
        Ok(OnConflictClause { target, action })
    }

    fn parse_index_element(&mut self) -> Result<IndexElement, ParseError> {
        let expression = if self.eat_special('(') {
            let expr = self.parse_expr()?;
            self.expect_special(')')?;
            expr
        } else {
            let name = self.parse_col_id()?;
            if self.at_special('(') {
                let call = self.parse_function_invocation(QualifiedName { parts: vec![name] })?;
                Expr::FunctionCall(Box::new(call))
            } else {
                Expr::ColumnRef(ColumnReference {
                    parts: vec![name],
                    star: false,
                })
            }
        };
        let collation = if self.eat_keyword(Keyword::Collate) {
            Some(self.parse_qualified_name()?)
        } else {
            None
        };
        let opclass = if matches!(self.peek(), TokenKind::Identifier(_)) {
            Some(self.parse_qualified_name()?)
        } else {
            None
        };
        let direction = if self.eat_keyword(Keyword::Asc) {
            Some(OrderByDirection::Asc)
        } else if self.eat_keyword(Keyword::Desc) {
            Some(OrderByDirection::Desc)
        } else {
            None
        };
        let nulls = if self.eat_keyword(Keyword::Nulls) {
            if self.eat_keyword(Keyword::First) {
                Some(NullsOrder::First)
            } else {
                self.expect_keyword(Keyword::Last)?;
                Some(NullsOrder::Last)
            }
        } else {
            None
        };
        Ok(IndexElement {
            expression,
            collation,
            opclass,
            direction,
            nulls,
        })
    }

    // -- UPDATE / DELETE ----------------------------------------------------

    fn parse_update_or_delete_target(
        &mut self,
    ) -> Result<UpdateOrDeleteTarget, ParseError> {
        let only = self.eat_keyword(Keyword::Only);
        let relation = self.parse_qualified_name()?;
        let alias = if self.eat_keyword(Keyword::As) {
            Some(self.parse_col_id()?)
        } else if let TokenKind::Identifier(name) = self.peek().clone() {
            self.advance();
            Some(Identifier::new(name))
        } else {
            None
        };
        Ok(UpdateOrDeleteTarget {
            relation,
            only,
            alias,
        })
    }

    fn parse_set_target(&mut self) -> Result<SetTargetElement, ParseError> {
        let name = self.parse_col_id()?;
        let mut indirection = Vec::new();
        loop {
            if self.at_special('.') {
                self.advance();
                indirection.push(IndirectionItem::Field(self.parse_col_label()?));
            } else if self.at_special('[') {
                self.advance();
                indirection.push(self.parse_subscript_item()?);
            } else {
                break;
            }
        }
        Ok(SetTargetElement { name, indirection })
    }

    /// The inside of `[...]` for SET targets; mirrors expression
    /// subscripts.
    fn parse_subscript_item(&mut self) -> Result<IndirectionItem, ParseError> {
        if self.eat_special(':') {
            let upper = if self.at_special(']') {
                None
            } else {
                Some(self.parse_expr()?)
            };
            self.expect_special(']')?;
            return Ok(IndirectionItem::Slice { lower: None, upper });
        }
        let first = self.parse_expr()?;
        if self.eat_special(':') {
            let upper = if self.at_special(']') {
                None
            } else {
                Some(self.parse_expr()?)
            };
            self.expect_special(']')?;
            return Ok(IndirectionItem::Slice {
                lower: Some(first),
                upper,
            });
        }
        self.expect_special(']')?;
        Ok(IndirectionItem::Index(first))
    }

    fn parse_set_clause_list(&mut self) -> Result<Vec<SetClause>, ParseError> {
        let mut list = vec![self.parse_set_clause()?];
        while self.eat_special(',') {
            list.push(self.parse_set_clause()?);
        }
        Ok(list)
    }

    fn parse_set_clause(&mut self) -> Result<SetClause, ParseError> {
        if self.eat_special('(') {
            let mut targets = vec![self.parse_set_target()?];
            while self.eat_special(',') {
                targets.push(self.parse_set_target()?);
            }
            self.expect_special(')')?;
            self.expect_special('=')?;
            let position = self.position();
            let value = match self.parse_expr()? {
                Expr::Subselect(query) => MultipleSetSource::Subselect(query),
                Expr::Row { elements, .. } => MultipleSetSource::Row(elements),
                _ => {
                    return Err(ParseError::syntax(
                        "source for a multiple-column UPDATE item must be a sub-SELECT or ROW() expression",
                        position,
                    ));
                }
            };
            return Ok(SetClause::Multiple { targets, value });
        }
        let target = self.parse_set_target()?;
        self.expect_special('=')?;
        let value = self.parse_expr_or_default()?;
        Ok(SetClause::Single { target, value })
    }

    /// Parse a WHERE clause for UPDATE/DELETE, rejecting `CURRENT OF`.
    fn parse_dml_where(&mut self) -> Result<Option<Expr>, ParseError> {
        if !self.eat_keyword(Keyword::Where) {
            return Ok(None);
        }
        if self.at_keyword(Keyword::Current)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Of))
        {
            return Err(ParseError::not_implemented(
                "WHERE CURRENT OF",
                self.position(),
            ));
        }
        Ok(Some(self.parse_expr()?))
    }

    fn parse_returning(&mut self) -> Result<Vec<TargetElement>, ParseError> {
        if !self.eat_keyword(Keyword::Returning) {
            return Ok(vec![]);
        }
        let mut list = vec![self.parse_target_element_impl()?];
        while self.eat_special(',') {
            list.push(self.parse_target_element_impl()?);
        }
        Ok(list)
    }

    fn parse_update(&mut self, with: Option<WithClause>) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Update)?;
        let relation = self.parse_update_or_delete_target()?;
        self.expect_keyword(Keyword::Set)?;
        let set = self.parse_set_clause_list()?;
        let from = if self.eat_keyword(Keyword::From) {
            self.parse_from_list()?
        } else {
            vec![]
        };
        let where_clause = self.parse_dml_where()?;
        let returning = self.parse_returning()?;
        Ok(Statement::Update(Update {
            with,
            relation,
            set,
            from,
            where_clause,
            returning,
        }))
    }

    fn parse_delete(&mut self, with: Option<WithClause>) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;
        let relation = self.parse_update_or_delete_target()?;
        let using = if self.eat_keyword(Keyword::Using) {
            self.parse_from_list()?
        } else {
            vec![]
        };
        let where_clause = self.parse_dml_where()?;
        let returning = self.parse_returning()?;
        Ok(Statement::Delete(Delete {
            with,
            relation,
            using,
            where_clause,
            returning,
        }))
    }

    // -- MERGE --------------------------------------------------------------

    fn parse_merge(&mut self, with: Option<WithClause>) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Merge)?;
        self.expect_keyword(Keyword::Into)?;
        let relation = self.parse_update_or_delete_target()?;
        self.expect_keyword(Keyword::Using)?;
        let using = self.parse_from_element_impl()?;
        self.expect_keyword(Keyword::On)?;
        let on = self.parse_expr()?;
        let mut when_clauses = Vec::new();
        while self.at_keyword(Keyword::When) {
            when_clauses.push(self.parse_merge_when()?);
        }
        if when_clauses.is_empty() {
            return Err(self.unexpected("WHEN"));
        }
        let returning = self.parse_returning()?;
        Ok(Statement::Merge(Merge {
            with,
            relation,
            using: Box::new(using),
            on,
            when_clauses,
            returning,
        }))
    }

    fn parse_merge_when(&mut self) -> Result<MergeWhenClause, ParseError> {
        self.expect_keyword(Keyword::When)?;
        let matched = if self.eat_keyword(Keyword::Not) {
            self.expect_keyword(Keyword::Matched)?;
            false
        } else {
            self.expect_keyword(Keyword::Matched)?;
            true
        };
        let condition = if self.eat_keyword(Keyword::And) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect_keyword(Keyword::Then)?;

        let position = self.position();
        let action = if self.eat_keyword(Keyword::Do) {
            self.expect_keyword(Keyword::Nothing)?;
            MergeAction::Nothing
        } else if self.eat_keyword(Keyword::Update) {
            self.expect_keyword(Keyword::Set)?;
            MergeAction::Update {
                set: self.parse_set_clause_list()?,
            }
        } else if self.eat_keyword(Keyword::Delete) {
            MergeAction::Delete
        } else {
            self.expect_keyword(Keyword::Insert)?;
            let mut columns = Vec::new();
            if self.at_special('(') {
                self.advance();
                columns.push(self.parse_set_target()?);
                while self.eat_special(',') {
                    columns.push(self.parse_set_target()?);
                }
                self.expect_special(')')?;
            }
            let overriding = if self.eat_keyword(Keyword::Overriding) {
                let kind = if self.eat_keyword(Keyword::System) {
                    OverridingKind::System
                } else {
                    self.expect_keyword(Keyword::User)?;
                    OverridingKind::User
                };
                self.expect_keyword(Keyword::Value)?;
                Some(kind)
            } else {
                None
            };
            let values = if self.at_keyword(Keyword::Default)
                && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Values))
            {
                self.advance();
                self.advance();
                None
            } else {
                self.expect_keyword(Keyword::Values)?;
                self.expect_special('(')?;
                let mut values = vec![self.parse_expr_or_default()?];
                while self.eat_special(',') {
                    values.push(self.parse_expr_or_default()?);
                }
                self.expect_special(')')?;
                Some(values)
            };
            MergeAction::Insert {
                columns,
                overriding,
                values,
            }
        };

        match (&action, matched) {
            (MergeAction::Update { .. } | MergeAction::Delete, false) => {
                Err(ParseError::syntax(
                    "UPDATE and DELETE actions require WHEN MATCHED",
                    position,
                ))
            }
            (MergeAction::Insert { .. }, true) => Err(ParseError::syntax(
                "INSERT action requires WHEN NOT MATCHED",
                position,
            )),
            _ => Ok(MergeWhenClause {
                matched,
                condition,
                action,
            }),
        }
    }

    // -- type names ---------------------------------------------------------

    /// An identifier usable inside a type name.
    fn parse_type_ident(&mut self) -> Result<Identifier, ParseError> {
        match self.peek().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok(Identifier::new(name))
            }
            TokenKind::Keyword(kw)
                if kw.usable_as_column_name() || kw.usable_as_function_name() =>
            {
                self.advance();
                Ok(Identifier::new(kw.as_str()))
            }
            other => Err(ParseError::syntax(
                format!("expected a type name, got {}", other.describe()),
                self.position(),
            )),
        }
    }

    #[allow(clippy::too_many_lines)]
    pub(crate) fn parse_type_name(&mut self) -> Result<TypeName, ParseError> {
        let setof = self.eat_keyword(Keyword::Setof);

        let mut modifiers: Vec<Expr> = Vec::new();
        let mut modifiers_done = false;

        let name = match self.peek().clone() {
            TokenKind::Keyword(Keyword::Double)
                if matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Precision)) =>
            {
                self.advance();
                self.advance();
                QualifiedName::bare("float8")
            }
            TokenKind::Keyword(Keyword::Int | Keyword::Integer) => {
                self.advance();
                QualifiedName::bare("int4")
            }
            TokenKind::Keyword(Keyword::Smallint) => {
                self.advance();
                QualifiedName::bare("int2")
            }
            TokenKind::Keyword(Keyword::Bigint) => {
                self.advance();
                QualifiedName::bare("int8")
            }
            TokenKind::Keyword(Keyword::Real) => {
                self.advance();
                QualifiedName::bare("float4")
            }
            TokenKind::Keyword(Keyword::Boolean) => {
                self.advance();
                QualifiedName::bare("bool")
            }
            TokenKind::Keyword(Keyword::Float) => {
                self.advance();
                let mut precision = 53i64;
                if self.eat_special('(') {
                    let position = self.position();
                    match self.advance().kind {
                        TokenKind::Integer(value) => {
                            precision = value.parse().unwrap_or(53);
                        }
                        other => {
                            return Err(ParseError::syntax(
                                format!("expected an integer, got {}", other.describe()),
                                position,
                            ));
                        }
                    }
                    self.expect_special(')')?;
                }
                modifiers_done = true;
                if precision <= 24 {
                    QualifiedName::bare("float4")
                } else {
                    QualifiedName::bare("float8")
                }
            }
            TokenKind::Keyword(Keyword::Decimal | Keyword::Numeric) => {
                self.advance();
                QualifiedName::bare("numeric")
            }
            TokenKind::Keyword(Keyword::Varchar) => {
                self.advance();
                QualifiedName::bare("varchar")
            }
            TokenKind::Keyword(Keyword::Char | Keyword::Character) => {
                self.advance();
                if self.eat_keyword(Keyword::Varying) {
                    QualifiedName::bare("varchar")
                } else {
                    QualifiedName::bare("bpchar")
                }
            }
            TokenKind::Keyword(Keyword::Bit) => {
                self.advance();
                if self.eat_keyword(Keyword::Varying) {
                    QualifiedName::bare("varbit")
                } else {
                    QualifiedName::bare("bit")
                }
            }
            TokenKind::Keyword(kw @ (Keyword::Time | Keyword::Timestamp)) => {
                self.advance();
                if self.eat_special('(') {
                    modifiers.push(self.parse_expr()?);
                    self.expect_special(')')?;
                }
                modifiers_done = true;
                let with_tz = if self.at_keyword(Keyword::With)
                    && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Time))
                {
                    self.advance();
                    self.advance();
                    self.expect_keyword(Keyword::Zone)?;
                    true
                } else if self.at_keyword(Keyword::Without)
                    && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Time))
                {
                    self.advance();
                    self.advance();
                    self.expect_keyword(Keyword::Zone)?;
                    false
                } else {
                    false
                };
                QualifiedName::bare(match (kw, with_tz) {
                    (Keyword::Time, true) => "timetz",
                    (Keyword::Time, false) => "time",
                    (_, true) => "timestamptz",
                    (_, false) => "timestamp",
                })
            }
            TokenKind::Keyword(Keyword::Interval) => {
                self.advance();
                QualifiedName::bare("interval")
            }
            _ => {
                let mut parts = vec![self.parse_type_ident()?];
                while self.at_special('.') {
                    self.advance();
                    parts.push(self.parse_col_label()?);
                }
                QualifiedName { parts }
            }
        };

        if !modifiers_done && self.at_special('(') {
            self.advance();
            modifiers.push(self.parse_expr()?);
            while self.eat_special(',') {
                modifiers.push(self.parse_expr()?);
            }
            self.expect_special(')')?;
        }

        let mut array_bounds = Vec::new();
        if self.eat_keyword(Keyword::Array) {
            if self.eat_special('[') {
                array_bounds.push(self.parse_array_bound()?);
            } else {
                array_bounds.push(None);
            }
        }
        while self.at_special('[') {
            self.advance();
            array_bounds.push(self.parse_array_bound_inner()?);
        }

        Ok(TypeName {
            setof,
            name,
            modifiers,
            array_bounds,
        })
    }

    fn parse_array_bound(&mut self) -> Result<Option<String>, ParseError> {
        // `[` already consumed by the caller.
        self.parse_array_bound_inner()
    }

    fn parse_array_bound_inner(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_special(']') {
            return Ok(None);
        }
        let position = self.position();
        let bound = match self.advance().kind {
            TokenKind::Integer(value) => value,
            other => {
                return Err(ParseError::syntax(
                    format!("expected an array bound, got {}", other.describe()),
                    position,
                ));
            }
        };
        self.expect_special(']')?;
        Ok(Some(bound))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_statement;
    use pgraft_ast::{Parameter, PatternOp};

    fn parse(sql: &str) -> Statement {
        parse_statement(sql).unwrap_or_else(|e| panic!("parse failed for {sql:?}: {e}"))
    }

    fn select_core(stmt: &Statement) -> &SelectCore {
        let Statement::Select(query) = stmt else {
            panic!("expected a select");
        };
        let QueryBody::Select(core) = &query.body else {
            panic!("expected a plain select body");
        };
        core
    }

    #[test]
    fn test_simple_select() {
        let stmt = parse("SELECT id, name AS n FROM users WHERE id = $1");
        let core = select_core(&stmt);
        assert_eq!(core.target_list.len(), 2);
        assert!(matches!(
            core.from.as_slice(),
            [FromElement::Relation { .. }]
        ));
        assert!(core.where_clause.is_some());
    }

    #[test]
    fn test_select_into_not_implemented() {
        let err = parse_statement("select 1 into t").unwrap_err();
        assert!(matches!(err, ParseError::NotImplemented { .. }));
    }

    #[test]
    fn test_where_current_of_not_implemented() {
        let err = parse_statement("delete from t where current of cur").unwrap_err();
        assert!(matches!(err, ParseError::NotImplemented { .. }));
        let err = parse_statement("update t set x = 1 where current of cur").unwrap_err();
        assert!(matches!(err, ParseError::NotImplemented { .. }));
    }

    #[test]
    fn test_set_op_precedence_tree() {
        // INTERSECT binds tighter than UNION.
        let stmt = parse("select 1 union select 2 intersect select 3");
        let Statement::Select(query) = &stmt else {
            panic!("expected select");
        };
        let QueryBody::SetOp(op) = &query.body else {
            panic!("expected set op");
        };
        assert_eq!(op.operator, SetOperator::Union);
        assert!(matches!(op.right.body, QueryBody::SetOp(_)));
    }

    #[test]
    fn test_join_chain_left_associative() {
        let stmt = parse("select * from a join b on a.x = b.x left join c using (y)");
        let core = select_core(&stmt);
        let [FromElement::Join { join, .. }] = core.from.as_slice() else {
            panic!("expected join");
        };
        assert_eq!(join.kind, JoinKind::Left);
        assert!(matches!(join.left, FromElement::Join { .. }));
        assert!(join.using.is_some());
    }

    #[test]
    fn test_cross_join_rejects_constraints() {
        assert!(parse_statement("select * from a cross join b on a.x = b.x").is_err());
        assert!(parse_statement("select * from a natural cross join b").is_err());
    }

    #[test]
    fn test_join_requires_condition() {
        let err = parse_statement("select * from a join b").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_window_frame_validation_positions() {
        let err = parse_statement(
            "select count(*) over (order by x rows between unbounded following and current row) from t",
        )
        .unwrap_err();
        let ParseError::Syntax { message, .. } = err else {
            panic!("expected syntax error");
        };
        assert!(message.contains("UNBOUNDED FOLLOWING"));
    }

    #[test]
    fn test_named_window_reference() {
        let stmt = parse("select sum(x) over w from t window w as (partition by y)");
        let core = select_core(&stmt);
        assert_eq!(core.window.len(), 1);
        assert_eq!(
            core.window[0].name,
            Some(Identifier::new("w"))
        );
    }

    #[test]
    fn test_insert_on_conflict() {
        let stmt = parse(
            "insert into t as x (a, b) values (1, default) \
             on conflict (a) do update set b = excluded.b where t.a > 0 \
             returning a",
        );
        let Statement::Insert(insert) = &stmt else {
            panic!("expected insert");
        };
        assert_eq!(insert.relation.alias, Some(Identifier::new("x")));
        assert_eq!(insert.columns.len(), 2);
        let Some(OnConflictClause {
            target: Some(ConflictTarget::IndexParameters { elements, .. }),
            action: ConflictAction::DoUpdate { where_clause, .. },
        }) = &insert.on_conflict
        else {
            panic!("expected do-update conflict clause");
        };
        assert_eq!(elements.len(), 1);
        assert!(where_clause.is_some());
        assert_eq!(insert.returning.len(), 1);
    }

    #[test]
    fn test_insert_default_values() {
        let stmt = parse("insert into t default values");
        let Statement::Insert(insert) = &stmt else {
            panic!("expected insert");
        };
        assert!(insert.values.is_none());
    }

    #[test]
    fn test_update_multiple_set() {
        let stmt = parse("update t set (a, b) = (1, 2), c = default where a < 5");
        let Statement::Update(update) = &stmt else {
            panic!("expected update");
        };
        assert_eq!(update.set.len(), 2);
        assert!(matches!(
            update.set[0],
            SetClause::Multiple {
                value: MultipleSetSource::Row(_),
                ..
            }
        ));
        assert!(matches!(
            update.set[1],
            SetClause::Single {
                value: Expr::SetToDefault,
                ..
            }
        ));
    }

    #[test]
    fn test_delete_using() {
        let stmt = parse("delete from only t as x using u where t.a = u.a returning *");
        let Statement::Delete(delete) = &stmt else {
            panic!("expected delete");
        };
        assert!(delete.relation.only);
        assert_eq!(delete.using.len(), 1);
        assert!(matches!(delete.returning.as_slice(), [TargetElement::Star]));
    }

    #[test]
    fn test_merge_when_clauses() {
        let stmt = parse(
            "merge into t using s on t.id = s.id \
             when matched and s.flag then update set v = s.v \
             when matched then delete \
             when not matched and s.v > 0 then insert (id, v) values (s.id, s.v) \
             when not matched then do nothing",
        );
        let Statement::Merge(merge) = &stmt else {
            panic!("expected merge");
        };
        assert_eq!(merge.when_clauses.len(), 4);
        assert!(matches!(merge.when_clauses[0].action, MergeAction::Update { .. }));
        assert!(matches!(merge.when_clauses[1].action, MergeAction::Delete));
        assert!(matches!(merge.when_clauses[2].action, MergeAction::Insert { .. }));
        assert!(matches!(merge.when_clauses[3].action, MergeAction::Nothing));
    }

    #[test]
    fn test_merge_action_match_validation() {
        let err = parse_statement(
            "merge into t using s on true when not matched then delete",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
        let err = parse_statement(
            "merge into t using s on true when matched then insert values (1)",
        )
        .unwrap_err();
        assert!(matches!(err, ParseError::Syntax { .. }));
    }

    #[test]
    fn test_with_recursive_cte() {
        let stmt = parse(
            "with recursive r (n) as (select 1 union all select n + 1 from r where n < 10) \
             select n from r",
        );
        let Statement::Select(query) = &stmt else {
            panic!("expected select");
        };
        let with = query.with.as_ref().expect("with clause");
        assert!(with.recursive);
        assert_eq!(with.ctes[0].name, Identifier::new("r"));
        assert_eq!(with.ctes[0].columns.len(), 1);
    }

    #[test]
    fn test_cte_materialization_hints() {
        let stmt = parse(
            "with a as materialized (select 1), b as not materialized (select 2) select * from a, b",
        );
        let Statement::Select(query) = &stmt else {
            panic!("expected select");
        };
        let with = query.with.as_ref().expect("with clause");
        assert_eq!(with.ctes[0].materialized, Some(true));
        assert_eq!(with.ctes[1].materialized, Some(false));
    }

    #[test]
    fn test_dml_cte() {
        let stmt = parse(
            "with moved as (delete from src returning id) insert into dst select id from moved",
        );
        let Statement::Insert(insert) = &stmt else {
            panic!("expected insert");
        };
        let with = insert.with.as_ref().expect("with clause");
        assert!(matches!(*with.ctes[0].statement, Statement::Delete(_)));
    }

    #[test]
    fn test_fetch_first_with_ties() {
        let stmt = parse("select * from t order by x fetch first 3 rows with ties");
        let Statement::Select(query) = &stmt else {
            panic!("expected select");
        };
        let limit = query.limit.as_ref().expect("limit clause");
        assert!(limit.with_ties);
        assert_eq!(limit.limit, Some(Expr::Numeric("3".to_owned())));
    }

    #[test]
    fn test_locking_clause() {
        let stmt = parse("select * from t for no key update of t nowait for key share skip locked");
        let Statement::Select(query) = &stmt else {
            panic!("expected select");
        };
        assert_eq!(query.locking.len(), 2);
        assert_eq!(query.locking[0].strength, LockingStrength::NoKeyUpdate);
        assert_eq!(query.locking[0].wait, Some(LockingWait::NoWait));
        assert_eq!(query.locking[1].strength, LockingStrength::KeyShare);
        assert_eq!(query.locking[1].wait, Some(LockingWait::SkipLocked));
    }

    #[test]
    fn test_lateral_and_ordinality() {
        let stmt = parse(
            "select * from users u, lateral unnest(u.tags) with ordinality as t (tag, n)",
        );
        let core = select_core(&stmt);
        let FromElement::Function {
            lateral,
            with_ordinality,
            alias,
            ..
        } = &core.from[1]
        else {
            panic!("expected function from-item");
        };
        assert!(*lateral);
        assert!(*with_ordinality);
        assert_eq!(alias.as_ref().unwrap().columns.len(), 2);
    }

    #[test]
    fn test_function_column_definitions() {
        let stmt = parse(
            "select * from json_to_record('{}') as x (a int4, b text)",
        );
        let core = select_core(&stmt);
        let FromElement::Function {
            column_definitions, ..
        } = &core.from[0]
        else {
            panic!("expected function from-item");
        };
        assert_eq!(column_definitions.len(), 2);
    }

    #[test]
    fn test_tablesample() {
        let stmt = parse("select * from big tablesample bernoulli (10) repeatable (7)");
        let core = select_core(&stmt);
        assert!(matches!(
            core.from.as_slice(),
            [FromElement::TableSample { .. }]
        ));
    }

    #[test]
    fn test_rows_from() {
        let stmt = parse(
            "select * from rows from (generate_series(1, 3), jsonb_array_elements('[]') as (v jsonb)) with ordinality",
        );
        let core = select_core(&stmt);
        let [FromElement::RowsFrom {
            functions,
            with_ordinality,
            ..
        }] = core.from.as_slice()
        else {
            panic!("expected ROWS FROM");
        };
        assert_eq!(functions.len(), 2);
        assert!(*with_ordinality);
        assert_eq!(functions[1].column_definitions.len(), 1);
    }

    #[test]
    fn test_type_name_normalization() {
        let t = crate::parse_type_name("double precision").unwrap();
        assert_eq!(t.name, QualifiedName::bare("float8"));
        let t = crate::parse_type_name("character varying(40)").unwrap();
        assert_eq!(t.name, QualifiedName::bare("varchar"));
        assert_eq!(t.modifiers.len(), 1);
        let t = crate::parse_type_name("timestamp (3) with time zone").unwrap();
        assert_eq!(t.name, QualifiedName::bare("timestamptz"));
        let t = crate::parse_type_name("int4 array").unwrap();
        assert_eq!(t.array_bounds.len(), 1);
        let t = crate::parse_type_name("text[3][]").unwrap();
        assert_eq!(
            t.array_bounds,
            vec![Some("3".to_owned()), None]
        );
    }

    #[test]
    fn test_pattern_and_parameters() {
        let stmt = parse("select * from t where name not ilike :pat escape :esc");
        let core = select_core(&stmt);
        let Some(Expr::PatternMatch { op, not, escape, .. }) = &core.where_clause else {
            panic!("expected pattern match");
        };
        assert_eq!(*op, PatternOp::ILike);
        assert!(*not);
        assert!(matches!(
            escape.as_deref(),
            Some(Expr::Parameter(Parameter::Named(_)))
        ));
    }

    #[test]
    fn test_distinct_on() {
        let stmt = parse("select distinct on (a, b) a, b, c from t");
        let core = select_core(&stmt);
        let Some(DistinctClause::On(exprs)) = &core.distinct else {
            panic!("expected DISTINCT ON");
        };
        assert_eq!(exprs.len(), 2);
    }
}
