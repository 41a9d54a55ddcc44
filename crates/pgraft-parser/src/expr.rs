//! Scalar expression parsing.
//!
//! Precedence climbing over the layered operator grammar. The two
//! [`PrecedenceRegime`](crate::PrecedenceRegime)s share every layer; they
//! differ only in where the comparison operators and the IS-family bind:
//!
//! * `Current` (9.5+): all of `= < > <= >= <> !=` sit on one level just
//!   above IS; `=` chains right-associatively with itself, mixing distinct
//!   comparison operators on that level is an error.
//! * `Pre95`: `=` has its own right-associative level, `<`/`>` are
//!   non-associative above it, `<= >= <> !=` are ordinary left-associative
//!   operators, and the IS-family binds between those and `+`/`-`.

use pgraft_ast::{
    ArrayComparisonArg, BetweenKind, CaseExpression, ColumnReference, Expr, FunctionArgument,
    FunctionArguments, FunctionCall, Identifier, InRhs, IndirectionItem, IsPredicate,
    JsonArgument, JsonArrayContent, JsonBehaviour, JsonFormat, JsonFormattedValue, JsonItemKind,
    JsonKeyValue, JsonQuotes, JsonReturning, JsonWrapper, KeywordConstant, MinMaxKind,
    NormalForm, Operator, OperatorExpression, Parameter, PatternOp, QualifiedName,
    QualifiedOperator, SqlOperator, SqlValueFunction, SqlValueFunctionName, StringKind,
    SubLinkKind, TrimSide, TypeName, WhenClause, XmlAttribute, XmlOption, XmlStandalone,
};

use crate::parser::{Parser, PrecedenceRegime};
use crate::token::{Keyword, TokenKind};
use crate::ParseError;

impl Parser {
    /// Parse a full scalar expression (`a_expr`).
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    /// Parse an expression, allowing the `DEFAULT` placeholder.
    pub(crate) fn parse_expr_or_default(&mut self) -> Result<Expr, ParseError> {
        if self.eat_keyword(Keyword::Default) {
            return Ok(Expr::SetToDefault);
        }
        self.parse_expr()
    }

    // ── logical layers ──────────────────────────────────────────────────

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat_keyword(Keyword::Or) {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_not()?;
        while self.eat_keyword(Keyword::And) {
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ParseError> {
        if self.at_keyword(Keyword::Not) {
            // NOT EXISTS folds into the subselect node so that programmatic
            // trees with `not: true` round-trip unchanged.
            if matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Exists)) {
                self.advance();
                self.advance();
                let query = self.parse_parenthesized_query()?;
                return Ok(Expr::Exists {
                    query: Box::new(query),
                    not: true,
                });
            }
            self.advance();
            let inner = self.parse_not()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        match self.regime() {
            PrecedenceRegime::Current => self.parse_is_current(),
            PrecedenceRegime::Pre95 => self.parse_eq_pre95(),
        }
    }

    fn regime(&self) -> PrecedenceRegime {
        self.options.precedence
    }

    // ── IS family ───────────────────────────────────────────────────────

    fn parse_is_current(&mut self) -> Result<Expr, ParseError> {
        let mut arg = self.parse_comparison_current()?;
        while self.at_is_suffix() {
            arg = self.parse_is_suffix(arg, Self::parse_comparison_current)?;
        }
        Ok(arg)
    }

    fn parse_is_pre95(&mut self) -> Result<Expr, ParseError> {
        let mut arg = self.parse_add()?;
        while self.at_is_suffix() {
            arg = self.parse_is_suffix(arg, Self::parse_add)?;
        }
        Ok(arg)
    }

    fn at_is_suffix(&self) -> bool {
        matches!(
            self.peek(),
            TokenKind::Keyword(Keyword::Is | Keyword::Isnull | Keyword::Notnull)
        )
    }

    /// Consume one `IS ...` / `ISNULL` / `NOTNULL` suffix.
    ///
    /// `rhs` parses the right operand of `IS [NOT] DISTINCT FROM`, which
    /// binds at the regime's next-tighter level.
    fn parse_is_suffix(
        &mut self,
        arg: Expr,
        rhs: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        if self.eat_keyword(Keyword::Isnull) {
            return Ok(Expr::Is {
                arg: Box::new(arg),
                predicate: IsPredicate::Null,
                not: false,
            });
        }
        if self.eat_keyword(Keyword::Notnull) {
            return Ok(Expr::Is {
                arg: Box::new(arg),
                predicate: IsPredicate::Null,
                not: true,
            });
        }
        let position = self.position();
        self.advance();
        let not = self.eat_keyword(Keyword::Not);

        let simple_predicate = match self.peek() {
            TokenKind::Keyword(Keyword::Null) => Some(IsPredicate::Null),
            TokenKind::Keyword(Keyword::True) => Some(IsPredicate::True),
            TokenKind::Keyword(Keyword::False) => Some(IsPredicate::False),
            TokenKind::Keyword(Keyword::Unknown) => Some(IsPredicate::Unknown),
            TokenKind::Keyword(Keyword::Document) => Some(IsPredicate::Document),
            _ => None,
        };
        if let Some(predicate) = simple_predicate {
            self.advance();
            return Ok(Expr::Is {
                arg: Box::new(arg),
                predicate,
                not,
            });
        }
        match self.peek().clone() {
            TokenKind::Keyword(Keyword::Distinct) => {
                self.advance();
                self.expect_keyword(Keyword::From)?;
                let right = rhs(self)?;
                Ok(Expr::IsDistinctFrom {
                    left: Box::new(arg),
                    right: Box::new(right),
                    not,
                })
            }
            TokenKind::Keyword(Keyword::Of) => {
                self.advance();
                self.expect_special('(')?;
                let mut types = vec![self.parse_type_name()?];
                while self.eat_special(',') {
                    types.push(self.parse_type_name()?);
                }
                self.expect_special(')')?;
                Ok(Expr::IsOf {
                    arg: Box::new(arg),
                    types,
                    not,
                })
            }
            TokenKind::Keyword(Keyword::Json) => {
                self.advance();
                let item_kind = if self.eat_keyword(Keyword::Value) {
                    Some(JsonItemKind::Value)
                } else if self.eat_keyword(Keyword::Array) {
                    Some(JsonItemKind::Array)
                } else if self.eat_keyword(Keyword::Object) {
                    Some(JsonItemKind::Object)
                } else if self.eat_keyword(Keyword::Scalar) {
                    Some(JsonItemKind::Scalar)
                } else {
                    None
                };
                let unique_keys = self.parse_json_unique_clause();
                Ok(Expr::IsJson {
                    arg: Box::new(arg),
                    item_kind,
                    unique_keys,
                    not,
                })
            }
            TokenKind::Keyword(Keyword::Normalized) => {
                self.advance();
                Ok(Expr::IsNormalized {
                    arg: Box::new(arg),
                    form: None,
                    not,
                })
            }
            TokenKind::Keyword(
                kw @ (Keyword::Nfc | Keyword::Nfd | Keyword::Nfkc | Keyword::Nfkd),
            ) => {
                self.advance();
                self.expect_keyword(Keyword::Normalized)?;
                Ok(Expr::IsNormalized {
                    arg: Box::new(arg),
                    form: Some(normal_form(kw)),
                    not,
                })
            }
            other => Err(ParseError::syntax(
                format!("unexpected {} after IS", other.describe()),
                position,
            )),
        }
    }

    // ── comparison layers ───────────────────────────────────────────────

    /// The comparison operator at the cursor, if any.
    fn peek_comparison_op(&self) -> Option<String> {
        match self.peek() {
            TokenKind::Special(c @ ('<' | '>' | '=')) => Some(c.to_string()),
            TokenKind::Inequality(op) if self.regime() == PrecedenceRegime::Current => {
                Some(op.clone())
            }
            _ => None,
        }
    }

    fn parse_comparison_current(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_pattern()?;
        let Some(op) = self.peek_comparison_op() else {
            return Ok(left);
        };
        let position = self.position();
        self.advance();
        let right = if op == "=" {
            // `=` chains right-associatively with itself.
            self.parse_operator_rhs(Self::parse_comparison_current)?
        } else {
            self.parse_operator_rhs(Self::parse_pattern)?
        };
        let expr = Expr::Operator(OperatorExpression {
            operator: Operator::Plain(SqlOperator::new(op).map_err(|_| {
                ParseError::syntax("invalid operator", position)
            })?),
            left: Some(Box::new(left)),
            right: Box::new(right),
        });
        if self.peek_comparison_op().is_some() {
            return Err(ParseError::syntax(
                "comparison operators cannot be chained",
                self.position(),
            ));
        }
        Ok(expr)
    }

    fn parse_eq_pre95(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_ltgt_pre95()?;
        if !self.at_special('=') {
            return Ok(left);
        }
        self.advance();
        // Right-associative in the pre-9.5 grammar.
        let right = self.parse_operator_rhs(Self::parse_eq_pre95)?;
        Ok(Expr::Operator(OperatorExpression {
            operator: Operator::Plain(SqlOperator::new("=").expect("valid operator")),
            left: Some(Box::new(left)),
            right: Box::new(right),
        }))
    }

    fn parse_ltgt_pre95(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_pattern()?;
        let op = match self.peek() {
            TokenKind::Special(c @ ('<' | '>')) => c.to_string(),
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_operator_rhs(Self::parse_pattern)?;
        let expr = Expr::Operator(OperatorExpression {
            operator: Operator::Plain(SqlOperator::new(op).expect("valid operator")),
            left: Some(Box::new(left)),
            right: Box::new(right),
        });
        if matches!(self.peek(), TokenKind::Special('<' | '>')) {
            return Err(ParseError::syntax(
                "comparison operators cannot be chained",
                self.position(),
            ));
        }
        Ok(expr)
    }

    /// Parse the right operand of a binary operator, allowing the
    /// `ANY/SOME/ALL (...)` quantified forms.
    fn parse_operator_rhs(
        &mut self,
        fallback: fn(&mut Self) -> Result<Expr, ParseError>,
    ) -> Result<Expr, ParseError> {
        let kind = match self.peek() {
            TokenKind::Keyword(Keyword::Any | Keyword::Some) => SubLinkKind::Any,
            TokenKind::Keyword(Keyword::All) => SubLinkKind::All,
            _ => return fallback(self),
        };
        if !matches!(self.peek_at(1), TokenKind::Special('(')) {
            return fallback(self);
        }
        self.advance();
        self.expect_special('(')?;
        let argument = if self.at_query_start() {
            let query = self.parse_query_full()?;
            ArrayComparisonArg::Subselect(Box::new(query))
        } else {
            ArrayComparisonArg::Array(Box::new(self.parse_expr()?))
        };
        self.expect_special(')')?;
        Ok(Expr::ArrayComparison { kind, argument })
    }

    // ── pattern / overlaps / between / in ───────────────────────────────

    fn parse_pattern(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_overlaps()?;
        let not = self.at_keyword(Keyword::Not)
            && matches!(
                self.peek_at(1),
                TokenKind::Keyword(Keyword::Like | Keyword::Ilike | Keyword::Similar)
            );
        if not {
            self.advance();
        }
        let op = match self.peek() {
            TokenKind::Keyword(Keyword::Like) => PatternOp::Like,
            TokenKind::Keyword(Keyword::Ilike) => PatternOp::ILike,
            TokenKind::Keyword(Keyword::Similar) => PatternOp::SimilarTo,
            _ if not => {
                return Err(self.unexpected("LIKE, ILIKE or SIMILAR TO"));
            }
            _ => return Ok(left),
        };
        self.advance();
        if op == PatternOp::SimilarTo {
            self.expect_keyword(Keyword::To)?;
        }
        let pattern = self.parse_overlaps()?;
        let escape = if self.eat_keyword(Keyword::Escape) {
            Some(Box::new(self.parse_overlaps()?))
        } else {
            None
        };
        Ok(Expr::PatternMatch {
            arg: Box::new(left),
            pattern: Box::new(pattern),
            escape,
            op,
            not,
        })
    }

    fn parse_overlaps(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_between()?;
        if !self.at_keyword(Keyword::Overlaps) {
            return Ok(left);
        }
        let position = self.position();
        self.advance();
        let right = self.parse_between()?;
        let unpack = |expr: Expr, side: &str| -> Result<(Box<Expr>, Box<Expr>), ParseError> {
            match expr {
                Expr::Row { mut elements, .. } if elements.len() == 2 => {
                    let second = elements.pop().expect("two elements");
                    let first = elements.pop().expect("two elements");
                    Ok((Box::new(first), Box::new(second)))
                }
                _ => Err(ParseError::syntax(
                    format!("wrong number of parameters on {side} side of OVERLAPS expression"),
                    position,
                )),
            }
        };
        let left = unpack(left, "left")?;
        let right = unpack(right, "right")?;
        Ok(Expr::Overlaps { left, right })
    }

    fn parse_between(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_in()?;
        let not = self.at_keyword(Keyword::Not)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Between));
        if not {
            self.advance();
        }
        if !self.eat_keyword(Keyword::Between) {
            if not {
                return Err(self.unexpected("BETWEEN"));
            }
            return Ok(left);
        }
        let kind = if self.eat_keyword(Keyword::Symmetric) {
            BetweenKind::Symmetric
        } else if self.eat_keyword(Keyword::Asymmetric) {
            BetweenKind::Asymmetric
        } else {
            BetweenKind::Plain
        };
        let low = self.parse_in()?;
        self.expect_keyword(Keyword::And)?;
        let high = self.parse_in()?;
        Ok(Expr::Between {
            arg: Box::new(left),
            low: Box::new(low),
            high: Box::new(high),
            kind,
            not,
        })
    }

    fn parse_in(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_generic_op()?;
        let not = self.at_keyword(Keyword::Not)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::In));
        if not {
            self.advance();
        }
        if !self.eat_keyword(Keyword::In) {
            if not {
                return Err(self.unexpected("IN"));
            }
            return Ok(left);
        }
        self.expect_special('(')?;
        let rhs = if self.at_query_start() {
            InRhs::Subselect(Box::new(self.parse_query_full()?))
        } else {
            let mut items = vec![self.parse_expr()?];
            while self.eat_special(',') {
                items.push(self.parse_expr()?);
            }
            InRhs::List(items)
        };
        self.expect_special(')')?;
        Ok(Expr::In {
            arg: Box::new(left),
            rhs,
            not,
        })
    }

    // ── generic operators and arithmetic ────────────────────────────────

    /// Consume a generic operator at the cursor: an operator token, a
    /// qualified `OPERATOR(...)` form, or (pre-9.5 only) an inequality.
    fn try_generic_operator(&mut self) -> Result<Option<Operator>, ParseError> {
        match self.peek().clone() {
            TokenKind::Operator(glyphs) => {
                let position = self.position();
                self.advance();
                let operator = SqlOperator::new(glyphs)
                    .map_err(|_| ParseError::syntax("invalid operator", position))?;
                Ok(Some(Operator::Plain(operator)))
            }
            TokenKind::Inequality(glyphs) if self.regime() == PrecedenceRegime::Pre95 => {
                self.advance();
                Ok(Some(Operator::Plain(
                    SqlOperator::new(glyphs).expect("valid operator"),
                )))
            }
            TokenKind::Keyword(Keyword::Operator)
                if matches!(self.peek_at(1), TokenKind::Special('(')) =>
            {
                self.advance();
                self.expect_special('(')?;
                let mut schema = Vec::new();
                loop {
                    match self.peek().clone() {
                        TokenKind::Identifier(name) => {
                            self.advance();
                            self.expect_special('.')?;
                            schema.push(Identifier::new(name));
                        }
                        TokenKind::Keyword(kw) if kw.usable_as_column_name() => {
                            self.advance();
                            self.expect_special('.')?;
                            schema.push(Identifier::new(kw.as_str()));
                        }
                        _ => break,
                    }
                }
                let position = self.position();
                let glyphs = match self.advance().kind {
                    TokenKind::Operator(glyphs) | TokenKind::Inequality(glyphs) => glyphs,
                    TokenKind::Special(c) if pgraft_ast::CHARS_OPERATOR.contains(c) => {
                        c.to_string()
                    }
                    other => {
                        return Err(ParseError::syntax(
                            format!("expected an operator, got {}", other.describe()),
                            position,
                        ));
                    }
                };
                self.expect_special(')')?;
                let operator = SqlOperator::new(glyphs)
                    .map_err(|_| ParseError::syntax("invalid operator", position))?;
                Ok(Some(Operator::Qualified(QualifiedOperator {
                    schema,
                    operator,
                })))
            }
            _ => Ok(None),
        }
    }

    fn parse_generic_operand(&mut self) -> Result<Expr, ParseError> {
        match self.regime() {
            PrecedenceRegime::Current => self.parse_add(),
            PrecedenceRegime::Pre95 => self.parse_is_pre95(),
        }
    }

    fn parse_generic_op(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_generic_operand()?;
        while let Some(operator) = self.try_generic_operator()? {
            let right = self.parse_operator_rhs(Self::parse_generic_operand)?;
            left = Expr::Operator(OperatorExpression {
                operator,
                left: Some(Box::new(left)),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_add(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek() {
                TokenKind::Special('+') => "+",
                TokenKind::Special('-') => "-",
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            left = Expr::Operator(OperatorExpression {
                operator: Operator::Plain(SqlOperator::new(op).expect("valid operator")),
                left: Some(Box::new(left)),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_mul(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_exp()?;
        loop {
            let op = match self.peek() {
                TokenKind::Special('*') => "*",
                TokenKind::Special('/') => "/",
                TokenKind::Special('%') => "%",
                _ => break,
            };
            self.advance();
            let right = self.parse_exp()?;
            left = Expr::Operator(OperatorExpression {
                operator: Operator::Plain(SqlOperator::new(op).expect("valid operator")),
                left: Some(Box::new(left)),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_exp(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_at_time_zone()?;
        while self.at_special('^') {
            self.advance();
            let right = self.parse_at_time_zone()?;
            left = Expr::Operator(OperatorExpression {
                operator: Operator::Plain(SqlOperator::new("^").expect("valid operator")),
                left: Some(Box::new(left)),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_at_time_zone(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_collate_level()?;
        while self.at_keyword(Keyword::At) {
            self.advance();
            if self.eat_keyword(Keyword::Local) {
                left = Expr::AtLocal(Box::new(left));
            } else {
                self.expect_keyword(Keyword::Time)?;
                self.expect_keyword(Keyword::Zone)?;
                let zone = self.parse_collate_level()?;
                left = Expr::AtTimeZone {
                    arg: Box::new(left),
                    zone: Box::new(zone),
                };
            }
        }
        Ok(left)
    }

    fn parse_collate_level(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while self.eat_keyword(Keyword::Collate) {
            let collation = self.parse_qualified_name()?;
            left = Expr::Collate {
                arg: Box::new(left),
                collation,
            };
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek() {
            TokenKind::Special('+') => "+",
            TokenKind::Special('-') => "-",
            _ => return self.parse_typecast_level(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Operator(OperatorExpression {
            operator: Operator::Plain(SqlOperator::new(op).expect("valid operator")),
            left: None,
            right: Box::new(operand),
        }))
    }

    fn parse_typecast_level(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_atom_with_indirection()?;
        while matches!(self.peek(), TokenKind::Typecast) {
            self.advance();
            let target = self.parse_type_name()?;
            left = Expr::Typecast {
                arg: Box::new(left),
                target,
            };
        }
        Ok(left)
    }

    // ── atoms and indirection ───────────────────────────────────────────

    fn parse_atom_with_indirection(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_atom()?;
        let mut items = Vec::new();
        loop {
            if self.at_special('[') {
                self.advance();
                items.push(self.parse_subscript()?);
            } else if self.at_special('.')
                && !matches!(self.peek_at(1), TokenKind::Special('.'))
            {
                // Field selection on a non-column atom; plain column chains
                // were already folded into the ColumnReference.
                if matches!(base, Expr::ColumnRef(_)) && items.is_empty() {
                    break;
                }
                self.advance();
                if self.eat_special('*') {
                    items.push(IndirectionItem::Star);
                    break;
                }
                let name = self.parse_col_label()?;
                items.push(IndirectionItem::Field(name));
            } else {
                break;
            }
        }
        if items.is_empty() {
            Ok(base)
        } else {
            Ok(Expr::Indirection {
                base: Box::new(base),
                items,
            })
        }
    }

    /// Parse the inside of `[...]`: a plain subscript or a slice.
    fn parse_subscript(&mut self) -> Result<IndirectionItem, ParseError> {
        if self.eat_special(':') {
            // `[:]` or `[:upper]`
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

    #[allow(clippy::too_many_lines)]
    fn parse_atom(&mut self) -> Result<Expr, ParseError> {
        match self.peek().clone() {
            TokenKind::Integer(value) | TokenKind::Float(value) => {
                self.advance();
                Ok(Expr::Numeric(value))
            }
            TokenKind::String(value) => {
                self.advance();
                Ok(Expr::StringLiteral {
                    value,
                    kind: StringKind::Character,
                })
            }
            TokenKind::BinaryString(value) => {
                self.advance();
                Ok(Expr::StringLiteral {
                    value,
                    kind: StringKind::Binary,
                })
            }
            TokenKind::HexString(value) => {
                self.advance();
                Ok(Expr::StringLiteral {
                    value,
                    kind: StringKind::Hex,
                })
            }
            TokenKind::NamedParam(name) => {
                self.advance();
                Ok(Expr::Parameter(Parameter::Named(name)))
            }
            TokenKind::PositionalParam(number) => {
                self.advance();
                Ok(Expr::Parameter(Parameter::Positional(number)))
            }
            // Prefix generic operator: `~ x`, `@ x`, ...
            TokenKind::Operator(_) => {
                let operator = self
                    .try_generic_operator()?
                    .expect("operator token present");
                let operand = self.parse_add()?;
                Ok(Expr::Operator(OperatorExpression {
                    operator,
                    left: None,
                    right: Box::new(operand),
                }))
            }
            TokenKind::Special('(') => self.parse_paren_atom(),
            TokenKind::Keyword(keyword) => self.parse_keyword_atom(keyword),
            TokenKind::Identifier(_) => self.parse_identifier_chain(),
            other => Err(ParseError::syntax(
                format!("unexpected {} in expression", other.describe()),
                self.position(),
            )),
        }
    }

    fn parse_paren_atom(&mut self) -> Result<Expr, ParseError> {
        self.expect_special('(')?;
        if self.at_query_start() {
            let query = self.parse_query_full()?;
            self.expect_special(')')?;
            return Ok(Expr::Subselect(Box::new(query)));
        }
        let first = self.parse_expr()?;
        if self.eat_special(',') {
            let mut elements = vec![first];
            loop {
                elements.push(self.parse_expr()?);
                if !self.eat_special(',') {
                    break;
                }
            }
            self.expect_special(')')?;
            return Ok(Expr::Row {
                elements,
                explicit: false,
            });
        }
        self.expect_special(')')?;
        Ok(first)
    }

    #[allow(clippy::too_many_lines)]
    fn parse_keyword_atom(&mut self, keyword: Keyword) -> Result<Expr, ParseError> {
        let followed_by_paren = matches!(self.peek_at(1), TokenKind::Special('('));
        match keyword {
            Keyword::Null => {
                self.advance();
                Ok(Expr::Keyword(KeywordConstant::Null))
            }
            Keyword::True => {
                self.advance();
                Ok(Expr::Keyword(KeywordConstant::True))
            }
            Keyword::False => {
                self.advance();
                Ok(Expr::Keyword(KeywordConstant::False))
            }
            Keyword::Default => Err(ParseError::syntax(
                "DEFAULT is not allowed in this context",
                self.position(),
            )),
            Keyword::Case => self.parse_case(),
            // Prefix qualified operator: `operator(schema.-) x`.
            Keyword::Operator if followed_by_paren => {
                let operator = self
                    .try_generic_operator()?
                    .expect("OPERATOR token present");
                let operand = self.parse_add()?;
                Ok(Expr::Operator(OperatorExpression {
                    operator,
                    left: None,
                    right: Box::new(operand),
                }))
            }
            Keyword::Exists => {
                self.advance();
                let query = self.parse_parenthesized_query()?;
                Ok(Expr::Exists {
                    query: Box::new(query),
                    not: false,
                })
            }
            Keyword::Cast => {
                self.advance();
                self.expect_special('(')?;
                let arg = self.parse_expr()?;
                self.expect_keyword(Keyword::As)?;
                let target = self.parse_type_name()?;
                self.expect_special(')')?;
                Ok(Expr::Typecast {
                    arg: Box::new(arg),
                    target,
                })
            }
            Keyword::Array => {
                self.advance();
                if self.at_special('(') {
                    let query = self.parse_parenthesized_query()?;
                    Ok(Expr::ArraySubselect(Box::new(query)))
                } else {
                    self.parse_array_literal()
                }
            }
            Keyword::Row if followed_by_paren => {
                self.advance();
                self.expect_special('(')?;
                let mut elements = Vec::new();
                if !self.at_special(')') {
                    elements.push(self.parse_expr()?);
                    while self.eat_special(',') {
                        elements.push(self.parse_expr()?);
                    }
                }
                self.expect_special(')')?;
                Ok(Expr::Row {
                    elements,
                    explicit: true,
                })
            }

            // SQL value functions.
            Keyword::CurrentDate => {
                self.advance();
                Ok(value_function(SqlValueFunctionName::CurrentDate, None))
            }
            Keyword::CurrentTime
            | Keyword::CurrentTimestamp
            | Keyword::Localtime
            | Keyword::Localtimestamp => {
                self.advance();
                let name = match keyword {
                    Keyword::CurrentTime => SqlValueFunctionName::CurrentTime,
                    Keyword::CurrentTimestamp => SqlValueFunctionName::CurrentTimestamp,
                    Keyword::Localtime => SqlValueFunctionName::LocalTime,
                    _ => SqlValueFunctionName::LocalTimestamp,
                };
                let precision = if self.at_special('(') {
                    self.advance();
                    let precision = match self.advance().kind {
                        TokenKind::Integer(value) => value,
                        other => {
                            return Err(ParseError::syntax(
                                format!("expected an integer precision, got {}", other.describe()),
                                self.position(),
                            ));
                        }
                    };
                    self.expect_special(')')?;
                    Some(precision)
                } else {
                    None
                };
                Ok(value_function(name, precision))
            }
            Keyword::CurrentRole => {
                self.advance();
                Ok(value_function(SqlValueFunctionName::CurrentRole, None))
            }
            Keyword::CurrentUser => {
                self.advance();
                Ok(value_function(SqlValueFunctionName::CurrentUser, None))
            }
            Keyword::SessionUser => {
                self.advance();
                Ok(value_function(SqlValueFunctionName::SessionUser, None))
            }
            Keyword::User => {
                self.advance();
                Ok(value_function(SqlValueFunctionName::User, None))
            }
            Keyword::CurrentCatalog => {
                self.advance();
                Ok(value_function(SqlValueFunctionName::CurrentCatalog, None))
            }
            Keyword::CurrentSchema => {
                self.advance();
                Ok(value_function(SqlValueFunctionName::CurrentSchema, None))
            }

            // SQL-standard function syntax with dedicated nodes.
            Keyword::Extract if followed_by_paren => self.parse_extract(),
            Keyword::Overlay if followed_by_paren => self.parse_overlay(),
            Keyword::Position if followed_by_paren => self.parse_position(),
            Keyword::Substring if followed_by_paren => self.parse_substring(),
            Keyword::Trim if followed_by_paren => self.parse_trim(),
            Keyword::Normalize if followed_by_paren => self.parse_normalize(),
            Keyword::Nullif if followed_by_paren => {
                self.advance();
                self.expect_special('(')?;
                let first = self.parse_expr()?;
                self.expect_special(',')?;
                let second = self.parse_expr()?;
                self.expect_special(')')?;
                Ok(Expr::NullIf(Box::new(first), Box::new(second)))
            }
            Keyword::Coalesce if followed_by_paren => {
                self.advance();
                self.expect_special('(')?;
                let mut args = vec![self.parse_expr()?];
                while self.eat_special(',') {
                    args.push(self.parse_expr()?);
                }
                self.expect_special(')')?;
                Ok(Expr::Coalesce(args))
            }
            Keyword::Greatest | Keyword::Least if followed_by_paren => {
                self.advance();
                self.expect_special('(')?;
                let mut args = vec![self.parse_expr()?];
                while self.eat_special(',') {
                    args.push(self.parse_expr()?);
                }
                self.expect_special(')')?;
                Ok(Expr::MinMax {
                    kind: if keyword == Keyword::Greatest {
                        MinMaxKind::Greatest
                    } else {
                        MinMaxKind::Least
                    },
                    args,
                })
            }
            Keyword::Collation => {
                self.advance();
                self.expect_keyword(Keyword::For)?;
                self.expect_special('(')?;
                let arg = self.parse_expr()?;
                self.expect_special(')')?;
                Ok(Expr::CollationFor(Box::new(arg)))
            }

            // Typed constants from type keywords: `interval '1 day'`.
            Keyword::Interval
            | Keyword::Time
            | Keyword::Timestamp
            | Keyword::Boolean
            | Keyword::Numeric
            | Keyword::Decimal
            | Keyword::Bigint
            | Keyword::Smallint
            | Keyword::Int
            | Keyword::Integer
                if self.type_keyword_starts_constant() =>
            {
                let target = self.parse_type_name()?;
                let value = match self.advance().kind {
                    TokenKind::String(value) => value,
                    other => {
                        return Err(ParseError::syntax(
                            format!("expected a string constant, got {}", other.describe()),
                            self.position(),
                        ));
                    }
                };
                Ok(Expr::Typecast {
                    arg: Box::new(Expr::StringLiteral {
                        value,
                        kind: StringKind::Character,
                    }),
                    target,
                })
            }

            // XML functions.
            Keyword::Xmlconcat if followed_by_paren => {
                self.advance();
                self.expect_special('(')?;
                let mut args = vec![self.parse_expr()?];
                while self.eat_special(',') {
                    args.push(self.parse_expr()?);
                }
                self.expect_special(')')?;
                Ok(Expr::XmlConcat(args))
            }
            Keyword::Xmlelement if followed_by_paren => self.parse_xmlelement(),
            Keyword::Xmlexists if followed_by_paren => {
                self.advance();
                self.expect_special('(')?;
                let query = self.parse_expr()?;
                self.expect_keyword(Keyword::Passing)?;
                let document = self.parse_expr()?;
                self.expect_special(')')?;
                Ok(Expr::XmlExists {
                    query: Box::new(query),
                    document: Box::new(document),
                })
            }
            Keyword::Xmlforest if followed_by_paren => {
                self.advance();
                self.expect_special('(')?;
                let mut attributes = vec![self.parse_xml_attribute()?];
                while self.eat_special(',') {
                    attributes.push(self.parse_xml_attribute()?);
                }
                self.expect_special(')')?;
                Ok(Expr::XmlForest(attributes))
            }
            Keyword::Xmlparse if followed_by_paren => self.parse_xmlparse(),
            Keyword::Xmlpi if followed_by_paren => {
                self.advance();
                self.expect_special('(')?;
                self.expect_keyword(Keyword::Name)?;
                let name = self.parse_col_label()?;
                let content = if self.eat_special(',') {
                    Some(Box::new(self.parse_expr()?))
                } else {
                    None
                };
                self.expect_special(')')?;
                Ok(Expr::XmlPi { name, content })
            }
            Keyword::Xmlroot if followed_by_paren => self.parse_xmlroot(),
            Keyword::Xmlserialize if followed_by_paren => self.parse_xmlserialize(),

            // JSON constructors and query functions.
            Keyword::Json if followed_by_paren => self.parse_json_constructor(),
            Keyword::JsonScalar if followed_by_paren => {
                self.advance();
                self.expect_special('(')?;
                let arg = self.parse_expr()?;
                self.expect_special(')')?;
                Ok(Expr::JsonScalar(Box::new(arg)))
            }
            Keyword::JsonSerialize if followed_by_paren => {
                self.advance();
                self.expect_special('(')?;
                let value = self.parse_json_formatted_value()?;
                let returning = self.parse_json_returning()?;
                self.expect_special(')')?;
                Ok(Expr::JsonSerialize {
                    value: Box::new(value),
                    returning,
                })
            }
            Keyword::JsonObject if followed_by_paren => self.parse_json_object(),
            Keyword::JsonArray if followed_by_paren => self.parse_json_array(),
            Keyword::JsonObjectagg if followed_by_paren => self.parse_json_objectagg(),
            Keyword::JsonArrayagg if followed_by_paren => self.parse_json_arrayagg(),
            Keyword::JsonExists if followed_by_paren => self.parse_json_exists(),
            Keyword::JsonValue if followed_by_paren => self.parse_json_query_fn(false),
            Keyword::JsonQuery if followed_by_paren => self.parse_json_query_fn(true),

            _ if keyword.usable_as_column_name() => self.parse_identifier_chain(),
            _ if keyword.usable_as_function_name() && followed_by_paren => {
                self.parse_identifier_chain()
            }
            _ => Err(ParseError::syntax(
                format!(
                    "unexpected keyword {} in expression",
                    keyword.as_str().to_uppercase()
                ),
                self.position(),
            )),
        }
    }

    /// Whether a type keyword at the cursor begins a typed string constant
    /// (`interval '1 day'`, `timestamp(3) '...'`).
    fn type_keyword_starts_constant(&self) -> bool {
        match self.peek_at(1) {
            TokenKind::String(_) => true,
            TokenKind::Special('(') => {
                // Look past `(n)` for the string.
                let mut i = 2;
                let mut depth = 1;
                while depth > 0 {
                    match self.peek_at(i) {
                        TokenKind::Special('(') => depth += 1,
                        TokenKind::Special(')') => depth -= 1,
                        TokenKind::Eof => return false,
                        _ => {}
                    }
                    i += 1;
                }
                matches!(self.peek_at(i), TokenKind::String(_))
            }
            _ => false,
        }
    }

    fn parse_array_literal(&mut self) -> Result<Expr, ParseError> {
        self.expect_special('[')?;
        let mut elements = Vec::new();
        if !self.at_special(']') {
            loop {
                if self.at_special('[') {
                    elements.push(self.parse_array_literal()?);
                } else {
                    elements.push(self.parse_expr()?);
                }
                if !self.eat_special(',') {
                    break;
                }
            }
        }
        self.expect_special(']')?;
        Ok(Expr::Array(elements))
    }

    fn parse_case(&mut self) -> Result<Expr, ParseError> {
        self.expect_keyword(Keyword::Case)?;
        let argument = if self.at_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let mut when_clauses = Vec::new();
        while self.eat_keyword(Keyword::When) {
            let condition = self.parse_expr()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expr()?;
            when_clauses.push(WhenClause { condition, result });
        }
        if when_clauses.is_empty() {
            return Err(self.unexpected("WHEN"));
        }
        let else_clause = if self.eat_keyword(Keyword::Else) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_keyword(Keyword::End)?;
        Ok(Expr::Case(CaseExpression {
            argument,
            when_clauses,
            else_clause,
        }))
    }

    /// Parse `name`, `schema.name`, `name.*`, a typed string constant, or a
    /// function call starting at an identifier (or identifier-like keyword).
    fn parse_identifier_chain(&mut self) -> Result<Expr, ParseError> {
        // The leading part additionally admits type/function-name keywords
        // when they begin a call (`left(x, 2)`).
        let first = match self.peek().clone() {
            TokenKind::Keyword(kw)
                if !kw.usable_as_column_name()
                    && kw.usable_as_function_name()
                    && matches!(self.peek_at(1), TokenKind::Special('(')) =>
            {
                self.advance();
                Identifier::new(kw.as_str())
            }
            _ => self.parse_col_id()?,
        };
        let mut parts = vec![first];
        let mut star = false;
        while self.at_special('.') && !matches!(self.peek_at(1), TokenKind::Special('.')) {
            self.advance();
            if self.eat_special('*') {
                star = true;
                break;
            }
            parts.push(self.parse_col_label()?);
        }
        if !star {
            if self.at_special('(') {
                let name = QualifiedName { parts };
                let call = self.parse_function_invocation(name)?;
                return Ok(Expr::FunctionCall(Box::new(call)));
            }
            if let TokenKind::String(_) = self.peek() {
                // Typed constant: `func_name 'value'`.
                let TokenKind::String(value) = self.advance().kind else {
                    unreachable!("peeked a string");
                };
                return Ok(Expr::Typecast {
                    arg: Box::new(Expr::StringLiteral {
                        value,
                        kind: StringKind::Character,
                    }),
                    target: TypeName::plain(QualifiedName { parts }),
                });
            }
        }
        Ok(Expr::ColumnRef(ColumnReference { parts, star }))
    }

    // ── function calls ──────────────────────────────────────────────────

    /// Parse a call suffix: `(args) [WITHIN GROUP] [FILTER] [OVER ...]`.
    ///
    /// Also used by the FROM-clause parser for function table items.
    pub(crate) fn parse_function_invocation(
        &mut self,
        name: QualifiedName,
    ) -> Result<FunctionCall, ParseError> {
        self.expect_special('(')?;
        let mut distinct = false;
        let mut variadic = false;
        let mut args: Vec<FunctionArgument> = Vec::new();
        let mut order_by = Vec::new();

        let arguments = if self.eat_special('*') {
            self.expect_special(')')?;
            FunctionArguments::Star
        } else {
            if self.eat_keyword(Keyword::Distinct) {
                distinct = true;
            } else {
                let _ = self.eat_keyword(Keyword::All);
            }
            if !self.at_special(')') {
                loop {
                    let arg_position = self.position();
                    if self.eat_keyword(Keyword::Variadic) {
                        variadic = true;
                    }
                    let argument = self.parse_function_argument()?;
                    if argument.name.is_none()
                        && args.last().is_some_and(|a: &FunctionArgument| a.name.is_some())
                    {
                        return Err(ParseError::syntax(
                            "positional argument cannot follow named argument",
                            arg_position,
                        ));
                    }
                    if let Some(name) = &argument.name {
                        if args
                            .iter()
                            .any(|a| a.name.as_ref() == Some(name))
                        {
                            return Err(ParseError::syntax(
                                format!("argument name {name} used more than once"),
                                arg_position,
                            ));
                        }
                    }
                    args.push(argument);
                    if variadic && self.at_special(',') {
                        return Err(ParseError::syntax(
                            "VARIADIC argument must be the last one",
                            self.position(),
                        ));
                    }
                    if !self.eat_special(',') {
                        break;
                    }
                }
            }
            if self.eat_keyword(Keyword::Order) {
                self.expect_keyword(Keyword::By)?;
                order_by = self.parse_order_by_list()?;
            }
            self.expect_special(')')?;
            FunctionArguments::List { args, variadic }
        };

        let mut within_group = false;
        if self.at_keyword(Keyword::Within) {
            let position = self.position();
            self.advance();
            self.expect_keyword(Keyword::Group)?;
            if !order_by.is_empty() {
                return Err(ParseError::syntax(
                    "cannot use multiple ORDER BY clauses with WITHIN GROUP",
                    position,
                ));
            }
            self.expect_special('(')?;
            self.expect_keyword(Keyword::Order)?;
            self.expect_keyword(Keyword::By)?;
            order_by = self.parse_order_by_list()?;
            self.expect_special(')')?;
            within_group = true;
        }

        let filter = if self.at_keyword(Keyword::Filter) {
            self.advance();
            self.expect_special('(')?;
            self.expect_keyword(Keyword::Where)?;
            let condition = self.parse_expr()?;
            self.expect_special(')')?;
            Some(Box::new(condition))
        } else {
            None
        };

        let over = if self.eat_keyword(Keyword::Over) {
            Some(Box::new(self.parse_over_window()?))
        } else {
            None
        };

        Ok(FunctionCall {
            name,
            arguments,
            distinct,
            order_by,
            within_group,
            filter,
            over,
        })
    }

    fn parse_function_argument(&mut self) -> Result<FunctionArgument, ParseError> {
        // `name => value` or `name := value`
        let named = match (self.peek(), self.peek_at(1)) {
            (TokenKind::Identifier(_), TokenKind::EqualsGreater | TokenKind::ColonEquals) => true,
            (TokenKind::Keyword(kw), TokenKind::EqualsGreater | TokenKind::ColonEquals) => {
                kw.usable_as_column_name()
            }
            _ => false,
        };
        if named {
            let name = self.parse_col_id()?;
            self.advance();
            let value = self.parse_expr()?;
            return Ok(FunctionArgument {
                name: Some(name),
                value,
            });
        }
        Ok(FunctionArgument {
            name: None,
            value: self.parse_expr()?,
        })
    }

    // ── SQL-standard function forms ─────────────────────────────────────

    fn parse_extract(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let field = match self.advance().kind {
            TokenKind::Identifier(name) => Identifier::new(name),
            TokenKind::Keyword(kw) => Identifier::new(kw.as_str()),
            TokenKind::String(value) => Identifier::new(value),
            other => {
                return Err(ParseError::syntax(
                    format!("unexpected {} in EXTRACT", other.describe()),
                    self.position(),
                ));
            }
        };
        self.expect_keyword(Keyword::From)?;
        let source = self.parse_expr()?;
        self.expect_special(')')?;
        Ok(Expr::Extract {
            field,
            source: Box::new(source),
        })
    }

    fn parse_overlay(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let string = self.parse_expr()?;
        if self.eat_special(',') {
            // Plain-argument form maps to an ordinary function call.
            let mut args = vec![string];
            loop {
                args.push(self.parse_expr()?);
                if !self.eat_special(',') {
                    break;
                }
            }
            self.expect_special(')')?;
            return Ok(Expr::FunctionCall(Box::new(FunctionCall::simple(
                QualifiedName::bare("overlay"),
                args,
            ))));
        }
        self.expect_keyword(Keyword::Placing)?;
        let replacement = self.parse_expr()?;
        self.expect_keyword(Keyword::From)?;
        let start = self.parse_expr()?;
        let count = if self.eat_keyword(Keyword::For) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        self.expect_special(')')?;
        Ok(Expr::Overlay {
            string: Box::new(string),
            replacement: Box::new(replacement),
            start: Box::new(start),
            count,
        })
    }

    fn parse_position(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        // The operands live in the restricted b_expr grammar; parse below
        // the IN level so the separator keyword stays visible.
        let substring = self.parse_generic_op()?;
        self.expect_keyword(Keyword::In)?;
        let string = self.parse_generic_op()?;
        self.expect_special(')')?;
        Ok(Expr::Position {
            substring: Box::new(substring),
            string: Box::new(string),
        })
    }

    fn parse_substring(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let string = self.parse_expr()?;
        if self.eat_special(',') {
            let mut args = vec![string];
            loop {
                args.push(self.parse_expr()?);
                if !self.eat_special(',') {
                    break;
                }
            }
            self.expect_special(')')?;
            return Ok(Expr::FunctionCall(Box::new(FunctionCall::simple(
                QualifiedName::bare("substring"),
                args,
            ))));
        }
        if self.eat_keyword(Keyword::Similar) {
            let pattern = self.parse_expr()?;
            self.expect_keyword(Keyword::Escape)?;
            let escape = self.parse_expr()?;
            self.expect_special(')')?;
            return Ok(Expr::SubstringSimilar {
                string: Box::new(string),
                pattern: Box::new(pattern),
                escape: Box::new(escape),
            });
        }
        let from = if self.eat_keyword(Keyword::From) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        let for_count = if self.eat_keyword(Keyword::For) {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };
        if from.is_none() && for_count.is_none() {
            return Err(self.unexpected("FROM, FOR or SIMILAR"));
        }
        self.expect_special(')')?;
        Ok(Expr::Substring {
            string: Box::new(string),
            from,
            for_count,
        })
    }

    fn parse_trim(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let side = if self.eat_keyword(Keyword::Leading) {
            TrimSide::Leading
        } else if self.eat_keyword(Keyword::Trailing) {
            TrimSide::Trailing
        } else {
            let _ = self.eat_keyword(Keyword::Both);
            TrimSide::Both
        };
        let (characters, string) = if self.eat_keyword(Keyword::From) {
            (None, self.parse_expr()?)
        } else {
            let first = self.parse_expr()?;
            if self.eat_keyword(Keyword::From) {
                (Some(first), self.parse_expr()?)
            } else if self.eat_special(',') {
                let characters = self.parse_expr()?;
                (Some(characters), first)
            } else {
                (None, first)
            }
        };
        self.expect_special(')')?;
        Ok(Expr::Trim {
            side,
            characters: characters.map(Box::new),
            string: Box::new(string),
        })
    }

    fn parse_normalize(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let arg = self.parse_expr()?;
        let form = if self.eat_special(',') {
            let position = self.position();
            match self.advance().kind {
                TokenKind::Keyword(
                    kw @ (Keyword::Nfc | Keyword::Nfd | Keyword::Nfkc | Keyword::Nfkd),
                ) => Some(normal_form(kw)),
                other => {
                    return Err(ParseError::syntax(
                        format!("unexpected {} in NORMALIZE", other.describe()),
                        position,
                    ));
                }
            }
        } else {
            None
        };
        self.expect_special(')')?;
        Ok(Expr::Normalize {
            arg: Box::new(arg),
            form,
        })
    }

    // ── XML functions ───────────────────────────────────────────────────

    fn parse_xml_attribute(&mut self) -> Result<XmlAttribute, ParseError> {
        let value = self.parse_expr()?;
        let name = if self.eat_keyword(Keyword::As) {
            Some(self.parse_col_label()?)
        } else {
            None
        };
        Ok(XmlAttribute { value, name })
    }

    fn parse_xmlelement(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        self.expect_keyword(Keyword::Name)?;
        let name = self.parse_col_label()?;
        let mut attributes = Vec::new();
        let mut content = Vec::new();
        while self.eat_special(',') {
            if self.at_keyword(Keyword::Xmlattributes) && attributes.is_empty() {
                self.advance();
                self.expect_special('(')?;
                attributes.push(self.parse_xml_attribute()?);
                while self.eat_special(',') {
                    attributes.push(self.parse_xml_attribute()?);
                }
                self.expect_special(')')?;
            } else {
                content.push(self.parse_expr()?);
            }
        }
        self.expect_special(')')?;
        Ok(Expr::XmlElement {
            name,
            attributes,
            content,
        })
    }

    fn parse_xml_option(&mut self) -> Result<XmlOption, ParseError> {
        if self.eat_keyword(Keyword::Document) {
            Ok(XmlOption::Document)
        } else if self.eat_keyword(Keyword::Content) {
            Ok(XmlOption::Content)
        } else {
            Err(self.unexpected("DOCUMENT or CONTENT"))
        }
    }

    fn parse_xmlparse(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let option = self.parse_xml_option()?;
        let argument = self.parse_expr()?;
        let preserve_whitespace = if self.eat_keyword(Keyword::Preserve) {
            self.expect_keyword(Keyword::Whitespace)?;
            true
        } else if self.eat_keyword(Keyword::Strip) {
            self.expect_keyword(Keyword::Whitespace)?;
            false
        } else {
            false
        };
        self.expect_special(')')?;
        Ok(Expr::XmlParse {
            option,
            argument: Box::new(argument),
            preserve_whitespace,
        })
    }

    fn parse_xmlroot(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let xml = self.parse_expr()?;
        self.expect_special(',')?;
        self.expect_keyword(Keyword::Version)?;
        let version = if self.at_keyword(Keyword::No) {
            self.advance();
            self.expect_keyword(Keyword::Value)?;
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let standalone = if self.eat_special(',') {
            self.expect_keyword(Keyword::Standalone)?;
            if self.eat_keyword(Keyword::Yes) {
                Some(XmlStandalone::Yes)
            } else if self.eat_keyword(Keyword::No) {
                if self.eat_keyword(Keyword::Value) {
                    Some(XmlStandalone::NoValue)
                } else {
                    Some(XmlStandalone::No)
                }
            } else {
                return Err(self.unexpected("YES, NO or NO VALUE"));
            }
        } else {
            None
        };
        self.expect_special(')')?;
        Ok(Expr::XmlRoot {
            xml: Box::new(xml),
            version,
            standalone,
        })
    }

    fn parse_xmlserialize(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let option = self.parse_xml_option()?;
        let argument = self.parse_expr()?;
        self.expect_keyword(Keyword::As)?;
        let type_name = self.parse_type_name()?;
        let indent = if self.eat_keyword(Keyword::Indent) {
            Some(true)
        } else if self.at_keyword(Keyword::No)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Indent))
        {
            self.advance();
            self.advance();
            Some(false)
        } else {
            None
        };
        self.expect_special(')')?;
        Ok(Expr::XmlSerialize {
            option,
            argument: Box::new(argument),
            type_name,
            indent,
        })
    }

    // ── JSON functions ──────────────────────────────────────────────────

    pub(crate) fn parse_json_format(&mut self) -> Result<Option<JsonFormat>, ParseError> {
        if !self.at_keyword(Keyword::Format) {
            return Ok(None);
        }
        self.advance();
        self.expect_keyword(Keyword::Json)?;
        let encoding = if self.eat_keyword(Keyword::Encoding) {
            Some(self.parse_col_id()?)
        } else {
            None
        };
        Ok(Some(JsonFormat { encoding }))
    }

    pub(crate) fn parse_json_formatted_value(&mut self) -> Result<JsonFormattedValue, ParseError> {
        let expr = self.parse_expr()?;
        let format = self.parse_json_format()?;
        Ok(JsonFormattedValue { expr, format })
    }

    /// `WITH [UNIQUE] KEYS` / `WITHOUT UNIQUE [KEYS]` → `Some(bool)`.
    fn parse_json_unique_clause(&mut self) -> Option<bool> {
        if self.at_keyword(Keyword::With)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Unique))
        {
            self.advance();
            self.advance();
            let _ = self.eat_keyword(Keyword::Keys);
            return Some(true);
        }
        if self.at_keyword(Keyword::Without)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Unique))
        {
            self.advance();
            self.advance();
            let _ = self.eat_keyword(Keyword::Keys);
            return Some(false);
        }
        None
    }

    /// `NULL ON NULL` / `ABSENT ON NULL` → `Some(bool)` (true = absent).
    fn parse_json_null_clause(&mut self) -> Option<bool> {
        if self.at_keyword(Keyword::Null)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::On))
        {
            self.advance();
            self.advance();
            let _ = self.eat_keyword(Keyword::Null);
            return Some(false);
        }
        if self.at_keyword(Keyword::Absent)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::On))
        {
            self.advance();
            self.advance();
            let _ = self.eat_keyword(Keyword::Null);
            return Some(true);
        }
        None
    }

    pub(crate) fn parse_json_returning(&mut self) -> Result<Option<JsonReturning>, ParseError> {
        if !self.eat_keyword(Keyword::Returning) {
            return Ok(None);
        }
        let type_name = self.parse_type_name()?;
        let format = self.parse_json_format()?;
        Ok(Some(JsonReturning { type_name, format }))
    }

    /// A JSON behaviour value (the part before `ON EMPTY` / `ON ERROR`).
    pub(crate) fn parse_json_behaviour(&mut self) -> Result<Option<JsonBehaviour>, ParseError> {
        let behaviour = match self.peek() {
            TokenKind::Keyword(Keyword::Error) => {
                self.advance();
                JsonBehaviour::Error
            }
            TokenKind::Keyword(Keyword::Null) => {
                self.advance();
                JsonBehaviour::Null
            }
            TokenKind::Keyword(Keyword::True) => {
                self.advance();
                JsonBehaviour::True
            }
            TokenKind::Keyword(Keyword::False) => {
                self.advance();
                JsonBehaviour::False
            }
            TokenKind::Keyword(Keyword::Unknown) => {
                self.advance();
                JsonBehaviour::Unknown
            }
            TokenKind::Keyword(Keyword::Empty) => {
                self.advance();
                if self.eat_keyword(Keyword::Object) {
                    JsonBehaviour::EmptyObject
                } else {
                    let _ = self.eat_keyword(Keyword::Array);
                    JsonBehaviour::EmptyArray
                }
            }
            TokenKind::Keyword(Keyword::Default) => {
                self.advance();
                JsonBehaviour::Default(Box::new(self.parse_expr()?))
            }
            _ => return Ok(None),
        };
        Ok(Some(behaviour))
    }

    pub(crate) fn parse_json_passing(&mut self) -> Result<Vec<JsonArgument>, ParseError> {
        if !self.eat_keyword(Keyword::Passing) {
            return Ok(vec![]);
        }
        let mut passing = Vec::new();
        loop {
            let value = self.parse_json_formatted_value()?;
            self.expect_keyword(Keyword::As)?;
            let alias = self.parse_col_id()?;
            passing.push(JsonArgument { value, alias });
            if !self.eat_special(',') {
                break;
            }
        }
        Ok(passing)
    }

    fn parse_json_constructor(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let value = self.parse_json_formatted_value()?;
        let unique_keys = self.parse_json_unique_clause();
        self.expect_special(')')?;
        Ok(Expr::Json {
            value: Box::new(value),
            unique_keys,
        })
    }

    fn parse_json_key_value(&mut self) -> Result<JsonKeyValue, ParseError> {
        let key = self.parse_expr()?;
        if !self.eat_special(':') {
            self.expect_keyword(Keyword::Value)?;
        }
        let value = self.parse_json_formatted_value()?;
        Ok(JsonKeyValue { key, value })
    }

    fn parse_json_object(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let mut fields = Vec::new();
        if !self.at_special(')')
            && !self.at_keyword(Keyword::Returning)
            && self.parse_json_null_clause_lookahead()
        {
            // fall through to option parsing below with no fields
        } else if !self.at_special(')') && !self.at_keyword(Keyword::Returning) {
            fields.push(self.parse_json_key_value()?);
            while self.eat_special(',') {
                fields.push(self.parse_json_key_value()?);
            }
        }
        let absent_on_null = self.parse_json_null_clause();
        let unique_keys = self.parse_json_unique_clause();
        let returning = self.parse_json_returning()?;
        self.expect_special(')')?;
        Ok(Expr::JsonObject {
            fields,
            absent_on_null,
            unique_keys,
            returning,
        })
    }

    /// Whether the cursor sits on a NULL/ABSENT ON NULL clause.
    fn parse_json_null_clause_lookahead(&self) -> bool {
        matches!(
            (self.peek(), self.peek_at(1)),
            (
                TokenKind::Keyword(Keyword::Null | Keyword::Absent),
                TokenKind::Keyword(Keyword::On)
            )
        )
    }

    fn parse_json_array(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        if self.at_query_start() {
            let query = self.parse_query_full()?;
            let format = self.parse_json_format()?;
            let returning = self.parse_json_returning()?;
            self.expect_special(')')?;
            return Ok(Expr::JsonArray {
                content: JsonArrayContent::Subselect {
                    query: Box::new(query),
                    format,
                },
                returning,
            });
        }
        let mut elements = Vec::new();
        if !self.at_special(')')
            && !self.at_keyword(Keyword::Returning)
            && !self.parse_json_null_clause_lookahead()
        {
            elements.push(self.parse_json_formatted_value()?);
            while self.eat_special(',') {
                elements.push(self.parse_json_formatted_value()?);
            }
        }
        let absent_on_null = self.parse_json_null_clause();
        let returning = self.parse_json_returning()?;
        self.expect_special(')')?;
        Ok(Expr::JsonArray {
            content: JsonArrayContent::Values {
                elements,
                absent_on_null,
            },
            returning,
        })
    }

    fn parse_json_objectagg(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let field = self.parse_json_key_value()?;
        let absent_on_null = self.parse_json_null_clause();
        let unique_keys = self.parse_json_unique_clause();
        let returning = self.parse_json_returning()?;
        self.expect_special(')')?;
        let (filter, over) = self.parse_agg_suffix()?;
        Ok(Expr::JsonObjectAgg {
            field: Box::new(field),
            absent_on_null,
            unique_keys,
            returning,
            filter,
            over,
        })
    }

    fn parse_json_arrayagg(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let value = self.parse_json_formatted_value()?;
        let order_by = if self.eat_keyword(Keyword::Order) {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            vec![]
        };
        let absent_on_null = self.parse_json_null_clause();
        let returning = self.parse_json_returning()?;
        self.expect_special(')')?;
        let (filter, over) = self.parse_agg_suffix()?;
        Ok(Expr::JsonArrayAgg {
            value: Box::new(value),
            order_by,
            absent_on_null,
            returning,
            filter,
            over,
        })
    }

    fn parse_agg_suffix(
        &mut self,
    ) -> Result<
        (
            Option<Box<Expr>>,
            Option<Box<pgraft_ast::WindowDefinition>>,
        ),
        ParseError,
    > {
        let filter = if self.at_keyword(Keyword::Filter) {
            self.advance();
            self.expect_special('(')?;
            self.expect_keyword(Keyword::Where)?;
            let condition = self.parse_expr()?;
            self.expect_special(')')?;
            Some(Box::new(condition))
        } else {
            None
        };
        let over = if self.eat_keyword(Keyword::Over) {
            Some(Box::new(self.parse_over_window()?))
        } else {
            None
        };
        Ok((filter, over))
    }

    fn parse_json_exists(&mut self) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let context = self.parse_json_formatted_value()?;
        self.expect_special(',')?;
        let path = self.parse_expr()?;
        let passing = self.parse_json_passing()?;
        let on_error = self.parse_json_on_clause(Keyword::Error)?;
        self.expect_special(')')?;
        Ok(Expr::JsonExists {
            context: Box::new(context),
            path: Box::new(path),
            passing,
            on_error,
        })
    }

    /// `behaviour ON <when>` if present.
    fn parse_json_on_clause(
        &mut self,
        when: Keyword,
    ) -> Result<Option<JsonBehaviour>, ParseError> {
        let saved = self.pos;
        let Some(behaviour) = self.parse_json_behaviour()? else {
            return Ok(None);
        };
        if self.at_keyword(Keyword::On)
            && matches!(self.peek_at(1), TokenKind::Keyword(kw) if *kw == when)
        {
            self.advance();
            self.advance();
            Ok(Some(behaviour))
        } else {
            self.pos = saved;
            Ok(None)
        }
    }

    fn parse_json_query_fn(&mut self, is_query: bool) -> Result<Expr, ParseError> {
        self.advance();
        self.expect_special('(')?;
        let context = self.parse_json_formatted_value()?;
        self.expect_special(',')?;
        let path = self.parse_expr()?;
        let passing = self.parse_json_passing()?;
        let returning = self.parse_json_returning()?;
        let mut wrapper = None;
        let mut quotes = None;
        if is_query {
            wrapper = self.parse_json_wrapper()?;
            quotes = self.parse_json_quotes();
        }
        let on_empty = self.parse_json_on_clause(Keyword::Empty)?;
        let on_error = self.parse_json_on_clause(Keyword::Error)?;
        self.expect_special(')')?;
        if is_query {
            Ok(Expr::JsonQuery {
                context: Box::new(context),
                path: Box::new(path),
                passing,
                returning,
                wrapper,
                quotes,
                on_empty,
                on_error,
            })
        } else {
            Ok(Expr::JsonValue {
                context: Box::new(context),
                path: Box::new(path),
                passing,
                returning,
                on_empty,
                on_error,
            })
        }
    }

    pub(crate) fn parse_json_wrapper(&mut self) -> Result<Option<JsonWrapper>, ParseError> {
        if self.at_keyword(Keyword::Without)
            && matches!(
                self.peek_at(1),
                TokenKind::Keyword(Keyword::Wrapper | Keyword::Array)
            )
        {
            self.advance();
            let _ = self.eat_keyword(Keyword::Array);
            self.expect_keyword(Keyword::Wrapper)?;
            return Ok(Some(JsonWrapper::Without));
        }
        if self.at_keyword(Keyword::With)
            && matches!(
                self.peek_at(1),
                TokenKind::Keyword(
                    Keyword::Wrapper
                        | Keyword::Array
                        | Keyword::Conditional
                        | Keyword::Unconditional
                )
            )
        {
            self.advance();
            let wrapper = if self.eat_keyword(Keyword::Conditional) {
                JsonWrapper::Conditional
            } else {
                let _ = self.eat_keyword(Keyword::Unconditional);
                JsonWrapper::Unconditional
            };
            let _ = self.eat_keyword(Keyword::Array);
            self.expect_keyword(Keyword::Wrapper)?;
            return Ok(Some(wrapper));
        }
        Ok(None)
    }

    pub(crate) fn parse_json_quotes(&mut self) -> Option<JsonQuotes> {
        if self.at_keyword(Keyword::Keep)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Quotes))
        {
            self.advance();
            self.advance();
            return Some(JsonQuotes::Keep);
        }
        if self.at_keyword(Keyword::Omit)
            && matches!(self.peek_at(1), TokenKind::Keyword(Keyword::Quotes))
        {
            self.advance();
            self.advance();
            return Some(JsonQuotes::Omit);
        }
        None
    }
}

fn value_function(name: SqlValueFunctionName, precision: Option<String>) -> Expr {
    Expr::ValueFunction(SqlValueFunction { name, precision })
}

fn normal_form(keyword: Keyword) -> NormalForm {
    match keyword {
        Keyword::Nfc => NormalForm::Nfc,
        Keyword::Nfd => NormalForm::Nfd,
        Keyword::Nfkc => NormalForm::Nfkc,
        _ => NormalForm::Nfkd,
    }
}
