//! SQL generation from AST trees.
//!
//! [`SqlBuilder`] is the inverse of the parser: it serializes a statement
//! back into SQL text, inserting parentheses exactly where operator
//! precedence and associativity require them, so that re-parsing the output
//! yields a structurally equal tree.
//!
//! Two parenthesization modes exist. `Current` emits the minimum
//! parentheses needed under the current (9.5+) precedence rules. `Compat`
//! additionally wraps the constructs whose precedence changed in 9.5
//! (IS-family applied to comparisons, negated multi-keyword operators,
//! equal-precedence comparison chains) so the output parses identically
//! under either precedence era.

use std::fmt;

use crate::expr::{
    ArrayComparisonArg, CaseExpression, Expr, FunctionArguments, FunctionCall, InRhs,
    IndirectionItem, JsonArgument, JsonArrayContent, JsonBehaviour, JsonFormat,
    JsonFormattedValue, JsonItemKind, JsonKeyValue, JsonQuotes, JsonReturning, JsonWrapper,
    KeywordConstant, MinMaxKind, NormalForm, Parameter, PatternOp, SqlValueFunctionName,
    StringKind, TrimSide, TypeName, XmlOption, XmlStandalone,
};
use crate::stmt::{
    ColumnDefinition, ConflictAction, ConflictTarget, Delete, DistinctClause, FromElement,
    IndexElement, Insert, JoinExpression, JoinKind, JsonTableColumn, LockingElement,
    LockingStrength, LockingWait, Merge, MergeAction, MergeWhenClause, MultipleSetSource,
    NullsOrder, OnConflictClause, OrderByDirection, OrderByElement, OverridingKind, Query,
    QueryBody, RelationAlias, SelectCore, SetClause, SetOperator, SetTargetElement, Statement,
    TargetElement, Update, UpdateOrDeleteTarget, WindowDefinition, WindowFrameBound,
    WindowFrameExclusion, WindowFrameMode, WithClause, XmlColumn,
};
use crate::walker::{walk_expr, Walker};
use crate::{
    ExprAssociativity, ExprPrecedence, Identifier, NodeError, Operator, QualifiedName,
};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Parenthesization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParenthesesMode {
    /// Minimum parentheses for the current precedence rules.
    #[default]
    Current,
    /// Extra parentheses so the output is safe under both precedence eras.
    Compat,
}

/// Output formatting options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderOptions {
    /// One level of indentation.
    pub indent: String,
    /// Line separator; empty string produces single-line output.
    pub linebreak: String,
    /// Greedy wrap target for long lists, in characters.
    pub wrap_width: usize,
    pub parentheses: ParenthesesMode,
    /// Fail if the tree still contains named parameters.
    pub forbid_named_parameters: bool,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_owned(),
            linebreak: "\n".to_owned(),
            wrap_width: 120,
            parentheses: ParenthesesMode::Current,
            forbid_named_parameters: false,
        }
    }
}

impl BuilderOptions {
    /// Compact single-line output.
    #[must_use]
    pub fn single_line() -> Self {
        Self {
            indent: String::new(),
            linebreak: String::new(),
            wrap_width: usize::MAX,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_parentheses(mut self, parentheses: ParenthesesMode) -> Self {
        self.parentheses = parentheses;
        self
    }
}

// ---------------------------------------------------------------------------
// Reserved words (for identifier quoting)
// ---------------------------------------------------------------------------

/// Keywords that cannot appear as bare identifiers (reserved and
/// type/function-name keywords), sorted for binary search.
static RESERVED_WORDS: &[&str] = &[
    "all", "analyse", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "between", "binary", "both", "case", "cast", "check", "collate",
    "collation", "column", "concurrently", "constraint", "create", "cross", "current_catalog",
    "current_date", "current_role", "current_schema", "current_time", "current_timestamp",
    "current_user", "default", "deferrable", "desc", "distinct", "do", "else", "end", "except",
    "exists", "extract", "false", "fetch", "for", "foreign", "freeze", "from", "full", "grant",
    "group", "having", "ilike", "in", "initially", "inner", "intersect", "into", "is", "isnull",
    "join", "lateral", "leading", "left", "like", "limit", "localtime", "localtimestamp",
    "merge", "natural", "not", "notnull", "null", "offset", "on", "only", "or", "order",
    "outer", "overlaps", "placing", "primary", "references", "returning", "right", "select",
    "session_user", "similar", "some", "symmetric", "table", "tablesample", "then", "to",
    "trailing", "true", "union", "unique", "user", "using", "variadic", "verbose", "when",
    "where", "window", "with",
];

fn is_reserved_word(name: &str) -> bool {
    RESERVED_WORDS.binary_search(&name).is_ok()
}

fn needs_quoting(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return true;
    };
    if !(first.is_ascii_lowercase() || first == '_') {
        return true;
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '$') {
        return true;
    }
    is_reserved_word(name)
}

// ---------------------------------------------------------------------------
// Named-parameter scan
// ---------------------------------------------------------------------------

struct NamedParameterFinder {
    found: Option<String>,
}

impl Walker for NamedParameterFinder {
    fn walk_expr(&mut self, expr: &Expr) {
        if self.found.is_some() {
            return;
        }
        if let Expr::Parameter(Parameter::Named(name)) = expr {
            self.found = Some(name.clone());
            return;
        }
        walk_expr(self, expr);
    }
}

// ---------------------------------------------------------------------------
// The builder
// ---------------------------------------------------------------------------

/// Serializes AST trees to SQL text.
#[derive(Debug, Clone, Default)]
pub struct SqlBuilder {
    options: BuilderOptions,
    indent_level: usize,
}

impl SqlBuilder {
    #[must_use]
    pub fn new(options: BuilderOptions) -> Self {
        Self {
            options,
            indent_level: 0,
        }
    }

    /// A builder producing compact single-line SQL.
    #[must_use]
    pub fn single_line() -> Self {
        Self::new(BuilderOptions::single_line())
    }

    /// Serialize a statement.
    pub fn build(&mut self, statement: &Statement) -> Result<String, NodeError> {
        if self.options.forbid_named_parameters {
            let mut finder = NamedParameterFinder { found: None };
            finder.walk_statement(statement);
            if let Some(name) = finder.found {
                return Err(NodeError::NamedParameterForbidden { name });
            }
        }
        self.indent_level = 0;
        Ok(self.statement(statement))
    }

    /// Serialize a single expression.
    pub fn build_expr(&mut self, expr: &Expr) -> Result<String, NodeError> {
        self.indent_level = 0;
        Ok(self.expr(expr))
    }

    // -- layout helpers -----------------------------------------------------

    fn linebreak(&self) -> &str {
        if self.options.linebreak.is_empty() {
            " "
        } else {
            &self.options.linebreak
        }
    }

    fn indent(&self) -> String {
        if self.options.linebreak.is_empty() {
            String::new()
        } else {
            self.options.indent.repeat(self.indent_level)
        }
    }

    fn join_clauses(&self, clauses: Vec<String>) -> String {
        clauses.join(self.linebreak())
    }

    /// Join list parts after a leading keyword, wrapping greedily at
    /// `wrap_width` when multi-line output is enabled.
    fn implode(&self, lead: &str, parts: &[String], separator: &str) -> String {
        if parts.is_empty() {
            return lead.to_owned();
        }
        if self.options.linebreak.is_empty() || self.options.wrap_width == usize::MAX {
            return format!("{lead}{}", parts.join(&format!("{separator} ")));
        }
        let line_sep = format!("{separator}{}{}", self.options.linebreak, self.indent());
        let mut out = format!("{lead}{}", parts[0]);
        let mut line_len = match out.rfind(&self.options.linebreak) {
            Some(pos) => out.len() - pos,
            None => out.len(),
        };
        for part in &parts[1..] {
            let part_first = part
                .find(&self.options.linebreak)
                .unwrap_or(part.len());
            if line_len + part_first + separator.len() + 1 < self.options.wrap_width {
                out.push_str(separator);
                out.push(' ');
                out.push_str(part);
                line_len += part_first + separator.len() + 1;
            } else {
                out.push_str(&line_sep);
                out.push_str(part);
                line_len = self.indent().len() + part_first;
            }
            if let Some(pos) = part.rfind(&self.options.linebreak) {
                line_len = part.len() - pos;
            }
        }
        out
    }

    fn ident(&self, identifier: &Identifier) -> String {
        let name = identifier.as_str();
        if needs_quoting(name) {
            format!("\"{}\"", name.replace('"', "\"\""))
        } else {
            name.to_owned()
        }
    }

    fn qualified_name(&self, name: &QualifiedName) -> String {
        name.parts
            .iter()
            .map(|part| self.ident(part))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn expr_list(&mut self, exprs: &[Expr]) -> Vec<String> {
        exprs.iter().map(|e| self.expr(e)).collect()
    }

    fn comma_exprs(&mut self, exprs: &[Expr]) -> String {
        self.expr_list(exprs).join(", ")
    }

    // -- parenthesization ---------------------------------------------------

    fn needs_parens(&self, argument: &Expr, parent: &Expr, right: bool) -> bool {
        let arg_prec = argument.precedence();
        let parent_prec = parent.precedence();

        if self.options.parentheses == ParenthesesMode::Compat {
            // IS changed sides with the comparison operators in 9.5.
            if matches!(parent.precedence(), ExprPrecedence::Is)
                && arg_prec <= ExprPrecedence::GenericOp
            {
                return true;
            }
            // NOT LIKE and friends had inconsistent pre-9.5 precedence.
            if parent.is_negated_multi_keyword() && arg_prec <= parent_prec {
                return true;
            }
            // Treat comparison chains as non-associative on both sides.
            if parent_prec == ExprPrecedence::Comparison
                && arg_prec == ExprPrecedence::Comparison
            {
                return true;
            }
        }

        if matches!(parent, Expr::Between { .. }) {
            // The right-hand operands of BETWEEN live in the restricted
            // b_expr grammar; wrap nearly everything.
            return arg_prec
                < if right {
                    ExprPrecedence::Typecast
                } else {
                    parent_prec
                };
        }

        match parent.associativity() {
            ExprAssociativity::Right => {
                arg_prec < parent_prec || (!right && arg_prec == parent_prec)
            }
            ExprAssociativity::Left => {
                arg_prec < parent_prec || (right && arg_prec == parent_prec)
            }
            ExprAssociativity::None => arg_prec <= parent_prec,
        }
    }

    fn wrapped(&mut self, argument: &Expr, parent: &Expr, right: bool) -> String {
        let sql = self.expr(argument);
        if self.needs_parens(argument, parent, right) {
            format!("({sql})")
        } else {
            sql
        }
    }

    // -- statements ---------------------------------------------------------

    fn statement(&mut self, statement: &Statement) -> String {
        match statement {
            Statement::Select(query) => self.query(query),
            Statement::Insert(insert) => self.insert(insert),
            Statement::Update(update) => self.update(update),
            Statement::Delete(delete) => self.delete(delete),
            Statement::Merge(merge) => self.merge(merge),
        }
    }

    fn query(&mut self, query: &Query) -> String {
        let mut clauses = Vec::new();
        if let Some(with) = &query.with {
            clauses.push(self.with_clause(with));
        }
        match &query.body {
            QueryBody::Select(core) => self.select_core(&mut clauses, core),
            QueryBody::Values(rows) => {
                let indent = self.indent();
                self.indent_level += 1;
                let rows: Vec<String> = rows
                    .iter()
                    .map(|row| format!("({})", self.comma_exprs(row)))
                    .collect();
                self.indent_level -= 1;
                clauses.push(format!(
                    "{indent}values{}{}",
                    if self.options.linebreak.is_empty() { " " } else { self.linebreak() },
                    rows.join(&format!(",{}", self.linebreak()))
                ));
            }
            QueryBody::SetOp(op) => {
                let indent = self.indent();
                let self_prec = query.set_op_precedence();
                let left_wrap = op.left.has_trailing_clauses()
                    || op.left.set_op_precedence() < self_prec;
                let right_wrap = op.right.has_trailing_clauses()
                    || op.right.set_op_precedence() <= self_prec;
                clauses.push(self.set_op_operand(&op.left, left_wrap));
                clauses.push(format!("{indent}{}", set_operator_sql(op.operator)));
                clauses.push(self.set_op_operand(&op.right, right_wrap));
            }
        }
        self.common_select_clauses(&mut clauses, query);
        self.join_clauses(clauses)
    }

    fn set_op_operand(&mut self, operand: &Query, wrap: bool) -> String {
        if wrap {
            let indent = self.indent();
            self.indent_level += 1;
            let inner = self.query(operand);
            self.indent_level -= 1;
            format!(
                "{indent}({}{inner}{}{indent})",
                self.linebreak(),
                self.linebreak()
            )
        } else {
            self.query(operand)
        }
    }

    fn select_core(&mut self, clauses: &mut Vec<String>, core: &SelectCore) {
        let indent = self.indent();
        self.indent_level += 1;
        let mut lead = format!("{indent}select ");
        match &core.distinct {
            Some(DistinctClause::Distinct) => lead.push_str("distinct "),
            Some(DistinctClause::On(exprs)) => {
                let parts = self.expr_list(exprs);
                lead.push_str(&self.implode("distinct on (", &parts, ","));
                lead.push_str(") ");
            }
            None => {}
        }
        let targets: Vec<String> = core
            .target_list
            .iter()
            .map(|t| self.target_element(t))
            .collect();
        clauses.push(self.implode(&lead, &targets, ","));

        if !core.from.is_empty() {
            let parts: Vec<String> = core.from.iter().map(|f| self.from_element(f)).collect();
            clauses.push(self.implode(&format!("{indent}from "), &parts, ","));
        }
        if let Some(condition) = &core.where_clause {
            let sql = self.expr(condition);
            clauses.push(format!("{indent}where {sql}"));
        }
        if let Some(group_by) = &core.group_by {
            let lead = if group_by.distinct {
                format!("{indent}group by distinct ")
            } else {
                format!("{indent}group by ")
            };
            let parts = self.expr_list(&group_by.items);
            clauses.push(self.implode(&lead, &parts, ","));
        }
        if let Some(condition) = &core.having {
            let sql = self.expr(condition);
            clauses.push(format!("{indent}having {sql}"));
        }
        if !core.window.is_empty() {
            let parts: Vec<String> = core
                .window
                .iter()
                .map(|window| {
                    let name = window
                        .name
                        .as_ref()
                        .map_or_else(String::new, |n| self.ident(n));
                    format!("{name} as ({})", self.window_spec(window))
                })
                .collect();
            clauses.push(self.implode(&format!("{indent}window "), &parts, ","));
        }
        self.indent_level -= 1;
    }

    fn common_select_clauses(&mut self, clauses: &mut Vec<String>, query: &Query) {
        let indent = self.indent();
        self.indent_level += 1;
        if !query.order_by.is_empty() {
            let parts: Vec<String> = query
                .order_by
                .iter()
                .map(|o| self.order_by_element(o))
                .collect();
            clauses.push(self.implode(&format!("{indent}order by "), &parts, ","));
        }
        if let Some(limit) = &query.limit {
            if let Some(expr) = &limit.limit {
                if limit.with_ties {
                    let parens = expr.precedence() < ExprPrecedence::Atom;
                    let sql = self.expr(expr);
                    let sql = if parens { format!("({sql})") } else { sql };
                    clauses.push(format!("{indent}fetch first {sql} rows with ties"));
                } else {
                    let sql = self.expr(expr);
                    clauses.push(format!("{indent}limit {sql}"));
                }
            }
            if let Some(offset) = &limit.offset {
                let sql = self.expr(offset);
                clauses.push(format!("{indent}offset {sql}"));
            }
        }
        for locking in &query.locking {
            clauses.push(format!("{indent}{}", self.locking_element(locking)));
        }
        self.indent_level -= 1;
    }

    fn locking_element(&mut self, element: &LockingElement) -> String {
        let mut sql = match element.strength {
            LockingStrength::Update => "for update".to_owned(),
            LockingStrength::NoKeyUpdate => "for no key update".to_owned(),
            LockingStrength::Share => "for share".to_owned(),
            LockingStrength::KeyShare => "for key share".to_owned(),
        };
        if !element.relations.is_empty() {
            let names: Vec<String> = element
                .relations
                .iter()
                .map(|name| self.qualified_name(name))
                .collect();
            sql.push_str(" of ");
            sql.push_str(&names.join(", "));
        }
        match element.wait {
            Some(LockingWait::NoWait) => sql.push_str(" nowait"),
            Some(LockingWait::SkipLocked) => sql.push_str(" skip locked"),
            None => {}
        }
        sql
    }

    fn with_clause(&mut self, with: &WithClause) -> String {
        let indent = self.indent();
        let lead = if with.recursive {
            format!("{indent}with recursive ")
        } else {
            format!("{indent}with ")
        };
        self.indent_level += 1;
        let ctes: Vec<String> = with
            .ctes
            .iter()
            .map(|cte| {
                let mut sql = self.ident(&cte.name);
                if !cte.columns.is_empty() {
                    let cols: Vec<String> =
                        cte.columns.iter().map(|c| self.ident(c)).collect();
                    sql.push_str(&format!(" ({})", cols.join(", ")));
                }
                sql.push_str(" as ");
                match cte.materialized {
                    Some(true) => sql.push_str("materialized "),
                    Some(false) => sql.push_str("not materialized "),
                    None => {}
                }
                let body = self.parenthesized_statement(&cte.statement);
                sql.push_str(&body);
                sql
            })
            .collect();
        self.indent_level -= 1;
        self.implode(&lead, &ctes, ",")
    }

    fn parenthesized_statement(&mut self, statement: &Statement) -> String {
        let indent = self.indent();
        self.indent_level += 1;
        let inner = self.statement(statement);
        self.indent_level -= 1;
        if self.options.linebreak.is_empty() {
            format!("({inner})")
        } else {
            format!("({}{inner}{}{indent})", self.linebreak(), self.linebreak())
        }
    }

    fn parenthesized_query(&mut self, query: &Query) -> String {
        let indent = self.indent();
        self.indent_level += 1;
        let inner = self.query(query);
        self.indent_level -= 1;
        if self.options.linebreak.is_empty() {
            format!("({inner})")
        } else {
            format!("({}{inner}{}{indent})", self.linebreak(), self.linebreak())
        }
    }

    fn target_element(&mut self, element: &TargetElement) -> String {
        match element {
            TargetElement::Star => "*".to_owned(),
            TargetElement::Expr { expr, alias } => {
                let sql = self.expr(expr);
                match alias {
                    Some(alias) => format!("{sql} as {}", self.ident(alias)),
                    None => sql,
                }
            }
        }
    }

    fn order_by_element(&mut self, element: &OrderByElement) -> String {
        let mut sql = self.expr(&element.expression);
        match element.direction {
            Some(OrderByDirection::Asc) => sql.push_str(" asc"),
            Some(OrderByDirection::Desc) => sql.push_str(" desc"),
            None => {}
        }
        match element.nulls {
            Some(NullsOrder::First) => sql.push_str(" nulls first"),
            Some(NullsOrder::Last) => sql.push_str(" nulls last"),
            None => {}
        }
        sql
    }

    // -- FROM elements ------------------------------------------------------

    fn relation_alias(&mut self, alias: &RelationAlias) -> String {
        let mut sql = format!(" as {}", self.ident(&alias.alias));
        if !alias.columns.is_empty() {
            let cols: Vec<String> = alias.columns.iter().map(|c| self.ident(c)).collect();
            sql.push_str(&format!(" ({})", cols.join(", ")));
        }
        sql
    }

    fn column_definitions(&mut self, defs: &[ColumnDefinition]) -> String {
        let parts: Vec<String> = defs
            .iter()
            .map(|def| format!("{} {}", self.ident(&def.name), self.type_name(&def.type_name)))
            .collect();
        parts.join(", ")
    }

    #[allow(clippy::too_many_lines)]
    fn from_element(&mut self, element: &FromElement) -> String {
        match element {
            FromElement::Relation { name, only, alias } => {
                let mut sql = String::new();
                if *only {
                    sql.push_str("only ");
                }
                sql.push_str(&self.qualified_name(name));
                if let Some(alias) = alias {
                    sql.push_str(&self.relation_alias(alias));
                }
                sql
            }
            FromElement::Subselect {
                lateral,
                query,
                alias,
            } => {
                let mut sql = String::new();
                if *lateral {
                    sql.push_str("lateral ");
                }
                sql.push_str(&self.parenthesized_query(query));
                if let Some(alias) = alias {
                    sql.push_str(&self.relation_alias(alias));
                }
                sql
            }
            FromElement::Function {
                lateral,
                function,
                with_ordinality,
                alias,
                column_definitions,
            } => {
                let mut sql = String::new();
                if *lateral {
                    sql.push_str("lateral ");
                }
                sql.push_str(&self.expr(function));
                if *with_ordinality {
                    sql.push_str(" with ordinality");
                }
                if column_definitions.is_empty() {
                    if let Some(alias) = alias {
                        sql.push_str(&self.relation_alias(alias));
                    }
                } else {
                    let defs = self.column_definitions(column_definitions);
                    match alias {
                        Some(alias) => {
                            sql.push_str(&format!(" as {} ({defs})", self.ident(&alias.alias)));
                        }
                        None => sql.push_str(&format!(" as ({defs})")),
                    }
                }
                sql
            }
            FromElement::RowsFrom {
                lateral,
                functions,
                with_ordinality,
                alias,
            } => {
                let mut sql = String::new();
                if *lateral {
                    sql.push_str("lateral ");
                }
                let parts: Vec<String> = functions
                    .iter()
                    .map(|f| {
                        let mut part = self.expr(&f.function);
                        if !f.column_definitions.is_empty() {
                            let defs = self.column_definitions(&f.column_definitions);
                            part.push_str(&format!(" as ({defs})"));
                        }
                        part
                    })
                    .collect();
                sql.push_str(&format!("rows from ({})", parts.join(", ")));
                if *with_ordinality {
                    sql.push_str(" with ordinality");
                }
                if let Some(alias) = alias {
                    sql.push_str(&self.relation_alias(alias));
                }
                sql
            }
            FromElement::Join { join, alias } => {
                let inner = self.join_expression(join);
                match alias {
                    Some(alias) => format!("({inner}){}", self.relation_alias(alias)),
                    None => inner,
                }
            }
            FromElement::TableSample {
                relation,
                method,
                arguments,
                repeatable,
            } => {
                let mut sql = self.from_element(relation);
                sql.push_str(" tablesample ");
                sql.push_str(&self.qualified_name(method));
                sql.push_str(&format!(" ({})", self.comma_exprs(arguments)));
                if let Some(seed) = repeatable {
                    sql.push_str(&format!(" repeatable ({})", self.expr(seed)));
                }
                sql
            }
            FromElement::XmlTable {
                lateral,
                namespaces,
                row_expression,
                document_expression,
                columns,
                alias,
            } => {
                let mut sql = String::new();
                if *lateral {
                    sql.push_str("lateral ");
                }
                sql.push_str("xmltable(");
                if !namespaces.is_empty() {
                    let parts: Vec<String> = namespaces
                        .iter()
                        .map(|ns| {
                            let value = self.expr(&ns.value);
                            match &ns.alias {
                                Some(alias) => format!("{value} as {}", self.ident(alias)),
                                None => format!("default {value}"),
                            }
                        })
                        .collect();
                    sql.push_str(&format!("xmlnamespaces({}), ", parts.join(", ")));
                }
                sql.push_str(&self.expr(row_expression));
                sql.push_str(" passing ");
                sql.push_str(&self.expr(document_expression));
                let cols: Vec<String> =
                    columns.iter().map(|c| self.xml_column(c)).collect();
                sql.push_str(&format!(" columns {}", cols.join(", ")));
                sql.push(')');
                if let Some(alias) = alias {
                    sql.push_str(&self.relation_alias(alias));
                }
                sql
            }
            FromElement::JsonTable {
                lateral,
                context,
                path,
                path_name,
                passing,
                columns,
                on_error,
                alias,
            } => {
                let mut sql = String::new();
                if *lateral {
                    sql.push_str("lateral ");
                }
                sql.push_str("json_table(");
                sql.push_str(&self.json_formatted(context));
                sql.push_str(", ");
                sql.push_str(&self.expr(path));
                if let Some(name) = path_name {
                    sql.push_str(&format!(" as {}", self.ident(name)));
                }
                sql.push_str(&self.json_passing(passing));
                let cols: Vec<String> = columns
                    .iter()
                    .map(|c| self.json_table_column(c))
                    .collect();
                sql.push_str(&format!(" columns ({})", cols.join(", ")));
                if let Some(behaviour) = on_error {
                    sql.push(' ');
                    sql.push_str(&self.json_behaviour(behaviour));
                    sql.push_str(" on error");
                }
                sql.push(')');
                if let Some(alias) = alias {
                    sql.push_str(&self.relation_alias(alias));
                }
                sql
            }
        }
    }

    fn join_expression(&mut self, join: &JoinExpression) -> String {
        let left = self.from_element(&join.left);
        let right_raw = self.from_element(&join.right);
        let right = if matches!(join.right, FromElement::Join { alias: None, .. }) {
            format!("({right_raw})")
        } else {
            right_raw
        };
        let mut sql = left;
        sql.push(' ');
        if join.natural {
            sql.push_str("natural ");
        }
        sql.push_str(match join.kind {
            JoinKind::Cross => "cross join",
            JoinKind::Inner => "join",
            JoinKind::Left => "left join",
            JoinKind::Right => "right join",
            JoinKind::Full => "full join",
        });
        sql.push(' ');
        sql.push_str(&right);
        if let Some(using) = &join.using {
            let cols: Vec<String> = using.columns.iter().map(|c| self.ident(c)).collect();
            sql.push_str(&format!(" using ({})", cols.join(", ")));
            if let Some(alias) = &using.alias {
                sql.push_str(&format!(" as {}", self.ident(alias)));
            }
        }
        if let Some(on) = &join.on {
            sql.push_str(&format!(" on {}", self.expr(on)));
        }
        sql
    }

    fn xml_column(&mut self, column: &XmlColumn) -> String {
        match column {
            XmlColumn::ForOrdinality { name } => {
                format!("{} for ordinality", self.ident(name))
            }
            XmlColumn::Typed {
                name,
                type_name,
                path,
                nullable,
                default,
            } => {
                let mut sql = format!("{} {}", self.ident(name), self.type_name(type_name));
                if let Some(path) = path {
                    sql.push_str(&format!(" path {}", self.expr(path)));
                }
                if let Some(default) = default {
                    sql.push_str(&format!(" default {}", self.expr(default)));
                }
                match nullable {
                    Some(true) => sql.push_str(" null"),
                    Some(false) => sql.push_str(" not null"),
                    None => {}
                }
                sql
            }
        }
    }

    fn json_table_column(&mut self, column: &JsonTableColumn) -> String {
        match column {
            JsonTableColumn::ForOrdinality { name } => {
                format!("{} for ordinality", self.ident(name))
            }
            JsonTableColumn::Regular {
                name,
                type_name,
                format,
                path,
                wrapper,
                quotes,
                on_empty,
                on_error,
            } => {
                let mut sql = format!("{} {}", self.ident(name), self.type_name(type_name));
                if let Some(format) = format {
                    sql.push_str(&self.json_format(format));
                }
                if let Some(path) = path {
                    sql.push_str(&format!(" path {}", self.expr(path)));
                }
                if let Some(wrapper) = wrapper {
                    sql.push_str(json_wrapper_sql(*wrapper));
                }
                if let Some(quotes) = quotes {
                    sql.push_str(json_quotes_sql(*quotes));
                }
                if let Some(behaviour) = on_empty {
                    sql.push_str(&format!(" {} on empty", self.json_behaviour(behaviour)));
                }
                if let Some(behaviour) = on_error {
                    sql.push_str(&format!(" {} on error", self.json_behaviour(behaviour)));
                }
                sql
            }
            JsonTableColumn::Exists {
                name,
                type_name,
                path,
                on_error,
            } => {
                let mut sql = self.ident(name);
                if let Some(type_name) = type_name {
                    sql.push_str(&format!(" {}", self.type_name(type_name)));
                }
                sql.push_str(" exists");
                if let Some(path) = path {
                    sql.push_str(&format!(" path {}", self.expr(path)));
                }
                if let Some(behaviour) = on_error {
                    sql.push_str(&format!(" {} on error", self.json_behaviour(behaviour)));
                }
                sql
            }
            JsonTableColumn::Nested {
                path,
                path_name,
                columns,
            } => {
                let mut sql = format!("nested path {}", self.expr(path));
                if let Some(name) = path_name {
                    sql.push_str(&format!(" as {}", self.ident(name)));
                }
                let cols: Vec<String> = columns
                    .iter()
                    .map(|c| self.json_table_column(c))
                    .collect();
                sql.push_str(&format!(" columns ({})", cols.join(", ")));
                sql
            }
        }
    }

    // -- INSERT / UPDATE / DELETE / MERGE -----------------------------------

    fn set_target(&mut self, target: &SetTargetElement) -> String {
        let mut sql = self.ident(&target.name);
        sql.push_str(&self.indirection_items(&target.indirection));
        sql
    }

    fn indirection_items(&mut self, items: &[IndirectionItem]) -> String {
        let mut sql = String::new();
        for item in items {
            match item {
                IndirectionItem::Field(name) => {
                    sql.push('.');
                    sql.push_str(&self.ident(name));
                }
                IndirectionItem::Star => sql.push_str(".*"),
                IndirectionItem::Index(e) => {
                    sql.push_str(&format!("[{}]", self.expr(e)));
                }
                IndirectionItem::Slice { lower, upper } => {
                    let lower = lower.as_ref().map_or_else(String::new, |e| self.expr(e));
                    let upper = upper.as_ref().map_or_else(String::new, |e| self.expr(e));
                    sql.push_str(&format!("[{lower}:{upper}]"));
                }
            }
        }
        sql
    }

    fn set_clause(&mut self, clause: &SetClause) -> String {
        match clause {
            SetClause::Single { target, value } => {
                format!("{} = {}", self.set_target(target), self.expr(value))
            }
            SetClause::Multiple { targets, value } => {
                let targets: Vec<String> =
                    targets.iter().map(|t| self.set_target(t)).collect();
                let value = match value {
                    MultipleSetSource::Row(exprs) => {
                        format!("row({})", self.comma_exprs(exprs))
                    }
                    MultipleSetSource::Subselect(query) => self.parenthesized_query(query),
                };
                format!("({}) = {value}", targets.join(", "))
            }
        }
    }

    fn returning_clause(&mut self, clauses: &mut Vec<String>, returning: &[TargetElement]) {
        if returning.is_empty() {
            return;
        }
        let indent = self.indent();
        self.indent_level += 1;
        let parts: Vec<String> = returning.iter().map(|t| self.target_element(t)).collect();
        clauses.push(self.implode(&format!("{indent}returning "), &parts, ","));
        self.indent_level -= 1;
    }

    fn update_or_delete_target(&mut self, target: &UpdateOrDeleteTarget) -> String {
        let mut sql = String::new();
        if target.only {
            sql.push_str("only ");
        }
        sql.push_str(&self.qualified_name(&target.relation));
        if let Some(alias) = &target.alias {
            sql.push_str(&format!(" as {}", self.ident(alias)));
        }
        sql
    }

    fn insert(&mut self, insert: &Insert) -> String {
        let mut clauses = Vec::new();
        if let Some(with) = &insert.with {
            clauses.push(self.with_clause(with));
        }
        let indent = self.indent();
        let mut head = format!(
            "{indent}insert into {}",
            self.qualified_name(&insert.relation.relation)
        );
        if let Some(alias) = &insert.relation.alias {
            head.push_str(&format!(" as {}", self.ident(alias)));
        }
        if !insert.columns.is_empty() {
            let cols: Vec<String> = insert.columns.iter().map(|c| self.set_target(c)).collect();
            head.push_str(&format!(" ({})", cols.join(", ")));
        }
        match insert.overriding {
            Some(OverridingKind::System) => head.push_str(" overriding system value"),
            Some(OverridingKind::User) => head.push_str(" overriding user value"),
            None => {}
        }
        clauses.push(head);
        match &insert.values {
            Some(query) => clauses.push(self.query(query)),
            None => clauses.push(format!("{indent}default values")),
        }
        if let Some(on_conflict) = &insert.on_conflict {
            clauses.push(format!("{indent}{}", self.on_conflict(on_conflict)));
        }
        self.returning_clause(&mut clauses, &insert.returning);
        self.join_clauses(clauses)
    }

    fn on_conflict(&mut self, clause: &OnConflictClause) -> String {
        let mut sql = "on conflict".to_owned();
        match &clause.target {
            Some(ConflictTarget::IndexParameters {
                elements,
                where_clause,
            }) => {
                let parts: Vec<String> =
                    elements.iter().map(|e| self.index_element(e)).collect();
                sql.push_str(&format!(" ({})", parts.join(", ")));
                if let Some(e) = where_clause {
                    sql.push_str(&format!(" where {}", self.expr(e)));
                }
            }
            Some(ConflictTarget::Constraint(name)) => {
                sql.push_str(&format!(" on constraint {}", self.ident(name)));
            }
            None => {}
        }
        match &clause.action {
            ConflictAction::DoNothing => sql.push_str(" do nothing"),
            ConflictAction::DoUpdate { set, where_clause } => {
                let parts: Vec<String> = set.iter().map(|s| self.set_clause(s)).collect();
                sql.push_str(&format!(" do update set {}", parts.join(", ")));
                if let Some(e) = where_clause {
                    sql.push_str(&format!(" where {}", self.expr(e)));
                }
            }
        }
        sql
    }

    fn index_element(&mut self, element: &IndexElement) -> String {
        // Bare column references print unwrapped; anything else needs
        // parentheses in index_elem position.
        let mut sql = if matches!(element.expression, Expr::ColumnRef(_)) {
            self.expr(&element.expression)
        } else {
            format!("({})", self.expr(&element.expression))
        };
        if let Some(collation) = &element.collation {
            sql.push_str(&format!(" collate {}", self.qualified_name(collation)));
        }
        if let Some(opclass) = &element.opclass {
            sql.push_str(&format!(" {}", self.qualified_name(opclass)));
        }
        match element.direction {
            Some(OrderByDirection::Asc) => sql.push_str(" asc"),
            Some(OrderByDirection::Desc) => sql.push_str(" desc"),
            None => {}
        }
        match element.nulls {
            Some(NullsOrder::First) => sql.push_str(" nulls first"),
            Some(NullsOrder::Last) => sql.push_str(" nulls last"),
            None => {}
        }
        sql
    }

    fn update(&mut self, update: &Update) -> String {
        let mut clauses = Vec::new();
        if let Some(with) = &update.with {
            clauses.push(self.with_clause(with));
        }
        let indent = self.indent();
        let target = self.update_or_delete_target(&update.relation);
        clauses.push(format!("{indent}update {target}"));
        self.indent_level += 1;
        let parts: Vec<String> = update.set.iter().map(|s| self.set_clause(s)).collect();
        let set = self.implode(&format!("{indent}set "), &parts, ",");
        clauses.push(set);
        if !update.from.is_empty() {
            let parts: Vec<String> = update.from.iter().map(|f| self.from_element(f)).collect();
            clauses.push(self.implode(&format!("{indent}from "), &parts, ","));
        }
        self.indent_level -= 1;
        if let Some(e) = &update.where_clause {
            let sql = self.expr(e);
            clauses.push(format!("{indent}where {sql}"));
        }
        self.returning_clause(&mut clauses, &update.returning);
        self.join_clauses(clauses)
    }

    fn delete(&mut self, delete: &Delete) -> String {
        let mut clauses = Vec::new();
        if let Some(with) = &delete.with {
            clauses.push(self.with_clause(with));
        }
        let indent = self.indent();
        let target = self.update_or_delete_target(&delete.relation);
        clauses.push(format!("{indent}delete from {target}"));
        if !delete.using.is_empty() {
            self.indent_level += 1;
            let parts: Vec<String> = delete.using.iter().map(|f| self.from_element(f)).collect();
            let using = self.implode(&format!("{indent}using "), &parts, ",");
            clauses.push(using);
            self.indent_level -= 1;
        }
        if let Some(e) = &delete.where_clause {
            let sql = self.expr(e);
            clauses.push(format!("{indent}where {sql}"));
        }
        self.returning_clause(&mut clauses, &delete.returning);
        self.join_clauses(clauses)
    }

    fn merge(&mut self, merge: &Merge) -> String {
        let mut clauses = Vec::new();
        if let Some(with) = &merge.with {
            clauses.push(self.with_clause(with));
        }
        let indent = self.indent();
        let target = self.update_or_delete_target(&merge.relation);
        clauses.push(format!("{indent}merge into {target}"));
        let using = self.from_element(&merge.using);
        clauses.push(format!("{indent}using {using}"));
        let on = self.expr(&merge.on);
        clauses.push(format!("{indent}on {on}"));
        for when in &merge.when_clauses {
            clauses.push(format!("{indent}{}", self.merge_when(when)));
        }
        self.returning_clause(&mut clauses, &merge.returning);
        self.join_clauses(clauses)
    }

    fn merge_when(&mut self, when: &MergeWhenClause) -> String {
        let mut sql = if when.matched {
            "when matched".to_owned()
        } else {
            "when not matched".to_owned()
        };
        if let Some(condition) = &when.condition {
            sql.push_str(&format!(" and {}", self.expr(condition)));
        }
        sql.push_str(" then ");
        match &when.action {
            MergeAction::Update { set } => {
                let parts: Vec<String> = set.iter().map(|s| self.set_clause(s)).collect();
                sql.push_str(&format!("update set {}", parts.join(", ")));
            }
            MergeAction::Delete => sql.push_str("delete"),
            MergeAction::Nothing => sql.push_str("do nothing"),
            MergeAction::Insert {
                columns,
                overriding,
                values,
            } => {
                sql.push_str("insert");
                if !columns.is_empty() {
                    let cols: Vec<String> =
                        columns.iter().map(|c| self.set_target(c)).collect();
                    sql.push_str(&format!(" ({})", cols.join(", ")));
                }
                match overriding {
                    Some(OverridingKind::System) => sql.push_str(" overriding system value"),
                    Some(OverridingKind::User) => sql.push_str(" overriding user value"),
                    None => {}
                }
                match values {
                    Some(values) => {
                        sql.push_str(&format!(" values ({})", self.comma_exprs(values)));
                    }
                    None => sql.push_str(" default values"),
                }
            }
        }
        sql
    }

    // -- windows ------------------------------------------------------------

    fn window_spec(&mut self, window: &WindowDefinition) -> String {
        let mut parts = Vec::new();
        if let Some(ref_name) = &window.ref_name {
            parts.push(self.ident(ref_name));
        }
        if !window.partition_by.is_empty() {
            parts.push(format!("partition by {}", self.comma_exprs(&window.partition_by)));
        }
        if !window.order_by.is_empty() {
            let items: Vec<String> = window
                .order_by
                .iter()
                .map(|o| self.order_by_element(o))
                .collect();
            parts.push(format!("order by {}", items.join(", ")));
        }
        if let Some(frame) = &window.frame {
            let mode = match frame.mode() {
                WindowFrameMode::Rows => "rows",
                WindowFrameMode::Range => "range",
                WindowFrameMode::Groups => "groups",
            };
            let start = self.frame_bound(frame.start());
            let mut sql = match frame.end() {
                Some(end) => {
                    let end = self.frame_bound(end);
                    format!("{mode} between {start} and {end}")
                }
                None => format!("{mode} {start}"),
            };
            match frame.exclusion() {
                Some(WindowFrameExclusion::CurrentRow) => sql.push_str(" exclude current row"),
                Some(WindowFrameExclusion::Group) => sql.push_str(" exclude group"),
                Some(WindowFrameExclusion::Ties) => sql.push_str(" exclude ties"),
                Some(WindowFrameExclusion::NoOthers) => sql.push_str(" exclude no others"),
                None => {}
            }
            parts.push(sql);
        }
        parts.join(" ")
    }

    fn frame_bound(&mut self, bound: &WindowFrameBound) -> String {
        match bound {
            WindowFrameBound::UnboundedPreceding => "unbounded preceding".to_owned(),
            WindowFrameBound::Preceding(e) => format!("{} preceding", self.expr(e)),
            WindowFrameBound::CurrentRow => "current row".to_owned(),
            WindowFrameBound::Following(e) => format!("{} following", self.expr(e)),
            WindowFrameBound::UnboundedFollowing => "unbounded following".to_owned(),
        }
    }

    fn over_clause(&mut self, window: &WindowDefinition) -> String {
        if window.is_bare_reference() {
            let name = window.ref_name.as_ref().expect("bare reference has a name");
            format!(" over {}", self.ident(name))
        } else {
            format!(" over ({})", self.window_spec(window))
        }
    }

    // -- types --------------------------------------------------------------

    fn type_name(&mut self, type_name: &TypeName) -> String {
        let mut sql = String::new();
        if type_name.setof {
            sql.push_str("setof ");
        }
        sql.push_str(&self.qualified_name(&type_name.name));
        if !type_name.modifiers.is_empty() {
            sql.push_str(&format!("({})", self.comma_exprs(&type_name.modifiers)));
        }
        for bound in &type_name.array_bounds {
            match bound {
                Some(dim) => sql.push_str(&format!("[{dim}]")),
                None => sql.push_str("[]"),
            }
        }
        sql
    }

    // -- JSON helpers -------------------------------------------------------

    fn json_format(&self, format: &JsonFormat) -> String {
        match &format.encoding {
            Some(encoding) => format!(" format json encoding {}", self.ident(encoding)),
            None => " format json".to_owned(),
        }
    }

    fn json_formatted(&mut self, value: &JsonFormattedValue) -> String {
        let mut sql = self.expr(&value.expr);
        if let Some(format) = &value.format {
            sql.push_str(&self.json_format(format));
        }
        sql
    }

    fn json_returning(&mut self, returning: &Option<JsonReturning>) -> String {
        match returning {
            Some(returning) => {
                let mut sql = format!(" returning {}", self.type_name(&returning.type_name));
                if let Some(format) = &returning.format {
                    sql.push_str(&self.json_format(format));
                }
                sql
            }
            None => String::new(),
        }
    }

    fn json_behaviour(&mut self, behaviour: &JsonBehaviour) -> String {
        match behaviour {
            JsonBehaviour::Error => "error".to_owned(),
            JsonBehaviour::Null => "null".to_owned(),
            JsonBehaviour::True => "true".to_owned(),
            JsonBehaviour::False => "false".to_owned(),
            JsonBehaviour::Unknown => "unknown".to_owned(),
            JsonBehaviour::EmptyArray => "empty array".to_owned(),
            JsonBehaviour::EmptyObject => "empty object".to_owned(),
            JsonBehaviour::Default(e) => format!("default {}", self.expr(e)),
        }
    }

    fn json_passing(&mut self, passing: &[JsonArgument]) -> String {
        if passing.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = passing
            .iter()
            .map(|arg| {
                format!(
                    "{} as {}",
                    self.json_formatted(&arg.value),
                    self.ident(&arg.alias)
                )
            })
            .collect();
        format!(" passing {}", parts.join(", "))
    }

    fn json_key_value(&mut self, field: &JsonKeyValue) -> String {
        format!(
            "{} : {}",
            self.expr(&field.key),
            self.json_formatted(&field.value)
        )
    }

    fn json_null_clause(absent_on_null: Option<bool>) -> &'static str {
        match absent_on_null {
            Some(true) => " absent on null",
            Some(false) => " null on null",
            None => "",
        }
    }

    fn json_unique_clause(unique_keys: Option<bool>) -> &'static str {
        match unique_keys {
            Some(true) => " with unique keys",
            Some(false) => " without unique keys",
            None => "",
        }
    }

    fn json_behaviour_clause(&mut self, behaviour: &Option<JsonBehaviour>, when: &str) -> String {
        match behaviour {
            Some(behaviour) => format!(" {} on {when}", self.json_behaviour(behaviour)),
            None => String::new(),
        }
    }

    // -- expressions --------------------------------------------------------

    #[allow(clippy::too_many_lines)]
    fn expr(&mut self, expr: &Expr) -> String {
        match expr {
            Expr::Numeric(value) => value.clone(),
            Expr::StringLiteral { value, kind } => match kind {
                StringKind::Character => format!("'{}'", value.replace('\'', "''")),
                StringKind::Binary => format!("b'{value}'"),
                StringKind::Hex => format!("x'{value}'"),
            },
            Expr::Keyword(KeywordConstant::Null) => "null".to_owned(),
            Expr::Keyword(KeywordConstant::True) => "true".to_owned(),
            Expr::Keyword(KeywordConstant::False) => "false".to_owned(),
            Expr::Parameter(Parameter::Named(name)) => format!(":{name}"),
            Expr::Parameter(Parameter::Positional(n)) => format!("${n}"),
            Expr::ColumnRef(column) => {
                let mut sql = column
                    .parts
                    .iter()
                    .map(|p| self.ident(p))
                    .collect::<Vec<_>>()
                    .join(".");
                if column.star {
                    sql.push_str(".*");
                }
                sql
            }
            Expr::Indirection { base, items } => {
                let first_is_subscript = matches!(
                    items.first(),
                    Some(IndirectionItem::Index(_) | IndirectionItem::Slice { .. })
                );
                let need_parens = if first_is_subscript {
                    base.precedence() < ExprPrecedence::Atom
                } else {
                    !matches!(base.as_ref(), Expr::Parameter(_) | Expr::Subselect(_))
                };
                let base_sql = self.expr(base);
                let base_sql = if need_parens {
                    format!("({base_sql})")
                } else {
                    base_sql
                };
                format!("{base_sql}{}", self.indirection_items(items))
            }
            Expr::Operator(op) => {
                let operator = match &op.operator {
                    Operator::Plain(plain) => plain.as_str().to_owned(),
                    Operator::Qualified(qualified) => {
                        let mut parts: Vec<String> =
                            qualified.schema.iter().map(|i| self.ident(i)).collect();
                        parts.push(qualified.operator.as_str().to_owned());
                        format!("operator({})", parts.join("."))
                    }
                };
                let right = self.wrapped(&op.right, expr, true);
                match &op.left {
                    Some(left) => {
                        let left = self.wrapped(left, expr, false);
                        format!("{left} {operator} {right}")
                    }
                    None => format!("{operator} {right}"),
                }
            }
            Expr::Not(arg) => format!("not {}", self.wrapped(arg, expr, false)),
            Expr::And(left, right) => {
                let left = self.wrapped(left, expr, false);
                let right = self.wrapped(right, expr, true);
                format!("{left} and {right}")
            }
            Expr::Or(left, right) => {
                let left = self.wrapped(left, expr, false);
                let right = self.wrapped(right, expr, true);
                format!("{left} or {right}")
            }
            Expr::Is {
                arg,
                predicate,
                not,
            } => {
                let arg = self.wrapped(arg, expr, false);
                let not = if *not { "not " } else { "" };
                let predicate = match predicate {
                    crate::expr::IsPredicate::Null => "null",
                    crate::expr::IsPredicate::True => "true",
                    crate::expr::IsPredicate::False => "false",
                    crate::expr::IsPredicate::Unknown => "unknown",
                    crate::expr::IsPredicate::Document => "document",
                };
                format!("{arg} is {not}{predicate}")
            }
            Expr::IsDistinctFrom { left, right, not } => {
                let left = self.wrapped(left, expr, false);
                let right = self.wrapped(right, expr, true);
                let not = if *not { "not " } else { "" };
                format!("{left} is {not}distinct from {right}")
            }
            Expr::IsOf { arg, types, not } => {
                let arg = self.wrapped(arg, expr, false);
                let types: Vec<String> = types.iter().map(|t| self.type_name(t)).collect();
                let not = if *not { "not " } else { "" };
                format!("{arg} is {not}of ({})", types.join(", "))
            }
            Expr::IsJson {
                arg,
                item_kind,
                unique_keys,
                not,
            } => {
                let arg = self.wrapped(arg, expr, false);
                let not = if *not { "not " } else { "" };
                let kind = match item_kind {
                    Some(JsonItemKind::Value) => " value",
                    Some(JsonItemKind::Array) => " array",
                    Some(JsonItemKind::Object) => " object",
                    Some(JsonItemKind::Scalar) => " scalar",
                    None => "",
                };
                format!(
                    "{arg} is {not}json{kind}{}",
                    Self::json_unique_clause(*unique_keys)
                )
            }
            Expr::IsNormalized { arg, form, not } => {
                let arg = self.wrapped(arg, expr, false);
                let not = if *not { "not " } else { "" };
                let form = form.map_or("", |f| match f {
                    NormalForm::Nfc => "nfc ",
                    NormalForm::Nfd => "nfd ",
                    NormalForm::Nfkc => "nfkc ",
                    NormalForm::Nfkd => "nfkd ",
                });
                format!("{arg} is {not}{form}normalized")
            }
            Expr::Between {
                arg,
                low,
                high,
                kind,
                not,
            } => {
                let arg = self.wrapped(arg, expr, false);
                let low = self.wrapped(low, expr, true);
                let high = self.wrapped(high, expr, true);
                let not = if *not { "not " } else { "" };
                let kind = match kind {
                    crate::expr::BetweenKind::Plain => "",
                    crate::expr::BetweenKind::Symmetric => "symmetric ",
                    crate::expr::BetweenKind::Asymmetric => "asymmetric ",
                };
                format!("{arg} {not}between {kind}{low} and {high}")
            }
            Expr::PatternMatch {
                arg,
                pattern,
                escape,
                op,
                not,
            } => {
                let arg = self.wrapped(arg, expr, false);
                let pattern = self.wrapped(pattern, expr, true);
                let not = if *not { "not " } else { "" };
                let op = match op {
                    PatternOp::Like => "like",
                    PatternOp::ILike => "ilike",
                    PatternOp::SimilarTo => "similar to",
                };
                let mut sql = format!("{arg} {not}{op} {pattern}");
                if let Some(escape) = escape {
                    let escape = self.wrapped(escape, expr, true);
                    sql.push_str(&format!(" escape {escape}"));
                }
                sql
            }
            Expr::In { arg, rhs, not } => {
                let arg = self.wrapped(arg, expr, false);
                let not = if *not { "not " } else { "" };
                let rhs = match rhs {
                    InRhs::List(items) => format!("({})", self.comma_exprs(items)),
                    InRhs::Subselect(query) => self.parenthesized_query(query),
                };
                format!("{arg} {not}in {rhs}")
            }
            Expr::Overlaps { left, right } => {
                // Both arguments can only be row literals; no parentheses
                // decisions needed.
                format!(
                    "({}, {}) overlaps ({}, {})",
                    self.expr(&left.0),
                    self.expr(&left.1),
                    self.expr(&right.0),
                    self.expr(&right.1)
                )
            }
            Expr::Case(case) => self.case_expression(case),
            Expr::Typecast { arg, target } => {
                let arg = self.wrapped(arg, expr, false);
                format!("{arg}::{}", self.type_name(target))
            }
            Expr::Collate { arg, collation } => {
                let arg = self.wrapped(arg, expr, false);
                format!("{arg} collate {}", self.qualified_name(collation))
            }
            Expr::AtTimeZone { arg, zone } => {
                let arg = self.wrapped(arg, expr, false);
                let zone = self.wrapped(zone, expr, true);
                format!("{arg} at time zone {zone}")
            }
            Expr::AtLocal(arg) => {
                let arg = self.wrapped(arg, expr, false);
                format!("{arg} at local")
            }
            Expr::Array(elements) => format!("array{}", self.array_literal(elements)),
            Expr::ArraySubselect(query) => {
                format!("array{}", self.parenthesized_query(query))
            }
            Expr::Row { elements, explicit } => {
                if *explicit {
                    format!("row({})", self.comma_exprs(elements))
                } else {
                    format!("({})", self.comma_exprs(elements))
                }
            }
            Expr::Subselect(query) => self.parenthesized_query(query),
            Expr::Exists { query, not } => {
                let not = if *not { "not " } else { "" };
                format!("{not}exists {}", self.parenthesized_query(query))
            }
            Expr::ArrayComparison { kind, argument } => {
                let kind = match kind {
                    crate::expr::SubLinkKind::Any => "any",
                    crate::expr::SubLinkKind::All => "all",
                };
                let argument = match argument {
                    ArrayComparisonArg::Subselect(query) => self.parenthesized_query(query),
                    ArrayComparisonArg::Array(e) => format!("({})", self.expr(e)),
                };
                format!("{kind}{argument}")
            }
            Expr::FunctionCall(call) => self.function_call(call),
            Expr::ValueFunction(function) => {
                let name = match function.name {
                    SqlValueFunctionName::CurrentDate => "current_date",
                    SqlValueFunctionName::CurrentTime => "current_time",
                    SqlValueFunctionName::CurrentTimestamp => "current_timestamp",
                    SqlValueFunctionName::LocalTime => "localtime",
                    SqlValueFunctionName::LocalTimestamp => "localtimestamp",
                    SqlValueFunctionName::CurrentRole => "current_role",
                    SqlValueFunctionName::CurrentUser => "current_user",
                    SqlValueFunctionName::SessionUser => "session_user",
                    SqlValueFunctionName::User => "user",
                    SqlValueFunctionName::CurrentCatalog => "current_catalog",
                    SqlValueFunctionName::CurrentSchema => "current_schema",
                };
                match &function.precision {
                    Some(precision) => format!("{name}({precision})"),
                    None => name.to_owned(),
                }
            }
            Expr::Extract { field, source } => {
                format!("extract({} from {})", field.as_str(), self.expr(source))
            }
            Expr::Overlay {
                string,
                replacement,
                start,
                count,
            } => {
                let mut sql = format!(
                    "overlay({} placing {} from {}",
                    self.expr(string),
                    self.expr(replacement),
                    self.expr(start)
                );
                if let Some(count) = count {
                    sql.push_str(&format!(" for {}", self.expr(count)));
                }
                sql.push(')');
                sql
            }
            Expr::Position { substring, string } => {
                format!(
                    "position({} in {})",
                    self.expr(substring),
                    self.expr(string)
                )
            }
            Expr::Substring {
                string,
                from,
                for_count,
            } => {
                let mut sql = format!("substring({}", self.expr(string));
                if let Some(from) = from {
                    sql.push_str(&format!(" from {}", self.expr(from)));
                }
                if let Some(for_count) = for_count {
                    sql.push_str(&format!(" for {}", self.expr(for_count)));
                }
                sql.push(')');
                sql
            }
            Expr::SubstringSimilar {
                string,
                pattern,
                escape,
            } => {
                format!(
                    "substring({} similar {} escape {})",
                    self.expr(string),
                    self.expr(pattern),
                    self.expr(escape)
                )
            }
            Expr::Trim {
                side,
                characters,
                string,
            } => {
                let side = match side {
                    TrimSide::Both => "both",
                    TrimSide::Leading => "leading",
                    TrimSide::Trailing => "trailing",
                };
                let mut sql = format!("trim({side}");
                if let Some(characters) = characters {
                    sql.push_str(&format!(" {}", self.expr(characters)));
                }
                sql.push_str(&format!(" from {})", self.expr(string)));
                sql
            }
            Expr::Normalize { arg, form } => {
                let mut sql = format!("normalize({}", self.expr(arg));
                if let Some(form) = form {
                    sql.push_str(match form {
                        NormalForm::Nfc => ", nfc",
                        NormalForm::Nfd => ", nfd",
                        NormalForm::Nfkc => ", nfkc",
                        NormalForm::Nfkd => ", nfkd",
                    });
                }
                sql.push(')');
                sql
            }
            Expr::NullIf(first, second) => {
                format!("nullif({}, {})", self.expr(first), self.expr(second))
            }
            Expr::Coalesce(args) => format!("coalesce({})", self.comma_exprs(args)),
            Expr::MinMax { kind, args } => {
                let name = match kind {
                    MinMaxKind::Greatest => "greatest",
                    MinMaxKind::Least => "least",
                };
                format!("{name}({})", self.comma_exprs(args))
            }
            Expr::CollationFor(arg) => format!("collation for ({})", self.expr(arg)),
            Expr::SetToDefault => "default".to_owned(),

            Expr::Json { value, unique_keys } => {
                format!(
                    "json({}{})",
                    self.json_formatted(value),
                    Self::json_unique_clause(*unique_keys)
                )
            }
            Expr::JsonScalar(arg) => format!("json_scalar({})", self.expr(arg)),
            Expr::JsonSerialize { value, returning } => {
                format!(
                    "json_serialize({}{})",
                    self.json_formatted(value),
                    self.json_returning(returning)
                )
            }
            Expr::JsonObject {
                fields,
                absent_on_null,
                unique_keys,
                returning,
            } => {
                let fields: Vec<String> =
                    fields.iter().map(|f| self.json_key_value(f)).collect();
                format!(
                    "json_object({}{}{}{})",
                    fields.join(", "),
                    Self::json_null_clause(*absent_on_null),
                    Self::json_unique_clause(*unique_keys),
                    self.json_returning(returning)
                )
            }
            Expr::JsonArray { content, returning } => {
                let content = match content {
                    JsonArrayContent::Values {
                        elements,
                        absent_on_null,
                    } => {
                        let elements: Vec<String> =
                            elements.iter().map(|e| self.json_formatted(e)).collect();
                        format!(
                            "{}{}",
                            elements.join(", "),
                            Self::json_null_clause(*absent_on_null)
                        )
                    }
                    JsonArrayContent::Subselect { query, format } => {
                        let mut sql = self.parenthesized_query(query);
                        if let Some(format) = format {
                            sql.push_str(&self.json_format(format));
                        }
                        sql
                    }
                };
                format!("json_array({content}{})", self.json_returning(returning))
            }
            Expr::JsonObjectAgg {
                field,
                absent_on_null,
                unique_keys,
                returning,
                filter,
                over,
            } => {
                let mut sql = format!(
                    "json_objectagg({}{}{}{})",
                    self.json_key_value(field),
                    Self::json_null_clause(*absent_on_null),
                    Self::json_unique_clause(*unique_keys),
                    self.json_returning(returning)
                );
                if let Some(filter) = filter {
                    sql.push_str(&format!(" filter (where {})", self.expr(filter)));
                }
                if let Some(over) = over {
                    sql.push_str(&self.over_clause(over));
                }
                sql
            }
            Expr::JsonArrayAgg {
                value,
                order_by,
                absent_on_null,
                returning,
                filter,
                over,
            } => {
                let mut sql = format!("json_arrayagg({}", self.json_formatted(value));
                if !order_by.is_empty() {
                    let items: Vec<String> = order_by
                        .iter()
                        .map(|o| self.order_by_element(o))
                        .collect();
                    sql.push_str(&format!(" order by {}", items.join(", ")));
                }
                sql.push_str(Self::json_null_clause(*absent_on_null));
                sql.push_str(&self.json_returning(returning));
                sql.push(')');
                if let Some(filter) = filter {
                    sql.push_str(&format!(" filter (where {})", self.expr(filter)));
                }
                if let Some(over) = over {
                    sql.push_str(&self.over_clause(over));
                }
                sql
            }
            Expr::JsonExists {
                context,
                path,
                passing,
                on_error,
            } => {
                format!(
                    "json_exists({}, {}{}{})",
                    self.json_formatted(context),
                    self.expr(path),
                    self.json_passing(passing),
                    self.json_behaviour_clause(on_error, "error")
                )
            }
            Expr::JsonValue {
                context,
                path,
                passing,
                returning,
                on_empty,
                on_error,
            } => {
                format!(
                    "json_value({}, {}{}{}{}{})",
                    self.json_formatted(context),
                    self.expr(path),
                    self.json_passing(passing),
                    self.json_returning(returning),
                    self.json_behaviour_clause(on_empty, "empty"),
                    self.json_behaviour_clause(on_error, "error")
                )
            }
            Expr::JsonQuery {
                context,
                path,
                passing,
                returning,
                wrapper,
                quotes,
                on_empty,
                on_error,
            } => {
                format!(
                    "json_query({}, {}{}{}{}{}{}{})",
                    self.json_formatted(context),
                    self.expr(path),
                    self.json_passing(passing),
                    self.json_returning(returning),
                    wrapper.map_or("", |w| json_wrapper_sql(w)),
                    quotes.map_or("", |q| json_quotes_sql(q)),
                    self.json_behaviour_clause(on_empty, "empty"),
                    self.json_behaviour_clause(on_error, "error")
                )
            }

            Expr::XmlConcat(args) => format!("xmlconcat({})", self.comma_exprs(args)),
            Expr::XmlElement {
                name,
                attributes,
                content,
            } => {
                let mut sql = format!("xmlelement(name {}", self.ident(name));
                if !attributes.is_empty() {
                    let attrs: Vec<String> = attributes
                        .iter()
                        .map(|a| {
                            let value = self.expr(&a.value);
                            match &a.name {
                                Some(name) => format!("{value} as {}", self.ident(name)),
                                None => value,
                            }
                        })
                        .collect();
                    sql.push_str(&format!(", xmlattributes({})", attrs.join(", ")));
                }
                if !content.is_empty() {
                    sql.push_str(&format!(", {}", self.comma_exprs(content)));
                }
                sql.push(')');
                sql
            }
            Expr::XmlExists { query, document } => {
                format!(
                    "xmlexists({} passing {})",
                    self.expr(query),
                    self.expr(document)
                )
            }
            Expr::XmlForest(attributes) => {
                let attrs: Vec<String> = attributes
                    .iter()
                    .map(|a| {
                        let value = self.expr(&a.value);
                        match &a.name {
                            Some(name) => format!("{value} as {}", self.ident(name)),
                            None => value,
                        }
                    })
                    .collect();
                format!("xmlforest({})", attrs.join(", "))
            }
            Expr::XmlParse {
                option,
                argument,
                preserve_whitespace,
            } => {
                let option = xml_option_sql(*option);
                let mut sql = format!("xmlparse({option} {}", self.expr(argument));
                if *preserve_whitespace {
                    sql.push_str(" preserve whitespace");
                }
                sql.push(')');
                sql
            }
            Expr::XmlPi { name, content } => {
                let mut sql = format!("xmlpi(name {}", self.ident(name));
                if let Some(content) = content {
                    sql.push_str(&format!(", {}", self.expr(content)));
                }
                sql.push(')');
                sql
            }
            Expr::XmlRoot {
                xml,
                version,
                standalone,
            } => {
                let mut sql = format!("xmlroot({}, version ", self.expr(xml));
                match version {
                    Some(version) => sql.push_str(&self.expr(version)),
                    None => sql.push_str("no value"),
                }
                match standalone {
                    Some(XmlStandalone::Yes) => sql.push_str(", standalone yes"),
                    Some(XmlStandalone::No) => sql.push_str(", standalone no"),
                    Some(XmlStandalone::NoValue) => sql.push_str(", standalone no value"),
                    None => {}
                }
                sql.push(')');
                sql
            }
            Expr::XmlSerialize {
                option,
                argument,
                type_name,
                indent,
            } => {
                let option = xml_option_sql(*option);
                let mut sql = format!(
                    "xmlserialize({option} {} as {}",
                    self.expr(argument),
                    self.type_name(type_name)
                );
                match indent {
                    Some(true) => sql.push_str(" indent"),
                    Some(false) => sql.push_str(" no indent"),
                    None => {}
                }
                sql.push(')');
                sql
            }
        }
    }

    fn array_literal(&mut self, elements: &[Expr]) -> String {
        let parts: Vec<String> = elements
            .iter()
            .map(|e| match e {
                // Nested array literals drop the keyword.
                Expr::Array(inner) => self.array_literal(inner),
                _ => self.expr(e),
            })
            .collect();
        format!("[{}]", parts.join(", "))
    }

    fn case_expression(&mut self, case: &CaseExpression) -> String {
        let mut sql = "case".to_owned();
        if let Some(argument) = &case.argument {
            sql.push_str(&format!(" {}", self.expr(argument)));
        }
        for when in &case.when_clauses {
            sql.push_str(&format!(
                " when {} then {}",
                self.expr(&when.condition),
                self.expr(&when.result)
            ));
        }
        if let Some(else_clause) = &case.else_clause {
            sql.push_str(&format!(" else {}", self.expr(else_clause)));
        }
        sql.push_str(" end");
        sql
    }

    fn function_call(&mut self, call: &FunctionCall) -> String {
        let mut sql = self.qualified_name(&call.name);
        sql.push('(');
        if call.distinct {
            sql.push_str("distinct ");
        }
        match &call.arguments {
            FunctionArguments::Star => sql.push('*'),
            FunctionArguments::List { args, variadic } => {
                let total = args.len();
                let parts: Vec<String> = args
                    .iter()
                    .enumerate()
                    .map(|(i, arg)| {
                        let mut part = String::new();
                        if *variadic && i + 1 == total {
                            part.push_str("variadic ");
                        }
                        if let Some(name) = &arg.name {
                            part.push_str(&format!("{} => ", self.ident(name)));
                        }
                        part.push_str(&self.expr(&arg.value));
                        part
                    })
                    .collect();
                sql.push_str(&parts.join(", "));
            }
        }
        if !call.within_group && !call.order_by.is_empty() {
            let items: Vec<String> = call
                .order_by
                .iter()
                .map(|o| self.order_by_element(o))
                .collect();
            sql.push_str(&format!(" order by {}", items.join(", ")));
        }
        sql.push(')');
        if call.within_group && !call.order_by.is_empty() {
            let items: Vec<String> = call
                .order_by
                .iter()
                .map(|o| self.order_by_element(o))
                .collect();
            sql.push_str(&format!(" within group (order by {})", items.join(", ")));
        }
        if let Some(filter) = &call.filter {
            sql.push_str(&format!(" filter (where {})", self.expr(filter)));
        }
        if let Some(over) = &call.over {
            sql.push_str(&self.over_clause(over));
        }
        sql
    }
}

fn set_operator_sql(operator: SetOperator) -> &'static str {
    match operator {
        SetOperator::Union => "union",
        SetOperator::UnionAll => "union all",
        SetOperator::Intersect => "intersect",
        SetOperator::IntersectAll => "intersect all",
        SetOperator::Except => "except",
        SetOperator::ExceptAll => "except all",
    }
}

fn json_wrapper_sql(wrapper: JsonWrapper) -> &'static str {
    match wrapper {
        JsonWrapper::Without => " without wrapper",
        JsonWrapper::Conditional => " with conditional wrapper",
        JsonWrapper::Unconditional => " with unconditional wrapper",
    }
}

fn json_quotes_sql(quotes: JsonQuotes) -> &'static str {
    match quotes {
        JsonQuotes::Keep => " keep quotes",
        JsonQuotes::Omit => " omit quotes",
    }
}

fn xml_option_sql(option: XmlOption) -> &'static str {
    match option {
        XmlOption::Document => "document",
        XmlOption::Content => "content",
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sql = SqlBuilder::single_line().build(self).map_err(|_| fmt::Error)?;
        f.write_str(&sql)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = SqlBuilder::single_line();
        f.write_str(&builder.query(self))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = SqlBuilder::single_line();
        let sql = builder.build_expr(self).map_err(|_| fmt::Error)?;
        f.write_str(&sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::OperatorExpression;

    fn binop(op: &str, left: Expr, right: Expr) -> Expr {
        Expr::Operator(OperatorExpression::binary(op, left, right).unwrap())
    }

    fn build_expr(expr: &Expr, mode: ParenthesesMode) -> String {
        let mut builder =
            SqlBuilder::new(BuilderOptions::single_line().with_parentheses(mode));
        builder.build_expr(expr).unwrap()
    }

    fn select(targets: Vec<TargetElement>) -> Statement {
        Statement::Select(Query::plain(QueryBody::Select(Box::new(
            SelectCore::simple(targets),
        ))))
    }

    #[test]
    fn test_right_nested_equals_modes() {
        // foo = (bar = baz)
        let expr = binop(
            "=",
            Expr::column("foo"),
            binop("=", Expr::column("bar"), Expr::column("baz")),
        );
        assert_eq!(
            build_expr(&expr, ParenthesesMode::Current),
            "foo = bar = baz"
        );
        assert_eq!(
            build_expr(&expr, ParenthesesMode::Compat),
            "foo = (bar = baz)"
        );
    }

    #[test]
    fn test_left_nested_comparison_always_wrapped() {
        // (a >= b) <= c must keep its parentheses in both modes
        let expr = binop(
            "<=",
            binop(">=", Expr::column("a"), Expr::column("b")),
            Expr::column("c"),
        );
        assert_eq!(
            build_expr(&expr, ParenthesesMode::Current),
            "(a >= b) <= c"
        );
        assert_eq!(
            build_expr(&expr, ParenthesesMode::Compat),
            "(a >= b) <= c"
        );
    }

    #[test]
    fn test_compat_wraps_is_argument() {
        let expr = Expr::Is {
            arg: Box::new(binop("=", Expr::column("a"), Expr::column("b"))),
            predicate: crate::expr::IsPredicate::Null,
            not: false,
        };
        assert_eq!(build_expr(&expr, ParenthesesMode::Current), "a = b is null");
        assert_eq!(
            build_expr(&expr, ParenthesesMode::Compat),
            "(a = b) is null"
        );
    }

    #[test]
    fn test_arithmetic_associativity_parens() {
        // a - (b - c) keeps parens, (a - b) - c drops them
        let right_nested = binop(
            "-",
            Expr::column("a"),
            binop("-", Expr::column("b"), Expr::column("c")),
        );
        assert_eq!(
            build_expr(&right_nested, ParenthesesMode::Current),
            "a - (b - c)"
        );
        let left_nested = binop(
            "-",
            binop("-", Expr::column("a"), Expr::column("b")),
            Expr::column("c"),
        );
        assert_eq!(
            build_expr(&left_nested, ParenthesesMode::Current),
            "a - b - c"
        );
    }

    #[test]
    fn test_unary_minus_spacing() {
        let expr = Expr::Operator(
            OperatorExpression::unary(
                "-",
                Expr::Operator(OperatorExpression::unary("-", Expr::number("1")).unwrap()),
            )
            .unwrap(),
        );
        // A space after the operator keeps `--` from becoming a comment.
        assert_eq!(build_expr(&expr, ParenthesesMode::Current), "- - 1");
    }

    #[test]
    fn test_and_or_mixing() {
        let expr = Expr::And(
            Box::new(Expr::Or(
                Box::new(Expr::column("a")),
                Box::new(Expr::column("b")),
            )),
            Box::new(Expr::column("c")),
        );
        assert_eq!(
            build_expr(&expr, ParenthesesMode::Current),
            "(a or b) and c"
        );
    }

    #[test]
    fn test_identifier_quoting() {
        let builder = SqlBuilder::single_line();
        assert_eq!(builder.ident(&Identifier::new("simple")), "simple");
        assert_eq!(builder.ident(&Identifier::new("select")), "\"select\"");
        assert_eq!(builder.ident(&Identifier::new("MixedCase")), "\"MixedCase\"");
        assert_eq!(
            builder.ident(&Identifier::new("with\"quote")),
            "\"with\"\"quote\""
        );
    }

    #[test]
    fn test_single_line_statement() {
        let stmt = select(vec![
            TargetElement::Expr {
                expr: Expr::column("id"),
                alias: None,
            },
            TargetElement::Expr {
                expr: Expr::column("name"),
                alias: Some(Identifier::new("n")),
            },
        ]);
        assert_eq!(stmt.to_string(), "select id, name as n");
    }

    #[test]
    fn test_multiline_statement_layout() {
        let mut core = SelectCore::simple(vec![TargetElement::Star]);
        core.from.push(FromElement::Relation {
            name: QualifiedName::bare("users"),
            only: false,
            alias: None,
        });
        core.where_clause = Some(binop("=", Expr::column("id"), Expr::number("1")));
        let stmt = Statement::Select(Query::plain(QueryBody::Select(Box::new(core))));
        let sql = SqlBuilder::new(BuilderOptions::default()).build(&stmt).unwrap();
        assert_eq!(sql, "select *\nfrom users\nwhere id = 1");
    }

    #[test]
    fn test_forbid_named_parameters() {
        let stmt = select(vec![TargetElement::Expr {
            expr: Expr::Parameter(Parameter::Named("foo".to_owned())),
            alias: None,
        }]);
        let options = BuilderOptions {
            forbid_named_parameters: true,
            ..BuilderOptions::single_line()
        };
        let err = SqlBuilder::new(options).build(&stmt).unwrap_err();
        assert_eq!(
            err,
            NodeError::NamedParameterForbidden {
                name: "foo".to_owned()
            }
        );
        // allowed by default
        assert_eq!(stmt.to_string(), "select :foo");
    }

    #[test]
    fn test_typecast_chain() {
        let expr = Expr::Typecast {
            arg: Box::new(Expr::Typecast {
                arg: Box::new(Expr::column("x")),
                target: TypeName::plain(QualifiedName::bare("int4")),
            }),
            target: TypeName::plain(QualifiedName::bare("text")),
        };
        assert_eq!(build_expr(&expr, ParenthesesMode::Current), "x::int4::text");
    }

    #[test]
    fn test_not_wraps_nested_not() {
        let expr = Expr::Not(Box::new(Expr::Not(Box::new(Expr::column("a")))));
        assert_eq!(build_expr(&expr, ParenthesesMode::Current), "not (not a)");
    }
}
