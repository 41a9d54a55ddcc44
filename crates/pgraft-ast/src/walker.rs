//! Tree walkers.
//!
//! [`Walker`] and [`MutWalker`] are the visitor seams of the AST: one
//! method per node family, each defaulting to the matching free `walk_*`
//! function that recurses into children. A walker that overrides nothing is
//! a no-op traversal; overriding a method and *not* calling the free
//! function prunes that subtree.
//!
//! The free functions hold the exhaustive matches, so adding an AST variant
//! fails compilation here until traversal handles it — the compile-time
//! version of a "visits everything" conformance suite.

use crate::expr::{
    ArrayComparisonArg, CaseExpression, Expr, FunctionArguments, FunctionCall, InRhs,
    IndirectionItem, JsonArgument, JsonArrayContent, JsonBehaviour, JsonFormattedValue,
    JsonKeyValue, JsonReturning, TypeName,
};
use crate::stmt::{
    CommonTableExpression, ConflictAction, ConflictTarget, Delete, DistinctClause, FromElement,
    GroupByClause, IndexElement, Insert, JsonTableColumn, LimitClause, LockingElement, Merge,
    MergeAction, MergeWhenClause, MultipleSetSource, OnConflictClause, OrderByElement, Query,
    QueryBody, SelectCore, SetClause, SetTargetElement, Statement, TargetElement, Update,
    WindowDefinition, WindowFrameBound, WithClause, XmlColumn,
};

// ---------------------------------------------------------------------------
// Read-only walker
// ---------------------------------------------------------------------------

/// Read-only traversal over an AST.
pub trait Walker {
    fn walk_statement(&mut self, statement: &Statement) {
        walk_statement(self, statement);
    }
    fn walk_query(&mut self, query: &Query) {
        walk_query(self, query);
    }
    fn walk_select_core(&mut self, core: &SelectCore) {
        walk_select_core(self, core);
    }
    fn walk_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }
    fn walk_target_element(&mut self, element: &TargetElement) {
        walk_target_element(self, element);
    }
    fn walk_from_element(&mut self, element: &FromElement) {
        walk_from_element(self, element);
    }
    fn walk_order_by_element(&mut self, element: &OrderByElement) {
        walk_order_by_element(self, element);
    }
    fn walk_window_definition(&mut self, window: &WindowDefinition) {
        walk_window_definition(self, window);
    }
    fn walk_function_call(&mut self, call: &FunctionCall) {
        walk_function_call(self, call);
    }
    fn walk_type_name(&mut self, type_name: &TypeName) {
        walk_type_name(self, type_name);
    }
    fn walk_with_clause(&mut self, with: &WithClause) {
        walk_with_clause(self, with);
    }
    fn walk_cte(&mut self, cte: &CommonTableExpression) {
        walk_cte(self, cte);
    }
    fn walk_set_clause(&mut self, clause: &SetClause) {
        walk_set_clause(self, clause);
    }
    fn walk_on_conflict(&mut self, clause: &OnConflictClause) {
        walk_on_conflict(self, clause);
    }
    fn walk_merge_when(&mut self, when: &MergeWhenClause) {
        walk_merge_when(self, when);
    }
    fn walk_locking_element(&mut self, element: &LockingElement) {
        walk_locking_element(self, element);
    }
}

pub fn walk_statement<W: Walker + ?Sized>(w: &mut W, statement: &Statement) {
    match statement {
        Statement::Select(query) => w.walk_query(query),
        Statement::Insert(insert) => walk_insert(w, insert),
        Statement::Update(update) => walk_update(w, update),
        Statement::Delete(delete) => walk_delete(w, delete),
        Statement::Merge(merge) => walk_merge(w, merge),
    }
}

pub fn walk_query<W: Walker + ?Sized>(w: &mut W, query: &Query) {
    if let Some(with) = &query.with {
        w.walk_with_clause(with);
    }
    match &query.body {
        QueryBody::Select(core) => w.walk_select_core(core),
        QueryBody::Values(rows) => {
            for row in rows {
                for expr in row {
                    w.walk_expr(expr);
                }
            }
        }
        QueryBody::SetOp(op) => {
            w.walk_query(&op.left);
            w.walk_query(&op.right);
        }
    }
    for element in &query.order_by {
        w.walk_order_by_element(element);
    }
    if let Some(limit) = &query.limit {
        walk_limit(w, limit);
    }
    for element in &query.locking {
        w.walk_locking_element(element);
    }
}

fn walk_limit<W: Walker + ?Sized>(w: &mut W, limit: &LimitClause) {
    if let Some(expr) = &limit.limit {
        w.walk_expr(expr);
    }
    if let Some(expr) = &limit.offset {
        w.walk_expr(expr);
    }
}

pub fn walk_select_core<W: Walker + ?Sized>(w: &mut W, core: &SelectCore) {
    if let Some(DistinctClause::On(exprs)) = &core.distinct {
        for expr in exprs {
            w.walk_expr(expr);
        }
    }
    for element in &core.target_list {
        w.walk_target_element(element);
    }
    for element in &core.from {
        w.walk_from_element(element);
    }
    if let Some(expr) = &core.where_clause {
        w.walk_expr(expr);
    }
    if let Some(GroupByClause { items, .. }) = &core.group_by {
        for expr in items {
            w.walk_expr(expr);
        }
    }
    if let Some(expr) = &core.having {
        w.walk_expr(expr);
    }
    for window in &core.window {
        w.walk_window_definition(window);
    }
}

pub fn walk_target_element<W: Walker + ?Sized>(w: &mut W, element: &TargetElement) {
    match element {
        TargetElement::Star => {}
        TargetElement::Expr { expr, .. } => w.walk_expr(expr),
    }
}

pub fn walk_with_clause<W: Walker + ?Sized>(w: &mut W, with: &WithClause) {
    for cte in &with.ctes {
        w.walk_cte(cte);
    }
}

pub fn walk_cte<W: Walker + ?Sized>(w: &mut W, cte: &CommonTableExpression) {
    w.walk_statement(&cte.statement);
}

pub fn walk_order_by_element<W: Walker + ?Sized>(w: &mut W, element: &OrderByElement) {
    w.walk_expr(&element.expression);
}

pub fn walk_locking_element<W: Walker + ?Sized>(_w: &mut W, _element: &LockingElement) {
    // Only relation names below this point.
}

pub fn walk_window_definition<W: Walker + ?Sized>(w: &mut W, window: &WindowDefinition) {
    for expr in &window.partition_by {
        w.walk_expr(expr);
    }
    for element in &window.order_by {
        w.walk_order_by_element(element);
    }
    if let Some(frame) = &window.frame {
        for bound in [Some(frame.start()), frame.end()].into_iter().flatten() {
            if let WindowFrameBound::Preceding(e) | WindowFrameBound::Following(e) = bound {
                w.walk_expr(e);
            }
        }
    }
}

pub fn walk_type_name<W: Walker + ?Sized>(w: &mut W, type_name: &TypeName) {
    for modifier in &type_name.modifiers {
        w.walk_expr(modifier);
    }
}

pub fn walk_function_call<W: Walker + ?Sized>(w: &mut W, call: &FunctionCall) {
    match &call.arguments {
        FunctionArguments::Star => {}
        FunctionArguments::List { args, .. } => {
            for arg in args {
                w.walk_expr(&arg.value);
            }
        }
    }
    for element in &call.order_by {
        w.walk_order_by_element(element);
    }
    if let Some(filter) = &call.filter {
        w.walk_expr(filter);
    }
    if let Some(over) = &call.over {
        w.walk_window_definition(over);
    }
}

fn walk_json_formatted<W: Walker + ?Sized>(w: &mut W, value: &JsonFormattedValue) {
    w.walk_expr(&value.expr);
}

fn walk_json_returning<W: Walker + ?Sized>(w: &mut W, returning: &Option<JsonReturning>) {
    if let Some(r) = returning {
        w.walk_type_name(&r.type_name);
    }
}

fn walk_json_behaviour<W: Walker + ?Sized>(w: &mut W, behaviour: &Option<JsonBehaviour>) {
    if let Some(JsonBehaviour::Default(expr)) = behaviour {
        w.walk_expr(expr);
    }
}

fn walk_json_passing<W: Walker + ?Sized>(w: &mut W, passing: &[JsonArgument]) {
    for arg in passing {
        walk_json_formatted(w, &arg.value);
    }
}

fn walk_json_key_value<W: Walker + ?Sized>(w: &mut W, field: &JsonKeyValue) {
    w.walk_expr(&field.key);
    walk_json_formatted(w, &field.value);
}

#[allow(clippy::too_many_lines)]
pub fn walk_expr<W: Walker + ?Sized>(w: &mut W, expr: &Expr) {
    match expr {
        Expr::Numeric(_)
        | Expr::StringLiteral { .. }
        | Expr::Keyword(_)
        | Expr::Parameter(_)
        | Expr::ColumnRef(_)
        | Expr::ValueFunction(_)
        | Expr::SetToDefault => {}
        Expr::Indirection { base, items } => {
            w.walk_expr(base);
            for item in items {
                match item {
                    IndirectionItem::Field(_) | IndirectionItem::Star => {}
                    IndirectionItem::Index(e) => w.walk_expr(e),
                    IndirectionItem::Slice { lower, upper } => {
                        if let Some(e) = lower {
                            w.walk_expr(e);
                        }
                        if let Some(e) = upper {
                            w.walk_expr(e);
                        }
                    }
                }
            }
        }
        Expr::Operator(op) => {
            if let Some(left) = &op.left {
                w.walk_expr(left);
            }
            w.walk_expr(&op.right);
        }
        Expr::Not(arg) | Expr::AtLocal(arg) | Expr::CollationFor(arg) | Expr::JsonScalar(arg) => {
            w.walk_expr(arg);
        }
        Expr::And(left, right) | Expr::Or(left, right) | Expr::NullIf(left, right) => {
            w.walk_expr(left);
            w.walk_expr(right);
        }
        Expr::Is { arg, .. } | Expr::IsJson { arg, .. } | Expr::IsNormalized { arg, .. } => {
            w.walk_expr(arg);
        }
        Expr::IsDistinctFrom { left, right, .. } => {
            w.walk_expr(left);
            w.walk_expr(right);
        }
        Expr::IsOf { arg, types, .. } => {
            w.walk_expr(arg);
            for t in types {
                w.walk_type_name(t);
            }
        }
        Expr::Between {
            arg, low, high, ..
        } => {
            w.walk_expr(arg);
            w.walk_expr(low);
            w.walk_expr(high);
        }
        Expr::PatternMatch {
            arg,
            pattern,
            escape,
            ..
        } => {
            w.walk_expr(arg);
            w.walk_expr(pattern);
            if let Some(e) = escape {
                w.walk_expr(e);
            }
        }
        Expr::In { arg, rhs, .. } => {
            w.walk_expr(arg);
            match rhs {
                InRhs::List(items) => {
                    for item in items {
                        w.walk_expr(item);
                    }
                }
                InRhs::Subselect(query) => w.walk_query(query),
            }
        }
        Expr::Overlaps { left, right } => {
            w.walk_expr(&left.0);
            w.walk_expr(&left.1);
            w.walk_expr(&right.0);
            w.walk_expr(&right.1);
        }
        Expr::Case(CaseExpression {
            argument,
            when_clauses,
            else_clause,
        }) => {
            if let Some(arg) = argument {
                w.walk_expr(arg);
            }
            for when in when_clauses {
                w.walk_expr(&when.condition);
                w.walk_expr(&when.result);
            }
            if let Some(e) = else_clause {
                w.walk_expr(e);
            }
        }
        Expr::Typecast { arg, target } => {
            w.walk_expr(arg);
            w.walk_type_name(target);
        }
        Expr::Collate { arg, .. } => w.walk_expr(arg),
        Expr::AtTimeZone { arg, zone } => {
            w.walk_expr(arg);
            w.walk_expr(zone);
        }
        Expr::Array(elements) | Expr::Coalesce(elements) | Expr::XmlConcat(elements) => {
            for e in elements {
                w.walk_expr(e);
            }
        }
        Expr::ArraySubselect(query) | Expr::Subselect(query) => w.walk_query(query),
        Expr::Exists { query, .. } => w.walk_query(query),
        Expr::Row { elements, .. } => {
            for e in elements {
                w.walk_expr(e);
            }
        }
        Expr::ArrayComparison { argument, .. } => match argument {
            ArrayComparisonArg::Subselect(query) => w.walk_query(query),
            ArrayComparisonArg::Array(e) => w.walk_expr(e),
        },
        Expr::FunctionCall(call) => w.walk_function_call(call),
        Expr::Extract { source, .. } => w.walk_expr(source),
        Expr::Overlay {
            string,
            replacement,
            start,
            count,
        } => {
            w.walk_expr(string);
            w.walk_expr(replacement);
            w.walk_expr(start);
            if let Some(e) = count {
                w.walk_expr(e);
            }
        }
        Expr::Position { substring, string } => {
            w.walk_expr(substring);
            w.walk_expr(string);
        }
        Expr::Substring {
            string,
            from,
            for_count,
        } => {
            w.walk_expr(string);
            if let Some(e) = from {
                w.walk_expr(e);
            }
            if let Some(e) = for_count {
                w.walk_expr(e);
            }
        }
        Expr::SubstringSimilar {
            string,
            pattern,
            escape,
        } => {
            w.walk_expr(string);
            w.walk_expr(pattern);
            w.walk_expr(escape);
        }
        Expr::Trim {
            characters, string, ..
        } => {
            if let Some(e) = characters {
                w.walk_expr(e);
            }
            w.walk_expr(string);
        }
        Expr::Normalize { arg, .. } => w.walk_expr(arg),
        Expr::MinMax { args, .. } => {
            for e in args {
                w.walk_expr(e);
            }
        }
        Expr::Json { value, .. } => walk_json_formatted(w, value),
        Expr::JsonSerialize { value, returning } => {
            walk_json_formatted(w, value);
            walk_json_returning(w, returning);
        }
        Expr::JsonObject {
            fields, returning, ..
        } => {
            for field in fields {
                walk_json_key_value(w, field);
            }
            walk_json_returning(w, returning);
        }
        Expr::JsonArray { content, returning } => {
            match content {
                JsonArrayContent::Values { elements, .. } => {
                    for e in elements {
                        walk_json_formatted(w, e);
                    }
                }
                JsonArrayContent::Subselect { query, .. } => w.walk_query(query),
            }
            walk_json_returning(w, returning);
        }
        Expr::JsonObjectAgg {
            field,
            returning,
            filter,
            over,
            ..
        } => {
            walk_json_key_value(w, field);
            walk_json_returning(w, returning);
            if let Some(f) = filter {
                w.walk_expr(f);
            }
            if let Some(o) = over {
                w.walk_window_definition(o);
            }
        }
        Expr::JsonArrayAgg {
            value,
            order_by,
            returning,
            filter,
            over,
            ..
        } => {
            walk_json_formatted(w, value);
            for element in order_by {
                w.walk_order_by_element(element);
            }
            walk_json_returning(w, returning);
            if let Some(f) = filter {
                w.walk_expr(f);
            }
            if let Some(o) = over {
                w.walk_window_definition(o);
            }
        }
        Expr::JsonExists {
            context,
            path,
            passing,
            on_error,
        } => {
            walk_json_formatted(w, context);
            w.walk_expr(path);
            walk_json_passing(w, passing);
            walk_json_behaviour(w, on_error);
        }
        Expr::JsonValue {
            context,
            path,
            passing,
            returning,
            on_empty,
            on_error,
        } => {
            walk_json_formatted(w, context);
            w.walk_expr(path);
            walk_json_passing(w, passing);
            walk_json_returning(w, returning);
            walk_json_behaviour(w, on_empty);
            walk_json_behaviour(w, on_error);
        }
        Expr::JsonQuery {
            context,
            path,
            passing,
            returning,
            on_empty,
            on_error,
            ..
        } => {
            walk_json_formatted(w, context);
            w.walk_expr(path);
            walk_json_passing(w, passing);
            walk_json_returning(w, returning);
            walk_json_behaviour(w, on_empty);
            walk_json_behaviour(w, on_error);
        }
        Expr::XmlElement {
            attributes,
            content,
            ..
        } => {
            for attr in attributes {
                w.walk_expr(&attr.value);
            }
            for e in content {
                w.walk_expr(e);
            }
        }
        Expr::XmlExists { query, document } => {
            w.walk_expr(query);
            w.walk_expr(document);
        }
        Expr::XmlForest(attributes) => {
            for attr in attributes {
                w.walk_expr(&attr.value);
            }
        }
        Expr::XmlParse { argument, .. } => w.walk_expr(argument),
        Expr::XmlPi { content, .. } => {
            if let Some(e) = content {
                w.walk_expr(e);
            }
        }
        Expr::XmlRoot { xml, version, .. } => {
            w.walk_expr(xml);
            if let Some(e) = version {
                w.walk_expr(e);
            }
        }
        Expr::XmlSerialize {
            argument,
            type_name,
            ..
        } => {
            w.walk_expr(argument);
            w.walk_type_name(type_name);
        }
    }
}

pub fn walk_from_element<W: Walker + ?Sized>(w: &mut W, element: &FromElement) {
    match element {
        FromElement::Relation { .. } => {}
        FromElement::Subselect { query, .. } => w.walk_query(query),
        FromElement::Function {
            function,
            column_definitions,
            ..
        } => {
            w.walk_expr(function);
            for def in column_definitions {
                w.walk_type_name(&def.type_name);
            }
        }
        FromElement::RowsFrom { functions, .. } => {
            for f in functions {
                w.walk_expr(&f.function);
                for def in &f.column_definitions {
                    w.walk_type_name(&def.type_name);
                }
            }
        }
        FromElement::Join { join, .. } => {
            w.walk_from_element(&join.left);
            w.walk_from_element(&join.right);
            if let Some(on) = &join.on {
                w.walk_expr(on);
            }
        }
        FromElement::TableSample {
            relation,
            arguments,
            repeatable,
            ..
        } => {
            w.walk_from_element(relation);
            for e in arguments {
                w.walk_expr(e);
            }
            if let Some(e) = repeatable {
                w.walk_expr(e);
            }
        }
        FromElement::XmlTable {
            namespaces,
            row_expression,
            document_expression,
            columns,
            ..
        } => {
            for ns in namespaces {
                w.walk_expr(&ns.value);
            }
            w.walk_expr(row_expression);
            w.walk_expr(document_expression);
            for column in columns {
                walk_xml_column(w, column);
            }
        }
        FromElement::JsonTable {
            context,
            path,
            passing,
            columns,
            on_error,
            ..
        } => {
            walk_json_formatted(w, context);
            w.walk_expr(path);
            walk_json_passing(w, passing);
            for column in columns {
                walk_json_table_column(w, column);
            }
            walk_json_behaviour(w, on_error);
        }
    }
}

fn walk_xml_column<W: Walker + ?Sized>(w: &mut W, column: &XmlColumn) {
    match column {
        XmlColumn::ForOrdinality { .. } => {}
        XmlColumn::Typed {
            type_name,
            path,
            default,
            ..
        } => {
            w.walk_type_name(type_name);
            if let Some(e) = path {
                w.walk_expr(e);
            }
            if let Some(e) = default {
                w.walk_expr(e);
            }
        }
    }
}

fn walk_json_table_column<W: Walker + ?Sized>(w: &mut W, column: &JsonTableColumn) {
    match column {
        JsonTableColumn::ForOrdinality { .. } => {}
        JsonTableColumn::Regular {
            type_name,
            path,
            on_empty,
            on_error,
            ..
        } => {
            w.walk_type_name(type_name);
            if let Some(e) = path {
                w.walk_expr(e);
            }
            walk_json_behaviour(w, on_empty);
            walk_json_behaviour(w, on_error);
        }
        JsonTableColumn::Exists {
            type_name,
            path,
            on_error,
            ..
        } => {
            if let Some(t) = type_name {
                w.walk_type_name(t);
            }
            if let Some(e) = path {
                w.walk_expr(e);
            }
            walk_json_behaviour(w, on_error);
        }
        JsonTableColumn::Nested { path, columns, .. } => {
            w.walk_expr(path);
            for c in columns {
                walk_json_table_column(w, c);
            }
        }
    }
}

fn walk_set_target<W: Walker + ?Sized>(w: &mut W, target: &SetTargetElement) {
    for item in &target.indirection {
        match item {
            IndirectionItem::Field(_) | IndirectionItem::Star => {}
            IndirectionItem::Index(e) => w.walk_expr(e),
            IndirectionItem::Slice { lower, upper } => {
                if let Some(e) = lower {
                    w.walk_expr(e);
                }
                if let Some(e) = upper {
                    w.walk_expr(e);
                }
            }
        }
    }
}

pub fn walk_set_clause<W: Walker + ?Sized>(w: &mut W, clause: &SetClause) {
    match clause {
        SetClause::Single { target, value } => {
            walk_set_target(w, target);
            w.walk_expr(value);
        }
        SetClause::Multiple { targets, value } => {
            for target in targets {
                walk_set_target(w, target);
            }
            match value {
                MultipleSetSource::Row(exprs) => {
                    for e in exprs {
                        w.walk_expr(e);
                    }
                }
                MultipleSetSource::Subselect(query) => w.walk_query(query),
            }
        }
    }
}

fn walk_index_element<W: Walker + ?Sized>(w: &mut W, element: &IndexElement) {
    w.walk_expr(&element.expression);
}

pub fn walk_on_conflict<W: Walker + ?Sized>(w: &mut W, clause: &OnConflictClause) {
    if let Some(ConflictTarget::IndexParameters {
        elements,
        where_clause,
    }) = &clause.target
    {
        for element in elements {
            walk_index_element(w, element);
        }
        if let Some(e) = where_clause {
            w.walk_expr(e);
        }
    }
    if let ConflictAction::DoUpdate { set, where_clause } = &clause.action {
        for s in set {
            w.walk_set_clause(s);
        }
        if let Some(e) = where_clause {
            w.walk_expr(e);
        }
    }
}

pub fn walk_merge_when<W: Walker + ?Sized>(w: &mut W, when: &MergeWhenClause) {
    if let Some(e) = &when.condition {
        w.walk_expr(e);
    }
    match &when.action {
        MergeAction::Update { set } => {
            for s in set {
                w.walk_set_clause(s);
            }
        }
        MergeAction::Insert {
            columns, values, ..
        } => {
            for target in columns {
                walk_set_target(w, target);
            }
            if let Some(values) = values {
                for e in values {
                    w.walk_expr(e);
                }
            }
        }
        MergeAction::Delete | MergeAction::Nothing => {}
    }
}

fn walk_insert<W: Walker + ?Sized>(w: &mut W, insert: &Insert) {
    if let Some(with) = &insert.with {
        w.walk_with_clause(with);
    }
    for target in &insert.columns {
        walk_set_target(w, target);
    }
    if let Some(values) = &insert.values {
        w.walk_query(values);
    }
    if let Some(clause) = &insert.on_conflict {
        w.walk_on_conflict(clause);
    }
    for element in &insert.returning {
        w.walk_target_element(element);
    }
}

fn walk_update<W: Walker + ?Sized>(w: &mut W, update: &Update) {
    if let Some(with) = &update.with {
        w.walk_with_clause(with);
    }
    for clause in &update.set {
        w.walk_set_clause(clause);
    }
    for element in &update.from {
        w.walk_from_element(element);
    }
    if let Some(e) = &update.where_clause {
        w.walk_expr(e);
    }
    for element in &update.returning {
        w.walk_target_element(element);
    }
}

fn walk_delete<W: Walker + ?Sized>(w: &mut W, delete: &Delete) {
    if let Some(with) = &delete.with {
        w.walk_with_clause(with);
    }
    for element in &delete.using {
        w.walk_from_element(element);
    }
    if let Some(e) = &delete.where_clause {
        w.walk_expr(e);
    }
    for element in &delete.returning {
        w.walk_target_element(element);
    }
}

fn walk_merge<W: Walker + ?Sized>(w: &mut W, merge: &Merge) {
    if let Some(with) = &merge.with {
        w.walk_with_clause(with);
    }
    w.walk_from_element(&merge.using);
    w.walk_expr(&merge.on);
    for when in &merge.when_clauses {
        w.walk_merge_when(when);
    }
    for element in &merge.returning {
        w.walk_target_element(element);
    }
}

// ---------------------------------------------------------------------------
// Mutable walker
// ---------------------------------------------------------------------------

/// In-place mutating traversal over an AST.
///
/// `walk_expr_mut` receives every expression node bottom-up-capable: the
/// default recursion descends first into the node handed to the override,
/// which may replace `*expr` wholesale (the parameter walker does exactly
/// that for parameter nodes).
pub trait MutWalker {
    fn walk_statement_mut(&mut self, statement: &mut Statement) {
        walk_statement_mut(self, statement);
    }
    fn walk_query_mut(&mut self, query: &mut Query) {
        walk_query_mut(self, query);
    }
    fn walk_expr_mut(&mut self, expr: &mut Expr) {
        walk_expr_children_mut(self, expr);
    }
    fn walk_from_element_mut(&mut self, element: &mut FromElement) {
        walk_from_element_mut(self, element);
    }
}

pub fn walk_statement_mut<W: MutWalker + ?Sized>(w: &mut W, statement: &mut Statement) {
    match statement {
        Statement::Select(query) => w.walk_query_mut(query),
        Statement::Insert(insert) => {
            if let Some(with) = &mut insert.with {
                walk_with_mut(w, with);
            }
            for target in &mut insert.columns {
                walk_set_target_mut(w, target);
            }
            if let Some(values) = &mut insert.values {
                w.walk_query_mut(values);
            }
            if let Some(clause) = &mut insert.on_conflict {
                walk_on_conflict_mut(w, clause);
            }
            walk_target_list_mut(w, &mut insert.returning);
        }
        Statement::Update(update) => {
            if let Some(with) = &mut update.with {
                walk_with_mut(w, with);
            }
            for clause in &mut update.set {
                walk_set_clause_mut(w, clause);
            }
            for element in &mut update.from {
                w.walk_from_element_mut(element);
            }
            if let Some(e) = &mut update.where_clause {
                w.walk_expr_mut(e);
            }
            walk_target_list_mut(w, &mut update.returning);
        }
        Statement::Delete(delete) => {
            if let Some(with) = &mut delete.with {
                walk_with_mut(w, with);
            }
            for element in &mut delete.using {
                w.walk_from_element_mut(element);
            }
            if let Some(e) = &mut delete.where_clause {
                w.walk_expr_mut(e);
            }
            walk_target_list_mut(w, &mut delete.returning);
        }
        Statement::Merge(merge) => {
            if let Some(with) = &mut merge.with {
                walk_with_mut(w, with);
            }
            w.walk_from_element_mut(&mut merge.using);
            w.walk_expr_mut(&mut merge.on);
            for when in &mut merge.when_clauses {
                if let Some(e) = &mut when.condition {
                    w.walk_expr_mut(e);
                }
                match &mut when.action {
                    MergeAction::Update { set } => {
                        for clause in set {
                            walk_set_clause_mut(w, clause);
                        }
                    }
                    MergeAction::Insert {
                        columns, values, ..
                    } => {
                        for target in columns {
                            walk_set_target_mut(w, target);
                        }
                        if let Some(values) = values {
                            for e in values {
                                w.walk_expr_mut(e);
                            }
                        }
                    }
                    MergeAction::Delete | MergeAction::Nothing => {}
                }
            }
            walk_target_list_mut(w, &mut merge.returning);
        }
    }
}

fn walk_with_mut<W: MutWalker + ?Sized>(w: &mut W, with: &mut WithClause) {
    for cte in &mut with.ctes {
        w.walk_statement_mut(&mut cte.statement);
    }
}

fn walk_target_list_mut<W: MutWalker + ?Sized>(w: &mut W, list: &mut [TargetElement]) {
    for element in list {
        if let TargetElement::Expr { expr, .. } = element {
            w.walk_expr_mut(expr);
        }
    }
}

pub fn walk_query_mut<W: MutWalker + ?Sized>(w: &mut W, query: &mut Query) {
    if let Some(with) = &mut query.with {
        walk_with_mut(w, with);
    }
    match &mut query.body {
        QueryBody::Select(core) => {
            if let Some(DistinctClause::On(exprs)) = &mut core.distinct {
                for e in exprs {
                    w.walk_expr_mut(e);
                }
            }
            walk_target_list_mut(w, &mut core.target_list);
            for element in &mut core.from {
                w.walk_from_element_mut(element);
            }
            if let Some(e) = &mut core.where_clause {
                w.walk_expr_mut(e);
            }
            if let Some(GroupByClause { items, .. }) = &mut core.group_by {
                for e in items {
                    w.walk_expr_mut(e);
                }
            }
            if let Some(e) = &mut core.having {
                w.walk_expr_mut(e);
            }
            for window in &mut core.window {
                walk_window_mut(w, window);
            }
        }
        QueryBody::Values(rows) => {
            for row in rows {
                for e in row {
                    w.walk_expr_mut(e);
                }
            }
        }
        QueryBody::SetOp(op) => {
            w.walk_query_mut(&mut op.left);
            w.walk_query_mut(&mut op.right);
        }
    }
    for element in &mut query.order_by {
        w.walk_expr_mut(&mut element.expression);
    }
    if let Some(limit) = &mut query.limit {
        if let Some(e) = &mut limit.limit {
            w.walk_expr_mut(e);
        }
        if let Some(e) = &mut limit.offset {
            w.walk_expr_mut(e);
        }
    }
}

fn walk_window_mut<W: MutWalker + ?Sized>(w: &mut W, window: &mut WindowDefinition) {
    for e in &mut window.partition_by {
        w.walk_expr_mut(e);
    }
    for element in &mut window.order_by {
        w.walk_expr_mut(&mut element.expression);
    }
    if let Some(frame) = &mut window.frame {
        for e in frame.exprs_mut() {
            w.walk_expr_mut(e);
        }
    }
}

fn walk_set_target_mut<W: MutWalker + ?Sized>(w: &mut W, target: &mut SetTargetElement) {
    for item in &mut target.indirection {
        walk_indirection_item_mut(w, item);
    }
}

fn walk_indirection_item_mut<W: MutWalker + ?Sized>(w: &mut W, item: &mut IndirectionItem) {
    match item {
        IndirectionItem::Field(_) | IndirectionItem::Star => {}
        IndirectionItem::Index(e) => w.walk_expr_mut(e),
        IndirectionItem::Slice { lower, upper } => {
            if let Some(e) = lower {
                w.walk_expr_mut(e);
            }
            if let Some(e) = upper {
                w.walk_expr_mut(e);
            }
        }
    }
}

fn walk_set_clause_mut<W: MutWalker + ?Sized>(w: &mut W, clause: &mut SetClause) {
    match clause {
        SetClause::Single { target, value } => {
            walk_set_target_mut(w, target);
            w.walk_expr_mut(value);
        }
        SetClause::Multiple { targets, value } => {
            for target in targets {
                walk_set_target_mut(w, target);
            }
            match value {
                MultipleSetSource::Row(exprs) => {
                    for e in exprs {
                        w.walk_expr_mut(e);
                    }
                }
                MultipleSetSource::Subselect(query) => w.walk_query_mut(query),
            }
        }
    }
}

fn walk_on_conflict_mut<W: MutWalker + ?Sized>(w: &mut W, clause: &mut OnConflictClause) {
    if let Some(ConflictTarget::IndexParameters {
        elements,
        where_clause,
    }) = &mut clause.target
    {
        for element in elements {
            w.walk_expr_mut(&mut element.expression);
        }
        if let Some(e) = where_clause {
            w.walk_expr_mut(e);
        }
    }
    if let ConflictAction::DoUpdate { set, where_clause } = &mut clause.action {
        for clause in set {
            walk_set_clause_mut(w, clause);
        }
        if let Some(e) = where_clause {
            w.walk_expr_mut(e);
        }
    }
}

pub fn walk_from_element_mut<W: MutWalker + ?Sized>(w: &mut W, element: &mut FromElement) {
    match element {
        FromElement::Relation { .. } => {}
        FromElement::Subselect { query, .. } => w.walk_query_mut(query),
        FromElement::Function { function, .. } => w.walk_expr_mut(function),
        FromElement::RowsFrom { functions, .. } => {
            for f in functions {
                w.walk_expr_mut(&mut f.function);
            }
        }
        FromElement::Join { join, .. } => {
            w.walk_from_element_mut(&mut join.left);
            w.walk_from_element_mut(&mut join.right);
            if let Some(on) = &mut join.on {
                w.walk_expr_mut(on);
            }
        }
        FromElement::TableSample {
            relation,
            arguments,
            repeatable,
            ..
        } => {
            w.walk_from_element_mut(relation);
            for e in arguments {
                w.walk_expr_mut(e);
            }
            if let Some(e) = repeatable {
                w.walk_expr_mut(e);
            }
        }
        FromElement::XmlTable {
            namespaces,
            row_expression,
            document_expression,
            columns,
            ..
        } => {
            for ns in namespaces {
                w.walk_expr_mut(&mut ns.value);
            }
            w.walk_expr_mut(row_expression);
            w.walk_expr_mut(document_expression);
            for column in columns {
                if let XmlColumn::Typed { path, default, .. } = column {
                    if let Some(e) = path {
                        w.walk_expr_mut(e);
                    }
                    if let Some(e) = default {
                        w.walk_expr_mut(e);
                    }
                }
            }
        }
        FromElement::JsonTable {
            context,
            path,
            passing,
            columns,
            on_error,
            ..
        } => {
            w.walk_expr_mut(&mut context.expr);
            w.walk_expr_mut(path);
            for arg in passing {
                w.walk_expr_mut(&mut arg.value.expr);
            }
            for column in columns {
                walk_json_table_column_mut(w, column);
            }
            if let Some(JsonBehaviour::Default(e)) = on_error {
                w.walk_expr_mut(e);
            }
        }
    }
}

fn walk_json_table_column_mut<W: MutWalker + ?Sized>(w: &mut W, column: &mut JsonTableColumn) {
    match column {
        JsonTableColumn::ForOrdinality { .. } => {}
        JsonTableColumn::Regular {
            path,
            on_empty,
            on_error,
            ..
        } => {
            if let Some(e) = path {
                w.walk_expr_mut(e);
            }
            for behaviour in [on_empty, on_error] {
                if let Some(JsonBehaviour::Default(e)) = behaviour {
                    w.walk_expr_mut(e);
                }
            }
        }
        JsonTableColumn::Exists { path, on_error, .. } => {
            if let Some(e) = path {
                w.walk_expr_mut(e);
            }
            if let Some(JsonBehaviour::Default(e)) = on_error {
                w.walk_expr_mut(e);
            }
        }
        JsonTableColumn::Nested { path, columns, .. } => {
            w.walk_expr_mut(path);
            for c in columns {
                walk_json_table_column_mut(w, c);
            }
        }
    }
}

/// Recurse into the children of one expression (mutably). Called by the
/// default `walk_expr_mut`; overrides call this to continue downward.
#[allow(clippy::too_many_lines)]
pub fn walk_expr_children_mut<W: MutWalker + ?Sized>(w: &mut W, expr: &mut Expr) {
    match expr {
        Expr::Numeric(_)
        | Expr::StringLiteral { .. }
        | Expr::Keyword(_)
        | Expr::Parameter(_)
        | Expr::ColumnRef(_)
        | Expr::ValueFunction(_)
        | Expr::SetToDefault => {}
        Expr::Indirection { base, items } => {
            w.walk_expr_mut(base);
            for item in items {
                walk_indirection_item_mut(w, item);
            }
        }
        Expr::Operator(op) => {
            if let Some(left) = &mut op.left {
                w.walk_expr_mut(left);
            }
            w.walk_expr_mut(&mut op.right);
        }
        Expr::Not(arg) | Expr::AtLocal(arg) | Expr::CollationFor(arg) | Expr::JsonScalar(arg) => {
            w.walk_expr_mut(arg);
        }
        Expr::And(left, right) | Expr::Or(left, right) | Expr::NullIf(left, right) => {
            w.walk_expr_mut(left);
            w.walk_expr_mut(right);
        }
        Expr::Is { arg, .. } | Expr::IsJson { arg, .. } | Expr::IsNormalized { arg, .. } => {
            w.walk_expr_mut(arg);
        }
        Expr::IsDistinctFrom { left, right, .. } => {
            w.walk_expr_mut(left);
            w.walk_expr_mut(right);
        }
        Expr::IsOf { arg, types, .. } => {
            w.walk_expr_mut(arg);
            for t in types {
                for m in &mut t.modifiers {
                    w.walk_expr_mut(m);
                }
            }
        }
        Expr::Between {
            arg, low, high, ..
        } => {
            w.walk_expr_mut(arg);
            w.walk_expr_mut(low);
            w.walk_expr_mut(high);
        }
        Expr::PatternMatch {
            arg,
            pattern,
            escape,
            ..
        } => {
            w.walk_expr_mut(arg);
            w.walk_expr_mut(pattern);
            if let Some(e) = escape {
                w.walk_expr_mut(e);
            }
        }
        Expr::In { arg, rhs, .. } => {
            w.walk_expr_mut(arg);
            match rhs {
                InRhs::List(items) => {
                    for e in items {
                        w.walk_expr_mut(e);
                    }
                }
                InRhs::Subselect(query) => w.walk_query_mut(query),
            }
        }
        Expr::Overlaps { left, right } => {
            w.walk_expr_mut(&mut left.0);
            w.walk_expr_mut(&mut left.1);
            w.walk_expr_mut(&mut right.0);
            w.walk_expr_mut(&mut right.1);
        }
        Expr::Case(case) => {
            if let Some(arg) = &mut case.argument {
                w.walk_expr_mut(arg);
            }
            for when in &mut case.when_clauses {
                w.walk_expr_mut(&mut when.condition);
                w.walk_expr_mut(&mut when.result);
            }
            if let Some(e) = &mut case.else_clause {
                w.walk_expr_mut(e);
            }
        }
        Expr::Typecast { arg, target } => {
            w.walk_expr_mut(arg);
            for m in &mut target.modifiers {
                w.walk_expr_mut(m);
            }
        }
        Expr::Collate { arg, .. } => w.walk_expr_mut(arg),
        Expr::AtTimeZone { arg, zone } => {
            w.walk_expr_mut(arg);
            w.walk_expr_mut(zone);
        }
        Expr::Array(elements) | Expr::Coalesce(elements) | Expr::XmlConcat(elements) => {
            for e in elements {
                w.walk_expr_mut(e);
            }
        }
        Expr::ArraySubselect(query) | Expr::Subselect(query) => w.walk_query_mut(query),
        Expr::Exists { query, .. } => w.walk_query_mut(query),
        Expr::Row { elements, .. } => {
            for e in elements {
                w.walk_expr_mut(e);
            }
        }
        Expr::ArrayComparison { argument, .. } => match argument {
            ArrayComparisonArg::Subselect(query) => w.walk_query_mut(query),
            ArrayComparisonArg::Array(e) => w.walk_expr_mut(e),
        },
        Expr::FunctionCall(call) => {
            if let FunctionArguments::List { args, .. } = &mut call.arguments {
                for arg in args {
                    w.walk_expr_mut(&mut arg.value);
                }
            }
            for element in &mut call.order_by {
                w.walk_expr_mut(&mut element.expression);
            }
            if let Some(filter) = &mut call.filter {
                w.walk_expr_mut(filter);
            }
            if let Some(over) = &mut call.over {
                walk_window_mut(w, over);
            }
        }
        Expr::Extract { source, .. } => w.walk_expr_mut(source),
        Expr::Overlay {
            string,
            replacement,
            start,
            count,
        } => {
            w.walk_expr_mut(string);
            w.walk_expr_mut(replacement);
            w.walk_expr_mut(start);
            if let Some(e) = count {
                w.walk_expr_mut(e);
            }
        }
        Expr::Position { substring, string } => {
            w.walk_expr_mut(substring);
            w.walk_expr_mut(string);
        }
        Expr::Substring {
            string,
            from,
            for_count,
        } => {
            w.walk_expr_mut(string);
            if let Some(e) = from {
                w.walk_expr_mut(e);
            }
            if let Some(e) = for_count {
                w.walk_expr_mut(e);
            }
        }
        Expr::SubstringSimilar {
            string,
            pattern,
            escape,
        } => {
            w.walk_expr_mut(string);
            w.walk_expr_mut(pattern);
            w.walk_expr_mut(escape);
        }
        Expr::Trim {
            characters, string, ..
        } => {
            if let Some(e) = characters {
                w.walk_expr_mut(e);
            }
            w.walk_expr_mut(string);
        }
        Expr::Normalize { arg, .. } => w.walk_expr_mut(arg),
        Expr::MinMax { args, .. } => {
            for e in args {
                w.walk_expr_mut(e);
            }
        }
        Expr::Json { value, .. } => w.walk_expr_mut(&mut value.expr),
        Expr::JsonSerialize { value, .. } => w.walk_expr_mut(&mut value.expr),
        Expr::JsonObject { fields, .. } => {
            for field in fields {
                w.walk_expr_mut(&mut field.key);
                w.walk_expr_mut(&mut field.value.expr);
            }
        }
        Expr::JsonArray { content, .. } => match content {
            JsonArrayContent::Values { elements, .. } => {
                for e in elements {
                    w.walk_expr_mut(&mut e.expr);
                }
            }
            JsonArrayContent::Subselect { query, .. } => w.walk_query_mut(query),
        },
        Expr::JsonObjectAgg {
            field,
            filter,
            over,
            ..
        } => {
            w.walk_expr_mut(&mut field.key);
            w.walk_expr_mut(&mut field.value.expr);
            if let Some(f) = filter {
                w.walk_expr_mut(f);
            }
            if let Some(o) = over {
                walk_window_mut(w, o);
            }
        }
        Expr::JsonArrayAgg {
            value,
            order_by,
            filter,
            over,
            ..
        } => {
            w.walk_expr_mut(&mut value.expr);
            for element in order_by {
                w.walk_expr_mut(&mut element.expression);
            }
            if let Some(f) = filter {
                w.walk_expr_mut(f);
            }
            if let Some(o) = over {
                walk_window_mut(w, o);
            }
        }
        Expr::JsonExists {
            context,
            path,
            passing,
            on_error,
        } => {
            w.walk_expr_mut(&mut context.expr);
            w.walk_expr_mut(path);
            for arg in passing {
                w.walk_expr_mut(&mut arg.value.expr);
            }
            if let Some(JsonBehaviour::Default(e)) = on_error {
                w.walk_expr_mut(e);
            }
        }
        Expr::JsonValue {
            context,
            path,
            passing,
            on_empty,
            on_error,
            ..
        }
        | Expr::JsonQuery {
            context,
            path,
            passing,
            on_empty,
            on_error,
            ..
        } => {
            w.walk_expr_mut(&mut context.expr);
            w.walk_expr_mut(path);
            for arg in passing {
                w.walk_expr_mut(&mut arg.value.expr);
            }
            for behaviour in [on_empty, on_error] {
                if let Some(JsonBehaviour::Default(e)) = behaviour {
                    w.walk_expr_mut(e);
                }
            }
        }
        Expr::XmlElement {
            attributes,
            content,
            ..
        } => {
            for attr in attributes {
                w.walk_expr_mut(&mut attr.value);
            }
            for e in content {
                w.walk_expr_mut(e);
            }
        }
        Expr::XmlExists { query, document } => {
            w.walk_expr_mut(query);
            w.walk_expr_mut(document);
        }
        Expr::XmlForest(attributes) => {
            for attr in attributes {
                w.walk_expr_mut(&mut attr.value);
            }
        }
        Expr::XmlParse { argument, .. } => w.walk_expr_mut(argument),
        Expr::XmlPi { content, .. } => {
            if let Some(e) = content {
                w.walk_expr_mut(e);
            }
        }
        Expr::XmlRoot { xml, version, .. } => {
            w.walk_expr_mut(xml);
            if let Some(e) = version {
                w.walk_expr_mut(e);
            }
        }
        Expr::XmlSerialize { argument, .. } => w.walk_expr_mut(argument),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::OperatorExpression;
    use crate::stmt::{SelectCore, TargetElement};

    /// Counts every expression node it reaches.
    struct CountingWalker {
        exprs: usize,
        columns: usize,
    }

    impl Walker for CountingWalker {
        fn walk_expr(&mut self, expr: &Expr) {
            self.exprs += 1;
            if matches!(expr, Expr::ColumnRef(_)) {
                self.columns += 1;
            }
            walk_expr(self, expr);
        }
    }

    fn select_a_eq_b() -> Statement {
        let cmp = Expr::Operator(
            OperatorExpression::binary("=", Expr::column("a"), Expr::column("b")).unwrap(),
        );
        let mut core = SelectCore::simple(vec![TargetElement::Expr {
            expr: Expr::column("a"),
            alias: None,
        }]);
        core.where_clause = Some(cmp);
        Statement::Select(Query::plain(QueryBody::Select(Box::new(core))))
    }

    #[test]
    fn test_blank_walk_reaches_nested_exprs() {
        let stmt = select_a_eq_b();
        let mut walker = CountingWalker {
            exprs: 0,
            columns: 0,
        };
        walker.walk_statement(&stmt);
        // target `a`, comparison, its two columns
        assert_eq!(walker.exprs, 4);
        assert_eq!(walker.columns, 3);
    }

    struct RenameColumns;

    impl MutWalker for RenameColumns {
        fn walk_expr_mut(&mut self, expr: &mut Expr) {
            if let Expr::ColumnRef(col) = expr {
                for part in &mut col.parts {
                    part.0 = part.0.to_uppercase();
                }
            }
            walk_expr_children_mut(self, expr);
        }
    }

    #[test]
    fn test_mut_walker_rewrites_in_place() {
        let mut stmt = select_a_eq_b();
        RenameColumns.walk_statement_mut(&mut stmt);
        let Statement::Select(query) = &stmt else {
            panic!("expected select");
        };
        let QueryBody::Select(core) = &query.body else {
            panic!("expected select core");
        };
        let Some(TargetElement::Expr { expr, .. }) = core.target_list.first() else {
            panic!("expected target expr");
        };
        assert_eq!(expr, &Expr::column("A"));
    }
}
