//! Named-parameter extraction and rewriting.
//!
//! [`ParameterWalker`] walks a statement, assigns each distinct named
//! parameter (`:foo`) an ordinal in first-seen order, replaces every
//! occurrence with the *same* positional parameter (`$n`), and records the
//! target type of any parameter that is the immediate operand of a
//! typecast. Mixing named and positional parameters in one statement is
//! rejected.

use crate::expr::{Expr, Parameter, TypeName};
use crate::stmt::Statement;
use crate::walker::{walk_expr_children_mut, MutWalker};
use crate::NodeError;

/// The result of a parameter-walking pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedParameters {
    /// Parameter names in ordinal order; `names[0]` became `$1`.
    names: Vec<String>,
    /// Types recovered from typecasts, indexed by ordinal (0-based).
    types: Vec<Option<TypeName>>,
}

impl ExtractedParameters {
    /// Parameter names in ordinal order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Types recovered from typecasts, indexed by 0-based ordinal.
    #[must_use]
    pub fn types(&self) -> &[Option<TypeName>] {
        &self.types
    }

    /// The 0-based ordinal assigned to `name`, if it occurred.
    #[must_use]
    pub fn ordinal(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Number of distinct parameters seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len().max(self.names.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Walks a statement collecting (and by default rewriting) parameters.
#[derive(Debug)]
pub struct ParameterWalker {
    keep_names: bool,
    names: Vec<String>,
    types: Vec<Option<TypeName>>,
    seen_positional: bool,
    error: Option<NodeError>,
}

impl ParameterWalker {
    /// A walker that replaces named parameters with positional ones.
    #[must_use]
    pub fn new() -> Self {
        Self {
            keep_names: false,
            names: vec![],
            types: vec![],
            seen_positional: false,
            error: None,
        }
    }

    /// A walker that records the mapping but leaves named parameters in
    /// the tree.
    #[must_use]
    pub fn keeping_names() -> Self {
        Self {
            keep_names: true,
            ..Self::new()
        }
    }

    /// Walk `statement`, then return the collected parameter information.
    pub fn walk(mut self, statement: &mut Statement) -> Result<ExtractedParameters, NodeError> {
        self.walk_statement_mut(statement);
        if let Some(error) = self.error {
            return Err(error);
        }
        Ok(ExtractedParameters {
            names: self.names,
            types: self.types,
        })
    }

    /// Register a parameter occurrence, returning its 0-based ordinal.
    fn note(&mut self, parameter: &Parameter) -> Option<usize> {
        match parameter {
            Parameter::Named(name) => {
                if self.seen_positional {
                    self.error = Some(NodeError::MixedParameters {
                        found: format!(":{name}"),
                        previous: "positional ones".to_owned(),
                    });
                    return None;
                }
                let idx = if let Some(idx) = self.names.iter().position(|n| n == name) {
                    idx
                } else {
                    self.names.push(name.clone());
                    self.names.len() - 1
                };
                if self.types.len() <= idx {
                    self.types.resize(idx + 1, None);
                }
                Some(idx)
            }
            Parameter::Positional(position) => {
                if !self.names.is_empty() {
                    self.error = Some(NodeError::MixedParameters {
                        found: format!("${position}"),
                        previous: "named ones".to_owned(),
                    });
                    return None;
                }
                self.seen_positional = true;
                let idx = position.checked_sub(1).unwrap_or_default() as usize;
                if self.types.len() <= idx {
                    self.types.resize(idx + 1, None);
                }
                Some(idx)
            }
        }
    }

    fn record_type(&mut self, idx: usize, target: &TypeName) {
        // First cast wins; later conflicting casts are ignored.
        if self.types[idx].is_none() {
            self.types[idx] = Some(target.clone());
        }
    }

    fn replace(&self, parameter_slot: &mut Expr, idx: usize) {
        if !self.keep_names {
            if let Expr::Parameter(Parameter::Named(_)) = parameter_slot {
                #[allow(clippy::cast_possible_truncation)]
                let ordinal = (idx + 1) as u32;
                *parameter_slot = Expr::Parameter(Parameter::Positional(ordinal));
            }
        }
    }
}

impl Default for ParameterWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl MutWalker for ParameterWalker {
    fn walk_expr_mut(&mut self, expr: &mut Expr) {
        if self.error.is_some() {
            return;
        }
        match expr {
            // A parameter directly under a typecast: record the type
            // against its ordinal before rewriting.
            Expr::Typecast { arg, target } => {
                if let Expr::Parameter(parameter) = arg.as_mut() {
                    let parameter = parameter.clone();
                    if let Some(idx) = self.note(&parameter) {
                        self.record_type(idx, target);
                        self.replace(arg, idx);
                    }
                } else {
                    walk_expr_children_mut(self, expr);
                }
            }
            Expr::Parameter(parameter) => {
                let parameter = parameter.clone();
                if let Some(idx) = self.note(&parameter) {
                    self.replace(expr, idx);
                }
            }
            _ => walk_expr_children_mut(self, expr),
        }
    }
}

/// Rewrite every named parameter in `statement` into positional form.
pub fn rewrite_parameters(statement: &mut Statement) -> Result<ExtractedParameters, NodeError> {
    ParameterWalker::new().walk(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::OperatorExpression;
    use crate::stmt::{Query, QueryBody, SelectCore, TargetElement};
    use crate::QualifiedName;

    fn named(name: &str) -> Expr {
        Expr::Parameter(Parameter::Named(name.to_owned()))
    }

    fn select_of(exprs: Vec<Expr>) -> Statement {
        let core = SelectCore::simple(
            exprs
                .into_iter()
                .map(|expr| TargetElement::Expr { expr, alias: None })
                .collect(),
        );
        Statement::Select(Query::plain(QueryBody::Select(Box::new(core))))
    }

    fn int_array_type() -> TypeName {
        let mut t = TypeName::plain(QualifiedName::bare("integer"));
        t.array_bounds.push(None);
        t
    }

    #[test]
    fn test_repeated_name_reuses_ordinal() {
        let mut stmt = select_of(vec![
            named("foo"),
            named("bar"),
            Expr::Operator(
                OperatorExpression::binary("=", named("foo"), named("foo")).unwrap(),
            ),
        ]);
        let params = rewrite_parameters(&mut stmt).unwrap();
        assert_eq!(params.names(), ["foo", "bar"]);
        assert_eq!(params.ordinal("foo"), Some(0));
        assert_eq!(params.ordinal("bar"), Some(1));

        let expected = select_of(vec![
            Expr::Parameter(Parameter::Positional(1)),
            Expr::Parameter(Parameter::Positional(2)),
            Expr::Operator(
                OperatorExpression::binary(
                    "=",
                    Expr::Parameter(Parameter::Positional(1)),
                    Expr::Parameter(Parameter::Positional(1)),
                )
                .unwrap(),
            ),
        ]);
        assert_eq!(stmt, expected);
    }

    #[test]
    fn test_mixed_styles_rejected() {
        let mut stmt = select_of(vec![
            named("foo"),
            Expr::Parameter(Parameter::Positional(1)),
        ]);
        let err = rewrite_parameters(&mut stmt).unwrap_err();
        assert!(matches!(err, NodeError::MixedParameters { .. }));

        let mut stmt = select_of(vec![
            Expr::Parameter(Parameter::Positional(1)),
            named("foo"),
        ]);
        let err = rewrite_parameters(&mut stmt).unwrap_err();
        assert!(matches!(err, NodeError::MixedParameters { .. }));
    }

    #[test]
    fn test_typecast_records_type() {
        let mut stmt = select_of(vec![Expr::Typecast {
            arg: Box::new(named("ids")),
            target: int_array_type(),
        }]);
        let params = rewrite_parameters(&mut stmt).unwrap();
        assert_eq!(params.types()[0], Some(int_array_type()));
        let expected = select_of(vec![Expr::Typecast {
            arg: Box::new(Expr::Parameter(Parameter::Positional(1))),
            target: int_array_type(),
        }]);
        assert_eq!(stmt, expected);
    }

    #[test]
    fn test_first_cast_wins() {
        let other = TypeName::plain(QualifiedName::bare("text"));
        let mut stmt = select_of(vec![
            Expr::Typecast {
                arg: Box::new(named("v")),
                target: int_array_type(),
            },
            Expr::Typecast {
                arg: Box::new(named("v")),
                target: other,
            },
        ]);
        let params = rewrite_parameters(&mut stmt).unwrap();
        assert_eq!(params.types()[0], Some(int_array_type()));
    }

    #[test]
    fn test_keeping_names_leaves_tree_alone() {
        let mut stmt = select_of(vec![named("foo"), named("foo")]);
        let original = stmt.clone();
        let params = ParameterWalker::keeping_names().walk(&mut stmt).unwrap();
        assert_eq!(params.names(), ["foo"]);
        assert_eq!(stmt, original);
    }

    #[test]
    fn test_positional_only_statement() {
        let mut stmt = select_of(vec![
            Expr::Parameter(Parameter::Positional(2)),
            Expr::Parameter(Parameter::Positional(1)),
        ]);
        let params = rewrite_parameters(&mut stmt).unwrap();
        assert!(params.names().is_empty());
        assert_eq!(params.types().len(), 2);
    }
}
