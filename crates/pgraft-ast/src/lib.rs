//! PostgreSQL abstract syntax tree for pgraft.
//!
//! This crate defines the complete node hierarchy produced by
//! `pgraft-parser`, the walker (visitor) traits used to traverse it, the
//! [`builder::SqlBuilder`] that serializes a tree back to SQL text, and the
//! [`params::ParameterWalker`] that rewrites named parameters into
//! positional ones.
//!
//! Trees are plain owned data: children are held by value (`Box` / `Vec`),
//! so a node has exactly one parent, cycles are unrepresentable, cloning is
//! deep, and equality (`PartialEq`) is structural. That makes the round-trip
//! law a plain comparison: `parse(&build(&parse(sql)?)?)? == parse(sql)?`.

pub mod builder;
pub mod expr;
pub mod params;
pub mod stmt;
pub mod walker;

pub use expr::*;
pub use stmt::*;

use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised when constructing or rewriting AST nodes.
///
/// These correspond to invariant violations that the type system cannot rule
/// out; they are always raised eagerly, at the point of violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NodeError {
    /// The string passed to [`SqlOperator::new`] contains characters that
    /// cannot appear in a PostgreSQL operator.
    #[error("'{operator}' does not look like a valid operator string")]
    InvalidOperator { operator: String },

    /// Frame start bound was `UNBOUNDED FOLLOWING`.
    #[error("frame start cannot be UNBOUNDED FOLLOWING")]
    FrameStartUnboundedFollowing,

    /// Frame end bound was `UNBOUNDED PRECEDING`.
    #[error("frame end cannot be UNBOUNDED PRECEDING")]
    FrameEndUnboundedPreceding,

    /// A frame starting at `CURRENT ROW` cannot end at `... PRECEDING`.
    #[error("frame starting from current row cannot have preceding rows")]
    FrameStartCurrentRowPreceding,

    /// A frame starting at `... FOLLOWING` cannot end at `... PRECEDING`.
    #[error("frame starting from following row cannot have preceding rows")]
    FrameStartFollowingPreceding,

    /// A frame starting at `... FOLLOWING` cannot end at `CURRENT ROW`.
    #[error("frame starting from following row cannot end with current row")]
    FrameStartFollowingEndCurrentRow,

    /// Named and positional parameters were mixed in one statement.
    #[error("mixing named and positional parameters is not allowed; found {found} after {previous}")]
    MixedParameters { found: String, previous: String },

    /// A named parameter was found while building SQL that must only
    /// contain positional parameters.
    #[error("built SQL must not contain named parameters, found :{name}")]
    NamedParameterForbidden { name: String },
}

// ---------------------------------------------------------------------------
// Identifiers and qualified names
// ---------------------------------------------------------------------------

/// An SQL identifier, stored in its case-folded form.
///
/// The lexer downcases unquoted identifiers before they reach the AST;
/// quoted identifiers keep their exact spelling. The builder re-quotes any
/// identifier whose spelling requires it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(pub String);

impl Identifier {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Identifier {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

/// A possibly-qualified name like `pg_catalog.upper` or just `users`.
///
/// Holds between one and three parts (`catalog.schema.name` at most).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub parts: Vec<Identifier>,
}

impl QualifiedName {
    /// Create an unqualified name.
    #[must_use]
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            parts: vec![Identifier::new(name)],
        }
    }

    /// Create a schema-qualified name.
    #[must_use]
    pub fn qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            parts: vec![Identifier::new(schema), Identifier::new(name)],
        }
    }

    /// The final (object) name part.
    #[must_use]
    pub fn name(&self) -> &Identifier {
        self.parts.last().expect("qualified name has at least one part")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Operators
// ---------------------------------------------------------------------------

/// Characters that may appear in a PostgreSQL operator name.
pub const CHARS_OPERATOR: &str = "~!@#^&|`?+-*/%<>=";

/// A validated operator string such as `=`, `->>` or `@@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlOperator(String);

impl SqlOperator {
    /// Create an operator, validating that every character belongs to the
    /// operator alphabet.
    pub fn new(operator: impl Into<String>) -> Result<Self, NodeError> {
        let operator = operator.into();
        if operator.is_empty() || !operator.chars().all(|c| CHARS_OPERATOR.contains(c)) {
            return Err(NodeError::InvalidOperator { operator });
        }
        Ok(Self(operator))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SqlOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A schema-qualified operator: `OPERATOR(pg_catalog.+)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedOperator {
    pub schema: Vec<Identifier>,
    pub operator: SqlOperator,
}

/// Either a plain or a schema-qualified operator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Plain(SqlOperator),
    Qualified(QualifiedOperator),
}

impl Operator {
    /// Shorthand for a plain operator.
    pub fn plain(operator: impl Into<String>) -> Result<Self, NodeError> {
        Ok(Self::Plain(SqlOperator::new(operator)?))
    }

    /// The operator glyphs without any `OPERATOR(...)` decoration.
    #[must_use]
    pub fn glyphs(&self) -> &str {
        match self {
            Self::Plain(op) => op.as_str(),
            Self::Qualified(op) => op.operator.as_str(),
        }
    }

    /// Precedence of an expression using this operator.
    ///
    /// `unary` selects the prefix-operator row for `+` and `-`.
    #[must_use]
    pub fn precedence(&self, unary: bool) -> ExprPrecedence {
        let Self::Plain(op) = self else {
            // `OPERATOR(...)` always binds like a generic operator.
            return ExprPrecedence::GenericOp;
        };
        match op.as_str() {
            "+" | "-" if unary => ExprPrecedence::UnaryMinus,
            "=" | "<" | ">" | "<=" | ">=" | "!=" | "<>" => ExprPrecedence::Comparison,
            "+" | "-" => ExprPrecedence::Addition,
            "*" | "/" | "%" => ExprPrecedence::Multiplication,
            "^" => ExprPrecedence::Exponentiation,
            _ => ExprPrecedence::GenericOp,
        }
    }

    /// Associativity of an expression using this operator.
    #[must_use]
    pub fn associativity(&self, unary: bool) -> ExprAssociativity {
        let Self::Plain(op) = self else {
            return ExprAssociativity::Left;
        };
        match op.as_str() {
            "+" | "-" if unary => ExprAssociativity::Right,
            // `=` chains right-associatively with itself; the remaining
            // comparison operators do not chain at all.
            "=" => ExprAssociativity::Right,
            "<" | ">" | "<=" | ">=" | "!=" | "<>" => ExprAssociativity::None,
            _ => ExprAssociativity::Left,
        }
    }
}

// ---------------------------------------------------------------------------
// Expression precedence
// ---------------------------------------------------------------------------

/// Relative precedence levels for scalar expressions, lowest binding first.
///
/// This is the Postgres 9.5+ table; the pre-9.5 differences live entirely in
/// the parser's binding tables and the builder's compat mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ExprPrecedence {
    /// Logical `OR`.
    Or,
    /// Logical `AND`.
    And,
    /// Logical `NOT`.
    Not,
    /// The `IS <something>` family.
    Is,
    /// Comparison operators `= < > <= >= <> !=`.
    Comparison,
    /// Pattern matching: `LIKE` / `ILIKE` / `SIMILAR TO`.
    Pattern,
    /// `OVERLAPS`.
    Overlaps,
    /// `BETWEEN` and variants.
    Between,
    /// `IN`.
    In,
    /// Any other operator.
    GenericOp,
    /// Binary `+` / `-`.
    Addition,
    /// `*` / `/` / `%`.
    Multiplication,
    /// `^` (left-associative, contrary to usual mathematical rules).
    Exponentiation,
    /// `AT TIME ZONE` / `AT LOCAL`.
    TimeZone,
    /// `COLLATE`.
    Collate,
    /// Unary `+` / `-`.
    UnaryMinus,
    /// The typecast operator `::`.
    Typecast,
    /// Base elements of expressions (`c_expr` in the Postgres grammar).
    Atom,
}

/// Associativity options for scalar expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExprAssociativity {
    Left,
    Right,
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_validation() {
        assert!(SqlOperator::new("=").is_ok());
        assert!(SqlOperator::new("->>").is_ok());
        assert!(SqlOperator::new("@@").is_ok());
        assert_eq!(
            SqlOperator::new("fancy"),
            Err(NodeError::InvalidOperator {
                operator: "fancy".to_owned()
            })
        );
        assert!(SqlOperator::new("").is_err());
    }

    #[test]
    fn test_operator_precedence_rows() {
        let eq = Operator::plain("=").unwrap();
        assert_eq!(eq.precedence(false), ExprPrecedence::Comparison);
        assert_eq!(eq.associativity(false), ExprAssociativity::Right);

        let le = Operator::plain("<=").unwrap();
        assert_eq!(le.precedence(false), ExprPrecedence::Comparison);
        assert_eq!(le.associativity(false), ExprAssociativity::None);

        let minus = Operator::plain("-").unwrap();
        assert_eq!(minus.precedence(false), ExprPrecedence::Addition);
        assert_eq!(minus.precedence(true), ExprPrecedence::UnaryMinus);

        let custom = Operator::plain("@-@").unwrap();
        assert_eq!(custom.precedence(false), ExprPrecedence::GenericOp);
        assert_eq!(custom.associativity(false), ExprAssociativity::Left);
    }

    #[test]
    fn test_precedence_ordering() {
        assert!(ExprPrecedence::Or < ExprPrecedence::And);
        assert!(ExprPrecedence::Is < ExprPrecedence::Comparison);
        assert!(ExprPrecedence::Comparison < ExprPrecedence::GenericOp);
        assert!(ExprPrecedence::Typecast < ExprPrecedence::Atom);
    }

    #[test]
    fn test_qualified_name_display() {
        assert_eq!(QualifiedName::bare("users").to_string(), "users");
        assert_eq!(
            QualifiedName::qualified("public", "users").to_string(),
            "public.users"
        );
    }
}
