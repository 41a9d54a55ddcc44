//! Recursive-descent PostgreSQL parser for pgraft.
//!
//! The pipeline is `Lexer` → `Parser` → `pgraft_ast` tree. Scalar
//! expressions are parsed by precedence climbing under one of two selectable
//! precedence regimes ([`PrecedenceRegime::Current`], the 9.5+ rules, and
//! [`PrecedenceRegime::Pre95`], the legacy rules); everything else is plain
//! recursive descent.
//!
//! ```
//! use pgraft_parser::parse_statement;
//!
//! let stmt = parse_statement("select id, name from users where id = $1").unwrap();
//! assert_eq!(
//!     stmt.to_string(),
//!     "select id, name from users where id = $1"
//! );
//! ```

mod expr;
pub mod lexer;
pub mod parser;
pub mod token;

pub use lexer::{Lexer, LexerOptions};
pub use parser::{Parser, ParserOptions, PrecedenceRegime};
pub use token::{Keyword, KeywordCategory, Token, TokenKind};

use pgraft_ast::{Expr, FromElement, Statement, TargetElement, TypeName};
use thiserror::Error;

/// Errors raised while lexing or parsing SQL text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input violates the grammar; fatal to the current parse call.
    #[error("syntax error: {message}, at or near byte {position}")]
    Syntax { message: String, position: usize },

    /// A recognized construct this parser intentionally does not support.
    #[error("{feature} is not supported, at or near byte {position}")]
    NotImplemented { feature: String, position: usize },
}

impl ParseError {
    pub(crate) fn syntax(message: impl Into<String>, position: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }

    pub(crate) fn not_implemented(feature: impl Into<String>, position: usize) -> Self {
        Self::NotImplemented {
            feature: feature.into(),
            position,
        }
    }
}

/// Parse a single SQL statement with default options.
pub fn parse_statement(sql: &str) -> Result<Statement, ParseError> {
    Parser::new(sql, ParserOptions::default())?.parse_statement()
}

/// Parse a scalar expression fragment with default options.
pub fn parse_expression(sql: &str) -> Result<Expr, ParseError> {
    Parser::new(sql, ParserOptions::default())?.parse_expression()
}

/// Parse a FROM-clause element fragment with default options.
pub fn parse_from_element(sql: &str) -> Result<FromElement, ParseError> {
    Parser::new(sql, ParserOptions::default())?.parse_from_element()
}

/// Parse a target-list element fragment with default options.
pub fn parse_target_element(sql: &str) -> Result<TargetElement, ParseError> {
    Parser::new(sql, ParserOptions::default())?.parse_target_element()
}

/// Parse a type name fragment with default options.
pub fn parse_type_name(sql: &str) -> Result<TypeName, ParseError> {
    Parser::new(sql, ParserOptions::default())?.parse_type_name_fragment()
}
