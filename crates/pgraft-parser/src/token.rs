//! Token and keyword definitions.
//!
//! Every token carries a byte offset into the source text; parser and lexer
//! errors report that offset. Keywords are their own variants for O(1)
//! matching, and each carries its reserved-word category from the PostgreSQL
//! keyword list (`kwlist.h`), which controls where it may double as an
//! identifier.

/// A single token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the first character of the token.
    pub position: usize,
}

/// Token discriminant.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    /// A recognized keyword.
    Keyword(Keyword),
    /// An identifier, already case-folded (or exact, if it was quoted).
    Identifier(String),
    /// An integer literal, kept in its source spelling.
    Integer(String),
    /// A float literal, kept in its source spelling.
    Float(String),
    /// A character string constant (value after unescaping).
    String(String),
    /// A binary string constant `b'0101'` (digits only).
    BinaryString(String),
    /// A hexadecimal string constant `x'2d'` (digits only).
    HexString(String),
    /// A multi-character operator such as `->>` or `@@`.
    Operator(String),
    /// A single special character: `, ( ) [ ] . ; : + - * / % ^ < > =`.
    Special(char),
    /// `<=`, `>=`, `!=` or `<>`.
    Inequality(String),
    /// The typecast operator `::`.
    Typecast,
    /// `=>` (named function argument).
    EqualsGreater,
    /// `:=` (legacy named function argument).
    ColonEquals,
    /// `:name`
    NamedParam(String),
    /// `$n`
    PositionalParam(u32),
    /// End of input.
    Eof,
}

impl TokenKind {
    /// Short human-readable description for error messages.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Keyword(kw) => format!("keyword {}", kw.as_str().to_uppercase()),
            Self::Identifier(name) => format!("identifier \"{name}\""),
            Self::Integer(v) | Self::Float(v) => format!("number {v}"),
            Self::String(_) | Self::BinaryString(_) | Self::HexString(_) => {
                "string literal".to_owned()
            }
            Self::Operator(op) => format!("operator {op}"),
            Self::Special(c) => format!("'{c}'"),
            Self::Inequality(op) => format!("operator {op}"),
            Self::Typecast => "'::'".to_owned(),
            Self::EqualsGreater => "'=>'".to_owned(),
            Self::ColonEquals => "':='".to_owned(),
            Self::NamedParam(name) => format!("parameter :{name}"),
            Self::PositionalParam(n) => format!("parameter ${n}"),
            Self::Eof => "end of input".to_owned(),
        }
    }
}

/// Reserved-word category, per the PostgreSQL keyword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeywordCategory {
    /// Usable as any kind of name.
    Unreserved,
    /// Usable as a column/table name but not as a function or type name.
    ColName,
    /// Usable as a function or type name but not as a column name.
    TypeFuncName,
    /// Never usable as a name without quoting.
    Reserved,
}

macro_rules! keywords {
    ($( $variant:ident => $text:literal, $category:ident, $bare:literal; )*) => {
        /// A recognized SQL keyword.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Keyword {
            $( $variant, )*
        }

        impl Keyword {
            /// Look up a (already downcased) identifier.
            #[must_use]
            pub fn from_ident(text: &str) -> Option<Self> {
                match text {
                    $( $text => Some(Self::$variant), )*
                    _ => None,
                }
            }

            /// The keyword's canonical (lowercase) spelling.
            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )*
                }
            }

            /// Reserved-word category.
            #[must_use]
            pub fn category(self) -> KeywordCategory {
                match self {
                    $( Self::$variant => KeywordCategory::$category, )*
                }
            }

            /// Whether the keyword may appear as a column label without AS.
            #[must_use]
            pub fn can_be_bare_label(self) -> bool {
                match self {
                    $( Self::$variant => $bare, )*
                }
            }
        }
    };
}

keywords! {
    Absent => "absent", Unreserved, true;
    All => "all", Reserved, true;
    And => "and", Reserved, true;
    Any => "any", Reserved, true;
    Array => "array", Reserved, false;
    As => "as", Reserved, false;
    Asc => "asc", Reserved, true;
    Asymmetric => "asymmetric", Reserved, true;
    At => "at", Unreserved, true;
    Between => "between", ColName, true;
    Bigint => "bigint", ColName, true;
    Binary => "binary", TypeFuncName, true;
    Bit => "bit", ColName, true;
    Boolean => "boolean", ColName, true;
    Both => "both", Reserved, true;
    By => "by", Unreserved, true;
    Case => "case", Reserved, true;
    Cast => "cast", Reserved, true;
    Char => "char", ColName, false;
    Character => "character", ColName, false;
    Coalesce => "coalesce", ColName, true;
    Collate => "collate", Reserved, true;
    Collation => "collation", TypeFuncName, true;
    Column => "column", Reserved, true;
    Columns => "columns", Unreserved, true;
    Conditional => "conditional", Unreserved, true;
    Conflict => "conflict", Unreserved, true;
    Constraint => "constraint", Reserved, true;
    Content => "content", Unreserved, true;
    Cross => "cross", TypeFuncName, true;
    Current => "current", Unreserved, true;
    CurrentCatalog => "current_catalog", Reserved, true;
    CurrentDate => "current_date", Reserved, true;
    CurrentRole => "current_role", Reserved, true;
    CurrentSchema => "current_schema", TypeFuncName, true;
    CurrentTime => "current_time", Reserved, true;
    CurrentTimestamp => "current_timestamp", Reserved, true;
    CurrentUser => "current_user", Reserved, true;
    Day => "day", Unreserved, false;
    Decimal => "decimal", ColName, true;
    Default => "default", Reserved, true;
    Delete => "delete", Unreserved, true;
    Desc => "desc", Reserved, true;
    Distinct => "distinct", Reserved, true;
    Do => "do", Reserved, true;
    Document => "document", Unreserved, true;
    Double => "double", Unreserved, true;
    Else => "else", Reserved, true;
    Empty => "empty", Unreserved, true;
    Encoding => "encoding", Unreserved, true;
    End => "end", Reserved, true;
    Error => "error", Unreserved, true;
    Escape => "escape", Unreserved, true;
    Except => "except", Reserved, false;
    Exclude => "exclude", Unreserved, true;
    Exists => "exists", ColName, true;
    Extract => "extract", ColName, true;
    False => "false", Reserved, true;
    Fetch => "fetch", Reserved, false;
    Filter => "filter", Unreserved, false;
    First => "first", Unreserved, true;
    Float => "float", ColName, true;
    Following => "following", Unreserved, true;
    For => "for", Reserved, false;
    Format => "format", Unreserved, true;
    From => "from", Reserved, false;
    Full => "full", TypeFuncName, true;
    Greatest => "greatest", ColName, true;
    Group => "group", Reserved, false;
    Groups => "groups", Unreserved, true;
    Having => "having", Reserved, false;
    Hour => "hour", Unreserved, false;
    Ilike => "ilike", TypeFuncName, true;
    In => "in", Reserved, true;
    Indent => "indent", Unreserved, true;
    Inner => "inner", TypeFuncName, true;
    Insert => "insert", Unreserved, true;
    Int => "int", ColName, true;
    Integer => "integer", ColName, true;
    Intersect => "intersect", Reserved, false;
    Interval => "interval", ColName, true;
    Into => "into", Reserved, false;
    Is => "is", TypeFuncName, false;
    Isnull => "isnull", TypeFuncName, false;
    Join => "join", TypeFuncName, true;
    Json => "json", ColName, true;
    JsonArray => "json_array", ColName, true;
    JsonArrayagg => "json_arrayagg", ColName, true;
    JsonExists => "json_exists", ColName, true;
    JsonObject => "json_object", ColName, true;
    JsonObjectagg => "json_objectagg", ColName, true;
    JsonQuery => "json_query", ColName, true;
    JsonScalar => "json_scalar", ColName, true;
    JsonSerialize => "json_serialize", ColName, true;
    JsonTable => "json_table", ColName, true;
    JsonValue => "json_value", ColName, true;
    Keep => "keep", Unreserved, true;
    Key => "key", Unreserved, true;
    Keys => "keys", Unreserved, true;
    Last => "last", Unreserved, true;
    Lateral => "lateral", Reserved, true;
    Leading => "leading", Reserved, true;
    Least => "least", ColName, true;
    Left => "left", TypeFuncName, true;
    Like => "like", TypeFuncName, true;
    Limit => "limit", Reserved, false;
    Local => "local", Unreserved, true;
    Localtime => "localtime", Reserved, true;
    Localtimestamp => "localtimestamp", Reserved, true;
    Locked => "locked", Unreserved, true;
    Matched => "matched", Unreserved, true;
    Materialized => "materialized", Unreserved, true;
    Merge => "merge", Unreserved, true;
    Minute => "minute", Unreserved, false;
    Month => "month", Unreserved, false;
    Name => "name", Unreserved, true;
    Natural => "natural", TypeFuncName, true;
    Nested => "nested", Unreserved, true;
    Next => "next", Unreserved, true;
    Nfc => "nfc", Unreserved, true;
    Nfd => "nfd", Unreserved, true;
    Nfkc => "nfkc", Unreserved, true;
    Nfkd => "nfkd", Unreserved, true;
    No => "no", Unreserved, true;
    Normalize => "normalize", ColName, true;
    Normalized => "normalized", Unreserved, true;
    Not => "not", Reserved, true;
    Nothing => "nothing", Unreserved, true;
    Notnull => "notnull", TypeFuncName, false;
    Nowait => "nowait", Unreserved, true;
    Null => "null", Reserved, true;
    Nullif => "nullif", ColName, true;
    Nulls => "nulls", Unreserved, true;
    Numeric => "numeric", ColName, true;
    Object => "object", Unreserved, true;
    Of => "of", Unreserved, true;
    Offset => "offset", Reserved, false;
    Omit => "omit", Unreserved, true;
    On => "on", Reserved, false;
    Only => "only", Reserved, true;
    Operator => "operator", Unreserved, true;
    Or => "or", Reserved, true;
    Order => "order", Reserved, false;
    Ordinality => "ordinality", Unreserved, true;
    Others => "others", Unreserved, true;
    Outer => "outer", TypeFuncName, true;
    Over => "over", Unreserved, false;
    Overlaps => "overlaps", TypeFuncName, false;
    Overlay => "overlay", ColName, true;
    Overriding => "overriding", Unreserved, true;
    Partition => "partition", Unreserved, true;
    Passing => "passing", Unreserved, true;
    Path => "path", Unreserved, true;
    Placing => "placing", Reserved, false;
    Position => "position", ColName, true;
    Preceding => "preceding", Unreserved, true;
    Precision => "precision", ColName, false;
    Preserve => "preserve", Unreserved, true;
    Quotes => "quotes", Unreserved, true;
    Range => "range", Unreserved, true;
    Real => "real", ColName, true;
    Recursive => "recursive", Unreserved, true;
    Repeatable => "repeatable", Unreserved, true;
    Returning => "returning", Reserved, false;
    Right => "right", TypeFuncName, true;
    Row => "row", ColName, true;
    Rows => "rows", Unreserved, true;
    Scalar => "scalar", Unreserved, true;
    Second => "second", Unreserved, false;
    Select => "select", Reserved, true;
    SessionUser => "session_user", Reserved, true;
    Set => "set", Unreserved, true;
    Setof => "setof", ColName, true;
    Share => "share", Unreserved, true;
    Similar => "similar", TypeFuncName, true;
    Skip => "skip", Unreserved, true;
    Smallint => "smallint", ColName, true;
    Some => "some", Reserved, true;
    Standalone => "standalone", Unreserved, true;
    Strip => "strip", Unreserved, true;
    Substring => "substring", ColName, true;
    Symmetric => "symmetric", Reserved, true;
    System => "system", Unreserved, true;
    Table => "table", Reserved, true;
    Tablesample => "tablesample", TypeFuncName, true;
    Then => "then", Reserved, true;
    Ties => "ties", Unreserved, true;
    Time => "time", ColName, true;
    Timestamp => "timestamp", ColName, true;
    To => "to", Reserved, false;
    Trailing => "trailing", Reserved, true;
    Trim => "trim", ColName, true;
    True => "true", Reserved, true;
    Unbounded => "unbounded", Unreserved, true;
    Unconditional => "unconditional", Unreserved, true;
    Union => "union", Reserved, false;
    Unique => "unique", Reserved, true;
    Unknown => "unknown", Unreserved, true;
    Update => "update", Unreserved, true;
    User => "user", Reserved, true;
    Using => "using", Reserved, true;
    Value => "value", Unreserved, true;
    Values => "values", Reserved, true;
    Varchar => "varchar", ColName, true;
    Variadic => "variadic", Reserved, false;
    Varying => "varying", Unreserved, false;
    Version => "version", Unreserved, true;
    When => "when", Reserved, true;
    Where => "where", Reserved, false;
    Whitespace => "whitespace", Unreserved, true;
    Window => "window", Reserved, false;
    With => "with", Reserved, false;
    Within => "within", Unreserved, false;
    Without => "without", Unreserved, false;
    Wrapper => "wrapper", Unreserved, true;
    Xmlattributes => "xmlattributes", ColName, true;
    Xmlconcat => "xmlconcat", ColName, true;
    Xmlelement => "xmlelement", ColName, true;
    Xmlexists => "xmlexists", ColName, true;
    Xmlforest => "xmlforest", ColName, true;
    Xmlnamespaces => "xmlnamespaces", ColName, true;
    Xmlparse => "xmlparse", ColName, true;
    Xmlpi => "xmlpi", ColName, true;
    Xmlroot => "xmlroot", ColName, true;
    Xmlserialize => "xmlserialize", ColName, true;
    Xmltable => "xmltable", ColName, true;
    Year => "year", Unreserved, false;
    Yes => "yes", Unreserved, true;
    Zone => "zone", Unreserved, true;
}

impl Keyword {
    /// Whether the keyword may be used where a column identifier is
    /// expected (`ColId` in the Postgres grammar).
    #[must_use]
    pub fn usable_as_column_name(self) -> bool {
        matches!(
            self.category(),
            KeywordCategory::Unreserved | KeywordCategory::ColName
        )
    }

    /// Whether the keyword may be used where a function or type name is
    /// expected.
    #[must_use]
    pub fn usable_as_function_name(self) -> bool {
        matches!(
            self.category(),
            KeywordCategory::Unreserved | KeywordCategory::TypeFuncName
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(Keyword::from_ident("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_ident("json_table"), Some(Keyword::JsonTable));
        assert_eq!(Keyword::from_ident("frobnicate"), None);
        // Lookup expects downcased input.
        assert_eq!(Keyword::from_ident("SELECT"), None);
    }

    #[test]
    fn test_keyword_categories() {
        assert_eq!(Keyword::Select.category(), KeywordCategory::Reserved);
        assert_eq!(Keyword::Between.category(), KeywordCategory::ColName);
        assert_eq!(Keyword::Ilike.category(), KeywordCategory::TypeFuncName);
        assert_eq!(Keyword::Path.category(), KeywordCategory::Unreserved);
        assert!(Keyword::Between.usable_as_column_name());
        assert!(!Keyword::Between.usable_as_function_name());
        assert!(Keyword::Ilike.usable_as_function_name());
        assert!(!Keyword::Select.usable_as_column_name());
    }

    #[test]
    fn test_bare_label_flags() {
        assert!(Keyword::Null.can_be_bare_label());
        assert!(!Keyword::From.can_be_bare_label());
        assert!(!Keyword::Filter.can_be_bare_label());
    }

    #[test]
    fn test_round_trip_spelling() {
        for text in ["select", "overlaps", "json_value", "current_timestamp"] {
            let kw = Keyword::from_ident(text).unwrap();
            assert_eq!(kw.as_str(), text);
        }
    }
}
