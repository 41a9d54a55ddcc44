//! SQL lexer.
//!
//! Turns SQL text into a stream of [`Token`]s. Uses `memchr` for
//! accelerated quote scanning. Every failure is a fatal
//! [`ParseError::Syntax`] carrying the byte offset of the offending text.

use memchr::memchr;

use crate::token::{Keyword, Token, TokenKind};
use crate::ParseError;

/// Characters that may appear in operators.
const CHARS_OPERATOR: &[u8] = b"~!@#^&|`?+-*/%<>=";

/// Characters emitted as single special-character tokens.
const CHARS_SPECIAL: &[u8] = b",()[].;:+-*/%^<>=";

/// Operator characters that allow a trailing `+` or `-`.
const CHARS_NON_STANDARD: &[u8] = b"~!@#^&|`?%";

/// Lexer configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    /// Same meaning as the `standard_conforming_strings` server setting:
    /// when `true` (the default) backslashes in `'...'` strings are
    /// literal, when `false` they are escape characters.
    pub standard_conforming_strings: bool,
    /// Restrict identifier downcasing to ASCII letters.
    pub ascii_only_downcasing: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            standard_conforming_strings: true,
            ascii_only_downcasing: false,
        }
    }
}

/// Escape regime of a single-quoted literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteMode {
    /// `''` is the only escape.
    DoubledOnly,
    /// Backslash escapes are honored (`e'...'`).
    Backslash,
    /// No escapes; content validated against a digit alphabet later.
    Raw,
}

/// Scans an SQL string for tokens.
pub struct Lexer<'a> {
    text: &'a str,
    src: &'a [u8],
    pos: usize,
    options: LexerOptions,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(source: &'a str, options: LexerOptions) -> Self {
        Self {
            text: source,
            src: source.as_bytes(),
            pos: 0,
            options,
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(source: &str, options: LexerOptions) -> Result<Vec<Token>, ParseError> {
        let mut lexer = Lexer::new(source, options);
        let mut tokens = Vec::new();
        while let Some(token) = lexer.next_token()? {
            tokens.push(token);
        }
        tokens.push(Token {
            kind: TokenKind::Eof,
            position: lexer.pos,
        });
        Ok(tokens)
    }

    // -- scanning helpers ---------------------------------------------------

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.src.get(self.pos + offset).copied()
    }

    fn is_ident_start(b: u8) -> bool {
        b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
    }

    fn is_ident_cont(b: u8) -> bool {
        b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
    }

    /// Skip whitespace, `--` comments and nested `/* */` comments.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), ParseError> {
        loop {
            while self.pos < self.src.len()
                && matches!(self.src[self.pos], b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
            {
                self.pos += 1;
            }
            if self.src[self.pos..].starts_with(b"--") {
                while self.pos < self.src.len() && !matches!(self.src[self.pos], b'\n' | b'\r') {
                    self.pos += 1;
                }
                continue;
            }
            if self.src[self.pos..].starts_with(b"/*") {
                let start = self.pos;
                self.pos += 2;
                let mut depth = 1u32;
                while depth > 0 {
                    if self.pos + 1 >= self.src.len() {
                        return Err(ParseError::syntax("unterminated /* comment", start));
                    }
                    if self.src[self.pos..].starts_with(b"/*") {
                        depth += 1;
                        self.pos += 2;
                    } else if self.src[self.pos..].starts_with(b"*/") {
                        depth -= 1;
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                    }
                }
                continue;
            }
            return Ok(());
        }
    }

    /// Produce the next token, or `None` at end of input.
    #[allow(clippy::too_many_lines)]
    fn next_token(&mut self) -> Result<Option<Token>, ParseError> {
        self.skip_whitespace_and_comments()?;
        if self.pos >= self.src.len() {
            return Ok(None);
        }

        let start = self.pos;
        let b = self.src[self.pos];

        let kind = match b {
            b'\'' => {
                self.pos += 1;
                self.lex_string(QuoteMode::from_options(&self.options), start)
                    .map(TokenKind::String)?
            }
            b'"' => self.lex_quoted_identifier(start)?,

            // Prefixed string literals.
            b'b' | b'B' if self.peek_at(1) == Some(b'\'') => {
                self.pos += 2;
                let value = self.lex_string(QuoteMode::Raw, start)?;
                if let Some(bad) = value.bytes().position(|c| !matches!(c, b'0' | b'1')) {
                    return Err(ParseError::syntax(
                        format!("\"{}\" is not a valid binary digit", &value[bad..=bad]),
                        start,
                    ));
                }
                TokenKind::BinaryString(value)
            }
            b'x' | b'X' if self.peek_at(1) == Some(b'\'') => {
                self.pos += 2;
                let value = self.lex_string(QuoteMode::Raw, start)?;
                if let Some(bad) = value.bytes().position(|c| !c.is_ascii_hexdigit()) {
                    return Err(ParseError::syntax(
                        format!("\"{}\" is not a valid hexadecimal digit", &value[bad..=bad]),
                        start,
                    ));
                }
                TokenKind::HexString(value)
            }
            b'e' | b'E' if self.peek_at(1) == Some(b'\'') => {
                self.pos += 2;
                self.lex_string(QuoteMode::Backslash, start)
                    .map(TokenKind::String)?
            }
            b'n' | b'N' if self.peek_at(1) == Some(b'\'') => {
                self.pos += 2;
                self.lex_string(QuoteMode::from_options(&self.options), start)
                    .map(TokenKind::String)?
            }
            b'u' | b'U'
                if self.peek_at(1) == Some(b'&')
                    && matches!(self.peek_at(2), Some(b'\'' | b'"')) =>
            {
                return Err(ParseError::not_implemented(
                    "string constants and identifiers with Unicode escapes",
                    start,
                ));
            }

            _ if Self::is_ident_start(b) => self.lex_identifier(),

            b'0'..=b'9' => self.lex_number(start)?,
            b'.' if self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.lex_number(start)?
            }
            b'.' if self.peek_at(1) == Some(b'.') => {
                return Err(ParseError::syntax("unexpected '..'", start));
            }

            b'$' => self.lex_dollar(start)?,
            b':' => match self.peek_at(1) {
                Some(b':') => {
                    self.pos += 2;
                    TokenKind::Typecast
                }
                Some(b'=') => {
                    self.pos += 2;
                    TokenKind::ColonEquals
                }
                Some(c) if Self::is_ident_start(c) => {
                    self.pos += 1;
                    let name = self.lex_identifier_text();
                    TokenKind::NamedParam(name)
                }
                _ => {
                    self.pos += 1;
                    TokenKind::Special(':')
                }
            },

            b',' | b'(' | b')' | b'[' | b']' | b'.' | b';' => {
                self.pos += 1;
                TokenKind::Special(b as char)
            }

            _ if CHARS_OPERATOR.contains(&b) => self.lex_operator(),

            _ => {
                let ch = self.text[start..].chars().next().unwrap_or('?');
                return Err(ParseError::syntax(format!("unexpected '{ch}'"), start));
            }
        };

        Ok(Some(Token {
            kind,
            position: start,
        }))
    }

    // -- identifiers and keywords -------------------------------------------

    fn lex_identifier_text(&mut self) -> String {
        let start = self.pos;
        while self.pos < self.src.len() && Self::is_ident_cont(self.src[self.pos]) {
            self.pos += 1;
        }
        let raw = &self.text[start..self.pos];
        if raw.is_ascii() {
            raw.to_ascii_lowercase()
        } else if self.options.ascii_only_downcasing {
            raw.chars()
                .map(|c| c.to_ascii_lowercase())
                .collect()
        } else {
            raw.to_lowercase()
        }
    }

    fn lex_identifier(&mut self) -> TokenKind {
        let name = self.lex_identifier_text();
        match Keyword::from_ident(&name) {
            Some(keyword) => TokenKind::Keyword(keyword),
            None => TokenKind::Identifier(name),
        }
    }

    fn lex_quoted_identifier(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        self.pos += 1;
        let mut value = String::new();
        loop {
            let remaining = &self.src[self.pos..];
            match memchr(b'"', remaining) {
                Some(offset) => {
                    value.push_str(&self.text[self.pos..self.pos + offset]);
                    self.pos += offset + 1;
                    if self.peek_at(0) == Some(b'"') {
                        value.push('"');
                        self.pos += 1;
                    } else {
                        break;
                    }
                }
                None => {
                    return Err(ParseError::syntax("unterminated quoted identifier", start));
                }
            }
        }
        if value.is_empty() {
            return Err(ParseError::syntax("zero-length quoted identifier", start));
        }
        Ok(TokenKind::Identifier(value))
    }

    // -- numbers ------------------------------------------------------------

    /// Read `(_? digit)+`, rejecting misplaced separators.
    fn lex_digit_run(
        &mut self,
        start: usize,
        is_digit: fn(u8) -> bool,
    ) -> Result<(), ParseError> {
        let mut seen = false;
        let mut last_sep = false;
        while let Some(b) = self.peek_at(0) {
            if is_digit(b) {
                seen = true;
                last_sep = false;
                self.pos += 1;
            } else if b == b'_' {
                if last_sep {
                    break;
                }
                last_sep = true;
                self.pos += 1;
            } else {
                break;
            }
        }
        if !seen || last_sep {
            return Err(ParseError::syntax("invalid numeric literal", start));
        }
        Ok(())
    }

    fn lex_number(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        let mut is_float = false;

        let radix_digit: Option<fn(u8) -> bool> =
            if self.src[self.pos] == b'0' {
                match self.peek_at(1) {
                    Some(b'x' | b'X') => Some(|b| b.is_ascii_hexdigit()),
                    Some(b'o' | b'O') => Some(|b| (b'0'..=b'7').contains(&b)),
                    Some(b'b' | b'B') => Some(|b| matches!(b, b'0' | b'1')),
                    _ => None,
                }
            } else {
                None
            };

        if let Some(is_digit) = radix_digit {
            self.pos += 2;
            // A leading separator is allowed right after the radix prefix.
            if self.peek_at(0) == Some(b'_') {
                self.pos += 1;
            }
            self.lex_digit_run(start, is_digit)?;
        } else {
            if self.src[self.pos] != b'.' {
                self.lex_digit_run(start, |b| b.is_ascii_digit())?;
            }
            if self.peek_at(0) == Some(b'.') && self.peek_at(1) != Some(b'.') {
                is_float = true;
                self.pos += 1;
                if self.peek_at(0).is_some_and(|b| b.is_ascii_digit()) {
                    self.lex_digit_run(start, |b| b.is_ascii_digit())?;
                }
            }
            if matches!(self.peek_at(0), Some(b'e' | b'E'))
                && (self.peek_at(1).is_some_and(|b| b.is_ascii_digit())
                    || matches!(self.peek_at(1), Some(b'+' | b'-'))
                        && self.peek_at(2).is_some_and(|b| b.is_ascii_digit()))
            {
                is_float = true;
                self.pos += 1;
                if matches!(self.peek_at(0), Some(b'+' | b'-')) {
                    self.pos += 1;
                }
                self.lex_digit_run(start, |b| b.is_ascii_digit())?;
            }
        }

        if self.peek_at(0).is_some_and(Self::is_ident_start) {
            return Err(ParseError::syntax(
                format!(
                    "trailing junk after numeric literal: '{}'",
                    &self.text[start..self.pos]
                ),
                start,
            ));
        }

        let spelling = self.text[start..self.pos].to_owned();
        Ok(if is_float {
            TokenKind::Float(spelling)
        } else {
            TokenKind::Integer(spelling)
        })
    }

    // -- parameters and dollar quoting --------------------------------------

    fn lex_dollar(&mut self, start: usize) -> Result<TokenKind, ParseError> {
        self.pos += 1;
        if self.peek_at(0).is_some_and(|b| b.is_ascii_digit()) {
            let digit_start = self.pos;
            while self.peek_at(0).is_some_and(|b| b.is_ascii_digit()) {
                self.pos += 1;
            }
            if self.peek_at(0).is_some_and(Self::is_ident_start) {
                return Err(ParseError::syntax(
                    "trailing junk after positional parameter",
                    start,
                ));
            }
            let number: u32 = self.text[digit_start..self.pos]
                .parse()
                .map_err(|_| ParseError::syntax("positional parameter too large", start))?;
            if number == 0 {
                return Err(ParseError::syntax("there is no parameter $0", start));
            }
            return Ok(TokenKind::PositionalParam(number));
        }

        // Dollar-quoted string: $tag$ ... $tag$
        if self.peek_at(0).is_some_and(Self::is_ident_start) {
            self.pos += 1;
            while self.peek_at(0).is_some_and(Self::is_ident_cont) {
                self.pos += 1;
            }
        }
        if self.peek_at(0) != Some(b'$') {
            return Err(ParseError::syntax("unexpected '$'", start));
        }
        self.pos += 1;
        let delimiter = &self.text[start..self.pos];
        match self.text[self.pos..].find(delimiter) {
            Some(offset) => {
                let value = self.text[self.pos..self.pos + offset].to_owned();
                self.pos += offset + delimiter.len();
                Ok(TokenKind::String(value))
            }
            None => Err(ParseError::syntax("unterminated dollar-quoted string", start)),
        }
    }

    // -- quoted strings -----------------------------------------------------

    /// Lex the remainder of a single-quoted literal (opening quote and any
    /// prefix already consumed), then fold in adjacent literals separated
    /// only by whitespace/comments.
    fn lex_string(&mut self, mode: QuoteMode, start: usize) -> Result<String, ParseError> {
        let mut value = self.lex_string_piece(mode, start)?;
        loop {
            let saved = self.pos;
            self.skip_whitespace_and_comments()?;
            if self.pos > saved && self.peek_at(0) == Some(b'\'') {
                let piece_start = self.pos;
                self.pos += 1;
                value.push_str(&self.lex_string_piece(mode, piece_start)?);
            } else {
                self.pos = saved;
                break;
            }
        }
        Ok(value)
    }

    /// Lex one quoted piece, starting just after the opening quote.
    fn lex_string_piece(&mut self, mode: QuoteMode, start: usize) -> Result<String, ParseError> {
        let piece_start = self.pos;
        let mut raw = Vec::new();
        loop {
            let Some(b) = self.peek_at(0) else {
                return Err(ParseError::syntax("unterminated string literal", start));
            };
            match b {
                b'\'' => {
                    if self.peek_at(1) == Some(b'\'') {
                        raw.extend_from_slice(b"''");
                        self.pos += 2;
                    } else {
                        self.pos += 1;
                        break;
                    }
                }
                b'\\' if mode == QuoteMode::Backslash => {
                    raw.push(b'\\');
                    self.pos += 1;
                    if let Some(next) = self.peek_at(0) {
                        raw.push(next);
                        self.pos += 1;
                    }
                }
                _ => {
                    raw.push(b);
                    self.pos += 1;
                }
            }
        }
        let raw = String::from_utf8(raw)
            .map_err(|_| ParseError::syntax("invalid byte sequence in string literal", start))?;
        match mode {
            QuoteMode::Raw => Ok(raw),
            QuoteMode::DoubledOnly => Ok(raw.replace("''", "'")),
            QuoteMode::Backslash => unescape_c_style(&raw, piece_start),
        }
    }

    // -- operators ----------------------------------------------------------

    fn lex_operator(&mut self) -> TokenKind {
        let start = self.pos;
        let mut length = 0;
        while self
            .peek_at(length)
            .is_some_and(|b| CHARS_OPERATOR.contains(&b))
        {
            length += 1;
        }
        let glyphs = &self.src[start..start + length];

        // An embedded comment start terminates the operator.
        if let Some(at) = find_subslice(glyphs, b"--") {
            length = length.min(at);
        }
        if let Some(at) = find_subslice(glyphs, b"/*") {
            length = length.min(at);
        }

        // A multi-character operator may only end in `+` or `-` if it
        // contains at least one non-standard character.
        if length > 1 && matches!(self.src[start + length - 1], b'+' | b'-') {
            let has_non_standard = self.src[start..start + length]
                .iter()
                .any(|b| CHARS_NON_STANDARD.contains(b));
            if !has_non_standard {
                while length > 1 && matches!(self.src[start + length - 1], b'+' | b'-') {
                    length -= 1;
                }
            }
        }

        let glyphs = &self.text[start..start + length];
        self.pos = start + length;

        if length == 1 && CHARS_SPECIAL.contains(&glyphs.as_bytes()[0]) {
            return TokenKind::Special(glyphs.as_bytes()[0] as char);
        }
        if length == 2 {
            match glyphs {
                "=>" => return TokenKind::EqualsGreater,
                "<=" | ">=" | "!=" | "<>" => {
                    return TokenKind::Inequality(glyphs.to_owned());
                }
                _ => {}
            }
        }
        TokenKind::Operator(glyphs.to_owned())
    }
}

impl QuoteMode {
    fn from_options(options: &LexerOptions) -> Self {
        if options.standard_conforming_strings {
            Self::DoubledOnly
        } else {
            Self::Backslash
        }
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Replace backslash escape sequences in an `e'...'` body.
fn unescape_c_style(raw: &str, position: usize) -> Result<String, ParseError> {
    let bytes = raw.as_bytes();
    let mut out = String::new();
    let mut i = 0;
    // First half of a UTF-16 surrogate pair waiting for its partner.
    let mut pending_surrogate: Option<u32> = None;

    let push_code_point = |out: &mut String,
                           pending: &mut Option<u32>,
                           code: u32|
     -> Result<(), ParseError> {
        let is_first = (0xD800..=0xDBFF).contains(&code);
        let is_second = (0xDC00..=0xDFFF).contains(&code);
        match (pending.take(), is_first, is_second) {
            (None, true, _) => {
                *pending = Some(code);
                Ok(())
            }
            (Some(first), _, true) => {
                let combined = (((first & 0x3FF) << 10) | (code & 0x3FF)) + 0x10000;
                let ch = char::from_u32(combined).ok_or_else(|| {
                    ParseError::syntax("invalid Unicode escape value", position)
                })?;
                out.push(ch);
                Ok(())
            }
            (None, false, true) | (Some(_), _, _) => {
                Err(ParseError::syntax("invalid Unicode surrogate pair", position))
            }
            (None, false, false) => {
                let ch = char::from_u32(code).ok_or_else(|| {
                    ParseError::syntax("invalid Unicode escape value", position)
                })?;
                out.push(ch);
                Ok(())
            }
        }
    };

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\'' {
            // Scanner guarantees interior quotes are doubled.
            out.push('\'');
            i += 2;
            continue;
        }
        if b != b'\\' {
            let ch = raw[i..].chars().next().expect("valid UTF-8");
            if pending_surrogate.is_some() {
                return Err(ParseError::syntax(
                    "unfinished Unicode surrogate pair",
                    position,
                ));
            }
            out.push(ch);
            i += ch.len_utf8();
            continue;
        }
        i += 1;
        let Some(&escape) = bytes.get(i) else {
            return Err(ParseError::syntax("unterminated string literal", position));
        };
        match escape {
            b'u' | b'U' => {
                let width = if escape == b'u' { 4 } else { 8 };
                i += 1;
                if i + width > bytes.len()
                    || !bytes[i..i + width].iter().all(u8::is_ascii_hexdigit)
                {
                    return Err(ParseError::syntax("invalid Unicode escape value", position));
                }
                let code = u32::from_str_radix(&raw[i..i + width], 16)
                    .map_err(|_| ParseError::syntax("invalid Unicode escape value", position))?;
                push_code_point(&mut out, &mut pending_surrogate, code)?;
                i += width;
            }
            _ if pending_surrogate.is_some() => {
                return Err(ParseError::syntax(
                    "unfinished Unicode surrogate pair",
                    position,
                ));
            }
            b'b' => {
                out.push('\u{8}');
                i += 1;
            }
            b'f' => {
                out.push('\u{c}');
                i += 1;
            }
            b'n' => {
                out.push('\n');
                i += 1;
            }
            b'r' => {
                out.push('\r');
                i += 1;
            }
            b't' => {
                out.push('\t');
                i += 1;
            }
            b'v' => {
                out.push('\u{b}');
                i += 1;
            }
            b'x' => {
                i += 1;
                let mut digits = 0;
                let mut code = 0u32;
                while digits < 2 && bytes.get(i).is_some_and(u8::is_ascii_hexdigit) {
                    code = code * 16 + u32::from((bytes[i] as char).to_digit(16).unwrap_or(0));
                    i += 1;
                    digits += 1;
                }
                if digits == 0 {
                    // Just `\x` with no digits: the `x` stands for itself.
                    out.push('x');
                } else {
                    out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
                }
            }
            b'0'..=b'7' => {
                let mut digits = 0;
                let mut code = 0u32;
                while digits < 3 && matches!(bytes.get(i), Some(b'0'..=b'7')) {
                    code = code * 8 + u32::from(bytes[i] - b'0');
                    i += 1;
                    digits += 1;
                }
                out.push(char::from_u32(code).unwrap_or('\u{fffd}'));
            }
            _ => {
                // Strip the backslash, keep the character.
                let ch = raw[i..].chars().next().expect("valid UTF-8");
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }
    if pending_surrogate.is_some() {
        return Err(ParseError::syntax(
            "unfinished Unicode surrogate pair",
            position,
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(sql: &str) -> Vec<TokenKind> {
        Lexer::tokenize(sql, LexerOptions::default())
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn lex_err(sql: &str) -> ParseError {
        Lexer::tokenize(sql, LexerOptions::default()).unwrap_err()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        let tokens = kinds("SELECT Foo FROM bar_1");
        assert_eq!(tokens[0], TokenKind::Keyword(Keyword::Select));
        assert_eq!(tokens[1], TokenKind::Identifier("foo".to_owned()));
        assert_eq!(tokens[2], TokenKind::Keyword(Keyword::From));
        assert_eq!(tokens[3], TokenKind::Identifier("bar_1".to_owned()));
        assert_eq!(tokens[4], TokenKind::Eof);
    }

    #[test]
    fn test_quoted_identifier_preserves_case() {
        let tokens = kinds(r#""MiXeD" "wei""rd""#);
        assert_eq!(tokens[0], TokenKind::Identifier("MiXeD".to_owned()));
        assert_eq!(tokens[1], TokenKind::Identifier("wei\"rd".to_owned()));
    }

    #[test]
    fn test_zero_length_quoted_identifier() {
        assert!(matches!(lex_err("\"\""), ParseError::Syntax { .. }));
    }

    #[test]
    fn test_numeric_literals_keep_spelling() {
        let tokens = kinds("42 1.50 1e10 0x1F 0o17 0b101 1_000_000 .5");
        assert_eq!(tokens[0], TokenKind::Integer("42".to_owned()));
        assert_eq!(tokens[1], TokenKind::Float("1.50".to_owned()));
        assert_eq!(tokens[2], TokenKind::Float("1e10".to_owned()));
        assert_eq!(tokens[3], TokenKind::Integer("0x1F".to_owned()));
        assert_eq!(tokens[4], TokenKind::Integer("0o17".to_owned()));
        assert_eq!(tokens[5], TokenKind::Integer("0b101".to_owned()));
        assert_eq!(tokens[6], TokenKind::Integer("1_000_000".to_owned()));
        assert_eq!(tokens[7], TokenKind::Float(".5".to_owned()));
    }

    #[test]
    fn test_trailing_junk_after_number() {
        assert!(matches!(lex_err("123abc"), ParseError::Syntax { .. }));
        assert!(matches!(lex_err("$1a"), ParseError::Syntax { .. }));
    }

    #[test]
    fn test_string_literals() {
        let tokens = kinds("'hello' 'it''s'");
        assert_eq!(tokens[0], TokenKind::String("hello".to_owned()));
        assert_eq!(tokens[1], TokenKind::String("it's".to_owned()));
    }

    #[test]
    fn test_adjacent_literals_concatenate() {
        let tokens = kinds("'foo' 'bar'");
        assert_eq!(tokens[0], TokenKind::String("foobar".to_owned()));
        assert_eq!(tokens[1], TokenKind::Eof);

        let tokens = kinds("select 'a' /* c */ 'b'");
        assert_eq!(tokens[1], TokenKind::String("ab".to_owned()));
    }

    #[test]
    fn test_escape_string_backslashes() {
        let tokens = kinds(r"e'a\nb\tA'");
        assert_eq!(tokens[0], TokenKind::String("a\nb\tA".to_owned()));
    }

    #[test]
    fn test_escape_string_surrogate_pair() {
        let tokens = kinds(r"e'😀'");
        assert_eq!(tokens[0], TokenKind::String("😀".to_owned()));
        assert!(matches!(lex_err(r"e'\ud83d'"), ParseError::Syntax { .. }));
    }

    #[test]
    fn test_non_standard_conforming_strings() {
        let options = LexerOptions {
            standard_conforming_strings: false,
            ..LexerOptions::default()
        };
        let tokens = Lexer::tokenize(r"'a\nb'", options).unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String("a\nb".to_owned()));
        // With the default, the backslash is literal.
        let tokens = kinds(r"'a\nb'");
        assert_eq!(tokens[0], TokenKind::String("a\\nb".to_owned()));
    }

    #[test]
    fn test_dollar_quoting() {
        let tokens = kinds("$$plain$$ $tag$with $other$ inside$tag$");
        assert_eq!(tokens[0], TokenKind::String("plain".to_owned()));
        assert_eq!(
            tokens[1],
            TokenKind::String("with $other$ inside".to_owned())
        );
    }

    #[test]
    fn test_same_tag_dollar_strings_do_not_interfere() {
        let tokens = kinds("$q$one$q$ $q$two$q$");
        assert_eq!(tokens[0], TokenKind::String("one".to_owned()));
        assert_eq!(tokens[1], TokenKind::String("two".to_owned()));
    }

    #[test]
    fn test_hex_and_binary_strings() {
        let tokens = kinds("x'2d' b'0101'");
        assert_eq!(tokens[0], TokenKind::HexString("2d".to_owned()));
        assert_eq!(tokens[1], TokenKind::BinaryString("0101".to_owned()));
        assert!(matches!(lex_err("b'012'"), ParseError::Syntax { .. }));
        assert!(matches!(lex_err("x'xy'"), ParseError::Syntax { .. }));
    }

    #[test]
    fn test_parameters() {
        let tokens = kinds(":foo $2");
        assert_eq!(tokens[0], TokenKind::NamedParam("foo".to_owned()));
        assert_eq!(tokens[1], TokenKind::PositionalParam(2));
        assert!(matches!(lex_err("$0"), ParseError::Syntax { .. }));
    }

    #[test]
    fn test_nested_block_comments() {
        let tokens = kinds("a /* outer /* inner */ still outer */ b");
        assert_eq!(tokens[0], TokenKind::Identifier("a".to_owned()));
        assert_eq!(tokens[1], TokenKind::Identifier("b".to_owned()));
        assert!(matches!(lex_err("/* /* */"), ParseError::Syntax { .. }));
    }

    #[test]
    fn test_operator_maximal_munch() {
        let tokens = kinds("a->>b");
        assert_eq!(tokens[1], TokenKind::Operator("->>".to_owned()));

        // `--` starts a comment even inside an operator candidate.
        let tokens = kinds("a--b\nc");
        assert_eq!(tokens[0], TokenKind::Identifier("a".to_owned()));
        assert_eq!(tokens[1], TokenKind::Identifier("c".to_owned()));
    }

    #[test]
    fn test_operator_trailing_plus_minus_rule() {
        // `@-` keeps its minus (contains a non-standard char)...
        let tokens = kinds("a @- b");
        assert_eq!(tokens[1], TokenKind::Operator("@-".to_owned()));
        // ...but `*-` splits into `*` and unary `-`.
        let tokens = kinds("a *- b");
        assert_eq!(tokens[1], TokenKind::Special('*'));
        assert_eq!(tokens[2], TokenKind::Special('-'));
    }

    #[test]
    fn test_special_multi_char_tokens() {
        let tokens = kinds(":: := => <= >= != <>");
        assert_eq!(tokens[0], TokenKind::Typecast);
        assert_eq!(tokens[1], TokenKind::ColonEquals);
        assert_eq!(tokens[2], TokenKind::EqualsGreater);
        assert_eq!(tokens[3], TokenKind::Inequality("<=".to_owned()));
        assert_eq!(tokens[4], TokenKind::Inequality(">=".to_owned()));
        assert_eq!(tokens[5], TokenKind::Inequality("!=".to_owned()));
        assert_eq!(tokens[6], TokenKind::Inequality("<>".to_owned()));
    }

    #[test]
    fn test_slice_colon_is_special() {
        let tokens = kinds("a[1:2]");
        assert_eq!(tokens[1], TokenKind::Special('['));
        assert_eq!(tokens[3], TokenKind::Special(':'));
    }

    #[test]
    fn test_double_dot_rejected() {
        assert!(matches!(lex_err("a..b"), ParseError::Syntax { .. }));
    }

    #[test]
    fn test_unicode_literals_not_implemented() {
        assert!(matches!(
            lex_err("u&'d\\0061t'"),
            ParseError::NotImplemented { .. }
        ));
    }

    #[test]
    fn test_positions_are_byte_offsets() {
        let tokens = Lexer::tokenize("select  foo", LexerOptions::default()).unwrap();
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[1].position, 8);
    }
}
