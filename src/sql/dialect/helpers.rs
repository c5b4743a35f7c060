//! Shared helper functions for SQL dialect implementations.

use super::super::token::{Token, TokenStream};

// =============================================================================
// Identifier Quoting
// =============================================================================

/// Quote identifier with double quotes (ANSI style).
/// Used by: SQLite, Postgres
pub fn quote_double(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quote identifier with backticks.
/// Used by: MySQL
pub fn quote_backtick(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

// =============================================================================
// Placeholders
// =============================================================================

/// Numbered `?N` placeholder.
/// Used by: SQLite
pub fn placeholder_question_numbered(n: usize) -> String {
    format!("?{}", n)
}

/// Numbered `$N` placeholder.
/// Used by: Postgres
pub fn placeholder_dollar(n: usize) -> String {
    format!("${}", n)
}

// =============================================================================
// Expressions
// =============================================================================

/// `CAST(<ident> AS <ty>)`.
pub fn cast_ident(ident: &str, ty: Token) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.push(Token::Cast)
        .lparen()
        .push(Token::Ident(ident.into()))
        .space()
        .push(Token::As)
        .space()
        .push(ty)
        .rparen();
    ts
}

/// `<lhs> IS [NOT] DISTINCT FROM <rhs>`, null-safe comparison with a value.
/// Used by: SQLite (3.39+), Postgres
pub fn distinct_from(lhs: &TokenStream, rhs: &TokenStream, negated: bool) -> TokenStream {
    let mut ts = TokenStream::new();
    ts.append(lhs).space().push(Token::Is).space();
    // `IS` means "not distinct", `IS NOT` means "distinct"
    if !negated {
        ts.push(Token::Not).space();
    }
    ts.push(Token::Distinct)
        .space()
        .push(Token::From)
        .space()
        .append(rhs);
    ts
}
