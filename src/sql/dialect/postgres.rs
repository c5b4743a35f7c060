//! PostgreSQL SQL dialect.
//!
//! PostgreSQL differences:
//! - `$N` bind parameters
//! - Casting text such as `'11-doc'` to a number fails, so numeric sorting
//!   extracts the leading number with a regex first

use super::helpers;
use super::SqlDialect;
use crate::sql::token::{Token, TokenStream};

/// Leading-number pattern used for numeric sorting.
const LEADING_NUMBER: &str = r"^\s*[-+]?[0-9]*\.?[0-9]+";

/// PostgreSQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Postgres;

impl SqlDialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn placeholder(&self, n: usize) -> String {
        helpers::placeholder_dollar(n)
    }

    /// `COALESCE(CAST(SUBSTRING(CAST(x AS TEXT) FROM '<pattern>') AS NUMERIC), 0)`
    fn emit_numeric_sort(&self, ident: &str) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Keyword("COALESCE"))
            .lparen()
            .push(Token::Cast)
            .lparen()
            .push(Token::Keyword("SUBSTRING"))
            .lparen()
            .append(&helpers::cast_ident(ident, Token::Keyword("TEXT")))
            .space()
            .push(Token::From)
            .space()
            .push(Token::LitString(LEADING_NUMBER.into()))
            .rparen()
            .space()
            .push(Token::As)
            .space()
            .push(Token::Numeric)
            .rparen()
            .comma()
            .space()
            .push(Token::LitInt(0))
            .rparen();
        ts
    }

    // Uses default emit_null_safe_compare (IS [NOT] DISTINCT FROM)
}
