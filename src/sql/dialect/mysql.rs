//! MySQL SQL dialect.
//!
//! MySQL differences:
//! - Backtick identifier quoting (`` `name` ``)
//! - Positional `?` bind parameters
//! - Adding zero (`x + 0`) coerces text to its leading number
//! - Null-safe equality is the `<=>` operator

use super::helpers;
use super::SqlDialect;
use crate::sql::token::{Token, TokenStream};

/// MySQL SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct MySql;

impl SqlDialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick(ident)
    }

    // Uses default placeholder (?)

    fn emit_numeric_sort(&self, ident: &str) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(ident.into()))
            .space()
            .push(Token::Plus)
            .space()
            .push(Token::LitInt(0));
        ts
    }

    fn emit_null_safe_compare(
        &self,
        lhs: &TokenStream,
        rhs: &TokenStream,
        negated: bool,
    ) -> TokenStream {
        let mut ts = TokenStream::new();
        if negated {
            ts.push(Token::Not).space().lparen();
        }
        ts.append(lhs)
            .space()
            .push(Token::NullSafeEq)
            .space()
            .append(rhs);
        if negated {
            ts.rparen();
        }
        ts
    }
}
