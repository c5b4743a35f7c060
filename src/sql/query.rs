//! Report SELECT builder.
//!
//! Turns a [`QueryRequest`] into SQL text plus an ordered list of bind
//! values. Identifiers are quoted by the dialect and every condition operand
//! becomes a placeholder, so no authored value is ever spliced into the SQL.

use std::fmt;

use super::dialect::{Dialect, SqlDialect};
use super::token::{Token, TokenStream};
use crate::query::{CompiledCondition, CompiledSort, ConditionValue, Operator, SortDirection};
use crate::source::QueryRequest;

/// An ORDER BY key.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderKey {
    pub column: String,
    pub direction: SortDirection,
    pub numeric: bool,
}

impl From<&CompiledSort> for OrderKey {
    fn from(sort: &CompiledSort) -> Self {
        Self {
            column: sort.field.key.clone(),
            direction: sort.direction,
            numeric: sort.numeric,
        }
    }
}

/// SQL text with its bind values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub binds: Vec<String>,
    pub dialect: Dialect,
}

impl fmt::Display for BuiltQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)
    }
}

/// A flat, filtered, ordered SELECT over one relation.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "SelectQuery has no effect until converted to SQL with build()"]
pub struct SelectQuery {
    pub table: String,
    pub columns: Vec<String>,
    pub conditions: Vec<CompiledCondition>,
    pub order_by: Vec<OrderKey>,
}

impl SelectQuery {
    pub fn new(table: &str) -> Self {
        Self {
            table: table.into(),
            ..Default::default()
        }
    }

    /// Build the query for a data-source request.
    ///
    /// When the request paginates, the pagination column is ordered first so
    /// that each page is a contiguous run of rows.
    pub fn from_request(request: &QueryRequest) -> Self {
        let mut order_by: Vec<OrderKey> = request.sort.iter().map(OrderKey::from).collect();
        if let Some(page) = &request.paginate_by {
            if order_by.first().map(|k| k.column.as_str()) != Some(page.key.as_str()) {
                order_by.insert(
                    0,
                    OrderKey {
                        column: page.key.clone(),
                        direction: SortDirection::Asc,
                        numeric: false,
                    },
                );
            }
        }

        Self {
            table: request.record_set.clone(),
            columns: request.fields.iter().map(|f| f.key.clone()).collect(),
            conditions: request.conditions.clone(),
            order_by,
        }
    }

    pub fn column(mut self, column: &str) -> Self {
        self.columns.push(column.into());
        self
    }

    pub fn filter(mut self, condition: CompiledCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn order(mut self, key: OrderKey) -> Self {
        self.order_by.push(key);
        self
    }

    /// Render to SQL and collect bind values.
    pub fn build(&self, dialect: Dialect) -> BuiltQuery {
        let mut binds = Vec::new();
        let ts = self.to_tokens(dialect, &mut binds);
        BuiltQuery {
            sql: ts.serialize(dialect),
            binds,
            dialect,
        }
    }

    fn to_tokens(&self, dialect: Dialect, binds: &mut Vec<String>) -> TokenStream {
        let mut ts = TokenStream::new();

        ts.push(Token::Select);
        for (i, column) in self.columns.iter().enumerate() {
            if i == 0 {
                ts.newline().indent(1);
            } else {
                ts.comma().newline().indent(1);
            }
            ts.push(Token::Ident(column.clone()));
        }

        ts.newline()
            .push(Token::From)
            .space()
            .push(Token::Ident(self.table.clone()));

        for (i, condition) in self.conditions.iter().enumerate() {
            ts.newline();
            if i == 0 {
                ts.push(Token::Where).space();
            } else {
                ts.indent(1).push(Token::And).space();
            }
            ts.append(&condition_tokens(condition, dialect, binds));
        }

        if !self.order_by.is_empty() {
            ts.newline().push(Token::OrderBy).space();
            for (i, key) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                if key.numeric {
                    ts.append(&dialect.emit_numeric_sort(&key.column));
                } else {
                    ts.push(Token::Ident(key.column.clone()));
                }
                ts.space().push(match key.direction {
                    SortDirection::Asc => Token::Asc,
                    SortDirection::Desc => Token::Desc,
                });
            }
        }

        ts
    }
}

fn bind(binds: &mut Vec<String>, value: &str) -> Token {
    binds.push(value.to_string());
    Token::Param(binds.len())
}

/// Tokens for a binary comparison operator.
fn comparison(op: Operator) -> Vec<Token> {
    match op {
        Operator::Eq | Operator::In => vec![Token::Eq],
        Operator::NotEq => vec![Token::Ne],
        Operator::Lt => vec![Token::Lt],
        Operator::LtEq => vec![Token::Lte],
        Operator::Gt => vec![Token::Gt],
        Operator::GtEq => vec![Token::Gte],
        Operator::Like => vec![Token::Like],
        Operator::NotLike => vec![Token::Not, Token::Space, Token::Like],
        Operator::Is => vec![Token::Is],
        Operator::IsNot => vec![Token::Is, Token::Space, Token::Not],
    }
}

fn condition_tokens(
    condition: &CompiledCondition,
    dialect: Dialect,
    binds: &mut Vec<String>,
) -> TokenStream {
    let mut lhs = TokenStream::new();
    lhs.push(Token::Ident(condition.field.key.clone()));

    let mut ts = TokenStream::new();
    match (&condition.value, condition.operator) {
        (ConditionValue::Null, Operator::NotEq | Operator::IsNot) => {
            ts.append(&lhs).space().push(Token::IsNotNull);
        }
        (ConditionValue::Null, _) => {
            ts.append(&lhs).space().push(Token::IsNull);
        }
        (ConditionValue::List(items), _) if items.is_empty() => {
            ts.push(Token::LitInt(1))
                .space()
                .push(Token::Eq)
                .space()
                .push(Token::LitInt(0));
        }
        (ConditionValue::List(items), _) => {
            ts.append(&lhs).space().push(Token::In).space().lparen();
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.push(bind(binds, item));
            }
            ts.rparen();
        }
        (ConditionValue::Single(value), op @ (Operator::Is | Operator::IsNot)) => {
            let mut rhs = TokenStream::new();
            rhs.push(bind(binds, value));
            ts.append(&dialect.emit_null_safe_compare(&lhs, &rhs, op == Operator::IsNot));
        }
        (ConditionValue::Single(value), op) => {
            ts.append(&lhs).space();
            ts.extend(comparison(op));
            ts.space().push(bind(binds, value));
        }
    }
    ts
}
