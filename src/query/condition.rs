//! Condition builder: compiles `(field, operator, value)` tuples.
//!
//! Conditions are authored as three parallel lists. Compilation walks them
//! by index and stops for good at the first index whose operator or value is
//! missing. Entries after that point are never considered, even when they are
//! complete. Individually invalid entries (unknown operator, unknown field)
//! are dropped on their own without affecting the rest.

use std::fmt;
use std::str::FromStr;

use crate::model::ReportDefinition;
use crate::registry::{FieldKey, FieldRegistry};

use super::transform::{ParameterSource, TransformChain, TransformContext};

/// The fixed set of condition operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Like,
    NotLike,
    In,
    Is,
    IsNot,
}

impl Operator {
    pub const ALL: [Operator; 11] = [
        Operator::Eq,
        Operator::NotEq,
        Operator::Lt,
        Operator::LtEq,
        Operator::Gt,
        Operator::GtEq,
        Operator::Like,
        Operator::NotLike,
        Operator::In,
        Operator::Is,
        Operator::IsNot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Lt => "<",
            Operator::LtEq => "<=",
            Operator::Gt => ">",
            Operator::GtEq => ">=",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::In => "IN",
            Operator::Is => "IS",
            Operator::IsNot => "IS NOT",
        }
    }

    /// Human description, as offered by editing surfaces.
    pub fn label(&self) -> &'static str {
        match self {
            Operator::Eq => "Equal To",
            Operator::NotEq => "Not Equal To",
            Operator::Lt => "Less Than",
            Operator::LtEq => "Less Than or Equal",
            Operator::Gt => "Greater Than",
            Operator::GtEq => "Greater Than or Equal",
            Operator::Like => "Contains",
            Operator::NotLike => "Does Not Contain",
            Operator::In => "In List",
            Operator::Is => "Is",
            Operator::IsNot => "Is Not",
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ");
        match normalized.to_ascii_uppercase().as_str() {
            "=" => Ok(Operator::Eq),
            "<>" | "!=" => Ok(Operator::NotEq),
            "<" => Ok(Operator::Lt),
            "<=" => Ok(Operator::LtEq),
            ">" => Ok(Operator::Gt),
            ">=" => Ok(Operator::GtEq),
            "LIKE" => Ok(Operator::Like),
            "NOT LIKE" => Ok(Operator::NotLike),
            "IN" => Ok(Operator::In),
            "IS" => Ok(Operator::Is),
            "IS NOT" => Ok(Operator::IsNot),
            _ => Err(format!("Unknown operator: {}", s)),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A shaped condition operand.
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Null,
    Single(String),
    List(Vec<String>),
}

impl ConditionValue {
    fn map(self, f: impl Fn(&str) -> String) -> Self {
        match self {
            ConditionValue::Null => ConditionValue::Null,
            ConditionValue::Single(s) => ConditionValue::Single(f(&s)),
            ConditionValue::List(items) => {
                ConditionValue::List(items.iter().map(|s| f(s)).collect())
            }
        }
    }
}

/// A validated, shaped and transformed condition.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledCondition {
    pub field: FieldKey,
    pub operator: Operator,
    pub value: ConditionValue,
}

impl fmt::Display for CompiledCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            ConditionValue::Null => write!(f, "{} {} NULL", self.field, self.operator),
            ConditionValue::Single(v) => write!(f, "{} {} '{}'", self.field, self.operator, v),
            ConditionValue::List(vs) => {
                write!(f, "{} {} ('{}')", self.field, self.operator, vs.join("', '"))
            }
        }
    }
}

/// Compiles a definition's condition lists.
pub struct ConditionBuilder<'a> {
    registry: &'a FieldRegistry,
    transforms: TransformChain,
}

impl<'a> ConditionBuilder<'a> {
    /// A builder using the built-in value transforms.
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self {
            registry,
            transforms: TransformChain::default(),
        }
    }

    pub fn with_transforms(mut self, transforms: TransformChain) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn compile(
        &self,
        definition: &ReportDefinition,
        params: &dyn ParameterSource,
    ) -> Vec<CompiledCondition> {
        let ctx = TransformContext {
            params,
            defaults: &definition.default_parameters,
        };

        let mut compiled = Vec::new();
        for (index, field) in definition.condition_fields.iter().enumerate() {
            let (Some(operator), Some(raw)) = (
                definition.condition_operators.get(index),
                definition.condition_values.get(index),
            ) else {
                tracing::debug!(index, "condition list ends at incomplete entry");
                break;
            };

            let Ok(operator) = operator.parse::<Operator>() else {
                tracing::debug!(field = %field, operator = %operator, "dropping condition with unknown operator");
                continue;
            };
            if !self.registry.contains(field) {
                tracing::debug!(field = %field, "dropping condition on unknown field");
                continue;
            }

            let value = shape_value(operator, raw).map(|v| self.transforms.apply(v, &ctx));
            compiled.push(CompiledCondition {
                field: self.registry.resolve(field),
                operator,
                value,
            });
        }
        compiled
    }
}

/// Shape a raw value for its operator.
///
/// `IN` splits on commas and trims each element; `IS`/`IS NOT` read a
/// case-insensitive `null` as an actual null. Everything else passes through
/// untouched.
pub fn shape_value(operator: Operator, raw: &str) -> ConditionValue {
    match operator {
        Operator::In => ConditionValue::List(raw.split(',').map(|s| s.trim().to_string()).collect()),
        Operator::Is | Operator::IsNot if raw.trim().eq_ignore_ascii_case("null") => {
            ConditionValue::Null
        }
        _ => ConditionValue::Single(raw.to_string()),
    }
}
