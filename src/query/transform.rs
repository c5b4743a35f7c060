//! Value-transform plugins for condition values.
//!
//! A transform is registered under a string prefix. When a condition value
//! starts with a registered prefix, the prefix is stripped and the remainder is
//! handed to the transform, whose output replaces the value. Prefixes are
//! tried in registration order and the chain keeps going while some prefix
//! still matches, so `param:` can produce a `strtotime:` expression that is
//! then evaluated. Passes are capped at [`MAX_TRANSFORM_PASSES`].
//!
//! Built-in transforms:
//!
//! | Prefix       | Transform                 | Example                     |
//! |--------------|---------------------------|-----------------------------|
//! | `strtotime:` | [`RelativeDateTransform`] | `strtotime:-1 week`         |
//! | `param:`     | [`ParameterTransform`]    | `param:region`              |

use std::collections::{BTreeMap, HashMap};

use chrono::{Local, Months, NaiveDateTime, NaiveTime, TimeDelta};

/// Upper bound on transform passes over a single value.
pub const MAX_TRANSFORM_PASSES: usize = 8;

/// Output format of [`RelativeDateTransform`].
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Request-time parameter lookup.
pub trait ParameterSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// A parameter source with no parameters.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoParameters;

impl ParameterSource for NoParameters {
    fn get(&self, _name: &str) -> Option<String> {
        None
    }
}

impl ParameterSource for HashMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        HashMap::get(self, name).cloned()
    }
}

impl ParameterSource for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<String> {
        BTreeMap::get(self, name).cloned()
    }
}

/// What a transform may consult besides its argument.
pub struct TransformContext<'a> {
    /// Request-time parameters.
    pub params: &'a dyn ParameterSource,
    /// The definition's default parameters.
    pub defaults: &'a BTreeMap<String, String>,
}

/// A value transform. Receives the value with its prefix already stripped.
pub trait ValueTransform {
    fn apply(&self, argument: &str, ctx: &TransformContext<'_>) -> String;
}

/// Ordered `(prefix, transform)` pairs.
pub struct TransformChain {
    transforms: Vec<(String, Box<dyn ValueTransform>)>,
}

impl Default for TransformChain {
    /// The built-in transforms: relative dates, then parameters.
    fn default() -> Self {
        Self::empty()
            .with("strtotime:", RelativeDateTransform::default())
            .with("param:", ParameterTransform)
    }
}

impl TransformChain {
    pub fn empty() -> Self {
        Self {
            transforms: Vec::new(),
        }
    }

    /// Register a transform after the existing ones.
    pub fn with(mut self, prefix: &str, transform: impl ValueTransform + 'static) -> Self {
        self.transforms.push((prefix.to_string(), Box::new(transform)));
        self
    }

    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.transforms.iter().map(|(p, _)| p.as_str())
    }

    /// Apply matching transforms to `value` until none match.
    pub fn apply(&self, value: &str, ctx: &TransformContext<'_>) -> String {
        let mut current = value.to_string();
        for _ in 0..MAX_TRANSFORM_PASSES {
            let matched = self
                .transforms
                .iter()
                .find(|(prefix, _)| current.starts_with(prefix.as_str()));
            match matched {
                Some((prefix, transform)) => {
                    current = transform.apply(&current[prefix.len()..], ctx);
                }
                None => break,
            }
        }
        current
    }
}

/// Substitutes a named parameter.
///
/// The request parameters are consulted first, then the definition's
/// defaults. A name found in neither becomes the empty string.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParameterTransform;

impl ValueTransform for ParameterTransform {
    fn apply(&self, argument: &str, ctx: &TransformContext<'_>) -> String {
        let name = argument.trim();
        ctx.params
            .get(name)
            .or_else(|| ctx.defaults.get(name).cloned())
            .unwrap_or_default()
    }
}

/// Evaluates relative date expressions such as `today`, `-1 week`,
/// `3 days ago` or `yesterday +2 hours` into `YYYY-MM-DD HH:MM:SS`.
///
/// Input it cannot understand is returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct RelativeDateTransform {
    now: Option<NaiveDateTime>,
}

impl RelativeDateTransform {
    /// Evaluate against a fixed instant instead of the local clock.
    pub fn at(now: NaiveDateTime) -> Self {
        Self { now: Some(now) }
    }

    /// Evaluate `expr` relative to `now`.
    pub fn evaluate(expr: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let lowered = expr.trim().to_ascii_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();
        if words.is_empty() {
            return None;
        }

        let mut at = now;
        let mut i = 0;

        // Optional anchor.
        match words[0] {
            "now" => i += 1,
            "today" | "midnight" => {
                at = at.date().and_time(NaiveTime::MIN);
                i += 1;
            }
            "yesterday" => {
                at = shift(at.date().and_time(NaiveTime::MIN), -1, "day")?;
                i += 1;
            }
            "tomorrow" => {
                at = shift(at.date().and_time(NaiveTime::MIN), 1, "day")?;
                i += 1;
            }
            _ => {}
        }

        while i < words.len() {
            let (amount, unit, consumed) = match words[i] {
                "next" => (1, *words.get(i + 1)?, 2),
                "last" => (-1, *words.get(i + 1)?, 2),
                word => {
                    let (amount, unit, consumed) = split_amount(word, words.get(i + 1).copied())?;
                    // `3 days ago`
                    if words.get(i + consumed) == Some(&"ago") {
                        (amount.checked_neg()?, unit, consumed + 1)
                    } else {
                        (amount, unit, consumed)
                    }
                }
            };
            at = shift(at, amount, unit)?;
            i += consumed;
        }

        Some(at)
    }
}

impl ValueTransform for RelativeDateTransform {
    fn apply(&self, argument: &str, _ctx: &TransformContext<'_>) -> String {
        let now = self.now.unwrap_or_else(|| Local::now().naive_local());
        match Self::evaluate(argument, now) {
            Some(at) => at.format(DATE_TIME_FORMAT).to_string(),
            None => {
                tracing::warn!(expression = argument, "unrecognised relative date");
                argument.to_string()
            }
        }
    }
}

/// Split `+3 days`, `+3days` or `-1 week` into amount, unit and words used.
fn split_amount<'a>(word: &'a str, next: Option<&'a str>) -> Option<(i64, &'a str, usize)> {
    let digits_end = word
        .char_indices()
        .find(|(idx, c)| !(c.is_ascii_digit() || (*idx == 0 && (*c == '+' || *c == '-'))))
        .map_or(word.len(), |(idx, _)| idx);
    let amount: i64 = word[..digits_end].parse().ok()?;
    if digits_end < word.len() {
        Some((amount, &word[digits_end..], 1))
    } else {
        Some((amount, next?, 2))
    }
}

fn shift(at: NaiveDateTime, amount: i64, unit: &str) -> Option<NaiveDateTime> {
    let unit = unit.strip_suffix('s').unwrap_or(unit);
    let delta = match unit {
        "sec" | "second" => TimeDelta::try_seconds(amount)?,
        "min" | "minute" => TimeDelta::try_minutes(amount)?,
        "hour" => TimeDelta::try_hours(amount)?,
        "day" => TimeDelta::try_days(amount)?,
        "week" => TimeDelta::try_weeks(amount)?,
        "fortnight" => TimeDelta::try_weeks(amount.checked_mul(2)?)?,
        "month" => return shift_months(at, amount),
        "year" => return shift_months(at, amount.checked_mul(12)?),
        _ => return None,
    };
    at.checked_add_signed(delta)
}

fn shift_months(at: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        at.checked_add_months(magnitude)
    } else {
        at.checked_sub_months(magnitude)
    }
}
