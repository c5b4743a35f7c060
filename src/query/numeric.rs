//! Numeric coercion for alphanumeric strings.

/// Read the longest leading numeric prefix of `s`.
///
/// Mirrors how SQL engines cast text to a number: leading whitespace and a
/// sign are accepted, then digits with an optional fractional part. Anything
/// after the prefix is ignored and a string without a prefix reads as zero.
///
/// ```
/// use folio::query::numeric::leading_number;
///
/// assert_eq!(leading_number("11-doc"), 11.0);
/// assert_eq!(leading_number(" -2.5kg"), -2.5);
/// assert_eq!(leading_number("doc-11"), 0.0);
/// ```
pub fn leading_number(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut has_digits = end > digits_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if frac_end > frac_start {
            has_digits = true;
            end = frac_end;
        } else if has_digits {
            end = frac_start;
        }
    }

    if !has_digits {
        return 0.0;
    }
    s[..end].trim_end_matches('.').parse().unwrap_or(0.0)
}
