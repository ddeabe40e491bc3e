//! Text parsing for rating and vote-count fragments.
//!
//! Both parsers degrade to a zero sentinel on malformed input; the domain
//! scale is strictly positive, so zero always reads as "absent" downstream.

/// Parse a rating fragment like `"4.6"` into a number.
///
/// The input is trimmed and parsed as a decimal; anything unparsable,
/// non-finite, or negative yields `0.0`.
pub fn parse_rating(text: &str) -> f64 {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => 0.0,
    }
}

/// Parse a vote-count fragment like `"(121.4k)"` into an absolute count.
///
/// Grammar: `'(' digits ['.' digits] [k|K] ')'` applied to the trimmed
/// input. A trailing `k`/`K` multiplies by 1000 (`"(121.4k)"` → 121400).
/// Anything that does not match the grammar yields `0`.
pub fn parse_votes(text: &str) -> u64 {
    let trimmed = text.trim();

    let Some(inner) = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return 0;
    };

    let (number, thousands) = match inner.strip_suffix(['k', 'K']) {
        Some(prefix) => (prefix, true),
        None => (inner, false),
    };

    if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return 0;
    }
    // Exactly one integer part and at most one fraction part
    let mut parts = number.split('.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();
    if parts.next().is_some() || int_part.is_empty() {
        return 0;
    }
    if let Some(frac) = frac_part {
        if frac.is_empty() {
            return 0;
        }
    }

    let Ok(value) = number.parse::<f64>() else {
        return 0;
    };

    let scaled = if thousands { value * 1000.0 } else { value };
    scaled.round() as u64
}

/// Render a rating the way a page would display it: integral values
/// without a decimal point (`4.0` → `"4"`), everything else as-is.
pub fn format_rating(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{}", rating as i64)
    } else {
        format!("{}", rating)
    }
}
