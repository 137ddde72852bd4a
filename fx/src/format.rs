//! Display formatting of currency amounts.

use bizdesk_common::Currency;
use rust_decimal::{Decimal, RoundingStrategy};

/// Most fractional digits ever shown.
pub const MAX_FRACTION_DIGITS: u32 = 2;

/// Render an amount already expressed in `currency`.
///
/// Rounds half away from zero to at most two fractional digits and drops
/// trailing fractional zeros, groups the integer part by thousands, and
/// prefixes the currency symbol (`$1,000`, `-€12.5`). Currencies without a
/// known symbol are prefixed by their code (`ZZZ 1,000`).
pub fn format_amount(value: Decimal, currency: &Currency) -> String {
    let rounded = value
        .round_dp_with_strategy(MAX_FRACTION_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .normalize();

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let digits = rounded.abs().to_string();
    let (integer, fraction) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits.as_str(), None),
    };

    let mut body = group_thousands(integer);
    if let Some(fraction) = fraction {
        body.push('.');
        body.push_str(fraction);
    }

    match currency.symbol() {
        Some(symbol) => format!("{}{}{}", sign, symbol, body),
        None => format!("{}{} {}", sign, currency.code(), body),
    }
}

fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);

    for (i, ch) in integer.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}
