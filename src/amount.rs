// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Lenient parsing of user-entered transfer amounts.
//!
//! Amounts arrive as free-form strings from input fields. Parsing follows the
//! "longest numeric prefix" rule: leading whitespace is skipped, the longest
//! prefix that forms a decimal number is used, and anything after it is
//! ignored. A string with no numeric prefix yields `0.0`.
//!
//! | Input | Parsed |
//! |-------|--------|
//! | `"100"` | `100.0` |
//! | `" 50.5"` | `50.5` |
//! | `"12abc"` | `12.0` |
//! | `"1,000"` | `1.0` |
//! | `"abc"` | `0.0` |
//! | `""` | `0.0` |

/// Parse an amount string, returning `0.0` when no number can be read.
///
/// Never returns NaN or an infinity, so sums over parsed amounts stay finite.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return 0.0;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

/// Sum a sequence of amount strings, counting unparsable entries as zero.
pub fn sum_amounts<'a>(amounts: impl IntoIterator<Item = &'a str>) -> f64 {
    amounts.into_iter().map(parse_amount).sum()
}
