use alloy::primitives::{I256, U256};
use chrono::Utc;

/// Fractional digits of the native currency (wei per unit = 10^18).
pub const NATIVE_DECIMALS: usize = 18;

pub fn now_naive() -> chrono::NaiveDateTime {
    Utc::now().naive_utc()
}

pub fn millis(ts: chrono::NaiveDateTime) -> i64 {
    ts.and_utc().timestamp_millis()
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Splits a plain non-negative decimal (`"12"`, `"12.5"`, `".5"`, `"12."`)
/// into its integer and fractional digit runs.
fn split_decimal(raw: &str) -> Option<(&str, &str)> {
    let trimmed = raw.trim();
    let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    Some((int_part, frac_part))
}

/// `floor(raw)` for a non-negative decimal string, or `None` if `raw` is not one.
pub fn floor_decimal(raw: &str) -> Option<U256> {
    let (int_part, _) = split_decimal(raw)?;
    if int_part.is_empty() {
        return Some(U256::ZERO);
    }
    U256::from_str_radix(int_part, 10).ok()
}

/// Parses a signed integer amount such as `"-250"` or `"+10"`.
pub fn parse_signed_integer(raw: &str) -> Option<I256> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix('-')
        .or_else(|| trimmed.strip_prefix('+'))
        .unwrap_or(trimmed);
    if digits.is_empty() || !all_digits(digits) {
        return None;
    }
    I256::from_dec_str(trimmed).ok()
}

/// Converts a native-unit decimal (`"1.5"`) to wei. At most 18 fractional
/// digits are accepted.
pub fn parse_native_amount(raw: &str) -> Option<U256> {
    let (int_part, frac_part) = split_decimal(raw)?;
    if frac_part.len() > NATIVE_DECIMALS {
        return None;
    }
    let unit = U256::from(10u64).pow(U256::from(NATIVE_DECIMALS as u64));
    let whole = if int_part.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(int_part, 10).ok()?
    };
    let fraction = if frac_part.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{frac_part:0<width$}", width = NATIVE_DECIMALS);
        U256::from_str_radix(&padded, 10).ok()?
    };
    whole.checked_mul(unit)?.checked_add(fraction)
}
