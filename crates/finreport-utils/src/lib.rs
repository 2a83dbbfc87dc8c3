//! Utility functions and helpers

use rust_decimal::{Decimal, RoundingStrategy};
use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix marking ids that were minted locally and not yet persisted
pub const TEMPORARY_ID_PREFIX: &str = "new-";

static TEMPORARY_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Format a number with thousands separators
pub fn format_number<T: ToString>(n: T) -> String {
    let s = n.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let mut result = String::new();
    let mut count = 0;
    for c in digits.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(c);
        count += 1;
    }
    let grouped: String = result.chars().rev().collect();
    format!("{}{}", sign, grouped)
}

/// Format a money amount with `places` decimals and grouped integer digits
pub fn format_amount(amount: Decimal, places: u32) -> String {
    let rounded = amount.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    let text = format!("{:.*}", places as usize, rounded);
    match text.split_once('.') {
        Some((int_part, frac_part)) => format!("{}.{}", format_number(int_part), frac_part),
        None => format_number(text),
    }
}

/// Generate a temporary id (`new-<millis>-<counter>`) for unsaved records
pub fn generate_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default();
    let seq = TEMPORARY_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}{}-{}", TEMPORARY_ID_PREFIX, now, seq)
}

/// Whether `id` was produced by [`generate_id`]
pub fn is_temporary_id(id: &str) -> bool {
    id.starts_with(TEMPORARY_ID_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
        assert_eq!(format_number(-1234), "-1,234");
    }

    #[test]
    fn test_format_amount() {
        let amount = Decimal::from_f64(1234567.891).unwrap();
        assert_eq!(format_amount(amount, 2), "1,234,567.89");
        assert_eq!(format_amount(Decimal::new(-5, 1), 2), "-0.50");
        assert_eq!(format_amount(Decimal::from(1000), 0), "1,000");
    }

    #[test]
    fn test_generate_id_is_temporary_and_unique() {
        let a = generate_id();
        let b = generate_id();
        assert!(is_temporary_id(&a));
        assert!(is_temporary_id(&b));
        assert_ne!(a, b);
        assert!(!is_temporary_id("3f1c2a9e-0000-4000-8000-000000000000"));
    }
}
