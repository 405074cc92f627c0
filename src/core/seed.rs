//! Seed source: typed input sanitization and random seeds

use lazy_static::lazy_static;
use regex::Regex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::core::digits::check_width;
use crate::types::{DigitString, SequenceError};
use crate::value_space;

lazy_static! {
    static ref RE_NON_DIGIT: Regex = Regex::new(r"[^0-9]").unwrap();
}

/// Distinguishes seeds drawn within the same clock tick
static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Keep the digits among the first `width` characters of `raw`.
///
/// Characters past `width` are dropped even when earlier ones were not
/// digits, so "1a2b3" at width 4 gives "12". The result may be empty.
pub fn sanitize_seed_input(raw: &str, width: usize) -> String {
    let prefix: String = raw.chars().take(width).collect();
    RE_NON_DIGIT.replace_all(&prefix, "").into_owned()
}

/// Seed from user text, or a random one if no digits survive
pub fn seed_from_input(raw: Option<&str>, width: usize) -> Result<DigitString, SequenceError> {
    check_width(width)?;
    let digits = raw.map(|r| sanitize_seed_input(r, width)).unwrap_or_default();
    if digits.is_empty() {
        return random_seed(width);
    }
    let padded = crate::core::pad_left_zeros(&digits, width)?;
    DigitString::new(padded)
}

/// Pseudo-random seed in [0, 10^width), from the system clock
pub fn random_seed(width: usize) -> Result<DigitString, SequenceError> {
    check_width(width)?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);
    let count = SEED_COUNTER.fetch_add(1, Ordering::Relaxed);
    let value = mix(nanos ^ count.rotate_left(32)) % value_space(width);
    debug!(value, width, "random seed");
    DigitString::from_value(value, width)
}

/// SplitMix64 finalizer
fn mix(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DEFAULT_WIDTH, MAX_WIDTH};

    #[test]
    fn test_sanitize_drops_non_digits() {
        assert_eq!(sanitize_seed_input("1a2b3", 4), "12");
        assert_eq!(sanitize_seed_input("12 34", 4), "123");
        assert_eq!(sanitize_seed_input("abcd", 4), "");
    }

    #[test]
    fn test_sanitize_limits_length() {
        assert_eq!(sanitize_seed_input("123456", 4), "1234");
        assert_eq!(sanitize_seed_input("98", 4), "98");
    }

    #[test]
    fn test_seed_from_input_pads() {
        assert_eq!(seed_from_input(Some("42"), 4).unwrap(), "0042");
        assert_eq!(seed_from_input(Some("x7"), 4).unwrap(), "0007");
    }

    #[test]
    fn test_seed_from_empty_input_is_random() {
        for raw in [None, Some(""), Some("zzzz")] {
            let seed = seed_from_input(raw, DEFAULT_WIDTH).unwrap();
            assert_eq!(seed.width(), DEFAULT_WIDTH);
        }
    }

    #[test]
    fn test_random_seed_in_range() {
        for width in 1..=MAX_WIDTH {
            for _ in 0..20 {
                let seed = random_seed(width).unwrap();
                assert_eq!(seed.width(), width);
                assert!(seed.value() < value_space(width));
            }
        }
    }

    #[test]
    fn test_bad_width_rejected() {
        assert!(random_seed(0).is_err());
        assert!(seed_from_input(Some("1"), MAX_WIDTH + 1).is_err());
    }
}
