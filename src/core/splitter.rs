//! Splitter: cut a digit string into hi / mid / lo
//!
//! For L = 2N with N even the cut is symmetric (L/4, L/2, L/4):
//! "12345678" → "12" "3456" "78". Other lengths keep mid at floor(L/2)
//! and give the extra digit to lo: "1234567890" → "12" "34567" "890".

use crate::types::SplitSquare;

/// Segment lengths (hi, mid, lo) for a string of length `len`
pub fn split_lengths(len: usize) -> (usize, usize, usize) {
    let mid_len = len / 2;
    let hi_len = mid_len / 2;
    let lo_len = len - mid_len - hi_len;
    (hi_len, mid_len, lo_len)
}

/// Split `s` into prefix, middle and suffix.
///
/// Any length is accepted; short inputs give empty segments. Expects
/// ASCII (digit strings), since it slices by byte offset.
pub fn split(s: &str) -> SplitSquare {
    let (hi_len, mid_len, _) = split_lengths(s.len());
    let (hi, rest) = s.split_at(hi_len);
    let (mid, lo) = rest.split_at(mid_len);
    SplitSquare {
        hi: hi.to_string(),
        mid: mid.to_string(),
        lo: lo.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parts(s: &str) -> (String, String, String) {
        let sp = split(s);
        (sp.hi, sp.mid, sp.lo)
    }

    #[test]
    fn test_eight_digits() {
        assert_eq!(parts("01522756"), ("01".into(), "5227".into(), "56".into()));
        assert_eq!(parts("12345678"), ("12".into(), "3456".into(), "78".into()));
    }

    #[test]
    fn test_four_digits() {
        assert_eq!(parts("1234"), ("1".into(), "23".into(), "4".into()));
    }

    #[test]
    fn test_ten_digits_asymmetric() {
        assert_eq!(parts("1234567890"), ("12".into(), "34567".into(), "890".into()));
    }

    #[test]
    fn test_short_inputs() {
        assert_eq!(parts(""), ("".into(), "".into(), "".into()));
        assert_eq!(parts("7"), ("".into(), "".into(), "7".into()));
        assert_eq!(parts("12"), ("".into(), "1".into(), "2".into()));
        assert_eq!(parts("123"), ("".into(), "1".into(), "23".into()));
    }

    #[test]
    fn test_concat_reconstructs() {
        let digits = "9081726354453627180";
        for len in 0..=digits.len() {
            let s = &digits[..len];
            let sp = split(s);
            assert_eq!(sp.concat(), s);
            assert_eq!(sp.total_len(), len);
            assert_eq!(sp.mid.len(), len / 2);
        }
    }

    #[test]
    fn test_symmetric_when_multiple_of_four() {
        for len in (0..=20).step_by(4) {
            let (hi, mid, lo) = split_lengths(len);
            assert_eq!(hi, len / 4);
            assert_eq!(lo, len / 4);
            assert_eq!(mid, len / 2);
            assert!(split(&"5".repeat(len)).is_symmetric());
        }
    }
}
