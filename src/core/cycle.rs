//! CycleLocator: find the repeating run at the end of a history

use tracing::error;

use crate::types::{CycleRange, DigitString, SequenceError};

/// Locate the cycle closed by the last history entry.
///
/// Scans backward from the second-to-last entry for the nearest earlier
/// occurrence of the last value. A missing match means the seen-set and
/// history disagree, which is fatal for the run.
pub fn locate_cycle(history: &[DigitString]) -> Result<CycleRange, SequenceError> {
    let (match_value, earlier) = history.split_last().ok_or_else(|| {
        error!("cycle lookup on empty history");
        SequenceError::R302_HISTORY_EMPTY
    })?;
    let end_index = earlier.len();

    match earlier.iter().rposition(|v| v == match_value) {
        Some(start_index) => Ok(CycleRange::new(start_index, end_index)),
        None => {
            error!(value = %match_value, index = end_index, "cycle has no earlier match");
            Err(SequenceError::R301_CYCLE_MATCH_MISSING {
                value: match_value.to_string(),
                index: end_index,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(values: &[&str]) -> Vec<DigitString> {
        values.iter().map(|v| DigitString::new(*v).unwrap()).collect()
    }

    #[test]
    fn test_fixed_point() {
        let h = history(&["0000", "0000"]);
        assert_eq!(locate_cycle(&h).unwrap(), CycleRange::new(0, 1));
    }

    #[test]
    fn test_cycle_after_tail() {
        // 4100 → 8100 → 6100 → 2100 → 4100
        let h = history(&["1234", "4100", "8100", "6100", "2100", "4100"]);
        let range = locate_cycle(&h).unwrap();
        assert_eq!(range, CycleRange::new(1, 5));
        assert_eq!(range.len(), 4);
        assert_eq!(range.tail_len(), 1);
    }

    #[test]
    fn test_nearest_earlier_match_wins() {
        let h = history(&["0001", "0002", "0001", "0003", "0001"]);
        assert_eq!(locate_cycle(&h).unwrap(), CycleRange::new(2, 4));
    }

    #[test]
    fn test_missing_match_is_invariant_violation() {
        let h = history(&["0001", "0002", "0003"]);
        let err = locate_cycle(&h).unwrap_err();
        assert_eq!(
            err,
            SequenceError::R301_CYCLE_MATCH_MISSING { value: "0003".into(), index: 2 }
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_single_entry_has_no_cycle() {
        let h = history(&["0001"]);
        assert!(locate_cycle(&h).unwrap_err().is_fatal());
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(locate_cycle(&[]), Err(SequenceError::R302_HISTORY_EMPTY));
    }
}
