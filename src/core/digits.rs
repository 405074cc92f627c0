//! Digit-string arithmetic: zero padding and width-preserving squares
//!
//! Values stay strings throughout; the only numeric step is the
//! multiplication inside `square`.

use crate::types::{validate_digits, DigitString, SequenceError};
use crate::{MAX_WIDTH, MIN_WIDTH};

/// Prepend '0' until `s` is `width` characters long.
///
/// Never truncates: a string longer than `width` is an error.
pub fn pad_left_zeros(s: &str, width: usize) -> Result<String, SequenceError> {
    validate_digits(s)?;
    if s.len() > width {
        return Err(SequenceError::R102_OVER_LENGTH { len: s.len(), width });
    }
    let mut padded = "0".repeat(width - s.len());
    padded.push_str(s);
    Ok(padded)
}

/// Square an N-digit value and return it as exactly 2N digits
pub fn square(x: &DigitString) -> Result<DigitString, SequenceError> {
    let width = x.width();
    check_width(width)?;
    let v = x.value();
    DigitString::from_value(v * v, 2 * width)
}

/// `square` for raw text
pub fn square_str(s: &str) -> Result<String, SequenceError> {
    let x = DigitString::new(s)?;
    Ok(square(&x)?.into())
}

/// Width must be in MIN_WIDTH..=MAX_WIDTH
pub fn check_width(width: usize) -> Result<(), SequenceError> {
    if (MIN_WIDTH..=MAX_WIDTH).contains(&width) {
        Ok(())
    } else {
        Err(SequenceError::R104_WIDTH_OUT_OF_RANGE {
            width,
            min: MIN_WIDTH,
            max: MAX_WIDTH,
        })
    }
}
