//! Output structures for terminal display and JSON

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use crate::core::split_lengths;
use crate::types::{CycleRange, DigitString, SplitSquare};

/// Iterate digits, red when they belong to the cycle
pub fn highlight_iterate(digits: &str, cyclic: bool) -> ColoredString {
    if cyclic {
        digits.red().bold()
    } else {
        digits.bold()
    }
}

/// Row 0: the seed aligned under the middle digits of the step rows
pub fn seed_terminal_string(seed: &DigitString, cyclic: bool) -> String {
    let (hi_len, _, lo_len) = split_lengths(2 * seed.width());
    format!(
        "{:>6}  {}{}{}",
        0,
        " ".repeat(hi_len),
        highlight_iterate(seed.as_str(), cyclic),
        " ".repeat(lo_len)
    )
}

/// One advance of the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutput {
    /// Timestamp
    pub timestamp: DateTime<Utc>,
    /// History index of the new iterate (the seed is 0)
    pub step: usize,
    /// Square of the previous iterate, 2N digits
    pub square: DigitString,
    /// Square split into hi / mid / lo
    pub split: SplitSquare,
    /// New iterate (= split.mid)
    pub iterate: DigitString,
    /// The new iterate appeared earlier in the run
    pub already_seen: bool,
}

impl StepOutput {
    /// Create new output
    pub fn new(step: usize, square: DigitString, split: SplitSquare, iterate: DigitString, already_seen: bool) -> Self {
        Self {
            timestamp: Utc::now(),
            step,
            square,
            split,
            iterate,
            already_seen,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self, cyclic: bool) -> String {
        format!(
            "{:>6}  {}{}{}",
            self.step,
            self.split.hi.dimmed(),
            highlight_iterate(&self.split.mid, cyclic),
            self.split.lo.dimmed()
        )
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "step={} | square={} | hi={} | mid={} | lo={} | seen={}",
            self.step,
            self.square,
            self.split.hi,
            self.split.mid,
            self.split.lo,
            self.already_seen
        )
    }
}

/// A complete run from seed to the first repetition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub seed: DigitString,
    pub width: usize,
    pub steps: Vec<StepOutput>,
    pub cycle: CycleRange,
    /// Length of the repeating cycle
    pub cycle_len: usize,
    /// Iterates before the cycle is entered
    pub tail_len: usize,
}

impl RunReport {
    pub fn new(seed: DigitString, steps: Vec<StepOutput>, cycle: CycleRange) -> Self {
        Self {
            width: seed.width(),
            seed,
            steps,
            cycle_len: cycle.len(),
            tail_len: cycle.tail_len(),
            cycle,
        }
    }

    /// Seed followed by every iterate
    pub fn history(&self) -> Vec<DigitString> {
        std::iter::once(self.seed.clone())
            .chain(self.steps.iter().map(|s| s.iterate.clone()))
            .collect()
    }

    /// The iterates that repeat forever, in order
    pub fn cycle_values(&self) -> Vec<DigitString> {
        self.history()[self.cycle.start_index..self.cycle.end_index].to_vec()
    }

    /// History index `i` is part of the cycle or closes it
    pub fn is_cyclic(&self, index: usize) -> bool {
        self.cycle.contains(index) || self.cycle.closes_at(index)
    }

    /// Seed row for the terminal, flagged when the cycle starts at the seed
    pub fn seed_terminal_string(&self) -> String {
        seed_terminal_string(&self.seed, self.is_cyclic(0))
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "seed={} | steps={} | cycle={}..{} | cycle_len={} | tail_len={}",
            self.seed,
            self.steps.len(),
            self.cycle.start_index,
            self.cycle.end_index,
            self.cycle_len,
            self.tail_len
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(step: usize, square: &str, hi: &str, mid: &str, lo: &str, seen: bool) -> StepOutput {
        StepOutput::new(
            step,
            DigitString::new(square).unwrap(),
            SplitSquare { hi: hi.into(), mid: mid.into(), lo: lo.into() },
            DigitString::new(mid).unwrap(),
            seen,
        )
    }

    #[test]
    fn test_parseable_string() {
        let out = step(1, "01522756", "01", "5227", "56", false);
        assert_eq!(
            out.to_parseable_string(),
            "step=1 | square=01522756 | hi=01 | mid=5227 | lo=56 | seen=false"
        );
    }

    #[test]
    fn test_terminal_string_contains_digits() {
        colored::control::set_override(false);
        let out = step(1, "01522756", "01", "5227", "56", false);
        assert_eq!(out.to_terminal_string(true), "     1  01522756");
    }

    #[test]
    fn test_highlight_iterate_colors() {
        assert_eq!(highlight_iterate("0540", true).fgcolor(), Some(colored::Color::Red));
        assert_eq!(highlight_iterate("0540", false).fgcolor(), None);
    }

    #[test]
    fn test_seed_row_layout() {
        colored::control::set_override(false);
        let seed = DigitString::new("0540").unwrap();
        assert_eq!(seed_terminal_string(&seed, true), "     0    0540  ");
        let wide = DigitString::new("12345").unwrap();
        assert_eq!(seed_terminal_string(&wide, false), "     0    12345   ");
    }

    #[test]
    fn test_seed_row_flagged_when_cycle_starts_at_seed() {
        let seed = DigitString::new("0100").unwrap();
        let report = RunReport::new(
            seed,
            vec![step(1, "00010000", "00", "0100", "00", true)],
            CycleRange::new(0, 1),
        );
        assert!(report.is_cyclic(0));
        assert!(report.is_cyclic(1));

        let tail = RunReport::new(
            DigitString::new("1234").unwrap(),
            vec![step(1, "01522756", "01", "5227", "56", false)],
            CycleRange::new(1, 5),
        );
        assert!(!tail.is_cyclic(0));
    }

    #[test]
    fn test_report_history_and_cycle_values() {
        let seed = DigitString::new("0100").unwrap();
        let report = RunReport::new(
            seed,
            vec![step(1, "00010000", "00", "0100", "00", true)],
            CycleRange::new(0, 1),
        );
        assert_eq!(report.width, 4);
        assert_eq!(report.history().len(), 2);
        assert_eq!(report.cycle_values(), vec![DigitString::new("0100").unwrap()]);
        assert_eq!(report.tail_len, 0);
        assert_eq!(report.cycle_len, 1);
    }
}
