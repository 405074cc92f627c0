//! Sequence Engine: one middle-square run from seed to first repeat
//!
//! State transitions:
//! - IDLE → RUNNING: start(seed)
//! - RUNNING → RUNNING: advance() yields a new value
//! - RUNNING → CYCLED: advance() yields a value already seen
//! - any → IDLE: reset()

use tracing::{debug, info};

use crate::core::{locate_cycle, split};
use crate::core::digits::{check_width, square};
use crate::types::{CycleRange, DigitString, RunReport, RunStatus, SeenSet, SequenceError, StepOutput};
use crate::value_space;

/// Middle-square state machine engine
#[derive(Debug, Default)]
pub struct SequenceEngine {
    /// Current state
    status: RunStatus,
    /// Seed of the current run
    seed: Option<DigitString>,
    /// Every iterate so far, seed first
    history: Vec<DigitString>,
    /// One output per advance
    steps: Vec<StepOutput>,
    /// Values already emitted
    seen: SeenSet,
}

impl SequenceEngine {
    /// Create new idle engine
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine already started on `seed`
    pub fn with_seed(seed: DigitString) -> Result<Self, SequenceError> {
        let mut engine = Self::new();
        engine.start(seed)?;
        Ok(engine)
    }

    /// Begin a run. Restarts from scratch if a run was in progress.
    pub fn start(&mut self, seed: DigitString) -> Result<(), SequenceError> {
        let width = seed.width();
        check_width(width)?;

        self.seen = SeenSet::new(width);
        self.seen.insert(seed.value());
        self.history = vec![seed.clone()];
        self.steps.clear();
        self.seed = Some(seed);
        self.status = RunStatus::Running;

        info!(seed = %self.history[0], width, "run started");
        Ok(())
    }

    /// Square the current iterate, keep its middle digits.
    ///
    /// The returned output has `already_seen = true` exactly once, on the
    /// step that closes the cycle; after that the engine refuses to advance.
    pub fn advance(&mut self) -> Result<StepOutput, SequenceError> {
        match self.status {
            RunStatus::Idle => return Err(SequenceError::R201_NOT_STARTED),
            RunStatus::Cycled => return Err(SequenceError::R202_ALREADY_CYCLED),
            RunStatus::Running => {}
        }
        let current = self.history.last().ok_or(SequenceError::R201_NOT_STARTED)?;

        let sq = square(current)?;
        let parts = split(sq.as_str());
        let mid = DigitString::new(parts.mid.clone())?;

        // A repeat leaves the seen-set untouched
        let already_seen = self.seen.contains(mid.value());
        if already_seen {
            self.status = RunStatus::Cycled;
        } else {
            self.seen.insert(mid.value());
        }

        self.history.push(mid.clone());
        let output = StepOutput::new(self.history.len() - 1, sq, parts, mid, already_seen);
        debug!(step = output.step, square = %output.square, mid = %output.iterate, already_seen, "advance");

        if already_seen {
            info!(step = output.step, value = %output.iterate, "cycle detected");
        }
        self.steps.push(output.clone());
        Ok(output)
    }

    /// Advance until the cycle closes and return the whole run.
    ///
    /// A repeat must occur within 10^N steps; running past that bound
    /// means the bookkeeping is broken.
    pub fn run_to_cycle(&mut self) -> Result<RunReport, SequenceError> {
        let bound = value_space(self.width()?) as usize;
        while self.status == RunStatus::Running {
            if self.steps.len() >= bound {
                return Err(SequenceError::R303_CYCLE_BOUND_EXCEEDED { steps: self.steps.len() });
            }
            self.advance()?;
        }
        self.report()
    }

    /// Cycle closed by the last iterate (only once CYCLED)
    pub fn cycle_range(&self) -> Result<CycleRange, SequenceError> {
        match self.status {
            RunStatus::Cycled => locate_cycle(&self.history),
            RunStatus::Running => Err(SequenceError::R203_NOT_CYCLED),
            RunStatus::Idle => Err(SequenceError::R201_NOT_STARTED),
        }
    }

    /// Full report of a finished run
    pub fn report(&self) -> Result<RunReport, SequenceError> {
        let cycle = self.cycle_range()?;
        let seed = self.seed.clone().ok_or(SequenceError::R201_NOT_STARTED)?;
        Ok(RunReport::new(seed, self.steps.clone(), cycle))
    }

    /// Reset engine to IDLE
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Get current state
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Has the cycle been detected?
    pub fn cycle_detected(&self) -> bool {
        self.status == RunStatus::Cycled
    }

    /// Seed of the current run
    pub fn seed(&self) -> Option<&DigitString> {
        self.seed.as_ref()
    }

    /// Current iterate
    pub fn current(&self) -> Option<&DigitString> {
        self.history.last()
    }

    /// Iterate width of the current run
    pub fn width(&self) -> Result<usize, SequenceError> {
        self.seed
            .as_ref()
            .map(DigitString::width)
            .ok_or(SequenceError::R201_NOT_STARTED)
    }

    /// All iterates, seed first
    pub fn history(&self) -> &[DigitString] {
        &self.history
    }

    /// Outputs of every advance so far
    pub fn steps(&self) -> &[StepOutput] {
        &self.steps
    }

    /// Number of advances so far
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn seed(s: &str) -> DigitString {
        DigitString::new(s).unwrap()
    }

    #[test]
    fn test_initial_state_is_idle() {
        let engine = SequenceEngine::new();
        assert_eq!(engine.status(), RunStatus::Idle);
        assert!(engine.history().is_empty());
        assert!(engine.current().is_none());
    }

    #[test]
    fn test_advance_before_start_fails() {
        let mut engine = SequenceEngine::new();
        assert_eq!(engine.advance().unwrap_err(), SequenceError::R201_NOT_STARTED);
    }

    #[test]
    fn test_start_records_seed() {
        let engine = SequenceEngine::with_seed(seed("1234")).unwrap();
        assert_eq!(engine.status(), RunStatus::Running);
        assert_eq!(engine.history(), &[seed("1234")]);
        assert_eq!(engine.width().unwrap(), 4);
    }

    #[test]
    fn test_start_rejects_wide_seed() {
        let mut engine = SequenceEngine::new();
        let err = engine.start(seed("1234567890")).unwrap_err();
        assert!(matches!(err, SequenceError::R104_WIDTH_OUT_OF_RANGE { width: 10, .. }));
        assert_eq!(engine.status(), RunStatus::Idle);
    }

    #[test]
    fn test_first_step_of_1234() {
        let mut engine = SequenceEngine::with_seed(seed("1234")).unwrap();
        let out = engine.advance().unwrap();
        assert_eq!(out.step, 1);
        assert_eq!(out.square, "01522756");
        assert_eq!(out.split.hi, "01");
        assert_eq!(out.split.mid, "5227");
        assert_eq!(out.split.lo, "56");
        assert_eq!(out.iterate, "5227");
        assert!(!out.already_seen);
        assert_eq!(engine.current(), Some(&seed("5227")));
    }

    #[test]
    fn test_zero_is_fixed_point() {
        let mut engine = SequenceEngine::with_seed(seed("0000")).unwrap();
        let out = engine.advance().unwrap();
        assert!(out.already_seen);
        assert_eq!(engine.status(), RunStatus::Cycled);
        assert_eq!(engine.cycle_range().unwrap(), CycleRange::new(0, 1));
    }

    #[test]
    fn test_0100_returns_to_seed() {
        let mut engine = SequenceEngine::with_seed(seed("0100")).unwrap();
        let out = engine.advance().unwrap();
        assert_eq!(out.square, "00010000");
        assert_eq!(out.iterate, "0100");
        assert!(out.already_seen);
        assert_eq!(engine.cycle_range().unwrap(), CycleRange::new(0, 1));
    }

    #[test]
    fn test_advance_after_cycle_fails() {
        let mut engine = SequenceEngine::with_seed(seed("0000")).unwrap();
        engine.advance().unwrap();
        assert_eq!(engine.advance().unwrap_err(), SequenceError::R202_ALREADY_CYCLED);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_cycle_range_while_running() {
        let engine = SequenceEngine::with_seed(seed("1234")).unwrap();
        assert_eq!(engine.cycle_range().unwrap_err(), SequenceError::R203_NOT_CYCLED);
    }

    #[test]
    fn test_pure_four_cycle() {
        let mut engine = SequenceEngine::with_seed(seed("0540")).unwrap();
        let report = engine.run_to_cycle().unwrap();
        assert_eq!(report.cycle, CycleRange::new(0, 4));
        assert_eq!(
            report.cycle_values(),
            vec![seed("0540"), seed("2916"), seed("5030"), seed("3009")]
        );
    }

    #[test]
    fn test_history_invariant() {
        let mut engine = SequenceEngine::with_seed(seed("6239")).unwrap();
        engine.run_to_cycle().unwrap();
        let h = engine.history();
        for i in 1..h.len() {
            let sq = square(&h[i - 1]).unwrap();
            assert_eq!(split(sq.as_str()).mid, h[i].as_str());
        }
    }

    #[test]
    fn test_only_last_step_is_seen() {
        let mut engine = SequenceEngine::with_seed(seed("1234")).unwrap();
        engine.run_to_cycle().unwrap();
        let (last, rest) = engine.steps().split_last().unwrap();
        assert!(last.already_seen);
        assert!(rest.iter().all(|s| !s.already_seen));
    }

    #[test]
    fn test_reset_returns_to_idle() {
        let mut engine = SequenceEngine::with_seed(seed("0000")).unwrap();
        engine.advance().unwrap();
        engine.reset();
        assert_eq!(engine.status(), RunStatus::Idle);
        assert!(engine.history().is_empty());
        assert_eq!(engine.step_count(), 0);
        engine.reset();
        assert_eq!(engine.status(), RunStatus::Idle);
    }

    #[test]
    fn test_restart_clears_seen_values() {
        let mut engine = SequenceEngine::with_seed(seed("1234")).unwrap();
        engine.run_to_cycle().unwrap();
        // 5227 was seen in the previous run
        engine.start(seed("5227")).unwrap();
        let out = engine.advance().unwrap();
        assert_eq!(out.iterate, "3215");
        assert!(!out.already_seen);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_restart_with_other_width() {
        let mut engine = SequenceEngine::with_seed(seed("1234")).unwrap();
        engine.advance().unwrap();
        engine.start(seed("12")).unwrap();
        let out = engine.advance().unwrap();
        assert_eq!(out.square, "0144");
        assert_eq!(out.iterate, "14");
    }
}
