//! The two-state phase machine and the recurrence bookkeeping.
//!
//! Transitions are monotone within a cycle: Expansion → Collapse fires at
//! most once, and the only way back to Expansion is a full recurrence reset.

use crate::traits::Scalar;
use serde::{Deserialize, Serialize};

/// The currently active force regime. Expansion is initial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Expansion,
    Collapse,
}

/// Expansion → Collapse state machine, driven by the complexity metric.
#[derive(Debug, Clone)]
pub struct PhaseController<T> {
    entropic_limit: T,
    transition_step: Option<u64>,
}

impl<T: Scalar> PhaseController<T> {
    pub fn new(entropic_limit: T) -> Self {
        Self {
            entropic_limit,
            transition_step: None,
        }
    }

    pub fn entropic_limit(&self) -> T {
        self.entropic_limit
    }

    /// True when the entropic limit is crossed while expanding. Because the
    /// phase stays Collapse until a reset, this can hold at most once per
    /// cycle even if complexity later oscillates around the limit.
    pub fn should_collapse(&self, phase: Phase, complexity: T) -> bool {
        phase == Phase::Expansion && complexity > self.entropic_limit
    }

    /// Record the step index at which the transition fired.
    pub fn record_transition(&mut self, step: u64) {
        self.transition_step = Some(step);
    }

    pub fn transition_step(&self) -> Option<u64> {
        self.transition_step
    }

    /// Clear the recorded transition. Called only by the recurrence reset.
    pub fn clear(&mut self) {
        self.transition_step = None;
    }
}

/// Recurrence detection and the cycle counter.
#[derive(Debug, Clone)]
pub struct CycleManager<T> {
    recurrence_epsilon: T,
    cycle_count: u64,
}

impl<T: Scalar> CycleManager<T> {
    pub fn new(recurrence_epsilon: T) -> Self {
        Self {
            recurrence_epsilon,
            cycle_count: 0,
        }
    }

    /// Completed recurrences so far. Monotone, incremented only by
    /// [`close_cycle`](CycleManager::close_cycle).
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    /// A cycle closes only from Collapse, within epsilon of the origin.
    pub fn is_recurrent(&self, phase: Phase, difference: T) -> bool {
        phase == Phase::Collapse && difference < self.recurrence_epsilon
    }

    /// Increment the counter and return the closed cycle's ordinal.
    pub fn close_cycle(&mut self) -> u64 {
        self.cycle_count += 1;
        self.cycle_count
    }
}
