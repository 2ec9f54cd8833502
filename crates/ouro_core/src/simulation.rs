//! The orchestrator: owns the field, drives the step loop, sequences the
//! force/conservation/stepper pipeline, and emits events to observers.
//!
//! Steps are strictly ordered; step t+1 reads only the fully materialized
//! result of step t. Within a step the force law parallelizes across rows
//! (see `forces`), with the end of the parallel map as the only barrier.

use crate::config::SimConfig;
use crate::conservation;
use crate::field::Field;
use crate::forces::{self, ExpansionCoefficients};
use crate::observer::{SimEvent, SimObserver, Snapshot};
use crate::phase::{CycleManager, Phase, PhaseController};
use crate::stepper;
use crate::traits::Scalar;
use anyhow::{Context, Result};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Fatal stepping-loop failure. No retry, no silent recovery.
#[derive(Debug, Error)]
pub enum RunError {
    /// The difference metric left the finite range.
    #[error("simulation diverged at step {step}: difference metric is {value}")]
    Diverged { step: u64, value: f64 },
}

/// Why a completed (non-diverged) run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StopReason {
    /// The iteration budget was exhausted.
    IterationBudget,
    /// External cancellation, honored at a step boundary.
    Cancelled,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary<T> {
    pub stop_reason: StopReason,
    pub steps_run: u64,
    pub cycles_closed: u64,
    pub final_phase: Phase,
    pub complexity_history: Vec<T>,
    pub difference_history: Vec<T>,
}

/// The simulation engine. Exclusively owns the current field, the immutable
/// initial snapshot, the scratch buffers, and all counters and histories;
/// no component retains a reference across steps.
pub struct Simulation<T: Scalar> {
    config: SimConfig,
    base_dt: T,
    current: Field<T>,
    initial: Field<T>,
    initial_complexity: T,
    // Scratch buffers reused across steps.
    smoothed: Field<T>,
    delta: Field<T>,
    phase: Phase,
    controller: PhaseController<T>,
    cycles: CycleManager<T>,
    step_index: u64,
    complexity_history: Vec<T>,
    difference_history: Vec<T>,
    observers: Vec<Arc<dyn SimObserver<T>>>,
    cancel: Arc<AtomicBool>,
}

impl<T: Scalar> Simulation<T> {
    /// Build a simulation from configuration and provider values. All setup
    /// errors surface here, before the loop can start in an inconsistent
    /// state.
    pub fn new(config: SimConfig, initial_values: &[T]) -> Result<Self> {
        config.validate()?;
        let current = Field::from_values(config.grid_size, config.channel_count, initial_values)
            .context("Failed to build the initial field from provider values.")?;
        let initial = current.clone();
        let initial_complexity = initial.complexity();
        let smoothed = Field::zeros(config.grid_size, config.channel_count);
        let delta = Field::zeros(config.grid_size, config.channel_count);
        let controller = PhaseController::new(T::from_f64(config.entropic_limit()).unwrap());
        let cycles = CycleManager::new(T::from_f64(config.recurrence_epsilon).unwrap());
        let base_dt = T::from_f64(config.base_dt).unwrap();

        Ok(Self {
            config,
            base_dt,
            current,
            initial,
            initial_complexity,
            smoothed,
            delta,
            phase: Phase::Expansion,
            controller,
            cycles,
            step_index: 0,
            complexity_history: Vec::new(),
            difference_history: Vec::new(),
            observers: Vec::new(),
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Register an observer for Genesis / PhaseTransition / Recurrence /
    /// Report events.
    pub fn subscribe(&mut self, observer: Arc<dyn SimObserver<T>>) {
        self.observers.push(observer);
    }

    /// Shared flag for external interruption, checked once per step boundary.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycles.cycle_count()
    }

    pub fn step_index(&self) -> u64 {
        self.step_index
    }

    /// Step at which the current cycle's Expansion → Collapse transition
    /// fired, if it has.
    pub fn transition_step(&self) -> Option<u64> {
        self.controller.transition_step()
    }

    pub fn current(&self) -> &Field<T> {
        &self.current
    }

    pub fn initial(&self) -> &Field<T> {
        &self.initial
    }

    pub fn complexity_history(&self) -> &[T] {
        &self.complexity_history
    }

    pub fn difference_history(&self) -> &[T] {
        &self.difference_history
    }

    /// Advance the simulation by one step.
    pub fn step(&mut self) -> std::result::Result<(), RunError> {
        self.step_index += 1;
        let step = self.step_index;
        let complexity = self.current.complexity();
        let difference = self.current.difference(&self.initial);

        // A recurrence closes the cycle before any physics for this step;
        // the reset step is bookkeeping plus a fresh metric snapshot only.
        if self.cycles.is_recurrent(self.phase, difference) {
            let cycle = self.cycles.close_cycle();
            self.current.copy_from(&self.initial);
            self.phase = Phase::Expansion;
            self.controller.clear();
            info!(step, cycle, "recurrence detected; field reset to origin");
            self.emit(&SimEvent::Recurrence { step, cycle });
            self.complexity_history.push(self.initial_complexity);
            self.difference_history.push(T::zero());
            return Ok(());
        }

        if self.controller.should_collapse(self.phase, complexity) {
            self.phase = Phase::Collapse;
            self.controller.record_transition(step);
            info!(step, complexity = ?complexity, "entropic limit crossed; collapsing");
            self.emit(&SimEvent::PhaseTransition { step });
        }

        match self.phase {
            Phase::Expansion => self.expansion_step(complexity),
            Phase::Collapse => self.collapse_step(),
        }

        self.complexity_history.push(complexity);
        self.difference_history.push(difference);

        if self.config.check_divergence && !difference.is_finite() {
            warn!(step, "difference metric left the finite range; halting");
            return Err(RunError::Diverged {
                step,
                value: difference.to_f64().unwrap_or(f64::NAN),
            });
        }

        if step % self.config.reporting_interval == 0 {
            debug!(step, phase = ?self.phase, "periodic report");
            self.emit(&SimEvent::Report { step });
        }

        Ok(())
    }

    /// Drive the loop until the iteration budget is exhausted, cancellation
    /// is requested, or the difference metric diverges.
    pub fn run(&mut self) -> std::result::Result<RunSummary<T>, RunError> {
        if self.step_index == 0 {
            info!(
                grid_size = self.config.grid_size,
                channel_count = self.config.channel_count,
                "genesis: initial field captured"
            );
            self.emit(&SimEvent::Genesis);
        }

        let mut stop_reason = StopReason::IterationBudget;
        for _ in 0..self.config.max_iterations {
            if self.cancel.load(Ordering::Relaxed) {
                info!(step = self.step_index, "cancellation requested; stopping");
                stop_reason = StopReason::Cancelled;
                break;
            }
            self.step()?;
        }

        Ok(RunSummary {
            stop_reason,
            steps_run: self.step_index,
            cycles_closed: self.cycles.cycle_count(),
            final_phase: self.phase,
            complexity_history: self.complexity_history.clone(),
            difference_history: self.difference_history.clone(),
        })
    }

    /// Expansion update: smoothed stencil, three-term force with the chaos
    /// coefficient scaled by the current complexity, zero-sum correction,
    /// bounded step, re-centering.
    fn expansion_step(&mut self, complexity: T) {
        let coeffs = ExpansionCoefficients {
            g: T::from_f64(self.config.g_factor).unwrap() * complexity,
            h: T::from_f64(self.config.h_base).unwrap(),
            k: T::from_f64(self.config.k_base).unwrap(),
        };
        forces::smooth_into(&self.current, &mut self.smoothed);
        forces::expansion_delta(
            &self.current,
            &self.initial,
            &self.smoothed,
            coeffs,
            &mut self.delta,
        );
        conservation::zero_sum_delta(&mut self.delta);
        stepper::apply_scaled(&mut self.current, &self.delta, self.base_dt);
        conservation::recenter(&mut self.current);
    }

    /// Collapse update: raw restoring pull toward the origin, bounded step.
    /// Neither conservation correction applies in this phase.
    fn collapse_step(&mut self) {
        forces::collapse_delta(&self.current, &self.initial, &mut self.delta);
        stepper::apply_scaled(&mut self.current, &self.delta, self.base_dt);
    }

    fn emit(&self, event: &SimEvent) {
        if self.observers.is_empty() {
            return;
        }
        let snapshot = Snapshot {
            step_index: self.step_index,
            phase: self.phase,
            cycle_count: self.cycles.cycle_count(),
            field: &self.current,
            complexity_history: &self.complexity_history,
            difference_history: &self.difference_history,
        };
        for observer in &self.observers {
            observer.on_event(event, &snapshot);
        }
    }
}
