//! Observer surface for external reporting and visualization.
//!
//! The core never depends on how events are rendered. Dispatch happens on
//! the stepping thread at low frequency; implementations must not block the
//! numeric loop; hand the event off to a channel and return.

use crate::field::Field;
use crate::phase::Phase;
use crate::traits::Scalar;

/// Event emitted by the simulation loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimEvent {
    /// Initial state captured; the loop is about to start.
    Genesis,
    /// The entropic limit was crossed and the phase flipped to Collapse.
    PhaseTransition { step: u64 },
    /// Recurrence detected; the field was reset to the initial state.
    Recurrence { step: u64, cycle: u64 },
    /// Periodic progress report.
    Report { step: u64 },
}

/// Read-only view of the simulation handed to observers alongside each event.
#[derive(Debug)]
pub struct Snapshot<'a, T> {
    pub step_index: u64,
    pub phase: Phase,
    pub cycle_count: u64,
    pub field: &'a Field<T>,
    pub complexity_history: &'a [T],
    pub difference_history: &'a [T],
}

/// Observer that receives simulation events.
pub trait SimObserver<T: Scalar>: Send + Sync {
    fn on_event(&self, event: &SimEvent, snapshot: &Snapshot<'_, T>);
}

/// Function-based observer for simple cases.
pub struct FnObserver<F>(pub F);

impl<T, F> SimObserver<T> for FnObserver<F>
where
    T: Scalar,
    F: Fn(&SimEvent, &Snapshot<'_, T>) + Send + Sync,
{
    fn on_event(&self, event: &SimEvent, snapshot: &Snapshot<'_, T>) {
        (self.0)(event, snapshot);
    }
}

/// Channel-based observer: forwards owned events to an mpsc channel so a
/// receiver thread can render them off the numeric loop. Send failures are
/// dropped; the side channel is best-effort.
pub struct ChannelObserver {
    sender: std::sync::mpsc::Sender<SimEvent>,
}

impl ChannelObserver {
    pub fn new(sender: std::sync::mpsc::Sender<SimEvent>) -> Self {
        Self { sender }
    }
}

impl<T: Scalar> SimObserver<T> for ChannelObserver {
    fn on_event(&self, event: &SimEvent, _snapshot: &Snapshot<'_, T>) {
        let _ = self.sender.send(event.clone());
    }
}
