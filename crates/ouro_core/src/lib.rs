/// The `ouro_core` crate implements a recurrent toroidal field simulator:
/// an N×N grid of channel-vectors evolving under a deterministic local
/// update rule, alternating between two regimes selected by a global
/// complexity threshold.
///
/// Key components:
/// - **Field**: dense (N, N, C) state buffer with the complexity and
///   difference metrics.
/// - **Forces**: the expansion force law (toroidal smoothing stencil, soft
///   wall, origin memory) and the collapse restoring law; row-parallel,
///   reading only the previous snapshot.
/// - **Conservation**: zero-sum delta correction and per-channel
///   re-centering (Expansion phase only).
/// - **Stepper**: the stability clamp bounding every per-component update
///   to `base_dt`.
/// - **Phase / Cycles**: the Expansion → Collapse machine and the
///   recurrence detector that resets the field to its exact origin.
/// - **Simulation**: the orchestrator owning all state, driving the loop,
///   and emitting events to observers.
pub mod config;
pub mod conservation;
pub mod field;
pub mod forces;
pub mod observer;
pub mod phase;
pub mod simulation;
pub mod stepper;
pub mod traits;

pub use config::SimConfig;
pub use field::Field;
pub use observer::{ChannelObserver, FnObserver, SimEvent, SimObserver, Snapshot};
pub use phase::{CycleManager, Phase, PhaseController};
pub use simulation::{RunError, RunSummary, Simulation, StopReason};
pub use traits::Scalar;
