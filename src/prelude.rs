pub use crate::config::{ResidualPolicy, TbConfig};
pub use crate::driver::{BackpressureGen, StimulusGen, Upstream};
pub use crate::error::{TbError, TbResult};
pub use crate::models::{AxisFifo, Corrupt, Probe, Spurious};
pub use crate::report::Report;
pub use crate::runner::{Runner, StopReason};
pub use crate::signal::{Input, Output, Signal, SignalSnapshot};
pub use crate::sim_if::SimIf;
pub use crate::testbench::{
    Beat, ClockReset, Handshake, Monitor, Scoreboard, ScoreboardStats, SimTime, Violation,
    ViolationKind,
};
pub use crate::trace::{VcdRecorder, WaveformRecorder};
