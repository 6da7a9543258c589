//! The animation loop: clock gate plus per-frame audio analysis and widget updates.

pub mod clock;
pub mod frame;

pub use clock::{AnimationClock, ClockPoll, ClockState};
pub use frame::{FramePipeline, FrameStats, PipelineOpts, Scene, TickOutcome};
