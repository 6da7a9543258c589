//! Sonoglyph is a headless engine for audio-reactive motion-design projects.
//!
//! - Load a project save of any known version; it is migrated step by step and validated
//! - Hold it in a [`Project`] session and edit objects through create/delete/merge
//! - Drive a [`FramePipeline`] that analyses audio once per frame and updates every widget
#![forbid(unsafe_code)]

pub mod audio;
pub mod foundation;
pub mod pipeline;
pub mod project;
pub mod save;
pub mod widgets;

pub use crate::audio::source::{
    AnalyserOpts, FrequencySource, PcmAnalyser, RecordedSpectrum, SilentSource,
};
pub use crate::foundation::core::{Fps, FrameIndex, Point, Screen, Size};
pub use crate::foundation::error::{SonoError, SonoResult};
pub use crate::foundation::ids::ObjectId;
pub use crate::pipeline::{FramePipeline, FrameStats, PipelineOpts, TickOutcome};
pub use crate::project::{LoadOpts, Loaded, Project};
pub use crate::save::log::{MigrationLog, ReportMode};
pub use crate::save::migrate::{CURRENT_SAVE_VERSION, migrate};
pub use crate::save::model::{ObjectKind, ObjectRecord, ProjectSave};
pub use crate::widgets::{RecordingSurface, RenderSurface, Visual};
