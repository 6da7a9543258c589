use crate::foundation::error::{SonoError, SonoResult};

pub use kurbo::{BezPath, Point, Rect, Size, Vec2};

/// Absolute 0-based frame index, counted from the start of an export.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Integer frames-per-second target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Fps(u32);

impl Fps {
    pub const MAX: u32 = 240;

    pub fn new(fps: u32) -> SonoResult<Self> {
        if fps == 0 || fps > Self::MAX {
            return Err(SonoError::invalid_field(
                "fps",
                format!("must be in 1..={}", Self::MAX),
            ));
        }
        Ok(Self(fps))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Target inter-frame interval in milliseconds.
    pub fn interval_ms(self) -> f64 {
        1000.0 / f64::from(self.0)
    }

    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) / f64::from(self.0)
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(60)
    }
}

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
}

impl Screen {
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
