use crate::foundation::core::Fps;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockState {
    Idle,
    Animating {
        /// Target inter-frame interval in milliseconds.
        interval_ms: f64,
        /// Timestamp of the last accepted frame, drift-corrected.
        then_ms: f64,
    },
}

/// What the clock says about one refresh callback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ClockPoll {
    /// Not animating (or a stop took effect just now); nothing more is scheduled.
    Stopped,
    /// Too early; keep scheduling.
    Skip,
    /// At least one interval has passed since the last accepted frame.
    Due { elapsed_ms: f64 },
}

/// Elapsed-time gate for a refresh-driven animation loop.
#[derive(Clone, Debug)]
pub struct AnimationClock {
    state: ClockState,
    stop_requested: bool,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self {
            state: ClockState::Idle,
            stop_requested: false,
        }
    }
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, ClockState::Animating { .. })
    }

    /// Enter `Animating`, anchored at `now_ms`. Restarting re-anchors.
    pub fn start(&mut self, fps: Fps, now_ms: f64) {
        self.stop_requested = false;
        self.state = ClockState::Animating {
            interval_ms: fps.interval_ms(),
            then_ms: now_ms,
        };
        tracing::debug!(fps = fps.get(), now_ms, "animation started");
    }

    /// Request a stop; it takes effect at the next [`Self::poll`]. Idempotent.
    pub fn stop(&mut self) {
        if self.is_animating() {
            self.stop_requested = true;
        }
    }

    pub fn poll(&mut self, now_ms: f64) -> ClockPoll {
        if self.stop_requested {
            self.stop_requested = false;
            self.state = ClockState::Idle;
            tracing::debug!(now_ms, "animation stopped");
            return ClockPoll::Stopped;
        }
        match self.state {
            ClockState::Idle => ClockPoll::Stopped,
            ClockState::Animating {
                interval_ms,
                then_ms,
            } => {
                let elapsed_ms = now_ms - then_ms;
                if elapsed_ms >= interval_ms {
                    ClockPoll::Due { elapsed_ms }
                } else {
                    ClockPoll::Skip
                }
            }
        }
    }

    /// Advance the anchor by whole intervals only, so leftover time carries into the next frame.
    pub fn accept(&mut self, elapsed_ms: f64) {
        if let ClockState::Animating {
            interval_ms,
            then_ms,
        } = &mut self.state
        {
            *then_ms += elapsed_ms - elapsed_ms % *interval_ms;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/clock.rs"]
mod tests;
