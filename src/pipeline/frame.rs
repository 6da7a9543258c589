use super::clock::{AnimationClock, ClockPoll};
use crate::audio::source::{FrequencySource, SilentSource};
use crate::audio::spectrum::{Smoother, linear_to_log, volume};
use crate::foundation::core::{Fps, FrameIndex, Screen};
use crate::foundation::ids::ObjectId;
use crate::save::model::{ObjectRecord, SmoothingKind};
use crate::widgets::{AudioSnapshot, FrameContext, RenderSurface, WidgetSet};
use std::collections::BTreeMap;

/// Options controlling the per-frame audio pipeline.
#[derive(Clone, Debug)]
pub struct PipelineOpts {
    /// Exponential smoothing factor applied before the volume is computed.
    pub volume_smoothing: f64,
    /// High-frequency bins left out of the volume mean.
    pub volume_tail_excluded: usize,
    /// FFT window for analysers built from this config; also the silent source's `fft_size / 2` bins.
    pub fft_size: usize,
    /// Global seed; each particle widget derives its own from it.
    pub seed: u64,
}

impl Default for PipelineOpts {
    fn default() -> Self {
        Self {
            volume_smoothing: 0.7,
            volume_tail_excluded: 100,
            fft_size: 2048,
            seed: 0,
        }
    }
}

/// The project state one frame reads and drives.
pub struct Scene<'a> {
    pub objects: &'a BTreeMap<ObjectId, ObjectRecord>,
    pub widgets: &'a mut WidgetSet,
    pub screen: Screen,
    pub fps: Fps,
}

/// Audio state and widget completion of a rendered frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameStats {
    pub frame: FrameIndex,
    pub volume: f64,
    pub completed: Vec<bool>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TickOutcome {
    /// The clock is idle; the host should stop scheduling.
    Stopped,
    /// Less than one interval has elapsed.
    Skipped,
    /// A widget has not finished its previous frame; nothing was advanced.
    Blocked,
    Rendered(FrameStats),
}

/// Per-frame audio/visual update driver.
pub struct FramePipeline {
    opts: PipelineOpts,
    clock: AnimationClock,
    source: Box<dyn FrequencySource>,
    raw: Vec<u8>,
    spectrum: Vec<f64>,
    smoother: Smoother,
    volume: f64,
    frames: u64,
}

impl FramePipeline {
    pub fn new(source: Box<dyn FrequencySource>, opts: PipelineOpts) -> Self {
        let smoother = Smoother::new(SmoothingKind::Average, opts.volume_smoothing);
        Self {
            opts,
            clock: AnimationClock::new(),
            source,
            raw: Vec::new(),
            spectrum: Vec::new(),
            smoother,
            volume: 0.0,
            frames: 0,
        }
    }

    /// Pipeline over a silent source with `fft_size / 2` bins.
    pub fn silent(opts: PipelineOpts) -> Self {
        let bins = opts.fft_size / 2;
        Self::new(Box::new(SilentSource::new(bins)), opts)
    }

    pub fn opts(&self) -> &PipelineOpts {
        &self.opts
    }

    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// Most recent volume.
    pub fn volume(&self) -> f64 {
        self.volume
    }

    /// Most recent log-scaled spectrum.
    pub fn spectrum(&self) -> &[f64] {
        &self.spectrum
    }

    /// Frames accepted by [`Self::tick`] since the last start.
    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }

    pub fn set_source(&mut self, source: Box<dyn FrequencySource>) {
        self.source = source;
        self.smoother.reset();
    }

    pub fn start(&mut self, fps: Fps, now_ms: f64) {
        self.frames = 0;
        self.clock.start(fps, now_ms);
    }

    pub fn stop(&mut self) {
        self.clock.stop();
    }

    /// One refresh callback of the live loop.
    #[tracing::instrument(level = "trace", skip(self, scene, surface))]
    pub fn tick(
        &mut self,
        now_ms: f64,
        scene: Scene<'_>,
        surface: &mut dyn RenderSurface,
    ) -> TickOutcome {
        let elapsed_ms = match self.clock.poll(now_ms) {
            ClockPoll::Stopped => return TickOutcome::Stopped,
            ClockPoll::Skip => return TickOutcome::Skipped,
            ClockPoll::Due { elapsed_ms } => elapsed_ms,
        };
        let Scene {
            objects,
            widgets,
            screen,
            fps,
        } = scene;
        if !widgets.all_complete() {
            tracing::trace!("previous frame still in flight");
            return TickOutcome::Blocked;
        }

        let frame = FrameIndex(self.frames);
        let stats = self.render(frame, objects, widgets, screen, fps, surface);
        self.clock.accept(elapsed_ms);
        self.frames += 1;
        TickOutcome::Rendered(stats)
    }

    /// Render `frame` immediately, without the wall-clock gate.
    ///
    /// The source is read at `frame`, so a recorded spectrum gives the same output on every run.
    #[tracing::instrument(level = "debug", skip(self, scene, surface))]
    pub fn export_frame(
        &mut self,
        frame: FrameIndex,
        scene: Scene<'_>,
        surface: &mut dyn RenderSurface,
    ) -> FrameStats {
        let Scene {
            objects,
            widgets,
            screen,
            fps,
        } = scene;
        self.render(frame, objects, widgets, screen, fps, surface)
    }

    fn render(
        &mut self,
        frame: FrameIndex,
        objects: &BTreeMap<ObjectId, ObjectRecord>,
        widgets: &mut WidgetSet,
        screen: Screen,
        fps: Fps,
        surface: &mut dyn RenderSurface,
    ) -> FrameStats {
        self.raw.clear();
        self.raw.resize(self.source.bin_count(), 0);
        if let Err(e) = self.source.read(frame, &mut self.raw) {
            tracing::warn!(frame = frame.0, error = %e, "frequency read failed, using silence");
            self.raw.fill(0);
        }

        let linear: Vec<f64> = self.raw.iter().map(|&b| f64::from(b)).collect();
        self.spectrum = linear_to_log(&linear);
        let smoothed = self.smoother.apply(&self.spectrum);
        self.volume = volume(smoothed, self.opts.volume_tail_excluded);

        let time = self
            .source
            .time(frame)
            .unwrap_or((fps.frames_to_secs(frame.0), 0.0));
        let ctx = FrameContext {
            frame,
            fps,
            screen,
            objects,
            audio: AudioSnapshot {
                frequency: &self.spectrum,
                smoothed,
                volume: self.volume,
                time,
            },
        };
        let completed = widgets.update_all(&ctx, surface);
        FrameStats {
            frame,
            volume: self.volume,
            completed,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/frame.rs"]
mod tests;
