use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SonoError, SonoResult};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::f32::consts::PI;
use std::path::Path;
use std::sync::Arc;

/// Provider of byte-valued frequency snapshots, one per frame.
pub trait FrequencySource {
    /// Number of frequency bins in every snapshot.
    fn bin_count(&self) -> usize;

    /// Fill `out` (length [`Self::bin_count`]) with the snapshot for `frame`.
    ///
    /// Errors are not fatal to a tick: the pipeline zero-fills and carries on.
    fn read(&mut self, frame: FrameIndex, out: &mut [u8]) -> SonoResult<()>;

    /// Current playback position and total length in seconds, when known.
    fn time(&self, _frame: FrameIndex) -> Option<(f64, f64)> {
        None
    }
}

/// Always-silent source, used when no audio is attached.
#[derive(Clone, Copy, Debug)]
pub struct SilentSource {
    bins: usize,
}

impl SilentSource {
    pub fn new(bins: usize) -> Self {
        Self { bins }
    }
}

impl FrequencySource for SilentSource {
    fn bin_count(&self) -> usize {
        self.bins
    }

    fn read(&mut self, _frame: FrameIndex, out: &mut [u8]) -> SonoResult<()> {
        out.fill(0);
        Ok(())
    }
}

/// Deterministic pre-recorded spectra indexed by frame, for exports.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RecordedSpectrum {
    pub bin_count: usize,
    pub frames: Vec<Vec<u8>>,
    /// Frame rate the frames were captured at; enables [`FrequencySource::time`].
    #[serde(default)]
    pub fps: Option<u32>,
}

impl RecordedSpectrum {
    pub fn new(bin_count: usize, frames: Vec<Vec<u8>>) -> Self {
        Self {
            bin_count,
            frames,
            fps: None,
        }
    }

    pub fn from_path(path: &Path) -> SonoResult<Self> {
        let f = std::fs::File::open(path)?;
        let rec: Self = serde_json::from_reader(std::io::BufReader::new(f))?;
        if rec.bin_count == 0 {
            return Err(SonoError::audio("recorded spectrum must have bin_count > 0"));
        }
        Ok(rec)
    }
}

impl FrequencySource for RecordedSpectrum {
    fn bin_count(&self) -> usize {
        self.bin_count
    }

    fn read(&mut self, frame: FrameIndex, out: &mut [u8]) -> SonoResult<()> {
        out.fill(0);
        let Some(row) = usize::try_from(frame.0).ok().and_then(|i| self.frames.get(i)) else {
            return Ok(());
        };
        let n = row.len().min(out.len());
        out[..n].copy_from_slice(&row[..n]);
        Ok(())
    }

    fn time(&self, frame: FrameIndex) -> Option<(f64, f64)> {
        let fps = Fps::new(self.fps?).ok()?;
        Some((
            fps.frames_to_secs(frame.0),
            fps.frames_to_secs(self.frames.len() as u64),
        ))
    }
}

/// Options for [`PcmAnalyser`], mirroring a browser analyser node.
#[derive(Clone, Copy, Debug)]
pub struct AnalyserOpts {
    /// FFT window length; must be a power of two. Produces `fft_size / 2` bins.
    pub fft_size: usize,
    pub min_decibels: f32,
    pub max_decibels: f32,
}

impl Default for AnalyserOpts {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

/// FFT analysis of a decoded WAV track; frame `n` analyses the window starting at
/// `n * sample_rate / fps`.
pub struct PcmAnalyser {
    mono: Vec<f32>,
    sample_rate: u32,
    fps: Fps,
    opts: AnalyserOpts,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buf: Vec<Complex<f32>>,
}

impl PcmAnalyser {
    pub fn new(mono: Vec<f32>, sample_rate: u32, fps: Fps, opts: AnalyserOpts) -> SonoResult<Self> {
        if !opts.fft_size.is_power_of_two() || opts.fft_size < 32 {
            return Err(SonoError::audio("fft_size must be a power of two >= 32"));
        }
        if sample_rate == 0 {
            return Err(SonoError::audio("sample rate must be > 0"));
        }
        if opts.min_decibels >= opts.max_decibels {
            return Err(SonoError::audio("min_decibels must be below max_decibels"));
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(opts.fft_size);
        let window = (0..opts.fft_size)
            .map(|i| blackman_window(i, opts.fft_size))
            .collect();

        Ok(Self {
            mono,
            sample_rate,
            fps,
            opts,
            fft,
            window,
            buf: vec![Complex::new(0.0, 0.0); opts.fft_size],
        })
    }

    /// Decode a WAV file and downmix it to mono.
    #[tracing::instrument(skip(opts))]
    pub fn open_wav(path: &Path, fps: Fps, opts: AnalyserOpts) -> SonoResult<Self> {
        let mut reader = hound::WavReader::open(path)
            .map_err(|e| SonoError::audio(format!("open '{}': {e}", path.display())))?;
        let spec = reader.spec();
        let channels = usize::from(spec.channels.max(1));

        let interleaved: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<Result<_, _>>()
                .map_err(|e| SonoError::audio(format!("decode '{}': {e}", path.display())))?,
            hound::SampleFormat::Int => {
                let scale = (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 / scale))
                    .collect::<Result<_, _>>()
                    .map_err(|e| SonoError::audio(format!("decode '{}': {e}", path.display())))?
            }
        };

        let mono = interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect::<Vec<_>>();
        tracing::info!(
            samples = mono.len(),
            sample_rate = spec.sample_rate,
            channels,
            "decoded audio"
        );
        Self::new(mono, spec.sample_rate, fps, opts)
    }

    pub fn duration_secs(&self) -> f64 {
        self.mono.len() as f64 / f64::from(self.sample_rate)
    }

    fn window_start(&self, frame: FrameIndex) -> usize {
        let secs = self.fps.frames_to_secs(frame.0);
        (secs * f64::from(self.sample_rate)).floor() as usize
    }
}

impl FrequencySource for PcmAnalyser {
    fn bin_count(&self) -> usize {
        self.opts.fft_size / 2
    }

    fn read(&mut self, frame: FrameIndex, out: &mut [u8]) -> SonoResult<()> {
        let n = self.opts.fft_size;
        let start = self.window_start(frame);
        for (i, slot) in self.buf.iter_mut().enumerate() {
            let s = self.mono.get(start + i).copied().unwrap_or(0.0);
            *slot = Complex::new(s * self.window[i], 0.0);
        }
        self.fft.process(&mut self.buf);

        let (min_db, max_db) = (self.opts.min_decibels, self.opts.max_decibels);
        for (k, o) in out.iter_mut().enumerate().take(n / 2) {
            let mag = self.buf[k].norm() / n as f32;
            let db = if mag > 0.0 {
                20.0 * mag.log10()
            } else {
                f32::NEG_INFINITY
            };
            let scaled = 255.0 * (db - min_db) / (max_db - min_db);
            *o = scaled.clamp(0.0, 255.0) as u8;
        }
        Ok(())
    }

    fn time(&self, frame: FrameIndex) -> Option<(f64, f64)> {
        Some((self.fps.frames_to_secs(frame.0), self.duration_secs()))
    }
}

/// Blackman window, as used by browser analyser nodes.
pub fn blackman_window(index: usize, size: usize) -> f32 {
    let a0 = 0.42;
    let a1 = 0.5;
    let a2 = 0.08;
    let x = index as f32 / size as f32;
    a0 - a1 * (2.0 * PI * x).cos() + a2 * (4.0 * PI * x).cos()
}

#[cfg(test)]
#[path = "../../tests/unit/audio/source.rs"]
mod tests;
