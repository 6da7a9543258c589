use super::*;

#[test]
fn silent_source_zero_fills() {
    let mut s = SilentSource::new(4);
    let mut out = [9u8; 4];
    s.read(FrameIndex(3), &mut out).unwrap();
    assert_eq!(out, [0; 4]);
}

#[test]
fn recorded_spectrum_pads_short_rows_and_missing_frames() {
    let mut rec = RecordedSpectrum::new(4, vec![vec![1, 2, 3, 4], vec![5, 6]]);
    let mut out = [0u8; 4];

    rec.read(FrameIndex(0), &mut out).unwrap();
    assert_eq!(out, [1, 2, 3, 4]);
    rec.read(FrameIndex(1), &mut out).unwrap();
    assert_eq!(out, [5, 6, 0, 0]);
    rec.read(FrameIndex(99), &mut out).unwrap();
    assert_eq!(out, [0; 4]);
}

#[test]
fn recorded_spectrum_reports_time_when_fps_is_known() {
    let mut rec = RecordedSpectrum::new(2, vec![vec![0, 0]; 30]);
    assert!(rec.time(FrameIndex(0)).is_none());
    rec.fps = Some(30);
    assert_eq!(rec.time(FrameIndex(15)), Some((0.5, 1.0)));
}

#[test]
fn recorded_spectrum_loads_from_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spectrum.json");
    std::fs::write(&path, r#"{"bin_count": 2, "frames": [[1, 2]]}"#).unwrap();
    let rec = RecordedSpectrum::from_path(&path).unwrap();
    assert_eq!(rec.bin_count, 2);

    std::fs::write(&path, r#"{"bin_count": 0, "frames": []}"#).unwrap();
    assert!(RecordedSpectrum::from_path(&path).is_err());
}

#[test]
fn analyser_peaks_at_the_tone_bin() {
    let sample_rate = 8192;
    let fft_size = 256;
    // Tone centred on bin 16: 16 * 8192 / 256 = 512 Hz.
    let mono: Vec<f32> = (0..sample_rate)
        .map(|i| (2.0 * PI * 512.0 * i as f32 / sample_rate as f32).sin())
        .collect();
    let opts = AnalyserOpts {
        fft_size,
        min_decibels: -100.0,
        max_decibels: 0.0,
    };
    let mut a = PcmAnalyser::new(mono, sample_rate, Fps::new(30).unwrap(), opts).unwrap();
    assert_eq!(a.bin_count(), 128);

    let mut out = vec![0u8; a.bin_count()];
    a.read(FrameIndex(1), &mut out).unwrap();
    let peak = out
        .iter()
        .enumerate()
        .max_by_key(|(_, v)| **v)
        .map(|(i, _)| i)
        .unwrap();
    assert_eq!(peak, 16);
    assert!(out[100] < out[16]);
}

#[test]
fn analyser_is_silent_past_the_end() {
    let opts = AnalyserOpts {
        fft_size: 64,
        ..AnalyserOpts::default()
    };
    let mut a = PcmAnalyser::new(vec![0.5; 100], 100, Fps::new(1).unwrap(), opts).unwrap();
    let mut out = vec![7u8; 32];
    a.read(FrameIndex(10), &mut out).unwrap();
    assert!(out.iter().all(|v| *v == 0));
}

#[test]
fn analyser_rejects_bad_options() {
    let fps = Fps::new(30).unwrap();
    let bad_size = AnalyserOpts {
        fft_size: 1000,
        ..AnalyserOpts::default()
    };
    assert!(PcmAnalyser::new(vec![], 44_100, fps, bad_size).is_err());
    assert!(PcmAnalyser::new(vec![], 0, fps, AnalyserOpts::default()).is_err());
}

#[test]
fn analyser_decodes_wav_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tone.wav");
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut w = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..8000 {
        let s = ((i as f32 * 0.3).sin() * 10_000.0) as i16;
        w.write_sample(s).unwrap();
        w.write_sample(s).unwrap();
    }
    w.finalize().unwrap();

    let a = PcmAnalyser::open_wav(&path, Fps::new(25).unwrap(), AnalyserOpts::default()).unwrap();
    assert!((a.duration_secs() - 1.0).abs() < 1e-9);
    assert_eq!(a.time(FrameIndex(25)), Some((1.0, 1.0)));
}

#[test]
fn blackman_window_is_zero_at_the_start() {
    assert!(blackman_window(0, 1024).abs() < 1e-6);
    assert!((blackman_window(512, 1024) - 1.0).abs() < 1e-5);
}
