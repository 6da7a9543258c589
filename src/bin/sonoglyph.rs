use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

use sonoglyph::save::store::{ProjectStore, read_json};
use sonoglyph::save::validate::read_save;
use sonoglyph::{
    AnalyserOpts, FrameIndex, FramePipeline, FrequencySource, LoadOpts, MigrationLog,
    PcmAnalyser, PipelineOpts, Project, RecordedSpectrum, RecordingSurface, ReportMode,
    SilentSource,
};

#[derive(Parser, Debug)]
#[command(name = "sonoglyph", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upgrade a save document to the current version.
    Migrate(MigrateArgs),
    /// Print a summary of a project or save document.
    Inspect(InspectArgs),
    /// Run the frame pipeline offline and write every frame's visuals as JSON lines.
    Simulate(SimulateArgs),
}

#[derive(Args, Debug)]
struct MigrateArgs {
    /// Input save JSON (any supported version).
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output save JSON at the current version.
    #[arg(long)]
    out: PathBuf,

    /// Do not print the warning digest; warnings still go to the log.
    #[arg(long)]
    batch: bool,

    /// Append conversion warnings to this file.
    #[arg(long)]
    log: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Project directory or save JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Args, Debug)]
struct SimulateArgs {
    /// Project directory or save JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Number of frames to export.
    #[arg(long)]
    frames: u64,

    /// Recorded spectrum JSON to drive the frames.
    #[arg(long, conflicts_with = "audio")]
    spectrum: Option<PathBuf>,

    /// WAV file to analyse; defaults to the project's own track.
    #[arg(long)]
    audio: Option<PathBuf>,

    /// Seed for widget randomness.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// FFT window size for audio analysis.
    #[arg(long, default_value_t = 2048)]
    fft_size: usize,

    /// Output JSON-lines file.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Migrate(args) => cmd_migrate(args),
        Command::Inspect(args) => cmd_inspect(args),
        Command::Simulate(args) => cmd_simulate(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

/// Raw document plus the store it came from, when the input is a project directory.
fn read_input(path: &Path) -> anyhow::Result<(Value, Option<ProjectStore>)> {
    if path.is_dir() {
        let store = ProjectStore::new(path);
        let doc = store
            .read_document()
            .with_context(|| format!("read project '{}'", path.display()))?;
        Ok((doc, Some(store)))
    } else {
        let doc = read_json(path).with_context(|| format!("read save '{}'", path.display()))?;
        Ok((doc, None))
    }
}

fn cmd_migrate(args: MigrateArgs) -> anyhow::Result<()> {
    let mut doc = read_json(&args.in_path)
        .with_context(|| format!("read save '{}'", args.in_path.display()))?;
    let mut log = MigrationLog::new();
    let report = sonoglyph::migrate(&mut doc, &mut log).context("migrate save")?;
    let save = read_save(&doc, &mut log).context("validate migrated save")?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(f), &save).context("write migrated save")?;

    let mode = if args.batch {
        ReportMode::Batch
    } else {
        ReportMode::Interactive
    };
    if let Some(digest) = log.report(mode, args.log.as_deref())? {
        println!("{digest}");
    }
    eprintln!(
        "migrated v{} -> v{} ({} warnings), wrote {}",
        report.from_version,
        report.to_version,
        log.len(),
        args.out.display()
    );
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let (doc, _) = read_input(&args.in_path)?;
    let version = sonoglyph::save::migrate::save_version(&doc)?;
    let (project, log) = Project::from_document(doc, &LoadOpts::default())?;

    let mut kinds: BTreeMap<&str, usize> = BTreeMap::new();
    for record in project.objects().values() {
        *kinds.entry(record.type_name()).or_default() += 1;
    }
    let screen = project.screen();
    println!("save_version: {version}");
    println!("screen: {}x{}", screen.width, screen.height);
    println!("fps: {}", project.fps().get());
    println!("audio: {}", project.audio_filename());
    println!("objects: {}", project.objects().len());
    for (kind, n) in kinds {
        println!("  {kind}: {n}");
    }
    println!("warnings: {}", log.len());
    for e in log.entries() {
        println!("  {e}");
    }
    Ok(())
}

fn cmd_simulate(args: SimulateArgs) -> anyhow::Result<()> {
    let (doc, store) = read_input(&args.in_path)?;
    let opts = LoadOpts {
        report: ReportMode::Batch,
        seed: args.seed,
        ..LoadOpts::default()
    };
    let (mut project, log) = Project::from_document(doc, &opts)?;
    log.report(ReportMode::Batch, None)?;

    let pipeline_opts = PipelineOpts {
        fft_size: args.fft_size,
        seed: args.seed,
        ..PipelineOpts::default()
    };
    let audio = args.audio.clone().or_else(|| {
        store
            .as_ref()
            .and_then(|s| s.audio_path(project.audio_filename()))
            .filter(|p| p.exists())
    });
    let source: Box<dyn FrequencySource> = if let Some(path) = &args.spectrum {
        Box::new(
            RecordedSpectrum::from_path(path)
                .with_context(|| format!("read spectrum '{}'", path.display()))?,
        )
    } else if let Some(path) = &audio {
        let analyser = AnalyserOpts {
            fft_size: args.fft_size,
            ..AnalyserOpts::default()
        };
        Box::new(
            PcmAnalyser::open_wav(path, project.fps(), analyser)
                .with_context(|| format!("open audio '{}'", path.display()))?,
        )
    } else {
        Box::new(SilentSource::new(args.fft_size / 2))
    };
    let mut pipeline = FramePipeline::new(source, pipeline_opts);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let f = File::create(&args.out)
        .with_context(|| format!("create output '{}'", args.out.display()))?;
    let mut w = BufWriter::new(f);
    let mut surface = RecordingSurface::new();
    for i in 0..args.frames {
        let stats = pipeline.export_frame(FrameIndex(i), project.scene(), &mut surface);
        let line = serde_json::json!({
            "frame": stats.frame,
            "volume": stats.volume,
            "visuals": surface.visuals(),
        });
        serde_json::to_writer(&mut w, &line).context("encode frame")?;
        w.write_all(b"\n").context("write frame")?;
    }
    w.flush().context("flush output")?;

    eprintln!("wrote {} frames to {}", args.frames, args.out.display());
    Ok(())
}
