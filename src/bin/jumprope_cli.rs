use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jumprope_counter::engine::{FrameSnapshot, FrameStats, JumpEngine, Renderer};
use jumprope_counter::error::SessionError;
use jumprope_counter::fixtures::{
    expectation_path_for, write_frames, ExpectationDiff, FixtureCatalog, FixtureExpectations,
    SyntheticJumper,
};
use jumprope_counter::session::{RepetitionRecord, SessionRecorder, SessionSummary};
use jumprope_counter::{config::DEFAULT_CONFIG_PATH, init_logging, AppConfig};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "jumprope_cli",
    about = "Deterministic landmark fixture harness for the jump rope counter"
)]
struct Cli {
    /// Override directory containing fixture assets (defaults to ./fixtures of the crate)
    #[arg(long, global = true)]
    fixtures_dir: Option<PathBuf>,
    /// JSON config file (defaults apply when missing)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Count repetitions in a fixture and optionally compare against expectations
    Count {
        #[arg(long)]
        fixture: String,
        #[arg(long)]
        expect: Option<PathBuf>,
        /// Directory for the session CSV (overrides config)
        #[arg(long)]
        log_dir: Option<PathBuf>,
        #[arg(long)]
        no_export: bool,
        /// Session identifier (defaults to the current local time)
        #[arg(long)]
        session_id: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Stream one renderer snapshot per frame to stdout as JSON lines
    Stream {
        #[arg(long)]
        fixture: String,
    },
    /// Generate a synthetic landmark fixture
    Synthetic {
        #[arg(long, default_value_t = 10)]
        jumps: usize,
        #[arg(long, default_value_t = 30.0)]
        fps: f64,
        /// Seconds per jump
        #[arg(long, default_value_t = 0.5)]
        period: f64,
        #[arg(long, default_value_t = 7)]
        seed: u64,
        #[arg(long, default_value_t = 0.003)]
        jitter: f64,
        #[arg(long, default_value_t = 0.0)]
        dropout: f64,
        /// Write JSONL here plus a matching `.expect.json`; stdout otherwise
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// List available fixtures on disk
    DumpFixtures,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let catalog = cli
        .fixtures_dir
        .map(FixtureCatalog::new)
        .unwrap_or_default();
    let config = AppConfig::load_from_file(&cli.config);

    match cli.command {
        Commands::Count {
            fixture,
            expect,
            log_dir,
            no_export,
            session_id,
            output,
        } => {
            let mut config = config;
            if let Some(dir) = log_dir {
                config.export.log_dir = dir;
            }
            if no_export {
                config.export.enabled = false;
            }
            run_count(&catalog, &config, &fixture, expect, session_id, output)
        }
        Commands::Stream { fixture } => run_stream(&catalog, &config, &fixture),
        Commands::Synthetic {
            jumps,
            fps,
            period,
            seed,
            jitter,
            dropout,
            output,
        } => {
            let jumper = SyntheticJumper {
                seed,
                fps,
                jumps,
                period,
                jitter,
                dropout,
                ..SyntheticJumper::default()
            };
            run_synthetic(&jumper, output)
        }
        Commands::DumpFixtures => run_dump(&catalog),
    }
}

fn run_count(
    catalog: &FixtureCatalog,
    config: &AppConfig,
    fixture: &str,
    override_expect: Option<PathBuf>,
    session_id: Option<String>,
    output_path: Option<PathBuf>,
) -> Result<ExitCode> {
    let data = catalog.load(fixture, override_expect)?;

    let recorder = match session_id {
        Some(id) => SessionRecorder::with_session_id(id.into()),
        None => SessionRecorder::new(),
    }
    .with_config(config);
    let mut engine = JumpEngine::with_recorder(config, recorder)?;
    for frame in &data.frames {
        engine
            .process(frame)
            .with_context(|| format!("processing fixture {}", data.metadata.name))?;
    }

    let (summary, export_path, frames) = match engine.finish() {
        Ok(report) => (report.summary, report.export_path, report.frames),
        // Calibration never completed: nothing was counted
        Err(SessionError::NotStarted) => {
            tracing::warn!(
                "[jumprope_cli] Fixture {} ended before calibration completed",
                data.metadata.name
            );
            (engine.recorder().summary(), None, engine.frame_stats())
        }
        Err(err) => return Err(err.into()),
    };
    eprintln!("{}", summary.render_table());

    emit_report(
        &CountReport {
            fixture: &data.metadata.name,
            frames,
            summary: &summary,
            export_path: export_path.as_deref(),
            records: engine.recorder().records(),
        },
        output_path,
    )?;

    match data.expectations {
        Some(expectations) => match expectations.verify(&summary) {
            Ok(()) => Ok(ExitCode::from(0)),
            Err(diff) => {
                emit_diff(&diff)?;
                Ok(ExitCode::from(2))
            }
        },
        None => Ok(ExitCode::from(0)),
    }
}

fn run_stream(catalog: &FixtureCatalog, config: &AppConfig, fixture: &str) -> Result<ExitCode> {
    let data = catalog.load(fixture, None)?;
    let mut config = config.clone();
    config.export.enabled = false;

    let mut engine = JumpEngine::new(&config)?;
    let stdout = io::stdout();
    let mut renderer = JsonLineRenderer::new(stdout.lock());
    for frame in &data.frames {
        engine.process(frame)?;
        renderer.render(&engine.snapshot());
    }
    renderer.finish()?;

    Ok(ExitCode::from(0))
}

fn run_synthetic(jumper: &SyntheticJumper, output: Option<PathBuf>) -> Result<ExitCode> {
    let frames = jumper.generate();

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            let file =
                fs::File::create(&path).with_context(|| format!("writing {}", path.display()))?;
            write_frames(io::BufWriter::new(file), &frames)?;

            let expect_path = expectation_path_for(&path);
            let expectations = FixtureExpectations {
                notes: Some(format!("synthetic seed {}", jumper.seed)),
                ..FixtureExpectations::exact(jumper.jumps)
            };
            fs::write(&expect_path, serde_json::to_string_pretty(&expectations)?)
                .with_context(|| format!("writing {}", expect_path.display()))?;
            eprintln!(
                "Wrote {} frames to {} ({})",
                frames.len(),
                path.display(),
                expect_path.display()
            );
        }
        None => write_frames(io::stdout().lock(), &frames)?,
    }

    Ok(ExitCode::from(0))
}

fn run_dump(catalog: &FixtureCatalog) -> Result<ExitCode> {
    let fixtures = catalog.discover()?;
    if fixtures.is_empty() {
        println!("No fixtures found under {}", catalog.root().display());
        return Ok(ExitCode::from(0));
    }

    for metadata in fixtures {
        if let Some(expect) = metadata.expect_path {
            println!("{} -> {}", metadata.name, expect.display());
        } else {
            println!("{}", metadata.name);
        }
    }
    Ok(ExitCode::from(0))
}

fn emit_report(report: &CountReport<'_>, output_path: Option<PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;

    if let Some(path) = output_path {
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn emit_diff(diff: &ExpectationDiff) -> Result<()> {
    let json = serde_json::to_string_pretty(&diff.to_json())?;
    eprintln!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct CountReport<'a> {
    fixture: &'a str,
    frames: FrameStats,
    summary: &'a SessionSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    export_path: Option<&'a Path>,
    #[serde(skip_serializing_if = "slice_empty")]
    records: &'a [RepetitionRecord],
}

fn slice_empty(records: &&[RepetitionRecord]) -> bool {
    records.is_empty()
}

/// Writes each snapshot as one JSON line; the first write error is kept.
struct JsonLineRenderer<W: Write> {
    writer: W,
    error: Option<anyhow::Error>,
}

impl<W: Write> JsonLineRenderer<W> {
    fn new(writer: W) -> Self {
        Self {
            writer,
            error: None,
        }
    }

    fn finish(mut self) -> Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        self.writer.flush()?;
        Ok(())
    }
}

impl<W: Write> Renderer for JsonLineRenderer<W> {
    fn render(&mut self, snapshot: &FrameSnapshot) {
        if self.error.is_some() {
            return;
        }
        let result = serde_json::to_writer(&mut self.writer, snapshot)
            .map_err(anyhow::Error::from)
            .and_then(|()| self.writer.write_all(b"\n").map_err(anyhow::Error::from));
        if let Err(err) = result {
            self.error = Some(err);
        }
    }
}
