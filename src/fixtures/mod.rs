//! Fixture utilities for the deterministic CLI harness.
//!
//! Fixtures are recorded landmark streams stored as JSON lines, one
//! [`FrameInput`] per line, with an optional `<name>.expect.json` next to
//! them. The catalog discovers and loads them; [`FixtureExpectations`]
//! compares a finished session against the expected counts.

use std::fs;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::pose::FrameInput;
use crate::session::SessionSummary;

pub mod synthetic;

pub use synthetic::SyntheticJumper;

/// Default location for fixture JSONL/JSON assets.
pub const DEFAULT_FIXTURE_ROOT: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/fixtures");

/// File extension for landmark streams.
pub const FIXTURE_EXTENSION: &str = "jsonl";

/// Metadata describing an available fixture.
#[derive(Clone, Debug)]
pub struct FixtureMetadata {
    pub name: String,
    pub frames_path: PathBuf,
    pub expect_path: Option<PathBuf>,
}

/// Loaded fixture data.
pub struct FixtureData {
    pub metadata: FixtureMetadata,
    pub frames: Vec<FrameInput>,
    pub expectations: Option<FixtureExpectations>,
}

/// JSON expectation schema for fixture verification.
///
/// `min_rpm` / `max_rpm` bound the session's average cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FixtureExpectations {
    pub repetitions: usize,
    #[serde(default)]
    pub min_rpm: Option<f64>,
    #[serde(default)]
    pub max_rpm: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl FixtureExpectations {
    pub fn exact(repetitions: usize) -> Self {
        Self {
            repetitions,
            min_rpm: None,
            max_rpm: None,
            notes: None,
        }
    }

    pub fn verify(&self, summary: &SessionSummary) -> std::result::Result<(), ExpectationDiff> {
        let mut failures = Vec::new();

        if summary.total_repetitions != self.repetitions {
            failures.push(ExpectationFailure {
                field: "repetitions",
                expected: self.repetitions as f64,
                actual: summary.total_repetitions as f64,
            });
        }
        if let Some(min_rpm) = self.min_rpm {
            if summary.average_rpm < min_rpm {
                failures.push(ExpectationFailure {
                    field: "min_rpm",
                    expected: min_rpm,
                    actual: summary.average_rpm,
                });
            }
        }
        if let Some(max_rpm) = self.max_rpm {
            if summary.average_rpm > max_rpm {
                failures.push(ExpectationFailure {
                    field: "max_rpm",
                    expected: max_rpm,
                    actual: summary.average_rpm,
                });
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(ExpectationDiff { failures })
        }
    }
}

/// Outcome of comparing a session with expectations.
#[derive(Debug)]
pub struct ExpectationDiff {
    pub failures: Vec<ExpectationFailure>,
}

impl ExpectationDiff {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "failures": self.failures.iter().map(|failure| {
                serde_json::json!({
                    "field": failure.field,
                    "expected": failure.expected,
                    "actual": failure.actual,
                })
            }).collect::<Vec<_>>()
        })
    }
}

/// Single mismatched expectation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpectationFailure {
    pub field: &'static str,
    pub expected: f64,
    pub actual: f64,
}

/// Catalog responsible for discovering fixtures on disk.
pub struct FixtureCatalog {
    root: PathBuf,
}

impl FixtureCatalog {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List all fixtures by their metadata, sorted by name.
    pub fn discover(&self) -> Result<Vec<FixtureMetadata>> {
        let mut fixtures = Vec::new();
        if !self.root.exists() {
            return Ok(fixtures);
        }

        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) == Some(FIXTURE_EXTENSION) {
                fixtures.push(metadata_for_path(&path)?);
            }
        }

        fixtures.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(fixtures)
    }

    /// Load frames + expectations for a fixture name or a path.
    pub fn load(&self, fixture: &str, override_expect: Option<PathBuf>) -> Result<FixtureData> {
        let frames_path = self.resolve_fixture_path(fixture)?;
        let metadata = metadata_for_path(&frames_path)?;
        let frames = read_frames(&frames_path)?;

        let expectation_path = override_expect.or(metadata.expect_path.clone());
        let expectations = match expectation_path {
            Some(path) => Some(read_expectations(&path)?),
            None => None,
        };

        Ok(FixtureData {
            metadata,
            frames,
            expectations,
        })
    }

    fn resolve_fixture_path(&self, fixture: &str) -> Result<PathBuf> {
        let as_path = Path::new(fixture);
        if as_path.is_file() {
            return Ok(as_path.to_path_buf());
        }

        let candidate = self.root.join(format!("{fixture}.{FIXTURE_EXTENSION}"));
        if candidate.is_file() {
            Ok(candidate)
        } else {
            Err(anyhow!(
                "Fixture '{fixture}' not found in {}",
                self.root.display()
            ))
        }
    }
}

impl Default for FixtureCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_FIXTURE_ROOT)
    }
}

fn metadata_for_path(frames_path: &Path) -> Result<FixtureMetadata> {
    let name = frames_path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| anyhow!("Invalid fixture name for {}", frames_path.display()))?
        .to_string();
    let expect_path = expectation_path_for(frames_path);
    Ok(FixtureMetadata {
        name,
        frames_path: frames_path.to_path_buf(),
        expect_path: expect_path.exists().then_some(expect_path),
    })
}

/// `walk.jsonl` -> `walk.expect.json`
pub fn expectation_path_for(frames_path: &Path) -> PathBuf {
    frames_path.with_extension("expect.json")
}

pub fn read_expectations(path: &Path) -> Result<FixtureExpectations> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("reading expectation {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
}

/// Parse a JSON-lines landmark stream. Blank lines and `#` comments are skipped.
pub fn read_frames(path: &Path) -> Result<Vec<FrameInput>> {
    let file = fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut frames = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("reading {}", path.display()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let frame: FrameInput = serde_json::from_str(trimmed)
            .with_context(|| format!("parsing {} line {}", path.display(), index + 1))?;
        frames.push(frame);
    }

    Ok(frames)
}

/// Write frames as JSON lines.
pub fn write_frames<W: Write>(mut writer: W, frames: &[FrameInput]) -> Result<()> {
    for frame in frames {
        serde_json::to_writer(&mut writer, frame)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::LandmarkFrame;
    use tempfile::tempdir;

    fn summary(total: usize, average_rpm: f64) -> SessionSummary {
        SessionSummary {
            session_id: "20240101_000000".to_string(),
            started_at: None,
            ended_at: None,
            duration: 10.0,
            total_repetitions: total,
            average_rpm,
            max_rpm: average_rpm,
            min_rpm: average_rpm,
            average_interval: 0.5,
            max_interval: 0.5,
            min_interval: 0.5,
        }
    }

    #[test]
    fn expectations_match() {
        let expect = FixtureExpectations {
            repetitions: 5,
            min_rpm: Some(100.0),
            max_rpm: Some(140.0),
            notes: None,
        };
        assert!(expect.verify(&summary(5, 120.0)).is_ok());
    }

    #[test]
    fn expectation_diff_lists_each_field() {
        let expect = FixtureExpectations {
            repetitions: 5,
            min_rpm: Some(130.0),
            max_rpm: None,
            notes: None,
        };
        let diff = expect.verify(&summary(4, 120.0)).unwrap_err();
        assert_eq!(diff.failures.len(), 2);
        assert_eq!(diff.failures[0].field, "repetitions");
        assert_eq!(diff.failures[1].field, "min_rpm");

        let json = diff.to_json();
        assert_eq!(json["failures"][0]["expected"], 5.0);
        assert_eq!(json["failures"][0]["actual"], 4.0);
    }

    #[test]
    fn catalog_discovers_and_loads_fixtures() {
        let dir = tempdir().unwrap();
        let frames = vec![
            FrameInput::detected(0.0, LandmarkFrame::standing(0.5, 0.9)),
            FrameInput::missing(0.033),
        ];
        let file = fs::File::create(dir.path().join("idle.jsonl")).unwrap();
        write_frames(file, &frames).unwrap();
        fs::write(dir.path().join("idle.expect.json"), r#"{"repetitions": 0}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let catalog = FixtureCatalog::new(dir.path());
        let fixtures = catalog.discover().unwrap();
        assert_eq!(fixtures.len(), 1);
        assert_eq!(fixtures[0].name, "idle");
        assert!(fixtures[0].expect_path.is_some());

        let data = catalog.load("idle", None).unwrap();
        assert_eq!(data.frames, frames);
        assert_eq!(data.expectations, Some(FixtureExpectations::exact(0)));
    }

    #[test]
    fn read_frames_skips_comments_and_reports_bad_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("mixed.jsonl");
        fs::write(
            &path,
            "# header\n\n{\"t\": 0.5, \"landmarks\": null}\n{\"t\": 1.0}\n",
        )
        .unwrap();
        let frames = read_frames(&path).unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|frame| frame.landmarks.is_none()));

        fs::write(&path, "{\"t\": 0.5}\nnot json\n").unwrap();
        let err = read_frames(&path).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn missing_fixture_is_an_error() {
        let dir = tempdir().unwrap();
        let catalog = FixtureCatalog::new(dir.path());
        assert!(catalog.load("nope", None).is_err());
        assert!(FixtureCatalog::new(dir.path().join("absent"))
            .discover()
            .unwrap()
            .is_empty());
    }
}
