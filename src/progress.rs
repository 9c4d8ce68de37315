//! Run progress reporting.
//!
//! Reports what `jz run` is doing so long conversions are observable.
//! Progress is emitted on **stderr** so stdout remains parseable for scripts.

use std::io::Write;
use std::path::PathBuf;

/// A single progress event for a conversion run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranscodeProgressEvent {
    /// Walking the notes tree. Total unknown.
    Scanning,
    /// Note n of total has been converted.
    Writing { n: u64, total: u64 },
    /// Resource n of total has been copied.
    Copying { n: u64, total: u64 },
    /// Removing the export tree.
    Deleting { path: PathBuf },
}

/// Reports run progress. Implementations write to stderr (human or JSON).
pub trait ProgressReporter {
    fn report(&self, event: TranscodeProgressEvent);
}

/// Human-friendly progress on stderr: "run  writing  12 / 1,034 notes".
pub struct StderrProgress;

impl ProgressReporter for StderrProgress {
    fn report(&self, event: TranscodeProgressEvent) {
        let line = match &event {
            TranscodeProgressEvent::Scanning => "run  scanning...\n".to_string(),
            TranscodeProgressEvent::Writing { n, total } => format!(
                "run  writing  {} / {} notes\n",
                format_number(*n),
                format_number(*total)
            ),
            TranscodeProgressEvent::Copying { n, total } => format!(
                "run  copying  {} / {} resources\n",
                format_number(*n),
                format_number(*total)
            ),
            TranscodeProgressEvent::Deleting { path } => {
                format!("run  deleting  {}\n", path.display())
            }
        };
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// Machine-readable progress: one JSON object per line on stderr.
pub struct JsonProgress;

impl ProgressReporter for JsonProgress {
    fn report(&self, event: TranscodeProgressEvent) {
        let obj = match &event {
            TranscodeProgressEvent::Scanning => serde_json::json!({
                "event": "progress",
                "phase": "scanning"
            }),
            TranscodeProgressEvent::Writing { n, total } => serde_json::json!({
                "event": "progress",
                "phase": "writing",
                "n": n,
                "total": total
            }),
            TranscodeProgressEvent::Copying { n, total } => serde_json::json!({
                "event": "progress",
                "phase": "copying",
                "n": n,
                "total": total
            }),
            TranscodeProgressEvent::Deleting { path } => serde_json::json!({
                "event": "progress",
                "phase": "deleting",
                "path": path.display().to_string()
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(std::io::stderr().lock(), "{}", line);
            let _ = std::io::stderr().lock().flush();
        }
    }
}

/// No-op reporter when progress is disabled.
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: TranscodeProgressEvent) {}
}

fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + (s.len() - 1) / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq, clap::ValueEnum)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn ProgressReporter> {
        match self {
            ProgressMode::Off => Box::new(NoProgress),
            ProgressMode::Human => Box::new(StderrProgress),
            ProgressMode::Json => Box::new(JsonProgress),
        }
    }
}
