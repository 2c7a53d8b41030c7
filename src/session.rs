// ============================================================================
// session.rs — KeyIntent
// Recording of forwarded key events and loading of recorded transcripts.
// ============================================================================

use std::fs;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::Local;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::surface::KeyEvent;

// ======================== Recorded Event ========================

/// One line of a transcript: a key event and when it arrived.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    pub elapsed_ms: f64,
    #[serde(flatten)]
    pub event: KeyEvent,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("transcript I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed transcript line {line} in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

// ======================== Recorder ========================

pub struct SessionRecorder {
    pub session_id: String,
    started: Instant,
    events: Vec<RecordedEvent>,
}

impl Default for SessionRecorder {
    fn default() -> Self {
        let now = Local::now();
        Self {
            session_id: format!("session_{}", now.format("%Y%m%d_%H%M%S")),
            started: Instant::now(),
            events: Vec::with_capacity(1_000),
        }
    }
}

impl SessionRecorder {
    pub fn record(&mut self, event: &KeyEvent) {
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.events.push(RecordedEvent {
            elapsed_ms,
            event: event.clone(),
        });
    }

    pub fn events(&self) -> &[RecordedEvent] {
        &self.events
    }

    /// Writes the transcript as JSON lines, one event per line.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        write_transcript(path, &self.events).map_err(|source| SessionError::Io {
            path: path.to_owned(),
            source,
        })?;
        log::info!(
            "Saved {} key events from {} to {}",
            self.events.len(),
            self.session_id,
            path.display()
        );
        Ok(())
    }
}

fn write_transcript(path: &Path, events: &[RecordedEvent]) -> io::Result<()> {
    let mut file = io::BufWriter::new(fs::File::create(path)?);
    for event in events {
        serde_json::to_writer(&mut file, event)?;
        file.write_all(b"\n")?;
    }
    file.flush()
}

// ======================== Loading ========================

/// Reads a JSON-lines transcript. Blank lines are skipped.
pub fn load_transcript(path: &Path) -> Result<Vec<RecordedEvent>, SessionError> {
    let io_err = |source| SessionError::Io {
        path: path.to_owned(),
        source,
    };
    let reader = BufReader::new(fs::File::open(path).map_err(io_err)?);

    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(io_err)?;
        if line.trim().is_empty() {
            continue;
        }
        let event = serde_json::from_str(&line).map_err(|source| SessionError::Parse {
            path: path.to_owned(),
            line: index + 1,
            source,
        })?;
        events.push(event);
    }
    Ok(events)
}
