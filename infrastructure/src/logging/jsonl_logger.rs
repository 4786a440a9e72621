//! JSONL file writer for debate events.
//!
//! Each [`DebateEvent`] is serialized as a single JSON line carrying its
//! `type` tag plus a `timestamp`, appended through a buffered writer.

use debate_application::{DebateEvent, TranscriptLogger};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL transcript logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlTranscriptLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlTranscriptLogger {
    /// Create a new logger writing to the given path.
    ///
    /// Creates the file (and parent directories) if they don't exist.
    /// Returns `None` if the file cannot be created.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match File::create(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not create transcript log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn record(event: &DebateEvent) -> Option<serde_json::Value> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        match serde_json::to_value(event) {
            Ok(serde_json::Value::Object(mut map)) => {
                map.insert(
                    "timestamp".to_string(),
                    serde_json::Value::String(timestamp),
                );
                Some(serde_json::Value::Object(map))
            }
            Ok(other) => Some(serde_json::json!({
                "type": event.event_type(),
                "timestamp": timestamp,
                "data": other,
            })),
            Err(e) => {
                warn!(event = event.event_type(), "Could not serialize debate event: {}", e);
                None
            }
        }
    }
}

impl TranscriptLogger for JsonlTranscriptLogger {
    fn log(&self, event: &DebateEvent) {
        let Some(record) = Self::record(event) else {
            return;
        };
        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            // Append-only; flush every line
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlTranscriptLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use debate_domain::{RoleId, SessionId, TokenUsage, Turn, TurnKind};
    use std::io::Read;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        let mut content = String::new();
        File::open(path)
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        content
            .trim()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_jsonl_logger_writes_valid_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.transcript.jsonl");
        let logger = JsonlTranscriptLogger::new(&path).unwrap();
        let session_id = SessionId::new();

        logger.log(&DebateEvent::SessionStarted {
            session_id,
            question: "Is tea better than coffee?".to_string(),
        });
        logger.log(&DebateEvent::TurnCompleted {
            session_id,
            turn: Turn::ok(
                RoleId::from("pro"),
                0,
                TurnKind::Opening,
                "Tea is calmer.",
                TokenUsage::new(12, 4),
                150,
            ),
        });

        // Flush
        drop(logger);

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);

        // Each line should be valid JSON with type + timestamp + session
        for value in &lines {
            assert!(value.get("type").is_some());
            assert!(value.get("timestamp").is_some());
            assert_eq!(value["session_id"], session_id.to_string());
        }

        assert_eq!(lines[0]["type"], "session_started");
        assert_eq!(lines[0]["question"], "Is tea better than coffee?");

        assert_eq!(lines[1]["type"], "turn_completed");
        assert_eq!(lines[1]["turn"]["roleId"], "pro");
        assert_eq!(lines[1]["turn"]["content"], "Tea is calmer.");
    }

    #[test]
    fn test_jsonl_logger_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("logs").join("s.transcript.jsonl");
        let logger = JsonlTranscriptLogger::new(&path).unwrap();
        assert_eq!(logger.path(), path.as_path());
        assert!(path.exists());
    }

    #[test]
    fn test_jsonl_logger_returns_none_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();
        assert!(JsonlTranscriptLogger::new(blocker.join("log.jsonl")).is_none());
    }
}
