//! Interaction Logger
//!
//! Append-only JSONL logging of committed interactions.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;

use arena_report::Interaction;

/// Writes each committed interaction as one JSON line.
///
/// The scheduler logs every interaction at commit time, so the file reads
/// back in round and sequence order.
pub struct InteractionLogger {
    writer: Option<BufWriter<std::fs::File>>,
    line_count: u64,
}

impl InteractionLogger {
    /// Creates a logger writing to the given path, truncating any previous
    /// run's log.
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self {
            writer: Some(BufWriter::new(file)),
            line_count: 0,
        })
    }

    /// Creates a logger that counts but discards lines (for testing and
    /// sessions that do not request a log file).
    pub fn null() -> Self {
        Self {
            writer: None,
            line_count: 0,
        }
    }

    pub fn line_count(&self) -> u64 {
        self.line_count
    }

    /// Logs one interaction as a JSON line.
    pub fn log(&mut self, interaction: &Interaction) -> std::io::Result<()> {
        self.line_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(interaction)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    /// Flushes buffered lines to disk.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for InteractionLogger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("Warning: failed to flush interaction log: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_report::{AgentType, Stance};
    use std::fs::File;
    use std::io::BufRead;

    fn test_interaction(round: u32, seq: u32) -> Interaction {
        Interaction::new(
            round,
            seq,
            "agent_customer_0000",
            AgentType::Customer,
            0,
            Stance::Advocate,
            10,
            0.42,
        )
    }

    #[test]
    fn test_interactions_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interactions.jsonl");

        let mut logger = InteractionLogger::new(&path).unwrap();
        logger.log(&test_interaction(0, 0)).unwrap();
        logger.log(&test_interaction(0, 1)).unwrap();
        logger.flush().unwrap();

        let file = File::open(&path).unwrap();
        let reader = std::io::BufReader::new(file);
        let lines: Vec<String> = reader.lines().map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 2);

        let parsed: Interaction = serde_json::from_str(&lines[1]).unwrap();
        assert_eq!(parsed.seq, 1);
        assert_eq!(parsed.agent_id, "agent_customer_0000");
    }

    #[test]
    fn test_null_logger_counts_without_writing() {
        let mut logger = InteractionLogger::null();
        logger.log(&test_interaction(0, 0)).unwrap();
        logger.log(&test_interaction(1, 0)).unwrap();
        assert_eq!(logger.line_count(), 2);
    }

    #[test]
    fn test_new_run_truncates_old_log() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("interactions.jsonl");

        let mut first = InteractionLogger::new(&path).unwrap();
        first.log(&test_interaction(0, 0)).unwrap();
        first.flush().unwrap();
        drop(first);

        let second = InteractionLogger::new(&path).unwrap();
        drop(second);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.is_empty());
    }
}
