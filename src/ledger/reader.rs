//! JSON-lines event log reader
//!
//! One `ProgressEvent` per line, blank lines ignored. Reading is strict:
//! - the first unparsable line stops the read (FATAL)
//! - no line is skipped or repaired
//! - events are yielded in file order; ordering checks belong to the ledger

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use super::errors::{LedgerError, LedgerResult};
use super::event::ProgressEvent;

/// Sequential reader over an event log.
pub struct EventLogReader<R> {
    lines: Lines<R>,
    line_number: usize,
    failed: bool,
}

impl EventLogReader<BufReader<File>> {
    /// Opens an event log file.
    pub fn open(path: &Path) -> LedgerResult<Self> {
        let file = File::open(path).map_err(|e| {
            LedgerError::malformed_log(
                0,
                format!("Failed to open event log {}: {}", path.display(), e),
            )
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> EventLogReader<R> {
    /// Wraps any buffered reader.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_number: 0,
            failed: false,
        }
    }

    /// Number of the last line read (1-based).
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next event, `Ok(None)` at end of log.
    pub fn read_next(&mut self) -> LedgerResult<Option<ProgressEvent>> {
        if self.failed {
            return Ok(None);
        }
        loop {
            let line = match self.lines.next() {
                Some(Ok(line)) => line,
                Some(Err(e)) => {
                    self.failed = true;
                    return Err(LedgerError::malformed_log(
                        self.line_number + 1,
                        format!("Read failed: {}", e),
                    ));
                }
                None => return Ok(None),
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            return match serde_json::from_str::<ProgressEvent>(&line) {
                Ok(event) => Ok(Some(event)),
                Err(e) => {
                    self.failed = true;
                    Err(LedgerError::malformed_log(
                        self.line_number,
                        format!("Invalid JSON: {}", e),
                    ))
                }
            };
        }
    }

    /// Reads every remaining event, failing on the first malformed line.
    pub fn read_all(mut self) -> LedgerResult<Vec<ProgressEvent>> {
        let mut events = Vec::new();
        while let Some(event) = self.read_next()? {
            events.push(event);
        }
        Ok(events)
    }
}

impl<R: BufRead> Iterator for EventLogReader<R> {
    type Item = LedgerResult<ProgressEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}
