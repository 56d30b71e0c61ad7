//! Line-oriented driver feeding the graph and emitting medians

use std::io::{BufRead, Write};

use anyhow::Result;
use serde::Serialize;

use crate::data::transaction::parse_line;
use crate::error::RecordError;
use crate::graph::{EventOutcome, SlidingWindowDegreeGraph};
use crate::storage::format_median;

/// Counters describing one pass over an input stream
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    /// Lines read, blank ones included
    pub lines: usize,

    /// Median values written
    pub emitted: usize,

    /// Lines that could not be parsed
    pub malformed: usize,

    pub self_loops: usize,
    pub stale: usize,
    pub inserted: usize,
    pub refreshed: usize,
    pub unchanged: usize,
}

impl StreamStats {
    fn record(&mut self, outcome: EventOutcome) {
        match outcome {
            EventOutcome::Inserted => self.inserted += 1,
            EventOutcome::Refreshed => self.refreshed += 1,
            EventOutcome::Unchanged => self.unchanged += 1,
            EventOutcome::Stale => self.stale += 1,
            EventOutcome::SelfLoop => self.self_loops += 1,
        }
    }
}

/// Read JSON records line by line, feed them to `graph` and write the
/// median degree after every accepted record.
///
/// Malformed lines are logged and skipped; only I/O errors abort.
pub fn process_stream<R: BufRead, W: Write>(
    mut reader: R,
    writer: &mut W,
    graph: &mut SlidingWindowDegreeGraph,
) -> Result<StreamStats> {
    let mut stats = StreamStats::default();
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        if reader.read_until(b'\n', &mut buffer)? == 0 {
            break;
        }
        stats.lines += 1;

        let line = match std::str::from_utf8(&buffer) {
            Ok(line) => line,
            Err(err) => {
                log::warn!("Skipping line {}: {}", stats.lines, RecordError::from(err));
                stats.malformed += 1;
                continue;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            log::debug!("Skipping blank line {}", stats.lines);
            continue;
        }

        let tx = match parse_line(line) {
            Ok(tx) => tx,
            Err(err) => {
                log::warn!("Skipping line {}: {}", stats.lines, err);
                stats.malformed += 1;
                continue;
            }
        };

        let outcome = graph.process_event(&tx.actor, &tx.target, tx.timestamp);
        stats.record(outcome);

        if !outcome.is_accepted() {
            log::debug!("Rejected self-loop for {} on line {}", tx.actor, stats.lines);
            continue;
        }

        writeln!(writer, "{}", format_median(graph.current_median()))?;
        stats.emitted += 1;
    }

    writer.flush()?;
    Ok(stats)
}
