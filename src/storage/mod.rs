//! Output sinks and run summary persistence

use anyhow::Result;
use crate::graph::SlidingWindowDegreeGraph;
use crate::pipeline::StreamStats;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use serde_json::{json, to_string_pretty};

/// Render a median the way the output file expects it: two decimals
pub fn format_median(median: f64) -> String {
    format!("{:.2}", median)
}

/// Open an output sink: a buffered file, or stdout when no path is given
pub fn open_output(path: Option<&str>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Save counters and final graph state as pretty-printed JSON
pub fn save_summary(
    stats: &StreamStats,
    graph: &SlidingWindowDegreeGraph,
    path: &str,
) -> Result<()> {
    log::info!("Saving run summary to {}", path);

    let summary = json!({
        "stream": stats,
        "graph": {
            "window_seconds": graph.window_seconds(),
            "watermark": graph.watermark(),
            "vertex_count": graph.vertex_count(),
            "edge_count": graph.edge_count(),
            "median_degree": graph.current_median(),
        }
    });

    let mut file = File::create(path)?;
    file.write_all(to_string_pretty(&summary)?.as_bytes())?;

    Ok(())
}
