//! Synthetic transaction streams for manual and automated testing

use std::io::Write;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

use crate::data::transaction::TIME_FORMAT;
use crate::error::ConfigError;

/// Parameters of a generated stream
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Seed for the random number generator
    pub seed: u64,

    /// Number of distinct people
    pub vertices: usize,

    /// Number of lines to emit
    pub lines: usize,

    /// Epoch seconds of the stream origin
    pub start: i64,

    /// Expected time increase per line, in seconds
    pub increment: i64,

    /// Width of the uniform jitter around `increment`
    pub variation: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            vertices: 5,
            lines: 15,
            start: 1_220_227_200,
            increment: 15,
            variation: 180,
        }
    }
}

/// Spreadsheet-style column name: A..Z, AA, AB, ...
pub fn vertex_name(mut n: usize) -> String {
    let mut letters = Vec::new();
    loop {
        letters.push(char::from(b'A' + (n % 26) as u8));
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    letters.iter().rev().collect()
}

/// Write `config.lines` JSON records, one per line.
///
/// Time drifts by `increment` plus a jitter in `[-variation/2, variation/2)`,
/// so consecutive records may go back in time. Actor and target always differ.
pub fn generate<W: Write>(config: &GeneratorConfig, writer: &mut W) -> Result<()> {
    if config.vertices < 2 {
        return Err(ConfigError::TooFewVertices(config.vertices).into());
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let names: Vec<String> = (0..config.vertices).map(vertex_name).collect();
    let mut clock = config.start;

    for _ in 0..config.lines {
        let jitter = if config.variation > 0 {
            rng.gen_range(0..config.variation) - config.variation / 2
        } else {
            0
        };
        clock += config.increment + jitter;

        let actor = rng.gen_range(0..names.len());
        let mut target = rng.gen_range(0..names.len() - 1);
        if target >= actor {
            target += 1;
        }

        let created_time = Utc
            .timestamp_opt(clock, 0)
            .single()
            .ok_or_else(|| anyhow::anyhow!("timestamp {} out of range", clock))?
            .format(TIME_FORMAT)
            .to_string();

        let record = json!({
            "actor": names[actor],
            "target": names[target],
            "created_time": created_time,
        });
        writeln!(writer, "{}", record)?;
    }

    log::info!("Generated {} transactions over {} people", config.lines, config.vertices);

    Ok(())
}
