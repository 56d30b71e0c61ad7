use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};

use median_degree::config::{Config, DEFAULT_WINDOW_SECONDS};
use median_degree::data::generator::{self, GeneratorConfig};
use median_degree::{pipeline, storage, SlidingWindowDegreeGraph};

#[derive(Parser, Debug)]
#[clap(
    name = "median-degree",
    about = "Rolling median of vertex degree over a sliding-window transaction graph"
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,

    /// Verbose logging
    #[clap(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the median degree after every transaction of a JSON-lines file
    Run(RunArgs),

    /// Write a random JSON-lines transaction file
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Path to input JSON-lines file
    #[clap(long)]
    input: String,

    /// Output file for the medians (stdout if omitted)
    #[clap(long)]
    output: Option<String>,

    /// Length of the sliding window in seconds
    #[clap(long, default_value_t = DEFAULT_WINDOW_SECONDS)]
    window: u32,

    /// Write a JSON run summary to this path
    #[clap(long)]
    summary: Option<String>,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Output file for the generated transactions
    #[clap(long)]
    output: String,

    /// Random seed
    #[clap(long, default_value = "0")]
    seed: u64,

    /// Number of distinct people
    #[clap(long, default_value = "5")]
    vertices: usize,

    /// Number of transactions
    #[clap(long, default_value = "15")]
    lines: usize,

    /// Epoch seconds of the first transaction's reference time
    #[clap(long, default_value = "1220227200")]
    start: i64,

    /// Expected seconds between consecutive transactions
    #[clap(long, default_value = "15")]
    increment: i64,

    /// Width of the random jitter around the increment, in seconds
    #[clap(long, default_value = "180")]
    variation: i64,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Cli::parse();

    // Configure logging
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    match args.command {
        Command::Run(run) => {
            let config = Config::new(run.input, run.output, run.window, run.summary);
            run_stream(&config)
        }
        Command::Generate(opts) => {
            let config = GeneratorConfig {
                seed: opts.seed,
                vertices: opts.vertices,
                lines: opts.lines,
                start: opts.start,
                increment: opts.increment,
                variation: opts.variation,
            };
            log::info!("Writing {} transactions to {}", config.lines, opts.output);
            let mut out = storage::open_output(Some(opts.output.as_str()))?;
            generator::generate(&config, &mut out)?;
            out.flush()?;
            Ok(())
        }
    }
}

fn run_stream(config: &Config) -> Result<()> {
    let window = config.window()?;

    log::info!("Starting median degree stream");
    log::info!("Input: {}", config.input);
    log::info!("Window: {} seconds", window);

    if !Path::new(&config.input).exists() {
        return Err(anyhow!("File not found: {}", config.input));
    }

    let reader = BufReader::new(File::open(&config.input)?);
    if let Some(output) = &config.output {
        log::info!("Writing medians to {}", output);
    }
    let mut writer = storage::open_output(config.output.as_deref())?;
    let mut graph = SlidingWindowDegreeGraph::new(window);

    let stats = pipeline::process_stream(reader, &mut writer, &mut graph)?;

    log::info!(
        "Processed {} lines: {} medians written, {} malformed, {} self-loops, {} stale",
        stats.lines,
        stats.emitted,
        stats.malformed,
        stats.self_loops,
        stats.stale
    );
    log::info!(
        "Final graph has {} vertices and {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );

    if let Some(path) = &config.summary {
        storage::save_summary(&stats, &graph, path)?;
    }

    Ok(())
}
