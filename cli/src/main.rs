//! latency-trace: query a service latency graph from the command line.
//!
//! ```bash
//! # Total latency along a trace
//! latency-trace --graph graph.txt latency A->B->C
//!
//! # Cheapest cycle back to B, with its path
//! latency-trace --graph graph.txt shortest B B
//!
//! # The sample report, as JSON lines
//! latency-trace --graph graph.txt --format json report
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use latency_trace_core::{Latency, TracingEngine};

mod commands;
mod config;
mod load;
mod output;
mod util;

use config::Settings;
use output::OutputFormat;

#[derive(Parser)]
#[command(name = "latency-trace")]
#[command(about = "Trace latency queries over a service call graph", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Edge-list file (records like `AB5, BC4`)
    #[arg(short, long, global = true)]
    graph: Option<PathBuf>,

    /// Configuration file (default: ./latency-trace.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Maximum walk frames per counting query
    #[arg(long, global = true)]
    step_limit: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Total latency along a trace, e.g. A->B->C
    Latency {
        /// Nodes separated by '->', ',' or spaces
        trace: String,
    },

    /// Count traces with between 1 and HOPS hops
    MaxHops { start: String, end: String, hops: u32 },

    /// Count traces with exactly HOPS hops
    FixedHops { start: String, end: String, hops: u32 },

    /// Count traces whose total latency stays below LATENCY
    MaxLatency {
        start: String,
        end: String,
        latency: Latency,
    },

    /// Minimum-latency trace (START == END finds the cheapest cycle)
    Shortest { start: String, end: String },

    /// Run the sample query set
    Report,

    /// Show graph size and load time
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load(cli.config.as_deref())
        .context("could not load configuration")?
        .override_with(cli.graph, cli.step_limit, cli.format);

    let Some(graph_path) = settings.graph.path.as_deref() else {
        bail!("no graph file given; pass --graph <FILE> or set [graph] path in the config file");
    };

    let state = load::load(graph_path)?;
    let engine = TracingEngine::new(&state.graph).with_step_limit(settings.query.step_limit);
    let format = settings.output.format;

    let rendered = match cli.command {
        Commands::Latency { trace } => {
            let trace = util::parse_trace(&trace);
            output::render_results(&[commands::trace_latency(&engine, &trace)], format)?
        }
        Commands::MaxHops { start, end, hops } => {
            output::render_results(&[commands::max_hops(&engine, &start, &end, hops)], format)?
        }
        Commands::FixedHops { start, end, hops } => {
            output::render_results(&[commands::fixed_hops(&engine, &start, &end, hops)], format)?
        }
        Commands::MaxLatency {
            start,
            end,
            latency,
        } => output::render_results(
            &[commands::max_latency(&engine, &start, &end, latency)],
            format,
        )?,
        Commands::Shortest { start, end } => {
            output::render_results(&[commands::shortest(&engine, &start, &end)], format)?
        }
        Commands::Report => output::render_results(&commands::report(&engine), format)?,
        Commands::Stats => output::render_stats(&state.stats(), format)?,
    };

    output::emit(&rendered).context("could not write output")?;
    Ok(())
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("latency_trace=debug,latency_trace_core=debug,info")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("latency_trace=info,latency_trace_core=info,warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
