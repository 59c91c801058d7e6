//! `ccprop`: connected components of a Matrix Market graph by label
//! propagation.
//!
//! Loads the graph, runs the selected strategy (or all of them), prints the
//! result as status lines, CSV or YAML and maps failures to exit code 1.

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

use anyhow::{ensure, Context, Result};
use clap::builder::RangedU64ValueParser;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, ValueEnum};
use tracing::{error, info};

use ccprop::algorithms::count::same_partition;
use ccprop::logging::{self, LoggingError};
use ccprop::report::{self, measure, RunRecord, CSV_HEADER};
use ccprop::types::LoadOptions;
use ccprop::{measure_logged, CCConfig, CCController, CCResult, CSRGraph, StrategyKind};

/// Which strategies to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Sequential,
    Chunked,
    Team,
    WorkStealing,
    /// Run every strategy and check that they agree.
    All,
}

impl StrategyArg {
    fn kinds(self) -> Vec<StrategyKind> {
        match self {
            StrategyArg::Sequential => vec![StrategyKind::Sequential],
            StrategyArg::Chunked => vec![StrategyKind::Chunked],
            StrategyArg::Team => vec![StrategyKind::Team],
            StrategyArg::WorkStealing => vec![StrategyKind::WorkStealing],
            StrategyArg::All => StrategyKind::ALL.to_vec(),
        }
    }
}

/// Report format written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Emit {
    Text,
    Csv,
    Yaml,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Matrix Market file holding the graph.
    matrix: PathBuf,

    /// Worker count for the parallel strategies.
    #[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    threads: Option<usize>,

    /// Execution strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Sequential)]
    strategy: StrategyArg,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Emit::Text)]
    emit: Emit,

    /// Graph name used in reports (defaults to the file stem of MATRIX).
    #[arg(long)]
    graph_name: Option<String>,

    /// Do not draw a progress bar while loading.
    #[arg(long)]
    no_progress: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => return print_usage_error(&err),
    };
    if args.strategy == StrategyArg::Chunked && args.threads.is_none() {
        let err = Args::command().error(
            ErrorKind::MissingRequiredArgument,
            "the chunked strategy requires THREADS",
        );
        return print_usage_error(&err);
    }

    if let Err(err) = logging::init_logging() {
        report_logging_init_error(&err);
        return ExitCode::FAILURE;
    }

    if let Err(err) = try_main(&args) {
        let message = format!("{err:#}");
        error!(error = %message, "ccprop failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Prints a clap error; help and version requests are not failures.
fn print_usage_error(err: &clap::Error) -> ExitCode {
    let _ = err.print();
    if err.use_stderr() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn report_logging_init_error(err: &LoggingError) {
    eprintln!("failed to initialize logging: {err}");
}

fn try_main(args: &Args) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());

    // Step 1. Load the graph.
    let graph = measure_logged!("load", {
        CSRGraph::from_mtx_file(
            &args.matrix,
            LoadOptions {
                show_progress: !args.no_progress,
            },
        )
    })
    .with_context(|| format!("failed to load {}", args.matrix.display()))?;
    let vertices = graph.vertex_count;
    let edges = graph.edge_count();
    status(args.emit, &mut writer, &report::graph_summary(vertices, edges))?;

    // Step 2. Run every requested strategy on the shared graph.
    let graph_name = args
        .graph_name
        .clone()
        .unwrap_or_else(|| file_stem(&args.matrix));
    let controller = CCController::new(Arc::new(graph));
    let mut records = Vec::new();
    let mut baseline: Option<CCResult> = None;

    for strategy in args.strategy.kinds() {
        let config = CCConfig {
            strategy,
            thread_num: thread_num_for(strategy, args.threads),
        };
        let relax = config
            .build_strategy()
            .with_context(|| format!("failed to set up the {strategy} strategy"))?;
        let run = measure(|| controller.run_with(relax));
        let record = RunRecord::new(graph_name.as_str(), edges, strategy, &run);
        status(args.emit, &mut writer, &record.to_text())?;

        // Step 3. In comparison mode every strategy must agree with the first.
        if let Some(expected) = &baseline {
            ensure!(
                same_partition(&expected.labels, &run.result.labels)
                    && expected.component_count() == record.components,
                "the {strategy} strategy disagrees with the sequential result"
            );
        }
        if baseline.is_none() {
            baseline = Some(run.result);
        }
        records.push(record);
    }

    // Step 4. Emit the machine-readable report.
    match args.emit {
        Emit::Text => {}
        Emit::Csv => {
            writeln!(writer, "{CSV_HEADER}").context("failed to write report")?;
            for record in &records {
                writeln!(writer, "{}", record.to_csv_row()).context("failed to write report")?;
            }
        }
        Emit::Yaml => {
            let yaml = report::to_yaml(&records).context("failed to serialize report")?;
            write!(writer, "{yaml}").context("failed to write report")?;
        }
    }
    writer.flush().context("failed to flush output")?;
    Ok(())
}

/// Writes status lines to stdout in text mode and to the log otherwise.
fn status(emit: Emit, writer: &mut impl Write, lines: &str) -> Result<()> {
    if emit == Emit::Text {
        writeln!(writer, "{lines}").context("failed to write report")?;
    } else {
        for line in lines.lines() {
            info!("{line}");
        }
    }
    Ok(())
}

/// The chunked strategy cannot pick its own worker count; when it runs as part
/// of `--strategy all` without THREADS it gets one worker per available core.
fn thread_num_for(strategy: StrategyKind, threads: Option<usize>) -> Option<usize> {
    match (strategy, threads) {
        (StrategyKind::Chunked, None) => Some(
            thread::available_parallelism()
                .map(|count| count.get())
                .unwrap_or(1),
        ),
        (_, threads) => threads,
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("graph"))
}
