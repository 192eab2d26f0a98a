//! schedchart CLI - Schedule chart layout engine
//!
//! Command-line interface for checking chart documents and rendering them
//! as text, SVG or laid out JSON.

mod input;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use schedchart_core::{remove_malformed_activities, Renderer, ScheduleChart};
use schedchart_render::{SvgRenderer, TextRenderer};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::input::ChartDocument;

#[derive(Parser)]
#[command(name = "schedchart")]
#[command(author, version, about = "Schedule chart layout engine", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a chart document
    Check {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Lay out and render a chart document
    Render {
        /// Input file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Current date (YYYY-MM-DD), defaults to today
        #[arg(long, env = "SCHEDCHART_TODAY")]
        today: Option<NaiveDate>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Svg,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Check { file } => cmd_check(&file),
        Commands::Render {
            file,
            format,
            today,
            output,
        } => cmd_render(&file, format, today, output.as_deref()),
    }
}

/// Log to stderr; `RUST_LOG` overrides the verbosity flag
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn cmd_check(file: &Path) -> Result<()> {
    let document = ChartDocument::load(file)?;
    let settings = &document.settings;
    settings.validate().context("Invalid settings")?;
    let activities = document.activities()?;

    let sanitized = remove_malformed_activities(&activities);
    let kept_tasks: usize = sanitized.iter().map(|a| a.tasks.len()).sum();

    println!("Checking: {}", file.display());
    println!("  Statuses:   {}", settings.statuses.len());
    println!(
        "  Activities: {} ({} dropped)",
        sanitized.len(),
        activities.len() - sanitized.len()
    );
    println!(
        "  Tasks:      {} ({} dropped)",
        kept_tasks,
        document.task_count() - kept_tasks
    );

    match settings.calculator().calculate(&sanitized, Local::now().date_naive()) {
        Ok(timeline) => println!(
            "  Timeline:   {} to {} ({} {} columns)",
            timeline.start_date,
            timeline.end_date,
            timeline.column_count(),
            timeline.granularity
        ),
        Err(e) => println!("  Timeline:   {}", e),
    }

    Ok(())
}

fn cmd_render(file: &Path, format: OutputFormat, today: Option<NaiveDate>, output: Option<&Path>) -> Result<()> {
    let document = ChartDocument::load(file)?;
    let configuration = document.settings.configuration().context("Invalid settings")?;
    let activities = document.activities()?;
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let chart = ScheduleChart::build(&activities, &configuration, &document.settings.calculator(), today);
    info!(
        rows = chart.rows.len(),
        spans = chart.span_count(),
        columns = chart.column_count(),
        "laid out chart"
    );

    let rendered = match format {
        OutputFormat::Text => TextRenderer::new().render(&chart, &configuration)?,
        OutputFormat::Svg => SvgRenderer::default().render(&chart, &configuration)?,
        OutputFormat::Json => serde_json::to_string_pretty(&chart)? + "\n",
    };

    match output {
        Some(path) => {
            std::fs::write(path, &rendered).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(())
}
