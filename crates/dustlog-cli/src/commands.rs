use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use dustlog_core::export::{self, ExportFormat};
use dustlog_core::prelude::*;
use dustlog_core::stats::mean_abs;
use dustlog_core::study::{discover_runs, next_run_after, StudyResults};

use crate::args::{Cli, Commands, LogLevel};

pub fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_level);

    match cli.command {
        Commands::Parse {
            file,
            kind,
            wall_clock,
            output,
        } => parse(&file, kind, wall_clock, output.as_deref()),
        Commands::LapTime { file } => lap_time(&file),
        Commands::OffTrack { file } => off_track(&file),
        Commands::Runs { dir, prefix } => runs(&dir, &prefix),
        Commands::Analyze {
            config,
            base_dir,
            output_dir,
        } => analyze(config.as_deref(), base_dir, output_dir),
        Commands::InitConfig { path } => init_config(&path),
    }
}

fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn parse(file: &Path, kind: LogKind, wall_clock: bool, output: Option<&Path>) -> Result<()> {
    let mut schema = LogSchema::for_kind(kind);
    if wall_clock {
        schema = schema.with_timestamp(TimestampKind::Wall);
    }

    let series = Assembler::new(schema)
        .read_file(file)
        .with_context(|| format!("Failed to parse {}", file.display()))?;

    println!("{} records ({})", series.len(), kind);
    if let Some(t) = series.completion_time() {
        println!("Completion time: {:.2}s", t);
    }
    let control = series.column(Field::Control);
    if let (Some(summary), Some(abs)) = (Summary::from_values(&control), mean_abs(&control)) {
        println!("Control: mean {:.4}, mean |control| {:.4}", summary.mean, abs);
    }

    if let Some(output) = output {
        let format = output_format(output)?;
        export::write_series(output, &series, format)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("Wrote {}", output.display());
    }
    Ok(())
}

fn lap_time(file: &Path) -> Result<()> {
    let times = LapTimes::from_file(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    println!("Bot finish time:    {}", seconds_or_missing(times.bot));
    println!("Player finish time: {}", seconds_or_missing(times.player));
    if let Some(margin) = times.margin() {
        println!("Margin:             {:+.2}s", margin);
    }
    Ok(())
}

fn off_track(file: &Path) -> Result<()> {
    let summary = OffTrackSummary::from_file(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    println!("Samples: {}", summary.samples);
    for (start, end) in &summary.intervals {
        println!("  off track {:.2}s - {:.2}s ({:.2}s)", start, end, end - start);
    }
    println!("Total off-track time: {:.2}s", summary.duration);
    Ok(())
}

fn runs(dir: &Path, prefix: &str) -> Result<()> {
    let runs = discover_runs(dir, prefix)
        .with_context(|| format!("Failed to list {}", dir.display()))?;
    let next = next_run_after(&runs);

    if runs.is_empty() {
        println!("No {}N.log files in {}", prefix, dir.display());
    } else {
        let list: Vec<String> = runs.iter().map(|r| r.to_string()).collect();
        println!("Runs: {}", list.join(", "));
    }
    println!("Next run: {}", next);
    Ok(())
}

fn analyze(
    config: Option<&Path>,
    base_dir: Option<PathBuf>,
    output_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config {
        Some(path) => StudyConfig::from_file(path)
            .with_context(|| format!("Failed to load study config {}", path.display()))?,
        None => StudyConfig::default(),
    };
    if let Some(dir) = base_dir {
        config = config.with_base_dir(dir);
    }
    if let Some(dir) = output_dir {
        config = config.with_output_dir(dir);
    }

    let study = Study::new(config);
    let results = study.analyze();
    write_results(&study.config().output_dir, &results)?;

    println!(
        "Analyzed {} condition reports, {} bot runs, {} races",
        results.conditions.iter().filter(|r| !r.is_empty()).count(),
        results.bot.runs.len(),
        results.race.entries.len()
    );
    if let Some(summary) = results.bot.completion {
        println!(
            "Bot completion: mean {:.2}s, best {:.2}s, worst {:.2}s",
            summary.mean, summary.min, summary.max
        );
    }
    println!("Reports written to {}", study.config().output_dir.display());
    Ok(())
}

fn write_results(dir: &Path, results: &StudyResults) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    for report in results.conditions.iter().filter(|r| !r.is_empty()) {
        let name = format!(
            "{}_{}_{}_summary.csv",
            file_stem(&report.player),
            file_stem(&report.lag),
            file_stem(&report.condition)
        );
        export::write_rows(dir.join(name), &report.rows, ExportFormat::Csv)?;
    }

    export::write_rows(dir.join("bot_runs.csv"), &results.bot.runs, ExportFormat::Csv)?;
    export::write_rows(
        dir.join("overall_completion.csv"),
        &results.overall.rows,
        ExportFormat::Csv,
    )?;
    export::write_rows(
        dir.join("race_times.csv"),
        &results.race.entries,
        ExportFormat::Csv,
    )?;
    export::write_rows(
        dir.join("race_statistics.csv"),
        &results.race.statistics(),
        ExportFormat::Csv,
    )?;
    export::write_race_summary(dir.join("race_time_summary.txt"), &results.race)?;

    let bot_summary = serde_json::to_string_pretty(&results.bot)?;
    let path = dir.join("bot_summary.json");
    fs::write(&path, bot_summary).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{} already exists", path.display());
    }
    StudyConfig::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default study config to {}", path.display());
    Ok(())
}

fn output_format(path: &Path) -> Result<ExportFormat> {
    match ExportFormat::from_extension(path) {
        Some(format) => Ok(format),
        None => bail!(
            "Unsupported output extension for {} (expected .csv or .json)",
            path.display()
        ),
    }
}

fn seconds_or_missing(value: Option<f64>) -> String {
    value.map_or_else(|| "missing".to_string(), |t| format!("{:.2}s", t))
}

/// Report names contain spaces and dots ("0.2 Control Assistance")
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
