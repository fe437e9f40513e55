use analytics::{AtmosphericAnalyzer, AtmosphericResearchData};
use anyhow::Context;
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use configuration::{AnalysisParams, Config, SiteConfig, load_config};
use core_types::{HourlySample, Variable};
use forecaster::{PowerForecast, forecast};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the Atmos command-line tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ATMOS_* overrides may live in a .env file; it is optional.
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load configuration from {}", cli.config.display()))?;

    // Execute the appropriate command
    match cli.command {
        Commands::Forecast(args) => handle_forecast(args, &cli.config, &config),
        Commands::Analyze(args) => handle_analyze(args, &cli.config, &config),
        Commands::Batch => handle_batch(&cli.config, config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Renewable power forecasts and atmospheric research reports from hourly weather.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Forecast the power output of one configured site.
    Forecast(ForecastArgs),
    /// Produce the atmospheric research report for one configured site.
    Analyze(AnalyzeArgs),
    /// Analyze and forecast every configured site concurrently.
    Batch,
}

#[derive(Parser)]
struct SiteArgs {
    /// The label of the site in the configuration file.
    #[arg(long)]
    site: String,

    /// Read the weather series from this JSON file instead of the site's `series_path`.
    #[arg(long)]
    series: Option<PathBuf>,
}

#[derive(Parser)]
struct ForecastArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Print every hour, not just the summary.
    #[arg(long)]
    hourly: bool,

    /// Print the forecast as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct AnalyzeArgs {
    #[command(flatten)]
    site: SiteArgs,

    /// Variables entering the correlation matrix (e.g. "temperature,pressure").
    #[arg(long, value_enum, value_delimiter = ',')]
    variables: Vec<Variable>,

    /// Overrides the anomaly threshold, in standard deviations.
    #[arg(long)]
    threshold: Option<f64>,

    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn handle_forecast(args: ForecastArgs, config_path: &Path, config: &Config) -> anyhow::Result<()> {
    let (site, series) = load_site(config_path, config, &args.site)?;
    let result = forecast(&site.asset, &series)
        .with_context(|| format!("forecast failed for site '{}'", site.label))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_forecast(&site.label, &result, args.hourly);
    }
    Ok(())
}

fn handle_analyze(args: AnalyzeArgs, config_path: &Path, config: &Config) -> anyhow::Result<()> {
    let (site, series) = load_site(config_path, config, &args.site)?;

    let mut params = config.analysis.clone();
    if !args.variables.is_empty() {
        params.correlation_variables = args.variables;
    }
    if let Some(threshold) = args.threshold {
        params.anomaly_threshold_sigma = threshold;
    }

    let report = AtmosphericAnalyzer::new(params)?.analyze(&site.label, &series);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

/// Runs every site on the blocking pool. A failing site is reported and does
/// not stop the others.
async fn handle_batch(config_path: &Path, config: Config) -> anyhow::Result<()> {
    if config.sites.is_empty() {
        anyhow::bail!("no sites configured in {}", config_path.display());
    }

    let progress_bar = ProgressBar::new(config.sites.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")?
            .progress_chars("#>-"),
    );

    let tasks: Vec<_> = config
        .sites
        .iter()
        .cloned()
        .map(|site| {
            let params = config.analysis.clone();
            let path = series_path(config_path, &site);
            let pb_clone = progress_bar.clone();

            tokio::task::spawn_blocking(move || {
                pb_clone.set_message(format!("Processing {}...", site.label));
                let outcome = run_site(&site, &path, params);
                pb_clone.inc(1);
                outcome.map(|(report, power)| (site.label, report, power))
            })
        })
        .collect();

    // Wait for all sites to complete
    let results = join_all(tasks).await;
    progress_bar.finish_with_message("Batch complete!");

    let mut table = new_table(vec![
        "Site", "Samples", "Quality", "Anomalies", "Energy", "Peak", "Mean CF %",
    ]);
    let mut failures = 0;
    for result in results {
        match result {
            Ok(Ok((label, report, power))) => {
                let summary = power.summary();
                let anomalies = report.anomalies.as_ref().map_or(0, Vec::len);
                table.add_row(vec![
                    label,
                    report.sample_count.to_string(),
                    format!("{:.1}", report.quality.quality_score),
                    anomalies.to_string(),
                    format!("{:.2} {}", summary.total_energy, power.unit.energy_symbol()),
                    format!("{:.2} {}", summary.peak_power, power.unit.symbol()),
                    format!("{:.1}", summary.mean_capacity_percent),
                ]);
            }
            Ok(Err(e)) => {
                failures += 1;
                eprintln!("A site failed: {:#}", e);
            }
            Err(e) => {
                failures += 1;
                eprintln!("A task panicked: {}", e);
            }
        }
    }
    println!("{table}");

    if failures > 0 {
        tracing::warn!(failures, "batch finished with failed sites");
    }
    Ok(())
}

fn run_site(
    site: &SiteConfig,
    path: &Path,
    params: AnalysisParams,
) -> anyhow::Result<(AtmosphericResearchData, PowerForecast)> {
    let series = read_series(path)?;
    let report = AtmosphericAnalyzer::new(params)?.analyze(&site.label, &series);
    let power = forecast(&site.asset, &series)
        .with_context(|| format!("forecast failed for site '{}'", site.label))?;
    Ok((report, power))
}

// ==============================================================================
// Input
// ==============================================================================

fn load_site<'a>(
    config_path: &Path,
    config: &'a Config,
    args: &SiteArgs,
) -> anyhow::Result<(&'a SiteConfig, Vec<HourlySample>)> {
    let site = config
        .site(&args.site)
        .with_context(|| format!("site '{}' is not configured", args.site))?;
    let path = match &args.series {
        Some(path) => path.clone(),
        None => series_path(config_path, site),
    };
    Ok((site, read_series(&path)?))
}

/// Relative series paths are resolved against the configuration file's directory.
fn series_path(config_path: &Path, site: &SiteConfig) -> PathBuf {
    match config_path.parent() {
        Some(dir) => dir.join(&site.series_path),
        None => site.series_path.clone(),
    }
}

/// Reads a JSON array of hourly samples.
fn read_series(path: &Path) -> anyhow::Result<Vec<HourlySample>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read weather series {}", path.display()))?;
    let series: Vec<HourlySample> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse weather series {}", path.display()))?;
    tracing::info!(path = %path.display(), samples = series.len(), "weather series loaded");
    Ok(series)
}

// ==============================================================================
// Output
// ==============================================================================

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn print_forecast(label: &str, result: &PowerForecast, hourly: bool) {
    let summary = result.summary();
    let unit = result.unit.symbol();

    println!(
        "{} forecast for {} ({:.2} {} rated)",
        result.asset_kind, label, result.rated_capacity, unit
    );
    if hourly {
        let mut table = new_table(vec!["Hour", "Power", "Capacity %"]);
        for sample in &result.samples {
            table.add_row(vec![
                sample.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                format!("{:.3} {}", sample.power, unit),
                format!("{:.1}", sample.capacity_percent),
            ]);
        }
        println!("{table}");
    }

    let peak_at = summary
        .peak_at
        .map_or_else(|| "-".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());
    let mut table = new_table(vec!["Metric", "Value"]);
    table.add_row(vec![
        "Total energy".to_string(),
        format!("{:.2} {}", summary.total_energy, result.unit.energy_symbol()),
    ]);
    table.add_row(vec!["Peak power".to_string(), format!("{:.3} {}", summary.peak_power, unit)]);
    table.add_row(vec!["Peak at".to_string(), peak_at]);
    table.add_row(vec![
        "Mean capacity factor".to_string(),
        format!("{:.1} %", summary.mean_capacity_percent),
    ]);
    table.add_row(vec!["Productive hours".to_string(), summary.productive_hours.to_string()]);
    table.add_row(vec!["Hours without driver".to_string(), summary.driver_gaps.to_string()]);
    println!("{table}");
}

fn print_report(report: &AtmosphericResearchData) {
    let period = match (report.period_start, report.period_end) {
        (Some(start), Some(end)) => format!("{} to {}", start.format("%Y-%m-%d %H:%M"), end.format("%Y-%m-%d %H:%M")),
        _ => "no data".to_string(),
    };
    println!("{}: {} samples, {}", report.label, report.sample_count, period);

    let mut stats = new_table(vec![
        "Variable", "Mean", "Median", "Std dev", "Min", "Max", "P25", "P75", "P95", "Count", "Missing",
    ]);
    for variable in report.observed_variables() {
        let s = &report.statistics[&variable];
        stats.add_row(vec![
            format!("{} ({})", variable, variable.unit()),
            format!("{:.2}", s.mean),
            format!("{:.2}", s.median),
            format!("{:.2}", s.std_dev),
            format!("{:.2}", s.min),
            format!("{:.2}", s.max),
            format!("{:.2}", s.p25),
            format!("{:.2}", s.p75),
            format!("{:.2}", s.p95),
            s.count.to_string(),
            s.missing_count.to_string(),
        ]);
    }
    println!("{stats}");

    if let Some(matrix) = &report.correlations {
        if !matrix.variables.is_empty() {
            let mut header = vec!["r".to_string()];
            header.extend(matrix.variables.iter().map(|v| v.to_string()));
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(header);
            for (variable, row) in matrix.variables.iter().zip(&matrix.coefficients) {
                let mut cells = vec![variable.to_string()];
                cells.extend(row.iter().map(|r| format!("{:+.2}", r)));
                table.add_row(cells);
            }
            println!("{table}");
        }
    }

    if let Some(trends) = &report.trends {
        let mut table = new_table(vec!["Variable", "Slope / h", "R²", "p", "Trend", "Confidence %"]);
        for trend in trends {
            table.add_row(vec![
                trend.variable.to_string(),
                format!("{:+.4}", trend.slope),
                format!("{:.3}", trend.r_squared),
                format!("{:.4}", trend.p_value),
                format!("{:?}", trend.classification),
                format!("{:.1}", trend.confidence),
            ]);
        }
        println!("{table}");
    }

    if let Some(anomalies) = &report.anomalies {
        if anomalies.is_empty() {
            println!("No anomalies detected.");
        } else {
            let mut table = new_table(vec!["Time", "Variable", "Observed", "Expected", "σ", "Severity"]);
            for anomaly in anomalies {
                table.add_row(vec![
                    anomaly.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                    anomaly.variable.to_string(),
                    format!("{:.2}", anomaly.observed),
                    format!("{:.2}", anomaly.expected),
                    format!("{:.2}", anomaly.deviation_sigma),
                    format!("{:?}", anomaly.severity),
                ]);
            }
            println!("{table}");
        }
    }

    let quality = &report.quality;
    println!(
        "Quality score {:.1} / 100: {} of {} samples complete ({:.1}% missing), {} out-of-range readings",
        quality.quality_score,
        quality.complete_samples,
        quality.total_samples,
        quality.missing_percent,
        quality.outlier_count
    );
    for suspicious in &quality.suspicious_values {
        println!(
            "  {} {} = {:.2} (expected {} to {})",
            suspicious.timestamp.format("%Y-%m-%d %H:%M"),
            suspicious.variable,
            suspicious.value,
            suspicious.expected_min,
            suspicious.expected_max
        );
    }
}
