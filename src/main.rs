//! Energy Anomaly Detector - Command Line Entry Point
//!
//! `analyze` runs the full pipeline over one meter column and persists the
//! explained table; `reprice` recomputes costs of a saved table at a new
//! rate without re-running detection.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use energy_anomaly::constants::{self, APP_NAME, APP_VERSION};
use energy_anomaly::logic::cause::ActionPlaybook;
use energy_anomaly::logic::config::ReportConfig;
use energy_anomaly::logic::dataset;
use energy_anomaly::logic::report::Report;
use energy_anomaly::logic::{Pipeline, PipelineConfig};

#[derive(Parser)]
#[command(name = "energy-anomaly")]
#[command(about = "Detect, explain and cost anomalies in hourly energy data", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the anomaly pipeline over one meter column
    Analyze {
        /// Input CSV with a timestamp column and one column per meter
        #[arg(short, long)]
        input: PathBuf,

        /// Meter column to analyze (default: ENERGY_COLUMN or Panther_office_Hannah)
        #[arg(short, long)]
        column: Option<String>,

        /// Output CSV for the explained table
        #[arg(short, long)]
        output: PathBuf,

        /// Optional JSON run summary
        #[arg(short, long)]
        summary: Option<PathBuf>,

        /// Electricity rate per kWh
        #[arg(short, long)]
        rate: Option<f64>,

        /// Expected fraction of anomalous hours
        #[arg(long)]
        contamination: Option<f64>,

        /// Seed for the outlier model
        #[arg(long)]
        seed: Option<u64>,

        /// Severity window in hours (also its minimum periods)
        #[arg(long)]
        short_window: Option<usize>,

        /// Billing baseline window in hours
        #[arg(long)]
        long_window: Option<usize>,

        /// Rows in the top anomalies view
        #[arg(short, long)]
        top: Option<usize>,

        /// JSON playbook of recommended actions per cause
        #[arg(short, long)]
        actions: Option<PathBuf>,
    },

    /// Recompute costs of an explained table at another rate
    Reprice {
        /// Explained CSV written by `analyze`
        #[arg(short, long)]
        input: PathBuf,

        /// New electricity rate per kWh
        #[arg(short, long)]
        rate: f64,

        /// Write the repriced table here (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    log::info!("{} v{}", APP_NAME, APP_VERSION);

    match Cli::parse().command {
        Commands::Analyze {
            input,
            column,
            output,
            summary,
            rate,
            contamination,
            seed,
            short_window,
            long_window,
            top,
            actions,
        } => {
            let mut config = PipelineConfig::from_env();
            if let Some(rate) = rate {
                config.cost.rate = rate;
            }
            if let Some(contamination) = contamination {
                config.detector.contamination = contamination;
            }
            if let Some(seed) = seed {
                config.detector.seed = seed;
            }
            if let Some(window) = short_window {
                config.features.short_window = window;
                config.features.short_min_periods = window;
            }
            if let Some(window) = long_window {
                config.cost.long_window = window;
                config.cost.long_min_periods = config.cost.long_min_periods.min(window);
            }
            if let Some(top) = top {
                config.report.top_n = top;
            }

            let column = column.unwrap_or_else(constants::get_energy_column);
            analyze(&input, &column, &output, summary.as_deref(), actions.as_deref(), config)
        }
        Commands::Reprice { input, rate, output } => reprice(&input, rate, output.as_deref()),
    }
}

fn analyze(
    input: &Path,
    column: &str,
    output: &Path,
    summary: Option<&Path>,
    actions: Option<&Path>,
    config: PipelineConfig,
) -> Result<()> {
    let playbook = match actions {
        Some(path) => ActionPlaybook::from_json_file(path)
            .with_context(|| format!("Failed to load action playbook {}", path.display()))?,
        None => ActionPlaybook::standard(),
    };

    let readings = dataset::load_readings(input, column)
        .with_context(|| format!("Failed to load {:?} from {}", column, input.display()))?;

    let pipeline = Pipeline::new(config, playbook)?;
    let result = pipeline.run(&readings)?;

    // Persist only once every stage has succeeded
    dataset::write_table(output, &result.report.records)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    if let Some(path) = summary {
        dataset::write_summary(path, &result.summary())
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    print_report(&result.report);
    Ok(())
}

fn reprice(input: &Path, rate: f64, output: Option<&Path>) -> Result<()> {
    let records = dataset::read_table(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let report = Report::new(records, constants::get_rate(), ReportConfig::default()).reprice(rate)?;

    if let Some(path) = output {
        dataset::write_table(path, &report.records)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &Report) {
    let kpis = report.kpis();
    println!();
    println!("Anomalous hours        {}", kpis.total_anomalies);
    println!("Excess energy (kWh)    {:.2}", kpis.total_excess_kwh);
    println!("Estimated cost         {:.2}  (rate {})", kpis.total_cost, report.rate);
    println!("Avg cost / anomaly     {:.2}", kpis.avg_cost_per_anomaly);

    let impacts = report.impact_by_cause();
    if !impacts.is_empty() {
        println!();
        println!("{:<60} {:>6} {:>12} {:>10}", "Cause", "Hours", "Excess kWh", "Cost");
        for impact in impacts {
            println!(
                "{:<60} {:>6} {:>12.2} {:>10.2}",
                impact.cause.label(),
                impact.count,
                impact.excess_energy,
                impact.excess_cost
            );
        }
    }

    let top = report.top_n(5);
    if !top.is_empty() {
        println!();
        println!("Top anomalies by severity");
        for record in top {
            println!(
                "  {}  {:>8.2} kW  z={:>6.2}  {:<6}  {}",
                record.timestamp.format(energy_anomaly::logic::report::TIMESTAMP_FORMAT),
                record.energy,
                record.z_score,
                record.priority.as_str(),
                record.cause.map(|c| c.label()).unwrap_or("")
            );
        }
    }
}
