//! CLI driving canned misuse scenarios through the tracking layer.
//!
//! ```text
//! objtrack --scenario leak --format json
//! ```

mod scenario;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use scenario::{HarnessError, Scenario, ScenarioReport};

#[derive(Debug, Parser)]
#[command(name = "objtrack", about = "Drive misuse scenarios through the object tracker")]
struct Cli {
    /// Misuse pattern to drive.
    #[arg(long, value_enum, default_value = "clean")]
    scenario: Scenario,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    format: Format,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Format {
    Text,
    Json,
}

fn print_report(report: &ScenarioReport, format: Format) -> Result<(), HarnessError> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Format::Text => {
            println!("scenario: {}", report.scenario);
            println!("errors:   {}", report.error_count);
            for diag in &report.diagnostics {
                println!(
                    "  [{:7}] {} {} ({}) {}",
                    diag.severity, diag.kind, diag.handle, diag.code, diag.message
                );
            }
            let m = &report.metrics;
            println!(
                "metrics:  validations={} violations={} creates={} destroys={} cascade_destroys={} leaks={}",
                m.validations, m.violations, m.creates, m.destroys, m.cascade_destroys, m.leaks
            );
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match scenario::run(cli.scenario).and_then(|report| {
        print_report(&report, cli.format)?;
        Ok(report)
    }) {
        Ok(report) if cli.scenario.expectation_met(&report) => ExitCode::SUCCESS,
        Ok(report) => {
            eprintln!(
                "objtrack: scenario '{}' did not produce the expected diagnostics",
                report.scenario
            );
            ExitCode::FAILURE
        }
        Err(err) => {
            eprintln!("objtrack: {err}");
            ExitCode::FAILURE
        }
    }
}
