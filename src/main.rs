mod args;
mod config;
mod reader;
mod result;
mod runner;
mod scenario;
mod writer;

use result::Result;
use runner::{ReportRow, ScenarioRunner};
use scenario::ScenarioRow;

use txe::EngineConfig;

use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result {
    let args = args::parse_input_args()?;
    config::configure_app(args.verbose)?;

    log::debug!("Application configured with {args:?}. Beginning scenario...");

    let reports = run_scenario(args.input).await?;

    log::debug!("Scenario complete. Beginning report...");

    report_to_std_out(&reports)?;

    log::debug!("Application finished successfully!");

    return Ok(());
}

/// Read the scenario file and replay every row against the engine
async fn run_scenario(input_path: PathBuf) -> Result<Vec<ReportRow>> {
    let mut rdr = reader::build_scenario_reader(input_path)?;
    let mut runner = ScenarioRunner::new(EngineConfig::from_env());
    let mut reports = vec![];

    log::debug!("Deserializing reader...");
    for record in rdr.deserialize::<ScenarioRow>() {
        log::debug!("Parsing record into ScenarioRow: {record:?}");
        let row = match record {
            Ok(row) => row,
            Err(e) => {
                log::warn!("{e}");
                continue;
            }
        };

        match runner.apply(row).await {
            Ok(Some(report)) => {
                log::debug!("Send finished: {report:?}");
                reports.push(report);
            }
            Ok(None) => {}
            Err(e) => log::warn!("{e}"),
        }
    }

    return Ok(reports);
}

/// Write one line per send row to stdout
fn report_to_std_out(reports: &[ReportRow]) -> Result {
    log::debug!("Serializing {} reports...", reports.len());
    let output = writer::write_report(reports)?;

    log::debug!("Writing to stdout: {output:?}");
    print!("{output}");

    return Ok(());
}
