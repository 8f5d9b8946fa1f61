//! Convolve every MODTRAN case under the configured base directory with the
//! configured sensor SRFs and write the results table.

use anyhow::{Context, Result};
use env_logger::Env;

use srf_crosscal::batch::{load_sensor_curves, run_batch, write_results};
use srf_crosscal::config::RunConfig;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = RunConfig::default();

    let curves = load_sensor_curves(&config.sensors).context("loading sensor SRFs")?;

    let table = run_batch(&config.base_dir, &curves)
        .with_context(|| format!("scanning {}", config.base_dir.display()))?;

    write_results(&config.output_csv, &table)
        .with_context(|| format!("writing {}", config.output_csv.display()))?;

    let complete = table
        .rows
        .iter()
        .filter(|row| row.radiances.iter().all(|(_, v)| v.is_some()))
        .count();
    println!(
        "Wrote {} cases ({complete} with every band) to {}",
        table.len(),
        config.output_csv.display()
    );
    Ok(())
}
