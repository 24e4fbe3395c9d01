use crate::config::AnalysisConfiguration;
use crate::report::tables::{CapmTable, StatsTable};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

//creates the export folder for this run, next to the working directory
//unless the configuration overrides it
pub fn ensure_output_dir(config: &AnalysisConfiguration) -> Result<PathBuf> {
    let dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(config.folder_name()));

    fs::create_dir_all(&dir).context(format!("Failed to create output folder {:?}", dir))?;
    Ok(dir)
}

//writes the descriptive statistics record to csv
pub fn write_stats_csv(table: &StatsTable, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).context(format!("Failed to create {:?}", path))?;

    writer.write_record([
        "Statistic",
        table.asset_label.as_str(),
        table.market_label.as_str(),
    ])?;

    for (name, asset, market) in table.rows() {
        writer.write_record([name.to_string(), csv_value(asset), csv_value(market)])?;
    }

    writer.flush()?;
    Ok(())
}

//writes the CAPM regression record to csv
pub fn write_capm_csv(table: &CapmTable, path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).context(format!("Failed to create {:?}", path))?;

    writer.write_record(["Coefficient", "Estimate", "p-value"])?;

    for (name, estimate, p_value) in table.rows() {
        writer.write_record([name.to_string(), csv_value(estimate), csv_value(p_value)])?;
    }

    writer.flush()?;
    Ok(())
}

//exported values keep full round-trip precision, undefined cells stay empty
fn csv_value(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
