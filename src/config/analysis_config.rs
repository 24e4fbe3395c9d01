use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

//complete configuration for one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfiguration {
    //tickers, uppercased before they reach the pipeline
    pub stock: String,
    pub market: String,

    //date range, start inclusive and end exclusive
    pub start: NaiveDate,
    pub end: NaiveDate,

    //optional override for the export folder
    pub output_dir: Option<PathBuf>,
}

impl AnalysisConfiguration {
    //default export folder name, derived from the run parameters
    pub fn folder_name(&self) -> String {
        format!(
            "{}_VS_{}_from_{}_to_{}",
            self.stock, self.market, self.start, self.end
        )
    }

    //load configuration from a JSON file
    pub fn from_json_file(path: &PathBuf) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AnalysisConfiguration = serde_json::from_str(&contents)?;
        Ok(config)
    }

    //save configuration to a JSON file
    pub fn to_json_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
