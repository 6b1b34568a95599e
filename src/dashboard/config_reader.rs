use crate::dashboard::*;

use ceasa_matrix::filter::RecordFilter;
use serde::{Deserialize, Serialize};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct InputSettings {
    #[serde(rename = "filePath")]
    pub file_path: String,
    /// `xlsx` (default) or `csv`
    pub provider: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct FilterSettings {
    pub regions: Option<Vec<String>>,
    pub blocks: Option<Vec<String>>,
    pub activities: Option<Vec<String>>,
    #[serde(rename = "minScore")]
    pub min_score: Option<f64>,
    #[serde(rename = "maxScore")]
    pub max_score: Option<f64>,
}

impl FilterSettings {
    pub fn record_filter(&self) -> RecordFilter {
        let score_range = match (self.min_score, self.max_score) {
            (None, None) => None,
            (lo, hi) => Some((
                lo.unwrap_or(f64::NEG_INFINITY),
                hi.unwrap_or(f64::INFINITY),
            )),
        };
        RecordFilter {
            regions: self.regions.clone(),
            blocks: self.blocks.clone(),
            activities: self.activities.clone(),
            score_range,
        }
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct OutputSettings {
    /// A file path or `stdout`.
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
    #[serde(rename = "csvPath")]
    pub csv_path: Option<String>,
    #[serde(rename = "percentageType")]
    pub percentage_type: Option<String>,
    #[serde(rename = "percentageBlock")]
    pub percentage_block: Option<String>,
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct DashboardConfig {
    pub input: InputSettings,
    #[serde(default)]
    pub filters: FilterSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

pub fn read_config(path: &str) -> DashResult<DashboardConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> DashResult<DashboardConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: &str) -> DashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})?;
    Ok(js)
}
