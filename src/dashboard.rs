use log::{debug, info, warn};

use ceasa_matrix::filter::{
    score_bounds, unique_activities, unique_blocks, unique_regions, RecordFilter,
};
use ceasa_matrix::views::{
    export_rows, is_matrix_wide, percentage_distribution, percentage_types, radar_profile,
    RadarPoint,
};
use ceasa_matrix::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use calamine::{open_workbook, Reader, Xlsx};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::dashboard::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum DashError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Worksheet {name} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("The workbook {path} has no worksheet"))]
    EmptyWorkbook { path: String },
    #[snafu(display("The spreadsheet does not have its two header rows"))]
    MissingHeader {},
    #[snafu(display("Error opening csv file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading csv line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing csv file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error reading {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON: {source}"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("{source}"))]
    Matrix { source: MatrixError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type DashResult<T> = Result<T, DashError>;

/// The settings of one run, after merging the configuration file and the command line.
#[derive(PartialEq, Debug, Clone)]
struct RunSettings {
    input_path: String,
    provider: String,
    worksheet_name: Option<String>,
    filter: RecordFilter,
    summary_path: Option<String>,
    csv_path: Option<String>,
    reference_path: Option<String>,
    percentage_type: Option<String>,
    percentage_block: Option<String>,
}

fn non_empty(v: &[String]) -> Option<Vec<String>> {
    if v.is_empty() {
        None
    } else {
        Some(v.to_vec())
    }
}

fn resolve_settings(args: &Args) -> DashResult<RunSettings> {
    let (config, root) = match &args.config {
        Some(config_path) => {
            let c = read_config(config_path)?;
            info!("config: {:?}", c);
            let root = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu {})?
                .to_path_buf();
            (c, Some(root))
        }
        None => (DashboardConfig::default(), None),
    };

    let input_path = match (&args.input, root) {
        (Some(p), _) => p.clone(),
        (None, Some(root)) if !config.input.file_path.is_empty() => {
            let p: PathBuf = root.join(&config.input.file_path);
            p.display().to_string()
        }
        _ => whatever!("No input file provided: use --input or a configuration file"),
    };

    let file_filter = config.filters.record_filter();
    let score_range = match (args.min_score, args.max_score, file_filter.score_range) {
        (None, None, r) => r,
        (lo, hi, r) => {
            let (flo, fhi) = r.unwrap_or((f64::NEG_INFINITY, f64::INFINITY));
            Some((lo.unwrap_or(flo), hi.unwrap_or(fhi)))
        }
    };
    let filter = RecordFilter {
        regions: non_empty(&args.region).or(file_filter.regions),
        blocks: non_empty(&args.block).or(file_filter.blocks),
        activities: non_empty(&args.activity).or(file_filter.activities),
        score_range,
    };

    Ok(RunSettings {
        input_path,
        provider: args
            .input_type
            .clone()
            .or(config.input.provider)
            .unwrap_or_else(|| "xlsx".to_string()),
        worksheet_name: args
            .excel_worksheet_name
            .clone()
            .or(config.input.excel_worksheet_name),
        filter,
        summary_path: args.out.clone().or(config.output.summary_path),
        csv_path: args.csv_out.clone().or(config.output.csv_path),
        reference_path: args.reference.clone(),
        percentage_type: args
            .percentage_type
            .clone()
            .or(config.output.percentage_type),
        percentage_block: args
            .percentage_block
            .clone()
            .or(config.output.percentage_block),
    })
}

fn read_matrix(settings: &RunSettings) -> DashResult<RawTable> {
    info!(
        "Attempting to read the matrix {:?} as {:?}",
        settings.input_path, settings.provider
    );
    match settings.provider.as_str() {
        "xlsx" => io_xlsx::read_matrix_xlsx(
            &settings.input_path,
            settings.worksheet_name.as_deref(),
        ),
        "csv" => io_csv::read_matrix_csv_file(&settings.input_path),
        x => whatever!("Input type not supported: {:?}", x),
    }
}

fn record_to_json(r: &ScoreRecord) -> JSValue {
    json!({
        "region": r.region,
        "block": r.block_id,
        "title": r.block_title,
        "blockScore": r.block_score,
        "blockPercentage": r.block_percentage,
        "activities": r.activities,
        "activityScores": r.activity_scores,
    })
}

fn highlights_to_json(highlights: &Highlights, block_order: &[String]) -> Vec<JSValue> {
    highlights
        .ordered(block_order)
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            json!({
                "position": idx + 1,
                "block": e.block_id,
                "max": {"region": e.max.0, "score": e.max.1},
                "min": {"region": e.min.0, "score": e.min.1},
            })
        })
        .collect()
}

fn radar_to_json(points: &[RadarPoint]) -> Vec<JSValue> {
    points
        .iter()
        .map(|p| json!({"region": p.region, "block": p.block_id, "percent": p.percent}))
        .collect()
}

/// Builds the summary of the dashboard for one table.
fn build_summary_js(table: &RawTable, settings: &RunSettings) -> DashResult<(JSValue, Vec<ScoreRecord>)> {
    let extraction = extract(table).context(MatrixSnafu {})?;
    for w in extraction.warnings.iter() {
        debug!("build_summary_js: skipped pair: {}", w);
    }
    let records = extraction.records;

    // The highlights always cover all the records, whatever the filters.
    let highlights = compute_highlights(&records);
    let filtered = settings.filter.apply(&records);
    info!(
        "{} records, {} after filtering, {} highlights",
        records.len(),
        filtered.len(),
        highlights.len()
    );

    let block_order = settings
        .filter
        .blocks
        .clone()
        .unwrap_or_else(|| unique_blocks(&records));
    let highlights_js = if filtered.is_empty() {
        Vec::new()
    } else {
        highlights_to_json(&highlights, &block_order)
    };

    let percentages_js = match &settings.percentage_type {
        Some(ptype) => {
            let block = if is_matrix_wide(ptype) {
                None
            } else {
                settings.percentage_block.as_deref()
            };
            let dist = percentage_distribution(table, ptype, block).context(MatrixSnafu {})?;
            if dist.is_empty() {
                warn!("No percentage data available for {:?}", ptype);
            }
            let values: Vec<JSValue> = dist
                .iter()
                .map(|(region, v)| json!({"region": region, "value": v}))
                .collect();
            json!({"type": ptype, "block": block, "values": values})
        }
        None => JSValue::Null,
    };

    let warnings_js: Vec<JSValue> = extraction
        .warnings
        .iter()
        .map(|w| json!({"region": w.region, "block": w.block_id, "message": w.error.to_string()}))
        .collect();

    // The choices offered by the filters, from the unfiltered records.
    let filter_options_js = json!({
        "regions": unique_regions(&records),
        "blocks": unique_blocks(&records),
        "activities": unique_activities(&records),
        "scoreRange": score_bounds(&records).map(|(lo, hi)| vec![lo, hi]),
    });

    let js = json!({
        "records": records.iter().map(record_to_json).collect::<Vec<JSValue>>(),
        "filtered": filtered.iter().map(record_to_json).collect::<Vec<JSValue>>(),
        "highlights": highlights_js,
        "filterOptions": filter_options_js,
        "radar": radar_to_json(&radar_profile(table, &filtered)),
        "percentageTypes": percentage_types(table),
        "percentages": percentages_js,
        "warnings": warnings_js,
    });
    Ok((js, filtered))
}

fn write_summary(pretty_js: &str, summary_path: Option<&str>) -> DashResult<()> {
    match summary_path {
        None | Some("stdout") | Some("") => {
            println!("{}", pretty_js);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

fn check_reference(pretty_js_stats: &str, reference_path: &str) -> DashResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

pub fn run_dashboard(args: &Args) -> DashResult<()> {
    let settings = resolve_settings(args)?;
    debug!("run_dashboard: settings: {:?}", settings);

    let table = read_matrix(&settings)?;
    let (summary_js, filtered) = build_summary_js(&table, &settings)?;
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    write_summary(&pretty_js, settings.summary_path.as_deref())?;

    if let Some(csv_path) = &settings.csv_path {
        info!("Writing filtered table to {:?}", csv_path);
        io_csv::write_export_csv_file(csv_path, &export_rows(&table, &filtered))?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &settings.reference_path {
        check_reference(&pretty_js, reference_path)?;
    }
    Ok(())
}
