//! Queries used by the charts and the exported table.
//!
//! Unlike the extraction, these read the raw table directly, for the columns
//! that the score records do not carry.

use std::collections::HashMap;

use log::debug;

use crate::extract::ScoreRecord;
use crate::filter::descending_score;
use crate::table::{Cell, ColumnKey, MatrixError, RawTable, GENERAL_GROUP};

pub const MAX_SCORE_METRIC: &str = "Pontuação Maxima por Bloco";
pub const BLOCK_TOTAL_PERCENT: &str = "% em relação ao Total do Bloco";
pub const MATRIX_TOTAL_PERCENT: &str = "% em relação a Matriz Total";

// The sheet labels this type after the first block, although it applies to all of them.
const FIRST_BLOCK_PERCENT: &str = "% em relação ao Bloco 1";
const BLOCK_PERCENT: &str = "% em relação ao Bloco";

#[derive(PartialEq, Debug, Clone)]
pub struct RadarPoint {
    pub region: String,
    pub block_id: String,
    /// Score as a percentage of the maximum score of the block.
    pub percent: f64,
}

/// Maximum score per block, as declared in the general columns of the sheet.
/// `None` if the sheet does not have them.
pub fn declared_maximums(table: &RawTable) -> Option<HashMap<String, f64>> {
    let block_col = table.column_index(&ColumnKey::grouped(GENERAL_GROUP, "Bloco"))?;
    let max_col = table.column_index(&ColumnKey::grouped(GENERAL_GROUP, MAX_SCORE_METRIC))?;
    let mut res: HashMap<String, f64> = HashMap::new();
    for (block, max) in table.column_cells(block_col).zip(table.column_cells(max_col)) {
        if let (Some(b), Some(m)) = (block.as_text(), max.as_f64()) {
            res.insert(b, m);
        }
    }
    Some(res)
}

/// The profile of each record as a percentage of the maximum of its block.
///
/// Without declared maximums, the best score among the records stands in for the maximum.
pub fn radar_profile(table: &RawTable, records: &[ScoreRecord]) -> Vec<RadarPoint> {
    let maximums = declared_maximums(table).unwrap_or_else(|| {
        let mut m: HashMap<String, f64> = HashMap::new();
        for r in records.iter().filter(|r| !r.block_score.is_nan()) {
            let e = m.entry(r.block_id.clone()).or_insert(r.block_score);
            if r.block_score > *e {
                *e = r.block_score;
            }
        }
        m
    });
    debug!("radar_profile: maximums: {:?}", maximums);
    records
        .iter()
        .map(|r| {
            let percent = match maximums.get(&r.block_id) {
                Some(m) if *m > 0.0 => r.block_score / m * 100.0,
                _ => 0.0,
            };
            RadarPoint {
                region: r.region.clone(),
                block_id: r.block_id.clone(),
                percent,
            }
        })
        .collect()
}

/// The kinds of percentage columns present in the sheet, sorted.
pub fn percentage_types(table: &RawTable) -> Vec<String> {
    let mut res: Vec<String> = table
        .columns()
        .iter()
        .filter(|k| k.group().is_some() && k.metric().contains('%'))
        .map(|k| {
            if same_label(k.metric(), FIRST_BLOCK_PERCENT) {
                BLOCK_PERCENT.to_string()
            } else {
                k.metric().to_string()
            }
        })
        .collect();
    res.sort();
    res.dedup();
    res
}

/// True for the percentage types that cover the whole matrix rather than one block.
pub fn is_matrix_wide(percentage_type: &str) -> bool {
    percentage_type == MATRIX_TOTAL_PERCENT || percentage_type == BLOCK_TOTAL_PERCENT
}

/// Value of one percentage type for every region, highest first.
///
/// Matrix-wide types are averaged over all the rows. The other ones are read
/// on the first row of the given block, or of the first block of the sheet.
pub fn percentage_distribution(
    table: &RawTable,
    percentage_type: &str,
    block_id: Option<&str>,
) -> Result<Vec<(String, f64)>, MatrixError> {
    let label = if percentage_type == BLOCK_PERCENT {
        FIRST_BLOCK_PERCENT
    } else {
        percentage_type
    };
    let cols: Vec<(usize, &str)> = table
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(idx, k)| match k.group() {
            Some(g) if same_label(k.metric(), label) => Some((idx, g)),
            _ => None,
        })
        .collect();
    debug!(
        "percentage_distribution: type: {:?} columns: {:?}",
        percentage_type, cols
    );

    let mut res: Vec<(String, f64)> = Vec::new();
    if is_matrix_wide(percentage_type) {
        for (col, group) in cols {
            let values: Vec<f64> = table.column_cells(col).filter_map(Cell::as_f64).collect();
            if !values.is_empty() {
                res.push((group.to_string(), values.iter().sum::<f64>() / values.len() as f64));
            }
        }
    } else {
        let block_col = table
            .block_column()
            .ok_or_else(|| MatrixError::UnknownColumn(ColumnKey::grouped(GENERAL_GROUP, "Bloco")))?;
        let block = match block_id {
            Some(b) => Some(b.to_string()),
            None => table.column_cells(block_col).find_map(Cell::as_text),
        };
        let row = block.and_then(|b| {
            table
                .column_cells(block_col)
                .position(|c| c.as_text().as_deref() == Some(b.as_str()))
        });
        if let Some(row) = row {
            for (col, group) in cols {
                if let Some(v) = table.cell(row, col).and_then(Cell::as_f64) {
                    res.push((group.to_string(), v));
                }
            }
        }
    }
    res.sort_by(|a, b| descending_score(a.1, b.1));
    Ok(res)
}

/// One line of the exported table.
#[derive(PartialEq, Debug, Clone)]
pub struct ExportRow {
    pub region: String,
    pub block_id: String,
    pub block_title: String,
    pub activities: Vec<String>,
    pub activity_scores: Vec<f64>,
    /// Per activity, the share of the block total, when the sheet has it.
    pub block_total_percent: Vec<Option<f64>>,
}

pub fn export_rows(table: &RawTable, records: &[ScoreRecord]) -> Vec<ExportRow> {
    let block_col = table.block_column();
    let activity_col = table.activity_column();
    records
        .iter()
        .map(|r| {
            let percent_col = table.columns().iter().position(|k| {
                k.group() == Some(r.region.as_str()) && same_label(k.metric(), BLOCK_TOTAL_PERCENT)
            });
            let block_total_percent = r
                .activities
                .iter()
                .map(|a| match (block_col, activity_col, percent_col) {
                    (Some(bc), Some(ac), Some(pc)) => {
                        find_activity_row(table, bc, ac, &r.block_id, a)
                            .and_then(|row| table.cell(row, pc))
                            .and_then(Cell::as_f64)
                    }
                    _ => None,
                })
                .collect();
            ExportRow {
                region: r.region.clone(),
                block_id: r.block_id.clone(),
                block_title: r.block_title.clone(),
                activities: r.activities.clone(),
                activity_scores: r.activity_scores.clone(),
                block_total_percent,
            }
        })
        .collect()
}

fn find_activity_row(
    table: &RawTable,
    block_col: usize,
    activity_col: usize,
    block_id: &str,
    activity: &str,
) -> Option<usize> {
    (0..table.num_rows()).find(|row| {
        let b = table.cell(*row, block_col).and_then(Cell::as_text);
        let a = table.cell(*row, activity_col).and_then(Cell::as_text);
        b.as_deref() == Some(block_id) && a.as_deref() == Some(activity)
    })
}

fn same_label(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TableBuilder;

    fn text(xs: &[&str]) -> Vec<Cell> {
        xs.iter()
            .map(|s| {
                if s.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(s.to_string())
                }
            })
            .collect()
    }

    fn rec(region: &str, block_id: &str, activities: &[&str], score: f64) -> ScoreRecord {
        ScoreRecord {
            region: region.to_string(),
            block_id: block_id.to_string(),
            block_title: "".to_string(),
            block_score: score,
            block_percentage: None,
            activities: activities.iter().map(|s| s.to_string()).collect(),
            activity_scores: activities.iter().map(|_| 1.0).collect(),
        }
    }

    // Three rows: BLOCO 1 has two activities, BLOCO 2 one. The block column is already filled.
    fn sheet() -> RawTable {
        TableBuilder::new()
            .column(
                ColumnKey::grouped(GENERAL_GROUP, "Bloco"),
                &text(&["BLOCO 1", "BLOCO 1", "BLOCO 2"]),
            )
            .column(
                ColumnKey::grouped(GENERAL_GROUP, "Atividade"),
                &text(&["Articulação", "Triagem e Logística", "Estrutura"]),
            )
            .column(
                ColumnKey::grouped(GENERAL_GROUP, MAX_SCORE_METRIC),
                &[Cell::Number(10.0), Cell::Empty, Cell::Number(20.0)],
            )
            .numbers(ColumnKey::grouped("Belem/PA", "% em relação ao Bloco 1"), &[0.4, 0.0, 0.9])
            .numbers(ColumnKey::grouped("Belem/PA", BLOCK_TOTAL_PERCENT), &[0.1, 0.3, 0.2])
            .numbers(ColumnKey::grouped("Curitiba/PR", "% em relação ao Bloco 1"), &[0.6, 0.0, 0.5])
            .column(
                ColumnKey::grouped("Curitiba/PR", BLOCK_TOTAL_PERCENT),
                &[Cell::Number(0.5), Cell::Empty, Cell::Number(0.1)],
            )
            .build()
    }

    #[test]
    fn radar_with_declared_maximums() {
        let pts = radar_profile(
            &sheet(),
            &[rec("Belem/PA", "BLOCO 1", &[], 5.0), rec("Belem/PA", "BLOCO 3", &[], 5.0)],
        );
        assert_eq!(pts[0].percent, 50.0);
        assert_eq!(pts[1].percent, 0.0);
    }

    #[test]
    fn radar_without_declared_maximums() {
        let t = TableBuilder::new().build();
        let pts = radar_profile(
            &t,
            &[rec("Belem/PA", "BLOCO 1", &[], 5.0), rec("GLOBAL", "BLOCO 1", &[], 20.0)],
        );
        let percents: Vec<f64> = pts.iter().map(|p| p.percent).collect();
        assert_eq!(percents, vec![25.0, 100.0]);
    }

    #[test]
    fn radar_ignores_nan_for_the_maximum() {
        let pts = radar_profile(
            &TableBuilder::new().build(),
            &[rec("Belem/PA", "BLOCO 1", &[], f64::NAN), rec("GLOBAL", "BLOCO 1", &[], 8.0)],
        );
        assert!(pts[0].percent.is_nan());
        assert_eq!(pts[1].percent, 100.0);
    }

    #[test]
    fn percentage_types_are_renamed() {
        assert_eq!(
            percentage_types(&sheet()),
            vec!["% em relação ao Bloco", BLOCK_TOTAL_PERCENT]
        );
    }

    #[test]
    fn distribution_for_one_block() {
        let d = percentage_distribution(&sheet(), "% em relação ao Bloco", Some("BLOCO 2")).unwrap();
        assert_eq!(
            d,
            vec![("Belem/PA".to_string(), 0.9), ("Curitiba/PR".to_string(), 0.5)]
        );
        let first = percentage_distribution(&sheet(), "% em relação ao Bloco", None).unwrap();
        assert_eq!(first[0], ("Curitiba/PR".to_string(), 0.6));
        let unknown = percentage_distribution(&sheet(), "% em relação ao Bloco", Some("BLOCO 9")).unwrap();
        assert!(unknown.is_empty());
    }

    #[test]
    fn distribution_over_matrix() {
        let d = percentage_distribution(&sheet(), BLOCK_TOTAL_PERCENT, None).unwrap();
        assert_eq!(d[0].0, "Curitiba/PR");
        assert!((d[0].1 - 0.3).abs() < 1e-9);
        assert!((d[1].1 - 0.2).abs() < 1e-9);
    }

    #[test]
    fn distribution_needs_block_column() {
        let t = TableBuilder::new()
            .numbers(ColumnKey::grouped("Belem/PA", "% em relação ao Bloco 1"), &[0.4])
            .build();
        assert!(matches!(
            percentage_distribution(&t, "% em relação ao Bloco", None),
            Err(MatrixError::UnknownColumn(_))
        ));
    }

    #[test]
    fn export_block_total_percent() {
        let rows = export_rows(
            &sheet(),
            &[
                rec("Curitiba/PR", "BLOCO 1", &["Articulação", "Triagem e Logística"], 3.0),
                rec("GLOBAL", "BLOCO 2", &["Estrutura"], 3.0),
            ],
        );
        assert_eq!(rows[0].block_total_percent, vec![Some(0.5), None]);
        assert_eq!(rows[1].block_total_percent, vec![None]);
    }
}
