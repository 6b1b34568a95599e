use log::{debug, info, warn};

use std::error::Error;
use std::fmt::Display;
use std::ops::Range;

use crate::catalog::{Block, SchemaCatalog};
use crate::matcher::ColumnMatcher;
use crate::table::{Cell, ColumnKey, MatrixError, RawTable};

/// The metric label of the column holding the score of the whole block.
pub const BLOCK_SCORE_METRIC: &str = "Pontuação no Bloco ";

// ******** Output data structures *********

/// The scores of one region for one block.
///
/// Invariant: `activity_scores` has the same length as `activities`.
#[derive(PartialEq, Debug, Clone)]
pub struct ScoreRecord {
    pub region: String,
    pub block_id: String,
    pub block_title: String,
    pub block_score: f64,
    pub block_percentage: Option<f64>,
    pub activities: Vec<String>,
    pub activity_scores: Vec<f64>,
}

/// Why a (region, block) pair could not be read.
#[derive(PartialEq, Debug, Clone)]
pub enum PairError {
    MissingColumn { column: String },
    RowOutOfRange { row: usize },
    EmptyCell { row: usize, column: String },
    NotANumber { row: usize, column: String, content: String },
}

impl Error for PairError {}

impl Display for PairError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PairError::MissingColumn { column } => write!(f, "missing column {}", column),
            PairError::RowOutOfRange { row } => write!(f, "row {} is out of range", row),
            PairError::EmptyCell { row, column } => {
                write!(f, "empty cell at row {} of column {}", row, column)
            }
            PairError::NotANumber {
                row,
                column,
                content,
            } => write!(
                f,
                "could not convert {:?} to a number at row {} of column {}",
                content, row, column
            ),
        }
    }
}

/// A pair that was skipped during the extraction.
#[derive(PartialEq, Debug, Clone)]
pub struct PairWarning {
    pub region: String,
    pub block_id: String,
    pub error: PairError,
}

impl Display for PairWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error while processing {} - {}: {}",
            self.region, self.block_id, self.error
        )
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct Extraction {
    /// In region-major, block-minor order.
    pub records: Vec<ScoreRecord>,
    pub warnings: Vec<PairWarning>,
}

// ********* Extraction **********

// The columns used for one region. Absent columns only fail the pairs that need them.
struct RegionColumns {
    scores: Option<usize>,
    block_score: Option<usize>,
    percentage: Option<usize>,
    scores_desc: String,
    block_score_desc: String,
}

impl RegionColumns {
    fn locate(table: &RawTable, matcher: &ColumnMatcher, region: &str) -> RegionColumns {
        let scores_pattern = format!("{} pontuação", region);
        let block_score_key = ColumnKey::grouped(region, BLOCK_SCORE_METRIC);
        RegionColumns {
            scores: matcher.find_index(region, &scores_pattern),
            block_score: table.column_index(&block_score_key),
            percentage: matcher.find_index(region, &format!("{} %", region)),
            scores_desc: format!("{:?}", scores_pattern),
            block_score_desc: block_score_key.to_string(),
        }
    }
}

/// Runs the extraction with the Ceasa catalog.
pub fn extract(table: &RawTable) -> Result<Extraction, MatrixError> {
    extract_with(table, &SchemaCatalog::CEASA)
}

/// Produces one record per (region, block) pair of the catalog.
///
/// Pairs that cannot be read are skipped and reported in the warnings. If no
/// pair at all could be read, the table is considered unusable and
/// `MatrixError::EmptyExtraction` is returned.
pub fn extract_with(table: &RawTable, catalog: &SchemaCatalog) -> Result<Extraction, MatrixError> {
    info!(
        "extract: {} rows, {} columns, {} regions, {} blocks",
        table.num_rows(),
        table.columns().len(),
        catalog.regions().len(),
        catalog.blocks().len()
    );
    let matcher = ColumnMatcher::new(table);
    let layout = catalog.row_layout();

    let mut records: Vec<ScoreRecord> = Vec::new();
    let mut warnings: Vec<PairWarning> = Vec::new();
    for region in catalog.regions() {
        let cols = RegionColumns::locate(table, &matcher, region);
        debug!(
            "extract: region: {:?} scores: {:?} block score: {:?} percentage: {:?}",
            region, cols.scores, cols.block_score, cols.percentage
        );
        for (block, rows) in layout.iter() {
            match extract_pair(table, region, block, rows.clone(), &cols) {
                Ok(rec) => {
                    debug!("extract: {:?}", rec);
                    records.push(rec);
                }
                Err(error) => {
                    let w = PairWarning {
                        region: region.to_string(),
                        block_id: block.id.to_string(),
                        error,
                    };
                    warn!("{}", w);
                    warnings.push(w);
                }
            }
        }
    }

    info!(
        "extract: {} records extracted, {} pairs skipped",
        records.len(),
        warnings.len()
    );
    if records.is_empty() {
        return Err(MatrixError::EmptyExtraction {
            skipped: warnings.len(),
        });
    }
    Ok(Extraction { records, warnings })
}

fn extract_pair(
    table: &RawTable,
    region: &str,
    block: &Block,
    rows: Range<usize>,
    cols: &RegionColumns,
) -> Result<ScoreRecord, PairError> {
    let start = rows.start;

    let scores_col = cols.scores.ok_or_else(|| PairError::MissingColumn {
        column: cols.scores_desc.clone(),
    })?;
    let mut activity_scores: Vec<f64> = Vec::with_capacity(rows.len());
    for row in rows {
        activity_scores.push(read_number(table, row, scores_col)?);
    }

    let block_col = cols.block_score.ok_or_else(|| PairError::MissingColumn {
        column: cols.block_score_desc.clone(),
    })?;
    let block_score = read_number(table, start, block_col)?;

    // Best effort: any problem with the percentage leaves it unset.
    let block_percentage = cols
        .percentage
        .and_then(|col| table.cell(start, col))
        .and_then(|c| c.as_f64());

    Ok(ScoreRecord {
        region: region.to_string(),
        block_id: block.id.to_string(),
        block_title: block.title.to_string(),
        block_score,
        block_percentage,
        activities: block.activities.iter().map(|s| s.to_string()).collect(),
        activity_scores,
    })
}

fn read_number(table: &RawTable, row: usize, col: usize) -> Result<f64, PairError> {
    let cell = table.cell(row, col).ok_or(PairError::RowOutOfRange { row })?;
    let column = || table.columns()[col].to_string();
    match cell {
        c if c.is_empty() => Err(PairError::EmptyCell {
            row,
            column: column(),
        }),
        c => c.as_f64().ok_or_else(|| PairError::NotANumber {
            row,
            column: column(),
            content: match c {
                Cell::Text(s) => s.clone(),
                other => format!("{:?}", other),
            },
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TableBuilder;
    use std::collections::HashSet;

    const TWO_BLOCKS: [Block; 2] = [
        Block {
            id: "BLOCO 1",
            title: "Primeiro",
            activities: &["A", "B", "C"],
        },
        Block {
            id: "BLOCO 2",
            title: "Operação do Banco de Alimentos",
            activities: &["Estrutura", "Processos"],
        },
    ];

    const BELEM: [&str; 1] = ["Belem/PA"];
    const BELEM_CURITIBA: [&str; 2] = ["Belem/PA", "Curitiba/PR"];

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn region_columns(b: TableBuilder, region: &str, scores: &[Cell], block: &[f64]) -> TableBuilder {
        b.column(
            ColumnKey::grouped(region, &format!("{} pontuação", region)),
            scores,
        )
        .numbers(ColumnKey::grouped(region, BLOCK_SCORE_METRIC), block)
    }

    fn nums(xs: &[f64]) -> Vec<Cell> {
        xs.iter().map(|x| Cell::Number(*x)).collect()
    }

    fn belem_table() -> RawTable {
        let b = region_columns(
            TableBuilder::new(),
            "Belem/PA",
            &nums(&[1.0, 2.0, 3.0, 8.0, 6.0]),
            &[6.0, 0.0, 0.0, 14.0, 0.0],
        );
        b.numbers(
            ColumnKey::grouped("Belem/PA", "Belem/PA %"),
            &[0.5, 0.0, 0.0, 0.7, 0.0],
        )
        .build()
    }

    #[test]
    fn extract_block_scores() {
        init();
        let catalog = SchemaCatalog::new(&TWO_BLOCKS, &BELEM);
        let res = extract_with(&belem_table(), &catalog).unwrap();
        assert!(res.warnings.is_empty());
        assert_eq!(res.records.len(), 2);
        let r = &res.records[1];
        assert_eq!(r.region, "Belem/PA");
        assert_eq!(r.block_id, "BLOCO 2");
        assert_eq!(r.block_title, "Operação do Banco de Alimentos");
        assert_eq!(r.block_score, 14.0);
        assert_eq!(r.block_percentage, Some(0.7));
        assert_eq!(r.activities, vec!["Estrutura", "Processos"]);
        assert_eq!(r.activity_scores, vec![8.0, 6.0]);
    }

    #[test]
    fn extract_ceasa_block_2_rows() {
        init();
        let mut scores = vec![0.0; 11];
        scores[3] = 8.0;
        scores[4] = 6.0;
        let mut block = vec![0.0; 11];
        block[3] = 14.0;
        let t = region_columns(TableBuilder::new(), "Belem/PA", &nums(&scores), &block).build();
        let res = extract(&t).unwrap();
        // Only Belem/PA has columns: the other regions are all skipped.
        assert_eq!(res.records.len(), 6);
        assert_eq!(res.warnings.len(), 6 * 6);
        let r = res
            .records
            .iter()
            .find(|r| r.block_id == "BLOCO 2")
            .unwrap();
        assert_eq!(r.region, "Belem/PA");
        assert_eq!(r.block_score, 14.0);
        assert_eq!(r.activity_scores, vec![8.0, 6.0]);
        assert_eq!(r.block_percentage, None);
    }

    #[test]
    fn missing_percentage_column() {
        init();
        let t = region_columns(
            TableBuilder::new(),
            "Belem/PA",
            &nums(&[1.0, 2.0, 3.0, 8.0, 6.0]),
            &[6.0, 0.0, 0.0, 14.0, 0.0],
        )
        .build();
        let res = extract_with(&t, &SchemaCatalog::new(&TWO_BLOCKS, &BELEM)).unwrap();
        assert_eq!(res.records.len(), 2);
        assert!(res.records.iter().all(|r| r.block_percentage.is_none()));
    }

    #[test]
    fn unreadable_percentage_is_unset() {
        init();
        let t = region_columns(
            TableBuilder::new(),
            "Belem/PA",
            &nums(&[1.0, 2.0, 3.0, 8.0, 6.0]),
            &[6.0, 0.0, 0.0, 14.0, 0.0],
        )
        .column(
            ColumnKey::grouped("Belem/PA", "Belem/PA %"),
            &[Cell::Text("-".to_string())],
        )
        .build();
        let res = extract_with(&t, &SchemaCatalog::new(&TWO_BLOCKS, &BELEM)).unwrap();
        assert_eq!(res.records.len(), 2);
        assert_eq!(res.records[0].block_percentage, None);
        assert_eq!(res.records[1].block_percentage, None);
    }

    #[test]
    fn malformed_score_skips_pair() {
        init();
        let mut belem = nums(&[1.0, 2.0, 3.0, 8.0, 6.0]);
        belem[4] = Cell::Text("seis".to_string());
        let b = region_columns(
            TableBuilder::new(),
            "Belem/PA",
            &belem,
            &[6.0, 0.0, 0.0, 14.0, 0.0],
        );
        let t = region_columns(
            b,
            "Curitiba/PR",
            &nums(&[3.0, 3.0, 3.0, 5.0, 5.0]),
            &[9.0, 0.0, 0.0, 10.0, 0.0],
        )
        .build();
        let res = extract_with(&t, &SchemaCatalog::new(&TWO_BLOCKS, &BELEM_CURITIBA)).unwrap();
        let pairs: Vec<(&str, &str)> = res
            .records
            .iter()
            .map(|r| (r.region.as_str(), r.block_id.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Belem/PA", "BLOCO 1"),
                ("Curitiba/PR", "BLOCO 1"),
                ("Curitiba/PR", "BLOCO 2")
            ]
        );
        assert_eq!(res.warnings.len(), 1);
        let w = &res.warnings[0];
        assert_eq!(w.region, "Belem/PA");
        assert_eq!(w.block_id, "BLOCO 2");
        assert!(matches!(&w.error, PairError::NotANumber { row: 4, content, .. } if content == "seis"));
        assert!(w.to_string().contains("Belem/PA - BLOCO 2"));
    }

    #[test]
    fn empty_and_short_columns() {
        init();
        let mut belem = nums(&[1.0, 2.0, 3.0]);
        belem[1] = Cell::Empty;
        let t = region_columns(TableBuilder::new(), "Belem/PA", &belem, &[6.0]).build();
        let res = extract_with(&t, &SchemaCatalog::new(&TWO_BLOCKS, &BELEM));
        assert_eq!(res, Err(MatrixError::EmptyExtraction { skipped: 2 }));
    }

    #[test]
    fn nothing_matches() {
        init();
        let t = TableBuilder::new()
            .numbers(ColumnKey::flat("Bloco"), &[1.0, 2.0])
            .build();
        match extract(&t) {
            Err(MatrixError::EmptyExtraction { skipped }) => assert_eq!(skipped, 42),
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn records_are_consistent() {
        init();
        let b = region_columns(
            TableBuilder::new(),
            "Belem/PA",
            &nums(&[1.0, 2.0, 3.0, 8.0, 6.0]),
            &[6.0, 0.0, 0.0, 14.0, 0.0],
        );
        let t = region_columns(
            b,
            "Curitiba/PR",
            &nums(&[3.0, 3.0, 3.0, 5.0, 5.0]),
            &[9.0, 0.0, 0.0, 10.0, 0.0],
        )
        .build();
        let res = extract_with(&t, &SchemaCatalog::new(&TWO_BLOCKS, &BELEM_CURITIBA)).unwrap();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        for r in res.records.iter() {
            assert_eq!(r.activities.len(), r.activity_scores.len());
            assert!(seen.insert((r.region.clone(), r.block_id.clone())));
        }
        assert_eq!(seen.len(), 4);
    }

    #[test]
    fn nan_block_score_is_kept_out_of_highlights() {
        init();
        let b = region_columns(
            TableBuilder::new(),
            "Belem/PA",
            &nums(&[1.0, 2.0, 3.0, 8.0, 6.0]),
            &[6.0, 0.0, 0.0, 14.0, 0.0],
        );
        let mut t = region_columns(
            b,
            "Curitiba/PR",
            &nums(&[3.0, 3.0, 3.0, 5.0, 5.0]),
            &[9.0, 0.0, 0.0, 10.0, 0.0],
        )
        .build();
        let col = t
            .column_index(&ColumnKey::grouped("Belem/PA", BLOCK_SCORE_METRIC))
            .unwrap();
        t.rows[0][col] = Cell::Text("NaN".to_string());

        let res = extract_with(&t, &SchemaCatalog::new(&TWO_BLOCKS, &BELEM_CURITIBA)).unwrap();
        assert_eq!(res.records.len(), 4);
        assert!(res.records[0].block_score.is_nan());

        let h = crate::highlights::compute_highlights(&res.records);
        let e = h.get("BLOCO 1").unwrap();
        assert_eq!(e.max, ("Curitiba/PR".to_string(), 9.0));
        assert_eq!(e.min, ("Curitiba/PR".to_string(), 9.0));
    }
}
