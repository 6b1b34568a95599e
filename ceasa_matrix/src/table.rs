// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The group label used by the spreadsheet for the columns shared by all the regions.
pub const GENERAL_GROUP: &str = "GERAL";

/// The address of a column in the loaded spreadsheet.
///
/// The evaluation matrix uses two header rows: the first one is the region
/// (or `GERAL`), the second one the metric. Columns that appear before any
/// group label are addressed by a single name.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum ColumnKey {
    Flat(String),
    Grouped { group: String, metric: String },
}

impl ColumnKey {
    pub fn flat(name: &str) -> ColumnKey {
        ColumnKey::Flat(name.to_string())
    }

    pub fn grouped(group: &str, metric: &str) -> ColumnKey {
        ColumnKey::Grouped {
            group: group.to_string(),
            metric: metric.to_string(),
        }
    }

    /// The joined representation, used for fuzzy matching.
    pub fn flattened(&self) -> String {
        match self {
            ColumnKey::Flat(s) => s.clone(),
            ColumnKey::Grouped { group, metric } => format!("{} {}", group, metric),
        }
    }

    pub fn group(&self) -> Option<&str> {
        match self {
            ColumnKey::Flat(_) => None,
            ColumnKey::Grouped { group, .. } => Some(group.as_str()),
        }
    }

    /// The second header level, or the name for a flat column.
    pub fn metric(&self) -> &str {
        match self {
            ColumnKey::Flat(s) => s.as_str(),
            ColumnKey::Grouped { metric, .. } => metric.as_str(),
        }
    }
}

impl Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnKey::Flat(s) => write!(f, "{:?}", s),
            ColumnKey::Grouped { group, metric } => write!(f, "({:?}, {:?})", group, metric),
        }
    }
}

/// A single spreadsheet cell, independent from the reader that produced it.
#[derive(PartialEq, Debug, Clone)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Float coercion. Text is parsed after trimming, booleans count as 0 or 1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(x) => Some(*x),
            Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
            Cell::Empty => None,
        }
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => Some(s.clone()),
            Cell::Number(x) => Some(x.to_string()),
            Cell::Bool(b) => Some(b.to_string()),
        }
    }
}

/// The loaded spreadsheet: a header of column keys and positional rows.
///
/// Rows may be shorter than the header; the missing cells read as empty.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub(crate) columns: Vec<ColumnKey>,
    pub(crate) rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(columns: Vec<ColumnKey>, rows: Vec<Vec<Cell>>) -> RawTable {
        RawTable { columns, rows }
    }

    pub fn columns(&self) -> &[ColumnKey] {
        &self.columns
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    /// Exact lookup of a column.
    pub fn column_index(&self, key: &ColumnKey) -> Option<usize> {
        self.columns.iter().position(|k| k == key)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).map(|r| r.get(col).unwrap_or(&Cell::Empty))
    }

    /// All the cells of a column, top to bottom.
    pub fn column_cells(&self, col: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows
            .iter()
            .map(move |r| r.get(col).unwrap_or(&Cell::Empty))
    }

    /// Replaces the empty cells of a column with the closest non-empty value above.
    /// Returns false if the column does not exist.
    pub fn forward_fill(&mut self, key: &ColumnKey) -> bool {
        let col = match self.column_index(key) {
            Some(c) => c,
            None => return false,
        };
        let mut last: Option<Cell> = None;
        for row in self.rows.iter_mut() {
            if row.len() <= col {
                row.resize(col + 1, Cell::Empty);
            }
            if row[col].is_empty() {
                if let Some(c) = &last {
                    row[col] = c.clone();
                }
            } else {
                last = Some(row[col].clone());
            }
        }
        true
    }

    /// The column holding the block id of each row, flat or under the general group.
    pub fn block_column(&self) -> Option<usize> {
        self.column_index(&ColumnKey::flat("Bloco"))
            .or_else(|| self.column_index(&ColumnKey::grouped(GENERAL_GROUP, "Bloco")))
    }

    /// The column holding the activity name of each row.
    pub fn activity_column(&self) -> Option<usize> {
        self.column_index(&ColumnKey::flat("Atividade"))
            .or_else(|| self.column_index(&ColumnKey::grouped(GENERAL_GROUP, "Atividade")))
    }
}

// ******** Errors *********

/// Errors that stop the processing of the whole table.
#[derive(PartialEq, Debug, Clone)]
pub enum MatrixError {
    /// Not a single (region, block) pair could be read.
    EmptyExtraction { skipped: usize },
    UnknownColumn(ColumnKey),
}

impl Error for MatrixError {}

impl Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::EmptyExtraction { skipped } => write!(
                f,
                "no data was extracted from the spreadsheet ({} pairs skipped), check the format of the data",
                skipped
            ),
            MatrixError::UnknownColumn(k) => write!(f, "column {} not found", k),
        }
    }
}
