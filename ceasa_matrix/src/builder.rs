pub use crate::table::*;

/// A builder for assembling a `RawTable`.
///
/// Readers push the header first, then the rows in order. Tests usually
/// prefer `column`, which fills a whole column at once.
///
/// ```
/// use ceasa_matrix::builder::TableBuilder;
/// use ceasa_matrix::{Cell, ColumnKey};
///
/// let table = TableBuilder::new()
///     .column(ColumnKey::grouped("GERAL", "Bloco"), &[Cell::Text("BLOCO 1".to_string())])
///     .column(ColumnKey::grouped("Belem/PA", "Belem/PA pontuação"), &[Cell::Number(3.0)])
///     .build();
///
/// assert_eq!(table.num_rows(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct TableBuilder {
    _columns: Vec<ColumnKey>,
    _rows: Vec<Vec<Cell>>,
}

impl TableBuilder {
    pub fn new() -> TableBuilder {
        TableBuilder::default()
    }

    pub fn header(self, columns: Vec<ColumnKey>) -> TableBuilder {
        TableBuilder {
            _columns: columns,
            _rows: self._rows,
        }
    }

    /// Appends a column. Rows are created as needed, and shorter columns
    /// are padded with empty cells.
    pub fn column(mut self, key: ColumnKey, cells: &[Cell]) -> TableBuilder {
        let col = self._columns.len();
        self._columns.push(key);
        while self._rows.len() < cells.len() {
            self._rows.push(Vec::new());
        }
        for (idx, row) in self._rows.iter_mut().enumerate() {
            row.resize(col, Cell::Empty);
            row.push(cells.get(idx).cloned().unwrap_or(Cell::Empty));
        }
        self
    }

    /// Appends a column of numbers.
    pub fn numbers(self, key: ColumnKey, values: &[f64]) -> TableBuilder {
        let cells: Vec<Cell> = values.iter().map(|x| Cell::Number(*x)).collect();
        self.column(key, &cells)
    }

    pub fn add_row(&mut self, row: Vec<Cell>) {
        self._rows.push(row);
    }

    pub fn build(self) -> RawTable {
        RawTable::new(self._columns, self._rows)
    }
}
