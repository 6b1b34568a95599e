/*!
Score extraction for the evaluation matrix of the Ceasas.

The evaluation matrix is a spreadsheet with two header rows: the first one
names a region (or `GERAL` for the shared columns), the second one a metric.
Each row is one activity, and the rows follow the blocks of the matrix in
order. This crate turns such a table into one [`ScoreRecord`] per region and
block, and computes the best and worst region of every block.

```
use ceasa_matrix::builder::TableBuilder;
use ceasa_matrix::*;

let mut scores = vec![0.0; 11];
scores[3] = 8.0;
scores[4] = 6.0;
let mut block = vec![0.0; 11];
block[3] = 14.0;
let table = TableBuilder::new()
    .numbers(ColumnKey::grouped("Belem/PA", "Belem/PA pontuação"), &scores)
    .numbers(ColumnKey::grouped("Belem/PA", BLOCK_SCORE_METRIC), &block)
    .build();

let extraction = extract(&table)?;
let highlights = compute_highlights(&extraction.records);
assert_eq!(highlights.get("BLOCO 2").unwrap().max, ("Belem/PA".to_string(), 14.0));
# Ok::<(), MatrixError>(())
```

Loading the spreadsheet is left to the caller.
*/

pub mod builder;
mod catalog;
mod extract;
pub mod filter;
mod highlights;
pub mod manual;
mod matcher;
mod table;
pub mod views;

pub use crate::catalog::*;
pub use crate::extract::*;
pub use crate::highlights::*;
pub use crate::matcher::{find_column, normalize, ColumnMatcher};
pub use crate::table::*;
