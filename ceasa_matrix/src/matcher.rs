use log::debug;
use unicode_normalization::UnicodeNormalization;

use crate::table::{ColumnKey, RawTable};

/// Canonical form used for fuzzy column matching: compatibility decomposition,
/// non-ASCII characters (including the detached accents) dropped, lowercase,
/// spaces removed.
pub fn normalize(s: &str) -> String {
    s.nfkd()
        .filter(|c| c.is_ascii())
        .collect::<String>()
        .to_lowercase()
        .replace(' ', "")
}

/// Index of the normalized column names of one table.
///
/// Matching is done on substrings: a column matches when its normalized name
/// contains both the normalized region and the normalized pattern. When several
/// columns match, the first one in header order is returned. No attempt is
/// made to disambiguate a region whose name is contained in the name of
/// another column group; callers relying on a specific column should use an
/// exact key instead.
#[derive(Debug, Clone)]
pub struct ColumnMatcher {
    columns: Vec<ColumnKey>,
    normalized: Vec<String>,
}

impl ColumnMatcher {
    pub fn new(table: &RawTable) -> ColumnMatcher {
        let columns = table.columns().to_vec();
        let normalized = columns.iter().map(|k| normalize(&k.flattened())).collect();
        ColumnMatcher {
            columns,
            normalized,
        }
    }

    /// Position of the first matching column in the header.
    pub fn find_index(&self, region: &str, pattern: &str) -> Option<usize> {
        let n_region = normalize(region);
        let n_pattern = normalize(pattern);
        let res = self
            .normalized
            .iter()
            .position(|n| n.contains(&n_region) && n.contains(&n_pattern));
        debug!(
            "find_index: region: {:?} pattern: {:?} -> {:?}",
            region,
            pattern,
            res.map(|idx| &self.columns[idx])
        );
        res
    }

    pub fn find_column(&self, region: &str, pattern: &str) -> Option<&ColumnKey> {
        self.find_index(region, pattern).map(|idx| &self.columns[idx])
    }
}

/// One-shot lookup. Prefer building a `ColumnMatcher` when querying the same table repeatedly.
pub fn find_column(table: &RawTable, region: &str, pattern: &str) -> Option<ColumnKey> {
    ColumnMatcher::new(table)
        .find_column(region, pattern)
        .cloned()
}
