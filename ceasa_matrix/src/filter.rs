use std::cmp::Ordering;

use log::debug;

use crate::extract::ScoreRecord;

/// The selection made on the dashboard. An unset criterion selects everything.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RecordFilter {
    pub regions: Option<Vec<String>>,
    pub blocks: Option<Vec<String>>,
    /// A record is kept if at least one of its activities is selected.
    pub activities: Option<Vec<String>>,
    /// Inclusive bounds on the block score.
    pub score_range: Option<(f64, f64)>,
}

impl RecordFilter {
    pub fn accepts(&self, r: &ScoreRecord) -> bool {
        let region_ok = self.regions.as_ref().map_or(true, |s| s.contains(&r.region));
        let block_ok = self.blocks.as_ref().map_or(true, |s| s.contains(&r.block_id));
        let activity_ok = self
            .activities
            .as_ref()
            .map_or(true, |s| r.activities.iter().any(|a| s.contains(a)));
        let score_ok = self
            .score_range
            .map_or(true, |(lo, hi)| r.block_score >= lo && r.block_score <= hi);
        region_ok && block_ok && activity_ok && score_ok
    }

    /// The accepted records, highest block score first and NaN scores last.
    /// Records with the same score keep their relative order.
    pub fn apply(&self, records: &[ScoreRecord]) -> Vec<ScoreRecord> {
        let mut res: Vec<ScoreRecord> = records.iter().filter(|r| self.accepts(r)).cloned().collect();
        res.sort_by(|a, b| descending_score(a.block_score, b.block_score));
        debug!(
            "RecordFilter::apply: {} of {} records kept",
            res.len(),
            records.len()
        );
        res
    }
}

/// Ordering for a descending sort on scores, with NaN after every number.
pub fn descending_score(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}

/// Regions in order of first appearance.
pub fn unique_regions(records: &[ScoreRecord]) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for r in records {
        if !res.contains(&r.region) {
            res.push(r.region.clone());
        }
    }
    res
}

/// Blocks in order of first appearance.
pub fn unique_blocks(records: &[ScoreRecord]) -> Vec<String> {
    let mut res: Vec<String> = Vec::new();
    for r in records {
        if !res.contains(&r.block_id) {
            res.push(r.block_id.clone());
        }
    }
    res
}

/// All the activities, sorted and deduplicated.
pub fn unique_activities(records: &[ScoreRecord]) -> Vec<String> {
    let mut res: Vec<String> = records
        .iter()
        .flat_map(|r| r.activities.iter().cloned())
        .collect();
    res.sort();
    res.dedup();
    res
}

/// The lowest and highest block scores, NaN excluded.
pub fn score_bounds(records: &[ScoreRecord]) -> Option<(f64, f64)> {
    records
        .iter()
        .filter(|r| !r.block_score.is_nan())
        .fold(None, |acc, r| match acc {
            None => Some((r.block_score, r.block_score)),
            Some((lo, hi)) => Some((lo.min(r.block_score), hi.max(r.block_score))),
        })
}
