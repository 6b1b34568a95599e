use log::debug;

use crate::extract::ScoreRecord;

/// The best and the worst region of one block.
#[derive(PartialEq, Debug, Clone)]
pub struct HighlightEntry {
    pub block_id: String,
    pub max: (String, f64),
    pub min: (String, f64),
}

/// The highlights of all the blocks, in the order in which the blocks first
/// appear in the records.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Highlights {
    entries: Vec<HighlightEntry>,
}

impl Highlights {
    pub fn get(&self, block_id: &str) -> Option<&HighlightEntry> {
        self.entries.iter().find(|e| e.block_id == block_id)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HighlightEntry> {
        self.entries.iter()
    }

    /// The entries for the given blocks, in the given order. Blocks without
    /// a highlight are skipped.
    pub fn ordered<'a>(&'a self, block_ids: &[String]) -> Vec<&'a HighlightEntry> {
        block_ids.iter().filter_map(|b| self.get(b)).collect()
    }
}

/// Best and worst region per block, by block score.
///
/// Ties are resolved in favour of the record that comes first: a later
/// record replaces the current best (or worst) only if it is strictly
/// better (or worse). NaN scores are ignored, so a block whose scores are
/// all NaN has no entry.
pub fn compute_highlights(records: &[ScoreRecord]) -> Highlights {
    let mut entries: Vec<HighlightEntry> = Vec::new();
    for r in records.iter().filter(|r| !r.block_score.is_nan()) {
        match entries.iter_mut().find(|e| e.block_id == r.block_id) {
            Some(e) => {
                if r.block_score > e.max.1 {
                    e.max = (r.region.clone(), r.block_score);
                }
                if r.block_score < e.min.1 {
                    e.min = (r.region.clone(), r.block_score);
                }
            }
            None => entries.push(HighlightEntry {
                block_id: r.block_id.clone(),
                max: (r.region.clone(), r.block_score),
                min: (r.region.clone(), r.block_score),
            }),
        }
    }
    debug!("compute_highlights: {:?}", entries);
    Highlights { entries }
}
