use crate::{BowEntry, TermId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weights below this magnitude are dropped from the output vector.
const EPS: f64 = 1e-12;

/// Local (within-text) term frequency weighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LocalWeighting {
    /// Raw count.
    #[default]
    Raw,
    /// 1 + ln(count).
    Log,
}

impl LocalWeighting {
    fn apply(self, count: u32) -> f64 {
        match self {
            LocalWeighting::Raw => count as f64,
            LocalWeighting::Log => if count > 0 { 1.0 + (count as f64).ln() } else { 0.0 },
        }
    }
}

/// A fitted TF-IDF model: per-term global weights plus the local weighting
/// and normalization it was fitted with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TfidfModel {
    pub idfs: HashMap<TermId, f64>,
    pub local: LocalWeighting,
    pub normalize: bool,
    pub num_docs: u32,
}

impl TfidfModel {
    pub fn new(idfs: HashMap<TermId, f64>, local: LocalWeighting, normalize: bool) -> Self {
        Self { idfs, local, normalize, num_docs: 0 }
    }

    /// Weigh a bag of words. Terms without a global weight are dropped.
    pub fn weigh(&self, bow: &[BowEntry]) -> Vec<(TermId, f64)> {
        let mut vector: Vec<(TermId, f64)> = bow
            .iter()
            .filter_map(|&(term_id, count)| {
                let idf = *self.idfs.get(&term_id)?;
                if idf == 0.0 { return None; }
                Some((term_id, self.local.apply(count) * idf))
            })
            .collect();
        if self.normalize {
            let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, w) in vector.iter_mut() { *w /= norm; }
            }
        }
        vector.retain(|(_, w)| w.abs() > EPS);
        vector
    }
}
