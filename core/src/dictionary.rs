use crate::{BowEntry, TermId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Vocabulary mapping terms to integer ids, together with the document
/// statistics it was collected with.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dictionary {
    pub token2id: HashMap<String, TermId>,
    /// Number of documents each term appeared in.
    pub dfs: HashMap<TermId, u32>,
    pub num_docs: u32,
    pub num_pos: u64,
}

impl Dictionary {
    pub fn new() -> Self { Self::default() }

    /// Build a dictionary from an explicit term -> id table, without statistics.
    pub fn from_token2id(token2id: HashMap<String, TermId>) -> Self {
        Self { token2id, ..Self::default() }
    }

    pub fn get(&self, term: &str) -> Option<TermId> { self.token2id.get(term).copied() }

    pub fn len(&self) -> usize { self.token2id.len() }

    pub fn is_empty(&self) -> bool { self.token2id.is_empty() }

    /// Convert a token sequence into a bag of words sorted by term id.
    /// Tokens missing from the vocabulary are dropped.
    pub fn doc2bow<S: AsRef<str>>(&self, tokens: &[S]) -> Vec<BowEntry> {
        let mut counts: BTreeMap<TermId, u32> = BTreeMap::new();
        for token in tokens {
            if let Some(id) = self.get(token.as_ref()) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }
}
