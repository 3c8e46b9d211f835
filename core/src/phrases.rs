use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_delimiter() -> String { "_".to_string() }

/// Frozen phrase model: merges adjacent token pairs that were detected as
/// collocations into a single compound token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Phraser {
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
    pub threshold: f64,
    /// Joined bigram (e.g. `new_york`) -> score.
    pub phrasegrams: HashMap<String, f64>,
}

impl Default for Phraser {
    fn default() -> Self {
        Self { delimiter: default_delimiter(), threshold: 0.0, phrasegrams: HashMap::new() }
    }
}

impl Phraser {
    pub fn new(threshold: f64, phrasegrams: HashMap<String, f64>) -> Self {
        Self { threshold, phrasegrams, ..Self::default() }
    }

    fn score(&self, joined: &str) -> Option<f64> {
        self.phrasegrams.get(joined).copied().filter(|&s| s > self.threshold)
    }

    /// Merge known phrases in a single left-to-right pass.
    pub fn apply(&self, tokens: Vec<String>) -> Vec<String> {
        if self.phrasegrams.is_empty() { return tokens; }
        let mut out = Vec::with_capacity(tokens.len());
        let mut iter = tokens.into_iter().peekable();
        while let Some(token) = iter.next() {
            if let Some(next) = iter.peek() {
                let joined = format!("{token}{}{next}", self.delimiter);
                if self.score(&joined).is_some() {
                    iter.next();
                    out.push(joined);
                    continue;
                }
            }
            out.push(token);
        }
        out
    }
}
