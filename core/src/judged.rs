use crate::TextId;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

pub const DEFAULT_TASK: &str = "task1-votes.V1.2";
pub const DEFAULT_SUBSET: &str = "all";

/// Source of the documents that received relevance judgements for a task.
pub trait JudgedDocuments {
    fn judged_documents(&self, task: &str, subset: &str) -> Result<HashSet<TextId>>;
}

/// Relevance judgements stored as `<root>/<task>/<subset>.tsv`, one
/// `topic_id  iteration  document_id  relevance` row per line.
pub struct QrelsDirectory {
    pub root: PathBuf,
}

impl QrelsDirectory {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    pub fn path(&self, task: &str, subset: &str) -> PathBuf {
        self.root.join(task).join(format!("{subset}.tsv"))
    }
}

impl JudgedDocuments for QrelsDirectory {
    fn judged_documents(&self, task: &str, subset: &str) -> Result<HashSet<TextId>> {
        let path = self.path(task, subset);
        let f = File::open(&path).with_context(|| format!("opening judgements {}", path.display()))?;
        let mut documents = HashSet::new();
        for (idx, line) in BufReader::new(f).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() { continue; }
            let columns: Vec<&str> = line.split('\t').collect();
            if columns.len() < 3 {
                bail!("{}:{}: expected at least 3 columns, found {}", path.display(), idx + 1, columns.len());
            }
            documents.insert(columns[2].trim().to_string());
        }
        tracing::info!(task, subset, documents = documents.len(), "loaded judged documents");
        Ok(documents)
    }
}

impl JudgedDocuments for HashSet<TextId> {
    fn judged_documents(&self, _task: &str, _subset: &str) -> Result<HashSet<TextId>> {
        Ok(self.clone())
    }
}
