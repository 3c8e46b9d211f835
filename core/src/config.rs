use crate::corpus::{CorpusSource, ReaderConfiguration, ReaderOptions};
use crate::judged::{JudgedDocuments, DEFAULT_SUBSET, DEFAULT_TASK};
use crate::persist::ArtifactBundle;
use crate::results::{CsvParameters, DEFAULT_TOPN};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::PathBuf;

/// Everything the exporter can be told about where its inputs live.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub artifacts: PathBuf,
    pub topn: usize,
    pub csv: CsvParameters,
    pub qrels: PathBuf,
    pub task: String,
    pub subset: String,
    pub topic_corpus: PathBuf,
    pub document_corpus: PathBuf,
    pub num_topics: Option<usize>,
    pub num_documents: Option<usize>,
    pub parallelize_transformers: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            artifacts: PathBuf::from("."),
            topn: DEFAULT_TOPN,
            csv: CsvParameters::default(),
            qrels: PathBuf::from("qrels"),
            task: DEFAULT_TASK.to_string(),
            subset: DEFAULT_SUBSET.to_string(),
            topic_corpus: PathBuf::from("queries.json.gz"),
            document_corpus: PathBuf::from("documents.json.gz"),
            num_topics: None,
            num_documents: None,
            parallelize_transformers: false,
        }
    }
}

/// Decide which topics and documents the corpus reader should materialize:
/// every topic in the result set and every judged document.
pub fn get_reader_configuration<'a>(
    bundle: &'a ArtifactBundle,
    judged: &dyn JudgedDocuments,
    settings: &ExportSettings,
) -> Result<(ReaderConfiguration, ReaderOptions<'a>)> {
    let topic_ids: HashSet<String> = bundle.results.keys().cloned().collect();
    let document_ids = judged
        .judged_documents(&settings.task, &settings.subset)
        .with_context(|| format!("looking up judged documents for {}/{}", settings.task, settings.subset))?;

    let configuration = ReaderConfiguration {
        topics: CorpusSource {
            filename: settings.topic_corpus.clone(),
            num_documents: settings.num_topics,
            ids: topic_ids,
            transformer: None,
        },
        documents: CorpusSource {
            filename: settings.document_corpus.clone(),
            num_documents: settings.num_documents,
            ids: document_ids,
            transformer: None,
        },
        parallelize_transformers: settings.parallelize_transformers,
    };
    let options = ReaderOptions { phraser: &bundle.phraser };
    Ok((configuration, options))
}
