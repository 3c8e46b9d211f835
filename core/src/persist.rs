use crate::results::{read_results, CsvParameters};
use crate::{Dictionary, DokMatrix, Phraser, ResultSet, SparseTermSimilarityMatrix, TfidfModel};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{create_dir_all, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure to load one of the input artifacts. Every variant is fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{artifact} not found at {}", path.display())]
    Missing { artifact: &'static str, path: PathBuf },

    #[error("failed to read {artifact} from {}: {source}", path.display())]
    Io { artifact: &'static str, path: PathBuf, #[source] source: io::Error },

    #[error("{artifact} at {} is corrupt: {source}", path.display())]
    Corrupt { artifact: &'static str, path: PathBuf, #[source] source: bincode::Error },

    #[error("{artifact} is invalid: {reason}")]
    Invalid { artifact: &'static str, reason: String },

    #[error("{}:{line}: expected 5 fields, found {fields}", path.display())]
    MalformedRow { path: PathBuf, line: usize, fields: usize },
}

impl LoadError {
    pub(crate) fn io(artifact: &'static str, path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            LoadError::Missing { artifact, path: path.to_path_buf() }
        } else {
            LoadError::Io { artifact, path: path.to_path_buf(), source }
        }
    }
}

/// Locations of the input artifacts inside one directory.
pub struct ArtifactPaths {
    pub root: PathBuf,
}

impl ArtifactPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn dictionary(&self) -> PathBuf { self.root.join("dictionary") }
    pub fn tfidf_queries(&self) -> PathBuf { self.root.join("tfidf-queries") }
    pub fn tfidf_documents(&self) -> PathBuf { self.root.join("tfidf-documents") }
    pub fn word_similarities(&self) -> PathBuf { self.root.join("word-similarities") }
    pub fn phraser(&self) -> PathBuf { self.root.join("phraser") }
    pub fn results(&self) -> PathBuf { self.root.join("results") }
}

/// Everything loaded from the artifact directory, read-only afterwards.
pub struct ArtifactBundle {
    pub dictionary: Dictionary,
    pub tfidf_queries: TfidfModel,
    pub tfidf_documents: TfidfModel,
    pub word_similarities: DokMatrix,
    pub phraser: Phraser,
    pub results: ResultSet,
}

fn save_artifact<T: Serialize>(artifact: &'static str, path: &Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    let mut f = File::create(path)?;
    let bytes = bincode::serialize(value)?;
    f.write_all(&bytes)?;
    tracing::debug!(artifact, path = %path.display(), bytes = bytes.len(), "saved artifact");
    Ok(())
}

fn load_artifact<T: DeserializeOwned>(artifact: &'static str, path: &Path) -> Result<T, LoadError> {
    let mut f = File::open(path).map_err(|e| LoadError::io(artifact, path, e))?;
    let mut buf = Vec::new();
    f.read_to_end(&mut buf).map_err(|e| LoadError::io(artifact, path, e))?;
    bincode::deserialize(&buf).map_err(|source| LoadError::Corrupt { artifact, path: path.to_path_buf(), source })
}

pub fn save_dictionary(paths: &ArtifactPaths, dictionary: &Dictionary) -> anyhow::Result<()> {
    save_artifact("dictionary", &paths.dictionary(), dictionary)
}

pub fn load_dictionary(paths: &ArtifactPaths) -> Result<Dictionary, LoadError> {
    load_artifact("dictionary", &paths.dictionary())
}

pub fn save_tfidf_queries(paths: &ArtifactPaths, model: &TfidfModel) -> anyhow::Result<()> {
    save_artifact("query tf-idf model", &paths.tfidf_queries(), model)
}

pub fn load_tfidf_queries(paths: &ArtifactPaths) -> Result<TfidfModel, LoadError> {
    load_artifact("query tf-idf model", &paths.tfidf_queries())
}

pub fn save_tfidf_documents(paths: &ArtifactPaths, model: &TfidfModel) -> anyhow::Result<()> {
    save_artifact("document tf-idf model", &paths.tfidf_documents(), model)
}

pub fn load_tfidf_documents(paths: &ArtifactPaths) -> Result<TfidfModel, LoadError> {
    load_artifact("document tf-idf model", &paths.tfidf_documents())
}

pub fn save_word_similarities(paths: &ArtifactPaths, matrix: &SparseTermSimilarityMatrix) -> anyhow::Result<()> {
    save_artifact("term similarity matrix", &paths.word_similarities(), matrix)
}

/// Load the term similarity matrix and convert it to random-access form.
pub fn load_word_similarities(paths: &ArtifactPaths) -> Result<DokMatrix, LoadError> {
    let artifact = "term similarity matrix";
    let stored: SparseTermSimilarityMatrix = load_artifact(artifact, &paths.word_similarities())?;
    stored.matrix.validate().map_err(|reason| LoadError::Invalid { artifact, reason })?;
    Ok(DokMatrix::from(&stored.matrix))
}

pub fn save_phraser(paths: &ArtifactPaths, phraser: &Phraser) -> anyhow::Result<()> {
    save_artifact("phraser", &paths.phraser(), phraser)
}

pub fn load_phraser(paths: &ArtifactPaths) -> Result<Phraser, LoadError> {
    load_artifact("phraser", &paths.phraser())
}

/// Load every artifact plus the results file. The first failure aborts the load.
pub fn load_artifacts(paths: &ArtifactPaths, topn: usize, csv: &CsvParameters) -> Result<ArtifactBundle, LoadError> {
    let dictionary = load_dictionary(paths)?;
    tracing::info!(terms = dictionary.len(), "loaded dictionary");
    let tfidf_queries = load_tfidf_queries(paths)?;
    tracing::info!(terms = tfidf_queries.idfs.len(), "loaded query tf-idf model");
    let tfidf_documents = load_tfidf_documents(paths)?;
    tracing::info!(terms = tfidf_documents.idfs.len(), "loaded document tf-idf model");
    let word_similarities = load_word_similarities(paths)?;
    let (rows, cols) = word_similarities.shape();
    tracing::info!(rows, cols, nnz = word_similarities.nnz(), "loaded term similarity matrix");
    let phraser = load_phraser(paths)?;
    tracing::info!(phrases = phraser.phrasegrams.len(), "loaded phraser");
    let results = read_results(&paths.results(), topn, csv)?;
    Ok(ArtifactBundle { dictionary, tfidf_queries, tfidf_documents, word_similarities, phraser, results })
}
