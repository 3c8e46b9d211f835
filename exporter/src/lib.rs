use anyhow::{Context, Result};
use clap::Parser;
use serp_core::assemble::produce_json_document;
use serp_core::config::{get_reader_configuration, ExportSettings};
use serp_core::corpus::read_corpora;
use serp_core::document::write_json_document;
use serp_core::judged::{QrelsDirectory, DEFAULT_SUBSET, DEFAULT_TASK};
use serp_core::persist::{load_artifacts, ArtifactPaths};
use serp_core::results::{CsvParameters, DEFAULT_TOPN};
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "produce-json-document")]
#[command(about = "Export filtered retrieval artifacts for a result list as one JSON document", long_about = None)]
pub struct Args {
    /// Directory holding dictionary, tfidf-queries, tfidf-documents, word-similarities, phraser and results
    #[arg(long, default_value = ".")]
    pub artifacts: PathBuf,
    /// Number of results kept per topic
    #[arg(long, default_value_t = DEFAULT_TOPN)]
    pub topn: usize,
    /// Field delimiter of the results file
    #[arg(long, default_value_t = '\t')]
    pub delimiter: char,
    /// Quote character of the results file
    #[arg(long, default_value_t = '"')]
    pub quote: char,
    /// Directory of relevance judgements, laid out as <task>/<subset>.tsv
    #[arg(long, default_value = "qrels")]
    pub qrels: PathBuf,
    #[arg(long, default_value = DEFAULT_TASK)]
    pub task: String,
    #[arg(long, default_value = DEFAULT_SUBSET)]
    pub subset: String,
    /// Topic corpus (JSON array or JSON Lines, optionally gzipped)
    #[arg(long, default_value = "queries.json.gz")]
    pub queries: PathBuf,
    /// Document corpus (JSON array or JSON Lines, optionally gzipped)
    #[arg(long, default_value = "documents.json.gz")]
    pub documents: PathBuf,
    /// Expected number of topics in the topic corpus
    #[arg(long)]
    pub num_queries: Option<usize>,
    /// Expected number of documents in the document corpus
    #[arg(long)]
    pub num_documents: Option<usize>,
    /// Tokenize corpora on all cores
    #[arg(long, default_value_t = false)]
    pub parallelize: bool,
    /// Write the document here instead of stdout
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl Args {
    pub fn settings(&self) -> ExportSettings {
        ExportSettings {
            artifacts: self.artifacts.clone(),
            topn: self.topn,
            csv: CsvParameters { delimiter: self.delimiter, quote: self.quote },
            qrels: self.qrels.clone(),
            task: self.task.clone(),
            subset: self.subset.clone(),
            topic_corpus: self.queries.clone(),
            document_corpus: self.documents.clone(),
            num_topics: self.num_queries,
            num_documents: self.num_documents,
            parallelize_transformers: self.parallelize,
        }
    }
}

/// Load, filter and serialize. Nothing is written until the document is complete.
pub fn run<W: Write>(settings: &ExportSettings, writer: W) -> Result<()> {
    let paths = ArtifactPaths::new(&settings.artifacts);
    let bundle = load_artifacts(&paths, settings.topn, &settings.csv)?;
    let judged = QrelsDirectory::new(&settings.qrels);
    let (configuration, options) = get_reader_configuration(&bundle, &judged, settings)?;
    let corpora = read_corpora(&configuration, &options)?;
    let document = produce_json_document(&bundle, &corpora);
    write_json_document(&document, writer).context("writing json document")?;
    tracing::info!("json document written");
    Ok(())
}

/// Run with the output sink chosen by `--output`.
pub fn run_cli(args: &Args) -> Result<()> {
    let settings = args.settings();
    match &args.output {
        Some(path) => {
            let mut buf = Vec::new();
            run(&settings, &mut buf)?;
            fs::write(path, buf).with_context(|| format!("writing {}", path.display()))?;
        }
        None => {
            let stdout = io::stdout();
            let mut out = BufWriter::new(stdout.lock());
            run(&settings, &mut out)?;
            out.flush()?;
        }
    }
    Ok(())
}
