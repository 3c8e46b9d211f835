use crate::tokenizer::tokenize;
use crate::{Phraser, TextId};
use anyhow::{Context, Result};
use rayon::prelude::*;
use flate2::read::GzDecoder;
use serde::de::{DeserializeSeed, Deserializer, SeqAccess, Visitor};
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Hook applied to a raw text before tokenization.
pub type TextTransform = Box<dyn Fn(String) -> String + Send + Sync>;

/// Text id -> phrase-merged token sequence.
pub type TokenMap = BTreeMap<TextId, Vec<String>>;

#[derive(Debug, Deserialize)]
struct InputText {
    id: String,
    text: String,
}

/// One corpus file and the ids to keep from it.
pub struct CorpusSource {
    pub filename: PathBuf,
    /// Expected number of records in the file, checked after reading.
    pub num_documents: Option<usize>,
    pub ids: HashSet<TextId>,
    /// `None` leaves texts unchanged.
    pub transformer: Option<TextTransform>,
}

pub struct ReaderConfiguration {
    pub topics: CorpusSource,
    pub documents: CorpusSource,
    pub parallelize_transformers: bool,
}

pub struct ReaderOptions<'a> {
    pub phraser: &'a Phraser,
}

/// Tokenized query and document texts restricted to the ids of interest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpora {
    pub queries: TokenMap,
    pub documents: TokenMap,
}

pub fn read_corpora(configuration: &ReaderConfiguration, options: &ReaderOptions<'_>) -> Result<Corpora> {
    let parallel = configuration.parallelize_transformers;
    let queries = read_corpus(&configuration.topics, options, parallel)?;
    tracing::info!(texts = queries.len(), "read topic corpus");
    let documents = read_corpus(&configuration.documents, options, parallel)?;
    tracing::info!(texts = documents.len(), "read document corpus");
    Ok(Corpora { queries, documents })
}

fn read_corpus(source: &CorpusSource, options: &ReaderOptions<'_>, parallel: bool) -> Result<TokenMap> {
    let mut total = 0usize;
    let mut wanted: Vec<InputText> = Vec::new();
    for_each_record(&source.filename, &mut |record: InputText| {
        total += 1;
        if source.ids.contains(&record.id) {
            wanted.push(record);
        }
    })?;
    if let Some(expected) = source.num_documents {
        if expected != total {
            tracing::warn!(
                file = %source.filename.display(),
                expected,
                found = total,
                "unexpected number of texts in corpus"
            );
        }
    }
    tracing::debug!(file = %source.filename.display(), total, kept = wanted.len(), "filtered corpus by id");

    let process = |record: InputText| -> (TextId, Vec<String>) {
        let text = match &source.transformer {
            Some(transform) => transform(record.text),
            None => record.text,
        };
        (record.id, options.phraser.apply(tokenize(&text)))
    };
    let texts: TokenMap = if parallel {
        wanted.into_par_iter().map(process).collect()
    } else {
        wanted.into_iter().map(process).collect()
    };
    Ok(texts)
}

/// Open a corpus file, decompressing it when the name ends in `.gz`.
fn open_corpus(file: &Path) -> Result<Box<dyn BufRead>> {
    let f = File::open(file).with_context(|| format!("opening corpus {}", file.display()))?;
    let reader: Box<dyn BufRead> = if file.extension().and_then(|s| s.to_str()) == Some("gz") {
        Box::new(BufReader::new(GzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(reader)
}

/// Skip leading whitespace and report whether the stream holds a JSON array.
fn starts_with_array(reader: &mut dyn BufRead) -> io::Result<bool> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(false);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(pos) => {
                let is_array = buf[pos] == b'[';
                reader.consume(pos);
                return Ok(is_array);
            }
            None => {
                let n = buf.len();
                reader.consume(n);
            }
        }
    }
}

/// Visits the elements of a JSON array one at a time.
struct RecordSeq<'v>(&'v mut dyn FnMut(InputText));

impl<'de, 'v> DeserializeSeed<'de> for RecordSeq<'v> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, 'v> Visitor<'de> for RecordSeq<'v> {
    type Value = ();

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an array of corpus records")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<(), A::Error> {
        while let Some(record) = seq.next_element::<InputText>()? {
            (self.0)(record);
        }
        Ok(())
    }
}

/// Stream `{"id", "text"}` records to `visit` without holding the whole corpus.
/// The file may be a JSON array or a sequence of objects (JSON Lines); the
/// layout is detected from the content, so `.json`, `.jsonl` and their `.gz`
/// forms all work.
fn for_each_record(file: &Path, visit: &mut dyn FnMut(InputText)) -> Result<()> {
    let mut reader = open_corpus(file)?;
    let is_array = starts_with_array(&mut reader).with_context(|| format!("reading corpus {}", file.display()))?;
    let mut de = serde_json::Deserializer::from_reader(reader);
    if is_array {
        RecordSeq(visit)
            .deserialize(&mut de)
            .and_then(|()| de.end())
            .with_context(|| format!("reading corpus {}", file.display()))?;
    } else {
        for record in de.into_iter::<InputText>() {
            visit(record.with_context(|| format!("reading corpus {}", file.display()))?);
        }
    }
    Ok(())
}
