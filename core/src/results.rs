use crate::persist::LoadError;
use crate::TextId;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Topic id -> post ids, in the order they were read.
pub type ResultSet = BTreeMap<TextId, Vec<TextId>>;

pub const DEFAULT_TOPN: usize = 5;

/// Dialect of the delimited results file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvParameters {
    pub delimiter: char,
    pub quote: char,
}

impl Default for CsvParameters {
    fn default() -> Self {
        Self { delimiter: '\t', quote: '"' }
    }
}

/// Incremental field splitter for one record. Quoted fields may contain the
/// delimiter or line breaks, and a doubled quote inside them stands for a
/// literal quote.
#[derive(Debug, Default)]
struct FieldSplitter {
    fields: Vec<String>,
    field: String,
    in_quotes: bool,
    touched: bool,
}

impl FieldSplitter {
    fn feed(&mut self, line: &str, csv: &CsvParameters) {
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            self.touched = true;
            if self.in_quotes {
                if c != csv.quote {
                    self.field.push(c);
                } else if chars.peek() == Some(&csv.quote) {
                    chars.next();
                    self.field.push(c);
                } else {
                    self.in_quotes = false;
                }
            } else if c == csv.quote && self.field.is_empty() {
                self.in_quotes = true;
            } else if c == csv.delimiter {
                self.fields.push(std::mem::take(&mut self.field));
            } else {
                self.field.push(c);
            }
        }
    }

    /// A line ended inside a quoted field: the break belongs to the field.
    fn continue_line(&mut self) {
        self.field.push('\n');
    }

    /// Fields of the record; a blank record has none.
    fn finish(mut self) -> Vec<String> {
        if !self.touched {
            return Vec::new();
        }
        self.fields.push(self.field);
        self.fields
    }
}

/// One logical record and the line it starts on.
#[derive(Debug)]
struct Row {
    line: usize,
    fields: Vec<String>,
}

/// Split a delimited stream into records. Line terminators (`\n` or `\r\n`)
/// never leak into fields; breaks inside quoted fields are kept as `\n`.
fn read_rows<R: BufRead>(mut reader: R, path: &Path, csv: &CsvParameters) -> Result<Vec<Row>, LoadError> {
    let artifact = "results";
    let mut rows = Vec::new();
    let mut buf = String::new();
    let mut line_no = 0;
    let mut open: Option<(usize, FieldSplitter)> = None;
    loop {
        buf.clear();
        if reader.read_line(&mut buf).map_err(|e| LoadError::io(artifact, path, e))? == 0 {
            break;
        }
        line_no += 1;
        let line = buf.strip_suffix('\n').unwrap_or(buf.as_str());
        let line = line.strip_suffix('\r').unwrap_or(line);

        let (start, mut splitter) = match open.take() {
            Some((start, mut splitter)) => {
                splitter.continue_line();
                (start, splitter)
            }
            None => (line_no, FieldSplitter::default()),
        };
        splitter.feed(line, csv);
        if splitter.in_quotes {
            open = Some((start, splitter));
        } else {
            rows.push(Row { line: start, fields: splitter.finish() });
        }
    }
    match open {
        Some((start, _)) => Err(LoadError::Invalid {
            artifact,
            reason: format!("{}:{start}: quoted field is never closed", path.display()),
        }),
        None => Ok(rows),
    }
}

/// Read a ranked result list, keeping the first `topn` posts per topic in file order.
/// Rows are expected to be sorted by rank already; they are not re-sorted.
pub fn read_results(path: &Path, topn: usize, csv: &CsvParameters) -> Result<ResultSet, LoadError> {
    let f = File::open(path).map_err(|e| LoadError::io("results", path, e))?;
    let mut results = ResultSet::new();
    for Row { line, fields } in read_rows(BufReader::new(f), path, csv)? {
        let [topic_id, post_id, _rank, _score, _description]: [String; 5] = fields
            .try_into()
            .map_err(|fields: Vec<String>| LoadError::MalformedRow {
                path: path.to_path_buf(),
                line,
                fields: fields.len(),
            })?;
        let posts = results.entry(topic_id).or_default();
        if posts.len() < topn {
            posts.push(post_id);
        }
    }
    tracing::info!(path = %path.display(), topics = results.len(), "loaded search results");
    Ok(results)
}
