pub mod assemble;
pub mod config;
pub mod corpus;
pub mod dictionary;
pub mod document;
pub mod judged;
pub mod persist;
pub mod phrases;
pub mod results;
pub mod similarity;
pub mod tfidf;
pub mod tokenizer;

pub use dictionary::Dictionary;
pub use document::JsonDocument;
pub use phrases::Phraser;
pub use results::ResultSet;
pub use similarity::{CscMatrix, DokMatrix, SparseTermSimilarityMatrix};
pub use tfidf::TfidfModel;

pub type TermId = u32;
/// Topic or post identifier as it appears in the results file and corpora.
pub type TextId = String;
/// Bag-of-words entry: (term id, count in text).
pub type BowEntry = (TermId, u32);
