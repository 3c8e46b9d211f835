use crate::ResultSet;
use anyhow::Result;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::BTreeMap;
use std::io::Write;

pub const FORMAT_VERSION: &str = "1";

/// Term id (as a string) -> weight.
pub type WeightMap = BTreeMap<String, f64>;

/// The exported document. All mappings are `BTreeMap`s keyed by strings, so
/// serialization emits keys in sorted order. Fields are declared in sorted
/// order for the same reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonDocument {
    pub dictionary: BTreeMap<String, String>,
    pub results: ResultSet,
    pub texts: BTreeMap<String, Vec<String>>,
    pub texts_bow: BTreeMap<String, WeightMap>,
    pub version: String,
    pub word_similarities: BTreeMap<String, WeightMap>,
}

impl Default for JsonDocument {
    fn default() -> Self {
        Self {
            version: FORMAT_VERSION.to_string(),
            results: ResultSet::new(),
            texts: BTreeMap::new(),
            texts_bow: BTreeMap::new(),
            dictionary: BTreeMap::new(),
            word_similarities: BTreeMap::new(),
        }
    }
}

/// Write the document as JSON indented by four spaces.
pub fn write_json_document<W: Write>(document: &JsonDocument, writer: W) -> Result<()> {
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = Serializer::with_formatter(writer, formatter);
    document.serialize(&mut serializer)?;
    Ok(())
}

/// Render the document to a string, as `write_json_document` would write it.
pub fn to_json_string(document: &JsonDocument) -> Result<String> {
    let mut buf = Vec::new();
    write_json_document(document, &mut buf)?;
    Ok(String::from_utf8(buf)?)
}
