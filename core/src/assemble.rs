//! Builds the exported document from the loaded artifacts and corpora.
//!
//! Filtering happens in two passes: the reachability sets (seen text ids,
//! seen terms, the restricted dictionary) are computed first, then each
//! output field is produced by one filtered iteration over its source.

use crate::corpus::{Corpora, TokenMap};
use crate::document::{JsonDocument, WeightMap, FORMAT_VERSION};
use crate::persist::ArtifactBundle;
use crate::{Dictionary, DokMatrix, ResultSet, TermId, TextId, TfidfModel};
use std::collections::{BTreeMap, HashSet};

/// Every topic id and every post id in the result set.
pub fn seen_text_ids(results: &ResultSet) -> HashSet<&str> {
    results
        .iter()
        .flat_map(|(topic_id, post_ids)| std::iter::once(topic_id).chain(post_ids))
        .map(String::as_str)
        .collect()
}

/// Every raw token of the seen texts in either corpus, vocabulary or not.
pub fn seen_terms<'a>(corpora: &'a Corpora, seen_text_ids: &HashSet<&str>) -> HashSet<&'a str> {
    [&corpora.queries, &corpora.documents]
        .into_iter()
        .flat_map(|texts| texts.iter())
        .filter(|(text_id, _)| seen_text_ids.contains(text_id.as_str()))
        .flat_map(|(_, tokens)| tokens.iter().map(String::as_str))
        .collect()
}

/// Term id -> term for the seen terms the dictionary knows about.
pub fn restrict_dictionary<'a>(dictionary: &Dictionary, seen_terms: &HashSet<&'a str>) -> BTreeMap<TermId, &'a str> {
    seen_terms
        .iter()
        .filter_map(|&term| dictionary.get(term).map(|id| (id, term)))
        .collect()
}

fn encode_text(dictionary: &Dictionary, tokens: &[String]) -> Vec<String> {
    tokens.iter().filter_map(|t| dictionary.get(t)).map(|id| id.to_string()).collect()
}

fn weigh_text(dictionary: &Dictionary, model: &TfidfModel, tokens: &[String]) -> WeightMap {
    model
        .weigh(&dictionary.doc2bow(tokens))
        .into_iter()
        .map(|(id, weight)| (id.to_string(), weight))
        .collect()
}

/// Token sequences encoded as term ids. A query shadows a document with the same id.
pub fn texts(dictionary: &Dictionary, corpora: &Corpora, seen: &HashSet<&str>) -> BTreeMap<TextId, Vec<String>> {
    let mut texts: BTreeMap<&TextId, &Vec<String>> = BTreeMap::new();
    texts.extend(corpora.documents.iter());
    texts.extend(corpora.queries.iter());
    texts
        .into_iter()
        .filter(|(text_id, _)| seen.contains(text_id.as_str()))
        .map(|(text_id, tokens)| (text_id.clone(), encode_text(dictionary, tokens)))
        .collect()
}

fn weigh_corpus<'a>(
    dictionary: &'a Dictionary,
    model: &'a TfidfModel,
    corpus: &'a TokenMap,
    seen: &'a HashSet<&'a str>,
) -> impl Iterator<Item = (TextId, WeightMap)> + 'a {
    corpus
        .iter()
        .filter(move |(text_id, _)| seen.contains(text_id.as_str()))
        .map(move |(text_id, tokens)| (text_id.clone(), weigh_text(dictionary, model, tokens)))
}

/// TF-IDF vectors: queries weighted by the query model, documents by the
/// document model. A document shadows a query with the same id.
pub fn texts_bow(
    dictionary: &Dictionary,
    tfidf_queries: &TfidfModel,
    tfidf_documents: &TfidfModel,
    corpora: &Corpora,
    seen: &HashSet<&str>,
) -> BTreeMap<TextId, WeightMap> {
    let mut bows = BTreeMap::new();
    bows.extend(weigh_corpus(dictionary, tfidf_queries, &corpora.queries, seen));
    bows.extend(weigh_corpus(dictionary, tfidf_documents, &corpora.documents, seen));
    bows
}

/// Upper-triangle similarities between terms of the restricted vocabulary.
pub fn word_similarities(matrix: &DokMatrix, vocabulary: &BTreeMap<TermId, &str>) -> BTreeMap<String, WeightMap> {
    let mut similarities: BTreeMap<String, WeightMap> = BTreeMap::new();
    for (term1_id, term2_id) in matrix.nonzero() {
        if !vocabulary.contains_key(&term1_id) || !vocabulary.contains_key(&term2_id) {
            continue;
        }
        if term1_id >= term2_id {
            continue;
        }
        let similarity = matrix.get(term1_id, term2_id) as f64;
        similarities
            .entry(term1_id.to_string())
            .or_default()
            .insert(term2_id.to_string(), similarity);
    }
    similarities
}

/// Assemble the full document.
pub fn produce_json_document(bundle: &ArtifactBundle, corpora: &Corpora) -> JsonDocument {
    let dictionary = &bundle.dictionary;
    let seen = seen_text_ids(&bundle.results);

    let texts = texts(dictionary, corpora, &seen);
    tracing::info!(texts = texts.len(), "produced texts");

    let texts_bow = texts_bow(dictionary, &bundle.tfidf_queries, &bundle.tfidf_documents, corpora, &seen);
    tracing::info!(texts = texts_bow.len(), "produced texts_bow");

    let vocabulary = restrict_dictionary(dictionary, &seen_terms(corpora, &seen));
    tracing::info!(terms = vocabulary.len(), "produced dictionary");

    let word_similarities = word_similarities(&bundle.word_similarities, &vocabulary);
    tracing::info!(terms = word_similarities.len(), "produced word_similarities");

    JsonDocument {
        dictionary: vocabulary.iter().map(|(id, term)| (id.to_string(), term.to_string())).collect(),
        results: bundle.results.clone(),
        texts,
        texts_bow,
        version: FORMAT_VERSION.to_string(),
        word_similarities,
    }
}
