use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

/// English function words, dropped before stemming.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are", "as", "at",
    "be", "because", "been", "before", "being", "below", "between", "both", "but", "by", "can", "cannot",
    "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for", "from", "further", "had",
    "has", "have", "having", "he", "her", "here", "hers", "herself", "him", "himself", "his", "how", "i", "if",
    "in", "into", "is", "it", "its", "itself", "me", "more", "most", "my", "myself", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over", "own",
    "same", "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom", "why", "with",
    "would", "you", "your", "yours", "yourself", "yourselves",
];

lazy_static! {
    // A word starts with a letter; a bare digit run is a number.
    static ref TERM: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*|\p{N}+").expect("term pattern compiles");
    static ref ENGLISH: Stemmer = Stemmer::create(Algorithm::English);
    static ref STOPWORD_SET: HashSet<&'static str> = STOPWORDS.iter().copied().collect();
}

fn normalize(text: &str) -> String {
    text.nfkc().collect::<String>().to_lowercase()
}

fn stem(word: &str) -> String {
    if word.chars().all(char::is_numeric) {
        word.to_owned()
    } else {
        ENGLISH.stem(word).into_owned()
    }
}

/// Turn free text into the terms the dictionary is keyed by.
pub fn tokenize(text: &str) -> Vec<String> {
    let text = normalize(text);
    let mut terms = Vec::new();
    for word in TERM.find_iter(&text).map(|m| m.as_str()) {
        if STOPWORD_SET.contains(word) {
            continue;
        }
        terms.push(stem(word));
    }
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_pass_through_between_stemmed_words() {
        assert_eq!(tokenize("Proving 2 integrals"), vec!["prove", "2", "integr"]);
    }

    #[test]
    fn compatibility_forms_fold_before_matching() {
        // U+FB01 is the "fi" ligature.
        assert_eq!(tokenize("\u{FB01}eld"), tokenize("field"));
    }
}
