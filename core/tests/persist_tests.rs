use serp_core::persist::{
    load_artifacts, load_dictionary, load_phraser, load_tfidf_documents, load_word_similarities, save_dictionary,
    save_phraser, save_tfidf_documents, save_tfidf_queries, save_word_similarities, ArtifactPaths, LoadError,
};
use serp_core::results::{read_results, CsvParameters};
use serp_core::tfidf::LocalWeighting;
use serp_core::{CscMatrix, Dictionary, Phraser, SparseTermSimilarityMatrix, TfidfModel};
use std::collections::HashMap;
use std::fs;
use tempfile::tempdir;

fn write_artifacts(paths: &ArtifactPaths) {
    let mut token2id = HashMap::new();
    token2id.insert("integr".to_string(), 0);
    token2id.insert("deriv".to_string(), 1);
    let mut dictionary = Dictionary::from_token2id(token2id);
    dictionary.num_docs = 10;
    save_dictionary(paths, &dictionary).unwrap();

    let idfs: HashMap<u32, f64> = [(0, 1.5), (1, 0.5)].into_iter().collect();
    save_tfidf_queries(paths, &TfidfModel::new(idfs.clone(), LocalWeighting::Raw, true)).unwrap();
    save_tfidf_documents(paths, &TfidfModel::new(idfs, LocalWeighting::Log, true)).unwrap();

    let matrix = CscMatrix::from_triplets((2, 2), &[(0, 1, 0.25), (1, 0, 0.25), (0, 0, 1.0)]);
    save_word_similarities(paths, &SparseTermSimilarityMatrix { matrix }).unwrap();

    let phraser = Phraser::new(1.0, [("partial_deriv".to_string(), 3.0)].into_iter().collect());
    save_phraser(paths, &phraser).unwrap();
}

#[test]
fn loads_saved_artifacts() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    write_artifacts(&paths);
    fs::write(paths.results(), "A.1\t10\t1\t0.9\trun\nA.1\t11\t2\t0.8\trun\nA.2\t12\t1\t0.7\trun\n").unwrap();

    let bundle = load_artifacts(&paths, 5, &CsvParameters::default()).unwrap();
    assert_eq!(bundle.dictionary.get("deriv"), Some(1));
    assert_eq!(bundle.dictionary.num_docs, 10);
    assert_eq!(bundle.tfidf_documents.local, LocalWeighting::Log);
    assert_eq!(bundle.word_similarities.shape(), (2, 2));
    assert_eq!(bundle.word_similarities.nnz(), 3);
    assert_eq!(bundle.word_similarities.get(1, 0), 0.25);
    assert!(bundle.phraser.phrasegrams.contains_key("partial_deriv"));
    assert_eq!(bundle.results["A.1"], vec!["10".to_string(), "11".to_string()]);
    assert_eq!(bundle.results["A.2"], vec!["12".to_string()]);
}

#[test]
fn missing_artifact_is_reported_as_missing() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    match load_dictionary(&paths) {
        Err(LoadError::Missing { artifact, path }) => {
            assert_eq!(artifact, "dictionary");
            assert_eq!(path, paths.dictionary());
        }
        other => panic!("expected missing artifact, got {other:?}"),
    }
}

#[test]
fn corrupt_artifact_is_reported_as_corrupt() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    fs::write(paths.tfidf_documents(), [1u8, 2, 3]).unwrap();
    assert!(matches!(load_tfidf_documents(&paths), Err(LoadError::Corrupt { .. })));
    fs::write(paths.phraser(), Vec::<u8>::new()).unwrap();
    assert!(matches!(load_phraser(&paths), Err(LoadError::Corrupt { .. })));
}

#[test]
fn structurally_invalid_matrix_is_rejected() {
    let dir = tempdir().unwrap();
    let paths = ArtifactPaths::new(dir.path());
    let mut matrix = CscMatrix::from_triplets((2, 2), &[(0, 1, 0.25)]);
    matrix.data.push(0.5);
    save_word_similarities(&paths, &SparseTermSimilarityMatrix { matrix }).unwrap();
    assert!(matches!(load_word_similarities(&paths), Err(LoadError::Invalid { .. })));
}

#[test]
fn results_keep_first_topn_rows_in_file_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results");
    let rows: String = [8, 3, 5, 1, 7, 2, 6, 4]
        .iter()
        .enumerate()
        .map(|(i, post)| format!("T1\tp{post}\t{}\t{}\tdesc\n", 8 - i, i))
        .collect();
    fs::write(&path, rows).unwrap();
    let results = read_results(&path, 5, &CsvParameters::default()).unwrap();
    assert_eq!(results["T1"], vec!["p8", "p3", "p5", "p1", "p7"]);
}

#[test]
fn results_row_with_wrong_field_count_is_fatal() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results");
    fs::write(&path, "T1\tp1\t1\t0.5\tdesc\nT1\tp2\t2\n").unwrap();
    match read_results(&path, 5, &CsvParameters::default()) {
        Err(LoadError::MalformedRow { line, fields, .. }) => {
            assert_eq!(line, 2);
            assert_eq!(fields, 3);
        }
        other => panic!("expected malformed row, got {other:?}"),
    }
}

#[test]
fn empty_results_file_gives_empty_result_set() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results");
    fs::write(&path, "").unwrap();
    assert!(read_results(&path, 5, &CsvParameters::default()).unwrap().is_empty());
}

#[test]
fn results_honour_custom_delimiter() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results");
    fs::write(&path, "T1,p1,1,0.5,\"a, b\"\r\n").unwrap();
    let csv = CsvParameters { delimiter: ',', quote: '"' };
    assert_eq!(read_results(&path, 1, &csv).unwrap()["T1"], vec!["p1"]);
}

#[test]
fn results_description_may_span_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results");
    fs::write(&path, "T1\tp1\t1\t0.5\t\"two\r\nlines\"\r\nT1\tp2\t2\t0.4\trun\r\nT2\tp3\t1\t0.3\trun\r\n").unwrap();
    let results = read_results(&path, 5, &CsvParameters::default()).unwrap();
    assert_eq!(results["T1"], vec!["p1", "p2"]);
    assert_eq!(results["T2"], vec!["p3"]);
}

#[test]
fn malformed_row_reports_the_line_it_starts_on() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results");
    fs::write(&path, "T1\tp1\t1\t0.5\t\"two\nlines\"\nT1\tp2\t\"x\ny\"\n").unwrap();
    match read_results(&path, 5, &CsvParameters::default()) {
        Err(LoadError::MalformedRow { line, fields, .. }) => {
            assert_eq!(line, 3);
            assert_eq!(fields, 3);
        }
        other => panic!("expected malformed row, got {other:?}"),
    }
}
