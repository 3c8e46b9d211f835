use serp_core::tokenizer::tokenize;
use serp_core::Phraser;

#[test]
fn stems_inflected_forms_to_one_term() {
    let terms = tokenize("Solving SOLVED solves");
    assert_eq!(terms.len(), 3);
    assert!(terms.iter().all(|t| t == &terms[0]));
}

#[test]
fn keeps_accented_letters() {
    let terms = tokenize("Poincaré conjecture");
    assert!(terms.iter().any(|t| t.starts_with("poincaré")));
}

#[test]
fn drops_function_words() {
    let terms = tokenize("What is the derivative of a sum");
    assert_eq!(terms.len(), 2);
    for word in ["what", "is", "the", "of", "a"] {
        assert!(!terms.iter().any(|t| t == word));
    }
}

#[test]
fn phraser_runs_on_tokenizer_output() {
    let phraser = Phraser::new(0.5, [("linear_algebra".to_string(), 2.0)].into_iter().collect());
    let terms = phraser.apply(tokenize("Eigenvalues in linear algebra"));
    assert!(terms.contains(&"linear_algebra".to_string()));
    assert!(!terms.contains(&"linear".to_string()));
}
