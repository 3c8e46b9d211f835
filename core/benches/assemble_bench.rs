use criterion::{criterion_group, criterion_main, Criterion};
use serp_core::assemble::produce_json_document;
use serp_core::corpus::Corpora;
use serp_core::persist::ArtifactBundle;
use serp_core::tfidf::LocalWeighting;
use serp_core::{CscMatrix, Dictionary, DokMatrix, Phraser, ResultSet, TfidfModel};

const VOCAB: u32 = 2_000;

fn synthetic() -> (ArtifactBundle, Corpora) {
    let dictionary = Dictionary::from_token2id((0..VOCAB).map(|i| (format!("term{i}"), i)).collect());
    let idfs = (0..VOCAB).map(|i| (i, 1.0 + (i % 7) as f64)).collect();
    let triplets: Vec<(u32, u32, f32)> = (0..VOCAB)
        .flat_map(|i| [(i, (i * 31 + 7) % VOCAB, 0.3), ((i * 31 + 7) % VOCAB, i, 0.3)])
        .collect();
    let matrix = DokMatrix::from(&CscMatrix::from_triplets((VOCAB as usize, VOCAB as usize), &triplets));

    let mut results = ResultSet::new();
    let mut corpora = Corpora::default();
    for topic in 0..50u32 {
        let posts: Vec<String> = (0..5).map(|p| format!("{}", topic * 100 + p)).collect();
        for (k, post) in posts.iter().enumerate() {
            let tokens = (0..200).map(|t| format!("term{}", (topic * 13 + k as u32 * 17 + t * 11) % VOCAB)).collect();
            corpora.documents.insert(post.clone(), tokens);
        }
        let query = (0..10).map(|t| format!("term{}", (topic * 3 + t) % VOCAB)).collect();
        corpora.queries.insert(format!("A.{topic}"), query);
        results.insert(format!("A.{topic}"), posts);
    }

    let bundle = ArtifactBundle {
        dictionary,
        tfidf_queries: TfidfModel::new(idfs, LocalWeighting::Raw, true),
        tfidf_documents: TfidfModel::new((0..VOCAB).map(|i| (i, 2.0)).collect(), LocalWeighting::Log, true),
        word_similarities: matrix,
        phraser: Phraser::default(),
        results,
    };
    (bundle, corpora)
}

fn bench_assemble(c: &mut Criterion) {
    let (bundle, corpora) = synthetic();
    c.bench_function("produce_json_document", |b| b.iter(|| produce_json_document(&bundle, &corpora)));
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
