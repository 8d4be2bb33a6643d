use criterion::{black_box, criterion_group, criterion_main, Criterion};
use legal_advisor_core::{AdvisorEngine, Article, ArticleId, Corpus};

fn synthetic_corpus(article_count: usize) -> Corpus {
    let categories =
        ["Fundamental Rights", "Union Executive", "Parliament", "The Judiciary"];
    let articles = (0..article_count)
        .map(|idx| Article {
            id: ArticleId::new(),
            number: format!("{}", idx + 1),
            title: format!("Provision {} on governance and liberty", idx + 1),
            description: format!(
                "Constitutional provision number {} covering governance, liberty and due \
                 process across the union and the states",
                idx + 1
            ),
            category: categories[idx % categories.len()].to_string(),
            keywords: vec![format!("provision {}", idx + 1), "governance".to_string()],
        })
        .collect();
    Corpus { articles, cases: Vec::new(), procedures: Vec::new(), quick_replies: Vec::new() }
}

fn bench_score_articles(c: &mut Criterion) {
    let corpus = synthetic_corpus(1_000);
    c.bench_function("score_articles_1000", |b| {
        b.iter(|| {
            legal_advisor_core::score_articles(
                black_box("what does the constitution say about liberty and governance"),
                black_box(&corpus.articles),
            )
        });
    });
}

fn bench_process(c: &mut Criterion) {
    let engine = AdvisorEngine::default();
    let corpus = synthetic_corpus(1_000);
    c.bench_function("process_article_reference_1000", |b| {
        b.iter(|| engine.process(black_box("what is article 472?"), black_box(&corpus)));
    });
    c.bench_function("process_fallback_1000", |b| {
        b.iter(|| engine.process(black_box("zzzz qqqq unmatched"), black_box(&corpus)));
    });
}

criterion_group!(benches, bench_score_articles, bench_process);
criterion_main!(benches);
