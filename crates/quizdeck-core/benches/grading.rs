use std::collections::BTreeMap;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizdeck_core::grading::{normalize_text, GradingEngine};
use quizdeck_core::model::{AnswerKey, ChoiceOption, Question, SequenceOption};
use quizdeck_core::response::Response;

fn question(key: AnswerKey) -> Question {
    Question {
        number: "1".into(),
        text: "bench".into(),
        key,
        explanation: None,
    }
}

fn bench_grading(c: &mut Criterion) {
    let mut group = c.benchmark_group("grade");
    let engine = GradingEngine::new();

    let choice = question(AnswerKey::MultipleChoice {
        options: ["A", "B", "C", "D", "E"]
            .iter()
            .map(|k| ChoiceOption {
                key: k.to_string(),
                text: format!("option {k}"),
            })
            .collect(),
        correct: ["A", "C", "E"].iter().map(|s| s.to_string()).collect(),
    });
    let partial = Response::choices(["A", "B"]);

    let text = question(AnswerKey::TextInput {
        accepted: vec!["Mitochondria".into(), "The mitochondrion".into()],
    });
    let typed = Response::Text("  the Mitochondrion!! ".into());

    let sequence = question(AnswerKey::Sequence {
        options: (1..=5)
            .map(|id| SequenceOption {
                id,
                text: format!("step {id}"),
            })
            .collect(),
        correct_order: vec![3, 1, 4, 5, 2],
    });
    let arranged = Response::Order(vec![1, 3, 4, 2, 5]);

    let matching = question(AnswerKey::Matching {
        left_items: (0..5).map(|i| format!("left {i}")).collect(),
        right_items: (0..5).map(|i| format!("right {i}")).collect(),
        correct_matches: (0..5)
            .map(|i| (format!("left {i}"), format!("right {i}")))
            .collect(),
    });
    let placed = Response::Matches(
        (0..5)
            .map(|i| (format!("left {i}"), format!("right {}", (i + 1) % 5)))
            .collect::<BTreeMap<_, _>>(),
    );

    group.bench_function("multiple_choice", |b| {
        b.iter(|| engine.evaluate(black_box(&choice), Some(black_box(&partial))))
    });

    group.bench_function("text_input", |b| {
        b.iter(|| engine.evaluate(black_box(&text), Some(black_box(&typed))))
    });

    group.bench_function("sequence", |b| {
        b.iter(|| engine.evaluate(black_box(&sequence), Some(black_box(&arranged))))
    });

    group.bench_function("matching", |b| {
        b.iter(|| engine.evaluate(black_box(&matching), Some(black_box(&placed))))
    });

    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let long = "The Quick, Brown Fox! Jumps over the lazy dog? ".repeat(20);
    c.bench_function("normalize_text", |b| {
        b.iter(|| normalize_text(black_box(&long)))
    });
}

criterion_group!(benches, bench_grading, bench_normalize);
criterion_main!(benches);
