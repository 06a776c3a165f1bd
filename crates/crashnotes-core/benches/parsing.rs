use criterion::{black_box, criterion_group, criterion_main, Criterion};

use crashnotes_core::parser::{parse_course, parse_quiz};

fn quiz_array(n: usize) -> String {
    let questions: Vec<_> = (0..n)
        .map(|i| {
            serde_json::json!({
                "question": format!("Question {i} about [brackets] and \"quotes\"?"),
                "options": ["[a]", "{b}", "c", "d"],
                "correctAnswer": i % 4
            })
        })
        .collect();
    serde_json::to_string_pretty(&questions).unwrap()
}

fn bench_parse_quiz(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_quiz");

    let bare = quiz_array(5);
    let with_decoys = format!(
        "Sure! Counting [1, 2, 3] first, then {{\"note\": [4, 5]}}.\n```json\n{}\n```\nGood luck!",
        quiz_array(5)
    );
    let large = quiz_array(200);
    let prose = "No quiz here, only prose. ".repeat(200);

    group.bench_function("bare", |b| b.iter(|| parse_quiz(black_box(&bare))));
    group.bench_function("with_decoys", |b| {
        b.iter(|| parse_quiz(black_box(&with_decoys)))
    });
    group.bench_function("large", |b| b.iter(|| parse_quiz(black_box(&large))));
    group.bench_function("prose", |b| b.iter(|| parse_quiz(black_box(&prose))));

    group.finish();
}

fn bench_parse_course(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_course");

    let structured = serde_json::json!({
        "title": "Rust",
        "overview": "A systems language.",
        "sections": (0..5).map(|i| serde_json::json!({
            "heading": format!("Concept {i}"),
            "content": "Lorem ipsum dolor sit amet. ".repeat(20)
        })).collect::<Vec<_>>(),
        "resources": [{"name": "The Book", "url": "https://doc.rust-lang.org/book/"}]
    });
    let fenced = format!("```json\n{}\n```", serde_json::to_string_pretty(&structured).unwrap());
    let narrative = "## Concept\n\nSome markdown prose.\n\n".repeat(50);

    group.bench_function("fenced_json", |b| b.iter(|| parse_course(black_box(&fenced))));
    group.bench_function("narrative", |b| {
        b.iter(|| parse_course(black_box(&narrative)))
    });

    group.finish();
}

criterion_group!(benches, bench_parse_quiz, bench_parse_course);
criterion_main!(benches);
