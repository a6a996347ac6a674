use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizdeck_core::parser::{parse_questions_str, validate_questions};

const HEADER: &str = "QuestionNumber,QuestionText,QuestionType,OptionA,OptionB,OptionC,OptionD,Answer 1,Answer 2,BlankAnswers,LeftItems,RightItems,CorrectMatches,Explanation\n";

fn question_file(rows: usize) -> String {
    let mut csv = String::from(HEADER);
    for i in 0..rows {
        let row = match i % 6 {
            0 => format!("{i},Which options apply to {i}?,,red,green,blue,black,A,C,,,,,Primary colours.\n"),
            1 => format!("{i},Statement {i} holds,,True,False,,,True,,,,,,\n"),
            2 => format!("{i},Name item {i},,,,,,Answer {i},,,,,,\n"),
            3 => format!("{i},The ___ of {i} is ___,,,,,,,,\"first, second\",,,,\n"),
            4 => format!("{i},Match set {i},,,,,,,,,\"a, b, c\",\"x, y, z\",\"a-x, b-y, c-z\",\n"),
            _ => format!("{i},Order steps {i},sequence,one,two,three,,3,1,,,,,\n"),
        };
        csv.push_str(&row);
    }
    csv
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_questions");

    let small = question_file(30);
    let large = question_file(1_000);

    group.bench_function("30_rows", |b| {
        b.iter(|| parse_questions_str(black_box(&small)))
    });

    group.bench_function("1000_rows", |b| {
        b.iter(|| parse_questions_str(black_box(&large)))
    });

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let questions = parse_questions_str(&question_file(1_000)).unwrap_or_default();
    c.bench_function("validate_questions", |b| {
        b.iter(|| validate_questions(black_box(&questions)))
    });
}

criterion_group!(benches, bench_parse, bench_validate);
criterion_main!(benches);
