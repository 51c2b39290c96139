use chrono::{Duration, NaiveDate};
use core_lesson::{TargetHeading, extract, extract_from_reader};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::io::Cursor;

// A school year of daily sections, ~20 lines each with blank runs.
fn build_document(days: i64) -> (String, NaiveDate) {
    let start = NaiveDate::from_ymd_opt(2024, 9, 2).unwrap();
    let mut doc = String::from("# Lesson planning\n\n");
    for offset in 0..days {
        let date = start + Duration::days(offset);
        doc.push_str(&TargetHeading::for_date(date).to_string());
        doc.push('\n');
        for period in 1..=6 {
            doc.push_str(&format!("#### Period {period}\n- objective\n- activity\n\n\n"));
        }
    }
    let last = start + Duration::days(days - 1);
    (doc, last)
}

fn bench_extract(c: &mut Criterion) {
    let (doc, last) = build_document(180);
    let target = TargetHeading::for_date(last);
    let lines: Vec<&str> = doc.lines().collect();

    c.bench_function("extract_last_section_in_memory", |b| {
        b.iter(|| black_box(extract(black_box(&lines), &target)))
    });
    c.bench_function("extract_last_section_streaming", |b| {
        b.iter(|| {
            black_box(extract_from_reader(Cursor::new(black_box(doc.as_bytes())), &target))
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
