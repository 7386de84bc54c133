use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use evcalc::parser::{calculate_duration, extract_events_from_text, preprocess_event_text};

// Build a pasted calendar listing with `count` events on one collapsed line
fn generate_paste(count: usize) -> String {
    (0..count)
        .map(|i| {
            let start = i % 11 + 1;
            format!("Meeting {} on Jan {} at {}:00 AM - {}:30 PM", i, i % 28 + 1, start, start)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn benchmark_duration(c: &mut Criterion) {
    c.bench_function("calculate_duration", |b| {
        b.iter(|| calculate_duration(black_box("11:15 PM"), black_box("1:45 AM")))
    });
}

fn benchmark_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_events");
    for count in [1, 10, 100] {
        let text = generate_paste(count);
        group.bench_with_input(BenchmarkId::new("collapsed", count), &text, |b, text| {
            b.iter(|| extract_events_from_text(black_box(text)))
        });
        let html = format!("<div>{}</div><p>Notes</p>", text.replace(" Meeting", "<br>Meeting"));
        group.bench_with_input(BenchmarkId::new("html", count), &html, |b, html| {
            b.iter(|| extract_events_from_text(black_box(html)))
        });
    }
    group.finish();
}

fn benchmark_preprocess(c: &mut Criterion) {
    let text = generate_paste(50);
    c.bench_function("preprocess_event_text", |b| {
        b.iter(|| preprocess_event_text(black_box(&text)))
    });
}

criterion_group!(benches, benchmark_duration, benchmark_extraction, benchmark_preprocess);
criterion_main!(benches);
