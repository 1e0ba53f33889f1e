use criterion::{Criterion, black_box, criterion_group, criterion_main};
use quote_engine::{PricingMode, QuoteInput, QuoteSession, derive, format_breakdown};

fn bench_derive(c: &mut Criterion) {
    let hourly = QuoteInput::default();
    let fixed = QuoteInput {
        mode: PricingMode::Fixed,
        materials: 450.0,
        retainage_pct: 10.0,
        planned_hours: Some(32.0),
        ..QuoteInput::default()
    };

    c.bench_function("derive_hourly", |b| {
        b.iter(|| black_box(derive(black_box(&hourly))));
    });
    c.bench_function("derive_fixed", |b| {
        b.iter(|| black_box(derive(black_box(&fixed))));
    });
}

fn bench_session_edit(c: &mut Criterion) {
    let mut session = QuoteSession::default();
    c.bench_function("session_set_named", |b| {
        b.iter(|| {
            session.set_named("rate", black_box("72.50")).unwrap();
        });
    });
}

fn bench_breakdown(c: &mut Criterion) {
    let input = QuoteInput::default();
    let output = derive(&input);
    c.bench_function("format_breakdown", |b| {
        b.iter(|| black_box(format_breakdown(&input, &output)));
    });
}

criterion_group!(benches, bench_derive, bench_session_edit, bench_breakdown);
criterion_main!(benches);
