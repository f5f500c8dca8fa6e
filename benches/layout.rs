use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use simple_timeline::config::LayoutConfig;
use simple_timeline::ir::{EventId, EventInput, TimelineEvent};
use simple_timeline::layout::{FixedMeasurer, Surface, TextLabelMeasurer, compute_layout};
use simple_timeline::parser::parse_input;
use simple_timeline::render::render_svg;
use simple_timeline::theme::Theme;
use simple_timeline::timeline::Timeline;
use std::hint::black_box;

// Dates cluster in bursts so neighbouring labels collide and stack.
fn clustered_source(events: usize) -> String {
    let mut out = String::from("timeline\n");
    for i in 0..events {
        let day = 1 + (i / 4) % 28;
        let month = 1 + (i / 112) % 12;
        out.push_str(&format!(
            "2021-{month:02}-{day:02} : Event number {i} with a description\n"
        ));
    }
    out
}

fn spread_source(events: usize) -> String {
    let mut out = String::from("timeline\n");
    for i in 0..events {
        let year = 1900 + i;
        out.push_str(&format!("{year}-06-01 : Year {year}\n"));
    }
    out
}

fn events_for(source: &str) -> Vec<TimelineEvent> {
    parse_input(source)
        .expect("parse failed")
        .events
        .into_iter()
        .enumerate()
        .map(|(idx, input)| TimelineEvent::from_input(EventId(idx), input))
        .collect()
}

const SIZES: [usize; 4] = [10, 50, 200, 1000];

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    for size in SIZES {
        let input = clustered_source(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, data| {
            b.iter(|| {
                let parsed = parse_input(black_box(data)).expect("parse failed");
                black_box(parsed.events.len());
            });
        });
    }
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let config = LayoutConfig::default();
    let surface = Surface::new(1200.0, 400.0);
    let measurer = FixedMeasurer::new(120.0, 40.0);
    let sources: [(&str, fn(usize) -> String); 2] =
        [("clustered", clustered_source), ("spread", spread_source)];
    for (label, source) in sources {
        for size in SIZES {
            let events = events_for(&source(size));
            group.bench_with_input(
                BenchmarkId::new(label, size),
                &events,
                |b, events| {
                    b.iter(|| {
                        let props = compute_layout(black_box(events), &config, surface, &measurer);
                        black_box(props.height);
                    });
                },
            );
        }
    }
    group.finish();
}

fn bench_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("incremental_add");
    for size in [50usize, 200] {
        let inputs: Vec<EventInput> = parse_input(&clustered_source(size))
            .expect("parse failed")
            .events;
        group.bench_with_input(BenchmarkId::from_parameter(size), &inputs, |b, inputs| {
            b.iter(|| {
                let mut timeline = Timeline::new(
                    Vec::new(),
                    LayoutConfig::default(),
                    Surface::new(1200.0, 400.0),
                    FixedMeasurer::new(120.0, 40.0),
                )
                .expect("timeline");
                for input in inputs {
                    timeline.add_events(vec![input.clone()]);
                }
                black_box(timeline.properties().height);
            });
        });
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    let theme = Theme::classic();
    let mut config = LayoutConfig::default();
    config.fast_text_metrics = true;
    for size in [10usize, 200] {
        let input = clustered_source(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &input, |b, data| {
            b.iter(|| {
                let parsed = parse_input(black_box(data)).expect("parse failed");
                let measurer = TextLabelMeasurer::new(&theme, &config);
                let timeline = Timeline::new(
                    parsed.events,
                    config.clone(),
                    Surface::new(1200.0, 400.0),
                    measurer,
                )
                .expect("timeline");
                let svg = render_svg(timeline.properties(), timeline.events(), &theme, &config);
                black_box(svg.len());
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_parse,
    bench_layout,
    bench_incremental,
    bench_end_to_end
);
criterion_main!(benches);
