use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use mflow::config::{LayoutConfig, RenderConfig};
use mflow::layout::compute_layout;
use mflow::loader::{DocumentFormat, load_document};
use mflow::parser::parse_flow;
use mflow::render::render_html;
use mflow::theme::Theme;
use std::hint::black_box;

/// A flow that keeps hopping between lanes, so most arrows collide with the
/// row above and force continuation rows.
fn hopping_flow_source(lanes: usize, steps: usize) -> String {
    let mut out = String::new();
    for lane in 0..lanes {
        if lane > 0 {
            out.push_str(" • ");
        }
        out.push_str(&format!("[L{lane}]"));
    }
    out.push('\n');
    for step in 0..steps {
        out.push_str(&format!("step {step}\n"));
        if step % 3 == 2 {
            out.push_str(&format!("#checkpoint {step} (detail {step})\n"));
        }
        let target = (step * 7 + 3) % lanes;
        out.push_str(&format!("[L{target}]hop {step}\n"));
    }
    out
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    for (lanes, steps) in [(3, 50), (5, 500), (9, 5000)] {
        let source = hopping_flow_source(lanes, steps);
        let doc = load_document(&source, DocumentFormat::Plain, None).unwrap();
        let flow = parse_flow(&doc.flows[0]).unwrap();
        let config = LayoutConfig::default();
        group.bench_with_input(
            BenchmarkId::new("compute_layout", format!("{lanes}x{steps}")),
            &flow,
            |b, flow| b.iter(|| compute_layout(black_box(flow), &config).unwrap()),
        );
    }
    group.finish();
}

fn bench_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    for steps in [100, 1000] {
        let source = hopping_flow_source(5, steps);
        let theme = Theme::classic();
        let render_config = RenderConfig::default();
        let layout_config = LayoutConfig::default();
        group.bench_with_input(BenchmarkId::new("html", steps), &source, |b, source| {
            b.iter(|| {
                let doc = load_document(black_box(source), DocumentFormat::Plain, None).unwrap();
                let flow = parse_flow(&doc.flows[0]).unwrap();
                let layout = compute_layout(&flow, &layout_config).unwrap();
                render_html(&layout, &theme, &render_config, None)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_end_to_end);
criterion_main!(benches);
