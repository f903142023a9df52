//! # Tree Benchmarks
//!
//! Performance benchmarks for pagecast-core tree walks and broadcasts.
//!
//! Run with: `cargo bench -p pagecast-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pagecast_core::{
    ComponentKind, ComponentNode, MutationEngine, Observer, ObserverEvent, ObserverHub, Page,
    PagecastError, Properties, TreeStore,
};
use serde_json::{Value, json};
use std::hint::black_box;

fn text(id: String) -> ComponentNode {
    let props = match json!({ "content": id.clone() }) {
        Value::Object(map) => map,
        _ => Properties::new(),
    };
    ComponentNode::new(id, ComponentKind::Text, props)
}

/// A page with `size` cards nested one inside the next.
fn create_deep_page(size: usize) -> Page {
    let mut node = text(format!("leaf-{}", size));
    for i in (0..size).rev() {
        node = ComponentNode::new(format!("card-{}", i), ComponentKind::Card, Properties::new())
            .with_children(vec![node]);
    }
    Page::new("default", "Deep", vec![node])
}

/// A page with `size` text nodes at the root.
fn create_wide_page(size: usize) -> Page {
    Page::new(
        "default",
        "Wide",
        (0..size).map(|i| text(format!("text-{}", i))).collect(),
    )
}

struct Sink;

impl Observer for Sink {
    fn is_open(&self) -> bool {
        true
    }

    fn deliver(&self, message: &str) -> Result<(), PagecastError> {
        black_box(message.len());
        Ok(())
    }
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_find_node(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_node");

    for size in [10, 100, 500].iter() {
        let deep = create_deep_page(*size);
        let wide = create_wide_page(*size);

        group.bench_with_input(BenchmarkId::new("deep", size), size, |b, &size| {
            let target = format!("leaf-{}", size);
            b.iter(|| black_box(deep.find_node(&target)));
        });

        group.bench_with_input(BenchmarkId::new("wide", size), size, |b, &size| {
            let target = format!("text-{}", size - 1);
            b.iter(|| black_box(wide.find_node(&target)));
        });
    }

    group.finish();
}

fn bench_add_component(c: &mut Criterion) {
    let mut group = c.benchmark_group("add_component");

    for size in [100, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut engine =
                    MutationEngine::with_store(TreeStore::with_default_page(create_wide_page(0)));
                for i in 0..size {
                    let _ = engine.execute(
                        "add_component",
                        json!({ "type": "text", "props": { "content": i.to_string() } }),
                    );
                }
                black_box(engine)
            });
        });
    }

    group.finish();
}

fn bench_broadcast(c: &mut Criterion) {
    let mut group = c.benchmark_group("broadcast");
    let page = create_wide_page(200);

    for observers in [1, 10, 100].iter() {
        let mut hub = ObserverHub::new();
        for _ in 0..*observers {
            hub.register(Box::new(Sink), &page).expect("register");
        }
        let event = ObserverEvent::snapshot(&page);

        group.bench_with_input(BenchmarkId::from_parameter(observers), &event, |b, event| {
            b.iter(|| black_box(hub.broadcast(event)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_find_node, bench_add_component, bench_broadcast);
criterion_main!(benches);
