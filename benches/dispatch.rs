use std::{hint::black_box, sync::Arc};

use cascadeui::{
    core::{
        msg::Msg,
        store::{subscriber, Store},
    },
    infrastructure::config::StoreConfig,
    presentation::components::{Component, CompositeComponent, StatefulButton},
};
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{json, Map};

fn store_with_subscribers(count: usize) -> Arc<Store> {
    let store = Arc::new(Store::new(&StoreConfig { history_limit: 100 }));
    for i in 0..count {
        store.subscribe(format!("view_{i}"), subscriber(|_, _| async { Ok(()) }));
    }
    store
}

fn benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().expect("failed to start tokio runtime");

    let store = store_with_subscribers(0);
    c.bench_function("dispatch-interaction", |b| {
        b.to_async(&runtime).iter(|| {
            let store = Arc::clone(&store);
            async move {
                store
                    .dispatch(
                        black_box(Msg::component_interaction("button", "view", Some(1), json!(true))),
                        Some("view"),
                    )
                    .await
            }
        })
    });

    let store = store_with_subscribers(10);
    c.bench_function("dispatch-notify-10", |b| {
        b.to_async(&runtime).iter(|| {
            let store = Arc::clone(&store);
            async move {
                store
                    .dispatch(black_box(Msg::session_updated("user_1", Map::new())), None)
                    .await
            }
        })
    });

    let mut bar = CompositeComponent::new();
    for i in 0..5 {
        let mut row = CompositeComponent::new();
        for j in 0..5 {
            row.add_component(StatefulButton::primary(format!("{i}-{j}"), None));
        }
        bar.add_component(row);
    }
    c.bench_function("flatten-nested-composite", |b| {
        b.iter(|| black_box(&bar).items().len())
    });
}

criterion_group!(benches, benchmark);
criterion_main!(benches);
