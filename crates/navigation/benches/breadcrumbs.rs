use criterion::{Criterion, black_box, criterion_group, criterion_main};

use landacq_core::ProjectId;
use landacq_navigation::{NavigationContext, derive_for_path};

fn bench_derive(c: &mut Criterion) {
    let empty = NavigationContext::default();
    let named = NavigationContext::default().with_project(Some(ProjectId::from(5)), "Kandy Bypass");

    c.bench_function("derive_lot_detail", |b| {
        b.iter(|| derive_for_path(black_box("/fo-dashboard/plan/8039/lots/17"), black_box(&named)))
    });

    c.bench_function("derive_unmatched", |b| {
        b.iter(|| derive_for_path(black_box("/ce-dashboard/unknown/page"), black_box(&empty)))
    });
}

criterion_group!(benches, bench_derive);
criterion_main!(benches);
