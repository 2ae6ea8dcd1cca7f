use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tensorpool_core::node::{TensorNode, VecTensorNode};
use tensorpool_core::op::Op;
use tensorpool_runtime::{width_for, KernelRegistry, ThreadPool};

fn registry() -> Arc<KernelRegistry> {
    let mut reg = KernelRegistry::empty();
    tensorpool_runtime::select_with_probe(&mut reg, |_| false);
    Arc::new(reg)
}

fn bench_kickoff_barrier_latency(c: &mut Criterion) {
    let pool = ThreadPool::new(8, registry()).unwrap();
    let node: Arc<dyn TensorNode> = Arc::new(VecTensorNode::elementwise_unary(Op::Relu, vec![1.0; 64]));

    c.bench_function("pool_kickoff_barrier_tiny_op", |b| {
        b.iter(|| {
            pool.kickoff(black_box(node.clone()), 8);
            pool.barrier();
        })
    });
}

fn bench_width_heuristic(c: &mut Criterion) {
    c.bench_function("width_for", |b| {
        b.iter(|| width_for(black_box(4_000_000), black_box(16), black_box(0.3), black_box(250_000)))
    });
}

criterion_group!(benches, bench_kickoff_barrier_latency, bench_width_heuristic);
criterion_main!(benches);
