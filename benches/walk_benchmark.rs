use std::fs;
use std::path::Path;

use criterion::{criterion_group, criterion_main, Criterion};
use shardwalk::{Parallelism, Walk};

fn build_tree(root: &Path, depth: usize, fanout: usize) {
    if depth == 0 {
        return;
    }
    for i in 0..fanout {
        let child = root.join(format!("d{depth}_{i}"));
        fs::create_dir(&child).unwrap();
        build_tree(&child, depth - 1, fanout);
    }
}

fn walk_benches(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    build_tree(dir.path(), 5, 5);

    c.bench_function("shardwalk (serial)", |b| {
        b.iter(|| {
            Walk::new(dir.path())
                .parallelism(Parallelism::Serial)
                .run()
                .unwrap()
        })
    });

    c.bench_function("shardwalk (shared pair)", |b| {
        b.iter(|| {
            Walk::new(dir.path())
                .parallelism(Parallelism::SharedPair)
                .run()
                .unwrap()
        })
    });

    c.bench_function("shardwalk (sharded, 2 workers)", |b| {
        b.iter(|| {
            Walk::new(dir.path())
                .parallelism(Parallelism::Sharded(2))
                .run()
                .unwrap()
        })
    });

    c.bench_function("shardwalk (sharded, n workers)", |b| {
        b.iter(|| {
            Walk::new(dir.path())
                .parallelism(Parallelism::Sharded(num_cpus::get()))
                .run()
                .unwrap()
        })
    });
}

criterion_group! {
  name = benches;
  config = Criterion::default().sample_size(10);
  targets = walk_benches
}

criterion_main!(benches);
