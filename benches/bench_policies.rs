use criterion::{black_box, criterion_group, criterion_main, Criterion};

use workshare::{Policy, WorkShare, Worker};

/// Drain a 64k-iteration loop through each policy with a four-worker team.
/// The loop body is empty, so this measures pure claim overhead.
fn bench_drain(c: &mut Criterion) {
    let nthreads = 4;
    let n = 1 << 16;

    let mut group = c.benchmark_group("drain_64k");
    let policies: &[(&str, Policy, i64)] = &[
        ("static", Policy::Static, 0),
        ("dynamic", Policy::Dynamic, 64),
        ("guided", Policy::Guided, 8),
        ("adaptive", Policy::Adaptive, 64),
    ];

    for &(name, policy, chunk) in policies {
        group.bench_function(name, |b| {
            b.iter(|| {
                let ws = WorkShare::new(policy, nthreads, 0, n, 1, chunk);
                std::thread::scope(|s| {
                    for team_id in 0..nthreads {
                        let ws = &ws;
                        s.spawn(move || {
                            let mut worker = Worker::new(team_id);
                            let mut total = 0i64;
                            while let Some((pstart, pend)) = ws.next(&mut worker) {
                                total += pend - pstart;
                            }
                            black_box(total)
                        });
                    }
                });
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_drain);
criterion_main!(benches);
