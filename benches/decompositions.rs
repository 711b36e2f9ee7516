use criterion::{criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use zdense::linalg::{ZHqr, ZLu, ZSvd};
use zdense::{ZMatrix, Z};

// ---------------------------------------------------------------------------
// Helpers: seeded random complex matrices, diagonally shifted to stay regular
// ---------------------------------------------------------------------------

fn random(n: usize, m: usize, seed: u64) -> ZMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(n * m);
    for j in 0..m {
        for i in 0..n {
            let shift = if i == j { n as f64 } else { 0.0 };
            data.push(Z::new(rng.random_range(-1.0..1.0) + shift, rng.random_range(-1.0..1.0)));
        }
    }
    ZMatrix::from_vec(n, m, data)
}

fn hpd(n: usize) -> ZMatrix {
    let a = random(n, n, 99);
    &(&a.h() * &a) + &ZMatrix::eye(n)
}

// ---------------------------------------------------------------------------
// Multiply
// ---------------------------------------------------------------------------

fn matmul(c: &mut Criterion) {
    let mut g = c.benchmark_group("matmul");
    for n in [8, 32] {
        let a = random(n, n, 1);
        let b = random(n, n, 2);
        g.bench_function(format!("{n}x{n}"), |bch| {
            bch.iter(|| std::hint::black_box(&a) * std::hint::black_box(&b))
        });
    }
    g.finish();
}

// ---------------------------------------------------------------------------
// Decompositions
// ---------------------------------------------------------------------------

fn lu(c: &mut Criterion) {
    let mut g = c.benchmark_group("lu");
    for n in [8, 32] {
        let a = random(n, n, 3);
        g.bench_function(format!("{n}x{n}"), |b| {
            b.iter(|| ZLu::new(std::hint::black_box(&a)))
        });
    }
    g.finish();
}

fn qr(c: &mut Criterion) {
    let mut g = c.benchmark_group("qr");
    for (nr, nc) in [(8, 8), (32, 16)] {
        let a = random(nr, nc, 4);
        g.bench_function(format!("{nr}x{nc}"), |b| {
            b.iter(|| ZHqr::new(std::hint::black_box(&a)))
        });
    }
    g.finish();
}

fn svd(c: &mut Criterion) {
    let mut g = c.benchmark_group("svd");
    for (nr, nc) in [(8, 8), (24, 12), (12, 24)] {
        let a = random(nr, nc, 5);
        g.bench_function(format!("{nr}x{nc}"), |b| {
            b.iter(|| ZSvd::new(std::hint::black_box(&a)))
        });
    }
    g.finish();
}

fn cholesky(c: &mut Criterion) {
    let mut g = c.benchmark_group("cholesky");
    for n in [8, 32] {
        let a = hpd(n);
        g.bench_function(format!("{n}x{n}"), |b| {
            b.iter(|| std::hint::black_box(&a).cholesky())
        });
    }
    g.finish();
}

// ---------------------------------------------------------------------------
// Solve and inverse, including the cached-factor path
// ---------------------------------------------------------------------------

fn solve(c: &mut Criterion) {
    let mut g = c.benchmark_group("solve_32");
    let a = random(32, 32, 6);
    let rhs = random(32, 4, 7);
    g.bench_function("fresh_lu", |b| {
        b.iter(|| a.lu().solve(std::hint::black_box(&rhs)))
    });
    let mut cached = a.clone();
    g.bench_function("cached_lu", |b| {
        b.iter(|| cached.solve(std::hint::black_box(&rhs)))
    });
    let mut inv = a.clone();
    g.bench_function("inverse", |b| b.iter(|| inv.inverse()));
    g.finish();
}

criterion_group!(benches, matmul, lu, qr, svd, cholesky, solve);
criterion_main!(benches);
