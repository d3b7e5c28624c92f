use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ndspan::{map, reduce, transpose, Interval, NdArray};

fn bench_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("map");
    for size in [64usize, 256, 1024] {
        let elements = size * size;
        group.throughput(Throughput::Elements(elements as u64));

        let a = NdArray::from_fn(&[size as isize, size as isize], |s| {
            (s[0] * size as isize + s[1]) as f64
        });
        let strided = a.slice(&[
            Interval::new(0, size as isize - 1).step_by(1),
            Interval::new(0, size as isize - 1).step_by(1),
        ]);

        // contiguous arrays take the direct buffer pass
        group.bench_with_input(BenchmarkId::new("contiguous", size), &size, |b, _| {
            b.iter(|| map(&a, |x| x * 2.0));
        });

        // same elements through the general cursor
        group.bench_with_input(BenchmarkId::new("cursor", size), &size, |b, _| {
            b.iter(|| map(&strided, |x| x * 2.0));
        });
    }
    group.finish();
}

fn bench_reduce(c: &mut Criterion) {
    let mut group = c.benchmark_group("reduce");
    for size in [64usize, 256, 1024] {
        group.throughput(Throughput::Elements((size * size) as u64));
        let a = NdArray::from_fn(&[size as isize, size as isize], |s| {
            (s[0] * size as isize + s[1]) as f64
        });
        group.bench_with_input(BenchmarkId::new("sum", size), &size, |b, _| {
            b.iter(|| reduce(&a, |x, acc: f64| acc + x));
        });
    }
    group.finish();
}

fn bench_transpose(c: &mut Criterion) {
    let mut group = c.benchmark_group("transpose");
    for size in [64usize, 256] {
        group.throughput(Throughput::Elements((size * size) as u64));
        let a = NdArray::from_fn(&[size as isize, size as isize], |s| {
            (s[0] * size as isize + s[1]) as f64
        });
        group.bench_with_input(BenchmarkId::new("2d", size), &size, |b, _| {
            b.iter(|| transpose(&a, &[1, 0]));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_map, bench_reduce, bench_transpose);
criterion_main!(benches);
