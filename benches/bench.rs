use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use sortcore::patterns;

fn batch_size(test_size: usize) -> BatchSize {
    if test_size > 30 {
        BatchSize::LargeInput
    } else {
        BatchSize::SmallInput
    }
}

#[inline(never)]
fn bench_sort(
    c: &mut Criterion,
    test_size: usize,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<i32>,
) {
    c.bench_function(&format!("sort-sortcore-{pattern_name}-{test_size}"), |b| {
        b.iter_batched(
            || pattern_provider(test_size),
            |mut test_data| sortcore::sort(black_box(test_data.as_mut_slice())),
            batch_size(test_size),
        )
    });

    c.bench_function(&format!("sort-rust_std-{pattern_name}-{test_size}"), |b| {
        b.iter_batched(
            || pattern_provider(test_size),
            |mut test_data| black_box(test_data.as_mut_slice()).sort_unstable(),
            batch_size(test_size),
        )
    });
}

#[inline(never)]
fn bench_selection(
    c: &mut Criterion,
    test_size: usize,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<i32>,
) {
    if test_size < 2 {
        return;
    }

    let nth = test_size / 2;

    c.bench_function(
        &format!("nth_element-sortcore-{pattern_name}-{test_size}"),
        |b| {
            b.iter_batched(
                || pattern_provider(test_size),
                |mut test_data| sortcore::nth_element(black_box(test_data.as_mut_slice()), nth),
                batch_size(test_size),
            )
        },
    );

    c.bench_function(
        &format!("nth_element-rust_std-{pattern_name}-{test_size}"),
        |b| {
            b.iter_batched(
                || pattern_provider(test_size),
                |mut test_data| {
                    black_box(test_data.as_mut_slice()).select_nth_unstable(nth);
                },
                batch_size(test_size),
            )
        },
    );

    // Top-k selection with a k that stays small relative to the input, the
    // intended use of the bounded-heap strategy.
    let k = (test_size / 100).max(1);
    c.bench_function(
        &format!("partial_sort-sortcore-{pattern_name}-{test_size}"),
        |b| {
            b.iter_batched(
                || pattern_provider(test_size),
                |mut test_data| sortcore::partial_sort(black_box(test_data.as_mut_slice()), k),
                batch_size(test_size),
            )
        },
    );
}

#[inline(never)]
fn bench_merge(
    c: &mut Criterion,
    test_size: usize,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<i32>,
) {
    if test_size < 2 {
        return;
    }

    let mid = test_size / 2;
    let presorted = || {
        let mut v = pattern_provider(test_size);
        v[..mid].sort_unstable();
        v[mid..].sort_unstable();
        v
    };

    c.bench_function(
        &format!("inplace_merge-sortcore-{pattern_name}-{test_size}"),
        |b| {
            b.iter_batched(
                presorted,
                |mut test_data| sortcore::inplace_merge(black_box(test_data.as_mut_slice()), mid),
                batch_size(test_size),
            )
        },
    );
}

#[inline(never)]
fn bench_heap(c: &mut Criterion, test_size: usize) {
    c.bench_function(&format!("heapsort-sortcore-random-{test_size}"), |b| {
        b.iter_batched(
            || patterns::random(test_size),
            |mut test_data| {
                let v = black_box(test_data.as_mut_slice());
                sortcore::make_heap(v);
                sortcore::sort_heap(v);
            },
            batch_size(test_size),
        )
    });
}

fn ensure_true_random() {
    // Ensure that random vecs are actually different.
    let random_vec_a = patterns::random(5);
    let random_vec_b = patterns::random(5);

    assert_ne!(random_vec_a, random_vec_b);
}

fn criterion_benchmark(c: &mut Criterion) {
    let test_sizes = [11, 36, 200, 1_000, 2_048, 10_000, 100_000, 1_000_000];

    patterns::disable_fixed_seed();
    ensure_true_random();

    let pattern_providers: Vec<(&'static str, fn(usize) -> Vec<i32>)> = vec![
        ("random", patterns::random),
        ("random_dense", |size| {
            patterns::random_uniform(size, 0..=(((size as f64).log2().round()) as i32) as i32)
        }),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("saws_long", |size| {
            patterns::saw_mixed(size, ((size as f64).log2().round()) as usize)
        }),
        ("pipe_organ", patterns::pipe_organ),
    ];

    for test_size in test_sizes {
        for (pattern_name, pattern_provider) in pattern_providers.iter() {
            bench_sort(c, test_size, pattern_name, pattern_provider);
            bench_selection(c, test_size, pattern_name, pattern_provider);
            bench_merge(c, test_size, pattern_name, pattern_provider);
        }

        bench_heap(c, test_size);
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
