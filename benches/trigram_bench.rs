//! Criterion benchmarks for the trigram model.
//!
//! Run with: `cargo bench --bench trigram_bench`
//!
//! ## Benchmarks
//!
//! 1. **Full-batch training step** at several corpus sizes
//! 2. **Single name sampling** from a trained model

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use trigram::{sample_name, train, train_step, Config, Dataset, Model, Vocabulary};

/// Generate `count` random lowercase words of length 3..10.
fn synthetic_words(count: usize) -> Vec<String> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..count)
        .map(|_| {
            let len = rng.gen_range(3..10);
            (0..len).map(|_| rng.gen_range(b'a'..=b'z') as char).collect()
        })
        .collect()
}

fn bench_train_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("train_step");
    let config = Config::default();

    for &count in &[100usize, 1_000, 10_000] {
        let words = synthetic_words(count);
        let vocab = Vocabulary::from_words(&words);
        let dataset = Dataset::from_words(&words, &vocab).expect("synthetic words are in vocab");
        let inputs = dataset.encode_inputs(&vocab).expect("ids are in range");
        let mut model = Model::new(vocab.size(), &mut StdRng::seed_from_u64(1));

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| {
                black_box(
                    train_step(&mut model, black_box(&inputs), &dataset.labels, &config)
                        .expect("shapes match"),
                )
            });
        });
    }

    group.finish();
}

fn bench_sample_name(c: &mut Criterion) {
    let words = synthetic_words(1_000);
    let vocab = Vocabulary::from_words(&words);
    let dataset = Dataset::from_words(&words, &vocab).expect("synthetic words are in vocab");
    let inputs = dataset.encode_inputs(&vocab).expect("ids are in range");
    let config = Config {
        iterations: 50,
        ..Config::default()
    };
    let mut model = Model::new(vocab.size(), &mut StdRng::seed_from_u64(1));
    train(&mut model, &inputs, &dataset.labels, &config, |_, _| {}).expect("training succeeds");

    let mut rng = StdRng::seed_from_u64(2);
    c.bench_function("sample_name", |b| {
        b.iter(|| black_box(sample_name(&model, &vocab, &mut rng).expect("valid distribution")));
    });
}

criterion_group!(benches, bench_train_step, bench_sample_name);
criterion_main!(benches);
