// SPDX-License-Identifier: LGPL-3.0-or-later

//! Criterion benchmarks for the noise generators.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pink_dsp_units::noise::{Lcg32, PinkNoise, PinkNoiseBank};

const BUF_SIZE: usize = 1024;

fn bench_lcg(c: &mut Criterion) {
    let mut group = c.benchmark_group("lcg32");

    group.bench_function("next_signed_1024", |b| {
        let mut lcg = Lcg32::new();
        b.iter(|| {
            let mut acc = 0i32;
            for _ in 0..BUF_SIZE {
                acc = acc.wrapping_add(lcg.next_signed());
            }
            black_box(acc)
        });
    });

    group.finish();
}

fn bench_pink_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("pink_noise");
    let mut output = vec![0.0f32; BUF_SIZE];

    // Cost per sample should not depend on the row count.
    for rows in [4usize, 8, 16, 30] {
        group.bench_with_input(BenchmarkId::new("process_1024", rows), &rows, |b, &rows| {
            let mut pink = PinkNoise::new(rows).expect("valid row count");
            b.iter(|| {
                pink.process_overwrite(black_box(&mut output));
            });
        });
    }

    group.finish();
}

fn bench_pink_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("pink_noise_bank");
    let channels = 8;
    let mut output = vec![0.0f32; BUF_SIZE * channels];

    group.bench_function("interleaved_8ch_1024", |b| {
        let mut bank = PinkNoiseBank::new(channels, 16, 1).expect("valid bank");
        b.iter(|| {
            bank.process_interleaved(black_box(&mut output));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_lcg, bench_pink_rows, bench_pink_bank);
criterion_main!(benches);
