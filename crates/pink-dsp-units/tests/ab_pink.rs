#![cfg(feature = "c-ref")]
// SPDX-License-Identifier: LGPL-3.0-or-later
//
// A/B reference tests: compare the Rust pink noise generator and LCG
// against the C reference in c_ref/.
//
// Both sides use 32-bit integer arithmetic and a single float multiply per
// sample, so the outputs must match bit for bit.

use pink_dsp_units::noise::{Lcg32, PinkNoise};

// ─── FFI bindings to the C reference ────────────────────────────────────

const REF_PINK_MAX_ROWS: usize = 30;

#[repr(C)]
struct RefPink {
    rows: [i32; REF_PINK_MAX_ROWS],
    running_sum: i32,
    index: u32,
    index_mask: u32,
    scale: f32,
    seed: u32,
}

unsafe extern "C" {
    fn ref_lcg_next(seed: *mut u32) -> u32;
    fn ref_pink_init(pink: *mut RefPink, num_rows: i32, seed: u32) -> i32;
    fn ref_pink_sample(pink: *mut RefPink) -> f32;
    fn ref_pink_fill(pink: *mut RefPink, dst: *mut f32, count: u32);
}

fn ref_pink(num_rows: usize, seed: u32) -> RefPink {
    let mut pink = RefPink {
        rows: [0; REF_PINK_MAX_ROWS],
        running_sum: 0,
        index: 0,
        index_mask: 0,
        scale: 0.0,
        seed: 0,
    };
    let rc = unsafe { ref_pink_init(&mut pink, num_rows as i32, seed) };
    assert_eq!(rc, 0, "C reference rejected num_rows={num_rows}");
    pink
}

fn assert_bits_match(name: &str, rust: &[f32], c: &[f32]) {
    assert_eq!(rust.len(), c.len(), "{name}: length mismatch");
    for (i, (r, c)) in rust.iter().zip(c.iter()).enumerate() {
        assert_eq!(
            r.to_bits(),
            c.to_bits(),
            "{name}: mismatch at sample {i}: rust={r}, c={c}"
        );
    }
}

// ─── LCG ────────────────────────────────────────────────────────────────

#[test]
fn ab_lcg_sequence() {
    for seed in [0u32, 1, 22_222, 0x8000_0000, u32::MAX] {
        let mut rust = Lcg32::with_seed(seed);
        let mut c_seed = seed;
        for i in 0..10_000 {
            let c = unsafe { ref_lcg_next(&mut c_seed) };
            assert_eq!(rust.next_u32(), c, "seed={seed} step {i}");
        }
    }
}

// ─── Pink noise ─────────────────────────────────────────────────────────

#[test]
fn ab_pink_sample_by_sample() {
    for rows in [1, 2, 4, 8, 16, 24, 30] {
        let mut rust = PinkNoise::with_seed(rows, 22_222).unwrap();
        let mut c = ref_pink(rows, 22_222);
        for i in 0..50_000 {
            let r = rust.generate_sample();
            let cs = unsafe { ref_pink_sample(&mut c) };
            assert_eq!(r.to_bits(), cs.to_bits(), "rows={rows} sample {i}");
        }
        assert_eq!(rust.running_sum(), c.running_sum);
        assert_eq!(rust.index(), c.index);
        assert_eq!(rust.rows(), &c.rows[..rows]);
    }
}

#[test]
fn ab_pink_block_fill() {
    let len = 1 << 18;
    let mut rust = PinkNoise::with_seed(16, 0xC0FF_EE00).unwrap();
    let mut c = ref_pink(16, 0xC0FF_EE00);

    let mut rust_out = vec![0.0f32; len];
    let mut c_out = vec![0.0f32; len];
    rust.process_overwrite(&mut rust_out);
    unsafe { ref_pink_fill(&mut c, c_out.as_mut_ptr(), len as u32) };

    assert_bits_match("pink_block_fill", &rust_out, &c_out);
}

#[test]
fn ab_pink_scale() {
    for rows in 1..=REF_PINK_MAX_ROWS {
        let rust = PinkNoise::new(rows).unwrap();
        let c = ref_pink(rows, 0);
        assert_eq!(rust.scale().to_bits(), c.scale.to_bits(), "rows={rows}");
        assert_eq!(rust.index_mask(), c.index_mask, "rows={rows}");
    }
}

#[test]
fn ab_pink_rejects_same_row_counts() {
    for rows in [0i32, 31, 40] {
        let mut c = RefPink {
            rows: [0; REF_PINK_MAX_ROWS],
            running_sum: 0,
            index: 0,
            index_mask: 0,
            scale: 0.0,
            seed: 0,
        };
        let rc = unsafe { ref_pink_init(&mut c, rows, 0) };
        assert_eq!(rc, -1);
        assert!(PinkNoise::new(rows as usize).is_err());
    }
}
