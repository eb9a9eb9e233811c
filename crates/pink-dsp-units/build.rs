// SPDX-License-Identifier: LGPL-3.0-or-later

// Build script: compile the C reference generator for A/B testing.
// Built without FMA contraction so the float scaling rounds the same way
// as the Rust code.

fn main() {
    #[cfg(feature = "c-ref")]
    build_c_ref();
}

#[cfg(feature = "c-ref")]
fn build_c_ref() {
    println!("cargo:rerun-if-changed=c_ref/pink_ref.c");
    println!("cargo:rerun-if-changed=c_ref/pink_ref.h");

    cc::Build::new()
        .file("c_ref/pink_ref.c")
        .include("c_ref")
        .flag_if_supported("-std=c99")
        .flag_if_supported("-O2")
        .flag_if_supported("-ffp-contract=off")
        .warnings(false)
        .compile("pink_dsp_ref");
}
