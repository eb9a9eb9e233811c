// SPDX-License-Identifier: LGPL-3.0-or-later

//! Shared helpers for the pink DSP GStreamer elements.
//!
//! Every element here exchanges interleaved f32 audio. This module holds
//! the caps, the pad templates and the debug category they share.

use once_cell::sync::Lazy;

/// Debug category used by every element in the plugin.
pub static CAT: Lazy<gstreamer::DebugCategory> = Lazy::new(|| {
    gstreamer::DebugCategory::new(
        "pinkdsp",
        gstreamer::DebugColorFlags::empty(),
        Some("Pink noise DSP elements"),
    )
});

/// Interleaved f32 caps shared by all elements.
pub static F32_INTERLEAVED_CAPS: Lazy<gstreamer::Caps> = Lazy::new(|| {
    gstreamer_audio::AudioCapsBuilder::new_interleaved()
        .format(gstreamer_audio::AUDIO_FORMAT_F32)
        .build()
});

/// Build an always-present pad template with [`F32_INTERLEAVED_CAPS`].
fn f32_pad_template(name: &str, direction: gstreamer::PadDirection) -> gstreamer::PadTemplate {
    gstreamer::PadTemplate::new(
        name,
        direction,
        gstreamer::PadPresence::Always,
        &F32_INTERLEAVED_CAPS,
    )
    .unwrap_or_else(|err| panic!("failed to create {name} pad template: {err}"))
}

/// Src + sink pad templates for a passthrough f32 filter.
pub fn f32_pad_templates() -> Vec<gstreamer::PadTemplate> {
    vec![
        f32_pad_template("src", gstreamer::PadDirection::Src),
        f32_pad_template("sink", gstreamer::PadDirection::Sink),
    ]
}

/// Single src pad template for an f32 source.
pub fn f32_src_pad_templates() -> Vec<gstreamer::PadTemplate> {
    vec![f32_pad_template("src", gstreamer::PadDirection::Src)]
}

/// Whether `bytes` can be viewed as whole, aligned `f32` samples.
fn is_f32_aligned(bytes: &[u8]) -> bool {
    bytes.len() % std::mem::size_of::<f32>() == 0
        && bytes.as_ptr().align_offset(std::mem::align_of::<f32>()) == 0
}

/// View mapped buffer bytes as f32 samples.
///
/// Returns `None` if the memory is not f32-aligned or holds a partial sample.
pub fn as_f32_slice(bytes: &[u8]) -> Option<&[f32]> {
    if !is_f32_aligned(bytes) {
        return None;
    }
    let len = bytes.len() / std::mem::size_of::<f32>();
    // Safety: length and alignment checked above; every bit pattern is a valid f32.
    Some(unsafe { std::slice::from_raw_parts(bytes.as_ptr().cast::<f32>(), len) })
}

/// Mutable variant of [`as_f32_slice`].
pub fn as_f32_slice_mut(bytes: &mut [u8]) -> Option<&mut [f32]> {
    if !is_f32_aligned(bytes) {
        return None;
    }
    let len = bytes.len() / std::mem::size_of::<f32>();
    // Safety: as in `as_f32_slice`, and the borrow is exclusive.
    Some(unsafe { std::slice::from_raw_parts_mut(bytes.as_mut_ptr().cast::<f32>(), len) })
}

/// Decode f32 samples from bytes of any alignment, dropping a partial tail.
pub fn copy_f32_samples(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(std::mem::size_of::<f32>())
        .map(|b| f32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect()
}
