// SPDX-License-Identifier: LGPL-3.0-or-later

//! GStreamer elements for pink noise calibration signals.
//!
//! This crate registers GStreamer elements backed by
//! [`pink_dsp_units`]. Provided elements:
//!
//! | Element             | Description                                         |
//! |---------------------|-----------------------------------------------------|
//! | `pink-noise-src`    | Pink (1/f) noise source, independent per channel     |
//! | `pink-volume-level` | Passthrough RMS meter that reports level jumps       |
//!
//! A typical speaker check:
//!
//! ```text
//! gst-launch-1.0 pink-noise-src amplitude=0.25 ! audio/x-raw,channels=6 ! autoaudiosink
//! ```

use gstreamer::glib;
use gstreamer::prelude::*;

mod base;
mod pink_src;
mod volume_level;

glib::wrapper! {
    /// Public GLib type for the pink noise source element.
    pub struct PinkNoiseSrc(ObjectSubclass<pink_src::PinkNoiseSrc>)
        @extends gstreamer_base::BaseSrc,
                 gstreamer::Element, gstreamer::Object;
}

glib::wrapper! {
    /// Public GLib type for the volume-level analyzer element.
    pub struct PinkVolumeLevel(ObjectSubclass<volume_level::PinkVolumeLevel>)
        @extends gstreamer_audio::AudioFilter, gstreamer_base::BaseTransform,
                 gstreamer::Element, gstreamer::Object;
}

/// GStreamer plugin entry point.
fn plugin_init(plugin: &gstreamer::Plugin) -> Result<(), glib::BoolError> {
    gstreamer::Element::register(
        Some(plugin),
        "pink-noise-src",
        gstreamer::Rank::NONE,
        PinkNoiseSrc::static_type(),
    )?;
    gstreamer::Element::register(
        Some(plugin),
        "pink-volume-level",
        gstreamer::Rank::NONE,
        PinkVolumeLevel::static_type(),
    )?;
    Ok(())
}

gstreamer::plugin_define!(
    pinkdsp,
    env!("CARGO_PKG_DESCRIPTION"),
    plugin_init,
    concat!(env!("CARGO_PKG_VERSION")),
    "LGPL-3.0-or-later",
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_NAME"),
    env!("CARGO_PKG_REPOSITORY"),
    "2026-10-19"
);
