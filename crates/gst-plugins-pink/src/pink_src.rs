// SPDX-License-Identifier: LGPL-3.0-or-later

//! GStreamer source element wrapping [`pink_dsp_units::noise::PinkNoiseBank`].
//!
//! Produces interleaved f32 pink noise with an independent generator per
//! channel. Row count and seed are reproducible parameters: changing either
//! while running re-initializes the bank.

use gstreamer::glib;
use gstreamer::prelude::*;
use gstreamer::subclass::prelude::*;
use gstreamer_base::prelude::*;
use gstreamer_base::subclass::prelude::*;

use pink_dsp_units::consts::{DEFAULT_ROWS, DEFAULT_SEED, MAX_ROWS};
use pink_dsp_units::noise::PinkNoiseBank;

use crate::base::{self, CAT};
use once_cell::sync::Lazy;
use std::sync::Mutex;

/// Default amplitude.
const DEFAULT_AMPLITUDE: f32 = 1.0;
/// Default samples per buffer.
const DEFAULT_SAMPLES_PER_BUFFER: u32 = 1024;

// -- GObject property names --

const PROP_NUM_ROWS: &str = "num-rows";
const PROP_SEED: &str = "seed";
const PROP_AMPLITUDE: &str = "amplitude";
const PROP_SAMPLES_PER_BUFFER: &str = "samplesperbuffer";

// -- State --

/// Processing state, present between `set_caps` and `stop`.
struct State {
    bank: PinkNoiseBank,
    info: gstreamer_audio::AudioInfo,
    sample_offset: u64,
}

impl State {
    fn new(
        info: &gstreamer_audio::AudioInfo,
        params: &PinkParams,
    ) -> Result<Self, pink_dsp_units::Error> {
        let bank = params.build_bank(info.channels() as usize)?;
        Ok(Self {
            bank,
            info: info.clone(),
            sample_offset: 0,
        })
    }
}

/// Snapshot of user-facing parameters.
#[derive(Debug, Clone)]
struct PinkParams {
    num_rows: u32,
    seed: u32,
    amplitude: f32,
    samples_per_buffer: u32,
}

impl Default for PinkParams {
    fn default() -> Self {
        Self {
            num_rows: DEFAULT_ROWS as u32,
            seed: DEFAULT_SEED,
            amplitude: DEFAULT_AMPLITUDE,
            samples_per_buffer: DEFAULT_SAMPLES_PER_BUFFER,
        }
    }
}

impl PinkParams {
    fn build_bank(&self, channels: usize) -> Result<PinkNoiseBank, pink_dsp_units::Error> {
        let mut bank = PinkNoiseBank::new(channels, self.num_rows as usize, self.seed)?;
        bank.set_amplitude(self.amplitude);
        Ok(bank)
    }
}

// -- Element definition --

/// GStreamer pink noise source backed by `pink_dsp_units`.
#[derive(Default)]
pub struct PinkNoiseSrc {
    inner: Mutex<PinkNoiseSrcInner>,
}

#[derive(Default)]
struct PinkNoiseSrcInner {
    params: PinkParams,
    state: Option<State>,
}

impl PinkNoiseSrc {
    /// Rebuild the running bank after a row-count or seed change.
    fn reinit_bank(&self, inner: &mut PinkNoiseSrcInner) {
        let Some(state) = inner.state.as_mut() else {
            return;
        };
        match inner.params.build_bank(state.bank.channels()) {
            Ok(bank) => {
                gstreamer::debug!(
                    CAT,
                    imp = self,
                    "Re-initialized bank: rows={} seed={}",
                    inner.params.num_rows,
                    inner.params.seed
                );
                state.bank = bank;
            }
            Err(err) => {
                gstreamer::warning!(CAT, imp = self, "Keeping previous bank: {err}");
            }
        }
    }
}

#[glib::object_subclass]
impl ObjectSubclass for PinkNoiseSrc {
    const NAME: &'static str = "PinkNoiseSrc";
    type Type = super::PinkNoiseSrc;
    type ParentType = gstreamer_base::BaseSrc;
}

impl ObjectImpl for PinkNoiseSrc {
    fn properties() -> &'static [glib::ParamSpec] {
        static PROPERTIES: Lazy<Vec<glib::ParamSpec>> = Lazy::new(|| {
            vec![
                glib::ParamSpecUInt::builder(PROP_NUM_ROWS)
                    .nick("Number of Rows")
                    .blurb("Random rows summed per sample; sets the lowest pink octave")
                    .minimum(1)
                    .maximum(MAX_ROWS as u32)
                    .default_value(DEFAULT_ROWS as u32)
                    .mutable_playing()
                    .build(),
                glib::ParamSpecUInt::builder(PROP_SEED)
                    .nick("Seed")
                    .blurb("Random seed of channel 0; channel c uses seed + c")
                    .default_value(DEFAULT_SEED)
                    .mutable_playing()
                    .build(),
                glib::ParamSpecFloat::builder(PROP_AMPLITUDE)
                    .nick("Amplitude")
                    .blurb("Output amplitude (linear)")
                    .minimum(0.0)
                    .maximum(10.0)
                    .default_value(DEFAULT_AMPLITUDE)
                    .mutable_playing()
                    .build(),
                glib::ParamSpecUInt::builder(PROP_SAMPLES_PER_BUFFER)
                    .nick("Samples Per Buffer")
                    .blurb("Number of samples per output buffer")
                    .minimum(1)
                    .maximum(65536)
                    .default_value(DEFAULT_SAMPLES_PER_BUFFER)
                    .mutable_playing()
                    .build(),
            ]
        });
        PROPERTIES.as_ref()
    }

    fn constructed(&self) {
        self.parent_constructed();
        let obj = self.obj();
        obj.set_live(false);
        obj.set_format(gstreamer::Format::Time);
    }

    fn set_property(&self, _id: usize, value: &glib::Value, pspec: &glib::ParamSpec) {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        match pspec.name() {
            PROP_NUM_ROWS => {
                inner.params.num_rows = value.get().expect("type checked");
                self.reinit_bank(&mut inner);
            }
            PROP_SEED => {
                inner.params.seed = value.get().expect("type checked");
                self.reinit_bank(&mut inner);
            }
            PROP_AMPLITUDE => {
                let amp: f32 = value.get().expect("type checked");
                inner.params.amplitude = amp;
                if let Some(ref mut state) = inner.state {
                    state.bank.set_amplitude(amp);
                }
            }
            PROP_SAMPLES_PER_BUFFER => {
                inner.params.samples_per_buffer = value.get().expect("type checked");
            }
            _ => {}
        }
    }

    fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
        let inner = self.inner.lock().expect("mutex poisoned");
        match pspec.name() {
            PROP_NUM_ROWS => inner.params.num_rows.to_value(),
            PROP_SEED => inner.params.seed.to_value(),
            PROP_AMPLITUDE => inner.params.amplitude.to_value(),
            PROP_SAMPLES_PER_BUFFER => inner.params.samples_per_buffer.to_value(),
            _ => unimplemented!(),
        }
    }
}

impl GstObjectImpl for PinkNoiseSrc {}

impl ElementImpl for PinkNoiseSrc {
    fn metadata() -> Option<&'static gstreamer::subclass::ElementMetadata> {
        static ELEMENT_METADATA: Lazy<gstreamer::subclass::ElementMetadata> = Lazy::new(|| {
            gstreamer::subclass::ElementMetadata::new(
                "Pink Noise Source",
                "Source/Audio",
                "Pink (1/f) noise generator using the Gardner/McCartney row method",
                "Pink DSP <noreply@pink-dsp.dev>",
            )
        });
        Some(&*ELEMENT_METADATA)
    }

    fn pad_templates() -> &'static [gstreamer::PadTemplate] {
        static PAD_TEMPLATES: Lazy<Vec<gstreamer::PadTemplate>> =
            Lazy::new(base::f32_src_pad_templates);
        PAD_TEMPLATES.as_ref()
    }
}

impl BaseSrcImpl for PinkNoiseSrc {
    fn set_caps(&self, caps: &gstreamer::Caps) -> Result<(), gstreamer::LoggableError> {
        let info = gstreamer_audio::AudioInfo::from_caps(caps)
            .map_err(|_| gstreamer::loggable_error!(CAT, "Failed to parse audio caps"))?;

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| gstreamer::loggable_error!(CAT, "Mutex poisoned in set_caps"))?;

        let state = State::new(&info, &inner.params)
            .map_err(|err| gstreamer::loggable_error!(CAT, "Failed to create bank: {}", err))?;

        gstreamer::info!(
            CAT,
            imp = self,
            "Configured {} channels at {} Hz, rows={} seed={}",
            info.channels(),
            info.rate(),
            inner.params.num_rows,
            inner.params.seed
        );
        inner.state = Some(state);
        Ok(())
    }

    fn fixate(&self, mut caps: gstreamer::Caps) -> gstreamer::Caps {
        caps.truncate();
        {
            let caps = caps.make_mut();
            if let Some(s) = caps.structure_mut(0) {
                s.fixate_field_nearest_int("rate", 48000);
                s.fixate_field_nearest_int("channels", 1);
            }
        }
        self.parent_fixate(caps)
    }

    fn is_seekable(&self) -> bool {
        false
    }

    fn create(
        &self,
        _offset: u64,
        _buffer: Option<&mut gstreamer::BufferRef>,
        _length: u32,
    ) -> Result<gstreamer_base::subclass::base_src::CreateSuccess, gstreamer::FlowError> {
        let mut inner = self.inner.lock().map_err(|_| {
            gstreamer::element_error!(self.obj(), gstreamer::CoreError::Failed, ["Mutex poisoned"]);
            gstreamer::FlowError::Error
        })?;

        let inner = &mut *inner;
        let samples_per_buffer = inner.params.samples_per_buffer as usize;

        let state = match inner.state {
            Some(ref mut s) => s,
            None => {
                gstreamer::element_error!(
                    self.obj(),
                    gstreamer::CoreError::Negotiation,
                    ["Not negotiated yet"]
                );
                return Err(gstreamer::FlowError::NotNegotiated);
            }
        };

        let channels = state.info.channels() as usize;
        let rate = state.info.rate() as u64;
        let total_samples = samples_per_buffer * channels;
        let byte_size = total_samples * std::mem::size_of::<f32>();

        let mut buffer = gstreamer::Buffer::with_size(byte_size).map_err(|_| {
            gstreamer::element_error!(
                self.obj(),
                gstreamer::CoreError::Failed,
                ["Failed to allocate buffer"]
            );
            gstreamer::FlowError::Error
        })?;

        {
            let buffer_ref = buffer.get_mut().ok_or_else(|| {
                gstreamer::element_error!(
                    self.obj(),
                    gstreamer::CoreError::Failed,
                    ["Failed to get mutable buffer"]
                );
                gstreamer::FlowError::Error
            })?;

            let next_offset = state.sample_offset + samples_per_buffer as u64;
            let pts = state
                .sample_offset
                .mul_div_floor(*gstreamer::ClockTime::SECOND, rate);
            let end = next_offset.mul_div_floor(*gstreamer::ClockTime::SECOND, rate);
            if let (Some(pts), Some(end)) = (pts, end) {
                buffer_ref.set_pts(gstreamer::ClockTime::from_nseconds(pts));
                buffer_ref.set_duration(gstreamer::ClockTime::from_nseconds(end - pts));
            }
            buffer_ref.set_offset(state.sample_offset);
            buffer_ref.set_offset_end(next_offset);

            let mut map = buffer_ref.map_writable().map_err(|_| {
                gstreamer::element_error!(
                    self.obj(),
                    gstreamer::CoreError::Failed,
                    ["Failed to map buffer writable"]
                );
                gstreamer::FlowError::Error
            })?;

            let samples = base::as_f32_slice_mut(map.as_mut_slice()).ok_or_else(|| {
                gstreamer::element_error!(
                    self.obj(),
                    gstreamer::CoreError::Failed,
                    ["Allocated buffer is not f32-aligned"]
                );
                gstreamer::FlowError::Error
            })?;

            state.bank.process_interleaved(samples);
            state.sample_offset = next_offset;
        }

        gstreamer::trace!(CAT, imp = self, "Produced {samples_per_buffer} frames");
        Ok(gstreamer_base::subclass::base_src::CreateSuccess::NewBuffer(buffer))
    }

    fn stop(&self) -> Result<(), gstreamer::ErrorMessage> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| gstreamer::error_msg!(gstreamer::CoreError::Failed, ["Mutex poisoned"]))?;
        inner.state = None;
        Ok(())
    }
}
