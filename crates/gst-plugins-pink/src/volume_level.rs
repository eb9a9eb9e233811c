// SPDX-License-Identifier: LGPL-3.0-or-later

//! GStreamer passthrough level-jump analyzer.
//!
//! Wraps [`pink_dsp_units::meters::VolumeLevelMeter`]. Every buffer is one
//! metering window. Audio flows through unmodified; the latest reading is
//! exposed as read-only properties and each finding is posted on the bus as
//! an element message named `pink-volume-level`.

use gstreamer::glib;
use gstreamer::prelude::*;
use gstreamer::subclass::prelude::*;
use gstreamer_audio::subclass::prelude::*;

use pink_dsp_units::consts::{DEFAULT_HIGH_THRESHOLD_DB, DEFAULT_LOW_THRESHOLD_DB};
use pink_dsp_units::meters::{LevelReading, VolumeLevelMeter};

use crate::base::{self, CAT};
use once_cell::sync::Lazy;
use std::sync::Mutex;

/// Name of the posted element message.
pub const MESSAGE_NAME: &str = "pink-volume-level";

// ── GObject property names ───────────────────────────────────────

const PROP_WINDOW_RMS: &str = "window-rms";
const PROP_OVERALL_RMS: &str = "overall-rms";
const PROP_DELTA: &str = "delta";
const PROP_HIGH_THRESHOLD: &str = "high-threshold";
const PROP_LOW_THRESHOLD: &str = "low-threshold";

/// Reported value before the first window (matches GObject param min).
const METER_FLOOR: f32 = -200.0;
/// Upper bound of the level properties.
const METER_CEIL: f32 = 200.0;

/// Clamp a dB reading to the GObject property range.
fn clamp_reading(val: f32) -> f32 {
    if val.is_finite() {
        val.clamp(METER_FLOOR, METER_CEIL)
    } else {
        METER_FLOOR
    }
}

/// Build the bus message payload for a reading that raised a finding.
fn finding_structure(reading: &LevelReading) -> Option<gstreamer::Structure> {
    let finding = reading.finding?;
    Some(
        gstreamer::Structure::builder(MESSAGE_NAME)
            .field("finding", finding.as_str())
            .field("window-rms", reading.window_db)
            .field("overall-rms", reading.overall_db)
            .field("delta", reading.delta_db)
            .build(),
    )
}

/// User-facing thresholds, kept across caps changes.
#[derive(Debug, Clone)]
struct Thresholds {
    high_db: f32,
    low_db: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high_db: DEFAULT_HIGH_THRESHOLD_DB,
            low_db: DEFAULT_LOW_THRESHOLD_DB,
        }
    }
}

impl Thresholds {
    fn apply(&self, meter: &mut VolumeLevelMeter) {
        meter
            .set_high_threshold(self.high_db)
            .set_low_threshold(self.low_db);
    }
}

// ── Element definition ───────────────────────────────────────────

/// GStreamer volume-level analyzer backed by `pink_dsp_units::meters`.
#[derive(Default)]
pub struct PinkVolumeLevel {
    inner: Mutex<PinkVolumeLevelInner>,
}

#[derive(Default)]
struct PinkVolumeLevelInner {
    thresholds: Thresholds,
    meter: Option<VolumeLevelMeter>,
}

impl PinkVolumeLevelInner {
    fn last_reading(&self) -> Option<LevelReading> {
        self.meter.as_ref().and_then(VolumeLevelMeter::last_reading)
    }
}

#[glib::object_subclass]
impl ObjectSubclass for PinkVolumeLevel {
    const NAME: &'static str = "PinkVolumeLevel";
    type Type = super::PinkVolumeLevel;
    type ParentType = gstreamer_audio::AudioFilter;
}

impl ObjectImpl for PinkVolumeLevel {
    fn properties() -> &'static [glib::ParamSpec] {
        static PROPERTIES: Lazy<Vec<glib::ParamSpec>> = Lazy::new(|| {
            vec![
                glib::ParamSpecFloat::builder(PROP_WINDOW_RMS)
                    .nick("Window RMS")
                    .blurb("RMS level of the last buffer (dBFS)")
                    .minimum(METER_FLOOR)
                    .maximum(METER_CEIL)
                    .default_value(METER_FLOOR)
                    .read_only()
                    .build(),
                glib::ParamSpecFloat::builder(PROP_OVERALL_RMS)
                    .nick("Overall RMS")
                    .blurb("RMS level of everything seen so far (dBFS)")
                    .minimum(METER_FLOOR)
                    .maximum(METER_CEIL)
                    .default_value(METER_FLOOR)
                    .read_only()
                    .build(),
                glib::ParamSpecFloat::builder(PROP_DELTA)
                    .nick("Delta")
                    .blurb("Window RMS minus overall RMS (dB)")
                    .minimum(METER_FLOOR)
                    .maximum(METER_CEIL)
                    .default_value(0.0)
                    .read_only()
                    .build(),
                glib::ParamSpecFloat::builder(PROP_HIGH_THRESHOLD)
                    .nick("High Threshold")
                    .blurb("Delta at or above which a buffer is reported as too loud (dB)")
                    .minimum(0.0)
                    .maximum(60.0)
                    .default_value(DEFAULT_HIGH_THRESHOLD_DB)
                    .mutable_playing()
                    .build(),
                glib::ParamSpecFloat::builder(PROP_LOW_THRESHOLD)
                    .nick("Low Threshold")
                    .blurb("Delta at or below which a buffer is reported as too quiet (dB)")
                    .minimum(-60.0)
                    .maximum(0.0)
                    .default_value(DEFAULT_LOW_THRESHOLD_DB)
                    .mutable_playing()
                    .build(),
            ]
        });
        PROPERTIES.as_ref()
    }

    fn set_property(&self, _id: usize, value: &glib::Value, pspec: &glib::ParamSpec) {
        let mut inner = self.inner.lock().expect("mutex poisoned");
        match pspec.name() {
            PROP_HIGH_THRESHOLD => {
                inner.thresholds.high_db = value.get().expect("type checked");
            }
            PROP_LOW_THRESHOLD => {
                inner.thresholds.low_db = value.get().expect("type checked");
            }
            _ => return,
        }
        let inner = &mut *inner;
        if let Some(ref mut meter) = inner.meter {
            inner.thresholds.apply(meter);
        }
    }

    fn property(&self, _id: usize, pspec: &glib::ParamSpec) -> glib::Value {
        let inner = self.inner.lock().expect("mutex poisoned");
        let reading = inner.last_reading();
        match pspec.name() {
            PROP_WINDOW_RMS => reading
                .map_or(METER_FLOOR, |r| clamp_reading(r.window_db))
                .to_value(),
            PROP_OVERALL_RMS => reading
                .map_or(METER_FLOOR, |r| clamp_reading(r.overall_db))
                .to_value(),
            PROP_DELTA => reading
                .map_or(0.0, |r| clamp_reading(r.delta_db))
                .to_value(),
            PROP_HIGH_THRESHOLD => inner.thresholds.high_db.to_value(),
            PROP_LOW_THRESHOLD => inner.thresholds.low_db.to_value(),
            _ => panic!("unknown property {}", pspec.name()),
        }
    }
}

impl GstObjectImpl for PinkVolumeLevel {}

impl ElementImpl for PinkVolumeLevel {
    fn metadata() -> Option<&'static gstreamer::subclass::ElementMetadata> {
        static ELEMENT_METADATA: Lazy<gstreamer::subclass::ElementMetadata> = Lazy::new(|| {
            gstreamer::subclass::ElementMetadata::new(
                "Pink Volume Level",
                "Analyzer/Audio",
                "Windowed RMS meter reporting sudden level jumps",
                "Pink DSP <noreply@pink-dsp.dev>",
            )
        });
        Some(&*ELEMENT_METADATA)
    }

    fn pad_templates() -> &'static [gstreamer::PadTemplate] {
        static PAD_TEMPLATES: Lazy<Vec<gstreamer::PadTemplate>> =
            Lazy::new(base::f32_pad_templates);
        PAD_TEMPLATES.as_ref()
    }
}

impl BaseTransformImpl for PinkVolumeLevel {
    const MODE: gstreamer_base::subclass::BaseTransformMode =
        gstreamer_base::subclass::BaseTransformMode::AlwaysInPlace;
    const PASSTHROUGH_ON_SAME_CAPS: bool = true;
    const TRANSFORM_IP_ON_PASSTHROUGH: bool = true;

    fn transform_ip_passthrough(
        &self,
        buf: &gstreamer::Buffer,
    ) -> Result<gstreamer::FlowSuccess, gstreamer::FlowError> {
        let reading = {
            let mut inner = self.inner.lock().map_err(|_| {
                gstreamer::element_error!(
                    self.obj(),
                    gstreamer::CoreError::Failed,
                    ["Mutex poisoned"]
                );
                gstreamer::FlowError::Error
            })?;

            let meter = match inner.meter {
                Some(ref mut m) => m,
                None => return Ok(gstreamer::FlowSuccess::Ok),
            };

            let map = buf.map_readable().map_err(|_| {
                gstreamer::element_error!(
                    self.obj(),
                    gstreamer::CoreError::Failed,
                    ["Failed to map buffer readable"]
                );
                gstreamer::FlowError::Error
            })?;

            match base::as_f32_slice(map.as_slice()) {
                Some(samples) => meter.process(samples),
                None => {
                    gstreamer::trace!(CAT, imp = self, "Unaligned buffer, copying samples");
                    meter.process(&base::copy_f32_samples(map.as_slice()))
                }
            }
        };

        // Post without holding the lock: bus sync handlers may read properties.
        if let Some(s) = reading.as_ref().and_then(finding_structure) {
            gstreamer::debug!(CAT, imp = self, "Posting {s}");
            let msg = gstreamer::message::Element::builder(s)
                .src(&*self.obj())
                .build();
            if self.obj().post_message(msg).is_err() {
                gstreamer::warning!(CAT, imp = self, "No bus to post level finding on");
            }
        }

        Ok(gstreamer::FlowSuccess::Ok)
    }

    fn stop(&self) -> Result<(), gstreamer::ErrorMessage> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| gstreamer::error_msg!(gstreamer::CoreError::Failed, ["Mutex poisoned"]))?;
        inner.meter = None;
        Ok(())
    }
}

impl AudioFilterImpl for PinkVolumeLevel {
    fn allowed_caps() -> &'static gstreamer::Caps {
        &base::F32_INTERLEAVED_CAPS
    }

    fn setup(&self, info: &gstreamer_audio::AudioInfo) -> Result<(), gstreamer::LoggableError> {
        self.parent_setup(info)?;

        let mut inner = self.inner.lock().map_err(|_| {
            gstreamer::loggable_error!(CAT, "Mutex poisoned in AudioFilterImpl::setup")
        })?;

        let mut meter = VolumeLevelMeter::new();
        inner.thresholds.apply(&mut meter);
        inner.meter = Some(meter);

        gstreamer::info!(
            CAT,
            imp = self,
            "Metering {} channels at {} Hz",
            info.channels(),
            info.rate()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use gstreamer::prelude::*;
    use pink_dsp_units::meters::{LevelFinding, LevelReading};

    fn init() {
        use std::sync::Once;
        static INIT: Once = Once::new();
        INIT.call_once(|| {
            gstreamer::init().expect("Failed to initialize GStreamer");
            crate::plugin_register_static().expect("Failed to register pinkdsp plugin");
        });
    }

    fn make_level() -> gstreamer::Element {
        init();
        gstreamer::ElementFactory::make("pink-volume-level")
            .build()
            .expect("failed to create pink-volume-level")
    }

    /// Run `src ! capsfilter ! pink-volume-level ! fakesink` to EOS and
    /// return the level messages seen on the bus.
    fn run_pipeline(
        src: &gstreamer::Element,
        level: &gstreamer::Element,
    ) -> Vec<gstreamer::Structure> {
        let pipeline = gstreamer::Pipeline::new();
        let capsfilter = gstreamer::ElementFactory::make("capsfilter")
            .property(
                "caps",
                gstreamer_audio::AudioCapsBuilder::new_interleaved()
                    .format(gstreamer_audio::AUDIO_FORMAT_F32)
                    .rate(48000)
                    .channels(2)
                    .build(),
            )
            .build()
            .expect("capsfilter");
        let sink = gstreamer::ElementFactory::make("fakesink")
            .build()
            .expect("fakesink");

        pipeline
            .add_many([src, &capsfilter, level, &sink])
            .expect("add elements");
        gstreamer::Element::link_many([src, &capsfilter, level, &sink]).expect("link elements");

        pipeline
            .set_state(gstreamer::State::Playing)
            .expect("set playing");

        let mut found = Vec::new();
        let bus = pipeline.bus().expect("bus");
        for msg in bus.iter_timed(gstreamer::ClockTime::from_seconds(5)) {
            match msg.view() {
                gstreamer::MessageView::Eos(..) => break,
                gstreamer::MessageView::Error(err) => {
                    panic!("Pipeline error: {} ({:?})", err.error(), err.debug());
                }
                gstreamer::MessageView::Element(elem) => {
                    if let Some(s) = elem.structure() {
                        if s.has_name(super::MESSAGE_NAME) {
                            found.push(s.to_owned());
                        }
                    }
                }
                _ => {}
            }
        }

        pipeline
            .set_state(gstreamer::State::Null)
            .expect("set null");
        found
    }

    fn audiotestsrc(buffers: i32) -> gstreamer::Element {
        gstreamer::ElementFactory::make("audiotestsrc")
            .property("num-buffers", buffers)
            .property("samplesperbuffer", 1024i32)
            .build()
            .expect("audiotestsrc")
    }

    #[test]
    fn element_creation() {
        let _elem = make_level();
    }

    #[test]
    fn property_defaults() {
        let elem = make_level();
        assert!((elem.property::<f32>("window-rms") - (-200.0)).abs() < f32::EPSILON);
        assert!((elem.property::<f32>("overall-rms") - (-200.0)).abs() < f32::EPSILON);
        assert_eq!(elem.property::<f32>("delta"), 0.0);
        assert!((elem.property::<f32>("high-threshold") - 6.0).abs() < f32::EPSILON);
        assert!((elem.property::<f32>("low-threshold") - (-12.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn threshold_roundtrip() {
        let elem = make_level();
        elem.set_property("high-threshold", 3.0f32);
        elem.set_property("low-threshold", -9.0f32);
        assert!((elem.property::<f32>("high-threshold") - 3.0).abs() < f32::EPSILON);
        assert!((elem.property::<f32>("low-threshold") - (-9.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn finding_structure_fields() {
        let quiet = LevelReading {
            window_db: -20.0,
            overall_db: -20.0,
            delta_db: 0.0,
            finding: None,
        };
        assert!(super::finding_structure(&quiet).is_none());

        let loud = LevelReading {
            window_db: -3.0,
            overall_db: -15.0,
            delta_db: 12.0,
            finding: Some(LevelFinding::High),
        };
        let s = super::finding_structure(&loud).expect("finding message");
        assert!(s.has_name("pink-volume-level"));
        assert_eq!(s.get::<&str>("finding").ok(), Some("high"));
        assert_eq!(s.get::<f32>("window-rms").ok(), Some(-3.0));
        assert_eq!(s.get::<f32>("overall-rms").ok(), Some(-15.0));
        assert_eq!(s.get::<f32>("delta").ok(), Some(12.0));
    }

    #[test]
    fn clamp_reading_bounds() {
        assert_eq!(super::clamp_reading(f32::NEG_INFINITY), -200.0);
        assert_eq!(super::clamp_reading(f32::NAN), -200.0);
        assert_eq!(super::clamp_reading(500.0), 200.0);
        assert_eq!(super::clamp_reading(-12.5), -12.5);
    }

    #[test]
    fn steady_sine_passes_without_findings() {
        init();
        let src = audiotestsrc(20);
        let level = make_level();
        let found = run_pipeline(&src, &level);
        assert!(found.is_empty(), "unexpected findings: {found:?}");

        // audiotestsrc defaults to a 0.8 amplitude sine: RMS = 0.8 / sqrt(2).
        let window: f32 = level.property("window-rms");
        let overall: f32 = level.property("overall-rms");
        assert!((window - (-4.95)).abs() < 0.1, "window rms {window}");
        assert!((overall - (-4.95)).abs() < 0.1, "overall rms {overall}");
    }

    #[test]
    fn zero_high_threshold_posts_high_finding() {
        init();
        let src = audiotestsrc(3);
        let level = make_level();
        // The first window always has a delta of exactly 0 dB.
        level.set_property("high-threshold", 0.0f32);
        let found = run_pipeline(&src, &level);
        assert!(!found.is_empty(), "expected a finding message");
        let first = &found[0];
        assert_eq!(first.get::<&str>("finding").ok(), Some("high"));
        assert_eq!(first.get::<f32>("delta").ok(), Some(0.0));
    }

    #[test]
    fn pink_source_feeds_analyzer() {
        init();
        let src = gstreamer::ElementFactory::make("pink-noise-src")
            .property("num-rows", 10u32)
            .property("amplitude", 0.5f32)
            .property("num-buffers", 30i32)
            .build()
            .expect("pink-noise-src");
        let level = make_level();

        let found = run_pipeline(&src, &level);
        assert!(found.is_empty(), "steady pink noise raised {found:?}");
        let overall: f32 = level.property("overall-rms");
        assert!(overall < -6.0 && overall > -30.0, "overall rms {overall}");
    }
}
