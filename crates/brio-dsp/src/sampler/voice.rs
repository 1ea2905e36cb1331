//! Single-note pitch-shifted playback.

use std::sync::Arc;

use brio_core::{AudioBuffer, Sample};

/// One unit of polyphony: plays a shared sample buffer at a fractional
/// phase with single-stage linear interpolation.
///
/// The voice walks the source in *source frames*: each output frame reads
/// the source at `phase`, interpolates between the two neighbouring source
/// frames, and advances `phase` by `step`. A step of 1 is native-pitch
/// playback; the step folds together the rate ratio and the note's pitch
/// scale.
///
/// Life cycle: `configure` binds the voice to a sample and its rates,
/// `start` begins a note, `render` advances until the sample is exhausted,
/// after which `finished` reports true.
#[derive(Debug, Clone)]
pub struct SamplerVoice {
    // Sample context, cached at configure time.
    sample: Option<Arc<AudioBuffer>>,
    src_channels: usize,
    num_frames: usize,
    last_index: usize,
    native_rate: f64,
    engine_rate: f64,

    // Per-note state.
    phase: f64,
    step: f64,
    gain: Sample,
    active: bool,
}

impl Default for SamplerVoice {
    fn default() -> Self {
        Self {
            sample: None,
            src_channels: 0,
            num_frames: 0,
            last_index: 0,
            native_rate: 0.0,
            engine_rate: 0.0,
            phase: 0.0,
            step: 1.0,
            gain: 0.0,
            active: false,
        }
    }
}

impl SamplerVoice {
    /// Binds the voice to a sample buffer and the rates used to derive the
    /// playback step. Stops any note in flight.
    pub fn configure(&mut self, sample: Arc<AudioBuffer>, native_rate: f64, engine_rate: f64) {
        self.src_channels = sample.num_channels();
        self.num_frames = sample.num_frames();
        self.last_index = self.num_frames.saturating_sub(1);
        self.sample = Some(sample);
        self.native_rate = native_rate;
        self.engine_rate = engine_rate;
        self.phase = 0.0;
        self.active = false;
    }

    /// Starts a note.
    ///
    /// With fewer than two source frames or a non-positive rate the voice
    /// stays inert and contributes silence. Velocity maps linearly to gain,
    /// clamped to `[0, 1]`.
    pub fn start(&mut self, note: i32, velocity: f32, root_note: i32, tune_cents: f64) {
        if self.sample.is_none()
            || self.num_frames < 2
            || self.native_rate <= 0.0
            || self.engine_rate <= 0.0
        {
            self.active = false;
            return;
        }

        let semitones = f64::from(note - root_note);
        let pitch_scale = (semitones / 12.0).exp2() * (tune_cents / 1200.0).exp2();

        self.step = (self.native_rate / self.engine_rate) * pitch_scale;
        self.phase = 0.0;
        self.gain = velocity.clamp(0.0, 1.0);
        self.active = self.step > 0.0;
    }

    /// Mixes up to `frames_to_render` frames into `output`, additively.
    ///
    /// A mono source fans out to every output channel; a multi-channel
    /// source feeds `min(output_channels, src_channels)` channels and leaves
    /// the rest untouched. At the last source frame the sample value is
    /// taken as-is (no interpolation past the end).
    pub fn render(&mut self, output: &mut AudioBuffer, frames_to_render: usize) {
        if !self.active || frames_to_render == 0 {
            return;
        }
        let Some(sample) = self.sample.clone() else {
            return;
        };

        let frames = frames_to_render.min(output.num_frames());
        let src = sample.samples();
        let src_stride = sample.interleave_stride();
        let out_stride = output.interleave_stride();
        let copy_channels = output.num_channels().min(self.src_channels);
        let mono = self.src_channels == 1;
        let out = output.samples_mut();

        for frame in 0..frames {
            let i = self.phase as usize;
            if i > self.last_index {
                self.active = false;
                break;
            }
            let frac = (self.phase - i as f64) as Sample;

            if mono {
                let s = if i == self.last_index {
                    src[i]
                } else {
                    let x0 = src[i];
                    let x1 = src[i + 1];
                    x0 + (x1 - x0) * frac
                };
                let base = frame * out_stride;
                for slot in &mut out[base..base + out_stride] {
                    *slot += self.gain * s;
                }
            } else {
                let src_base = i * src_stride;
                let out_base = frame * out_stride;
                for channel in 0..copy_channels {
                    let s = if i == self.last_index {
                        src[src_base + channel]
                    } else {
                        let x0 = src[src_base + channel];
                        let x1 = src[src_base + src_stride + channel];
                        x0 + (x1 - x0) * frac
                    };
                    out[out_base + channel] += self.gain * s;
                }
            }

            self.phase += self.step;
        }

        // Advanced to (or past) the end: nothing further to contribute.
        if self.phase >= self.last_index as f64 {
            self.active = false;
        }
    }

    /// True when the voice has nothing further to contribute.
    #[inline]
    pub fn finished(&self) -> bool {
        !self.active
    }

    /// The per-output-frame phase increment computed by the last `start`.
    pub fn step(&self) -> f64 {
        self.step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono_sample(frames: usize, value: Sample) -> Arc<AudioBuffer> {
        let mut buffer = AudioBuffer::new(1, frames).unwrap();
        buffer.fill(value);
        Arc::new(buffer)
    }

    fn voice_at_root(sample: Arc<AudioBuffer>, rate: f64) -> SamplerVoice {
        let mut voice = SamplerVoice::default();
        voice.configure(sample, rate, rate);
        voice.start(48, 1.0, 48, 0.0);
        voice
    }

    #[test]
    fn step_is_one_at_root_note_and_equal_rates() {
        let voice = voice_at_root(mono_sample(64, 0.5), 48_000.0);
        assert!((voice.step - 1.0).abs() < 1e-12);
        assert!(!voice.finished());
    }

    #[test]
    fn step_follows_pitch_and_rate_ratio() {
        let mut voice = SamplerVoice::default();
        voice.configure(mono_sample(64, 0.5), 44_100.0, 48_000.0);

        // One octave above root doubles the step.
        voice.start(60, 1.0, 48, 0.0);
        assert!((voice.step - (44_100.0 / 48_000.0) * 2.0).abs() < 1e-9);

        // +1200 cents is also one octave.
        voice.start(48, 1.0, 48, 1200.0);
        assert!((voice.step - (44_100.0 / 48_000.0) * 2.0).abs() < 1e-9);
    }

    #[test]
    fn additive_mix_into_zeroed_output() {
        let mut voice = voice_at_root(mono_sample(512, 0.25), 48_000.0);
        let mut output = AudioBuffer::new(2, 256).unwrap();

        voice.render(&mut output, 256);

        for frame in 0..256 {
            assert!((output.at(0, frame).unwrap() - 0.25).abs() < 1e-6);
            assert!((output.at(1, frame).unwrap() - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn render_adds_on_top_of_existing_content() {
        let mut voice = voice_at_root(mono_sample(512, 0.25), 48_000.0);
        let mut output = AudioBuffer::new(1, 64).unwrap();
        output.fill(0.5);

        voice.render(&mut output, 64);

        for &sample in output.samples() {
            assert!((sample - 0.75).abs() < 1e-6);
        }
    }

    #[test]
    fn gain_clamps_velocity() {
        let mut voice = SamplerVoice::default();
        voice.configure(mono_sample(512, 1.0), 48_000.0, 48_000.0);
        voice.start(48, 2.0, 48, 0.0);

        let mut output = AudioBuffer::new(1, 16).unwrap();
        voice.render(&mut output, 16);
        for &sample in output.samples() {
            assert!((sample - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn stereo_source_keeps_channels_separate() {
        let mut buffer = AudioBuffer::new(2, 128).unwrap();
        buffer.channel_mut(0).unwrap().fill(0.5);
        buffer.channel_mut(1).unwrap().fill(-0.5);

        let mut voice = voice_at_root(Arc::new(buffer), 48_000.0);
        let mut output = AudioBuffer::new(2, 64).unwrap();
        voice.render(&mut output, 64);

        for frame in 0..64 {
            assert!((output.at(0, frame).unwrap() - 0.5).abs() < 1e-6);
            assert!((output.at(1, frame).unwrap() + 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn extra_output_channels_receive_nothing_from_stereo_source() {
        let mut buffer = AudioBuffer::new(2, 128).unwrap();
        buffer.fill(0.5);

        let mut voice = voice_at_root(Arc::new(buffer), 48_000.0);
        let mut output = AudioBuffer::new(4, 32).unwrap();
        voice.render(&mut output, 32);

        for frame in 0..32 {
            assert!(output.at(0, frame).unwrap() != 0.0);
            assert!(output.at(1, frame).unwrap() != 0.0);
            assert_eq!(output.at(2, frame).unwrap(), 0.0);
            assert_eq!(output.at(3, frame).unwrap(), 0.0);
        }
    }

    #[test]
    fn finishes_when_source_is_exhausted() {
        let mut voice = voice_at_root(mono_sample(64, 1.0), 48_000.0);
        let mut output = AudioBuffer::new(1, 128).unwrap();

        voice.render(&mut output, 128);

        assert!(voice.finished());
        // The first 63 steps read real data; everything after is silence.
        assert!(output.at(0, 0).unwrap() != 0.0);
        assert_eq!(output.at(0, 100).unwrap(), 0.0);
    }

    #[test]
    fn short_sample_leaves_voice_inert() {
        let mut voice = SamplerVoice::default();
        voice.configure(mono_sample(1, 1.0), 48_000.0, 48_000.0);
        voice.start(48, 1.0, 48, 0.0);

        assert!(voice.finished());

        let mut output = AudioBuffer::new(1, 16).unwrap();
        voice.render(&mut output, 16);
        assert!(output.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn invalid_rates_leave_voice_inert() {
        let mut voice = SamplerVoice::default();
        voice.configure(mono_sample(64, 1.0), 0.0, 48_000.0);
        voice.start(48, 1.0, 48, 0.0);
        assert!(voice.finished());

        voice.configure(mono_sample(64, 1.0), 48_000.0, -1.0);
        voice.start(48, 1.0, 48, 0.0);
        assert!(voice.finished());
    }

    #[test]
    fn interpolates_between_source_frames() {
        // Ramp 0, 1, 2, 3 played a fifth below root: step = 2^(-7/12).
        let ramp = AudioBuffer::from_interleaved(1, 4, vec![0.0f32, 1.0, 2.0, 3.0]).unwrap();
        let mut voice = SamplerVoice::default();
        voice.configure(Arc::new(ramp), 48_000.0, 48_000.0);
        voice.start(41, 1.0, 48, 0.0);

        let step = (f64::from(41 - 48) / 12.0).exp2();
        let mut output = AudioBuffer::new(1, 4).unwrap();
        voice.render(&mut output, 4);

        // On a linear ramp, linear interpolation reproduces the phase.
        for frame in 0..4 {
            let expected = (step * frame as f64) as f32;
            assert!((output.at(0, frame).unwrap() - expected).abs() < 1e-4);
        }
    }
}
