//! Polyphonic sample-playback instrument.

mod voice;
pub use voice::SamplerVoice;

use std::cell::UnsafeCell;
use std::sync::Arc;

use brio_core::AudioBuffer;

use crate::AudioSource;

/// Default root note (C3): a note at the root plays the sample at its
/// native pitch.
const DEFAULT_ROOT_NOTE: i32 = 48;

struct SamplerState {
    sample: Arc<AudioBuffer>,
    engine_rate: f64,
    native_rate: f64,
    root_note: i32,
    tune_cents: f64,
    voices: Vec<SamplerVoice>,
}

impl SamplerState {
    fn reconfigure_voices(&mut self) {
        for voice in &mut self.voices {
            voice.configure(self.sample.clone(), self.native_rate, self.engine_rate);
        }
    }
}

/// A polyphonic instrument playing one shared sample buffer.
///
/// Uses `UnsafeCell` for interior mutability so a sampler can sit behind an
/// `Arc<dyn AudioSource>` in a mixer snapshot. Callers must drive a given
/// sampler from at most one processing context at a time; the rate setters
/// additionally require that no context is processing the sampler while
/// they run. Sharing one sampler between two concurrently-running mixers is
/// not supported.
pub struct Sampler {
    state: UnsafeCell<SamplerState>,
}

// One processing context at a time, per the contract above.
unsafe impl Send for Sampler {}
unsafe impl Sync for Sampler {}

impl Sampler {
    /// Creates a single-voice sampler over `sample`.
    pub fn new(sample: Arc<AudioBuffer>) -> Self {
        Self::with_polyphony(sample, 1)
    }

    /// Creates a sampler with `max_polyphony` pre-allocated voices (at
    /// least one).
    pub fn with_polyphony(sample: Arc<AudioBuffer>, max_polyphony: usize) -> Self {
        let mut state = SamplerState {
            sample,
            engine_rate: 48_000.0,
            native_rate: 44_100.0,
            root_note: DEFAULT_ROOT_NOTE,
            tune_cents: 0.0,
            voices: vec![SamplerVoice::default(); max_polyphony.max(1)],
        };
        state.reconfigure_voices();
        Self {
            state: UnsafeCell::new(state),
        }
    }

    #[inline]
    #[allow(clippy::mut_from_ref)]
    fn state(&self) -> &mut SamplerState {
        // Sound under the single-processing-context contract documented on
        // the type.
        unsafe { &mut *self.state.get() }
    }

    /// Number of pre-allocated voices.
    pub fn max_polyphony(&self) -> usize {
        self.state().voices.len()
    }

    /// Sets the output sample rate and re-configures every voice.
    ///
    /// Control-side only, and only while no audio context is processing
    /// this sampler.
    pub fn set_engine_rate(&self, rate: f64) {
        let state = self.state();
        state.engine_rate = rate;
        state.reconfigure_voices();
    }

    /// Sets the rate the sample was captured at and re-configures every
    /// voice. Same restrictions as [`Self::set_engine_rate`].
    pub fn set_native_rate(&self, rate: f64) {
        let state = self.state();
        state.native_rate = rate;
        state.reconfigure_voices();
    }

    /// Effective on the next `note_on`.
    pub fn set_root_note(&self, note: i32) {
        self.state().root_note = note;
    }

    /// Effective on the next `note_on`.
    pub fn set_tune_cents(&self, cents: f64) {
        self.state().tune_cents = cents;
    }

    /// Starts a note on the first finished voice.
    ///
    /// When every voice is busy, voice 0 is stolen. That policy is
    /// deliberately primitive; richer steals (oldest, quietest) are a known
    /// limitation.
    pub fn note_on(&self, note: i32, velocity: f32) {
        let state = self.state();
        let root_note = state.root_note;
        let tune_cents = state.tune_cents;

        if let Some(voice) = state.voices.iter_mut().find(|v| v.finished()) {
            voice.start(note, velocity, root_note, tune_cents);
            return;
        }
        if let Some(voice) = state.voices.first_mut() {
            voice.start(note, velocity, root_note, tune_cents);
        }
    }

    /// Placeholder: voices currently run to their natural end.
    pub fn note_off(&self, _note: i32) {}
}

impl AudioSource for Sampler {
    fn process(&self, output: &mut AudioBuffer) {
        let state = self.state();
        let frames = output.num_frames();
        for voice in &mut state.voices {
            if !voice.finished() {
                voice.render(output, frames);
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.state().voices.iter().all(SamplerVoice::finished)
    }
}
