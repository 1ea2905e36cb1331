//! Real-time DSP building blocks for the brio engine.
//!
//! - [`AudioSource`] — the capability shared by everything that renders
//!   audio: add a block into an output buffer, report completion
//! - [`Mixer`] — a lock-free summing bus over a dynamic set of sources
//! - [`Sampler`] / [`SamplerVoice`] — polyphonic, pitch-shifted sample
//!   playback over a shared buffer
//!
//! Everything on the processing path is real-time safe: no allocation, no
//! locking, no I/O, work proportional to the block length.

mod source;
pub use source::AudioSource;

mod mixer;
pub use mixer::Mixer;

mod sampler;
pub use sampler::{Sampler, SamplerVoice};
