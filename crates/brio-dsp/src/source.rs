//! The capability shared by everything that can render audio.

use brio_core::AudioBuffer;

/// A producer of audio blocks.
///
/// The contract is *additive mixing*: `process` adds this source's next
/// block into `output` and must never clear or overwrite it. Clearing is the
/// caller's job (the engine zeroes the mix buffer once per block).
///
/// `process` runs on the audio thread and must be real-time safe: no
/// allocation, no locking, no I/O, and work proportional to
/// `output.num_frames()`.
pub trait AudioSource: Send + Sync {
    /// Adds this source's next block into `output`.
    fn process(&self, output: &mut AudioBuffer);

    /// True when the source has no more audio to produce and will
    /// contribute silence forever.
    ///
    /// Advisory: callers may still invoke `process` on a finished source,
    /// which must then be a no-op. Intended for the control side; a
    /// composite source is finished iff all of its children are.
    fn is_finished(&self) -> bool;
}
