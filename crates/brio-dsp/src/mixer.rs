//! Lock-free summing bus.
//!
//! ```text
//! Control threads                      Audio thread
//!       │                                   │
//!       ▼                                   ▼
//! ┌──────────────┐                  ┌─────────────────────┐
//! │ add_source   │───ArcSwap───────▶│ process()           │
//! │ clear_sources│  (copy-on-write) │  one acquire-load,  │
//! └──────────────┘                  │  iterate snapshot   │
//!                                   └─────────────────────┘
//! ```
//!
//! Writers publish a fresh immutable snapshot of the source list; the audio
//! thread takes one acquire-load per block and never allocates or blocks. A
//! reader holding a snapshot keeps it alive until its block ends, even if a
//! writer swaps in a new one mid-block.

use std::sync::Arc;

use arc_swap::ArcSwap;
use brio_core::AudioBuffer;

use crate::AudioSource;

type SourceList = Vec<Arc<dyn AudioSource>>;

/// An [`AudioSource`] that sums the output of a dynamic set of sources.
///
/// Sources are processed in insertion order. Floating-point summation is
/// not associative, so callers depending on bit-exact output must preserve
/// that order.
pub struct Mixer {
    sources: ArcSwap<SourceList>,
}

impl Mixer {
    /// Creates an empty mixer.
    pub fn new() -> Self {
        Self {
            sources: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Adds a source to the bus.
    ///
    /// Copy-on-write with a compare-and-swap retry loop, so concurrent
    /// `add_source` calls cannot lose each other's additions. Readers mid-
    /// block keep rendering their old snapshot; the new source is picked up
    /// at the next block boundary.
    pub fn add_source(&self, source: Arc<dyn AudioSource>) {
        self.sources.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(source.clone());
            next
        });
    }

    /// Removes every source from the bus. Unconditional store.
    pub fn clear_sources(&self) {
        self.sources.store(Arc::new(Vec::new()));
    }

    /// Number of sources in the current snapshot.
    pub fn num_sources(&self) -> usize {
        self.sources.load().len()
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSource for Mixer {
    /// Sums every source in the current snapshot into `output`.
    ///
    /// Does not clear `output`; the caller is responsible for zeroing the
    /// mix buffer before the block.
    fn process(&self, output: &mut AudioBuffer) {
        let snapshot = self.sources.load();
        for source in snapshot.iter() {
            source.process(output);
        }
    }

    /// True iff every source in the current snapshot is finished.
    /// Vacuously true for an empty mixer. Control-side.
    fn is_finished(&self) -> bool {
        self.sources.load().iter().all(|source| source.is_finished())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// Adds a constant to every sample of the output.
    struct ConstantSource {
        value: f32,
        finished: AtomicBool,
    }

    impl ConstantSource {
        fn new(value: f32) -> Self {
            Self {
                value,
                finished: AtomicBool::new(false),
            }
        }
    }

    impl AudioSource for ConstantSource {
        fn process(&self, output: &mut AudioBuffer) {
            if self.finished.load(Ordering::Acquire) {
                return;
            }
            for sample in output.samples_mut() {
                *sample += self.value;
            }
        }

        fn is_finished(&self) -> bool {
            self.finished.load(Ordering::Acquire)
        }
    }

    #[test]
    fn sums_sources_in_insertion_order() {
        let mixer = Mixer::new();
        mixer.add_source(Arc::new(ConstantSource::new(0.2)));
        mixer.add_source(Arc::new(ConstantSource::new(0.3)));

        let mut output = AudioBuffer::new(1, 16).unwrap();
        mixer.process(&mut output);

        for &sample in output.samples() {
            assert!((sample - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn process_is_additive_not_overwriting() {
        let mixer = Mixer::new();
        mixer.add_source(Arc::new(ConstantSource::new(0.25)));

        // Sentinel pre-fill: the source's contribution must be added on top.
        let mut output = AudioBuffer::new(2, 8).unwrap();
        output.fill(0.5);
        mixer.process(&mut output);

        for &sample in output.samples() {
            assert!((sample - 0.75).abs() < 1e-6);
        }
    }

    #[test]
    fn clear_sources_yields_silence() {
        let mixer = Mixer::new();
        mixer.add_source(Arc::new(ConstantSource::new(0.5)));
        mixer.clear_sources();

        let mut output = AudioBuffer::new(1, 16).unwrap();
        mixer.process(&mut output);

        assert!(output.samples().iter().all(|&s| s == 0.0));
        assert_eq!(mixer.num_sources(), 0);
    }

    #[test]
    fn empty_mixer_is_finished() {
        assert!(Mixer::new().is_finished());
    }

    #[test]
    fn finished_tracks_children() {
        let mixer = Mixer::new();
        let source = Arc::new(ConstantSource::new(0.1));
        mixer.add_source(source.clone());

        assert!(!mixer.is_finished());
        source.finished.store(true, Ordering::Release);
        assert!(mixer.is_finished());
    }

    #[test]
    fn mixers_nest() {
        let inner = Arc::new(Mixer::new());
        inner.add_source(Arc::new(ConstantSource::new(0.2)));

        let outer = Mixer::new();
        outer.add_source(inner);
        outer.add_source(Arc::new(ConstantSource::new(0.1)));

        let mut output = AudioBuffer::new(2, 4).unwrap();
        outer.process(&mut output);

        for &sample in output.samples() {
            assert!((sample - 0.3).abs() < 1e-6);
        }
    }

    #[test]
    fn concurrent_adds_are_not_lost() {
        let mixer = Arc::new(Mixer::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let mixer = mixer.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        mixer.add_source(Arc::new(ConstantSource::new(0.01)));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(mixer.num_sources(), 8 * 50);
    }
}
