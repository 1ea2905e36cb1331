//! # Brio — a lightweight real-time audio engine core
//!
//! Foundation for trackers, samplers, and interactive audio applications.
//!
//! ## Architecture
//!
//! Brio is an umbrella crate over two subsystems plus the engine itself:
//!
//! - **brio-core** — interleaved [`AudioBuffer`] storage, strided
//!   [`ChannelView`]s, and the [`BufferStore`] registry that keeps shared
//!   sample data alive
//! - **brio-dsp** — the [`AudioSource`] capability, the lock-free [`Mixer`]
//!   summing bus, and the polyphonic [`Sampler`]
//! - [`AudioEngine`] — owns the hardware output stream and drives the block
//!   loop: clear the mix buffer, sum the master mixer, publish to the device
//!
//! The audio thread never allocates, locks, or blocks. Control threads
//! mutate the graph through copy-on-write snapshots that the callback picks
//! up at block boundaries.
//!
//! ## Quick start
//!
//! ```ignore
//! use brio::prelude::*;
//! use std::sync::Arc;
//!
//! let mut engine = AudioEngine::new();
//! engine.start_stream(None, StreamSettings::default())?;
//!
//! let sample = Arc::new(AudioBuffer::from_interleaved(1, 48_000, my_samples)?);
//! let sampler = Arc::new(Sampler::with_polyphony(sample, 8));
//! sampler.set_engine_rate(engine.sample_rate());
//!
//! engine.master_mixer().add_source(sampler.clone());
//! sampler.note_on(48, 1.0);
//! ```

/// Re-export of brio-core for direct access.
pub use brio_core as core;

pub use brio_core::{
    AudioBuffer, BufferStore, ChannelView, ChannelViewMut, RawChannel, RawChannelMut, Sample,
};

/// Re-export of brio-dsp for direct access.
pub use brio_dsp as dsp;

pub use brio_dsp::{AudioSource, Mixer, Sampler, SamplerVoice};

mod devices;
pub use devices::{default_output_device, output_devices, DeviceInfo};

mod engine;
pub use engine::{AudioEngine, StreamSettings};

mod error;
pub use error::{Error, Result};

/// Convenience prelude for common imports.
pub mod prelude {
    pub use crate::{
        AudioBuffer, AudioEngine, AudioSource, BufferStore, Mixer, Sampler, StreamSettings,
    };
}
