//! Core audio containers for the brio engine.
//!
//! Everything in this crate is about holding and viewing sample data:
//!
//! - [`AudioBuffer`] — fixed-shape, interleaved multi-channel storage
//! - [`ChannelView`] / [`ChannelViewMut`] — strided per-channel views
//! - [`BufferStore`] — thread-safe keyed registry of shared sample buffers
//!
//! The DSP layer (`brio-dsp`) builds on these; nothing here touches audio
//! hardware.

pub mod error;
pub use error::{Error, Result};

mod buffer;
pub use buffer::AudioBuffer;

mod channel;
pub use channel::{ChannelView, ChannelViewMut, RawChannel, RawChannelMut};

mod store;
pub use store::BufferStore;

/// A single audio sample. Storage is 32-bit float throughout.
pub type Sample = f32;
