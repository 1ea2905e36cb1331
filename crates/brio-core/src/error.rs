//! Error types for brio-core.

use thiserror::Error;

/// Error type for brio-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("buffer must have at least one channel")]
    NoChannels,

    #[error(
        "sample access out of range: [ch:{channel}, fr:{frame}], \
         but size is [ch:{channels}, fr:{frames}]"
    )]
    OutOfRange {
        channel: usize,
        frame: usize,
        channels: usize,
        frames: usize,
    },

    #[error("channel {channel} out of range ({channels} available)")]
    ChannelOutOfRange { channel: usize, channels: usize },
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
