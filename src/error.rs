//! Error types for the brio engine crate.

use thiserror::Error;

/// Error type for engine and device operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid device: {0}")]
    InvalidDevice(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Audio device not available")]
    DeviceNotAvailable(#[from] cpal::DefaultStreamConfigError),

    #[error("Failed to build audio stream")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Failed to play audio stream")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("Failed to enumerate devices")]
    Devices(#[from] cpal::DevicesError),

    #[error("Failed to get device name")]
    DeviceName(#[from] cpal::DeviceNameError),

    #[error("Failed to query supported stream configs")]
    SupportedConfigs(#[from] cpal::SupportedStreamConfigsError),

    #[error(transparent)]
    Core(#[from] brio_core::Error),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
