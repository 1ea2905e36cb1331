//! Hardware stream integration tests.
//!
//! These open a real output stream and are ignored by default; run them on
//! a machine with an audio device:
//!
//! ```bash
//! cargo test --test engine_tests -- --ignored
//! ```

use brio::prelude::*;

#[test]
#[ignore = "requires an audio output device"]
fn starts_stream_on_default_device() {
    let mut engine = AudioEngine::new();
    engine
        .start_stream(None, StreamSettings::default())
        .expect("stream should start");

    assert!(engine.is_running());
    assert!(engine.channels() > 0);
    assert_eq!(engine.sample_rate(), 44_100.0);

    engine.stop_stream();
    assert!(!engine.is_running());
}

#[test]
#[ignore = "requires an audio output device"]
fn start_stream_is_idempotent_while_running() {
    let mut engine = AudioEngine::new();
    engine
        .start_stream(None, StreamSettings::default())
        .expect("stream should start");
    engine
        .start_stream(None, StreamSettings::default())
        .expect("second start is a no-op");

    assert!(engine.is_running());
}

#[test]
#[ignore = "requires an audio output device"]
fn enumerates_output_devices() {
    let devices = brio::output_devices().expect("enumeration should succeed");
    assert!(!devices.is_empty());

    let default = brio::default_output_device().expect("a default device exists");
    assert!(default.output_channels > 0);
}
