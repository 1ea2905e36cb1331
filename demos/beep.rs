//! Play a short decaying tone through the default output device.
//!
//! ```bash
//! cargo run --example beep
//! ```

use std::sync::Arc;
use std::time::Duration;

use brio::prelude::*;

fn main() -> brio::Result<()> {
    tracing_subscriber::fmt::init();

    let mut engine = AudioEngine::new();
    engine.start_stream(None, StreamSettings::default())?;

    // A 300ms exponentially decaying sine at the sample's native rate.
    let rate = engine.sample_rate();
    let frames = (rate * 0.3) as usize;
    let tone = (0..frames).map(|i| {
        let t = i as f64 / rate;
        (2.0 * std::f64::consts::PI * 440.0 * t).sin() * (-t * 8.0).exp() * 0.5
    });
    let sample = Arc::new(AudioBuffer::from_interleaved(1, frames, tone)?);

    let store = BufferStore::new();
    let key = store.insert(sample);

    let sampler = Arc::new(Sampler::with_polyphony(store.get(key).unwrap(), 4));
    sampler.set_native_rate(rate);
    sampler.set_engine_rate(rate);
    engine.master_mixer().add_source(sampler.clone());

    for note in [48, 52, 55, 60] {
        sampler.note_on(note, 0.9);
        std::thread::sleep(Duration::from_millis(250));
    }
    std::thread::sleep(Duration::from_millis(500));

    engine.stop_stream();
    Ok(())
}
