//! The audio engine: owns the output stream and the master mix bus.

use std::sync::Arc;

use brio_core::AudioBuffer;
use brio_dsp::{AudioSource, Mixer};
use cpal::traits::{DeviceTrait, StreamTrait};
use tracing::{info, warn};

use crate::devices;
use crate::{Error, Result};

/// Stream parameters requested from the device.
#[derive(Debug, Clone, Copy)]
pub struct StreamSettings {
    pub sample_rate: u32,
    /// Frames per callback block.
    pub block_size: u32,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            block_size: 512,
        }
    }
}

impl StreamSettings {
    pub fn validate(&self) -> Result<()> {
        if !(8_000..=384_000).contains(&self.sample_rate) {
            return Err(Error::InvalidConfig(format!(
                "sample_rate {} out of range (8000-384000 Hz)",
                self.sample_rate
            )));
        }
        if self.block_size == 0 {
            return Err(Error::InvalidConfig("block_size must be nonzero".into()));
        }
        Ok(())
    }
}

/// Wrapper to hold `cpal::Stream` in a `Send` context.
///
/// # Safety
/// `cpal::Stream` is `!Send` due to platform internals. The stream is only
/// created and dropped by the thread driving the engine.
struct StreamHandle(#[allow(dead_code)] cpal::Stream);

unsafe impl Send for StreamHandle {}

/// Drives the block loop: owns the hardware stream, the mix buffer, and the
/// master [`Mixer`].
///
/// The engine's callback clears the mix buffer, asks the master mixer to sum
/// every source into it, and copies the interleaved result to the device.
/// Control threads mutate the graph through [`Self::master_mixer`] while the
/// stream runs.
pub struct AudioEngine {
    master: Arc<Mixer>,
    stream: Option<StreamHandle>,
    sample_rate: f64,
    channels: usize,
    block_size: usize,
}

impl AudioEngine {
    pub fn new() -> Self {
        Self {
            master: Arc::new(Mixer::new()),
            stream: None,
            sample_rate: 0.0,
            channels: 0,
            block_size: 0,
        }
    }

    /// The master summing bus. Add and remove sources here from the control
    /// side; changes become audible at the next block boundary.
    pub fn master_mixer(&self) -> &Arc<Mixer> {
        &self.master
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Negotiated output rate; 0 until a stream has been started.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Negotiated channel count; 0 until a stream has been started.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Opens and starts an output stream on the given device (`None` = the
    /// default output).
    ///
    /// The channel count comes from the device; the sample rate and block
    /// size come from `settings`. A stream that is already running is left
    /// alone.
    pub fn start_stream(
        &mut self,
        device_index: Option<usize>,
        settings: StreamSettings,
    ) -> Result<()> {
        if self.stream.is_some() {
            return Ok(());
        }
        settings.validate()?;

        let device = devices::get_device(device_index)?;
        let device_config = device.default_output_config()?;
        let channels = device_config.channels();

        let config = cpal::StreamConfig {
            channels,
            sample_rate: cpal::SampleRate(settings.sample_rate),
            buffer_size: cpal::BufferSize::Fixed(settings.block_size),
        };

        let master = self.master.clone();
        let block_size = settings.block_size as usize;
        let stream = match device_config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, master, block_size)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, master, block_size)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, master, block_size)?,
            format => {
                return Err(Error::InvalidConfig(format!(
                    "Unsupported sample format: {format:?}"
                )));
            }
        };

        stream.play()?;
        self.stream = Some(StreamHandle(stream));
        self.sample_rate = f64::from(settings.sample_rate);
        self.channels = channels as usize;
        self.block_size = block_size;

        info!(
            device = %device.name().unwrap_or_default(),
            channels = self.channels,
            sample_rate = self.sample_rate,
            block_size = self.block_size,
            "stream started"
        );
        Ok(())
    }

    /// Stops and closes the stream. Safe to call when already stopped.
    pub fn stop_stream(&mut self) {
        if self.stream.take().is_some() {
            info!("stream stopped");
        }
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for AudioEngine {
    fn drop(&mut self) {
        self.stop_stream();
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    master: Arc<Mixer>,
    block_size: usize,
) -> Result<cpal::Stream>
where
    T: cpal::SizedSample + cpal::FromSample<f32>,
{
    let channels = config.channels as usize;

    // The mix buffer lives in the callback closure. It is replaced only if
    // the device delivers a different block length than requested, which
    // settles after the first callback.
    let mut mix = AudioBuffer::new(channels, block_size)?;

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let frames = data.len() / channels;
                if frames != mix.num_frames() {
                    if let Ok(resized) = AudioBuffer::new(channels, frames) {
                        mix = resized;
                    }
                }

                render_block(&master, &mut mix);
                write_output(data, &mix);
            }));

            if result.is_err() {
                output_silence(data);
            }
        },
        // Underruns and device failures surface here; log and carry on.
        |err| warn!(%err, "output stream error"),
        None,
    )?;

    Ok(stream)
}

/// One block: clear the mix buffer, then let the master bus sum into it.
#[inline]
fn render_block(master: &Mixer, mix: &mut AudioBuffer) {
    mix.fill(0.0);
    master.process(mix);
}

/// Convert the interleaved mix to the device sample format.
#[inline]
fn write_output<T: cpal::SizedSample + cpal::FromSample<f32>>(data: &mut [T], mix: &AudioBuffer) {
    for (dst, &src) in data.iter_mut().zip(mix.samples()) {
        *dst = T::from_sample(src);
    }
}

/// Panic recovery: hand the device silence rather than garbage.
#[inline]
fn output_silence<T: cpal::SizedSample + cpal::FromSample<f32>>(data: &mut [T]) {
    for sample in data.iter_mut() {
        *sample = T::from_sample(0.0);
    }
}
