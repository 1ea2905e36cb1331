//! Interleaved multi-channel sample storage.

use crate::channel::{ChannelView, ChannelViewMut};
use crate::{Error, Result, Sample};

/// A container for multi-channel, interleaved audio data.
///
/// Samples for every channel of frame `f` are stored contiguously, so the
/// sample for channel `c` at frame `f` lives at index
/// `f * num_channels + c`. The shape is fixed at construction:
/// `samples().len() == num_channels * num_frames` always holds, and the
/// interleave stride equals the channel count.
///
/// A buffer is either uniquely owned and mutable (an output being written)
/// or shared immutably behind an `Arc` (sample data read by many voices).
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    num_channels: usize,
    num_frames: usize,
    data: Vec<Sample>,
}

impl AudioBuffer {
    /// Allocates a zero-filled buffer with the given dimensions.
    ///
    /// A channel count of zero is rejected with [`Error::NoChannels`].
    pub fn new(num_channels: usize, num_frames: usize) -> Result<Self> {
        if num_channels == 0 {
            return Err(Error::NoChannels);
        }
        Ok(Self {
            num_channels,
            num_frames,
            data: vec![0.0; num_channels * num_frames],
        })
    }

    /// Builds a buffer from existing interleaved sample data, converting by
    /// value cast.
    ///
    /// A source shorter than `num_channels * num_frames` leaves the
    /// remainder zero-filled; a longer source is truncated.
    pub fn from_interleaved<I>(num_channels: usize, num_frames: usize, samples: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<f64>,
    {
        let mut buffer = Self::new(num_channels, num_frames)?;
        buffer.copy_from(samples);
        Ok(buffer)
    }

    /// The number of audio channels in the buffer.
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// The number of sample frames (the length) of the buffer.
    pub fn num_frames(&self) -> usize {
        self.num_frames
    }

    /// The increment (in samples) to move from frame `i` to frame `i + 1`
    /// for the same channel. Equals `num_channels()`.
    #[inline]
    pub fn interleave_stride(&self) -> usize {
        self.num_channels
    }

    /// Direct access to the raw interleaved sample data.
    #[inline]
    pub fn samples(&self) -> &[Sample] {
        &self.data
    }

    #[inline]
    pub fn samples_mut(&mut self) -> &mut [Sample] {
        &mut self.data
    }

    /// Base pointer to the interleaved storage. Valid for the lifetime of
    /// the buffer.
    #[inline]
    pub fn as_ptr(&self) -> *const Sample {
        self.data.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut Sample {
        self.data.as_mut_ptr()
    }

    #[inline]
    fn index_of(&self, channel: usize, frame: usize) -> Result<usize> {
        if channel >= self.num_channels || frame >= self.num_frames {
            return Err(Error::OutOfRange {
                channel,
                frame,
                channels: self.num_channels,
                frames: self.num_frames,
            });
        }
        Ok(frame * self.num_channels + channel)
    }

    /// Bounds-checked access to an individual sample.
    #[inline]
    pub fn at(&self, channel: usize, frame: usize) -> Result<Sample> {
        Ok(self.data[self.index_of(channel, frame)?])
    }

    /// Bounds-checked mutable access to an individual sample.
    #[inline]
    pub fn at_mut(&mut self, channel: usize, frame: usize) -> Result<&mut Sample> {
        let idx = self.index_of(channel, frame)?;
        Ok(&mut self.data[idx])
    }

    /// Unchecked sample access for hot paths that have already validated.
    ///
    /// # Safety
    /// `channel < num_channels()` and `frame < num_frames()` must hold.
    #[inline]
    pub unsafe fn at_unchecked(&self, channel: usize, frame: usize) -> Sample {
        *self.data.get_unchecked(frame * self.num_channels + channel)
    }

    /// Unchecked mutable sample access.
    ///
    /// # Safety
    /// `channel < num_channels()` and `frame < num_frames()` must hold.
    #[inline]
    pub unsafe fn at_unchecked_mut(&mut self, channel: usize, frame: usize) -> &mut Sample {
        self.data.get_unchecked_mut(frame * self.num_channels + channel)
    }

    /// A read-only view over one channel.
    pub fn channel(&self, channel: usize) -> Result<ChannelView<'_>> {
        if channel >= self.num_channels {
            return Err(Error::ChannelOutOfRange {
                channel,
                channels: self.num_channels,
            });
        }
        Ok(ChannelView::new(self, channel))
    }

    /// A read-write view over one channel.
    pub fn channel_mut(&mut self, channel: usize) -> Result<ChannelViewMut<'_>> {
        if channel >= self.num_channels {
            return Err(Error::ChannelOutOfRange {
                channel,
                channels: self.num_channels,
            });
        }
        Ok(ChannelViewMut::new(self, channel))
    }

    /// Sets every sample in the buffer to `value`.
    pub fn fill(&mut self, value: Sample) {
        self.data.fill(value);
    }

    /// Multiplies every sample in the buffer by `gain`. Single pass over
    /// the interleaved storage.
    pub fn apply_gain(&mut self, gain: Sample) {
        for sample in &mut self.data {
            *sample *= gain;
        }
    }

    /// Overwrites leading samples from an interleaved source, converting by
    /// value cast. Extra source samples are ignored; the buffer shape never
    /// changes.
    pub fn copy_from<I>(&mut self, samples: I)
    where
        I: IntoIterator,
        I::Item: Into<f64>,
    {
        for (dst, src) in self.data.iter_mut().zip(samples) {
            *dst = src.into() as Sample;
        }
    }
}
