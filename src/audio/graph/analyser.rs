// src/audio/graph/analyser.rs
//! FFT analyser producing byte-scaled frequency magnitudes.

use std::sync::{Arc, Mutex};

use ringbuf::{HeapRb, traits::*};
use rustfft::{Fft, FftPlanner, num_complex::Complex};

use super::GraphError;
use super::tap::CaptureBuffer;

pub const MIN_FFT_SIZE: usize = 32;
pub const MAX_FFT_SIZE: usize = 32_768;
/// Largest value a frequency bin can hold.
pub const MAX_MAGNITUDE: u8 = u8::MAX;

const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;

/// Maintains a rolling transform of the tapped signal.
///
/// The frequency buffer is allocated once with `fft_size / 2` bins and is
/// overwritten in place on every poll.
pub struct Analyser {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    /// Hann window, precomputed.
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
    time_data: Vec<f32>,
    /// Linear magnitudes blended across polls.
    smoothed: Vec<f32>,
    frequency_data: Vec<u8>,
    smoothing: f32,
    capture: CaptureBuffer,
}

impl Analyser {
    /// `fft_size` must be a power of two in `[32, 32768]`; `smoothing` in `[0, 1)`.
    pub fn new(fft_size: usize, smoothing: f32) -> Result<Self, GraphError> {
        if !fft_size.is_power_of_two() || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&fft_size) {
            return Err(GraphError::InvalidFftSize(fft_size));
        }
        if !(0.0..1.0).contains(&smoothing) {
            return Err(GraphError::InvalidSmoothing(smoothing));
        }

        let fft = FftPlanner::new().plan_fft_forward(fft_size);
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / fft_size as f32).cos())
            })
            .collect();
        let bins = fft_size / 2;

        Ok(Self {
            fft,
            fft_size,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
            time_data: vec![0.0; fft_size],
            smoothed: vec![0.0; bins],
            frequency_data: vec![0; bins],
            smoothing,
            capture: Arc::new(Mutex::new(HeapRb::new(fft_size))),
        })
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn bin_count(&self) -> usize {
        self.frequency_data.len()
    }

    /// Buffer the tap writes into.
    pub fn capture_buffer(&self) -> CaptureBuffer {
        self.capture.clone()
    }

    /// Pull the newest window from the tap and refresh the frequency buffer.
    pub fn frequency_data(&mut self) -> &[u8] {
        self.fill_time_data();

        for ((slot, &sample), &w) in self
            .scratch
            .iter_mut()
            .zip(self.time_data.iter())
            .zip(self.window.iter())
        {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let scale = 1.0 / self.fft_size as f32;
        let tau = self.smoothing;
        let range = MAX_DECIBELS - MIN_DECIBELS;
        for ((bin, smoothed), byte) in self
            .scratch
            .iter()
            .zip(self.smoothed.iter_mut())
            .zip(self.frequency_data.iter_mut())
        {
            let magnitude = bin.norm() * scale;
            *smoothed = tau * *smoothed + (1.0 - tau) * magnitude;
            if !smoothed.is_finite() {
                *smoothed = 0.0;
            }

            let db = 20.0 * smoothed.max(1e-10).log10();
            let scaled = (db - MIN_DECIBELS) / range * MAX_MAGNITUDE as f32;
            *byte = scaled.clamp(0.0, MAX_MAGNITUDE as f32) as u8;
        }

        &self.frequency_data
    }

    /// Copy the captured window right-aligned into `time_data`, zero-padding the front.
    fn fill_time_data(&mut self) {
        self.time_data.fill(0.0);
        if let Ok(buf) = self.capture.lock() {
            let available = buf.occupied_len().min(self.fft_size);
            let skip = buf.occupied_len() - available;
            let offset = self.fft_size - available;
            for (slot, &sample) in self.time_data[offset..]
                .iter_mut()
                .zip(buf.iter().skip(skip))
            {
                *slot = sample;
            }
        }
    }
}
