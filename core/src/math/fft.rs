use num_complex::Complex32;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps the `rustfft` planner for spectral checks on bursts.
pub struct FftHelper {
    fft: Arc<dyn Fft<f32>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self { fft, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forward transform, zero-padding or truncating the input to the plan size.
    pub fn forward(&self, input: &[Complex32]) -> Vec<Complex32> {
        let mut buffer = vec![Complex32::zero(); self.size];
        for (dst, src) in buffer.iter_mut().zip(input.iter()) {
            *dst = *src;
        }
        self.fft.process(&mut buffer);
        buffer
    }

    pub fn power_spectrum(&self, input: &[Complex32]) -> Vec<f32> {
        self.forward(input).iter().map(|c| c.norm_sqr()).collect()
    }

    /// Baseband frequency (Hz, in `[-fs/2, fs/2)`) of the strongest bin.
    pub fn dominant_frequency(&self, input: &[Complex32], sample_rate: f64) -> f64 {
        let power = self.power_spectrum(input);
        let (bin, _) = power
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (idx, &p)| {
                if p > best.1 {
                    (idx, p)
                } else {
                    best
                }
            });
        let signed = if bin >= self.size.div_ceil(2) {
            bin as f64 - self.size as f64
        } else {
            bin as f64
        };
        signed * sample_rate / self.size as f64
    }
}
