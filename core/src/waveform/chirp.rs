use crate::prelude::{Sample, WaveformResult};
use crate::telemetry::log::LogManager;
use crate::waveform::buffer::{embed, rotate};
use crate::waveform::params::{FrequencyMode, SampleCounts, WaveformParameters};
use num_complex::Complex32;
use std::f64::consts::PI;

/// Result of one synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedChirp {
    /// Tapered, phase-modulated chirp alone (`n` samples).
    pub burst: Vec<Sample>,
    /// Burst embedded in a zero-filled IPP and circularly delayed (`N` samples).
    pub full: Vec<Sample>,
    /// Instantaneous frequency per burst sample, in Hz.
    pub frequency: Vec<f64>,
    /// Instantaneous phase per burst sample, in radians, including the offset.
    pub phase: Vec<f64>,
    pub counts: SampleCounts,
}

impl SynthesizedChirp {
    pub fn into_parts(self) -> (Vec<Sample>, Vec<Sample>) {
        (self.burst, self.full)
    }
}

/// Builds linear-FM bursts and their full-IPP buffers.
///
/// Sample `i` sits at `t = i / sample_rate_tx`; the phase is the closed-form
/// integral of the frequency ramp, evaluated in double precision and
/// narrowed to `f32` only when the complex sample is formed.
pub struct ChirpSynthesizer {
    logger: LogManager,
}

impl ChirpSynthesizer {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new(),
        }
    }

    pub fn synthesize(&self, params: &WaveformParameters) -> WaveformResult<SynthesizedChirp> {
        let counts = params.validate().map_err(|err| {
            self.logger
                .warn(&format!("rejected chirp parameters: {}", err));
            err
        })?;

        let n = counts.chirp;
        let (f0, _) = params.edges();
        let k = params.chirp_rate();
        let times: Vec<f64> = (0..n).map(|i| i as f64 / params.sample_rate_tx).collect();

        let ramp: Vec<f64> = times.iter().map(|&t| k * t + f0).collect();
        let frequency = match params.frequency_mode {
            FrequencyMode::Direct => ramp,
            FrequencyMode::Resampled => stair_step(&ramp, counts.decimation),
        };

        let phase: Vec<f64> = times
            .iter()
            .map(|&t| 2.0 * PI * (k * t * t * 0.5 + f0 * t) + params.phase_offset)
            .collect();

        let weights = params.window.weights(n, params.amplitude);
        let burst: Vec<Sample> = weights
            .iter()
            .zip(phase.iter())
            .map(|(&weight, &theta)| {
                Complex32::new((weight * theta.cos()) as f32, (weight * theta.sin()) as f32)
            })
            .collect();

        let full = rotate(&embed(&burst, counts.total), counts.delay);

        self.logger.detail(&format!(
            "chirp fc {:.1} Hz bw {:.1} Hz window {}: n {} N {} delay {}",
            params.center_frequency,
            params.bandwidth,
            params.window,
            counts.chirp,
            counts.total,
            counts.delay
        ));

        Ok(SynthesizedChirp {
            burst,
            full,
            frequency,
            phase,
            counts,
        })
    }
}

impl Default for ChirpSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Synthesizes one chirp, returning `(burst, full IPP buffer)`.
pub fn synthesize_chirp(params: &WaveformParameters) -> WaveformResult<(Vec<Sample>, Vec<Sample>)> {
    Ok(ChirpSynthesizer::new().synthesize(params)?.into_parts())
}

/// Keeps every `ratio`-th value and holds it for `ratio` samples.
///
/// The output has the same length as the input; a trailing group shorter
/// than `ratio` holds its value only for the remaining samples.
fn stair_step(values: &[f64], ratio: usize) -> Vec<f64> {
    let ratio = ratio.max(1);
    (0..values.len())
        .map(|idx| values[(idx / ratio) * ratio])
        .collect()
}
