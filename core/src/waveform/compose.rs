use crate::math::window::WindowKind;
use crate::prelude::{PulseComposition, Sample, WaveformError, WaveformResult};
use crate::telemetry::log::LogManager;
use crate::waveform::buffer::tile;
use crate::waveform::chirp::ChirpSynthesizer;
use crate::waveform::params::{FrequencyMode, WaveformParameters};
use ndarray::Array2;
use num_complex::Complex32;
use serde::{Deserialize, Serialize};

/// Timing shared by both chirps of a pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PairTiming {
    pub ipp: f64,
    pub sample_rate_tx: f64,
    pub sample_rate_rx: f64,
    /// Delay of the first chirp, in microseconds.
    #[serde(default)]
    pub base_delay_us: f64,
}

/// Per-chirp description inside a pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PulseSpec {
    pub amplitude: f64,
    pub duty_cycle: f64,
    pub center_frequency: f64,
    pub bandwidth: f64,
    #[serde(default)]
    pub window: WindowKind,
}

impl PulseSpec {
    pub fn to_parameters(&self, timing: &PairTiming, delay_us: f64) -> WaveformParameters {
        WaveformParameters {
            amplitude: self.amplitude,
            ipp: timing.ipp,
            duty_cycle: self.duty_cycle,
            sample_rate_tx: timing.sample_rate_tx,
            sample_rate_rx: timing.sample_rate_rx,
            center_frequency: self.center_frequency,
            bandwidth: self.bandwidth,
            delay_us,
            window: self.window,
            frequency_mode: FrequencyMode::Direct,
            phase_offset: 0.0,
        }
    }

    /// Time the chirp occupies within the IPP, in microseconds.
    pub fn occupied_us(&self, timing: &PairTiming) -> f64 {
        self.duty_cycle * timing.ipp * (1.0e6 / 1.0e2)
    }

    fn is_silent(&self) -> bool {
        self.duty_cycle == 0.0
    }
}

/// Transmit sequence made of one or more IPP profiles laid back to back.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositePulse {
    samples: Vec<Sample>,
    profile_lengths: Vec<usize>,
}

impl CompositePulse {
    pub fn single(samples: Vec<Sample>) -> Self {
        let profile_lengths = vec![samples.len()];
        Self {
            samples,
            profile_lengths,
        }
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<Sample> {
        self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Length of each IPP profile, in transmit order.
    pub fn profile_lengths(&self) -> &[usize] {
        &self.profile_lengths
    }

    pub fn profile_count(&self) -> usize {
        self.profile_lengths.len()
    }

    /// Profiles as a `profile x sample` matrix, when every profile has one length.
    pub fn profiles(&self) -> Option<Array2<Complex32>> {
        let width = *self.profile_lengths.first()?;
        if self.profile_lengths.iter().any(|&len| len != width) {
            return None;
        }
        Array2::from_shape_vec((self.profile_lengths.len(), width), self.samples.clone()).ok()
    }
}

/// Complementary double chirp: the second chirp follows the first inside one IPP.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComplementaryPair {
    pub timing: PairTiming,
    pub first: PulseSpec,
    pub second: PulseSpec,
}

/// Independent double chirp: `rep1` IPPs of the first chirp, then `rep2` of the second.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SequentialPair {
    pub timing: PairTiming,
    pub first: PulseSpec,
    pub second: PulseSpec,
    #[serde(default = "default_repetitions")]
    pub rep1: usize,
    #[serde(default = "default_repetitions")]
    pub rep2: usize,
}

fn default_repetitions() -> usize {
    1
}

/// Combines pairs of synthesized chirps into composite transmit sequences.
pub struct PulseComposer {
    synthesizer: ChirpSynthesizer,
    logger: LogManager,
}

impl PulseComposer {
    pub fn new() -> Self {
        Self {
            synthesizer: ChirpSynthesizer::new(),
            logger: LogManager::new(),
        }
    }

    /// Sums the two full-IPP buffers; the second chirp is delayed by the
    /// first chirp's occupied time so it starts right after it.
    ///
    /// A chirp with zero duty cycle is treated as a silent slot.
    pub fn complementary(&self, pair: &ComplementaryPair) -> WaveformResult<CompositePulse> {
        let timing = &pair.timing;
        let first_delay = timing.base_delay_us;
        let second_delay = timing.base_delay_us + pair.first.occupied_us(timing);

        let first = self.full_or_silent(&pair.first, timing, first_delay)?;
        let second = self.full_or_silent(&pair.second, timing, second_delay)?;

        let samples = match (first, second) {
            (Some(a), Some(b)) => {
                if a.len() != b.len() {
                    self.logger.warn(&format!(
                        "complementary pair length mismatch: {} vs {}",
                        a.len(),
                        b.len()
                    ));
                    return Err(WaveformError::LengthMismatch {
                        first: a.len(),
                        second: b.len(),
                    });
                }
                a.iter().zip(b.iter()).map(|(x, y)| x + y).collect()
            }
            (Some(only), None) | (None, Some(only)) => only,
            (None, None) => {
                return Err(WaveformError::InvalidParameter(
                    "both chirps of the pair have zero duty cycle".into(),
                ))
            }
        };

        self.logger.record(&format!(
            "complementary pair composed: {} samples",
            samples.len()
        ));
        Ok(CompositePulse::single(samples))
    }

    /// Tiles each chirp's full-IPP buffer and concatenates the two trains.
    pub fn sequential(&self, pair: &SequentialPair) -> WaveformResult<CompositePulse> {
        if pair.rep1 == 0 || pair.rep2 == 0 {
            return Err(WaveformError::InvalidParameter(format!(
                "repetitions must be positive, got {} and {}",
                pair.rep1, pair.rep2
            )));
        }

        let timing = &pair.timing;
        let first = self
            .synthesizer
            .synthesize(&pair.first.to_parameters(timing, timing.base_delay_us))?
            .full;
        let second = self
            .synthesizer
            .synthesize(&pair.second.to_parameters(timing, timing.base_delay_us))?
            .full;

        let mut profile_lengths = vec![first.len(); pair.rep1];
        profile_lengths.extend(std::iter::repeat(second.len()).take(pair.rep2));

        let mut samples = tile(&first, pair.rep1);
        samples.extend(tile(&second, pair.rep2));

        self.logger.record(&format!(
            "sequential pair composed: {}x{} + {}x{} samples",
            pair.rep1,
            first.len(),
            pair.rep2,
            second.len()
        ));
        Ok(CompositePulse {
            samples,
            profile_lengths,
        })
    }

    fn full_or_silent(
        &self,
        spec: &PulseSpec,
        timing: &PairTiming,
        delay_us: f64,
    ) -> WaveformResult<Option<Vec<Sample>>> {
        if spec.is_silent() {
            return Ok(None);
        }
        let chirp = self
            .synthesizer
            .synthesize(&spec.to_parameters(timing, delay_us))?;
        Ok(Some(chirp.full))
    }
}

impl Default for PulseComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseComposition for ComplementaryPair {
    fn name(&self) -> &'static str {
        "complementary"
    }

    fn compose(&self) -> WaveformResult<CompositePulse> {
        PulseComposer::new().complementary(self)
    }
}

impl PulseComposition for SequentialPair {
    fn name(&self) -> &'static str {
        "sequential"
    }

    fn compose(&self) -> WaveformResult<CompositePulse> {
        PulseComposer::new().sequential(self)
    }
}

/// Complementary double chirp (superposition within one IPP).
#[allow(clippy::too_many_arguments)]
pub fn compose_union1(
    ipp: f64,
    sample_rate_tx: f64,
    sample_rate_rx: f64,
    amplitude_1: f64,
    amplitude_2: f64,
    duty_cycle_1: f64,
    duty_cycle_2: f64,
    center_frequency_1: f64,
    center_frequency_2: f64,
    bandwidth_1: f64,
    bandwidth_2: f64,
    base_delay_us: f64,
    window_1: WindowKind,
    window_2: WindowKind,
) -> WaveformResult<Vec<Sample>> {
    let pair = ComplementaryPair {
        timing: PairTiming {
            ipp,
            sample_rate_tx,
            sample_rate_rx,
            base_delay_us,
        },
        first: PulseSpec {
            amplitude: amplitude_1,
            duty_cycle: duty_cycle_1,
            center_frequency: center_frequency_1,
            bandwidth: bandwidth_1,
            window: window_1,
        },
        second: PulseSpec {
            amplitude: amplitude_2,
            duty_cycle: duty_cycle_2,
            center_frequency: center_frequency_2,
            bandwidth: bandwidth_2,
            window: window_2,
        },
    };
    Ok(pair.compose()?.into_samples())
}

/// Independent double chirp (concatenation of tiled IPP buffers).
#[allow(clippy::too_many_arguments)]
pub fn compose_union2(
    ipp: f64,
    sample_rate_tx: f64,
    sample_rate_rx: f64,
    amplitude_1: f64,
    amplitude_2: f64,
    duty_cycle_1: f64,
    duty_cycle_2: f64,
    center_frequency_1: f64,
    center_frequency_2: f64,
    bandwidth_1: f64,
    bandwidth_2: f64,
    base_delay_us: f64,
    window_1: WindowKind,
    window_2: WindowKind,
    rep1: usize,
    rep2: usize,
) -> WaveformResult<Vec<Sample>> {
    let pair = SequentialPair {
        timing: PairTiming {
            ipp,
            sample_rate_tx,
            sample_rate_rx,
            base_delay_us,
        },
        first: PulseSpec {
            amplitude: amplitude_1,
            duty_cycle: duty_cycle_1,
            center_frequency: center_frequency_1,
            bandwidth: bandwidth_1,
            window: window_1,
        },
        second: PulseSpec {
            amplitude: amplitude_2,
            duty_cycle: duty_cycle_2,
            center_frequency: center_frequency_2,
            bandwidth: bandwidth_2,
            window: window_2,
        },
        rep1,
        rep2,
    };
    Ok(pair.compose()?.into_samples())
}
