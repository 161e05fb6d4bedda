use anyhow::{ensure, Context};
use chirpcore::tx_interface::PulseScheme;
use chirpcore::waveform::{
    ComplementaryPair, FrequencyMode, PairTiming, PulseSpec, SequentialPair, WaveformParameters,
};
use chirpcore::WindowKind;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Pulse plan describing what the transmitter should play.
///
/// Defaults reproduce the SOPHy dual-chirp experiment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanConfig {
    pub scheme: PulseScheme,
    pub ipp: f64,
    pub sample_rate_tx: f64,
    pub sample_rate_rx: f64,
    pub base_delay_us: f64,
    pub first: PulseSpec,
    pub second: Option<PulseSpec>,
    pub rep1: usize,
    pub rep2: usize,
    /// Only used by the single-chirp scheme.
    pub frequency_mode: FrequencyMode,
    /// Only used by the single-chirp scheme.
    pub phase_offset: f64,
    pub h0: f64,
    pub rmix: f64,
    pub description: Option<String>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            scheme: PulseScheme::Complementary,
            ipp: 400.0e-6,
            sample_rate_tx: 20.0e6,
            sample_rate_rx: 5.0e6,
            base_delay_us: 0.0,
            first: PulseSpec {
                amplitude: 1.0,
                duty_cycle: 10.0,
                center_frequency: 0.0,
                bandwidth: 1.0e6,
                window: WindowKind::Tukey1,
            },
            second: Some(PulseSpec {
                amplitude: 1.0,
                duty_cycle: 1.0,
                center_frequency: 1.625e6,
                bandwidth: 0.25e6,
                window: WindowKind::Tukey1,
            }),
            rep1: 1,
            rep2: 1,
            frequency_mode: FrequencyMode::Direct,
            phase_offset: 0.0,
            h0: -1.75,
            rmix: 5.45,
            description: None,
        }
    }
}

impl PlanConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading pulse plan {}", path_ref.display()))?;
        let config: PlanConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing pulse plan {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn timing(&self) -> PairTiming {
        PairTiming {
            ipp: self.ipp,
            sample_rate_tx: self.sample_rate_tx,
            sample_rate_rx: self.sample_rate_rx,
            base_delay_us: self.base_delay_us,
        }
    }

    /// Timing the decoder codes are built with: one undelayed IPP sampled at
    /// the receive rate on both clocks.
    pub fn decoder_timing(&self) -> PairTiming {
        PairTiming {
            ipp: self.ipp,
            sample_rate_tx: self.sample_rate_rx,
            sample_rate_rx: self.sample_rate_rx,
            base_delay_us: 0.0,
        }
    }

    /// Parameters of the first chirp as a standalone pulse.
    pub fn first_parameters(&self) -> WaveformParameters {
        self.first
            .to_parameters(&self.timing(), self.base_delay_us)
            .with_frequency_mode(self.frequency_mode)
            .with_phase_offset(self.phase_offset)
    }

    fn second_spec(&self) -> anyhow::Result<PulseSpec> {
        self.second
            .with_context(|| format!("scheme {} needs a second pulse", self.scheme))
    }

    pub fn complementary_pair(&self) -> anyhow::Result<ComplementaryPair> {
        Ok(ComplementaryPair {
            timing: self.timing(),
            first: self.first,
            second: self.second_spec()?,
        })
    }

    pub fn sequential_pair(&self) -> anyhow::Result<SequentialPair> {
        ensure!(
            self.rep1 > 0 && self.rep2 > 0,
            "repetitions must be positive, got {} and {}",
            self.rep1,
            self.rep2
        );
        Ok(SequentialPair {
            timing: self.timing(),
            first: self.first,
            second: self.second_spec()?,
            rep1: self.rep1,
            rep2: self.rep2,
        })
    }
}
