use crate::workflow::config::PlanConfig;
use anyhow::Context;
use chirpcore::math::{FftHelper, StatsHelper};
use chirpcore::telemetry::MetricsRecorder;
use chirpcore::tx_interface::{DecoderCodeSet, PulseScheme, TransmitAncillary, TransmitCode};
use chirpcore::waveform::{ChirpSynthesizer, CompositePulse, PulseSpec, WaveformParameters};
use chirpcore::PulseComposition;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Summary line for one synthesized plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    pub scheme: PulseScheme,
    pub total_samples: usize,
    pub profile_count: usize,
    pub peak: f32,
    pub rms: f32,
    /// Dominant baseband frequency of each chirp burst, in Hz.
    pub dominant_frequencies: Vec<f64>,
}

pub struct PlanResult {
    pub code: TransmitCode,
    pub summary: PlanSummary,
    /// Present when the plan has a second pulse.
    pub decoder: Option<DecoderCodeSet>,
}

#[derive(Clone)]
pub struct Runner {
    synthesizer: Arc<ChirpSynthesizer>,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new() -> Self {
        Self {
            synthesizer: Arc::new(ChirpSynthesizer::new()),
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn metrics(&self) -> &MetricsRecorder {
        &self.metrics
    }

    pub fn execute(&self, plan: &PlanConfig) -> anyhow::Result<PlanResult> {
        let outcome = self.synthesize(plan);
        match &outcome {
            Ok(result) => self.metrics.record_synthesized(result.code.n_baud()),
            Err(_) => self.metrics.record_rejected(),
        }
        outcome
    }

    fn synthesize(&self, plan: &PlanConfig) -> anyhow::Result<PlanResult> {
        let composite = self.compose(plan)?;

        let mut dominant_frequencies = vec![self
            .dominant_frequency(&plan.first_parameters())
            .context("analysing first chirp")?];
        let decoder = match plan.second {
            Some(second) => {
                dominant_frequencies.push(
                    self.dominant_frequency(&undelayed(&second, plan))
                        .context("analysing second chirp")?,
                );
                Some(self.decoder_codes(plan, &second)?)
            }
            None => None,
        };

        let summary = PlanSummary {
            scheme: plan.scheme,
            total_samples: composite.len(),
            profile_count: composite.profile_count(),
            peak: StatsHelper::peak(composite.samples()),
            rms: StatsHelper::rms(composite.samples()),
            dominant_frequencies,
        };

        let ancillary = TransmitAncillary {
            scheme: plan.scheme,
            ipp: plan.ipp,
            sample_rate_tx: plan.sample_rate_tx,
            profile_lengths: composite.profile_lengths().to_vec(),
            description: plan.description.clone(),
        };

        Ok(PlanResult {
            code: TransmitCode::new(composite.into_samples(), ancillary),
            summary,
            decoder,
        })
    }

    fn compose(&self, plan: &PlanConfig) -> anyhow::Result<CompositePulse> {
        let composite = match plan.scheme {
            PulseScheme::Single => {
                let chirp = self
                    .synthesizer
                    .synthesize(&plan.first_parameters())
                    .context("synthesizing single chirp")?;
                CompositePulse::single(chirp.full)
            }
            PulseScheme::Complementary => {
                let pair = plan.complementary_pair()?;
                pair.compose()
                    .with_context(|| format!("composing {} pair", pair.name()))?
            }
            PulseScheme::Sequential => {
                let pair = plan.sequential_pair()?;
                pair.compose()
                    .with_context(|| format!("composing {} pair", pair.name()))?
            }
        };
        Ok(composite)
    }

    fn dominant_frequency(&self, params: &WaveformParameters) -> anyhow::Result<f64> {
        let chirp = self.synthesizer.synthesize(params)?;
        let fft = FftHelper::new(chirp.burst.len());
        Ok(fft.dominant_frequency(&chirp.burst, params.sample_rate_tx))
    }

    /// Undelayed full-IPP buffers of both chirps at the receive rate, as the
    /// decoder correlates against them.
    fn decoder_codes(&self, plan: &PlanConfig, second: &PulseSpec) -> anyhow::Result<DecoderCodeSet> {
        let timing = plan.decoder_timing();
        let long = self
            .synthesizer
            .synthesize(&plan.first.to_parameters(&timing, 0.0))
            .context("synthesizing decoder code 1")?;
        let short = self
            .synthesizer
            .synthesize(&second.to_parameters(&timing, 0.0))
            .context("synthesizing decoder code 2")?;
        Ok(DecoderCodeSet::from_pair(
            long.full,
            short.full,
            plan.first.duty_cycle,
            plan.h0,
            plan.rmix,
        ))
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

fn undelayed(spec: &PulseSpec, plan: &PlanConfig) -> WaveformParameters {
    spec.to_parameters(&plan.timing(), 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runner_executes_default_plan() {
        let runner = Runner::new();
        let result = runner.execute(&PlanConfig::default()).unwrap();
        assert_eq!(result.summary.total_samples, 8000);
        assert_eq!(result.summary.profile_count, 1);
        assert_eq!(result.summary.dominant_frequencies.len(), 2);

        let decoder = result.decoder.unwrap();
        assert_eq!(decoder.n_baud, 2000);
        assert_eq!(decoder.code_1.len(), 2000);
        assert_eq!(decoder.code_2.len(), 2000);
        assert_eq!(decoder.dc_1, 10.0);
        assert_eq!(runner.metrics().snapshot(), (1, 8000, 0));
    }

    #[test]
    fn decoder_codes_match_receive_rate_chirps() {
        let plan = PlanConfig::default();
        let decoder = Runner::new().execute(&plan).unwrap().decoder.unwrap();
        let receive = plan.first.to_parameters(&plan.decoder_timing(), 0.0);
        let expected = ChirpSynthesizer::new().synthesize(&receive).unwrap();
        assert_eq!(decoder.code_1, expected.full);
        assert_eq!(decoder.code[0], decoder.code_2);

        let second = plan.second.unwrap();
        let short = ChirpSynthesizer::new()
            .synthesize(&second.to_parameters(&plan.decoder_timing(), 0.0))
            .unwrap();
        assert_eq!(short.burst.len(), 20);
        assert_eq!(decoder.code_2, short.full);
    }

    #[test]
    fn runner_executes_sequential_plan() {
        let plan = PlanConfig {
            scheme: PulseScheme::Sequential,
            sample_rate_tx: 5.0e6,
            rep1: 4,
            rep2: 2,
            ..Default::default()
        };
        let result = Runner::new().execute(&plan).unwrap();
        assert_eq!(result.summary.total_samples, 6 * 2000);
        assert_eq!(result.code.ancillary.profile_count(), 6);
    }

    #[test]
    fn runner_executes_single_plan_with_tone() {
        let mut plan = PlanConfig {
            scheme: PulseScheme::Single,
            second: None,
            ..Default::default()
        };
        plan.first.bandwidth = 0.0;
        plan.first.center_frequency = 1.25e6;
        let result = Runner::new().execute(&plan).unwrap();
        assert!(result.decoder.is_none());
        assert!((result.summary.dominant_frequencies[0] - 1.25e6).abs() < 1.0);
        assert!((result.summary.peak - 1.0).abs() < 1e-3);
    }

    #[test]
    fn runner_counts_rejected_plans() {
        let mut plan = PlanConfig::default();
        plan.ipp = -1.0;
        let runner = Runner::new();
        assert!(runner.execute(&plan).is_err());
        assert_eq!(runner.metrics().snapshot(), (0, 0, 1));
    }
}
