use crate::math::window::WindowKind;
use crate::prelude::{WaveformError, WaveformResult};
use serde::{Deserialize, Serialize};

/// Largest buffer the synthesizer will allocate, in samples.
pub const MAX_BUFFER_SAMPLES: usize = 1 << 30;

/// Whether the instantaneous-frequency trajectory is stair-stepped to the
/// receive sample clock.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyMode {
    #[default]
    Direct,
    Resampled,
}

/// Direction of the linear sweep, given by the sign of the bandwidth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    Ascending,
    Descending,
    Constant,
}

/// Description of one chirp pulse.
///
/// Units: `ipp` in seconds, `duty_cycle` in percent, sample rates and
/// frequencies in Hz, `delay_us` in microseconds, `phase_offset` in radians.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WaveformParameters {
    pub amplitude: f64,
    pub ipp: f64,
    pub duty_cycle: f64,
    pub sample_rate_tx: f64,
    pub sample_rate_rx: f64,
    pub center_frequency: f64,
    pub bandwidth: f64,
    #[serde(default)]
    pub delay_us: f64,
    #[serde(default)]
    pub window: WindowKind,
    #[serde(default)]
    pub frequency_mode: FrequencyMode,
    #[serde(default)]
    pub phase_offset: f64,
}

impl WaveformParameters {
    /// Rectangular, undelayed, direct-mode chirp.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        amplitude: f64,
        ipp: f64,
        duty_cycle: f64,
        sample_rate_tx: f64,
        sample_rate_rx: f64,
        center_frequency: f64,
        bandwidth: f64,
    ) -> Self {
        Self {
            amplitude,
            ipp,
            duty_cycle,
            sample_rate_tx,
            sample_rate_rx,
            center_frequency,
            bandwidth,
            delay_us: 0.0,
            window: WindowKind::Rectangular,
            frequency_mode: FrequencyMode::Direct,
            phase_offset: 0.0,
        }
    }

    pub fn with_delay(mut self, delay_us: f64) -> Self {
        self.delay_us = delay_us;
        self
    }

    pub fn with_window(mut self, window: WindowKind) -> Self {
        self.window = window;
        self
    }

    pub fn with_frequency_mode(mut self, mode: FrequencyMode) -> Self {
        self.frequency_mode = mode;
        self
    }

    pub fn with_phase_offset(mut self, phase_offset: f64) -> Self {
        self.phase_offset = phase_offset;
        self
    }

    /// Checks every constraint and returns the derived sample counts.
    pub fn validate(&self) -> WaveformResult<SampleCounts> {
        let finite = [
            ("amplitude", self.amplitude),
            ("ipp", self.ipp),
            ("duty_cycle", self.duty_cycle),
            ("sample_rate_tx", self.sample_rate_tx),
            ("sample_rate_rx", self.sample_rate_rx),
            ("center_frequency", self.center_frequency),
            ("bandwidth", self.bandwidth),
            ("delay_us", self.delay_us),
            ("phase_offset", self.phase_offset),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{} must be finite, got {}", name, value)));
        }

        if self.ipp <= 0.0 {
            return Err(invalid(format!("ipp must be positive, got {}", self.ipp)));
        }
        if self.duty_cycle <= 0.0 || self.duty_cycle > 100.0 {
            return Err(invalid(format!(
                "duty cycle must lie in (0, 100], got {}",
                self.duty_cycle
            )));
        }
        if self.sample_rate_tx <= 0.0 || self.sample_rate_rx <= 0.0 {
            return Err(invalid(format!(
                "sample rates must be positive, got tx {} rx {}",
                self.sample_rate_tx, self.sample_rate_rx
            )));
        }
        if self.frequency_mode == FrequencyMode::Resampled
            && self.sample_rate_tx < self.sample_rate_rx
        {
            return Err(invalid(format!(
                "resampled mode needs sample_rate_tx >= sample_rate_rx, got {} < {}",
                self.sample_rate_tx, self.sample_rate_rx
            )));
        }

        let rate = self.chirp_rate();
        if !rate.is_finite() {
            return Err(invalid(format!("chirp rate is not finite ({})", rate)));
        }

        let chirp_raw = (self.sample_rate_tx * self.chirp_duration()).floor();
        if chirp_raw < 1.0 {
            return Err(invalid(format!(
                "chirp spans {} samples, need at least one",
                chirp_raw
            )));
        }
        let total_raw = (chirp_raw * 100.0 / self.duty_cycle).floor();
        if !total_raw.is_finite() || total_raw > MAX_BUFFER_SAMPLES as f64 {
            return Err(invalid(format!(
                "IPP buffer of {} samples exceeds the {} sample limit",
                total_raw, MAX_BUFFER_SAMPLES
            )));
        }

        let chirp = chirp_raw as usize;
        let total = total_raw as usize;
        if total < chirp {
            return Err(invalid(format!(
                "IPP buffer ({}) shorter than chirp ({})",
                total, chirp
            )));
        }
        if self.window.is_tapered() && chirp < 2 {
            return Err(invalid(format!(
                "{} window needs at least two chirp samples, got {}",
                self.window, chirp
            )));
        }

        let decimation = match self.frequency_mode {
            FrequencyMode::Direct => 1,
            FrequencyMode::Resampled => (self.sample_rate_tx / self.sample_rate_rx).floor() as usize,
        };

        let delay = (total as f64 * self.delay_us / (self.ipp * 1.0e6)).floor();

        Ok(SampleCounts {
            chirp,
            total,
            delay: delay as i64,
            decimation,
        })
    }

    /// Occupied chirp duration in seconds.
    pub fn chirp_duration(&self) -> f64 {
        self.duty_cycle * self.ipp / 100.0
    }

    /// Sweep rate in Hz/s.
    pub fn chirp_rate(&self) -> f64 {
        self.bandwidth / self.chirp_duration()
    }

    /// Lower and upper sweep edges `(fc - bw/2, fc + bw/2)`.
    pub fn edges(&self) -> (f64, f64) {
        let half = self.bandwidth / 2.0;
        (self.center_frequency - half, self.center_frequency + half)
    }

    pub fn sweep_direction(&self) -> SweepDirection {
        if self.bandwidth > 0.0 {
            SweepDirection::Ascending
        } else if self.bandwidth < 0.0 {
            SweepDirection::Descending
        } else {
            SweepDirection::Constant
        }
    }

    pub fn chirp_sample_count(&self) -> WaveformResult<usize> {
        Ok(self.validate()?.chirp)
    }

    pub fn total_sample_count(&self) -> WaveformResult<usize> {
        Ok(self.validate()?.total)
    }

    pub fn delay_samples(&self) -> WaveformResult<i64> {
        Ok(self.validate()?.delay)
    }
}

/// Sample counts derived from a validated [`WaveformParameters`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleCounts {
    /// Chirp burst length `n`.
    pub chirp: usize,
    /// Full IPP buffer length `N`.
    pub total: usize,
    /// Forward circular shift applied to the IPP buffer.
    pub delay: i64,
    /// Frequency decimation ratio `r` (1 in direct mode).
    pub decimation: usize,
}

fn invalid(message: String) -> WaveformError {
    WaveformError::InvalidParameter(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> WaveformParameters {
        WaveformParameters::new(1.0, 400.0e-6, 10.0, 20.0e6, 20.0e6, 0.0, 1.0e6)
    }

    #[test]
    fn reference_counts() {
        let counts = reference().validate().unwrap();
        assert_eq!(counts.chirp, 800);
        assert_eq!(counts.total, 8000);
        assert_eq!(counts.delay, 0);
        assert_eq!(counts.decimation, 1);
    }

    #[test]
    fn delay_is_expressed_in_microseconds() {
        let counts = reference().with_delay(40.0).validate().unwrap();
        assert_eq!(counts.delay, 800);
    }

    #[test]
    fn rejects_non_positive_ipp() {
        let mut params = reference();
        params.ipp = 0.0;
        assert!(matches!(
            params.validate(),
            Err(WaveformError::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_duty_cycle_out_of_range() {
        for dc in [0.0, -5.0, 100.5] {
            let mut params = reference();
            params.duty_cycle = dc;
            assert!(params.validate().is_err(), "dc {} accepted", dc);
        }
        let mut full = reference();
        full.duty_cycle = 100.0;
        let counts = full.validate().unwrap();
        assert_eq!(counts.chirp, counts.total);
    }

    #[test]
    fn rejects_non_positive_sample_rates() {
        let mut params = reference();
        params.sample_rate_rx = 0.0;
        assert!(params.validate().is_err());
        let mut params = reference();
        params.sample_rate_tx = -1.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn resampled_mode_needs_faster_tx_clock() {
        let mut params = reference().with_frequency_mode(FrequencyMode::Resampled);
        params.sample_rate_rx = 40.0e6;
        assert!(params.validate().is_err());
        params.frequency_mode = FrequencyMode::Direct;
        assert!(params.validate().is_ok());
    }

    #[test]
    fn rejects_empty_chirp() {
        let mut params = reference();
        params.sample_rate_tx = 1.0;
        params.sample_rate_rx = 1.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn tapered_window_needs_two_samples() {
        let params = WaveformParameters::new(1.0, 100.0e-6, 1.0, 1.0e6, 1.0e6, 0.0, 0.0);
        assert_eq!(params.validate().unwrap().chirp, 1);
        assert!(params.with_window(WindowKind::Kaiser70).validate().is_err());
        assert!(params.with_window(WindowKind::Tukey1).validate().is_err());
    }

    #[test]
    fn rejects_non_finite_fields() {
        let mut params = reference();
        params.bandwidth = f64::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn sweep_direction_follows_bandwidth_sign() {
        assert_eq!(reference().sweep_direction(), SweepDirection::Ascending);
        let mut params = reference();
        params.bandwidth = -1.0e6;
        assert_eq!(params.sweep_direction(), SweepDirection::Descending);
        assert_eq!(params.edges(), (0.5e6, -0.5e6));
    }

    #[test]
    fn resampled_ratio_is_floored() {
        let mut params = reference().with_frequency_mode(FrequencyMode::Resampled);
        params.sample_rate_rx = 6.0e6;
        assert_eq!(params.validate().unwrap().decimation, 3);
    }

    #[test]
    fn parameters_load_from_json_with_defaults() {
        let json = r#"{
            "amplitude": 1.0, "ipp": 0.0004, "duty_cycle": 10.0,
            "sample_rate_tx": 20000000.0, "sample_rate_rx": 5000000.0,
            "center_frequency": 0.0, "bandwidth": 1000000.0, "window": "K"
        }"#;
        let params: WaveformParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.window, WindowKind::Kaiser70);
        assert_eq!(params.frequency_mode, FrequencyMode::Direct);
        assert_eq!(params.delay_us, 0.0);
    }
}
