use num_complex::Complex32;

/// One transmit sample: single-precision I/Q.
pub type Sample = Complex32;

/// Common error type for waveform synthesis and composition.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum WaveformError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("length mismatch: first buffer has {first} samples, second has {second}")]
    LengthMismatch { first: usize, second: usize },
}

pub type WaveformResult<T> = Result<T, WaveformError>;

/// Trait describing a strategy that combines pulses into one transmit sequence.
pub trait PulseComposition {
    /// Short name used in logs and reports.
    fn name(&self) -> &'static str;
    fn compose(&self) -> WaveformResult<crate::waveform::CompositePulse>;
}
