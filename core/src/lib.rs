//! Chirp synthesis and pulse composition for the SOPHy SDR weather radar.
//!
//! The modules build linear-FM baseband bursts from a validated waveform
//! description, embed them in full inter-pulse-period buffers, and combine
//! pairs of chirps into the composite sequences the transmitter plays out.

pub mod math;
pub mod prelude;
pub mod telemetry;
pub mod tx_interface;
pub mod waveform;

pub use prelude::{PulseComposition, Sample, WaveformError, WaveformResult};
pub use waveform::{
    compose_union1, compose_union2, synthesize_chirp, ChirpSynthesizer, CompositePulse,
    FrequencyMode, PulseComposer, SynthesizedChirp, WaveformParameters, WindowKind,
};
