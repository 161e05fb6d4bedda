pub mod buffer;
pub mod chirp;
pub mod compose;
pub mod params;

pub use crate::math::window::WindowKind;
pub use buffer::rotate;
pub use chirp::{synthesize_chirp, ChirpSynthesizer, SynthesizedChirp};
pub use compose::{
    compose_union1, compose_union2, ComplementaryPair, CompositePulse, PairTiming,
    PulseComposer, PulseSpec, SequentialPair,
};
pub use params::{FrequencyMode, SampleCounts, SweepDirection, WaveformParameters};
