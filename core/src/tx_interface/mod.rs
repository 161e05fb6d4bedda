pub mod code;
pub mod scheme;

pub use code::{DecoderCodeSet, TransmitCode};
pub use scheme::{PulseScheme, TransmitAncillary};
