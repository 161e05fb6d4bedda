use crate::prelude::Sample;
use crate::tx_interface::scheme::TransmitAncillary;
use serde::{Deserialize, Serialize};

/// Complex sample sequence used both as transmit waveform and decoding code.
///
/// Samples serialize as `[re, im]` pairs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransmitCode {
    pub samples: Vec<Sample>,
    pub ancillary: TransmitAncillary,
}

impl TransmitCode {
    pub fn new(samples: Vec<Sample>, ancillary: TransmitAncillary) -> Self {
        Self { samples, ancillary }
    }

    /// Number of bauds (samples) in the code.
    pub fn n_baud(&self) -> usize {
        self.samples.len()
    }
}

/// Decoder configuration for the dual-chirp experiment.
///
/// Field names follow the radar framework's decoder operation parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecoderCodeSet {
    pub code: Vec<Vec<Sample>>,
    #[serde(rename = "nCode")]
    pub n_code: usize,
    #[serde(rename = "nBaud")]
    pub n_baud: usize,
    pub code_1: Vec<Sample>,
    pub code_2: Vec<Sample>,
    #[serde(rename = "DC_1")]
    pub dc_1: f64,
    #[serde(rename = "H0")]
    pub h0: f64,
    #[serde(rename = "RMIX")]
    pub rmix: f64,
}

impl DecoderCodeSet {
    /// Builds the set from the long (`code_1`) and short (`code_2`) IPP buffers;
    /// the short chirp is the decoding code.
    pub fn from_pair(long: Vec<Sample>, short: Vec<Sample>, dc_1: f64, h0: f64, rmix: f64) -> Self {
        Self {
            n_code: 1,
            n_baud: short.len(),
            code: vec![short.clone()],
            code_1: long,
            code_2: short,
            dc_1,
            h0,
            rmix,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
