use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transmission scheme a composite pulse was built with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum PulseScheme {
    /// One chirp per IPP.
    #[default]
    Single,
    /// Two chirps superposed in one IPP, the second right after the first.
    #[serde(alias = "union1")]
    Complementary,
    /// Two independent chirp trains transmitted back to back.
    #[serde(alias = "union2")]
    Sequential,
}

impl fmt::Display for PulseScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PulseScheme::Single => "single",
            PulseScheme::Complementary => "complementary",
            PulseScheme::Sequential => "sequential",
        };
        f.write_str(label)
    }
}

impl FromStr for PulseScheme {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(PulseScheme::Single),
            "complementary" | "union1" => Ok(PulseScheme::Complementary),
            "sequential" | "union2" => Ok(PulseScheme::Sequential),
            other => Err(format!("unknown pulse scheme '{}'", other)),
        }
    }
}

/// Metadata handed to the radar framework alongside a transmit sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransmitAncillary {
    pub scheme: PulseScheme,
    pub ipp: f64,
    pub sample_rate_tx: f64,
    pub profile_lengths: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TransmitAncillary {
    pub fn profile_count(&self) -> usize {
        self.profile_lengths.len()
    }

    pub fn total_samples(&self) -> usize {
        self.profile_lengths.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_parses_union_names() {
        assert_eq!("union1".parse::<PulseScheme>(), Ok(PulseScheme::Complementary));
        assert_eq!("Sequential".parse::<PulseScheme>(), Ok(PulseScheme::Sequential));
        assert!("triple".parse::<PulseScheme>().is_err());
    }

    #[test]
    fn ancillary_totals_profiles() {
        let ancillary = TransmitAncillary {
            scheme: PulseScheme::Sequential,
            ipp: 400.0e-6,
            sample_rate_tx: 5.0e6,
            profile_lengths: vec![2000, 2000, 1999],
            description: None,
        };
        assert_eq!(ancillary.profile_count(), 3);
        assert_eq!(ancillary.total_samples(), 5999);
        let json = serde_json::to_string(&ancillary).unwrap();
        assert!(json.contains("\"scheme\":\"sequential\""));
        assert!(!json.contains("description"));
    }
}
