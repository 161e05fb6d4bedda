use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Sidelobe attenuation targeted by [`WindowKind::Kaiser70`], in dB.
pub const KAISER_ATTENUATION_DB: f64 = 70.0;

/// Amplitude taper applied across the chirp duration.
///
/// The legacy one-letter codes are accepted when parsing: `R`, `K` and `B`
/// (the latter historically labelled "Blackman" but generating a Tukey taper).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    #[default]
    #[serde(alias = "R")]
    Rectangular,
    #[serde(alias = "K")]
    Kaiser70,
    #[serde(alias = "B")]
    Tukey1,
}

impl WindowKind {
    /// Whether the taper needs at least two points to be well defined.
    pub fn is_tapered(self) -> bool {
        !matches!(self, WindowKind::Rectangular)
    }

    /// Tap weights of length `length`, scaled by `amplitude`.
    pub fn weights(self, length: usize, amplitude: f64) -> Vec<f64> {
        match self {
            WindowKind::Rectangular => vec![amplitude; length],
            WindowKind::Kaiser70 => {
                let beta = kaiser_beta(KAISER_ATTENUATION_DB);
                kaiser(length, beta)
                    .into_iter()
                    .map(|w| amplitude * w)
                    .collect()
            }
            WindowKind::Tukey1 => tukey(length, 1.0)
                .into_iter()
                .map(|w| amplitude * w)
                .collect(),
        }
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WindowKind::Rectangular => "rectangular",
            WindowKind::Kaiser70 => "kaiser70",
            WindowKind::Tukey1 => "tukey1",
        };
        f.write_str(label)
    }
}

impl FromStr for WindowKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "r" | "rectangular" => Ok(WindowKind::Rectangular),
            "k" | "kaiser70" | "kaiser" => Ok(WindowKind::Kaiser70),
            "b" | "tukey1" | "tukey" => Ok(WindowKind::Tukey1),
            other => Err(format!("unknown window kind '{}'", other)),
        }
    }
}

/// Kaiser beta for a desired stopband attenuation in dB.
pub fn kaiser_beta(attenuation_db: f64) -> f64 {
    if attenuation_db > 50.0 {
        0.1102 * (attenuation_db - 8.7)
    } else if attenuation_db > 21.0 {
        0.5842 * (attenuation_db - 21.0).powf(0.4) + 0.07886 * (attenuation_db - 21.0)
    } else {
        0.0
    }
}

/// Symmetric Kaiser window.
pub fn kaiser(length: usize, beta: f64) -> Vec<f64> {
    if length <= 1 {
        return vec![1.0; length];
    }

    let half = (length - 1) as f64 / 2.0;
    let i0_beta = bessel_i0(beta);

    (0..length)
        .map(|i| {
            let x = (i as f64 - half) / half;
            let arg = beta * (1.0 - x * x).max(0.0).sqrt();
            bessel_i0(arg) / i0_beta
        })
        .collect()
}

/// Symmetric Tukey window with taper fraction `alpha`.
///
/// `alpha >= 1` degenerates to a Hann window, `alpha <= 0` to rectangular.
pub fn tukey(length: usize, alpha: f64) -> Vec<f64> {
    if length <= 1 {
        return vec![1.0; length];
    }
    if alpha <= 0.0 {
        return vec![1.0; length];
    }

    let last = (length - 1) as f64;
    if alpha >= 1.0 {
        return (0..length)
            .map(|i| 0.5 - 0.5 * (2.0 * PI * i as f64 / last).cos())
            .collect();
    }

    let width = alpha * last / 2.0;
    (0..length)
        .map(|i| {
            let n = i as f64;
            if n < width {
                0.5 * (1.0 + (PI * (-1.0 + n / width)).cos())
            } else if n <= last - width {
                1.0
            } else {
                0.5 * (1.0 + (PI * (-2.0 / alpha + 1.0 + n / width)).cos())
            }
        })
        .collect()
}

/// Modified Bessel function of the first kind, order zero (power series).
fn bessel_i0(x: f64) -> f64 {
    let quarter_sq = x * x / 4.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    while term > sum * 1e-17 {
        term *= quarter_sq / (k * k);
        sum += term;
        k += 1.0;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kaiser_beta_matches_high_attenuation_formula() {
        assert!((kaiser_beta(70.0) - 6.75526).abs() < 1e-9);
        assert_eq!(kaiser_beta(10.0), 0.0);
    }

    #[test]
    fn bessel_i0_reference_values() {
        assert!((bessel_i0(0.0) - 1.0).abs() < 1e-15);
        assert!((bessel_i0(1.0) - 1.266_065_877_752_008_4).abs() < 1e-12);
        assert!((bessel_i0(5.0) - 27.239_871_823_604_45).abs() < 1e-9);
    }

    #[test]
    fn kaiser_is_symmetric_and_peaks_at_center() {
        let w = kaiser(9, kaiser_beta(70.0));
        for i in 0..w.len() {
            assert!((w[i] - w[w.len() - 1 - i]).abs() < 1e-12);
        }
        assert!((w[4] - 1.0).abs() < 1e-12);
        assert!(w[0] < 0.01);
    }

    #[test]
    fn kaiser70_matches_reference_taps() {
        let beta = kaiser_beta(KAISER_ATTENUATION_DB);
        let w = kaiser(5, beta);
        let edge = 1.0 / bessel_i0(beta);
        assert!((w[0] - edge).abs() < 1e-15);
        assert!((w[0] - 0.007_436_750_834_125_314).abs() < 1e-9);
        let quarter = bessel_i0(beta * 0.75_f64.sqrt()) / bessel_i0(beta);
        assert!((w[1] - quarter).abs() < 1e-15);
        assert!((w[3] - quarter).abs() < 1e-15);
        assert_eq!(w[2], 1.0);

        let weights = WindowKind::Kaiser70.weights(5, 2.0);
        assert!((weights[0] - 2.0 * edge).abs() < 1e-15);
    }

    #[test]
    fn tukey_one_is_hann() {
        let w = tukey(5, 1.0);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (got, want) in w.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn tukey_half_has_flat_top() {
        let w = tukey(11, 0.5);
        assert!(w[0].abs() < 1e-12);
        assert!((w[5] - 1.0).abs() < 1e-12);
        assert!((w[10]).abs() < 1e-12);
    }

    #[test]
    fn rectangular_weights_are_amplitude() {
        let w = WindowKind::Rectangular.weights(4, 0.5);
        assert_eq!(w, vec![0.5; 4]);
    }

    #[test]
    fn legacy_codes_parse() {
        assert_eq!("R".parse::<WindowKind>().unwrap(), WindowKind::Rectangular);
        assert_eq!("K".parse::<WindowKind>().unwrap(), WindowKind::Kaiser70);
        assert_eq!("b".parse::<WindowKind>().unwrap(), WindowKind::Tukey1);
        assert!("blackman".parse::<WindowKind>().is_err());
    }

    #[test]
    fn serde_accepts_legacy_alias() {
        let kind: WindowKind = serde_json::from_str("\"B\"").unwrap();
        assert_eq!(kind, WindowKind::Tukey1);
        assert_eq!(serde_json::to_string(&kind).unwrap(), "\"tukey1\"");
    }
}
