use num_complex::Complex32;

pub struct StatsHelper;

impl StatsHelper {
    /// Root-mean-square magnitude of a complex sequence.
    pub fn rms(samples: &[Complex32]) -> f32 {
        if samples.is_empty() {
            return 0.0;
        }
        (Self::energy(samples) / samples.len() as f32).sqrt()
    }

    /// Sum of squared magnitudes.
    pub fn energy(samples: &[Complex32]) -> f32 {
        samples.iter().map(|s| s.norm_sqr()).sum()
    }

    pub fn peak(samples: &[Complex32]) -> f32 {
        samples.iter().map(|s| s.norm()).fold(0.0, f32::max)
    }

    /// Number of samples whose magnitude exceeds `floor`.
    pub fn occupied(samples: &[Complex32], floor: f32) -> usize {
        samples.iter().filter(|s| s.norm() > floor).count()
    }
}
