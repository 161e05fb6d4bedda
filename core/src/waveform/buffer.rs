use crate::prelude::Sample;
use num_complex::Complex32;

/// Circularly shifts `samples` forward by `shift` (negative shifts backward).
///
/// Always returns a fresh buffer; the input is never modified in place.
pub fn rotate(samples: &[Sample], shift: i64) -> Vec<Sample> {
    let len = samples.len();
    if len == 0 {
        return Vec::new();
    }
    let offset = shift.rem_euclid(len as i64) as usize;
    let mut rotated = vec![Complex32::new(0.0, 0.0); len];
    for (idx, &sample) in samples.iter().enumerate() {
        rotated[(idx + offset) % len] = sample;
    }
    rotated
}

/// Places `burst` at offset zero of a zero-filled buffer of `total` samples.
pub fn embed(burst: &[Sample], total: usize) -> Vec<Sample> {
    let mut buffer = vec![Complex32::new(0.0, 0.0); total];
    let copied = burst.len().min(total);
    buffer[..copied].copy_from_slice(&burst[..copied]);
    buffer
}

/// Repeats `samples` back to back `count` times.
pub fn tile(samples: &[Sample], count: usize) -> Vec<Sample> {
    let mut tiled = Vec::with_capacity(samples.len() * count);
    for _ in 0..count {
        tiled.extend_from_slice(samples);
    }
    tiled
}
