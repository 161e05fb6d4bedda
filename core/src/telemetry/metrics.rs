use std::sync::Mutex;

/// Counts synthesized pulse plans and rejected parameter sets.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    synthesized: usize,
    samples: usize,
    rejected: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                synthesized: 0,
                samples: 0,
                rejected: 0,
            }),
        }
    }

    pub fn record_synthesized(&self, samples: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.synthesized += 1;
            metrics.samples += samples;
        }
    }

    pub fn record_rejected(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.rejected += 1;
        }
    }

    /// `(synthesized, total samples, rejected)`.
    pub fn snapshot(&self) -> (usize, usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.synthesized, metrics.samples, metrics.rejected)
        } else {
            (0, 0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_accumulates_counts() {
        let metrics = MetricsRecorder::new();
        metrics.record_synthesized(8000);
        metrics.record_synthesized(2000);
        metrics.record_rejected();
        assert_eq!(metrics.snapshot(), (2, 10_000, 1));
    }
}
