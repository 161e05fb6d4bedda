use crate::workflow::runner::{PlanResult, PlanSummary};
use anyhow::Context;
use chirpcore::tx_interface::{DecoderCodeSet, TransmitCode};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Everything the radar framework needs to configure transmission and decoding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExportBundle {
    pub summary: PlanSummary,
    pub transmit: TransmitCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decoder: Option<DecoderCodeSet>,
}

impl From<PlanResult> for ExportBundle {
    fn from(result: PlanResult) -> Self {
        Self {
            summary: result.summary,
            transmit: result.code,
            decoder: result.decoder,
        }
    }
}

pub fn write_bundle<P: AsRef<Path>>(bundle: &ExportBundle, path: P) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating export directory {}", parent.display()))?;
    }
    let json = serde_json::to_string(bundle).context("serializing export bundle")?;
    fs::write(path_ref, json)
        .with_context(|| format!("writing export bundle {}", path_ref.display()))?;
    Ok(())
}

#[cfg(test)]
pub fn read_bundle<P: AsRef<Path>>(path: P) -> anyhow::Result<ExportBundle> {
    let path_ref = path.as_ref();
    let contents = fs::read_to_string(path_ref)
        .with_context(|| format!("reading export bundle {}", path_ref.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("parsing export bundle {}", path_ref.display()))
}

pub fn summary_line(summary: &PlanSummary) -> String {
    let frequencies: Vec<String> = summary
        .dominant_frequencies
        .iter()
        .map(|f| format!("{:.1}", f))
        .collect();
    format!(
        "scheme={} samples={} profiles={} peak={:.4} rms={:.4} dominant_hz=[{}]",
        summary.scheme,
        summary.total_samples,
        summary.profile_count,
        summary.peak,
        summary.rms,
        frequencies.join(",")
    )
}

/// Appends the summary line to a report log, creating it if needed.
pub fn append_report<P: AsRef<Path>>(summary: &PlanSummary, path: P) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path_ref)
        .with_context(|| format!("opening report {}", path_ref.display()))?;
    writeln!(file, "{}", summary_line(summary))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::PlanConfig;
    use crate::workflow::runner::Runner;
    use tempfile::tempdir;

    #[test]
    fn bundle_survives_file_export() {
        let result = Runner::new().execute(&PlanConfig::default()).unwrap();
        let bundle = ExportBundle::from(result);
        let dir = tempdir().unwrap();
        let path = dir.path().join("codes/sophy.json");
        write_bundle(&bundle, &path).unwrap();
        let loaded = read_bundle(&path).unwrap();
        assert_eq!(loaded.transmit.n_baud(), 8000);
        assert_eq!(loaded.decoder.as_ref().map(|d| d.n_code), Some(1));
        assert_eq!(loaded.summary, bundle.summary);
    }

    #[test]
    fn report_lines_accumulate() {
        let result = Runner::new().execute(&PlanConfig::default()).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("report.log");
        append_report(&result.summary, &path).unwrap();
        append_report(&result.summary, &path).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.starts_with("scheme=complementary samples=8000 profiles=1"));
    }
}
