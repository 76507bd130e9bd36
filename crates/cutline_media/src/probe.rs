use serde::Deserialize;

use crate::resolver::DurationProbe;

// ---------------------------------------------------------------------------
// ffprobe JSON output structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

// ---------------------------------------------------------------------------
// FfprobeDuration
// ---------------------------------------------------------------------------

/// `DurationProbe` backed by ffprobe. Reads container metadata only; no
/// frames are decoded.
#[derive(Debug, Clone, Default)]
pub struct FfprobeDuration;

impl DurationProbe for FfprobeDuration {
    async fn probe_duration(&self, url: &str) -> anyhow::Result<f64> {
        let output = tokio::process::Command::new("ffprobe")
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(url)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("ffprobe failed: {}", stderr);
        }

        let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
        parse_duration(&probe)
    }
}

fn parse_duration(probe: &FfprobeOutput) -> anyhow::Result<f64> {
    probe
        .format
        .duration
        .as_deref()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| anyhow::anyhow!("no duration in format metadata"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
