//! TOML configuration for the ingest pipeline.
//!
//! ```toml
//! target_wavelengths_nm = [400, 550, 700]
//!
//! [resample]
//! range = [300, 1200]
//! points = 181
//! ```

use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

use crate::data::model::DEFAULT_TARGET_WAVELENGTHS_NM;

/// Pipeline settings shared by every file of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Wavelengths (nm) for the fixed n/k points of optical entries.
    #[serde(default = "default_targets")]
    pub target_wavelengths_nm: Vec<f64>,
    /// Optional uniform grid for an additional resampled curve.
    #[serde(default)]
    pub resample: Option<GridSpec>,
}

fn default_targets() -> Vec<f64> {
    DEFAULT_TARGET_WAVELENGTHS_NM.to_vec()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_wavelengths_nm: default_targets(),
            resample: None,
        }
    }
}

/// Uniform wavelength grid, endpoints included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub range: [f64; 2],
    pub points: usize,
}

impl GridSpec {
    pub fn wavelengths(&self) -> Vec<f64> {
        let [start, end] = self.range;
        match self.points {
            0 => Vec::new(),
            1 => vec![start],
            n => (0..n)
                .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
                .collect(),
        }
    }
}

impl PipelineConfig {
    /// Reject settings that cannot produce meaningful output.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(bad) = self.target_wavelengths_nm.iter().find(|t| !t.is_finite()) {
            bail!("target wavelength {bad} is not a finite number");
        }
        if let Some(grid) = &self.resample {
            let [start, end] = grid.range;
            if !(start.is_finite() && end.is_finite()) || start > end {
                bail!("resample range [{start}, {end}] is not an ascending finite interval");
            }
            if grid.points < 2 {
                bail!("resample grid needs at least 2 points, got {}", grid.points);
            }
        }
        Ok(())
    }
}

/// Load, parse and validate a TOML configuration file.
pub fn load_config(path: &Path) -> anyhow::Result<PipelineConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: PipelineConfig = toml::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
