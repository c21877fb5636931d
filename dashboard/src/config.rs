use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analysis::effectiveness_chart::ChartLayout;
use crate::analysis::plot::{parse_hex_colour, ImageFormat};
use crate::helper_functions::{bundled_dataset_path, project_root};

/// Looked up in the project root when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "dashboard.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub output_dir: PathBuf,
    pub image_format: ImageFormat,
    /// Width of the chart on a single-antibiotic page.
    pub single_chart_width: u32,
    pub write_vega: bool,
    pub chart: ChartLayout,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        DashboardConfig {
            data_path: bundled_dataset_path(),
            output_dir: PathBuf::from("dashboard_output"),
            image_format: ImageFormat::Svg,
            single_chart_width: 760,
            write_vega: false,
            chart: ChartLayout::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let config: DashboardConfig = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Uses `explicit` if given, else `dashboard.json` in the project root if present,
    /// else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            info!("Using config {}", path.display());
            return Self::from_file(path);
        }

        let candidate = project_root().join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            info!("Using config {}", candidate.display());
            Self::from_file(&candidate)
        } else {
            debug!("No {} found, using defaults", candidate.display());
            Ok(Self::default())
        }
    }

    fn validate(&self) -> Result<()> {
        parse_hex_colour(&self.chart.positive_colour).context("invalid chart.positive_colour")?;
        parse_hex_colour(&self.chart.negative_colour).context("invalid chart.negative_colour")?;
        anyhow::ensure!(
            self.chart.domain_min < 0.0,
            "chart.domain_min must be negative to leave room for labels, got {}",
            self.chart.domain_min
        );
        Ok(())
    }
}
