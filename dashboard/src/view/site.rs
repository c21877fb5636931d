use std::fs::{self, create_dir_all};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analysis::plot::{render_svg, render_to_file, ImageFormat};
use crate::analysis::vega::vega_lite_spec;
use crate::view::compose::DashboardView;
use crate::view::page::{page_file_name, render_page};

pub const CHARTS_DIR: &str = "charts";

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    pub out_dir: PathBuf,
    pub format: ImageFormat,
    pub write_vega: bool,
}

fn chart_stem(view: &DashboardView, panel_index: usize) -> String {
    let selection = view.selection.label().to_lowercase();
    let antibiotic = view.panels[panel_index].antibiotic.slug();
    format!("{selection}_{antibiotic}")
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))
}

/// Writes the page for `view` plus one image (and optionally one Vega-Lite spec) per chart.
/// Returns the page path.
pub fn write_view(view: &DashboardView, settings: &OutputSettings) -> Result<PathBuf> {
    let charts_dir = settings.out_dir.join(CHARTS_DIR);
    create_dir_all(&charts_dir)
        .with_context(|| format!("failed to create {}", charts_dir.display()))?;

    let mut svgs = Vec::with_capacity(view.panels.len());
    for (i, panel) in view.panels.iter().enumerate() {
        let stem = chart_stem(view, i);

        let image_path = charts_dir.join(format!("{stem}.{}", settings.format.extension()));
        render_to_file(&panel.chart, &image_path, settings.format)
            .with_context(|| format!("failed to render {}", image_path.display()))?;

        if settings.write_vega {
            let spec_path = charts_dir.join(format!("{stem}.vl.json"));
            let spec = serde_json::to_string_pretty(&vega_lite_spec(&panel.chart))?;
            write_file(&spec_path, &spec)?;
            debug!("Vega-Lite spec written to {}", spec_path.display());
        }

        svgs.push(render_svg(&panel.chart)?);
    }

    let page_path = settings.out_dir.join(page_file_name(view.selection));
    write_file(&page_path, &render_page(view, &svgs))?;

    info!("'{}' page written to {}", view.selection.label(), page_path.display());
    Ok(page_path)
}
