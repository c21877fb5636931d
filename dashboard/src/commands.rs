use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::{ExportArgs, OutputArgs, RenderArgs, SiteArgs, SourceArgs};
use crate::config::DashboardConfig;
use crate::data_handling::burtin::dataset_for_path;
use crate::data_handling::prepare::{export_observations, prepare};
use crate::helper_functions::resolve_path;
use crate::models::{Dataset, Observation, Selection};
use crate::view::compose::compose;
use crate::view::site::{write_view, OutputSettings};

fn data_path(source: &SourceArgs, config: &DashboardConfig) -> PathBuf {
    resolve_path(source.data.as_deref().unwrap_or(&config.data_path))
}

fn output_settings(output: &OutputArgs, config: &DashboardConfig) -> OutputSettings {
    OutputSettings {
        out_dir: resolve_path(output.out.as_deref().unwrap_or(&config.output_dir)),
        format: output.format.unwrap_or(config.image_format),
        write_vega: output.vega || config.write_vega,
    }
}

pub fn load_observations(path: &Path) -> Result<Vec<Observation>> {
    let dataset = dataset_for_path(path);
    let records = dataset
        .load()
        .with_context(|| format!("failed to load dataset {}", dataset.source().display()))?;
    let observations = prepare(&records);
    info!(
        "Prepared {} observations from {} records",
        observations.len(),
        records.len()
    );
    Ok(observations)
}

pub fn render(args: RenderArgs, config: &DashboardConfig) -> Result<PathBuf> {
    let observations = load_observations(&data_path(&args.source, config))?;
    let settings = output_settings(&args.output, config);

    let view = compose(
        args.selection,
        &observations,
        &config.chart,
        Some(config.single_chart_width),
    );
    write_view(&view, &settings)
}

pub fn site(args: SiteArgs, config: &DashboardConfig) -> Result<Vec<PathBuf>> {
    let observations = load_observations(&data_path(&args.source, config))?;
    let settings = output_settings(&args.output, config);

    let mut pages = Vec::with_capacity(Selection::ALL.len());
    for selection in Selection::ALL {
        let view = compose(
            selection,
            &observations,
            &config.chart,
            Some(config.single_chart_width),
        );
        pages.push(write_view(&view, &settings)?);
    }
    info!("Site written to {}", settings.out_dir.display());
    Ok(pages)
}

pub fn export(args: ExportArgs, config: &DashboardConfig) -> Result<PathBuf> {
    let observations = load_observations(&data_path(&args.source, config))?;
    let out = resolve_path(&args.out);
    export_observations(&observations, &out)?;
    Ok(out)
}
