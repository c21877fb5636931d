use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use polars::prelude::*;
use tracing::{debug, info};

use crate::models::{Antibiotic, Observation, RawRecord};

/// `-log10(mic)` for positive MICs; undefined otherwise.
pub fn effectiveness(mic: Option<f64>) -> Option<f64> {
    // Subtracting from zero keeps a MIC of exactly 1 at +0.0 so it prints as "0.00".
    mic.filter(|m| *m > 0.0).map(|m| 0.0 - m.log10())
}

/// Wide to long: one observation per record and antibiotic, in record order.
pub fn prepare(records: &[RawRecord]) -> Vec<Observation> {
    let observations: Vec<Observation> = records
        .iter()
        .flat_map(|record| {
            Antibiotic::ALL.into_iter().map(move |antibiotic| {
                let mic = record.measurement(antibiotic);
                Observation {
                    bacterium: record.bacterium.clone(),
                    gram: record.gram,
                    antibiotic,
                    mic,
                    effectiveness: effectiveness(mic),
                }
            })
        })
        .collect();

    debug!(
        "Prepared {} observations from {} records",
        observations.len(),
        records.len()
    );
    observations
}

pub fn filter_by_antibiotic(observations: &[Observation], antibiotic: Antibiotic) -> Vec<Observation> {
    observations
        .iter()
        .filter(|o| o.antibiotic == antibiotic)
        .cloned()
        .collect()
}

pub fn observations_to_dataframe(observations: &[Observation]) -> PolarsResult<DataFrame> {
    let bacteria: Vec<&str> = observations.iter().map(|o| o.bacterium.as_str()).collect();
    let gram: Vec<&str> = observations.iter().map(|o| o.gram.as_str()).collect();
    let antibiotic: Vec<&str> = observations.iter().map(|o| o.antibiotic.name()).collect();
    let mic: Vec<Option<f64>> = observations.iter().map(|o| o.mic).collect();
    let eff: Vec<Option<f64>> = observations.iter().map(|o| o.effectiveness).collect();

    DataFrame::new(vec![
        Column::from(Series::new(PlSmallStr::from("Bacteria"), bacteria)),
        Column::from(Series::new(PlSmallStr::from("Gram_Staining"), gram)),
        Column::from(Series::new(PlSmallStr::from("Antibiotic"), antibiotic)),
        Column::from(Series::new(PlSmallStr::from("MIC"), mic)),
        Column::from(Series::new(PlSmallStr::from("Effectiveness"), eff)),
    ])
}

/// Writes the long form to `path` as CSV.
pub fn export_observations(observations: &[Observation], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let mut df = observations_to_dataframe(observations)?;
    let mut file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)?;

    info!("Wrote {} observations to {}", df.height(), path.display());
    Ok(())
}
