use std::collections::HashSet;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::DataError;
use crate::models::{Antibiotic, Dataset, GramStain, RawRecord};

/// Burtin's dataset stored as a JSON array of records.
pub struct BurtinJson {
    pub path: PathBuf,
}

/// The same records as a headered CSV file.
pub struct BurtinCsv {
    pub path: PathBuf,
}

/// Picks a loader from the file extension; anything that is not `.csv` is read as JSON.
pub fn dataset_for_path(path: &Path) -> Box<dyn Dataset> {
    let is_csv = path
        .extension()
        .map_or(false, |ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Box::new(BurtinCsv { path: path.to_path_buf() })
    } else {
        Box::new(BurtinJson { path: path.to_path_buf() })
    }
}

/// A MIC cell after numeric coercion. Anything that is not a finite number becomes `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Measurement(pub Option<f64>);

pub fn coerce_measurement(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl<'de> Deserialize<'de> for Measurement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MeasurementVisitor)
    }
}

struct MeasurementVisitor;

impl<'de> Visitor<'de> for MeasurementVisitor {
    type Value = Measurement;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a number or numeric text")
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Measurement, E> {
        Ok(Measurement(None))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Measurement, E> {
        Ok(Measurement(Some(v as f64)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Measurement, E> {
        Ok(Measurement(Some(v as f64)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Measurement, E> {
        Ok(Measurement(Some(v).filter(|v| v.is_finite())))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Measurement, E> {
        Ok(Measurement(coerce_measurement(v)))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Measurement, E> {
        Ok(Measurement(None))
    }

    fn visit_none<E: de::Error>(self) -> Result<Measurement, E> {
        Ok(Measurement(None))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Measurement, D::Error> {
        deserializer.deserialize_any(MeasurementVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Measurement, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Measurement(None))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Measurement, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Measurement(None))
    }
}

/// One record exactly as stored; the Gram stain is still unchecked text.
#[derive(Debug, Deserialize)]
pub struct RawRecordRow {
    #[serde(rename = "Bacteria")]
    pub bacteria: String,
    #[serde(rename = "Gram_Staining")]
    pub gram_staining: String,
    #[serde(rename = "Penicillin", default)]
    pub penicillin: Measurement,
    #[serde(rename = "Streptomycin", default)]
    pub streptomycin: Measurement,
    #[serde(rename = "Neomycin", default)]
    pub neomycin: Measurement,
}

impl RawRecordRow {
    fn measurement(&self, antibiotic: Antibiotic) -> Measurement {
        match antibiotic {
            Antibiotic::Penicillin => self.penicillin,
            Antibiotic::Streptomycin => self.streptomycin,
            Antibiotic::Neomycin => self.neomycin,
        }
    }
}

/// Checks Gram stains and bacterium uniqueness, failing on the first defect.
pub fn validate_records(rows: Vec<RawRecordRow>) -> Result<Vec<RawRecord>, DataError> {
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for row in rows {
        let gram = GramStain::parse(&row.gram_staining).ok_or_else(|| {
            DataError::UnknownGramStain {
                bacterium: row.bacteria.clone(),
                value: row.gram_staining.clone(),
            }
        })?;
        if !seen.insert(row.bacteria.clone()) {
            return Err(DataError::DuplicateBacterium(row.bacteria));
        }

        let measurements = Antibiotic::ALL.map(|a| row.measurement(a).0);
        for antibiotic in Antibiotic::ALL {
            if measurements[antibiotic.index()].is_none() {
                warn!("{}: {} MIC is missing or not numeric", row.bacteria, antibiotic);
            }
        }

        records.push(RawRecord {
            bacterium: row.bacteria,
            gram,
            measurements,
        });
    }

    Ok(records)
}

/// Parses a JSON document into validated records.
pub fn parse_json_records(value: Value) -> Result<Vec<RawRecord>, DataError> {
    let items = match value {
        Value::Array(items) => items,
        _ => return Err(DataError::NotAnArray),
    };

    let rows = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            serde_json::from_value::<RawRecordRow>(item)
                .map_err(|source| DataError::MalformedRecord { index, source })
        })
        .collect::<Result<Vec<_>, _>>()?;

    validate_records(rows)
}

/// Parses headered CSV text into validated records.
pub fn parse_csv_records<R: std::io::Read>(reader: R) -> Result<Vec<RawRecord>, DataError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let rows = csv_reader
        .deserialize::<RawRecordRow>()
        .enumerate()
        .map(|(i, row)| row.map_err(|source| DataError::MalformedRow { row: i + 1, source }))
        .collect::<Result<Vec<_>, _>>()?;

    validate_records(rows)
}

impl Dataset for BurtinJson {
    fn load(&self) -> Result<Vec<RawRecord>> {
        info!("Reading Burtin records from {}", self.path.display());

        let file = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        let value: Value = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("{} is not valid JSON", self.path.display()))?;

        let records = match parse_json_records(value) {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to load {}: {}", self.path.display(), e);
                return Err(e).with_context(|| format!("invalid dataset {}", self.path.display()));
            }
        };
        debug!("Loaded {} records", records.len());

        Ok(records)
    }

    fn source(&self) -> &Path {
        &self.path
    }
}

impl Dataset for BurtinCsv {
    fn load(&self) -> Result<Vec<RawRecord>> {
        info!("Reading Burtin records from {}", self.path.display());

        let file = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;

        let records = match parse_csv_records(BufReader::new(file)) {
            Ok(records) => records,
            Err(e) => {
                error!("Failed to load {}: {}", self.path.display(), e);
                return Err(e).with_context(|| format!("invalid dataset {}", self.path.display()));
            }
        };
        debug!("Loaded {} records", records.len());

        Ok(records)
    }

    fn source(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper_functions::bundled_dataset_path;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn coercion_accepts_numeric_text_only() {
        assert_eq!(coerce_measurement("100"), Some(100.0));
        assert_eq!(coerce_measurement(" 0.4 "), Some(0.4));
        assert_eq!(coerce_measurement("NA"), None);
        assert_eq!(coerce_measurement(""), None);
        assert_eq!(coerce_measurement("inf"), None);
        assert_eq!(coerce_measurement("-2"), Some(-2.0));
    }

    #[test]
    fn json_cells_of_any_shape_coerce_without_failing() {
        let value = json!([
            {"Bacteria": "E. coli", "Gram_Staining": "negative",
             "Penicillin": "NA", "Streptomycin": "0.4", "Neomycin": 0.1},
            {"Bacteria": "S. aureus", "Gram_Staining": "positive",
             "Penicillin": null, "Streptomycin": [1, 2], "Genus": "Staphylococcus"},
        ]);
        let records = parse_json_records(value).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].measurements, [None, Some(0.4), Some(0.1)]);
        // Missing Neomycin key and a non-scalar Streptomycin cell both degrade to None.
        assert_eq!(records[1].measurements, [None, None, None]);
        assert_eq!(records[1].gram, GramStain::Positive);
    }

    #[test]
    fn unknown_gram_stain_fails_fast() {
        let value = json!([
            {"Bacteria": "Mystery", "Gram_Staining": "variable",
             "Penicillin": 1, "Streptomycin": 1, "Neomycin": 1},
        ]);
        match parse_json_records(value) {
            Err(DataError::UnknownGramStain { bacterium, value }) => {
                assert_eq!(bacterium, "Mystery");
                assert_eq!(value, "variable");
            }
            other => panic!("expected UnknownGramStain, got {:?}", other),
        }
    }

    #[test]
    fn duplicate_bacterium_is_rejected() {
        let value = json!([
            {"Bacteria": "E. coli", "Gram_Staining": "negative"},
            {"Bacteria": "E. coli", "Gram_Staining": "negative"},
        ]);
        assert!(matches!(
            parse_json_records(value),
            Err(DataError::DuplicateBacterium(name)) if name == "E. coli"
        ));
    }

    #[test]
    fn top_level_must_be_an_array() {
        let value = json!({"Bacteria": "E. coli"});
        assert!(matches!(parse_json_records(value), Err(DataError::NotAnArray)));
    }

    #[test]
    fn record_without_name_reports_its_index() {
        let value = json!([
            {"Bacteria": "E. coli", "Gram_Staining": "negative"},
            {"Gram_Staining": "negative"},
        ]);
        assert!(matches!(
            parse_json_records(value),
            Err(DataError::MalformedRecord { index: 1, .. })
        ));
    }

    #[test]
    fn csv_records_parse_like_json() {
        let text = "Bacteria,Gram_Staining,Penicillin,Streptomycin,Neomycin\n\
                    Escherichia coli,negative,100,0.4,0.1\n\
                    Staphylococcus aureus,positive,NA,,0.001\n";
        let records = parse_csv_records(text.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].measurements, [Some(100.0), Some(0.4), Some(0.1)]);
        assert_eq!(records[1].measurements, [None, None, Some(0.001)]);
    }

    #[test]
    fn csv_file_loads_through_extension_dispatch() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "Bacteria,Gram_Staining,Penicillin,Streptomycin,Neomycin").unwrap();
        writeln!(file, "Proteus vulgaris,negative,3,0.1,0.1").unwrap();

        let dataset = dataset_for_path(file.path());
        let records = dataset.load().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].bacterium, "Proteus vulgaris");
    }

    #[test]
    fn bundled_dataset_has_sixteen_bacteria() {
        let dataset = BurtinJson { path: bundled_dataset_path() };
        let records = dataset.load().unwrap();

        assert_eq!(records.len(), 16);
        let positives = records.iter().filter(|r| r.gram == GramStain::Positive).count();
        assert_eq!(positives, 7);
        assert!(records.iter().all(|r| r.measurements.iter().all(Option::is_some)));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dataset = BurtinJson { path: PathBuf::from("/nonexistent/burtin.json") };
        assert!(dataset.load().is_err());
    }
}
