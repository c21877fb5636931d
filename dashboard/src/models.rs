use std::fmt;
use std::path::Path;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

/// Cell-wall staining class of a bacterium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GramStain {
    Positive,
    Negative,
}

impl GramStain {
    pub const ALL: [GramStain; 2] = [GramStain::Positive, GramStain::Negative];

    /// Exact match only: anything else is a data-quality defect for the caller to report.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "positive" => Some(GramStain::Positive),
            "negative" => Some(GramStain::Negative),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GramStain::Positive => "positive",
            GramStain::Negative => "negative",
        }
    }
}

impl fmt::Display for GramStain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three antibiotics tracked by Burtin's dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Antibiotic {
    Penicillin,
    Streptomycin,
    Neomycin,
}

impl Antibiotic {
    /// Column order of the wide-form dataset.
    pub const ALL: [Antibiotic; 3] = [
        Antibiotic::Penicillin,
        Antibiotic::Streptomycin,
        Antibiotic::Neomycin,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Antibiotic::Penicillin => "Penicillin",
            Antibiotic::Streptomycin => "Streptomycin",
            Antibiotic::Neomycin => "Neomycin",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Antibiotic::Penicillin => 0,
            Antibiotic::Streptomycin => 1,
            Antibiotic::Neomycin => 2,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Antibiotic::Penicillin => "penicillin",
            Antibiotic::Streptomycin => "streptomycin",
            Antibiotic::Neomycin => "neomycin",
        }
    }
}

impl fmt::Display for Antibiotic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One bacterium as read from the dataset (wide form).
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub bacterium: String,
    pub gram: GramStain,
    /// MIC per antibiotic, indexed by [`Antibiotic::index`]. `None` when the cell was malformed.
    pub measurements: [Option<f64>; 3],
}

impl RawRecord {
    pub fn measurement(&self, antibiotic: Antibiotic) -> Option<f64> {
        self.measurements[antibiotic.index()]
    }
}

/// One bacterium × antibiotic row of the long form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    #[serde(rename = "Bacteria")]
    pub bacterium: String,
    #[serde(rename = "Gram_Staining")]
    pub gram: GramStain,
    #[serde(rename = "Antibiotic")]
    pub antibiotic: Antibiotic,
    #[serde(rename = "MIC")]
    pub mic: Option<f64>,
    #[serde(rename = "Effectiveness")]
    pub effectiveness: Option<f64>,
}

/// State of the dashboard's antibiotic selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Selection {
    All,
    Penicillin,
    Streptomycin,
    Neomycin,
}

impl Selection {
    pub const ALL: [Selection; 4] = [
        Selection::All,
        Selection::Penicillin,
        Selection::Streptomycin,
        Selection::Neomycin,
    ];

    pub fn antibiotic(&self) -> Option<Antibiotic> {
        match self {
            Selection::All => None,
            Selection::Penicillin => Some(Antibiotic::Penicillin),
            Selection::Streptomycin => Some(Antibiotic::Streptomycin),
            Selection::Neomycin => Some(Antibiotic::Neomycin),
        }
    }

    pub fn label(&self) -> &'static str {
        match self.antibiotic() {
            Some(antibiotic) => antibiotic.name(),
            None => "All",
        }
    }
}

impl From<Antibiotic> for Selection {
    fn from(antibiotic: Antibiotic) -> Self {
        match antibiotic {
            Antibiotic::Penicillin => Selection::Penicillin,
            Antibiotic::Streptomycin => Selection::Streptomycin,
            Antibiotic::Neomycin => Selection::Neomycin,
        }
    }
}

/// A source of raw records.
pub trait Dataset {
    fn load(&self) -> Result<Vec<RawRecord>>;

    fn source(&self) -> &Path;
}
