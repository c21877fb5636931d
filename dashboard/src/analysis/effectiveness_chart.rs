//! Builds the layered effectiveness bar chart for a subset of observations.
//!
//! The result is a renderer-independent description: every row already has its
//! rank on the category axis, so backends only map ranks to pixels.

use std::cmp::Ordering;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analysis::annotations::{annotation_for, ANNOTATION_FONT_SIZE};
use crate::models::{Antibiotic, GramStain, Observation};

pub const X_AXIS_TITLE: &str = "Effectiveness (-log₁₀ MIC)";
pub const Y_AXIS_TITLE: &str = "Bacteria";
pub const LEGEND_TITLE: &str = "Gram-Stain";
/// Horizontal gap between a bar end and its value label, in pixels.
pub const LABEL_OFFSET_PX: f64 = 6.0;
pub const RULE_DASH: [u32; 2] = [10, 10];

/// Sizing and colour constants shared by every chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartLayout {
    pub domain_min: f64,
    pub domain_padding: f64,
    pub row_height: u32,
    pub min_height: u32,
    pub width_with_axis: u32,
    pub width_without_axis: u32,
    pub positive_colour: String,
    pub negative_colour: String,
}

impl Default for ChartLayout {
    fn default() -> Self {
        ChartLayout {
            domain_min: -3.5,
            domain_padding: 0.5,
            row_height: 30,
            min_height: 600,
            width_with_axis: 380,
            width_without_axis: 350,
            positive_colour: "#2481c3".to_string(),
            negative_colour: "#f5974f".to_string(),
        }
    }
}

impl ChartLayout {
    pub fn colour_for(&self, gram: GramStain) -> &str {
        match gram {
            GramStain::Positive => &self.positive_colour,
            GramStain::Negative => &self.negative_colour,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub title: String,
    pub show_legend: bool,
    pub show_y_axis: bool,
    pub show_x_axis: bool,
    pub annotation: Option<Antibiotic>,
    /// Overrides the axis-dependent default width.
    pub width: Option<u32>,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            title: String::new(),
            show_legend: true,
            show_y_axis: true,
            show_x_axis: true,
            annotation: None,
            width: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Right => "right",
        }
    }
}

/// An observation with its position on the category axis (0 = top row).
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub rank: usize,
    pub label: String,
    pub observation: Observation,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub rank: usize,
    pub length: f64,
    pub gram: GramStain,
    pub colour: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValueLabel {
    pub rank: usize,
    pub x: f64,
    pub text: String,
    pub align: TextAlign,
    pub dx: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceRule {
    pub x: f64,
    pub dash: [u32; 2],
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedAnnotation {
    pub x: f64,
    pub rank: usize,
    pub text: &'static str,
    pub dx: f64,
    pub dy: f64,
    pub font_size: f64,
    pub italic: bool,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub gram: GramStain,
    pub colour: String,
}

/// Layers are listed bottom to top: bars, rule, value labels, annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectivenessChart {
    pub title: String,
    pub rows: Vec<RankedRow>,
    pub x_domain: (f64, f64),
    pub bars: Vec<Bar>,
    pub rule: ReferenceRule,
    pub value_labels: Vec<ValueLabel>,
    pub annotation: Option<PlacedAnnotation>,
    pub legend: Vec<LegendEntry>,
    pub show_legend: bool,
    pub show_y_axis: bool,
    pub show_x_axis: bool,
    pub width: u32,
    pub height: u32,
}

impl EffectivenessChart {
    /// Category axis labels in rank order.
    pub fn categories(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.label.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Ascending effectiveness with undefined values last.
fn compare_effectiveness(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by effectiveness; rows that compare equal keep their input order.
pub fn rank_observations(observations: &[Observation]) -> Vec<RankedRow> {
    let mut sorted: Vec<&Observation> = observations.iter().collect();
    sorted.sort_by(|a, b| compare_effectiveness(a.effectiveness, b.effectiveness));

    let antibiotics: HashSet<Antibiotic> = observations.iter().map(|o| o.antibiotic).collect();
    let mixed = antibiotics.len() > 1;

    sorted
        .into_iter()
        .enumerate()
        .map(|(rank, o)| RankedRow {
            rank,
            label: if mixed {
                format!("{} ({})", o.bacterium, o.antibiotic)
            } else {
                o.bacterium.clone()
            },
            observation: o.clone(),
        })
        .collect()
}

fn max_effectiveness(rows: &[RankedRow]) -> Option<f64> {
    rows.iter()
        .filter_map(|r| r.observation.effectiveness)
        .fold(None, |acc, e| Some(acc.map_or(e, |m: f64| m.max(e))))
}

pub fn build_chart(
    observations: &[Observation],
    options: &ChartOptions,
    layout: &ChartLayout,
) -> EffectivenessChart {
    let rows = rank_observations(observations);
    let max_eff = max_effectiveness(&rows).unwrap_or(0.0);
    let x_domain = (layout.domain_min, max_eff + layout.domain_padding);

    let bars: Vec<Bar> = rows
        .iter()
        .filter_map(|r| {
            r.observation.effectiveness.map(|length| Bar {
                rank: r.rank,
                length,
                gram: r.observation.gram,
                colour: layout.colour_for(r.observation.gram).to_string(),
            })
        })
        .collect();

    let value_labels: Vec<ValueLabel> = rows
        .iter()
        .filter_map(|r| {
            r.observation.effectiveness.map(|eff| {
                let (align, dx) = if eff > 0.0 {
                    (TextAlign::Left, LABEL_OFFSET_PX)
                } else {
                    (TextAlign::Right, -LABEL_OFFSET_PX)
                };
                ValueLabel {
                    rank: r.rank,
                    x: eff,
                    text: format!("{:.2}", eff),
                    align,
                    dx,
                }
            })
        })
        .collect();

    let annotation = match options.annotation {
        Some(antibiotic) if !rows.is_empty() => {
            let style = annotation_for(antibiotic);
            Some(PlacedAnnotation {
                x: max_eff - 1.0,
                rank: rows.len() / 2,
                text: style.message,
                dx: style.dx,
                dy: style.dy,
                font_size: ANNOTATION_FONT_SIZE,
                italic: true,
                align: TextAlign::Right,
            })
        }
        _ => None,
    };

    let width = options.width.unwrap_or(if options.show_y_axis {
        layout.width_with_axis
    } else {
        layout.width_without_axis
    });
    let height = (layout.row_height * rows.len() as u32).max(layout.min_height);

    let legend = GramStain::ALL
        .iter()
        .map(|gram| LegendEntry {
            gram: *gram,
            colour: layout.colour_for(*gram).to_string(),
        })
        .collect();

    debug!(
        "Built chart '{}': {} rows, {} bars, domain [{:.2}, {:.2}]",
        options.title,
        rows.len(),
        bars.len(),
        x_domain.0,
        x_domain.1
    );

    EffectivenessChart {
        title: options.title.clone(),
        rows,
        x_domain,
        bars,
        rule: ReferenceRule { x: 0.0, dash: RULE_DASH },
        value_labels,
        annotation,
        legend,
        show_legend: options.show_legend,
        show_y_axis: options.show_y_axis,
        show_x_axis: options.show_x_axis,
        width,
        height,
    }
}
