use tracing::info;

use crate::analysis::effectiveness_chart::{build_chart, ChartLayout, ChartOptions, EffectivenessChart};
use crate::data_handling::prepare::filter_by_antibiotic;
use crate::models::{Antibiotic, Observation, Selection};
use crate::view::narrative::{headline, insights};

/// One chart column of the dashboard.
#[derive(Debug, Clone)]
pub struct Panel {
    pub antibiotic: Antibiotic,
    pub headline: &'static str,
    /// Relative column width.
    pub column_weight: f64,
    pub chart: EffectivenessChart,
}

#[derive(Debug, Clone)]
pub struct DashboardView {
    pub selection: Selection,
    pub panels: Vec<Panel>,
    pub insights: &'static [&'static str],
}

/// Reduced-width overview columns: (antibiotic, legend, y-axis labels, column weight).
const OVERVIEW_COLUMNS: [(Antibiotic, bool, bool, f64); 3] = [
    (Antibiotic::Penicillin, false, true, 1.2),
    (Antibiotic::Streptomycin, false, false, 1.0),
    (Antibiotic::Neomycin, true, false, 1.0),
];

pub fn compose(
    selection: Selection,
    observations: &[Observation],
    layout: &ChartLayout,
    single_chart_width: Option<u32>,
) -> DashboardView {
    let panels = match selection.antibiotic() {
        None => OVERVIEW_COLUMNS
            .iter()
            .map(|&(antibiotic, show_legend, show_y_axis, column_weight)| {
                let options = ChartOptions {
                    show_legend,
                    show_y_axis,
                    ..ChartOptions::default()
                };
                let subset = filter_by_antibiotic(observations, antibiotic);
                Panel {
                    antibiotic,
                    headline: headline(antibiotic),
                    column_weight,
                    chart: build_chart(&subset, &options, layout),
                }
            })
            .collect(),
        Some(antibiotic) => {
            let options = ChartOptions {
                annotation: Some(antibiotic),
                width: single_chart_width,
                ..ChartOptions::default()
            };
            let subset = filter_by_antibiotic(observations, antibiotic);
            vec![Panel {
                antibiotic,
                headline: headline(antibiotic),
                column_weight: 1.0,
                chart: build_chart(&subset, &options, layout),
            }]
        }
    };

    info!("Composed '{}' view with {} chart(s)", selection.label(), panels.len());

    DashboardView {
        selection,
        panels,
        insights: insights(selection),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::annotations::annotation_for;
    use crate::data_handling::burtin::BurtinJson;
    use crate::data_handling::prepare::prepare;
    use crate::helper_functions::bundled_dataset_path;
    use crate::models::Dataset;

    fn burtin_observations() -> Vec<Observation> {
        let dataset = BurtinJson {
            path: bundled_dataset_path(),
        };
        prepare(&dataset.load().unwrap())
    }

    #[test]
    fn all_produces_three_reduced_charts() {
        let view = compose(Selection::All, &burtin_observations(), &ChartLayout::default(), Some(760));

        assert_eq!(view.panels.len(), 3);
        let legends: Vec<bool> = view.panels.iter().map(|p| p.chart.show_legend).collect();
        assert_eq!(legends, [false, false, true]);
        let y_axes: Vec<bool> = view.panels.iter().map(|p| p.chart.show_y_axis).collect();
        assert_eq!(y_axes, [true, false, false]);
        let widths: Vec<u32> = view.panels.iter().map(|p| p.chart.width).collect();
        assert_eq!(widths, [380, 350, 350]);
        assert!(view.panels.iter().all(|p| p.chart.annotation.is_none()));
        assert!(view.panels.iter().all(|p| p.chart.rows.len() == 16 && p.chart.height == 600));
        assert_eq!(view.panels[0].column_weight, 1.2);
    }

    #[test]
    fn neomycin_produces_one_annotated_chart() {
        let view = compose(Selection::Neomycin, &burtin_observations(), &ChartLayout::default(), Some(760));

        assert_eq!(view.panels.len(), 1);
        let chart = &view.panels[0].chart;
        assert!(chart.show_legend);
        assert_eq!(chart.width, 760);
        let note = chart.annotation.as_ref().unwrap();
        assert_eq!(note.text, annotation_for(Antibiotic::Neomycin).message);
        assert_eq!(note.rank, 8);
        assert!(chart.rows.iter().all(|r| r.observation.antibiotic == Antibiotic::Neomycin));
        assert_eq!(view.insights, insights(Selection::Neomycin));
    }

    #[test]
    fn penicillin_ranking_puts_least_effective_first() {
        let view = compose(Selection::Penicillin, &burtin_observations(), &ChartLayout::default(), None);
        let chart = &view.panels[0].chart;

        // MIC 870 is the largest penicillin MIC; two bacteria tie at 0.001 for the smallest.
        assert_eq!(chart.rows[0].observation.bacterium, "Aerobacter aerogenes");
        assert_eq!(chart.rows[14].observation.bacterium, "Bacillus anthracis");
        assert_eq!(chart.rows[15].observation.bacterium, "Streptococcus hemolyticus");
        assert_eq!(chart.width, 380);
        assert!((chart.x_domain.1 - 3.5).abs() < 1e-9);
    }

    #[test]
    fn empty_dataset_still_composes() {
        let view = compose(Selection::Streptomycin, &[], &ChartLayout::default(), None);
        assert_eq!(view.panels.len(), 1);
        assert!(view.panels[0].chart.is_empty());
    }
}
