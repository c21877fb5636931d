pub mod annotations;
pub mod effectiveness_chart;
pub mod plot;
pub mod vega;
