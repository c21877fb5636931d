use serde_json::{json, Value};

use crate::analysis::effectiveness_chart::{EffectivenessChart, LEGEND_TITLE, X_AXIS_TITLE, Y_AXIS_TITLE};
use crate::models::GramStain;

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

const TOOLTIP_FIELDS: [&str; 5] = ["Bacteria", "Antibiotic", "Gram_Staining", "MIC", "Effectiveness"];

fn y_encoding(chart: &EffectivenessChart, with_axis: bool) -> Value {
    if !with_axis {
        return json!({"field": "Label", "type": "nominal", "sort": null});
    }
    let title = if chart.show_y_axis {
        Value::from(Y_AXIS_TITLE)
    } else {
        Value::Null
    };
    json!({
        "field": "Label",
        "type": "nominal",
        "sort": null,
        "title": title,
        "axis": {
            "labelLimit": 400,
            "labelFontSize": 13,
            "titleFontSize": 14,
            "labels": chart.show_y_axis,
            "ticks": chart.show_y_axis,
            "titleFontWeight": "bold",
        },
    })
}

fn value_label_layer(filter: &str, align: &str, dx: f64) -> Value {
    json!({
        "transform": [{"filter": filter}],
        "mark": {"type": "text", "align": align, "baseline": "middle", "dx": dx},
        "encoding": {
            "x": {"field": "Effectiveness", "type": "quantitative"},
            "text": {"field": "Effectiveness", "type": "quantitative", "format": ".2f"},
        },
    })
}

/// A layered Vega-Lite spec equivalent to the plotted chart. Rows carry their rank so the
/// inline data is already in category order and the y-axis is unsorted.
pub fn vega_lite_spec(chart: &EffectivenessChart) -> Value {
    let values: Vec<Value> = chart
        .rows
        .iter()
        .map(|row| {
            let o = &row.observation;
            json!({
                "Rank": row.rank,
                "Label": row.label,
                "Bacteria": o.bacterium,
                "Antibiotic": o.antibiotic.name(),
                "Gram_Staining": o.gram.as_str(),
                "MIC": o.mic,
                "Effectiveness": o.effectiveness,
            })
        })
        .collect();

    let colour_range: Vec<&str> = GramStain::ALL
        .iter()
        .map(|g| {
            chart
                .legend
                .iter()
                .find(|e| e.gram == *g)
                .map_or("#000000", |e| e.colour.as_str())
        })
        .collect();

    let x_axis = if chart.show_x_axis {
        json!({"titleFontWeight": "bold"})
    } else {
        Value::Null
    };

    let legend = if chart.show_legend {
        json!({"title": LEGEND_TITLE})
    } else {
        Value::Null
    };
    let tooltip: Vec<Value> = TOOLTIP_FIELDS.iter().map(|f| json!({"field": f})).collect();

    let bars = json!({
        "mark": "bar",
        "encoding": {
            "x": {
                "field": "Effectiveness",
                "type": "quantitative",
                "title": X_AXIS_TITLE,
                "scale": {"domain": [chart.x_domain.0, chart.x_domain.1]},
                "axis": x_axis,
            },
            "y": y_encoding(chart, true),
            "color": {
                "field": "Gram_Staining",
                "type": "nominal",
                "scale": {"domain": ["positive", "negative"], "range": colour_range},
                "legend": legend,
            },
            "tooltip": tooltip,
        },
    });

    let rule = json!({
        "data": {"values": [{"x": chart.rule.x}]},
        "mark": {"type": "rule", "color": "black", "strokeDash": chart.rule.dash},
        "encoding": {"x": {"field": "x", "type": "quantitative"}},
    });

    let mut layers = vec![
        bars,
        rule,
        value_label_layer("datum.Effectiveness > 0", "left", 6.0),
        value_label_layer(
            "isValid(datum.Effectiveness) && datum.Effectiveness <= 0",
            "right",
            -6.0,
        ),
    ];

    if let Some(note) = &chart.annotation {
        let anchor = chart
            .rows
            .get(note.rank)
            .map(|r| r.label.clone())
            .unwrap_or_default();
        let font_style = if note.italic { "italic" } else { "normal" };
        layers.push(json!({
            "data": {"values": [{"x": note.x, "y": anchor, "text": note.text}]},
            "mark": {
                "type": "text",
                "align": note.align.as_str(),
                "baseline": "middle",
                "fontSize": note.font_size,
                "fontStyle": font_style,
                "dx": note.dx,
                "dy": note.dy,
                "color": "black",
            },
            "encoding": {
                "x": {"field": "x", "type": "quantitative"},
                "y": {"field": "y", "type": "nominal", "sort": null},
                "text": {"field": "text", "type": "nominal"},
            },
        }));
    }

    let mut spec = json!({
        "$schema": VEGA_LITE_SCHEMA,
        "width": chart.width,
        "height": chart.height,
        "data": {"values": values},
        "encoding": {"y": y_encoding(chart, false)},
        "layer": layers,
    });
    if !chart.title.is_empty() {
        spec["title"] = Value::from(chart.title.clone());
    }
    spec
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::effectiveness_chart::{build_chart, ChartLayout, ChartOptions};
    use crate::models::{Antibiotic, Observation};

    fn observations() -> Vec<Observation> {
        [
            ("E. coli", GramStain::Negative, Some(-2.0)),
            ("S. aureus", GramStain::Positive, Some(1.52)),
            ("Odd", GramStain::Positive, None),
        ]
        .into_iter()
        .map(|(name, gram, eff)| Observation {
            bacterium: name.to_string(),
            gram,
            antibiotic: Antibiotic::Penicillin,
            mic: eff.map(|e: f64| 10f64.powf(-e)),
            effectiveness: eff,
        })
        .collect()
    }

    #[test]
    fn spec_layers_follow_chart_layers() {
        let options = ChartOptions {
            title: "Penicillin".to_string(),
            annotation: Some(Antibiotic::Penicillin),
            ..ChartOptions::default()
        };
        let chart = build_chart(&observations(), &options, &ChartLayout::default());
        let spec = vega_lite_spec(&chart);

        assert_eq!(spec["$schema"], VEGA_LITE_SCHEMA);
        assert_eq!(spec["title"], "Penicillin");
        let layers = spec["layer"].as_array().unwrap();
        assert_eq!(layers.len(), 5);
        assert_eq!(layers[0]["mark"], "bar");
        assert_eq!(layers[1]["mark"]["strokeDash"], json!([10, 10]));
        assert_eq!(layers[4]["mark"]["fontStyle"], "italic");
        assert_eq!(layers[4]["data"]["values"][0]["y"], "S. aureus");
        assert_eq!(
            layers[0]["encoding"]["x"]["scale"]["domain"],
            json!([-3.5, chart.x_domain.1])
        );
    }

    #[test]
    fn inline_data_is_in_rank_order_with_nulls() {
        let chart = build_chart(&observations(), &ChartOptions::default(), &ChartLayout::default());
        let spec = vega_lite_spec(&chart);
        let values = spec["data"]["values"].as_array().unwrap();

        let labels: Vec<&str> = values.iter().map(|v| v["Label"].as_str().unwrap()).collect();
        assert_eq!(labels, ["E. coli", "S. aureus", "Odd"]);
        assert!(values[2]["Effectiveness"].is_null());
        assert!(spec["encoding"]["y"]["sort"].is_null());
    }

    #[test]
    fn legend_and_axis_can_be_suppressed() {
        let options = ChartOptions {
            show_legend: false,
            show_y_axis: false,
            ..ChartOptions::default()
        };
        let chart = build_chart(&observations(), &options, &ChartLayout::default());
        let spec = vega_lite_spec(&chart);
        let encoding = &spec["layer"][0]["encoding"];

        assert!(encoding["color"]["legend"].is_null());
        assert_eq!(encoding["y"]["axis"]["labels"], false);
        assert!(encoding["y"]["title"].is_null());
        assert_eq!(spec["width"], 350);
        assert_eq!(spec["layer"].as_array().unwrap().len(), 4);
    }
}
