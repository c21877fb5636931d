use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, FontTransform};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::effectiveness_chart::{
    EffectivenessChart, TextAlign, LEGEND_TITLE, X_AXIS_TITLE, Y_AXIS_TITLE,
};

const MARGIN: u32 = 15;
const CAPTION_AREA: u32 = 36;
const Y_LABEL_AREA: u32 = 250;
const Y_LABEL_AREA_HIDDEN: u32 = 12;
const X_LABEL_AREA: u32 = 50;
const X_LABEL_AREA_HIDDEN: u32 = 12;
const LEGEND_AREA: u32 = 130;
/// Fraction of a category band covered by its bar.
const BAR_FILL: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

/// Parses `#rrggbb`.
pub fn parse_hex_colour(hex: &str) -> Result<RGBColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.is_ascii() {
        bail!("colour {hex:?} is not of the form #rrggbb");
    }
    let channel = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .with_context(|| format!("colour {hex:?} has a non-hex channel"))
    };
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Full image size: the plot area from the chart plus room for axes, caption and legend.
pub fn canvas_size(chart: &EffectivenessChart) -> (u32, u32) {
    let y_area = if chart.show_y_axis { Y_LABEL_AREA } else { Y_LABEL_AREA_HIDDEN };
    let x_area = if chart.show_x_axis { X_LABEL_AREA } else { X_LABEL_AREA_HIDDEN };
    let legend = if chart.show_legend { LEGEND_AREA } else { 0 };
    let caption = if chart.title.is_empty() { 0 } else { CAPTION_AREA };
    (
        chart.width + y_area + legend + 2 * MARGIN,
        chart.height + x_area + caption + 2 * MARGIN,
    )
}

/// Rank 0 sits at the top of the plot.
fn row_y(rank: usize, rows: usize) -> f64 {
    (rows - 1 - rank) as f64
}

fn text_style(size: f64, align: TextAlign) -> TextStyle<'static> {
    let h_pos = match align {
        TextAlign::Left => HPos::Left,
        TextAlign::Right => HPos::Right,
    };
    FontDesc::new(FontFamily::SansSerif, size, FontStyle::Normal)
        .color(&BLACK)
        .pos(Pos::new(h_pos, VPos::Center))
}

/// Draws every layer of `chart` onto `root`. All text is placed explicitly so that the
/// layout never depends on font metrics.
pub fn draw_chart<DB>(root: &DrawingArea<DB, Shift>, chart: &EffectivenessChart) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (total_width, _) = root.dim_in_pixel();
    let legend_width = if chart.show_legend { LEGEND_AREA } else { 0 };
    let (plot_area, legend_area) = root.split_horizontally(total_width - legend_width);

    let rows = chart.rows.len();
    let (x0, x1) = chart.x_domain;
    let y_top = rows.max(1) as f64 - 0.5;

    let caption = if chart.title.is_empty() { 0 } else { CAPTION_AREA };
    let mut ctx = ChartBuilder::on(&plot_area)
        .margin(MARGIN)
        .margin_top(MARGIN + caption)
        .x_label_area_size(if chart.show_x_axis { X_LABEL_AREA } else { X_LABEL_AREA_HIDDEN })
        .y_label_area_size(if chart.show_y_axis { Y_LABEL_AREA } else { Y_LABEL_AREA_HIDDEN })
        .build_cartesian_2d(x0..x1, -0.5..y_top)?;

    let palette = chart
        .bars
        .iter()
        .map(|bar| parse_hex_colour(&bar.colour))
        .collect::<Result<Vec<_>>>()?;

    let (left, bottom) = ctx.backend_coord(&(x0, -0.5));
    let (right, top) = ctx.backend_coord(&(x1, y_top));

    // grid and ticks
    let first_tick = x0.ceil() as i64;
    let last_tick = x1.floor() as i64;
    for tick in first_tick..=last_tick {
        let (px, _) = ctx.backend_coord(&(tick as f64, 0.0));
        root.draw(&PathElement::new(vec![(px, top), (px, bottom)], BLACK.mix(0.1).stroke_width(1)))?;
        if chart.show_x_axis {
            root.draw(&PathElement::new(vec![(px, bottom), (px, bottom + 5)], BLACK.stroke_width(1)))?;
            root.draw(&Text::new(
                tick.to_string(),
                (px, bottom + 14),
                FontDesc::new(FontFamily::SansSerif, 12.0, FontStyle::Normal)
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))?;
        }
    }

    // bars
    ctx.draw_series(chart.bars.iter().zip(palette.iter()).map(|(bar, colour)| {
        let y = row_y(bar.rank, rows);
        Rectangle::new(
            [(0.0, y - BAR_FILL / 2.0), (bar.length, y + BAR_FILL / 2.0)],
            colour.filled(),
        )
    }))?;

    // dashed zero rule, drawn in pixels so the dash pattern is exact
    let (rule_x, _) = ctx.backend_coord(&(chart.rule.x, 0.0));
    let [dash, gap] = chart.rule.dash;
    let mut y = top;
    while y < bottom {
        let end = (y + dash as i32).min(bottom);
        root.draw(&PathElement::new(vec![(rule_x, y), (rule_x, end)], BLACK.stroke_width(1)))?;
        y = end + gap as i32;
    }

    for label in &chart.value_labels {
        let (px, py) = ctx.backend_coord(&(label.x, row_y(label.rank, rows)));
        root.draw(&Text::new(
            label.text.clone(),
            (px + label.dx.round() as i32, py),
            text_style(12.0, label.align),
        ))?;
    }

    if let Some(note) = &chart.annotation {
        let (px, py) = ctx.backend_coord(&(note.x, row_y(note.rank, rows)));
        let font_style = if note.italic { FontStyle::Italic } else { FontStyle::Normal };
        let h_pos = match note.align {
            TextAlign::Left => HPos::Left,
            TextAlign::Right => HPos::Right,
        };
        root.draw(&Text::new(
            note.text,
            (px + note.dx.round() as i32, py + note.dy.round() as i32),
            FontDesc::new(FontFamily::SansSerif, note.font_size, font_style)
                .color(&BLACK)
                .pos(Pos::new(h_pos, VPos::Center)),
        ))?;
    }

    // axes
    root.draw(&PathElement::new(vec![(left, top), (left, bottom)], BLACK.stroke_width(1)))?;
    root.draw(&PathElement::new(vec![(left, bottom), (right, bottom)], BLACK.stroke_width(1)))?;

    if chart.show_y_axis {
        for row in &chart.rows {
            let (_, py) = ctx.backend_coord(&(x0, row_y(row.rank, rows)));
            root.draw(&Text::new(
                row.label.clone(),
                (left - 8, py),
                text_style(13.0, TextAlign::Right),
            ))?;
        }
        root.draw(&Text::new(
            Y_AXIS_TITLE,
            (MARGIN as i32 + 8, (top + bottom) / 2),
            FontDesc::new(FontFamily::SansSerif, 14.0, FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center))
                .transform(FontTransform::Rotate270),
        ))?;
    }

    if chart.show_x_axis {
        root.draw(&Text::new(
            X_AXIS_TITLE,
            ((left + right) / 2, bottom + 36),
            FontDesc::new(FontFamily::SansSerif, 14.0, FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
    }

    if !chart.title.is_empty() {
        root.draw(&Text::new(
            chart.title.clone(),
            ((left + right) / 2, MARGIN as i32 + CAPTION_AREA as i32 / 2),
            FontDesc::new(FontFamily::SansSerif, 16.0, FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
    }

    if chart.show_legend {
        legend_area.draw(&Text::new(
            LEGEND_TITLE,
            (10, top),
            FontDesc::new(FontFamily::SansSerif, 13.0, FontStyle::Bold)
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
        for (i, entry) in chart.legend.iter().enumerate() {
            let colour = parse_hex_colour(&entry.colour)?;
            let y = top + 22 * (i as i32 + 1);
            legend_area.draw(&Rectangle::new([(10, y - 6), (22, y + 6)], colour.filled()))?;
            legend_area.draw(&Text::new(
                entry.gram.as_str(),
                (30, y),
                text_style(12.0, TextAlign::Left),
            ))?;
        }
    }

    Ok(())
}

/// Renders `chart` as an SVG document held in memory.
pub fn render_svg(chart: &EffectivenessChart) -> Result<String> {
    let size = canvas_size(chart);
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        draw_chart(&root, chart)?;
        root.present()?;
    }
    Ok(svg)
}

pub fn render_to_file(chart: &EffectivenessChart, path: &Path, format: ImageFormat) -> Result<()> {
    let size = canvas_size(chart);
    match format {
        ImageFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_chart(&root, chart)?;
            root.present()?;
        }
        ImageFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_chart(&root, chart)?;
            root.present()?;
        }
    }
    info!("Chart '{}' saved to {}", chart.title, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::effectiveness_chart::{build_chart, ChartLayout, ChartOptions};
    use crate::models::{Antibiotic, GramStain, Observation};

    fn observation(name: &str, gram: GramStain, eff: Option<f64>) -> Observation {
        Observation {
            bacterium: name.to_string(),
            gram,
            antibiotic: Antibiotic::Neomycin,
            mic: None,
            effectiveness: eff,
        }
    }

    fn sample_chart(options: &ChartOptions) -> EffectivenessChart {
        let input = vec![
            observation("Escherichia coli", GramStain::Negative, Some(1.0)),
            observation("Staphylococcus aureus", GramStain::Positive, Some(3.0)),
            observation("Aerobacter aerogenes", GramStain::Negative, Some(-0.2)),
            observation("Unmeasured", GramStain::Positive, None),
        ];
        build_chart(&input, options, &ChartLayout::default())
    }

    #[test]
    fn hex_colours_parse() {
        assert_eq!(parse_hex_colour("#2481c3").unwrap(), RGBColor(0x24, 0x81, 0xc3));
        assert_eq!(parse_hex_colour("f5974f").unwrap(), RGBColor(0xf5, 0x97, 0x4f));
        assert!(parse_hex_colour("#12345").is_err());
        assert!(parse_hex_colour("#zz0000").is_err());
    }

    #[test]
    fn canvas_grows_with_axis_and_legend() {
        let full = sample_chart(&ChartOptions::default());
        let bare = sample_chart(&ChartOptions {
            show_legend: false,
            show_y_axis: false,
            ..ChartOptions::default()
        });
        let (fw, fh) = canvas_size(&full);
        let (bw, bh) = canvas_size(&bare);

        assert!(fw > bw);
        assert_eq!(fh, bh);
        assert_eq!(fw, 380 + Y_LABEL_AREA + LEGEND_AREA + 2 * MARGIN);
    }

    #[test]
    fn svg_contains_every_layer() {
        let chart = sample_chart(&ChartOptions {
            title: "Neomycin".to_string(),
            annotation: Some(Antibiotic::Neomycin),
            ..ChartOptions::default()
        });
        let svg = render_svg(&chart).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.contains("Escherichia coli"));
        assert!(svg.contains("Unmeasured"));
        assert!(svg.contains("3.00"));
        assert!(svg.contains("-0.20"));
        assert!(svg.contains("Broadly effective for Gram-Positive/Negative"));
        assert!(svg.contains(LEGEND_TITLE));
        assert!(svg.contains("italic"));
    }

    #[test]
    fn hidden_axis_omits_category_labels() {
        let chart = sample_chart(&ChartOptions {
            show_y_axis: false,
            show_legend: false,
            ..ChartOptions::default()
        });
        let svg = render_svg(&chart).unwrap();

        assert!(!svg.contains("Escherichia coli"));
        assert!(!svg.contains(LEGEND_TITLE));
        assert!(svg.contains("1.00"));
    }

    #[test]
    fn empty_chart_renders() {
        let chart = build_chart(&[], &ChartOptions::default(), &ChartLayout::default());
        let svg = render_svg(&chart).unwrap();
        assert!(svg.starts_with("<svg"));
    }

    #[test]
    fn svg_file_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");
        render_to_file(&sample_chart(&ChartOptions::default()), &path, ImageFormat::Svg).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Staphylococcus aureus"));
    }
}
