use std::fmt::Write as _;

use crate::models::Selection;
use crate::view::compose::DashboardView;
use crate::view::narrative::{
    EXPLORE_HEADING, INFO_HEADING, INFO_SECTIONS, INSIGHTS_HEADING, INTRODUCTION, PAGE_TITLE,
    SELECTOR_PROMPT,
};

const STYLE: &str = "\
body { font-family: sans-serif; margin: 2rem auto; max-width: 1400px; padding: 0 1rem; }
.columns { display: flex; gap: 1rem; align-items: flex-start; }
.column { min-width: 0; overflow-x: auto; }
.column h6 { text-align: center; font-weight: bold; font-size: 0.9rem; }
details { margin: 0.5rem 0; }
nav a { margin-right: 0.75rem; }
";

pub fn page_file_name(selection: Selection) -> String {
    match selection.antibiotic() {
        None => "index.html".to_string(),
        Some(antibiotic) => format!("{}.html", antibiotic.slug()),
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escapes `text` and turns `**span**` pairs into `<strong>`. An unpaired marker is kept as-is.
pub fn emphasize(text: &str) -> String {
    let parts: Vec<&str> = text.split("**").collect();
    let mut out = String::with_capacity(text.len() + 16);
    for (i, part) in parts.iter().enumerate() {
        let escaped = escape_html(part);
        let is_last = i + 1 == parts.len();
        if i % 2 == 1 && !is_last {
            let _ = write!(out, "<strong>{escaped}</strong>");
        } else if i % 2 == 1 {
            let _ = write!(out, "**{escaped}");
        } else {
            out.push_str(&escaped);
        }
    }
    out
}

fn selector(current: Selection) -> String {
    let mut html = String::new();
    let _ = writeln!(html, "<label for=\"selection\">{}</label>", escape_html(SELECTOR_PROMPT));
    html.push_str("<select id=\"selection\" onchange=\"window.location.href = this.value\">\n");
    for selection in Selection::ALL {
        let selected = if selection == current { " selected" } else { "" };
        let _ = writeln!(
            html,
            "<option value=\"{}\"{}>{}</option>",
            page_file_name(selection),
            selected,
            selection.label()
        );
    }
    html.push_str("</select>\n<noscript><nav>");
    for selection in Selection::ALL {
        let _ = write!(
            html,
            "<a href=\"{}\">{}</a>",
            page_file_name(selection),
            selection.label()
        );
    }
    html.push_str("</nav></noscript>\n");
    html
}

/// Full HTML page for `view`; `charts` holds the SVG markup of each panel, in panel order.
pub fn render_page(view: &DashboardView, charts: &[String]) -> String {
    let mut html = String::new();
    let _ = writeln!(
        html,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n<title>{} | {}</title>\n<style>\n{}</style>\n</head>\n<body>",
        escape_html(PAGE_TITLE),
        view.selection.label(),
        STYLE
    );
    let _ = writeln!(html, "<h1>{}</h1>", escape_html(PAGE_TITLE));
    let _ = writeln!(html, "<p>{}</p>", emphasize(INTRODUCTION));

    let _ = writeln!(html, "<h3>{}</h3>", escape_html(INFO_HEADING));
    for section in &INFO_SECTIONS {
        let _ = writeln!(html, "<details>\n<summary>{}</summary>", escape_html(section.title));
        for block in section.blocks {
            let _ = writeln!(html, "<h4>{}</h4>\n<ul>", escape_html(block.heading));
            for bullet in block.bullets {
                let _ = writeln!(html, "<li>{}</li>", emphasize(bullet));
            }
            html.push_str("</ul>\n");
        }
        html.push_str("</details>\n");
    }
    html.push_str("<hr>\n");

    let _ = writeln!(html, "<h3>{}</h3>", escape_html(EXPLORE_HEADING));
    html.push_str(&selector(view.selection));

    html.push_str("<div class=\"columns\">\n");
    for (i, panel) in view.panels.iter().enumerate() {
        let _ = writeln!(
            html,
            "<div class=\"column\" style=\"flex: {}\">\n<h6>{}</h6>",
            panel.column_weight,
            escape_html(panel.headline)
        );
        if let Some(svg) = charts.get(i) {
            html.push_str(svg);
            html.push('\n');
        }
        html.push_str("</div>\n");
    }
    html.push_str("</div>\n<hr>\n");

    let _ = writeln!(html, "<h4>{}</h4>\n<ul>", escape_html(INSIGHTS_HEADING));
    for insight in view.insights {
        let _ = writeln!(html, "<li>{}</li>", emphasize(insight));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}
