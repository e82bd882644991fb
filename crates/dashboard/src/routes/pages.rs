//! Index and per-city pages.

use std::fmt::Write as _;

use axum::{
    extract::{Path, State},
    response::Html,
};

use aq_core::display_city;
use aq_store::StoredRow;

use crate::chart::{numeric_value, Band};
use crate::html::{escape, page};
use crate::routes::PageError;
use crate::state::AppState;

/// Rows shown in the tabular preview.
const PREVIEW_ROWS: usize = 10;

const EMPTY_STORE_WARNING: &str = "No data found in the store. \
    Run the airwatch poller first to fetch measurements.";

/// GET / - list of stored cities.
pub async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let cities = state.store.cities()?;

    let body = if cities.is_empty() {
        format!(
            "<h1>Air Quality Dashboard</h1><p class=\"warning\">{EMPTY_STORE_WARNING}</p>"
        )
    } else {
        let mut list = String::new();
        for city in &cities {
            let _ = write!(
                list,
                "<li><a href=\"/city/{href}\">{name}</a></li>",
                href = escape(city),
                name = escape(&display_city(city)),
            );
        }
        format!("<h1>Air Quality Dashboard</h1><p>Select a city:</p><ul>{list}</ul>")
    };

    Ok(Html(page("Air Quality Dashboard", &body)))
}

/// GET /city/{city} - preview table and latest-measurement bar chart.
pub async fn city_handler(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Html<String>, PageError> {
    let rows = state.store.rows_for_city(&city)?;
    let display = display_city(&aq_core::canonical_city(&city));

    if rows.is_empty() {
        let body = format!(
            "<h1>{name}</h1><p class=\"warning\">{EMPTY_STORE_WARNING}</p>",
            name = escape(&display),
        );
        return Ok(Html(page(&display, &body)));
    }

    let mut body = String::new();
    let _ = write!(
        body,
        "<p><a href=\"/\">&larr; All cities</a></p><h1>{name}</h1>\
         <h2>Data for {name} (first {PREVIEW_ROWS} rows)</h2>",
        name = escape(&display),
    );
    body.push_str(&preview_table(&rows));

    let _ = write!(
        body,
        "<h2>Air quality values for {name} (latest measurement)</h2>",
        name = escape(&display),
    );
    body.push_str(&bar_chart(&rows[0]));

    Ok(Html(page(&display, &body)))
}

/// Renders the first rows as a table. The column set is the union over the
/// preview rows, so freshly widened columns show up.
fn preview_table(rows: &[StoredRow]) -> String {
    let preview = &rows[..rows.len().min(PREVIEW_ROWS)];

    let mut columns: Vec<&str> = Vec::new();
    for row in preview {
        for code in row.values.keys() {
            if !columns.contains(&code.as_str()) {
                columns.push(code);
            }
        }
    }
    columns.sort_unstable();

    let mut table = String::from("<table><tr><th>id</th><th>timestamp</th>");
    for code in &columns {
        let _ = write!(table, "<th>{}</th>", escape(code));
    }
    table.push_str("</tr>");

    for row in preview {
        let _ = write!(table, "<tr><td>{}</td><td>{}</td>", row.id, escape(&row.timestamp));
        for code in &columns {
            let cell = row
                .values
                .get(*code)
                .and_then(|v| v.as_deref())
                .unwrap_or("");
            let _ = write!(table, "<td>{}</td>", escape(cell));
        }
        table.push_str("</tr>");
    }
    table.push_str("</table>");
    table
}

/// Renders the latest row's pollutant values as horizontal bars, colored by
/// severity band.
fn bar_chart(latest: &StoredRow) -> String {
    let max = latest
        .values
        .values()
        .filter_map(|v| numeric_value(v.as_deref()))
        .fold(0.0_f64, f64::max);

    let mut chart = String::from("<div class=\"chart\">");
    for (code, value) in &latest.values {
        let band = Band::classify(value.as_deref());
        let width = match numeric_value(value.as_deref()) {
            Some(v) if max > 0.0 => (v / max * 100.0).max(2.0),
            _ => 2.0,
        };
        let label = value.as_deref().unwrap_or("-");
        let _ = write!(
            chart,
            "<div class=\"bar-row\"><span class=\"bar-label\">{code}</span>\
             <div class=\"bar\" style=\"width:{width:.1}%;background:{color}\"></div>\
             <span class=\"bar-value\">{label}</span></div>",
            code = escape(code),
            color = band.color(),
            label = escape(label),
        );
    }
    chart.push_str("</div>");
    chart
}
