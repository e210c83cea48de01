//! Extraction of channel readings from the status page HTML.

use scraper::{ElementRef, Html, Selector};
use tracing::trace;

use sb8200_types::Snapshot;

use crate::coerce::coerce;
use crate::layout::{FromRow, PageLayout, Row, TableLayout, SB8200_LAYOUT};
use crate::AdapterError;

/// Parse an SB8200 status page into a snapshot.
pub fn extract(html: &str) -> Result<Snapshot, AdapterError> {
    extract_with(html, &SB8200_LAYOUT)
}

/// Parse a status page using an explicit layout.
///
/// Either every data row of both tables is read, or an error is returned.
pub fn extract_with(html: &str, layout: &PageLayout) -> Result<Snapshot, AdapterError> {
    let document = Html::parse_document(html);
    let table_selector = selector(layout.table_selector)?;

    let tables: Vec<ElementRef<'_>> = document.select(&table_selector).collect();
    if tables.len() < layout.min_tables() {
        return Err(AdapterError::Layout(format!(
            "expected at least {} tables matching '{}', found {}",
            layout.min_tables(),
            layout.table_selector,
            tables.len()
        )));
    }

    let mut snapshot = Snapshot::new();
    snapshot.downstream = extract_table(tables[layout.downstream.position], &layout.downstream)?;
    snapshot.upstream = extract_table(tables[layout.upstream.position], &layout.upstream)?;
    Ok(snapshot)
}

fn extract_table<R: FromRow>(
    table: ElementRef<'_>,
    layout: &TableLayout,
) -> Result<Vec<R>, AdapterError> {
    let row_selector = selector("tr")?;
    let cell_selector = selector("td")?;

    let mut out = Vec::new();
    for (i, tr) in table.select(&row_selector).enumerate() {
        if i < layout.header_rows {
            continue;
        }

        let cells: Vec<String> = tr
            .select(&cell_selector)
            .map(|td| td.text().collect::<String>())
            .collect();
        trace!(table = layout.name, row = i, ?cells, "data row");

        if cells.len() < layout.min_cells() {
            return Err(AdapterError::Layout(format!(
                "{} row {} has {} cells, expected at least {}",
                layout.name,
                i,
                cells.len(),
                layout.min_cells()
            )));
        }

        let mut fields = Vec::with_capacity(layout.columns.len());
        for column in layout.columns {
            let value =
                coerce(&cells[column.index], column.kind).map_err(|source| AdapterError::Field {
                    table: layout.name,
                    row: i,
                    field: column.field,
                    source,
                })?;
            fields.push((column.field, value));
        }

        out.push(R::from_row(&Row::new(layout.name, fields))?);
    }

    Ok(out)
}

fn selector(css: &str) -> Result<Selector, AdapterError> {
    Selector::parse(css)
        .map_err(|e| AdapterError::Layout(format!("invalid selector '{}': {}", css, e)))
}
