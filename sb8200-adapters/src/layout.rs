//! Declarative description of where readings live on the status page.
//!
//! The SB8200 page has no ids or semantic markup for its data, so readings
//! are located purely by position: the n-th `table.simpleTable`, a fixed
//! number of header rows, and fixed cell indices. All of those positions
//! live in [`SB8200_LAYOUT`]; a firmware template change means editing this
//! table, not the extractor.

use sb8200_types::{DownstreamChannelReading, UpstreamChannelReading};

use crate::coerce::{FieldKind, Value};
use crate::AdapterError;

/// One mapped cell: field name, zero-based `<td>` index, and parsing rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub field: &'static str,
    pub index: usize,
    pub kind: FieldKind,
}

impl Column {
    pub const fn new(field: &'static str, index: usize, kind: FieldKind) -> Self {
        Self { field, index, kind }
    }
}

/// Location and column mapping of one data table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// Name used in errors and logs.
    pub name: &'static str,
    /// Index among the tables matched by [`PageLayout::table_selector`].
    pub position: usize,
    /// Leading `<tr>` rows that carry titles and column labels.
    pub header_rows: usize,
    /// Cells to read from every data row.
    pub columns: &'static [Column],
}

impl TableLayout {
    /// Number of `<td>` cells a data row needs to cover every mapped column.
    pub fn min_cells(&self) -> usize {
        self.columns.iter().map(|c| c.index + 1).max().unwrap_or(0)
    }
}

/// Layout of a whole status page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLayout {
    /// CSS selector shared by the data tables.
    pub table_selector: &'static str,
    pub downstream: TableLayout,
    pub upstream: TableLayout,
}

impl PageLayout {
    /// Number of marker tables the page must contain.
    pub fn min_tables(&self) -> usize {
        self.downstream.position.max(self.upstream.position) + 1
    }
}

pub const DOWNSTREAM_COLUMNS: &[Column] = &[
    Column::new("channel", 0, FieldKind::Integer),
    Column::new("modulation", 2, FieldKind::SchemeInteger),
    Column::new("freq", 3, FieldKind::UnitFloat),
    Column::new("power", 4, FieldKind::UnitFloat),
    Column::new("snr", 5, FieldKind::UnitFloat),
    Column::new("correcteds", 6, FieldKind::Integer),
    Column::new("uncorrectables", 7, FieldKind::Integer),
];

pub const UPSTREAM_COLUMNS: &[Column] = &[
    Column::new("channel", 1, FieldKind::Integer),
    Column::new("freq", 4, FieldKind::Integer),
    Column::new("width", 5, FieldKind::Integer),
    Column::new("power", 6, FieldKind::UnitFloat),
];

/// `cmconnectionstatus.html` as served by SB8200 firmware. The first
/// `simpleTable` is the startup procedure and is ignored.
pub const SB8200_LAYOUT: PageLayout = PageLayout {
    table_selector: "table.simpleTable",
    downstream: TableLayout {
        name: "downstream",
        position: 1,
        header_rows: 2,
        columns: DOWNSTREAM_COLUMNS,
    },
    upstream: TableLayout {
        name: "upstream",
        position: 2,
        header_rows: 2,
        columns: UPSTREAM_COLUMNS,
    },
};

/// The coerced values of one data row, addressable by field name.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    table: &'static str,
    fields: Vec<(&'static str, Value)>,
}

impl Row {
    pub fn new(table: &'static str, fields: Vec<(&'static str, Value)>) -> Self {
        Self { table, fields }
    }

    pub fn get(&self, field: &str) -> Result<Value, AdapterError> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| *value)
            .ok_or_else(|| {
                AdapterError::Layout(format!("{} layout has no {} column", self.table, field))
            })
    }

    /// An integer field. A column coerced as a float is a layout mistake.
    pub fn int(&self, field: &str) -> Result<i64, AdapterError> {
        let value = self.get(field)?;
        value.as_i64().ok_or_else(|| {
            AdapterError::Layout(format!(
                "{} layout maps integer field {} to a float column",
                self.table, field
            ))
        })
    }

    pub fn float(&self, field: &str) -> Result<f64, AdapterError> {
        self.get(field).map(|v| v.as_f64())
    }
}

/// Construction of a reading from a coerced row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self, AdapterError>;
}

impl FromRow for DownstreamChannelReading {
    fn from_row(row: &Row) -> Result<Self, AdapterError> {
        Ok(Self {
            channel: row.int("channel")?,
            modulation: row.int("modulation")?,
            freq_hz: row.float("freq")?,
            power_dbmv: row.float("power")?,
            snr_db: row.float("snr")?,
            correcteds: row.int("correcteds")?,
            uncorrectables: row.int("uncorrectables")?,
        })
    }
}

impl FromRow for UpstreamChannelReading {
    fn from_row(row: &Row) -> Result<Self, AdapterError> {
        Ok(Self {
            channel: row.int("channel")?,
            width_hz: row.int("width")?,
            freq_hz: row.int("freq")?,
            power_dbmv: row.float("power")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sb8200_layout_shape() {
        assert_eq!(SB8200_LAYOUT.min_tables(), 3);
        assert_eq!(SB8200_LAYOUT.downstream.min_cells(), 8);
        assert_eq!(SB8200_LAYOUT.upstream.min_cells(), 7);
    }

    #[test]
    fn test_row_lookup() {
        let row = Row::new(
            "upstream",
            vec![
                ("channel", Value::Int(1)),
                ("freq", Value::Int(36_000_000)),
                ("width", Value::Int(6_400_000)),
                ("power", Value::Float(44.0)),
            ],
        );

        let reading = UpstreamChannelReading::from_row(&row).unwrap();
        assert_eq!(reading.channel, 1);
        assert_eq!(reading.freq_hz, 36_000_000);
        assert_eq!(reading.width_hz, 6_400_000);
        assert_eq!(reading.power_dbmv, 44.0);
    }

    #[test]
    fn test_unmapped_field_is_layout_error() {
        let row = Row::new("downstream", vec![("channel", Value::Int(1))]);
        let err = DownstreamChannelReading::from_row(&row).unwrap_err();
        assert!(matches!(err, AdapterError::Layout(ref msg) if msg.contains("modulation")));
    }

    #[test]
    fn test_float_column_for_integer_field_is_layout_error() {
        let row = Row::new(
            "upstream",
            vec![
                ("channel", Value::Int(1)),
                ("freq", Value::Float(36_000_000.5)),
                ("width", Value::Int(6_400_000)),
                ("power", Value::Float(44.0)),
            ],
        );

        let err = UpstreamChannelReading::from_row(&row).unwrap_err();
        assert!(matches!(err, AdapterError::Layout(ref msg) if msg.contains("freq")));
        assert_eq!(err.kind(), crate::ErrorKind::Layout);
    }
}
