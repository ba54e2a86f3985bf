use rust_xlsxwriter::{Format, Workbook};

use super::error::EncodeError;
use super::model::{FilterSelection, FilteredTable};

// ---------------------------------------------------------------------------
// Export formats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Xlsx];

    pub fn label(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Xlsx => "Excel",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    /// MIME type for the download boundary.
    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// File name reflecting the active filter, e.g. `assets_2010-2015.csv`.
pub fn export_file_name(selection: &FilterSelection, format: ExportFormat) -> String {
    format!(
        "{}_{}-{}.{}",
        selection.category.label().to_ascii_lowercase(),
        selection.year_start,
        selection.year_end,
        format.extension()
    )
}

const HEADER: [&str; 4] = ["period", "category", "indicator", "value"];

// ---------------------------------------------------------------------------
// encode
// ---------------------------------------------------------------------------

/// Serialize the filtered table to a downloadable byte stream.
/// An empty table is an error so the user hears "nothing to export"
/// instead of receiving an empty file.
pub fn encode(table: &FilteredTable, format: ExportFormat) -> Result<Vec<u8>, EncodeError> {
    if table.is_empty() {
        return Err(EncodeError::EmptyTable);
    }
    match format {
        ExportFormat::Csv => encode_csv(table),
        ExportFormat::Xlsx => encode_xlsx(table),
    }
}

/// RFC-4180-style CSV: header row, one line per table row, nulls as empty
/// fields. `f64`'s `Display` is shortest-round-trip, so full precision
/// survives.
fn encode_csv(table: &FilteredTable) -> Result<Vec<u8>, EncodeError> {
    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(HEADER)?;
    for row in &table.rows {
        let value = row.value.map(|v| v.to_string()).unwrap_or_default();
        wtr.write_record([
            row.period.iso().as_str(),
            row.category.as_str(),
            row.indicator.as_str(),
            value.as_str(),
        ])?;
    }
    Ok(wtr.into_inner().map_err(|e| e.into_error())?)
}

/// Single-sheet workbook, same layout as the CSV, numeric cells typed as
/// numbers. The sheet carries the category's label, as the original
/// spreadsheet export did.
fn encode_xlsx(table: &FilteredTable) -> Result<Vec<u8>, EncodeError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    if let Some(category) = table.category() {
        sheet.set_name(category.label())?;
    }

    let bold = Format::new().set_bold();
    for (col, name) in HEADER.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }

    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        sheet.write_string(r, 0, row.period.iso())?;
        sheet.write_string(r, 1, row.category.as_str())?;
        sheet.write_string(r, 2, &row.indicator)?;
        if let Some(v) = row.value {
            sheet.write_number(r, 3, v)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::model::{Category, Period, TimeSeriesRow};

    fn sample_table() -> FilteredTable {
        let rows = vec![
            TimeSeriesRow {
                period: Period { year: 2015, month: 1 },
                category: Category::Asset,
                indicator: "loans".to_string(),
                value: Some(1820.505),
            },
            TimeSeriesRow {
                period: Period { year: 2015, month: 2 },
                category: Category::Asset,
                indicator: "loans".to_string(),
                value: None,
            },
            TimeSeriesRow {
                period: Period { year: 2015, month: 3 },
                category: Category::Asset,
                indicator: "loans".to_string(),
                value: Some(0.1 + 0.2),
            },
        ];
        FilteredTable { rows }
    }

    #[test]
    fn csv_round_trips_row_count_and_values() {
        let table = sample_table();
        let bytes = encode(&table, ExportFormat::Csv).unwrap();

        let mut rdr = csv::Reader::from_reader(bytes.as_slice());
        assert_eq!(
            rdr.headers().unwrap(),
            &csv::StringRecord::from(vec!["period", "category", "indicator", "value"])
        );
        let records: Vec<csv::StringRecord> =
            rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), table.len());
        assert_eq!(&records[0][0], "2015-01");
        assert_eq!(&records[0][3], "1820.505");
        // null renders as an empty field
        assert_eq!(&records[1][3], "");
        // full precision survives the round trip
        assert_eq!(records[2][3].parse::<f64>().unwrap(), 0.1 + 0.2);
    }

    #[test]
    fn empty_table_is_an_encode_error() {
        let empty = FilteredTable::default();
        assert!(matches!(
            encode(&empty, ExportFormat::Csv),
            Err(EncodeError::EmptyTable)
        ));
        assert!(matches!(
            encode(&empty, ExportFormat::Xlsx),
            Err(EncodeError::EmptyTable)
        ));
    }

    #[test]
    fn xlsx_output_is_a_zip_container() {
        let bytes = encode(&sample_table(), ExportFormat::Xlsx).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[test]
    fn file_name_reflects_the_active_filter() {
        let selection = FilterSelection {
            year_start: 2010,
            year_end: 2015,
            category: Category::Asset,
            indicators: BTreeSet::from(["loans".to_string()]),
        };
        assert_eq!(
            export_file_name(&selection, ExportFormat::Csv),
            "assets_2010-2015.csv"
        );
        assert_eq!(
            export_file_name(&selection, ExportFormat::Xlsx),
            "assets_2010-2015.xlsx"
        );
        assert_eq!(ExportFormat::Csv.mime(), "text/csv");
    }
}
