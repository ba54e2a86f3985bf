use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use super::error::LoadError;
use super::model::{Dataset, TimeSeriesRow};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the balance-sheet dataset from a file. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – long-format table with header `period,category,indicator,value`
/// * `.json` – `[{ "period": "1995-01", "category": "asset", ... }, ...]`
///
/// Performed once per session; the resulting [`Dataset`] is immutable.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            load_csv(file)
        }
        "json" => {
            let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            load_json(&text)
        }
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row `period,category,indicator,value` (any column
/// order, names matched case-insensitively). An empty `value` field is a
/// missing observation.
pub fn load_csv<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();

    let col = |name: &'static str| -> Result<usize, LoadError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let period_idx = col("period")?;
    let category_idx = col("category")?;
    let indicator_idx = col("indicator")?;
    let value_idx = col("value")?;

    let mut rows = Vec::new();
    for (row_no, result) in rdr.records().enumerate() {
        let record = result?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim();

        let period = field(period_idx)
            .parse()
            .map_err(|e| bad_row(row_no, e))?;
        let category = field(category_idx)
            .parse()
            .map_err(|e| bad_row(row_no, e))?;
        let indicator = field(indicator_idx).to_string();
        if indicator.is_empty() {
            return Err(LoadError::BadRow {
                row: row_no,
                message: "empty indicator name".to_string(),
            });
        }
        let value = parse_value(field(value_idx), row_no)?;

        rows.push(TimeSeriesRow {
            period,
            category,
            indicator,
            value,
        });
    }

    Dataset::from_rows(rows)
}

fn parse_value(s: &str, row_no: usize) -> Result<Option<f64>, LoadError> {
    if s.is_empty() {
        return Ok(None);
    }
    s.parse::<f64>().map(Some).map_err(|_| LoadError::BadRow {
        row: row_no,
        message: format!("'{s}' is not a number"),
    })
}

fn bad_row(row_no: usize, err: impl std::fmt::Display) -> LoadError {
    LoadError::BadRow {
        row: row_no,
        message: err.to_string(),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// One record of the records-oriented JSON form
/// (`df.to_json(orient='records')` of the long-format table).
#[derive(Debug, Deserialize)]
struct RawRecord {
    period: String,
    category: String,
    indicator: String,
    #[serde(default)]
    value: Option<f64>,
}

/// Expected JSON schema:
///
/// ```json
/// [
///   { "period": "2015-03", "category": "asset",
///     "indicator": "loans", "value": 1820.5 },
///   ...
/// ]
/// ```
pub fn load_json(text: &str) -> Result<Dataset, LoadError> {
    let records: Vec<RawRecord> = serde_json::from_str(text)?;

    let mut rows = Vec::with_capacity(records.len());
    for (row_no, rec) in records.into_iter().enumerate() {
        let period = rec.period.parse().map_err(|e| bad_row(row_no, e))?;
        let category = rec.category.parse().map_err(|e| bad_row(row_no, e))?;
        if rec.indicator.is_empty() {
            return Err(LoadError::BadRow {
                row: row_no,
                message: "empty indicator name".to_string(),
            });
        }
        rows.push(TimeSeriesRow {
            period,
            category,
            indicator: rec.indicator,
            value: rec.value,
        });
    }

    Dataset::from_rows(rows)
}
