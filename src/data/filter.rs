use super::error::SelectionError;
use super::model::{Dataset, FilterSelection, FilteredTable};

/// Apply a selection to the loaded dataset.
///
/// * The year range is clamped to the dataset's observed bounds; asking for
///   years outside the data is not an error.
/// * An inverted range (`year_start > year_end`) is.
/// * Every requested indicator must be in the enumeration for the chosen
///   category; unknown names fail fast.
/// * An empty indicator set yields an empty table, not an error.
///
/// Output rows keep the dataset order: chronological ascending, then by
/// indicator name.
pub fn filter(
    dataset: &Dataset,
    selection: &FilterSelection,
) -> Result<FilteredTable, SelectionError> {
    if selection.year_start > selection.year_end {
        return Err(SelectionError::InvalidYearRange {
            start: selection.year_start,
            end: selection.year_end,
        });
    }

    let known = dataset
        .indicators
        .get(&selection.category)
        .cloned()
        .unwrap_or_default();
    if let Some(unknown) = selection.indicators.iter().find(|i| !known.contains(*i)) {
        return Err(SelectionError::UnknownIndicator {
            category: selection.category,
            indicator: unknown.clone(),
        });
    }

    if selection.indicators.is_empty() {
        return Ok(FilteredTable::default());
    }

    let (min_year, max_year) = dataset.year_bounds;
    let start = selection.year_start.clamp(min_year, max_year);
    let end = selection.year_end.clamp(min_year, max_year);

    let rows = dataset
        .rows
        .iter()
        .filter(|row| {
            row.category == selection.category
                && (start..=end).contains(&row.period.year)
                && selection.indicators.contains(&row.indicator)
        })
        .cloned()
        .collect();

    Ok(FilteredTable { rows })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::model::{Category, Period, TimeSeriesRow};

    /// One row per month per indicator, asset side, for 1995..=2024.
    fn sample_dataset() -> Dataset {
        let mut rows = Vec::new();
        for year in 1995..=2024u16 {
            for month in 1..=12u8 {
                for indicator in ["deposits", "loans", "investments"] {
                    rows.push(TimeSeriesRow {
                        period: Period { year, month },
                        category: Category::Asset,
                        indicator: indicator.to_string(),
                        value: Some(year as f64 + month as f64 / 100.0),
                    });
                }
            }
        }
        rows.push(TimeSeriesRow {
            period: Period { year: 2000, month: 1 },
            category: Category::Liability,
            indicator: "borrowings".to_string(),
            value: Some(1.0),
        });
        Dataset::from_rows(rows).unwrap()
    }

    fn selection(start: u16, end: u16, indicators: &[&str]) -> FilterSelection {
        FilterSelection {
            year_start: start,
            year_end: end,
            category: Category::Asset,
            indicators: indicators.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn rows_match_the_selection() {
        let ds = sample_dataset();
        let sel = selection(2010, 2015, &["deposits", "loans"]);
        let table = filter(&ds, &sel).unwrap();

        // 6 years x 12 months x 2 indicators
        assert_eq!(table.len(), 6 * 12 * 2);
        for row in &table.rows {
            assert!((2010..=2015).contains(&row.period.year));
            assert_eq!(row.category, Category::Asset);
            assert!(sel.indicators.contains(&row.indicator));
        }
        assert!(table.rows.windows(2).all(|w| {
            (w[0].period, w[0].indicator.as_str()) <= (w[1].period, w[1].indicator.as_str())
        }));
    }

    #[test]
    fn empty_indicator_set_yields_empty_table() {
        let ds = sample_dataset();
        let table = filter(&ds, &selection(2010, 2015, &[])).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn out_of_bounds_years_clamp_to_dataset() {
        let ds = sample_dataset();
        let table = filter(&ds, &selection(1900, 2100, &["deposits"])).unwrap();
        assert_eq!(table.len(), 30 * 12);
        assert_eq!(table.rows.first().unwrap().period.year, 1995);
        assert_eq!(table.rows.last().unwrap().period.year, 2024);
    }

    #[test]
    fn inverted_range_is_an_error() {
        let ds = sample_dataset();
        let err = filter(&ds, &selection(2015, 2010, &["deposits"])).unwrap_err();
        assert_eq!(
            err,
            SelectionError::InvalidYearRange { start: 2015, end: 2010 }
        );
    }

    #[test]
    fn unknown_indicator_fails_fast() {
        let ds = sample_dataset();
        // "borrowings" exists, but on the liability side.
        let err = filter(&ds, &selection(2000, 2000, &["borrowings"])).unwrap_err();
        assert!(matches!(err, SelectionError::UnknownIndicator { .. }));
        let mut sel = selection(2000, 2000, &["borrowings"]);
        sel.category = Category::Liability;
        assert_eq!(filter(&ds, &sel).unwrap().len(), 1);
    }

    #[test]
    fn range_below_bounds_clamps_to_first_year() {
        let ds = sample_dataset();
        let sel = FilterSelection {
            year_start: 1800,
            year_end: 1810,
            category: Category::Asset,
            indicators: BTreeSet::from(["deposits".to_string()]),
        };
        // Both endpoints clamp up to 1995, so the full first year comes back.
        let table = filter(&ds, &sel).unwrap();
        assert!(table.rows.iter().all(|r| r.period.year == 1995));
    }
}
