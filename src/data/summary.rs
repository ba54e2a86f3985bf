use std::collections::BTreeMap;

use super::model::{FilteredTable, Period};

/// Headline figures for the filtered table, mirroring the dashboard's KPI
/// strip: grand total, average per observation, top contributor, and the
/// latest period's total with its movement vs. the month before.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSummary {
    /// Sum of all non-null values.
    pub total: f64,
    /// Mean over the non-null observations.
    pub mean: f64,
    /// Indicator with the largest null-skipping total.
    pub top_indicator: String,
    pub first_period: Period,
    pub last_period: Period,
    /// Total across indicators at `last_period`.
    pub last_total: f64,
    /// `last_total` minus the previous period's total; `None` when the
    /// table covers a single period.
    pub delta: Option<f64>,
}

/// Compute the KPI summary. `None` for an empty table; a table with only
/// null values still summarizes (total 0, mean 0).
pub fn summarize(table: &FilteredTable) -> Option<TableSummary> {
    if table.is_empty() {
        return None;
    }

    let mut total = 0.0;
    let mut observed = 0usize;
    let mut per_indicator: BTreeMap<&str, f64> = BTreeMap::new();
    let mut per_period: BTreeMap<Period, f64> = BTreeMap::new();

    for row in &table.rows {
        let period_total = per_period.entry(row.period).or_insert(0.0);
        let Some(v) = row.value else { continue };
        total += v;
        observed += 1;
        *period_total += v;
        *per_indicator.entry(row.indicator.as_str()).or_insert(0.0) += v;
    }

    let mean = if observed == 0 { 0.0 } else { total / observed as f64 };
    let top_indicator = per_indicator
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(name, _)| name.to_string())
        .unwrap_or_default();

    let first_period = *per_period.keys().next()?;
    let last_period = *per_period.keys().next_back()?;
    let last_total = per_period[&last_period];
    let delta = per_period
        .iter()
        .rev()
        .nth(1)
        .map(|(_, prev_total)| last_total - prev_total);

    Some(TableSummary {
        total,
        mean,
        top_indicator,
        first_period,
        last_period,
        last_total,
        delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Category, TimeSeriesRow};

    fn row(month: u8, indicator: &str, value: Option<f64>) -> TimeSeriesRow {
        TimeSeriesRow {
            period: Period { year: 2020, month },
            category: Category::Liability,
            indicator: indicator.to_string(),
            value,
        }
    }

    #[test]
    fn kpis_match_hand_computed_values() {
        let table = FilteredTable {
            rows: vec![
                row(1, "deposits", Some(100.0)),
                row(1, "borrowings", Some(40.0)),
                row(2, "deposits", Some(110.0)),
                row(2, "borrowings", None),
            ],
        };
        let s = summarize(&table).unwrap();
        assert_eq!(s.total, 250.0);
        assert_eq!(s.mean, 250.0 / 3.0);
        assert_eq!(s.top_indicator, "deposits");
        assert_eq!(s.first_period, Period { year: 2020, month: 1 });
        assert_eq!(s.last_period, Period { year: 2020, month: 2 });
        assert_eq!(s.last_total, 110.0);
        // 110 vs 140 in January
        assert_eq!(s.delta, Some(-30.0));
    }

    #[test]
    fn single_period_has_no_delta() {
        let table = FilteredTable {
            rows: vec![row(1, "deposits", Some(100.0))],
        };
        let s = summarize(&table).unwrap();
        assert_eq!(s.delta, None);
        assert_eq!(s.last_total, 100.0);
    }

    #[test]
    fn empty_table_has_no_summary() {
        assert_eq!(summarize(&FilteredTable::default()), None);
    }

    #[test]
    fn all_null_table_still_summarizes() {
        let table = FilteredTable {
            rows: vec![row(1, "deposits", None), row(2, "deposits", None)],
        };
        let s = summarize(&table).unwrap();
        assert_eq!(s.total, 0.0);
        assert_eq!(s.mean, 0.0);
        assert_eq!(s.delta, Some(0.0));
    }
}
