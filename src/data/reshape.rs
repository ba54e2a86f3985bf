use std::collections::BTreeMap;

use super::model::{FilteredTable, Period};

// ---------------------------------------------------------------------------
// Chart kinds and chart-ready shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Box,
    Pie,
    DivergingBar,
}

impl ChartKind {
    pub const ALL: [ChartKind; 5] = [
        ChartKind::Line,
        ChartKind::Bar,
        ChartKind::Box,
        ChartKind::Pie,
        ChartKind::DivergingBar,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Line => "Line",
            ChartKind::Bar => "Bar",
            ChartKind::Box => "Box",
            ChartKind::Pie => "Pie",
            ChartKind::DivergingBar => "Diverging bar",
        }
    }
}

/// One indicator's ordered point series. Missing observations stay `None`
/// so the renderer can show gaps instead of interpolating.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator: String,
    pub points: Vec<(Period, Option<f64>)>,
}

/// One pie slice: an indicator's null-skipping total over the filtered range.
#[derive(Debug, Clone, PartialEq)]
pub struct PieSlice {
    pub indicator: String,
    pub total: f64,
}

/// Paired magnitudes for one period of a diverging bar chart: the summed
/// positive month-over-month deltas vs. the summed magnitudes of the
/// negative ones, across the selected indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct DivergingPoint {
    pub period: Period,
    pub gains: f64,
    pub losses: f64,
}

/// Data reshaped into the structure one chart type needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartReadyData {
    /// Line / bar / box: one series per indicator, chronological.
    Series(Vec<IndicatorSeries>),
    /// Pie: per-indicator aggregates; all-null indicators are excluded.
    Pie(Vec<PieSlice>),
    /// Diverging bar: paired magnitudes per period.
    Diverging(Vec<DivergingPoint>),
}

// ---------------------------------------------------------------------------
// reshape
// ---------------------------------------------------------------------------

/// Reshape a filtered table into what the given chart kind consumes.
/// Sums skip nulls (0 contribution); per-point series keep them so callers
/// can render gaps.
pub fn reshape(table: &FilteredTable, kind: ChartKind) -> ChartReadyData {
    match kind {
        ChartKind::Line | ChartKind::Bar | ChartKind::Box => {
            ChartReadyData::Series(indicator_series(table))
        }
        ChartKind::Pie => ChartReadyData::Pie(pie_slices(table)),
        ChartKind::DivergingBar => ChartReadyData::Diverging(diverging_points(table)),
    }
}

/// Group rows into per-indicator series. Table rows are already sorted
/// chronologically, so each series comes out ordered; the map keeps the
/// series themselves in indicator order.
fn indicator_series(table: &FilteredTable) -> Vec<IndicatorSeries> {
    let mut by_indicator: BTreeMap<&str, Vec<(Period, Option<f64>)>> = BTreeMap::new();
    for row in &table.rows {
        by_indicator
            .entry(row.indicator.as_str())
            .or_default()
            .push((row.period, row.value));
    }
    by_indicator
        .into_iter()
        .map(|(indicator, points)| IndicatorSeries {
            indicator: indicator.to_string(),
            points,
        })
        .collect()
}

fn pie_slices(table: &FilteredTable) -> Vec<PieSlice> {
    let mut totals: BTreeMap<&str, (f64, bool)> = BTreeMap::new();
    for row in &table.rows {
        let entry = totals.entry(row.indicator.as_str()).or_insert((0.0, false));
        if let Some(v) = row.value {
            entry.0 += v;
            entry.1 = true;
        }
    }
    totals
        .into_iter()
        .filter(|(_, (_, any_value))| *any_value)
        .map(|(indicator, (total, _))| PieSlice {
            indicator: indicator.to_string(),
            total,
        })
        .collect()
}

/// Month-over-month deltas, accumulated per period across indicators and
/// split by sign. A null on either side of a step breaks the delta chain,
/// so gaps never fabricate a movement.
fn diverging_points(table: &FilteredTable) -> Vec<DivergingPoint> {
    let mut paired: BTreeMap<Period, (f64, f64)> = BTreeMap::new();
    for row in &table.rows {
        paired.entry(row.period).or_insert((0.0, 0.0));
    }

    for series in indicator_series(table) {
        for step in series.points.windows(2) {
            let ((_, prev), (period, curr)) = (step[0], step[1]);
            let (Some(prev), Some(curr)) = (prev, curr) else {
                continue;
            };
            let delta = curr - prev;
            let entry = paired.entry(period).or_insert((0.0, 0.0));
            if delta >= 0.0 {
                entry.0 += delta;
            } else {
                entry.1 += -delta;
            }
        }
    }

    paired
        .into_iter()
        .map(|(period, (gains, losses))| DivergingPoint {
            period,
            gains,
            losses,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Category, TimeSeriesRow};

    fn table(rows: &[(u16, u8, &str, Option<f64>)]) -> FilteredTable {
        let mut rows: Vec<TimeSeriesRow> = rows
            .iter()
            .map(|&(year, month, indicator, value)| TimeSeriesRow {
                period: Period { year, month },
                category: Category::Asset,
                indicator: indicator.to_string(),
                value,
            })
            .collect();
        rows.sort_by(|a, b| {
            (a.period, a.indicator.clone()).cmp(&(b.period, b.indicator.clone()))
        });
        FilteredTable { rows }
    }

    #[test]
    fn series_keep_nulls_and_order() {
        let t = table(&[
            (2020, 1, "loans", Some(10.0)),
            (2020, 2, "loans", None),
            (2020, 3, "loans", Some(12.0)),
            (2020, 1, "deposits", Some(5.0)),
        ]);
        let ChartReadyData::Series(series) = reshape(&t, ChartKind::Line) else {
            panic!("expected series");
        };
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].indicator, "deposits");
        assert_eq!(
            series[1].points,
            vec![
                (Period { year: 2020, month: 1 }, Some(10.0)),
                (Period { year: 2020, month: 2 }, None),
                (Period { year: 2020, month: 3 }, Some(12.0)),
            ]
        );
    }

    #[test]
    fn pie_totals_match_direct_sums_and_skip_nulls() {
        let t = table(&[
            (2020, 1, "loans", Some(10.0)),
            (2020, 2, "loans", None),
            (2020, 3, "loans", Some(12.0)),
            (2020, 1, "deposits", None),
            (2020, 2, "deposits", None),
        ]);
        let ChartReadyData::Pie(slices) = reshape(&t, ChartKind::Pie) else {
            panic!("expected pie");
        };
        // all-null "deposits" is excluded entirely
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].indicator, "loans");
        let direct: f64 = t
            .rows
            .iter()
            .filter(|r| r.indicator == "loans")
            .filter_map(|r| r.value)
            .sum();
        assert_eq!(slices[0].total, direct);
        assert_eq!(slices[0].total, 22.0);
    }

    #[test]
    fn diverging_pairs_split_by_delta_sign() {
        let t = table(&[
            (2020, 1, "loans", Some(10.0)),
            (2020, 2, "loans", Some(13.0)), // +3
            (2020, 3, "loans", Some(11.0)), // -2
            (2020, 1, "deposits", Some(5.0)),
            (2020, 2, "deposits", Some(4.0)), // -1
            (2020, 3, "deposits", Some(9.0)), // +5
        ]);
        let ChartReadyData::Diverging(points) = reshape(&t, ChartKind::DivergingBar) else {
            panic!("expected diverging");
        };
        assert_eq!(points.len(), 3);
        // first period has no previous month
        assert_eq!((points[0].gains, points[0].losses), (0.0, 0.0));
        assert_eq!((points[1].gains, points[1].losses), (3.0, 1.0));
        assert_eq!((points[2].gains, points[2].losses), (5.0, 2.0));
        assert!(points.iter().all(|p| p.gains >= 0.0 && p.losses >= 0.0));
    }

    #[test]
    fn diverging_skips_deltas_across_null_gaps() {
        let t = table(&[
            (2020, 1, "loans", Some(10.0)),
            (2020, 2, "loans", None),
            (2020, 3, "loans", Some(30.0)),
        ]);
        let ChartReadyData::Diverging(points) = reshape(&t, ChartKind::DivergingBar) else {
            panic!("expected diverging");
        };
        // neither side of the gap produces a delta
        assert!(points.iter().all(|p| p.gains == 0.0 && p.losses == 0.0));
    }

    #[test]
    fn empty_table_reshapes_to_empty_shapes() {
        let t = FilteredTable::default();
        assert_eq!(reshape(&t, ChartKind::Bar), ChartReadyData::Series(vec![]));
        assert_eq!(reshape(&t, ChartKind::Pie), ChartReadyData::Pie(vec![]));
    }
}
