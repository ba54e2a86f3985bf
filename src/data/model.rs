use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::error::LoadError;

// ---------------------------------------------------------------------------
// Period – one monthly reporting point
// ---------------------------------------------------------------------------

/// A monthly reporting period. Ordering is chronological (year, then month),
/// which the derived `Ord` gives us from the field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    pub year: u16,
    /// 1-based month (1 = January).
    pub month: u8,
}

const MONTH_ABBREV: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid period '{0}', expected YYYY-MM or YYYY-MM-DD")]
pub struct ParsePeriodError(pub String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    /// Accepts `YYYY-MM` or `YYYY-MM-DD` (the day is ignored; the source
    /// reports end-of-month snapshots).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParsePeriodError(s.to_string());
        let mut parts = s.trim().splitn(3, '-');
        let year: u16 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        let month: u8 = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
        if !(1..=12).contains(&month) {
            return Err(err());
        }
        Ok(Period { year, month })
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", MONTH_ABBREV[(self.month - 1) as usize], self.year)
    }
}

impl Period {
    /// ISO-style `YYYY-MM` rendering used in exports.
    pub fn iso(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }

    /// Months since year 0, used as the numeric plot axis.
    pub fn serial(&self) -> f64 {
        self.year as f64 * 12.0 + (self.month - 1) as f64
    }
}

// ---------------------------------------------------------------------------
// Category – which side of the balance sheet a row belongs to
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    Asset,
    Liability,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid category '{0}', expected 'asset' or 'liability'")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asset" | "assets" => Ok(Category::Asset),
            "liability" | "liabilities" => Ok(Category::Liability),
            _ => Err(ParseCategoryError(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Asset, Category::Liability];

    /// Singular lowercase form used in the source file and in exports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Asset => "asset",
            Category::Liability => "liability",
        }
    }

    /// Plural label for UI headings and sheet names.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Asset => "Assets",
            Category::Liability => "Liabilities",
        }
    }
}

// ---------------------------------------------------------------------------
// TimeSeriesRow – one observation of one indicator
// ---------------------------------------------------------------------------

/// A single observation: one indicator's value for one month.
/// `value` is `None` for months with no reported figure.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesRow {
    pub period: Period,
    pub category: Category,
    pub indicator: String,
    pub value: Option<f64>,
}

impl TimeSeriesRow {
    /// Sort/uniqueness key: chronological, then category, then indicator.
    fn key(&self) -> (Period, Category, &str) {
        (self.period, self.category, self.indicator.as_str())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table, immutable after load
// ---------------------------------------------------------------------------

/// The full parsed dataset with pre-computed indicator enumerations and
/// observed year bounds. Built once at load time and never mutated, so it is
/// safe to share read-only for the process lifetime.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All rows, sorted chronologically, then by category and indicator.
    pub rows: Vec<TimeSeriesRow>,
    /// Per-category sorted set of indicator names present in the data.
    /// Indicator requests are validated against this enumeration.
    pub indicators: BTreeMap<Category, BTreeSet<String>>,
    /// Observed `(min_year, max_year)` across all rows.
    pub year_bounds: (u16, u16),
}

impl Dataset {
    /// Build a dataset from loaded rows: sorts, indexes indicators, and
    /// rejects empty input and duplicate `(period, category, indicator)`
    /// keys as malformed.
    pub fn from_rows(mut rows: Vec<TimeSeriesRow>) -> Result<Self, LoadError> {
        if rows.is_empty() {
            return Err(LoadError::Empty);
        }
        rows.sort_by(|a, b| a.key().cmp(&b.key()));

        for pair in rows.windows(2) {
            if pair[0].key() == pair[1].key() {
                return Err(LoadError::Duplicate {
                    period: pair[0].period,
                    category: pair[0].category,
                    indicator: pair[0].indicator.clone(),
                });
            }
        }

        let mut indicators: BTreeMap<Category, BTreeSet<String>> = BTreeMap::new();
        let mut min_year = u16::MAX;
        let mut max_year = u16::MIN;
        for row in &rows {
            indicators
                .entry(row.category)
                .or_default()
                .insert(row.indicator.clone());
            min_year = min_year.min(row.period.year);
            max_year = max_year.max(row.period.year);
        }

        Ok(Dataset {
            rows,
            indicators,
            year_bounds: (min_year, max_year),
        })
    }

    /// Indicator enumeration for a category (empty if the category has no rows).
    pub fn indicators_for(&self, category: Category) -> BTreeSet<String> {
        self.indicators.get(&category).cloned().unwrap_or_default()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows (never true once loaded).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// FilterSelection / FilteredTable
// ---------------------------------------------------------------------------

/// The user's active selection: year range, balance-sheet side, and the
/// subset of that side's indicators to include. Created fresh per
/// interaction, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub year_start: u16,
    pub year_end: u16,
    pub category: Category,
    pub indicators: BTreeSet<String>,
}

/// Owned, read-only subset of rows matching a [`FilterSelection`].
/// Recomputed on every selection change and discarded after use.
/// Rows keep the dataset's chronological-then-indicator order.
#[derive(Debug, Clone, Default)]
pub struct FilteredTable {
    pub rows: Vec<TimeSeriesRow>,
}

impl FilteredTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Category of the table's rows (filter output is single-category).
    pub fn category(&self) -> Option<Category> {
        self.rows.first().map(|r| r.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(year: u16, month: u8, indicator: &str, value: Option<f64>) -> TimeSeriesRow {
        TimeSeriesRow {
            period: Period { year, month },
            category: Category::Asset,
            indicator: indicator.to_string(),
            value,
        }
    }

    #[test]
    fn period_parses_iso_forms() {
        assert_eq!("2015-03".parse::<Period>().unwrap(), Period { year: 2015, month: 3 });
        assert_eq!("1995-12-31".parse::<Period>().unwrap(), Period { year: 1995, month: 12 });
        assert!("2015-13".parse::<Period>().is_err());
        assert!("March 2015".parse::<Period>().is_err());
    }

    #[test]
    fn period_orders_chronologically() {
        let a = Period { year: 2010, month: 12 };
        let b = Period { year: 2011, month: 1 };
        assert!(a < b);
        assert_eq!(b.serial() - a.serial(), 1.0);
    }

    #[test]
    fn category_parses_both_forms() {
        assert_eq!("Assets".parse::<Category>().unwrap(), Category::Asset);
        assert_eq!("liability".parse::<Category>().unwrap(), Category::Liability);
        assert!("equity".parse::<Category>().is_err());
    }

    #[test]
    fn dataset_sorts_and_indexes() {
        let ds = Dataset::from_rows(vec![
            row(2020, 2, "loans", Some(2.0)),
            row(2019, 1, "deposits", Some(1.0)),
            row(2019, 1, "loans", None),
        ])
        .unwrap();
        assert_eq!(ds.year_bounds, (2019, 2020));
        assert_eq!(ds.rows[0].indicator, "deposits");
        assert_eq!(ds.rows[2].period, Period { year: 2020, month: 2 });
        let inds = ds.indicators_for(Category::Asset);
        assert!(inds.contains("loans") && inds.contains("deposits"));
        assert!(ds.indicators_for(Category::Liability).is_empty());
    }

    #[test]
    fn dataset_rejects_duplicates_and_empty() {
        let dup = Dataset::from_rows(vec![
            row(2020, 1, "loans", Some(1.0)),
            row(2020, 1, "loans", Some(2.0)),
        ]);
        assert!(matches!(dup, Err(LoadError::Duplicate { .. })));
        assert!(matches!(Dataset::from_rows(Vec::new()), Err(LoadError::Empty)));
    }
}
