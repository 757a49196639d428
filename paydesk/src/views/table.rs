//! Client-side data table: free-text search plus single-column sort
//!
//! Everything happens on the rows already loaded; there is no pagination.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use shared::AppError;
use shared::money;

/// Column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub sortable: bool,
}

impl Column {
    pub const fn sortable(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: true,
        }
    }

    pub const fn fixed(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            sortable: false,
        }
    }
}

/// Typed cell content; ordering depends on the variant
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Money { amount: f64, currency: String },
    /// Raw `YYYY-MM-DD` or RFC 3339 timestamp
    Date(String),
    Empty,
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Rendered form, also what search matches against
    pub fn display(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(n) if n.fract() == 0.0 => format!("{n:.0}"),
            Self::Number(n) => n.to_string(),
            Self::Money { amount, currency } => {
                format!("{} {}", money::format_grouped(*amount), currency)
            }
            Self::Date(raw) => parse_timestamp(raw)
                .map(|at| at.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| raw.clone()),
            Self::Empty => "-".to_string(),
        }
    }

    fn sort_key(&self) -> SortKey {
        match self {
            Self::Number(n) => SortKey::Number(*n),
            Self::Money { amount, .. } => SortKey::Number(*amount),
            Self::Date(raw) => match parse_timestamp(raw) {
                Some(at) => SortKey::Date(at),
                None => SortKey::Text(raw.to_lowercase()),
            },
            Self::Text(s) => SortKey::Text(s.to_lowercase()),
            Self::Empty => SortKey::Missing,
        }
    }

    /// Missing values sort first; mixed kinds fall back to text
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self.sort_key(), other.sort_key()) {
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Less,
            (_, SortKey::Missing) => Ordering::Greater,
            (SortKey::Number(a), SortKey::Number(b)) => a.total_cmp(&b),
            (SortKey::Date(a), SortKey::Date(b)) => a.cmp(&b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(&b),
            _ => self.display().to_lowercase().cmp(&other.display().to_lowercase()),
        }
    }
}

enum SortKey {
    Missing,
    Number(f64),
    Date(NaiveDateTime),
    Text(String),
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.naive_utc());
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(at);
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// A row type that can be shown in a [`DataTable`]
pub trait TableRow {
    fn columns() -> &'static [Column];

    fn cell(&self, key: &str) -> CellValue;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: &'static str,
    pub direction: SortDirection,
}

#[derive(Debug, Clone)]
pub struct DataTable<R> {
    rows: Vec<R>,
    search: String,
    sort: Option<SortState>,
}

impl<R> Default for DataTable<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            search: String::new(),
            sort: None,
        }
    }
}

impl<R: TableRow> DataTable<R> {
    pub fn new(rows: Vec<R>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// Replace the data, keeping search and sort
    pub fn set_rows(&mut self, rows: Vec<R>) {
        self.rows = rows;
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn columns(&self) -> &'static [Column] {
        R::columns()
    }

    pub fn headers(&self) -> Vec<&'static str> {
        R::columns().iter().map(|c| c.label).collect()
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search = query.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort_state(&self) -> Option<SortState> {
        self.sort
    }

    /// Sort by a sortable column; unknown or fixed columns are rejected
    pub fn sort_by(&mut self, key: &str, direction: SortDirection) -> Result<(), AppError> {
        let column = R::columns()
            .iter()
            .find(|c| c.key == key)
            .ok_or_else(|| AppError::validation(format!("Unknown column: {key}")))?;
        if !column.sortable {
            return Err(AppError::validation(format!(
                "Column {} is not sortable",
                column.label
            )));
        }
        self.sort = Some(SortState {
            key: column.key,
            direction,
        });
        Ok(())
    }

    /// Header click: ascending first, then flip
    pub fn toggle_sort(&mut self, key: &str) -> Result<(), AppError> {
        let direction = match self.sort {
            Some(state) if state.key == key => state.direction.flip(),
            _ => SortDirection::Ascending,
        };
        self.sort_by(key, direction)
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    fn matches(&self, row: &R) -> bool {
        let needle = self.search.trim().to_lowercase();
        needle.is_empty()
            || R::columns()
                .iter()
                .any(|c| row.cell(c.key).display().to_lowercase().contains(&needle))
    }

    /// Rows after search and sort; ties keep their loaded order
    pub fn visible(&self) -> Vec<&R> {
        let mut rows: Vec<&R> = self.rows.iter().filter(|r| self.matches(r)).collect();
        if let Some(SortState { key, direction }) = self.sort {
            rows.sort_by(|a, b| {
                let ord = a.cell(key).compare(&b.cell(key));
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        rows
    }

    /// Visible rows as display strings, column by column
    pub fn render(&self) -> Vec<Vec<String>> {
        self.visible()
            .into_iter()
            .map(|row| {
                R::columns()
                    .iter()
                    .map(|c| row.cell(c.key).display())
                    .collect()
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
