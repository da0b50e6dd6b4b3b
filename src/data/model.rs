use std::fmt;

// ---------------------------------------------------------------------------
// ExportField – which numeric column an aggregation runs over
// ---------------------------------------------------------------------------

/// Selector for the two numeric columns of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportField {
    /// `Nilai` – export value in USD.
    Value,
    /// `Berat` – export weight in kilograms.
    Weight,
}

impl ExportField {
    /// Axis/metric label including the unit.
    pub fn label(self) -> &'static str {
        match self {
            ExportField::Value => "Value (USD)",
            ExportField::Weight => "Weight (Kg)",
        }
    }
}

impl fmt::Display for ExportField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// YearRange – inclusive [min, max] interval of years
// ---------------------------------------------------------------------------

/// An inclusive year interval. `min == max` selects a single year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    /// Build a range, swapping the bounds if they arrive inverted.
    pub fn new(a: i32, b: i32) -> Self {
        if a <= b {
            YearRange { min: a, max: b }
        } else {
            YearRange { min: b, max: a }
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// Clamp both bounds into `domain`. A range lying entirely outside the
    /// domain collapses onto the nearest domain edge.
    pub fn clamp_to(self, domain: YearRange) -> YearRange {
        YearRange::new(
            self.min.clamp(domain.min, domain.max),
            self.max.clamp(domain.min, domain.max),
        )
    }
}

impl fmt::Display for YearRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.min, self.max)
    }
}

// ---------------------------------------------------------------------------
// ExportRecord – one row of the source table
// ---------------------------------------------------------------------------

/// A single export observation (one row of the source file).
///
/// `iso3`, `value_usd` and `weight_kg` are optional: blank cells are legal in
/// the source data and such rows still count towards the yearly totals, they
/// are only excluded from the geographic views.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportRecord {
    /// `Tahun` – observation year.
    pub year: i32,
    /// `Negara` – destination country display name (may be empty).
    pub country: String,
    /// `Iso-3` – three-letter territory code, upper-cased.
    pub iso3: Option<String>,
    /// `Nilai` – export value in USD.
    pub value_usd: Option<f64>,
    /// `Berat` – export weight in kilograms.
    pub weight_kg: Option<f64>,
}

impl ExportRecord {
    /// The requested numeric cell, if present.
    pub fn field(&self, field: ExportField) -> Option<f64> {
        match field {
            ExportField::Value => self.value_usd,
            ExportField::Weight => self.weight_kg,
        }
    }

    /// Whether every cell of the row is populated. Only complete rows feed
    /// the choropleth maps and the top-N rankings.
    pub fn is_complete(&self) -> bool {
        !self.country.is_empty()
            && self.iso3.is_some()
            && self.value_usd.is_some()
            && self.weight_kg.is_some()
    }
}

// ---------------------------------------------------------------------------
// ExportDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset, in file order, with the observed year span.
///
/// Loaded once per session and never mutated; every filtered or aggregated
/// view is a new collection derived from `records`.
#[derive(Debug, Clone)]
pub struct ExportDataset {
    /// All rows, preserving source-file order.
    pub records: Vec<ExportRecord>,
    /// Minimum and maximum `year` observed in `records`.
    pub year_span: YearRange,
}

impl ExportDataset {
    /// Wrap loaded rows, computing the year span. The loader rejects empty
    /// inputs, so the placeholder span of an empty dataset is never observable.
    pub fn from_records(records: Vec<ExportRecord>) -> Self {
        let min = records.iter().map(|r| r.year).min().unwrap_or(0);
        let max = records.iter().map(|r| r.year).max().unwrap_or(0);
        ExportDataset {
            records,
            year_span: YearRange::new(min, max),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
